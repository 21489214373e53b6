use super::common::*;
use crate::workflows::kyc::reasoning::{
    ReasoningAssembler, ReasoningTrail, ReasoningVerbosity, REDACTION_MARKER,
};
use crate::workflows::kyc::scoring::ScoringEngine;

fn trail_text(trail: &ReasoningTrail) -> String {
    serde_json::to_string(trail).expect("trail serializes")
}

#[test]
fn verbosity_controls_step_count() {
    let applicant = submission();
    let score = ScoringEngine::default().score(&applicant);

    for (verbosity, expected) in [
        (ReasoningVerbosity::Brief, 3),
        (ReasoningVerbosity::Standard, 5),
        (ReasoningVerbosity::Detailed, 9),
    ] {
        let trail = ReasoningAssembler::new(verbosity).build_reasoning(&applicant, &score);
        assert_eq!(trail.steps.len(), expected);
        assert_eq!(verbosity.step_count(), expected);
        let indices: Vec<u32> = trail.steps.iter().map(|step| step.index).collect();
        assert_eq!(indices, (1..=expected as u32).collect::<Vec<_>>());
    }
}

#[test]
fn brief_trail_interpolates_submission_fields() {
    let applicant = submission();
    let score = ScoringEngine::default().score(&applicant);

    let trail = ReasoningAssembler::default().build_reasoning(&applicant, &score);

    assert_eq!(trail.input, "KYC Ana Silva, 25y, BR");
    assert_eq!(trail.conclusion, "Approved. Badge Verified Creator");
    assert!((trail.confidence - 0.92).abs() < f64::EPSILON);
    assert_eq!(trail.steps[0].label, "Biometric analysis");
    assert!(trail.steps[0].narrative.contains("Ana Silva"));
    assert_eq!(trail.steps[0].outcome_summary, "Match 98%, liveness OK");
    assert_eq!(trail.steps[1].outcome_summary, "Valid BR document");
    assert!(trail.steps[2].outcome_summary.contains("age 25"));
}

#[test]
fn confidence_follows_sub_score() {
    let applicant = submission();
    let score = ScoringEngine::default().score(&applicant);

    let trail =
        ReasoningAssembler::new(ReasoningVerbosity::Detailed).build_reasoning(&applicant, &score);

    for step in &trail.steps {
        assert!((0.0..=1.0).contains(&step.confidence));
        assert!((step.confidence - f64::from(step.sub_score) / 100.0).abs() < f64::EPSILON);
    }
    let composite = trail.steps.last().expect("composite step");
    assert_eq!(composite.sub_score, 92);
}

#[test]
fn trails_without_sensitive_fields_are_not_flagged() {
    let applicant = submission();
    let score = ScoringEngine::default().score(&applicant);
    let assembler = ReasoningAssembler::new(ReasoningVerbosity::Detailed);

    let private = assembler.build_reasoning(&applicant, &score);
    let public = assembler.build_public_reasoning(&applicant, &score);

    assert!(!private.contains_sensitive_data());
    assert_eq!(private, public);
}

#[test]
fn sensitive_values_only_live_in_flagged_steps() {
    let applicant = sensitive_submission();
    let score = ScoringEngine::default().score(&applicant);

    for verbosity in [
        ReasoningVerbosity::Brief,
        ReasoningVerbosity::Standard,
        ReasoningVerbosity::Detailed,
    ] {
        let trail = ReasoningAssembler::new(verbosity).build_reasoning(&applicant, &score);
        assert!(trail.contains_sensitive_data());
        for step in &trail.steps {
            let text = serde_json::to_string(step).expect("step serializes");
            let mentions_sensitive = text.contains(TAX_ID) || text.contains(PASSPORT);
            if !step.contains_sensitive_data {
                assert!(!mentions_sensitive, "unflagged step {} leaks data", step.label);
            }
            assert!(!step.outcome_summary.contains(TAX_ID));
            assert!(!step.outcome_summary.contains(PASSPORT));
        }
        let text = trail_text(&trail);
        assert!(text.contains(TAX_ID));
        assert!(text.contains(PASSPORT));
    }
}

#[test]
fn public_variant_redacts_sensitive_values() {
    let applicant = sensitive_submission();
    let score = ScoringEngine::default().score(&applicant);
    let assembler = ReasoningAssembler::new(ReasoningVerbosity::Detailed);

    let private = assembler.build_reasoning(&applicant, &score);
    let public = assembler.build_public_reasoning(&applicant, &score);

    let text = trail_text(&public);
    assert!(!text.contains(TAX_ID));
    assert!(!text.contains(PASSPORT));
    assert!(text.contains(REDACTION_MARKER));
    assert_eq!(public.steps.len(), private.steps.len());

    for (public_step, private_step) in public.steps.iter().zip(&private.steps) {
        assert_eq!(public_step.label, private_step.label);
        assert_eq!(
            public_step.contains_sensitive_data,
            private_step.contains_sensitive_data
        );
        assert_eq!(public_step.outcome_summary, private_step.outcome_summary);
    }
}

#[test]
fn reasoning_is_deterministic() {
    let applicant = sensitive_submission();
    let score = ScoringEngine::default().score(&applicant);
    let assembler = ReasoningAssembler::new(ReasoningVerbosity::Standard);

    assert_eq!(
        assembler.build_reasoning(&applicant, &score),
        assembler.build_reasoning(&applicant, &score)
    );
}

#[test]
fn verbosity_parses_names_and_counts() {
    assert_eq!("brief".parse(), Ok(ReasoningVerbosity::Brief));
    assert_eq!("5".parse(), Ok(ReasoningVerbosity::Standard));
    assert_eq!("Detailed".parse(), Ok(ReasoningVerbosity::Detailed));
    assert!("verbose".parse::<ReasoningVerbosity>().is_err());
}
