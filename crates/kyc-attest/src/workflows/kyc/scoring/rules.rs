use super::config::{ScoringConfig, ScoringMode};
use super::{ScoreComponent, ScoreFactor};

pub(crate) fn score_components(config: &ScoringConfig) -> Vec<ScoreComponent> {
    let sub_scores = config.sub_scores;
    let weights = config.weights;

    vec![
        ScoreComponent {
            factor: ScoreFactor::Biometric,
            score: sub_scores.biometric,
            weight: weights.biometric,
            notes: format!("simulated face match {}%", sub_scores.biometric),
        },
        ScoreComponent {
            factor: ScoreFactor::Document,
            score: sub_scores.document,
            weight: weights.document,
            notes: format!("simulated document authenticity {}%", sub_scores.document),
        },
        ScoreComponent {
            factor: ScoreFactor::Age,
            score: sub_scores.age,
            weight: weights.age,
            notes: format!("age eligibility {}%", sub_scores.age),
        },
        ScoreComponent {
            factor: ScoreFactor::Compliance,
            score: sub_scores.compliance,
            weight: weights.compliance,
            notes: format!("simulated sanctions screening {}%", sub_scores.compliance),
        },
    ]
}

pub(crate) fn composite_score(config: &ScoringConfig, components: &[ScoreComponent]) -> u8 {
    match config.mode {
        ScoringMode::Fixed => config.fixed_score.min(100),
        ScoringMode::Weighted => {
            let weighted: f64 = components
                .iter()
                .map(|component| component.weight * f64::from(component.score))
                .sum();
            // Halves go to the even neighbour.
            weighted.round_ties_even().clamp(0.0, 100.0) as u8
        }
    }
}
