use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::super::domain::SensitiveField;
use super::super::scoring::{ScoreFactor, ScoreResult};

/// Narrative template identifiers. Order within a verbosity level is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepKind {
    BiometricMatch,
    FaceMatch,
    Liveness,
    DocumentVerification,
    DocumentAuthenticity,
    MrzConsistency,
    TaxIdentity,
    ComplianceScreening,
    SanctionsScreening,
    PepScreening,
    AgeEligibility,
    CompositeDecision,
}

pub(crate) const BRIEF: &[StepKind] = &[
    StepKind::BiometricMatch,
    StepKind::DocumentVerification,
    StepKind::ComplianceScreening,
];

pub(crate) const STANDARD: &[StepKind] = &[
    StepKind::BiometricMatch,
    StepKind::DocumentVerification,
    StepKind::SanctionsScreening,
    StepKind::AgeEligibility,
    StepKind::CompositeDecision,
];

pub(crate) const DETAILED: &[StepKind] = &[
    StepKind::FaceMatch,
    StepKind::Liveness,
    StepKind::DocumentAuthenticity,
    StepKind::MrzConsistency,
    StepKind::TaxIdentity,
    StepKind::SanctionsScreening,
    StepKind::PepScreening,
    StepKind::AgeEligibility,
    StepKind::CompositeDecision,
];

/// Typed inputs available to every template. Sensitive values are already either the raw
/// value or the redaction marker, so templates never decide on disclosure themselves.
pub(crate) struct NarrativeContext<'a> {
    pub name: &'a str,
    pub age: u32,
    pub country: &'a str,
    pub account_type: &'a str,
    pub minimum_age: u32,
    pub score: &'a ScoreResult,
    pub national_tax_id: Option<&'a str>,
    pub passport_number: Option<&'a str>,
}

pub(crate) struct StepDraft {
    pub label: &'static str,
    pub input_summary: BTreeMap<String, Value>,
    pub narrative: String,
    pub sub_score: u8,
    pub outcome_summary: String,
    pub sensitive_fields: Vec<SensitiveField>,
}

impl StepDraft {
    fn new(label: &'static str, sub_score: u8) -> Self {
        Self {
            label,
            input_summary: BTreeMap::new(),
            narrative: String::new(),
            sub_score,
            outcome_summary: String::new(),
            sensitive_fields: Vec::new(),
        }
    }

    fn input(mut self, key: &str, value: Value) -> Self {
        self.input_summary.insert(key.to_string(), value);
        self
    }

    fn sensitive(mut self, field: SensitiveField, value: &str) -> Self {
        self.input_summary
            .insert(field.key().to_string(), Value::String(value.to_string()));
        self.sensitive_fields.push(field);
        self
    }

    fn narrate(mut self, narrative: String, outcome: String) -> Self {
        self.narrative = narrative;
        self.outcome_summary = outcome;
        self
    }
}

pub(crate) fn render(kind: StepKind, ctx: &NarrativeContext<'_>) -> StepDraft {
    let bio = ctx.score.sub_score(ScoreFactor::Biometric);
    let doc = ctx.score.sub_score(ScoreFactor::Document);
    let age_score = ctx.score.sub_score(ScoreFactor::Age);
    let compliance = ctx.score.sub_score(ScoreFactor::Compliance);

    match kind {
        StepKind::BiometricMatch => StepDraft::new("Biometric analysis", bio)
            .input("subject", json!(ctx.name))
            .input("checks", json!(["face_match", "liveness"]))
            .narrate(
                format!(
                    "Selfie of {} compared with the document portrait: {bio}% face match, \
                     liveness confirmed and no deepfake artefacts flagged.",
                    ctx.name
                ),
                format!("Match {bio}%, liveness OK"),
            ),
        StepKind::FaceMatch => StepDraft::new("Face match", bio)
            .input("subject", json!(ctx.name))
            .input("reference", json!("document_portrait"))
            .narrate(
                format!(
                    "Facial landmarks extracted from the selfie of {} align with the document \
                     portrait at {bio}% similarity.",
                    ctx.name
                ),
                format!("Match {bio}%"),
            ),
        StepKind::Liveness => StepDraft::new("Liveness detection", bio)
            .input("subject", json!(ctx.name))
            .input("challenge", json!("blink_and_turn"))
            .narrate(
                format!(
                    "Challenge-response liveness sequence completed for {}; no replay or \
                     synthetic media signals recorded.",
                    ctx.name
                ),
                "Liveness OK".to_string(),
            ),
        StepKind::DocumentVerification => {
            let mut draft = StepDraft::new("Document verification", doc)
                .input("issuing_country", json!(ctx.country));
            let mut narrative = format!(
                "Identity document issued in {} accepted as valid with intact security features",
                ctx.country
            );
            if let Some(passport) = ctx.passport_number {
                narrative.push_str(&format!("; passport number {passport} read from the page"));
                draft = draft.sensitive(SensitiveField::PassportNumber, passport);
            }
            if let Some(tax_id) = ctx.national_tax_id {
                narrative.push_str(&format!(
                    "; national tax id {tax_id} matches the fiscal declaration"
                ));
                draft = draft.sensitive(SensitiveField::NationalTaxId, tax_id);
            }
            narrative.push('.');
            draft.narrate(narrative, format!("Valid {} document", ctx.country))
        }
        StepKind::DocumentAuthenticity => StepDraft::new("Document authenticity", doc)
            .input("issuing_country", json!(ctx.country))
            .input("features", json!(["hologram", "microprint", "uv_pattern"]))
            .narrate(
                format!(
                    "Hologram, microprint and UV pattern checks on the {} document scored \
                     {doc}% against the issuer template.",
                    ctx.country
                ),
                format!("Authentic {} document", ctx.country),
            ),
        StepKind::MrzConsistency => {
            let mut draft = StepDraft::new("MRZ consistency", doc)
                .input("holder", json!(ctx.name))
                .input("age", json!(ctx.age));
            let mut narrative = format!(
                "Machine-readable zone agrees with the visual zone: holder {}, age {}",
                ctx.name, ctx.age
            );
            if let Some(passport) = ctx.passport_number {
                narrative.push_str(&format!(", document number {passport}"));
                draft = draft.sensitive(SensitiveField::PassportNumber, passport);
            }
            narrative.push_str(". Check digits valid.");
            draft.narrate(narrative, "MRZ consistent".to_string())
        }
        StepKind::TaxIdentity => {
            let draft = StepDraft::new("Tax identity cross-check", doc)
                .input("subject", json!(ctx.name));
            match ctx.national_tax_id {
                Some(tax_id) => draft
                    .sensitive(SensitiveField::NationalTaxId, tax_id)
                    .narrate(
                        format!(
                            "National tax id {tax_id} cross-checked against the declared \
                             identity of {}.",
                            ctx.name
                        ),
                        "Tax identity consistent".to_string(),
                    ),
                None => draft.narrate(
                    format!(
                        "No national tax id supplied; fiscal cross-check skipped for {}.",
                        ctx.name
                    ),
                    "Tax id not supplied".to_string(),
                ),
            }
        }
        StepKind::ComplianceScreening => StepDraft::new("Compliance risk", compliance)
            .input("country", json!(ctx.country))
            .input("age", json!(ctx.age))
            .input("lists", json!(["OFAC", "PEP"]))
            .narrate(
                format!(
                    "No OFAC or PEP hits for {}. Age {} meets the {}+ requirement and {} \
                     carries no jurisdiction restriction.",
                    ctx.name, ctx.age, ctx.minimum_age, ctx.country
                ),
                format!("No OFAC hits, age {} >= {}", ctx.age, ctx.minimum_age),
            ),
        StepKind::SanctionsScreening => StepDraft::new("Sanctions screening", compliance)
            .input("subject", json!(ctx.name))
            .input("country", json!(ctx.country))
            .input("lists", json!(["OFAC SDN", "EU consolidated", "UN"]))
            .narrate(
                format!(
                    "{} screened against OFAC SDN, EU and UN consolidated lists with no \
                     matches; {} carries no jurisdiction restriction.",
                    ctx.name, ctx.country
                ),
                "No sanctions hits".to_string(),
            ),
        StepKind::PepScreening => StepDraft::new("PEP and adverse media", compliance)
            .input("subject", json!(ctx.name))
            .narrate(
                format!(
                    "No politically exposed person records or adverse media found for {}.",
                    ctx.name
                ),
                "No PEP exposure".to_string(),
            ),
        StepKind::AgeEligibility => StepDraft::new("Age eligibility", age_score)
            .input("age", json!(ctx.age))
            .input("minimum_age", json!(ctx.minimum_age))
            .narrate(
                format!(
                    "Declared age {} meets the minimum of {} required for {} accounts.",
                    ctx.age, ctx.minimum_age, ctx.account_type
                ),
                format!("{}y >= {}", ctx.age, ctx.minimum_age),
            ),
        StepKind::CompositeDecision => {
            let badge = ctx.score.badge_label();
            StepDraft::new("Composite decision", ctx.score.score)
                .input("biometric", json!(bio))
                .input("document", json!(doc))
                .input("age", json!(age_score))
                .input("compliance", json!(compliance))
                .narrate(
                    format!(
                        "Biometric {bio}, document {doc}, age {age_score} and compliance \
                         {compliance} sub-scores combine to {}; {badge} granted.",
                        ctx.score.score
                    ),
                    format!("Approved: {badge}"),
                )
        }
    }
}
