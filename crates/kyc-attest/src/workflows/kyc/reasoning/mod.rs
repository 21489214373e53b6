//! Deterministic narrative renderer for the attestation reasoning trail.
//!
//! Nothing here performs biometric, document or sanctions analysis. Every step is a template
//! filled from the submission and the configured sub-scores, so identical inputs always render
//! identical trails.

mod templates;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::KycSubmission;
use super::scoring::ScoreResult;
use templates::{NarrativeContext, StepKind};

/// Marker substituted for sensitive values in public previews.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Number of narrative steps rendered per trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningVerbosity {
    /// Three steps: biometrics, documents, compliance.
    #[default]
    Brief,
    /// Five steps.
    Standard,
    /// Nine steps.
    Detailed,
}

impl ReasoningVerbosity {
    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    fn steps(&self) -> &'static [StepKind] {
        match self {
            ReasoningVerbosity::Brief => templates::BRIEF,
            ReasoningVerbosity::Standard => templates::STANDARD,
            ReasoningVerbosity::Detailed => templates::DETAILED,
        }
    }
}

impl FromStr for ReasoningVerbosity {
    type Err = UnknownVerbosity;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "brief" | "3" => Ok(Self::Brief),
            "standard" | "5" => Ok(Self::Standard),
            "detailed" | "9" => Ok(Self::Detailed),
            _ => Err(UnknownVerbosity(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerbosity(pub String);

impl fmt::Display for UnknownVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown reasoning verbosity '{}' (expected brief, standard or detailed)",
            self.0
        )
    }
}

impl std::error::Error for UnknownVerbosity {}

/// One labeled step of the reasoning trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub index: u32,
    pub label: String,
    pub input_summary: BTreeMap<String, Value>,
    pub narrative: String,
    pub sub_score: u8,
    pub confidence: f64,
    pub outcome_summary: String,
    pub contains_sensitive_data: bool,
}

/// Ordered reasoning trail handed to the attestation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningTrail {
    pub input: String,
    pub steps: Vec<ReasoningStep>,
    pub conclusion: String,
    pub confidence: f64,
}

impl ReasoningTrail {
    pub fn contains_sensitive_data(&self) -> bool {
        self.steps.iter().any(|step| step.contains_sensitive_data)
    }

    /// Caller-facing digest of the trail.
    pub fn preview(&self) -> ReasoningPreview {
        let total_steps = self.steps.len();
        let encryption_note = if self.contains_sensitive_data() {
            "; sensitive fields are encrypted"
        } else {
            ""
        };
        ReasoningPreview {
            steps_summary: self.summary_lines(),
            total_steps,
            transparency_message: format!(
                "Full {total_steps}-step reasoning is recorded with the attestation{encryption_note}."
            ),
        }
    }

    /// Compact `"<n>. <label>: <outcome>"` lines for on-chain metadata.
    pub fn summary_lines(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|step| format!("{}. {}: {}", step.index, step.label, step.outcome_summary))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPreview {
    pub steps_summary: Vec<String>,
    pub total_steps: usize,
    pub transparency_message: String,
}

#[derive(Debug, Clone, Copy)]
enum Disclosure {
    Private,
    Public,
}

/// Renders reasoning trails at a configured verbosity.
#[derive(Debug, Clone, Default)]
pub struct ReasoningAssembler {
    verbosity: ReasoningVerbosity,
    minimum_age: Option<u32>,
}

impl ReasoningAssembler {
    pub fn new(verbosity: ReasoningVerbosity) -> Self {
        Self {
            verbosity,
            minimum_age: None,
        }
    }

    /// Minimum age quoted in eligibility narratives (defaults to 18).
    pub fn with_minimum_age(mut self, minimum_age: u32) -> Self {
        self.minimum_age = Some(minimum_age);
        self
    }

    pub fn verbosity(&self) -> ReasoningVerbosity {
        self.verbosity
    }

    /// Full trail including sensitive values, for the attestation client only.
    pub fn build_reasoning(&self, submission: &KycSubmission, score: &ScoreResult) -> ReasoningTrail {
        self.render(submission, score, Disclosure::Private)
    }

    /// Same trail with every sensitive value replaced by [`REDACTION_MARKER`].
    pub fn build_public_reasoning(
        &self,
        submission: &KycSubmission,
        score: &ScoreResult,
    ) -> ReasoningTrail {
        self.render(submission, score, Disclosure::Public)
    }

    fn render(
        &self,
        submission: &KycSubmission,
        score: &ScoreResult,
        disclosure: Disclosure,
    ) -> ReasoningTrail {
        let reveal = |value: &Option<String>| -> Option<String> {
            value.as_ref().map(|raw| match disclosure {
                Disclosure::Private => raw.clone(),
                Disclosure::Public => REDACTION_MARKER.to_string(),
            })
        };
        let national_tax_id = reveal(&submission.national_tax_id);
        let passport_number = reveal(&submission.passport_number);

        let ctx = NarrativeContext {
            name: &submission.name,
            age: submission.age,
            country: &submission.country,
            account_type: &submission.account_type,
            minimum_age: self.minimum_age.unwrap_or(18),
            score,
            national_tax_id: national_tax_id.as_deref(),
            passport_number: passport_number.as_deref(),
        };

        let steps = self
            .verbosity
            .steps()
            .iter()
            .enumerate()
            .map(|(position, kind)| {
                let draft = templates::render(*kind, &ctx);
                ReasoningStep {
                    index: position as u32 + 1,
                    label: draft.label.to_string(),
                    input_summary: draft.input_summary,
                    narrative: draft.narrative,
                    sub_score: draft.sub_score,
                    confidence: f64::from(draft.sub_score.min(100)) / 100.0,
                    outcome_summary: draft.outcome_summary,
                    contains_sensitive_data: !draft.sensitive_fields.is_empty(),
                }
            })
            .collect();

        let conclusion = match (&score.badge, &score.rejection_reason) {
            (_, Some(reason)) => format!("Rejected: {}", reason.summary()),
            (Some(badge), None) => format!("Approved. Badge {badge}"),
            (None, None) => "Approved".to_string(),
        };

        ReasoningTrail {
            input: format!(
                "KYC {}, {}y, {}",
                submission.name, submission.age, submission.country
            ),
            steps,
            conclusion,
            confidence: score.confidence(),
        }
    }
}
