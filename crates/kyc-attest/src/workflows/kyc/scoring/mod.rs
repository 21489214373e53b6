mod config;
mod policy;
mod rules;

pub use config::{ScoreWeights, ScoringConfig, ScoringMode, SubScores, UnknownScoringMode};
pub use policy::RejectionReason;

use super::domain::KycSubmission;
use serde::{Deserialize, Serialize};

/// Stateless scorer that applies the rubric configuration to a submission.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, submission: &KycSubmission) -> ScoreResult {
        if let Some(reason) = policy::reject_if_ineligible(submission.age, self.config.minimum_age)
        {
            return ScoreResult {
                approved: false,
                score: 0,
                badge: None,
                rejection_reason: Some(reason),
                components: Vec::new(),
            };
        }

        let components = rules::score_components(&self.config);
        let score = rules::composite_score(&self.config, &components);

        ScoreResult {
            approved: true,
            score,
            badge: Some(policy::badge_for(&submission.account_type)),
            rejection_reason: None,
            components,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Biometric,
    Document,
    Age,
    Compliance,
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: u8,
    pub weight: f64,
    pub notes: String,
}

/// Scoring output: the decision, the composite score and the component trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub approved: bool,
    pub score: u8,
    pub badge: Option<String>,
    pub rejection_reason: Option<RejectionReason>,
    pub components: Vec<ScoreComponent>,
}

impl ScoreResult {
    pub fn component(&self, factor: ScoreFactor) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
    }

    /// Sub-score for a factor, falling back to the composite score.
    pub fn sub_score(&self, factor: ScoreFactor) -> u8 {
        self.component(factor)
            .map(|component| component.score)
            .unwrap_or(self.score)
    }

    pub fn badge_label(&self) -> &str {
        self.badge.as_deref().unwrap_or_default()
    }

    /// Risk as published to the attestation: `round((100 - score) / 100, 2)`.
    pub fn risk(&self) -> f64 {
        let risk = f64::from(100 - self.score.min(100)) / 100.0;
        (risk * 100.0).round() / 100.0
    }

    pub fn confidence(&self) -> f64 {
        f64::from(self.score.min(100)) / 100.0
    }
}
