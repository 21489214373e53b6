use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the approval score is produced for eligible applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Every approved applicant receives `ScoringConfig::fixed_score`.
    Fixed,
    /// Weighted composite of the four simulated sub-scores.
    Weighted,
}

impl FromStr for ScoringMode {
    type Err = UnknownScoringMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "weighted" | "composite" => Ok(Self::Weighted),
            _ => Err(UnknownScoringMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScoringMode(pub String);

impl fmt::Display for UnknownScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scoring mode '{}' (expected fixed or weighted)", self.0)
    }
}

impl std::error::Error for UnknownScoringMode {}

/// Simulated sub-scores. None of these are measured; they are placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub biometric: u8,
    pub document: u8,
    pub age: u8,
    pub compliance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub biometric: f64,
    pub document: f64,
    pub age: f64,
    pub compliance: f64,
}

/// Rubric configuration for the scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub mode: ScoringMode,
    pub minimum_age: u32,
    pub fixed_score: u8,
    pub sub_scores: SubScores,
    pub weights: ScoreWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mode: ScoringMode::Fixed,
            minimum_age: 18,
            fixed_score: 92,
            sub_scores: SubScores {
                biometric: 98,
                document: 95,
                age: 100,
                compliance: 97,
            },
            weights: ScoreWeights {
                biometric: 0.35,
                document: 0.25,
                age: 0.15,
                compliance: 0.25,
            },
        }
    }
}

impl ScoringConfig {
    pub fn with_mode(mode: ScoringMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
