use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::domain::KycSubmission;
use super::reasoning::{ReasoningStep, ReasoningTrail};
use super::scoring::ScoreResult;

pub const DEFAULT_EXTERNAL_ID_PREFIX: &str = "FUNS-KYC-";
pub const DEFAULT_DOCUMENT_TYPE: &str = "kyc_creator_onboarding";
pub const DEFAULT_ORIGIN_LABEL: &str = "Funs.ai v2.1";

/// Timestamp layout appended to the external id.
const EXTERNAL_ID_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Shape of the metadata the target integration expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadProfile {
    /// Compact reasoning summary embedded in the on-chain metadata.
    #[default]
    OnChain,
    /// Full evidence archived to content-addressed storage; no inline summary.
    Archival,
}

impl FromStr for PayloadProfile {
    type Err = UnknownPayloadProfile;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "on_chain" | "onchain" | "minimal" => Ok(Self::OnChain),
            "archival" | "archive" | "ipfs" => Ok(Self::Archival),
            _ => Err(UnknownPayloadProfile(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPayloadProfile(pub String);

impl fmt::Display for UnknownPayloadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown payload profile '{}' (expected on_chain or archival)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPayloadProfile {}

/// Everything the attestation client needs for one approved submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationPayload {
    pub external_id: String,
    pub subject_name: String,
    pub document_type: String,
    pub origin_label: String,
    pub content: String,
    pub structured_fields: BTreeMap<String, Value>,
    pub reasoning_input: String,
    pub reasoning: Vec<ReasoningStep>,
    pub conclusion: String,
    pub confidence: f64,
    pub final_score: u8,
    pub badge: String,
    pub encrypt_sensitive: bool,
    pub archive_evidence: bool,
}

/// Assembles attestation payloads. Construction is pure apart from [`PayloadBuilder::build_payload`]
/// reading the wall clock.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    external_id_prefix: String,
    document_type: String,
    origin_label: String,
    profile: PayloadProfile,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self {
            external_id_prefix: DEFAULT_EXTERNAL_ID_PREFIX.to_string(),
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            origin_label: DEFAULT_ORIGIN_LABEL.to_string(),
            profile: PayloadProfile::default(),
        }
    }
}

impl PayloadBuilder {
    pub fn new(
        external_id_prefix: impl Into<String>,
        document_type: impl Into<String>,
        origin_label: impl Into<String>,
        profile: PayloadProfile,
    ) -> Self {
        Self {
            external_id_prefix: external_id_prefix.into(),
            document_type: document_type.into(),
            origin_label: origin_label.into(),
            profile,
        }
    }

    pub fn profile(&self) -> PayloadProfile {
        self.profile
    }

    /// `prefix + YYYYMMDDHHMMSS`. Requests landing in the same second share an id.
    pub fn external_id(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}{}",
            self.external_id_prefix,
            now.format(EXTERNAL_ID_TIMESTAMP)
        )
    }

    pub fn build_payload(
        &self,
        submission: &KycSubmission,
        score: &ScoreResult,
        reasoning: &ReasoningTrail,
    ) -> AttestationPayload {
        self.build_at(submission, score, reasoning, Utc::now())
    }

    pub fn build_at(
        &self,
        submission: &KycSubmission,
        score: &ScoreResult,
        reasoning: &ReasoningTrail,
        now: DateTime<Utc>,
    ) -> AttestationPayload {
        let badge = score.badge_label().to_string();

        let mut structured_fields = BTreeMap::new();
        structured_fields.insert("type".to_string(), json!(submission.account_type));
        structured_fields.insert("badge".to_string(), json!(badge));
        structured_fields.insert("risk".to_string(), json!(score.risk()));
        structured_fields.insert("country".to_string(), json!(submission.country));
        structured_fields.insert("age".to_string(), json!(submission.age));
        if self.profile == PayloadProfile::OnChain {
            structured_fields.insert("reasoning".to_string(), json!(reasoning.summary_lines()));
        }

        AttestationPayload {
            external_id: self.external_id(now),
            subject_name: submission.name.clone(),
            document_type: self.document_type.clone(),
            origin_label: self.origin_label.clone(),
            content: format!("KYC approved: {} is {badge}", submission.name),
            structured_fields,
            reasoning_input: reasoning.input.clone(),
            reasoning: reasoning.steps.clone(),
            conclusion: reasoning.conclusion.clone(),
            confidence: reasoning.confidence,
            final_score: score.score,
            badge,
            encrypt_sensitive: reasoning.contains_sensitive_data(),
            archive_evidence: self.profile == PayloadProfile::Archival,
        }
    }
}
