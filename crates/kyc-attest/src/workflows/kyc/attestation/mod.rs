mod http;

pub use http::HttpAttestationClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::payload::AttestationPayload;

/// Collaborator that records a verification decision on chain.
///
/// Implementations own retries, confirmation waiting and archival uploads; callers treat the
/// call as a single synchronous step.
#[async_trait]
pub trait AttestationClient: Send + Sync {
    async fn submit(&self, payload: &AttestationPayload)
        -> Result<AttestationResult, AttestationError>;
}

/// Identifiers returned by the collaborator for a recorded attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationResult {
    pub attestation_id: String,
    #[serde(alias = "tx_hash")]
    pub transaction_hash: String,
    #[serde(default, alias = "ipfs_cid")]
    pub content_address: Option<String>,
}

impl AttestationResult {
    pub fn prefixed_attestation_id(&self) -> String {
        with_hex_prefix(&self.attestation_id)
    }

    pub fn prefixed_transaction_hash(&self) -> String {
        with_hex_prefix(&self.transaction_hash)
    }
}

fn with_hex_prefix(value: &str) -> String {
    if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

/// Failure reported by (or while reaching) the attestation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AttestationError {
    #[error("attestation client could not be built: {0}")]
    ClientSetup(String),
    #[error("attestation credential {0} is not configured")]
    MissingCredential(&'static str),
    #[error("attestation service unreachable: {0}")]
    Unreachable(String),
    #[error("attestation request failed: {0}")]
    RequestFailed(String),
    #[error("attestation rejected with HTTP status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid attestation response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_gain_hex_prefix_once() {
        let result = AttestationResult {
            attestation_id: "abc123".to_string(),
            transaction_hash: "0xdef456".to_string(),
            content_address: None,
        };
        assert_eq!(result.prefixed_attestation_id(), "0xabc123");
        assert_eq!(result.prefixed_transaction_hash(), "0xdef456");
    }

    #[test]
    fn result_decodes_gateway_field_names() {
        let result: AttestationResult = serde_json::from_str(
            r#"{"attestation_id":"0x01","tx_hash":"0x02","ipfs_cid":"bafy123"}"#,
        )
        .expect("decodes");
        assert_eq!(result.transaction_hash, "0x02");
        assert_eq!(result.content_address.as_deref(), Some("bafy123"));
    }
}
