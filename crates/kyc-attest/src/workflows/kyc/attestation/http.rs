//! HTTP relay to the attestation gateway.
//!
//! `POST {gateway}/v1/attestations` with the payload and chain options; the gateway signs,
//! submits, optionally archives evidence, and answers
//! `{"attestation_id": ..., "tx_hash": ..., "content_address": ...}`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{AttestationClient, AttestationError, AttestationResult};
use crate::config::{AttestationConfig, StorageCredentials};
use crate::workflows::kyc::payload::AttestationPayload;

const ATTESTATIONS_PATH: &str = "v1/attestations";
const STORAGE_KEY_HEADER: &str = "x-storage-api-key";
const STORAGE_SECRET_HEADER: &str = "x-storage-api-secret";

/// Attestation client backed by `reqwest`. Credentials are checked on each call, so a
/// missing key surfaces on the first approved request rather than at startup.
pub struct HttpAttestationClient {
    http_client: reqwest::Client,
    config: AttestationConfig,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    network: &'a str,
    contracts: Contracts<'a>,
    gas_limit: u64,
    wait_for_confirmation: bool,
    archive: bool,
    payload: &'a AttestationPayload,
}

#[derive(Serialize)]
struct Contracts<'a> {
    identity: Option<&'a str>,
    attestation: Option<&'a str>,
    reputation: Option<&'a str>,
}

impl HttpAttestationClient {
    pub fn from_config(config: &AttestationConfig) -> Result<Self, AttestationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|err| AttestationError::ClientSetup(err.to_string()))?;
        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> Result<String, AttestationError> {
        let gateway = self
            .config
            .gateway_url
            .as_deref()
            .ok_or(AttestationError::MissingCredential("ATTESTATION_GATEWAY_URL"))?;
        Ok(format!(
            "{}/{}",
            gateway.trim_end_matches('/'),
            ATTESTATIONS_PATH
        ))
    }
}

#[async_trait]
impl AttestationClient for HttpAttestationClient {
    async fn submit(
        &self,
        payload: &AttestationPayload,
    ) -> Result<AttestationResult, AttestationError> {
        let signing_key = self
            .config
            .private_key
            .as_deref()
            .ok_or(AttestationError::MissingCredential("ATTESTATION_PRIVATE_KEY"))?;
        let url = self.endpoint()?;

        let body = SubmitRequest {
            network: &self.config.network,
            contracts: Contracts {
                identity: self.config.identity_contract.as_deref(),
                attestation: self.config.attestation_contract.as_deref(),
                reputation: self.config.reputation_contract.as_deref(),
            },
            gas_limit: self.config.gas_limit,
            wait_for_confirmation: self.config.wait_for_confirmation,
            archive: payload.archive_evidence,
            payload,
        };

        let mut request = self
            .http_client
            .post(&url)
            .bearer_auth(signing_key)
            .json(&body);
        if payload.archive_evidence {
            if let Some(StorageCredentials {
                api_key,
                api_secret,
            }) = &self.config.storage
            {
                request = request
                    .header(STORAGE_KEY_HEADER, api_key)
                    .header(STORAGE_SECRET_HEADER, api_secret);
            }
        }

        debug!(external_id = %payload.external_id, %url, "submitting attestation");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AttestationError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                AttestationError::Unreachable(format!("connection failed: {e}"))
            } else {
                AttestationError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AttestationError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<AttestationResult>().await.map_err(|e| {
            AttestationError::InvalidResponse(format!("failed to parse attestation response: {e}"))
        })
    }
}
