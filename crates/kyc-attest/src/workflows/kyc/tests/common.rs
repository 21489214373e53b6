use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::KycConfig;
use crate::workflows::kyc::attestation::{AttestationClient, AttestationError, AttestationResult};
use crate::workflows::kyc::domain::{AgeInput, KycRequest, KycSubmission};
use crate::workflows::kyc::payload::AttestationPayload;
use crate::workflows::kyc::service::KycService;

pub(super) const TAX_ID: &str = "123.456.789-09";
pub(super) const PASSPORT: &str = "FX998877";

pub(super) fn submission() -> KycSubmission {
    KycSubmission::new("Ana Silva", 25, "BR")
}

pub(super) fn sensitive_submission() -> KycSubmission {
    let mut submission = submission();
    submission.email = Some("ana@example.com".to_string());
    submission.national_tax_id = Some(TAX_ID.to_string());
    submission.passport_number = Some(PASSPORT.to_string());
    submission
}

pub(super) fn request(name: &str, age: i64, country: &str) -> KycRequest {
    KycRequest {
        name: Some(name.to_string()),
        age: Some(AgeInput::Integer(age)),
        country: Some(country.to_string()),
        ..KycRequest::default()
    }
}

pub(super) fn sensitive_request() -> KycRequest {
    KycRequest {
        national_tax_id: Some(TAX_ID.to_string()),
        passport_number: Some(PASSPORT.to_string()),
        ..request("Ana Silva", 25, "BR")
    }
}

/// Collaborator stub that records every payload it receives.
#[derive(Default, Clone)]
pub(super) struct RecordingClient {
    payloads: Arc<Mutex<Vec<AttestationPayload>>>,
}

impl RecordingClient {
    pub(super) fn payloads(&self) -> Vec<AttestationPayload> {
        self.payloads.lock().expect("client mutex poisoned").clone()
    }

    pub(super) fn calls(&self) -> usize {
        self.payloads.lock().expect("client mutex poisoned").len()
    }
}

#[async_trait]
impl AttestationClient for RecordingClient {
    async fn submit(
        &self,
        payload: &AttestationPayload,
    ) -> Result<AttestationResult, AttestationError> {
        self.payloads
            .lock()
            .expect("client mutex poisoned")
            .push(payload.clone());
        Ok(AttestationResult {
            attestation_id: "a1b2c3".to_string(),
            transaction_hash: "0xfeed".to_string(),
            content_address: None,
        })
    }
}

/// Collaborator stub that always fails as if the network were down.
#[derive(Default, Clone)]
pub(super) struct UnreachableClient {
    calls: Arc<Mutex<usize>>,
}

impl UnreachableClient {
    pub(super) fn calls(&self) -> usize {
        *self.calls.lock().expect("client mutex poisoned")
    }
}

#[async_trait]
impl AttestationClient for UnreachableClient {
    async fn submit(
        &self,
        _payload: &AttestationPayload,
    ) -> Result<AttestationResult, AttestationError> {
        *self.calls.lock().expect("client mutex poisoned") += 1;
        Err(AttestationError::Unreachable(
            "connection failed: simulated network error".to_string(),
        ))
    }
}

pub(super) fn build_service() -> (KycService, RecordingClient) {
    let client = RecordingClient::default();
    let service = KycService::new(&KycConfig::default(), Arc::new(client.clone()));
    (service, client)
}

pub(super) fn build_service_with_config(config: &KycConfig) -> (KycService, RecordingClient) {
    let client = RecordingClient::default();
    let service = KycService::new(config, Arc::new(client.clone()));
    (service, client)
}

pub(super) fn build_unreachable_service() -> (KycService, UnreachableClient) {
    let client = UnreachableClient::default();
    let service = KycService::new(&KycConfig::default(), Arc::new(client.clone()));
    (service, client)
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
