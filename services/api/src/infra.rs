use async_trait::async_trait;
use kyc_attest::workflows::kyc::{
    AttestationClient, AttestationError, AttestationPayload, AttestationResult,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-process stand-in for the attestation gateway used by `--offline` and the demo.
#[derive(Default, Clone)]
pub(crate) struct SimulatedAttestationClient {
    sequence: Arc<AtomicU64>,
    recorded: Arc<Mutex<Vec<String>>>,
}

impl SimulatedAttestationClient {
    pub(crate) fn recorded(&self) -> Vec<String> {
        self.recorded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AttestationClient for SimulatedAttestationClient {
    async fn submit(
        &self,
        payload: &AttestationPayload,
    ) -> Result<AttestationResult, AttestationError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let mut recorded = self
            .recorded
            .lock()
            .map_err(|_| AttestationError::RequestFailed("simulator state poisoned".to_string()))?;
        recorded.push(payload.external_id.clone());

        let content_address = payload
            .archive_evidence
            .then(|| format!("bafysim{sequence:010}"));
        info!(external_id = %payload.external_id, sequence, "simulated attestation recorded");

        Ok(AttestationResult {
            attestation_id: format!("{sequence:064x}"),
            transaction_hash: format!("{:064x}", sequence.wrapping_mul(0x9e37_79b9)),
            content_address,
        })
    }
}
