use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::attestation::{AttestationClient, AttestationError};
use super::domain::{KycRequest, KycSubmission};
use super::intake::{IntakeGuard, ValidationError};
use super::payload::{AttestationPayload, PayloadBuilder};
use super::reasoning::{ReasoningAssembler, ReasoningPreview, ReasoningStep, ReasoningTrail};
use super::scoring::{RejectionReason, ScoreResult, ScoringConfig, ScoringEngine};
use crate::config::KycConfig;

/// Service composing intake validation, scoring, reasoning, payload assembly and the
/// attestation collaborator.
pub struct KycService {
    guard: IntakeGuard,
    engine: ScoringEngine,
    assembler: ReasoningAssembler,
    builder: PayloadBuilder,
    client: Arc<dyn AttestationClient>,
    links: AttestationLinks,
}

/// Public URLs advertised for a recorded attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationLinks {
    pub certificate_base_url: String,
    pub dashboard_url: String,
    pub content_gateway_url: String,
}

impl AttestationLinks {
    pub fn certificate_url(&self, attestation_id: &str) -> String {
        format!("{}?hash={attestation_id}", self.certificate_base_url)
    }

    pub fn content_url(&self, content_address: &str) -> String {
        format!(
            "{}/{content_address}",
            self.content_gateway_url.trim_end_matches('/')
        )
    }
}

impl From<&KycConfig> for AttestationLinks {
    fn from(config: &KycConfig) -> Self {
        Self {
            certificate_base_url: config.certificate_base_url.clone(),
            dashboard_url: config.dashboard_url.clone(),
            content_gateway_url: config.content_gateway_url.clone(),
        }
    }
}

/// Pure evaluation of a submission: everything except the collaborator call.
#[derive(Debug, Clone)]
pub struct KycAssessment {
    pub score: ScoreResult,
    pub reasoning: Option<ReasoningTrail>,
    pub public_reasoning: Option<ReasoningTrail>,
    pub payload: Option<AttestationPayload>,
}

/// Terminal outcome of an accepted request.
#[derive(Debug, Clone, PartialEq)]
pub enum KycOutcome {
    Approved(ApprovedKyc),
    Rejected { reason: RejectionReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovedKyc {
    pub score: u8,
    pub badge: String,
    pub attestation_id: String,
    pub tx_hash: String,
    pub certificate_url: String,
    pub dashboard_url: String,
    pub external_id: String,
    #[serde(rename = "ipfs_cid", skip_serializing_if = "Option::is_none")]
    pub content_address: Option<String>,
    #[serde(rename = "ipfs_url", skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    pub reasoning_preview: ReasoningPreview,
    pub reasoning: Vec<ReasoningStep>,
}

/// Error raised while processing a KYC request.
#[derive(Debug, thiserror::Error)]
pub enum KycError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Collaborator(#[from] AttestationError),
}

impl KycService {
    pub fn new(config: &KycConfig, client: Arc<dyn AttestationClient>) -> Self {
        let scoring = ScoringConfig::with_mode(config.scoring_mode);
        let assembler =
            ReasoningAssembler::new(config.verbosity).with_minimum_age(scoring.minimum_age);
        let builder = PayloadBuilder::new(
            config.external_id_prefix.clone(),
            config.document_type.clone(),
            config.origin_label.clone(),
            config.payload_profile,
        );

        Self::with_components(
            ScoringEngine::new(scoring),
            assembler,
            builder,
            client,
            AttestationLinks::from(config),
        )
    }

    pub fn with_components(
        engine: ScoringEngine,
        assembler: ReasoningAssembler,
        builder: PayloadBuilder,
        client: Arc<dyn AttestationClient>,
        links: AttestationLinks,
    ) -> Self {
        Self {
            guard: IntakeGuard,
            engine,
            assembler,
            builder,
            client,
            links,
        }
    }

    /// Score a submission and, when approved, assemble the reasoning and payload.
    pub fn assess(&self, submission: &KycSubmission) -> KycAssessment {
        let score = self.engine.score(submission);
        if !score.approved {
            return KycAssessment {
                score,
                reasoning: None,
                public_reasoning: None,
                payload: None,
            };
        }

        let reasoning = self.assembler.build_reasoning(submission, &score);
        let public_reasoning = self.assembler.build_public_reasoning(submission, &score);
        let payload = self.builder.build_payload(submission, &score, &reasoning);

        KycAssessment {
            score,
            reasoning: Some(reasoning),
            public_reasoning: Some(public_reasoning),
            payload: Some(payload),
        }
    }

    /// Decode a raw request body and process it.
    pub async fn process_body(&self, body: &[u8]) -> Result<KycOutcome, KycError> {
        let request = self.guard.decode(body)?;
        self.process(request).await
    }

    pub async fn process(&self, request: KycRequest) -> Result<KycOutcome, KycError> {
        let submission = self.guard.submission_from_request(request)?;
        info!(
            age = submission.age,
            country = %submission.country,
            account_type = %submission.account_type,
            "kyc submission received"
        );

        let KycAssessment {
            score,
            public_reasoning,
            payload,
            ..
        } = self.assess(&submission);

        let (Some(payload), Some(public_reasoning)) = (payload, public_reasoning) else {
            let reason = score
                .rejection_reason
                .clone()
                .unwrap_or(RejectionReason::Underage {
                    age: submission.age,
                    minimum_age: self.engine.config().minimum_age,
                });
            info!(reason = reason.code(), "kyc submission rejected");
            return Ok(KycOutcome::Rejected { reason });
        };

        let result = self.client.submit(&payload).await.map_err(|err| {
            warn!(external_id = %payload.external_id, error = %err, "attestation failed");
            err
        })?;

        let attestation_id = result.prefixed_attestation_id();
        let tx_hash = result.prefixed_transaction_hash();
        info!(
            external_id = %payload.external_id,
            %attestation_id,
            %tx_hash,
            score = score.score,
            "kyc attestation recorded"
        );

        Ok(KycOutcome::Approved(ApprovedKyc {
            score: score.score,
            badge: payload.badge.clone(),
            certificate_url: self.links.certificate_url(&attestation_id),
            dashboard_url: self.links.dashboard_url.clone(),
            attestation_id,
            tx_hash,
            external_id: payload.external_id,
            content_url: result
                .content_address
                .as_deref()
                .map(|address| self.links.content_url(address)),
            content_address: result.content_address,
            reasoning_preview: public_reasoning.preview(),
            reasoning: public_reasoning.steps,
        }))
    }
}
