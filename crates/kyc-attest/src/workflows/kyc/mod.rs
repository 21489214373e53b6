//! KYC intake, scoring, reasoning assembly and attestation hand-off.
//!
//! The scoring rule and every narrative are deterministic placeholders: no biometric, document
//! or sanctions analysis runs here. The only side effect is the call to the attestation
//! collaborator, made once per approved request.

pub mod attestation;
pub mod domain;
pub mod intake;
pub mod payload;
pub mod reasoning;
pub mod response;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use attestation::{AttestationClient, AttestationError, AttestationResult, HttpAttestationClient};
pub use domain::{AgeInput, KycRequest, KycSubmission, SensitiveField};
pub use intake::{IntakeGuard, ValidationError};
pub use payload::{AttestationPayload, PayloadBuilder, PayloadProfile};
pub use reasoning::{
    ReasoningAssembler, ReasoningPreview, ReasoningStep, ReasoningTrail, ReasoningVerbosity,
    REDACTION_MARKER,
};
pub use response::KycResponse;
pub use router::{kyc_router, LEGACY_PROCESS_KYC_PATH, MAX_BODY_BYTES, PROCESS_KYC_PATH};
pub use scoring::{
    RejectionReason, ScoreComponent, ScoreFactor, ScoreResult, ScoringConfig, ScoringEngine,
    ScoringMode,
};
pub use service::{
    ApprovedKyc, AttestationLinks, KycAssessment, KycError, KycOutcome, KycService,
};
