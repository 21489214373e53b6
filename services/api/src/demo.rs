use crate::infra::SimulatedAttestationClient;
use clap::Args;
use kyc_attest::config::{AppConfig, KycConfig};
use kyc_attest::error::AppError;
use kyc_attest::workflows::kyc::{
    AgeInput, IntakeGuard, KycAssessment, KycError, KycRequest, KycResponse, KycService, ReasoningTrail,
    ReasoningVerbosity, ScoringMode,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Applicant full name
    #[arg(long)]
    pub(crate) name: String,
    /// Applicant age in whole years
    #[arg(long)]
    pub(crate) age: u32,
    /// Issuing country code of the applicant's document
    #[arg(long)]
    pub(crate) country: String,
    /// Account tier used for the badge (defaults to creator)
    #[arg(long)]
    pub(crate) account_type: Option<String>,
    /// Reasoning depth: brief, standard, detailed (or 3, 5, 9)
    #[arg(long)]
    pub(crate) verbosity: Option<ReasoningVerbosity>,
    /// Scoring rule: fixed or weighted
    #[arg(long)]
    pub(crate) scoring_mode: Option<ScoringMode>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reasoning depth for the approved submission
    #[arg(long)]
    pub(crate) verbosity: Option<ReasoningVerbosity>,
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    approved: bool,
    score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<&'a ReasoningTrail>,
}

impl<'a> ScoreReport<'a> {
    fn from_assessment(assessment: &'a KycAssessment) -> Self {
        Self {
            approved: assessment.score.approved,
            score: assessment.score.score,
            badge: assessment.score.badge.as_deref(),
            rejection_reason: assessment
                .score
                .rejection_reason
                .as_ref()
                .map(|reason| reason.summary()),
            reasoning: assessment.public_reasoning.as_ref(),
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        name,
        age,
        country,
        account_type,
        verbosity,
        scoring_mode,
    } = args;

    let mut config = AppConfig::load()?.kyc;
    if let Some(verbosity) = verbosity {
        config.verbosity = verbosity;
    }
    if let Some(mode) = scoring_mode {
        config.scoring_mode = mode;
    }

    let submission = IntakeGuard.submission_from_request(KycRequest {
        name: Some(name),
        age: Some(AgeInput::Integer(i64::from(age))),
        country: Some(country),
        account_type,
        ..KycRequest::default()
    })
    .map_err(KycError::from)?;

    let service = offline_service(&config);
    let assessment = service.assess(&submission);
    let report = ScoreReport::from_assessment(&assessment);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?.kyc;
    if let Some(verbosity) = args.verbosity {
        config.verbosity = verbosity;
    }
    let gateway = SimulatedAttestationClient::default();
    let service = KycService::new(&config, Arc::new(gateway.clone()));

    println!("KYC attestation demo (simulated gateway)");
    for (title, body) in demo_requests() {
        let result = service.process_body(body.as_bytes()).await;
        let response = KycResponse::from_result(result);
        println!("\n{title} -> HTTP {}", response.status().as_u16());
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    let recorded = gateway.recorded();
    println!("\nAttestations recorded: {}", recorded.len());
    for external_id in recorded {
        println!("  - {external_id}");
    }
    Ok(())
}

fn offline_service(config: &KycConfig) -> KycService {
    KycService::new(config, Arc::new(SimulatedAttestationClient::default()))
}

fn demo_requests() -> [(&'static str, &'static str); 3] {
    [
        (
            "Approved creator",
            r#"{"name":"Ana Silva","age":25,"country":"BR","email":"ana@example.com","national_tax_id":"123.456.789-09"}"#,
        ),
        (
            "Underage applicant",
            r#"{"name":"John","age":16,"country":"US"}"#,
        ),
        ("Malformed body", r#"{"name":"Broken""#),
    ]
}
