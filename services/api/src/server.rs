use crate::cli::ServeArgs;
use crate::infra::{AppState, SimulatedAttestationClient};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kyc_attest::config::{AppConfig, AttestationConfig};
use kyc_attest::error::AppError;
use kyc_attest::telemetry;
use kyc_attest::workflows::kyc::{AttestationClient, HttpAttestationClient, KycError, KycService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let client = attestation_client(&config.attestation, args.offline)?;
    let kyc_service = Arc::new(KycService::new(&config.kyc, client));

    let app = with_operational_routes(kyc_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        offline = args.offline,
        verbosity = ?config.kyc.verbosity,
        "kyc attestation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn attestation_client(
    config: &AttestationConfig,
    offline: bool,
) -> Result<Arc<dyn AttestationClient>, AppError> {
    if offline {
        warn!("offline mode: attestations are simulated and not recorded on chain");
        return Ok(Arc::new(SimulatedAttestationClient::default()));
    }
    let client = HttpAttestationClient::from_config(config).map_err(KycError::from)?;
    Ok(Arc::new(client))
}
