use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, Method},
    routing::post,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use super::response::KycResponse;
use super::service::KycService;

pub const PROCESS_KYC_PATH: &str = "/process-kyc";
pub const LEGACY_PROCESS_KYC_PATH: &str = "/api/process_kyc";
/// Largest request body buffered by the intake endpoint.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Router exposing the KYC intake endpoint with permissive CORS.
pub fn kyc_router(service: Arc<KycService>) -> Router {
    Router::new()
        .route(PROCESS_KYC_PATH, post(process_kyc_handler))
        .route(LEGACY_PROCESS_KYC_PATH, post(process_kyc_handler))
        .with_state(service)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer())
}

/// Answers preflight requests and stamps `Access-Control-Allow-Origin: *` on every response.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// The body is taken raw, and its rejection kept, so malformed JSON and oversized or unreadable
/// bodies all map onto the 500 error shape instead of axum's plain-text rejections.
pub(crate) async fn process_kyc_handler(
    State(service): State<Arc<KycService>>,
    body: Result<Bytes, BytesRejection>,
) -> KycResponse {
    match body {
        Ok(body) => KycResponse::from_result(service.process_body(&body).await),
        Err(rejection) => {
            warn!(status = %rejection.status(), "kyc request body rejected");
            KycResponse::Error {
                message: rejection.body_text(),
            }
        }
    }
}
