use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::ser::Serializer;
use serde::Serialize;
use tracing::error;

use super::service::{ApprovedKyc, KycError, KycOutcome};

const SERIALIZATION_FAILURE_BODY: &str =
    r#"{"success":false,"error":"failed to serialize response"}"#;

/// The three response shapes the endpoint can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum KycResponse {
    Approved(ApprovedKyc),
    Rejected { reason: String, reason_code: &'static str },
    Error { message: String },
}

impl KycResponse {
    pub fn from_result(result: Result<KycOutcome, KycError>) -> Self {
        match result {
            Ok(KycOutcome::Approved(approved)) => Self::Approved(approved),
            Ok(KycOutcome::Rejected { reason }) => Self::Rejected {
                reason: reason.summary(),
                reason_code: reason.code(),
            },
            Err(err) => Self::Error {
                message: err.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            KycResponse::Approved(_) | KycResponse::Rejected { .. } => StatusCode::OK,
            KycResponse::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ApprovedBody<'a> {
    success: bool,
    kyc_approved: bool,
    #[serde(flatten)]
    details: &'a ApprovedKyc,
}

#[derive(Serialize)]
struct RejectedBody<'a> {
    success: bool,
    kyc_approved: bool,
    reason: &'a str,
    reason_code: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

impl Serialize for KycResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KycResponse::Approved(details) => ApprovedBody {
                success: true,
                kyc_approved: true,
                details,
            }
            .serialize(serializer),
            KycResponse::Rejected {
                reason,
                reason_code,
            } => RejectedBody {
                success: true,
                kyc_approved: false,
                reason,
                reason_code,
            }
            .serialize(serializer),
            KycResponse::Error { message } => ErrorBody {
                success: false,
                error: message,
            }
            .serialize(serializer),
        }
    }
}

impl IntoResponse for KycResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match serde_json::to_vec(&self) {
            Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(err) => {
                error!(error = %err, "failed to serialize kyc response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "application/json")],
                    SERIALIZATION_FAILURE_BODY,
                )
                    .into_response()
            }
        }
    }
}
