use super::domain::{AgeInput, KycRequest, KycSubmission, DEFAULT_ACCOUNT_TYPE};

/// Validation errors raised while turning a request body into a submission.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("age must be a non-negative integer (found {0})")]
    InvalidAge(String),
}

/// Guard responsible for producing `KycSubmission` instances.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Decode a raw request body.
    pub fn decode(&self, body: &[u8]) -> Result<KycRequest, ValidationError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Convert an inbound request into a validated submission.
    pub fn submission_from_request(
        &self,
        request: KycRequest,
    ) -> Result<KycSubmission, ValidationError> {
        let name = required(request.name, "name")?;
        let age = parse_age(request.age.ok_or(ValidationError::MissingField("age"))?)?;
        let country = required(request.country, "country")?;

        let account_type =
            optional(request.account_type).unwrap_or_else(|| DEFAULT_ACCOUNT_TYPE.to_string());

        Ok(KycSubmission {
            name,
            age,
            country,
            email: optional(request.email),
            account_type,
            national_tax_id: optional(request.national_tax_id),
            passport_number: optional(request.passport_number),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    optional(value).ok_or(ValidationError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_age(input: AgeInput) -> Result<u32, ValidationError> {
    match input {
        AgeInput::Integer(value) => {
            u32::try_from(value).map_err(|_| ValidationError::InvalidAge(value.to_string()))
        }
        AgeInput::Decimal(value) if is_whole_age(value) => Ok(value as u32),
        AgeInput::Decimal(value) => Err(ValidationError::InvalidAge(value.to_string())),
        AgeInput::Text(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidAge(format!("'{raw}'"))),
    }
}

/// `25.0` is a whole age; `25.5`, negatives and non-finite values are not.
fn is_whole_age(value: f64) -> bool {
    value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX)
}
