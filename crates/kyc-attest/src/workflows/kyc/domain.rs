use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCOUNT_TYPE: &str = "creator";

/// Raw request body accepted by the intake endpoint before validation.
///
/// Every field is optional at this layer so missing values surface as validation errors
/// rather than opaque decoding failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KycRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<AgeInput>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "cpf")]
    pub national_tax_id: Option<String>,
    #[serde(default, alias = "passport")]
    pub passport_number: Option<String>,
}

/// Age as sent by clients: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

/// Validated applicant data driving scoring, reasoning and payload assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycSubmission {
    pub name: String,
    pub age: u32,
    pub country: String,
    pub email: Option<String>,
    pub account_type: String,
    pub national_tax_id: Option<String>,
    pub passport_number: Option<String>,
}

impl KycSubmission {
    pub fn new(name: impl Into<String>, age: u32, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            country: country.into(),
            email: None,
            account_type: DEFAULT_ACCOUNT_TYPE.to_string(),
            national_tax_id: None,
            passport_number: None,
        }
    }

    pub fn has_sensitive_fields(&self) -> bool {
        self.national_tax_id.is_some() || self.passport_number.is_some()
    }
}

/// Fields that must never leave the private reasoning trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveField {
    NationalTaxId,
    PassportNumber,
}

impl SensitiveField {
    pub fn key(&self) -> &'static str {
        match self {
            SensitiveField::NationalTaxId => "national_tax_id",
            SensitiveField::PassportNumber => "passport_number",
        }
    }
}

/// Python-style title casing: the first letter of each alphabetic run is upper-cased and the
/// remaining letters lower-cased.
pub fn title_case(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut previous_alphabetic = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if previous_alphabetic {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            output.push(ch);
            previous_alphabetic = false;
        }
    }
    output
}
