use serde::{Deserialize, Serialize};

/// Enumerates rejection reasons surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    Underage { age: u32, minimum_age: u32 },
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::Underage { .. } => "underage",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            RejectionReason::Underage { age, minimum_age } => format!(
                "underage: applicant is {age}, accounts require a minimum age of {minimum_age}"
            ),
        }
    }
}

pub(crate) fn reject_if_ineligible(age: u32, minimum_age: u32) -> Option<RejectionReason> {
    if age < minimum_age {
        Some(RejectionReason::Underage { age, minimum_age })
    } else {
        None
    }
}

pub(crate) fn badge_for(account_type: &str) -> String {
    format!("Verified {}", super::super::domain::title_case(account_type))
}
