use super::common::*;
use crate::workflows::kyc::domain::{AgeInput, KycRequest};
use crate::workflows::kyc::intake::{IntakeGuard, ValidationError};

#[test]
fn defaults_account_type_to_creator() {
    let submission = IntakeGuard
        .submission_from_request(request("Ana Silva", 25, "BR"))
        .expect("valid request");

    assert_eq!(submission, super::common::submission());
}

#[test]
fn accepts_numeric_string_age() {
    let request = KycRequest {
        age: Some(AgeInput::Text(" 31 ".to_string())),
        ..request("Ana Silva", 0, "BR")
    };

    let submission = IntakeGuard
        .submission_from_request(request)
        .expect("numeric string accepted");

    assert_eq!(submission.age, 31);
}

#[test]
fn rejects_unparseable_ages() {
    for age in [
        AgeInput::Text("twenty".to_string()),
        AgeInput::Integer(-4),
        AgeInput::Decimal(25.5),
        AgeInput::Decimal(-3.0),
        AgeInput::Decimal(f64::NAN),
    ] {
        let request = KycRequest {
            age: Some(age),
            ..request("Ana Silva", 0, "BR")
        };
        match IntakeGuard.submission_from_request(request) {
            Err(ValidationError::InvalidAge(_)) => {}
            other => panic!("expected invalid age, got {other:?}"),
        }
    }
}

#[test]
fn missing_required_fields_are_reported_by_name() {
    let mut missing_age = request("Ana Silva", 25, "BR");
    missing_age.age = None;
    let mut blank_country = request("Ana Silva", 25, "BR");
    blank_country.country = Some("   ".to_string());
    let mut missing_name = request("Ana Silva", 25, "BR");
    missing_name.name = None;

    for (request, field) in [
        (missing_age, "age"),
        (blank_country, "country"),
        (missing_name, "name"),
    ] {
        match IntakeGuard.submission_from_request(request) {
            Err(ValidationError::MissingField(name)) => assert_eq!(name, field),
            other => panic!("expected missing {field}, got {other:?}"),
        }
    }
}

#[test]
fn keeps_sensitive_fields_for_private_trail() {
    let submission = IntakeGuard
        .submission_from_request(sensitive_request())
        .expect("valid request");

    assert_eq!(submission.national_tax_id.as_deref(), Some(TAX_ID));
    assert_eq!(submission.passport_number.as_deref(), Some(PASSPORT));
    assert!(submission.has_sensitive_fields());
}

#[test]
fn email_is_trimmed_but_not_validated() {
    let request = KycRequest {
        email: Some("  ana  ".to_string()),
        ..request("Ana Silva", 25, "BR")
    };

    let submission = IntakeGuard
        .submission_from_request(request)
        .expect("free-form email accepted");

    assert_eq!(submission.email.as_deref(), Some("ana"));
}

#[test]
fn accepts_whole_decimal_age() {
    let request = KycRequest {
        age: Some(AgeInput::Decimal(25.0)),
        ..request("Ana Silva", 0, "BR")
    };

    let submission = IntakeGuard
        .submission_from_request(request)
        .expect("whole decimal accepted");

    assert_eq!(submission.age, 25);
}

#[test]
fn decode_reports_malformed_json() {
    assert!(matches!(
        IntakeGuard.decode(b"{not json"),
        Err(ValidationError::MalformedBody(_))
    ));

    let decoded = IntakeGuard
        .decode(br#"{"name":"John","age":"16","country":"US","email":"john@example.com"}"#)
        .expect("decodes");
    assert_eq!(decoded.age, Some(AgeInput::Text("16".to_string())));
    assert_eq!(decoded.email.as_deref(), Some("john@example.com"));
}
