mod common;

use crm_forms::products::{
    HajjPackageField, HajjPackageForm, LeadField, LeadForm, TravelPackageForm,
};
use crm_forms::submission::{
    build_payload, interpret_response, prepare_submission, PayloadPart, SubmissionOutcome,
};
use crm_forms::{
    FileRef, FormError, FormSchema, StaticSession, TenantId, UserId, Values, NON_FIELD_ERRORS,
};
use serde_json::json;

fn session() -> StaticSession {
    StaticSession::new(TenantId(2), UserId(41))
}

#[test]
fn hajj_package_round_trip() {
    use HajjPackageField as F;
    common::init_tracing();

    let mut form = HajjPackageForm::form_state().unwrap();
    form.set_values(
        Values::new()
            .with(F::PackageName, "Economy Hajj")
            .with(F::DepartureDate, "2024-06-10")
            .with(F::ReturnDate, "2024-06-28")
            .with(F::TotalCost, 6200)
            .with(F::SeatsAvailable, 45)
            .with(F::Brochure, FileRef::new("economy.pdf").content_type("application/pdf")),
    );

    let payload = prepare_submission(&mut form, &session()).unwrap();
    assert_eq!(payload.text("package_name"), Some("Economy Hajj"));
    assert_eq!(payload.text("includes_visa"), Some("1"));
    assert_eq!(payload.text("total_cost"), Some("6200"));
    assert_eq!(payload.text("tenant_id"), Some("2"));
    assert_eq!(payload.text("created_by"), Some("41"));
    assert!(payload.has_files());

    let outcome = interpret_response(201, &json!({"id": 88}));
    assert!(outcome.is_accepted());
    form.reset_form();
    assert_eq!(form.values(), &HajjPackageForm::initial_values());
}

#[test]
fn invalid_form_is_not_submitted() {
    common::init_tracing();

    let mut form = HajjPackageForm::form_state().unwrap();
    form.set_field_value(HajjPackageField::PackageName, "Hajj");

    match prepare_submission(&mut form, &session()) {
        Err(FormError::Validation(errors)) => {
            assert_eq!(errors.get("departure_date"), Some("departure_date is required"));
            assert_eq!(errors.get("total_cost"), Some("total_cost is required"));
            assert_eq!(errors.get("package_name"), None);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(form.error(&HajjPackageField::ReturnDate).is_some());
}

#[test]
fn missing_tenant_blocks_submission() {
    let mut form = LeadForm::form_state().unwrap();
    form.set_values(
        LeadForm::parse_values(&json!({
            "first_name": "Omar",
            "email": "omar@example.com",
            "phone": "0501234567",
            "service_type": "real_estate",
        }))
        .unwrap(),
    );

    assert!(matches!(
        prepare_submission(&mut form, &StaticSession::anonymous()),
        Err(FormError::MissingTenant)
    ));
}

#[test]
fn server_errors_use_the_client_shape() {
    let mut form = LeadForm::form_state().unwrap();
    form.set_field_value(LeadField::FirstName, "Omar");
    form.set_field_value(LeadField::Email, "omar@example.com");
    form.set_field_value(LeadField::Phone, "0501234567");
    form.set_field_value(LeadField::ServiceType, "travel");
    assert!(prepare_submission(&mut form, &session()).is_ok());

    let body = json!({
        "message": "The given data was invalid.",
        "errors": {
            "email": ["The email has already been taken."],
            "legacy_ref": "Unknown reference.",
        },
    });
    let errors = match interpret_response(422, &body) {
        SubmissionOutcome::Rejected(errors) => errors,
        SubmissionOutcome::Accepted(body) => panic!("unexpected acceptance: {body}"),
    };
    assert_eq!(errors.get("email"), Some("The email has already been taken."));
    assert!(errors.to_string().contains("email: The email has already been taken."));

    let unplaced = form.apply_server_errors(errors);
    assert_eq!(
        form.visible_error(&LeadField::Email),
        Some("The email has already been taken.")
    );
    assert!(!form.is_valid());
    assert_eq!(unplaced.get(NON_FIELD_ERRORS), Some("The given data was invalid."));
    assert_eq!(unplaced.get("legacy_ref"), Some("Unknown reference."));
    assert_eq!(unplaced.len(), 2);

    form.set_field_value(LeadField::Email, "omar.k@example.com");
    assert_eq!(form.error(&LeadField::Email), None);
}

#[test]
fn list_values_are_sent_as_text() {
    let values = TravelPackageForm::parse_values(&json!({
        "package_name": "Istanbul Explorer",
        "itinerary": ["Day 1: Old City", "Day 2: Bosphorus"],
    }))
    .unwrap();

    let payload = build_payload(&values, &session()).unwrap();
    assert!(!payload.has_files());
    assert_eq!(
        payload.get("itinerary"),
        Some(&PayloadPart::Text(
            r#"["Day 1: Old City","Day 2: Bosphorus"]"#.to_string()
        ))
    );
}
