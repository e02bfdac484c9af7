//! Subcommand implementations.
//!
//! Each command dispatches on the form kind to a function generic over
//! the form's schema, and returns a JSON document for printing.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::{json, Value};
use tracing::info;

use crm_forms::products::{
    DevelopmentProjectForm, HajjPackageForm, LeadForm, ProductKind, StudyVisaForm,
    TravelPackageForm, UmrahPackageForm,
};
use crm_forms::submission::build_payload;
use crm_forms::{FormOptions, FormSchema, SessionContext};

macro_rules! with_schema {
    ($kind:expr, $func:ident ( $($arg:expr),* )) => {
        match $kind {
            ProductKind::Lead => $func::<LeadForm>($($arg),*),
            ProductKind::HajjPackage => $func::<HajjPackageForm>($($arg),*),
            ProductKind::UmrahPackage => $func::<UmrahPackageForm>($($arg),*),
            ProductKind::TravelPackage => $func::<TravelPackageForm>($($arg),*),
            ProductKind::DevelopmentProject => $func::<DevelopmentProjectForm>($($arg),*),
            ProductKind::StudyVisa => $func::<StudyVisaForm>($($arg),*),
        }
    };
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Validates a values file and reports the errors.
pub fn validate(kind: ProductKind, path: &Path, strict: bool) -> anyhow::Result<Value> {
    let json = read_json(path)?;
    with_schema!(kind, validate_with(&json, strict))
}

fn validate_with<S: FormSchema>(json: &Value, strict: bool) -> anyhow::Result<Value> {
    let options = if strict {
        FormOptions::new().strict()
    } else {
        FormOptions::new()
    };
    let mut form = S::form_state_with(options)?;
    form.set_values(S::parse_values(json)?);
    form.validate_form();

    let valid = form.is_valid();
    let errors: serde_json::Map<String, Value> = form
        .errors()
        .sorted()
        .into_iter()
        .map(|(name, message)| (name, Value::from(message)))
        .collect();
    info!(form = S::NAME, valid, invalid = errors.len(), "validated");

    Ok(json!({
        "form": S::NAME,
        "valid": valid,
        "errors": errors,
    }))
}

/// Returns the process exit status for a command's output.
///
/// Only a validation report with `"valid": false` fails.
pub fn exit_status(output: &Value) -> u8 {
    u8::from(output.get("valid").and_then(Value::as_bool) == Some(false))
}

/// Lists the fields of a form with their rules.
pub fn fields(kind: ProductKind) -> anyhow::Result<Value> {
    with_schema!(kind, fields_with())
}

fn fields_with<S: FormSchema>() -> anyhow::Result<Value> {
    let rules = S::rules()?;
    let fields: Vec<Value> = S::fields()
        .iter()
        .map(|field| {
            let described: Vec<String> = rules
                .get(field)
                .map(|r| r.iter().map(ToString::to_string).collect())
                .unwrap_or_default();
            json!({ "name": field.to_string(), "rules": described })
        })
        .collect();

    Ok(json!({ "form": S::NAME, "fields": fields }))
}

/// Builds the submission payload for a values file.
///
/// The values are merged over the form's initial values, as a screen
/// loading a stored record would.
pub fn payload(
    kind: ProductKind,
    path: &Path,
    session: &dyn SessionContext,
) -> anyhow::Result<Value> {
    let json = read_json(path)?;
    with_schema!(kind, payload_with(&json, session))
}

fn payload_with<S: FormSchema>(json: &Value, session: &dyn SessionContext) -> anyhow::Result<Value> {
    let mut values = S::initial_values();
    values.merge(S::parse_values(json)?);
    let payload = build_payload(&values, session)?;
    Ok(payload.to_json())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crm_forms::{StaticSession, TenantId, UserId};
    use tempfile::NamedTempFile;

    use super::*;

    fn values_file(json: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn test_validate_reports_errors() {
        let file = values_file(&json!({
            "package_name": "Umrah Plus",
            "departure_date": "2025-03-10",
            "return_date": "2025-03-01",
            "total_cost": -1,
        }));

        let report = validate(ProductKind::UmrahPackage, file.path(), false).unwrap();
        assert_eq!(report["form"], "umrah-package");
        assert_eq!(report["valid"], false);
        assert_eq!(exit_status(&report), 1);
        assert_eq!(
            report["errors"]["return_date"],
            "Return date must be after departure date"
        );
        assert_eq!(report["errors"]["total_cost"], "total_cost must be at least 0");
    }

    #[test]
    fn test_validate_accepts_valid_values() {
        let file = values_file(&json!({
            "country": "Germany",
            "university": "TU Munich",
            "course_name": "MSc Informatics",
            "intake_date": "2025-10-01",
            "tuition_fee": 0,
        }));

        let report = validate(ProductKind::StudyVisa, file.path(), true).unwrap();
        assert_eq!(report["valid"], true);
        assert_eq!(report["errors"], json!({}));
        assert_eq!(exit_status(&report), 0);
    }

    #[test]
    fn test_validate_rejects_unknown_fields() {
        let file = values_file(&json!({"nickname": "Sam"}));
        let err = validate(ProductKind::Lead, file.path(), false).unwrap_err();
        assert!(err.to_string().contains("unknown field: nickname"));
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate(ProductKind::Lead, Path::new("/nonexistent/values.json"), false)
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_fields_lists_rules() {
        let listing = fields(ProductKind::TravelPackage).unwrap();
        let fields = listing["fields"].as_array().unwrap();

        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0]["name"], "package_name");
        assert_eq!(fields[0]["rules"], json!(["required", "length 3..=255"]));
        assert_eq!(fields[3]["rules"], json!(["required", "custom"]));
        assert_eq!(fields[6]["rules"], json!([]));
        assert_eq!(exit_status(&listing), 0);
    }

    #[test]
    fn test_payload_includes_session_and_defaults() {
        let file = values_file(&json!({
            "package_name": "Family Hajj",
            "total_cost": 7000,
        }));
        let session = StaticSession::new(TenantId(5), UserId(8));

        let payload = payload(ProductKind::HajjPackage, file.path(), &session).unwrap();
        assert_eq!(payload["package_name"], "Family Hajj");
        assert_eq!(payload["total_cost"], "7000");
        assert_eq!(payload["includes_visa"], "1");
        assert_eq!(payload["tenant_id"], "5");
        assert_eq!(payload["created_by"], "8");
    }

    #[test]
    fn test_payload_without_tenant() {
        let file = values_file(&json!({"package_name": "Family Hajj"}));
        let err = payload(
            ProductKind::HajjPackage,
            file.path(),
            &StaticSession::anonymous(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no tenant"));
    }
}
