#![allow(dead_code)]

use crm_forms::{FieldRules, FieldValue, FormState, ValidationRules, Values};

/// Installs a test log writer once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Rules of a travel booking with a cross-field return date check.
pub fn travel_rules() -> ValidationRules {
    ValidationRules::new()
        .field("departure_date", FieldRules::new().required())
        .field(
            "return_date",
            FieldRules::new().required().validate_fn(|value, all| {
                let departure = all.get("departure_date").and_then(FieldValue::as_str);
                match (value.and_then(FieldValue::as_str), departure) {
                    (Some(ret), Some(dep)) if ret < dep => {
                        Err("Return date must be after departure date".to_string())
                    }
                    _ => Ok(()),
                }
            }),
        )
}

/// A form over ad-hoc string keys.
pub fn form(initial: Values, rules: ValidationRules) -> FormState {
    init_tracing();
    FormState::new(initial, rules)
}

/// Sorted names of the fields currently in error.
pub fn failing(form: &FormState) -> Vec<String> {
    form.errors().sorted().into_iter().map(|(name, _)| name).collect()
}
