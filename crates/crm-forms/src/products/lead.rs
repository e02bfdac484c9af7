//! Lead capture form.

use crate::error::Result;
use crate::form_fields;
use crate::rules::{FieldRules, ValidationRules};
use crate::schema::FormSchema;
use crate::validation::{ChoiceValidator, EmailValidator};
use crate::value::Values;

/// Services a lead can be interested in.
pub const SERVICE_TYPES: &[&str] = &["travel", "immigration", "real_estate"];

const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 \-]{6,19}$";

form_fields! {
    /// Fields of the lead form.
    pub enum LeadField {
        FirstName => "first_name",
        LastName => "last_name",
        Email => "email",
        Phone => "phone",
        ServiceType => "service_type",
        Source => "source",
        Notes => "notes",
    }
}

/// Lead capture form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadForm;

impl FormSchema for LeadForm {
    type Field = LeadField;
    const NAME: &'static str = "lead";

    fn fields() -> &'static [LeadField] {
        LeadField::ALL
    }

    fn rules() -> Result<ValidationRules<LeadField>> {
        use LeadField as F;

        Ok(ValidationRules::new()
            .field(F::FirstName, FieldRules::new().required().max_length(100))
            .field(F::LastName, FieldRules::new().max_length(100))
            .field(
                F::Email,
                FieldRules::new().required().validate(EmailValidator::new()),
            )
            .field(
                F::Phone,
                FieldRules::new()
                    .required()
                    .pattern_with(PHONE_PATTERN, "Enter a valid phone number.")?,
            )
            .field(
                F::ServiceType,
                FieldRules::new()
                    .required_with("Please select a service")
                    .validate(ChoiceValidator::new(SERVICE_TYPES.iter().copied())),
            )
            .field(F::Source, FieldRules::new().max_length(100))
            .field(F::Notes, FieldRules::new().max_length(2000)))
    }

    fn initial_values() -> Values<LeadField> {
        Values::new().with(LeadField::Source, "walk_in")
    }
}
