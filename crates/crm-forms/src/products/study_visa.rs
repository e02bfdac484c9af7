//! Study visa application form.

use super::amount_rules;
use crate::error::Result;
use crate::form_fields;
use crate::rules::{FieldRules, ValidationRules};
use crate::schema::FormSchema;
use crate::validation::NotBeforeField;

form_fields! {
    /// Fields of the study visa form.
    pub enum StudyVisaField {
        Country => "country",
        University => "university",
        CourseName => "course_name",
        IntakeDate => "intake_date",
        ApplicationDeadline => "application_deadline",
        TuitionFee => "tuition_fee",
        IeltsScore => "ielts_score",
    }
}

/// Study visa application form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyVisaForm;

impl FormSchema for StudyVisaForm {
    type Field = StudyVisaField;
    const NAME: &'static str = "study-visa";

    fn fields() -> &'static [StudyVisaField] {
        StudyVisaField::ALL
    }

    fn rules() -> Result<ValidationRules<StudyVisaField>> {
        use StudyVisaField as F;

        Ok(ValidationRules::new()
            .field(F::Country, FieldRules::new().required_with("Please select a country"))
            .field(F::University, FieldRules::new().required().max_length(255))
            .field(F::CourseName, FieldRules::new().required().max_length(255))
            .field(
                F::IntakeDate,
                FieldRules::new().required().validate(NotBeforeField::<F>::new(
                    F::ApplicationDeadline,
                    "Intake date must be after the application deadline",
                )),
            )
            .field(F::TuitionFee, amount_rules::<F>().required_with("Tuition fee is required"))
            .field(F::IeltsScore, FieldRules::new().min(0.0).max(9.0)))
    }
}
