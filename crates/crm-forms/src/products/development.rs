//! Real-estate development project form.

use super::{amount_rules, name_rules};
use crate::error::Result;
use crate::form_fields;
use crate::rules::{FieldRules, ValidationRules};
use crate::schema::FormSchema;
use crate::validation::UrlValidator;

form_fields! {
    /// Fields of the development project form.
    pub enum DevelopmentProjectField {
        ProjectName => "project_name",
        DeveloperName => "developer_name",
        Location => "location",
        TotalUnits => "total_units",
        StartingPrice => "starting_price",
        CompletionDate => "completion_date",
        Website => "website",
        Amenities => "amenities",
        Brochure => "brochure",
    }
}

/// Development project form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevelopmentProjectForm;

impl FormSchema for DevelopmentProjectForm {
    type Field = DevelopmentProjectField;
    const NAME: &'static str = "development-project";

    fn fields() -> &'static [DevelopmentProjectField] {
        DevelopmentProjectField::ALL
    }

    fn rules() -> Result<ValidationRules<DevelopmentProjectField>> {
        use DevelopmentProjectField as F;

        Ok(ValidationRules::new()
            .field(F::ProjectName, name_rules())
            .field(F::DeveloperName, FieldRules::new().required().max_length(255))
            .field(F::Location, FieldRules::new().required().max_length(255))
            .field(F::TotalUnits, FieldRules::new().required().min(1.0))
            .field(F::StartingPrice, amount_rules())
            .field(F::Website, FieldRules::new().validate(UrlValidator::new())))
    }
}
