//! Hajj package form.

use super::{amount_rules, name_rules, return_date_rules};
use crate::error::Result;
use crate::form_fields;
use crate::rules::{FieldRules, ValidationRules};
use crate::schema::FormSchema;
use crate::value::Values;

form_fields! {
    /// Fields of the Hajj package form.
    pub enum HajjPackageField {
        PackageName => "package_name",
        DepartureDate => "departure_date",
        ReturnDate => "return_date",
        TotalCost => "total_cost",
        SeatsAvailable => "seats_available",
        MakkahHotel => "makkah_hotel",
        MadinahHotel => "madinah_hotel",
        IncludesVisa => "includes_visa",
        Description => "description",
        Brochure => "brochure",
    }
}

/// Hajj package configuration form.
#[derive(Debug, Clone, Copy, Default)]
pub struct HajjPackageForm;

impl FormSchema for HajjPackageForm {
    type Field = HajjPackageField;
    const NAME: &'static str = "hajj-package";

    fn fields() -> &'static [HajjPackageField] {
        HajjPackageField::ALL
    }

    fn rules() -> Result<ValidationRules<HajjPackageField>> {
        use HajjPackageField as F;

        Ok(ValidationRules::new()
            .field(F::PackageName, name_rules())
            .field(F::DepartureDate, FieldRules::new().required())
            .field(F::ReturnDate, return_date_rules(F::DepartureDate))
            .field(F::TotalCost, amount_rules())
            .field(F::SeatsAvailable, FieldRules::new().min(1.0))
            .field(F::MakkahHotel, FieldRules::new().max_length(255))
            .field(F::MadinahHotel, FieldRules::new().max_length(255))
            .field(F::Description, FieldRules::new().max_length(5000)))
    }

    fn initial_values() -> Values<HajjPackageField> {
        Values::new().with(HajjPackageField::IncludesVisa, true)
    }
}
