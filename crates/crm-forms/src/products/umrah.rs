//! Umrah package form.

use super::{amount_rules, name_rules, return_date_rules};
use crate::error::Result;
use crate::form_fields;
use crate::rules::{FieldRules, ValidationRules};
use crate::schema::FormSchema;
use crate::value::Values;

form_fields! {
    /// Fields of the Umrah package form.
    pub enum UmrahPackageField {
        PackageName => "package_name",
        DurationDays => "duration_days",
        DepartureDate => "departure_date",
        ReturnDate => "return_date",
        TotalCost => "total_cost",
        HotelRating => "hotel_rating",
        TransportIncluded => "transport_included",
        Description => "description",
        Brochure => "brochure",
    }
}

/// Umrah package configuration form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UmrahPackageForm;

impl FormSchema for UmrahPackageForm {
    type Field = UmrahPackageField;
    const NAME: &'static str = "umrah-package";

    fn fields() -> &'static [UmrahPackageField] {
        UmrahPackageField::ALL
    }

    fn rules() -> Result<ValidationRules<UmrahPackageField>> {
        use UmrahPackageField as F;

        Ok(ValidationRules::new()
            .field(F::PackageName, name_rules())
            .field(
                F::DurationDays,
                FieldRules::new()
                    .required()
                    .min(1.0)
                    .max(60.0)
                    .range_message("Duration must be between 1 and 60 days"),
            )
            .field(F::DepartureDate, FieldRules::new().required())
            .field(F::ReturnDate, return_date_rules(F::DepartureDate))
            .field(F::TotalCost, amount_rules())
            .field(F::HotelRating, FieldRules::new().min(1.0).max(5.0))
            .field(F::Description, FieldRules::new().max_length(5000)))
    }

    fn initial_values() -> Values<UmrahPackageField> {
        Values::new()
            .with(UmrahPackageField::DurationDays, 14)
            .with(UmrahPackageField::TransportIncluded, true)
    }
}
