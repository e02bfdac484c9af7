//! Travel package form.

use super::{amount_rules, name_rules, return_date_rules};
use crate::error::Result;
use crate::form_fields;
use crate::rules::{FieldRules, ValidationRules};
use crate::schema::FormSchema;

form_fields! {
    /// Fields of the travel package form.
    pub enum TravelPackageField {
        PackageName => "package_name",
        Destination => "destination",
        DepartureDate => "departure_date",
        ReturnDate => "return_date",
        TotalCost => "total_cost",
        MaxTravelers => "max_travelers",
        Itinerary => "itinerary",
        CoverImage => "cover_image",
    }
}

/// Travel package configuration form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelPackageForm;

impl FormSchema for TravelPackageForm {
    type Field = TravelPackageField;
    const NAME: &'static str = "travel-package";

    fn fields() -> &'static [TravelPackageField] {
        TravelPackageField::ALL
    }

    fn rules() -> Result<ValidationRules<TravelPackageField>> {
        use TravelPackageField as F;

        Ok(ValidationRules::new()
            .field(F::PackageName, name_rules())
            .field(F::Destination, FieldRules::new().required().max_length(255))
            .field(F::DepartureDate, FieldRules::new().required())
            .field(F::ReturnDate, return_date_rules(F::DepartureDate))
            .field(F::TotalCost, amount_rules())
            .field(F::MaxTravelers, FieldRules::new().min(1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldValue, Values};

    #[test]
    fn test_travel_package_required_fields() {
        use TravelPackageField as F;

        let mut form = TravelPackageForm::form_state().unwrap();
        assert!(form.is_valid());
        assert!(!form.validate_form());

        let mut failing: Vec<String> = form.errors().iter().map(|(f, _)| f.to_string()).collect();
        failing.sort();
        assert_eq!(
            failing,
            vec!["departure_date", "destination", "package_name", "return_date", "total_cost"]
        );
        assert!(form.is_touched(&F::MaxTravelers));
        assert!(!form.is_touched(&F::Itinerary));
    }

    #[test]
    fn test_travel_package_lists_are_not_validated() {
        use TravelPackageField as F;

        let mut form = TravelPackageForm::form_state().unwrap();
        form.set_values(
            Values::new()
                .with(F::PackageName, "Istanbul Escape")
                .with(F::Destination, "Istanbul")
                .with(F::DepartureDate, "2024-09-01")
                .with(F::ReturnDate, "2024-09-01")
                .with(F::TotalCost, 1200.5)
                .with(F::Itinerary, vec![FieldValue::from("Day 1: Old City")]),
        );
        assert!(form.validate_form(), "unexpected errors: {}", form.errors());
    }
}
