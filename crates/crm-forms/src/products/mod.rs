//! Lead and product package forms.
//!
//! Each form declares its fields and rules once; screens build their
//! [`FormState`](crate::FormState) from the schema.

mod development;
mod hajj;
mod lead;
mod study_visa;
mod travel;
mod umrah;

pub use development::{DevelopmentProjectField, DevelopmentProjectForm};
pub use hajj::{HajjPackageField, HajjPackageForm};
pub use lead::{LeadField, LeadForm, SERVICE_TYPES};
pub use study_visa::{StudyVisaField, StudyVisaForm};
pub use travel::{TravelPackageField, TravelPackageForm};
pub use umrah::{UmrahPackageField, UmrahPackageForm};

use std::fmt;
use std::str::FromStr;

use crate::error::FormError;
use crate::rules::FieldRules;
use crate::schema::{FieldKey, FormSchema};
use crate::validation::NotBeforeField;

/// Message shown when a return date precedes the departure date.
pub const RETURN_BEFORE_DEPARTURE: &str = "Return date must be after departure date";

/// The forms known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductKind {
    /// Lead capture.
    Lead,
    /// Hajj package.
    HajjPackage,
    /// Umrah package.
    UmrahPackage,
    /// Travel package.
    TravelPackage,
    /// Real-estate development project.
    DevelopmentProject,
    /// Study visa application.
    StudyVisa,
}

impl ProductKind {
    /// Every form, in menu order.
    pub const ALL: &'static [Self] = &[
        Self::Lead,
        Self::HajjPackage,
        Self::UmrahPackage,
        Self::TravelPackage,
        Self::DevelopmentProject,
        Self::StudyVisa,
    ];

    /// Returns the wire name of the form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => LeadForm::NAME,
            Self::HajjPackage => HajjPackageForm::NAME,
            Self::UmrahPackage => UmrahPackageForm::NAME,
            Self::TravelPackage => TravelPackageForm::NAME,
            Self::DevelopmentProject => DevelopmentProjectForm::NAME,
            Self::StudyVisa => StudyVisaForm::NAME,
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormError::UnknownForm(s.to_string()))
    }
}

/// Rules for a package or project name.
pub(crate) fn name_rules<K: FieldKey>() -> FieldRules<K> {
    FieldRules::new().required().min_length(3).max_length(255)
}

/// Rules for a required, non-negative amount.
pub(crate) fn amount_rules<K: FieldKey>() -> FieldRules<K> {
    FieldRules::new().required().min(0.0)
}

/// Rules for a return date that must not precede `departure`.
pub(crate) fn return_date_rules<K: FieldKey + Send + Sync + 'static>(
    departure: K,
) -> FieldRules<K> {
    FieldRules::new()
        .required()
        .validate(NotBeforeField::<K>::new(departure, RETURN_BEFORE_DEPARTURE))
}
