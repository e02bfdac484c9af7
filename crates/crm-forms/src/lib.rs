//! # crm-forms
//!
//! Form state and validation for the CRM's lead and package forms.
//!
//! This crate provides:
//! - A [`FormState`] engine holding values, errors and touched fields
//! - Tagged validation [`Rule`]s evaluated in a fixed order
//! - Declared schemas for the lead and product forms
//! - Payload assembly and server error mapping for submissions
//!
//! ## Quick Start
//!
//! ```rust
//! use crm_forms::{FieldRules, FormState, ValidationRules, Values};
//!
//! let rules: ValidationRules = ValidationRules::new()
//!     .field("departure_date", FieldRules::new().required())
//!     .field(
//!         "return_date",
//!         FieldRules::new().required().validate_fn(|value, all| {
//!             let departure = all.get("departure_date").and_then(|d| d.as_str());
//!             match (value.and_then(|v| v.as_str()), departure) {
//!                 (Some(ret), Some(dep)) if ret < dep => {
//!                     Err("Return date must be after departure date".to_string())
//!                 }
//!                 _ => Ok(()),
//!             }
//!         }),
//!     );
//!
//! let initial = Values::new()
//!     .with("departure_date", "2024-05-10")
//!     .with("return_date", "2024-05-01");
//! let mut form = FormState::new(initial, rules);
//!
//! assert!(!form.validate_form());
//! assert_eq!(
//!     form.error("return_date"),
//!     Some("Return date must be after departure date"),
//! );
//!
//! form.set_field_value("return_date", "2024-05-20");
//! assert!(form.validate_form());
//! ```
//!
//! ## Declared Forms
//!
//! ```rust
//! use crm_forms::products::{HajjPackageField, HajjPackageForm};
//! use crm_forms::FormSchema;
//!
//! let mut form = HajjPackageForm::form_state().expect("valid rules");
//! form.set_field_value(HajjPackageField::PackageName, "ab");
//! form.mark_touched(HajjPackageField::PackageName);
//! assert_eq!(
//!     form.error(&HajjPackageField::PackageName),
//!     Some("package_name must be at least 3 characters"),
//! );
//! ```
//!
//! ## Submitting
//!
//! ```rust
//! use crm_forms::products::{LeadField, LeadForm};
//! use crm_forms::submission::prepare_submission;
//! use crm_forms::{FormSchema, StaticSession, TenantId, UserId};
//!
//! let mut form = LeadForm::form_state().expect("valid rules");
//! form.set_field_value(LeadField::FirstName, "Amina");
//! form.set_field_value(LeadField::Email, "amina@example.com");
//! form.set_field_value(LeadField::Phone, "+971501234567");
//! form.set_field_value(LeadField::ServiceType, "travel");
//!
//! let session = StaticSession::new(TenantId(3), UserId(7));
//! let payload = prepare_submission(&mut form, &session).expect("valid lead");
//! assert_eq!(payload.text("tenant_id"), Some("3"));
//! ```

mod error;
pub mod products;
mod rules;
mod schema;
mod session;
mod state;
pub mod submission;
pub mod validation;
mod value;

pub use error::{FieldErrors, FormError, Result, NON_FIELD_ERRORS};
pub use rules::{FieldRules, Rule, ValidationRules};
pub use schema::{FieldKey, FormSchema};
pub use session::{SessionContext, StaticSession, TenantId, UserId};
pub use state::{FormOptions, FormSnapshot, FormState, ValidityMode};
pub use validation::{validate_field, Validator};
pub use value::{FieldValue, FileRef, Values, DATE_FORMAT};

#[doc(hidden)]
pub mod __private {
    pub use serde::{Serialize, Serializer};
}
