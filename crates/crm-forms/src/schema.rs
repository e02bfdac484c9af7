//! Declared form schemas.
//!
//! Each form declares its field set as an enum so that field names are
//! checked at build time. The engine itself stays generic over the key
//! type; plain `String` keys work for ad-hoc forms.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{FormError, Result};
use crate::rules::ValidationRules;
use crate::state::{FormOptions, FormState};
use crate::value::{FieldValue, Values};

/// Types usable as field names.
pub trait FieldKey: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> FieldKey for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

/// A form with a declared field set and rules.
pub trait FormSchema {
    /// The field enum of this form.
    type Field: FieldKey + FromStr + 'static;

    /// Wire name of the form.
    const NAME: &'static str;

    /// Returns every field of the form, in display order.
    fn fields() -> &'static [Self::Field];

    /// Returns the validation rules of the form.
    fn rules() -> Result<ValidationRules<Self::Field>>;

    /// Returns the values a fresh form starts with.
    fn initial_values() -> Values<Self::Field> {
        Values::new()
    }

    /// Creates a form state with default options.
    fn form_state() -> Result<FormState<Self::Field>> {
        Self::form_state_with(FormOptions::default())
    }

    /// Creates a form state with the given options.
    fn form_state_with(options: FormOptions) -> Result<FormState<Self::Field>> {
        Ok(FormState::new(Self::initial_values(), Self::rules()?).with_options(options))
    }

    /// Maps a JSON object onto typed values.
    ///
    /// Unknown field names are rejected.
    fn parse_values(json: &serde_json::Value) -> Result<Values<Self::Field>> {
        let object = json.as_object().ok_or_else(|| {
            FormError::InvalidValues(format!("expected a JSON object for {}", Self::NAME))
        })?;

        object
            .iter()
            .map(|(name, raw)| -> Result<(Self::Field, FieldValue)> {
                let field = name
                    .parse::<Self::Field>()
                    .map_err(|_| FormError::UnknownField(name.clone()))?;
                let value: FieldValue = serde_json::from_value(raw.clone())?;
                Ok((field, value))
            })
            .collect()
    }
}

/// Declares a field enum for a form.
///
/// Each variant is paired with its wire name. The generated enum
/// implements `Display`, `FromStr`, `Serialize` and exposes `ALL` and
/// `as_str`.
///
/// ```rust
/// crm_forms::form_fields! {
///     /// Fields of a contact form.
///     pub enum ContactField {
///         Name => "name",
///         Email => "email",
///     }
/// }
///
/// assert_eq!(ContactField::Email.to_string(), "email");
/// assert_eq!("name".parse::<ContactField>().ok(), Some(ContactField::Name));
/// assert_eq!(ContactField::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! form_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every field, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Returns the wire name of the field.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::FormError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err($crate::FormError::UnknownField(other.to_string())),
                }
            }
        }

        impl $crate::__private::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}
