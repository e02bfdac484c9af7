//! Submitting a form: payload assembly and server error mapping.
//!
//! The transport is left to the host. A typical flow is:
//!
//! 1. [`prepare_submission`] validates the form and builds a [`Payload`].
//! 2. The host sends the payload as multipart or JSON.
//! 3. [`interpret_response`] turns the answer into a [`SubmissionOutcome`],
//!    with server-side field errors in the same shape as client ones.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FieldErrors, FormError, Result, NON_FIELD_ERRORS};
use crate::schema::FieldKey;
use crate::session::SessionContext;
use crate::state::FormState;
use crate::value::{FieldValue, FileRef, Values, DATE_FORMAT};

/// Payload field carrying the tenant ID.
pub const TENANT_FIELD: &str = "tenant_id";

/// Payload field carrying the creating user's ID.
pub const CREATED_BY_FIELD: &str = "created_by";

/// One part of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PayloadPart {
    /// Plain text part.
    Text(String),
    /// File part.
    File(FileRef),
}

/// Ordered list of named parts, ready to be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    parts: Vec<(String, PayloadPart)>,
}

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text part.
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts
            .push((name.into(), PayloadPart::Text(value.into())));
    }

    /// Appends a file part.
    pub fn push_file(&mut self, name: impl Into<String>, file: FileRef) {
        self.parts.push((name.into(), PayloadPart::File(file)));
    }

    /// Returns the first part with the given name.
    pub fn get(&self, name: &str) -> Option<&PayloadPart> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, part)| part)
    }

    /// Returns the text of the first text part with the given name.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PayloadPart::Text(text) => Some(text),
            PayloadPart::File(_) => None,
        }
    }

    /// Returns the parts in order.
    pub fn parts(&self) -> &[(String, PayloadPart)] {
        &self.parts
    }

    /// Returns whether any part is a file.
    pub fn has_files(&self) -> bool {
        self.parts
            .iter()
            .any(|(_, part)| matches!(part, PayloadPart::File(_)))
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns whether the payload has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Renders the payload as a JSON object, for JSON-bodied endpoints.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .parts
            .iter()
            .map(|(name, part)| {
                let value = match part {
                    PayloadPart::Text(text) => Value::String(text.clone()),
                    PayloadPart::File(file) => serde_json::json!(file),
                };
                (name.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

fn encode(value: &FieldValue) -> Result<Option<PayloadPart>> {
    let text = match value {
        FieldValue::Null => return Ok(None),
        FieldValue::Text(s) if s.is_empty() => return Ok(None),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        FieldValue::File(file) => return Ok(Some(PayloadPart::File(file.clone()))),
        FieldValue::List(_) | FieldValue::Object(_) => serde_json::to_string(value)?,
    };
    Ok(Some(PayloadPart::Text(text)))
}

/// Builds the submission payload from form values.
///
/// Fields are emitted in name order. Empty values are skipped. The
/// session's tenant and user are appended as `tenant_id` and
/// `created_by`; values stored under those names are dropped so the
/// session always decides them.
///
/// # Errors
///
/// Returns [`FormError::MissingTenant`] or [`FormError::MissingUser`]
/// if the session lacks either, and [`FormError::Json`] if a nested
/// value cannot be encoded.
pub fn build_payload<K, S>(values: &Values<K>, session: &S) -> Result<Payload>
where
    K: FieldKey,
    S: SessionContext + ?Sized,
{
    let tenant = session.tenant_id().ok_or(FormError::MissingTenant)?;
    let user = session.user_id().ok_or(FormError::MissingUser)?;

    let mut fields: Vec<(String, &FieldValue)> = values
        .iter()
        .map(|(name, value)| (name.to_string(), value))
        .filter(|(name, _)| {
            let reserved = name == TENANT_FIELD || name == CREATED_BY_FIELD;
            if reserved {
                debug!(field = %name, "value ignored, set from the session");
            }
            !reserved
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut payload = Payload::new();
    for (name, value) in fields {
        match encode(value)? {
            Some(PayloadPart::Text(text)) => payload.push_text(name, text),
            Some(PayloadPart::File(file)) => payload.push_file(name, file),
            None => {}
        }
    }
    payload.push_text(TENANT_FIELD, tenant.to_string());
    payload.push_text(CREATED_BY_FIELD, user.to_string());
    Ok(payload)
}

/// Validates the whole form and builds its payload.
///
/// # Errors
///
/// Returns [`FormError::Validation`] with the failing fields if the form
/// is invalid; the form state then holds the same errors. Otherwise
/// fails as [`build_payload`] does.
pub fn prepare_submission<K, S>(state: &mut FormState<K>, session: &S) -> Result<Payload>
where
    K: FieldKey,
    S: SessionContext + ?Sized,
{
    if !state.validate_form() {
        return Err(FormError::Validation(state.errors().clone().into_named()));
    }
    let payload = build_payload(state.values(), session)?;
    debug!(parts = payload.len(), files = payload.has_files(), "payload ready");
    Ok(payload)
}

fn first_message(detail: &Value) -> Option<&str> {
    match detail {
        Value::String(message) => Some(message),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }
}

/// Maps a server error body onto field errors.
///
/// Accepted shapes are `{"errors": {field: message-or-list}}`, a bare
/// `{field: message-or-list}` map, and either of those with a top-level
/// `"message"`, which is reported under `__all__`. Only the first
/// message of each field is kept.
///
/// # Errors
///
/// Returns [`FormError::InvalidServerResponse`] if the body is not an
/// object or carries no message at all.
pub fn map_server_errors(body: &Value) -> Result<FieldErrors<String>> {
    let object = body
        .as_object()
        .ok_or_else(|| FormError::InvalidServerResponse(format!("expected an object, got {body}")))?;

    let fields = match object.get("errors") {
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return Err(FormError::InvalidServerResponse(format!(
                "expected `errors` to be an object, got {other}"
            )))
        }
        None => object,
    };

    let mut errors = FieldErrors::new();
    for (field, detail) in fields {
        if field == "message" {
            continue;
        }
        if let Some(message) = first_message(detail) {
            errors.insert(field.clone(), message);
        }
    }
    if let Some(message) = object.get("message").and_then(Value::as_str) {
        errors.insert(NON_FIELD_ERRORS, message);
    }

    if errors.is_empty() {
        return Err(FormError::InvalidServerResponse(
            "no error messages in response".to_string(),
        ));
    }
    Ok(errors)
}

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The server accepted the record; carries the response body.
    Accepted(Value),
    /// The server rejected the record.
    Rejected(FieldErrors<String>),
}

impl SubmissionOutcome {
    /// Returns whether the submission was accepted.
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Interprets a server response to a submission.
///
/// Any 2xx status is an acceptance. Otherwise the body is mapped with
/// [`map_server_errors`]; a body that cannot be mapped yields a single
/// `__all__` error naming the status.
pub fn interpret_response(status: u16, body: &Value) -> SubmissionOutcome {
    if (200..300).contains(&status) {
        return SubmissionOutcome::Accepted(body.clone());
    }

    let errors = map_server_errors(body).unwrap_or_else(|err| {
        debug!(error = %err, "unmapped error response");
        let mut errors = FieldErrors::new();
        errors.insert(
            NON_FIELD_ERRORS,
            format!("Request failed with status {status}"),
        );
        errors
    });
    warn!(status, fields = errors.len(), "submission rejected");
    SubmissionOutcome::Rejected(errors)
}
