use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use validator::{Validate, ValidationError};

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// One message per field, multiple messages joined with `"; "`.
    pub fn to_flat_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(field, messages)| (field.clone(), messages.join("; ")))
            .collect()
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("The field {} is invalid ({})", field, error.code),
                };
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Rejects text made only of whitespace. A length check alone lets `"   "`
/// through.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("The name can't be blank."));
        return Err(error);
    }
    Ok(())
}

/// Run the model's declared constraints.
pub fn validate_model<T: Validate>(model: &T) -> Result<(), FieldErrors> {
    model.validate().map_err(FieldErrors::from)
}
