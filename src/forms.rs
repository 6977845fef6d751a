//! Form payloads and their validation.
//!
//! Validation returns field errors as data; handlers decide how to render
//! them. Nothing here knows about HTTP.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const HAT_NOT_FOUND_MESSAGE: &str = "Hat not found";

/// Field name -> messages for that field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Ok with the cleaned value, or the errors to show on the form
pub type Validation<T> = Result<T, FormErrors>;

/// Word entry form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddWordsForm {
    #[serde(default)]
    pub words: String,
}

impl AddWordsForm {
    pub fn validate(&self) -> Validation<&str> {
        if self.words.trim().is_empty() {
            return Err(FormErrors::single("words", REQUIRED_MESSAGE));
        }
        Ok(&self.words)
    }
}

/// Join-by-id form on the home page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnterIdForm {
    #[serde(default)]
    pub hat_id: String,
}

impl EnterIdForm {
    /// Field-level check only; whether the hat exists is decided by the store
    pub fn validate(&self) -> Validation<&str> {
        let hat_id = self.hat_id.trim();
        if hat_id.is_empty() {
            return Err(FormErrors::single("hat_id", REQUIRED_MESSAGE));
        }
        Ok(hat_id)
    }
}
