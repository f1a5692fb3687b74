//! Error types for forms.

use std::collections::HashMap;

use oxide_bind_http::{HttpError, Method};
use thiserror::Error;

/// Errors that abort handling of an input.
///
/// These signal misuse of the API or a broken transport, never bad user
/// input. Bad user input ends up in [`ValidationErrors`] on the bound form.
#[derive(Debug, Error)]
pub enum FormError {
    /// The request method carries no form data.
    #[error("cannot handle request method: {0}")]
    UnsupportedMethod(Method),

    /// The input is neither empty, a request, nor a key/value map.
    #[error("cannot handle type: {0}")]
    UnsupportedInput(&'static str),

    /// Reading or decoding the request failed.
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// A single failed check on a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable identifier for programmatic branching.
    pub code: String,
    /// Human-readable default message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation error messages by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Errors keyed by field name.
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Adds an error for a field, creating its list if absent.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Replaces the errors for a field.
    pub fn set(&mut self, field: &str, messages: Vec<String>) {
        self.errors.insert(field.to_string(), messages);
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Returns whether a field has errors.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Removes every error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Returns all errors as a flat list.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| (field.as_str(), msg.as_str()))
            })
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, messages) in &self.errors {
            for message in messages {
                writeln!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}
