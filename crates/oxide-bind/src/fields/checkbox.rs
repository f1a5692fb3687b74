//! Checkbox field type.

use std::sync::Arc;

use serde_json::Value;

use super::{last_scalar, required_error, BoundField, BoxFuture, CleanResult, Field, FieldOptions};
use crate::error::ValidationError;
use crate::validators::{as_text, Validator};

/// A boolean value, as submitted by a checkbox.
///
/// Browsers omit unchecked boxes entirely, so an absent value cleans to
/// `false`. A required boolean field must be `true`.
#[derive(Debug, Clone, Default)]
pub struct BooleanField {
    options: FieldOptions,
}

impl BooleanField {
    /// Creates an optional boolean field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the box to be checked.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.options.required = true;
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.options.validators.push(Arc::new(validator));
        self
    }
}

impl Field for BooleanField {
    fn bind(&self, raw: Option<Value>) -> Box<dyn BoundField> {
        Box::new(BoundBoolean {
            raw,
            options: self.options.clone(),
        })
    }
}

struct BoundBoolean {
    raw: Option<Value>,
    options: FieldOptions,
}

fn to_bool(raw: &Value) -> Result<bool, ValidationError> {
    match last_scalar(raw) {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        other => match as_text(other).map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("true" | "on" | "yes" | "1") => Ok(true),
            Some("false" | "off" | "no" | "0" | "") => Ok(false),
            _ => Err(ValidationError::new("invalid", "enter a valid boolean")),
        },
    }
}

impl BoundField for BoundBoolean {
    fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    fn clean(&self) -> BoxFuture<'_, CleanResult> {
        Box::pin(async move {
            let checked = match &self.raw {
                Some(raw) => to_bool(raw).map_err(|e| vec![e])?,
                None => false,
            };

            if self.options.required && !checked {
                return Err(vec![required_error()]);
            }

            let value = Value::Bool(checked);
            self.options.run_validators(&value)?;
            Ok(value)
        })
    }
}
