//! Numeric field type.

use std::sync::Arc;

use serde_json::{Number, Value};

use super::{last_scalar, BoundField, BoundValue, Field, FieldOptions};
use crate::error::ValidationError;
use crate::validators::{as_number, Validator};

/// Largest magnitude below which integral floats are stored as integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A numeric value, from a JSON number or a numeric string.
///
/// Integral values clean to JSON integers, everything else to floats.
#[derive(Debug, Clone, Default)]
pub struct NumberField {
    options: FieldOptions,
}

impl NumberField {
    /// Creates an optional number field with no validators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the field required.
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

    /// Returns the field options.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }
}

fn to_number(raw: &Value) -> Result<Value, ValidationError> {
    let invalid = || ValidationError::new("invalid", "enter a valid number");

    let n = as_number(last_scalar(raw))
        .filter(|n| n.is_finite())
        .ok_or_else(invalid)?;

    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(n as i64));
    }

    Number::from_f64(n).map(Value::Number).ok_or_else(invalid)
}

impl Field for NumberField {
    fn bind(&self, raw: Option<Value>) -> Box<dyn BoundField> {
        BoundValue::boxed(raw, &self.options, Arc::new(to_number))
    }
}
