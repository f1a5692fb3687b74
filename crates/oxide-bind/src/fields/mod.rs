//! Form field definitions.
//!
//! A field is reached only through two capabilities: [`Field::bind`] attaches
//! a raw input value, and [`BoundField::clean`] turns it into a cleaned value
//! or the list of validation errors it produced. Field kinds are independent
//! types implementing [`Field`]; custom kinds implement it the same way.

mod checkbox;
mod number;
mod select;
mod text;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;
use crate::validators::Validator;

pub use checkbox::BooleanField;
pub use number::NumberField;
pub use select::ChoiceField;
pub use text::{char_field, email_field, password_field, url_field, StringField};

/// A boxed future for async cleaning.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The cleaned value, or every error the value produced in order.
pub type CleanResult = Result<Value, Vec<ValidationError>>;

/// A field specification inside a form definition.
pub trait Field: Send + Sync {
    /// Attaches a raw value; `None` when the input had no such key.
    fn bind(&self, raw: Option<Value>) -> Box<dyn BoundField>;
}

/// A field holding a raw value, ready to be cleaned.
pub trait BoundField: Send + Sync {
    /// Returns the raw value as it was bound.
    fn raw(&self) -> Option<&Value>;

    /// Validates and normalizes the raw value.
    fn clean(&self) -> BoxFuture<'_, CleanResult>;
}

/// Settings shared by the built-in field kinds.
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// Whether an empty value is an error.
    pub required: bool,
    /// Validators, run in order on the converted value.
    pub validators: Vec<Arc<dyn Validator>>,
}

impl std::fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOptions")
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl FieldOptions {
    /// Runs every validator and collects all failures.
    pub fn run_validators(&self, value: &Value) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .validators
            .iter()
            .filter_map(|v| v.validate(value).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Result of cleaning an empty value.
    fn empty(&self, empty: Value) -> CleanResult {
        if self.required {
            Err(vec![required_error()])
        } else {
            Ok(empty)
        }
    }
}

/// The error reported for a missing required value.
pub fn required_error() -> ValidationError {
    ValidationError::new("required", "this field is required")
}

/// Absent, `null`, `""` and `[]` count as empty.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Repeated keys decode to arrays; single-valued fields keep the last one.
pub(crate) fn last_scalar(value: &Value) -> &Value {
    match value {
        Value::Array(items) => items.last().unwrap_or(&Value::Null),
        other => other,
    }
}

type Convert = Arc<dyn Fn(&Value) -> Result<Value, ValidationError> + Send + Sync>;

/// Bound state shared by the text, number and choice fields.
struct BoundValue {
    raw: Option<Value>,
    options: FieldOptions,
    convert: Convert,
}

impl BoundValue {
    fn boxed(raw: Option<Value>, options: &FieldOptions, convert: Convert) -> Box<dyn BoundField> {
        Box::new(Self {
            raw,
            options: options.clone(),
            convert,
        })
    }
}

impl BoundField for BoundValue {
    fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    fn clean(&self) -> BoxFuture<'_, CleanResult> {
        Box::pin(async move {
            let raw = match &self.raw {
                Some(raw) if !is_empty(Some(raw)) => raw,
                _ => return self.options.empty(Value::Null),
            };

            let value = (self.convert)(raw).map_err(|e| vec![e])?;
            self.options.run_validators(&value)?;
            Ok(value)
        })
    }
}
