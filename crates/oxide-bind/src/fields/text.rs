//! Text field types.

use std::sync::Arc;

use serde_json::Value;

use super::{last_scalar, BoundField, BoundValue, Field, FieldOptions};
use crate::error::ValidationError;
use crate::validators::{
    as_text, EmailValidator, MaxLengthValidator, MinLengthValidator, UrlValidator, Validator,
};

/// A single-line text value.
///
/// Numbers and booleans are accepted in their textual form. When a key was
/// repeated, the last value wins. Objects are rejected with `invalid`.
#[derive(Debug, Clone, Default)]
pub struct StringField {
    options: FieldOptions,
}

impl StringField {
    /// Creates an optional text field with no validators.
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

fn to_string(raw: &Value) -> Result<Value, ValidationError> {
    as_text(last_scalar(raw))
        .map(|text| Value::String(text.into_owned()))
        .ok_or_else(|| ValidationError::new("invalid", "enter a valid value"))
}

impl Field for StringField {
    fn bind(&self, raw: Option<Value>) -> Box<dyn BoundField> {
        BoundValue::boxed(raw, &self.options, Arc::new(to_string))
    }
}

/// Creates a text field with a maximum length.
pub fn char_field(max_length: usize, required: bool) -> StringField {
    let field = StringField::new().validator(MaxLengthValidator::new(max_length));

    if required {
        field.required()
    } else {
        field
    }
}

/// Creates an e-mail field.
pub fn email_field(required: bool) -> StringField {
    let field = StringField::new().validator(EmailValidator::new());

    if required {
        field.required()
    } else {
        field
    }
}

/// Creates a required password field.
pub fn password_field(min_length: Option<usize>) -> StringField {
    let field = StringField::new().required();

    match min_length {
        Some(min) => field.validator(MinLengthValidator::new(min)),
        None => field,
    }
}

/// Creates a URL field.
pub fn url_field(required: bool) -> StringField {
    let field = StringField::new().validator(UrlValidator::new());

    if required {
        field.required()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_clean_string() {
        let field = StringField::new();
        assert_eq!(field.bind(Some(json!("hello"))).clean().await, Ok(json!("hello")));
        assert_eq!(field.bind(Some(json!(42))).clean().await, Ok(json!("42")));
        assert_eq!(field.bind(Some(json!(["a", "b"]))).clean().await, Ok(json!("b")));
    }

    #[tokio::test]
    async fn test_optional_empty_skips_validators() {
        let field = char_field(3, false);
        assert_eq!(field.bind(None).clean().await, Ok(Value::Null));
        assert_eq!(field.bind(Some(json!(""))).clean().await, Ok(Value::Null));
    }

    #[tokio::test]
    async fn test_required_empty() {
        let field = char_field(150, true);
        let errors = field.bind(None).clean().await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "required");
    }

    #[tokio::test]
    async fn test_object_is_invalid() {
        let field = StringField::new();
        let errors = field.bind(Some(json!({"a": 1}))).clean().await.unwrap_err();
        assert_eq!(errors[0].code, "invalid");
    }

    #[tokio::test]
    async fn test_email_field() {
        let field = email_field(true);
        assert!(field.bind(Some(json!("ada@example.com"))).clean().await.is_ok());

        let errors = field.bind(Some(json!("nope"))).clean().await.unwrap_err();
        assert_eq!(errors[0].message, "please enter a valid email address");
    }

    #[tokio::test]
    async fn test_password_field() {
        let field = password_field(Some(8));
        assert!(field.options().required);
        assert_eq!(field.options().validators.len(), 1);

        let errors = field.bind(Some(json!("short"))).clean().await.unwrap_err();
        assert_eq!(errors[0].code, "min_length");
    }

    #[tokio::test]
    async fn test_url_field() {
        let field = url_field(false);
        assert!(field.bind(Some(json!("https://example.com"))).clean().await.is_ok());
        assert!(field.bind(Some(json!("example.com"))).clean().await.is_err());
    }

    #[test]
    fn test_raw_is_kept() {
        let bound = StringField::new().bind(Some(json!("  padded  ")));
        assert_eq!(bound.raw(), Some(&json!("  padded  ")));
    }
}
