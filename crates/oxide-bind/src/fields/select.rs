//! Choice field type.

use std::sync::Arc;

use serde_json::Value;

use super::{last_scalar, BoundField, BoundValue, Field, FieldOptions};
use crate::error::ValidationError;
use crate::validators::{as_text, Validator};

/// A value restricted to a fixed set of choices.
#[derive(Debug, Clone)]
pub struct ChoiceField {
    choices: Arc<[(String, String)]>,
    options: FieldOptions,
}

impl ChoiceField {
    /// Creates a choice field from `(value, label)` pairs.
    pub fn new<V, L>(choices: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        Self {
            choices: choices
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
            options: FieldOptions::default(),
        }
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

    /// Returns the `(value, label)` pairs.
    pub fn choices(&self) -> &[(String, String)] {
        &self.choices
    }
}

impl Field for ChoiceField {
    fn bind(&self, raw: Option<Value>) -> Box<dyn BoundField> {
        let choices = Arc::clone(&self.choices);
        let convert = move |raw: &Value| {
            as_text(last_scalar(raw))
                .filter(|text| choices.iter().any(|(value, _)| value == text))
                .map(|text| Value::String(text.into_owned()))
                .ok_or_else(|| ValidationError::new("invalid_choice", "select a valid choice"))
        };

        BoundValue::boxed(raw, &self.options, Arc::new(convert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_field() -> ChoiceField {
        ChoiceField::new([("draft", "Draft"), ("published", "Published")])
    }

    #[test]
    fn test_choice_field() {
        let field = status_field().required();
        assert_eq!(field.choices().len(), 2);
        assert_eq!(field.choices()[1].0, "published");
    }

    #[tokio::test]
    async fn test_clean_choice() {
        let field = status_field();
        assert_eq!(
            field.bind(Some(json!("draft"))).clean().await,
            Ok(json!("draft"))
        );

        let errors = field.bind(Some(json!("archived"))).clean().await.unwrap_err();
        assert_eq!(errors[0].code, "invalid_choice");
    }

    #[tokio::test]
    async fn test_required_choice() {
        let field = status_field().required();
        let errors = field.bind(Some(json!(""))).clean().await.unwrap_err();
        assert_eq!(errors[0].code, "required");
    }
}
