//! Bound forms and the clean pipeline.

use std::sync::Arc;

use futures::future::join_all;
use oxide_bind_http::FormData;
use serde_json::Value;
use tracing::debug;

use crate::error::ValidationErrors;
use crate::fields::BoundField;
use crate::form::FormValidator;

/// A form populated with input data.
///
/// Created by [`Form::bind`](crate::Form::bind). Validity is unknown
/// (`None`) until [`clean`](BoundForm::clean) has run, and known afterwards.
pub struct BoundForm {
    fields: Vec<(String, Box<dyn BoundField>)>,
    validator: Option<Arc<dyn FormValidator>>,
    data: FormData,
    field_errors: ValidationErrors,
    errors: Vec<String>,
    valid: Option<bool>,
}

impl std::fmt::Debug for BoundForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundForm")
            .field("data", &self.data)
            .field("field_errors", &self.field_errors)
            .field("errors", &self.errors)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

impl BoundForm {
    pub(crate) fn new(
        fields: Vec<(String, Box<dyn BoundField>)>,
        validator: Option<Arc<dyn FormValidator>>,
    ) -> Self {
        Self {
            fields,
            validator,
            data: FormData::new(),
            field_errors: ValidationErrors::new(),
            errors: Vec::new(),
            valid: None,
        }
    }

    /// Cleans every field, then runs the whole-form validator.
    ///
    /// All fields are cleaned concurrently. Once every one of them has
    /// finished, cleaned values are in [`data`](Self::data) and failures in
    /// [`field_errors`](Self::field_errors). The whole-form validator runs
    /// only when no field failed. Previous results are discarded first, so
    /// cleaning twice yields the same state.
    pub async fn clean(&mut self) {
        self.data.clear();
        self.field_errors.clear();
        self.errors.clear();
        self.valid = None;

        let results = join_all(
            self.fields
                .iter()
                .map(|(name, field)| async move { (name.as_str(), field.clean().await) }),
        )
        .await;

        for (name, result) in results {
            match result {
                Ok(value) => {
                    self.data.insert(name.to_string(), value);
                }
                Err(errors) => {
                    debug!(field = name, errors = errors.len(), "field failed validation");
                    let messages = errors.into_iter().map(|e| e.message).collect();
                    self.field_errors.set(name, messages);
                }
            }
        }

        let mut valid = self.field_errors.is_empty();

        if valid {
            if let Some(validator) = self.validator.clone() {
                if let Err(issue) = validator.validate(self).await {
                    debug!(%issue, "form failed validation");
                    match issue.field {
                        Some(field) => self.field_errors.add(&field, issue.message),
                        None => self.errors.push(issue.message),
                    }
                    valid = false;
                }
            }
        }

        self.valid = Some(valid);
    }

    /// Returns `None` before [`clean`](Self::clean), the outcome after.
    pub fn is_valid(&self) -> Option<bool> {
        self.valid
    }

    /// Returns the cleaned values of fields that passed.
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Returns the cleaned value of one field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Returns error messages by field name.
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// Returns errors that belong to no single field.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns a bound field by name.
    pub fn field(&self, name: &str) -> Option<&dyn BoundField> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field.as_ref())
    }

    /// Returns the raw value bound to a field.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(|field| field.raw())
    }

    /// Returns the bound field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::fields::{NumberField, StringField};
    use crate::form::{Form, FormIssue};
    use crate::validators::{MaxLengthValidator, MinValidator};
    use crate::BoundForm;
    use serde_json::json;

    fn data(value: serde_json::Value) -> oxide_bind_http::FormData {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_clean_valid() {
        let form = Form::builder()
            .field("name", StringField::new().validator(MaxLengthValidator::new(3)))
            .field("age", NumberField::new().validator(MinValidator::new(5)))
            .build();

        let mut bound = form.bind(&data(json!({"name": "abc", "age": "6"})));
        bound.clean().await;

        assert_eq!(bound.is_valid(), Some(true));
        assert_eq!(bound.value("name"), Some(&json!("abc")));
        assert_eq!(bound.value("age"), Some(&json!(6)));
        assert!(bound.field_errors().is_empty());
    }

    #[tokio::test]
    async fn test_clean_collects_field_errors() {
        let form = Form::builder()
            .field("name", StringField::new().validator(MaxLengthValidator::new(3)))
            .field("age", NumberField::new().validator(MinValidator::new(5)))
            .build();

        let mut bound = form.bind(&data(json!({"name": "abcd", "age": 6})));
        bound.clean().await;

        assert_eq!(bound.is_valid(), Some(false));
        assert_eq!(
            bound.field_errors().get("name"),
            Some(&vec!["ensure this value has no more than 3 characters".to_string()])
        );
        assert!(!bound.field_errors().contains("age"));
        assert_eq!(bound.value("age"), Some(&json!(6)));
        assert!(bound.value("name").is_none());
    }

    #[tokio::test]
    async fn test_form_validator_skipped_on_field_errors() {
        let form = Form::builder()
            .field("age", NumberField::new().required())
            .validate(|_: &BoundForm| -> Result<(), FormIssue> {
                panic!("must not run when a field failed")
            })
            .build();

        let mut bound = form.bind(&data(json!({})));
        bound.clean().await;

        assert_eq!(bound.is_valid(), Some(false));
        assert!(bound.errors().is_empty());
    }

    #[tokio::test]
    async fn test_form_validator_global_error() {
        let form = Form::builder()
            .field("a", StringField::new())
            .validate(|_: &BoundForm| -> Result<(), FormIssue> {
                Err(FormIssue::form("rejected"))
            })
            .build();

        let mut bound = form.bind(&data(json!({"a": "x"})));
        bound.clean().await;

        assert_eq!(bound.is_valid(), Some(false));
        assert_eq!(bound.errors(), ["rejected".to_string()]);
        assert!(bound.field_errors().is_empty());
        assert_eq!(bound.value("a"), Some(&json!("x")));
    }
}
