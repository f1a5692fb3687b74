//! Form definitions and whole-form validation.

use std::sync::Arc;

use oxide_bind_http::FormData;
use tracing::debug;

use crate::bound::BoundForm;
use crate::config::FormConfig;
use crate::fields::{BoxFuture, Field};

/// An error raised by a whole-form validator.
///
/// Naming a field attaches the message to that field's errors; otherwise
/// it lands in the form's non-field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormIssue {
    /// Field the message belongs to, if any.
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl FormIssue {
    /// An error about the form as a whole.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// An error about one field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FormIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Validation over the cleaned form, run once every field has passed.
///
/// Plain closures `Fn(&BoundForm) -> Result<(), FormIssue>` implement this
/// trait. Implement it by hand when the check has to await something:
///
/// ```ignore
/// struct UniqueUsername { db: Pool }
///
/// impl FormValidator for UniqueUsername {
///     fn validate<'a>(&'a self, form: &'a BoundForm) -> BoxFuture<'a, Result<(), FormIssue>> {
///         Box::pin(async move {
///             let name = form.value("username").and_then(Value::as_str).unwrap_or("");
///             if self.db.user_exists(name).await {
///                 return Err(FormIssue::field("username", "username is taken"));
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait FormValidator: Send + Sync {
    /// Checks the bound form after its fields were cleaned.
    fn validate<'a>(&'a self, form: &'a BoundForm) -> BoxFuture<'a, Result<(), FormIssue>>;
}

impl<F> FormValidator for F
where
    F: Fn(&BoundForm) -> Result<(), FormIssue> + Send + Sync,
{
    fn validate<'a>(&'a self, form: &'a BoundForm) -> BoxFuture<'a, Result<(), FormIssue>> {
        let result = self(form);
        Box::pin(async move { result })
    }
}

/// An immutable form definition.
///
/// A form is created once and bound any number of times; every
/// [`bind`](Form::bind) yields an independent [`BoundForm`]. Share it across
/// tasks with an `Arc`.
pub struct Form {
    fields: Vec<(String, Box<dyn Field>)>,
    validator: Option<Arc<dyn FormValidator>>,
    config: FormConfig,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .field("validator", &self.validator.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Form {
    /// Starts building a form.
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    /// Returns the declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns a field specification by name.
    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field.as_ref())
    }

    /// Returns whether a whole-form validator was supplied.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Returns the form configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Binds input data to every declared field.
    ///
    /// Each field receives the value stored under its name, or `None` when
    /// the key is missing. Keys that match no field are ignored. The bound
    /// form's validity stays unknown until [`BoundForm::clean`] runs.
    pub fn bind(&self, data: &FormData) -> BoundForm {
        let fields = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.bind(data.get(name).cloned())))
            .collect();

        debug!(fields = self.fields.len(), keys = data.len(), "bound form data");
        BoundForm::new(fields, self.validator.clone())
    }
}

/// A builder for form definitions.
#[derive(Default)]
pub struct FormBuilder {
    fields: Vec<(String, Box<dyn Field>)>,
    validator: Option<Arc<dyn FormValidator>>,
    config: FormConfig,
}

impl FormBuilder {
    /// Creates a new form builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A field with the same name is replaced in place.
    #[must_use]
    pub fn field(self, name: impl Into<String>, field: impl Field + 'static) -> Self {
        self.boxed_field(name, Box::new(field))
    }

    /// Adds an already boxed field.
    #[must_use]
    pub fn boxed_field(mut self, name: impl Into<String>, field: Box<dyn Field>) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    /// Sets the whole-form validator.
    #[must_use]
    pub fn validate(mut self, validator: impl FormValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the form definition.
    pub fn build(self) -> Form {
        Form {
            fields: self.fields,
            validator: self.validator,
            config: self.config,
        }
    }
}

/// Creates a form from named fields and an optional whole-form validator.
pub fn create<I, N>(fields: I, validate: Option<Arc<dyn FormValidator>>) -> Form
where
    I: IntoIterator<Item = (N, Box<dyn Field>)>,
    N: Into<String>,
{
    let mut builder = fields
        .into_iter()
        .fold(FormBuilder::new(), |b, (name, field)| b.boxed_field(name, field));
    builder.validator = validate;
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{NumberField, StringField};
    use serde_json::json;

    #[test]
    fn test_form_builder() {
        let form = Form::builder()
            .field("name", StringField::new().required())
            .field("age", NumberField::new())
            .build();

        assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["name", "age"]);
        assert!(form.field("age").is_some());
        assert!(form.field("email").is_none());
        assert!(!form.has_validator());
    }

    #[test]
    fn test_duplicate_field_replaces() {
        let form = Form::builder()
            .field("name", StringField::new())
            .field("age", NumberField::new())
            .field("name", StringField::new().required())
            .build();

        assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_create() {
        let fields: Vec<(&str, Box<dyn Field>)> = vec![
            ("a", Box::new(StringField::new())),
            ("b", Box::new(StringField::new())),
        ];
        let validate: Arc<dyn FormValidator> =
            Arc::new(|_: &BoundForm| -> Result<(), FormIssue> { Err(FormIssue::form("never")) });
        let form = create(fields, Some(validate));

        assert_eq!(form.field_names().count(), 2);
        assert!(form.has_validator());
    }

    #[test]
    fn test_bind_leaves_validity_unknown() {
        let form = Form::builder().field("a", StringField::new()).build();
        let data = json!({"a": "1", "ignored": "x"});
        let bound = form.bind(data.as_object().unwrap());

        assert_eq!(bound.is_valid(), None);
        assert_eq!(bound.raw("a"), Some(&json!("1")));
        assert!(bound.field("ignored").is_none());
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(FormIssue::form("mismatch").to_string(), "mismatch");
        assert_eq!(
            FormIssue::field("confirm", "mismatch").to_string(),
            "confirm: mismatch"
        );
    }
}
