//! Dispatching raw input to a form.

use oxide_bind_http::{decode_urlencoded, FormData, HttpError, Request, RequestBody};
use serde_json::Value;
use tracing::{debug, warn};

use crate::bound::BoundForm;
use crate::error::{FormError, Result};
use crate::form::Form;

/// Anything a form can be asked to handle.
#[derive(Debug)]
pub enum Input {
    /// No input at all.
    Empty,
    /// An HTTP request whose query or body carries the data.
    Request(Request),
    /// A value; only `null` and objects are accepted.
    Data(Value),
}

impl From<Request> for Input {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<FormData> for Input {
    fn from(data: FormData) -> Self {
        Self::Data(Value::Object(data))
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(input: Option<T>) -> Self {
        input.map_or(Self::Empty, Into::into)
    }
}

/// What handling an input produced.
#[derive(Debug)]
pub enum Outcome {
    /// The input was absent.
    Empty,
    /// The bound form cleaned without errors.
    Success(BoundForm),
    /// The bound form has field or whole-form errors.
    Error(BoundForm),
}

impl Outcome {
    /// Returns the bound form, unless the input was empty.
    pub fn bound(&self) -> Option<&BoundForm> {
        match self {
            Self::Empty => None,
            Self::Success(bound) | Self::Error(bound) => Some(bound),
        }
    }

    /// Consumes the outcome and returns the bound form.
    pub fn into_bound(self) -> Option<BoundForm> {
        match self {
            Self::Empty => None,
            Self::Success(bound) | Self::Error(bound) => Some(bound),
        }
    }

    /// Returns whether the form was valid.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

type Callback<'a, T> = Box<dyn FnOnce(T) + Send + 'a>;

/// Callbacks run by [`Form::handle`].
///
/// `other` receives every outcome whose specific callback is missing.
#[derive(Default)]
pub struct Handlers<'a> {
    empty: Option<Box<dyn FnOnce(&Form) + Send + 'a>>,
    success: Option<Callback<'a, BoundForm>>,
    error: Option<Callback<'a, BoundForm>>,
    other: Option<Callback<'a, Outcome>>,
}

impl<'a> Handlers<'a> {
    /// Creates an empty set of handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs when the input is absent.
    #[must_use]
    pub fn on_empty(mut self, f: impl FnOnce(&Form) + Send + 'a) -> Self {
        self.empty = Some(Box::new(f));
        self
    }

    /// Runs with a valid bound form.
    #[must_use]
    pub fn on_success(mut self, f: impl FnOnce(BoundForm) + Send + 'a) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    /// Runs with an invalid bound form.
    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(BoundForm) + Send + 'a) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Runs when the matching specific callback is missing.
    #[must_use]
    pub fn on_other(mut self, f: impl FnOnce(Outcome) + Send + 'a) -> Self {
        self.other = Some(Box::new(f));
        self
    }

    fn dispatch(self, form: &Form, outcome: Outcome) {
        match outcome {
            Outcome::Empty => match (self.empty, self.other) {
                (Some(empty), _) => empty(form),
                (None, Some(other)) => other(Outcome::Empty),
                (None, None) => debug!("no handler for empty input"),
            },
            Outcome::Success(bound) => match (self.success, self.other) {
                (Some(success), _) => success(bound),
                (None, Some(other)) => other(Outcome::Success(bound)),
                (None, None) => debug!("no handler for valid form"),
            },
            Outcome::Error(bound) => match (self.error, self.other) {
                (Some(error), _) => error(bound),
                (None, Some(other)) => other(Outcome::Error(bound)),
                (None, None) => debug!("no handler for invalid form"),
            },
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Form {
    /// Handles an input and runs the matching callback.
    ///
    /// Unsupported methods, unsupported input types and transport failures
    /// return `Err` before any callback runs.
    pub async fn handle(&self, input: impl Into<Input>, handlers: Handlers<'_>) -> Result<()> {
        let outcome = self.handle_input(input).await?;
        handlers.dispatch(self, outcome);
        Ok(())
    }

    /// Handles an input and returns the outcome.
    ///
    /// - empty input or `null` gives [`Outcome::Empty`];
    /// - a GET request is handled through its decoded query string;
    /// - a POST or PUT request is handled through its pre-parsed body, or
    ///   through its streamed body once fully received;
    /// - an object is bound and cleaned.
    pub async fn handle_input(&self, input: impl Into<Input>) -> Result<Outcome> {
        let value = match input.into() {
            Input::Empty => Value::Null,
            Input::Data(value) => value,
            Input::Request(request) => self.read_request(request).await?,
        };

        match value {
            Value::Null => {
                debug!("handling empty input");
                Ok(Outcome::Empty)
            }
            Value::Object(data) => {
                let mut bound = self.bind(&data);
                bound.clean().await;

                if bound.is_valid() == Some(true) {
                    debug!("form is valid");
                    Ok(Outcome::Success(bound))
                } else {
                    debug!(
                        field_errors = bound.field_errors().len(),
                        errors = bound.errors().len(),
                        "form is invalid"
                    );
                    Ok(Outcome::Error(bound))
                }
            }
            other => Err(FormError::UnsupportedInput(type_name(&other))),
        }
    }

    async fn read_request(&self, mut request: Request) -> Result<Value> {
        if request.method.is_retrieval() {
            debug!(url = %request.url, "reading form data from query string");
            return Ok(Value::Object(request.query()?));
        }

        if !request.method.is_submission() {
            warn!(method = %request.method, "unsupported request method");
            return Err(FormError::UnsupportedMethod(request.method));
        }

        match std::mem::take(&mut request.body) {
            RequestBody::Parsed(body) if !body.is_null() => {
                debug!("using pre-parsed request body");
                return Ok(body);
            }
            body => request.body = body,
        }

        let json = self.config().json_bodies
            && request.content_type().as_deref() == Some("application/json");
        let bytes = request.read_body(self.config().max_body_bytes).await?;
        debug!(bytes = bytes.len(), json, "request body received");

        if json && !bytes.is_empty() {
            serde_json::from_slice(&bytes)
                .map_err(|e| FormError::Http(HttpError::InvalidJson(e)))
        } else if json {
            Ok(Value::Object(FormData::new()))
        } else {
            Ok(Value::Object(decode_urlencoded(&bytes)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::StringField;
    use serde_json::json;

    fn form() -> Form {
        Form::builder()
            .field("a", StringField::new().required())
            .build()
    }

    #[test]
    fn test_input_conversions() {
        assert!(matches!(Input::from(None::<Value>), Input::Empty));
        assert!(matches!(Input::from(Some(json!({}))), Input::Data(_)));
        assert!(matches!(Input::from(Request::get("/")), Input::Request(_)));
    }

    #[tokio::test]
    async fn test_null_is_empty() {
        let outcome = form().handle_input(Value::Null).await.unwrap();
        assert!(matches!(outcome, Outcome::Empty));
        assert!(outcome.bound().is_none());
    }

    #[tokio::test]
    async fn test_unsupported_input() {
        let err = form().handle_input(json!("a=1")).await.unwrap_err();
        assert!(matches!(err, FormError::UnsupportedInput("string")));

        let err = form().handle_input(json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, FormError::UnsupportedInput("array")));
    }

    #[tokio::test]
    async fn test_outcome_accessors() {
        let outcome = form().handle_input(json!({"a": "x"})).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.into_bound().unwrap().value("a"), Some(&json!("x")));
    }

    #[tokio::test]
    async fn test_empty_json_body() {
        let request = Request::post("/").header("Content-Type", "application/json");
        let outcome = form().handle_input(request).await.unwrap();
        let bound = outcome.bound().unwrap();
        assert!(bound.field_errors().contains("a"));
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let request = Request::post("/")
            .header("Content-Type", "application/json")
            .body("{not json");
        let err = form().handle_input(request).await.unwrap_err();
        assert!(matches!(err, FormError::Http(HttpError::InvalidJson(_))));
    }
}
