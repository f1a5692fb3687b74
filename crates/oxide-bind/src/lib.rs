//! # oxide-bind
//!
//! Form definition, data binding and field validation for request handling.
//!
//! This crate provides:
//! - Validators for numbers, lengths, patterns, e-mail addresses and URLs
//! - Field kinds behind a two-operation [`Field`](fields::Field) trait
//! - Form definitions with an optional whole-form validator
//! - Concurrent field cleaning with a join before whole-form validation
//! - Dispatch of empty input, requests and key/value maps to callbacks
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_bind::fields::{email_field, password_field, StringField};
//! use oxide_bind::validators::LengthRangeValidator;
//! use oxide_bind::{BoundForm, Form, FormIssue};
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let form = Form::builder()
//!     .field(
//!         "username",
//!         StringField::new().required().validator(LengthRangeValidator::new(3, 20)),
//!     )
//!     .field("email", email_field(true))
//!     .field("password", password_field(Some(8)))
//!     .field("confirm", password_field(None))
//!     .validate(|form: &BoundForm| -> Result<(), FormIssue> {
//!         if form.value("password") == form.value("confirm") {
//!             Ok(())
//!         } else {
//!             Err(FormIssue::field("confirm", "passwords do not match"))
//!         }
//!     })
//!     .build();
//!
//! let data = json!({
//!     "username": "ada",
//!     "email": "ada@example.com",
//!     "password": "correct horse",
//!     "confirm": "correct horse",
//! });
//! let mut bound = form.bind(data.as_object().unwrap());
//! assert_eq!(bound.is_valid(), None);
//!
//! bound.clean().await;
//! assert_eq!(bound.is_valid(), Some(true));
//! # });
//! ```
//!
//! ## Handling Requests
//!
//! ```rust
//! use oxide_bind::fields::StringField;
//! use oxide_bind::{Form, Handlers, Request};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let form = Form::builder()
//!     .field("q", StringField::new().required())
//!     .build();
//!
//! let mut found = None;
//! form.handle(
//!     Request::get("/search?q=rust"),
//!     Handlers::new()
//!         .on_success(|bound| found = bound.value("q").cloned())
//!         .on_other(|_| unreachable!()),
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(found, Some(serde_json::json!("rust")));
//! # });
//! ```
//!
//! ## Validators
//!
//! | Validator | Code |
//! |-----------|------|
//! | `MinValidator` | `min_value` |
//! | `MaxValidator` | `max_value` |
//! | `RangeValidator` | `range` |
//! | `MinLengthValidator` | `min_length` |
//! | `MaxLengthValidator` | `max_length` |
//! | `LengthRangeValidator` | `length_range` |
//! | `RegexValidator`, `EmailValidator`, `UrlValidator` | `invalid` |

mod bound;
mod config;
mod error;
pub mod fields;
mod form;
mod handle;
pub mod validators;

pub use bound::BoundForm;
pub use config::{FormConfig, DEFAULT_MAX_BODY_BYTES};
pub use error::{FormError, Result, ValidationError, ValidationErrors};
pub use form::{create, Form, FormBuilder, FormIssue, FormValidator};
pub use handle::{Handlers, Input, Outcome};
pub use oxide_bind_http::{
    decode_query, decode_urlencoded, BodyStream, FormData, HttpError, Method, Request,
    RequestBody,
};
