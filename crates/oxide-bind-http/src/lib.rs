//! # oxide-bind-http
//!
//! The request side of form handling.
//!
//! This crate provides:
//! - HTTP methods classified as retrieval or submission
//! - A request type whose body is either pre-parsed or a chunked byte stream
//! - Body accumulation with an optional size limit
//! - `application/x-www-form-urlencoded` decoding of query strings and bodies
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_bind_http::{decode_urlencoded, Method, Request};
//!
//! let request = Request::get("/signup?email=ada%40example.com&tag=a&tag=b");
//! assert!(request.method.is_retrieval());
//!
//! let query = request.query().unwrap();
//! assert_eq!(query["email"], "ada@example.com");
//! assert_eq!(query["tag"], serde_json::json!(["a", "b"]));
//!
//! let body = decode_urlencoded(b"name=Ada+Lovelace");
//! assert_eq!(body["name"], "Ada Lovelace");
//! assert_eq!("put".parse::<Method>().unwrap(), Method::Put);
//! ```

mod decode;
mod error;
mod request;

pub use decode::{decode_query, decode_urlencoded, FormData};
pub use error::{HttpError, Result};
pub use request::{BodyStream, Method, Request, RequestBody};
