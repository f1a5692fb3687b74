//! HTTP request type as seen by form handling.

use std::collections::HashMap;
use std::str::FromStr;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::trace;

use crate::decode::{decode_query, FormData};
use crate::error::{HttpError, Result};

/// A chunked request body, ending when the stream yields `None`.
pub type BodyStream = BoxStream<'static, std::io::Result<Bytes>>;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
}

impl Method {
    /// Returns the method as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Whether form data travels in the query string.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Get)
    }

    /// Whether form data travels in the request body.
    pub fn is_submission(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl FromStr for Method {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(HttpError::UnknownMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The body of a request.
#[derive(Default)]
pub enum RequestBody {
    /// No body was sent.
    #[default]
    Empty,
    /// The body was already decoded by an upstream framework layer.
    Parsed(Value),
    /// Raw bytes still arriving from the transport.
    Stream(BodyStream),
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Parsed(value) => f.debug_tuple("Parsed").field(value).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// An HTTP request.
#[derive(Debug)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request URL, usually origin-relative (`/path?query`).
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: RequestBody,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Creates a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    /// Creates a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body to a single chunk.
    #[must_use]
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        let chunk = body.into();
        self.body_stream(stream::once(async move { Ok::<_, std::io::Error>(chunk) }).boxed())
    }

    /// Sets the body to a sequence of chunks.
    #[must_use]
    pub fn chunks<I, B>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let chunks: Vec<std::io::Result<Bytes>> =
            chunks.into_iter().map(|c| Ok(c.into())).collect();
        self.body_stream(stream::iter(chunks).boxed())
    }

    /// Sets the body to an arbitrary byte stream.
    #[must_use]
    pub fn body_stream(mut self, body: BodyStream) -> Self {
        self.body = RequestBody::Stream(body);
        self
    }

    /// Sets a body that an upstream layer has already decoded.
    #[must_use]
    pub fn parsed_body(mut self, body: impl Into<Value>) -> Self {
        self.body = RequestBody::Parsed(body.into());
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the media type of the body, without parameters.
    pub fn content_type(&self) -> Option<String> {
        self.get_header("Content-Type").map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Decodes the query component of the URL.
    pub fn query(&self) -> Result<FormData> {
        decode_query(&self.url)
    }

    /// Accumulates the streamed body until end-of-stream.
    ///
    /// A streamed body is taken out of the request; parsed and empty bodies
    /// stay in place and read as no bytes. Fails with
    /// [`HttpError::BodyTooLarge`] as soon as more than `limit` bytes have
    /// arrived.
    pub async fn read_body(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        let mut body = match std::mem::take(&mut self.body) {
            RequestBody::Stream(body) => body,
            other => {
                self.body = other;
                return Ok(Vec::new());
            }
        };

        let mut buffer = Vec::new();
        while let Some(chunk) = body.try_next().await? {
            trace!(chunk = chunk.len(), total = buffer.len(), "received body chunk");
            if let Some(limit) = limit {
                if buffer.len() + chunk.len() > limit {
                    return Err(HttpError::BodyTooLarge { limit });
                }
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer)
    }
}
