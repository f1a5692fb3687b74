//! Form configuration options.

use serde::Deserialize;

/// Default limit for submitted bodies: 1 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for how a form reads requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Largest accepted streamed body, in bytes. `None` disables the limit.
    pub max_body_bytes: Option<usize>,
    /// Whether `application/json` bodies are decoded as JSON.
    pub json_bodies: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: Some(DEFAULT_MAX_BODY_BYTES),
            json_bodies: true,
        }
    }
}

impl FormConfig {
    /// Creates a new FormConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body size limit.
    #[must_use]
    pub fn max_body_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Enables or disables JSON body decoding.
    #[must_use]
    pub fn json_bodies(mut self, enabled: bool) -> Self {
        self.json_bodies = enabled;
        self
    }
}
