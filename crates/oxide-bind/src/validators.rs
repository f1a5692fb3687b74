//! Field validators.
//!
//! Each validator is built from its limits once and then checks single
//! values. A check performs one comparison and reports either success or a
//! [`ValidationError`] carrying a stable `code` and a default `message`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value.
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;

    /// Returns the error code reported on failure.
    fn code(&self) -> &str;

    /// Returns the error message reported on failure.
    fn message(&self) -> &str;

    /// Builds the error this validator reports.
    fn error(&self) -> ValidationError {
        ValidationError::new(self.code(), self.message())
    }
}

/// Reads a value as a number. Strings are parsed after trimming.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Character count of strings, element count of arrays.
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Textual form of scalar values.
pub(crate) fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// Validator that enforces a minimum numeric value.
#[derive(Debug, Clone)]
pub struct MinValidator {
    limit: f64,
    message: String,
}

impl MinValidator {
    /// Creates a new MinValidator.
    pub fn new(limit: impl Into<f64>) -> Self {
        let limit = limit.into();
        Self {
            limit,
            message: format!("ensure this value greater than or equal to {limit}"),
        }
    }

    /// Creates a new MinValidator with custom message.
    pub fn with_message(limit: impl Into<f64>, message: impl Into<String>) -> Self {
        Self {
            limit: limit.into(),
            message: message.into(),
        }
    }
}

impl Validator for MinValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match as_number(value) {
            Some(n) if n >= self.limit => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "min_value"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a maximum numeric value.
#[derive(Debug, Clone)]
pub struct MaxValidator {
    limit: f64,
    message: String,
}

impl MaxValidator {
    /// Creates a new MaxValidator.
    pub fn new(limit: impl Into<f64>) -> Self {
        let limit = limit.into();
        Self {
            limit,
            message: format!("ensure this value less than or equal to {limit}"),
        }
    }

    /// Creates a new MaxValidator with custom message.
    pub fn with_message(limit: impl Into<f64>, message: impl Into<String>) -> Self {
        Self {
            limit: limit.into(),
            message: message.into(),
        }
    }
}

impl Validator for MaxValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match as_number(value) {
            Some(n) if n <= self.limit => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "max_value"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for an inclusive numeric range.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    min: f64,
    max: f64,
    message: String,
}

impl RangeValidator {
    /// Creates a new RangeValidator with min and max bounds.
    pub fn new(min: impl Into<f64>, max: impl Into<f64>) -> Self {
        let (min, max) = (min.into(), max.into());
        Self {
            min,
            max,
            message: format!("ensure this value is between {min} and {max}"),
        }
    }

    /// Creates a new RangeValidator with custom message.
    pub fn with_message(
        min: impl Into<f64>,
        max: impl Into<f64>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
            message: message.into(),
        }
    }
}

impl Validator for RangeValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match as_number(value) {
            Some(n) if (self.min..=self.max).contains(&n) => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "range"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: String,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: format!("ensure this value has at least {min_length} characters"),
        }
    }

    /// Creates a new MinLengthValidator with custom message.
    pub fn with_message(min_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            message: message.into(),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match length(value) {
            Some(len) if len >= self.min_length => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "min_length"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: format!("ensure this value has no more than {max_length} characters"),
        }
    }

    /// Creates a new MaxLengthValidator with custom message.
    pub fn with_message(max_length: usize, message: impl Into<String>) -> Self {
        Self {
            max_length,
            message: message.into(),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match length(value) {
            Some(len) if len <= self.max_length => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "max_length"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for an inclusive length range.
#[derive(Debug, Clone)]
pub struct LengthRangeValidator {
    min_length: usize,
    max_length: usize,
    message: String,
}

impl LengthRangeValidator {
    /// Creates a new LengthRangeValidator.
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
            message: format!(
                "ensure this value is between {min_length} and {max_length} characters long"
            ),
        }
    }

    /// Creates a new LengthRangeValidator with custom message.
    pub fn with_message(min_length: usize, max_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            max_length,
            message: message.into(),
        }
    }
}

impl Validator for LengthRangeValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match length(value) {
            Some(len) if (self.min_length..=self.max_length).contains(&len) => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "length_range"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator using a regex pattern.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a new RegexValidator from a pattern string.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    /// Creates a new RegexValidator with custom message.
    pub fn with_message(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Creates a new RegexValidator from a compiled pattern.
    pub fn from_regex(pattern: Regex) -> Self {
        Self {
            pattern,
            message: "enter a valid value".to_string(),
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match as_text(value) {
            Some(text) if self.pattern.is_match(&text) => Ok(()),
            _ => Err(self.error()),
        }
    }

    fn code(&self) -> &str {
        "invalid"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Non-ASCII code points allowed in e-mail and IRI components.
const UCS: &str = r"\x{A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}";

/// Dotted host name; the last label must not start or end with a digit.
fn domain_pattern() -> String {
    let alnum = format!(r"[a-z\d{UCS}]");
    let alpha = format!(r"[a-z{UCS}]");
    let inner = format!(r"[a-z\d\-._~{UCS}]");
    format!(r"(?:(?:{alnum}|{alnum}{inner}*{alnum})\.)+(?:{alpha}|{alpha}{inner}*{alpha})\.?")
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let atext = format!(r"[a-z\d!#$%&'*+\-/=?^_`{{|}}~{UCS}]");
    let dot_atom = format!(r"{atext}+(?:\.{atext}+)*");
    let fws = r"(?:(?:[ \t]*\r\n)?[ \t]+)";
    let qtext = format!(r"[\x01-\x08\x0b\x0c\x0e-\x1f\x7f\x21\x23-\x5b\x5d-\x7e{UCS}]");
    let quoted_pair = format!(r"\\[\x01-\x09\x0b\x0c\x0d-\x7f{UCS}]");
    let quoted = format!(r#""(?:{fws}?(?:{qtext}|{quoted_pair}))*{fws}?""#);
    let domain = domain_pattern();

    Regex::new(&format!(r"(?i)^(?:{dot_atom}|{quoted})@{domain}$"))
        .expect("e-mail pattern compiles")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let unreserved = format!(r"[a-z\d\-._~{UCS}]");
    let pct = r"%[\da-f]{2}";
    let sub_delims = r"[!$&'()*+,;=]";
    let pchar = format!(r"(?:{unreserved}|{pct}|{sub_delims}|:|@)");
    let userinfo = format!(r"(?:(?:{unreserved}|{pct}|{sub_delims}|:)*@)?");
    let octet = r"(?:\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5])";
    let ipv4 = format!(r"{octet}\.{octet}\.{octet}\.{octet}");
    let host = format!(r"(?:{ipv4}|{})", domain_pattern());
    let path = format!(r"(?:/(?:{pchar}+(?:/{pchar}*)*)?)?");
    let query = format!(r"(?:\?(?:{pchar}|[\x{{E000}}-\x{{F8FF}}]|/|\?)*)?");
    let fragment = format!(r"(?:#(?:{pchar}|/|\?)*)?");

    Regex::new(&format!(
        r"(?i)^(?:https?|ftp)://{userinfo}{host}(?::\d*)?{path}{query}{fragment}$"
    ))
    .expect("URL pattern compiles")
});

/// Validator for e-mail addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    inner: RegexValidator,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self::with_message("please enter a valid email address")
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            inner: RegexValidator {
                pattern: EMAIL_PATTERN.clone(),
                message: message.into(),
            },
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.inner.validate(value)
    }

    fn code(&self) -> &str {
        self.inner.code()
    }

    fn message(&self) -> &str {
        self.inner.message()
    }
}

/// Validator for http, https and ftp URLs.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    inner: RegexValidator,
}

impl UrlValidator {
    /// Creates a new UrlValidator with default message.
    pub fn new() -> Self {
        Self::with_message("please enter a valid URL")
    }

    /// Creates a new UrlValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            inner: RegexValidator {
                pattern: URL_PATTERN.clone(),
                message: message.into(),
            },
        }
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for UrlValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.inner.validate(value)
    }

    fn code(&self) -> &str {
        self.inner.code()
    }

    fn message(&self) -> &str {
        self.inner.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code_of(v: &dyn Validator, value: Value) -> Option<String> {
        v.validate(&value).err().map(|e| e.code)
    }

    #[test]
    fn test_min_validator() {
        let v = MinValidator::new(5);
        assert_eq!(code_of(&v, json!(4)), Some("min_value".to_string()));
        assert_eq!(code_of(&v, json!(5)), None);
        assert_eq!(code_of(&v, json!(6)), None);
        assert_eq!(code_of(&v, json!("7")), None);
        assert_eq!(
            v.validate(&json!(4)).unwrap_err().message,
            "ensure this value greater than or equal to 5"
        );
    }

    #[test]
    fn test_max_validator() {
        let v = MaxValidator::new(10);
        assert_eq!(code_of(&v, json!(11)), Some("max_value".to_string()));
        assert_eq!(code_of(&v, json!(10)), None);
        assert_eq!(code_of(&v, json!(" 2.5 ")), None);
    }

    #[test]
    fn test_range_validator() {
        let v = RangeValidator::new(0, 100);
        assert_eq!(code_of(&v, json!(50)), None);
        assert_eq!(code_of(&v, json!(0)), None);
        assert_eq!(code_of(&v, json!(100)), None);
        assert_eq!(code_of(&v, json!(-1)), Some("range".to_string()));
        assert_eq!(code_of(&v, json!("101")), Some("range".to_string()));
        assert_eq!(v.message(), "ensure this value is between 0 and 100");
    }

    #[test]
    fn test_numeric_validators_reject_non_numbers() {
        assert!(MinValidator::new(1).validate(&json!("abc")).is_err());
        assert!(MaxValidator::new(1).validate(&Value::Null).is_err());
    }

    #[test]
    fn test_min_length_validator() {
        let v = MinLengthValidator::new(5);
        assert_eq!(code_of(&v, json!("hello")), None);
        assert_eq!(code_of(&v, json!("hello world")), None);
        assert_eq!(code_of(&v, json!("hi")), Some("min_length".to_string()));
    }

    #[test]
    fn test_max_length_validator() {
        let v = MaxLengthValidator::new(3);
        assert_eq!(code_of(&v, json!("abcd")), Some("max_length".to_string()));
        assert_eq!(code_of(&v, json!("abc")), None);
        assert_eq!(code_of(&v, json!(["a", "b"])), None);
        assert_eq!(
            v.message(),
            "ensure this value has no more than 3 characters"
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let v = MaxLengthValidator::new(3);
        assert_eq!(code_of(&v, json!("äöü")), None);
    }

    #[test]
    fn test_length_range_validator() {
        let v = LengthRangeValidator::new(2, 4);
        assert_eq!(code_of(&v, json!("")), Some("length_range".to_string()));
        assert_eq!(code_of(&v, json!("ab")), None);
        assert_eq!(code_of(&v, json!("abcd")), None);
        assert_eq!(code_of(&v, json!("abcde")), Some("length_range".to_string()));
        assert_eq!(code_of(&v, json!(42)), Some("length_range".to_string()));
    }

    #[test]
    fn test_regex_validator() {
        let v = RegexValidator::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
        assert_eq!(code_of(&v, json!("2024-01-15")), None);
        assert_eq!(code_of(&v, json!("not a date")), Some("invalid".to_string()));
        assert_eq!(v.message(), "enter a valid value");
    }

    #[test]
    fn test_regex_validator_from_compiled() {
        let v = RegexValidator::from_regex(Regex::new(r"^\d+$").unwrap());
        assert_eq!(code_of(&v, json!(1234)), None);
        assert_eq!(code_of(&v, json!({"a": 1})), Some("invalid".to_string()));
    }

    #[test]
    fn test_regex_validator_bad_pattern() {
        assert!(RegexValidator::new("(unclosed").is_err());
    }

    #[test]
    fn test_email_validator() {
        let v = EmailValidator::new();
        assert_eq!(code_of(&v, json!("user@example.com")), None);
        assert_eq!(code_of(&v, json!("User.Name+tag@Mail.Example.co.uk")), None);
        assert_eq!(code_of(&v, json!("\"john\"@example.com")), None);
        assert_eq!(code_of(&v, json!("invalid")), Some("invalid".to_string()));
        assert_eq!(code_of(&v, json!("@example.com")), Some("invalid".to_string()));
        assert_eq!(code_of(&v, json!("user@example")), Some("invalid".to_string()));
        assert_eq!(v.message(), "please enter a valid email address");
    }

    #[test]
    fn test_url_validator() {
        let v = UrlValidator::new();
        assert_eq!(code_of(&v, json!("https://example.com")), None);
        assert_eq!(code_of(&v, json!("http://example.com/path?q=1#top")), None);
        assert_eq!(code_of(&v, json!("ftp://192.168.0.1:21/file")), None);
        assert_eq!(code_of(&v, json!("example.com")), Some("invalid".to_string()));
        assert_eq!(code_of(&v, json!("mailto:a@b.io")), Some("invalid".to_string()));
        assert_eq!(v.message(), "please enter a valid URL");
    }
}
