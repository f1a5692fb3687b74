//! `application/x-www-form-urlencoded` decoding into form data.

use serde_json::{Map, Value};
use url::Url;

use crate::error::{HttpError, Result};

/// Decoded key/value input, as bound to a form.
pub type FormData = Map<String, Value>;

/// Decodes a URL-encoded byte string.
///
/// Keys seen once map to a string. Keys seen more than once map to an array
/// of strings in the order they appeared.
pub fn decode_urlencoded(input: &[u8]) -> FormData {
    collect_pairs(url::form_urlencoded::parse(input))
}

/// Decodes the query component of a request URL.
///
/// Accepts both absolute URLs and origin-relative ones such as `/?a=1`.
pub fn decode_query(raw: &str) -> Result<FormData> {
    let url = parse_url(raw)?;
    Ok(collect_pairs(url.query_pairs()))
}

fn parse_url(raw: &str) -> Result<Url> {
    let invalid = |source: url::ParseError| HttpError::InvalidUrl {
        url: raw.to_string(),
        source,
    };

    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
            .and_then(|base| base.join(raw))
            .map_err(invalid),
        Err(e) => Err(invalid(e)),
    }
}

fn collect_pairs<K, V>(pairs: impl Iterator<Item = (K, V)>) -> FormData
where
    K: Into<String>,
    V: Into<String>,
{
    let mut data = FormData::new();

    for (key, value) in pairs {
        let key: String = key.into();
        let value = Value::String(value.into());
        match data.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                data.insert(key, value);
            }
        }
    }

    data
}
