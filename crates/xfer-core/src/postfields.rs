//! POST body encoding.
//!
//! Turns a flat mapping of field name → value into an
//! `application/x-www-form-urlencoded` body. Mapping order is output order;
//! nothing is sorted or deduplicated.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Reserved configuration key whose value is POST fields rather than an option.
pub const POSTFIELDS_KEY: &str = "postfields";

/// Bytes left untouched by form encoding: alphanumerics and `-_.`.
const FORM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Returns `true` if `key` is the reserved POST-fields key (any case).
pub fn is_postfields_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(POSTFIELDS_KEY)
}

/// Encode POST fields given as a JSON object, or as JSON text of one.
pub fn encode_post_body(fields: &Value) -> Result<String> {
    match fields {
        Value::Object(map) => encode_map(map),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => encode_map(&map),
            Ok(_) => Err(Error::post("post fields text must hold a JSON object")),
            Err(e) => Err(Error::post(format!("post fields text is not valid JSON: {e}"))),
        },
        other => Err(Error::post(format!(
            "post fields must be a mapping, got {}",
            type_name(other)
        ))),
    }
}

/// Encode an ordered mapping of POST fields.
pub fn encode_map(fields: &Map<String, Value>) -> Result<String> {
    let mut pairs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let value = scalar(name, value)?;
        pairs.push(format!("{}={}", encode_component(name), encode_component(&value)));
    }
    Ok(pairs.join("&"))
}

/// Split and percent-decode a form-encoded body back into ordered pairs.
pub fn decode_post_body(body: &str) -> Result<Vec<(String, String)>> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    body.split('&')
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode_component(name)?, decode_component(value)?))
        })
        .collect()
}

fn encode_component(raw: &str) -> String {
    // A literal `%20` in the input is escaped as `%2520`, so this only hits spaces.
    utf8_percent_encode(raw, FORM).to_string().replace("%20", "+")
}

fn decode_component(encoded: &str) -> Result<String> {
    percent_decode_str(&encoded.replace('+', " "))
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::post(format!("post body is not valid UTF-8: {e}")))
}

fn scalar(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) | Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(Error::post(format!(
            "post field '{name}' must be a scalar, got {}",
            type_name(value)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
