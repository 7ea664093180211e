//! Loosely-typed transfer configuration and its validation.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::option_set::StagedOption;
use crate::postfields::{encode_post_body, is_postfields_key};
use crate::registry::{lookup, TransferOption};
use crate::value::OptionValue;

/// Option name → value, in declaration order.
///
/// Keys are option names without the `CURLOPT_` prefix, in any case. The
/// reserved key `postfields` holds POST fields instead of an option value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: Map<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(Error::params(format!(
                "configuration must be a JSON object, got {other}"
            ))),
        }
    }

    /// Add or replace one entry.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Validate every entry and stage the resulting options.
    ///
    /// The pass is exhaustive: every unknown key and every value of the
    /// wrong shape is collected, and if there is any, nothing is staged.
    pub fn stage(&self) -> Result<Vec<StagedOption>> {
        let mut staged = Vec::with_capacity(self.entries.len());
        let mut unknown = Vec::new();
        let mut invalid = Vec::new();

        for (key, value) in &self.entries {
            match stage_entry(key, value) {
                Ok(option) => staged.push(option),
                Err(Rejection::Unknown) => unknown.push(key.clone()),
                Err(Rejection::Invalid(reason)) => invalid.push((key.clone(), reason)),
            }
        }

        if invalid.is_empty() {
            if unknown.is_empty() {
                return Ok(staged);
            }
            return Err(Error::unknown_options(unknown));
        }

        let mut problems = Vec::new();
        if !unknown.is_empty() {
            problems.push(format!("such parameters do not exist: {}", unknown.join(", ")));
        }
        let reasons: Vec<String> = invalid
            .iter()
            .map(|(key, reason)| format!("{key} ({reason})"))
            .collect();
        problems.push(format!("invalid values for: {}", reasons.join(", ")));

        let keys = unknown
            .into_iter()
            .chain(invalid.into_iter().map(|(key, _)| key))
            .collect();
        Err(Error::params(problems.join("; ")).with_keys(keys))
    }
}

impl From<Map<String, Value>> for Config {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl TryFrom<Value> for Config {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::params(format!("configuration is not valid JSON: {e}")))?;
        Self::from_value(value)
    }
}

/// Validate and stage a single option.
///
/// Returns `Ok(None)` for an empty name. POST fields are encoded; any other
/// name must be registered and its value must have the right shape. Either
/// way a rejected value is a `Params` error naming the key.
pub fn stage_param(name: &str, value: &Value) -> Result<Option<StagedOption>> {
    if name.is_empty() {
        return Ok(None);
    }
    match stage_entry(name, value) {
        Ok(option) => Ok(Some(option)),
        Err(Rejection::Unknown) => Err(Error::unknown_options(vec![name.to_string()])),
        Err(Rejection::Invalid(reason)) => Err(Error::params(format!(
            "invalid value for {name}: {reason}"
        ))
        .with_keys(vec![name.to_string()])),
    }
}

enum Rejection {
    Unknown,
    Invalid(String),
}

fn stage_entry(key: &str, value: &Value) -> std::result::Result<StagedOption, Rejection> {
    if is_postfields_key(key) {
        return encode_post_body(value)
            .map(|body| (TransferOption::PostFields, OptionValue::Text(body)))
            .map_err(|e| Rejection::Invalid(e.message().to_string()));
    }
    let option = lookup(key).ok_or(Rejection::Unknown)?;
    OptionValue::coerce(option.kind(), value)
        .map(|value| (option, value))
        .ok_or_else(|| Rejection::Invalid(format!("expected {}", option.kind().describe())))
}
