//! Error types for xfer.
//!
//! One error type with a [`ErrorKind`] tag instead of a type per failure
//! class. The kind decides the message prefix; callers that only care that
//! *something* went wrong match on [`Error`], callers that want to react
//! differently match on [`Error::kind`].

use std::fmt;

use thiserror::Error;

/// Result type for xfer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transfer engine is unavailable or the session could not be opened.
    Init,
    /// The configuration was empty, unparseable, or named unknown options.
    Params,
    /// The transfer itself failed.
    Exec,
    /// POST fields could not be interpreted as a flat mapping.
    Post,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Init => "Init",
            ErrorKind::Params => "Params",
            ErrorKind::Exec => "Exec",
            ErrorKind::Post => "Post",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while configuring or running a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("problems with transfer: {kind} Exception, {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<i32>,
    keys: Vec<String>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            keys: Vec::new(),
        }
    }

    /// Session could not be created.
    pub fn init(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Init, message)
    }

    /// Configuration rejected.
    pub fn params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Params, message)
    }

    /// Configuration named options the registry does not know.
    ///
    /// Every key is listed, comma-joined, in the order it was encountered.
    pub fn unknown_options(keys: Vec<String>) -> Self {
        let message = format!("such parameters do not exist: {}", keys.join(", "));
        Self {
            keys,
            ..Self::params(message)
        }
    }

    /// The transfer failed with the engine's own text and numeric code.
    pub fn exec(native: impl fmt::Display, code: i32) -> Self {
        let message = format!("an error with execution of the transfer: {native} ([{code}])");
        Self::new(ErrorKind::Exec, message).with_code(code)
    }

    /// POST fields rejected.
    pub fn post(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Post, message)
    }

    /// Attach the engine's numeric error code.
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the configuration keys responsible for this error.
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = keys;
        self
    }

    /// Failure class.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric error code reported by the transfer engine, if any.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Configuration keys responsible for a `Params` error.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}
