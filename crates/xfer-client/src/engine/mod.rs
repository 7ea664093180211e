//! Transfer engines.
//!
//! An [`Engine`] opens [`Session`]s; a session is one native handle that
//! accepts options, performs transfers and reports metadata. The client
//! never talks to libcurl directly, which keeps it testable against the
//! in-memory [`RecordingEngine`].

pub mod libcurl;
pub mod recording;

use thiserror::Error;
use xfer_core::{OptionValue, StagedOption, TransferOption};

use crate::info::TransferInfo;

pub use self::libcurl::{CurlEngine, CurlSession};
pub use self::recording::{Recording, RecordingEngine, RecordingSession};

/// A failure reported by the native engine: its own text and numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NativeError {
    pub message: String,
    pub code: i32,
}

impl NativeError {
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// Source of sessions.
pub trait Engine {
    type Session: Session;

    /// Create a fresh session handle.
    fn open(&self) -> Result<Self::Session, NativeError>;
}

/// One native transfer handle.
pub trait Session {
    /// Apply several options in one call.
    fn set_options(&mut self, batch: &[StagedOption]) -> Result<(), NativeError>;

    /// Apply a single option.
    fn set_option(&mut self, option: TransferOption, value: &OptionValue) -> Result<(), NativeError> {
        self.set_options(&[(option, value.clone())])
    }

    /// Drop every applied option, returning the handle to its fresh state.
    fn reset(&mut self);

    /// Run one blocking transfer and return the body.
    fn perform(&mut self) -> Result<Vec<u8>, NativeError>;

    /// Metadata of the last transfer.
    fn info(&mut self) -> Result<TransferInfo, NativeError>;

    /// Release the handle.
    fn close(self);
}
