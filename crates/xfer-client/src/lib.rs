//! xfer client - one blocking transfer over libcurl, configured from JSON
//!
//! This crate provides:
//! - [`TransferClient`]: owns one session, validates configuration and
//!   runs transfers
//! - [`Engine`]/[`Session`]: the seam to the native transfer library, with
//!   a libcurl implementation and an in-memory recording one
//! - [`TransferInfo`]: post-transfer metadata
//!
//! # Example
//!
//! ```rust,no_run
//! use xfer_client::TransferClient;
//!
//! let mut client = TransferClient::from_json(
//!     r#"{"url":"http://localhost/ukraine/","returntransfer":true}"#,
//! )?;
//! let body = client.exec()?;
//! println!("{}", String::from_utf8_lossy(&body));
//! client.dispose();
//! # Ok::<(), xfer_client::Error>(())
//! ```

pub mod client;
pub mod engine;
pub mod info;

pub use client::TransferClient;
pub use engine::{CurlEngine, Engine, NativeError, RecordingEngine, Session};
pub use info::TransferInfo;

// Re-export the configuration surface so callers need one dependency.
pub use xfer_core::{Config, Defaults, Error, ErrorKind, OptionValue, Result, TransferOption, DEFAULTS};
