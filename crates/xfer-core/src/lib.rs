//! xfer core - option registry and configuration marshalling
//!
//! Everything that happens before a transfer engine is touched:
//!
//! - **Registry**: the closed set of libcurl options, looked up by
//!   prefix-less, case-insensitive name
//! - **Config**: loosely-typed JSON configuration, validated exhaustively
//!   into a batch of typed options (all-or-nothing)
//! - **POST fields**: flat mappings encoded as form bodies
//! - **Defaults**: the options a fresh session starts with
//! - **Error**: one tagged error type for the whole workspace
//!
//! # Example
//!
//! ```
//! use xfer_core::{Config, TransferOption, OptionValue};
//!
//! let config: Config = r#"{"url":"http://example.test/","postfields":{"a":"1","b":"2"}}"#
//!     .parse()
//!     .unwrap();
//! let batch = config.stage().unwrap();
//! assert_eq!(batch[1], (TransferOption::PostFields, OptionValue::Text("a=1&b=2".into())));
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod option_set;
pub mod postfields;
pub mod registry;
pub mod value;

pub use config::{stage_param, Config};
pub use defaults::{Defaults, DEFAULTS, DEFAULT_USER_AGENT};
pub use error::{Error, ErrorKind, Result};
pub use option_set::{OptionSet, StagedOption};
pub use postfields::{decode_post_body, encode_post_body, POSTFIELDS_KEY};
pub use registry::{lookup, TransferOption, ValueKind, REGISTRY};
pub use value::OptionValue;
