//! Options every session starts with.

use std::borrow::Cow;

use crate::option_set::StagedOption;
use crate::registry::TransferOption;
use crate::value::OptionValue;

/// User agent sent unless the configuration names one.
pub const DEFAULT_USER_AGENT: &str = concat!("xfer/", env!("CARGO_PKG_VERSION"));

/// Options applied to a fresh session before any caller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Return the body from `exec` rather than writing it to stdout.
    pub return_transfer: bool,
    /// Value of the `User-Agent` header.
    pub user_agent: Cow<'static, str>,
}

/// The stock defaults: bodies are returned, and requests identify as xfer.
pub const DEFAULTS: Defaults = Defaults {
    return_transfer: true,
    user_agent: Cow::Borrowed(DEFAULT_USER_AGENT),
};

impl Default for Defaults {
    fn default() -> Self {
        DEFAULTS
    }
}

impl Defaults {
    /// Stock defaults with environment overrides.
    ///
    /// `XFER_USER_AGENT` replaces the user agent when set and non-empty.
    pub fn from_env() -> Self {
        let user_agent = std::env::var("XFER_USER_AGENT")
            .ok()
            .filter(|ua| !ua.trim().is_empty())
            .map(Cow::Owned)
            .unwrap_or(DEFAULTS.user_agent);

        Self {
            user_agent,
            ..DEFAULTS
        }
    }

    /// The defaults as an option batch.
    pub fn batch(&self) -> Vec<StagedOption> {
        vec![
            (TransferOption::ReturnTransfer, OptionValue::Flag(self.return_transfer)),
            (
                TransferOption::UserAgent,
                OptionValue::Text(self.user_agent.to_string()),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_defaults() {
        let batch = DEFAULTS.batch();
        assert_eq!(batch[0], (TransferOption::ReturnTransfer, OptionValue::Flag(true)));
        assert_eq!(
            batch[1],
            (TransferOption::UserAgent, OptionValue::Text(DEFAULT_USER_AGENT.into()))
        );
        assert!(DEFAULT_USER_AGENT.starts_with("xfer/"));
    }
}
