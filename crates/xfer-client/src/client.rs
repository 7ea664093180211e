//! The transfer client.
//!
//! Holds one session for its whole life. Configuration is validated in
//! full before anything reaches the session, so a rejected call leaves the
//! session exactly as it was.

use serde_json::Value;
use xfer_core::{
    encode_post_body, stage_param, Config, Defaults, Error, OptionSet, OptionValue, Result,
    StagedOption, TransferOption, DEFAULTS,
};

use crate::engine::{CurlEngine, Engine, NativeError, Session};
use crate::info::TransferInfo;

/// A single-session, blocking transfer client.
///
/// The session is closed exactly once: by [`dispose`](Self::dispose), or
/// when the client is dropped.
pub struct TransferClient<E: Engine = CurlEngine> {
    session: Option<E::Session>,
    applied: OptionSet,
    performed: bool,
}

impl TransferClient<CurlEngine> {
    /// Open a libcurl session with the stock defaults, then apply `initial`.
    pub fn new(initial: Option<Config>) -> Result<Self> {
        Self::with_engine(&CurlEngine::new(), &DEFAULTS, initial)
    }

    /// Like [`new`](Self::new), with the initial configuration as JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = text.parse()?;
        Self::new(Some(config))
    }
}

impl<E: Engine> TransferClient<E> {
    /// Open a session on `engine`, apply `defaults`, then apply `initial`.
    pub fn with_engine(engine: &E, defaults: &Defaults, initial: Option<Config>) -> Result<Self> {
        let session = engine
            .open()
            .map_err(|e| Error::init(format!("transfer engine unavailable: {e}")).with_code(e.code))?;

        let mut client = Self {
            session: Some(session),
            applied: OptionSet::new(),
            performed: false,
        };
        client.apply(defaults.batch())?;
        if let Some(config) = initial {
            client.set_params(&config)?;
        }
        Ok(client)
    }

    /// Validate `config` in full and apply it as one batch.
    ///
    /// Fails without applying anything if the configuration is empty or any
    /// key is unknown or has a value of the wrong shape; the error lists
    /// every offending key.
    pub fn set_params(&mut self, config: &Config) -> Result<()> {
        if config.is_empty() {
            return Err(Error::params("configuration is empty"));
        }
        let batch = config.stage()?;
        self.apply(batch)
    }

    /// [`set_params`](Self::set_params) with the configuration as JSON text.
    pub fn set_params_json(&mut self, text: &str) -> Result<()> {
        let config: Config = text.parse()?;
        self.set_params(&config)
    }

    /// Validate and apply one option immediately. An empty name is a no-op.
    pub fn set_param(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match stage_param(name, &value.into())? {
            Some((option, value)) => self.apply_one(option, value),
            None => Ok(()),
        }
    }

    /// Encode `fields` as a form body and apply it as the POST body.
    pub fn set_post(&mut self, fields: &Value) -> Result<()> {
        let body = encode_post_body(fields)?;
        self.apply_one(TransferOption::PostFields, OptionValue::Text(body))
    }

    /// Perform one blocking transfer and return the body.
    pub fn exec(&mut self) -> Result<Vec<u8>> {
        let session = self.session.as_mut().ok_or_else(closed)?;
        self.performed = true;
        match session.perform() {
            Ok(body) => {
                tracing::debug!(bytes = body.len(), "transfer finished");
                Ok(body)
            }
            Err(e) => {
                tracing::debug!(code = e.code, error = %e.message, "transfer failed");
                Err(Error::exec(e.message, e.code))
            }
        }
    }

    /// Metadata of the last transfer; empty before the first [`exec`](Self::exec).
    pub fn info(&mut self) -> Result<TransferInfo> {
        if !self.performed {
            return Ok(TransferInfo::default());
        }
        let session = self.session.as_mut().ok_or_else(closed)?;
        session
            .info()
            .map_err(|e| Error::exec(format!("cannot read transfer info: {}", e.message), e.code))
    }

    /// Value currently applied for `option`.
    pub fn option(&self, option: TransferOption) -> Option<&OptionValue> {
        self.applied.get(option)
    }

    /// Every option currently applied, in first-set order.
    pub fn options(&self) -> &OptionSet {
        &self.applied
    }

    /// Close the session. The client cannot be used afterwards.
    pub fn dispose(mut self) {
        self.close();
    }

    fn apply(&mut self, batch: Vec<StagedOption>) -> Result<()> {
        let session = self.session.as_mut().ok_or_else(closed)?;
        if let Err(e) = session.set_options(&batch) {
            // The engine may have taken part of the batch; put the session
            // back to the last accepted state.
            session.reset();
            if let Err(restore) = session.set_options(&self.applied.to_batch()) {
                tracing::warn!(error = %restore, "could not restore transfer options");
            }
            return Err(rejected(e));
        }
        tracing::debug!(count = batch.len(), "applied transfer options");
        self.applied.extend(batch);
        Ok(())
    }

    fn apply_one(&mut self, option: TransferOption, value: OptionValue) -> Result<()> {
        tracing::trace!(option = option.name(), "applying transfer option");
        self.apply(vec![(option, value)])
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
            tracing::debug!("transfer session closed");
        }
    }
}

impl<E: Engine> Drop for TransferClient<E> {
    fn drop(&mut self) {
        self.close();
    }
}

fn closed() -> Error {
    Error::init("transfer session is closed")
}

fn rejected(e: NativeError) -> Error {
    Error::params(format!("the transfer engine rejected the options: {}", e.message)).with_code(e.code)
}
