//! In-memory engine that records what it is asked to do.
//!
//! Nothing goes over the network. The engine hands back a scripted body or
//! a scripted failure and keeps a shared [`Recording`] of every option
//! batch, reset, transfer and close, which tests and `--dry-run` inspect.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use xfer_core::{OptionSet, OptionValue, StagedOption, TransferOption};

use super::{Engine, NativeError, Session};
use crate::info::TransferInfo;

/// `CURLE_UNKNOWN_OPTION`
const UNKNOWN_OPTION: i32 = 48;

/// Everything sessions of one [`RecordingEngine`] have been asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    /// Options currently in effect on the session.
    pub current: OptionSet,
    /// Every batch handed to `set_options`, in call order.
    pub batches: Vec<Vec<StagedOption>>,
    pub opens: usize,
    pub resets: usize,
    pub performs: usize,
    pub closes: usize,
}

#[derive(Debug, Clone)]
struct Script {
    unavailable: Option<NativeError>,
    outcome: Result<Vec<u8>, NativeError>,
    rejects: Option<TransferOption>,
    info: TransferInfo,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            unavailable: None,
            outcome: Ok(Vec::new()),
            rejects: None,
            info: TransferInfo {
                http_code: 200,
                ..Default::default()
            },
        }
    }
}

/// Scripted engine. Clones share one [`Recording`].
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    script: Script,
    state: Arc<Mutex<Recording>>,
}

impl RecordingEngine {
    /// Engine whose transfers succeed with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transfers succeed and return `body`.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.script.outcome = Ok(body.into());
        self
    }

    /// Transfers fail with the given native text and code.
    pub fn failing_with(mut self, message: impl Into<String>, code: i32) -> Self {
        self.script.outcome = Err(NativeError::new(message, code));
        self
    }

    /// Sessions cannot be opened.
    pub fn unavailable(mut self, message: impl Into<String>, code: i32) -> Self {
        self.script.unavailable = Some(NativeError::new(message, code));
        self
    }

    /// Batches containing `option` fail when they reach it; options before
    /// it in the batch are still applied.
    pub fn rejecting(mut self, option: TransferOption) -> Self {
        self.script.rejects = Some(option);
        self
    }

    /// Metadata reported after a transfer.
    pub fn with_info(mut self, info: TransferInfo) -> Self {
        self.script.info = info;
        self
    }

    /// Snapshot of the recording so far.
    pub fn recording(&self) -> Recording {
        lock(&self.state).clone()
    }

    /// Value currently in effect for `option`.
    pub fn current(&self, option: TransferOption) -> Option<OptionValue> {
        lock(&self.state).current.get(option).cloned()
    }

    /// POST body currently in effect.
    pub fn post_body(&self) -> Option<String> {
        self.current(TransferOption::PostFields)
            .and_then(|value| value.as_text().map(str::to_string))
    }
}

impl Engine for RecordingEngine {
    type Session = RecordingSession;

    fn open(&self) -> Result<RecordingSession, NativeError> {
        if let Some(err) = &self.script.unavailable {
            return Err(err.clone());
        }
        lock(&self.state).opens += 1;
        Ok(RecordingSession {
            script: self.script.clone(),
            state: Arc::clone(&self.state),
            performed: false,
        })
    }
}

/// Session opened by a [`RecordingEngine`].
pub struct RecordingSession {
    script: Script,
    state: Arc<Mutex<Recording>>,
    performed: bool,
}

impl Session for RecordingSession {
    fn set_options(&mut self, batch: &[StagedOption]) -> Result<(), NativeError> {
        let mut state = lock(&self.state);
        state.batches.push(batch.to_vec());
        for (option, value) in batch {
            if self.script.rejects == Some(*option) {
                return Err(NativeError::new(
                    format!("{} is not supported by this engine", option.name()),
                    UNKNOWN_OPTION,
                ));
            }
            state.current.insert(*option, value.clone());
        }
        Ok(())
    }

    fn reset(&mut self) {
        let mut state = lock(&self.state);
        state.resets += 1;
        state.current.clear();
    }

    fn perform(&mut self) -> Result<Vec<u8>, NativeError> {
        let mut state = lock(&self.state);
        state.performs += 1;
        self.performed = true;

        let body = self.script.outcome.clone()?;
        match state.current.get(TransferOption::ReturnTransfer) {
            Some(OptionValue::Flag(false)) | None => Ok(Vec::new()),
            _ => Ok(body),
        }
    }

    fn info(&mut self) -> Result<TransferInfo, NativeError> {
        if !self.performed {
            return Ok(TransferInfo::default());
        }
        let state = lock(&self.state);
        let mut info = self.script.info.clone();
        if info.url.is_none() {
            info.url = state
                .current
                .get(TransferOption::Url)
                .and_then(|value| value.as_text().map(str::to_string));
        }
        Ok(info)
    }

    fn close(self) {
        lock(&self.state).closes += 1;
    }
}

fn lock(state: &Mutex<Recording>) -> MutexGuard<'_, Recording> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_batches_and_current_values() {
        let engine = RecordingEngine::new();
        let mut session = engine.open().unwrap();
        session
            .set_options(&[
                (TransferOption::Url, OptionValue::from("http://a.test/")),
                (TransferOption::ReturnTransfer, OptionValue::Flag(true)),
            ])
            .unwrap();
        session
            .set_option(TransferOption::Url, &OptionValue::from("http://b.test/"))
            .unwrap();

        let recording = engine.recording();
        assert_eq!(recording.opens, 1);
        assert_eq!(recording.batches.len(), 2);
        assert_eq!(
            engine.current(TransferOption::Url),
            Some(OptionValue::from("http://b.test/"))
        );
    }

    #[test]
    fn rejection_applies_the_prefix_only() {
        let engine = RecordingEngine::new().rejecting(TransferOption::Cookie);
        let mut session = engine.open().unwrap();
        let err = session
            .set_options(&[
                (TransferOption::Url, OptionValue::from("http://a.test/")),
                (TransferOption::Cookie, OptionValue::from("a=b")),
                (TransferOption::Referer, OptionValue::from("http://r.test/")),
            ])
            .unwrap_err();

        assert_eq!(err.code, UNKNOWN_OPTION);
        assert!(engine.current(TransferOption::Url).is_some());
        assert!(engine.current(TransferOption::Referer).is_none());
    }

    #[test]
    fn scripted_outcomes() {
        let engine = RecordingEngine::new().with_body("payload");
        let mut session = engine.open().unwrap();
        assert_eq!(session.info().unwrap(), TransferInfo::default());

        // Without ReturnTransfer the body is not handed back.
        assert!(session.perform().unwrap().is_empty());
        session
            .set_option(TransferOption::ReturnTransfer, &OptionValue::Flag(true))
            .unwrap();
        assert_eq!(session.perform().unwrap(), b"payload");
        assert_eq!(session.info().unwrap().http_code, 200);

        let engine = RecordingEngine::new().failing_with("Couldn't connect to server", 7);
        let mut session = engine.open().unwrap();
        assert_eq!(
            session.perform().unwrap_err(),
            NativeError::new("Couldn't connect to server", 7)
        );

        let engine = RecordingEngine::new().unavailable("no engine", 2);
        assert!(engine.open().is_err());
        assert_eq!(engine.recording().opens, 0);
    }

    #[test]
    fn scripted_info_takes_the_current_url() {
        let engine = RecordingEngine::new().with_info(TransferInfo {
            http_code: 404,
            content_type: Some("text/html".into()),
            ..Default::default()
        });
        let mut session = engine.open().unwrap();
        session
            .set_option(TransferOption::Url, &OptionValue::from("http://missing.test/"))
            .unwrap();
        session.perform().unwrap();

        let info = session.info().unwrap();
        assert_eq!(info.http_code, 404);
        assert_eq!(info.content_type.as_deref(), Some("text/html"));
        assert_eq!(info.url.as_deref(), Some("http://missing.test/"));
    }

    #[test]
    fn close_is_counted() {
        let engine = RecordingEngine::new();
        let session = engine.open().unwrap();
        session.close();
        assert_eq!(engine.recording().closes, 1);
    }
}
