//! End-to-end behaviour of `TransferClient` against the recording engine.

use proptest::prelude::*;
use serde_json::json;
use xfer_client::{
    Config, Defaults, ErrorKind, OptionValue, RecordingEngine, TransferClient, TransferOption,
    DEFAULTS,
};
use xfer_core::{decode_post_body, DEFAULT_USER_AGENT};

fn config(value: serde_json::Value) -> Config {
    Config::from_value(value).unwrap()
}

fn open(engine: &RecordingEngine, initial: Option<Config>) -> TransferClient<RecordingEngine> {
    TransferClient::with_engine(engine, &DEFAULTS, initial).unwrap()
}

#[test]
fn url_and_post_body_reach_the_engine() {
    let engine = RecordingEngine::new();
    let client = open(
        &engine,
        Some(config(json!({
            "url": "http://example.test/",
            "postfields": {"a": "1", "b": "2"},
        }))),
    );

    assert_eq!(engine.post_body().as_deref(), Some("a=1&b=2"));
    assert_eq!(
        engine.current(TransferOption::Url),
        Some(OptionValue::from("http://example.test/"))
    );
    client.dispose();
}

#[test]
fn known_keys_apply_in_one_batch() {
    let engine = RecordingEngine::new();
    let mut client = open(&engine, None);

    client
        .set_params(&config(json!({
            "url": "http://example.test/",
            "followlocation": "true",
            "timeout": 10,
            "httpheader": ["Accept: application/json"],
        })))
        .unwrap();

    let recording = engine.recording();
    // Defaults, then the configuration.
    assert_eq!(recording.batches.len(), 2);
    assert_eq!(recording.batches[1].len(), 4);
    assert_eq!(
        engine.current(TransferOption::FollowLocation),
        Some(OptionValue::Flag(true))
    );
    assert_eq!(engine.current(TransferOption::Timeout), Some(OptionValue::Number(10)));
}

#[test]
fn unknown_keys_are_all_listed_and_nothing_applies() {
    let engine = RecordingEngine::new();
    let mut client = open(&engine, None);

    let err = client
        .set_params(&config(json!({
            "url": "http://example.test/",
            "colour": "blue",
            "useragent": "changed/1.0",
            "flavour": "mint",
        })))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Params);
    assert_eq!(err.keys(), ["colour", "flavour"]);
    assert!(err.to_string().contains("colour, flavour"));

    // Valid keys from the same call did not take effect either.
    assert_eq!(engine.recording().batches.len(), 1);
    assert_eq!(engine.current(TransferOption::Url), None);
    assert_eq!(
        client.option(TransferOption::UserAgent),
        Some(&OptionValue::Text(DEFAULT_USER_AGENT.into()))
    );
}

#[test]
fn explicit_values_override_defaults() {
    let engine = RecordingEngine::new();
    let client = open(
        &engine,
        Some(config(json!({"returntransfer": false, "useragent": "probe/2.0"}))),
    );

    assert_eq!(
        client.option(TransferOption::ReturnTransfer),
        Some(&OptionValue::Flag(false))
    );
    assert_eq!(
        engine.current(TransferOption::UserAgent),
        Some(OptionValue::from("probe/2.0"))
    );
}

#[test]
fn later_calls_win() {
    let engine = RecordingEngine::new();
    let mut client = open(&engine, Some(config(json!({"url": "http://first.test/"}))));

    client.set_params(&config(json!({"url": "http://second.test/"}))).unwrap();
    client.set_param("URL", "http://third.test/").unwrap();

    assert_eq!(
        client.option(TransferOption::Url),
        Some(&OptionValue::from("http://third.test/"))
    );
    assert_eq!(
        engine.current(TransferOption::Url),
        Some(OptionValue::from("http://third.test/"))
    );
}

#[test]
fn set_param_rejects_unknown_names() {
    let engine = RecordingEngine::new();
    let mut client = open(&engine, None);

    let err = client.set_param("colour", "blue").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Params);

    client.set_param("postfields", json!({"q": "a b"})).unwrap();
    assert_eq!(engine.post_body().as_deref(), Some("q=a+b"));
}

#[test]
fn exec_returns_the_injected_body() {
    let engine = RecordingEngine::new().with_body(&b"\x00binary\xffbody"[..]);
    let mut client = open(&engine, Some(config(json!({"url": "http://example.test/"}))));

    assert_eq!(client.exec().unwrap(), b"\x00binary\xffbody");
    // No caching: a second call performs again.
    assert_eq!(client.exec().unwrap(), b"\x00binary\xffbody");
    assert_eq!(engine.recording().performs, 2);
}

#[test]
fn exec_failure_carries_native_text_and_code() {
    let engine = RecordingEngine::new().failing_with("Could not resolve host: example.test", 6);
    let mut client = open(&engine, Some(config(json!({"url": "http://example.test/"}))));

    let err = client.exec().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Exec);
    assert_eq!(err.code(), Some(6));
    assert!(err.message().contains("Could not resolve host: example.test"));
    assert!(err.to_string().starts_with("problems with transfer: Exec Exception, "));
}

#[test]
fn dispose_closes_once_after_failed_exec() {
    let engine = RecordingEngine::new().failing_with("Timeout was reached", 28);
    let mut client = open(&engine, None);

    assert!(client.exec().is_err());
    client.dispose();

    let recording = engine.recording();
    assert_eq!(recording.opens, 1);
    assert_eq!(recording.closes, 1);
}

#[test]
fn drop_closes_once() {
    let engine = RecordingEngine::new();
    {
        let _client = open(&engine, None);
    }
    assert_eq!(engine.recording().closes, 1);
}

#[test]
fn failed_construction_still_closes() {
    let engine = RecordingEngine::new();
    let result = TransferClient::with_engine(&engine, &DEFAULTS, Some(config(json!({"colour": "blue"}))));

    let err = match result {
        Ok(_) => panic!("construction should fail"),
        Err(e) => e,
    };
    assert_eq!(err.kind(), ErrorKind::Params);
    assert_eq!(engine.recording().closes, 1);
}

#[test]
fn engine_rejection_restores_previous_options() {
    let engine = RecordingEngine::new().rejecting(TransferOption::Cookie);
    let mut client = open(&engine, Some(config(json!({"url": "http://first.test/"}))));

    let err = client
        .set_params(&config(json!({"url": "http://second.test/", "cookie": "a=b"})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Params);
    assert_eq!(err.code(), Some(48));

    assert_eq!(
        engine.current(TransferOption::Url),
        Some(OptionValue::from("http://first.test/"))
    );
    assert_eq!(engine.recording().resets, 1);
    assert_eq!(client.options(), &engine.recording().current);
}

#[test]
fn restore_replays_options_in_last_set_order() {
    let engine = RecordingEngine::new().rejecting(TransferOption::Cookie);
    let mut client = open(&engine, None);

    client.set_param("username", "d1").unwrap();
    client.set_param("userpwd", "b:c").unwrap();
    client.set_param("username", "d2").unwrap();
    client.set_param("timeout_ms", 1500).unwrap();
    client.set_param("timeout", 2).unwrap();

    assert!(client.set_params(&config(json!({"cookie": "a=b"}))).is_err());

    let recording = engine.recording();
    let replay: Vec<TransferOption> = recording
        .batches
        .last()
        .unwrap()
        .iter()
        .map(|(option, _)| *option)
        .collect();
    assert_eq!(
        replay,
        [
            TransferOption::ReturnTransfer,
            TransferOption::UserAgent,
            TransferOption::UserPwd,
            TransferOption::Username,
            TransferOption::TimeoutMs,
            TransferOption::Timeout,
        ]
    );
    assert_eq!(engine.current(TransferOption::Username), Some(OptionValue::from("d2")));
}

#[test]
fn custom_defaults_are_used() {
    let engine = RecordingEngine::new().with_body("discarded");
    let defaults = Defaults {
        return_transfer: false,
        user_agent: "custom/0.1".into(),
    };
    let mut client = TransferClient::with_engine(&engine, &defaults, None).unwrap();

    assert_eq!(
        engine.current(TransferOption::UserAgent),
        Some(OptionValue::from("custom/0.1"))
    );
    assert!(client.exec().unwrap().is_empty());
}

#[test]
fn json_text_configuration() {
    let engine = RecordingEngine::new();
    let mut client = open(&engine, None);

    client
        .set_params_json(r#"{"url":"http://localhost/ukraine/","returntransfer":true}"#)
        .unwrap();
    assert_eq!(
        engine.current(TransferOption::Url),
        Some(OptionValue::from("http://localhost/ukraine/"))
    );

    let err = client.set_params_json("{broken").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Params);
}

proptest! {
    #[test]
    fn rejected_batches_leave_no_trace(
        valid in proptest::sample::subsequence(vec!["url", "referer", "cookie", "range"], 0..4),
        unknown in proptest::collection::vec("zz[a-z]{1,5}", 1..4),
    ) {
        let engine = RecordingEngine::new();
        let mut client = open(&engine, None);
        let before = engine.recording();

        let mut cfg = Config::new();
        for key in &valid {
            cfg = cfg.set(*key, "value");
        }
        for key in &unknown {
            cfg = cfg.set(key.clone(), "value");
        }

        prop_assert!(client.set_params(&cfg).is_err());
        prop_assert_eq!(engine.recording(), before);
    }

    #[test]
    fn post_bodies_decode_to_their_fields(
        fields in proptest::collection::btree_map("[a-z]{1,6}", "[ -~]{0,12}", 0..6),
    ) {
        let engine = RecordingEngine::new();
        let mut client = open(&engine, None);
        let value = serde_json::to_value(&fields).unwrap();

        client.set_post(&value).unwrap();
        let body = engine.post_body().unwrap();
        let decoded: Vec<(String, String)> = fields.into_iter().collect();
        prop_assert_eq!(decode_post_body(&body).unwrap(), decoded);
    }
}
