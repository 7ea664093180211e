//! xfer binary
//!
//! Runs one transfer described by a JSON option map and writes the body to
//! stdout (or a file).

mod args;
mod input;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xfer_client::{CurlEngine, RecordingEngine, TransferClient};
use xfer_core::{decode_post_body, Defaults};

use crate::args::Args;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the body.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xfer=info,xfer_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:?}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = input::load(&args.config)?;
    let defaults = Defaults::from_env();

    if args.dry_run {
        let engine = RecordingEngine::new();
        let client = TransferClient::with_engine(&engine, &defaults, Some(config))?;
        client.dispose();

        let mut report = serde_json::json!({ "options": engine.recording().current });
        if let Some(body) = engine.post_body() {
            let fields: serde_json::Map<String, serde_json::Value> = decode_post_body(&body)?
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect();
            report["post_fields"] = fields.into();
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut client = TransferClient::with_engine(&CurlEngine::new(), &defaults, Some(config))?;
    let body = client.exec()?;
    tracing::info!(bytes = body.len(), "transfer complete");

    match &args.output {
        Some(path) => std::fs::write(path, &body)
            .with_context(|| format!("failed to write body to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
    }

    if args.info {
        let info = client.info()?;
        eprintln!("{}", serde_json::to_string_pretty(&info)?);
    }

    client.dispose();
    Ok(())
}
