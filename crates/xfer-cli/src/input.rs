//! Loading the option map from the command line, a file, or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use xfer_core::Config;

/// Resolve the `CONFIG` argument into a configuration.
///
/// `-` reads stdin, `@path` reads a file, anything else is JSON text.
pub fn load(source: &str) -> anyhow::Result<Config> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read configuration from stdin")?;
        text
    } else if let Some(path) = source.strip_prefix('@') {
        read_file(Path::new(path))?
    } else {
        source.to_string()
    };

    Ok(text.parse::<Config>()?)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))
}
