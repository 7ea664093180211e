//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Perform one HTTP transfer described by a JSON option map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Option map as JSON text, `@path` to read it from a file, or `-` for stdin
    /// (e.g. '{"url":"http://localhost/","followlocation":true}')
    pub config: String,

    /// Write the response body to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print transfer metadata as JSON to stderr after the transfer
    #[arg(short, long, default_value = "false")]
    pub info: bool,

    /// Validate and print the options that would be applied, without transferring
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from(["xfer", "--info", "-o", "out.html", r#"{"url":"http://a.test/"}"#]);
        assert!(args.info);
        assert!(!args.dry_run);
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.config, r#"{"url":"http://a.test/"}"#);
    }

    #[test]
    fn config_is_required() {
        assert!(Args::try_parse_from(["xfer"]).is_err());
    }
}
