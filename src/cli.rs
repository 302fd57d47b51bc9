//! Command-line surface of the normalizer.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::parsers::ScannerKind;
use crate::services::input::InputSource;
use crate::services::output::OutputSink;
use crate::services::pipeline::Invocation;

/// Normalize a raw security scanner report into canonical findings.
///
/// Reads the report from INPUT_URL (when it starts with `http`), from
/// `--input-file`, or from stdin. Writes compact JSON to OUTPUT_URL (HTTP PUT,
/// when it starts with `http`), to `--output-file`, or to stdout.
#[derive(Debug, clap::Parser)]
#[command(name = "findingnorm", version)]
pub struct Cli {
    /// URL of the raw scanner report
    pub input_url: Option<String>,

    /// URL the findings are uploaded to with HTTP PUT
    pub output_url: Option<String>,

    /// Scanner that produced the report [default: mobsf, or FINDINGNORM_DEFAULT_SCANNER]
    #[arg(long, value_enum)]
    pub scanner: Option<ScannerKind>,

    /// Read the report from a local file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Write the findings to a local file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,
}

impl Cli {
    /// Resolve arguments and configuration into a pipeline invocation.
    pub fn invocation(&self, config: &AppConfig) -> Invocation {
        Invocation {
            scanner: self.scanner.unwrap_or(config.default_scanner),
            input: InputSource::select(self.input_url.as_deref(), self.input_file.as_deref()),
            output: OutputSink::select(self.output_url.as_deref(), self.output_file.as_deref()),
        }
    }
}
