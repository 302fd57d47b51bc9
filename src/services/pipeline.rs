//! Normalization pipeline orchestrating input, parsing and delivery.
//!
//! One invocation resolves the raw report, parses it with the selected
//! scanner parser, serializes the findings compactly and delivers them. Each
//! stage runs to completion before the next starts and nothing is retried.

use crate::config::AppConfig;
use crate::errors::NormalizerError;
use crate::parsers::ScannerKind;
use crate::services::input::{self, InputSource};
use crate::services::output::{self, OutputSink};

/// What a single run should do.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub scanner: ScannerKind,
    pub input: InputSource,
    pub output: OutputSink,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source_tool: String,
    pub findings: usize,
    pub skipped: usize,
}

/// HTTP client shared by the fetch and upload of one invocation.
pub fn build_client(config: &AppConfig) -> Result<reqwest::Client, NormalizerError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| NormalizerError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Run the full pipeline for one invocation.
pub async fn run(
    config: &AppConfig,
    invocation: &Invocation,
) -> Result<RunSummary, NormalizerError> {
    let client = build_client(config)?;

    // 1. Resolve input
    let text = input::resolve(&client, &invocation.input).await?;
    tracing::debug!(
        source = %invocation.input.describe(),
        bytes = text.len(),
        "Resolved raw report"
    );

    // 2. Parse
    let parser = invocation.scanner.parser();
    let result = parser.parse(&text)?;
    if result.skipped > 0 {
        tracing::debug!(
            scanner = %invocation.scanner,
            skipped = result.skipped,
            "Skipped incomplete or malformed records"
        );
    }

    // 3. Serialize and deliver
    let body = output::to_compact_json(&result.findings)?;
    output::deliver(&client, &invocation.output, &body).await?;

    tracing::info!(
        scanner = %invocation.scanner,
        findings = result.findings.len(),
        destination = %invocation.output.describe(),
        "Normalized findings delivered"
    );

    Ok(RunSummary {
        source_tool: result.source_tool,
        findings: result.findings.len(),
        skipped: result.skipped,
    })
}
