//! Output delivery: upload the findings array, write it to a file or print it.

use std::path::{Path, PathBuf};

use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;

use crate::errors::NormalizerError;
use crate::models::finding::Finding;
use crate::services::input::is_url;

/// Where the normalized findings are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    Url(String),
    File(PathBuf),
    Stdout,
}

impl OutputSink {
    /// Pick the destination from the invocation arguments.
    pub fn select(url_arg: Option<&str>, file: Option<&Path>) -> Self {
        match (url_arg, file) {
            (Some(arg), _) if is_url(arg) => Self::Url(arg.to_string()),
            (_, Some(path)) => Self::File(path.to_path_buf()),
            _ => Self::Stdout,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Stdout => "stdout".to_string(),
        }
    }
}

/// Serialize findings as a JSON array without insignificant whitespace.
pub fn to_compact_json(findings: &[Finding]) -> Result<String, NormalizerError> {
    serde_json::to_string(findings)
        .map_err(|e| NormalizerError::Internal(format!("failed to serialize findings: {e}")))
}

/// Deliver the serialized findings to the sink.
pub async fn deliver(
    client: &reqwest::Client,
    sink: &OutputSink,
    body: &str,
) -> Result<(), NormalizerError> {
    match sink {
        OutputSink::Url(url) => upload(client, url, body).await,
        OutputSink::File(path) => tokio::fs::write(path, body)
            .await
            .map_err(|e| NormalizerError::upload(sink.describe(), &e)),
        OutputSink::Stdout => {
            let mut stdout = tokio::io::stdout();
            let written = async {
                stdout.write_all(body.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await
            };
            written
                .await
                .map_err(|e: std::io::Error| NormalizerError::upload(sink.describe(), &e))
        }
    }
}

async fn upload(client: &reqwest::Client, url: &str, body: &str) -> Result<(), NormalizerError> {
    tracing::debug!(url, bytes = body.len(), "Uploading findings");

    client
        .put(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| NormalizerError::upload(url, &e))?;

    Ok(())
}
