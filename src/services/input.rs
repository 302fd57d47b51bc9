//! Input resolution: fetch the raw scanner report from a URL, a file or stdin.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::NormalizerError;
use crate::parsers::ParseError;

/// Where the raw report is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Url(String),
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// Pick the source from the invocation arguments.
    ///
    /// A URL argument wins; an argument that is not a URL is ignored.
    pub fn select(url_arg: Option<&str>, file: Option<&Path>) -> Self {
        match (url_arg, file) {
            (Some(arg), _) if is_url(arg) => Self::Url(arg.to_string()),
            (_, Some(path)) => Self::File(path.to_path_buf()),
            _ => Self::Stdin,
        }
    }

    /// Human-readable name used in log lines and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "stdin".to_string(),
        }
    }
}

/// Whether an argument addresses a remote artifact (case-sensitive `http` prefix).
pub fn is_url(arg: &str) -> bool {
    arg.starts_with("http")
}

/// Read the report text, rejecting empty or whitespace-only input.
pub async fn resolve(
    client: &reqwest::Client,
    source: &InputSource,
) -> Result<String, NormalizerError> {
    let text = match source {
        InputSource::Url(url) => fetch(client, url).await?,
        InputSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| read_error(source, e))?,
        InputSource::Stdin => read_all(tokio::io::stdin())
            .await
            .map_err(|e| read_error(source, e))?,
    };

    ensure_not_empty(text)
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, NormalizerError> {
    tracing::debug!(url, "Fetching raw report");

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| NormalizerError::fetch(url, &e))?;

    response
        .text()
        .await
        .map_err(|e| NormalizerError::fetch(url, &e))
}

/// Classify a local read failure. Bytes that are not UTF-8 were read fine but
/// cannot be parsed, so they fail the parse stage rather than the fetch.
fn read_error(source: &InputSource, err: std::io::Error) -> NormalizerError {
    if err.kind() == std::io::ErrorKind::InvalidData {
        return ParseError::NotText(err.to_string()).into();
    }
    NormalizerError::fetch(source.describe(), &err)
}

/// Drain a reader into a string.
pub async fn read_all<R>(mut reader: R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}

fn ensure_not_empty(text: String) -> Result<String, NormalizerError> {
    if text.trim().is_empty() {
        return Err(NormalizerError::EmptyInput);
    }
    Ok(text)
}
