//! Unified error handling for a single normalizer invocation.

use std::error::Error as StdError;

use crate::parsers::ParseError;

/// Invocation error, one variant per pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum NormalizerError {
    #[error("Failed to fetch result from {origin}: {message}")]
    Fetch { origin: String, message: String },

    #[error("No input received.")]
    EmptyInput,

    #[error("Invalid input: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to upload findings to {destination}: {message}")]
    Upload {
        destination: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NormalizerError {
    /// Build a fetch error from any underlying cause, keeping its source chain.
    pub fn fetch(origin: impl Into<String>, cause: &(dyn StdError + 'static)) -> Self {
        Self::Fetch {
            origin: origin.into(),
            message: describe_chain(cause),
        }
    }

    /// Build an upload error from any underlying cause, keeping its source chain.
    pub fn upload(destination: impl Into<String>, cause: &(dyn StdError + 'static)) -> Self {
        Self::Upload {
            destination: destination.into(),
            message: describe_chain(cause),
        }
    }

    /// Soft errors end the run without signalling failure.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_soft() {
            0
        } else {
            1
        }
    }
}

/// Join an error and all of its sources into one line.
///
/// HTTP client errors keep the interesting part (connection refused, DNS
/// failure) in their source chain rather than in their own message.
pub fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
