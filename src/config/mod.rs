use std::env;
use std::time::Duration;

use crate::errors::NormalizerError;
use crate::parsers::ScannerKind;

/// Log line encoding on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_format: LogFormat,
    pub http_timeout: Option<Duration>,
    pub default_scanner: ScannerKind,
    pub user_agent: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, NormalizerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NormalizerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("FINDINGNORM_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(other) => {
                return Err(NormalizerError::Config(format!(
                    "FINDINGNORM_LOG_FORMAT must be 'text' or 'json', got '{other}'"
                )))
            }
        };

        let http_timeout = match lookup("FINDINGNORM_HTTP_TIMEOUT_SECS") {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(NormalizerError::Config(format!(
                        "FINDINGNORM_HTTP_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    )))
                }
            },
        };

        let default_scanner = match lookup("FINDINGNORM_DEFAULT_SCANNER") {
            None => ScannerKind::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e| NormalizerError::Config(format!("FINDINGNORM_DEFAULT_SCANNER: {e}")))?,
        };

        Ok(Self {
            log_format,
            http_timeout,
            default_scanner,
            user_agent: lookup("FINDINGNORM_USER_AGENT")
                .unwrap_or_else(|| format!("findingnorm/{}", env!("CARGO_PKG_VERSION"))),
        })
    }
}
