//! Scanner output parsers for normalizing findings from various tools.
//!
//! Each parser implements the `Parser` trait, producing canonical `Finding`
//! records from tool-specific formats (a single JSON report or JSON lines).

pub mod mobsf;
pub mod naabu;
pub mod tlsx;

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::models::finding::{Finding, Severity};

/// Result of parsing a scanner output document.
#[derive(Debug)]
pub struct ParseResult {
    pub findings: Vec<Finding>,
    /// Records dropped because they carried nothing to report or failed to parse.
    pub skipped: usize,
    pub source_tool: String,
}

/// Error that aborts parsing of a scanner output document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: invalid JSON: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field}[{record_index}]: {message}")]
    Record {
        record_index: usize,
        field: String,
        message: String,
    },

    #[error("report must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("no JSON objects found in input")]
    NoRecords,

    #[error("input is not UTF-8 text: {0}")]
    NotText(String),
}

/// Trait for pluggable scanner output parsers.
pub trait Parser: Send + Sync {
    /// Parse raw scanner output into canonical findings.
    fn parse(&self, data: &str) -> Result<ParseResult, ParseError>;

    /// The scanner tool name this parser handles.
    fn source_tool(&self) -> &str;

    /// Map tool-specific severity string to canonical severity.
    fn map_severity(&self, tool_severity: &str) -> Severity;
}

/// Supported scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScannerKind {
    #[default]
    Mobsf,
    Tlsx,
    Naabu,
}

impl ScannerKind {
    /// Parser instance for this scanner's output format.
    pub fn parser(self) -> Box<dyn Parser> {
        match self {
            Self::Mobsf => Box::new(mobsf::MobsfParser::new()),
            Self::Tlsx => Box::new(tlsx::TlsxParser::new()),
            Self::Naabu => Box::new(naabu::NaabuParser::new()),
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobsf => write!(f, "mobsf"),
            Self::Tlsx => write!(f, "tlsx"),
            Self::Naabu => write!(f, "naabu"),
        }
    }
}

impl FromStr for ScannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mobsf" => Ok(Self::Mobsf),
            "tlsx" => Ok(Self::Tlsx),
            "naabu" => Ok(Self::Naabu),
            other => Err(format!("unknown scanner '{other}' (expected mobsf, tlsx or naabu)")),
        }
    }
}

/// How a JSON-lines collector treats malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineMode {
    /// A malformed `{` line, or no object at all, aborts parsing.
    Strict,
    /// Malformed `{` lines are counted and dropped; no objects is an empty result.
    Lenient,
}

/// JSON objects collected from a JSON-lines document.
#[derive(Debug, Default)]
pub(crate) struct JsonLines {
    pub records: Vec<Map<String, Value>>,
    /// `{` lines dropped in lenient mode because they failed to parse.
    pub invalid: usize,
}

/// Collect the JSON objects of a JSON-lines document.
///
/// Only lines starting with `{` after trimming are considered; banners and
/// progress output interleaved by the scanner are ignored.
pub(crate) fn json_lines(data: &str, mode: LineMode) -> Result<JsonLines, ParseError> {
    let mut collected = JsonLines::default();
    for (i, line) in data.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with('{') {
            continue;
        }
        match serde_json::from_str::<Map<String, Value>>(line) {
            Ok(record) => collected.records.push(record),
            Err(source) if mode == LineMode::Strict => {
                return Err(ParseError::Line { line: i + 1, source })
            }
            Err(e) => {
                tracing::debug!(line = i + 1, error = %e, "Dropping malformed record");
                collected.invalid += 1;
            }
        }
    }

    if mode == LineMode::Strict && collected.records.is_empty() {
        return Err(ParseError::NoRecords);
    }
    Ok(collected)
}

/// Whether a record field holds a usable value (present, non-null, non-empty, non-zero).
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::Bool(b)) => *b,
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Render a record field for use inside a finding template.
pub(crate) fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
