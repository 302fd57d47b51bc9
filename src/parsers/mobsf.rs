//! MobSF static-analysis report parser.
//!
//! Maps the certificate and manifest sections of a MobSF JSON report to
//! application-layer findings. Certificate findings come first, then manifest
//! findings, each in report order. Every other report section is ignored.

use serde_json::{Map, Value};

use crate::models::finding::{Finding, OsiLayer, Severity};
use crate::parsers::{ParseError, ParseResult, Parser};

pub const CERTIFICATE_SOURCE: &str = "certificate_analysis";
pub const MANIFEST_SOURCE: &str = "manifest_analysis";

const CERTIFICATE_CATEGORY: &str = "Certificate Analysis";
const DEFAULT_MANIFEST_RULE: &str = "Manifest Analysis";
const DEFAULT_MANIFEST_SEVERITY: &str = "medium";

/// MobSF parser instance.
#[derive(Debug, Default)]
pub struct MobsfParser;

impl MobsfParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for MobsfParser {
    fn parse(&self, data: &str) -> Result<ParseResult, ParseError> {
        let report: Value = serde_json::from_str(data)?;
        let findings = normalize(&report)?;

        Ok(ParseResult {
            findings,
            skipped: 0,
            source_tool: self.source_tool().to_string(),
        })
    }

    fn source_tool(&self) -> &str {
        "MobSF"
    }

    fn map_severity(&self, tool_severity: &str) -> Severity {
        normalize_severity(tool_severity)
    }
}

/// Map a MobSF severity to the canonical scale. Unknown values become `Medium`.
pub fn normalize_severity(raw: &str) -> Severity {
    match raw.to_lowercase().as_str() {
        "info" => Severity::Informational,
        "warning" => Severity::Medium,
        "low" => Severity::Low,
        "high" => Severity::High,
        "critical" => Severity::Critical,
        _ => Severity::Medium,
    }
}

/// Convert a parsed MobSF report into canonical findings.
///
/// Missing or mistyped sections contribute nothing. A certificate entry that
/// is not a `[severity, description, name]` triple of strings, or a manifest
/// entry that is not an object, aborts with a `ParseError`.
pub fn normalize(report: &Value) -> Result<Vec<Finding>, ParseError> {
    if !report.is_object() {
        return Err(ParseError::NotAnObject(json_type(report)));
    }

    let certificate = section(report, CERTIFICATE_SOURCE, "certificate_findings");
    let manifest = section(report, MANIFEST_SOURCE, "manifest_findings");

    let mut findings = Vec::with_capacity(certificate.len() + manifest.len());
    for (i, entry) in certificate.iter().enumerate() {
        findings.push(certificate_finding(entry, i)?);
    }
    for (i, entry) in manifest.iter().enumerate() {
        findings.push(manifest_finding(entry, i)?);
    }
    Ok(findings)
}

/// Array at `report[analysis][key]`, or empty when any step is absent or mistyped.
fn section<'a>(report: &'a Value, analysis: &str, key: &str) -> &'a [Value] {
    report
        .get(analysis)
        .and_then(|a| a.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn certificate_finding(entry: &Value, index: usize) -> Result<Finding, ParseError> {
    let record_error = |message: String| ParseError::Record {
        record_index: index,
        field: "certificate_findings".to_string(),
        message,
    };

    let tuple = entry.as_array().ok_or_else(|| {
        record_error(format!(
            "expected a [severity, description, name] array, found {}",
            json_type(entry)
        ))
    })?;
    let [severity, description, name] = tuple.as_slice() else {
        return Err(record_error(format!(
            "expected 3 elements, found {}",
            tuple.len()
        )));
    };

    let text = |value: &Value, position: &str| {
        value.as_str().map(str::to_string).ok_or_else(|| {
            record_error(format!("{position} must be a string, found {}", json_type(value)))
        })
    };
    let severity = text(severity, "severity")?;

    Ok(Finding {
        name: text(name, "name")?,
        description: text(description, "description")?,
        category: CERTIFICATE_CATEGORY.to_string(),
        location: String::new(),
        osi_layer: OsiLayer::Application,
        severity: normalize_severity(&severity),
        attributes: Finding::source_attributes(CERTIFICATE_SOURCE),
    })
}

fn manifest_finding(entry: &Value, index: usize) -> Result<Finding, ParseError> {
    let object = entry.as_object().ok_or_else(|| ParseError::Record {
        record_index: index,
        field: "manifest_findings".to_string(),
        message: format!("expected an object, found {}", json_type(entry)),
    })?;

    let severity = text_field(object, "severity").unwrap_or(DEFAULT_MANIFEST_SEVERITY);
    let name = text_field(object, "name")
        .or_else(|| text_field(object, "title"))
        .unwrap_or_default();

    // Non-string component entries are dropped rather than stringified.
    let location = object
        .get("component")
        .and_then(Value::as_array)
        .map(|components| {
            components
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    Ok(Finding {
        name: name.to_string(),
        description: text_field(object, "description").unwrap_or_default().to_string(),
        category: text_field(object, "rule")
            .unwrap_or(DEFAULT_MANIFEST_RULE)
            .to_string(),
        location,
        osi_layer: OsiLayer::Application,
        severity: normalize_severity(severity),
        attributes: Finding::source_attributes(MANIFEST_SOURCE),
    })
}

/// String field of a manifest entry; other JSON types count as absent.
fn text_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
