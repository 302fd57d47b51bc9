//! TLSX JSON-lines parser.
//!
//! One network-layer finding per probed host describing the negotiated TLS
//! version and cipher. Records without a host are skipped.

use crate::models::finding::{Finding, OsiLayer, Severity};
use crate::parsers::{is_present, json_lines, render, LineMode, ParseError, ParseResult, Parser};

/// Parser for `tlsx -json` output.
#[derive(Debug, Default)]
pub struct TlsxParser;

impl TlsxParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for TlsxParser {
    fn parse(&self, data: &str) -> Result<ParseResult, ParseError> {
        let records = json_lines(data, LineMode::Strict)?.records;
        let total = records.len();

        let findings: Vec<Finding> = records
            .into_iter()
            .filter(|record| is_present(record.get("host")))
            .map(|record| {
                let host = render(record.get("host"));
                Finding {
                    name: format!("TLSX Result for {host}"),
                    description: format!(
                        "TLS version {} with cipher {}",
                        render(record.get("tls_version")),
                        render(record.get("cipher"))
                    ),
                    category: "TLS Certificate Info".to_string(),
                    location: format!("{host}:{}", render(record.get("port"))),
                    osi_layer: OsiLayer::Network,
                    severity: self.map_severity(""),
                    attributes: record,
                }
            })
            .collect();

        Ok(ParseResult {
            skipped: total - findings.len(),
            findings,
            source_tool: self.source_tool().to_string(),
        })
    }

    fn source_tool(&self) -> &str {
        "TLSX"
    }

    /// TLSX reports no severity of its own; every handshake summary is `Low`.
    fn map_severity(&self, _tool_severity: &str) -> Severity {
        Severity::Low
    }
}
