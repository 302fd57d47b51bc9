//! Naabu JSON-lines port-scan parser.

use crate::models::finding::{Finding, OsiLayer, Severity};
use crate::parsers::{is_present, json_lines, render, LineMode, ParseError, ParseResult, Parser};

/// Parser for `naabu -json` output. One finding per open port.
///
/// Lines that fail to parse are skipped, and a scan with no open ports yields
/// an empty result.
#[derive(Debug, Default)]
pub struct NaabuParser;

impl NaabuParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for NaabuParser {
    fn parse(&self, data: &str) -> Result<ParseResult, ParseError> {
        let collected = json_lines(data, LineMode::Lenient)?;
        let mut findings = Vec::with_capacity(collected.records.len());
        let mut skipped = collected.invalid;

        for record in collected.records {
            if !is_present(record.get("ip")) || !is_present(record.get("port")) {
                skipped += 1;
                continue;
            }

            let ip = render(record.get("ip"));
            let port = render(record.get("port"));
            findings.push(Finding {
                name: format!("Open port {port} on {ip}"),
                description: format!("Port {port} is open on host {ip}"),
                category: "Open Port".to_string(),
                location: format!("{ip}:{port}"),
                osi_layer: OsiLayer::Network,
                severity: self.map_severity(""),
                attributes: record,
            });
        }

        Ok(ParseResult {
            findings,
            skipped,
            source_tool: self.source_tool().to_string(),
        })
    }

    fn source_tool(&self) -> &str {
        "Naabu"
    }

    fn map_severity(&self, _tool_severity: &str) -> Severity {
        Severity::Informational
    }
}
