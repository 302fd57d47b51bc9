//! Core finding model with enums shared across all scanner parsers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the single attribute recorded on MobSF findings.
pub const SOURCE_ATTRIBUTE: &str = "source";

// -- Enums matching the canonical finding schema --

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Upper-case name as it appears in serialized findings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informational => "INFORMATIONAL",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OsiLayer {
    Application,
    Network,
}

// -- Core Finding --

/// A single normalized security observation.
///
/// Field order is the serialization order of the output array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub osi_layer: OsiLayer,
    pub severity: Severity,
    pub attributes: Map<String, Value>,
}

impl Finding {
    /// Attribute map holding only the report section a finding came from.
    pub fn source_attributes(source: &str) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert(SOURCE_ATTRIBUTE.to_string(), Value::from(source));
        attributes
    }
}
