//! JSON output formatter

use super::Formatter;
use crate::path::PathedResult;
use crate::report::ReportBag;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, bag: &ReportBag<'_>) -> String {
        self.to_json(bag)
    }

    fn format_result(&self, found: &PathedResult<'_>) -> String {
        self.to_json(found)
    }
}
