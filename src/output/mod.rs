//! Formatters and outputters for report bags

mod json;
mod outputter;
mod text;

pub use json::JsonFormatter;
pub use outputter::{ConsoleOutputter, LoggerOutputter};
pub use text::TextFormatter;

use crate::config::OutputFormat;
use crate::path::PathedResult;
use crate::report::ReportBag;

/// Pure transform of a report bag into text
pub trait Formatter: Send + Sync {
    /// Format the entire report
    fn format(&self, bag: &ReportBag<'_>) -> String;

    /// Format a single match
    fn format_result(&self, found: &PathedResult<'_>) -> String;
}

/// Delivers a report somewhere (console, log, ...)
pub trait Outputter {
    /// Deliver the report, returning the content produced if there is any
    fn send(&self, bag: &ReportBag<'_>) -> Option<String>;
}

/// Formatter for an output format
pub fn get_formatter(format: OutputFormat, pretty: bool, colored: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new();
            Box::new(if pretty { formatter.pretty() } else { formatter })
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new();
            Box::new(if colored {
                formatter
            } else {
                formatter.without_color()
            })
        }
    }
}
