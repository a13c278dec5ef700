//! Outputters that deliver a formatted report

use super::{Formatter, Outputter};
use crate::report::ReportBag;

/// Prints the formatted report to stdout
pub struct ConsoleOutputter {
    formatter: Box<dyn Formatter>,
}

impl ConsoleOutputter {
    pub fn new(formatter: Box<dyn Formatter>) -> Self {
        Self { formatter }
    }
}

impl Outputter for ConsoleOutputter {
    fn send(&self, bag: &ReportBag<'_>) -> Option<String> {
        let content = self.formatter.format(bag);
        println!("{}", content);
        Some(content)
    }
}

/// Writes the formatted report through the `log` facade.
///
/// Returns `None`, so callers that need the content fall back to their own
/// formatter.
pub struct LoggerOutputter {
    formatter: Box<dyn Formatter>,
    level: log::Level,
}

impl LoggerOutputter {
    pub fn new(formatter: Box<dyn Formatter>, level: log::Level) -> Self {
        Self { formatter, level }
    }
}

impl Outputter for LoggerOutputter {
    fn send(&self, bag: &ReportBag<'_>) -> Option<String> {
        log::log!(self.level, "{}", self.formatter.format(bag));
        None
    }
}
