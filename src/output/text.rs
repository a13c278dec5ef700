//! Human-readable text output formatter

use super::Formatter;
use crate::path::PathedResult;
use crate::report::ReportBag;
use crate::result::Severity;
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show analyzer messages
    pub show_messages: bool,

    /// Show the severity summary line
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_messages: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Option<Severity>) -> ColoredString {
        let s = match severity {
            Some(severity) => format!("{:<7}", severity.to_string()),
            None => format!("{:<7}", "-"),
        };
        if !self.colored {
            return s.normal();
        }
        match severity {
            Some(Severity::Error) => s.red().bold(),
            Some(Severity::Warning) => s.yellow().bold(),
            Some(Severity::Info) => s.blue(),
            None => s.dimmed(),
        }
    }

    fn heading(&self, title: &str, count: usize) -> String {
        let s = format!("{} ({})", title, count);
        if self.colored {
            s.underline().to_string()
        } else {
            s
        }
    }

    fn count_str(&self, count: usize, singular: &str, plural: &str, color: Color) -> String {
        let s = format!("{} {}", count, if count == 1 { singular } else { plural });
        if self.colored {
            s.color(color).to_string()
        } else {
            s
        }
    }

    fn push_section(&self, output: &mut String, title: &str, results: &[PathedResult<'_>]) {
        output.push_str(&self.heading(title, results.len()));
        output.push('\n');
        if results.is_empty() {
            output.push_str("  no matches\n");
        }
        for found in results {
            output.push_str("  ");
            output.push_str(&self.format_result(found));
            output.push('\n');
        }
        output.push('\n');
    }
}

impl Formatter for TextFormatter {
    fn format(&self, bag: &ReportBag<'_>) -> String {
        let mut output = String::new();

        if let Some(results) = &bag.value_host_results {
            self.push_section(&mut output, "Value host results", results);
        }
        if let Some(results) = &bag.lookup_key_results {
            self.push_section(&mut output, "Lookup key results", results);
        }
        if let Some(analysis) = bag.analysis {
            output.push_str(&format!(
                "Full analysis: {} value hosts, {} lookup keys, {} cultures\n\n",
                analysis.value_host_results.len(),
                analysis.lookup_key_results.len(),
                analysis.culture_ids.len()
            ));
        }

        if self.show_stats {
            let total = bag.match_count();
            output.push_str(&format!(
                "{} {}",
                total,
                if total == 1 { "match" } else { "matches" }
            ));

            let counts = bag.severity_counts();
            let mut parts = Vec::new();
            if counts.errors > 0 {
                parts.push(self.count_str(counts.errors, "error", "errors", Color::Red));
            }
            if counts.warnings > 0 {
                parts.push(self.count_str(counts.warnings, "warning", "warnings", Color::Yellow));
            }
            if counts.infos > 0 {
                parts.push(self.count_str(counts.infos, "info", "infos", Color::Blue));
            }
            if !parts.is_empty() {
                output.push_str(&format!(": {}", parts.join(", ")));
            }
            output.push('\n');
        }

        output
    }

    fn format_result(&self, found: &PathedResult<'_>) -> String {
        let path = if self.colored {
            found.path.to_string().cyan().to_string()
        } else {
            found.path.to_string()
        };

        let mut line = format!("{} {}", self.severity_str(found.result.severity()), path);
        if self.show_messages {
            if let Some(message) = found.result.message() {
                line.push_str(&format!(" - {}", message));
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ResultPath;
    use crate::result::{ConfigAnalysis, PropertyResult, ResultNode};

    fn warning_node() -> ResultNode {
        PropertyResult::new("label", Some(Severity::Warning))
            .with_message("Label is empty")
            .into()
    }

    #[test]
    fn test_format_result() {
        let node = warning_node();
        let found = PathedResult::new(
            ResultPath::new()
                .with("ValueHost", Some("name"))
                .with("Property", Some("label")),
            &node,
        );

        let output = TextFormatter::new().without_color().format_result(&found);
        assert_eq!(
            output,
            "warning ValueHost: name > Property: label - Label is empty"
        );
    }

    #[test]
    fn test_format_bag() {
        let node = warning_node();
        let analysis = ConfigAnalysis::default();
        let bag = ReportBag {
            value_host_results: Some(vec![PathedResult::new(
                ResultPath::new().with("Property", Some("label")),
                &node,
            )]),
            lookup_key_results: Some(Vec::new()),
            analysis: Some(&analysis),
        };

        let output = TextFormatter::new().without_color().format(&bag);
        assert!(output.contains("Value host results (1)"));
        assert!(output.contains("Lookup key results (0)\n  no matches"));
        assert!(output.contains("Full analysis: 0 value hosts"));
        assert!(output.contains("1 match: 1 warning"));
    }

    #[test]
    fn test_format_omitted_sections() {
        let output = TextFormatter::new().without_color().format(&ReportBag::default());
        assert!(!output.contains("Value host results"));
        assert!(!output.contains("Lookup key results"));
        assert_eq!(output, "0 matches\n");
    }
}
