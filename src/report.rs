//! Export-ready bag of query results

use crate::path::PathedResult;
use crate::result::{ConfigAnalysis, Severity};
use serde::Serialize;

/// What a report includes from one forest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportSelection {
    /// Leave this forest out of the report
    #[default]
    Omit,
    /// Every node of the forest
    All,
    /// Nodes matching the criteria
    Matching(crate::Criteria),
}

impl From<bool> for ReportSelection {
    fn from(include: bool) -> Self {
        if include {
            ReportSelection::All
        } else {
            ReportSelection::Omit
        }
    }
}

impl From<crate::Criteria> for ReportSelection {
    fn from(criteria: crate::Criteria) -> Self {
        ReportSelection::Matching(criteria)
    }
}

impl From<Option<crate::Criteria>> for ReportSelection {
    fn from(criteria: Option<crate::Criteria>) -> Self {
        criteria.map_or(ReportSelection::Omit, ReportSelection::Matching)
    }
}

/// Counts of matched nodes per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub unassigned: usize,
}

/// Filtered results handed to a formatter or outputter
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBag<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_host_results: Option<Vec<PathedResult<'a>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_key_results: Option<Vec<PathedResult<'a>>>,

    /// The complete raw analysis, for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<&'a ConfigAnalysis>,
}

impl<'a> ReportBag<'a> {
    /// Every included match, value hosts first
    pub fn matches(&self) -> impl Iterator<Item = &PathedResult<'a>> {
        self.value_host_results
            .iter()
            .flatten()
            .chain(self.lookup_key_results.iter().flatten())
    }

    /// Total number of included matches
    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    /// Check if the bag carries nothing at all
    pub fn is_empty(&self) -> bool {
        self.value_host_results.is_none()
            && self.lookup_key_results.is_none()
            && self.analysis.is_none()
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for found in self.matches() {
            match found.result.severity() {
                Some(Severity::Error) => counts.errors += 1,
                Some(Severity::Warning) => counts.warnings += 1,
                Some(Severity::Info) => counts.infos += 1,
                None => counts.unassigned += 1,
            }
        }
        counts
    }
}
