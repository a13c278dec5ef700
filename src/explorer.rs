//! Top-level query API over a configuration analysis

use crate::criteria::Criteria;
use crate::factory::{FactoryError, NodeFactory};
use crate::output::{Formatter, JsonFormatter, Outputter};
use crate::path::{PathedResult, ResultPath};
use crate::report::{ReportBag, ReportSelection};
use crate::result::{ConfigAnalysis, ResultNode};
use crate::searcher::Searcher;
use crate::traversal::Traversal;
use thiserror::Error;

/// Error raised by explorer operations
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error("Configuration has errors:\n{content}")]
    ConfigurationHasErrors { content: String },
}

/// Which forest of the analysis a query runs over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Forest {
    #[default]
    All,
    ValueHosts,
    LookupKeys,
}

/// Counts, queries and reports over both forests of an analysis
pub struct ResultsExplorer<'a> {
    analysis: &'a ConfigAnalysis,
    factory: NodeFactory,
}

impl<'a> ResultsExplorer<'a> {
    /// Explorer using the built-in node wrappers
    pub fn new(analysis: &'a ConfigAnalysis) -> Self {
        Self::with_factory(analysis, NodeFactory::new())
    }

    /// Explorer using a caller-supplied factory (for custom features)
    pub fn with_factory(analysis: &'a ConfigAnalysis, factory: NodeFactory) -> Self {
        Self { analysis, factory }
    }

    pub fn analysis(&self) -> &'a ConfigAnalysis {
        self.analysis
    }

    pub fn factory(&self) -> &NodeFactory {
        &self.factory
    }

    fn roots(&self, forest: Forest) -> impl Iterator<Item = &'a [ResultNode]> {
        let analysis = self.analysis;
        let value_hosts = matches!(forest, Forest::All | Forest::ValueHosts)
            .then_some(analysis.value_host_results.as_slice());
        let lookup_keys = matches!(forest, Forest::All | Forest::LookupKeys)
            .then_some(analysis.lookup_key_results.as_slice());
        value_hosts.into_iter().chain(lookup_keys)
    }

    /// Collect every match in the chosen forests, value hosts first
    pub fn query(
        &self,
        forest: Forest,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<PathedResult<'a>>, ExplorerError> {
        let searcher = Searcher::new(criteria);
        let traversal = Traversal::new(&searcher, &self.factory);

        let mut found = Vec::new();
        for roots in self.roots(forest) {
            found.extend(traversal.collect_forest(roots)?);
        }
        log::debug!("{:?}: {} matches", forest, found.len());
        Ok(found)
    }

    /// First match in the chosen forests
    pub fn find(
        &self,
        forest: Forest,
        criteria: Option<&Criteria>,
    ) -> Result<Option<PathedResult<'a>>, ExplorerError> {
        let searcher = Searcher::new(criteria);
        let traversal = Traversal::new(&searcher, &self.factory);

        for roots in self.roots(forest) {
            if let Some(found) = traversal.find_in_forest(roots)? {
                log::debug!("{:?}: first match at {}", forest, found.path);
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Number of matching nodes in both forests; `None` counts everything
    pub fn count_matches(&self, criteria: Option<&Criteria>) -> Result<usize, ExplorerError> {
        Ok(self.query(Forest::All, criteria)?.len())
    }

    pub fn count_value_host_matches(
        &self,
        criteria: Option<&Criteria>,
    ) -> Result<usize, ExplorerError> {
        Ok(self.query(Forest::ValueHosts, criteria)?.len())
    }

    pub fn count_lookup_key_matches(
        &self,
        criteria: Option<&Criteria>,
    ) -> Result<usize, ExplorerError> {
        Ok(self.query(Forest::LookupKeys, criteria)?.len())
    }

    /// Every matching node of both forests, with its path
    pub fn query_matches(
        &self,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<PathedResult<'a>>, ExplorerError> {
        self.query(Forest::All, criteria)
    }

    pub fn query_value_host_matches(
        &self,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<PathedResult<'a>>, ExplorerError> {
        self.query(Forest::ValueHosts, criteria)
    }

    pub fn query_lookup_key_matches(
        &self,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<PathedResult<'a>>, ExplorerError> {
        self.query(Forest::LookupKeys, criteria)
    }

    /// Check if anything matches, stopping at the first hit
    pub fn has_any_match(&self, criteria: Option<&Criteria>) -> Result<bool, ExplorerError> {
        Ok(self.find(Forest::All, criteria)?.is_some())
    }

    pub fn has_value_host_match(&self, criteria: Option<&Criteria>) -> Result<bool, ExplorerError> {
        Ok(self.find(Forest::ValueHosts, criteria)?.is_some())
    }

    pub fn has_lookup_key_match(&self, criteria: Option<&Criteria>) -> Result<bool, ExplorerError> {
        Ok(self.find(Forest::LookupKeys, criteria)?.is_some())
    }

    /// First match across both forests, value hosts first
    pub fn find_first(
        &self,
        criteria: Option<&Criteria>,
    ) -> Result<Option<PathedResult<'a>>, ExplorerError> {
        self.find(Forest::All, criteria)
    }

    /// Find a previously collected result by its path.
    ///
    /// A candidate matches when it has the same number of path keys and every
    /// key of `path` is present on it (exactly, or else ignoring case) with
    /// the same identity ignoring case.
    pub fn get_by_path<'r, 'n>(
        path: &ResultPath,
        candidates: &'r [PathedResult<'n>],
    ) -> Option<&'r PathedResult<'n>> {
        candidates.iter().find(|candidate| {
            candidate.path.len() == path.len()
                && path.iter().all(|(key, identity)| {
                    let found = candidate
                        .path
                        .get(key)
                        .or_else(|| candidate.path.get_ignore_case(key));
                    match (found, identity) {
                        (Some(Some(actual)), Some(wanted)) => {
                            actual.to_lowercase() == wanted.to_lowercase()
                        }
                        (Some(None), None) => true,
                        _ => false,
                    }
                })
        })
    }

    fn errors(&self, forest: Forest) -> Result<Vec<PathedResult<'a>>, ExplorerError> {
        self.query(forest, Some(&Criteria::errors_only()))
    }

    /// Check if any node in either forest has error severity
    pub fn has_errors(&self) -> Result<bool, ExplorerError> {
        self.has_any_match(Some(&Criteria::errors_only()))
    }

    /// Fail with the error-severity results of both forests, if there are any.
    ///
    /// The content is produced by `outputter` when it returns some, otherwise
    /// by a pretty JSON formatter.
    pub fn throw_on_errors(
        &self,
        include_full_tree: bool,
        outputter: Option<&dyn Outputter>,
    ) -> Result<(), ExplorerError> {
        let value_host_errors = self.errors(Forest::ValueHosts)?;
        let lookup_key_errors = self.errors(Forest::LookupKeys)?;
        if value_host_errors.is_empty() && lookup_key_errors.is_empty() {
            return Ok(());
        }

        let bag = ReportBag {
            value_host_results: Some(value_host_errors),
            lookup_key_results: Some(lookup_key_errors),
            analysis: include_full_tree.then_some(self.analysis),
        };
        log::debug!("configuration has {} errors", bag.match_count());

        let content = outputter
            .and_then(|outputter| outputter.send(&bag))
            .unwrap_or_else(|| JsonFormatter::new().pretty().format(&bag));
        Err(ExplorerError::ConfigurationHasErrors { content })
    }

    fn select(
        &self,
        forest: Forest,
        selection: ReportSelection,
    ) -> Result<Option<Vec<PathedResult<'a>>>, ExplorerError> {
        match selection {
            ReportSelection::Omit => Ok(None),
            ReportSelection::All => self.query(forest, None).map(Some),
            ReportSelection::Matching(criteria) => self.query(forest, Some(&criteria)).map(Some),
        }
    }

    /// Gather the selected results of each forest into a report bag
    pub fn build_report_bag(
        &self,
        value_hosts: impl Into<ReportSelection>,
        lookup_keys: impl Into<ReportSelection>,
        include_full_tree: bool,
    ) -> Result<ReportBag<'a>, ExplorerError> {
        Ok(ReportBag {
            value_host_results: self.select(Forest::ValueHosts, value_hosts.into())?,
            lookup_key_results: self.select(Forest::LookupKeys, lookup_keys.into())?,
            analysis: include_full_tree.then_some(self.analysis),
        })
    }

    /// Build a report bag and hand it to `outputter`
    pub fn report(
        &self,
        value_hosts: impl Into<ReportSelection>,
        lookup_keys: impl Into<ReportSelection>,
        include_full_tree: bool,
        outputter: &dyn Outputter,
    ) -> Result<Option<String>, ExplorerError> {
        let bag = self.build_report_bag(value_hosts, lookup_keys, include_full_tree)?;
        Ok(outputter.send(&bag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{
        ConditionResult, CustomResult, LookupKeyResult, PropertyResult, ServiceResult, Severity,
        ValidatorResult, ValueHostResult,
    };
    use std::cell::RefCell;

    fn start_date_analysis() -> ConfigAnalysis {
        ConfigAnalysis::new(
            vec![ValueHostResult::new("startDate")
                .with_property(PropertyResult::new("dataType", Some(Severity::Info)))
                .into()],
            vec![LookupKeyResult::new("Date")
                .with_service(ResultNode::Identifier(ServiceResult::new(None, None)))
                .into()],
        )
    }

    fn lookup_key_error_analysis() -> ConfigAnalysis {
        ConfigAnalysis::new(
            vec![ValueHostResult::new("name")
                .with_validator(ValidatorResult::new("Required"))
                .into()],
            vec![LookupKeyResult::new("Money")
                .with_service(ResultNode::Identifier(ServiceResult::new(
                    Some(Severity::Error),
                    Some("No identifier registered"),
                )))
                .into()],
        )
    }

    fn paths(found: &[PathedResult<'_>]) -> Vec<String> {
        found.iter().map(|f| f.path.to_string()).collect()
    }

    #[test]
    fn test_query_by_feature() {
        let analysis = start_date_analysis();
        let explorer = ResultsExplorer::new(&analysis);

        let value_hosts = explorer
            .query_matches(Some(&Criteria::new().with_features(["ValueHost"])))
            .unwrap();
        assert_eq!(paths(&value_hosts), vec!["ValueHost: startDate"]);

        let properties = explorer
            .query_matches(Some(&Criteria::new().with_features(["Property"])))
            .unwrap();
        assert_eq!(
            paths(&properties),
            vec!["ValueHost: startDate > Property: dataType"]
        );
    }

    #[test]
    fn test_count_everything() {
        let analysis = start_date_analysis();
        let explorer = ResultsExplorer::new(&analysis);

        assert_eq!(explorer.count_matches(None).unwrap(), 4);
        assert_eq!(explorer.count_value_host_matches(None).unwrap(), 2);
        assert_eq!(explorer.count_lookup_key_matches(None).unwrap(), 2);
    }

    #[test]
    fn test_nested_conditions_get_suffixed_keys() {
        let analysis = ConfigAnalysis::new(
            vec![ValueHostResult::new("startDate")
                .with_enabler(ConditionResult::new("A").with_child(
                    ConditionResult::new("B").with_child(ConditionResult::new("C")),
                ))
                .into()],
            Vec::new(),
        );
        let explorer = ResultsExplorer::new(&analysis);

        let found = explorer.query_matches(Some(&Criteria::new())).unwrap();
        assert_eq!(found.len(), 4);
        assert_eq!(found[3].path.get("Condition"), Some(Some("A")));
        assert_eq!(found[3].path.get("Condition#2"), Some(Some("B")));
        assert_eq!(found[3].path.get("Condition#3"), Some(Some("C")));
    }

    #[test]
    fn test_has_errors_in_lookup_key_forest_only() {
        let analysis = lookup_key_error_analysis();
        let explorer = ResultsExplorer::new(&analysis);

        assert!(explorer.has_errors().unwrap());
        assert!(!explorer
            .has_value_host_match(Some(&Criteria::errors_only()))
            .unwrap());
        assert!(explorer
            .has_lookup_key_match(Some(&Criteria::errors_only()))
            .unwrap());
    }

    #[test]
    fn test_has_errors_ignores_pruning_ancestors() {
        let analysis = ConfigAnalysis::new(
            vec![ValueHostResult::new("a")
                .with_property(PropertyResult::new("label", Some(Severity::Error)))
                .into()],
            Vec::new(),
        );
        let explorer = ResultsExplorer::new(&analysis);
        assert!(explorer.has_errors().unwrap());
    }

    #[test]
    fn test_throw_on_errors_without_errors() {
        let analysis = start_date_analysis();
        let explorer = ResultsExplorer::new(&analysis);
        assert!(explorer.throw_on_errors(false, None).is_ok());
    }

    #[test]
    fn test_throw_on_errors_carries_json_content() {
        let analysis = lookup_key_error_analysis();
        let explorer = ResultsExplorer::new(&analysis);

        let err = explorer.throw_on_errors(false, None).unwrap_err();
        let ExplorerError::ConfigurationHasErrors { content } = &err else {
            panic!("expected configuration error, got {:?}", err);
        };
        assert!(content.contains("\"lookupKeyResults\""));
        assert!(content.contains("No identifier registered"));
        assert!(!content.contains("\"analysis\""));
        assert!(err.to_string().starts_with("Configuration has errors:\n"));
    }

    #[test]
    fn test_throw_on_errors_includes_full_tree() {
        let analysis = lookup_key_error_analysis();
        let explorer = ResultsExplorer::new(&analysis);

        let err = explorer.throw_on_errors(true, None).unwrap_err();
        assert!(err.to_string().contains("\"analysis\""));
        assert!(err.to_string().contains("\"errorCode\": \"Required\""));
    }

    struct Recording {
        sent: RefCell<usize>,
    }

    impl Outputter for Recording {
        fn send(&self, bag: &ReportBag<'_>) -> Option<String> {
            *self.sent.borrow_mut() += 1;
            Some(format!("{} errors", bag.match_count()))
        }
    }

    #[test]
    fn test_throw_on_errors_uses_outputter_content() {
        let analysis = lookup_key_error_analysis();
        let explorer = ResultsExplorer::new(&analysis);
        let outputter = Recording {
            sent: RefCell::new(0),
        };

        let err = explorer
            .throw_on_errors(false, Some(&outputter))
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration has errors:\n1 errors");
        assert_eq!(*outputter.sent.borrow(), 1);
    }

    #[test]
    fn test_build_report_bag_selections() {
        let analysis = lookup_key_error_analysis();
        let explorer = ResultsExplorer::new(&analysis);

        let bag = explorer.build_report_bag(false, true, false).unwrap();
        assert!(bag.value_host_results.is_none());
        assert_eq!(bag.lookup_key_results.as_ref().map(Vec::len), Some(2));
        assert!(bag.analysis.is_none());

        let bag = explorer
            .build_report_bag(
                Criteria::new().with_error_codes(["required"]),
                None::<Criteria>,
                true,
            )
            .unwrap();
        assert_eq!(bag.value_host_results.as_ref().map(Vec::len), Some(1));
        assert!(bag.lookup_key_results.is_none());
        assert!(bag.analysis.is_some());
    }

    #[test]
    fn test_report_sends_bag() {
        let analysis = lookup_key_error_analysis();
        let explorer = ResultsExplorer::new(&analysis);
        let outputter = Recording {
            sent: RefCell::new(0),
        };

        let content = explorer
            .report(Criteria::errors_only(), Criteria::errors_only(), false, &outputter)
            .unwrap();
        assert_eq!(content.as_deref(), Some("1 errors"));
    }

    #[test]
    fn test_get_by_path_round_trip() {
        let analysis = ConfigAnalysis::new(
            vec![
                ValueHostResult::new("startDate")
                    .with_property(PropertyResult::new("dataType", None))
                    .with_enabler(
                        ConditionResult::new("All").with_child(ConditionResult::new("Any")),
                    )
                    .into(),
                ValueHostResult::new("endDate").into(),
            ],
            vec![LookupKeyResult::new("Date")
                .with_service(ResultNode::Identifier(ServiceResult::new(None, None)))
                .into()],
        );
        let explorer = ResultsExplorer::new(&analysis);
        let found = explorer.query_matches(None).unwrap();

        for candidate in &found {
            let hit = ResultsExplorer::get_by_path(&candidate.path, &found).unwrap();
            assert!(std::ptr::eq(hit.result, candidate.result));
        }
    }

    #[test]
    fn test_get_by_path_ignores_case() {
        let analysis = start_date_analysis();
        let explorer = ResultsExplorer::new(&analysis);
        let found = explorer.query_matches(None).unwrap();

        let query = ResultPath::new()
            .with("valuehost", Some("STARTDATE"))
            .with("property", Some("datatype"));
        let hit = ResultsExplorer::get_by_path(&query, &found).unwrap();
        assert_eq!(hit.result.kind(), "Property");
    }

    #[test]
    fn test_get_by_path_key_count_must_match() {
        let analysis = start_date_analysis();
        let explorer = ResultsExplorer::new(&analysis);
        let found = explorer.query_matches(None).unwrap();

        let too_long = ResultPath::new()
            .with("ValueHost", Some("startDate"))
            .with("Property", Some("dataType"))
            .with("Extra", None);
        assert!(ResultsExplorer::get_by_path(&too_long, &found).is_none());

        let null_identity = ResultPath::new()
            .with("LookupKey", Some("Date"))
            .with("Identifier", None);
        assert!(ResultsExplorer::get_by_path(&null_identity, &found).is_some());

        let wrong_identity = ResultPath::new()
            .with("LookupKey", Some("Date"))
            .with("Identifier", Some("x"));
        assert!(ResultsExplorer::get_by_path(&wrong_identity, &found).is_none());
    }

    #[test]
    fn test_unregistered_custom_feature_fails() {
        let analysis = ConfigAnalysis::new(vec![CustomResult::new("Widget").into()], Vec::new());
        let explorer = ResultsExplorer::new(&analysis);

        let err = explorer.count_matches(None).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::Factory(FactoryError::UnregisteredFeature { .. })
        ));
    }
}
