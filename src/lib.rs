//! Analysis Explorer - query engine for configuration analysis results
//!
//! A configuration analysis produces two forests of result nodes: one root per
//! value host and one root per lookup key. The explorer filters those forests
//! with [`Criteria`], counts or collects the matches together with the
//! [`ResultPath`] that reaches each one, and packages them into a
//! [`ReportBag`] for formatting.
//!
//! # Architecture
//!
//! ```text
//! ResultsExplorer -> Traversal -> NodeFactory -> ExplorerNode -> Searcher
//! ```
//!
//! Matching is tri-valued: a node either matches, mismatches, or has nothing
//! the criteria can judge it by. Only definite matches are returned and only
//! definite mismatches prune.
//!
//! # Custom features
//!
//! Nodes with an unknown `feature` are kept as [`CustomResult`]. Register a
//! constructor for the feature to make them searchable:
//!
//! ```no_run
//! use analysis_explorer::{
//!     BoxedNode, ConfigAnalysis, ExplorerNode, FactoryError, MatchOutcome, NodeFactory,
//!     ResultNode, ResultsExplorer, Searcher,
//! };
//!
//! struct WidgetNode<'a>(&'a ResultNode);
//!
//! impl<'a> ExplorerNode<'a> for WidgetNode<'a> {
//!     fn result(&self) -> &'a ResultNode {
//!         self.0
//!     }
//!
//!     fn identity(&self) -> Option<&'a str> {
//!         match self.0 {
//!             ResultNode::Custom(custom) => custom.field_str("widgetName"),
//!             _ => None,
//!         }
//!     }
//!
//!     fn match_own_dimension(&self, _searcher: &Searcher) -> MatchOutcome {
//!         MatchOutcome::NotApplicable
//!     }
//! }
//!
//! fn widget_node<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
//!     Ok(Box::new(WidgetNode(node)))
//! }
//!
//! let mut factory = NodeFactory::new();
//! factory.register("Widget", widget_node);
//!
//! let analysis = ConfigAnalysis::default();
//! let explorer = ResultsExplorer::with_factory(&analysis, factory);
//! assert_eq!(explorer.count_matches(None).unwrap(), 0);
//! ```

pub mod config;
pub mod criteria;
pub mod explorer;
pub mod factory;
pub mod nodes;
pub mod output;
pub mod path;
pub mod report;
pub mod result;
pub mod searcher;
pub mod traversal;

// Re-export main types
pub use config::{ColorMode, Config, ConfigError, OutputFormat};
pub use criteria::Criteria;
pub use explorer::{ExplorerError, Forest, ResultsExplorer};
pub use factory::{FactoryError, NodeConstructor, NodeFactory};
pub use nodes::{BoxedNode, ExplorerNode};
pub use output::{
    get_formatter, ConsoleOutputter, Formatter, JsonFormatter, LoggerOutputter, Outputter,
    TextFormatter,
};
pub use path::{PathedResult, ResultPath};
pub use report::{ReportBag, ReportSelection, SeverityCounts};
pub use result::{ConfigAnalysis, CustomResult, LoadError, ResultNode, Severity};
pub use searcher::{MatchOutcome, Searcher};
pub use traversal::Traversal;
