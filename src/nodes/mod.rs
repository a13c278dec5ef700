//! Explorer nodes: per-feature wrappers around raw result nodes
//!
//! A wrapper knows the feature and identity of the node it wraps, which
//! criteria dimensions apply to it, and which raw nodes are its children.
//! Wrappers are created on demand by the [`crate::NodeFactory`] for each
//! visit and borrow the tree for the duration of a single traversal.

mod builtin;

pub use builtin::*;

use crate::result::ResultNode;
use crate::searcher::{MatchOutcome, Searcher};

/// Wrapper produced by a registered node constructor
pub type BoxedNode<'a> = Box<dyn ExplorerNode<'a> + 'a>;

/// Contract every node wrapper implements
pub trait ExplorerNode<'a> {
    /// The wrapped raw node
    fn result(&self) -> &'a ResultNode;

    /// Feature used as the path key
    fn kind(&self) -> &'a str {
        self.result().kind()
    }

    /// Natural key shown in paths; `None` for features without one
    fn identity(&self) -> Option<&'a str>;

    /// Raw child nodes, in traversal order
    fn children(&self) -> Vec<&'a ResultNode> {
        Vec::new()
    }

    /// Severity dimension; most nodes only look at their own severity
    fn match_severity(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_severity(self.result().severity())
    }

    /// The feature-specific dimensions (value host name, error code, ...)
    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome;

    /// Combine feature, severity and own dimension.
    ///
    /// A definite mismatch on any of them is a mismatch; if none of them
    /// applies the node is `NotApplicable`; otherwise it matches.
    fn match_this(&self, searcher: &Searcher) -> MatchOutcome {
        if searcher.all_match() {
            return MatchOutcome::Match;
        }

        MatchOutcome::all([
            searcher.match_feature(Some(self.kind())),
            self.match_severity(searcher),
            self.match_own_dimension(searcher),
        ])
    }
}
