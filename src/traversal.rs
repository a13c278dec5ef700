//! Recursive match/collect/find-one walks over the result tree
//!
//! The walks only go through the [`ExplorerNode`] contract and the
//! [`NodeFactory`], so they work for every registered feature. Children of a
//! node that definitely mismatched are skipped when the criteria ask for
//! pruning; a `NotApplicable` node never prunes.

use crate::factory::{FactoryError, NodeFactory};
use crate::nodes::ExplorerNode;
use crate::path::{PathedResult, ResultPath};
use crate::result::ResultNode;
use crate::searcher::{MatchOutcome, Searcher};

/// One compiled search over a factory's node wrappers
pub struct Traversal<'s> {
    searcher: &'s Searcher,
    factory: &'s NodeFactory,
}

impl<'s> Traversal<'s> {
    pub fn new(searcher: &'s Searcher, factory: &'s NodeFactory) -> Self {
        Self { searcher, factory }
    }

    fn should_descend(&self, outcome: MatchOutcome) -> bool {
        !(outcome.is_mismatch() && self.searcher.prune_on_parent_mismatch())
    }

    /// Depth-first search for the first match below (and including) `node`
    pub fn find_one<'a>(
        &self,
        node: &'a ResultNode,
        path: &ResultPath,
    ) -> Result<Option<PathedResult<'a>>, FactoryError> {
        let wrapper = self.factory.create(node)?;
        let path = path.extended(wrapper.kind(), wrapper.identity());
        let outcome = wrapper.match_this(self.searcher);
        log::trace!("find_one {} -> {:?}", path, outcome);

        if outcome.is_match() {
            return Ok(Some(PathedResult::new(path, node)));
        }

        if self.should_descend(outcome) {
            for child in wrapper.children() {
                if let Some(found) = self.find_one(child, &path)? {
                    return Ok(Some(found));
                }
            }
        }

        Ok(None)
    }

    /// Check if anything below (and including) `node` matches
    pub fn has_match(&self, node: &ResultNode) -> Result<bool, FactoryError> {
        Ok(self.find_one(node, &ResultPath::new())?.is_some())
    }

    /// Append every match below (and including) `node` in pre-order
    pub fn collect<'a>(
        &self,
        node: &'a ResultNode,
        path: &ResultPath,
        found: &mut Vec<PathedResult<'a>>,
    ) -> Result<(), FactoryError> {
        let wrapper = self.factory.create(node)?;
        let path = path.extended(wrapper.kind(), wrapper.identity());
        let outcome = wrapper.match_this(self.searcher);
        log::trace!("collect {} -> {:?}", path, outcome);

        let descend = self.should_descend(outcome);
        let children = if descend { wrapper.children() } else { Vec::new() };

        if outcome.is_match() {
            found.push(PathedResult::new(path.clone(), node));
        }

        for child in children {
            self.collect(child, &path, found)?;
        }

        Ok(())
    }

    /// Collect across every root of a forest
    pub fn collect_forest<'a>(
        &self,
        roots: &'a [ResultNode],
    ) -> Result<Vec<PathedResult<'a>>, FactoryError> {
        let mut found = Vec::new();
        let root_path = ResultPath::new();
        for root in roots {
            self.collect(root, &root_path, &mut found)?;
        }
        Ok(found)
    }

    /// First match in a forest, roots in order
    pub fn find_in_forest<'a>(
        &self,
        roots: &'a [ResultNode],
    ) -> Result<Option<PathedResult<'a>>, FactoryError> {
        let root_path = ResultPath::new();
        for root in roots {
            if let Some(found) = self.find_one(root, &root_path)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
