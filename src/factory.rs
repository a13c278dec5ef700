//! Registry mapping features to explorer node constructors
//!
//! The registry comes pre-populated with one constructor per built-in
//! feature. Callers register constructors for their own `Custom` features
//! (or replace a built-in one) before handing the factory to the explorer.

use crate::nodes::{self, BoxedNode};
use crate::result::{feature, strip_feature_suffix, ResultNode};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error wrapping a result node
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("No explorer node registered for feature \"{feature}\"")]
    UnregisteredFeature { feature: String },

    #[error("Explorer node for \"{expected}\" cannot wrap a \"{found}\" result")]
    FeatureMismatch { expected: String, found: String },
}

impl FactoryError {
    /// A constructor was handed a node of the wrong variant
    pub fn mismatch(expected: &str, found: &ResultNode) -> Self {
        FactoryError::FeatureMismatch {
            expected: expected.to_string(),
            found: found.kind().to_string(),
        }
    }
}

/// Builds the wrapper for one raw node
pub type NodeConstructor = Arc<
    dyn for<'a> Fn(&'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> + Send + Sync,
>;

/// Feature-keyed registry of node constructors
#[derive(Clone)]
pub struct NodeFactory {
    constructors: HashMap<String, NodeConstructor>,
}

impl Default for NodeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeFactory")
            .field("features", &self.features())
            .finish()
    }
}

impl NodeFactory {
    /// Factory with every built-in feature registered
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(feature::VALUE_HOST, nodes::value_host_node);
        factory.register(feature::VALIDATOR, nodes::validator_node);
        factory.register(feature::CONDITION, nodes::condition_node);
        factory.register(feature::LOOKUP_KEY, nodes::lookup_key_node);
        factory.register(feature::IDENTIFIER, nodes::identifier_node);
        factory.register(feature::CONVERTER, nodes::converter_node);
        factory.register(feature::COMPARER, nodes::comparer_node);
        factory.register(feature::PARSER, nodes::parser_node);
        factory.register(feature::PARSERS_BY_CULTURE, nodes::parsers_by_culture_node);
        factory.register(feature::PARSER_FOUND, nodes::parser_found_node);
        factory.register(feature::FORMATTER, nodes::formatter_node);
        factory.register(feature::FORMATTERS_BY_CULTURE, nodes::formatters_by_culture_node);
        factory.register(feature::PROPERTY, nodes::property_node);
        factory.register(feature::LOCALIZED_PROPERTY, nodes::localized_property_node);
        factory.register(feature::ERROR, nodes::error_node);
        factory
    }

    /// Factory with nothing registered
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for a feature
    pub fn register<F>(&mut self, feature: &str, constructor: F)
    where
        F: for<'a> Fn(&'a ResultNode) -> Result<BoxedNode<'a>, FactoryError>
            + Send
            + Sync
            + 'static,
    {
        if self
            .constructors
            .insert(feature.to_string(), Arc::new(constructor))
            .is_some()
        {
            log::debug!("Replaced explorer node constructor for {}", feature);
        }
    }

    /// Check if a feature has a constructor
    pub fn is_registered(&self, feature: &str) -> bool {
        self.constructors.contains_key(strip_feature_suffix(feature))
    }

    /// Registered features, sorted
    pub fn features(&self) -> Vec<&str> {
        let mut features: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        features.sort_unstable();
        features
    }

    /// Wrap a raw node using the constructor registered for its feature
    pub fn create<'a>(&self, node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
        let feature = strip_feature_suffix(node.kind());
        match self.constructors.get(feature) {
            Some(constructor) => constructor(node),
            None => {
                log::warn!("No explorer node registered for feature {}", feature);
                Err(FactoryError::UnregisteredFeature {
                    feature: feature.to_string(),
                })
            }
        }
    }
}
