//! Wrappers for the built-in result features

use super::{BoxedNode, ExplorerNode};
use crate::factory::FactoryError;
use crate::result::{
    feature, ConditionResult, FormatterResult, FormattersByCultureResult,
    LocalizedPropertyResult, LookupKeyResult, ParserFoundResult, ParserResult,
    ParsersByCultureResult, PropertyResult, ResultNode, ValidatorResult,
    ValueHostResult,
};
use crate::searcher::{MatchOutcome, Searcher};

/// Service names used by the `serviceNames` criteria dimension
pub mod service {
    pub const IDENTIFIER: &str = "identifier";
    pub const CONVERTER: &str = "converter";
    pub const COMPARER: &str = "comparer";
    pub const PARSER: &str = "parser";
    pub const FORMATTER: &str = "formatter";
}

/// Declares a wrapper struct and the constructor that unwraps its variant
macro_rules! explorer_node {
    ($(#[$meta:meta])* $name:ident, $ctor:ident, $variant:ident, $result:ty) => {
        $(#[$meta])*
        pub struct $name<'a> {
            node: &'a ResultNode,
            result: &'a $result,
        }

        #[doc = concat!("Constructor registered for `", stringify!($variant), "` nodes")]
        pub fn $ctor<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
            match node {
                ResultNode::$variant(result) => Ok(Box::new($name { node, result })),
                other => Err(FactoryError::mismatch(stringify!($variant), other)),
            }
        }
    };
}

explorer_node!(
    /// Root of the value host forest
    ValueHostNode, value_host_node, ValueHost, ValueHostResult
);

impl<'a> ExplorerNode<'a> for ValueHostNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.value_host_name.as_str())
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result
            .properties
            .iter()
            .chain(self.result.validator_results.iter())
            .chain(self.result.enabler_condition_result.as_deref())
            .collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_value_host_name(Some(self.result.value_host_name.as_str()))
    }
}

explorer_node!(ValidatorNode, validator_node, Validator, ValidatorResult);

impl<'a> ExplorerNode<'a> for ValidatorNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.error_code.as_str())
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result
            .properties
            .iter()
            .chain(self.result.condition_result.as_deref())
            .collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_error_code(Some(self.result.error_code.as_str()))
    }
}

explorer_node!(
    /// Conditions nest, so a path may hold several `Condition` keys
    ConditionNode, condition_node, Condition, ConditionResult
);

impl<'a> ExplorerNode<'a> for ConditionNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.condition_type.as_str())
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result
            .properties
            .iter()
            .chain(self.result.children_results.iter())
            .collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_condition_type(Some(self.result.condition_type.as_str()))
    }
}

explorer_node!(
    /// Root of the lookup key forest
    LookupKeyNode, lookup_key_node, LookupKey, LookupKeyResult
);

impl<'a> ExplorerNode<'a> for LookupKeyNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.lookup_key.as_str())
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result.service_results.iter().collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_lookup_key(Some(self.result.lookup_key.as_str()))
    }
}

/// Identifier, converter and comparer checks: leaves matched by service name
pub struct ServiceNode<'a> {
    node: &'a ResultNode,
    service: &'static str,
}

impl<'a> ServiceNode<'a> {
    fn boxed(node: &'a ResultNode, service: &'static str) -> BoxedNode<'a> {
        Box::new(ServiceNode { node, service })
    }
}

/// Constructor registered for `Identifier` nodes
pub fn identifier_node<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
    match node {
        ResultNode::Identifier(_) => Ok(ServiceNode::boxed(node, service::IDENTIFIER)),
        other => Err(FactoryError::mismatch(feature::IDENTIFIER, other)),
    }
}

/// Constructor registered for `Converter` nodes
pub fn converter_node<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
    match node {
        ResultNode::Converter(_) => Ok(ServiceNode::boxed(node, service::CONVERTER)),
        other => Err(FactoryError::mismatch(feature::CONVERTER, other)),
    }
}

/// Constructor registered for `Comparer` nodes
pub fn comparer_node<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
    match node {
        ResultNode::Comparer(_) => Ok(ServiceNode::boxed(node, service::COMPARER)),
        other => Err(FactoryError::mismatch(feature::COMPARER, other)),
    }
}

impl<'a> ExplorerNode<'a> for ServiceNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        None
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_service_name(Some(self.service))
    }
}

explorer_node!(ParserNode, parser_node, Parser, ParserResult);

impl<'a> ExplorerNode<'a> for ParserNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        None
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result.results.iter().collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_service_name(Some(service::PARSER))
    }
}

explorer_node!(
    ParsersByCultureNode,
    parsers_by_culture_node,
    ParsersByCulture,
    ParsersByCultureResult
);

impl<'a> ExplorerNode<'a> for ParsersByCultureNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.culture_id.as_str())
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result.parser_results.iter().collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher
            .match_culture_id(Some(self.result.culture_id.as_str()))
            .and(searcher.match_service_name(Some(service::PARSER)))
    }
}

explorer_node!(ParserFoundNode, parser_found_node, ParserFound, ParserFoundResult);

impl<'a> ExplorerNode<'a> for ParserFoundNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.class_found.as_str())
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_service_name(Some(service::PARSER))
    }
}

explorer_node!(FormatterNode, formatter_node, Formatter, FormatterResult);

impl<'a> ExplorerNode<'a> for FormatterNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        None
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        self.result.results.iter().collect()
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_service_name(Some(service::FORMATTER))
    }
}

explorer_node!(
    FormattersByCultureNode,
    formatters_by_culture_node,
    FormattersByCulture,
    FormattersByCultureResult
);

impl<'a> ExplorerNode<'a> for FormattersByCultureNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.requested_culture_id.as_str())
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher
            .match_culture_id(Some(self.result.requested_culture_id.as_str()))
            .and(searcher.match_service_name(Some(service::FORMATTER)))
    }
}

explorer_node!(PropertyNode, property_node, Property, PropertyResult);

impl<'a> ExplorerNode<'a> for PropertyNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.property_name.as_str())
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_property_name(Some(self.result.property_name.as_str()))
    }
}

explorer_node!(
    /// Localizable property; each culture entry carries its own severity
    LocalizedPropertyNode,
    localized_property_node,
    LocalizedProperty,
    LocalizedPropertyResult
);

impl<'a> LocalizedPropertyNode<'a> {
    fn match_name(&self, searcher: &Searcher) -> MatchOutcome {
        let l10n = searcher.match_property_name(Some(self.result.l10n_property_name.as_str()));
        match (&self.result.property_name, l10n) {
            (_, MatchOutcome::Match) | (None, _) => l10n,
            (Some(name), _) => searcher.match_property_name(Some(name.as_str())),
        }
    }

    fn match_culture(&self, searcher: &Searcher) -> MatchOutcome {
        self.result
            .culture_text
            .keys()
            .map(|culture_id| searcher.match_culture_id(Some(culture_id.as_str())))
            .find(|outcome| outcome.is_match())
            .unwrap_or_else(|| searcher.match_culture_id(None))
    }
}

impl<'a> ExplorerNode<'a> for LocalizedPropertyNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        Some(self.result.l10n_property_name.as_str())
    }

    /// A culture entry with a matching severity counts even when the
    /// node's own severity differs.
    fn match_severity(&self, searcher: &Searcher) -> MatchOutcome {
        let culture_match = self
            .result
            .culture_text
            .values()
            .filter_map(|text| text.severity)
            .any(|severity| searcher.match_severity(Some(severity)).is_match());

        if culture_match {
            MatchOutcome::Match
        } else {
            searcher.match_severity(self.result.severity)
        }
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        self.match_name(searcher).and(self.match_culture(searcher))
    }
}

/// Analyzer failure; only feature and severity apply
pub struct ErrorNode<'a> {
    node: &'a ResultNode,
}

/// Constructor registered for `Error` nodes
pub fn error_node<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
    match node {
        ResultNode::Error(_) => Ok(Box::new(ErrorNode { node })),
        other => Err(FactoryError::mismatch(feature::ERROR, other)),
    }
}

impl<'a> ExplorerNode<'a> for ErrorNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        None
    }

    fn match_own_dimension(&self, _searcher: &Searcher) -> MatchOutcome {
        MatchOutcome::NotApplicable
    }
}
