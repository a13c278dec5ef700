//! Analysis result tree types
//!
//! The tree is produced once by the configuration analyzers and handed to the
//! explorer as read-only input. Every node carries a `feature` discriminator
//! on the wire; built-in features map onto the variants of [`ResultNode`] and
//! anything else is kept as a [`CustomResult`] for caller-registered wrappers.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Built-in feature names
pub mod feature {
    pub const VALUE_HOST: &str = "ValueHost";
    pub const VALIDATOR: &str = "Validator";
    pub const CONDITION: &str = "Condition";
    pub const LOOKUP_KEY: &str = "LookupKey";
    pub const IDENTIFIER: &str = "Identifier";
    pub const CONVERTER: &str = "Converter";
    pub const COMPARER: &str = "Comparer";
    pub const PARSER: &str = "Parser";
    pub const PARSERS_BY_CULTURE: &str = "ParsersByCulture";
    pub const PARSER_FOUND: &str = "ParserFound";
    pub const FORMATTER: &str = "Formatter";
    pub const FORMATTERS_BY_CULTURE: &str = "FormattersByCulture";
    pub const PROPERTY: &str = "Property";
    pub const LOCALIZED_PROPERTY: &str = "LocalizedProperty";
    pub const ERROR: &str = "Error";

    /// All built-in features, in declaration order
    pub const ALL: &[&str] = &[
        VALUE_HOST,
        VALIDATOR,
        CONDITION,
        LOOKUP_KEY,
        IDENTIFIER,
        CONVERTER,
        COMPARER,
        PARSER,
        PARSERS_BY_CULTURE,
        PARSER_FOUND,
        FORMATTER,
        FORMATTERS_BY_CULTURE,
        PROPERTY,
        LOCALIZED_PROPERTY,
        ERROR,
    ];
}

/// Error loading an analysis from disk or text
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Severity of an issue reported on a result node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Strip a trailing `#N` disambiguation suffix from a feature name.
///
/// `"Condition#3"` becomes `"Condition"`; names without a numeric suffix are
/// returned unchanged.
pub fn strip_feature_suffix(feature: &str) -> &str {
    match feature.rsplit_once('#') {
        Some((base, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => base,
        _ => feature,
    }
}

/// Result for one value host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHostResult {
    pub value_host_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_host_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ResultNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validator_results: Vec<ResultNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabler_condition_result: Option<Box<ResultNode>>,
}

impl ValueHostResult {
    pub fn new(value_host_name: &str) -> Self {
        Self {
            value_host_name: value_host_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, property: impl Into<ResultNode>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn with_validator(mut self, validator: impl Into<ResultNode>) -> Self {
        self.validator_results.push(validator.into());
        self
    }

    pub fn with_enabler(mut self, condition: impl Into<ResultNode>) -> Self {
        self.enabler_condition_result = Some(Box::new(condition.into()));
        self
    }
}

/// Result for one validator of a value host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorResult {
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ResultNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_result: Option<Box<ResultNode>>,
}

impl ValidatorResult {
    pub fn new(error_code: &str) -> Self {
        Self {
            error_code: error_code.to_string(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, property: impl Into<ResultNode>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<ResultNode>) -> Self {
        self.condition_result = Some(Box::new(condition.into()));
        self
    }
}

/// Result for a condition; conditions nest through `children_results`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionResult {
    pub condition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ResultNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children_results: Vec<ResultNode>,
}

impl ConditionResult {
    pub fn new(condition_type: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, property: impl Into<ResultNode>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<ResultNode>) -> Self {
        self.children_results.push(child.into());
        self
    }
}

/// Result for one lookup key and the services that handle it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupKeyResult {
    pub lookup_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_as_data_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_results: Vec<ResultNode>,
}

impl LookupKeyResult {
    pub fn new(lookup_key: &str) -> Self {
        Self {
            lookup_key: lookup_key.to_string(),
            ..Default::default()
        }
    }

    pub fn with_service(mut self, service: impl Into<ResultNode>) -> Self {
        self.service_results.push(service.into());
        self
    }
}

/// Identifier, converter and comparer service checks share this shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceResult {
    pub fn new(severity: Option<Severity>, message: Option<&str>) -> Self {
        Self {
            severity,
            message: message.map(str::to_string),
        }
    }
}

/// Parser service check, grouped by culture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ResultNode>,
}

/// Parsers found for one culture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsersByCultureResult {
    pub culture_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parser_results: Vec<ResultNode>,
}

/// One parser class located for a culture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserFoundResult {
    pub class_found: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Formatter service check, grouped by culture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ResultNode>,
}

/// Formatter lookup for one requested culture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattersByCultureResult {
    pub requested_culture_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_culture_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Check of a single configuration property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResult {
    pub property_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PropertyResult {
    pub fn new(property_name: &str, severity: Option<Severity>) -> Self {
        Self {
            property_name: property_name.to_string(),
            severity,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

/// Localized text found for one culture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Check of a localizable property and its per-culture translations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedPropertyResult {
    pub l10n_property_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub culture_text: BTreeMap<String, CultureText>,
}

impl LocalizedPropertyResult {
    pub fn new(l10n_property_name: &str) -> Self {
        Self {
            l10n_property_name: l10n_property_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_culture(mut self, culture_id: &str, text: CultureText) -> Self {
        self.culture_text.insert(culture_id.to_string(), text);
        self
    }
}

/// An analyzer failure recorded in the tree instead of being raised
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer_class_name: Option<String>,
}

/// A node whose feature is not built in.
///
/// Callers register an explorer node constructor for `feature` to make the
/// node searchable; the remaining wire fields are kept in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResult {
    pub feature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResultNode>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CustomResult {
    pub fn new(feature: &str) -> Self {
        Self {
            feature: feature.to_string(),
            ..Default::default()
        }
    }

    /// String value of one of the extra fields
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One node of the analysis result tree
#[derive(Debug, Clone, PartialEq)]
pub enum ResultNode {
    ValueHost(ValueHostResult),
    Validator(ValidatorResult),
    Condition(ConditionResult),
    LookupKey(LookupKeyResult),
    Identifier(ServiceResult),
    Converter(ServiceResult),
    Comparer(ServiceResult),
    Parser(ParserResult),
    ParsersByCulture(ParsersByCultureResult),
    ParserFound(ParserFoundResult),
    Formatter(FormatterResult),
    FormattersByCulture(FormattersByCultureResult),
    Property(PropertyResult),
    LocalizedProperty(LocalizedPropertyResult),
    Error(ErrorResult),
    Custom(CustomResult),
}

impl ResultNode {
    /// Feature discriminator of this node
    pub fn kind(&self) -> &str {
        match self {
            ResultNode::ValueHost(_) => feature::VALUE_HOST,
            ResultNode::Validator(_) => feature::VALIDATOR,
            ResultNode::Condition(_) => feature::CONDITION,
            ResultNode::LookupKey(_) => feature::LOOKUP_KEY,
            ResultNode::Identifier(_) => feature::IDENTIFIER,
            ResultNode::Converter(_) => feature::CONVERTER,
            ResultNode::Comparer(_) => feature::COMPARER,
            ResultNode::Parser(_) => feature::PARSER,
            ResultNode::ParsersByCulture(_) => feature::PARSERS_BY_CULTURE,
            ResultNode::ParserFound(_) => feature::PARSER_FOUND,
            ResultNode::Formatter(_) => feature::FORMATTER,
            ResultNode::FormattersByCulture(_) => feature::FORMATTERS_BY_CULTURE,
            ResultNode::Property(_) => feature::PROPERTY,
            ResultNode::LocalizedProperty(_) => feature::LOCALIZED_PROPERTY,
            ResultNode::Error(_) => feature::ERROR,
            ResultNode::Custom(r) => strip_feature_suffix(&r.feature),
        }
    }

    /// Severity assigned by the analyzer, `None` when there is no issue
    pub fn severity(&self) -> Option<Severity> {
        match self {
            ResultNode::ValueHost(r) => r.severity,
            ResultNode::Validator(r) => r.severity,
            ResultNode::Condition(r) => r.severity,
            ResultNode::LookupKey(r) => r.severity,
            ResultNode::Identifier(r) | ResultNode::Converter(r) | ResultNode::Comparer(r) => {
                r.severity
            }
            ResultNode::Parser(r) => r.severity,
            ResultNode::ParsersByCulture(r) => r.severity,
            ResultNode::ParserFound(r) => r.severity,
            ResultNode::Formatter(r) => r.severity,
            ResultNode::FormattersByCulture(r) => r.severity,
            ResultNode::Property(r) => r.severity,
            ResultNode::LocalizedProperty(r) => r.severity,
            ResultNode::Error(r) => r.severity,
            ResultNode::Custom(r) => r.severity,
        }
    }

    /// Analyzer message, if the node carries one
    pub fn message(&self) -> Option<&str> {
        match self {
            ResultNode::Identifier(r) | ResultNode::Converter(r) | ResultNode::Comparer(r) => {
                r.message.as_deref()
            }
            ResultNode::Parser(r) => r.message.as_deref(),
            ResultNode::ParsersByCulture(r) => r.message.as_deref(),
            ResultNode::ParserFound(r) => r.message.as_deref(),
            ResultNode::Formatter(r) => r.message.as_deref(),
            ResultNode::FormattersByCulture(r) => r.message.as_deref(),
            ResultNode::Property(r) => r.message.as_deref(),
            ResultNode::LocalizedProperty(r) => r.message.as_deref(),
            ResultNode::Error(r) => r.message.as_deref(),
            ResultNode::Custom(r) => r.field_str("message"),
            ResultNode::ValueHost(_)
            | ResultNode::Validator(_)
            | ResultNode::Condition(_)
            | ResultNode::LookupKey(_) => None,
        }
    }

    /// Check if this node reports an error
    pub fn is_error(&self) -> bool {
        self.severity() == Some(Severity::Error)
    }

    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let feature_name = match value.get("feature").and_then(Value::as_str) {
            Some(f) => f.to_string(),
            None => return Err(de::Error::missing_field("feature")),
        };

        let node = match strip_feature_suffix(&feature_name) {
            feature::VALUE_HOST => ResultNode::ValueHost(serde_json::from_value(value)?),
            feature::VALIDATOR => ResultNode::Validator(serde_json::from_value(value)?),
            feature::CONDITION => ResultNode::Condition(serde_json::from_value(value)?),
            feature::LOOKUP_KEY => ResultNode::LookupKey(serde_json::from_value(value)?),
            feature::IDENTIFIER => ResultNode::Identifier(serde_json::from_value(value)?),
            feature::CONVERTER => ResultNode::Converter(serde_json::from_value(value)?),
            feature::COMPARER => ResultNode::Comparer(serde_json::from_value(value)?),
            feature::PARSER => ResultNode::Parser(serde_json::from_value(value)?),
            feature::PARSERS_BY_CULTURE => {
                ResultNode::ParsersByCulture(serde_json::from_value(value)?)
            }
            feature::PARSER_FOUND => ResultNode::ParserFound(serde_json::from_value(value)?),
            feature::FORMATTER => ResultNode::Formatter(serde_json::from_value(value)?),
            feature::FORMATTERS_BY_CULTURE => {
                ResultNode::FormattersByCulture(serde_json::from_value(value)?)
            }
            feature::PROPERTY => ResultNode::Property(serde_json::from_value(value)?),
            feature::LOCALIZED_PROPERTY => {
                ResultNode::LocalizedProperty(serde_json::from_value(value)?)
            }
            feature::ERROR => ResultNode::Error(serde_json::from_value(value)?),
            _ => ResultNode::Custom(serde_json::from_value(value)?),
        };

        Ok(node)
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    feature: &'a str,
    #[serde(flatten)]
    result: &'a T,
}

fn tagged<S: Serializer, T: Serialize>(
    serializer: S,
    feature: &str,
    result: &T,
) -> Result<S::Ok, S::Error> {
    Tagged { feature, result }.serialize(serializer)
}

impl Serialize for ResultNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        match self {
            ResultNode::ValueHost(r) => tagged(serializer, kind, r),
            ResultNode::Validator(r) => tagged(serializer, kind, r),
            ResultNode::Condition(r) => tagged(serializer, kind, r),
            ResultNode::LookupKey(r) => tagged(serializer, kind, r),
            ResultNode::Identifier(r) | ResultNode::Converter(r) | ResultNode::Comparer(r) => {
                tagged(serializer, kind, r)
            }
            ResultNode::Parser(r) => tagged(serializer, kind, r),
            ResultNode::ParsersByCulture(r) => tagged(serializer, kind, r),
            ResultNode::ParserFound(r) => tagged(serializer, kind, r),
            ResultNode::Formatter(r) => tagged(serializer, kind, r),
            ResultNode::FormattersByCulture(r) => tagged(serializer, kind, r),
            ResultNode::Property(r) => tagged(serializer, kind, r),
            ResultNode::LocalizedProperty(r) => tagged(serializer, kind, r),
            ResultNode::Error(r) => tagged(serializer, kind, r),
            ResultNode::Custom(r) => r.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ResultNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ResultNode::from_value(value).map_err(de::Error::custom)
    }
}

impl From<ValueHostResult> for ResultNode {
    fn from(r: ValueHostResult) -> Self {
        ResultNode::ValueHost(r)
    }
}

impl From<ValidatorResult> for ResultNode {
    fn from(r: ValidatorResult) -> Self {
        ResultNode::Validator(r)
    }
}

impl From<ConditionResult> for ResultNode {
    fn from(r: ConditionResult) -> Self {
        ResultNode::Condition(r)
    }
}

impl From<LookupKeyResult> for ResultNode {
    fn from(r: LookupKeyResult) -> Self {
        ResultNode::LookupKey(r)
    }
}

impl From<PropertyResult> for ResultNode {
    fn from(r: PropertyResult) -> Self {
        ResultNode::Property(r)
    }
}

impl From<LocalizedPropertyResult> for ResultNode {
    fn from(r: LocalizedPropertyResult) -> Self {
        ResultNode::LocalizedProperty(r)
    }
}

impl From<CustomResult> for ResultNode {
    fn from(r: CustomResult) -> Self {
        ResultNode::Custom(r)
    }
}

/// Complete output of a configuration analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigAnalysis {
    /// Culture ids registered with the configuration
    pub culture_ids: Vec<String>,
    /// Names of all value hosts that were analyzed
    pub value_host_names: Vec<String>,
    /// One root per value host
    pub value_host_results: Vec<ResultNode>,
    /// One root per lookup key
    pub lookup_key_results: Vec<ResultNode>,
}

impl ConfigAnalysis {
    pub fn new(value_host_results: Vec<ResultNode>, lookup_key_results: Vec<ResultNode>) -> Self {
        Self {
            value_host_results,
            lookup_key_results,
            ..Default::default()
        }
    }

    /// Parse an analysis from JSON text
    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load an analysis from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
