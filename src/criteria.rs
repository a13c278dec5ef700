//! Search criteria across the independent result dimensions

use crate::result::Severity;
use serde::{Deserialize, Serialize};

/// Filter over the result tree.
///
/// Each dimension is an optional list of acceptable values. An unset (or
/// empty) dimension places no constraint and is inapplicable to nodes that
/// don't expose it. A criteria with every dimension unset matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// `None` entries match nodes that carry no severity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severities: Option<Vec<Option<Severity>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_keys: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_host_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_codes: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_types: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture_ids: Option<Vec<String>>,

    /// Skip the children of a node that definitely mismatched
    pub prune_on_parent_mismatch: bool,
}

fn to_strings<I, S>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Some(values.into_iter().map(Into::into).collect())
}

impl Criteria {
    /// Criteria that match everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Every error-severity node, regardless of what its ancestors are
    pub fn errors_only() -> Self {
        Self::new().with_severities([Some(Severity::Error)])
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = to_strings(features);
        self
    }

    pub fn with_severities<I>(mut self, severities: I) -> Self
    where
        I: IntoIterator<Item = Option<Severity>>,
    {
        self.severities = Some(severities.into_iter().collect());
        self
    }

    pub fn with_lookup_keys<I, S>(mut self, lookup_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lookup_keys = to_strings(lookup_keys);
        self
    }

    pub fn with_service_names<I, S>(mut self, service_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_names = to_strings(service_names);
        self
    }

    pub fn with_value_host_names<I, S>(mut self, value_host_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_host_names = to_strings(value_host_names);
        self
    }

    pub fn with_error_codes<I, S>(mut self, error_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_codes = to_strings(error_codes);
        self
    }

    pub fn with_condition_types<I, S>(mut self, condition_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.condition_types = to_strings(condition_types);
        self
    }

    pub fn with_property_names<I, S>(mut self, property_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_names = to_strings(property_names);
        self
    }

    pub fn with_culture_ids<I, S>(mut self, culture_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.culture_ids = to_strings(culture_ids);
        self
    }

    /// Enable pruning of children below a definite mismatch
    pub fn pruned(mut self) -> Self {
        self.prune_on_parent_mismatch = true;
        self
    }

    /// Check if no dimension constrains anything
    pub fn is_unconstrained(&self) -> bool {
        fn unset<T>(dimension: &Option<Vec<T>>) -> bool {
            !matches!(dimension, Some(values) if !values.is_empty())
        }

        unset(&self.features)
            && unset(&self.severities)
            && unset(&self.lookup_keys)
            && unset(&self.service_names)
            && unset(&self.value_host_names)
            && unset(&self.error_codes)
            && unset(&self.condition_types)
            && unset(&self.property_names)
            && unset(&self.culture_ids)
    }

    /// Layer `other` on top of this criteria; dimensions set in `other` win
    pub fn merge(&mut self, other: Criteria) {
        if other.features.is_some() {
            self.features = other.features;
        }
        if other.severities.is_some() {
            self.severities = other.severities;
        }
        if other.lookup_keys.is_some() {
            self.lookup_keys = other.lookup_keys;
        }
        if other.service_names.is_some() {
            self.service_names = other.service_names;
        }
        if other.value_host_names.is_some() {
            self.value_host_names = other.value_host_names;
        }
        if other.error_codes.is_some() {
            self.error_codes = other.error_codes;
        }
        if other.condition_types.is_some() {
            self.condition_types = other.condition_types;
        }
        if other.property_names.is_some() {
            self.property_names = other.property_names;
        }
        if other.culture_ids.is_some() {
            self.culture_ids = other.culture_ids;
        }
        if other.prune_on_parent_mismatch {
            self.prune_on_parent_mismatch = true;
        }
    }
}
