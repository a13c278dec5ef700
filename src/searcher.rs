//! Compiled criteria and tri-valued dimension matching

use crate::criteria::Criteria;
use crate::result::Severity;

/// Outcome of testing one dimension (or one node) against the criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    /// The value is acceptable
    Match,
    /// The dimension applies and the value is not acceptable
    NoMatch,
    /// The criteria place no constraint on this dimension
    NotApplicable,
}

impl MatchOutcome {
    pub fn is_match(self) -> bool {
        self == MatchOutcome::Match
    }

    pub fn is_mismatch(self) -> bool {
        self == MatchOutcome::NoMatch
    }

    /// AND that treats `NotApplicable` as neutral.
    ///
    /// Any `NoMatch` wins; two `NotApplicable` stay `NotApplicable`; anything
    /// else is a `Match`.
    pub fn and(self, other: MatchOutcome) -> MatchOutcome {
        match (self, other) {
            (MatchOutcome::NoMatch, _) | (_, MatchOutcome::NoMatch) => MatchOutcome::NoMatch,
            (MatchOutcome::NotApplicable, MatchOutcome::NotApplicable) => {
                MatchOutcome::NotApplicable
            }
            _ => MatchOutcome::Match,
        }
    }

    /// Fold many outcomes with [`MatchOutcome::and`]
    pub fn all<I>(outcomes: I) -> MatchOutcome
    where
        I: IntoIterator<Item = MatchOutcome>,
    {
        outcomes
            .into_iter()
            .fold(MatchOutcome::NotApplicable, MatchOutcome::and)
    }
}

impl From<bool> for MatchOutcome {
    fn from(matched: bool) -> Self {
        if matched {
            MatchOutcome::Match
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// Criteria compiled for matching.
///
/// All string dimensions are lowercased once here so that every comparison
/// during a traversal is a plain equality check against a lowercased value.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    all_match: bool,
    prune_on_parent_mismatch: bool,
    features: Option<Vec<String>>,
    severities: Option<Vec<Option<Severity>>>,
    lookup_keys: Option<Vec<String>>,
    service_names: Option<Vec<String>>,
    value_host_names: Option<Vec<String>>,
    error_codes: Option<Vec<String>>,
    condition_types: Option<Vec<String>>,
    property_names: Option<Vec<String>>,
    culture_ids: Option<Vec<String>>,
}

fn compile(dimension: &Option<Vec<String>>) -> Option<Vec<String>> {
    match dimension {
        Some(values) if !values.is_empty() => {
            Some(values.iter().map(|v| v.to_lowercase()).collect())
        }
        _ => None,
    }
}

impl Searcher {
    /// Compile criteria; `None` matches everything
    pub fn new(criteria: Option<&Criteria>) -> Self {
        let Some(criteria) = criteria else {
            return Self {
                all_match: true,
                ..Default::default()
            };
        };

        Self {
            all_match: criteria.is_unconstrained(),
            prune_on_parent_mismatch: criteria.prune_on_parent_mismatch,
            features: compile(&criteria.features),
            severities: criteria
                .severities
                .as_ref()
                .filter(|s| !s.is_empty())
                .cloned(),
            lookup_keys: compile(&criteria.lookup_keys),
            service_names: compile(&criteria.service_names),
            value_host_names: compile(&criteria.value_host_names),
            error_codes: compile(&criteria.error_codes),
            condition_types: compile(&criteria.condition_types),
            property_names: compile(&criteria.property_names),
            culture_ids: compile(&criteria.culture_ids),
        }
    }

    /// True when no dimension constrains anything
    pub fn all_match(&self) -> bool {
        self.all_match
    }

    pub fn prune_on_parent_mismatch(&self) -> bool {
        self.prune_on_parent_mismatch
    }

    fn match_text(&self, accepted: &Option<Vec<String>>, value: Option<&str>) -> MatchOutcome {
        if self.all_match {
            return MatchOutcome::Match;
        }
        match (accepted, value) {
            (None, _) => MatchOutcome::NotApplicable,
            (Some(_), None) => MatchOutcome::NoMatch,
            (Some(accepted), Some(value)) => {
                let value = value.to_lowercase();
                MatchOutcome::from(accepted.iter().any(|a| *a == value))
            }
        }
    }

    pub fn match_feature(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.features, value)
    }

    /// `None` is a legal criterion entry and matches nodes without a severity
    pub fn match_severity(&self, value: Option<Severity>) -> MatchOutcome {
        if self.all_match {
            return MatchOutcome::Match;
        }
        match &self.severities {
            None => MatchOutcome::NotApplicable,
            Some(accepted) => MatchOutcome::from(accepted.contains(&value)),
        }
    }

    pub fn match_lookup_key(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.lookup_keys, value)
    }

    pub fn match_service_name(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.service_names, value)
    }

    pub fn match_value_host_name(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.value_host_names, value)
    }

    pub fn match_error_code(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.error_codes, value)
    }

    pub fn match_condition_type(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.condition_types, value)
    }

    pub fn match_property_name(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.property_names, value)
    }

    pub fn match_culture_id(&self, value: Option<&str>) -> MatchOutcome {
        self.match_text(&self.culture_ids, value)
    }
}
