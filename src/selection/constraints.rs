use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{CompetitionTier, Method, ScoredOpportunity};

/// Caller-supplied hard constraints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionConstraints {
    /// At least one pick must use this method.
    pub required_method: Option<Method>,
    /// At least one pick must fall in this activity period (by key).
    pub required_period: Option<String>,
    /// Maximum picks per competition tier. Absent tiers are unlimited.
    #[serde(default)]
    pub tier_caps: FxHashMap<CompetitionTier, usize>,
}

impl SelectionConstraints {
    #[must_use]
    pub fn require_method(mut self, method: Method) -> Self {
        self.required_method = Some(method);
        self
    }

    #[must_use]
    pub fn require_period(mut self, key: impl Into<String>) -> Self {
        self.required_period = Some(key.into());
        self
    }

    #[must_use]
    pub fn cap_tier(mut self, tier: CompetitionTier, max: usize) -> Self {
        self.tier_caps.insert(tier, max);
        self
    }

    #[must_use]
    pub fn cap_for(&self, tier: CompetitionTier) -> Option<usize> {
        self.tier_caps.get(&tier).copied()
    }

    pub(crate) fn matches_method(&self, scored: &ScoredOpportunity) -> bool {
        self.required_method
            .is_some_and(|method| scored.method() == method)
    }

    pub(crate) fn matches_period(&self, scored: &ScoredOpportunity) -> bool {
        self.required_period
            .as_deref()
            .is_some_and(|key| scored.period.key == key)
    }
}

/// Tunables for the diversified greedy phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Raw composite at or above which a pick is accepted without adding
    /// diversity.
    pub high_quality_threshold: f64,
    /// Added when a candidate brings a location not yet picked.
    pub location_bonus: f64,
    /// Added when a candidate brings a method not yet picked.
    pub method_bonus: f64,
    /// Composite at or above which a pick is noted as premium.
    pub premium_threshold: f64,
    /// Period score treated as peak activity in strategy notes.
    pub peak_period_score: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            high_quality_threshold: 3.5,
            location_bonus: 0.5,
            method_bonus: 0.3,
            premium_threshold: 4.0,
            peak_period_score: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_constraints() {
        let constraints = SelectionConstraints::default()
            .require_method(Method::Group)
            .require_period("peak_rut")
            .cap_tier(CompetitionTier::VeryHigh, 2);

        assert_eq!(constraints.required_method, Some(Method::Group));
        assert_eq!(constraints.required_period.as_deref(), Some("peak_rut"));
        assert_eq!(constraints.cap_for(CompetitionTier::VeryHigh), Some(2));
        assert_eq!(constraints.cap_for(CompetitionTier::Low), None);
    }

    #[test]
    fn default_policy_values() {
        let policy = SelectionPolicy::default();
        assert!((policy.high_quality_threshold - 3.5).abs() < f64::EPSILON);
        assert!((policy.location_bonus - 0.5).abs() < f64::EPSILON);
        assert!((policy.method_bonus - 0.3).abs() < f64::EPSILON);
    }
}
