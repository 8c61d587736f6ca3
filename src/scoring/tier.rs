//! Competition tier estimate.
//!
//! A rough guess at applicant pressure from location reputation, rut timing,
//! composite quality and permit supply. Rules are checked top to bottom and
//! the first match wins.

use serde::{Deserialize, Serialize};

use crate::model::{CompetitionTier, Opportunity, PeriodScore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Matched as substrings of the location name.
    pub premium_locations: Vec<String>,
    /// Matched against the full location name.
    pub low_pressure_locations: Vec<String>,
    pub premium_very_high: f64,
    pub premium_high: f64,
    pub high: f64,
    pub moderate: f64,
    /// Permit counts at or below this read as low demand.
    pub low_permit_max: u32,
}

impl TierPolicy {
    fn is_premium(&self, location: &str) -> bool {
        self.premium_locations
            .iter()
            .any(|premium| location.contains(premium.as_str()))
    }

    fn is_low_pressure(&self, location: &str) -> bool {
        self.low_pressure_locations
            .iter()
            .any(|low| low == location)
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            premium_locations: vec!["Phil Bryant".to_string()],
            low_pressure_locations: vec!["Riverfront".to_string()],
            premium_very_high: 3.8,
            premium_high: 3.0,
            high: 3.5,
            moderate: 3.0,
            low_permit_max: 10,
        }
    }
}

#[must_use]
pub fn estimate_tier(
    opportunity: &Opportunity,
    composite_score: f64,
    period: &PeriodScore,
    peak_score: f64,
    policy: &TierPolicy,
) -> CompetitionTier {
    let location = opportunity.location();

    if policy.is_premium(location) {
        if composite_score >= policy.premium_very_high {
            return CompetitionTier::VeryHigh;
        }
        if composite_score >= policy.premium_high {
            return CompetitionTier::High;
        }
    }
    if period.is_peak(peak_score) {
        return CompetitionTier::VeryHigh;
    }
    if composite_score >= policy.high {
        return CompetitionTier::High;
    }
    if composite_score >= policy.moderate {
        return CompetitionTier::Moderate;
    }
    if policy.is_low_pressure(location) || opportunity.permits() <= policy.low_permit_max {
        return CompetitionTier::Low;
    }
    CompetitionTier::Moderate
}
