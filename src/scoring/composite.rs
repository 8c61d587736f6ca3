//! Composite score calculation.
//!
//! ```text
//! permit    = min(permits / permit_scale, permit_cap)
//! duration  = min((days + duration_offset) / duration_scale, duration_cap)
//! composite = w_period*period + w_permit*permit + w_moon*max(moon, 0)
//!           + w_duration*duration + w_conditions*conditions
//! ```
//!
//! The result is rounded half away from zero to two decimal places.

use serde::{Deserialize, Serialize};

use super::{COMPOSITE_DECIMALS, round_to};
use crate::model::Opportunity;

/// Named weighting profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    /// Rut 30%, permits 30%, moon 20%, duration 20%.
    #[default]
    Reference,
    /// Deer movement focus: rut 40%, moon 30%, conditions 20%, permits and
    /// duration 5% each.
    Movement,
}

impl std::fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringProfile::Reference => write!(f, "reference"),
            ScoringProfile::Movement => write!(f, "movement"),
        }
    }
}

impl std::str::FromStr for ScoringProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" => Ok(ScoringProfile::Reference),
            "movement" => Ok(ScoringProfile::Movement),
            _ => Err(format!("unknown scoring profile: {s}")),
        }
    }
}

/// Component weights. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub period: f64,
    pub permit: f64,
    pub moon: f64,
    pub duration: f64,
    pub conditions: f64,
}

impl ScoringWeights {
    #[must_use]
    pub fn reference() -> Self {
        Self {
            period: 0.30,
            permit: 0.30,
            moon: 0.20,
            duration: 0.20,
            conditions: 0.0,
        }
    }

    #[must_use]
    pub fn movement() -> Self {
        Self {
            period: 0.40,
            permit: 0.05,
            moon: 0.30,
            duration: 0.05,
            conditions: 0.20,
        }
    }

    /// Validate that weights are non-negative and sum to approximately 1.0.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let parts = [
            self.period,
            self.permit,
            self.moon,
            self.duration,
            self.conditions,
        ];
        let sum: f64 = parts.iter().sum();
        parts.iter().all(|w| *w >= 0.0) && (sum - 1.0).abs() < 1e-6
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::reference()
    }
}

/// Weighted contribution of each component, before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub period: f64,
    pub permit: f64,
    pub moon: f64,
    pub duration: f64,
    pub conditions: f64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.period + self.permit + self.moon + self.duration + self.conditions
    }
}

/// Weights plus the scaling applied to the supply and duration inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePolicy {
    pub weights: ScoringWeights,
    pub permit_scale: f64,
    pub permit_cap: f64,
    pub duration_scale: f64,
    pub duration_cap: f64,
    /// Days added before scaling the duration.
    pub duration_offset: f64,
}

impl CompositePolicy {
    #[must_use]
    pub fn reference() -> Self {
        Self {
            weights: ScoringWeights::reference(),
            permit_scale: 5.0,
            permit_cap: 5.0,
            duration_scale: 1.0,
            duration_cap: 4.0,
            duration_offset: 0.0,
        }
    }

    #[must_use]
    pub fn movement() -> Self {
        Self {
            weights: ScoringWeights::movement(),
            permit_scale: 10.0,
            permit_cap: 5.0,
            duration_scale: 1.0,
            duration_cap: 5.0,
            duration_offset: 0.0,
        }
    }

    #[must_use]
    pub fn for_profile(profile: ScoringProfile) -> Self {
        match profile {
            ScoringProfile::Reference => Self::reference(),
            ScoringProfile::Movement => Self::movement(),
        }
    }

    /// Weights sum to one and both scales are positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weights.is_valid() && self.permit_scale > 0.0 && self.duration_scale > 0.0
    }

    #[must_use]
    pub fn permit_component(&self, permits: u32) -> f64 {
        (f64::from(permits) / self.permit_scale).min(self.permit_cap)
    }

    #[must_use]
    pub fn duration_component(&self, duration_days: u32) -> f64 {
        ((f64::from(duration_days) + self.duration_offset) / self.duration_scale)
            .min(self.duration_cap)
    }

    #[must_use]
    pub fn breakdown(
        &self,
        opportunity: &Opportunity,
        moon_score: f64,
        period_score: f64,
        conditions_score: f64,
    ) -> ScoreBreakdown {
        let w = &self.weights;
        ScoreBreakdown {
            period: w.period * period_score,
            permit: w.permit * self.permit_component(opportunity.permits()),
            moon: w.moon * moon_score.max(0.0),
            duration: w.duration * self.duration_component(opportunity.duration_days()),
            conditions: w.conditions * conditions_score,
        }
    }

    /// Composite score rounded to two decimals.
    #[must_use]
    pub fn score(
        &self,
        opportunity: &Opportunity,
        moon_score: f64,
        period_score: f64,
        conditions_score: f64,
    ) -> f64 {
        let breakdown = self.breakdown(opportunity, moon_score, period_score, conditions_score);
        round_to(breakdown.total(), COMPOSITE_DECIMALS)
    }
}

impl Default for CompositePolicy {
    fn default() -> Self {
        Self::reference()
    }
}
