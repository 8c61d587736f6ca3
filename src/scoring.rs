//! Opportunity scoring.
//!
//! Every score is a pure function of the opportunity and the scorer's
//! immutable inputs:
//!
//! 1. **Moon proximity** (`moon.rs`) - decayed intensity of the best nearby
//!    lunar event.
//! 2. **Rut period** (`period.rs`) - intensity of the activity period holding
//!    the hunt midpoint.
//! 3. **Seasonal conditions** (`conditions.rs`) - month-based weather analog.
//! 4. **Composite** (`composite.rs`) - weighted blend, two decimal places.
//! 5. **Competition tier** (`tier.rs`) - coarse applicant-pressure estimate.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use draw_hunt_planner::{Method, Opportunity, OpportunityScorer, SeasonCalendar};
//! use draw_hunt_planner::scoring::ScoringPolicy;
//!
//! let scorer = OpportunityScorer::new(
//!     Arc::new(SeasonCalendar::season_2025_26()),
//!     ScoringPolicy::default(),
//! );
//! let hunt = Opportunity::new(
//!     "G-12",
//!     "Group Gun Hunt",
//!     "Twin Oaks WMA",
//!     Method::Group,
//!     NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
//!     20,
//! )
//! .unwrap();
//! let scored = scorer.score(&hunt);
//! assert_eq!(scored.period.key, "peak_rut");
//! ```

pub mod composite;
pub mod conditions;
pub mod moon;
pub mod period;
pub mod tier;

use std::sync::Arc;

use rayon::prelude::*;

use crate::calendar::SeasonCalendar;
use crate::model::{Opportunity, ScoredOpportunity};

pub use composite::{CompositePolicy, ScoreBreakdown, ScoringProfile, ScoringWeights};
pub use conditions::seasonal_conditions_score;
pub use moon::{DistanceBand, MoonBands, MoonBandsError, moon_proximity_score};
pub use period::period_score;
pub use tier::{TierPolicy, estimate_tier};

/// Decimal places kept on the composite score.
pub const COMPOSITE_DECIMALS: i32 = 2;
/// Decimal places kept on the moon score.
pub const MOON_DECIMALS: i32 = 1;

/// Round half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// All tunable scoring policy, separate from the season tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoringPolicy {
    pub moon_bands: MoonBands,
    pub composite: CompositePolicy,
    pub tier: TierPolicy,
}

impl ScoringPolicy {
    #[must_use]
    pub fn for_profile(profile: ScoringProfile) -> Self {
        Self {
            composite: CompositePolicy::for_profile(profile),
            ..Self::default()
        }
    }
}

/// Scores opportunities against a shared, read-only season calendar.
#[derive(Debug, Clone)]
pub struct OpportunityScorer {
    calendar: Arc<SeasonCalendar>,
    policy: ScoringPolicy,
}

impl OpportunityScorer {
    #[must_use]
    pub fn new(calendar: Arc<SeasonCalendar>, policy: ScoringPolicy) -> Self {
        Self { calendar, policy }
    }

    #[must_use]
    pub fn calendar(&self) -> &SeasonCalendar {
        &self.calendar
    }

    #[must_use]
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Attach moon, period, conditions, composite and tier scores.
    #[must_use]
    pub fn score(&self, opportunity: &Opportunity) -> ScoredOpportunity {
        let midpoint = opportunity.midpoint();
        let moon = moon_proximity_score(
            midpoint,
            &self.calendar.lunar_events,
            &self.policy.moon_bands,
        );
        let period = period_score(midpoint, &self.calendar);
        let conditions_score = seasonal_conditions_score(midpoint);
        let composite_score =
            self.policy
                .composite
                .score(opportunity, moon.score, period.score, conditions_score);
        let tier = estimate_tier(
            opportunity,
            composite_score,
            &period,
            self.calendar.peak_score(),
            &self.policy.tier,
        );

        ScoredOpportunity {
            opportunity: opportunity.clone(),
            moon,
            period,
            conditions_score,
            composite_score,
            tier,
        }
    }

    /// Score a batch, preserving input order.
    #[must_use]
    pub fn score_all(&self, opportunities: &[Opportunity]) -> Vec<ScoredOpportunity> {
        let scored: Vec<ScoredOpportunity> =
            opportunities.iter().map(|opp| self.score(opp)).collect();
        tracing::debug!(
            count = scored.len(),
            season = %self.calendar.name,
            "scored opportunity batch"
        );
        scored
    }

    /// Score a batch on the rayon pool. Output order matches [`Self::score_all`].
    #[must_use]
    pub fn score_all_parallel(&self, opportunities: &[Opportunity]) -> Vec<ScoredOpportunity> {
        let scored: Vec<ScoredOpportunity> = opportunities
            .par_iter()
            .map(|opp| self.score(opp))
            .collect();
        tracing::debug!(
            count = scored.len(),
            season = %self.calendar.name,
            "scored opportunity batch in parallel"
        );
        scored
    }

    /// Weighted contribution of each component to a scored opportunity.
    #[must_use]
    pub fn breakdown(&self, scored: &ScoredOpportunity) -> ScoreBreakdown {
        self.policy.composite.breakdown(
            &scored.opportunity,
            scored.moon.score,
            scored.period.score,
            scored.conditions_score,
        )
    }
}

impl Default for OpportunityScorer {
    fn default() -> Self {
        Self::new(
            Arc::new(SeasonCalendar::season_2025_26()),
            ScoringPolicy::default(),
        )
    }
}
