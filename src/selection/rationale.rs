//! Strategy notes attached to each pick.
//!
//! Notes explain a pick in application-strategy terms: group entries share
//! one draw, peak-period dates see the most movement, and the composite
//! score separates premium picks from strategic fillers.

use serde::{Deserialize, Serialize};

use super::SelectionPolicy;
use crate::model::{Method, ScoredOpportunity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyNote {
    GroupApplication,
    PeakPeriod,
    Premium,
    HighQuality,
    Strategic,
}

impl StrategyNote {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            StrategyNote::GroupApplication => "Group application pools the party into one draw entry",
            StrategyNote::PeakPeriod => "Falls in the peak activity period",
            StrategyNote::Premium => "Premium opportunity",
            StrategyNote::HighQuality => "High-quality opportunity",
            StrategyNote::Strategic => "Strategic pick for coverage and draw odds",
        }
    }
}

impl std::fmt::Display for StrategyNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Notes for one pick. Exactly one of `Premium`, `HighQuality` or
/// `Strategic` is always present, last.
#[must_use]
pub fn strategy_notes(scored: &ScoredOpportunity, policy: &SelectionPolicy) -> Vec<StrategyNote> {
    let mut notes = Vec::with_capacity(3);
    if scored.method() == Method::Group {
        notes.push(StrategyNote::GroupApplication);
    }
    if scored.period.is_peak(policy.peak_period_score) {
        notes.push(StrategyNote::PeakPeriod);
    }
    let quality = if scored.composite_score >= policy.premium_threshold {
        StrategyNote::Premium
    } else if scored.composite_score >= policy.high_quality_threshold {
        StrategyNote::HighQuality
    } else {
        StrategyNote::Strategic
    };
    notes.push(quality);
    notes
}
