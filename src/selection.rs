//! Constrained diversified selection of draw applications.
//!
//! Picks up to `k` scored opportunities, one per start date, in phases:
//!
//! 1. **RequiredMethod** - best candidate of a mandated method.
//! 2. **RequiredPeriod** - best candidate inside a mandated activity period.
//! 3. **Diversified** - greedy fill by bonus-adjusted score, favouring new
//!    locations and methods.
//! 4. **Backfill** - best remaining raw scores regardless of diversity.
//!
//! The procedure is a deterministic greedy heuristic, not an optimal solver.
//! A hard requirement that no candidate can meet is reported as
//! [`SelectionError::Unsatisfiable`]; an empty candidate list is reported as
//! [`SelectionStatus::NoCandidates`].

mod constraints;
mod diversified;
mod rationale;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Method, ScoredOpportunity};

pub use constraints::{SelectionConstraints, SelectionPolicy};
pub use diversified::DiversifiedSelector;
pub use rationale::{StrategyNote, strategy_notes};

/// Chooses a subset of scored opportunities.
pub trait OpportunitySelector: Send + Sync {
    /// Select up to `k` opportunities from `candidates`.
    ///
    /// # Errors
    /// Returns [`SelectionError`] when a hard constraint cannot be met.
    fn select(
        &self,
        candidates: &[ScoredOpportunity],
        k: usize,
        constraints: &SelectionConstraints,
    ) -> Result<SelectionResult, SelectionError>;
}

/// Phase that accepted a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    RequiredMethod,
    RequiredPeriod,
    Diversified,
    Backfill,
}

impl std::fmt::Display for SelectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionPhase::RequiredMethod => write!(f, "required_method"),
            SelectionPhase::RequiredPeriod => write!(f, "required_period"),
            SelectionPhase::Diversified => write!(f, "diversified"),
            SelectionPhase::Backfill => write!(f, "backfill"),
        }
    }
}

/// A selected opportunity with how and why it was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedOpportunity {
    pub scored: ScoredOpportunity,
    pub phase: SelectionPhase,
    /// Raw composite plus any diversification bonus at acceptance time.
    pub adjusted_score: f64,
    pub notes: Vec<StrategyNote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// All `k` slots filled.
    Complete,
    /// Pool or tier caps ran out before `k` picks.
    Partial,
    /// The candidate list was empty.
    NoCandidates,
}

impl std::fmt::Display for SelectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionStatus::Complete => write!(f, "complete"),
            SelectionStatus::Partial => write!(f, "partial"),
            SelectionStatus::NoCandidates => write!(f, "no_candidates"),
        }
    }
}

/// Counters describing one selection run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionTrace {
    /// Candidates passed in.
    pub candidates: usize,
    /// Candidates dropped because a better one shared their start date.
    pub duplicate_dates: usize,
    /// Candidates left after date deduplication.
    pub pool_size: usize,
    /// Distinct candidates passed over at least once for a full tier.
    pub tier_cap_skips: usize,
    pub required_method_picks: usize,
    pub required_period_picks: usize,
    pub diversified_picks: usize,
    pub backfill_picks: usize,
}

impl SelectionTrace {
    pub(crate) fn record(&mut self, phase: SelectionPhase) {
        match phase {
            SelectionPhase::RequiredMethod => self.required_method_picks += 1,
            SelectionPhase::RequiredPeriod => self.required_period_picks += 1,
            SelectionPhase::Diversified => self.diversified_picks += 1,
            SelectionPhase::Backfill => self.backfill_picks += 1,
        }
    }
}

/// Result of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    /// Picks in canonical rank order.
    pub picks: Vec<SelectedOpportunity>,
    pub status: SelectionStatus,
    pub trace: SelectionTrace,
    /// The `k` that was asked for.
    pub requested: usize,
}

impl SelectionResult {
    pub(crate) fn empty(status: SelectionStatus, trace: SelectionTrace, requested: usize) -> Self {
        Self {
            picks: Vec::new(),
            status,
            trace,
            requested,
        }
    }

    /// At least one opportunity was selected.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.picks.is_empty()
    }

    /// Every requested slot was filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SelectionStatus::Complete
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn opportunities(&self) -> impl Iterator<Item = &ScoredOpportunity> {
        self.picks.iter().map(|pick| &pick.scored)
    }
}

/// Hard requirement that could not be met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmetConstraint {
    RequiredMethod(Method),
    RequiredPeriod(String),
}

impl std::fmt::Display for UnmetConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmetConstraint::RequiredMethod(method) => {
                write!(f, "no eligible {} opportunity", method.label())
            }
            UnmetConstraint::RequiredPeriod(key) => {
                write!(f, "no eligible opportunity in period {key}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("selection constraint cannot be satisfied: {0}")]
    Unsatisfiable(UnmetConstraint),
    #[error("selection postcondition violated: {0}")]
    PostconditionViolated(String),
}

/// Run the diversified selector with an explicit policy.
///
/// # Errors
/// Returns [`SelectionError`] when a hard constraint cannot be met.
pub fn select_diversified(
    candidates: &[ScoredOpportunity],
    k: usize,
    constraints: &SelectionConstraints,
    policy: &SelectionPolicy,
) -> Result<SelectionResult, SelectionError> {
    DiversifiedSelector::new(policy.clone()).select(candidates, k, constraints)
}
