//! Greedy diversified selector.

use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{
    OpportunitySelector, SelectedOpportunity, SelectionConstraints, SelectionError,
    SelectionPhase, SelectionPolicy, SelectionResult, SelectionStatus, SelectionTrace,
    UnmetConstraint, strategy_notes,
};
use crate::model::{CompetitionTier, Method, ScoredOpportunity};
use crate::ranking::{compare_ranked, rank};

/// Default [`OpportunitySelector`].
#[derive(Debug, Clone, Default)]
pub struct DiversifiedSelector {
    policy: SelectionPolicy,
}

impl DiversifiedSelector {
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }
}

impl OpportunitySelector for DiversifiedSelector {
    fn select(
        &self,
        candidates: &[ScoredOpportunity],
        k: usize,
        constraints: &SelectionConstraints,
    ) -> Result<SelectionResult, SelectionError> {
        let mut trace = SelectionTrace {
            candidates: candidates.len(),
            ..SelectionTrace::default()
        };

        if candidates.is_empty() {
            tracing::warn!(requested = k, "no candidates to select from");
            return Ok(SelectionResult::empty(
                SelectionStatus::NoCandidates,
                trace,
                k,
            ));
        }
        if k == 0 {
            return Ok(SelectionResult::empty(SelectionStatus::Complete, trace, k));
        }

        let ranked = rank(candidates);
        let pool = dedup_by_date(&ranked);
        trace.pool_size = pool.len();
        trace.duplicate_dates = ranked.len() - pool.len();
        tracing::debug!(
            candidates = trace.candidates,
            pool_size = trace.pool_size,
            duplicate_dates = trace.duplicate_dates,
            "deduplicated candidates by start date"
        );

        let mut state = SelectionState::new(&self.policy, constraints, trace);

        if let Some(method) = constraints.required_method {
            let pick = state
                .best_eligible(&ranked, |c| c.method() == method)
                .ok_or(SelectionError::Unsatisfiable(
                    UnmetConstraint::RequiredMethod(method),
                ))?;
            state.accept(pick, SelectionPhase::RequiredMethod, pick.composite_score);
            tracing::debug!(id = pick.id(), %method, "picked required method");
        }

        if let Some(key) = constraints.required_period.as_deref() {
            let already_met = state.picks.iter().any(|p| p.scored.period.key == key);
            if !already_met {
                let unmet = || {
                    SelectionError::Unsatisfiable(UnmetConstraint::RequiredPeriod(key.to_string()))
                };
                if state.picks.len() >= k {
                    return Err(unmet());
                }
                let pick = state
                    .best_eligible(&ranked, |c| c.period.key == key)
                    .ok_or_else(unmet)?;
                state.accept(pick, SelectionPhase::RequiredPeriod, pick.composite_score);
                tracing::debug!(id = pick.id(), period = key, "picked required period");
            }
        }

        while state.picks.len() < k {
            let Some((pick, adjusted)) = state.best_diversified(&pool) else {
                break;
            };
            state.accept(pick, SelectionPhase::Diversified, adjusted);
        }
        tracing::debug!(
            picks = state.picks.len(),
            diversified = state.trace.diversified_picks,
            "diversified fill finished"
        );

        for candidate in &pool {
            if state.picks.len() >= k {
                break;
            }
            if state.is_open(candidate) {
                state.accept(candidate, SelectionPhase::Backfill, candidate.composite_score);
            }
        }

        let SelectionState {
            mut picks,
            mut trace,
            cap_skipped,
            ..
        } = state;
        trace.tier_cap_skips = cap_skipped.len();
        picks.sort_by(|a, b| compare_ranked(&a.scored, &b.scored));

        verify(&picks, constraints)?;

        let status = if picks.len() >= k {
            SelectionStatus::Complete
        } else {
            SelectionStatus::Partial
        };
        if status == SelectionStatus::Partial {
            tracing::warn!(
                requested = k,
                selected = picks.len(),
                pool_size = trace.pool_size,
                tier_cap_skips = trace.tier_cap_skips,
                "selection filled fewer slots than requested"
            );
        }
        tracing::info!(
            requested = k,
            selected = picks.len(),
            status = %status,
            required_method = trace.required_method_picks,
            required_period = trace.required_period_picks,
            diversified = trace.diversified_picks,
            backfill = trace.backfill_picks,
            "selection complete"
        );

        Ok(SelectionResult {
            picks,
            status,
            trace,
            requested: k,
        })
    }
}

/// Best candidate per start date, in rank order.
fn dedup_by_date(ranked: &[ScoredOpportunity]) -> Vec<&ScoredOpportunity> {
    let mut seen: FxHashSet<NaiveDate> = FxHashSet::default();
    ranked
        .iter()
        .filter(|candidate| seen.insert(candidate.start()))
        .collect()
}

struct SelectionState<'a> {
    policy: &'a SelectionPolicy,
    constraints: &'a SelectionConstraints,
    picks: Vec<SelectedOpportunity>,
    trace: SelectionTrace,
    used_dates: FxHashSet<NaiveDate>,
    used_locations: FxHashSet<String>,
    used_methods: FxHashSet<Method>,
    tier_counts: FxHashMap<CompetitionTier, usize>,
    cap_skipped: FxHashSet<String>,
}

impl<'a> SelectionState<'a> {
    fn new(
        policy: &'a SelectionPolicy,
        constraints: &'a SelectionConstraints,
        trace: SelectionTrace,
    ) -> Self {
        Self {
            policy,
            constraints,
            picks: Vec::new(),
            trace,
            used_dates: FxHashSet::default(),
            used_locations: FxHashSet::default(),
            used_methods: FxHashSet::default(),
            tier_counts: FxHashMap::default(),
            cap_skipped: FxHashSet::default(),
        }
    }

    fn tier_full(&self, tier: CompetitionTier) -> bool {
        self.constraints
            .cap_for(tier)
            .is_some_and(|cap| self.tier_counts.get(&tier).copied().unwrap_or(0) >= cap)
    }

    /// Date unused and tier below its cap. Cap rejections are recorded.
    fn is_open(&mut self, candidate: &ScoredOpportunity) -> bool {
        if self.used_dates.contains(&candidate.start()) {
            return false;
        }
        if self.tier_full(candidate.tier) {
            self.cap_skipped.insert(candidate.id().to_string());
            return false;
        }
        true
    }

    /// First open candidate in rank order matching `predicate`.
    fn best_eligible<'c, F>(
        &mut self,
        ranked: &'c [ScoredOpportunity],
        predicate: F,
    ) -> Option<&'c ScoredOpportunity>
    where
        F: Fn(&ScoredOpportunity) -> bool,
    {
        ranked
            .iter()
            .filter(|candidate| predicate(*candidate))
            .find(|candidate| self.is_open(candidate))
    }

    fn adds_diversity(&self, candidate: &ScoredOpportunity) -> bool {
        !self.used_locations.contains(candidate.location())
            || !self.used_methods.contains(&candidate.method())
    }

    fn adjusted_score(&self, candidate: &ScoredOpportunity) -> f64 {
        let mut score = candidate.composite_score;
        if !self.used_locations.contains(candidate.location()) {
            score += self.policy.location_bonus;
        }
        if !self.used_methods.contains(&candidate.method()) {
            score += self.policy.method_bonus;
        }
        score
    }

    /// Highest bonus-adjusted acceptable candidate. Pool order breaks ties.
    fn best_diversified<'c>(
        &mut self,
        pool: &[&'c ScoredOpportunity],
    ) -> Option<(&'c ScoredOpportunity, f64)> {
        let mut best: Option<(&'c ScoredOpportunity, f64)> = None;
        for &candidate in pool {
            if !self.is_open(candidate) {
                continue;
            }
            let acceptable = self.adds_diversity(candidate)
                || candidate.composite_score >= self.policy.high_quality_threshold;
            if !acceptable {
                continue;
            }
            let adjusted = self.adjusted_score(candidate);
            let better = match best {
                None => true,
                Some((_, current)) => adjusted.total_cmp(&current).is_gt(),
            };
            if better {
                best = Some((candidate, adjusted));
            }
        }
        best
    }

    fn accept(&mut self, candidate: &ScoredOpportunity, phase: SelectionPhase, adjusted: f64) {
        self.used_dates.insert(candidate.start());
        self.used_locations.insert(candidate.location().to_string());
        self.used_methods.insert(candidate.method());
        *self.tier_counts.entry(candidate.tier).or_insert(0) += 1;
        self.trace.record(phase);
        self.picks.push(SelectedOpportunity {
            scored: candidate.clone(),
            phase,
            adjusted_score: adjusted,
            notes: strategy_notes(candidate, self.policy),
        });
    }
}

fn verify(
    picks: &[SelectedOpportunity],
    constraints: &SelectionConstraints,
) -> Result<(), SelectionError> {
    let mut dates: FxHashSet<NaiveDate> = FxHashSet::default();
    for pick in picks {
        if !dates.insert(pick.scored.start()) {
            return Err(SelectionError::PostconditionViolated(format!(
                "start date {} selected twice",
                pick.scored.start()
            )));
        }
    }

    if let Some(method) = constraints.required_method {
        if !picks.iter().any(|p| constraints.matches_method(&p.scored)) {
            return Err(SelectionError::PostconditionViolated(format!(
                "required method {method} missing"
            )));
        }
    }
    if let Some(key) = constraints.required_period.as_deref() {
        if !picks.iter().any(|p| constraints.matches_period(&p.scored)) {
            return Err(SelectionError::PostconditionViolated(format!(
                "required period {key} missing"
            )));
        }
    }

    let mut counts: FxHashMap<CompetitionTier, usize> = FxHashMap::default();
    for pick in picks {
        *counts.entry(pick.scored.tier).or_insert(0) += 1;
    }
    for (tier, count) in counts {
        match constraints.cap_for(tier) {
            Some(cap) if count > cap => {
                return Err(SelectionError::PostconditionViolated(format!(
                    "{count} {tier} picks exceed cap {cap}"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
