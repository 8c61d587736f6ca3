//! Ranking and filtering of scored opportunities.
//!
//! The canonical order is composite score descending, then start date
//! ascending, then id ascending. It is total, so ranking is deterministic
//! and idempotent for any input order.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{Method, ScoredOpportunity};

/// Canonical comparison used by every ranked list in the crate.
#[must_use]
pub fn compare_ranked(a: &ScoredOpportunity, b: &ScoredOpportunity) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| a.start().cmp(&b.start()))
        .then_with(|| a.id().cmp(b.id()))
}

/// Sorted copy in canonical order.
#[must_use]
pub fn rank(items: &[ScoredOpportunity]) -> Vec<ScoredOpportunity> {
    let mut ranked = items.to_vec();
    ranked.sort_by(compare_ranked);
    ranked
}

/// Alternative sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    Composite,
    Permits,
    Duration,
    Moon,
    Period,
    StartDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Descending,
    Ascending,
}

impl std::str::FromStr for RankKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "composite" | "composite_score" => Ok(RankKey::Composite),
            "permits" => Ok(RankKey::Permits),
            "duration" | "duration_days" => Ok(RankKey::Duration),
            "moon" | "moon_score" => Ok(RankKey::Moon),
            "period" | "period_score" | "rut" => Ok(RankKey::Period),
            "start" | "start_date" => Ok(RankKey::StartDate),
            _ => Err(format!("unknown rank key: {s}")),
        }
    }
}

fn compare_key(a: &ScoredOpportunity, b: &ScoredOpportunity, key: RankKey) -> Ordering {
    match key {
        RankKey::Composite => a.composite_score.total_cmp(&b.composite_score),
        RankKey::Permits => a.permits().cmp(&b.permits()),
        RankKey::Duration => a
            .opportunity
            .duration_days()
            .cmp(&b.opportunity.duration_days()),
        RankKey::Moon => a.moon.score.total_cmp(&b.moon.score),
        RankKey::Period => a.period.score.total_cmp(&b.period.score),
        RankKey::StartDate => a.start().cmp(&b.start()),
    }
}

/// Sorted copy by `key`; ties fall back to the canonical order.
#[must_use]
pub fn rank_by(
    items: &[ScoredOpportunity],
    key: RankKey,
    direction: Direction,
) -> Vec<ScoredOpportunity> {
    let mut ranked = items.to_vec();
    ranked.sort_by(|a, b| {
        let primary = compare_key(a, b, key);
        let primary = match direction {
            Direction::Ascending => primary,
            Direction::Descending => primary.reverse(),
        };
        primary.then_with(|| compare_ranked(a, b))
    });
    ranked
}

/// First `n` entries of an already ranked list.
#[must_use]
pub fn top_n(ranked: &[ScoredOpportunity], n: usize) -> Vec<ScoredOpportunity> {
    ranked.iter().take(n).cloned().collect()
}

/// Entries with `composite_score >= min_score`, input order preserved.
#[must_use]
pub fn filter_threshold(items: &[ScoredOpportunity], min_score: f64) -> Vec<ScoredOpportunity> {
    items
        .iter()
        .filter(|item| item.composite_score >= min_score)
        .cloned()
        .collect()
}

/// Best `n` per method in canonical order. Methods without entries are absent.
#[must_use]
pub fn top_n_by_method(
    items: &[ScoredOpportunity],
    n: usize,
) -> Vec<(Method, Vec<ScoredOpportunity>)> {
    let mut grouped: FxHashMap<Method, Vec<ScoredOpportunity>> = FxHashMap::default();
    for item in rank(items) {
        let bucket = grouped.entry(item.method()).or_default();
        if bucket.len() < n {
            bucket.push(item);
        }
    }

    Method::ALL
        .iter()
        .filter_map(|method| grouped.remove(method).map(|list| (*method, list)))
        .collect()
}
