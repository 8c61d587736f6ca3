//! Season-level summaries over scored opportunities.
//!
//! Everything here is a read-only aggregation; nothing feeds back into
//! scoring or selection. Averages are rounded to two decimals, average
//! permits to one.

use chrono::{Datelike, NaiveDate};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::model::{CompetitionTier, Method, Opportunity, ScoredOpportunity};
use crate::ranking::compare_ranked;
use crate::scoring::{COMPOSITE_DECIMALS, round_to};
use crate::selection::SelectionResult;

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;
    total / count
}

fn is_peak(scored: &ScoredOpportunity, peak_score: f64) -> bool {
    scored.period.is_peak(peak_score)
}

/// One step below peak activity, e.g. the chasing phase before the peak rut.
fn is_pre_peak(scored: &ScoredOpportunity, peak_score: f64) -> bool {
    scored.period.is_pre_peak(peak_score)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub total_permits: u64,
    pub average_score: f64,
}

/// Per activity period, best average composite first.
#[must_use]
pub fn period_breakdown(items: &[ScoredOpportunity]) -> Vec<PeriodSummary> {
    let mut groups: FxHashMap<&str, (String, usize, u64, f64)> = FxHashMap::default();
    for item in items {
        let entry = groups
            .entry(item.period.key.as_str())
            .or_insert_with(|| (item.period.label.clone(), 0, 0, 0.0));
        entry.1 += 1;
        entry.2 += u64::from(item.permits());
        entry.3 += item.composite_score;
    }

    let mut summaries: Vec<PeriodSummary> = groups
        .into_iter()
        .map(|(key, (label, count, total_permits, total_score))| PeriodSummary {
            key: key.to_string(),
            label,
            count,
            total_permits,
            average_score: round_to(average(total_score, count), COMPOSITE_DECIMALS),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then_with(|| a.key.cmp(&b.key))
    });
    summaries
}

/// Moon timing buckets by moon score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonCondition {
    /// New moon window, score at least 2.5.
    Excellent,
    /// Quarter moon window, at least 1.0.
    Good,
    /// Neutral, at least 0.
    Fair,
    /// Full moon window.
    Poor,
}

impl MoonCondition {
    #[must_use]
    pub fn classify(moon_score: f64) -> Self {
        if moon_score >= 2.5 {
            MoonCondition::Excellent
        } else if moon_score >= 1.0 {
            MoonCondition::Good
        } else if moon_score >= 0.0 {
            MoonCondition::Fair
        } else {
            MoonCondition::Poor
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MoonCondition::Excellent => "Excellent (New Moon Period)",
            MoonCondition::Good => "Good (Quarter Moon)",
            MoonCondition::Fair => "Fair (Neutral)",
            MoonCondition::Poor => "Poor (Full Moon Period)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonSummary {
    pub condition: MoonCondition,
    pub count: usize,
    pub total_permits: u64,
    pub average_score: f64,
}

/// Per moon condition, best average composite first.
#[must_use]
pub fn moon_breakdown(items: &[ScoredOpportunity]) -> Vec<MoonSummary> {
    let mut groups: FxHashMap<MoonCondition, (usize, u64, f64)> = FxHashMap::default();
    for item in items {
        let entry = groups
            .entry(MoonCondition::classify(item.moon.score))
            .or_insert((0, 0, 0.0));
        entry.0 += 1;
        entry.1 += u64::from(item.permits());
        entry.2 += item.composite_score;
    }

    let mut summaries: Vec<MoonSummary> = groups
        .into_iter()
        .map(|(condition, (count, total_permits, total_score))| MoonSummary {
            condition,
            count,
            total_permits,
            average_score: round_to(average(total_score, count), COMPOSITE_DECIMALS),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then_with(|| a.condition.cmp(&b.condition))
    });
    summaries
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub method: Method,
    pub count: usize,
    pub average_score: f64,
    pub max_score: f64,
    pub total_permits: u64,
    pub average_permits: f64,
    pub peak_count: usize,
    pub pre_peak_count: usize,
    /// Highest ranked opportunity of this method.
    pub top: ScoredOpportunity,
}

/// Per method, highest max composite first. Methods without entries are absent.
#[must_use]
pub fn method_comparison(items: &[ScoredOpportunity], peak_score: f64) -> Vec<MethodSummary> {
    let mut groups: FxHashMap<Method, Vec<&ScoredOpportunity>> = FxHashMap::default();
    for item in items {
        groups.entry(item.method()).or_default().push(item);
    }

    let mut summaries: Vec<MethodSummary> = Method::ALL
        .iter()
        .filter_map(|method| {
            let group = groups.remove(method)?;
            let top = group
                .iter()
                .copied()
                .min_by(|a, b| compare_ranked(a, b))?;
            let count = group.len();
            let total_score: f64 = group.iter().map(|s| s.composite_score).sum();
            let total_permits: u64 = group.iter().map(|s| u64::from(s.permits())).sum();
            #[allow(clippy::cast_precision_loss)]
            let permits_total = total_permits as f64;
            Some(MethodSummary {
                method: *method,
                count,
                average_score: round_to(average(total_score, count), COMPOSITE_DECIMALS),
                max_score: top.composite_score,
                total_permits,
                average_permits: round_to(average(permits_total, count), 1),
                peak_count: group.iter().filter(|s| is_peak(s, peak_score)).count(),
                pre_peak_count: group.iter().filter(|s| is_pre_peak(s, peak_score)).count(),
                top: top.clone(),
            })
        })
        .collect();
    summaries.sort_by(|a, b| b.max_score.total_cmp(&a.max_score));
    summaries
}

/// Thresholds for premium recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumCriteria {
    pub min_period_score: f64,
    pub min_moon_score: f64,
    pub min_permits: u32,
}

impl Default for PremiumCriteria {
    fn default() -> Self {
        Self {
            min_period_score: 4.0,
            min_moon_score: 1.0,
            min_permits: 12,
        }
    }
}

impl PremiumCriteria {
    #[must_use]
    pub fn matches(&self, scored: &ScoredOpportunity) -> bool {
        scored.period.score >= self.min_period_score
            && scored.moon.score >= self.min_moon_score
            && scored.permits() >= self.min_permits
    }
}

/// Default cap on premium recommendations.
pub const PREMIUM_LIMIT: usize = 10;

/// Opportunities meeting every premium threshold, ranked, at most `limit`.
#[must_use]
pub fn premium_recommendations(
    items: &[ScoredOpportunity],
    criteria: &PremiumCriteria,
    limit: usize,
) -> Vec<ScoredOpportunity> {
    let mut matched: Vec<ScoredOpportunity> = items
        .iter()
        .filter(|item| criteria.matches(item))
        .cloned()
        .collect();
    matched.sort_by(compare_ranked);
    matched.truncate(limit);
    matched
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location: String,
    pub count: usize,
    pub total_permits: u64,
    pub average_permits: f64,
    pub average_duration: f64,
}

/// Per location, most permits per hunt first.
#[must_use]
pub fn location_breakdown(items: &[Opportunity]) -> Vec<LocationSummary> {
    let mut groups: FxHashMap<&str, (usize, u64, u64)> = FxHashMap::default();
    for item in items {
        let entry = groups.entry(item.location()).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += u64::from(item.permits());
        entry.2 += u64::from(item.duration_days());
    }

    #[allow(clippy::cast_precision_loss)]
    let mut summaries: Vec<LocationSummary> = groups
        .into_iter()
        .map(|(location, (count, total_permits, total_days))| LocationSummary {
            location: location.to_string(),
            count,
            total_permits,
            average_permits: round_to(average(total_permits as f64, count), 1),
            average_duration: round_to(average(total_days as f64, count), 1),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.average_permits
            .total_cmp(&a.average_permits)
            .then_with(|| a.location.cmp(&b.location))
    });
    summaries
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    /// e.g. `December 2025`.
    pub label: String,
    pub count: usize,
    pub total_permits: u64,
}

/// Per calendar month of the start date, in date order.
#[must_use]
pub fn month_breakdown(items: &[Opportunity]) -> Vec<MonthSummary> {
    let mut groups: FxHashMap<(i32, u32), (NaiveDate, usize, u64)> = FxHashMap::default();
    for item in items {
        let start = item.start();
        let entry = groups
            .entry((start.year(), start.month()))
            .or_insert((start, 0, 0));
        entry.1 += 1;
        entry.2 += u64::from(item.permits());
    }

    let mut summaries: Vec<MonthSummary> = groups
        .into_iter()
        .map(|((year, month), (sample, count, total_permits))| MonthSummary {
            year,
            month,
            label: sample.format("%B %Y").to_string(),
            count,
            total_permits,
        })
        .collect();
    summaries.sort_by_key(|s| (s.year, s.month));
    summaries
}

/// Draw pressure guess from supply alone. Lower is easier to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionEstimate {
    pub opportunity: Opportunity,
    pub score: f64,
}

/// `100 / permits + 10 / duration_days`, two decimals.
#[must_use]
pub fn competition_score(opportunity: &Opportunity) -> f64 {
    let permits = f64::from(opportunity.permits());
    let days = f64::from(opportunity.duration_days());
    round_to(100.0 / permits + 10.0 / days, COMPOSITE_DECIMALS)
}

/// Every opportunity with its competition score, least contested first.
/// Ties keep the earlier start, then the smaller id.
#[must_use]
pub fn competition_estimates(items: &[Opportunity]) -> Vec<CompetitionEstimate> {
    let mut estimates: Vec<CompetitionEstimate> = items
        .iter()
        .map(|opportunity| CompetitionEstimate {
            score: competition_score(opportunity),
            opportunity: opportunity.clone(),
        })
        .collect();
    estimates.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| a.opportunity.start().cmp(&b.opportunity.start()))
            .then_with(|| a.opportunity.id().cmp(b.opportunity.id()))
    });
    estimates
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub picks: usize,
    pub average_score: f64,
    pub total_permits: u64,
    pub distinct_methods: usize,
    pub distinct_locations: usize,
    /// Days between the earliest and latest start date.
    pub date_span_days: i64,
    pub peak_count: usize,
    pub pre_peak_count: usize,
    /// Pick count per tier, lowest tier first. Tiers without picks are absent.
    pub tier_distribution: Vec<(CompetitionTier, usize)>,
}

/// Strategy-level summary of a selection.
#[must_use]
pub fn summarize_selection(result: &SelectionResult, peak_score: f64) -> SelectionSummary {
    let picks: Vec<&ScoredOpportunity> = result.opportunities().collect();

    let total_score: f64 = picks.iter().map(|p| p.composite_score).sum();
    let total_permits: u64 = picks.iter().map(|p| u64::from(p.permits())).sum();
    let methods: FxHashSet<Method> = picks.iter().map(|p| p.method()).collect();
    let locations: FxHashSet<&str> = picks.iter().map(|p| p.location()).collect();

    let starts: Vec<NaiveDate> = picks.iter().map(|p| p.start()).collect();
    let date_span_days = match (starts.iter().min(), starts.iter().max()) {
        (Some(first), Some(last)) => (*last - *first).num_days(),
        _ => 0,
    };

    let tier_distribution = CompetitionTier::ALL
        .iter()
        .map(|tier| (*tier, picks.iter().filter(|p| p.tier == *tier).count()))
        .filter(|(_, count)| *count > 0)
        .collect();

    SelectionSummary {
        picks: picks.len(),
        average_score: round_to(average(total_score, picks.len()), COMPOSITE_DECIMALS),
        total_permits,
        distinct_methods: methods.len(),
        distinct_locations: locations.len(),
        date_span_days,
        peak_count: picks.iter().filter(|p| is_peak(p, peak_score)).count(),
        pre_peak_count: picks.iter().filter(|p| is_pre_peak(p, peak_score)).count(),
        tier_distribution,
    }
}
