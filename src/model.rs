//! Core record types for draw hunt opportunities.
//!
//! An [`Opportunity`] is validated once at construction and never changes
//! afterwards. Scoring attaches the derived fields in a separate
//! [`ScoredOpportunity`] so the raw record and its scores cannot drift apart.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::LunarPhase;

/// Hunt method, the category used for coverage constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Archery,
    Gun,
    PrimitiveWeapon,
    Group,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Archery,
        Method::Gun,
        Method::PrimitiveWeapon,
        Method::Group,
    ];

    /// Human-readable label as printed on the draw schedule.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Method::Archery => "Archery",
            Method::Gun => "Gun",
            Method::PrimitiveWeapon => "Primitive Weapon",
            Method::Group => "Group",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Archery => write!(f, "archery"),
            Method::Gun => write!(f, "gun"),
            Method::PrimitiveWeapon => write!(f, "primitive_weapon"),
            Method::Group => write!(f, "group"),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "archery" => Ok(Method::Archery),
            "gun" => Ok(Method::Gun),
            "primitive_weapon" | "primitive" => Ok(Method::PrimitiveWeapon),
            "group" => Ok(Method::Group),
            _ => Err(format!("unknown hunt method: {s}")),
        }
    }
}

/// Coarse estimate of how many applicants compete for the same permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl CompetitionTier {
    pub const ALL: [CompetitionTier; 4] = [
        CompetitionTier::Low,
        CompetitionTier::Moderate,
        CompetitionTier::High,
        CompetitionTier::VeryHigh,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CompetitionTier::Low => "Low",
            CompetitionTier::Moderate => "Moderate",
            CompetitionTier::High => "High",
            CompetitionTier::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for CompetitionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionTier::Low => write!(f, "low"),
            CompetitionTier::Moderate => write!(f, "moderate"),
            CompetitionTier::High => write!(f, "high"),
            CompetitionTier::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// Reasons an opportunity record is rejected at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpportunityError {
    #[error("opportunity field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("opportunity {id} ends on {end} before it starts on {start}")]
    InvertedDates {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("opportunity {id} must offer at least one permit")]
    NonPositivePermits { id: String },
    #[error("opportunity {id} must last at least one day")]
    NonPositiveDuration { id: String },
}

/// A single schedulable permit-draw event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    id: String,
    name: String,
    location: String,
    method: Method,
    start: NaiveDate,
    end: NaiveDate,
    permits: u32,
    duration_days: u32,
}

impl Opportunity {
    /// Validate and build an opportunity. Duration defaults to the inclusive
    /// day count `end - start + 1`.
    ///
    /// # Errors
    /// Returns [`OpportunityError`] for empty identifiers, inverted dates or
    /// a zero permit count.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        method: Method,
        start: NaiveDate,
        end: NaiveDate,
        permits: u32,
    ) -> Result<Self, OpportunityError> {
        let id = id.into();
        let name = name.into();
        let location = location.into();

        if id.trim().is_empty() {
            return Err(OpportunityError::EmptyField("id"));
        }
        if name.trim().is_empty() {
            return Err(OpportunityError::EmptyField("name"));
        }
        if location.trim().is_empty() {
            return Err(OpportunityError::EmptyField("location"));
        }
        if end < start {
            return Err(OpportunityError::InvertedDates { id, start, end });
        }
        if permits == 0 {
            return Err(OpportunityError::NonPositivePermits { id });
        }

        let span = (end - start).num_days() + 1;
        let duration_days = u32::try_from(span).unwrap_or(u32::MAX);

        Ok(Self {
            id,
            name,
            location,
            method,
            start,
            end,
            permits,
            duration_days,
        })
    }

    /// Override the published hunt length when it differs from the calendar span.
    ///
    /// # Errors
    /// Returns [`OpportunityError::NonPositiveDuration`] for a zero duration.
    pub fn with_duration(mut self, duration_days: u32) -> Result<Self, OpportunityError> {
        if duration_days == 0 {
            return Err(OpportunityError::NonPositiveDuration { id: self.id });
        }
        self.duration_days = duration_days;
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn permits(&self) -> u32 {
        self.permits
    }

    #[must_use]
    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Midpoint of the hunt, truncated toward the start date for odd spans.
    #[must_use]
    pub fn midpoint(&self) -> NaiveDate {
        let half = u64::try_from((self.end - self.start).num_days() / 2).unwrap_or(0);
        self.start.checked_add_days(Days::new(half)).unwrap_or(self.end)
    }
}

/// Moon proximity result for one opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonScore {
    /// Decayed intensity of the best nearby event, one decimal place.
    pub score: f64,
    /// Phase of the reference point that produced `score`.
    pub phase: Option<LunarPhase>,
    /// Whole days between the midpoint and that reference point.
    pub days_from_event: Option<i64>,
}

impl MoonScore {
    #[must_use]
    pub fn none() -> Self {
        Self {
            score: 0.0,
            phase: None,
            days_from_event: None,
        }
    }
}

/// Activity period the midpoint falls in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodScore {
    pub score: f64,
    /// Stable period key, e.g. `peak_rut`.
    pub key: String,
    pub label: String,
    /// True when no configured period covered the midpoint.
    pub is_fallback: bool,
}

impl PeriodScore {
    /// Configured period at or above `peak_score`. The fallback never counts.
    #[must_use]
    pub fn is_peak(&self, peak_score: f64) -> bool {
        !self.is_fallback && self.score >= peak_score
    }

    /// Configured period within one point below `peak_score`.
    #[must_use]
    pub fn is_pre_peak(&self, peak_score: f64) -> bool {
        !self.is_fallback && self.score < peak_score && self.score >= peak_score - 1.0
    }
}

/// An opportunity together with every score derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredOpportunity {
    pub opportunity: Opportunity,
    pub moon: MoonScore,
    pub period: PeriodScore,
    /// Month-based seasonal conditions score.
    pub conditions_score: f64,
    /// Weighted composite, two decimal places.
    pub composite_score: f64,
    pub tier: CompetitionTier,
}

impl ScoredOpportunity {
    #[must_use]
    pub fn id(&self) -> &str {
        self.opportunity.id()
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.opportunity.start()
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.opportunity.method()
    }

    #[must_use]
    pub fn location(&self) -> &str {
        self.opportunity.location()
    }

    #[must_use]
    pub fn permits(&self) -> u32 {
        self.opportunity.permits()
    }
}
