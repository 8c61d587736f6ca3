//! Draw hunt planner.
//!
//! Scores seasonal permit-draw opportunities against lunar and rut activity
//! tables, ranks them, and picks a small diversified set of applications
//! under date, method, period and competition-tier constraints.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod calendar;
pub mod config;
pub mod model;
pub mod observability;
pub mod ranking;
pub mod scoring;
pub mod selection;

pub use calendar::{ActivityPeriod, LunarPhase, LunarReferencePoint, SeasonCalendar};
pub use config::{ConfigError, PlannerConfig};
pub use model::{CompetitionTier, Method, Opportunity, OpportunityError, ScoredOpportunity};
pub use scoring::OpportunityScorer;
pub use selection::{
    DiversifiedSelector, OpportunitySelector, SelectedOpportunity, SelectionConstraints,
    SelectionError, SelectionResult, SelectionStatus, select_diversified,
};
