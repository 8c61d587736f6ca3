use std::{env, num::NonZeroUsize, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::calendar::{CalendarError, SeasonCalendar};
use crate::model::{CompetitionTier, Method};
use crate::scoring::{OpportunityScorer, ScoringPolicy, ScoringProfile};
use crate::selection::{DiversifiedSelector, SelectionConstraints, SelectionPolicy};

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    scoring_profile: ScoringProfile,
    selection_size: NonZeroUsize,
    selection_policy: SelectionPolicy,
    constraints: SelectionConstraints,
    season_calendar_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PlannerConfig {
    /// Read planner settings from `HUNT_*` environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SelectionPolicy::default();

        let scoring_profile = parse_from_str("HUNT_SCORING_PROFILE", ScoringProfile::default())?;
        let selection_size = parse_non_zero_usize("HUNT_SELECTION_SIZE", 5)?;
        let selection_policy = SelectionPolicy {
            high_quality_threshold: parse_f64(
                "HUNT_HIGH_QUALITY_THRESHOLD",
                defaults.high_quality_threshold,
            )?,
            location_bonus: parse_non_negative_f64("HUNT_LOCATION_BONUS", defaults.location_bonus)?,
            method_bonus: parse_non_negative_f64("HUNT_METHOD_BONUS", defaults.method_bonus)?,
            ..defaults
        };

        let mut constraints = SelectionConstraints {
            required_method: parse_optional::<Method>("HUNT_REQUIRED_METHOD")?,
            required_period: optional_var("HUNT_REQUIRED_PERIOD"),
            ..SelectionConstraints::default()
        };
        if let Some(cap) = parse_optional::<usize>("HUNT_MAX_VERY_HIGH")? {
            constraints.tier_caps.insert(CompetitionTier::VeryHigh, cap);
        }

        let season_calendar_path = optional_var("HUNT_SEASON_CALENDAR").map(PathBuf::from);

        let config = Self {
            scoring_profile,
            selection_size,
            selection_policy,
            constraints,
            season_calendar_path,
        };
        tracing::debug!(
            profile = %config.scoring_profile,
            selection_size = config.selection_size.get(),
            required_method = ?config.constraints.required_method,
            required_period = ?config.constraints.required_period,
            "loaded planner config"
        );
        Ok(config)
    }

    #[must_use]
    pub fn scoring_profile(&self) -> ScoringProfile {
        self.scoring_profile
    }

    #[must_use]
    pub fn selection_size(&self) -> usize {
        self.selection_size.get()
    }

    #[must_use]
    pub fn selection_policy(&self) -> &SelectionPolicy {
        &self.selection_policy
    }

    #[must_use]
    pub fn constraints(&self) -> &SelectionConstraints {
        &self.constraints
    }

    #[must_use]
    pub fn season_calendar_path(&self) -> Option<&PathBuf> {
        self.season_calendar_path.as_ref()
    }

    #[must_use]
    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy::for_profile(self.scoring_profile)
    }

    /// The configured calendar file, or the built-in season.
    ///
    /// # Errors
    /// Returns [`CalendarError`] when the configured file is unusable.
    pub fn load_calendar(&self) -> Result<SeasonCalendar, CalendarError> {
        match &self.season_calendar_path {
            Some(path) => SeasonCalendar::load_from_path(path),
            None => Ok(SeasonCalendar::season_2025_26()),
        }
    }

    /// # Errors
    /// Returns [`CalendarError`] when the configured calendar is unusable.
    pub fn scorer(&self) -> Result<OpportunityScorer, CalendarError> {
        let calendar = self.load_calendar()?;
        Ok(OpportunityScorer::new(
            Arc::new(calendar),
            self.scoring_policy(),
        ))
    }

    /// Selector whose peak notes follow `calendar`.
    #[must_use]
    pub fn selector(&self, calendar: &SeasonCalendar) -> DiversifiedSelector {
        DiversifiedSelector::new(SelectionPolicy {
            peak_period_score: calendar.peak_score(),
            ..self.selection_policy.clone()
        })
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scoring_profile: ScoringProfile::default(),
            selection_size: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            selection_policy: SelectionPolicy::default(),
            constraints: SelectionConstraints::default(),
            season_calendar_path: None,
        }
    }
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_optional<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(name)
        .map(|raw| {
            raw.parse::<T>().map_err(|error| ConfigError::Invalid {
                name,
                source: anyhow::anyhow!("{error}"),
            })
        })
        .transpose()
}

fn parse_from_str<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(name)?.unwrap_or(default))
}

fn parse_non_zero_usize(name: &'static str, default: usize) -> Result<NonZeroUsize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = raw.trim().parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    NonZeroUsize::new(parsed).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("must be greater than zero"),
    })
}

fn parse_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = raw.trim().parse::<f64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    if !parsed.is_finite() {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("must be a finite number"),
        });
    }
    Ok(parsed)
}

fn parse_non_negative_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let parsed = parse_f64(name, default)?;
    if parsed < 0.0 {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("must not be negative"),
        });
    }
    Ok(parsed)
}
