//! Season reference tables: lunar events and rut activity periods.
//!
//! A [`SeasonCalendar`] is built once per run and shared read-only with the
//! scorer. The 2025-26 Yazoo County tables ship built in; other seasons load
//! from YAML.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Principal lunar phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhase {
    New,
    FirstQuarter,
    Full,
    ThirdQuarter,
}

impl std::fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LunarPhase::New => write!(f, "New"),
            LunarPhase::FirstQuarter => write!(f, "First Quarter"),
            LunarPhase::Full => write!(f, "Full"),
            LunarPhase::ThirdQuarter => write!(f, "Third Quarter"),
        }
    }
}

/// A dated lunar event with a signed intensity. Full moons carry negative
/// intensity to model poor daytime movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarReferencePoint {
    pub date: NaiveDate,
    pub phase: LunarPhase,
    pub intensity: f64,
}

impl LunarReferencePoint {
    #[must_use]
    pub fn new(date: NaiveDate, phase: LunarPhase, intensity: f64) -> Self {
        Self {
            date,
            phase,
            intensity,
        }
    }
}

/// Inclusive date range with a rut activity intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPeriod {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub score: f64,
}

impl ActivityPeriod {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        score: f64,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            start,
            end,
            score,
        }
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Score reported for dates outside every configured period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodFallback {
    pub key: String,
    pub label: String,
    pub score: f64,
}

impl Default for PeriodFallback {
    fn default() -> Self {
        Self {
            key: "transition".to_string(),
            label: "Transition Period".to_string(),
            score: 1.0,
        }
    }
}

/// Immutable reference data for one hunting season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    pub name: String,
    pub lunar_events: Vec<LunarReferencePoint>,
    /// Ordered; the first period containing a date wins.
    pub periods: Vec<ActivityPeriod>,
    #[serde(default)]
    pub fallback: PeriodFallback,
}

impl SeasonCalendar {
    /// Build a calendar, rejecting inverted periods and non-finite scores.
    ///
    /// # Errors
    /// Returns [`CalendarError::InvalidPeriod`] for an inverted period and
    /// [`CalendarError::NonFinite`] for a NaN or infinite intensity.
    pub fn new(
        name: impl Into<String>,
        lunar_events: Vec<LunarReferencePoint>,
        periods: Vec<ActivityPeriod>,
    ) -> Result<Self, CalendarError> {
        let calendar = Self {
            name: name.into(),
            lunar_events,
            periods,
            fallback: PeriodFallback::default(),
        };
        calendar.validate()?;
        Ok(calendar)
    }

    /// Yazoo County, Mississippi 2025-26 deer season.
    #[must_use]
    pub fn season_2025_26() -> Self {
        use LunarPhase::{FirstQuarter, Full, New, ThirdQuarter};

        let lunar_events = [
            ((2025, 10, 6), Full, -1.0),
            ((2025, 10, 13), ThirdQuarter, 1.0),
            ((2025, 10, 21), New, 3.0),
            ((2025, 10, 29), FirstQuarter, 1.0),
            ((2025, 11, 5), Full, -1.0),
            ((2025, 11, 11), ThirdQuarter, 1.0),
            ((2025, 11, 20), New, 3.0),
            ((2025, 11, 28), FirstQuarter, 1.0),
            ((2025, 12, 4), Full, -1.0),
            ((2025, 12, 11), ThirdQuarter, 1.0),
            ((2025, 12, 19), New, 3.0),
            ((2025, 12, 27), FirstQuarter, 1.0),
            ((2026, 1, 13), Full, -1.0),
            ((2026, 1, 20), New, 3.0),
        ]
        .into_iter()
        .filter_map(|((y, m, d), phase, intensity)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| LunarReferencePoint::new(date, phase, intensity))
        })
        .collect();

        let periods = [
            ("pre_rut", "Pre-Rut (Building Activity)", (2025, 10, 1), (2025, 12, 15), 3.0),
            ("pre_peak_rut", "Pre-Peak Rut (Chasing Activity)", (2025, 12, 16), (2025, 12, 28), 4.0),
            ("peak_rut", "Peak Rut (Prime Time)", (2025, 12, 29), (2026, 1, 4), 5.0),
            ("post_rut", "Post-Rut (Recovery Period)", (2026, 1, 5), (2026, 1, 20), 3.0),
            ("late_season", "Late Season (Food Focus)", (2026, 1, 21), (2026, 1, 31), 2.0),
        ]
        .into_iter()
        .filter_map(|(key, label, (sy, sm, sd), (ey, em, ed), score)| {
            let start = NaiveDate::from_ymd_opt(sy, sm, sd)?;
            let end = NaiveDate::from_ymd_opt(ey, em, ed)?;
            Some(ActivityPeriod::new(key, label, start, end, score))
        })
        .collect();

        Self {
            name: "2025-26".to_string(),
            lunar_events,
            periods,
            fallback: PeriodFallback::default(),
        }
    }

    /// Parse a calendar from YAML.
    ///
    /// # Errors
    /// Returns [`CalendarError::Parse`] for malformed YAML and
    /// [`CalendarError::InvalidPeriod`] for an inverted period.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CalendarError> {
        let calendar: Self = serde_yaml::from_str(contents).map_err(CalendarError::Parse)?;
        calendar.validate()?;
        Ok(calendar)
    }

    /// Load a calendar from a YAML file.
    ///
    /// # Errors
    /// Returns [`CalendarError`] when the file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, CalendarError> {
        let contents = fs::read_to_string(path).map_err(|source| CalendarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let calendar: Self =
            serde_yaml::from_str(&contents).map_err(|source| CalendarError::Deserialize {
                path: path.to_path_buf(),
                source,
            })?;
        calendar.validate()?;
        tracing::debug!(
            path = %path.display(),
            season = %calendar.name,
            lunar_events = calendar.lunar_events.len(),
            periods = calendar.periods.len(),
            "loaded season calendar"
        );
        Ok(calendar)
    }

    /// Period with the highest intensity, first on ties.
    #[must_use]
    pub fn peak_period(&self) -> Option<&ActivityPeriod> {
        self.periods.iter().fold(None, |best, period| match best {
            Some(current) if current.score >= period.score => Some(current),
            _ => Some(period),
        })
    }

    /// Intensity of the peak period, or the fallback score for an empty table.
    #[must_use]
    pub fn peak_score(&self) -> f64 {
        self.peak_period()
            .map_or(self.fallback.score, |period| period.score)
    }

    fn validate(&self) -> Result<(), CalendarError> {
        if let Some(period) = self.periods.iter().find(|p| p.end < p.start) {
            return Err(CalendarError::InvalidPeriod {
                key: period.key.clone(),
                start: period.start,
                end: period.end,
            });
        }
        if let Some(event) = self.lunar_events.iter().find(|e| !e.intensity.is_finite()) {
            return Err(CalendarError::NonFinite {
                field: format!("lunar event {} intensity", event.date),
                value: event.intensity,
            });
        }
        if let Some(period) = self.periods.iter().find(|p| !p.score.is_finite()) {
            return Err(CalendarError::NonFinite {
                field: format!("activity period {} score", period.key),
                value: period.score,
            });
        }
        if !self.fallback.score.is_finite() {
            return Err(CalendarError::NonFinite {
                field: format!("fallback {} score", self.fallback.key),
                value: self.fallback.score,
            });
        }
        Ok(())
    }
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self::season_2025_26()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("failed to read season calendar at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse season calendar at {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse season calendar: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("activity period {key} ends on {end} before it starts on {start}")]
    InvalidPeriod {
        key: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: String, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/season_2025_26.yaml")
    }

    #[test]
    fn built_in_season_has_expected_tables() {
        let calendar = SeasonCalendar::season_2025_26();
        assert_eq!(calendar.lunar_events.len(), 14);
        assert_eq!(calendar.periods.len(), 5);
        assert_eq!(calendar.periods[2].key, "peak_rut");
        assert!(calendar.periods[2].contains(date(2025, 12, 29)));
        assert!(calendar.periods[2].contains(date(2026, 1, 4)));
        assert!(!calendar.periods[2].contains(date(2026, 1, 5)));
    }

    #[test]
    fn peak_period_is_highest_score() {
        let calendar = SeasonCalendar::season_2025_26();
        let peak = calendar.peak_period().expect("peak");
        assert_eq!(peak.key, "peak_rut");
        assert!((calendar.peak_score() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn peak_score_falls_back_for_empty_table() {
        let calendar = SeasonCalendar::new("empty", vec![], vec![]).expect("valid");
        assert!(calendar.peak_period().is_none());
        assert!((calendar.peak_score() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_rejects_inverted_period() {
        let err = SeasonCalendar::new(
            "bad",
            vec![],
            vec![ActivityPeriod::new(
                "oops",
                "Oops",
                date(2026, 1, 10),
                date(2026, 1, 1),
                2.0,
            )],
        )
        .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidPeriod { key, .. } if key == "oops"));
    }

    #[test]
    fn fixture_matches_built_in_season() {
        let loaded = SeasonCalendar::load_from_path(&fixture_path()).expect("fixture parses");
        assert_eq!(loaded, SeasonCalendar::season_2025_26());
    }

    #[test]
    fn from_yaml_defaults_fallback() {
        let yaml = r#"
name: "test"
lunar_events:
  - date: "2026-01-20"
    phase: new
    intensity: 3.0
periods:
  - key: peak
    label: Peak
    start: "2025-12-29"
    end: "2026-01-04"
    score: 5.0
"#;
        let calendar = SeasonCalendar::from_yaml_str(yaml).expect("parses");
        assert_eq!(calendar.fallback, PeriodFallback::default());
        assert_eq!(calendar.lunar_events[0].phase, LunarPhase::New);
    }

    #[test]
    fn from_yaml_rejects_inverted_period() {
        let yaml = r#"
name: "test"
lunar_events: []
periods:
  - key: broken
    label: Broken
    start: "2026-01-04"
    end: "2025-12-29"
    score: 5.0
"#;
        let err = SeasonCalendar::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidPeriod { .. }));
    }

    #[test]
    fn new_rejects_nan_period_score() {
        let err = SeasonCalendar::new(
            "bad",
            vec![],
            vec![ActivityPeriod::new(
                "peak",
                "Peak",
                date(2025, 12, 29),
                date(2026, 1, 4),
                f64::NAN,
            )],
        )
        .unwrap_err();
        assert!(
            matches!(err, CalendarError::NonFinite { ref field, value } if field == "activity period peak score" && value.is_nan())
        );
    }

    #[test]
    fn new_rejects_infinite_lunar_intensity() {
        let err = SeasonCalendar::new(
            "bad",
            vec![LunarReferencePoint::new(
                date(2026, 1, 18),
                LunarPhase::New,
                f64::NEG_INFINITY,
            )],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, CalendarError::NonFinite { .. }));
    }

    #[test]
    fn from_yaml_rejects_nan_intensity() {
        let yaml = r#"
name: "test"
lunar_events:
  - date: "2026-01-18"
    phase: new
    intensity: .nan
periods: []
"#;
        let err = SeasonCalendar::from_yaml_str(yaml).unwrap_err();
        assert!(
            matches!(err, CalendarError::NonFinite { ref field, .. } if field == "lunar event 2026-01-18 intensity")
        );
    }

    #[test]
    fn from_yaml_rejects_infinite_period_score() {
        let yaml = r#"
name: "test"
lunar_events: []
periods:
  - key: peak
    label: Peak
    start: "2025-12-29"
    end: "2026-01-04"
    score: .inf
"#;
        let err = SeasonCalendar::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            CalendarError::NonFinite { value, .. } if value == f64::INFINITY
        ));
    }

    #[test]
    fn from_yaml_rejects_non_finite_fallback() {
        let yaml = r#"
name: "test"
lunar_events: []
periods: []
fallback:
  key: transition
  label: Transition Period
  score: -.inf
"#;
        let err = SeasonCalendar::from_yaml_str(yaml).unwrap_err();
        assert!(
            matches!(err, CalendarError::NonFinite { ref field, .. } if field == "fallback transition score")
        );
    }

    #[test]
    fn load_from_path_errors_for_missing_file() {
        let missing = fixture_path().with_file_name("does-not-exist.yaml");
        let err = SeasonCalendar::load_from_path(&missing).unwrap_err();
        match err {
            CalendarError::Io { path, .. } => assert!(path.ends_with("does-not-exist.yaml")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_from_path_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "name: [unterminated").expect("write");
        let err = SeasonCalendar::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, CalendarError::Deserialize { .. }));
    }
}
