//! Moon proximity scoring.
//!
//! Each lunar reference point contributes its intensity decayed by how many
//! days separate it from the hunt midpoint. The best single contribution
//! wins; contributions are never summed or averaged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MOON_DECIMALS, round_to};
use crate::calendar::LunarReferencePoint;
use crate::model::MoonScore;

/// Contributions within `max_days` keep `fraction` of the event intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub max_days: i64,
    pub fraction: f64,
}

/// Ordered distance bands. Distances past the last band score zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonBands {
    bands: Vec<DistanceBand>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoonBandsError {
    #[error("at least one distance band is required")]
    Empty,
    #[error("distance bands must be strictly ascending, {previous} then {next} days")]
    NotAscending { previous: i64, next: i64 },
    #[error("band fraction {0} must be non-negative")]
    NegativeFraction(f64),
}

impl MoonBands {
    /// Build validated bands.
    ///
    /// # Errors
    /// Returns [`MoonBandsError`] when the list is empty, not strictly
    /// ascending by distance, or carries a negative fraction.
    pub fn new(bands: Vec<DistanceBand>) -> Result<Self, MoonBandsError> {
        if bands.is_empty() {
            return Err(MoonBandsError::Empty);
        }
        for pair in bands.windows(2) {
            if pair[1].max_days <= pair[0].max_days {
                return Err(MoonBandsError::NotAscending {
                    previous: pair[0].max_days,
                    next: pair[1].max_days,
                });
            }
        }
        if let Some(band) = bands.iter().find(|b| b.fraction < 0.0) {
            return Err(MoonBandsError::NegativeFraction(band.fraction));
        }
        Ok(Self { bands })
    }

    #[must_use]
    pub fn bands(&self) -> &[DistanceBand] {
        &self.bands
    }

    /// Fraction of intensity retained at `days` from the event.
    #[must_use]
    pub fn fraction_for(&self, days: i64) -> f64 {
        self.bands
            .iter()
            .find(|band| days <= band.max_days)
            .map_or(0.0, |band| band.fraction)
    }
}

impl Default for MoonBands {
    /// Within 2 days: full intensity; 4 days: 70%; 7 days: 40%.
    fn default() -> Self {
        Self {
            bands: vec![
                DistanceBand {
                    max_days: 2,
                    fraction: 1.0,
                },
                DistanceBand {
                    max_days: 4,
                    fraction: 0.7,
                },
                DistanceBand {
                    max_days: 7,
                    fraction: 0.4,
                },
            ],
        }
    }
}

/// Best decayed lunar contribution at `midpoint`.
///
/// Ties on the decayed value go to the closer event, then to table order.
/// An empty table scores zero with no phase.
#[must_use]
pub fn moon_proximity_score(
    midpoint: NaiveDate,
    events: &[LunarReferencePoint],
    bands: &MoonBands,
) -> MoonScore {
    let mut best: Option<(f64, i64, &LunarReferencePoint)> = None;

    for event in events {
        let days = (midpoint - event.date).num_days().abs();
        let fraction = bands.fraction_for(days);
        let value = if fraction > 0.0 {
            event.intensity * fraction
        } else {
            0.0
        };

        let better = match best {
            None => true,
            Some((best_value, best_days, _)) => {
                value > best_value
                    || ((value - best_value).abs() < f64::EPSILON && days < best_days)
            }
        };
        if better {
            best = Some((value, days, event));
        }
    }

    match best {
        Some((value, days, event)) => MoonScore {
            score: round_to(value, MOON_DECIMALS),
            phase: Some(event.phase),
            days_from_event: Some(days),
        },
        None => MoonScore::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{LunarPhase, SeasonCalendar};
    use chrono::Days;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn single_new_moon() -> Vec<LunarReferencePoint> {
        vec![LunarReferencePoint::new(
            date(2025, 12, 19),
            LunarPhase::New,
            3.0,
        )]
    }

    #[rstest]
    #[case(0, 3.0)]
    #[case(2, 3.0)]
    #[case(3, 2.1)]
    #[case(4, 2.1)]
    #[case(5, 1.2)]
    #[case(7, 1.2)]
    #[case(8, 0.0)]
    #[case(30, 0.0)]
    fn band_edges_decay_intensity(#[case] offset: u64, #[case] expected: f64) {
        let bands = MoonBands::default();
        let events = single_new_moon();

        let after = moon_proximity_score(date(2025, 12, 19) + Days::new(offset), &events, &bands);
        let before = moon_proximity_score(date(2025, 12, 19) - Days::new(offset), &events, &bands);

        assert!((after.score - expected).abs() < 1e-12, "after +{offset}: {}", after.score);
        assert!((before.score - expected).abs() < 1e-12, "before -{offset}: {}", before.score);
    }

    #[test]
    fn score_is_max_not_sum() {
        let events = vec![
            LunarReferencePoint::new(date(2025, 12, 19), LunarPhase::New, 3.0),
            LunarReferencePoint::new(date(2025, 12, 21), LunarPhase::FirstQuarter, 1.0),
        ];
        let result = moon_proximity_score(date(2025, 12, 20), &events, &MoonBands::default());
        assert!((result.score - 3.0).abs() < f64::EPSILON);
        assert_eq!(result.phase, Some(LunarPhase::New));
        assert_eq!(result.days_from_event, Some(1));
    }

    #[test]
    fn negative_intensity_is_not_clamped() {
        let events = vec![LunarReferencePoint::new(
            date(2025, 12, 4),
            LunarPhase::Full,
            -1.0,
        )];
        let result = moon_proximity_score(date(2025, 12, 7), &events, &MoonBands::default());
        assert!((result.score - (-0.7)).abs() < 1e-12);
        assert_eq!(result.phase, Some(LunarPhase::Full));
    }

    #[test]
    fn quarter_moon_beats_closer_full_moon() {
        let calendar = SeasonCalendar::season_2025_26();
        // Dec 4 full moon is one day away, Nov 28 first quarter five days.
        let result = moon_proximity_score(
            date(2025, 12, 3),
            &calendar.lunar_events,
            &MoonBands::default(),
        );
        assert!((result.score - 0.4).abs() < 1e-12);
        assert_eq!(result.phase, Some(LunarPhase::FirstQuarter));
        assert_eq!(result.days_from_event, Some(5));
    }

    #[test]
    fn far_events_outrank_a_lone_full_moon() {
        let events = vec![
            LunarReferencePoint::new(date(2025, 12, 4), LunarPhase::Full, -1.0),
            LunarReferencePoint::new(date(2026, 1, 20), LunarPhase::New, 3.0),
        ];
        let result = moon_proximity_score(date(2025, 12, 3), &events, &MoonBands::default());
        assert!(result.score.abs() < f64::EPSILON);
        assert_eq!(result.phase, Some(LunarPhase::New));
    }

    #[test]
    fn empty_table_scores_zero() {
        let result = moon_proximity_score(date(2025, 12, 3), &[], &MoonBands::default());
        assert_eq!(result, MoonScore::none());
    }

    #[test]
    fn ties_prefer_the_closer_event() {
        let events = vec![
            LunarReferencePoint::new(date(2025, 10, 1), LunarPhase::Full, -1.0),
            LunarReferencePoint::new(date(2025, 12, 30), LunarPhase::ThirdQuarter, 1.0),
        ];
        // Both contribute zero from Dec 15; Dec 30 is closer.
        let result = moon_proximity_score(date(2025, 12, 15), &events, &MoonBands::default());
        assert!(result.score.abs() < f64::EPSILON);
        assert_eq!(result.phase, Some(LunarPhase::ThirdQuarter));
        assert_eq!(result.days_from_event, Some(15));
    }

    #[test]
    fn custom_bands_are_respected() {
        let bands = MoonBands::new(vec![
            DistanceBand {
                max_days: 1,
                fraction: 1.0,
            },
            DistanceBand {
                max_days: 3,
                fraction: 0.5,
            },
        ])
        .expect("valid bands");
        let events = single_new_moon();
        let near = moon_proximity_score(date(2025, 12, 22), &events, &bands);
        let far = moon_proximity_score(date(2025, 12, 23), &events, &bands);
        assert!((near.score - 1.5).abs() < 1e-12);
        assert!(far.score.abs() < f64::EPSILON);
    }

    #[test]
    fn bands_must_ascend() {
        let err = MoonBands::new(vec![
            DistanceBand {
                max_days: 4,
                fraction: 0.7,
            },
            DistanceBand {
                max_days: 2,
                fraction: 1.0,
            },
        ])
        .unwrap_err();
        assert_eq!(err, MoonBandsError::NotAscending { previous: 4, next: 2 });
    }

    #[test]
    fn bands_reject_empty_and_negative() {
        assert_eq!(MoonBands::new(vec![]).unwrap_err(), MoonBandsError::Empty);
        let err = MoonBands::new(vec![DistanceBand {
            max_days: 2,
            fraction: -0.5,
        }])
        .unwrap_err();
        assert!(matches!(err, MoonBandsError::NegativeFraction(_)));
    }

    proptest::proptest! {
        #[test]
        fn score_never_rises_with_distance(
            intensity in 0.0f64..5.0,
            near in 0u64..30,
            extra in 0u64..30,
        ) {
            let event = date(2025, 12, 19);
            let events = vec![LunarReferencePoint::new(event, LunarPhase::New, intensity)];
            let bands = MoonBands::default();
            let closer = moon_proximity_score(event + Days::new(near), &events, &bands);
            let farther = moon_proximity_score(event + Days::new(near + extra), &events, &bands);
            proptest::prop_assert!(closer.score >= farther.score);
        }
    }
}
