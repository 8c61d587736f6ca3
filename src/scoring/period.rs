//! Rut activity period lookup.

use chrono::NaiveDate;

use crate::calendar::SeasonCalendar;
use crate::model::PeriodScore;

/// Score of the first period whose inclusive range holds `midpoint`.
///
/// Periods are scanned in table order, so overlapping tables resolve to the
/// earlier entry. Dates outside every period get the calendar fallback.
#[must_use]
pub fn period_score(midpoint: NaiveDate, calendar: &SeasonCalendar) -> PeriodScore {
    calendar
        .periods
        .iter()
        .find(|period| period.contains(midpoint))
        .map_or_else(
            || PeriodScore {
                score: calendar.fallback.score,
                key: calendar.fallback.key.clone(),
                label: calendar.fallback.label.clone(),
                is_fallback: true,
            },
            |period| PeriodScore {
                score: period.score,
                key: period.key.clone(),
                label: period.label.clone(),
                is_fallback: false,
            },
        )
}
