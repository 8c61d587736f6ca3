//! Month-based seasonal conditions score.
//!
//! Cold fronts drive daytime deer movement, so the colder months score
//! higher. Only weighted by the `movement` profile.

use chrono::{Datelike, NaiveDate};

#[must_use]
pub fn seasonal_conditions_score(midpoint: NaiveDate) -> f64 {
    match midpoint.month() {
        12 => 5.0,
        1 | 11 => 4.0,
        10 => 3.0,
        _ => 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2025, 12, 5.0)]
    #[case(2026, 1, 4.0)]
    #[case(2025, 11, 4.0)]
    #[case(2025, 10, 3.0)]
    #[case(2026, 2, 2.0)]
    #[case(2025, 9, 2.0)]
    fn month_table(#[case] year: i32, #[case] month: u32, #[case] expected: f64) {
        let midpoint = NaiveDate::from_ymd_opt(year, month, 15).expect("valid date");
        assert!((seasonal_conditions_score(midpoint) - expected).abs() < f64::EPSILON);
    }
}
