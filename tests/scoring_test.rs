// End-to-end scoring of the 2025-26 hunt catalog.
mod common;

use std::path::Path;
use std::sync::Arc;

use draw_hunt_planner::analysis::{self, MoonCondition, PREMIUM_LIMIT, PremiumCriteria};
use draw_hunt_planner::ranking::{self, Direction, RankKey};
use draw_hunt_planner::scoring::{ScoringPolicy, ScoringProfile};
use draw_hunt_planner::{CompetitionTier, OpportunityScorer, ScoredOpportunity, SeasonCalendar};

use common::{date, load_hunts};

fn find<'a>(scored: &'a [ScoredOpportunity], id: &str) -> &'a ScoredOpportunity {
    scored
        .iter()
        .find(|s| s.id() == id)
        .unwrap_or_else(|| panic!("{id} missing from fixture"))
}

#[test]
fn catalog_scores_match_hand_computed_values() {
    let scorer = OpportunityScorer::default();
    let scored = scorer.score_all(&load_hunts());

    let cases = [
        ("PB-G-01", 0.7, "peak_rut", 3.94, CompetitionTier::VeryHigh),
        ("PB-A-01", 3.0, "pre_rut", 3.2, CompetitionTier::High),
        ("TO-G-01", 3.0, "pre_peak_rut", 3.3, CompetitionTier::Moderate),
        ("RF-GR-01", 3.0, "pre_peak_rut", 3.12, CompetitionTier::Moderate),
        ("SL-G-01", 0.0, "peak_rut", 3.18, CompetitionTier::VeryHigh),
        ("SL-A-02", 0.0, "transition", 1.44, CompetitionTier::Low),
        ("MH-G-01", 0.7, "peak_rut", 3.44, CompetitionTier::VeryHigh),
    ];
    for (id, moon, period, composite, tier) in cases {
        let item = find(&scored, id);
        assert!((item.moon.score - moon).abs() < 1e-9, "{id} moon {}", item.moon.score);
        assert_eq!(item.period.key, period, "{id} period");
        assert!(
            (item.composite_score - composite).abs() < 1e-9,
            "{id} composite {}",
            item.composite_score
        );
        assert_eq!(item.tier, tier, "{id} tier");
    }

    assert_eq!(find(&scored, "PB-G-01").opportunity.midpoint(), date(2025, 12, 31));
    assert!(find(&scored, "SL-A-02").period.is_fallback);
}

#[test]
fn composite_scores_keep_two_decimals() {
    let scored = OpportunityScorer::default().score_all(&load_hunts());
    for item in &scored {
        let cents = item.composite_score * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6, "{}: {}", item.id(), item.composite_score);
        let tenths = item.moon.score * 10.0;
        assert!((tenths - tenths.round()).abs() < 1e-6, "{}: {}", item.id(), item.moon.score);
    }
}

#[test]
fn yaml_calendar_scores_like_built_in() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/season_2025_26.yaml");
    let calendar = SeasonCalendar::load_from_path(&path).expect("calendar fixture");
    let from_yaml = OpportunityScorer::new(Arc::new(calendar), ScoringPolicy::default());
    let built_in = OpportunityScorer::default();

    let hunts = load_hunts();
    assert_eq!(from_yaml.score_all(&hunts), built_in.score_all(&hunts));
}

#[test]
fn parallel_batch_matches_sequential() {
    let scorer = OpportunityScorer::new(
        Arc::new(SeasonCalendar::season_2025_26()),
        ScoringPolicy::for_profile(ScoringProfile::Movement),
    );
    let hunts = load_hunts();
    assert_eq!(scorer.score_all(&hunts), scorer.score_all_parallel(&hunts));
}

#[test]
fn ranking_reports_over_catalog() {
    let scored = OpportunityScorer::default().score_all(&load_hunts());

    let ranked = ranking::rank(&scored);
    let top_four = ranking::top_n(&ranked, 4);
    let top: Vec<&str> = top_four.iter().map(ScoredOpportunity::id).collect();
    // RF-A-01 and TO-G-01 tie at 3.3; the earlier start wins.
    assert_eq!(top, vec!["PB-G-01", "MH-G-01", "RF-A-01", "TO-G-01"]);

    let strong = ranking::filter_threshold(&scored, 3.3);
    assert_eq!(strong.len(), 4);

    let by_permits = ranking::rank_by(&scored, RankKey::Permits, Direction::Descending);
    assert_eq!(by_permits[0].id(), "PB-G-01");

    let by_method = ranking::top_n_by_method(&scored, 1);
    assert_eq!(by_method.len(), 4);
}

#[test]
fn season_analysis_over_catalog() {
    let scored = OpportunityScorer::default().score_all(&load_hunts());

    let periods = analysis::period_breakdown(&scored);
    assert_eq!(periods.first().map(|p| p.key.as_str()), Some("peak_rut"));
    assert_eq!(periods.last().map(|p| p.key.as_str()), Some("transition"));

    let moon = analysis::moon_breakdown(&scored);
    let excellent = moon
        .iter()
        .find(|m| m.condition == MoonCondition::Excellent)
        .expect("new moon hunts present");
    assert_eq!(excellent.count, 6);

    let methods = analysis::method_comparison(&scored, 5.0);
    assert_eq!(methods[0].top.id(), "PB-G-01");
    assert_eq!(methods[0].peak_count, 3);

    let premium =
        analysis::premium_recommendations(&scored, &PremiumCriteria::default(), PREMIUM_LIMIT);
    let ids: Vec<&str> = premium.iter().map(ScoredOpportunity::id).collect();
    assert_eq!(ids, vec!["TO-G-01", "RF-GR-01"]);
}

#[test]
fn supply_analysis_over_catalog() {
    let hunts = load_hunts();

    let locations = analysis::location_breakdown(&hunts);
    let order: Vec<&str> = locations.iter().map(|l| l.location.as_str()).collect();
    assert_eq!(
        order,
        vec!["Phil Bryant WMA", "Riverfront", "Mahannah WMA", "Twin Oaks WMA", "Sky Lake WMA"]
    );
    assert_eq!(locations[0].total_permits, 50);
    assert!((locations[0].average_permits - 16.7).abs() < 1e-9);
    assert!((locations[0].average_duration - 3.7).abs() < 1e-9);

    let months = analysis::month_breakdown(&hunts);
    let counts: Vec<(&str, usize, u64)> = months
        .iter()
        .map(|m| (m.label.as_str(), m.count, m.total_permits))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("October 2025", 2, 32),
            ("November 2025", 2, 21),
            ("December 2025", 6, 92),
            ("January 2026", 2, 26),
            ("February 2026", 1, 9),
        ]
    );

    let estimates = analysis::competition_estimates(&hunts);
    let easiest: Vec<&str> = estimates.iter().take(3).map(|e| e.opportunity.id()).collect();
    // RF-A-01 and MH-G-01 tie at 8.33; the October hunt comes first.
    assert_eq!(easiest, vec!["PB-G-01", "RF-A-01", "MH-G-01"]);
    assert!((estimates[0].score - 6.5).abs() < 1e-9);
    assert_eq!(estimates.last().map(|e| e.opportunity.id()), Some("MH-PW-01"));
}

#[test]
fn scored_opportunity_serializes_to_json() {
    let scored = OpportunityScorer::default().score_all(&load_hunts());
    let value = serde_json::to_value(find(&scored, "TO-G-01")).expect("serializes");
    assert_eq!(value["opportunity"]["method"], "gun");
    assert_eq!(value["period"]["key"], "pre_peak_rut");
    assert_eq!(value["moon"]["phase"], "new");
    assert_eq!(value["tier"], "moderate");
}
