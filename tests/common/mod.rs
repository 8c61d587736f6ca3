use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use draw_hunt_planner::{Method, Opportunity};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct HuntRecord {
    id: String,
    name: String,
    location: String,
    method: Method,
    start: NaiveDate,
    end: NaiveDate,
    permits: u32,
}

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

/// The 2025-26 draw hunt catalog used across integration tests.
pub fn load_hunts() -> Vec<Opportunity> {
    let raw = fs::read_to_string(fixture_path("draw_hunts_2025_26.json"))
        .expect("failed to read hunt fixture");
    let records: Vec<HuntRecord> =
        serde_json::from_str(&raw).expect("failed to parse hunt fixture");
    records
        .into_iter()
        .map(|r| {
            Opportunity::new(r.id, r.name, r.location, r.method, r.start, r.end, r.permits)
                .expect("fixture hunts are valid")
        })
        .collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
