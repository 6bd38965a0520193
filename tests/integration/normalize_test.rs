//! Integration tests for normalizing stored workout documents.
//!
//! Documents go through the lenient reader and the whole pipeline, the way a
//! calendar or detail view would consume them.

use trainspec::config::AthleteBaseline;
use trainspec::units::Units;
use trainspec::workouts::aggregate::DurationSource;
use trainspec::workouts::facts::{normalize, NormalizeContext, StepSource};
use trainspec::workouts::tokens::clear_token_cache;
use trainspec::workouts::types::{Discipline, WorkoutSpec};

const TRACK_WORKOUT: &str = r#"{
    "name": "Track 6x800",
    "discipline": "run",
    "date": "2026-03-14",
    "tags": ["track"],
    "totalDurationSeconds": 9999,
    "steps": [
        {"kind": "warmup", "durationSeconds": 600, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "work", "distance": "800m", "durationSeconds": 230, "target": {"type": "pace", "value": "7:43/mi"}},
        {"kind": "recovery", "durationSeconds": 120, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "work", "distance": "800m", "durationSeconds": 230, "target": {"type": "pace", "value": "7:43/mi"}},
        {"kind": "recovery", "durationSeconds": 120, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "work", "distance": "800m", "durationSeconds": 230, "target": {"type": "pace", "value": "7:43/mi"}},
        {"kind": "recovery", "durationSeconds": 120, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "work", "distance": "800m", "durationSeconds": 230, "target": {"type": "pace", "value": "7:43/mi"}},
        {"kind": "recovery", "durationSeconds": 120, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "work", "distance": "800m", "durationSeconds": 230, "target": {"type": "pace", "value": "7:43/mi"}},
        {"kind": "recovery", "durationSeconds": 120, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "work", "distance": "800m", "durationSeconds": 230, "target": {"type": "pace", "value": "7:43/mi"}},
        {"kind": "recovery", "durationSeconds": 120, "target": {"type": "pace", "value": 585, "basis": "per_mile"}},
        {"kind": "cooldown", "durationSeconds": 600, "target": {"type": "pace", "value": 585, "basis": "per_mile"}}
    ]
}"#;

#[test]
fn test_track_workout_facts() {
    let spec = WorkoutSpec::from_json_str(TRACK_WORKOUT).unwrap();
    let facts = normalize(&spec, &NormalizeContext::new(Units::Imperial));

    assert_eq!(facts.title, "Run — Intervals");
    assert_eq!(facts.step_source, StepSource::Structured);
    assert_eq!(facts.duration_source, DurationSource::Steps);
    assert_eq!(facts.total_seconds, Some(600 + 6 * (230 + 120) + 600));
    assert_eq!(facts.total_meters, 4800.0);
    assert_eq!(
        facts.lines,
        vec![
            "WU 10:00 (9:10–10:20/mi)",
            "6 × 800m (7:24–8:02/mi) jog 2:00 (9:10–10:20/mi)",
            "CD 10:00 (9:10–10:20/mi)",
        ]
    );
    assert!(facts.diagnostics.is_clean());
    assert_eq!(facts.date.map(|d| d.to_string()).as_deref(), Some("2026-03-14"));
}

#[test]
fn test_swim_tokens_document() {
    clear_token_cache();
    let spec = WorkoutSpec::from_json_str(
        r#"{
            "discipline": "swim",
            "steps_preset": "swim_warmup_200yd,swim_drill_catchup_4x50yd_r15,swim_mystery",
            "pool_length": 25,
            "pool_unit": "yd"
        }"#,
    )
    .unwrap();
    let facts = normalize(&spec, &NormalizeContext::new(Units::Imperial));

    assert_eq!(facts.step_source, StepSource::Tokens);
    assert_eq!(facts.lines, vec!["Warm-up 200yd", "Drills: catchup 4x50 @ :15r"]);
    assert_eq!(facts.diagnostics.skipped_tokens, 1);
    assert_eq!(facts.pool_lengths, Some(16));
    // 4 rests of 15 s are the only timed steps
    assert_eq!(facts.total_seconds, Some(60));
}

#[test]
fn test_broken_document_degrades_gracefully() {
    let spec = WorkoutSpec::from_json_str(
        r#"{
            "discipline": "run",
            "steps": "[{\"kind\": \"work\", oops",
            "totalDurationSeconds": "forty",
            "description": "Easy 45 min"
        }"#,
    )
    .unwrap();
    let facts = normalize(&spec, &NormalizeContext::default());

    assert_eq!(facts.step_source, StepSource::None);
    assert_eq!(facts.total_seconds, Some(2700));
    assert_eq!(facts.duration_source, DurationSource::Description);
    assert_eq!(facts.diagnostics.malformed_fields, 2);
    assert_eq!(facts.title, "Run — Easy");
}

#[test]
fn test_null_step_entry_keeps_the_rest() {
    let spec = WorkoutSpec::from_json_str(
        r#"{
            "discipline": "run",
            "steps": [{"kind": "warmup", "duration": 600}, null, {"kind": "work", "duration": 300}]
        }"#,
    )
    .unwrap();
    let facts = normalize(&spec, &NormalizeContext::default());

    assert_eq!(facts.step_source, StepSource::Structured);
    assert_eq!(facts.total_seconds, Some(900));
    assert_eq!(facts.duration_source, DurationSource::Steps);
    assert_eq!(facts.diagnostics.skipped_steps, 1);
    assert_eq!(facts.diagnostics.malformed_fields, 0);
    assert!(!facts.diagnostics.is_clean());
}

#[test]
fn test_ride_percent_ftp_uses_workout_ftp() {
    let spec = WorkoutSpec::from_json_str(
        r#"{
            "sport": "bike",
            "ftp": "280",
            "steps": [
                {"kind": "warmup", "duration": "10:00"},
                {"kind": "work", "duration": 480, "percent_ftp": [95, 105]},
                {"kind": "recovery", "duration": 240},
                {"kind": "work", "duration": 480, "percent_ftp": [95, 105]},
                {"kind": "recovery", "duration": 240},
                {"kind": "cooldown", "duration": 600}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(spec.discipline.present(), Some(&Discipline::Ride));

    let ctx = NormalizeContext::default().with_baseline(AthleteBaseline {
        ftp_watts: Some(200.0),
        ..Default::default()
    });
    let facts = normalize(&spec, &ctx);
    assert_eq!(facts.lines[1], "2 × 8:00 (266–294W) easy 4:00");
    assert_eq!(facts.total_seconds, Some(600 + 2 * (480 + 240) + 600));
}

#[test]
fn test_facts_serialize_to_json() {
    let spec = WorkoutSpec::from_json_str(TRACK_WORKOUT).unwrap();
    let facts = normalize(&spec, &NormalizeContext::new(Units::Metric));
    let json = serde_json::to_value(&facts).unwrap();

    assert_eq!(json["duration_source"], "steps");
    assert_eq!(json["discipline"], "run");
    assert_eq!(json["steps"].as_array().map(Vec::len), Some(14));
    assert_eq!(json["diagnostics"]["skipped_tokens"], 0);
}

#[test]
fn test_non_object_document_is_an_error() {
    assert!(WorkoutSpec::from_json_str("[]").is_err());
    assert!(WorkoutSpec::from_json_str("not json").is_err());
}
