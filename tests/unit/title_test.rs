//! Unit tests for discipline titles.

use trainspec::workouts::title::{category, title};
use trainspec::workouts::types::{Discipline, Field, WorkoutSpec};

#[test]
fn test_run_titles_from_text() {
    let cases = [
        ("Tuesday tempo", "Run — Tempo"),
        ("Hill repeats", "Run — Hills"),
        ("Track 12x400", "Run — Intervals"),
        ("Sunday long run", "Run — Long Run"),
        ("Shakeout", "Run — Easy"),
        ("Morning run", "Run"),
    ];
    for (name, expected) in cases {
        let spec = WorkoutSpec::new(Discipline::Run).with_name(name);
        assert_eq!(title(&spec), expected, "name {:?}", name);
    }
}

#[test]
fn test_tags_always_beat_text() {
    let spec = WorkoutSpec::new(Discipline::Ride)
        .with_name("Threshold 2x20")
        .with_tags(&["endurance"]);
    assert_eq!(title(&spec), "Ride — Endurance");
}

#[test]
fn test_tokens_beat_description() {
    let spec = WorkoutSpec::new(Discipline::Run)
        .with_description("easy day really")
        .with_tokens(&["run_strides_6x20s_r40"]);
    assert_eq!(category(&spec), Some("Strides"));
}

#[test]
fn test_name_checked_before_description() {
    let spec = WorkoutSpec::new(Discipline::Swim)
        .with_name("CSS set")
        .with_description("lots of drills");
    assert_eq!(title(&spec), "Swim — Threshold");
}

#[test]
fn test_other_disciplines() {
    let spec = WorkoutSpec::new(Discipline::Strength).with_description("Squats and lunges");
    assert_eq!(title(&spec), "Strength — Lower Body");

    let spec = WorkoutSpec::new(Discipline::PilatesYoga).with_name("Vinyasa flow");
    assert_eq!(title(&spec), "Pilates/Yoga — Yoga");

    let spec = WorkoutSpec::new(Discipline::Mobility);
    assert_eq!(title(&spec), "Mobility");
}

#[test]
fn test_unknown_discipline_is_session() {
    let mut spec = WorkoutSpec::default().with_name("Tempo");
    assert_eq!(title(&spec), "Session");

    spec.discipline = Field::Malformed("kayak".to_string());
    assert_eq!(title(&spec), "Session");
}
