//! Unit tests for run-length summaries.

use trainspec::units::{Distance, Pace, PaceBasis, Units};
use trainspec::workouts::summary::{summarize, summary_text, LineKind, SummaryOptions};
use trainspec::workouts::types::{Discipline, IntensityTarget, Step, StepKind};

fn easy() -> IntensityTarget {
    IntensityTarget::pace(Pace::new(585.0, PaceBasis::PerMile))
}

fn work() -> IntensityTarget {
    IntensityTarget::pace(Pace::new(463.0, PaceBasis::PerMile))
}

fn track_session() -> Vec<Step> {
    let mut steps = vec![Step::timed(StepKind::Warmup, 600).with_target(easy())];
    for _ in 0..6 {
        steps.push(
            Step::over(StepKind::Work, Distance::meters(800.0))
                .with_duration(230)
                .with_target(work()),
        );
        steps.push(Step::timed(StepKind::Recovery, 120).with_target(easy()));
    }
    steps.push(Step::timed(StepKind::Cooldown, 600).with_target(easy()));
    steps
}

#[test]
fn test_track_session_summary() {
    let opts = SummaryOptions::new(Discipline::Run, Units::Imperial);
    let lines = summarize(&track_session(), &opts);

    assert_eq!(
        summary_text(&lines),
        vec![
            "WU 10:00 (9:10–10:20/mi)",
            "6 × 800m (7:24–8:02/mi) jog 2:00 (9:10–10:20/mi)",
            "CD 10:00 (9:10–10:20/mi)",
        ]
    );
    assert_eq!(lines[0].kind, LineKind::Warmup);
    assert_eq!(lines[1].kind, LineKind::Repeat);
    assert_eq!(lines[2].kind, LineKind::Cooldown);
}

#[test]
fn test_metric_preference_converts_paces() {
    let opts = SummaryOptions::new(Discipline::Run, Units::Metric);
    let lines = summarize(&track_session(), &opts);
    assert!(lines[1].text().starts_with("6 × 800m ("));
    assert!(lines[1].text().contains("/km)"));
}

#[test]
fn test_every_block_round_trips() {
    let opts = SummaryOptions::new(Discipline::Run, Units::Imperial);
    let lines = summarize(&track_session(), &opts);
    for line in &lines {
        let expanded = line.block.expand();
        assert_eq!(expanded, line.block.original_segments);
        let again = summarize(&expanded, &opts);
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].text(), line.text());
        assert_eq!(again[0].block.repeat_count, line.block.repeat_count);
    }
}

#[test]
fn test_blocks_cover_every_step_in_order() {
    let steps = track_session();
    let lines = summarize(&steps, &SummaryOptions::new(Discipline::Run, Units::Imperial));
    let flattened: Vec<Step> = lines.iter().flat_map(|l| l.block.expand()).collect();
    assert_eq!(flattened, steps);
}

#[test]
fn test_idempotent_over_summary_output() {
    let opts = SummaryOptions::new(Discipline::Run, Units::Imperial);
    let first = summarize(&track_session(), &opts);
    let rebuilt: Vec<Step> = first.iter().flat_map(|l| l.block.expand()).collect();
    assert_eq!(summarize(&rebuilt, &opts), first);
}

#[test]
fn test_single_rep_uses_same_format() {
    let steps = vec![
        Step::over(StepKind::Work, Distance::meters(1600.0)).with_target(work()),
        Step::timed(StepKind::Recovery, 180),
    ];
    let lines = summarize(&steps, &SummaryOptions::new(Discipline::Run, Units::Imperial));
    assert_eq!(summary_text(&lines), vec!["1 × 1600m (7:24–8:02/mi) jog 3:00"]);
}

#[test]
fn test_ride_power_intervals() {
    let steps: Vec<Step> = (0..4)
        .flat_map(|_| {
            [
                Step::timed(StepKind::Work, 300).with_target(IntensityTarget::power_range(280.0, 300.0)),
                Step::timed(StepKind::Recovery, 180),
            ]
        })
        .collect();
    let lines = summarize(&steps, &SummaryOptions::new(Discipline::Ride, Units::Metric));
    assert_eq!(summary_text(&lines), vec!["4 × 5:00 (280–300W) easy 3:00"]);
}

#[test]
fn test_swim_distances_keep_yards() {
    let steps = vec![
        Step::over(StepKind::Work, Distance::yards(100.0)),
        Step::timed(StepKind::Recovery, 15),
        Step::over(StepKind::Work, Distance::yards(100.0)),
        Step::timed(StepKind::Recovery, 15),
    ];
    let lines = summarize(&steps, &SummaryOptions::new(Discipline::Swim, Units::Metric));
    assert_eq!(summary_text(&lines), vec!["2 × 100yd rest 0:15"]);
}

#[test]
fn test_empty_input() {
    assert!(summarize(&[], &SummaryOptions::default()).is_empty());
}
