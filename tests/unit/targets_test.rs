//! Unit tests for target range resolution.

use trainspec::config::AthleteBaseline;
use trainspec::units::{Pace, PaceBasis, Units};
use trainspec::workouts::targets::{resolve, ToleranceConfig, EASY_TOLERANCE, QUALITY_TOLERANCE};
use trainspec::workouts::types::{IntensityTarget, RangeUnit, StepKind, TargetValue};

fn resolve_default(target: &IntensityTarget, kind: StepKind) -> Option<trainspec::workouts::types::TargetRange> {
    resolve(target, kind, &ToleranceConfig::default(), &AthleteBaseline::default(), Units::Metric)
}

#[test]
fn test_default_constants() {
    assert_eq!(QUALITY_TOLERANCE, 0.04);
    assert_eq!(EASY_TOLERANCE, 0.06);
}

#[test]
fn test_work_and_easy_paces() {
    let work = IntensityTarget::pace(Pace::new(463.0, PaceBasis::PerMile));
    let range = resolve_default(&work, StepKind::Work).unwrap();
    assert_eq!((range.lower, range.upper), (444.0, 482.0));
    assert_eq!(range.render(Units::Imperial), "7:24–8:02/mi");

    let easy = IntensityTarget::pace(Pace::new(585.0, PaceBasis::PerMile));
    for kind in [StepKind::Warmup, StepKind::Recovery, StepKind::Cooldown] {
        let range = resolve_default(&easy, kind).unwrap();
        assert_eq!(range.render(Units::Imperial), "9:10–10:20/mi");
    }
}

#[test]
fn test_first_matching_shape_wins() {
    // A structured pair is used as-is, never widened.
    let pair = IntensityTarget::Pace {
        value: TargetValue::Pair([470.0, 440.0]),
        basis: Some(PaceBasis::PerMile),
    };
    let range = resolve_default(&pair, StepKind::Work).unwrap();
    assert_eq!((range.lower, range.upper), (440.0, 470.0));
    assert_eq!(range.unit, RangeUnit::PacePerMile);
}

#[test]
fn test_lower_never_exceeds_upper() {
    let targets = [
        IntensityTarget::pace_text("4:30/km"),
        IntensityTarget::pace_range(300.0, 280.0, PaceBasis::PerKm),
        IntensityTarget::power_range(260.0, 240.0),
        IntensityTarget::heart_rate(160.0, 150.0),
        IntensityTarget::Power {
            value: TargetValue::Scalar(250.0),
            basis: Default::default(),
        },
    ];
    for target in &targets {
        for kind in [StepKind::Work, StepKind::Recovery] {
            let range = resolve_default(target, kind).unwrap();
            assert!(range.lower <= range.upper);
            assert!(range.lower > 0.0);
        }
    }
}

#[test]
fn test_easy_band_at_least_as_wide_as_quality() {
    let target = IntensityTarget::pace_text("8:00/mi");
    let work = resolve_default(&target, StepKind::Work).unwrap();
    let easy = resolve_default(&target, StepKind::Cooldown).unwrap();
    assert!(easy.upper - easy.lower >= work.upper - work.lower);
}

#[test]
fn test_nothing_is_fabricated() {
    assert!(resolve_default(&IntensityTarget::None, StepKind::Work).is_none());
    assert!(resolve_default(&IntensityTarget::pace_text("quick"), StepKind::Work).is_none());
    assert!(resolve_default(&IntensityTarget::pace_range(-1.0, 300.0, PaceBasis::PerKm), StepKind::Work).is_none());
}

#[test]
fn test_custom_tolerance() {
    let tol = ToleranceConfig {
        quality: 0.1,
        easy: 0.2,
    };
    let target = IntensityTarget::pace(Pace::new(300.0, PaceBasis::PerKm));
    let range = resolve(&target, StepKind::Work, &tol, &AthleteBaseline::default(), Units::Metric).unwrap();
    assert_eq!((range.lower, range.upper), (270.0, 330.0));
    assert_eq!(range.render(Units::Metric), "4:30–5:30/km");
}

#[test]
fn test_percent_ftp_resolves_with_baseline() {
    let baseline = AthleteBaseline {
        ftp_watts: Some(300.0),
        ..Default::default()
    };
    let target = IntensityTarget::percent_ftp(88.0, 94.0);
    let range = resolve(&target, StepKind::Work, &ToleranceConfig::default(), &baseline, Units::Metric).unwrap();
    assert_eq!(range.unit, RangeUnit::Watts);
    assert_eq!(range.render(Units::Metric), "264–282W");
}
