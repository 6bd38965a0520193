//! Unit tests for authoring token decoding.

use trainspec::units::{Distance, DistanceUnit};
use trainspec::workouts::tokens::{decode, decode_tokens, Amount, TokenError, TokenSegment};
use trainspec::workouts::types::{Discipline, StepKind};

#[test]
fn test_swim_set_from_tokens() {
    let decoded = decode_tokens(&["swim_warmup_200yd", "swim_drill_catchup_4x50yd_r15"]);
    assert_eq!(decoded.skipped, 0);
    assert_eq!(decoded.display_lines()[1], "Drills: catchup 4x50 @ :15r");

    let steps = decoded.steps();
    assert_eq!(steps[0].kind, StepKind::Warmup);
    assert_eq!(steps[0].distance, Some(Distance::yards(200.0)));
    // warmup + 4 x (drill, rest)
    assert_eq!(steps.len(), 9);
}

#[test]
fn test_yards_survive_decoding() {
    let token = decode("swim_kick_8x25yd_r10").unwrap();
    assert_eq!(token.display, "Kick 8x25 @ :10r");
    match token.amount {
        Amount::Distance(d) => {
            assert_eq!(d.unit, DistanceUnit::Yards);
            assert_eq!(d.value, 25.0);
        }
        Amount::Seconds(_) => panic!("expected a distance"),
    }
}

#[test]
fn test_run_tokens() {
    let token = decode("run_hill_8x60s_r90").unwrap();
    assert_eq!(token.discipline, Discipline::Run);
    assert_eq!(token.display, "Hills 8x1:00 @ 1:30r");

    let token = decode("run_cooldown_1mi").unwrap();
    assert_eq!(token.segment, TokenSegment::Cooldown);
    assert_eq!(token.display, "Cool-down 1mi");
}

#[test]
fn test_multi_word_qualifier() {
    let token = decode("swim_pull_single_arm_4x100m_r20").unwrap();
    assert_eq!(token.qualifier.as_deref(), Some("single arm"));
    assert_eq!(token.display, "Pull: single arm 4x100 @ :20r");
}

#[test]
fn test_set_without_rest_has_no_recovery_steps() {
    let token = decode("ride_sprint_6x15s").unwrap();
    let steps = token.to_steps();
    assert_eq!(steps.len(), 6);
    assert!(steps.iter().all(|s| s.kind == StepKind::Work));
}

#[test]
fn test_case_and_whitespace_tolerated() {
    let token = decode("  SWIM_Warmup_300M ").unwrap();
    assert_eq!(token.display, "Warm-up 300m");
}

#[test]
fn test_unrecognized_tokens_are_skipped() {
    let decoded = decode_tokens(&[
        "swim_warmup_200yd",
        "",
        "hello",
        "swim_4x50yd",
        "swim_drill_catchup_4x50yd_r15",
    ]);
    assert_eq!(decoded.fragments.len(), 2);
    assert_eq!(decoded.skipped, 3);
}

#[test]
fn test_numeric_segment_kind_rejected() {
    assert!(matches!(decode("swim_4x50yd"), Err(TokenError::InvalidSegment(_))));
}
