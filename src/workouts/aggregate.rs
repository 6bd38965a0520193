//! Step aggregation and the workout duration cascade.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::config::AthleteBaseline;
use crate::units::{seconds_per_meter, Units};
use crate::workouts::targets::{resolve, ToleranceConfig};
use crate::workouts::types::{Field, Step, TargetRange, WorkoutSpec};

/// Where a step's duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDurationSource {
    /// Positive explicit duration
    Explicit,
    /// Distance times the mid-point of the pace range
    DistanceAtPace,
    /// Nothing usable
    Unresolved,
}

/// Per-step aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepTiming {
    /// Resolved duration, if any
    pub seconds: Option<u32>,
    /// Explicit distance in meters, if any
    pub meters: Option<f64>,
    /// Resolved target range, if any
    pub range: Option<TargetRange>,
    pub source: StepDurationSource,
}

/// Totals over a step list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepTotals {
    /// Sum of resolved step durations
    pub total_seconds: u32,
    /// Sum of explicit step distances, in meters
    pub total_meters: f64,
    /// One entry per input step, same order
    pub steps: Vec<StepTiming>,
}

impl StepTotals {
    /// Number of steps whose duration could not be resolved.
    pub fn unresolved_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.source == StepDurationSource::Unresolved)
            .count()
    }
}

/// Resolve one step's duration, distance and target range.
pub fn time_step(
    step: &Step,
    tolerance: &ToleranceConfig,
    baseline: &AthleteBaseline,
    units: Units,
) -> StepTiming {
    let range = resolve(&step.target, step.kind, tolerance, baseline, units);
    let meters = step.explicit_distance().map(|d| d.to_meters());

    let (seconds, source) = match step.explicit_seconds() {
        Some(seconds) => (Some(seconds), StepDurationSource::Explicit),
        None => match (meters, range.as_ref().and_then(|r| r.mid_pace())) {
            (Some(m), Some(pace)) if pace.is_valid() => {
                let estimate = (m * seconds_per_meter(pace.seconds, pace.basis)).round();
                (Some(estimate as u32), StepDurationSource::DistanceAtPace)
            }
            _ => (None, StepDurationSource::Unresolved),
        },
    };

    StepTiming {
        seconds,
        meters,
        range,
        source,
    }
}

/// Aggregate total duration and distance over a step list.
///
/// Distance is only ever summed from explicit distances; it is never inferred
/// from a duration and a pace.
pub fn aggregate(
    steps: &[Step],
    tolerance: &ToleranceConfig,
    baseline: &AthleteBaseline,
    units: Units,
) -> StepTotals {
    let mut totals = StepTotals::default();
    for step in steps {
        let timing = time_step(step, tolerance, baseline, units);
        if let Some(seconds) = timing.seconds {
            totals.total_seconds = totals.total_seconds.saturating_add(seconds);
        }
        if let Some(meters) = timing.meters {
            totals.total_meters += meters;
        }
        totals.steps.push(timing);
    }
    totals
}

/// Which source won the duration cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    Steps,
    StoredTotal,
    Description,
    None,
}

/// Total workout duration and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedDuration {
    pub seconds: Option<u32>,
    pub source: DurationSource,
}

/// Resolve total duration: step-derived total, then stored total, then a
/// duration stated in the description. The first positive value wins.
pub fn resolve_duration(step_seconds: Option<u32>, spec: &WorkoutSpec) -> ResolvedDuration {
    let stored = || match spec.total_duration_seconds {
        Field::Present(seconds) => Some(seconds),
        Field::Malformed(_) | Field::Absent => None,
    };
    let described = || spec.description.present().and_then(|d| duration_from_text(d));

    let resolvers: [(DurationSource, &dyn Fn() -> Option<u32>); 3] = [
        (DurationSource::Steps, &|| step_seconds),
        (DurationSource::StoredTotal, &stored),
        (DurationSource::Description, &described),
    ];

    for (source, resolver) in resolvers {
        if let Some(seconds) = resolver().filter(|s| *s > 0) {
            tracing::debug!("Duration {}s from {:?}", seconds, source);
            return ResolvedDuration {
                seconds: Some(seconds),
                source,
            };
        }
    }

    ResolvedDuration {
        seconds: None,
        source: DurationSource::None,
    }
}

static CLOCK_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 1:15:00
    Regex::new(r"\b(\d{1,2}):([0-5]\d):([0-5]\d)\b").ok()
});

static HOURS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 1h30, 1h 30m, 2 hours, 1 hr 15 min
    Regex::new(r"(?i)\b(\d{1,2})\s*(?:hours?|hrs?|h)\b\s*(?:(\d{1,2})\s*(?:minutes?|mins?|m)?\b)?").ok()
});

static HOURS_COMPACT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 1h30 (no boundary between the unit and the minutes)
    Regex::new(r"(?i)\b(\d{1,2})h(\d{2})\b").ok()
});

static MINUTES_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 45 min, 90 minutes, 30mins
    Regex::new(r"(?i)\b(\d{1,3})\s*(?:minutes?|mins?)\b").ok()
});

static REPEAT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 5 x 3 min, 6x800, 4 × 1km
    Regex::new(r"(?i)\b\d+\s*[x×]\s*\d").ok()
});

type DurationParser = fn(&Captures<'_>) -> Option<u32>;

fn capture_u32(cap: &Captures<'_>, group: usize) -> Option<u32> {
    cap.get(group)?.as_str().parse().ok()
}

fn clock_seconds(cap: &Captures<'_>) -> Option<u32> {
    let h = capture_u32(cap, 1)?;
    let m = capture_u32(cap, 2)?;
    let s = capture_u32(cap, 3)?;
    Some(h * 3600 + m * 60 + s)
}

fn hours_seconds(cap: &Captures<'_>) -> Option<u32> {
    let h = capture_u32(cap, 1)?;
    let m = match cap.get(2) {
        Some(_) => capture_u32(cap, 2)?,
        None => 0,
    };
    (m < 60).then_some(h * 3600 + m * 60)
}

fn minutes_seconds(cap: &Captures<'_>) -> Option<u32> {
    capture_u32(cap, 1).map(|m| m * 60)
}

/// Find an explicit total duration stated in free text.
///
/// Only a description that mentions exactly one duration, and no `N x`
/// repeat, yields a total. Anything else names segment lengths.
pub fn duration_from_text(text: &str) -> Option<u32> {
    if REPEAT_PATTERN.as_ref().is_some_and(|p| p.is_match(text)) {
        return None;
    }

    let parsers: [(Option<&Regex>, DurationParser); 4] = [
        (CLOCK_PATTERN.as_ref(), clock_seconds),
        (HOURS_COMPACT_PATTERN.as_ref(), hours_seconds),
        (HOURS_PATTERN.as_ref(), hours_seconds),
        (MINUTES_PATTERN.as_ref(), minutes_seconds),
    ];

    let mut mentions: Vec<(Range<usize>, u32)> = Vec::new();
    for (pattern, parse) in parsers {
        let Some(pattern) = pattern else { continue };
        for cap in pattern.captures_iter(text) {
            let Some(span) = cap.get(0).map(|m| m.range()) else {
                continue;
            };
            // "1 hr 15 min" is one mention, not an hour and a quarter hour
            if mentions
                .iter()
                .any(|(seen, _)| seen.start < span.end && span.start < seen.end)
            {
                continue;
            }
            if let Some(seconds) = parse(&cap) {
                mentions.push((span, seconds));
            }
        }
    }

    match mentions.as_slice() {
        [(_, seconds)] => Some(*seconds),
        _ => None,
    }
}
