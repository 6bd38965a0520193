//! Run-length workout summaries.
//!
//! A single left-to-right scan collapses contiguous identical `(work, recovery?)`
//! pairs into one line such as `6 × 800m (7:24–8:02/mi) jog 2:00 (9:10–10:20/mi)`.
//! Each line keeps the steps it was built from, so the compression can always be
//! undone.

use serde::Serialize;

use crate::config::AthleteBaseline;
use crate::units::{format_clock, format_meters, DistanceUnit, Units};
use crate::workouts::aggregate::time_step;
use crate::workouts::targets::ToleranceConfig;
use crate::workouts::types::{Discipline, Step, StepKind};

/// Inputs that affect summary text.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Discipline, for the default recovery verb
    pub discipline: Option<Discipline>,
    /// Unit preference for distances and paces
    pub units: Units,
    pub tolerance: ToleranceConfig,
    pub baseline: AthleteBaseline,
}

impl SummaryOptions {
    pub fn new(discipline: Discipline, units: Units) -> Self {
        Self {
            discipline: Some(discipline),
            units,
            ..Default::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: ToleranceConfig) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_baseline(mut self, baseline: AthleteBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// A run-length compressed group of steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatBlock {
    /// How many times the pattern repeats
    pub repeat_count: u32,
    /// Steps the block was built from, in order
    pub original_segments: Vec<Step>,
    /// Display text for the whole block
    pub label: String,
}

impl RepeatBlock {
    /// The steps this block stands for.
    pub fn expand(&self) -> Vec<Step> {
        self.original_segments.clone()
    }
}

/// Role of a summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Warmup,
    Repeat,
    Cooldown,
    Other,
}

/// One line of a workout summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub kind: LineKind,
    pub block: RepeatBlock,
}

impl SummaryLine {
    pub fn text(&self) -> &str {
        &self.block.label
    }
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.block.label)
    }
}

/// Summarize a step list into display lines.
pub fn summarize(steps: &[Step], opts: &SummaryOptions) -> Vec<SummaryLine> {
    let mut lines = Vec::new();
    let mut i = 0;

    while i < steps.len() {
        let step = &steps[i];
        match step.kind {
            StepKind::Warmup | StepKind::Cooldown => {
                let (kind, prefix) = if step.kind == StepKind::Warmup {
                    (LineKind::Warmup, "WU")
                } else {
                    (LineKind::Cooldown, "CD")
                };
                let text = format!("{} {}", prefix, segment_text(step, opts));
                lines.push(line(kind, 1, steps[i..=i].to_vec(), text));
                i += 1;
            }
            StepKind::Work | StepKind::Steady => {
                let (pattern, len) = pattern_at(steps, i, opts);
                let mut count = 1u32;
                let mut end = i + len;
                while end < steps.len() && is_pattern_start(&steps[end]) {
                    let (next, next_len) = pattern_at(steps, end, opts);
                    if next != pattern {
                        break;
                    }
                    count += 1;
                    end += next_len;
                }

                let text = match pattern.1 {
                    Some(ref rest) => format!("{} × {} {}", count, pattern.0, rest),
                    None => format!("{} × {}", count, pattern.0),
                };
                lines.push(line(LineKind::Repeat, count, steps[i..end].to_vec(), text));
                i = end;
            }
            StepKind::Recovery | StepKind::Unknown => {
                let text = format!("1 × {}", amount_text(step, false, opts.units));
                lines.push(line(LineKind::Other, 1, steps[i..=i].to_vec(), text));
                i += 1;
            }
        }
    }

    lines
}

/// Display text of each line.
pub fn summary_text(lines: &[SummaryLine]) -> Vec<String> {
    lines.iter().map(|l| l.block.label.clone()).collect()
}

fn line(kind: LineKind, repeat_count: u32, original_segments: Vec<Step>, label: String) -> SummaryLine {
    SummaryLine {
        kind,
        block: RepeatBlock {
            repeat_count,
            original_segments,
            label,
        },
    }
}

fn is_pattern_start(step: &Step) -> bool {
    matches!(step.kind, StepKind::Work | StepKind::Steady)
}

/// Rendered `(work, recovery?)` pattern starting at `i`, and its step count.
fn pattern_at(steps: &[Step], i: usize, opts: &SummaryOptions) -> ((String, Option<String>), usize) {
    let work = segment_text(&steps[i], opts);
    match steps.get(i + 1) {
        Some(next) if next.kind == StepKind::Recovery => {
            let verb = next
                .label
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| recovery_verb(opts.discipline));
            let rest = format!("{} {}", verb, segment_text(next, opts));
            ((work, Some(rest)), 2)
        }
        _ => ((work, None), 1),
    }
}

fn recovery_verb(discipline: Option<Discipline>) -> &'static str {
    discipline.map(|d| d.recovery_verb()).unwrap_or("rest")
}

/// `<amount> (<range>)`, or just the amount when the range is unresolved.
fn segment_text(step: &Step, opts: &SummaryOptions) -> String {
    let prefer_distance = matches!(step.kind, StepKind::Work | StepKind::Steady);
    let amount = amount_text(step, prefer_distance, opts.units);
    let timing = time_step(step, &opts.tolerance, &opts.baseline, opts.units);
    match timing.range {
        Some(range) => format!("{} ({})", amount, range.render(opts.units)),
        None => amount,
    }
}

fn amount_text(step: &Step, prefer_distance: bool, units: Units) -> String {
    let time = step.explicit_seconds().map(format_clock);
    // Yards stay as authored (pool lengths); everything else follows `units`.
    let distance = step.explicit_distance().map(|d| match d.unit {
        DistanceUnit::Yards => d.render(),
        DistanceUnit::Meters | DistanceUnit::Kilometers | DistanceUnit::Miles => {
            format_meters(d.to_meters(), units)
        }
    });
    let ordered = if prefer_distance {
        distance.or(time)
    } else {
        time.or(distance)
    };
    ordered
        .or_else(|| step.label.clone())
        .unwrap_or_else(|| "open".to_string())
}
