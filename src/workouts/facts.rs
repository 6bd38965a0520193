//! One-pass normalization of a workout specification into display facts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{AthleteBaseline, EngineConfig};
use crate::units::{format_clock, format_meters, Units};
use crate::workouts::aggregate::{aggregate, resolve_duration, DurationSource};
use crate::workouts::summary::{summarize, summary_text, SummaryOptions};
use crate::workouts::targets::ToleranceConfig;
use crate::workouts::title::title;
use crate::workouts::tokens::decode_tokens;
use crate::workouts::types::{Discipline, Field, StepKind, TargetRange, WorkoutSpec};

/// Caller-supplied settings for `normalize`.
#[derive(Debug, Clone, Default)]
pub struct NormalizeContext {
    pub units: Units,
    pub tolerance: ToleranceConfig,
    pub baseline: AthleteBaseline,
}

impl NormalizeContext {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            ..Default::default()
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            units: config.units,
            tolerance: config.tolerance,
            baseline: config.athlete.clone(),
        }
    }

    pub fn with_baseline(mut self, baseline: AthleteBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Where the step list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSource {
    Structured,
    Tokens,
    None,
}

/// Things that were skipped or unreadable while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Tokens that did not decode
    pub skipped_tokens: usize,
    /// Stored step entries that were not step objects
    pub skipped_steps: usize,
    /// Stored fields that were present but unreadable
    pub malformed_fields: usize,
    /// Steps with no resolvable duration
    pub unresolved_steps: usize,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.skipped_tokens == 0
            && self.skipped_steps == 0
            && self.malformed_fields == 0
            && self.unresolved_steps == 0
    }
}

/// Per-step facts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFacts {
    pub kind: StepKind,
    pub seconds: Option<u32>,
    pub meters: Option<f64>,
    pub range: Option<TargetRange>,
    /// Range rendered in the caller's units
    pub range_text: Option<String>,
}

/// Canonical, display-ready facts about one workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutFacts {
    pub title: String,
    pub discipline: Option<Discipline>,
    pub date: Option<NaiveDate>,
    pub optional: bool,
    pub total_seconds: Option<u32>,
    pub duration_source: DurationSource,
    /// Sum of explicit step distances
    pub total_meters: f64,
    /// Pool lengths covered, for swims with a known pool length
    pub pool_lengths: Option<u32>,
    pub step_source: StepSource,
    pub steps: Vec<StepFacts>,
    /// Summary lines for structured steps, token phrases otherwise
    pub lines: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl WorkoutFacts {
    /// `1:05:00 · 10km` style overview, or `None` when nothing is known.
    pub fn headline(&self, units: Units) -> Option<String> {
        let parts: Vec<String> = [
            self.total_seconds.map(format_clock),
            (self.total_meters > 0.0).then(|| format_meters(self.total_meters, units)),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!parts.is_empty()).then(|| parts.join(" · "))
    }
}

/// Workout-attached athlete numbers take precedence over the caller's.
fn effective_baseline(spec: &WorkoutSpec, fallback: &AthleteBaseline) -> AthleteBaseline {
    let ftp_watts = match spec.ftp_watts {
        Field::Present(ftp) if ftp.is_finite() && ftp > 0.0 => Some(ftp),
        _ => fallback.ftp_watts,
    };
    let threshold_pace = match spec.threshold_pace {
        Field::Present(pace) if pace.is_valid() => Some(pace),
        _ => fallback.threshold_pace,
    };
    AthleteBaseline {
        ftp_watts,
        threshold_pace,
    }
}

/// Derive every display fact for a workout in one pass.
pub fn normalize(spec: &WorkoutSpec, ctx: &NormalizeContext) -> WorkoutFacts {
    let baseline = effective_baseline(spec, &ctx.baseline);
    let discipline = spec.discipline.present().copied();
    let mut diagnostics = Diagnostics {
        malformed_fields: spec.malformed_field_count(),
        skipped_steps: spec.skipped_steps,
        ..Default::default()
    };

    // Token decoding is advisory, so skipped tokens are counted even when
    // structured steps win.
    let decoded = spec
        .steps_preset_tokens
        .present()
        .map(|tokens| decode_tokens(tokens));
    if let Some(ref decoded) = decoded {
        diagnostics.skipped_tokens = decoded.skipped;
    }

    let structured = spec.steps.present().filter(|steps| !steps.is_empty());
    let (steps, step_source) = match (structured, decoded.as_ref()) {
        (Some(steps), _) => (steps.clone(), StepSource::Structured),
        (None, Some(decoded)) if !decoded.fragments.is_empty() => {
            (decoded.steps(), StepSource::Tokens)
        }
        _ => (Vec::new(), StepSource::None),
    };

    let totals = aggregate(&steps, &ctx.tolerance, &baseline, ctx.units);
    diagnostics.unresolved_steps = totals.unresolved_count();

    let step_seconds = (step_source != StepSource::None).then_some(totals.total_seconds);
    let duration = resolve_duration(step_seconds, spec);

    let lines = match (step_source, decoded.as_ref()) {
        (StepSource::Structured, _) => {
            let opts = SummaryOptions {
                discipline,
                units: ctx.units,
                tolerance: ctx.tolerance,
                baseline: baseline.clone(),
            };
            summary_text(&summarize(&steps, &opts))
        }
        (StepSource::Tokens, Some(decoded)) => decoded.display_lines(),
        _ => Vec::new(),
    };

    let pool_lengths = match (discipline, spec.pool_length.present()) {
        (Some(Discipline::Swim), Some(pool)) if pool.is_positive() && totals.total_meters > 0.0 => {
            Some((totals.total_meters / pool.to_meters()).round() as u32)
        }
        _ => None,
    };

    let step_facts = steps
        .iter()
        .zip(&totals.steps)
        .map(|(step, timing)| StepFacts {
            kind: step.kind,
            seconds: timing.seconds,
            meters: timing.meters,
            range: timing.range,
            range_text: timing.range.map(|r| r.render(ctx.units)),
        })
        .collect();

    if !diagnostics.is_clean() {
        tracing::debug!("Normalized with diagnostics: {:?}", diagnostics);
    }

    WorkoutFacts {
        title: title(spec),
        discipline,
        date: spec.date.present().copied(),
        optional: spec.is_optional(),
        total_seconds: duration.seconds,
        duration_source: duration.source,
        total_meters: totals.total_meters,
        pool_lengths,
        step_source,
        steps: step_facts,
        lines,
        diagnostics,
    }
}
