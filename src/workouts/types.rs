//! Workout specification types and enums.
//!
//! A `WorkoutSpec` is read-only input to the engine. Every optional field that
//! comes from storage is a `Field`, so absent and malformed values are told apart
//! and every consumer has to match on them explicitly.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{Distance, Pace, PaceBasis};

/// A stored field that may be present, present but unreadable, or missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Value read successfully
    Present(T),
    /// Value existed but could not be read; treated as absent
    Malformed(String),
    /// No value stored
    Absent,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    /// The value, if present.
    pub fn present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Malformed(_) | Field::Absent => None,
        }
    }

    /// Consume into the value, if present.
    pub fn into_present(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Malformed(_) | Field::Absent => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Malformed(reason) => Field::Malformed(reason),
            Field::Absent => Field::Absent,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Present(v),
            None => Field::Absent,
        }
    }
}

/// Training discipline of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Run,
    Ride,
    Swim,
    Strength,
    Mobility,
    PilatesYoga,
}

impl Discipline {
    /// Parse a stored discipline name, accepting common aliases.
    pub fn parse(text: &str) -> Option<Self> {
        let key = text.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "run" | "running" | "trail_run" => Some(Discipline::Run),
            "ride" | "bike" | "cycling" | "cycle" | "virtual_ride" => Some(Discipline::Ride),
            "swim" | "swimming" | "pool_swim" | "open_water" => Some(Discipline::Swim),
            "strength" | "weights" | "weight_training" | "lift" => Some(Discipline::Strength),
            "mobility" | "stretch" | "stretching" => Some(Discipline::Mobility),
            "pilates_yoga" | "yoga" | "pilates" => Some(Discipline::PilatesYoga),
            _ => None,
        }
    }

    /// Capitalized label used in titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Discipline::Run => "Run",
            Discipline::Ride => "Ride",
            Discipline::Swim => "Swim",
            Discipline::Strength => "Strength",
            Discipline::Mobility => "Mobility",
            Discipline::PilatesYoga => "Pilates/Yoga",
        }
    }

    /// Word used for recovery segments in summaries (`jog 2:00`).
    pub fn recovery_verb(&self) -> &'static str {
        match self {
            Discipline::Run => "jog",
            Discipline::Ride => "easy",
            _ => "rest",
        }
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Kind of a workout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Warmup,
    Work,
    Recovery,
    Cooldown,
    /// Continuous effort at one intensity
    Steady,
    /// Stored kind not recognized
    Unknown,
}

impl StepKind {
    /// Parse a stored kind, accepting common aliases. Unrecognized text is `Unknown`.
    pub fn parse(text: &str) -> Self {
        let key = text.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "warmup" | "warm_up" | "wu" => StepKind::Warmup,
            "work" | "interval" | "active" | "on" | "main" => StepKind::Work,
            "recovery" | "recover" | "rest" | "off" | "jog" => StepKind::Recovery,
            "cooldown" | "cool_down" | "cd" => StepKind::Cooldown,
            "steady" | "steady_state" | "steadystate" => StepKind::Steady,
            _ => StepKind::Unknown,
        }
    }

    /// Easy kinds get the wider target tolerance.
    pub fn is_easy(&self) -> bool {
        matches!(
            self,
            StepKind::Warmup | StepKind::Cooldown | StepKind::Recovery
        )
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Warmup => write!(f, "Warmup"),
            StepKind::Work => write!(f, "Work"),
            StepKind::Recovery => write!(f, "Recovery"),
            StepKind::Cooldown => write!(f, "Cooldown"),
            StepKind::Steady => write!(f, "Steady"),
            StepKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Raw value of an intensity target, in whichever shape it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetValue {
    /// Two-element tuple. Listed first so a JSON array never reads as a `Range`.
    Pair([f64; 2]),
    /// Already-resolved range
    Range { lower: f64, upper: f64 },
    /// Encoded text such as `7:43/mi`
    Encoded(String),
    /// Single number (seconds per unit distance for paces)
    Scalar(f64),
}

/// How a power target is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerBasis {
    #[default]
    Watts,
    PercentFtp,
}

/// Intensity target of a step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntensityTarget {
    Pace {
        value: TargetValue,
        /// Distance basis when the value itself doesn't carry one
        basis: Option<PaceBasis>,
    },
    Power {
        value: TargetValue,
        #[serde(default)]
        basis: PowerBasis,
    },
    HeartRate {
        value: TargetValue,
    },
    Rpe {
        value: TargetValue,
    },
    #[default]
    None,
}

impl IntensityTarget {
    /// Encoded pace such as `7:43/mi`.
    pub fn pace_text(text: &str) -> Self {
        IntensityTarget::Pace {
            value: TargetValue::Encoded(text.to_string()),
            basis: None,
        }
    }

    /// Single pace in seconds per unit distance.
    pub fn pace(pace: Pace) -> Self {
        IntensityTarget::Pace {
            value: TargetValue::Scalar(pace.seconds),
            basis: Some(pace.basis),
        }
    }

    /// Pace range in seconds per unit distance.
    pub fn pace_range(lower: f64, upper: f64, basis: PaceBasis) -> Self {
        IntensityTarget::Pace {
            value: TargetValue::Range { lower, upper },
            basis: Some(basis),
        }
    }

    pub fn power_range(lower: f64, upper: f64) -> Self {
        IntensityTarget::Power {
            value: TargetValue::Range { lower, upper },
            basis: PowerBasis::Watts,
        }
    }

    pub fn percent_ftp(lower: f64, upper: f64) -> Self {
        IntensityTarget::Power {
            value: TargetValue::Range { lower, upper },
            basis: PowerBasis::PercentFtp,
        }
    }

    pub fn heart_rate(lower: f64, upper: f64) -> Self {
        IntensityTarget::HeartRate {
            value: TargetValue::Range { lower, upper },
        }
    }

    pub fn rpe(lower: f64, upper: f64) -> Self {
        IntensityTarget::Rpe {
            value: TargetValue::Range { lower, upper },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, IntensityTarget::None)
    }
}

/// Unit of a resolved target range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeUnit {
    /// Seconds per mile
    PacePerMile,
    /// Seconds per kilometer
    PacePerKm,
    Watts,
    PercentFtp,
    Bpm,
    Rpe,
}

impl RangeUnit {
    pub fn from_pace_basis(basis: PaceBasis) -> Self {
        match basis {
            PaceBasis::PerMile => RangeUnit::PacePerMile,
            PaceBasis::PerKm => RangeUnit::PacePerKm,
        }
    }

    /// Pace basis, for pace units only.
    pub fn pace_basis(&self) -> Option<PaceBasis> {
        match self {
            RangeUnit::PacePerMile => Some(PaceBasis::PerMile),
            RangeUnit::PacePerKm => Some(PaceBasis::PerKm),
            _ => None,
        }
    }
}

/// A resolved lower/upper intensity band.
///
/// `lower <= upper` always holds. For paces the lower bound is the faster pace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub lower: f64,
    pub upper: f64,
    pub unit: RangeUnit,
}

impl TargetRange {
    /// Build a range, ordering the bounds.
    pub fn new(a: f64, b: f64, unit: RangeUnit) -> Self {
        let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
        Self { lower, upper, unit }
    }

    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn is_pace(&self) -> bool {
        self.unit.pace_basis().is_some()
    }

    /// Mid-point pace, for pace ranges only.
    pub fn mid_pace(&self) -> Option<Pace> {
        self.unit
            .pace_basis()
            .map(|basis| Pace::new(self.midpoint(), basis))
    }
}

/// One segment of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Caller-assigned identifier; the engine never generates one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Segment kind
    pub kind: StepKind,
    /// Explicit duration in seconds
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// Explicit distance in its authoring unit
    #[serde(default)]
    pub distance: Option<Distance>,
    /// Intensity target
    #[serde(default)]
    pub target: IntensityTarget,
    /// Optional free-text label (`float`, `hill`, `catchup`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Step {
    /// A step with neither duration nor distance.
    pub fn new(kind: StepKind) -> Self {
        Self {
            id: None,
            kind,
            duration_seconds: None,
            distance: None,
            target: IntensityTarget::None,
            label: None,
        }
    }

    /// A step of fixed duration.
    pub fn timed(kind: StepKind, seconds: u32) -> Self {
        Self {
            duration_seconds: Some(seconds),
            ..Self::new(kind)
        }
    }

    /// A step of fixed distance.
    pub fn over(kind: StepKind, distance: Distance) -> Self {
        Self {
            distance: Some(distance),
            ..Self::new(kind)
        }
    }

    pub fn with_target(mut self, target: IntensityTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Explicit duration, only when positive.
    pub fn explicit_seconds(&self) -> Option<u32> {
        self.duration_seconds.filter(|s| *s > 0)
    }

    /// Explicit distance, only when positive.
    pub fn explicit_distance(&self) -> Option<Distance> {
        self.distance.filter(|d| d.is_positive())
    }
}

/// A workout's stored specification.
#[derive(Debug, Clone, Default)]
pub struct WorkoutSpec {
    /// Workout name
    pub name: Field<String>,
    /// Free-text description
    pub description: Field<String>,
    /// Discipline
    pub discipline: Field<Discipline>,
    /// Planned date
    pub date: Field<NaiveDate>,
    /// Structured step list
    pub steps: Field<Vec<Step>>,
    /// Entries of the stored step list that were not step objects
    pub skipped_steps: usize,
    /// Compact authoring tokens
    pub steps_preset_tokens: Field<Vec<String>>,
    /// Stored aggregate duration
    pub total_duration_seconds: Field<u32>,
    /// Lowercased tags; may include `optional`
    pub tags: BTreeSet<String>,
    /// Athlete FTP attached to the workout (ride)
    pub ftp_watts: Field<f64>,
    /// Pool length (swim)
    pub pool_length: Field<Distance>,
    /// Threshold pace attached to the workout (run)
    pub threshold_pace: Field<Pace>,
}

impl WorkoutSpec {
    /// Create an empty spec for a discipline.
    pub fn new(discipline: Discipline) -> Self {
        Self {
            discipline: Field::Present(discipline),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Field::Present(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Field::Present(description.to_string());
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = Field::Present(steps);
        self
    }

    pub fn with_tokens(mut self, tokens: &[&str]) -> Self {
        self.steps_preset_tokens =
            Field::Present(tokens.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_total_duration(mut self, seconds: u32) -> Self {
        self.total_duration_seconds = Field::Present(seconds);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.trim().to_lowercase()).collect();
        self
    }

    pub fn with_ftp(mut self, watts: f64) -> Self {
        self.ftp_watts = Field::Present(watts);
        self
    }

    pub fn with_pool_length(mut self, length: Distance) -> Self {
        self.pool_length = Field::Present(length);
        self
    }

    /// Whether the workout is tagged as optional.
    pub fn is_optional(&self) -> bool {
        self.tags.contains("optional")
    }

    /// Number of fields that were stored but could not be read.
    pub fn malformed_field_count(&self) -> usize {
        [
            self.name.is_malformed(),
            self.description.is_malformed(),
            self.discipline.is_malformed(),
            self.date.is_malformed(),
            self.steps.is_malformed(),
            self.steps_preset_tokens.is_malformed(),
            self.total_duration_seconds.is_malformed(),
            self.ftp_watts.is_malformed(),
            self.pool_length.is_malformed(),
            self.threshold_pace.is_malformed(),
        ]
        .iter()
        .filter(|m| **m)
        .count()
    }
}

/// Errors reading a stored workout document.
///
/// Only whole-document failures are errors; unreadable fields become
/// `Field::Malformed` instead.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Document is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Document is JSON but not an object
    #[error("Workout document must be a JSON object, found {0}")]
    NotAnObject(String),

    /// IO error reading a file
    #[error("IO error: {0}")]
    IoError(String),
}
