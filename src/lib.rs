//! TrainSpec - Workout Specification Normalization & Metrics Engine
//!
//! Turns a workout's stored specification (structured steps, compact authoring
//! tokens, free-text descriptions and raw totals, often several at once and
//! partly inconsistent) into canonical display facts: total duration and
//! distance, per-step intensity ranges, zone distributions and compact summary
//! lines.
//!
//! Every computation is a pure function of its arguments. Unit preference and
//! athlete numbers are passed in explicitly.

pub mod config;
pub mod metrics;
pub mod units;
pub mod workouts;

// Re-export commonly used types
pub use config::{AthleteBaseline, EngineConfig};
pub use metrics::zones::{classify, ZoneDistribution};
pub use units::Units;
pub use workouts::facts::{normalize, NormalizeContext, WorkoutFacts};
pub use workouts::types::WorkoutSpec;
