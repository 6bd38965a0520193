//! Workout specification model and the normalization pipeline.

pub mod aggregate;
pub mod edit;
pub mod facts;
pub mod raw;
pub mod summary;
pub mod targets;
pub mod title;
pub mod tokens;
pub mod types;

pub use aggregate::{aggregate, resolve_duration, DurationSource, StepTotals};
pub use facts::{normalize, Diagnostics, NormalizeContext, WorkoutFacts};
pub use summary::{summarize, RepeatBlock, SummaryLine, SummaryOptions};
pub use targets::{resolve, ToleranceConfig};
pub use title::title;
pub use tokens::{clear_token_cache, decode_cached, decode_tokens, DecodedToken, TokenError};
pub use types::{
    Discipline, Field, IntensityTarget, SpecError, Step, StepKind, TargetRange, WorkoutSpec,
};
