//! Metrics over executed workout telemetry.

pub mod zones;

pub use zones::{classify, classify_pace, PowerZones, SampleSeries, Zone, ZoneDistribution};
