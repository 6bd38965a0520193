//! Intensity target range resolution.
//!
//! A stored target is turned into a canonical `TargetRange` by the first rule
//! that applies to its shape:
//! 1. an already-structured range with numeric bounds, used as-is
//! 2. a two-element tuple, used as-is
//! 3. an encoded pace string (`7:43/mi`), widened by the kind's tolerance
//! 4. a single seconds-per-distance number, widened the same way
//!
//! Nothing resolves to `None`; a range is never invented. A pace range or
//! tuple without a basis takes the caller's unit preference, while a single
//! pace number without one stays unresolved.

use serde::{Deserialize, Serialize};

use crate::config::AthleteBaseline;
use crate::units::{convert_pace, format_pace_clock, parse_pace, trim_decimal, PaceBasis, Units};
use crate::workouts::types::{
    IntensityTarget, PowerBasis, RangeUnit, StepKind, TargetRange, TargetValue,
};

/// Tolerance applied to single-value targets of quality kinds.
pub const QUALITY_TOLERANCE: f64 = 0.04;
/// Tolerance applied to single-value targets of warmup, cooldown and recovery.
pub const EASY_TOLERANCE: f64 = 0.06;

/// Tolerance policy for widening single-value targets into ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Fraction used for work and steady steps
    pub quality: f64,
    /// Fraction used for warmup, cooldown and recovery steps
    pub easy: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            quality: QUALITY_TOLERANCE,
            easy: EASY_TOLERANCE,
        }
    }
}

impl ToleranceConfig {
    /// Tolerance for a step kind. Easy kinds never get a narrower band than quality.
    pub fn for_kind(&self, kind: StepKind) -> f64 {
        let quality = sanitize_tolerance(self.quality);
        if kind.is_easy() {
            sanitize_tolerance(self.easy).max(quality)
        } else {
            quality
        }
    }
}

fn sanitize_tolerance(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 0.5)
    } else {
        0.0
    }
}

/// Resolve a step's intensity target into a range.
pub fn resolve(
    target: &IntensityTarget,
    kind: StepKind,
    tolerance: &ToleranceConfig,
    baseline: &AthleteBaseline,
    units: Units,
) -> Option<TargetRange> {
    let tol = tolerance.for_kind(kind);
    match target {
        IntensityTarget::Pace { value, basis } => resolve_pace(value, *basis, tol, units),
        IntensityTarget::Power { value, basis } => resolve_power(value, *basis, tol, baseline),
        IntensityTarget::HeartRate { value } => resolve_plain(value, RangeUnit::Bpm),
        IntensityTarget::Rpe { value } => resolve_plain(value, RangeUnit::Rpe),
        IntensityTarget::None => None,
    }
}

fn resolve_pace(
    value: &TargetValue,
    basis: Option<PaceBasis>,
    tol: f64,
    units: Units,
) -> Option<TargetRange> {
    let bounds_unit = RangeUnit::from_pace_basis(basis.unwrap_or_else(|| units.pace_basis()));
    match value {
        TargetValue::Range { lower, upper } => positive_range(*lower, *upper, bounds_unit),
        TargetValue::Pair([a, b]) => positive_range(*a, *b, bounds_unit),
        TargetValue::Encoded(text) => {
            let (seconds, parsed_basis) = parse_pace(text)?;
            widen(seconds, tol, RangeUnit::from_pace_basis(parsed_basis))
        }
        TargetValue::Scalar(seconds) => widen(*seconds, tol, RangeUnit::from_pace_basis(basis?)),
    }
}

fn resolve_power(
    value: &TargetValue,
    basis: PowerBasis,
    tol: f64,
    baseline: &AthleteBaseline,
) -> Option<TargetRange> {
    let range = match value {
        TargetValue::Range { lower, upper } => positive_range(*lower, *upper, power_unit(basis)),
        TargetValue::Pair([a, b]) => positive_range(*a, *b, power_unit(basis)),
        TargetValue::Encoded(text) => {
            // "95%" and "88-94%" are relative to FTP whatever the declared basis
            let unit = if text.contains('%') {
                RangeUnit::PercentFtp
            } else {
                power_unit(basis)
            };
            let (a, b) = parse_number_pair(text)?;
            match b {
                Some(b) => positive_range(a, b, unit),
                None => widen(a, tol, unit),
            }
        }
        TargetValue::Scalar(v) => widen(*v, tol, power_unit(basis)),
    }?;

    match (range.unit, baseline.valid_ftp()) {
        (RangeUnit::PercentFtp, Some(ftp)) => Some(TargetRange::new(
            (range.lower * ftp / 100.0).round(),
            (range.upper * ftp / 100.0).round(),
            RangeUnit::Watts,
        )),
        _ => Some(range),
    }
}

fn power_unit(basis: PowerBasis) -> RangeUnit {
    match basis {
        PowerBasis::Watts => RangeUnit::Watts,
        PowerBasis::PercentFtp => RangeUnit::PercentFtp,
    }
}

/// Heart rate and RPE: ranges as-is, a single value is a point range.
fn resolve_plain(value: &TargetValue, unit: RangeUnit) -> Option<TargetRange> {
    match value {
        TargetValue::Range { lower, upper } => positive_range(*lower, *upper, unit),
        TargetValue::Pair([a, b]) => positive_range(*a, *b, unit),
        TargetValue::Encoded(text) => {
            let (a, b) = parse_number_pair(text)?;
            positive_range(a, b.unwrap_or(a), unit)
        }
        TargetValue::Scalar(v) => positive_range(*v, *v, unit),
    }
}

fn positive_range(a: f64, b: f64, unit: RangeUnit) -> Option<TargetRange> {
    if !a.is_finite() || !b.is_finite() || a <= 0.0 || b <= 0.0 {
        return None;
    }
    Some(TargetRange::new(a, b, unit))
}

fn widen(value: f64, tol: f64, unit: RangeUnit) -> Option<TargetRange> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let lower = (value * (1.0 - tol)).round();
    let upper = (value * (1.0 + tol)).round();
    positive_range(lower, upper, unit)
}

/// Parse `250`, `240-260`, `240–260W` or `95%`.
fn parse_number_pair(text: &str) -> Option<(f64, Option<f64>)> {
    let cleaned: String = text
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%' || c.is_whitespace())
        .to_string();
    let mut parts = cleaned.splitn(2, ['-', '–']);
    let first = parts.next()?.trim().parse::<f64>().ok()?;
    let second = match parts.next() {
        Some(part) => Some(
            part.trim()
                .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
                .trim()
                .parse::<f64>()
                .ok()?,
        ),
        None => None,
    };
    Some((first, second))
}

impl TargetRange {
    /// Display text, converting pace ranges to the caller's unit preference.
    pub fn render(&self, units: Units) -> String {
        match self.unit.pace_basis() {
            Some(from) => {
                let to = units.pace_basis();
                let lower = format_pace_clock(convert_pace(self.lower, from, to));
                let upper = format_pace_clock(convert_pace(self.upper, from, to));
                if lower == upper {
                    format!("{}{}", lower, to.suffix())
                } else {
                    format!("{}–{}{}", lower, upper, to.suffix())
                }
            }
            None => {
                let (lower, upper) = match self.unit {
                    RangeUnit::Watts | RangeUnit::Bpm | RangeUnit::PercentFtp => (
                        format!("{}", self.lower.round() as i64),
                        format!("{}", self.upper.round() as i64),
                    ),
                    _ => (trim_decimal(self.lower), trim_decimal(self.upper)),
                };
                let span = if lower == upper {
                    lower
                } else {
                    format!("{}–{}", lower, upper)
                };
                match self.unit {
                    RangeUnit::Watts => format!("{}W", span),
                    RangeUnit::PercentFtp => format!("{}% FTP", span),
                    RangeUnit::Bpm => format!("{} bpm", span),
                    RangeUnit::Rpe => format!("RPE {}", span),
                    RangeUnit::PacePerMile | RangeUnit::PacePerKm => span,
                }
            }
        }
    }
}
