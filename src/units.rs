//! Unit, time and pace conversions.
//!
//! Meters are the computation substrate for every distance. Authored values keep
//! their original unit so a 50 yd swim repeat is still shown as 50 yd after a
//! trip through meters.

use serde::{Deserialize, Serialize};

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;
/// Meters in one yard.
pub const METERS_PER_YARD: f64 = 0.9144;
/// Meters in one kilometer.
pub const METERS_PER_KM: f64 = 1000.0;

/// Distances at or below this are shown in meters whatever the unit preference
/// (track repeats are written in meters even by imperial users).
pub const TRACK_DISTANCE_LIMIT_M: f64 = 1600.0;

/// Unit system preference, passed explicitly to every rendering call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Metric units (km, min/km)
    #[default]
    Metric,
    /// Imperial units (miles, min/mi)
    Imperial,
}

impl Units {
    /// Pace basis used when rendering paces for this preference.
    pub fn pace_basis(&self) -> PaceBasis {
        match self {
            Units::Metric => PaceBasis::PerKm,
            Units::Imperial => PaceBasis::PerMile,
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Metric => write!(f, "Metric"),
            Units::Imperial => write!(f, "Imperial"),
        }
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "km" => Ok(Units::Metric),
            "imperial" | "mi" | "us" => Ok(Units::Imperial),
            other => Err(format!("unknown unit system: {}", other)),
        }
    }
}

/// Unit a distance was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[serde(alias = "m", alias = "meter")]
    Meters,
    #[serde(alias = "yd", alias = "yard", alias = "yds")]
    Yards,
    #[serde(alias = "km", alias = "kilometer")]
    Kilometers,
    #[serde(alias = "mi", alias = "mile")]
    Miles,
}

impl DistanceUnit {
    /// Meters in one of this unit.
    pub fn meters(&self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Yards => METERS_PER_YARD,
            DistanceUnit::Kilometers => METERS_PER_KM,
            DistanceUnit::Miles => METERS_PER_MILE,
        }
    }

    /// Short suffix used in display text.
    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Yards => "yd",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    /// Parse a unit suffix such as `m`, `yd`, `km` or `mi`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Some(DistanceUnit::Meters),
            "yd" | "yds" | "yard" | "yards" => Some(DistanceUnit::Yards),
            "km" | "kilometer" | "kilometers" | "k" => Some(DistanceUnit::Kilometers),
            "mi" | "mile" | "miles" => Some(DistanceUnit::Miles),
            _ => None,
        }
    }
}

/// A distance in the unit it was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Amount in `unit`
    pub value: f64,
    /// Authoring unit
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    /// A distance known only in meters.
    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meters)
    }

    /// A distance authored in yards.
    pub fn yards(value: f64) -> Self {
        Self::new(value, DistanceUnit::Yards)
    }

    /// Convert to meters.
    pub fn to_meters(&self) -> f64 {
        self.value * self.unit.meters()
    }

    /// Amount expressed in another unit.
    pub fn in_unit(&self, unit: DistanceUnit) -> f64 {
        self.to_meters() / unit.meters()
    }

    /// Whether the distance is a usable positive amount.
    pub fn is_positive(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }

    /// Render in the authoring unit, e.g. `800m`, `200yd`, `1.5km`.
    pub fn render(&self) -> String {
        format!("{}{}", trim_decimal(self.value), self.unit.suffix())
    }

    /// Render the amount without its unit (`50` for 50 yd).
    pub fn render_bare(&self) -> String {
        trim_decimal(self.value)
    }
}

/// Parse a distance such as `800m`, `200 yd` or `1.5km`.
pub fn parse_distance(text: &str) -> Option<Distance> {
    let text = text.trim();
    let split = text.find(|c: char| !(c.is_ascii_digit() || c == '.'))?;
    let (number, unit) = text.split_at(split);
    let value: f64 = number.parse().ok()?;
    let unit = DistanceUnit::parse(unit)?;
    let distance = Distance::new(value, unit);
    distance.is_positive().then_some(distance)
}

/// Distance basis of a pace value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceBasis {
    /// Seconds per mile
    #[serde(alias = "mi", alias = "mile")]
    PerMile,
    /// Seconds per kilometer
    #[serde(alias = "km", alias = "kilometer")]
    PerKm,
}

impl PaceBasis {
    /// Meters covered by one unit of this basis.
    pub fn meters(&self) -> f64 {
        match self {
            PaceBasis::PerMile => METERS_PER_MILE,
            PaceBasis::PerKm => METERS_PER_KM,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            PaceBasis::PerMile => "/mi",
            PaceBasis::PerKm => "/km",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "mi" | "mile" | "min/mi" => Some(PaceBasis::PerMile),
            "km" | "kilometer" | "min/km" => Some(PaceBasis::PerKm),
            _ => None,
        }
    }
}

/// A pace value: seconds to cover one unit of `basis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pace {
    /// Seconds per basis distance
    pub seconds: f64,
    /// Distance basis
    pub basis: PaceBasis,
}

impl Pace {
    pub fn new(seconds: f64, basis: PaceBasis) -> Self {
        Self { seconds, basis }
    }

    /// Parse `7:43/mi` style text.
    pub fn parse(text: &str) -> Option<Self> {
        parse_pace(text).map(|(seconds, basis)| Self { seconds, basis })
    }

    /// Same pace expressed on another basis.
    pub fn to_basis(&self, basis: PaceBasis) -> Self {
        Self::new(convert_pace(self.seconds, self.basis, basis), basis)
    }

    /// Whether the pace is a usable positive number.
    pub fn is_valid(&self) -> bool {
        self.seconds.is_finite() && self.seconds > 0.0
    }
}

/// Format whole seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a rest interval: `:15` under a minute, `1:30` otherwise.
pub fn format_rest(seconds: u32) -> String {
    if seconds < 60 {
        format!(":{:02}", seconds)
    } else {
        format_clock(seconds)
    }
}

/// Parse `m:ss`, `h:mm:ss` or `:ss` into seconds.
pub fn parse_clock(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut total: u32 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u32 = if part.is_empty() && i == 0 {
            0
        } else {
            part.trim().parse().ok()?
        };
        // Every field after the first is a sexagesimal digit pair.
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

/// Parse a pace such as `7:43/mi`, `4:30 /km` or `7:43 min/mi`.
pub fn parse_pace(text: &str) -> Option<(f64, PaceBasis)> {
    let (clock, basis) = text.trim().split_once('/')?;
    let clock = clock.trim().trim_end_matches("min").trim();
    let basis = PaceBasis::parse(basis)?;
    let seconds = parse_clock(clock)?;
    if seconds == 0 {
        return None;
    }
    Some((seconds as f64, basis))
}

/// Convert a pace between distance bases.
pub fn convert_pace(seconds: f64, from: PaceBasis, to: PaceBasis) -> f64 {
    if from == to {
        return seconds;
    }
    seconds / from.meters() * to.meters()
}

/// Seconds needed per meter at the given pace.
pub fn seconds_per_meter(seconds: f64, basis: PaceBasis) -> f64 {
    seconds / basis.meters()
}

/// Clock part of a pace (`7:43`), or `N/A` for unusable input.
pub fn format_pace_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "N/A".to_string();
    }
    format_clock(seconds.round() as u32)
}

/// Format a pace with its basis suffix, e.g. `7:43/mi`.
pub fn format_pace(seconds: f64, basis: PaceBasis) -> String {
    let clock = format_pace_clock(seconds);
    if clock == "N/A" {
        return clock;
    }
    format!("{}{}", clock, basis.suffix())
}

/// Render a distance known only in meters according to the unit preference.
pub fn format_meters(meters: f64, units: Units) -> String {
    if !meters.is_finite() || meters <= 0.0 {
        return "N/A".to_string();
    }
    if meters <= TRACK_DISTANCE_LIMIT_M {
        return format!("{}m", meters.round() as u64);
    }
    match units {
        Units::Metric => format!("{}km", trim_decimal(meters / METERS_PER_KM)),
        Units::Imperial => format!("{}mi", trim_decimal(meters / METERS_PER_MILE)),
    }
}

/// Format with at most two decimals and no trailing zeros.
pub fn trim_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
