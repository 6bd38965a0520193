//! Seven-band time-in-zone distribution.
//!
//! Bands are percentages of a reference (FTP for power, threshold for pace):
//!
//! | Zone | Name            | % of reference |
//! |------|-----------------|----------------|
//! | Z1   | Active Recovery | < 55           |
//! | Z2   | Endurance       | 55-75          |
//! | Z3   | Tempo           | 76-90          |
//! | Z4   | Threshold       | 91-105         |
//! | Z5   | VO2max          | 106-120        |
//! | Z6   | Anaerobic       | 121-150        |
//! | Z7   | Neuromuscular   | > 150          |
//!
//! Z1 stops just below 55. Every other upper bound is inclusive, so a value
//! exactly on 75, 90, 105, 120 or 150 stays in the lower zone. Bucketing
//! compares `value * 100` against `bound * reference` so boundary samples are
//! not moved by division rounding.

use serde::{Deserialize, Serialize};

/// Upper bound of Z1..Z6 in percent of reference. Z7 is open-ended.
pub const ZONE_UPPER_PERCENT: [f64; 6] = [55.0, 75.0, 90.0, 105.0, 120.0, 150.0];

/// Reference used when none (or a non-positive one) is given.
pub const REFERENCE_FLOOR: f64 = 1.0;

/// Training zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Z1,
    Z2,
    Z3,
    Z4,
    Z5,
    Z6,
    Z7,
}

impl Zone {
    pub const ALL: [Zone; 7] = [
        Zone::Z1,
        Zone::Z2,
        Zone::Z3,
        Zone::Z4,
        Zone::Z5,
        Zone::Z6,
        Zone::Z7,
    ];

    /// Zone for a percentage of reference.
    pub fn for_percent(percent: f64) -> Self {
        Self::for_ratio(percent, 100.0)
    }

    /// Zone for `value` as a share of `reference`, without dividing.
    pub fn for_ratio(value: f64, reference: f64) -> Self {
        let scaled = value * 100.0;
        Zone::ALL
            .iter()
            .zip(ZONE_UPPER_PERCENT)
            .find(|(zone, upper)| {
                let bound = upper * reference;
                if zone.upper_inclusive() {
                    scaled <= bound
                } else {
                    scaled < bound
                }
            })
            .map(|(zone, _)| *zone)
            .unwrap_or(Zone::Z7)
    }

    /// Whether a value exactly on the upper bound belongs to this zone.
    pub fn upper_inclusive(&self) -> bool {
        *self != Zone::Z1
    }

    /// Zone number (1-7).
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Zone::Z1 => "Active Recovery",
            Zone::Z2 => "Endurance",
            Zone::Z3 => "Tempo",
            Zone::Z4 => "Threshold",
            Zone::Z5 => "VO2max",
            Zone::Z6 => "Anaerobic",
            Zone::Z7 => "Neuromuscular",
        }
    }

    /// Lower and upper percent bounds. Z7 has no upper bound; see
    /// `upper_inclusive` for whether the upper bound belongs to the zone.
    pub fn percent_bounds(&self) -> (f64, Option<f64>) {
        let i = self.index();
        let lower = match i {
            0 => 0.0,
            1 => ZONE_UPPER_PERCENT[0],
            _ => ZONE_UPPER_PERCENT[i - 1] + 1.0,
        };
        (lower, ZONE_UPPER_PERCENT.get(i).copied())
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z{}", self.number())
    }
}

/// One telemetry sample with an optional timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSample {
    #[serde(default, alias = "time")]
    pub t: Option<f64>,
    #[serde(alias = "value")]
    pub v: f64,
}

/// Sample series, as bare values (one second apart) or `{t, v}` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleSeries {
    Values(Vec<f64>),
    Timed(Vec<TimedSample>),
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        match self {
            SampleSeries::Values(v) => v.len(),
            SampleSeries::Timed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(value, dt)` for each sample. `dt` is the gap to the previous timestamp,
    /// or 1 when there is none or it doesn't increase.
    pub fn weighted(&self) -> Vec<(f64, f64)> {
        match self {
            SampleSeries::Values(values) => values.iter().map(|v| (*v, 1.0)).collect(),
            SampleSeries::Timed(samples) => {
                let mut previous: Option<f64> = None;
                samples
                    .iter()
                    .map(|sample| {
                        let t = sample.t.filter(|t| t.is_finite());
                        let dt = match (previous, t) {
                            (Some(prev), Some(now)) if now > prev => now - prev,
                            _ => 1.0,
                        };
                        if t.is_some() {
                            previous = t;
                        }
                        (sample.v, dt)
                    })
                    .collect()
            }
        }
    }
}

/// Percentage of time per zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
    #[serde(rename = "Z1")]
    pub z1: f64,
    #[serde(rename = "Z2")]
    pub z2: f64,
    #[serde(rename = "Z3")]
    pub z3: f64,
    #[serde(rename = "Z4")]
    pub z4: f64,
    #[serde(rename = "Z5")]
    pub z5: f64,
    #[serde(rename = "Z6")]
    pub z6: f64,
    #[serde(rename = "Z7")]
    pub z7: f64,
}

impl ZoneDistribution {
    fn from_array(values: [f64; 7]) -> Self {
        Self {
            z1: values[0],
            z2: values[1],
            z3: values[2],
            z4: values[3],
            z5: values[4],
            z6: values[5],
            z7: values[6],
        }
    }

    pub fn as_array(&self) -> [f64; 7] {
        [self.z1, self.z2, self.z3, self.z4, self.z5, self.z6, self.z7]
    }

    pub fn get(&self, zone: Zone) -> f64 {
        self.as_array()[zone.index()]
    }

    /// Sum of all zones, added in tenths so rounding noise doesn't show.
    pub fn total(&self) -> f64 {
        self.as_array().iter().map(|p| (p * 10.0).round()).sum::<f64>() / 10.0
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(|p| *p == 0.0)
    }

    /// Zone with the most time, if any.
    pub fn dominant(&self) -> Option<Zone> {
        if self.is_empty() {
            return None;
        }
        Zone::ALL
            .iter()
            .copied()
            .fold(None, |best: Option<Zone>, zone| match best {
                Some(b) if self.get(b) >= self.get(zone) => Some(b),
                _ => Some(zone),
            })
    }
}

/// Bucket a sample series by `value / reference`.
pub fn classify(samples: &SampleSeries, reference: Option<f64>) -> ZoneDistribution {
    let reference = reference
        .filter(|r| r.is_finite())
        .unwrap_or(REFERENCE_FLOOR)
        .max(REFERENCE_FLOOR);

    let mut seconds = [0.0f64; 7];
    for (value, dt) in samples.weighted() {
        if !value.is_finite() {
            continue;
        }
        let zone = Zone::for_ratio(value, reference);
        seconds[zone.index()] += dt;
    }
    apportion(seconds)
}

/// Bucket pace samples (seconds per unit distance) by `threshold / pace`.
///
/// Non-positive paces are stopped time and are skipped. Without a usable
/// threshold the distribution is all zero.
pub fn classify_pace(samples: &SampleSeries, threshold_seconds: Option<f64>) -> ZoneDistribution {
    let Some(threshold) = threshold_seconds.filter(|t| t.is_finite() && *t > 0.0) else {
        tracing::debug!("No threshold pace, pace zones left empty");
        return ZoneDistribution::default();
    };

    let mut seconds = [0.0f64; 7];
    for (pace, dt) in samples.weighted() {
        if !pace.is_finite() || pace <= 0.0 {
            continue;
        }
        let zone = Zone::for_ratio(threshold, pace);
        seconds[zone.index()] += dt;
    }
    apportion(seconds)
}

/// Percentages to one decimal that sum to exactly 100.0, by largest remainder.
fn apportion(seconds: [f64; 7]) -> ZoneDistribution {
    let total: f64 = seconds.iter().sum();
    if total <= 0.0 {
        return ZoneDistribution::default();
    }

    // Work in tenths of a percent.
    let exact: Vec<f64> = seconds.iter().map(|s| s / total * 1000.0).collect();
    let mut tenths: Vec<u32> = exact.iter().map(|e| e.floor() as u32).collect();
    let assigned: u32 = tenths.iter().sum();

    let mut order: Vec<usize> = (0..7).collect();
    order.sort_by(|a, b| {
        let ra = exact[*a] - exact[*a].floor();
        let rb = exact[*b] - exact[*b].floor();
        rb.total_cmp(&ra).then(a.cmp(b))
    });
    for i in order.into_iter().take(1000u32.saturating_sub(assigned) as usize) {
        tenths[i] += 1;
    }

    let mut percents = [0.0f64; 7];
    for (p, t) in percents.iter_mut().zip(&tenths) {
        *p = *t as f64 / 10.0;
    }
    ZoneDistribution::from_array(percents)
}

/// Watt boundaries of one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    pub zone: Zone,
    pub name: String,
    /// Lowest watts in the zone
    pub min_watts: u32,
    /// Highest watts in the zone; `None` for Z7
    pub max_watts: Option<u32>,
}

/// Power zones for a given FTP, for chart legends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerZones {
    pub ftp: f64,
    pub bands: Vec<ZoneBand>,
}

impl PowerZones {
    /// Calculate zone boundaries from FTP. A non-positive FTP uses the floor.
    pub fn from_ftp(ftp: f64) -> Self {
        let ftp = if ftp.is_finite() { ftp.max(REFERENCE_FLOOR) } else { REFERENCE_FLOOR };
        let bands = Zone::ALL
            .iter()
            .map(|zone| {
                let (lower, upper) = zone.percent_bounds();
                ZoneBand {
                    zone: *zone,
                    name: zone.name().to_string(),
                    min_watts: (ftp * lower / 100.0).round() as u32,
                    max_watts: upper.map(|u| {
                        let watts = (ftp * u / 100.0).round() as u32;
                        if zone.upper_inclusive() {
                            watts
                        } else {
                            watts.saturating_sub(1)
                        }
                    }),
                }
            })
            .collect();
        Self { ftp, bands }
    }

    /// Zone for a power value.
    pub fn zone_for(&self, watts: f64) -> Zone {
        Zone::for_ratio(watts, self.ftp)
    }

    pub fn band(&self, zone: Zone) -> Option<&ZoneBand> {
        self.bands.iter().find(|b| b.zone == zone)
    }

    /// `Z3 Tempo 190-225W` style legend lines.
    pub fn legend(&self) -> Vec<String> {
        self.bands
            .iter()
            .map(|b| match b.max_watts {
                Some(max) => format!("{} {} {}-{}W", b.zone, b.name, b.min_watts, max),
                None => format!("{} {} {}W+", b.zone, b.name, b.min_watts),
            })
            .collect()
    }
}
