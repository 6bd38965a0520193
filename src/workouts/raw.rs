//! Lenient reader for stored workout documents.
//!
//! Stored records are loose: keys may be camelCase or snake_case, step lists may
//! be arrays or strings holding embedded JSON, numbers may arrive as strings.
//! Each field is read on its own. A field that exists but can't be read becomes
//! `Field::Malformed` and never fails the whole document.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::units::{parse_clock, parse_distance, Distance, DistanceUnit, Pace, PaceBasis};
use crate::workouts::types::{
    Discipline, Field, IntensityTarget, PowerBasis, SpecError, Step, StepKind, TargetValue,
    WorkoutSpec,
};

const NAME_KEYS: &[&str] = &["name", "title"];
const DESCRIPTION_KEYS: &[&str] = &["description", "notes"];
const DISCIPLINE_KEYS: &[&str] = &["discipline", "sport", "type", "workout_type"];
const DATE_KEYS: &[&str] = &["date", "planned_date", "scheduled_date"];
const STEPS_KEYS: &[&str] = &["steps", "structure", "intervals"];
const TOKEN_KEYS: &[&str] = &["steps_preset_tokens", "steps_preset", "tokens"];
const TOTAL_KEYS: &[&str] = &["total_duration_seconds", "duration_seconds", "duration"];
const FTP_KEYS: &[&str] = &["ftp_watts", "ftp"];
const POOL_KEYS: &[&str] = &["pool_length"];
const POOL_UNIT_KEYS: &[&str] = &["pool_unit", "pool_length_unit"];
const THRESHOLD_PACE_KEYS: &[&str] = &["threshold_pace"];

/// Object with keys folded to snake_case.
struct Record(Map<String, Value>);

impl Record {
    fn new(object: &Map<String, Value>) -> Self {
        Self(
            object
                .iter()
                .map(|(k, v)| (snake_case(k), v.clone()))
                .collect(),
        )
    }

    /// First non-null value under any of `keys`.
    fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }

    /// Read one field leniently.
    fn field<T>(&self, keys: &[&str], read: impl Fn(&Value) -> Option<T>) -> Field<T> {
        match self.get(keys) {
            None => Field::Absent,
            Some(value) => match read(value) {
                Some(parsed) => Field::Present(parsed),
                None => {
                    tracing::debug!("Malformed field {}: {}", keys[0], value);
                    Field::Malformed(format!("unreadable {}: {}", keys[0], value))
                }
            },
        }
    }
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

impl WorkoutSpec {
    /// Read a workout document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SpecError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SpecError::InvalidJson(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Read a workout document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path).map_err(|e| SpecError::IoError(e.to_string()))?;
        Self::from_json_str(&text)
    }

    /// Read a workout document. Only a non-object document is an error.
    pub fn from_json(value: &Value) -> Result<Self, SpecError> {
        let object = value
            .as_object()
            .ok_or_else(|| SpecError::NotAnObject(json_kind(value).to_string()))?;
        let record = Record::new(object);

        let pool_unit = record
            .get(POOL_UNIT_KEYS)
            .and_then(Value::as_str)
            .and_then(DistanceUnit::parse);

        let (steps, skipped_steps) = match record.field(STEPS_KEYS, read_steps) {
            Field::Present((steps, skipped)) => (Field::Present(steps), skipped),
            Field::Malformed(reason) => (Field::Malformed(reason), 0),
            Field::Absent => (Field::Absent, 0),
        };

        Ok(WorkoutSpec {
            name: record.field(NAME_KEYS, read_text),
            description: record.field(DESCRIPTION_KEYS, read_text),
            discipline: record.field(DISCIPLINE_KEYS, |v| v.as_str().and_then(Discipline::parse)),
            date: record.field(DATE_KEYS, read_date),
            steps,
            skipped_steps,
            steps_preset_tokens: record.field(TOKEN_KEYS, read_tokens),
            total_duration_seconds: record.field(TOTAL_KEYS, read_seconds),
            tags: read_tags(record.get(&["tags"])),
            ftp_watts: record.field(FTP_KEYS, |v| read_number(v).filter(|f| *f > 0.0)),
            pool_length: record.field(POOL_KEYS, |v| read_distance(v, pool_unit)),
            threshold_pace: record.field(THRESHOLD_PACE_KEYS, read_pace),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn read_text(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

fn read_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Whole seconds from a number, numeric string or clock text.
fn read_seconds(value: &Value) -> Option<u32> {
    if let Some(n) = read_number(value) {
        return (n >= 0.0 && n <= u32::MAX as f64).then(|| n.round() as u32);
    }
    value.as_str().and_then(parse_clock)
}

fn read_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Value itself, or the JSON embedded in a string.
fn unembed(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                serde_json::from_str(trimmed).ok()
            } else {
                None
            }
        }
        other => Some(other.clone()),
    }
}

/// Readable steps and the number of elements that were not step objects.
/// A non-empty list with no readable step at all is unreadable.
fn read_steps(value: &Value) -> Option<(Vec<Step>, usize)> {
    let value = unembed(value)?;
    let items = value.as_array()?;
    let steps: Vec<Step> = items.iter().filter_map(read_step).collect();
    let skipped = items.len() - steps.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} of {} step entries", skipped, items.len());
    }
    (!steps.is_empty() || items.is_empty()).then_some((steps, skipped))
}

fn read_tokens(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(|s| s.trim().to_string()))
            .collect(),
        Value::String(s) if s.trim_start().starts_with('[') => read_tokens(&unembed(value)?),
        Value::String(s) => Some(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn read_tags(value: Option<&Value>) -> BTreeSet<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `"25yd"`, `{"value": 25, "unit": "yd"}`, or a bare number in `default_unit`
/// (meters when none is given).
fn read_distance(value: &Value, default_unit: Option<DistanceUnit>) -> Option<Distance> {
    let distance = match value {
        Value::Object(obj) => {
            let amount = read_number(obj.get("value")?)?;
            let unit = obj
                .get("unit")
                .and_then(Value::as_str)
                .and_then(DistanceUnit::parse)
                .or(default_unit)
                .unwrap_or(DistanceUnit::Meters);
            Distance::new(amount, unit)
        }
        Value::String(s) => match parse_distance(s) {
            Some(d) => d,
            None => Distance::new(
                s.trim().parse::<f64>().ok()?,
                default_unit.unwrap_or(DistanceUnit::Meters),
            ),
        },
        other => Distance::new(read_number(other)?, default_unit.unwrap_or(DistanceUnit::Meters)),
    };
    distance.is_positive().then_some(distance)
}

fn read_pace(value: &Value) -> Option<Pace> {
    match value {
        Value::String(s) => Pace::parse(s),
        Value::Object(_) => serde_json::from_value::<Pace>(value.clone()).ok(),
        _ => None,
    }
    .filter(Pace::is_valid)
}

fn read_step(value: &Value) -> Option<Step> {
    let record = Record::new(value.as_object()?);

    let kind = record
        .get(&["kind", "type", "step_type"])
        .and_then(Value::as_str)
        .map(StepKind::parse)
        .unwrap_or(StepKind::Unknown);
    let mut step = Step::new(kind);

    step.id = record.get(&["id"]).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    step.label = record
        .get(&["label", "note", "name"])
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    step.duration_seconds = record
        .get(&["duration_seconds", "duration_s", "seconds", "duration"])
        .and_then(read_seconds);
    step.distance = step_distance(&record);
    step.target = step_target(&record);

    Some(step)
}

fn step_distance(record: &Record) -> Option<Distance> {
    let suffixed: [(&str, DistanceUnit); 5] = [
        ("distance_m", DistanceUnit::Meters),
        ("distance_meters", DistanceUnit::Meters),
        ("distance_yd", DistanceUnit::Yards),
        ("distance_km", DistanceUnit::Kilometers),
        ("distance_mi", DistanceUnit::Miles),
    ];
    for (key, unit) in suffixed {
        if let Some(value) = record.get(&[key]) {
            return read_distance(value, Some(unit));
        }
    }

    let unit = record
        .get(&["distance_unit", "unit"])
        .and_then(Value::as_str)
        .and_then(DistanceUnit::parse);
    record.get(&["distance"]).and_then(|v| read_distance(v, unit))
}

fn step_target(record: &Record) -> IntensityTarget {
    if let Some(target) = record.get(&["target"]) {
        let target = match target {
            Value::Object(_) => serde_json::from_value::<IntensityTarget>(target.clone()).ok(),
            Value::String(s) => Some(target_from_text(s)),
            _ => None,
        };
        if let Some(target) = target {
            return target;
        }
    }

    let pace_basis = record
        .get(&["pace_basis", "pace_unit"])
        .and_then(|v| serde_json::from_value::<PaceBasis>(v.clone()).ok());

    let shorthands: [(&[&str], fn(TargetValue, Option<PaceBasis>) -> IntensityTarget); 5] = [
        (&["pace_range", "pace"], |value, basis| IntensityTarget::Pace { value, basis }),
        (&["percent_ftp", "ftp_pct", "ftp_percent"], |value, _| IntensityTarget::Power {
            value,
            basis: PowerBasis::PercentFtp,
        }),
        (&["power_range", "power", "watts"], |value, _| IntensityTarget::Power {
            value,
            basis: PowerBasis::Watts,
        }),
        (&["heart_rate", "hr", "bpm"], |value, _| IntensityTarget::HeartRate { value }),
        (&["rpe"], |value, _| IntensityTarget::Rpe { value }),
    ];

    for (keys, build) in shorthands {
        if let Some(value) = record.get(keys) {
            if let Some(value) = target_value(value) {
                return build(value, pace_basis);
            }
        }
    }

    IntensityTarget::None
}

fn target_value(value: &Value) -> Option<TargetValue> {
    match value {
        Value::Number(n) => n.as_f64().map(TargetValue::Scalar),
        Value::String(s) => Some(TargetValue::Encoded(s.trim().to_string())),
        Value::Array(_) | Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// Guess the target type from its text: `7:43/mi`, `250W`, `95%`, `150 bpm`, `RPE 7`.
fn target_from_text(text: &str) -> IntensityTarget {
    let lower = text.trim().to_ascii_lowercase();
    let value = TargetValue::Encoded(lower.clone());
    if lower.contains('/') {
        IntensityTarget::Pace { value, basis: None }
    } else if lower.contains('%') {
        IntensityTarget::Power {
            value,
            basis: PowerBasis::PercentFtp,
        }
    } else if lower.ends_with('w') {
        IntensityTarget::Power {
            value,
            basis: PowerBasis::Watts,
        }
    } else if lower.contains("bpm") {
        IntensityTarget::HeartRate { value }
    } else if let Some(rest) = lower.strip_prefix("rpe") {
        IntensityTarget::Rpe {
            value: TargetValue::Encoded(rest.trim().to_string()),
        }
    } else {
        IntensityTarget::None
    }
}
