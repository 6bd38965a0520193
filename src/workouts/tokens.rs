//! Compact authoring token decoder.
//!
//! Tokens look like `swim_drill_catchup_4x50yd_r15` or `run_warmup_2mi`:
//!
//! ```text
//! <discipline>_<segment>[_<qualifier>]_<count>x<amount><unit>[_r<rest>]
//! <discipline>_{warmup|cooldown}_<amount><unit>
//! ```
//!
//! Tokens are advisory annotations. A token that doesn't decode is skipped and
//! counted, never reported as a failure to the caller.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use serde::Serialize;
use thiserror::Error;

use crate::units::{format_clock, format_rest, parse_clock, Distance, DistanceUnit};
use crate::workouts::types::{Discipline, Step, StepKind};

/// Upper bound on a token's repeat count.
const MAX_REPEAT_COUNT: u32 = 200;

/// Display labels for known segment kinds.
const SEGMENT_LABELS: &[(&str, &str)] = &[
    ("drill", "Drills"),
    ("drills", "Drills"),
    ("pull", "Pull"),
    ("kick", "Kick"),
    ("swim", "Swim"),
    ("main", "Main"),
    ("aerobic", "Aerobic"),
    ("threshold", "Threshold"),
    ("interval", "Intervals"),
    ("intervals", "Intervals"),
    ("sprint", "Sprints"),
    ("sprints", "Sprints"),
    ("strides", "Strides"),
    ("tempo", "Tempo"),
    ("hill", "Hills"),
    ("hills", "Hills"),
    ("build", "Build"),
    ("easy", "Easy"),
];

/// Amount of one repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    Distance(Distance),
    Seconds(u32),
}

impl Amount {
    /// Display form. Swim distances drop the unit; the pool implies it.
    fn render(&self, discipline: Discipline) -> String {
        match self {
            Amount::Distance(d) if discipline == Discipline::Swim => d.render_bare(),
            Amount::Distance(d) => d.render(),
            Amount::Seconds(s) => format_clock(*s),
        }
    }

    /// Display form keeping the unit.
    fn render_with_unit(&self) -> String {
        match self {
            Amount::Distance(d) => d.render(),
            Amount::Seconds(s) => format_clock(*s),
        }
    }

    fn apply_to(&self, step: Step) -> Step {
        match self {
            Amount::Distance(d) => step.with_distance(*d),
            Amount::Seconds(s) => step.with_duration(*s),
        }
    }
}

/// Segment part of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSegment {
    Warmup,
    Cooldown,
    /// Repeat set, with its raw kind and display label
    Set { kind: String, label: String },
}

/// One decoded token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedToken {
    /// Discipline prefix
    pub discipline: Discipline,
    /// Segment kind
    pub segment: TokenSegment,
    /// Optional qualifier (`catchup`, `single arm`)
    pub qualifier: Option<String>,
    /// Repetitions (1 for warmup/cooldown)
    pub repeat_count: u32,
    /// Amount per repetition
    pub amount: Amount,
    /// Rest after each repetition
    pub rest_seconds: Option<u32>,
    /// Human phrase, e.g. `Drills: catchup 4x50 @ :15r`
    pub display: String,
}

impl DecodedToken {
    /// Expand into individual steps.
    pub fn to_steps(&self) -> Vec<Step> {
        match &self.segment {
            TokenSegment::Warmup => vec![self.amount.apply_to(Step::new(StepKind::Warmup))],
            TokenSegment::Cooldown => vec![self.amount.apply_to(Step::new(StepKind::Cooldown))],
            TokenSegment::Set { .. } => {
                let mut work = self.amount.apply_to(Step::new(StepKind::Work));
                work.label = self.qualifier.clone();
                let rest = self
                    .rest_seconds
                    .filter(|r| *r > 0)
                    .map(|r| Step::timed(StepKind::Recovery, r));

                let mut steps = Vec::with_capacity(self.repeat_count as usize * 2);
                for _ in 0..self.repeat_count {
                    steps.push(work.clone());
                    if let Some(ref rest) = rest {
                        steps.push(rest.clone());
                    }
                }
                steps
            }
        }
    }

    /// Raw segment kind (`warmup`, `cooldown`, `drill`, ...).
    pub fn segment_kind(&self) -> &str {
        match &self.segment {
            TokenSegment::Warmup => "warmup",
            TokenSegment::Cooldown => "cooldown",
            TokenSegment::Set { kind, .. } => kind,
        }
    }
}

/// Why a token could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Empty token")]
    Empty,

    #[error("Unknown discipline: {0}")]
    UnknownDiscipline(String),

    #[error("Invalid segment kind: {0}")]
    InvalidSegment(String),

    #[error("Missing amount in token: {0}")]
    MissingAmount(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid repeat count: {0}")]
    InvalidCount(String),

    #[error("Unexpected parts after amount: {0}")]
    TrailingParts(String),
}

/// Decode a single token.
pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
    let token = token.trim().to_ascii_lowercase();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    let mut parts: Vec<&str> = token.split('_').filter(|p| !p.is_empty()).collect();

    let discipline = take_discipline(&mut parts)?;
    if parts.is_empty() {
        return Err(TokenError::InvalidSegment(token.clone()));
    }
    let segment_kind = parts.remove(0);
    if !segment_kind.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TokenError::InvalidSegment(segment_kind.to_string()));
    }

    match segment_kind {
        "warmup" | "cooldown" => {
            let amount_text = match parts.as_slice() {
                [amount] => *amount,
                [] => return Err(TokenError::MissingAmount(token.clone())),
                [_, rest @ ..] => return Err(TokenError::TrailingParts(rest.join("_"))),
            };
            let amount = parse_amount(amount_text)?;
            let (segment, prefix) = if segment_kind == "warmup" {
                (TokenSegment::Warmup, "Warm-up")
            } else {
                (TokenSegment::Cooldown, "Cool-down")
            };
            Ok(DecodedToken {
                discipline,
                segment,
                qualifier: None,
                repeat_count: 1,
                amount,
                rest_seconds: None,
                display: format!("{} {}", prefix, amount.render_with_unit()),
            })
        }
        _ => decode_set(discipline, segment_kind, parts, &token),
    }
}

fn take_discipline(parts: &mut Vec<&str>) -> Result<Discipline, TokenError> {
    if parts.len() >= 2 && parts[0] == "pilates" && parts[1] == "yoga" {
        parts.drain(..2);
        return Ok(Discipline::PilatesYoga);
    }
    if parts.is_empty() {
        return Err(TokenError::Empty);
    }
    let first = parts.remove(0);
    Discipline::parse(first).ok_or_else(|| TokenError::UnknownDiscipline(first.to_string()))
}

fn decode_set(
    discipline: Discipline,
    kind: &str,
    mut parts: Vec<&str>,
    token: &str,
) -> Result<DecodedToken, TokenError> {
    let rest_seconds = match parts.last() {
        Some(last) if is_rest_part(last) => {
            let rest = parse_rest(last)?;
            parts.pop();
            Some(rest)
        }
        _ => None,
    };

    let count_part = parts
        .pop()
        .ok_or_else(|| TokenError::MissingAmount(token.to_string()))?;
    let (repeat_count, amount, explicit_count) = parse_count_spec(count_part)?;

    let qualifier = if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    };

    let label = segment_label(kind);
    let mut display = label.clone();
    if let Some(ref q) = qualifier {
        display.push_str(": ");
        display.push_str(q);
    }
    display.push(' ');
    if explicit_count {
        display.push_str(&format!("{}x", repeat_count));
    }
    display.push_str(&amount.render(discipline));
    if let Some(rest) = rest_seconds.filter(|r| *r > 0) {
        display.push_str(&format!(" @ {}r", format_rest(rest)));
    }

    Ok(DecodedToken {
        discipline,
        segment: TokenSegment::Set {
            kind: kind.to_string(),
            label,
        },
        qualifier,
        repeat_count,
        amount,
        rest_seconds,
        display,
    })
}

fn segment_label(kind: &str) -> String {
    SEGMENT_LABELS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| capitalize(kind))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_rest_part(part: &str) -> bool {
    part.len() > 1
        && part.starts_with('r')
        && part[1..].chars().all(|c| c.is_ascii_digit() || c == ':')
}

fn parse_rest(part: &str) -> Result<u32, TokenError> {
    parse_clock(&part[1..]).ok_or_else(|| TokenError::InvalidAmount(part.to_string()))
}

/// Parse `4x50yd` (explicit count) or `20min` (count of one).
fn parse_count_spec(part: &str) -> Result<(u32, Amount, bool), TokenError> {
    match part.split_once('x') {
        Some((count, amount)) => {
            let count: u32 = count
                .parse()
                .map_err(|_| TokenError::InvalidCount(part.to_string()))?;
            if count == 0 || count > MAX_REPEAT_COUNT {
                return Err(TokenError::InvalidCount(part.to_string()));
            }
            Ok((count, parse_amount(amount)?, true))
        }
        None => Ok((1, parse_amount(part)?, false)),
    }
}

/// Parse `<amount><unit>`: `200yd`, `800m`, `1.5km`, `90s`, `20min`.
fn parse_amount(text: &str) -> Result<Amount, TokenError> {
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| TokenError::InvalidAmount(text.to_string()))?;
    let (number, unit) = text.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| TokenError::InvalidAmount(text.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(TokenError::InvalidAmount(text.to_string()));
    }

    match unit {
        "s" | "sec" => Ok(Amount::Seconds(value.round() as u32)),
        "min" => Ok(Amount::Seconds((value * 60.0).round() as u32)),
        _ => DistanceUnit::parse(unit)
            .map(|u| Amount::Distance(Distance::new(value, u)))
            .ok_or_else(|| TokenError::InvalidAmount(text.to_string())),
    }
}

/// Most distinct tokens kept in the decode cache before it is emptied.
pub const TOKEN_CACHE_CAPACITY: usize = 4096;

static TOKEN_CACHE: LazyLock<RwLock<HashMap<String, Option<DecodedToken>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Decode a token through the process-wide cache.
///
/// The cache only memoizes a pure function, so it may be cleared at any time.
/// A poisoned lock falls back to decoding directly.
pub fn decode_cached(token: &str) -> Option<DecodedToken> {
    if let Ok(cache) = TOKEN_CACHE.read() {
        if let Some(hit) = cache.get(token) {
            tracing::trace!("Token cache hit for {}", token);
            return hit.clone();
        }
    }

    let decoded = match decode(token) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!("Skipping token {:?}: {}", token, e);
            None
        }
    };

    if let Ok(mut cache) = TOKEN_CACHE.write() {
        if cache.len() >= TOKEN_CACHE_CAPACITY {
            tracing::debug!("Token cache reached {} entries, clearing", cache.len());
            cache.clear();
        }
        cache.insert(token.to_string(), decoded.clone());
    }
    decoded
}

/// Number of cached decode results.
pub fn token_cache_len() -> usize {
    TOKEN_CACHE.read().map(|cache| cache.len()).unwrap_or(0)
}

/// Drop every cached decode result.
pub fn clear_token_cache() {
    if let Ok(mut cache) = TOKEN_CACHE.write() {
        cache.clear();
    }
}

/// Result of decoding an ordered token list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenDecode {
    /// Decoded tokens in input order
    pub fragments: Vec<DecodedToken>,
    /// Number of tokens that did not decode
    pub skipped: usize,
}

impl TokenDecode {
    /// All fragments expanded into steps, in order.
    pub fn steps(&self) -> Vec<Step> {
        self.fragments.iter().flat_map(|f| f.to_steps()).collect()
    }

    /// Display phrases, one per fragment.
    pub fn display_lines(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.display.clone()).collect()
    }
}

/// Decode an ordered token list, skipping tokens that don't decode.
pub fn decode_tokens<S: AsRef<str>>(tokens: &[S]) -> TokenDecode {
    let mut out = TokenDecode::default();
    for token in tokens {
        match decode_cached(token.as_ref()) {
            Some(fragment) => out.fragments.push(fragment),
            None => out.skipped += 1,
        }
    }
    out
}
