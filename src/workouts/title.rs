//! Short category titles such as `Run — Tempo`.
//!
//! Each discipline has an ordered rule table. A workout's category comes from
//! the first rule matching its tags, else the first matching decoded token
//! segment kind, else the first rule whose pattern matches its name or
//! description. Tags always beat text.

use std::sync::LazyLock;

use regex::Regex;

use crate::workouts::tokens::decode_tokens;
use crate::workouts::types::{Discipline, WorkoutSpec};

/// Separator between discipline and category.
pub const TITLE_SEPARATOR: &str = " — ";

/// Title used when neither discipline nor category is known.
pub const FALLBACK_TITLE: &str = "Session";

struct RuleDef {
    discipline: Discipline,
    label: &'static str,
    tags: &'static [&'static str],
    token_kinds: &'static [&'static str],
    pattern: &'static str,
}

const RULE_DEFS: &[RuleDef] = &[
    // Run
    RuleDef {
        discipline: Discipline::Run,
        label: "Hills",
        tags: &["hills", "hill"],
        token_kinds: &["hill", "hills"],
        pattern: r"(?i)\bhills?\b",
    },
    RuleDef {
        discipline: Discipline::Run,
        label: "Intervals",
        tags: &["intervals", "interval", "vo2", "vo2max", "track"],
        token_kinds: &["interval", "intervals", "sprint", "sprints"],
        pattern: r"(?i)\b(\d+\s*[x×]\s*\d+|intervals?|vo2\s*max|vo2|repeats?|track)\b",
    },
    RuleDef {
        discipline: Discipline::Run,
        label: "Tempo",
        tags: &["tempo", "threshold"],
        token_kinds: &["tempo", "threshold"],
        pattern: r"(?i)\b(tempo|threshold|cruise|lt)\b",
    },
    RuleDef {
        discipline: Discipline::Run,
        label: "Long Run",
        tags: &["long", "long_run"],
        token_kinds: &[],
        pattern: r"(?i)\blong\b",
    },
    RuleDef {
        discipline: Discipline::Run,
        label: "Strides",
        tags: &["strides"],
        token_kinds: &["strides"],
        pattern: r"(?i)\bstrides\b",
    },
    RuleDef {
        discipline: Discipline::Run,
        label: "Easy",
        tags: &["easy", "recovery", "aerobic"],
        token_kinds: &["easy", "aerobic"],
        pattern: r"(?i)\b(easy|recovery|shakeout|aerobic)\b",
    },
    // Ride
    RuleDef {
        discipline: Discipline::Ride,
        label: "VO2",
        tags: &["vo2", "vo2max", "intervals"],
        token_kinds: &["interval", "intervals", "sprint", "sprints"],
        pattern: r"(?i)\b(vo2\s*max|vo2|intervals?)\b",
    },
    RuleDef {
        discipline: Discipline::Ride,
        label: "Threshold",
        tags: &["threshold", "ftp"],
        token_kinds: &["threshold"],
        pattern: r"(?i)\b(threshold|ftp)\b",
    },
    RuleDef {
        discipline: Discipline::Ride,
        label: "Sweet Spot",
        tags: &["sweetspot", "sweet_spot", "ss"],
        token_kinds: &["tempo"],
        pattern: r"(?i)\b(sweet\s*spot|ss)\b",
    },
    RuleDef {
        discipline: Discipline::Ride,
        label: "Endurance",
        tags: &["endurance", "z2", "long"],
        token_kinds: &["aerobic", "easy"],
        pattern: r"(?i)\b(endurance|zone\s*2|z2|long)\b",
    },
    RuleDef {
        discipline: Discipline::Ride,
        label: "Recovery",
        tags: &["recovery"],
        token_kinds: &[],
        pattern: r"(?i)\b(recovery|spin)\b",
    },
    // Swim
    RuleDef {
        discipline: Discipline::Swim,
        label: "Drills",
        tags: &["drills", "drill", "technique"],
        token_kinds: &["drill", "drills"],
        pattern: r"(?i)\b(drills?|technique|catch\s*up|catchup)\b",
    },
    RuleDef {
        discipline: Discipline::Swim,
        label: "Threshold",
        tags: &["threshold", "css"],
        token_kinds: &["threshold"],
        pattern: r"(?i)\b(css|threshold)\b",
    },
    RuleDef {
        discipline: Discipline::Swim,
        label: "Speed",
        tags: &["speed", "sprint"],
        token_kinds: &["sprint", "sprints"],
        pattern: r"(?i)\b(speed|sprints?)\b",
    },
    RuleDef {
        discipline: Discipline::Swim,
        label: "Endurance",
        tags: &["endurance", "aerobic"],
        token_kinds: &["aerobic", "main", "pull"],
        pattern: r"(?i)\b(endurance|aerobic|distance)\b",
    },
    // Strength
    RuleDef {
        discipline: Discipline::Strength,
        label: "Upper Body",
        tags: &["upper", "upper_body"],
        token_kinds: &[],
        pattern: r"(?i)\b(upper|push|pull|bench|press)\b",
    },
    RuleDef {
        discipline: Discipline::Strength,
        label: "Lower Body",
        tags: &["lower", "lower_body", "legs"],
        token_kinds: &[],
        pattern: r"(?i)\b(lower|legs?|squats?|deadlifts?|lunges?)\b",
    },
    RuleDef {
        discipline: Discipline::Strength,
        label: "Core",
        tags: &["core"],
        token_kinds: &[],
        pattern: r"(?i)\b(core|abs|plank)\b",
    },
    RuleDef {
        discipline: Discipline::Strength,
        label: "Full Body",
        tags: &["full_body", "full"],
        token_kinds: &[],
        pattern: r"(?i)\bfull[\s-]*body\b",
    },
    // Mobility
    RuleDef {
        discipline: Discipline::Mobility,
        label: "Hips",
        tags: &["hips"],
        token_kinds: &[],
        pattern: r"(?i)\bhips?\b",
    },
    RuleDef {
        discipline: Discipline::Mobility,
        label: "Stretch",
        tags: &["stretch"],
        token_kinds: &[],
        pattern: r"(?i)\bstretch(ing)?\b",
    },
    // Pilates / yoga
    RuleDef {
        discipline: Discipline::PilatesYoga,
        label: "Yoga",
        tags: &["yoga"],
        token_kinds: &[],
        pattern: r"(?i)\b(yoga|vinyasa|yin)\b",
    },
    RuleDef {
        discipline: Discipline::PilatesYoga,
        label: "Pilates",
        tags: &["pilates"],
        token_kinds: &[],
        pattern: r"(?i)\b(pilates|reformer)\b",
    },
];

struct TitleRule {
    def: &'static RuleDef,
    regex: Option<Regex>,
}

static TITLE_RULES: LazyLock<Vec<TitleRule>> = LazyLock::new(|| {
    RULE_DEFS
        .iter()
        .map(|def| TitleRule {
            def,
            regex: Regex::new(def.pattern).ok(),
        })
        .collect()
});

/// Category of a workout within its discipline, if any rule matches.
pub fn category(spec: &WorkoutSpec) -> Option<&'static str> {
    let discipline = *spec.discipline.present()?;
    let rules: Vec<&TitleRule> = TITLE_RULES
        .iter()
        .filter(|r| r.def.discipline == discipline)
        .collect();

    // Tags first
    if let Some(rule) = rules
        .iter()
        .find(|r| r.def.tags.iter().any(|t| spec.tags.contains(*t)))
    {
        return Some(rule.def.label);
    }

    // Decoded token segment kinds
    if let Some(tokens) = spec.steps_preset_tokens.present() {
        let decoded = decode_tokens(tokens);
        for fragment in &decoded.fragments {
            let kind = fragment.segment_kind();
            if let Some(rule) = rules.iter().find(|r| r.def.token_kinds.iter().any(|k| *k == kind)) {
                return Some(rule.def.label);
            }
        }
    }

    // Name, then description
    let texts = [spec.name.present(), spec.description.present()];
    for text in texts.into_iter().flatten() {
        if let Some(rule) = rules.iter().find(|r| {
            r.regex
                .as_ref()
                .is_some_and(|re| re.is_match(text))
        }) {
            return Some(rule.def.label);
        }
    }

    None
}

/// Short display title, e.g. `Run — Tempo`.
pub fn title(spec: &WorkoutSpec) -> String {
    let discipline = spec.discipline.present().copied();
    match (discipline, category(spec)) {
        (Some(d), Some(label)) => format!("{}{}{}", d.display_name(), TITLE_SEPARATOR, label),
        (Some(d), None) => d.display_name().to_string(),
        (None, _) => FALLBACK_TITLE.to_string(),
    }
}
