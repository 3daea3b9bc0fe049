use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::prelude::Type;
use strsim::jaro_winkler;

#[derive(Clone, Debug, ValueEnum, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "kebab-case")]
pub enum Muscle {
    Pecho,
    Espalda,
    Piernas,
    Brazos,
    Hombros,
    Core,
    Cardio,
}

impl Display for Muscle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pecho => "pecho",
            Self::Espalda => "espalda",
            Self::Piernas => "piernas",
            Self::Brazos => "brazos",
            Self::Hombros => "hombros",
            Self::Core => "core",
            Self::Cardio => "cardio",
        };

        write!(f, "{}", s)
    }
}

pub static ALLOWED_MUSCLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "pecho", "espalda", "piernas", "brazos", "hombros", "core", "cardio",
    ])
});

/// Returns the canonical lowercase muscle-group name or `None` if not allowed.
pub fn canonical_muscle<S: AsRef<str>>(m: S) -> Option<String> {
    let m = m.as_ref().trim().to_lowercase();
    if ALLOWED_MUSCLES.contains(m.as_str()) {
        Some(m)
    } else {
        None
    }
}

/// Return the closest allowed muscle group for `input`
/// if similarity is high *and* clearly better than the runner-up.
/// Otherwise return `None` (no suggestion shown).
pub fn best_muscle_suggestion(input: &str) -> Option<&'static str> {
    let inp = input.to_lowercase();

    let mut scores: Vec<(&'static str, f64)> = ALLOWED_MUSCLES
        .iter()
        .copied()
        .map(|m| (m, jaro_winkler(&inp, m)))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let (best, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

/// Meal slots for nutrition logging.
#[derive(Clone, Debug, ValueEnum, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "kebab-case")]
pub enum MealType {
    Desayuno,
    Almuerzo,
    Merienda,
    Cena,
    Snack,
}

impl Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Desayuno => "desayuno",
            Self::Almuerzo => "almuerzo",
            Self::Merienda => "merienda",
            Self::Cena => "cena",
            Self::Snack => "snack",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "kebab-case")]
pub enum ProgramKind {
    Template,
    Custom,
}

impl Display for ProgramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// A rep target: either a fixed count or "to failure" ("al fallo").
/// Serialized the way the routine data writes it: a number, or the
/// literal string `al fallo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reps {
    Count(u32),
    ToFailure,
}

impl Display for Reps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::ToFailure => write!(f, "al fallo"),
        }
    }
}

impl Serialize for Reps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::ToFailure => serializer.serialize_str("al fallo"),
        }
    }
}

impl<'de> Deserialize<'de> for Reps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Reps::Count(n)),
            Raw::Text(s) if s == "al fallo" => Ok(Reps::ToFailure),
            Raw::Text(s) => s
                .parse::<u32>()
                .map(Reps::Count)
                .map_err(|_| serde::de::Error::custom(format!("invalid reps value `{}`", s))),
        }
    }
}

/// How command output should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFmt {
    Text,
    Json,
}

/// Emit `value` as pretty JSON, or run the text renderer.
pub fn emit<T: Serialize>(fmt: OutputFmt, value: &T, pretty: impl FnOnce()) {
    match fmt {
        OutputFmt::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error: could not serialize output: {}", e),
        },
        OutputFmt::Text => pretty(),
    }
}

/// Flat key/value config persisted as TOML under the user's config dir.
/// Recognized keys: `db_path`, `units`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

#[derive(Deserialize)]
pub struct ExerciseDef {
    pub name: String,
    pub description: Option<String>,
    pub primary_muscle: String,
    pub calories_per_minute: Option<f64>,
}

#[derive(Deserialize)]
pub struct ExerciseImport {
    pub exercise: Vec<ExerciseDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_muscle_accepts_known_groups() {
        assert_eq!(canonical_muscle("PECHO"), Some("pecho".to_string()));
        assert_eq!(canonical_muscle("  core "), Some("core".to_string()));
        assert_eq!(canonical_muscle("biceps"), None);
    }

    #[test]
    fn suggestion_catches_near_misses() {
        assert_eq!(best_muscle_suggestion("pechoo"), Some("pecho"));
        assert_eq!(best_muscle_suggestion("zzzz"), None);
    }

    #[test]
    fn reps_roundtrip_through_json() {
        let fixed: Reps = serde_json::from_str("12").unwrap();
        assert_eq!(fixed, Reps::Count(12));

        let failure: Reps = serde_json::from_str("\"al fallo\"").unwrap();
        assert_eq!(failure, Reps::ToFailure);

        assert_eq!(serde_json::to_string(&Reps::Count(12)).unwrap(), "12");
        assert_eq!(
            serde_json::to_string(&Reps::ToFailure).unwrap(),
            "\"al fallo\""
        );
    }

    #[test]
    fn numeric_strings_parse_as_counts() {
        let n: Reps = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(n, Reps::Count(12));
    }
}
