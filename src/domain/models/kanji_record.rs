use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker prefixed to readings that are secondary in the source dataset.
const SECONDARY_READING_MARKER: char = '!';

const ON_READING_KEYS: &[&str] = &["readings_on", "wk_readings_on", "on_readings", "on"];
const KUN_READING_KEYS: &[&str] = &["readings_kun", "wk_readings_kun", "kun_readings", "kun"];
const JLPT_FALLBACK_KEYS: &[&str] = &["jlpt", "jlpt_level", "jlpt_old"];

/// JLPT classification as it appears in the dataset: either a numeric level or a
/// label that is already formatted (e.g. `"N5"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JlptLevel {
    Numeric(i64),
    Label(String),
}

impl fmt::Display for JlptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JlptLevel::Numeric(n) => write!(f, "N{}", n),
            JlptLevel::Label(label) => f.write_str(label),
        }
    }
}

/// Reference data for a single kanji. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanjiRecord {
    pub kanji: String,
    pub meanings: Vec<String>,
    pub readings_on: Vec<String>,
    pub readings_kun: Vec<String>,
    pub radicals: Vec<String>,
    pub jlpt: Option<JlptLevel>,
    pub stroke_svg: Option<String>,
}

impl KanjiRecord {
    pub fn new(kanji: impl Into<String>) -> Self {
        Self {
            kanji: kanji.into(),
            meanings: Vec::new(),
            readings_on: Vec::new(),
            readings_kun: Vec::new(),
            radicals: Vec::new(),
            jlpt: None,
            stroke_svg: None,
        }
    }

    pub fn with_meanings<I, S>(mut self, meanings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meanings = meanings.into_iter().map(Into::into).collect();
        self
    }

    /// Build a record from one value of the kanji JSON object.
    ///
    /// Several historical key spellings are accepted for readings and JLPT data;
    /// the first non-empty one wins. Missing fields become empty, never errors.
    pub fn from_json(kanji: &str, value: &Value) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        let readings_on = first_present(fields, ON_READING_KEYS)
            .map(string_list)
            .unwrap_or_default();
        let readings_kun = first_present(fields, KUN_READING_KEYS)
            .map(string_list)
            .unwrap_or_default();

        Self {
            kanji: kanji.to_string(),
            meanings: fields.get("meanings").map(string_list).unwrap_or_default(),
            readings_on: strip_secondary_markers(readings_on),
            readings_kun: strip_secondary_markers(readings_kun),
            radicals: fields.get("wk_radicals").map(string_list).unwrap_or_default(),
            jlpt: jlpt_level(fields),
            stroke_svg: fields
                .get("stroke_svg")
                .filter(|v| is_truthy(v))
                .map(value_to_string),
        }
    }

    /// Meanings joined the way they are shown and fed to the prompt.
    pub fn meanings_text(&self) -> String {
        self.meanings.join(", ")
    }

    /// Left-hand side of the mnemonic line: radicals joined with `+`, or the
    /// meanings when the kanji has no known radicals.
    pub fn lhs(&self) -> String {
        if self.radicals.is_empty() {
            self.meanings_text()
        } else {
            self.radicals.join(" + ")
        }
    }

    pub fn has_readings(&self) -> bool {
        !self.readings_on.is_empty() || !self.readings_kun.is_empty()
    }
}

fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_string(other)],
    }
}

fn strip_secondary_markers(readings: Vec<String>) -> Vec<String> {
    readings
        .into_iter()
        .map(|r| r.trim_start_matches(SECONDARY_READING_MARKER).to_string())
        .collect()
}

fn as_level(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn jlpt_level(fields: &Map<String, Value>) -> Option<JlptLevel> {
    match fields.get("jlpt_new") {
        Some(value) if !value.is_null() => Some(
            as_level(value)
                .map(JlptLevel::Numeric)
                .unwrap_or_else(|| JlptLevel::Label(value_to_string(value).to_uppercase())),
        ),
        _ => first_present(fields, JLPT_FALLBACK_KEYS).map(|value| {
            as_level(value)
                .map(JlptLevel::Numeric)
                .unwrap_or_else(|| JlptLevel::Label(value_to_string(value)))
        }),
    }
}
