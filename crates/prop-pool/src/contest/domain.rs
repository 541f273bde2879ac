use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::normalizer::list_contains;

/// Reserved pick key holding the predicted final score pair.
pub const TIEBREAK_PICK_KEY: &str = "_tiebreaker_final_score";

/// Identifier of a contest instance (the `gameId` of a prop sheet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestId(pub String);

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable proposition identifier, keying picks, results and breakdown entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropId(pub String);

impl PropId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credit awarded when an outcome lands exactly on a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushRule {
    #[default]
    Zero,
    Half,
}

impl PushRule {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zero" => Some(Self::Zero),
            "half" => Some(Self::Half),
            _ => None,
        }
    }

    pub fn award(self, points: f64) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Half => points / 2.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Half => "half",
        }
    }
}

/// Per-proposition status shown in a score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickStatus {
    Win,
    Loss,
    Push,
    Neutral,
    Pending,
}

impl PickStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Push => "push",
            Self::Neutral => "neutral",
            Self::Pending => "pending",
        }
    }
}

/// Read-only view over the recorded outcome document.
///
/// Fields are filled in progressively while the event runs; an absent or `null` field is
/// always "not yet known", never false or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeSnapshot(Map<String, Value>);

impl OutcomeSnapshot {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Non-object documents carry no usable outcome and yield an empty snapshot.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Value::is_null)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(numeric)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// String entries of a list field; non-string entries are skipped.
    pub fn names(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }

    /// Side-keyed map in document order, e.g. `final` or `turnovers`.
    pub fn sides(&self, key: &str) -> Option<Vec<(&str, Option<f64>)>> {
        self.get(key).and_then(Value::as_object).map(|map| {
            map.iter()
                .map(|(side, value)| (side.as_str(), numeric(value)))
                .collect()
        })
    }
}

/// Lenient numeric read: JSON numbers and numeric strings count, anything else does not.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
        _ => None,
    }
}

/// Allow-lists keyed by eligibility list name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Eligibility(BTreeMap<String, Vec<String>>);

impl Eligibility {
    pub fn new(lists: BTreeMap<String, Vec<String>>) -> Self {
        Self(lists)
    }

    pub fn insert(&mut self, key: impl Into<String>, names: Vec<String>) {
        self.0.insert(key.into(), names);
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn allows(&self, key: &str, name: &str) -> bool {
        self.list(key)
            .map(|names| list_contains(names.iter().map(String::as_str), name))
            .unwrap_or(false)
    }
}

/// Predicted final score pair used to break ties between equal totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TiebreakPrediction {
    pub home: Option<f64>,
    pub away: Option<f64>,
}

impl TiebreakPrediction {
    pub fn new(home: f64, away: f64) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
        }
    }
}

/// One participant's entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SubmissionRecord", into = "SubmissionRecord")]
pub struct Submission {
    pub player_name: String,
    pub picks: BTreeMap<PropId, String>,
    pub tiebreak: Option<TiebreakPrediction>,
}

impl Submission {
    pub fn new<I, K, V>(player_name: impl Into<String>, picks: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            player_name: player_name.into(),
            picks: picks
                .into_iter()
                .map(|(id, pick)| (PropId(id.into()), pick.into()))
                .collect(),
            tiebreak: None,
        }
    }

    pub fn with_tiebreak(mut self, home: f64, away: f64) -> Self {
        self.tiebreak = Some(TiebreakPrediction::new(home, away));
        self
    }

    /// Trimmed, non-empty pick for a proposition.
    pub fn pick(&self, id: &PropId) -> Option<&str> {
        self.picks
            .get(id)
            .map(|pick| pick.trim())
            .filter(|pick| !pick.is_empty())
    }
}

/// Wire shape of a submission row: picks carry the reserved tie-break entry inline, and older
/// rows store the prediction in top-level `tiebreaker_home` / `tiebreaker_away` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubmissionRecord {
    #[serde(alias = "playerName")]
    player_name: String,
    #[serde(default)]
    picks: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tiebreaker_home: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tiebreaker_away: Option<Value>,
}

impl From<SubmissionRecord> for Submission {
    fn from(record: SubmissionRecord) -> Self {
        let mut picks = BTreeMap::new();
        let mut inline_home = None;
        let mut inline_away = None;
        let mut inline_present = false;

        for (key, value) in record.picks {
            if key == TIEBREAK_PICK_KEY {
                if let Value::Object(pair) = &value {
                    inline_present = true;
                    inline_home = pair.get("home").and_then(numeric);
                    inline_away = pair.get("away").and_then(numeric);
                }
                continue;
            }

            let pick = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => continue,
            };
            picks.insert(PropId(key), pick);
        }

        let legacy_present = record.tiebreaker_home.is_some() || record.tiebreaker_away.is_some();
        let tiebreak = if legacy_present || inline_present {
            Some(TiebreakPrediction {
                home: record.tiebreaker_home.as_ref().and_then(numeric).or(inline_home),
                away: record.tiebreaker_away.as_ref().and_then(numeric).or(inline_away),
            })
        } else {
            None
        };

        Self {
            player_name: record.player_name,
            picks,
            tiebreak,
        }
    }
}

impl From<Submission> for SubmissionRecord {
    fn from(submission: Submission) -> Self {
        let mut picks: Map<String, Value> = submission
            .picks
            .into_iter()
            .map(|(id, pick)| (id.0, Value::String(pick)))
            .collect();

        if let Some(prediction) = submission.tiebreak {
            let mut pair = Map::new();
            pair.insert("home".to_string(), optional_number(prediction.home));
            pair.insert("away".to_string(), optional_number(prediction.away));
            picks.insert(TIEBREAK_PICK_KEY.to_string(), Value::Object(pair));
        }

        Self {
            player_name: submission.player_name,
            picks,
            tiebreaker_home: None,
            tiebreaker_away: None,
        }
    }
}

fn optional_number(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
