use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::domain::{numeric, ContestId, PropId, PushRule};

const DEFAULT_NONE_LABEL: &str = "NONE";

/// Prop sheet for one contest instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestSchema {
    #[serde(alias = "contest_id")]
    pub game_id: ContestId,
    #[serde(default)]
    pub push_rule: Option<PushRule>,
    #[serde(default)]
    pub props: Vec<Proposition>,
}

/// One question in the contest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PropositionRecord")]
pub struct Proposition {
    pub id: PropId,
    pub label: String,
    pub section: Option<String>,
    /// Outcome field consulted for this proposition; defaults to the id.
    pub result_key: String,
    pub kind: PropKind,
}

/// Answer kinds, each carrying exactly the configuration its resolution rule needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKind {
    OverUnder {
        line: f64,
        points: f64,
    },
    TeamPick {
        options: Vec<String>,
        points: f64,
        allow_tie: bool,
    },
    SpreadPick {
        sides: [SpreadSide; 2],
        points: f64,
    },
    AnytimeScorer {
        points: f64,
    },
    RestrictedAnytimeScorer {
        points: f64,
        eligibility: EligibilitySource,
    },
    PlayerEquals {
        points: f64,
    },
    TextEquals {
        points: f64,
    },
    YesOnlyBoolean {
        stakes: YesOnlyStakes,
    },
    YesOnlyPlayerFromList {
        stakes: YesOnlyStakes,
        none_label: String,
    },
    /// Unknown type tag; scored by direct string equality.
    Direct {
        type_name: String,
        points: f64,
    },
    /// Configuration that does not fit its type. Never resolves.
    Malformed {
        type_name: String,
        reason: String,
    },
}

impl PropKind {
    pub fn type_name(&self) -> &str {
        match self {
            Self::OverUnder { .. } => "over_under",
            Self::TeamPick { .. } => "team_pick",
            Self::SpreadPick { .. } => "spread_pick",
            Self::AnytimeScorer { .. } => "player_anytime_td",
            Self::RestrictedAnytimeScorer { .. } => "restricted_anytime_td",
            Self::PlayerEquals { .. } => "player_equals",
            Self::TextEquals { .. } => "text_equals",
            Self::YesOnlyBoolean { .. } => "yes_only_boolean",
            Self::YesOnlyPlayerFromList { .. } => "yes_only_player_from_list",
            Self::Direct { type_name, .. } | Self::Malformed { type_name, .. } => type_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadSide {
    pub team: String,
    pub spread: f64,
}

/// Where a restricted proposition finds its allow-list.
#[derive(Debug, Clone, PartialEq)]
pub enum EligibilitySource {
    Inline(Vec<String>),
    ListKey(String),
}

/// Asymmetric payouts for yes-only propositions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YesOnlyStakes {
    pub correct_yes: f64,
    pub incorrect_yes: f64,
    pub declined: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropositionRecord {
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    points: Option<Value>,
    #[serde(default)]
    points_correct_yes: Option<Value>,
    #[serde(default)]
    points_incorrect_yes: Option<Value>,
    #[serde(default)]
    points_if_no: Option<Value>,
    #[serde(default)]
    none_label: Option<String>,
    #[serde(default)]
    line: Option<Value>,
    #[serde(default)]
    options: Option<Vec<Value>>,
    #[serde(default)]
    allow_tie: bool,
    #[serde(default)]
    result_key: Option<String>,
    #[serde(default)]
    eligible_list_key: Option<String>,
    #[serde(default)]
    eligible_players: Option<Vec<String>>,
}

impl From<PropositionRecord> for Proposition {
    fn from(record: PropositionRecord) -> Self {
        let kind = match build_kind(&record) {
            Ok(kind) => kind,
            Err(reason) => {
                warn!(prop = %record.id, kind = %record.kind, %reason, "malformed proposition");
                PropKind::Malformed {
                    type_name: record.kind.clone(),
                    reason,
                }
            }
        };

        let result_key = non_blank(record.result_key).unwrap_or_else(|| record.id.clone());

        Self {
            label: record.label.unwrap_or_else(|| record.id.clone()),
            section: record.section,
            result_key,
            kind,
            id: PropId(record.id),
        }
    }
}

fn build_kind(record: &PropositionRecord) -> Result<PropKind, String> {
    let kind = match record.kind.trim() {
        "" => return Err("missing type".to_string()),
        "over_under" => PropKind::OverUnder {
            line: required_number(&record.line, "line")?,
            points: base_points(record)?,
        },
        "team_pick" => PropKind::TeamPick {
            options: record
                .options
                .iter()
                .flatten()
                .filter_map(|option| option.as_str().map(str::to_string))
                .collect(),
            points: base_points(record)?,
            allow_tie: record.allow_tie,
        },
        "spread_pick" => PropKind::SpreadPick {
            sides: spread_sides(record)?,
            points: base_points(record)?,
        },
        "player_anytime_td" => PropKind::AnytimeScorer {
            points: base_points(record)?,
        },
        "restricted_anytime_td" => {
            let eligibility = match &record.eligible_players {
                Some(players) => EligibilitySource::Inline(players.clone()),
                None => EligibilitySource::ListKey(
                    non_blank(record.eligible_list_key.clone())
                        .unwrap_or_else(|| record.id.clone()),
                ),
            };
            PropKind::RestrictedAnytimeScorer {
                points: base_points(record)?,
                eligibility,
            }
        }
        "player_equals" => PropKind::PlayerEquals {
            points: base_points(record)?,
        },
        "text_equals" => PropKind::TextEquals {
            points: base_points(record)?,
        },
        "yes_only_boolean" => PropKind::YesOnlyBoolean {
            stakes: stakes(record)?,
        },
        "yes_only_player_from_list" => PropKind::YesOnlyPlayerFromList {
            stakes: stakes(record)?,
            none_label: non_blank(record.none_label.clone())
                .unwrap_or_else(|| DEFAULT_NONE_LABEL.to_string()),
        },
        other => PropKind::Direct {
            type_name: other.to_string(),
            points: base_points(record)?,
        },
    };

    Ok(kind)
}

fn base_points(record: &PropositionRecord) -> Result<f64, String> {
    required_number(&record.points, "points")
}

fn stakes(record: &PropositionRecord) -> Result<YesOnlyStakes, String> {
    Ok(YesOnlyStakes {
        correct_yes: required_number(&record.points_correct_yes, "pointsCorrectYes")?,
        incorrect_yes: required_number(&record.points_incorrect_yes, "pointsIncorrectYes")?,
        declined: record.points_if_no.as_ref().and_then(numeric).unwrap_or(0.0),
    })
}

fn spread_sides(record: &PropositionRecord) -> Result<[SpreadSide; 2], String> {
    let options = record.options.as_deref().unwrap_or_default();
    let [first, second] = options else {
        return Err(format!(
            "spread needs exactly two sides, found {}",
            options.len()
        ));
    };
    Ok([spread_side(first)?, spread_side(second)?])
}

fn spread_side(option: &Value) -> Result<SpreadSide, String> {
    let team = option
        .get("team")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|team| !team.is_empty())
        .ok_or_else(|| "spread side without team".to_string())?;
    let spread = option
        .get("spread")
        .and_then(numeric)
        .ok_or_else(|| format!("spread side '{team}' without numeric spread"))?;

    Ok(SpreadSide {
        team: team.to_string(),
        spread,
    })
}

fn required_number(value: &Option<Value>, field: &str) -> Result<f64, String> {
    value
        .as_ref()
        .and_then(numeric)
        .ok_or_else(|| format!("{field} must be numeric"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
