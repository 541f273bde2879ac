//! Derives the ground-truth answer for a proposition from an outcome snapshot.
//!
//! Resolution never fails: any missing, null, or non-numeric field the rule depends on yields
//! [`Resolution::Unresolved`], which callers score as pending.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use super::domain::{Eligibility, OutcomeSnapshot};
use super::normalizer::{list_contains, same_name};
use super::proposition::{EligibilitySource, PropKind, Proposition, SpreadSide};

pub const TIE_ANSWER: &str = "TIE";
pub const OVER_ANSWER: &str = "Over";
pub const UNDER_ANSWER: &str = "Under";

const FINAL_KEY: &str = "final";
const TOTAL_POINTS_KEY: &str = "total_points";
const ALL_SCORERS_KEY: &str = "all_td_scorers";
const SCORERS_BY_SIDE_KEY: &str = "td_scorers";
const PLAYER_FIELD: &str = "player";

/// Ground truth for a single proposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    Unresolved,
    Answer(String),
    /// Any listed name is a correct pick.
    AnyOf(Vec<String>),
    Flag(bool),
    Tie,
    Push,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    pub fn is_push(&self) -> bool {
        matches!(self, Self::Push)
    }

    pub fn correct_answer(&self) -> Option<String> {
        match self {
            Self::Unresolved | Self::Push => None,
            Self::Answer(answer) => Some(answer.clone()),
            Self::AnyOf(names) => Some(names.join(", ")),
            Self::Flag(true) => Some("YES".to_string()),
            Self::Flag(false) => Some("NO".to_string()),
            Self::Tie => Some(TIE_ANSWER.to_string()),
        }
    }
}

#[derive(Clone, Copy)]
enum Leader {
    Highest,
    Lowest,
}

pub fn resolve_outcome(
    prop: &Proposition,
    outcomes: &OutcomeSnapshot,
    eligibility: &Eligibility,
) -> Resolution {
    let key = prop.result_key.as_str();

    match &prop.kind {
        PropKind::OverUnder { line, .. } => over_under(stat_value(outcomes, key), *line),
        PropKind::TeamPick { .. } => team_pick(outcomes, key),
        PropKind::SpreadPick { sides, .. } => spread(outcomes, sides),
        PropKind::AnytimeScorer { .. } => scorers(outcomes)
            .map(Resolution::AnyOf)
            .unwrap_or(Resolution::Unresolved),
        PropKind::RestrictedAnytimeScorer {
            eligibility: source,
            ..
        } => match scorers(outcomes) {
            Some(scored) => {
                let allowed = allowed_names(source, eligibility);
                Resolution::AnyOf(
                    scored
                        .into_iter()
                        .filter(|name| list_contains(allowed.iter().copied(), name))
                        .collect(),
                )
            }
            None => Resolution::Unresolved,
        },
        PropKind::PlayerEquals { .. } => outcomes
            .get(key)
            .and_then(player_name)
            .map(|name| Resolution::Answer(name.to_string()))
            .unwrap_or(Resolution::Unresolved),
        PropKind::TextEquals { .. } | PropKind::Direct { .. } => outcomes
            .text(key)
            .map(|text| Resolution::Answer(text.to_string()))
            .unwrap_or(Resolution::Unresolved),
        PropKind::YesOnlyBoolean { .. } => outcomes
            .flag(key)
            .map(Resolution::Flag)
            .unwrap_or(Resolution::Unresolved),
        PropKind::YesOnlyPlayerFromList { .. } => outcomes
            .names(key)
            .map(|names| Resolution::AnyOf(names.into_iter().map(str::to_string).collect()))
            .unwrap_or(Resolution::Unresolved),
        PropKind::Malformed { .. } => Resolution::Unresolved,
    }
}

fn stat_value(outcomes: &OutcomeSnapshot, key: &str) -> Option<f64> {
    match outcomes.number(key) {
        Some(value) => Some(value),
        None if key == TOTAL_POINTS_KEY && outcomes.get(key).is_none() => {
            combined_final_score(outcomes)
        }
        None => None,
    }
}

fn combined_final_score(outcomes: &OutcomeSnapshot) -> Option<f64> {
    let sides = outcomes.sides(FINAL_KEY)?;
    if sides.is_empty() {
        return None;
    }
    sides.into_iter().map(|(_, score)| score).sum()
}

fn over_under(actual: Option<f64>, line: f64) -> Resolution {
    let Some(actual) = actual else {
        return Resolution::Unresolved;
    };

    match actual.partial_cmp(&line) {
        Some(Ordering::Greater) => Resolution::Answer(OVER_ANSWER.to_string()),
        Some(Ordering::Less) => Resolution::Answer(UNDER_ANSWER.to_string()),
        Some(Ordering::Equal) => Resolution::Push,
        None => Resolution::Unresolved,
    }
}

fn team_pick(outcomes: &OutcomeSnapshot, key: &str) -> Resolution {
    let leader = match key {
        "final" | "sacks" | "first_half" => Leader::Highest,
        "turnovers" => Leader::Lowest,
        _ => {
            return outcomes
                .text(key)
                .map(|text| Resolution::Answer(text.to_string()))
                .unwrap_or(Resolution::Unresolved)
        }
    };

    outcomes
        .sides(key)
        .map(|sides| side_leader(sides, leader))
        .unwrap_or(Resolution::Unresolved)
}

fn side_leader(sides: Vec<(&str, Option<f64>)>, leader: Leader) -> Resolution {
    if sides.len() < 2 {
        return Resolution::Unresolved;
    }

    let mut scored = Vec::with_capacity(sides.len());
    for (side, value) in sides {
        let Some(value) = value else {
            return Resolution::Unresolved;
        };
        scored.push((side, value));
    }

    scored.sort_by(|a, b| match leader {
        Leader::Highest => b.1.total_cmp(&a.1),
        Leader::Lowest => a.1.total_cmp(&b.1),
    });

    if scored[0].1 == scored[1].1 {
        Resolution::Tie
    } else {
        Resolution::Answer(scored[0].0.to_string())
    }
}

fn spread(outcomes: &OutcomeSnapshot, sides: &[SpreadSide; 2]) -> Resolution {
    let Some(finals) = outcomes.sides(FINAL_KEY) else {
        return Resolution::Unresolved;
    };
    let final_for = |team: &str| {
        finals
            .iter()
            .find(|(side, _)| same_name(side, team))
            .and_then(|(_, score)| *score)
    };

    let [first, second] = sides;
    let (Some(first_score), Some(second_score)) =
        (final_for(first.team.as_str()), final_for(second.team.as_str()))
    else {
        return Resolution::Unresolved;
    };

    let first_adjusted = first_score + first.spread;
    let second_adjusted = second_score + second.spread;

    match first_adjusted.partial_cmp(&second_adjusted) {
        Some(Ordering::Greater) => Resolution::Answer(first.team.clone()),
        Some(Ordering::Less) => Resolution::Answer(second.team.clone()),
        Some(Ordering::Equal) => Resolution::Push,
        None => Resolution::Unresolved,
    }
}

/// Touchdown scorers: the flat list when recorded, otherwise the union of per-side lists.
fn scorers(outcomes: &OutcomeSnapshot) -> Option<Vec<String>> {
    if let Some(names) = outcomes.names(ALL_SCORERS_KEY) {
        return Some(names.into_iter().map(str::to_string).collect());
    }

    let by_side = outcomes.get(SCORERS_BY_SIDE_KEY)?.as_object()?;
    Some(
        by_side
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn allowed_names<'a>(source: &'a EligibilitySource, eligibility: &'a Eligibility) -> Vec<&'a str> {
    let names = match source {
        EligibilitySource::Inline(names) => Some(names.as_slice()),
        EligibilitySource::ListKey(key) => eligibility.list(key),
    };
    names
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .collect()
}

/// First-scorer style fields may be a bare name or an object carrying `player`.
fn player_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(name) => Some(name.as_str()),
        Value::Object(fields) => fields.get(PLAYER_FIELD).and_then(Value::as_str),
        _ => None,
    }
}
