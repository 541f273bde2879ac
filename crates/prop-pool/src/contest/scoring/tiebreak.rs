use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::contest::domain::{OutcomeSnapshot, TiebreakPrediction};
use crate::contest::normalizer::same_name;

use super::config::ScoringConfig;

const FINAL_KEY: &str = "final";

/// Distance between a predicted and actual final score; `Unknown` sorts after every known value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiebreakDistance {
    Known(f64),
    Unknown,
}

impl TiebreakDistance {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Known(distance) => Some(distance),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Ascending ranking order: closer predictions first, unknown last.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a.total_cmp(b),
            (Self::Known(_), Self::Unknown) => Ordering::Less,
            (Self::Unknown, Self::Known(_)) => Ordering::Greater,
            (Self::Unknown, Self::Unknown) => Ordering::Equal,
        }
    }
}

impl fmt::Display for TiebreakDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(distance) => write!(f, "{distance}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for TiebreakDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(distance) => serializer.serialize_f64(*distance),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

pub(crate) fn tiebreak_distance(
    prediction: Option<&TiebreakPrediction>,
    outcomes: &OutcomeSnapshot,
    config: &ScoringConfig,
) -> TiebreakDistance {
    let (Some(home), Some(away)) = actual_final(outcomes, config) else {
        return TiebreakDistance::Unknown;
    };
    let Some(TiebreakPrediction {
        home: Some(predicted_home),
        away: Some(predicted_away),
    }) = prediction.copied()
    else {
        return TiebreakDistance::Unknown;
    };

    TiebreakDistance::Known((predicted_home - home).abs() + (predicted_away - away).abs())
}

/// Home and away final scores: configured team names when both are set, otherwise the first two
/// sides of the `final` map in document order.
fn actual_final(outcomes: &OutcomeSnapshot, config: &ScoringConfig) -> (Option<f64>, Option<f64>) {
    let Some(sides) = outcomes.sides(FINAL_KEY) else {
        return (None, None);
    };

    match (&config.home_team, &config.away_team) {
        (Some(home_team), Some(away_team)) => {
            let score_for = |team: &str| {
                sides
                    .iter()
                    .find(|(side, _)| same_name(side, team))
                    .and_then(|(_, score)| *score)
            };
            (score_for(home_team.as_str()), score_for(away_team.as_str()))
        }
        _ if sides.len() >= 2 => (sides[0].1, sides[1].1),
        _ => (None, None),
    }
}
