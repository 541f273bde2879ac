use crate::contest::domain::{PickStatus, PushRule};
use crate::contest::normalizer::{list_contains, normalize_name, same_name};
use crate::contest::proposition::{PropKind, Proposition, YesOnlyStakes};
use crate::contest::resolver::{Resolution, OVER_ANSWER, TIE_ANSWER, UNDER_ANSWER};

use super::config::MissingListPolicy;

const AFFIRMATIVE: &str = "yes";

/// Points and status for one pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RuleOutcome {
    pub points: f64,
    pub status: PickStatus,
}

impl RuleOutcome {
    const PENDING: Self = Self {
        points: 0.0,
        status: PickStatus::Pending,
    };

    fn win(points: f64) -> Self {
        Self {
            points,
            status: PickStatus::Win,
        }
    }

    fn loss() -> Self {
        Self::lost(0.0)
    }

    fn lost(points: f64) -> Self {
        Self {
            points,
            status: PickStatus::Loss,
        }
    }

    fn push(points: f64) -> Self {
        Self {
            points,
            status: PickStatus::Push,
        }
    }

    fn neutral(points: f64) -> Self {
        Self {
            points,
            status: PickStatus::Neutral,
        }
    }

    fn decided(hit: bool, points: f64) -> Self {
        if hit {
            Self::win(points)
        } else {
            Self::loss()
        }
    }
}

pub(crate) fn score_pick(
    prop: &Proposition,
    pick: Option<&str>,
    resolution: &Resolution,
    push_rule: PushRule,
    missing_lists: MissingListPolicy,
) -> RuleOutcome {
    let Some(pick) = pick else {
        return RuleOutcome::PENDING;
    };

    match (&prop.kind, resolution) {
        (PropKind::OverUnder { points, .. }, Resolution::Push)
        | (PropKind::SpreadPick { points, .. }, Resolution::Push) => {
            RuleOutcome::push(push_rule.award(*points))
        }
        (PropKind::OverUnder { points, .. }, Resolution::Answer(answer)) => {
            RuleOutcome::decided(over_under_side(pick) == Some(answer.as_str()), *points)
        }
        (
            PropKind::TeamPick {
                options,
                points,
                allow_tie,
            },
            resolution @ (Resolution::Tie | Resolution::Answer(_)),
        ) => {
            if !offered(options, *allow_tie, pick) {
                return RuleOutcome::loss();
            }
            match resolution {
                Resolution::Tie if !allow_tie => RuleOutcome::push(0.0),
                Resolution::Tie => RuleOutcome::decided(same_name(pick, TIE_ANSWER), *points),
                Resolution::Answer(answer) => {
                    RuleOutcome::decided(same_name(pick, answer), *points)
                }
                _ => RuleOutcome::PENDING,
            }
        }
        (PropKind::SpreadPick { points, .. }, Resolution::Answer(answer))
        | (PropKind::PlayerEquals { points }, Resolution::Answer(answer))
        | (PropKind::TextEquals { points }, Resolution::Answer(answer))
        | (PropKind::Direct { points, .. }, Resolution::Answer(answer)) => {
            RuleOutcome::decided(same_name(pick, answer), *points)
        }
        (PropKind::AnytimeScorer { points }, Resolution::AnyOf(scorers))
        | (PropKind::RestrictedAnytimeScorer { points, .. }, Resolution::AnyOf(scorers)) => {
            RuleOutcome::decided(list_contains(scorers.iter().map(String::as_str), pick), *points)
        }
        (PropKind::YesOnlyBoolean { stakes }, resolution) => yes_only_flag(pick, stakes, resolution),
        (PropKind::YesOnlyPlayerFromList { stakes, none_label }, resolution) => {
            if same_name(pick, none_label) {
                return RuleOutcome::neutral(stakes.declined);
            }
            match resolution {
                Resolution::AnyOf(names) => {
                    yes_payout(list_contains(names.iter().map(String::as_str), pick), stakes)
                }
                _ => match missing_lists {
                    MissingListPolicy::Miss => yes_payout(false, stakes),
                    MissingListPolicy::Pending => RuleOutcome::PENDING,
                },
            }
        }
        _ => RuleOutcome::PENDING,
    }
}

/// A team pick must name one of the listed options; `TIE` counts only when ties are allowed.
/// An empty option list accepts any pick.
fn offered(options: &[String], allow_tie: bool, pick: &str) -> bool {
    options.is_empty()
        || list_contains(options.iter().map(String::as_str), pick)
        || (allow_tie && same_name(pick, TIE_ANSWER))
}

fn yes_only_flag(pick: &str, stakes: &YesOnlyStakes, resolution: &Resolution) -> RuleOutcome {
    if normalize_name(pick) != AFFIRMATIVE {
        return RuleOutcome::neutral(stakes.declined);
    }

    match resolution {
        Resolution::Flag(occurred) => yes_payout(*occurred, stakes),
        _ => RuleOutcome::PENDING,
    }
}

fn yes_payout(hit: bool, stakes: &YesOnlyStakes) -> RuleOutcome {
    if hit {
        RuleOutcome::win(stakes.correct_yes)
    } else {
        RuleOutcome::lost(stakes.incorrect_yes)
    }
}

/// Accepts the short form used on pick sheets (`O` / `U`) as well as the full word.
fn over_under_side(pick: &str) -> Option<&'static str> {
    match normalize_name(pick).as_str() {
        "o" | "over" => Some(OVER_ANSWER),
        "u" | "under" => Some(UNDER_ANSWER),
        _ => None,
    }
}
