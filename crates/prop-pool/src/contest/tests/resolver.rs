use super::common::*;
use crate::contest::{resolve_outcome, Eligibility, Resolution};
use serde_json::json;

fn resolve(prop_json: serde_json::Value, outcome_json: serde_json::Value) -> Resolution {
    resolve_outcome(
        &prop(prop_json),
        &outcomes(outcome_json),
        &Eligibility::default(),
    )
}

#[test]
fn over_under_compares_against_line() {
    let ou = json!({ "id": "p1", "type": "over_under", "line": 45.5, "points": 2 });

    assert_eq!(
        resolve(ou.clone(), json!({ "p1": 50 })),
        Resolution::Answer("Over".to_string())
    );
    assert_eq!(
        resolve(ou.clone(), json!({ "p1": "41" })),
        Resolution::Answer("Under".to_string())
    );
    assert_eq!(resolve(ou.clone(), json!({ "p1": 45.5 })), Resolution::Push);
    assert_eq!(resolve(ou.clone(), json!({ "p1": "n/a" })), Resolution::Unresolved);
    assert_eq!(resolve(ou, json!({ "p1": null })), Resolution::Unresolved);
}

#[test]
fn total_points_falls_back_to_final_score() {
    let ou = json!({ "id": "total", "type": "over_under", "line": 44.5, "points": 2, "resultKey": "total_points" });

    let resolution = resolve(ou.clone(), json!({ "final": { "Patriots": 24, "Seahawks": 21 } }));
    assert_eq!(resolution, Resolution::Answer("Over".to_string()));

    let partial = resolve(ou, json!({ "final": { "Patriots": 24, "Seahawks": null } }));
    assert_eq!(partial, Resolution::Unresolved);
}

#[test]
fn team_pick_uses_stat_direction() {
    let winner = json!({ "id": "winner", "type": "team_pick", "points": 3, "resultKey": "final" });
    let giveaways = json!({ "id": "giveaways", "type": "team_pick", "points": 1, "resultKey": "turnovers" });

    assert_eq!(
        resolve(winner.clone(), json!({ "final": { "Patriots": 17, "Seahawks": 20 } })),
        Resolution::Answer("Seahawks".to_string())
    );
    assert_eq!(
        resolve(winner.clone(), json!({ "final": { "Patriots": 20, "Seahawks": 20 } })),
        Resolution::Tie
    );
    assert_eq!(
        resolve(winner, json!({ "final": { "Patriots": 20 } })),
        Resolution::Unresolved
    );
    assert_eq!(
        resolve(giveaways, json!({ "turnovers": { "Patriots": 1, "Seahawks": 3 } })),
        Resolution::Answer("Patriots".to_string())
    );
}

#[test]
fn team_pick_on_other_keys_reads_text() {
    let coin = json!({ "id": "coin_toss", "type": "team_pick", "points": 1 });
    assert_eq!(
        resolve(coin, json!({ "coin_toss": "Seahawks" })),
        Resolution::Answer("Seahawks".to_string())
    );
}

#[test]
fn spread_adjusts_final_scores() {
    let spread = json!({
        "id": "spread",
        "type": "spread_pick",
        "points": 3,
        "options": [
            { "team": "Patriots", "spread": -3 },
            { "team": "Seahawks", "spread": 3 }
        ]
    });

    assert_eq!(
        resolve(spread.clone(), json!({ "final": { "patriots": 28, "seahawks": 20 } })),
        Resolution::Answer("Patriots".to_string())
    );
    assert_eq!(
        resolve(spread.clone(), json!({ "final": { "Patriots": 26, "Seahawks": 20 } })),
        Resolution::Push
    );
    assert_eq!(
        resolve(spread, json!({ "final": { "Patriots": 23, "Rams": 20 } })),
        Resolution::Unresolved
    );
}

#[test]
fn anytime_scorers_union_per_side_lists() {
    let anytime = json!({ "id": "anytime", "type": "player_anytime_td", "points": 4 });
    let resolution = resolve(
        anytime,
        json!({ "td_scorers": { "Patriots": ["Hunter Henry"], "Seahawks": ["DK Metcalf"] } }),
    );

    match resolution {
        Resolution::AnyOf(names) => {
            assert!(names.contains(&"Hunter Henry".to_string()));
            assert!(names.contains(&"DK Metcalf".to_string()));
        }
        other => panic!("expected scorer list, got {other:?}"),
    }
}

#[test]
fn restricted_scorers_are_filtered_by_list() {
    let restricted = prop(json!({
        "id": "rb_td",
        "type": "restricted_anytime_td",
        "points": 5,
        "eligibleListKey": "running_backs"
    }));
    let mut eligibility = Eligibility::default();
    eligibility.insert("running_backs", vec!["Rhamondre Stevenson".to_string()]);

    let resolution = resolve_outcome(
        &restricted,
        &outcomes(json!({ "all_td_scorers": ["rhamondre stevenson", "Hunter Henry"] })),
        &eligibility,
    );

    assert_eq!(
        resolution,
        Resolution::AnyOf(vec!["rhamondre stevenson".to_string()])
    );
}

#[test]
fn player_equals_accepts_player_objects() {
    let first = json!({ "id": "first_td_scorer", "type": "player_equals", "points": 6 });
    assert_eq!(
        resolve(first, json!({ "first_td_scorer": { "player": "Hunter Henry", "team": "Patriots" } })),
        Resolution::Answer("Hunter Henry".to_string())
    );
}

#[test]
fn yes_only_kinds_resolve_flags_and_lists() {
    let safety = json!({ "id": "safety", "type": "yes_only_boolean", "pointsCorrectYes": 5, "pointsIncorrectYes": -3 });
    let ejected = json!({ "id": "ejected", "type": "yes_only_player_from_list", "pointsCorrectYes": 8, "pointsIncorrectYes": -2 });

    assert_eq!(resolve(safety.clone(), json!({ "safety": true })), Resolution::Flag(true));
    assert_eq!(resolve(safety, json!({ "safety": "yes" })), Resolution::Unresolved);
    assert_eq!(
        resolve(ejected, json!({ "ejected": [] })),
        Resolution::AnyOf(Vec::new())
    );
}

#[test]
fn malformed_props_never_resolve() {
    let broken = json!({ "id": "total", "type": "over_under", "points": 2 });
    assert_eq!(resolve(broken, json!({ "total": 48 })), Resolution::Unresolved);
}

#[test]
fn correct_answer_formats_each_resolution() {
    assert_eq!(Resolution::Flag(false).correct_answer().as_deref(), Some("NO"));
    assert_eq!(Resolution::Tie.correct_answer().as_deref(), Some("TIE"));
    assert_eq!(
        Resolution::AnyOf(vec!["A".to_string(), "B".to_string()])
            .correct_answer()
            .as_deref(),
        Some("A, B")
    );
    assert_eq!(Resolution::Push.correct_answer(), None);
    assert!(!Resolution::Unresolved.is_resolved());
}
