use std::fs;
use std::path::{Path, PathBuf};

use prop_pool::contest::{
    ContestBundle, ContestLoadError, PickStatus, ScoringConfig, ScoringEngine,
    TiebreakDistance,
};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/super-bowl-lx")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("prop-pool-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir created");
    dir
}

#[test]
fn loads_every_document_from_fixture() {
    let bundle = ContestBundle::from_dir(fixture_dir()).expect("fixture loads");

    assert_eq!(bundle.schema.game_id.0, "super-bowl-lx");
    assert_eq!(bundle.schema.props.len(), 12);
    assert_eq!(bundle.submissions.len(), 4);
    assert!(bundle.outcomes.is_some());
    assert!(bundle
        .eligibility
        .allows("running_backs", "kenneth walker iii"));
}

#[test]
fn fixture_leaderboard_matches_hand_scored_totals() {
    let bundle = ContestBundle::from_dir(fixture_dir()).expect("fixture loads");
    let board = bundle.leaderboard(&ScoringEngine::default());

    let rows: Vec<(usize, &str, f64)> = board
        .entries
        .iter()
        .map(|entry| (entry.rank, entry.player_name.as_str(), entry.total))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, "Avery", 27.0),
            (2, "Blake", 15.0),
            (2, "Dana", 15.0),
            (4, "Casey", 14.0),
        ]
    );
    assert_eq!(board.entries[1].tiebreak, TiebreakDistance::Known(6.0));
    assert_eq!(board.entries[2].tiebreak, TiebreakDistance::Known(6.0));
}

#[test]
fn fixture_breakdown_records_each_status() {
    let bundle = ContestBundle::from_dir(fixture_dir()).expect("fixture loads");
    let cards = bundle.score_all(&ScoringEngine::new(
        ScoringConfig::default().with_teams("Patriots", "Seahawks"),
    ));

    let casey = cards
        .iter()
        .find(|card| card.player_name == "Casey")
        .expect("casey scored");
    assert_eq!(casey.entry("missed_xp").expect("entry").points, -3.0);
    assert_eq!(casey.entry("rb_td").expect("entry").status, PickStatus::Loss);
    assert_eq!(casey.entry("safety").expect("entry").status, PickStatus::Neutral);
    assert_eq!(
        casey.entry("first_td").expect("entry").correct_answer.as_deref(),
        Some("Kenneth Walker III")
    );
    assert_eq!(casey.tiebreak, TiebreakDistance::Known(10.0));
}

#[test]
fn csv_export_lists_every_player() {
    let bundle = ContestBundle::from_dir(fixture_dir()).expect("fixture loads");
    let mut buffer = Vec::new();
    bundle
        .leaderboard(&ScoringEngine::default())
        .write_csv(&mut buffer)
        .expect("csv export");

    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "rank,player,total,tiebreak");
    assert_eq!(lines[1], "1,Avery,27,4");
    assert_eq!(lines.len(), 5);
}

#[test]
fn missing_results_leave_everything_pending() {
    let dir = scratch_dir("no-results");
    fs::copy(fixture_dir().join("props.json"), dir.join("props.json")).expect("copy props");
    fs::copy(
        fixture_dir().join("submissions.json"),
        dir.join("submissions.json"),
    )
    .expect("copy submissions");

    let bundle = ContestBundle::from_dir(&dir).expect("partial contest loads");
    assert!(bundle.outcomes.is_none());

    let cards = bundle.score_all(&ScoringEngine::default());
    assert!(cards.iter().all(|card| card.total == 0.0));
    assert!(cards
        .iter()
        .flat_map(|card| card.breakdown.iter())
        .all(|entry| matches!(entry.status, PickStatus::Pending | PickStatus::Neutral)));
    assert!(cards
        .iter()
        .all(|card| card.tiebreak == TiebreakDistance::Unknown));

    let casey = cards
        .iter()
        .find(|card| card.player_name == "Casey")
        .expect("casey scored");
    assert_eq!(
        casey.entry("missed_xp").expect("entry").status,
        PickStatus::Pending
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_prop_sheet_is_an_io_error() {
    let dir = scratch_dir("empty");

    match ContestBundle::from_dir(&dir) {
        Err(ContestLoadError::Io { path, .. }) => assert!(path.ends_with("props.json")),
        other => panic!("expected io error, got {other:?}"),
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_json_names_the_file() {
    let dir = scratch_dir("bad-json");
    fs::copy(fixture_dir().join("props.json"), dir.join("props.json")).expect("copy props");
    fs::write(dir.join("results.json"), "{ \"final\": ").expect("write results");

    match ContestBundle::from_dir(&dir) {
        Err(error @ ContestLoadError::Json { .. }) => {
            assert!(error.to_string().contains("results.json"));
        }
        other => panic!("expected json error, got {other:?}"),
    }

    let _ = fs::remove_dir_all(&dir);
}
