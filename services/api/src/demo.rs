use crate::infra::{load_contest, InMemoryContestRepository, ScoringOverrides};
use clap::Args;
use prop_pool::config::AppConfig;
use prop_pool::contest::loader::{
    eligibility_from_reader, outcomes_from_reader, schema_from_reader, submissions_from_reader,
};
use prop_pool::contest::{
    normalize_name, ContestBundle, ContestService, ContestServiceError, ContestSettings,
    LeaderboardEntry, ScoreCard, ScoringConfig, ScoringEngine,
};
use prop_pool::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_PROPS: &str =
    include_str!("../../../crates/prop-pool/fixtures/super-bowl-lx/props.json");
const SAMPLE_RESULTS: &str =
    include_str!("../../../crates/prop-pool/fixtures/super-bowl-lx/results.json");
const SAMPLE_ELIGIBILITY: &str =
    include_str!("../../../crates/prop-pool/fixtures/super-bowl-lx/eligibility.json");
const SAMPLE_SUBMISSIONS: &str =
    include_str!("../../../crates/prop-pool/fixtures/super-bowl-lx/submissions.json");

#[derive(Args, Debug)]
pub(crate) struct LeaderboardArgs {
    /// Directory holding props.json and optional results, eligibility and submissions files
    #[arg(long)]
    pub(crate) contest_dir: PathBuf,
    /// Emit rank,player,total,tiebreak rows instead of a table
    #[arg(long)]
    pub(crate) csv: bool,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Directory holding props.json and optional results, eligibility and submissions files
    #[arg(long)]
    pub(crate) contest_dir: PathBuf,
    /// Player whose breakdown should be printed
    #[arg(long)]
    pub(crate) player: String,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the per-question breakdown for this player (defaults to the leader)
    #[arg(long)]
    pub(crate) player: Option<String>,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
}

pub(crate) fn run_leaderboard(args: LeaderboardArgs) -> Result<(), AppError> {
    let engine = ScoringEngine::new(args.scoring.apply(environment_scoring()?));
    let bundle = ContestBundle::from_dir(&args.contest_dir)?;
    let board = bundle.leaderboard(&engine);

    if args.csv {
        board.write_csv(std::io::stdout().lock())?;
        return Ok(());
    }

    println!("Standings for {}", bundle.schema.game_id);
    if bundle.outcomes.is_none() {
        println!("  No results recorded yet; every pick is pending.");
    }
    render_leaderboard(&board.entries);
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = ScoringEngine::new(args.scoring.apply(environment_scoring()?));
    let bundle = ContestBundle::from_dir(&args.contest_dir)?;

    let wanted = normalize_name(&args.player);
    let card = bundle
        .score_all(&engine)
        .into_iter()
        .find(|card| normalize_name(&card.player_name) == wanted)
        .ok_or_else(|| ContestServiceError::PlayerNotFound(args.player.trim().to_string()))?;

    render_score_card(&card);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let bundle = sample_bundle()?;
    let config = args.scoring.apply(ScoringConfig::default());
    let service = Arc::new(ContestService::new(
        Arc::new(InMemoryContestRepository::default()),
        config,
    ));

    println!("Prop pool demo: {}", bundle.schema.game_id);
    println!(
        "- {} propositions | {} entries",
        bundle.schema.props.len(),
        bundle.submissions.len()
    );

    let mut pending = bundle.clone();
    pending.outcomes = None;
    let settings = ContestSettings {
        home_team: Some("Patriots".to_string()),
        away_team: Some("Seahawks".to_string()),
        lock: None,
    };
    let contest_id = load_contest(&service, pending, settings, "demo")?;

    let before = service.leaderboard(&contest_id)?;
    println!(
        "- Before kickoff the leaderboard is {}",
        if before.scored { "scored" } else { "unscored" }
    );

    if let Some(outcomes) = bundle.outcomes {
        service.record_outcomes(&contest_id, outcomes, "demo")?;
    }

    let after = service.leaderboard(&contest_id)?;
    println!("\nFinal standings");
    render_leaderboard(&after.entries);

    let player = match args.player {
        Some(player) => player,
        None => match after.entries.first() {
            Some(leader) => leader.player_name.clone(),
            None => return Ok(()),
        },
    };
    let card = service.score_player(&contest_id, &player)?;
    println!();
    render_score_card(&card);

    Ok(())
}

fn environment_scoring() -> Result<ScoringConfig, AppError> {
    Ok(AppConfig::load()?.contest.scoring())
}

fn sample_bundle() -> Result<ContestBundle, AppError> {
    let parse_error = |err: serde_json::Error| {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    };

    Ok(ContestBundle {
        schema: schema_from_reader(SAMPLE_PROPS.as_bytes()).map_err(parse_error)?,
        outcomes: Some(outcomes_from_reader(SAMPLE_RESULTS.as_bytes()).map_err(parse_error)?),
        eligibility: eligibility_from_reader(SAMPLE_ELIGIBILITY.as_bytes())
            .map_err(parse_error)?,
        submissions: submissions_from_reader(SAMPLE_SUBMISSIONS.as_bytes())
            .map_err(parse_error)?,
    })
}

pub(crate) fn render_leaderboard(entries: &[LeaderboardEntry]) {
    if entries.is_empty() {
        println!("  (no entries)");
        return;
    }

    println!("  {:>4}  {:<24} {:>7} {:>9}", "rank", "player", "total", "tiebreak");
    for entry in entries {
        println!(
            "  {:>4}  {:<24} {:>7} {:>9}",
            entry.rank,
            entry.player_name,
            entry.total,
            entry.tiebreak.to_string()
        );
    }
}

pub(crate) fn render_score_card(card: &ScoreCard) {
    println!(
        "{}: {} points (tiebreak {})",
        card.player_name, card.total, card.tiebreak
    );
    for entry in &card.breakdown {
        println!(
            "  - {:<30} pick {:<22} answer {:<22} {:>5} {}",
            entry.label,
            entry.pick.as_deref().unwrap_or("-"),
            entry.correct_answer.as_deref().unwrap_or("pending"),
            entry.points,
            entry.status.label()
        );
    }
}
