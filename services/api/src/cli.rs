use crate::demo::{run_demo, run_leaderboard, run_score, DemoArgs, LeaderboardArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use prop_pool::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "prop-pool-api",
    about = "Score prop-bet pools and serve standings over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print ranked standings for a contest directory
    Leaderboard(LeaderboardArgs),
    /// Print one player's per-question breakdown
    Score(ScoreArgs),
    /// Score the bundled sample contest end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leaderboard(args) => run_leaderboard(args),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
