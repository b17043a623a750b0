use crate::demo::{run_candidates, run_score, CandidatesArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contractor_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contractor Match",
    about = "Score home-improvement contractors against homeowner priorities",
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
    /// Print the pre-ranking candidate set without calling the oracle
    Candidates(CandidatesArgs),
    /// Run the full pipeline, including the oracle re-ranking
    Score(ScoreArgs),
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
        Command::Candidates(args) => run_candidates(args),
        Command::Score(args) => run_score(args).await,
    }
}
