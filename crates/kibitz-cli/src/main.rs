use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kibitz_cli::commands::{analyze, bestmove, eval};
use kibitz_cli::config::Config;

#[derive(Parser)]
#[command(name = "kibitz")]
#[command(author, version, about = "Engine-backed chess game review", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every move one side made in a finished game
    Analyze(analyze::AnalyzeArgs),
    /// Evaluate a single position
    Eval(eval::EvalArgs),
    /// Pick a move at a given playing strength
    Bestmove(bestmove::BestMoveArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::load()?;
    debug!(engine = %config.engine.binary_path, "loaded configuration");

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config).await?,
        Commands::Eval(args) => eval::execute(args, &config).await?,
        Commands::Bestmove(args) => bestmove::execute(args, &config).await?,
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
