use clap::Args;

use kibitz_analysis::format_eval;
use kibitz_core::{ChessPosition, PositionEvaluator};
use kibitz_stockfish::StockfishEvaluator;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct EvalArgs {
    #[arg(short, long)]
    pub fen: String,

    #[arg(short, long)]
    pub depth: Option<u8>,
}

pub async fn execute(args: EvalArgs, config: &Config) -> anyhow::Result<()> {
    if !ChessPosition::new(&args.fen).validate() {
        anyhow::bail!("invalid FEN: {}", args.fen);
    }
    let depth = args.depth.unwrap_or(config.engine.depth);
    let evaluator = StockfishEvaluator::spawn(config.evaluator_config()).await;

    let evaluation = evaluator.evaluate(&args.fen, depth).await;
    evaluator.dispose().await;

    match evaluation {
        Some(eval) => {
            println!("Score: {} ({} cp, White's view)", format_eval(eval.score), eval.score);
            if !eval.best_move.is_empty() {
                println!("Best move: {}", eval.best_move);
            }
            println!("Depth: {}", eval.depth);
        }
        None => println!("No evaluation available"),
    }
    Ok(())
}
