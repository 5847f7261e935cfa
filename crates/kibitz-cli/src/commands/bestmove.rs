use clap::Args;

use kibitz_core::ChessPosition;
use kibitz_stockfish::{BotPlayer, EngineStrength};

use crate::config::Config;

#[derive(Debug, Args)]
pub struct BestMoveArgs {
    #[arg(short, long)]
    pub fen: String,

    #[arg(short, long, default_value_t = 1500)]
    pub elo: u32,
}

pub async fn execute(args: BestMoveArgs, config: &Config) -> anyhow::Result<()> {
    if !ChessPosition::new(&args.fen).validate() {
        anyhow::bail!("invalid FEN: {}", args.fen);
    }
    let strength = EngineStrength::for_elo(args.elo);
    let bot = BotPlayer::spawn(config.evaluator_config()).await;

    let mv = bot.best_move(&args.fen, args.elo).await;
    bot.dispose().await;

    match mv {
        Some(mv) => println!(
            "{} (skill {}, depth {})",
            mv.to_uci(),
            strength.skill_level,
            strength.depth
        ),
        None => println!("No move available"),
    }
    Ok(())
}
