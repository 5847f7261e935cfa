use std::path::PathBuf;

use clap::Args;
use tabled::{Table, Tabled};
use tracing::info;

use kibitz_analysis::{format_eval, parse_movetext, records_from_san, GameAnalyzer};
use kibitz_core::{ClassifiedMove, Color, GameReport, GameResult};
use kibitz_stockfish::StockfishEvaluator;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Movetext such as "1. e4 e5 2. Nf3 Nc6"
    #[arg(short, long, conflicts_with = "file")]
    pub moves: Option<String>,

    /// File holding the game's movetext
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[arg(short, long, default_value = "white")]
    pub color: Color,

    #[arg(short, long, default_value = "draw")]
    pub result: GameResult,

    #[arg(short, long)]
    pub depth: Option<u8>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct MoveRow {
    #[tabled(rename = "#")]
    number: u32,
    #[tabled(rename = "Move")]
    san: String,
    #[tabled(rename = "Class")]
    classification: String,
    #[tabled(rename = "Eval")]
    eval: String,
    #[tabled(rename = "Best")]
    best: String,
    #[tabled(rename = "Comment")]
    explanation: String,
}

impl From<&ClassifiedMove> for MoveRow {
    fn from(mv: &ClassifiedMove) -> Self {
        Self {
            number: mv.record.move_number,
            san: format!("{}{}", mv.record.san, mv.classification.symbol()),
            classification: if mv.evaluated {
                mv.classification.to_string()
            } else {
                format!("{} (unverified)", mv.classification)
            },
            eval: mv.eval_after.map(format_eval).unwrap_or_else(|| "-".to_string()),
            best: mv.best_move.clone().unwrap_or_else(|| "-".to_string()),
            explanation: mv.explanation.clone(),
        }
    }
}

pub async fn execute(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let movetext = match (&args.moves, &args.file) {
        (Some(moves), _) => moves.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => anyhow::bail!("pass the game with --moves or --file"),
    };
    let records = records_from_san(&parse_movetext(&movetext))?;

    let mut analyzer_config = config.analyzer_config();
    if let Some(depth) = args.depth {
        analyzer_config = analyzer_config.with_depth(depth);
    }

    let evaluator = StockfishEvaluator::spawn(config.evaluator_config()).await;
    let analyzer = GameAnalyzer::new(evaluator).with_config(analyzer_config);

    let cancel = analyzer.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling analysis");
            cancel.cancel();
        }
    });

    info!(plies = records.len(), color = %args.color, "analyzing game");
    let report = analyzer.analyze(&records, args.color, args.result).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &GameReport) {
    let rows: Vec<MoveRow> = report.moves.iter().map(MoveRow::from).collect();
    println!("{}", Table::new(rows));
    println!();

    let s = &report.summary;
    println!("Player: {}  Result: {}", report.player, report.result);
    println!("Performance rating: {}", s.performance_rating);
    println!(
        "brilliant {}  great {}  best {}  excellent {}  good {}",
        s.brilliant, s.great, s.best, s.excellent, s.good
    );
    println!(
        "inaccuracy {}  mistake {}  blunder {}  miss {}",
        s.inaccuracy, s.mistake, s.blunder, s.miss
    );
    if s.unevaluated > 0 {
        println!("{} of {} moves could not be evaluated", s.unevaluated, s.total);
    }

    if !report.critical_moments.is_empty() {
        println!();
        println!("Critical moments:");
        for moment in &report.critical_moments {
            println!(
                "  {}. {} {:?}: {} -> {}",
                moment.move_number,
                moment.san,
                moment.kind,
                format_eval(moment.eval_before),
                format_eval(moment.eval_after)
            );
        }
    }
}
