mod bot;
mod engine;
mod evaluator;

pub use bot::{BotPlayer, EngineStrength};
pub use engine::{BestMove, StockfishEngine, UciInfo};
pub use evaluator::{EvaluatorConfig, StockfishEvaluator};
