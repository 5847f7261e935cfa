pub mod analyze;
pub mod bestmove;
pub mod eval;
