//! Move-quality review of finished games: replay, classification,
//! explanations, performance rating and critical moments.

mod analyzer;
pub mod classifier;
pub mod critical;
pub mod explain;
pub mod format;
pub mod rating;
pub mod replay;

pub use analyzer::{AnalyzerConfig, GameAnalyzer, FALLBACK_CLASSIFICATION};
pub use classifier::{classify, Perspective};
pub use explain::{ExplanationProvider, FirstSelector, RandomSelector, Selector};
pub use format::format_eval;
pub use replay::{parse_movetext, records_from_san, replay};
