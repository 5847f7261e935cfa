mod analysis;
mod chess;
mod evaluation;

pub use analysis::*;
pub use chess::*;
pub use evaluation::*;
