use super::{Color, Move};
use serde::{Deserialize, Serialize};

/// Centipawn value standing in for a forced mate.
pub const MATE_SCORE: i32 = 10_000;

/// Centipawns shaved off [`MATE_SCORE`] per move of mate distance.
pub const MATE_STEP: i32 = 10;

/// Scores beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = 9_000;

/// Raw score as reported by a UCI engine, relative to the side to move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EngineScore {
    Centipawns(i32),
    Mate(i32),
}

impl EngineScore {
    /// Collapses the score onto the centipawn scale.
    ///
    /// `Mate(n)` with `n > 0` becomes `MATE_SCORE - MATE_STEP * n`; `n <= 0`
    /// (the side to move is getting mated, or already is) mirrors it below zero.
    pub fn to_centipawns(self) -> i32 {
        match self {
            EngineScore::Centipawns(cp) => cp.clamp(-MATE_THRESHOLD, MATE_THRESHOLD),
            EngineScore::Mate(n) => {
                let max_distance = ((MATE_SCORE - MATE_THRESHOLD) / MATE_STEP - 1) as u32;
                let distance = n.unsigned_abs().min(max_distance) as i32;
                let magnitude = MATE_SCORE - MATE_STEP * distance;
                if n > 0 {
                    magnitude
                } else {
                    -magnitude
                }
            }
        }
    }
}

/// Mate distance encoded in a centipawn score, signed like the score.
pub fn mate_in(score: i32) -> Option<i32> {
    if score.abs() <= MATE_THRESHOLD {
        return None;
    }
    let distance = (MATE_SCORE - score.abs()) / MATE_STEP;
    Some(if score > 0 { distance } else { -distance })
}

/// Result of searching one position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    /// Centipawns from White's point of view.
    pub score: i32,
    /// Engine's preferred move in coordinate notation, empty in terminal positions.
    pub best_move: String,
    pub depth: u8,
}

impl Evaluation {
    pub fn new(score: i32, best_move: impl Into<String>) -> Self {
        Self {
            score,
            best_move: best_move.into(),
            depth: 0,
        }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Builds a White-relative evaluation from an engine score reported for
    /// `side_to_move`.
    pub fn from_engine(
        score: EngineScore,
        side_to_move: Color,
        best_move: impl Into<String>,
        depth: u8,
    ) -> Self {
        Self {
            score: score.to_centipawns() * side_to_move.sign(),
            best_move: best_move.into(),
            depth,
        }
    }

    /// Score from `side`'s point of view.
    pub fn relative_to(&self, side: Color) -> i32 {
        self.score * side.sign()
    }

    pub fn best_move(&self) -> Option<Move> {
        Move::from_uci(&self.best_move)
    }
}
