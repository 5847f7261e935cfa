use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChessPosition {
    pub fen: String,
}

impl ChessPosition {
    pub fn new(fen: impl Into<String>) -> Self {
        Self { fen: fen.into() }
    }

    pub fn starting() -> Self {
        Self::new(STARTING_FEN)
    }

    pub fn validate(&self) -> bool {
        let parts: Vec<&str> = self.fen.split_whitespace().collect();
        if parts.len() < 4 {
            return false;
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return false;
        }

        for rank in ranks {
            let mut count = 0;
            for c in rank.chars() {
                if c.is_ascii_digit() {
                    count += c.to_digit(10).unwrap_or(0);
                } else if "pnbrqkPNBRQK".contains(c) {
                    count += 1;
                } else {
                    return false;
                }
            }
            if count != 8 {
                return false;
            }
        }

        matches!(parts[1], "w" | "b")
    }

    pub fn side_to_move(&self) -> Option<Color> {
        self.fen
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.chars().next())
            .and_then(Color::from_fen)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Move {
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
}

impl Move {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, piece: char) -> Self {
        self.promotion = Some(piece.to_ascii_lowercase());
        self
    }

    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, p),
            None => format!("{}{}", self.from, self.to),
        }
    }

    pub fn from_uci(uci: &str) -> Option<Self> {
        if uci.len() < 4 || !uci.is_ascii() {
            return None;
        }

        let from = uci[0..2].to_string();
        let to = uci[2..4].to_string();
        let promotion = uci.chars().nth(4).map(|c| c.to_ascii_lowercase());

        Some(Self {
            from,
            to,
            promotion,
        })
    }

    /// Whether the engine's suggested move is the one that was played.
    ///
    /// Squares must agree; when the suggestion names a promotion piece the
    /// played move must promote to the same piece.
    pub fn matches_suggestion(&self, suggestion: &Move) -> bool {
        if self.from != suggestion.from || self.to != suggestion.to {
            return false;
        }
        match suggestion.promotion {
            Some(p) => self.promotion == Some(p),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_fen(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black. Multiplying a White-relative score by this
    /// gives the score from this side's point of view, and vice versa.
    pub fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            other => Err(format!("unknown color '{}'", other)),
        }
    }
}

/// One ply of a finished game, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveRecord {
    pub move_number: u32,
    pub color: Color,
    pub san: String,
    pub from: String,
    pub to: String,
    pub captured: Option<char>,
    pub promotion: Option<char>,
}

impl MoveRecord {
    pub fn as_move(&self) -> Move {
        Move {
            from: self.from.clone(),
            to: self.to.clone(),
            promotion: self.promotion,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn gives_check(&self) -> bool {
        self.san.contains('+') || self.san.contains('#')
    }
}
