use super::{Color, MoveRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Brilliant,
    Great,
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
    Miss,
}

impl Classification {
    pub const ALL: [Classification; 9] = [
        Classification::Brilliant,
        Classification::Great,
        Classification::Best,
        Classification::Excellent,
        Classification::Good,
        Classification::Inaccuracy,
        Classification::Mistake,
        Classification::Blunder,
        Classification::Miss,
    ];

    /// Position on the ordinal quality scale, higher is better. `Best` and
    /// `Excellent` share a rank; `Miss` is an overlay and has none.
    pub fn rank(self) -> Option<u8> {
        match self {
            Classification::Brilliant => Some(7),
            Classification::Great => Some(6),
            Classification::Best | Classification::Excellent => Some(5),
            Classification::Good => Some(4),
            Classification::Inaccuracy => Some(3),
            Classification::Mistake => Some(2),
            Classification::Blunder => Some(1),
            Classification::Miss => None,
        }
    }

    /// Contribution of one move of this tier to the performance score.
    pub fn weight(self) -> i32 {
        match self {
            Classification::Brilliant => 10,
            Classification::Great => 7,
            Classification::Best => 5,
            Classification::Excellent => 4,
            Classification::Good => 3,
            Classification::Inaccuracy => 1,
            Classification::Mistake => -2,
            Classification::Blunder => -5,
            Classification::Miss => -3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Classification::Brilliant => "!!",
            Classification::Great => "!",
            Classification::Best | Classification::Excellent | Classification::Good => "",
            Classification::Inaccuracy => "?!",
            Classification::Mistake => "?",
            Classification::Blunder => "??",
            Classification::Miss => "?",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Brilliant => "brilliant",
            Classification::Great => "great",
            Classification::Best => "best",
            Classification::Excellent => "excellent",
            Classification::Good => "good",
            Classification::Inaccuracy => "inaccuracy",
            Classification::Mistake => "mistake",
            Classification::Blunder => "blunder",
            Classification::Miss => "miss",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl FromStr for GameResult {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win" | "w" => Ok(GameResult::Win),
            "loss" | "l" => Ok(GameResult::Loss),
            "draw" | "d" => Ok(GameResult::Draw),
            other => Err(format!("unknown result '{}'", other)),
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Win => write!(f, "win"),
            GameResult::Loss => write!(f, "loss"),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedMove {
    #[serde(rename = "move")]
    pub record: MoveRecord,
    pub classification: Classification,
    pub explanation: String,
    /// White-relative score before the move, if the engine produced one.
    pub eval_before: Option<i32>,
    /// White-relative score after the move, if the engine produced one.
    pub eval_after: Option<i32>,
    pub best_move: Option<String>,
    /// False when the classification is the fallback for a missing evaluation.
    pub evaluated: bool,
}

impl ClassifiedMove {
    /// Change in the mover's standing caused by the move, in centipawns.
    pub fn swing(&self) -> Option<i32> {
        let sign = self.record.color.sign();
        match (self.eval_before, self.eval_after) {
            (Some(before), Some(after)) => Some((after - before) * sign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub brilliant: u32,
    pub great: u32,
    pub best: u32,
    pub excellent: u32,
    pub good: u32,
    pub inaccuracy: u32,
    pub mistake: u32,
    pub blunder: u32,
    pub miss: u32,
    pub unevaluated: u32,
    pub total: u32,
    pub performance_rating: u32,
}

impl AnalysisSummary {
    pub fn count(&self, classification: Classification) -> u32 {
        match classification {
            Classification::Brilliant => self.brilliant,
            Classification::Great => self.great,
            Classification::Best => self.best,
            Classification::Excellent => self.excellent,
            Classification::Good => self.good,
            Classification::Inaccuracy => self.inaccuracy,
            Classification::Mistake => self.mistake,
            Classification::Blunder => self.blunder,
            Classification::Miss => self.miss,
        }
    }

    pub fn record(&mut self, classification: Classification) {
        let slot = match classification {
            Classification::Brilliant => &mut self.brilliant,
            Classification::Great => &mut self.great,
            Classification::Best => &mut self.best,
            Classification::Excellent => &mut self.excellent,
            Classification::Good => &mut self.good,
            Classification::Inaccuracy => &mut self.inaccuracy,
            Classification::Mistake => &mut self.mistake,
            Classification::Blunder => &mut self.blunder,
            Classification::Miss => &mut self.miss,
        };
        *slot += 1;
        self.total += 1;
    }

    /// Sum of tier weights over every counted move.
    pub fn weighted_score(&self) -> i64 {
        Classification::ALL
            .iter()
            .map(|c| i64::from(c.weight()) * i64::from(self.count(*c)))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CriticalKind {
    Blunder,
    Miss,
    TurningPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CriticalMoment {
    pub move_number: u32,
    pub san: String,
    pub eval_before: i32,
    pub eval_after: i32,
    pub swing: i32,
    pub kind: CriticalKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub id: Uuid,
    pub player: Color,
    pub result: GameResult,
    pub moves: Vec<ClassifiedMove>,
    pub summary: AnalysisSummary,
    pub critical_moments: Vec<CriticalMoment>,
    pub analyzed_at: DateTime<Utc>,
}
