use tokio::sync::Mutex;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument, warn};

use kibitz_core::{ChessPosition, Move, Result};

use crate::engine::{BestMove, StockfishEngine};
use crate::evaluator::EvaluatorConfig;

/// Range of `UCI_Elo` values Stockfish accepts.
const UCI_ELO_MIN: u32 = 1320;
const UCI_ELO_MAX: u32 = 3190;

/// Engine settings approximating a human opponent of a given rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStrength {
    pub elo: u32,
    pub skill_level: u8,
    pub depth: u8,
}

impl EngineStrength {
    pub fn for_elo(elo: u32) -> Self {
        let (skill_level, depth) = match elo {
            0..=800 => (0, 1),
            801..=1200 => (3, 3),
            1201..=1600 => (7, 6),
            1601..=2000 => (12, 10),
            2001..=2400 => (17, 14),
            _ => (20, 18),
        };
        Self {
            elo,
            skill_level,
            depth,
        }
    }

    pub fn uci_elo(&self) -> u32 {
        self.elo.clamp(UCI_ELO_MIN, UCI_ELO_MAX)
    }
}

enum BotSearch {
    Done(Option<Move>),
    /// A late `bestmove` may still arrive; the engine must not be reused.
    Wedged,
}

/// Plays moves for a computer opponent at a chosen strength.
pub struct BotPlayer {
    engine: Mutex<Option<StockfishEngine>>,
    config: EvaluatorConfig,
}

impl BotPlayer {
    pub async fn spawn(config: EvaluatorConfig) -> Self {
        let engine = match StockfishEngine::spawn(&config.binary_path, config.handshake_timeout)
            .await
        {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!(binary = %config.binary_path, "bot engine unavailable: {}", e);
                None
            }
        };
        Self {
            engine: Mutex::new(engine),
            config,
        }
    }

    pub async fn is_available(&self) -> bool {
        self.engine.lock().await.is_some()
    }

    #[instrument(skip(self))]
    pub async fn best_move(&self, fen: &str, elo: u32) -> Option<Move> {
        if !ChessPosition::new(fen).validate() {
            warn!("refusing to search invalid FEN");
            return None;
        }
        let mut slot = self.engine.lock().await;
        let engine = slot.as_mut()?;
        let strength = EngineStrength::for_elo(elo);

        match self.search(engine, fen, strength).await {
            Ok(BotSearch::Done(mv)) => {
                debug!(best_move = ?mv.as_ref().map(Move::to_uci), "bot move chosen");
                mv
            }
            Ok(BotSearch::Wedged) => {
                warn!("bot engine did not stop, discarding it");
                if let Some(engine) = slot.take() {
                    engine.quit().await;
                }
                None
            }
            Err(e) => {
                warn!("bot engine failed: {}", e);
                if let Some(engine) = slot.take() {
                    engine.quit().await;
                }
                None
            }
        }
    }

    async fn search(
        &self,
        engine: &mut StockfishEngine,
        fen: &str,
        strength: EngineStrength,
    ) -> Result<BotSearch> {
        engine.set_option("Skill Level", strength.skill_level).await?;
        engine.set_option("UCI_LimitStrength", "true").await?;
        engine.set_option("UCI_Elo", strength.uci_elo()).await?;
        engine.set_position(fen).await?;
        engine.go_depth(strength.depth).await?;

        let deadline = Instant::now() + self.config.timeout;
        loop {
            match timeout_at(deadline, engine.read_line()).await {
                Ok(line) => {
                    if let Some(best) = BestMove::parse(line?.trim()) {
                        return Ok(BotSearch::Done(Move::from_uci(&best.mv)));
                    }
                }
                Err(_) => {
                    let drain = Instant::now() + self.config.drain_timeout;
                    return Ok(match engine.stop_and_drain(drain).await {
                        Some(best) => BotSearch::Done(Move::from_uci(&best.mv)),
                        None => BotSearch::Wedged,
                    });
                }
            }
        }
    }

    pub async fn dispose(&self) {
        if let Some(engine) = self.engine.lock().await.take() {
            engine.quit().await;
        }
    }
}
