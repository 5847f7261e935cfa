use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument, warn};

use kibitz_core::{ChessPosition, EngineScore, Evaluation, PositionEvaluator, Result};

use crate::engine::{BestMove, StockfishEngine, UciInfo};

#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub binary_path: String,
    /// Upper bound for one search; on expiry the best partial score is used.
    pub timeout: Duration,
    pub handshake_timeout: Duration,
    pub drain_timeout: Duration,
    pub threads: u16,
    pub hash_mb: u32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            binary_path: "/usr/local/bin/stockfish".to_string(),
            timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(5),
            drain_timeout: Duration::from_secs(2),
            threads: 1,
            hash_mb: 64,
        }
    }
}

impl EvaluatorConfig {
    pub fn new(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_threads(mut self, threads: u16) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_hash_mb(mut self, hash_mb: u32) -> Self {
        self.hash_mb = hash_mb.max(1);
        self
    }
}

/// Position evaluator backed by one exclusively owned UCI engine process.
///
/// If the engine cannot be started the evaluator still comes up, in the
/// unavailable state, and answers every request with `None`.
pub struct StockfishEvaluator {
    engine: Mutex<Option<StockfishEngine>>,
    available: AtomicBool,
    config: EvaluatorConfig,
}

impl StockfishEvaluator {
    pub async fn spawn(config: EvaluatorConfig) -> Self {
        match Self::start_engine(&config).await {
            Ok(engine) => Self {
                engine: Mutex::new(Some(engine)),
                available: AtomicBool::new(true),
                config,
            },
            Err(e) => {
                warn!(binary = %config.binary_path, "engine unavailable: {}", e);
                Self::unavailable(config)
            }
        }
    }

    pub fn unavailable(config: EvaluatorConfig) -> Self {
        Self {
            engine: Mutex::new(None),
            available: AtomicBool::new(false),
            config,
        }
    }

    async fn start_engine(config: &EvaluatorConfig) -> Result<StockfishEngine> {
        let mut engine =
            StockfishEngine::spawn(&config.binary_path, config.handshake_timeout).await?;
        engine.set_option("Threads", config.threads).await?;
        engine.set_option("Hash", config.hash_mb).await?;
        engine.set_option("UCI_AnalyseMode", "true").await?;
        engine.new_game().await?;
        engine.ensure_ready().await?;
        Ok(engine)
    }

    /// Runs one depth-limited search. `Ok(None)` means the search finished
    /// (or timed out) without producing a score.
    async fn search(
        engine: &mut StockfishEngine,
        fen: &str,
        depth: u8,
        config: &EvaluatorConfig,
    ) -> Result<SearchOutcome> {
        let side = ChessPosition::new(fen)
            .side_to_move()
            .unwrap_or(kibitz_core::Color::White);
        engine.set_position(fen).await?;
        engine.go_depth(depth).await?;

        let deadline = Instant::now() + config.timeout;
        let mut last_score: Option<EngineScore> = None;
        let mut last_depth = 0u8;
        let mut pv_head = String::new();

        loop {
            let line = match timeout_at(deadline, engine.read_line()).await {
                Ok(line) => line?,
                Err(_) => {
                    warn!(fen, depth, "evaluation timed out, using partial result");
                    let settled = engine
                        .stop_and_drain(Instant::now() + config.drain_timeout)
                        .await
                        .is_some();
                    let evaluation = last_score
                        .map(|s| Evaluation::from_engine(s, side, pv_head.clone(), last_depth));
                    return Ok(if settled {
                        SearchOutcome::Done(evaluation)
                    } else {
                        SearchOutcome::Wedged(evaluation)
                    });
                }
            };
            let line = line.trim();
            if let Some(info) = UciInfo::parse(line) {
                if let Some(score) = info.score() {
                    last_score = Some(score);
                    last_depth = info.depth.unwrap_or(last_depth);
                }
                if let Some(first) = info.pv.first() {
                    pv_head = first.clone();
                }
                continue;
            }
            if let Some(best) = BestMove::parse(line) {
                let best_move = if best.mv.is_empty() { pv_head } else { best.mv };
                let evaluation = last_score
                    .map(|s| Evaluation::from_engine(s, side, best_move, last_depth));
                return Ok(SearchOutcome::Done(evaluation));
            }
        }
    }

    fn mark_unavailable(&self) {
        self.available.store(false, Ordering::SeqCst);
    }
}

enum SearchOutcome {
    Done(Option<Evaluation>),
    /// The engine never acknowledged `stop`; it must not be reused.
    Wedged(Option<Evaluation>),
}

#[async_trait]
impl PositionEvaluator for StockfishEvaluator {
    #[instrument(skip(self))]
    async fn evaluate(&self, fen: &str, depth: u8) -> Option<Evaluation> {
        if !ChessPosition::new(fen).validate() {
            warn!("refusing to evaluate invalid FEN");
            return None;
        }

        let mut slot = self.engine.lock().await;
        let engine = slot.as_mut()?;

        match Self::search(engine, fen, depth, &self.config).await {
            Ok(SearchOutcome::Done(evaluation)) => {
                debug!(score = ?evaluation.as_ref().map(|e| e.score), "evaluation complete");
                evaluation
            }
            Ok(SearchOutcome::Wedged(evaluation)) => {
                warn!("engine did not stop, discarding it");
                if let Some(engine) = slot.take() {
                    engine.quit().await;
                }
                self.mark_unavailable();
                evaluation
            }
            Err(e) => {
                warn!("engine failed during search: {}", e);
                if let Some(engine) = slot.take() {
                    engine.quit().await;
                }
                self.mark_unavailable();
                None
            }
        }
    }

    async fn dispose(&self) {
        let mut slot = self.engine.lock().await;
        if let Some(engine) = slot.take() {
            engine.quit().await;
        }
        self.mark_unavailable();
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
