use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use kibitz_core::{
    Classification, ClassifiedMove, Color, Error, Evaluation, GameReport, GameResult, MoveRecord,
    PositionEvaluator, Result,
};

use crate::classifier::{classify_perspective, Perspective};
use crate::critical::{critical_moments, DEFAULT_CRITICAL_SWING};
use crate::explain::{ExplanationProvider, UNAVAILABLE_EXPLANATION};
use crate::rating::summarize;
use crate::replay::{replay, ReplayedPly};

/// Tier given to moves the engine could not evaluate.
pub const FALLBACK_CLASSIFICATION: Classification = Classification::Good;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub depth: u8,
    pub critical_swing: i32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            depth: 16,
            critical_swing: DEFAULT_CRITICAL_SWING,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn with_critical_swing(mut self, swing: i32) -> Self {
        self.critical_swing = swing.abs();
        self
    }
}

/// Reviews one finished game for one player.
///
/// The analyzer owns its evaluator and releases it when the analysis ends,
/// whether it completed, failed or was cancelled through [`cancel_token`].
///
/// [`cancel_token`]: GameAnalyzer::cancel_token
pub struct GameAnalyzer<E: PositionEvaluator> {
    evaluator: E,
    config: AnalyzerConfig,
    explainer: ExplanationProvider,
    cancel: CancellationToken,
}

impl<E: PositionEvaluator> GameAnalyzer<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            config: AnalyzerConfig::default(),
            explainer: ExplanationProvider::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_explainer(mut self, explainer: ExplanationProvider) -> Self {
        self.explainer = explainer;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Token that aborts a running [`analyze`](GameAnalyzer::analyze) when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[instrument(skip(self, moves), fields(plies = moves.len()))]
    pub async fn analyze(
        &self,
        moves: &[MoveRecord],
        player: Color,
        result: GameResult,
    ) -> Result<GameReport> {
        let plies = match replay(moves) {
            Ok(plies) => plies,
            Err(e) => {
                self.evaluator.dispose().await;
                return Err(e);
            }
        };
        info!(depth = self.config.depth, "starting game analysis");

        let outcome = self.classify_plies(moves, &plies, player).await;
        self.evaluator.dispose().await;
        let classified = outcome?;

        let summary = summarize(&classified);
        let critical = critical_moments(&classified, self.config.critical_swing);
        info!(
            classified = summary.total,
            unevaluated = summary.unevaluated,
            rating = summary.performance_rating,
            "game analysis complete"
        );

        Ok(GameReport {
            id: Uuid::new_v4(),
            player,
            result,
            moves: classified,
            summary,
            critical_moments: critical,
            analyzed_at: Utc::now(),
        })
    }

    /// Stops any running analysis and releases the engine.
    pub async fn dispose(&self) {
        self.cancel.cancel();
        self.evaluator.dispose().await;
    }

    async fn classify_plies(
        &self,
        moves: &[MoveRecord],
        plies: &[ReplayedPly],
        player: Color,
    ) -> Result<Vec<ClassifiedMove>> {
        let mut classified = Vec::new();

        for ply in plies {
            let record = &moves[ply.index];
            if record.color != player {
                continue;
            }

            let before = self.evaluate(&ply.fen_before).await?;
            let after = match before {
                Some(_) => self.evaluate(&ply.fen_after).await?,
                None => None,
            };

            let entry = match (before, after) {
                (Some(before), Some(after)) => self.grade(record, ply, &before, &after),
                _ => {
                    warn!(san = %record.san, "no evaluation, using fallback tier");
                    self.fallback(record)
                }
            };
            debug!(san = %record.san, classification = %entry.classification, "move classified");
            classified.push(entry);
        }

        Ok(classified)
    }

    async fn evaluate(&self, fen: &str) -> Result<Option<Evaluation>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::AnalysisCancelled),
            evaluation = self.evaluator.evaluate(fen, self.config.depth) => Ok(evaluation),
        }
    }

    fn grade(
        &self,
        record: &MoveRecord,
        ply: &ReplayedPly,
        before: &Evaluation,
        after: &Evaluation,
    ) -> ClassifiedMove {
        // engine convention: each score relative to the side to move there
        let perspective = Perspective::normalize(
            before.relative_to(record.color),
            after.relative_to(record.color.opposite()),
            true,
        );
        let is_best = before
            .best_move()
            .map(|suggested| ply.played.matches_suggestion(&suggested))
            .unwrap_or(false);
        let classification = classify_perspective(perspective, is_best);

        ClassifiedMove {
            record: record.clone(),
            classification,
            explanation: self
                .explainer
                .explain(classification, perspective.diff(), record),
            eval_before: Some(before.score),
            eval_after: Some(after.score),
            best_move: Some(before.best_move.clone()).filter(|m| !m.is_empty()),
            evaluated: true,
        }
    }

    fn fallback(&self, record: &MoveRecord) -> ClassifiedMove {
        ClassifiedMove {
            record: record.clone(),
            classification: FALLBACK_CLASSIFICATION,
            explanation: UNAVAILABLE_EXPLANATION.to_string(),
            eval_before: None,
            eval_after: None,
            best_move: None,
            evaluated: false,
        }
    }
}
