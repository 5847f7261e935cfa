use async_trait::async_trait;

use crate::types::Evaluation;

/// Source of engine evaluations for single positions.
///
/// Implementations never surface failures: an unavailable engine, a dead
/// process or a search that produced nothing all come back as `None`, and the
/// caller decides how to degrade.
#[async_trait]
pub trait PositionEvaluator: Send + Sync {
    async fn evaluate(&self, fen: &str, depth: u8) -> Option<Evaluation>;

    /// Releases the underlying engine. Calling it more than once is a no-op.
    async fn dispose(&self);

    fn is_available(&self) -> bool;
}

#[async_trait]
impl<T: PositionEvaluator + ?Sized> PositionEvaluator for std::sync::Arc<T> {
    async fn evaluate(&self, fen: &str, depth: u8) -> Option<Evaluation> {
        (**self).evaluate(fen, depth).await
    }

    async fn dispose(&self) {
        (**self).dispose().await
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
