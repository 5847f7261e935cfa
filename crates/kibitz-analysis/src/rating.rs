use kibitz_core::{AnalysisSummary, ClassifiedMove};

pub const BASE_RATING: f64 = 1200.0;
pub const POINTS_PER_WEIGHT: f64 = 150.0;
pub const MIN_RATING: f64 = 400.0;
pub const MAX_RATING: f64 = 2800.0;

/// Maps the average tier weight of a game onto a rating.
pub fn performance_rating(summary: &AnalysisSummary) -> u32 {
    let average = if summary.total == 0 {
        0.0
    } else {
        summary.weighted_score() as f64 / f64::from(summary.total)
    };
    (BASE_RATING + average * POINTS_PER_WEIGHT)
        .clamp(MIN_RATING, MAX_RATING)
        .round() as u32
}

pub fn summarize(moves: &[ClassifiedMove]) -> AnalysisSummary {
    let mut summary = AnalysisSummary::default();
    for mv in moves {
        summary.record(mv.classification);
        if !mv.evaluated {
            summary.unevaluated += 1;
        }
    }
    summary.performance_rating = performance_rating(&summary);
    summary
}
