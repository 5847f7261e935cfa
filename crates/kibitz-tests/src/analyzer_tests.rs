use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use kibitz_analysis::explain::UNAVAILABLE_EXPLANATION;
use kibitz_analysis::{replay, ExplanationProvider, GameAnalyzer, FALLBACK_CLASSIFICATION};
use kibitz_core::{
    Classification, Color, CriticalKind, Error, Evaluation, GameResult, MoveRecord,
};

use crate::helpers::*;

fn eval(score: i32, best: &str) -> Option<Evaluation> {
    Some(Evaluation::new(score, best))
}

#[tokio::test]
async fn test_example_game_best_then_blunder() {
    let moves = game(&RUY_LOPEZ);
    let evaluator = ScriptedEvaluator::new(vec![
        // 1. e4: 0 -> +20, engine wanted e4
        eval(0, "e2e4"),
        eval(20, "e7e5"),
        // 2. Nf3: +300 -> -50, engine wanted d4
        eval(300, "d2d4"),
        eval(-50, "b8c6"),
    ]);
    let analyzer = GameAnalyzer::new(evaluator);

    let report = analyzer
        .analyze(&moves, Color::White, GameResult::Win)
        .await
        .unwrap();

    assert_eq!(report.moves.len(), 3);
    assert_eq!(report.moves[0].classification, Classification::Best);
    assert_eq!(report.moves[1].classification, Classification::Blunder);
    assert_eq!(report.moves[1].best_move.as_deref(), Some("d2d4"));
    // queue ran dry for 3. Bb5
    assert_eq!(report.moves[2].classification, FALLBACK_CLASSIFICATION);
    assert!(!report.moves[2].evaluated);
    assert_eq!(report.summary.best, 1);
    assert_eq!(report.summary.blunder, 1);
    assert_eq!(report.summary.unevaluated, 1);
    assert_eq!(report.result, GameResult::Win);
}

#[tokio::test]
async fn test_miss_overlay_wins_over_mistake() {
    let moves = game(&RUY_LOPEZ);
    let evaluator = ScriptedEvaluator::new(vec![eval(600, "d2d4"), eval(350, "")]);
    let analyzer = GameAnalyzer::new(evaluator);

    let report = analyzer
        .analyze(&moves, Color::White, GameResult::Draw)
        .await
        .unwrap();

    let first = &report.moves[0];
    assert_eq!(first.classification, Classification::Miss);
    assert_eq!(report.summary.miss, 1);
    assert_eq!(report.summary.mistake, 0);
    assert!(report
        .critical_moments
        .iter()
        .any(|m| m.kind == CriticalKind::Miss && m.san == "e4"));
}

#[tokio::test]
async fn test_black_moves_use_black_perspective() {
    let moves = game(&RUY_LOPEZ);
    let evaluator = ScriptedEvaluator::new(vec![
        // 1...e5: black at +10, then White-relative +280 after the move
        eval(-10, "c7c5"),
        eval(280, "g1f3"),
    ]);
    let analyzer = GameAnalyzer::new(evaluator);

    let report = analyzer
        .analyze(&moves, Color::Black, GameResult::Loss)
        .await
        .unwrap();

    assert_eq!(report.moves.len(), 2);
    assert_eq!(report.moves[0].record.san, "e5");
    assert_eq!(report.moves[0].classification, Classification::Mistake);
    assert_eq!(report.moves[0].swing(), Some(-290));
}

#[tokio::test]
async fn test_evaluations_follow_replayed_positions() {
    let moves = game(&RUY_LOPEZ);
    let plies = replay(&moves).unwrap();
    let evaluator = Arc::new(ScriptedEvaluator::new(vec![
        eval(0, "e2e4"),
        eval(20, ""),
        eval(20, "g1f3"),
        eval(25, ""),
        eval(30, "f1b5"),
        eval(40, ""),
    ]));
    let analyzer = GameAnalyzer::new(evaluator.clone());

    analyzer
        .analyze(&moves, Color::White, GameResult::Win)
        .await
        .unwrap();

    let expected: Vec<String> = [0, 2, 4]
        .iter()
        .flat_map(|&i| [plies[i].fen_before.clone(), plies[i].fen_after.clone()])
        .collect();
    assert_eq!(evaluator.requested(), expected);
    assert!(evaluator.disposed());
}

#[tokio::test]
async fn test_completeness_for_every_prefix_and_color() {
    let full = game(&ITALIAN);
    for len in 0..=full.len() {
        let moves: Vec<MoveRecord> = full[..len].to_vec();
        for color in [Color::White, Color::Black] {
            let analyzer = GameAnalyzer::new(NullEvaluator::default());
            let report = analyzer
                .analyze(&moves, color, GameResult::Draw)
                .await
                .unwrap();
            let expected = moves.iter().filter(|m| m.color == color).count();
            assert_eq!(report.moves.len(), expected, "len={} color={}", len, color);
            assert_eq!(report.summary.total as usize, expected);
        }
    }
}

#[tokio::test]
async fn test_empty_game_gives_empty_report() {
    let analyzer = GameAnalyzer::new(NullEvaluator::default());
    let report = analyzer
        .analyze(&[], Color::White, GameResult::Draw)
        .await
        .unwrap();

    assert!(report.moves.is_empty());
    assert!(report.critical_moments.is_empty());
    assert_eq!(report.summary.performance_rating, 1200);
}

#[tokio::test]
async fn test_unavailable_engine_degrades_every_move() {
    let moves = game(&ITALIAN);
    let analyzer = GameAnalyzer::new(NullEvaluator::default());

    let report = analyzer
        .analyze(&moves, Color::White, GameResult::Win)
        .await
        .unwrap();

    assert_eq!(report.moves.len(), 6);
    for mv in &report.moves {
        assert_eq!(mv.classification, FALLBACK_CLASSIFICATION);
        assert_eq!(mv.explanation, UNAVAILABLE_EXPLANATION);
        assert!(!mv.evaluated);
        assert!(mv.eval_before.is_none());
    }
    assert_eq!(report.summary.unevaluated, 6);
    assert_eq!(report.summary.good, 6);
    // one search per move: the after-move search is skipped once the first fails
    assert_eq!(analyzer.evaluator().calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_classified_moves_keep_game_order() {
    let moves = game(&ITALIAN);
    let analyzer = GameAnalyzer::new(NullEvaluator::default());
    let report = analyzer
        .analyze(&moves, Color::Black, GameResult::Loss)
        .await
        .unwrap();

    let sans: Vec<&str> = report.moves.iter().map(|m| m.record.san.as_str()).collect();
    assert_eq!(sans, vec!["e5", "Nc6", "Bc5", "Nf6", "exd4", "Bb4+"]);
    let numbers: Vec<u32> = report.moves.iter().map(|m| m.record.move_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_explanations_come_from_tier_pool() {
    let moves = game(&RUY_LOPEZ);
    let explainer = ExplanationProvider::default();
    for _ in 0..10 {
        let evaluator = ScriptedEvaluator::new(vec![eval(0, "e2e4"), eval(20, "")]);
        let analyzer = GameAnalyzer::new(evaluator);
        let report = analyzer
            .analyze(&moves, Color::White, GameResult::Win)
            .await
            .unwrap();
        let first = &report.moves[0];
        let pool = explainer.pool(first.classification, 20, &first.record);
        assert!(pool.contains(&first.explanation));
    }
}

#[tokio::test]
async fn test_malformed_move_list_is_rejected() {
    let mut moves = game(&RUY_LOPEZ);
    moves.swap(1, 2);
    let evaluator = Arc::new(ScriptedEvaluator::default());
    let analyzer = GameAnalyzer::new(evaluator.clone());

    let err = analyzer
        .analyze(&moves, Color::White, GameResult::Win)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidMoveList { index: 1, .. }));
    assert!(evaluator.requested().is_empty());
    assert!(evaluator.disposed());
}

#[tokio::test]
async fn test_cancellation_abandons_inflight_search() {
    let moves = game(&ITALIAN);
    let analyzer = GameAnalyzer::new(StalledEvaluator::default());
    let token = analyzer.cancel_token();

    let (result, _) = tokio::join!(
        analyzer.analyze(&moves, Color::White, GameResult::Win),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        }
    );

    assert!(matches!(result, Err(Error::AnalysisCancelled)));
    assert_eq!(analyzer.evaluator().started.load(Ordering::SeqCst), 1);
    assert!(analyzer.evaluator().disposed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_dispose_stops_running_analysis() {
    let moves = game(&ITALIAN);
    let analyzer = GameAnalyzer::new(StalledEvaluator::default());

    let (result, _) = tokio::join!(
        analyzer.analyze(&moves, Color::Black, GameResult::Draw),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            analyzer.dispose().await;
        }
    );

    assert!(matches!(result, Err(Error::AnalysisCancelled)));
    assert!(analyzer.evaluator().disposed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_report_serializes_for_json_output() {
    let moves = game(&RUY_LOPEZ);
    let evaluator = ScriptedEvaluator::new(vec![eval(0, "e2e4"), eval(20, "")]);
    let report = GameAnalyzer::new(evaluator)
        .analyze(&moves, Color::White, GameResult::Win)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["player"], "white");
    assert_eq!(json["moves"][0]["classification"], "best");
    assert_eq!(json["moves"][0]["move"]["san"], "e4");
    assert_eq!(json["moves"][1]["evaluated"], false);
    assert_eq!(json["summary"]["total"], 3);
}
