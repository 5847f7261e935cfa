use kibitz_core::Classification;

/// Centipawn band edges of the quality ladder.
pub mod thresholds {
    pub const BRILLIANT_GAIN: i32 = 200;
    pub const BRILLIANT_CRITICAL: i32 = 300;
    pub const GREAT_GAIN: i32 = 150;
    pub const BEST_LOSS: i32 = -25;
    pub const GOOD_LOSS: i32 = -75;
    pub const INACCURACY_LOSS: i32 = -150;
    pub const MISTAKE_LOSS: i32 = -300;
    pub const MISS_ADVANTAGE: i32 = 500;
    pub const MISS_LOSS: i32 = -200;
}

use thresholds::*;

/// Evaluations normalised to the mover's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perspective {
    pub before: i32,
    pub after: i32,
}

impl Perspective {
    /// `eval_before` and `eval_after` are engine scores relative to the side
    /// to move in their respective positions; after the move that is the
    /// opponent, hence the second flip.
    pub fn normalize(eval_before: i32, eval_after: i32, is_player_move: bool) -> Self {
        if is_player_move {
            Self {
                before: eval_before,
                after: -eval_after,
            }
        } else {
            Self {
                before: -eval_before,
                after: eval_after,
            }
        }
    }

    pub fn diff(&self) -> i32 {
        self.after - self.before
    }
}

/// Grades one move. Pure: the same inputs always give the same tier.
pub fn classify(
    eval_before: i32,
    eval_after: i32,
    is_player_move: bool,
    is_best_move: bool,
) -> Classification {
    let perspective = Perspective::normalize(eval_before, eval_after, is_player_move);
    classify_perspective(perspective, is_best_move)
}

pub fn classify_perspective(perspective: Perspective, is_best_move: bool) -> Classification {
    let before = perspective.before;
    let diff = perspective.diff();

    // overlay: a winning position thrown away outranks the plain loss band
    if before > MISS_ADVANTAGE && diff < MISS_LOSS {
        return Classification::Miss;
    }

    ladder(before, diff, is_best_move)
}

fn ladder(before: i32, diff: i32, is_best_move: bool) -> Classification {
    if is_best_move && diff > BRILLIANT_GAIN && before.abs() > BRILLIANT_CRITICAL {
        Classification::Brilliant
    } else if diff > GREAT_GAIN {
        Classification::Great
    } else if is_best_move && diff > BEST_LOSS {
        Classification::Best
    } else if diff > BEST_LOSS {
        Classification::Excellent
    } else if diff > GOOD_LOSS {
        Classification::Good
    } else if diff > INACCURACY_LOSS {
        Classification::Inaccuracy
    } else if diff > MISTAKE_LOSS {
        Classification::Mistake
    } else {
        Classification::Blunder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(before: i32, diff: i32, best: bool) -> Classification {
        classify_perspective(
            Perspective {
                before,
                after: before + diff,
            },
            best,
        )
    }

    #[test]
    fn test_normalize_player_move() {
        let p = Perspective::normalize(120, -80, true);
        assert_eq!(p.before, 120);
        assert_eq!(p.after, 80);
        assert_eq!(p.diff(), -40);
    }

    #[test]
    fn test_normalize_opponent_move() {
        let p = Perspective::normalize(120, -80, false);
        assert_eq!(p.before, -120);
        assert_eq!(p.after, -80);
        assert_eq!(p.diff(), 40);
    }

    #[test]
    fn test_brilliant_requires_critical_position_and_best_move() {
        assert_eq!(graded(350, 250, true), Classification::Brilliant);
        assert_eq!(graded(-350, 250, true), Classification::Brilliant);
        assert_eq!(graded(350, 250, false), Classification::Great);
        assert_eq!(graded(100, 250, true), Classification::Great);
    }

    #[test]
    fn test_great_beats_best_by_rule_order() {
        assert_eq!(graded(0, 151, true), Classification::Great);
        assert_eq!(graded(0, 150, true), Classification::Best);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(graded(0, -24, true), Classification::Best);
        assert_eq!(graded(0, -24, false), Classification::Excellent);
        assert_eq!(graded(0, -25, true), Classification::Good);
        assert_eq!(graded(0, -74, false), Classification::Good);
        assert_eq!(graded(0, -75, false), Classification::Inaccuracy);
        assert_eq!(graded(0, -149, false), Classification::Inaccuracy);
        assert_eq!(graded(0, -150, false), Classification::Mistake);
        assert_eq!(graded(0, -299, false), Classification::Mistake);
        assert_eq!(graded(0, -300, false), Classification::Blunder);
    }

    #[test]
    fn test_miss_overlay_overrides_mistake() {
        assert_eq!(graded(600, -250, false), Classification::Miss);
        assert_eq!(graded(600, -250, true), Classification::Miss);
    }

    #[test]
    fn test_miss_overlay_overrides_blunder() {
        assert_eq!(graded(900, -700, false), Classification::Miss);
    }

    #[test]
    fn test_miss_needs_large_advantage() {
        assert_eq!(graded(500, -250, false), Classification::Mistake);
        assert_eq!(graded(600, -200, false), Classification::Mistake);
    }

    #[test]
    fn test_classify_is_deterministic() {
        for _ in 0..50 {
            assert_eq!(classify(300, 50, true, false), Classification::Blunder);
        }
    }

    #[test]
    fn test_ordinal_monotonicity() {
        for before in [-800, -301, -100, 0, 150, 301, 499] {
            for best in [true, false] {
                let mut previous: Option<u8> = None;
                for diff in -1000..=1000 {
                    let tier = graded(before, diff, best);
                    let rank = tier.rank().expect("miss cannot fire below the advantage edge");
                    if let Some(prev) = previous {
                        assert!(
                            rank >= prev,
                            "tier dropped at before={} diff={} best={}",
                            before,
                            diff,
                            best
                        );
                    }
                    previous = Some(rank);
                }
            }
        }
    }
}
