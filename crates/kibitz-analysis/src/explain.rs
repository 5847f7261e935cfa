use rand::Rng;

use kibitz_core::{Classification, MoveRecord};

pub const UNAVAILABLE_EXPLANATION: &str = "Engine analysis unavailable for this move";

/// Chooses one entry out of a pool of `len` candidates.
pub trait Selector: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice; the default for real reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl Selector for RandomSelector {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always takes the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstSelector;

impl Selector for FirstSelector {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Produces the human-readable line attached to each classified move.
pub struct ExplanationProvider {
    selector: Box<dyn Selector>,
}

impl Default for ExplanationProvider {
    fn default() -> Self {
        Self::new(RandomSelector)
    }
}

impl ExplanationProvider {
    pub fn new(selector: impl Selector + 'static) -> Self {
        Self {
            selector: Box::new(selector),
        }
    }

    /// Every line this provider may return for the given tier and move.
    /// `eval_change` is the mover's centipawn swing.
    pub fn pool(
        &self,
        classification: Classification,
        eval_change: i32,
        record: &MoveRecord,
    ) -> Vec<String> {
        // halves round toward positive infinity: -2.5 pawns reads as 2
        let pawns = (f64::from(eval_change) / 100.0 + 0.5).floor().abs() as i64;
        match classification {
            Classification::Brilliant => vec![
                "Brilliant! The only move that keeps the advantage".into(),
                "Outstanding find, a spectacular tactical blow".into(),
                "A stunning move that turns the position around".into(),
            ],
            Classification::Great => vec![
                "Great move! Your position improves considerably".into(),
                "A strong tactical shot".into(),
                "Very strong, gaining a clear advantage".into(),
            ],
            Classification::Best => vec![
                "The best move in this position".into(),
                "Perfect play".into(),
                "The engine's first choice".into(),
            ],
            Classification::Excellent => vec![
                "Excellent move".into(),
                "Very good choice".into(),
                "Strong play with almost nothing lost".into(),
            ],
            Classification::Good => vec![
                if record.is_capture() {
                    "Good capture".into()
                } else {
                    "Solid move".into()
                },
                if record.gives_check() {
                    "Good check".into()
                } else {
                    "Reasonable move".into()
                },
                "Acceptable play".into(),
            ],
            Classification::Inaccuracy => vec![
                "A better move was available".into(),
                "Not the most accurate".into(),
                "Could have been stronger".into(),
            ],
            Classification::Mistake => vec![
                format!("Mistake! This gives away {} pawns of advantage", pawns),
                "This move weakens your position significantly".into(),
                "Not a good choice here".into(),
            ],
            Classification::Blunder => vec![
                format!("Blunder! This throws away {} pawns", pawns),
                "A major error that may lose the game".into(),
                "Critical mistake".into(),
            ],
            Classification::Miss => vec![
                "Missed a winning opportunity!".into(),
                "A much stronger move was available".into(),
                "A golden chance slipped away".into(),
            ],
        }
    }

    pub fn explain(
        &self,
        classification: Classification,
        eval_change: i32,
        record: &MoveRecord,
    ) -> String {
        let mut pool = self.pool(classification, eval_change, record);
        let idx = self.selector.pick(pool.len()).min(pool.len().saturating_sub(1));
        pool.swap_remove(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kibitz_core::Color;

    fn record(san: &str, captured: Option<char>) -> MoveRecord {
        MoveRecord {
            move_number: 10,
            color: Color::Black,
            san: san.into(),
            from: "d8".into(),
            to: "d5".into(),
            captured,
            promotion: None,
        }
    }

    #[test]
    fn test_every_tier_has_three_lines() {
        let provider = ExplanationProvider::default();
        let mv = record("Qd5", None);
        for tier in Classification::ALL {
            assert_eq!(provider.pool(tier, -50, &mv).len(), 3, "{}", tier);
        }
    }

    #[test]
    fn test_random_explanation_comes_from_tier_pool() {
        let provider = ExplanationProvider::default();
        let mv = record("Qxd5", Some('p'));
        for tier in Classification::ALL {
            let pool = provider.pool(tier, -420, &mv);
            for _ in 0..20 {
                let line = provider.explain(tier, -420, &mv);
                assert!(pool.contains(&line), "{} not in {} pool", line, tier);
            }
        }
    }

    #[test]
    fn test_first_selector_is_deterministic() {
        let provider = ExplanationProvider::new(FirstSelector);
        let mv = record("Qd5", None);
        assert_eq!(
            provider.explain(Classification::Best, 0, &mv),
            "The best move in this position"
        );
    }

    #[test]
    fn test_good_pool_reflects_capture_and_check() {
        let provider = ExplanationProvider::new(FirstSelector);
        let capture = record("Qxd5+", Some('p'));
        let pool = provider.pool(Classification::Good, 0, &capture);
        assert_eq!(pool[0], "Good capture");
        assert_eq!(pool[1], "Good check");
    }

    #[test]
    fn test_loss_is_reported_in_pawns() {
        let provider = ExplanationProvider::new(FirstSelector);
        let mv = record("Qd5", None);
        assert_eq!(
            provider.explain(Classification::Blunder, -420, &mv),
            "Blunder! This throws away 4 pawns"
        );
        assert_eq!(
            provider.explain(Classification::Mistake, -250, &mv),
            "Mistake! This gives away 2 pawns of advantage"
        );
        assert_eq!(
            provider.explain(Classification::Mistake, -260, &mv),
            "Mistake! This gives away 3 pawns of advantage"
        );
    }

    struct OutOfRange;

    impl Selector for OutOfRange {
        fn pick(&self, len: usize) -> usize {
            len + 5
        }
    }

    #[test]
    fn test_out_of_range_selector_is_clamped() {
        let provider = ExplanationProvider::new(OutOfRange);
        let mv = record("Qd5", None);
        let line = provider.explain(Classification::Miss, -300, &mv);
        assert_eq!(line, "A golden chance slipped away");
    }
}
