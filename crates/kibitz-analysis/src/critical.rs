use kibitz_core::{Classification, ClassifiedMove, CriticalKind, CriticalMoment};

pub const DEFAULT_CRITICAL_SWING: i32 = 200;

/// Picks out the moves that decided the game: blunders, missed wins, and any
/// other move that swung the evaluation by at least `min_swing` centipawns.
pub fn critical_moments(moves: &[ClassifiedMove], min_swing: i32) -> Vec<CriticalMoment> {
    moves
        .iter()
        .filter_map(|mv| {
            let (before, after) = (mv.eval_before?, mv.eval_after?);
            let swing = mv.swing()?;
            let kind = match mv.classification {
                Classification::Blunder => CriticalKind::Blunder,
                Classification::Miss => CriticalKind::Miss,
                _ if swing.abs() >= min_swing => CriticalKind::TurningPoint,
                _ => return None,
            };
            Some(CriticalMoment {
                move_number: mv.record.move_number,
                san: mv.record.san.clone(),
                eval_before: before,
                eval_after: after,
                swing,
                kind,
            })
        })
        .collect()
}
