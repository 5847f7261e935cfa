use kibitz_core::mate_in;

/// Renders a White-relative score for display: `M3` / `-M3` for forced mates,
/// otherwise pawns with one decimal.
pub fn format_eval(centipawns: i32) -> String {
    match mate_in(centipawns) {
        Some(n) if centipawns > 0 => format!("M{}", n.abs()),
        Some(n) => format!("-M{}", n.abs()),
        None => format!("{:.1}", f64::from(centipawns) / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kibitz_core::EngineScore;

    #[test]
    fn test_format_centipawns() {
        assert_eq!(format_eval(0), "0.0");
        assert_eq!(format_eval(40), "0.4");
        assert_eq!(format_eval(-150), "-1.5");
        assert_eq!(format_eval(1234), "12.3");
    }

    #[test]
    fn test_format_mate() {
        assert_eq!(format_eval(EngineScore::Mate(3).to_centipawns()), "M3");
        assert_eq!(format_eval(-EngineScore::Mate(2).to_centipawns()), "-M2");
    }

    #[test]
    fn test_format_mated_now() {
        assert_eq!(format_eval(EngineScore::Mate(0).to_centipawns()), "-M0");
    }
}
