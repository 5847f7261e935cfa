use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid move list at ply {index}: {reason}")]
    InvalidMoveList { index: usize, reason: String },

    #[error("engine error: {0}")]
    Engine(String),

    #[error("analysis cancelled")]
    AnalysisCancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_list_display() {
        let err = Error::InvalidMoveList {
            index: 3,
            reason: "illegal move 'Ke3'".into(),
        };
        assert_eq!(err.to_string(), "invalid move list at ply 3: illegal move 'Ke3'");
    }

    #[test]
    fn test_engine_error_display() {
        let err = Error::Engine("engine closed its output".into());
        assert_eq!(err.to_string(), "engine error: engine closed its output");
    }
}
