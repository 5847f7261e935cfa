//! Move-list validation and replay on top of `shakmaty`.
//!
//! A game is replayed in full before any engine work starts, so a broken
//! move list is rejected up front instead of halfway through an analysis.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};

use kibitz_core::{Color, Error, Move, MoveRecord, Result};

/// One ply after replay: the positions around it and the move as played.
#[derive(Debug, Clone)]
pub struct ReplayedPly {
    pub index: usize,
    pub fen_before: String,
    pub fen_after: String,
    pub played: Move,
}

fn to_kibitz_color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

fn invalid(index: usize, reason: impl Into<String>) -> Error {
    Error::InvalidMoveList {
        index,
        reason: reason.into(),
    }
}

/// Strips annotation glyphs such as `!?` that SAN parsing does not accept.
fn clean_san(san: &str) -> &str {
    san.trim().trim_end_matches(['!', '?'])
}

fn parse_san(pos: &Chess, san: &str, index: usize) -> Result<shakmaty::Move> {
    let parsed: SanPlus = clean_san(san)
        .parse()
        .map_err(|e| invalid(index, format!("unparseable SAN '{}': {}", san, e)))?;
    parsed
        .san
        .to_move(pos)
        .map_err(|e| invalid(index, format!("illegal move '{}': {}", san, e)))
}

fn played_move(mv: &shakmaty::Move, index: usize) -> Result<Move> {
    let uci = mv.to_uci(CastlingMode::Standard).to_string();
    Move::from_uci(&uci).ok_or_else(|| invalid(index, format!("unrepresentable move '{}'", uci)))
}

/// Replays `moves` from the standard starting position.
///
/// Every record must be legal in turn order and agree with the move its SAN
/// denotes: same mover, same squares and, if the record names one, the same
/// promotion piece.
pub fn replay(moves: &[MoveRecord]) -> Result<Vec<ReplayedPly>> {
    let mut pos = Chess::default();
    let mut plies = Vec::with_capacity(moves.len());

    for (index, record) in moves.iter().enumerate() {
        let turn = to_kibitz_color(pos.turn());
        if record.color != turn {
            return Err(invalid(
                index,
                format!("expected a {} move, record says {}", turn, record.color),
            ));
        }

        let mv = parse_san(&pos, &record.san, index)?;
        let played = played_move(&mv, index)?;

        if !played.from.eq_ignore_ascii_case(&record.from)
            || !played.to.eq_ignore_ascii_case(&record.to)
        {
            return Err(invalid(
                index,
                format!(
                    "'{}' moves {}{}, record says {}{}",
                    record.san, played.from, played.to, record.from, record.to
                ),
            ));
        }
        if let Some(piece) = record.promotion {
            if played.promotion != Some(piece.to_ascii_lowercase()) {
                return Err(invalid(
                    index,
                    format!("'{}' does not promote to '{}'", record.san, piece),
                ));
            }
        }

        let fen_before = fen_of(&pos);
        pos.play_unchecked(mv);
        plies.push(ReplayedPly {
            index,
            fen_before,
            fen_after: fen_of(&pos),
            played,
        });
    }

    Ok(plies)
}

/// Builds move records from a sequence of SAN moves played from the start.
pub fn records_from_san<S: AsRef<str>>(sans: &[S]) -> Result<Vec<MoveRecord>> {
    let mut pos = Chess::default();
    let mut records = Vec::with_capacity(sans.len());

    for (index, san) in sans.iter().enumerate() {
        let san = san.as_ref();
        let mv = parse_san(&pos, san, index)?;
        let played = played_move(&mv, index)?;
        records.push(MoveRecord {
            move_number: (index / 2 + 1) as u32,
            color: to_kibitz_color(pos.turn()),
            san: clean_san(san).to_string(),
            from: played.from.clone(),
            to: played.to.clone(),
            captured: mv.capture().map(|role| role.char()),
            promotion: played.promotion,
        });
        pos.play_unchecked(mv);
    }

    Ok(records)
}

/// Pulls the SAN tokens out of PGN-style movetext, dropping move numbers,
/// comments and the result marker.
pub fn parse_movetext(text: &str) -> Vec<String> {
    let mut sans = Vec::new();
    let mut in_comment = false;

    for token in text.split_whitespace() {
        if in_comment {
            in_comment = !token.ends_with('}');
            continue;
        }
        if token.starts_with('{') {
            in_comment = !token.ends_with('}');
            continue;
        }
        if matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*") || token.starts_with('$') {
            continue;
        }
        // "12." / "12..." / "12.e4"
        let token = match token.rfind('.') {
            Some(pos) if token[..pos].chars().all(|c| c.is_ascii_digit() || c == '.') => {
                &token[pos + 1..]
            }
            _ => token,
        };
        if !token.is_empty() {
            sans.push(token.to_string());
        }
    }

    sans
}
