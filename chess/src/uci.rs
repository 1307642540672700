//! UCI move notation, the form the Board API uses on the wire.
//!
//! cozy-chess encodes castling as the king capturing its own rook (`e1h1`),
//! while UCI and the server use the king's destination square (`e1g1`).
//! Everything crossing the wire goes through this module.

use cozy_chess::{Board, Color, File, Move, Piece, Rank, Square};

use crate::converters::{format_piece, format_square, parse_piece, parse_square};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UciError {
    #[error("Malformed UCI move: {0}")]
    Malformed(String),
    #[error("Illegal move in this position: {0}")]
    Illegal(String),
}

/// Convert UCI castling notation to cozy_chess notation
///
/// UCI uses standard notation (king moves 2 squares): e1g1, e1c1, e8g8, e8c8
/// cozy_chess uses king-to-rook notation: e1h1, e1a1, e8h8, e8a8
///
/// The converted move is only returned if it is in `legal_moves`, so a plain
/// king step from e1 to g1 (not castling) is left alone.
pub fn convert_uci_castling_to_cozy(mv: Move, legal_moves: &[Move]) -> Move {
    let is_rank_1_or_8 = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    let is_e_file = matches!(mv.from.file(), File::E);
    let is_g_or_c_file = matches!(mv.to.file(), File::G | File::C);

    if is_rank_1_or_8 && is_e_file && is_g_or_c_file && mv.promotion.is_none() && mv.from.rank() == mv.to.rank() {
        let rook_file = match mv.to.file() {
            File::G => File::H,
            _ => File::A,
        };
        let converted = Move {
            from: mv.from,
            to: Square::new(rook_file, mv.from.rank()),
            promotion: None,
        };

        if legal_moves.contains(&converted) {
            return converted;
        }
    }

    mv
}

/// Parse a UCI token (`e2e4`, `e7e8q`) without reference to a position.
pub fn parse_uci_token(uci: &str) -> Result<Move, UciError> {
    let malformed = || UciError::Malformed(uci.to_string());

    if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
        return Err(malformed());
    }

    let from = parse_square(&uci[0..2]).ok_or_else(malformed)?;
    let to = parse_square(&uci[2..4]).ok_or_else(malformed)?;
    let promotion = match uci[4..].chars().next() {
        Some(c) => match parse_piece(c) {
            Some(p) if !matches!(p, Piece::Pawn | Piece::King) => Some(p),
            _ => return Err(malformed()),
        },
        None => None,
    };

    Ok(Move {
        from,
        to,
        promotion,
    })
}

/// Parse a UCI token and resolve it against `board`, converting castling.
///
/// Fails if the move is not legal in the position.
pub fn parse_uci_move(board: &Board, uci: &str) -> Result<Move, UciError> {
    let mv = parse_uci_token(uci)?;

    let mut legal = Vec::new();
    board.generate_moves(|mvs| {
        legal.extend(mvs);
        false
    });

    let mv = convert_uci_castling_to_cozy(mv, &legal);
    if legal.contains(&mv) {
        Ok(mv)
    } else {
        Err(UciError::Illegal(uci.to_string()))
    }
}

/// Format a move in UCI notation (e.g., "e2e4", "e7e8q")
///
/// Does not know about castling; see [`format_uci_move_on`].
pub fn format_uci_move(mv: Move) -> String {
    let mut s = format!("{}{}", format_square(mv.from), format_square(mv.to));
    if let Some(promo) = mv.promotion {
        s.push(format_piece(promo));
    }
    s
}

/// Format a move played from `board` in UCI notation, writing castling as the
/// king's two-square step.
pub fn format_uci_move_on(board: &Board, mv: Move) -> String {
    if is_castling(board, mv) {
        let king_file = if (mv.to.file() as u8) > (mv.from.file() as u8) {
            File::G
        } else {
            File::C
        };
        return format_uci_move(Move {
            from: mv.from,
            to: Square::new(king_file, mv.from.rank()),
            promotion: None,
        });
    }
    format_uci_move(mv)
}

/// A king "capturing" its own piece is how cozy-chess spells castling.
pub fn is_castling(board: &Board, mv: Move) -> bool {
    let side: Color = board.side_to_move();
    board.piece_on(mv.from) == Some(Piece::King) && board.color_on(mv.to) == Some(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castling_ready() -> Board {
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_format_uci_move() {
        let mv = Move {
            from: Square::new(File::E, Rank::Second),
            to: Square::new(File::E, Rank::Fourth),
            promotion: None,
        };
        assert_eq!(format_uci_move(mv), "e2e4");
    }

    #[test]
    fn test_format_uci_move_with_promotion() {
        let mv = Move {
            from: Square::new(File::E, Rank::Seventh),
            to: Square::new(File::E, Rank::Eighth),
            promotion: Some(Piece::Queen),
        };
        assert_eq!(format_uci_move(mv), "e7e8q");
    }

    #[test]
    fn test_parse_uci_token_rejects_garbage() {
        assert!(parse_uci_token("e2").is_err());
        assert!(parse_uci_token("e2e9").is_err());
        assert!(parse_uci_token("e7e8k").is_err());
        assert!(parse_uci_token("é2e4").is_err());
    }

    #[test]
    fn test_parse_uci_move_converts_castling() {
        let board = castling_ready();
        let mv = parse_uci_move(&board, "e1g1").unwrap();
        assert_eq!(mv.to, Square::new(File::H, Rank::First));

        let mv = parse_uci_move(&board, "e1c1").unwrap();
        assert_eq!(mv.to, Square::new(File::A, Rank::First));
    }

    #[test]
    fn test_parse_uci_move_rejects_illegal() {
        let board = Board::default();
        assert_eq!(
            parse_uci_move(&board, "e2e5"),
            Err(UciError::Illegal("e2e5".to_string()))
        );
    }

    #[test]
    fn test_format_uci_move_on_castling() {
        let board = castling_ready();
        let kingside = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::H, Rank::First),
            promotion: None,
        };
        let queenside = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::A, Rank::First),
            promotion: None,
        };
        assert_eq!(format_uci_move_on(&board, kingside), "e1g1");
        assert_eq!(format_uci_move_on(&board, queenside), "e1c1");
    }
}
