//! Standard Algebraic Notation.
//!
//! Formatting follows the usual conventions (minimal disambiguation, `+`/`#`
//! suffixes). Parsing is lenient in the way most SAN readers are: it accepts
//! `0-0` for `O-O`, trailing check and annotation marks, over-disambiguated
//! moves (`Ng1f3`), and promotions with or without `=`.

use cozy_chess::{Board, Color, File, Move, Piece, Rank, Square};

use crate::converters::{format_file, format_rank, format_square, parse_file, parse_rank, parse_square};
use crate::uci::is_castling;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SanError {
    #[error("No legal move found for: {0}")]
    NoLegalMove(String),
    #[error("Ambiguous move: {0}")]
    AmbiguousMove(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid square: {0}")]
    InvalidSquare(String),
    #[error("Invalid promotion: {0}")]
    InvalidPromotion(String),
}

/// Format a legal move as SAN.
pub fn format_san(board: &Board, mv: Move) -> String {
    let Some(piece) = board.piece_on(mv.from) else {
        return crate::uci::format_uci_move(mv);
    };

    let mut san = String::new();

    if is_castling(board, mv) {
        if (mv.to.file() as u8) > (mv.from.file() as u8) {
            san.push_str("O-O");
        } else {
            san.push_str("O-O-O");
        }
    } else {
        let capture = is_capture(board, mv, piece);

        if piece == Piece::Pawn {
            if capture {
                san.push(format_file(mv.from.file()));
            }
        } else {
            san.push(piece_letter(piece));
            san.push_str(&disambiguation(board, mv, piece));
        }

        if capture {
            san.push('x');
        }
        san.push_str(&format_square(mv.to));

        if let Some(promo) = mv.promotion {
            san.push('=');
            san.push(piece_letter(promo));
        }
    }

    let mut after = board.clone();
    after.play_unchecked(mv);
    if !after.checkers().is_empty() {
        let mut has_reply = false;
        after.generate_moves(|_| {
            has_reply = true;
            true
        });
        san.push(if has_reply { '+' } else { '#' });
    }

    san
}

/// Parse SAN into a legal move of `board`.
pub fn parse_san(board: &Board, san: &str) -> Result<Move, SanError> {
    let text = san
        .trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));

    if text.is_empty() || !text.is_ascii() {
        return Err(SanError::InvalidFormat(san.to_string()));
    }

    let legal = legal_moves(board);

    match text {
        "O-O" | "0-0" => return pick_castling(board, &legal, true, san),
        "O-O-O" | "0-0-0" => return pick_castling(board, &legal, false, san),
        _ => {}
    }

    let pattern = SanPattern::parse(text).map_err(|e| match e {
        PatternError::Format => SanError::InvalidFormat(san.to_string()),
        PatternError::Square => SanError::InvalidSquare(san.to_string()),
        PatternError::Promotion => SanError::InvalidPromotion(san.to_string()),
    })?;

    let mut candidates = legal
        .iter()
        .copied()
        .filter(|&mv| !is_castling(board, mv))
        .filter(|&mv| pattern.matches(board, mv));

    match (candidates.next(), candidates.next()) {
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.to_string())),
        (None, _) => Err(SanError::NoLegalMove(san.to_string())),
    }
}

/// The pieces of a non-castling SAN move.
#[derive(Debug, PartialEq, Eq)]
struct SanPattern {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<Piece>,
}

enum PatternError {
    Format,
    Square,
    Promotion,
}

impl SanPattern {
    fn parse(text: &str) -> Result<Self, PatternError> {
        let mut rest = text;

        let piece = match rest.chars().next() {
            Some(c @ ('N' | 'B' | 'R' | 'Q' | 'K')) => {
                rest = &rest[1..];
                letter_piece(c).ok_or(PatternError::Format)?
            }
            _ => Piece::Pawn,
        };

        let mut promotion = None;
        if let Some((body, promo)) = rest.split_once('=') {
            promotion = Some(parse_promotion(promo)?);
            rest = body;
        } else if rest.len() >= 3 {
            // A letter after the destination rank can only be a promotion.
            let bytes = rest.as_bytes();
            let last = bytes[bytes.len() - 1];
            let before = bytes[bytes.len() - 2];
            if before.is_ascii_digit() && last.is_ascii_alphabetic() {
                promotion = Some(parse_promotion(&rest[rest.len() - 1..])?);
                rest = &rest[..rest.len() - 1];
            }
        }

        if rest.len() < 2 {
            return Err(PatternError::Format);
        }
        let (prefix, dest) = rest.split_at(rest.len() - 2);
        let to = parse_square(dest).ok_or(PatternError::Square)?;

        let prefix = prefix.strip_suffix(['x', '-']).unwrap_or(prefix);
        let mut from_file = None;
        let mut from_rank = None;
        let mut chars = prefix.chars().peekable();
        if let Some(&c) = chars.peek() {
            if let Some(file) = parse_file(c) {
                from_file = Some(file);
                chars.next();
            }
        }
        if let Some(&c) = chars.peek() {
            if let Some(rank) = parse_rank(c) {
                from_rank = Some(rank);
                chars.next();
            }
        }
        if chars.next().is_some() {
            return Err(PatternError::Format);
        }

        if promotion.is_some() && piece != Piece::Pawn {
            return Err(PatternError::Promotion);
        }

        Ok(Self {
            piece,
            from_file,
            from_rank,
            to,
            promotion,
        })
    }

    fn matches(&self, board: &Board, mv: Move) -> bool {
        if mv.to != self.to || mv.promotion != self.promotion {
            return false;
        }
        if board.piece_on(mv.from) != Some(self.piece) {
            return false;
        }
        if let Some(file) = self.from_file {
            if mv.from.file() != file {
                return false;
            }
        } else if self.piece == Piece::Pawn && mv.from.file() != mv.to.file() {
            // Pawn captures must name their file.
            return false;
        }
        if let Some(rank) = self.from_rank {
            if mv.from.rank() != rank {
                return false;
            }
        }
        true
    }
}

fn parse_promotion(s: &str) -> Result<Piece, PatternError> {
    let mut chars = s.chars();
    let piece = chars
        .next()
        .and_then(letter_piece_any_case)
        .ok_or(PatternError::Promotion)?;
    if chars.next().is_some() || matches!(piece, Piece::Pawn | Piece::King) {
        return Err(PatternError::Promotion);
    }
    Ok(piece)
}

fn pick_castling(board: &Board, legal: &[Move], kingside: bool, san: &str) -> Result<Move, SanError> {
    legal
        .iter()
        .copied()
        .find(|&mv| {
            is_castling(board, mv) && ((mv.to.file() as u8) > (mv.from.file() as u8)) == kingside
        })
        .ok_or_else(|| SanError::NoLegalMove(san.to_string()))
}

fn is_capture(board: &Board, mv: Move, piece: Piece) -> bool {
    let them = opponent(board.side_to_move());
    board.color_on(mv.to) == Some(them) || (piece == Piece::Pawn && mv.from.file() != mv.to.file())
}

/// Minimal origin hint so that the SAN names exactly one legal move.
fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let rivals: Vec<Square> = legal_moves(board)
        .into_iter()
        .filter(|other| {
            other.to == mv.to && other.from != mv.from && board.piece_on(other.from) == Some(piece)
        })
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|sq| sq.file() == mv.from.file());
    let shares_rank = rivals.iter().any(|sq| sq.rank() == mv.from.rank());

    if !shares_file {
        format_file(mv.from.file()).to_string()
    } else if !shares_rank {
        format_rank(mv.from.rank()).to_string()
    } else {
        format_square(mv.from)
    }
}

fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_moves(|mvs| {
        moves.extend(mvs);
        false
    });
    moves
}

pub(crate) fn opponent(color: Color) -> Color {
    match color {
        Color::White => Color::Black,
        Color::Black => Color::White,
    }
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn letter_piece(c: char) -> Option<Piece> {
    match c {
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        _ => None,
    }
}

fn letter_piece_any_case(c: char) -> Option<Piece> {
    letter_piece(c.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uci::parse_uci_move;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    fn san_of(board: &Board, uci: &str) -> String {
        format_san(board, parse_uci_move(board, uci).unwrap())
    }

    #[test]
    fn test_format_pawn_and_piece_moves() {
        let start = Board::default();
        assert_eq!(san_of(&start, "e2e4"), "e4");
        assert_eq!(san_of(&start, "g1f3"), "Nf3");
    }

    #[test]
    fn test_format_capture_and_check() {
        // 1. e4 d5 2. exd5
        let b = board("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        assert_eq!(san_of(&b, "e4d5"), "exd5");
        assert_eq!(san_of(&b, "f1b5"), "Bb5+");
    }

    #[test]
    fn test_format_checkmate() {
        // Fool's mate, black to deliver Qh4#
        let b = board("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2");
        assert_eq!(san_of(&b, "d8h4"), "Qh4#");
    }

    #[test]
    fn test_format_castling() {
        let b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert_eq!(san_of(&b, "e1g1"), "O-O");
        assert_eq!(san_of(&b, "e1c1"), "O-O-O");
    }

    #[test]
    fn test_format_disambiguation() {
        let b = board("4k3/8/8/8/8/8/4K3/R6R w - - 0 1");
        assert_eq!(san_of(&b, "a1d1"), "Rad1");
        let b = board("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");
        assert_eq!(san_of(&b, "a1a3"), "R1a3");
    }

    #[test]
    fn test_format_promotion() {
        let b = board("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        assert_eq!(san_of(&b, "e7e8q"), "e8=Q");
        assert_eq!(san_of(&b, "e7e8n"), "e8=N");
    }

    #[test]
    fn test_parse_basic() {
        let start = Board::default();
        let mv = parse_san(&start, "Nf3").unwrap();
        assert_eq!(crate::uci::format_uci_move(mv), "g1f3");
        let mv = parse_san(&start, "e4").unwrap();
        assert_eq!(crate::uci::format_uci_move(mv), "e2e4");
    }

    #[test]
    fn test_parse_lenient_forms() {
        let start = Board::default();
        assert!(parse_san(&start, "Ng1f3").is_ok());
        assert!(parse_san(&start, "e2e4").is_ok());
        assert!(parse_san(&start, "Nf3!?").is_ok());

        let b = board("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert!(parse_san(&b, "0-0").is_ok());
        assert!(parse_san(&b, "O-O-O").is_ok());
    }

    #[test]
    fn test_parse_promotion_forms() {
        let b = board("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        for text in ["e8=Q", "e8Q", "e8q", "e8=Q+"] {
            let mv = parse_san(&b, text).unwrap();
            assert_eq!(mv.promotion, Some(Piece::Queen), "{}", text);
        }
        assert_eq!(parse_san(&b, "e8=B").unwrap().promotion, Some(Piece::Bishop));
        assert!(parse_san(&b, "e8").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let start = Board::default();
        assert_eq!(
            parse_san(&start, "e9"),
            Err(SanError::InvalidSquare("e9".to_string()))
        );
        assert_eq!(
            parse_san(&start, "e5"),
            Err(SanError::NoLegalMove("e5".to_string()))
        );
        assert!(parse_san(&start, "").is_err());
        assert!(parse_san(&start, "hello").is_err());
        assert!(parse_san(&start, "O-O").is_err());
    }

    #[test]
    fn test_parse_ambiguous() {
        let b = board("4k3/8/8/8/8/8/4K3/R6R w - - 0 1");
        assert_eq!(
            parse_san(&b, "Rd1"),
            Err(SanError::AmbiguousMove("Rd1".to_string()))
        );
        assert!(parse_san(&b, "Rad1").is_ok());
    }

    #[test]
    fn test_pawn_push_does_not_match_capture() {
        // 1. e4 d5: "d5" is not a legal white move, "exd5" is
        let b = board("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        assert!(parse_san(&b, "d5").is_err());
        assert!(parse_san(&b, "exd5").is_ok());
    }

    #[test]
    fn test_round_trip_over_legal_moves() {
        let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let mut legal = Vec::new();
        b.generate_moves(|mvs| {
            legal.extend(mvs);
            false
        });
        for mv in legal {
            let san = format_san(&b, mv);
            assert_eq!(parse_san(&b, &san), Ok(mv), "{}", san);
        }
    }
}
