//! Conversions between cozy-chess primitives and their text forms.

use cozy_chess::{File, Piece, Rank, Square};

pub fn parse_file(c: char) -> Option<File> {
    match c {
        'a'..='h' => Some(File::index(c as usize - 'a' as usize)),
        _ => None,
    }
}

pub fn parse_rank(c: char) -> Option<Rank> {
    match c {
        '1'..='8' => Some(Rank::index(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Parse a two-character square such as `e4`.
pub fn parse_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let file = parse_file(chars.next()?)?;
    let rank = parse_rank(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some(Square::new(file, rank))
}

/// Parse a piece letter, case-insensitive.
pub fn parse_piece(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'p' => Some(Piece::Pawn),
        'n' => Some(Piece::Knight),
        'b' => Some(Piece::Bishop),
        'r' => Some(Piece::Rook),
        'q' => Some(Piece::Queen),
        'k' => Some(Piece::King),
        _ => None,
    }
}

pub fn format_file(file: File) -> char {
    (b'a' + file as u8) as char
}

pub fn format_rank(rank: Rank) -> char {
    (b'1' + rank as u8) as char
}

pub fn format_square(sq: Square) -> String {
    let mut s = String::with_capacity(2);
    s.push(format_file(sq.file()));
    s.push(format_rank(sq.rank()));
    s
}

/// Lowercase piece letter, as used in UCI promotions.
pub fn format_piece(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_square() {
        assert_eq!(parse_square("e4"), Some(Square::new(File::E, Rank::Fourth)));
        assert_eq!(parse_square("a1"), Some(Square::new(File::A, Rank::First)));
        assert_eq!(parse_square("h8"), Some(Square::new(File::H, Rank::Eighth)));
    }

    #[test]
    fn test_parse_square_rejects_garbage() {
        assert_eq!(parse_square("e9"), None);
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("e"), None);
        assert_eq!(parse_square("e44"), None);
    }

    #[test]
    fn test_format_square() {
        assert_eq!(format_square(Square::new(File::G, Rank::Seventh)), "g7");
    }
}
