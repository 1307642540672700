//! Plain-text board for the terminal.

use cozy_chess::{Board, File, Rank, Square};

use crate::types::{PieceColor, PieceKind};

/// Snapshot of piece placement, for printing.
///
/// `Display` renders eight lines, rank 8 first, uppercase for white,
/// lowercase for black and `.` for empty squares:
///
/// ```text
/// r n b q k b n r
/// p p p p p p p p
/// . . . . . . . .
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBoard {
    /// Indexed `[rank][file]`, rank 1 first.
    squares: [[Option<(PieceKind, PieceColor)>; 8]; 8],
}

impl DisplayBoard {
    pub fn from_board(board: &Board) -> Self {
        let mut squares = [[None; 8]; 8];
        for (rank_idx, &rank) in Rank::ALL.iter().enumerate() {
            for (file_idx, &file) in File::ALL.iter().enumerate() {
                let sq = Square::new(file, rank);
                if let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
                    squares[rank_idx][file_idx] = Some((piece.into(), color.into()));
                }
            }
        }
        DisplayBoard { squares }
    }

    /// Piece on a square given as zero-based file and rank (`a1` is `0, 0`).
    pub fn piece_at(&self, file: u8, rank: u8) -> Option<(PieceKind, PieceColor)> {
        self.squares
            .get(rank as usize)
            .and_then(|row| row.get(file as usize))
            .copied()
            .flatten()
    }

    fn symbol(&self, file: usize, rank: usize) -> char {
        match self.squares[rank][file] {
            Some((kind, PieceColor::White)) => kind.to_char_upper(),
            Some((kind, PieceColor::Black)) => kind.to_char_lower(),
            None => '.',
        }
    }
}

impl std::fmt::Display for DisplayBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = (0..8)
            .rev()
            .map(|rank| {
                (0..8)
                    .map(|file| self.symbol(file, rank).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        f.write_str(&rows.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let board = DisplayBoard::from_board(&Board::default());
        assert_eq!(
            board.piece_at(0, 0),
            Some((PieceKind::Rook, PieceColor::White))
        );
        assert_eq!(
            board.piece_at(4, 0),
            Some((PieceKind::King, PieceColor::White))
        );
        assert_eq!(
            board.piece_at(3, 7),
            Some((PieceKind::Queen, PieceColor::Black))
        );
        assert_eq!(board.piece_at(4, 4), None);
        assert_eq!(board.piece_at(8, 0), None);
    }

    #[test]
    fn test_render_start() {
        let rendered = DisplayBoard::from_board(&Board::default()).to_string();
        let expected = "\
r n b q k b n r
p p p p p p p p
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
P P P P P P P P
R N B Q K B N R";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_bare_kings() {
        let board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let rendered = DisplayBoard::from_board(&board).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], ". . . . k . . .");
        assert_eq!(lines[7], ". . . . K . . .");
    }
}
