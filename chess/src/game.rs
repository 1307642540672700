use cozy_chess::{BitBoard, Board, Move, Piece};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::san::{format_san, opponent, parse_san, SanError};
use crate::types::PieceColor;
use crate::uci::{format_uci_move_on, parse_uci_move, UciError};

/// Local mirror of a game, always derived from the moves played since the
/// standard starting position.
#[derive(Debug, Clone)]
pub struct Game {
    position: Board,
    moves: Vec<Move>,
    /// Position hashes, starting position first, one per ply after that.
    hashes: Vec<u64>,
}

/// What happened while rebuilding a game from a server move list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    /// Number of tokens that were applied.
    pub applied: usize,
    /// SAN of the final token, rendered against the position before it.
    pub last_san: Option<String>,
    /// First token that could not be applied, and why.
    pub failure: Option<ReplayFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFailure {
    pub index: usize,
    pub token: String,
    pub error: UciError,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Option<PieceColor>,
    pub termination: Termination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl Outcome {
    /// Result string in PGN form: `1-0`, `0-1` or `1/2-1/2`.
    pub fn result(&self) -> &'static str {
        match self.winner {
            Some(PieceColor::White) => "1-0",
            Some(PieceColor::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        let position = Board::default();
        let hashes = vec![position.hash()];
        Self {
            position,
            moves: Vec::new(),
            hashes,
        }
    }

    /// Back to the starting position with no moves played.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Reset and replay a list of UCI tokens.
    ///
    /// Stops at the first token that is malformed or illegal; the position
    /// then reflects the valid prefix. Replaying the same list again always
    /// yields the same position.
    pub fn replay<S: AsRef<str>>(&mut self, tokens: &[S]) -> Replay {
        self.reset();
        let mut report = Replay::default();

        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let mv = match parse_uci_move(&self.position, token) {
                Ok(mv) => mv,
                Err(error) => {
                    report.failure = Some(ReplayFailure {
                        index,
                        token: token.to_string(),
                        error,
                    });
                    return report;
                }
            };

            if index + 1 == tokens.len() {
                report.last_san = Some(format_san(&self.position, mv));
            }
            self.play(mv);
            report.applied += 1;
        }

        report
    }

    /// Play a move after checking it is legal.
    pub fn push(&mut self, mv: Move) -> Result<(), GameError> {
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::IllegalMove);
        }
        self.play(mv);
        Ok(())
    }

    /// Parse SAN against the current position without playing it.
    pub fn parse_san(&self, san: &str) -> Result<Move, GameError> {
        Ok(parse_san(&self.position, san)?)
    }

    /// Parse player input: SAN first, then plain UCI.
    pub fn parse_move(&self, text: &str) -> Result<Move, GameError> {
        match parse_san(&self.position, text) {
            Ok(mv) => Ok(mv),
            Err(san_err) => parse_uci_move(&self.position, text.trim()).map_err(|_| san_err.into()),
        }
    }

    /// Play a SAN move and return it.
    pub fn push_san(&mut self, san: &str) -> Result<Move, GameError> {
        let mv = self.parse_san(san)?;
        self.play(mv);
        Ok(mv)
    }

    /// Undo the last move.
    pub fn pop(&mut self) -> Option<Move> {
        let last = self.moves.pop()?;
        let moves = std::mem::take(&mut self.moves);
        self.reset();
        for mv in moves {
            self.play(mv);
        }
        Some(last)
    }

    /// SAN of a move in the current position.
    pub fn san(&self, mv: Move) -> Result<String, GameError> {
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::IllegalMove);
        }
        Ok(format_san(&self.position, mv))
    }

    /// UCI of a move in the current position, with standard castling squares.
    pub fn uci(&self, mv: Move) -> String {
        format_uci_move_on(&self.position, mv)
    }

    /// Get all legal moves for the current position
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.position.generate_moves(|mvs| {
            moves.extend(mvs);
            false
        });
        moves
    }

    /// Legal moves in SAN.
    pub fn legal_sans(&self) -> Vec<String> {
        self.legal_moves()
            .into_iter()
            .map(|mv| format_san(&self.position, mv))
            .collect()
    }

    /// A uniformly chosen legal move, or `None` when there is none.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.legal_moves().choose(rng).copied()
    }

    /// The moves played so far, in SAN.
    pub fn history_san(&self) -> Vec<String> {
        let mut board = Board::default();
        let mut sans = Vec::with_capacity(self.moves.len());
        for &mv in &self.moves {
            sans.push(format_san(&board, mv));
            board.play_unchecked(mv);
        }
        sans
    }

    /// `None` while the game is still going.
    pub fn outcome(&self) -> Option<Outcome> {
        let side = self.position.side_to_move();

        if self.legal_moves().is_empty() {
            return Some(if self.position.checkers().is_empty() {
                Outcome {
                    winner: None,
                    termination: Termination::Stalemate,
                }
            } else {
                Outcome {
                    winner: Some(opponent(side).into()),
                    termination: Termination::Checkmate,
                }
            });
        }

        let draw = |termination| {
            Some(Outcome {
                winner: None,
                termination,
            })
        };

        if insufficient_material(&self.position) {
            return draw(Termination::InsufficientMaterial);
        }
        if self.position.halfmove_clock() >= 150 {
            return draw(Termination::SeventyFiveMoves);
        }
        let current = self.position.hash();
        if self.hashes.iter().filter(|&&h| h == current).count() >= 5 {
            return draw(Termination::FivefoldRepetition);
        }

        None
    }

    /// Get the current board position
    pub fn position(&self) -> &Board {
        &self.position
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Get the side to move
    pub fn side_to_move(&self) -> PieceColor {
        self.position.side_to_move().into()
    }

    /// Export position to FEN string
    pub fn to_fen(&self) -> String {
        self.position.to_string()
    }

    fn play(&mut self, mv: Move) {
        self.position.play_unchecked(mv);
        self.moves.push(mv);
        self.hashes.push(self.position.hash());
    }
}

fn insufficient_material(board: &Board) -> bool {
    let heavy = board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    if !heavy.is_empty() {
        return false;
    }

    let knights = board.pieces(Piece::Knight);
    let bishops = board.pieces(Piece::Bishop);
    if knights.len() + bishops.len() <= 1 {
        return true;
    }

    // Any number of bishops all on one square color cannot mate.
    knights.is_empty() && same_square_color(bishops)
}

fn same_square_color(bishops: BitBoard) -> bool {
    let mut shades = bishops
        .into_iter()
        .map(|sq| (sq.file() as u8 + sq.rank() as u8) % 2);
    match shades.next() {
        Some(first) => shades.all(|shade| shade == first),
        None => true,
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal move")]
    IllegalMove,
    #[error(transparent)]
    San(#[from] SanError),
    #[error(transparent)]
    Uci(#[from] UciError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_display::DisplayBoard;
    use crate::types::PieceKind;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const SCHOLARS_MATE: [&str; 7] = ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"];

    #[test]
    fn test_replay_single_move() {
        let mut game = Game::new();
        let report = game.replay(&["e2e4"]);

        assert_eq!(report.applied, 1);
        assert_eq!(report.last_san.as_deref(), Some("e4"));
        assert!(report.failure.is_none());
        assert_eq!(game.ply_count(), 1);

        let board = DisplayBoard::from_board(game.position());
        assert_eq!(board.piece_at(4, 3), Some((PieceKind::Pawn, PieceColor::White)));
        assert_eq!(board.piece_at(4, 1), None);
        assert_eq!(game.side_to_move(), PieceColor::Black);
    }

    #[test]
    fn test_replay_stops_at_malformed_token() {
        let mut game = Game::new();
        let report = game.replay(&["e2e4", "zz99", "d2d4"]);

        assert_eq!(report.applied, 1);
        assert_eq!(report.last_san, None);
        let failure = report.failure.unwrap();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.token, "zz99");
        assert_eq!(game.ply_count(), 1);
    }

    #[test]
    fn test_replay_stops_at_illegal_token() {
        let mut game = Game::new();
        let report = game.replay(&["e2e5"]);
        assert_eq!(report.applied, 0);
        assert!(matches!(
            report.failure,
            Some(ReplayFailure {
                error: UciError::Illegal(_),
                ..
            })
        ));
        assert_eq!(game.to_fen(), Game::new().to_fen());
    }

    #[test]
    fn test_replay_with_castling() {
        let mut game = Game::new();
        let report = game.replay(&["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"]);
        assert_eq!(report.applied, 7);
        assert_eq!(report.last_san.as_deref(), Some("O-O"));
        assert_eq!(game.history_san().last().map(String::as_str), Some("O-O"));
    }

    #[test]
    fn test_checkmate_outcome() {
        let mut game = Game::new();
        let report = game.replay(&SCHOLARS_MATE);
        assert_eq!(report.last_san.as_deref(), Some("Qxf7#"));

        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.termination, Termination::Checkmate);
        assert_eq!(outcome.winner, Some(PieceColor::White));
        assert_eq!(outcome.result(), "1-0");
    }

    #[test]
    fn test_ongoing_has_no_outcome() {
        let mut game = Game::new();
        game.replay(&["e2e4", "e7e5"]);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_insufficient_material() {
        let board: Board = "8/8/4k3/8/8/3KB3/8/8 w - - 0 1".parse().unwrap();
        assert!(insufficient_material(&board));
        let board: Board = "8/8/4k3/8/8/3KR3/8/8 w - - 0 1".parse().unwrap();
        assert!(!insufficient_material(&board));
    }

    #[test]
    fn test_bishops_on_both_sides() {
        // c4 and e2 share a shade.
        let board: Board = "8/8/4k3/8/2b5/8/4B3/3K4 w - - 0 1".parse().unwrap();
        assert!(insufficient_material(&board));
        let board: Board = "8/8/4k3/8/3b4/8/4B3/3K4 w - - 0 1".parse().unwrap();
        assert!(!insufficient_material(&board));
    }

    #[test]
    fn test_fivefold_repetition() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let tokens: Vec<&str> = shuffle.iter().cycle().take(16).copied().collect();
        let mut game = Game::new();
        game.replay(&tokens);
        assert_eq!(
            game.outcome().map(|o| o.termination),
            Some(Termination::FivefoldRepetition)
        );
        assert_eq!(game.outcome().unwrap().result(), "1/2-1/2");
    }

    #[test]
    fn test_push_san_and_uci() {
        let mut game = Game::new();
        let mv = game.push_san("Nf3").unwrap();
        assert_eq!(crate::uci::format_uci_move(mv), "g1f3");
        assert!(game.push_san("e9").is_err());
        assert_eq!(game.ply_count(), 1);
    }

    #[test]
    fn test_parse_move_accepts_uci() {
        let game = Game::new();
        assert!(game.parse_move("g1f3").is_ok());
        assert!(game.parse_move("Nf3").is_ok());
        assert!(game.parse_move("e9").is_err());
    }

    #[test]
    fn test_pop() {
        let mut game = Game::new();
        game.replay(&["e2e4", "e7e5"]);
        assert!(game.pop().is_some());
        let mut expected = Game::new();
        expected.replay(&["e2e4"]);
        assert_eq!(game.to_fen(), expected.to_fen());
    }

    #[test]
    fn test_random_move_is_legal_and_varied() {
        let game = Game::new();
        let legal: HashSet<Move> = game.legal_moves().into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..1000 {
            let mv = game.random_move(&mut rng).unwrap();
            assert!(legal.contains(&mv));
            seen.insert(mv);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_random_move_none_when_mated() {
        let mut game = Game::new();
        game.replay(&SCHOLARS_MATE);
        assert_eq!(game.random_move(&mut rand::thread_rng()), None);
    }

    proptest! {
        #[test]
        fn prop_replay_is_idempotent(seed in any::<u64>(), plies in 0usize..40) {
            // Build a random legal game, then rebuild it from its UCI list.
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = Game::new();
            let mut tokens = Vec::new();
            for _ in 0..plies {
                let Some(mv) = game.random_move(&mut rng) else { break };
                tokens.push(game.uci(mv));
                game.push(mv).unwrap();
            }

            let mut mirror = Game::new();
            let first = mirror.replay(&tokens);
            let fen = mirror.to_fen();
            let second = mirror.replay(&tokens);

            prop_assert_eq!(first, second);
            prop_assert_eq!(mirror.to_fen(), fen.clone());
            prop_assert_eq!(fen, game.to_fen());
            prop_assert_eq!(mirror.ply_count(), tokens.len());
        }
    }
}
