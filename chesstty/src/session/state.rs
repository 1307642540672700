use chess::{Game, GameError, Move, PieceColor, Replay};
use chess_client::GameState;

/// Everything the session knows about the game. Owned by [`super::Session`].
#[derive(Debug)]
pub struct SessionState {
    pub game_id: String,
    /// Unknown until the game export or the first `gameFull` says otherwise.
    pub color: Option<PieceColor>,
    /// UCI tokens as last reported by the server, cut at the first one that
    /// could not be played, plus any move we just sent.
    pub moves: Vec<String>,
    /// Board mirror rebuilt from `moves`.
    pub board: Game,
    pub random_only: bool,
    pub resigned: bool,
    /// Server status of the last state event, e.g. `started` or `mate`.
    pub status: String,
    running: bool,
}

impl SessionState {
    pub fn new(game_id: impl Into<String>, color: Option<PieceColor>, random_only: bool) -> Self {
        Self {
            game_id: game_id.into(),
            color,
            moves: Vec::new(),
            board: Game::new(),
            random_only,
            resigned: false,
            status: "started".to_string(),
            running: true,
        }
    }

    /// Take the server's move list and status and rebuild the board from scratch.
    ///
    /// Tokens from the first unplayable one onwards are dropped, so `moves`
    /// always matches the board.
    pub fn apply_state(&mut self, state: &GameState) -> Replay {
        self.moves = state.move_list();
        self.status = state.status.clone();
        self.running = state.is_running();
        let report = self.board.replay(&self.moves);
        self.moves.truncate(report.applied);
        report
    }

    pub fn server_running(&self) -> bool {
        self.running
    }

    /// The game is over for us: decided on the board, ended on the server,
    /// or resigned locally.
    pub fn is_finished(&self) -> bool {
        self.resigned || !self.server_running() || self.board.outcome().is_some()
    }

    pub fn is_local_turn(&self) -> bool {
        match self.color {
            Some(color) => !self.is_finished() && is_turn_parity(self.moves.len(), color),
            None => false,
        }
    }

    /// Apply a move we are about to send.
    pub fn record_local_move(&mut self, mv: Move) -> Result<String, GameError> {
        let uci = self.board.uci(mv);
        self.board.push(mv)?;
        self.moves.push(uci.clone());
        Ok(uci)
    }

    /// Undo the last [`record_local_move`](Self::record_local_move).
    pub fn rollback(&mut self) {
        if self.moves.pop().is_some() {
            self.board.pop();
        }
    }

    /// Mark the game resigned and clear the local board.
    pub fn resign(&mut self) {
        self.resigned = true;
        self.board.reset();
    }

    /// Numbered SAN history, e.g. `1. e4 e5 2. Nf3`.
    pub fn history(&self) -> String {
        format_history(&self.board.history_san())
    }
}

/// Whether `color` is to move after `ply` half-moves.
pub fn is_turn_parity(ply: usize, color: PieceColor) -> bool {
    (ply % 2 == 0) == color.moves_first()
}

pub fn format_history(sans: &[String]) -> String {
    sans.chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}
