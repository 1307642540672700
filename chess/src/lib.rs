//! Rules-engine facade over cozy-chess: a game mirror rebuilt from UCI move
//! lists, SAN and UCI conversion, outcome detection and a text board.

pub mod board_display;
pub mod converters;
pub mod game;
pub mod san;
pub mod types;
pub mod uci;

pub use board_display::DisplayBoard;
pub use converters::*;
pub use cozy_chess::Move;
pub use game::{Game, GameError, Outcome, Replay, ReplayFailure, Termination};
pub use san::{format_san, parse_san, SanError};
pub use types::{PieceColor, PieceKind};
pub use uci::{
    convert_uci_castling_to_cozy, format_uci_move, format_uci_move_on, parse_uci_move,
    parse_uci_token, UciError,
};
