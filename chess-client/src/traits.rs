//! BoardService trait abstraction for client implementations

use crate::error::ClientResult;
use crate::types::{Account, GameEvent, GamePlayers};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Stream of events for one game, in server order.
pub type EventStream = BoxStream<'static, ClientResult<GameEvent>>;

/// What a session needs from the remote game service.
/// Implemented by both the real LichessClient and MockBoardService
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Look up the account the token belongs to
    async fn account(&self) -> ClientResult<Account>;

    /// Challenge the computer; returns the new game id
    async fn create_ai_challenge(&self, level: u8) -> ClientResult<String>;

    /// Create an open challenge anyone with the link can accept; returns its id,
    /// which becomes the game id once accepted
    async fn create_open_challenge(&self) -> ClientResult<String>;

    /// User ids recorded for white and black
    async fn game_players(&self, game_id: &str) -> ClientResult<GamePlayers>;

    /// Subscribe to the game's event stream
    async fn stream_game(&self, game_id: &str) -> ClientResult<EventStream>;

    /// Submit a move in UCI notation
    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<()>;

    /// Resign the game
    async fn resign(&self, game_id: &str) -> ClientResult<()>;

    /// Offer (or accept) a draw
    async fn offer_draw(&self, game_id: &str) -> ClientResult<()>;
}
