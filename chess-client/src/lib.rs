//! Lichess Board API client library
//!
//! Provides a high-level async client for playing a game through the Board
//! API: account lookup, challenge creation, the game event stream and the
//! move/resign/draw calls. The session code talks to [`BoardService`] so tests
//! can swap in [`MockBoardService`] (feature `mock`).
//!
//! # Example
//!
//! ```no_run
//! use chess_client::{BoardService, LichessClient};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LichessClient::new("https://lichess.org", "lip_xxx")?;
//!     let game_id = client.create_ai_challenge(1).await?;
//!     let mut events = client.stream_game(&game_id).await?;
//!     while let Some(event) = events.next().await {
//!         println!("{}", event?.kind());
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod ndjson;
mod traits;
mod types;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use client::LichessClient;
pub use error::{ClientError, ClientResult};
pub use ndjson::NdjsonDecoder;
pub use traits::{BoardService, EventStream};
pub use types::{Account, ChatLine, GameEvent, GameFull, GamePlayer, GamePlayers, GameState, OpponentGone};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBoardService, MockCall};
