//! One game, from joining it to the end of its event stream.

mod controller;
mod state;

pub use controller::{Flow, Session};
pub use state::{format_history, is_turn_parity, SessionState};

use chess_client::{ClientError, LichessClient};

use crate::input::ConsolePrompt;
use crate::output::Announcer;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Play a game against the configured server, prompting on the console.
pub async fn play_on_console(
    token: &str,
    request: GameRequest,
    options: SessionOptions,
    out: Announcer,
) -> SessionResult<()> {
    let client = LichessClient::new(&options.base_url, token)?;
    let input = ConsolePrompt::spawn()?;
    let mut session = Session::start(client, input, out, request, options).await?;
    session.run().await
}

/// What to do after resigning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResignPolicy {
    /// End the session right away.
    #[default]
    Exit,
    /// Keep following the game stream until the server closes it.
    Watch,
}

/// Kind of game to create when no id is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GameType {
    /// Play the Lichess computer.
    #[default]
    Ai,
    /// Open challenge anyone with the link can accept.
    Open,
}

/// Which game the session plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameRequest {
    Existing(String),
    NewAi { level: u8 },
    NewOpen,
}

impl GameRequest {
    pub fn from_cli(game_id: Option<String>, game_type: GameType, level: u8) -> Self {
        match (game_id, game_type) {
            (Some(id), _) => Self::Existing(id),
            (None, GameType::Ai) => Self::NewAi { level },
            (None, GameType::Open) => Self::NewOpen,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Play random legal moves without prompting.
    pub random_only: bool,
    pub on_resign: ResignPolicy,
    /// Server address, used for the browser link.
    pub base_url: String,
    /// Seed for random moves; fresh entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            random_only: false,
            on_resign: ResignPolicy::default(),
            base_url: crate::config::get_lichess_url(),
            seed: None,
        }
    }
}
