//! Board API payloads.

use serde::Deserialize;
use serde_json::Value;

/// The authenticated account.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub username: String,
}

/// One side of a game as it appears in a `gameFull` event.
///
/// Humans carry `id`/`name`, the computer opponent only `aiLevel`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub ai_level: Option<u8>,
}

impl GamePlayer {
    pub fn display_name(&self) -> String {
        match (&self.name, self.ai_level) {
            (Some(name), _) => name.clone(),
            (None, Some(level)) => format!("Stockfish level {}", level),
            (None, None) => "Anonymous".to_string(),
        }
    }
}

/// Mutable part of a game: moves so far and status.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GameState {
    /// Space-separated UCI moves from the starting position.
    #[serde(default)]
    pub moves: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub wdraw: bool,
    #[serde(default)]
    pub bdraw: bool,
}

fn default_status() -> String {
    "started".to_string()
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            moves: String::new(),
            status: default_status(),
            winner: None,
            wdraw: false,
            bdraw: false,
        }
    }
}

impl GameState {
    /// UCI tokens, empty for a fresh game.
    pub fn move_list(&self) -> Vec<String> {
        self.moves.split_whitespace().map(str::to_string).collect()
    }

    /// Whether the server still considers the game in progress.
    pub fn is_running(&self) -> bool {
        matches!(self.status.as_str(), "created" | "started")
    }
}

/// Full snapshot, always the first event of a game stream.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GameFull {
    pub id: String,
    #[serde(default)]
    pub white: GamePlayer,
    #[serde(default)]
    pub black: GamePlayer,
    pub state: GameState,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatLine {
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub room: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpponentGone {
    pub gone: bool,
    #[serde(default)]
    pub claim_win_in_seconds: Option<u32>,
}

/// One line of the game stream, classified by its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameFull(GameFull),
    GameState(GameState),
    ChatLine(ChatLine),
    OpponentGone(OpponentGone),
    /// Any tag this client does not handle, kept verbatim.
    Other { kind: String },
}

impl GameEvent {
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(match kind.as_str() {
            "gameFull" => GameEvent::GameFull(serde_json::from_value(value)?),
            "gameState" => GameEvent::GameState(serde_json::from_value(value)?),
            "chatLine" => GameEvent::ChatLine(serde_json::from_value(value)?),
            "opponentGone" => GameEvent::OpponentGone(serde_json::from_value(value)?),
            _ => GameEvent::Other { kind },
        })
    }

    pub fn kind(&self) -> &str {
        match self {
            GameEvent::GameFull(_) => "gameFull",
            GameEvent::GameState(_) => "gameState",
            GameEvent::ChatLine(_) => "chatLine",
            GameEvent::OpponentGone(_) => "opponentGone",
            GameEvent::Other { kind } => kind,
        }
    }
}

/// User ids of both sides, `None` for the computer or anonymous players.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePlayers {
    pub white_id: Option<String>,
    pub black_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameExport {
    pub players: ExportPlayers,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportPlayers {
    #[serde(default)]
    pub white: ExportSide,
    #[serde(default)]
    pub black: ExportSide,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportSide {
    #[serde(default)]
    pub user: Option<ExportUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportUser {
    pub id: String,
}

impl From<GameExport> for GamePlayers {
    fn from(export: GameExport) -> Self {
        Self {
            white_id: export.players.white.user.map(|u| u.id),
            black_id: export.players.black.user.map(|u| u.id),
        }
    }
}

/// Response of the challenge endpoints. The AI endpoint returns the game,
/// the open endpoint nests the challenge in newer API versions.
#[derive(Debug, Deserialize)]
pub(crate) struct ChallengeCreated {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub challenge: Option<ChallengeRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChallengeRef {
    pub id: String,
}

impl ChallengeCreated {
    pub fn into_id(self) -> Option<String> {
        self.id.or(self.challenge.map(|c| c.id))
    }
}

/// Error body returned by the API on failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
}
