//! Configuration for the chesstty binaries.
//!
//! Every value has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable.

use std::path::PathBuf;

/// Default server. Any Lichess instance exposing the Board API works.
const DEFAULT_LICHESS_URL: &str = "https://lichess.org";

/// Default log directory, relative to the working directory.
const DEFAULT_LOG_DIR: &str = "logs";

/// Default program used to read moves aloud.
const DEFAULT_SPEECH_CMD: &str = "espeak";

/// Default program used for desktop notifications.
const DEFAULT_NOTIFY_CMD: &str = "notify-send";

/// Game played by `chesstty-game` when `CHESSTTY_GAME_ID` is not set.
pub const DEFAULT_FIXED_GAME_ID: &str = "f4vD2sWC";

/// Computer strength for new AI games (1-8).
pub const DEFAULT_AI_LEVEL: u8 = 1;

/// Get the personal API token from `LICHESS_TOKEN`.
///
/// Returns `None` if the variable is unset or blank.
pub fn get_token() -> Option<String> {
    std::env::var("LICHESS_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Get the server base URL.
///
/// Priority:
/// 1. `CHESSTTY_LICHESS_URL` env variable if set
/// 2. `https://lichess.org` as fallback
pub fn get_lichess_url() -> String {
    if let Ok(url) = std::env::var("CHESSTTY_LICHESS_URL") {
        return url;
    }

    DEFAULT_LICHESS_URL.to_string()
}

/// Get the directory for the rolling log files.
///
/// Priority:
/// 1. `CHESSTTY_LOG_DIR` env variable if set
/// 2. `./logs` as fallback
pub fn get_log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHESSTTY_LOG_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Program that receives spoken text as its last argument.
pub fn get_speech_command() -> String {
    std::env::var("CHESSTTY_SPEECH_CMD").unwrap_or_else(|_| DEFAULT_SPEECH_CMD.to_string())
}

/// Program that receives notification text as its last argument.
pub fn get_notify_command() -> String {
    std::env::var("CHESSTTY_NOTIFY_CMD").unwrap_or_else(|_| DEFAULT_NOTIFY_CMD.to_string())
}

/// Game id for the fixed-game entry point.
pub fn get_fixed_game_id() -> String {
    std::env::var("CHESSTTY_GAME_ID").unwrap_or_else(|_| DEFAULT_FIXED_GAME_ID.to_string())
}

/// Web address of a game.
pub fn game_url(base_url: &str, game_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), game_id)
}
