//! Plays one fixed game with random moves.
//!
//! The game id comes from `CHESSTTY_GAME_ID` (a baked-in id when unset) and
//! the token from `LICHESS_TOKEN`. No prompting: every turn is a random legal
//! move.

use anyhow::Context;

use chesstty::config;
use chesstty::logging;
use chesstty::output::Announcer;
use chesstty::session::{self, GameRequest, SessionOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let guard =
        logging::init(&config::get_log_dir(), "chesstty-game").context("failed to set up logging")?;

    let mut out = Announcer::stdout(false, false);
    let Some(token) = config::get_token() else {
        tracing::error!("No auth token provided");
        out.line("No auth token provided. Exiting.");
        drop(guard);
        std::process::exit(1);
    };

    let game_id = config::get_fixed_game_id();
    tracing::info!(%game_id, "Playing fixed game with random moves");

    let options = SessionOptions {
        random_only: true,
        ..SessionOptions::default()
    };
    session::play_on_console(&token, GameRequest::Existing(game_id), options, out).await?;

    Ok(())
}
