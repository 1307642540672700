//! chesstty - play a Lichess game from the terminal.
//!
//! Joins the game given by `--game-id`, or creates one (against the computer
//! by default), then follows its event stream and prompts for a move whenever
//! it is the player's turn. Press `?` at the prompt for the key bindings.
//!
//! Logs go to a daily file under `CHESSTTY_LOG_DIR` (see [`config`]) because
//! stdout belongs to the prompt.

use anyhow::Context;
use clap::Parser;

use chesstty::config;
use chesstty::logging;
use chesstty::output::Announcer;
use chesstty::session::{self, GameRequest, GameType, ResignPolicy, SessionOptions};

#[derive(Parser)]
#[command(name = "chesstty", version, about = "Play Lichess games from the terminal")]
struct Cli {
    /// Kind of game to create when no game id is given.
    #[arg(long = "type", value_enum, default_value_t = GameType::Ai)]
    game_type: GameType,

    /// Join this ongoing game instead of creating one.
    #[arg(long)]
    game_id: Option<String>,

    /// Play random legal moves without prompting.
    #[arg(short = 'r', long)]
    random_only: bool,

    /// Personal API token. Create one at https://lichess.org/account/oauth/token/create
    #[arg(long, env = "LICHESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Strength of the computer opponent for new AI games.
    #[arg(long, default_value_t = config::DEFAULT_AI_LEVEL, value_parser = clap::value_parser!(u8).range(1..=8))]
    level: u8,

    /// Read moves aloud.
    #[arg(long)]
    speak: bool,

    /// Show moves as desktop notifications.
    #[arg(long)]
    notify: bool,

    /// What to do after resigning.
    #[arg(long, value_enum, default_value_t = ResignPolicy::Exit)]
    on_resign: ResignPolicy,

    /// Seed for random moves, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let guard = logging::init(&config::get_log_dir(), "chesstty").context("failed to set up logging")?;
    tracing::info!("chesstty starting up");

    let mut out = Announcer::stdout(cli.speak, cli.notify);
    out.clear_screen();

    let Some(token) = cli.token.filter(|t| !t.trim().is_empty()) else {
        tracing::error!("No auth token provided");
        out.line("No auth token provided. Exiting.");
        drop(guard);
        std::process::exit(1);
    };

    let request = GameRequest::from_cli(cli.game_id, cli.game_type, cli.level);
    let options = SessionOptions {
        random_only: cli.random_only,
        on_resign: cli.on_resign,
        base_url: config::get_lichess_url(),
        seed: cli.seed,
    };

    session::play_on_console(token.trim(), request, options, out).await?;

    tracing::info!("chesstty exiting");
    Ok(())
}
