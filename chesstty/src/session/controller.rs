use chess::{DisplayBoard, Move, PieceColor};
use chess_client::{BoardService, ClientError, GameEvent, GameFull, GameState, OpponentGone};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Instrument;

use super::state::SessionState;
use super::{GameRequest, ResignPolicy, SessionOptions, SessionResult};
use crate::commands::{help_text, Command, RandomChoice};
use crate::config::game_url;
use crate::input::LineSource;
use crate::output::{open_in_browser, Announcer, Channels};

const PROMPT: &str = ">>> ";
const ACCEPT_PROMPT: &str = "Accept? (y/n/q): ";

/// Whether the event loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// How the player's turn at the prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnEnd {
    Moved,
    DrawOffered,
    Resigned,
    InputClosed,
}

/// A running game: the remote service, the player's console and the local
/// mirror of the game.
pub struct Session<S, I> {
    service: S,
    input: I,
    out: Announcer,
    account_id: String,
    state: SessionState,
    options: SessionOptions,
    rng: StdRng,
}

impl<S: BoardService, I: LineSource> Session<S, I> {
    pub fn new(
        service: S,
        input: I,
        out: Announcer,
        account_id: impl Into<String>,
        state: SessionState,
        options: SessionOptions,
    ) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            service,
            input,
            out,
            account_id: account_id.into(),
            state,
            options,
            rng,
        }
    }

    /// Greet the player, create or join the game, and work out which side
    /// they play.
    pub async fn start(
        service: S,
        input: I,
        mut out: Announcer,
        request: GameRequest,
        options: SessionOptions,
    ) -> SessionResult<Self> {
        let account = service.account().await?;
        tracing::info!(user = %account.id, "Authenticated");
        out.line(&format!("Welcome {}", account.username));

        let game_id = match request {
            GameRequest::Existing(id) => id,
            GameRequest::NewAi { level } => service.create_ai_challenge(level).await?,
            GameRequest::NewOpen => {
                let id = service.create_open_challenge().await?;
                out.line(&format!("Share this link: {}", game_url(&options.base_url, &id)));
                id
            }
        };
        tracing::info!(game_id = %game_id, "Joined game");
        out.line(&format!("Game id: {}", game_id));

        // An open challenge has no players until someone accepts it, so the
        // export can fail. The first gameFull event settles the color then.
        let color = match service.game_players(&game_id).await {
            Ok(players) => Some(color_for(&account.id, players.white_id.as_deref())),
            Err(e) => {
                tracing::warn!(game_id = %game_id, "Could not export game: {}", e);
                None
            }
        };
        if let Some(color) = color {
            out.line(&format!("You are {}", color));
            out.line("Press ? to show options");
        }

        let state = SessionState::new(game_id, color, options.random_only);
        Ok(Self::new(service, input, out, account.id, state, options))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Follow the game stream until it closes or the player leaves.
    pub async fn run(&mut self) -> SessionResult<()> {
        let game_id = self.state.game_id.clone();
        self.run_inner()
            .instrument(tracing::info_span!("session", id = %game_id))
            .await
    }

    async fn run_inner(&mut self) -> SessionResult<()> {
        tracing::info!("Session started");
        let mut events = self.service.stream_game(&self.state.game_id).await?;

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("Game stream failed: {}", e);
                    return Err(e.into());
                }
            };

            tracing::debug!(kind = event.kind(), "Event received");
            if self.handle_event(event).await? == Flow::Quit {
                tracing::info!("Session ended by player");
                return Ok(());
            }
        }

        tracing::info!("Game stream closed");
        Ok(())
    }

    pub async fn handle_event(&mut self, event: GameEvent) -> SessionResult<Flow> {
        match event {
            GameEvent::GameFull(full) => {
                self.adopt_players(&full);
                self.handle_state(&full.state).await
            }
            GameEvent::GameState(state) => self.handle_state(&state).await,
            GameEvent::ChatLine(chat) => {
                self.out.line(&format!("{}: {}", chat.username, chat.text));
                Ok(Flow::Continue)
            }
            GameEvent::OpponentGone(gone) => {
                self.out.line(&opponent_notice(&gone));
                Ok(Flow::Continue)
            }
            GameEvent::Other { kind } => {
                self.out.line(&kind);
                Ok(Flow::Continue)
            }
        }
    }

    fn adopt_players(&mut self, full: &GameFull) {
        tracing::info!(
            white = %full.white.display_name(),
            black = %full.black.display_name(),
            "Game snapshot"
        );
        let color = color_for(&self.account_id, full.white.id.as_deref());
        if self.state.color != Some(color) {
            tracing::info!(%color, "Playing as {}", color);
            self.state.color = Some(color);
            self.out.line(&format!("You are {}", color));
            self.out.line("Press ? to show options");
        }
    }

    async fn handle_state(&mut self, state: &GameState) -> SessionResult<Flow> {
        let report = self.state.apply_state(state);
        if let Some(failure) = &report.failure {
            tracing::warn!(
                index = failure.index,
                token = %failure.token,
                "Skipping unplayable move: {}",
                failure.error
            );
        }
        if let Some(san) = &report.last_san {
            self.out.announce(san, Channels::ALL);
        }

        if let Some(outcome) = self.state.board.outcome() {
            tracing::info!(result = outcome.result(), "Game decided on the board");
            self.out.line(outcome.result());
            return Ok(Flow::Continue);
        }
        if !self.state.server_running() {
            let line = match &state.winner {
                Some(winner) => format!("Game over: {} ({} wins)", state.status, winner),
                None => format!("Game over: {}", state.status),
            };
            self.out.line(&line);
            return Ok(Flow::Continue);
        }
        if !self.state.is_local_turn() {
            return Ok(Flow::Continue);
        }

        let end = if self.state.random_only {
            self.play_random().await;
            TurnEnd::Moved
        } else {
            self.solicit().await?
        };
        tracing::debug!(?end, "Turn finished");

        Ok(match end {
            TurnEnd::Resigned if self.options.on_resign == ResignPolicy::Exit => Flow::Quit,
            TurnEnd::InputClosed => Flow::Quit,
            _ => Flow::Continue,
        })
    }

    /// Prompt until the player moves, resigns, offers a draw or closes input.
    async fn solicit(&mut self) -> SessionResult<TurnEnd> {
        loop {
            let Some(line) = self.input.read_line(PROMPT).await? else {
                return Ok(TurnEnd::InputClosed);
            };

            match Command::parse(&line) {
                Command::Empty => {}
                Command::Help => self.out.line(&help_text()),
                Command::LegalMoves => {
                    let sans = self.state.board.legal_sans();
                    self.out.line(&sans.join(" "));
                }
                Command::History => {
                    let history = self.state.history();
                    self.out.line(&history);
                }
                Command::OpenBrowser => {
                    let url = game_url(&self.options.base_url, &self.state.game_id);
                    if let Err(e) = open_in_browser(&url) {
                        tracing::warn!(%url, "Failed to open browser: {}", e);
                        self.out.line(&format!("Could not open {}", url));
                    }
                }
                Command::ShowBoard => {
                    let board = DisplayBoard::from_board(self.state.board.position());
                    self.out.line(&board.to_string());
                }
                Command::ToggleRandom => {
                    if let Some(end) = self.random_submode().await? {
                        return Ok(end);
                    }
                }
                Command::ForceRandom => {
                    if self.play_random().await {
                        return Ok(TurnEnd::Moved);
                    }
                }
                Command::Resign => {
                    self.resign().await;
                    return Ok(TurnEnd::Resigned);
                }
                Command::OfferDraw => {
                    if self.offer_draw().await {
                        return Ok(TurnEnd::DrawOffered);
                    }
                }
                Command::ClearScreen => self.out.clear_screen(),
                Command::Move(text) => match self.state.board.parse_move(&text) {
                    Ok(mv) => {
                        if self.submit(mv).await {
                            return Ok(TurnEnd::Moved);
                        }
                    }
                    Err(e) => {
                        tracing::debug!(input = %text, "Unparseable move: {}", e);
                        self.out.line("Invalid move");
                    }
                },
            }
        }
    }

    /// Offer random moves until one is accepted. `None` means back to the
    /// main prompt.
    async fn random_submode(&mut self) -> SessionResult<Option<TurnEnd>> {
        loop {
            let Some(mv) = self.state.board.random_move(&mut self.rng) else {
                self.out.line("No legal moves");
                return Ok(None);
            };
            let san = self
                .state
                .board
                .san(mv)
                .unwrap_or_else(|_| self.state.board.uci(mv));
            self.out.line(&san);

            loop {
                let Some(answer) = self.input.read_line(ACCEPT_PROMPT).await? else {
                    return Ok(Some(TurnEnd::InputClosed));
                };
                match RandomChoice::parse(&answer) {
                    RandomChoice::Accept => {
                        let moved = self.submit(mv).await;
                        return Ok(moved.then_some(TurnEnd::Moved));
                    }
                    RandomChoice::Reroll => break,
                    RandomChoice::Back => return Ok(None),
                    RandomChoice::Unknown => {}
                }
            }
        }
    }

    /// Pick and submit a random legal move. Returns whether it was accepted.
    async fn play_random(&mut self) -> bool {
        let Some(mv) = self.state.board.random_move(&mut self.rng) else {
            tracing::warn!("No legal move to play");
            return false;
        };
        if let Ok(san) = self.state.board.san(mv) {
            self.out.announce(&san, Channels::TEXT);
        }
        self.submit(mv).await
    }

    /// Apply a move locally and send it. Rolled back if the server refuses.
    async fn submit(&mut self, mv: Move) -> bool {
        let uci = match self.state.record_local_move(mv) {
            Ok(uci) => uci,
            Err(e) => {
                tracing::warn!("Refusing to submit: {}", e);
                self.out.line("Invalid move");
                return false;
            }
        };

        match self.service.make_move(&self.state.game_id, &uci).await {
            Ok(()) => {
                tracing::info!(%uci, "Move submitted");
                true
            }
            Err(e) => {
                tracing::warn!(%uci, "Move rejected: {}", e);
                self.state.rollback();
                self.out.line(&format!("Move rejected: {}", rejection_reason(&e)));
                false
            }
        }
    }

    async fn resign(&mut self) {
        self.state.resign();
        match self.service.resign(&self.state.game_id).await {
            Ok(()) => {
                tracing::info!("Resigned");
                self.out.line("You resigned");
            }
            Err(e) => {
                tracing::warn!("Resign failed: {}", e);
                self.out.line(&format!("Resign failed: {}", rejection_reason(&e)));
            }
        }
    }

    async fn offer_draw(&mut self) -> bool {
        match self.service.offer_draw(&self.state.game_id).await {
            Ok(()) => {
                tracing::info!("Draw offered");
                self.out.line("Draw offered");
                true
            }
            Err(e) => {
                tracing::warn!("Draw offer failed: {}", e);
                self.out.line(&format!("Draw offer failed: {}", rejection_reason(&e)));
                false
            }
        }
    }
}

/// White if the account is recorded as white, black otherwise.
fn color_for(account_id: &str, white_id: Option<&str>) -> PieceColor {
    match white_id {
        Some(id) if id.eq_ignore_ascii_case(account_id) => PieceColor::White,
        _ => PieceColor::Black,
    }
}

fn rejection_reason(error: &ClientError) -> String {
    match error {
        ClientError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn opponent_notice(gone: &OpponentGone) -> String {
    match (gone.gone, gone.claim_win_in_seconds) {
        (false, _) => "Opponent is back".to_string(),
        (true, Some(seconds)) => format!("Opponent left the game, you can claim victory in {}s", seconds),
        (true, None) => "Opponent left the game".to_string(),
    }
}
