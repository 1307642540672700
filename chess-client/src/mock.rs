//! Mock BoardService implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::traits::{BoardService, EventStream};
use crate::types::{Account, GameEvent, GamePlayers};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::{Arc, Mutex};

type Responder<T> = Box<dyn Fn() -> ClientResult<T> + Send>;

/// Mock service for testing - only compiled in test mode or with mock feature
///
/// Clones share the same configuration and call log, so a test can keep one
/// clone for assertions and hand the other to the code under test.
#[derive(Clone)]
pub struct MockBoardService {
    responses: Arc<Mutex<MockResponses>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Default)]
struct MockResponses {
    account: Option<Responder<Account>>,
    create_challenge: Option<Responder<String>>,
    game_players: Option<Responder<GamePlayers>>,
    events: Option<Vec<ClientResult<GameEvent>>>,
    make_move: Option<Responder<()>>,
    resign: Option<Responder<()>>,
    offer_draw: Option<Responder<()>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Account,
    CreateAiChallenge { level: u8 },
    CreateOpenChallenge,
    GamePlayers { game_id: String },
    StreamGame { game_id: String },
    MakeMove { game_id: String, uci: String },
    Resign { game_id: String },
    OfferDraw { game_id: String },
}

impl Default for MockBoardService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBoardService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure account response
    pub fn with_account(self, id: &str, username: &str) -> Self {
        let account = Account {
            id: id.to_string(),
            username: username.to_string(),
        };
        self.responses.lock().unwrap().account = Some(Box::new(move || Ok(account.clone())));
        self
    }

    /// Configure the id returned by both challenge endpoints
    pub fn with_challenge_id(self, game_id: &str) -> Self {
        let game_id = game_id.to_string();
        self.responses.lock().unwrap().create_challenge = Some(Box::new(move || Ok(game_id.clone())));
        self
    }

    /// Configure game export response
    pub fn with_players(self, white_id: Option<&str>, black_id: Option<&str>) -> Self {
        let players = GamePlayers {
            white_id: white_id.map(str::to_string),
            black_id: black_id.map(str::to_string),
        };
        self.responses.lock().unwrap().game_players = Some(Box::new(move || Ok(players.clone())));
        self
    }

    /// Events delivered by the next `stream_game` call, then the stream ends
    pub fn with_events(self, events: Vec<GameEvent>) -> Self {
        self.responses.lock().unwrap().events = Some(events.into_iter().map(Ok).collect());
        self
    }

    /// Like `with_events`, but items may be errors
    pub fn with_event_results(self, events: Vec<ClientResult<GameEvent>>) -> Self {
        self.responses.lock().unwrap().events = Some(events);
        self
    }

    /// Configure make_move response
    pub fn with_make_move_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<()> + Send + 'static,
    {
        self.responses.lock().unwrap().make_move = Some(Box::new(f));
        self
    }

    /// Configure resign response
    pub fn with_resign_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<()> + Send + 'static,
    {
        self.responses.lock().unwrap().resign = Some(Box::new(f));
        self
    }

    /// Configure offer_draw response
    pub fn with_offer_draw_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<()> + Send + 'static,
    {
        self.responses.lock().unwrap().offer_draw = Some(Box::new(f));
        self
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Moves submitted so far, in UCI
    pub fn submitted_moves(&self) -> Vec<String> {
        self.get_calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::MakeMove { uci, .. } => Some(uci),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BoardService for MockBoardService {
    async fn account(&self) -> ClientResult<Account> {
        self.record(MockCall::Account);

        let responses = self.responses.lock().unwrap();
        match responses.account {
            Some(ref f) => f(),
            None => Err(ClientError::NotConfigured("account".to_string())),
        }
    }

    async fn create_ai_challenge(&self, level: u8) -> ClientResult<String> {
        self.record(MockCall::CreateAiChallenge { level });

        let responses = self.responses.lock().unwrap();
        match responses.create_challenge {
            Some(ref f) => f(),
            None => Err(ClientError::NotConfigured("create_ai_challenge".to_string())),
        }
    }

    async fn create_open_challenge(&self) -> ClientResult<String> {
        self.record(MockCall::CreateOpenChallenge);

        let responses = self.responses.lock().unwrap();
        match responses.create_challenge {
            Some(ref f) => f(),
            None => Err(ClientError::NotConfigured("create_open_challenge".to_string())),
        }
    }

    async fn game_players(&self, game_id: &str) -> ClientResult<GamePlayers> {
        self.record(MockCall::GamePlayers {
            game_id: game_id.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        match responses.game_players {
            Some(ref f) => f(),
            None => Err(ClientError::NotConfigured("game_players".to_string())),
        }
    }

    async fn stream_game(&self, game_id: &str) -> ClientResult<EventStream> {
        self.record(MockCall::StreamGame {
            game_id: game_id.to_string(),
        });

        let events = self
            .responses
            .lock()
            .unwrap()
            .events
            .take()
            .ok_or_else(|| ClientError::NotConfigured("stream_game".to_string()))?;
        Ok(futures::stream::iter(events).boxed())
    }

    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<()> {
        self.record(MockCall::MakeMove {
            game_id: game_id.to_string(),
            uci: uci.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        match responses.make_move {
            Some(ref f) => f(),
            None => Ok(()),
        }
    }

    async fn resign(&self, game_id: &str) -> ClientResult<()> {
        self.record(MockCall::Resign {
            game_id: game_id.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        match responses.resign {
            Some(ref f) => f(),
            None => Ok(()),
        }
    }

    async fn offer_draw(&self, game_id: &str) -> ClientResult<()> {
        self.record(MockCall::OfferDraw {
            game_id: game_id.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        match responses.offer_draw {
            Some(ref f) => f(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameState;

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockBoardService::new().with_account("alice", "Alice");
        let handle = mock.clone();

        assert_eq!(mock.account().await.unwrap().username, "Alice");
        mock.make_move("g1", "e2e4").await.unwrap();

        assert_eq!(
            handle.get_calls(),
            vec![
                MockCall::Account,
                MockCall::MakeMove {
                    game_id: "g1".to_string(),
                    uci: "e2e4".to_string()
                }
            ]
        );
        assert_eq!(handle.submitted_moves(), vec!["e2e4"]);
    }

    #[tokio::test]
    async fn test_stream_yields_configured_events_once() {
        let mock = MockBoardService::new().with_events(vec![GameEvent::GameState(GameState::default())]);

        let events: Vec<_> = mock.stream_game("g1").await.unwrap().collect().await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            mock.stream_game("g1").await,
            Err(ClientError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_account_fails() {
        let mock = MockBoardService::new();
        assert!(matches!(
            mock.account().await,
            Err(ClientError::NotConfigured(_))
        ));
    }
}
