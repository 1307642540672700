//! Lichess Board API client over HTTPS

use crate::error::{ClientError, ClientResult};
use crate::ndjson::NdjsonDecoder;
use crate::traits::{BoardService, EventStream};
use crate::types::{Account, ApiErrorBody, ChallengeCreated, GameEvent, GameExport, GamePlayers};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::Stream;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};

/// Network client for the Board API, authenticated with a personal token
pub struct LichessClient {
    http: Client,
    base_url: String,
    token: String,
}

impl LichessClient {
    /// Build a client for `base_url` (e.g. `https://lichess.org`)
    pub fn new(base_url: &str, token: &str) -> ClientResult<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ClientError::InvalidAddress(base_url.to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("chesstty/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str) -> ClientResult<Response> {
        tracing::debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(response).await
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> ClientResult<Response> {
        tracing::debug!(path, "POST form");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .form(form)
            .send()
            .await?;
        check(response).await
    }

    async fn get(&self, path: &str, accept: &str) -> ClientResult<Response> {
        tracing::debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .header(ACCEPT, accept)
            .send()
            .await?;
        check(response).await
    }
}

/// Turn non-2xx answers into `ClientError::Api`, using the body's `error`
/// field when there is one.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    tracing::warn!(status = status.as_u16(), %message, "Board API request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode an NDJSON response body into game events as chunks arrive.
fn event_stream(mut response: Response) -> impl Stream<Item = ClientResult<GameEvent>> + Send {
    try_stream! {
        let mut decoder = NdjsonDecoder::new();
        while let Some(chunk) = response.chunk().await? {
            for line in decoder.push(&chunk) {
                tracing::trace!(%line, "stream line");
                yield GameEvent::from_json(&line)?;
            }
        }
        if let Some(line) = decoder.finish() {
            yield GameEvent::from_json(&line)?;
        }
        tracing::debug!("Game stream closed by server");
    }
}

#[async_trait]
impl BoardService for LichessClient {
    async fn account(&self) -> ClientResult<Account> {
        let response = self.get("/api/account", "application/json").await?;
        Ok(response.json().await?)
    }

    async fn create_ai_challenge(&self, level: u8) -> ClientResult<String> {
        let response = self
            .post_form("/api/challenge/ai", &[("level", level.to_string())])
            .await?;
        let created: ChallengeCreated = response.json().await?;
        created
            .into_id()
            .ok_or_else(|| ClientError::InvalidData("challenge response without id".to_string()))
    }

    async fn create_open_challenge(&self) -> ClientResult<String> {
        let response = self.post_form("/api/challenge/open", &[]).await?;
        let created: ChallengeCreated = response.json().await?;
        created
            .into_id()
            .ok_or_else(|| ClientError::InvalidData("challenge response without id".to_string()))
    }

    async fn game_players(&self, game_id: &str) -> ClientResult<GamePlayers> {
        let response = self
            .get(&format!("/game/export/{}", game_id), "application/json")
            .await?;
        let export: GameExport = response.json().await?;
        Ok(export.into())
    }

    async fn stream_game(&self, game_id: &str) -> ClientResult<EventStream> {
        let response = self
            .get(
                &format!("/api/board/game/stream/{}", game_id),
                "application/x-ndjson",
            )
            .await?;
        Ok(Box::pin(event_stream(response)))
    }

    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<()> {
        self.post(&format!("/api/board/game/{}/move/{}", game_id, uci))
            .await?;
        Ok(())
    }

    async fn resign(&self, game_id: &str) -> ClientResult<()> {
        self.post(&format!("/api/board/game/{}/resign", game_id))
            .await?;
        Ok(())
    }

    async fn offer_draw(&self, game_id: &str) -> ClientResult<()> {
        self.post(&format!("/api/board/game/{}/draw/yes", game_id))
            .await?;
        Ok(())
    }
}
