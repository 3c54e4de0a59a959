//! reqwest implementation of [`KanbanApi`].

use async_trait::async_trait;
use kanban_core::{AppConfig, KanbanError, KanbanResult};
use kanban_domain::{
    Board, BoardId, CardId, CardPatch, Column, ColumnId, ColumnPatch, NewBoard, NewCard,
    NewColumn,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::endpoints;
use crate::session::Session;
use crate::traits::KanbanApi;

const JSON: &str = "application/json";

/// Pull a human-readable message out of an error body.
///
/// Tries `detail`, then `message`, then the first `non_field_errors` entry,
/// then falls back to the raw body.
fn extract_error_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = json.get("detail").and_then(|v| v.as_str()) {
            return detail.to_string();
        }
        if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
        if let Some(first) = json
            .get("non_field_errors")
            .and_then(|v| v.as_array())
            .and_then(|errors| errors.first())
            .and_then(|v| v.as_str())
        {
            return first.to_string();
        }
    }
    body.trim().to_string()
}

fn transport_error(e: reqwest::Error) -> KanbanError {
    if e.is_decode() {
        KanbanError::Serialization(e.to_string())
    } else {
        KanbanError::Transport(e.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpKanbanApi {
    client: Client,
    base_url: String,
    authorization: Option<String>,
}

impl HttpKanbanApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> KanbanResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KanbanError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: None,
        })
    }

    /// Client for the configured service, authenticated when a session exists.
    pub fn from_config(config: &AppConfig, session: Option<&Session>) -> KanbanResult<Self> {
        let api = Self::new(
            config.effective_api_url(),
            Duration::from_secs(config.effective_timeout_secs()),
        )?;
        Ok(match session {
            Some(session) => api.with_token(config.effective_auth_scheme(), &session.token),
            None => api,
        })
    }

    pub fn with_token(mut self, scheme: &str, token: &str) -> Self {
        self.authorization = Some(format!("{} {}", scheme, token));
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header(CONTENT_TYPE, JSON);
        match &self.authorization {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> KanbanResult<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        Self::check_response(response).await
    }

    /// Map a non-2xx response to a `KanbanError`.
    async fn check_response(response: Response) -> KanbanResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_error_detail(&body);
        tracing::debug!("Request failed with {}: {}", code, detail);

        match code {
            401 => Err(KanbanError::Unauthenticated(if detail.is_empty() {
                "session expired or invalid".to_string()
            } else {
                detail
            })),
            _ => Err(KanbanError::Rejected {
                status: code,
                detail,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> KanbanResult<T> {
        let response = self.send(builder).await?;
        response.json().await.map_err(transport_error)
    }

    /// Exchange credentials for a token. Does not require a session.
    pub async fn login(&self, username: &str, password: &str) -> KanbanResult<Session> {
        let builder = self
            .client
            .post(self.url(endpoints::LOGIN))
            .header(CONTENT_TYPE, JSON)
            .json(&Credentials { username, password });
        let session: Session = self.get_json(builder).await?;
        tracing::info!("Logged in as {}", username);
        Ok(session)
    }
}

#[async_trait]
impl KanbanApi for HttpKanbanApi {
    async fn list_boards(&self) -> KanbanResult<Vec<Board>> {
        self.get_json(self.request(Method::GET, endpoints::BOARDS))
            .await
    }

    async fn create_board(&self, board: &NewBoard) -> KanbanResult<Board> {
        self.get_json(self.request(Method::POST, endpoints::BOARDS).json(board))
            .await
    }

    async fn deactivate_board(&self, id: BoardId) -> KanbanResult<()> {
        self.send(self.request(Method::DELETE, &endpoints::board(id)))
            .await?;
        Ok(())
    }

    async fn fetch_columns(&self, board: BoardId) -> KanbanResult<Vec<Column>> {
        let builder = self
            .request(Method::GET, endpoints::COLUMNS)
            .query(&[("board", board)]);
        self.get_json(builder).await
    }

    async fn create_column(&self, column: &NewColumn) -> KanbanResult<()> {
        self.send(self.request(Method::POST, endpoints::COLUMNS).json(column))
            .await?;
        Ok(())
    }

    async fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> KanbanResult<()> {
        tracing::debug!("PATCH column {}: {:?}", id, patch);
        self.send(
            self.request(Method::PATCH, &endpoints::column(id))
                .json(patch),
        )
        .await?;
        Ok(())
    }

    async fn create_card(&self, card: &NewCard) -> KanbanResult<()> {
        self.send(self.request(Method::POST, endpoints::CARDS).json(card))
            .await?;
        Ok(())
    }

    async fn update_card(&self, id: CardId, patch: &CardPatch) -> KanbanResult<()> {
        tracing::debug!("PATCH card {}: {:?}", id, patch);
        self.send(self.request(Method::PATCH, &endpoints::card(id)).json(patch))
            .await?;
        Ok(())
    }

    async fn delete_card(&self, id: CardId) -> KanbanResult<()> {
        self.send(self.request(Method::DELETE, &endpoints::card(id)))
            .await?;
        Ok(())
    }
}
