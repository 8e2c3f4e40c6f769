//! The LeanKit client and its card, board and task operations.

mod boards;
mod cards;
mod types;

pub use boards::{DEFAULT_LANE_HISTORY_LIMIT, DEFAULT_LANE_HISTORY_OFFSET};
pub use types::{CardFilter, NewCard, PatchOp};

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::http::HttpClient;
use crate::retry::RetryPolicy;

/// Client for one LeanKit account.
///
/// Stateless beyond the shared HTTP connection pool; operations are plain
/// request/response calls and every one of them retries with backoff.
#[derive(Clone)]
pub struct Leankit {
    pub(crate) http: HttpClient,
}

impl Leankit {
    pub fn new(config: Config) -> Self {
        Self::with_policy(config, RetryPolicy::default())
    }

    pub fn with_policy(config: Config, policy: RetryPolicy) -> Self {
        Self {
            http: HttpClient::new(config, policy),
        }
    }

    /// Builds a client from `LEANKIT_URL`, `LEANKITUSERNAME` and
    /// `LEANKITPASSWORD`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

/// Response envelope of the card creation endpoint.
#[derive(Deserialize)]
pub(crate) struct CreatedCard {
    pub id: Value,
}

/// Response envelope wrapping a list of card documents.
#[derive(Deserialize)]
pub(crate) struct CardList {
    pub cards: Vec<Value>,
}

/// Response envelope of the older `/kanban/api` endpoints.
#[derive(Deserialize)]
pub(crate) struct ReplyEnvelope {
    #[serde(rename = "ReplyData")]
    pub reply_data: Vec<Value>,
}

impl ReplyEnvelope {
    /// The first reply record, or `Null` when the service sent none.
    pub(crate) fn into_first(self) -> Value {
        self.reply_data.into_iter().next().unwrap_or(Value::Null)
    }
}

/// The `id` of a card document, rendered for use in a URL path.
pub(crate) fn card_id_of(card: &Value) -> String {
    match &card["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
