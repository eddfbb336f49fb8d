#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Client side of the level store API.
//!
//! [`LevelStore`] is the seam the editor session calls into; [`HttpLevelStore`]
//! implements it with blocking HTTP requests. Requests are never retried.

use board_maker_core::{LevelId, LevelSummary};
use board_maker_document::LevelDocument;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Base URL used when no store URL is configured.
pub const DEFAULT_STORE_URL: &str = "http://localhost:5000/api";

/// Operations the editor needs from a level store.
pub trait LevelStore {
    /// Saves a level document.
    fn save(&self, document: &LevelDocument) -> Result<(), StoreError>;

    /// Lists saved levels, most recent first.
    fn list(&self) -> Result<Vec<LevelSummary>, StoreError>;

    /// Fetches the raw JSON of a saved level; callers validate it before use.
    fn fetch(&self, level_id: &LevelId) -> Result<Value, StoreError>;
}

/// Failures reported by a level store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("could not reach the level store: {0}")]
    NetworkFailure(String),
    /// The store rejected the request because required fields were missing or invalid.
    #[error("the level store rejected the level: {0}")]
    ValidationFailure(String),
    /// The store failed while saving or querying.
    #[error("the level store failed with status {status}: {message}")]
    PersistenceFailure {
        /// HTTP status returned by the store.
        status: u16,
        /// Error message returned by the store.
        message: String,
    },
    /// The requested level does not exist.
    #[error("level '{0}' was not found")]
    NotFound(LevelId),
    /// The store answered with a body that could not be decoded.
    #[error("the level store sent an unreadable response: {0}")]
    InvalidResponse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Level store reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpLevelStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpLevelStore {
    /// Creates a client for the API mounted at `base_url`, e.g. `http://localhost:5000/api`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url,
        }
    }

    /// Base URL the client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn levels_url(&self) -> String {
        format!("{}/levels", self.base_url)
    }

    fn level_url(&self, level_id: &LevelId) -> String {
        format!(
            "{}/levels/{}",
            self.base_url,
            urlencoding::encode(level_id.as_str())
        )
    }
}

impl Default for HttpLevelStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_URL)
    }
}

impl LevelStore for HttpLevelStore {
    fn save(&self, document: &LevelDocument) -> Result<(), StoreError> {
        let url = self.levels_url();
        debug!("POST {url} for {}", document.level_id);
        let _response = self
            .agent
            .post(&url)
            .send_json(document)
            .map_err(|error| convert_error(error, None))?;
        info!("saved level {}", document.level_id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<LevelSummary>, StoreError> {
        let url = self.levels_url();
        debug!("GET {url}");
        self.agent
            .get(&url)
            .call()
            .map_err(|error| convert_error(error, None))?
            .into_json::<Vec<LevelSummary>>()
            .map_err(|error| StoreError::InvalidResponse(error.to_string()))
    }

    fn fetch(&self, level_id: &LevelId) -> Result<Value, StoreError> {
        let url = self.level_url(level_id);
        debug!("GET {url}");
        self.agent
            .get(&url)
            .call()
            .map_err(|error| convert_error(error, Some(level_id)))?
            .into_json::<Value>()
            .map_err(|error| StoreError::InvalidResponse(error.to_string()))
    }
}

fn convert_error(error: ureq::Error, level_id: Option<&LevelId>) -> StoreError {
    match (error, level_id) {
        (ureq::Error::Status(404, _), Some(level_id)) => StoreError::NotFound(level_id.clone()),
        (ureq::Error::Status(status, response), _) => {
            let message = response
                .into_json::<ErrorBody>()
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            if status == 400 {
                StoreError::ValidationFailure(message)
            } else {
                StoreError::PersistenceFailure { status, message }
            }
        }
        (ureq::Error::Transport(transport), _) => {
            StoreError::NetworkFailure(transport.to_string())
        }
    }
}
