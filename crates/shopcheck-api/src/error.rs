//! Error types for the contract-test helpers.
//!
//! Every failure is surfaced to the calling test: transport errors, a status
//! code other than the one the endpoint promises, and payloads that do not
//! match the DTO shape. Nothing here retries or recovers.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// A response payload did not have the expected shape.
#[derive(Debug, Error)]
#[error("invalid {entity}{}: {reason}", describe_index(.index))]
pub struct SchemaValidationError {
    /// What was being parsed (`"product"`, `"cart item list"`, ...).
    pub entity: &'static str,
    /// Position inside a list payload, when the offending value was an element.
    pub index: Option<usize>,
    pub reason: String,
    #[source]
    pub source: Option<serde_json::Error>,
}

impl SchemaValidationError {
    pub(crate) fn from_serde(entity: &'static str, source: serde_json::Error) -> Self {
        Self {
            entity,
            index: None,
            reason: source.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn shape(entity: &'static str, reason: impl Into<String>) -> Self {
        Self {
            entity,
            index: None,
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

fn describe_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at index {i}"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {actual}, expected {expected}: {body}")]
    UnexpectedStatus {
        method: Method,
        url: String,
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
