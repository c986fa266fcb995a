//! Error types shared across the crate.

use thiserror::Error;
use time::Date;

/// Input rejected before any network call is made.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: Date, end: Date },
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("negative {field}: {value}")]
    NegativeRate { field: &'static str, value: f64 },
}

/// Anything that can go wrong talking to the ToolShare API.
///
/// Nothing here is fatal: every failure is a value the caller can render
/// inline and recover from. There is no automatic retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response; `message` is the server's `error` field verbatim.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// True for a 401 response, signalling the session is gone and the
    /// caller should prompt for a fresh login.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}
