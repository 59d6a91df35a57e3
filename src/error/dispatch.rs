//! Per-destination delivery errors.

use serenity::http::HttpError;
use thiserror::Error;

/// Failure of a single send, edit or delete call against one destination channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The destination cannot be reached and retrying will not help: the channel or
    /// message was deleted, or the bot lost permission. Also returned once transient
    /// retries are exhausted.
    #[error("Destination unavailable: {0}")]
    DestinationUnavailable(String),

    /// Rate limiting, a Discord server error or a network failure. Worth retrying
    /// after a backoff.
    #[error("Transient delivery failure: {0}")]
    Transient(String),
}

impl DispatchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Classifies a status code returned by Discord.
    ///
    /// 429 and 5xx are transient, every other unsuccessful status is permanent.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 429 || (500..600).contains(&status) {
            Self::Transient(format!("{} ({})", message, status))
        } else {
            Self::DestinationUnavailable(format!("{} ({})", message, status))
        }
    }
}

impl From<serenity::Error> for DispatchError {
    fn from(err: serenity::Error) -> Self {
        match err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => Self::from_status(
                response.status_code.as_u16(),
                response.error.message.clone(),
            ),
            serenity::Error::Http(HttpError::Request(e)) => Self::Transient(e.to_string()),
            serenity::Error::Io(e) => Self::Transient(e.to_string()),
            other => Self::DestinationUnavailable(other.to_string()),
        }
    }
}
