//! Presence transport trait

use async_trait::async_trait;

use super::activity::Activity;

/// Channel to the locally running chat client
#[async_trait]
pub trait PresenceTransport: Send {
    /// Open the channel and identify as `app_id`
    async fn login(&mut self, app_id: &str) -> Result<(), TransportError>;

    /// Replace the current activity
    async fn set_activity(&mut self, activity: &Activity) -> Result<(), TransportError>;

    /// Close the channel; a no-op when already closed
    async fn logout(&mut self);
}

/// Errors raised by a transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no Discord IPC endpoint found")]
    EndpointNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Discord closed the connection ({code}): {message}")]
    Closed { code: i64, message: String },

    #[error("transport is not open")]
    NotOpen,

    #[error("request timed out")]
    Timeout,

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("Discord rejected the request ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Whether the channel itself is gone and must be reopened
    pub fn is_disconnect(&self) -> bool {
        use std::io::ErrorKind;

        match self {
            TransportError::Closed { .. }
            | TransportError::NotOpen => true,
            TransportError::Io(e) => matches!(
                e.kind(),
                ErrorKind::BrokenPipe
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::NotConnected
                    | ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}
