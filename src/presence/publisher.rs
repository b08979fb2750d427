//! Presence publisher
//!
//! Wraps a transport with the connected/disconnected bookkeeping the poll
//! loop relies on for its reconnect policy.

use tracing::{debug, info, warn};

use super::activity::{Activity, ActivePresence, PresenceDescriptor, WaitingPresence};
use super::transport::{PresenceTransport, TransportError};

/// Failed to open the channel to the chat client
#[derive(Debug, thiserror::Error)]
#[error("failed to connect to Discord: {source}")]
pub struct ConnectionError {
    #[from]
    pub source: TransportError,
}

/// Failed to publish an activity
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Publish attempted while disconnected; nothing was sent
    #[error("Discord client not connected")]
    NotConnected,

    /// The channel broke while publishing; the publisher is now disconnected
    #[error("Discord disconnected: {0}")]
    Disconnected(#[source] TransportError),

    /// Any other failure; the connection is left as is
    #[error("failed to publish activity: {0}")]
    Transport(#[source] TransportError),
}

impl PublishError {
    pub fn needs_reconnect(&self) -> bool {
        matches!(self, PublishError::NotConnected | PublishError::Disconnected(_))
    }
}

pub struct PresencePublisher<T: PresenceTransport> {
    transport: T,
    app_id: String,
    connected: bool,
}

impl<T: PresenceTransport> PresencePublisher<T> {
    /// Create a publisher; starts disconnected
    pub fn new(transport: T, app_id: impl Into<String>) -> Self {
        Self {
            transport,
            app_id: app_id.into(),
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Establish the connection to Discord
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        self.transport.login(&self.app_id).await?;
        self.connected = true;
        info!("Connected to Discord as application {}", self.app_id);
        Ok(())
    }

    /// Close the connection; does nothing when not connected
    pub async fn disconnect(&mut self) {
        if self.connected {
            self.transport.logout().await;
            self.connected = false;
            debug!("Disconnected from Discord");
        }
    }

    pub async fn publish_active(&mut self, presence: &ActivePresence) -> Result<(), PublishError> {
        self.send(presence.to_activity()).await
    }

    pub async fn publish_waiting(&mut self, presence: &WaitingPresence) -> Result<(), PublishError> {
        self.send(presence.to_activity()).await
    }

    pub async fn publish(&mut self, descriptor: &PresenceDescriptor) -> Result<(), PublishError> {
        match descriptor {
            PresenceDescriptor::Active(active) => self.publish_active(active).await,
            PresenceDescriptor::Waiting(waiting) => self.publish_waiting(waiting).await,
        }
    }

    async fn send(&mut self, activity: Activity) -> Result<(), PublishError> {
        if !self.connected {
            return Err(PublishError::NotConnected);
        }

        match self.transport.set_activity(&activity).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_disconnect() => {
                warn!("Discord connection lost: {}", e);
                self.connected = false;
                Err(PublishError::Disconnected(e))
            }
            Err(e) => Err(PublishError::Transport(e)),
        }
    }
}
