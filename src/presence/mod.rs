//! Rich presence module
//! Payload types, the Discord IPC transport and the publisher wrapping it

pub mod activity;
pub mod ipc;
pub mod publisher;
pub mod transport;

pub use activity::{Activity, ActivePresence, Assets, PresenceDescriptor, Timestamps, WaitingPresence};
pub use ipc::DiscordIpc;
pub use publisher::{ConnectionError, PresencePublisher, PublishError};
pub use transport::{PresenceTransport, TransportError};
