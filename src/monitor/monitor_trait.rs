//! Probe traits
//!
//! Probes are best-effort sources of a single fact. They never fail:
//! any underlying error is reported as absence (`false` / `None`).

use async_trait::async_trait;

/// Answers "is the target application running right now?"
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    async fn is_running(&self) -> bool;
}

/// Answers "what is the target application's front window title?"
#[async_trait]
pub trait TitleProbe: Send + Sync {
    async fn current_title(&self) -> Option<String>;
}
