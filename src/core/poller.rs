//! Presence poll loop
//!
//! Each tick: probes -> tracker -> publisher. Errors never leave a tick.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::SharedConfig;
use crate::monitor::{Observation, ProcessProbe, SessionSnapshot, SessionTracker, TitleProbe};
use crate::presence::{PresenceDescriptor, PresencePublisher, PresenceTransport, PublishError};

use super::shutdown::ShutdownSignal;

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub snapshot: SessionSnapshot,
    pub descriptor: PresenceDescriptor,
    /// Whether the descriptor reached Discord
    pub published: bool,
}

pub struct Poller<T: PresenceTransport> {
    config: SharedConfig,
    process: Box<dyn ProcessProbe>,
    titles: Box<dyn TitleProbe>,
    tracker: SessionTracker,
    publisher: PresencePublisher<T>,
    interval: Duration,
}

impl<T: PresenceTransport> Poller<T> {
    pub fn new(
        config: SharedConfig,
        process: Box<dyn ProcessProbe>,
        titles: Box<dyn TitleProbe>,
        tracker: SessionTracker,
        publisher: PresencePublisher<T>,
        interval: Duration,
    ) -> Self {
        Self {
            config,
            process,
            titles,
            tracker,
            publisher,
            interval,
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn publisher(&self) -> &PresencePublisher<T> {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut PresencePublisher<T> {
        &mut self.publisher
    }

    /// Poll until shutdown is requested, then disconnect.
    ///
    /// A tick in flight when shutdown arrives is abandoned.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> PresencePublisher<T> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Polling every {:?}", self.interval);

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = shutdown.wait() => {
                            debug!("Shutdown requested mid-tick");
                            break;
                        }
                        _ = self.tick() => {}
                    }
                }
            }
        }

        info!("Shutting down...");
        self.publisher.disconnect().await;
        self.publisher
    }

    pub async fn tick(&mut self) -> TickReport {
        self.tick_at(Utc::now()).await
    }

    /// One probe/track/publish round as of `now`
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickReport {
        if !self.publisher.is_connected() {
            self.reconnect().await;
        }

        let observation = self.observe().await;
        let snapshot = self.tracker.observe_at(now, observation);

        let config = self.config.snapshot().await;
        let descriptor = PresenceDescriptor::from_snapshot(&snapshot, &config, now);

        let published = if self.publisher.is_connected() {
            match self.publisher.publish(&descriptor).await {
                Ok(()) => {
                    debug!(active = descriptor.is_active(), "Presence updated");
                    true
                }
                Err(e) => {
                    self.handle_publish_error(e).await;
                    false
                }
            }
        } else {
            debug!("Skipping presence update while disconnected");
            false
        };

        TickReport {
            snapshot,
            descriptor,
            published,
        }
    }

    async fn observe(&self) -> Observation {
        if !self.process.is_running().await {
            return Observation::stopped();
        }
        Observation::running(self.titles.current_title().await)
    }

    async fn handle_publish_error(&mut self, e: PublishError) {
        if e.needs_reconnect() {
            warn!("{}; reconnecting on next tick", e);
            return;
        }

        warn!("{}; reconnecting", e);
        self.reconnect().await;
    }

    async fn reconnect(&mut self) {
        self.publisher.disconnect().await;
        match self.publisher.connect().await {
            Ok(()) => info!("Reconnected to Discord"),
            Err(e) => error!("Failed to reconnect to Discord: {}", e),
        }
    }
}
