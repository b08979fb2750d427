//! Session tracking
//!
//! Turns a stream of point-in-time observations ("is Live running?") into
//! one logical session with a stable start time. Short stops pause the
//! session and a later restart resumes it; a stop longer than the idle
//! reset threshold ends it.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::state::{
    parse_project_name, Observation, SessionSnapshot, UNKNOWN_PROJECT, UNTITLED_PROJECT,
};

/// Default idle gap after which a restart opens a new session
pub const DEFAULT_IDLE_RESET_SECS: i64 = 2 * 60 * 60;

/// Tracks a single session across polling ticks.
///
/// Owned by the poll loop and only ever driven sequentially.
#[derive(Debug)]
pub struct SessionTracker {
    is_active: bool,
    /// Set once the first session starts, never cleared afterwards
    session_start: Option<DateTime<Utc>>,
    accumulated_active: Duration,
    last_stop: Option<DateTime<Utc>>,
    idle_reset_threshold: Duration,
    project_name: Option<String>,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_IDLE_RESET_SECS))
    }
}

impl SessionTracker {
    pub fn new(idle_reset_threshold: Duration) -> Self {
        Self {
            is_active: false,
            session_start: None,
            accumulated_active: Duration::zero(),
            last_stop: None,
            idle_reset_threshold,
            project_name: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.session_start
    }

    pub fn accumulated_active(&self) -> Duration {
        self.accumulated_active
    }

    pub fn last_stop(&self) -> Option<DateTime<Utc>> {
        self.last_stop
    }

    /// Feed one observation taken now
    pub fn observe(&mut self, observation: Observation) -> SessionSnapshot {
        self.observe_at(Utc::now(), observation)
    }

    /// Feed one observation taken at `now`
    pub fn observe_at(&mut self, now: DateTime<Utc>, observation: Observation) -> SessionSnapshot {
        if !observation.running {
            if self.is_active {
                self.stop(now);
            }
            return self.snapshot(false);
        }

        if !self.is_active {
            self.start(now);
        }

        if let Some(title) = observation.title {
            let name = parse_project_name(&title);
            let name = if name.is_empty() {
                UNTITLED_PROJECT.to_string()
            } else {
                name
            };
            if self.project_name.as_deref() != Some(name.as_str()) {
                debug!(project = %name, "Project changed");
            }
            self.project_name = Some(name);
        }

        self.snapshot(true)
    }

    /// Active -> inactive: bank the segment and remember when it ended
    fn stop(&mut self, now: DateTime<Utc>) {
        if let Some(start) = self.session_start {
            // `start` already includes previously banked time
            self.accumulated_active = (now - start).max(self.accumulated_active);
        }
        self.last_stop = Some(now);
        self.is_active = false;

        info!(
            banked_secs = self.accumulated_active.num_seconds(),
            "Application stopped, session paused"
        );
    }

    /// Inactive -> active: open, resume, or reset the session
    fn start(&mut self, now: DateTime<Utc>) {
        let idle_expired = self
            .last_stop
            .is_some_and(|stopped| now - stopped > self.idle_reset_threshold);

        match self.session_start {
            _ if idle_expired => {
                info!("Idle threshold exceeded, starting a new session");
                self.session_start = Some(now);
                self.accumulated_active = Duration::zero();
            }
            None => {
                info!("Application started, new session");
                self.session_start = Some(now);
            }
            Some(_) => {
                info!(
                    banked_secs = self.accumulated_active.num_seconds(),
                    "Application restarted, resuming session"
                );
                self.session_start = Some(now - self.accumulated_active);
            }
        }

        self.is_active = true;
    }

    fn snapshot(&self, running: bool) -> SessionSnapshot {
        SessionSnapshot {
            running,
            project_name: self
                .project_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
            session_start: self.session_start,
            accumulated: self.accumulated_active,
        }
    }
}
