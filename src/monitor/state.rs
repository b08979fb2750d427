//! Observation and session snapshot definitions

use chrono::{DateTime, Duration, Utc};

/// Shown when no title has ever been read
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Shown when a title was read but holds no project name
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Separator between the project name and the app branding in Live's title
const TITLE_SEPARATOR: &str = " - ";

/// One point-in-time reading of the probes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// Whether the target process is alive
    pub running: bool,
    /// Front window title; `None` when the probe found nothing
    pub title: Option<String>,
}

impl Observation {
    pub fn running(title: Option<String>) -> Self {
        Self {
            running: true,
            title,
        }
    }

    pub fn stopped() -> Self {
        Self {
            running: false,
            title: None,
        }
    }
}

/// What the tracker reports after each observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Whether the tracker considers the application in use
    pub running: bool,
    /// Project name derived from the window title
    pub project_name: String,
    /// Logical session start, shifted back by banked active time
    pub session_start: Option<DateTime<Utc>>,
    /// Active time banked from completed segments
    pub accumulated: Duration,
}

impl SessionSnapshot {
    /// Session duration as displayed, zero before the first session
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.session_start {
            Some(start) if now > start => now - start,
            _ => Duration::zero(),
        }
    }
}

/// Extract the project name from a title like `"My Track - Ableton Live 12 Suite"`.
///
/// Returns an empty string when the title carries no name; callers map that
/// to [`UNTITLED_PROJECT`].
pub fn parse_project_name(window_title: &str) -> String {
    let name = match window_title.split_once(TITLE_SEPARATOR) {
        Some((name, _)) => name,
        None => window_title,
    };
    name.trim().to_string()
}
