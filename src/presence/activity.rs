//! Activity payload and presence descriptors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::monitor::SessionSnapshot;

pub const LARGE_IMAGE_KEY: &str = "ableton-logo";
pub const SMALL_IMAGE_KEY: &str = "music-note";
pub const SMALL_IMAGE_TEXT: &str = "Active";
pub const WAITING_DETAILS: &str = "Not currently making music";

/// Rich presence activity as sent to the chat client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<Assets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
}

/// Unix timestamps in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
}

impl Timestamps {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start.timestamp_millis()),
        }
    }
}

/// Presence while Live is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePresence {
    pub project_name: String,
    pub custom_status: String,
    pub app_label: String,
    pub session_start: Option<DateTime<Utc>>,
}

impl ActivePresence {
    pub fn to_activity(&self) -> Activity {
        Activity {
            details: Some(format!("🎵 {}", self.project_name)),
            state: Some(format!("🔥 {}", self.custom_status)),
            assets: Some(Assets {
                large_image: Some(LARGE_IMAGE_KEY.to_string()),
                large_text: Some(self.app_label.clone()),
                small_image: Some(SMALL_IMAGE_KEY.to_string()),
                small_text: Some(SMALL_IMAGE_TEXT.to_string()),
            }),
            timestamps: self.session_start.map(Timestamps::starting_at),
        }
    }
}

/// Presence while waiting for Live to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingPresence {
    pub app_label: String,
    pub since: DateTime<Utc>,
}

impl WaitingPresence {
    pub fn to_activity(&self) -> Activity {
        Activity {
            details: Some(WAITING_DETAILS.to_string()),
            state: Some(format!("Waiting for {}...", self.app_label)),
            assets: Some(Assets {
                large_image: Some(LARGE_IMAGE_KEY.to_string()),
                large_text: Some(self.app_label.clone()),
                small_image: None,
                small_text: None,
            }),
            timestamps: Some(Timestamps::starting_at(self.since)),
        }
    }
}

/// What to show for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceDescriptor {
    Active(ActivePresence),
    Waiting(WaitingPresence),
}

impl PresenceDescriptor {
    pub fn from_snapshot(snapshot: &SessionSnapshot, config: &AppConfig, now: DateTime<Utc>) -> Self {
        if snapshot.running {
            PresenceDescriptor::Active(ActivePresence {
                project_name: snapshot.project_name.clone(),
                custom_status: config.custom_status.clone(),
                app_label: config.app_label.clone(),
                session_start: snapshot.session_start,
            })
        } else {
            PresenceDescriptor::Waiting(WaitingPresence {
                app_label: config.app_label.clone(),
                since: snapshot.session_start.unwrap_or(now),
            })
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PresenceDescriptor::Active(_))
    }

    pub fn to_activity(&self) -> Activity {
        match self {
            PresenceDescriptor::Active(active) => active.to_activity(),
            PresenceDescriptor::Waiting(waiting) => waiting.to_activity(),
        }
    }
}
