//! Ableton monitoring module
//! Probes the running application and tracks the logical session

pub mod monitor_trait;
pub mod process;
pub mod state;
pub mod title;
pub mod tracker;

pub use monitor_trait::{ProcessProbe, TitleProbe};
pub use process::PgrepProbe;
pub use state::{
    parse_project_name, Observation, SessionSnapshot, UNKNOWN_PROJECT, UNTITLED_PROJECT,
};
pub use title::{clean_title, AppleScriptTitleProbe, Osascript, ScriptRunner};
pub use tracker::SessionTracker;
