//! Window title probe backed by AppleScript
//!
//! Live exposes no API for its open set, so the project name comes from the
//! front window title. Several scripts are tried in order because the
//! scripting target differs between editions and System Events access may
//! be denied.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::monitor_trait::TitleProbe;

/// AppleScript's rendering of a missing value
const MISSING_VALUE: &str = "missing value";

/// Executes one AppleScript snippet
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Raw stdout of a successful run, `None` on any failure
    async fn run(&self, script: &str) -> Option<String>;
}

/// Runs scripts through `osascript -e`
pub struct Osascript {
    timeout: Duration,
}

impl Osascript {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ScriptRunner for Osascript {
    async fn run(&self, script: &str) -> Option<String> {
        let output = Command::new("osascript")
            .args(["-e", script])
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(o)) if o.status.success() => Some(String::from_utf8_lossy(&o.stdout).into_owned()),
            Ok(Ok(o)) => {
                debug!("osascript exited with {}", o.status);
                None
            }
            Ok(Err(e)) => {
                debug!("osascript failed to run: {}", e);
                None
            }
            Err(_) => {
                debug!("osascript timed out after {:?}", self.timeout);
                None
            }
        }
    }
}

pub struct AppleScriptTitleProbe<R = Osascript> {
    scripts: Vec<String>,
    runner: R,
}

impl AppleScriptTitleProbe<Osascript> {
    pub fn new(application_name: &str, process_pattern: &str, timeout: Duration) -> Self {
        Self::with_runner(application_name, process_pattern, Osascript::new(timeout))
    }
}

impl<R: ScriptRunner> AppleScriptTitleProbe<R> {
    /// Build the strategy list for the given application name
    pub fn with_runner(application_name: &str, process_pattern: &str, runner: R) -> Self {
        let scripts = vec![
            format!(
                r#"tell application "{}" to get name of front window"#,
                application_name
            ),
            format!(
                r#"tell application "System Events" to get name of front window of application process "{}""#,
                process_pattern
            ),
            format!(
                r#"tell application "System Events" to get name of front window of first application process whose name contains "{}""#,
                process_pattern
            ),
        ];

        Self { scripts, runner }
    }

    /// Scripts in the order they are tried
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }
}

/// Normalize raw script output, treating blanks and missing values as absent
pub fn clean_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    if title.is_empty() || title == MISSING_VALUE {
        return None;
    }
    Some(title.to_string())
}

#[async_trait]
impl<R: ScriptRunner> TitleProbe for AppleScriptTitleProbe<R> {
    async fn current_title(&self) -> Option<String> {
        for script in &self.scripts {
            if let Some(title) = self.runner.run(script).await.as_deref().and_then(clean_title) {
                return Some(title);
            }
        }
        None
    }
}
