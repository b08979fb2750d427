//! Process probe backed by `pgrep`

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::monitor_trait::ProcessProbe;

/// Checks for a running process whose command line matches a pattern
pub struct PgrepProbe {
    pattern: String,
    timeout: Duration,
}

impl PgrepProbe {
    pub fn new(pattern: impl Into<String>, timeout: Duration) -> Self {
        Self {
            pattern: pattern.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ProcessProbe for PgrepProbe {
    async fn is_running(&self) -> bool {
        let output = Command::new("pgrep")
            .args(["-f", &self.pattern])
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(o)) => o.status.success(),
            Ok(Err(e)) => {
                debug!("pgrep failed to run: {}", e);
                false
            }
            Err(_) => {
                debug!("pgrep timed out after {:?}", self.timeout);
                false
            }
        }
    }
}
