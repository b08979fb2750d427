//! Interactive command interpreter reading line-oriented input

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::config::SharedConfig;
use crate::core::Shutdown;

pub const HELP: &str = "Commands:\n  status <message> - Set custom status\n  quit             - Exit the program";

pub const STATUS_USAGE: &str = "Please provide a status message. Usage: status <message>";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `status <message>`, message already trimmed and non-empty
    Status(String),
    /// `status` with nothing after it
    MissingStatus,
    /// `quit` or `exit`
    Quit,
    /// Blank line
    Empty,
    /// Anything unrecognized
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));

        match (head, rest.trim()) {
            ("status", "") => Command::MissingStatus,
            ("status", message) => Command::Status(message.to_string()),
            ("quit" | "exit", "") => Command::Quit,
            _ => Command::Help,
        }
    }
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command, printing the user-facing reply
pub async fn execute(command: Command, config: &SharedConfig) -> Flow {
    match command {
        Command::Empty => {}
        Command::Status(message) => match config.set_custom_status(&message).await {
            Ok(status) => {
                info!(status = %status, "Custom status changed");
                println!("Status updated to: {}", status);
            }
            Err(_) => println!("{}", STATUS_USAGE),
        },
        Command::MissingStatus => println!("{}", STATUS_USAGE),
        Command::Quit => {
            println!("Exiting...");
            return Flow::Quit;
        }
        Command::Help => println!("{}", HELP),
    }
    Flow::Continue
}

/// Read commands until `quit`, end of input or shutdown
pub async fn run_command_loop<R>(reader: R, config: SharedConfig, shutdown: Shutdown) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut signal = shutdown.subscribe();

    loop {
        let line = tokio::select! {
            _ = signal.wait() => return Ok(()),
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            debug!("Command input closed");
            return Ok(());
        };

        if execute(Command::parse(&line), &config).await == Flow::Quit {
            shutdown.trigger();
            return Ok(());
        }
    }
}
