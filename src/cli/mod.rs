//! CLI module

pub mod commands;
pub mod interactive;

pub fn run() -> anyhow::Result<()> {
    commands::run()
}
