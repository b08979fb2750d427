//! Ableton Presence - Discord rich presence for Ableton Live sessions

pub mod cli;
pub mod config;
pub mod core;
pub mod monitor;
pub mod presence;
