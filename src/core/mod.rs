//! Orchestration: the poll loop and shutdown plumbing

pub mod poller;
pub mod shutdown;

pub use poller::{Poller, TickReport};
pub use shutdown::{wait_for_signal, Shutdown, ShutdownSignal};
