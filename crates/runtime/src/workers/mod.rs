//! Worker tasks that back the session orchestration.
//!
//! The session worker owns the phase machine and is the only task that talks
//! to the game server.

mod session;

pub use session::{Command, SessionWorker, SettleWindows};
