#![deny(warnings)]
pub mod controller;
pub mod logging;
pub mod session;

pub use controller::{BotMove, GameController, PlayReport, SessionError};
pub use session::{Session, ThinkingDelays};
