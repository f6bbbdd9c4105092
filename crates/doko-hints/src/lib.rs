#![deny(warnings)]
pub mod engine;
pub mod hint;
pub mod limiter;
pub mod triggers;

pub use engine::{HintContext, HintEngine, MoveStage};
pub use hint::{Hint, HintKind, Severity};
pub use limiter::HintLimiter;
