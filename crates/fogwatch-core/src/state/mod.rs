//! Authoritative game state and the state machine that owns it.

mod machine;
mod merge;
mod types;

pub use machine::*;
pub use merge::*;
pub use types::*;
