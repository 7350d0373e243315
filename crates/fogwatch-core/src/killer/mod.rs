//! Killer identification against the static character catalog.

mod catalog;
mod identifier;

pub use catalog::*;
pub use identifier::*;
