//! Map identification against the known map directory.

mod directory;
mod identifier;

pub use directory::*;
pub use identifier::*;
