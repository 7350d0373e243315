//! Command implementations.

pub mod killers;
pub mod replay;
pub mod similarity;
