//! Region evaluation pipeline.
//!
//! Turns the OCR and pixel results of one captured frame into state updates,
//! checking regions in a fixed priority order and stopping at the first
//! positive classification.

mod capture;
mod evaluator;
pub mod heuristics;
mod region;

pub use capture::*;
pub use evaluator::*;
pub use region::*;
