//! Text normalization and similarity scoring for OCR output.

mod similarity;
mod words;

pub use similarity::*;
pub use words::*;
