//! Similarity command implementation.

use anyhow::Result;
use fogwatch_core::{normalize_for_match, similarity};

/// Run the similarity command
pub fn run(a: &str, b: &str) -> Result<()> {
    println!("{:?} -> {:?}", a, normalize_for_match(a));
    println!("{:?} -> {:?}", b, normalize_for_match(b));
    println!("similarity: {:.4}", similarity(a, b));
    Ok(())
}
