//! Killers command implementation.

use anyhow::Result;
use fogwatch_core::KillerCatalog;
use owo_colors::OwoColorize;

/// Run the killers command
pub fn run(json: bool) -> Result<()> {
    let catalog = KillerCatalog::builtin();

    if json {
        let entries: Vec<_> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in catalog.iter() {
        println!("{}", entry.id.bold());
        println!("  names:   {}", entry.names.join(", "));
        if !entry.power_labels.is_empty() {
            println!("  power:   {}", entry.power_labels.join(", "));
        }
        if !entry.confirm_labels.is_empty() {
            println!("  confirm: {}", entry.confirm_labels.join(", ").dimmed());
        }
        if let Some(start) = entry.start {
            println!("  start:   {} ({})", start.label, start.button);
        }
    }
    println!();
    println!("{} killers", catalog.len());
    Ok(())
}
