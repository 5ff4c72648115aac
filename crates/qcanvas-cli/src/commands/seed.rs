//! Seed command implementation.

use anyhow::Result;
use console::style;

use qcanvas::{CanvasConfig, derive_seed, normalize_name};

/// Execute the seed command.
pub fn execute(name: &str, qubits: Option<u32>, layers: Option<u32>) -> Result<()> {
    let defaults = CanvasConfig::default();
    let config = CanvasConfig::new(
        qubits.unwrap_or(defaults.num_qubits),
        layers.unwrap_or(defaults.layers),
        defaults.shots,
    )?;
    let seed = derive_seed(name)?;

    println!("{} '{}'", style("→").cyan().bold(), style(name).green());
    println!("  Normalized: {}", normalize_name(name));
    println!("  Seed:       {}", style(seed).yellow());
    println!(
        "  Parameters: {} ({} qubits, {} layers)",
        config.num_parameters(),
        config.num_qubits,
        config.layers
    );
    Ok(())
}
