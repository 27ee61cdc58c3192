//! The `info` command - display the parameter map

use anyhow::{Context, Result};
use bridge::BridgeConfig;
use registry::ParamRegistry;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Print the parameter map in declaration order
pub fn run_info(args: &InfoArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = BridgeConfig::load_from_path(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let registry = ParamRegistry::load_from_path(&config.parameter_file)
        .with_context(|| format!("Failed to load {}", config.parameter_file.display()))?;

    if args.json {
        let descriptors: Vec<_> = registry.descriptors().collect();
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    println!("camera serial: {}", config.serial);
    println!("parameter map: {}", config.parameter_file.display());
    println!();
    for desc in registry.descriptors() {
        let kind = desc
            .kind
            .map(|k| k.as_str())
            .unwrap_or("(unknown kind)");
        println!("  {:<30} {:<8} {}", desc.name, kind, desc.node);
    }

    Ok(())
}
