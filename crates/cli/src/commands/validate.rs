//! The `validate` command - check configuration without running

use anyhow::{Context, Result};
use bridge::BridgeConfig;
use registry::ParamRegistry;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validate the run configuration and its parameter map
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = BridgeConfig::load_from_path(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    info!(serial = %config.serial, "bridge configuration is valid");

    let registry = ParamRegistry::load_from_path(&config.parameter_file)
        .with_context(|| format!("Failed to load {}", config.parameter_file.display()))?;

    let untyped = registry.descriptors().filter(|d| d.kind.is_none()).count();
    info!(
        settings = registry.len(),
        untyped,
        file = %config.parameter_file.display(),
        "parameter map is valid"
    );

    println!(
        "OK: {} ({} settings, {} without a usable kind)",
        args.config.display(),
        registry.len(),
        untyped
    );

    Ok(())
}
