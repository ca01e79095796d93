use std::{fs, path::Path};

use anyhow::{Context, Result};
use minimap_core::Config;

/// Reads and validates the TOML configuration file at `path`.
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Parses a TOML configuration document; absent keys keep their defaults.
pub(crate) fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).context("failed to parse configuration")?;
    config.validate()?;
    Ok(config)
}
