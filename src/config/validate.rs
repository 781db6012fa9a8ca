// src/config/validate.rs

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::config::model::{ConfigFile, OutputStyle};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `output_style` is one of "compact" / "expanded"
/// - `image_quality` is within 0-100
/// - the directory roots are non-empty
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_options(cfg)?;
    validate_paths(cfg)?;
    Ok(())
}

fn validate_options(cfg: &ConfigFile) -> Result<()> {
    OutputStyle::from_str(&cfg.options.output_style)
        .map_err(|e| anyhow!(e))
        .context("invalid [options].output_style")?;

    if cfg.options.image_quality > 100 {
        return Err(anyhow!(
            "[options].image_quality must be within 0-100 (got {})",
            cfg.options.image_quality
        ));
    }

    Ok(())
}

fn validate_paths(cfg: &ConfigFile) -> Result<()> {
    for (field, value) in [
        ("source_dir", &cfg.paths.source_dir),
        ("build_dir", &cfg.paths.build_dir),
        ("pages_dir", &cfg.paths.pages_dir),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("[paths].{field} must not be empty"));
        }
    }

    Ok(())
}
