use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sievekit_core::{CodecConfig, Convention, FilterCodec, HttpParamCodec};

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sievekit").join("config.toml"))
}

fn load_from(path: &Path) -> Result<CodecConfig> {
    CodecConfig::load(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Resolve the codec configuration.
///
/// 1. `--config` flag / `SIEVEKIT_CONFIG` env
/// 2. `~/.sievekit/config.toml` if it exists
/// 3. built-in defaults
pub fn resolve(cli_config: Option<&str>) -> Result<CodecConfig> {
    if let Some(path) = cli_config {
        return load_from(Path::new(path));
    }
    match default_config_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => {
            tracing::debug!("No config file found, using defaults");
            Ok(CodecConfig::default())
        }
    }
}

pub fn codec_for(config: &CodecConfig, convention: Convention) -> Result<Box<dyn FilterCodec>> {
    Ok(match convention {
        Convention::Sieve => Box::new(
            config
                .sieve_codec()
                .context("Invalid operator configuration")?,
        ),
        Convention::HttpParam => Box::new(HttpParamCodec::new()),
    })
}
