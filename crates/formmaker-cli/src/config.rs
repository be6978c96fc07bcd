//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level formmaker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormmakerConfig {
    /// Fraction of the max score required to pass a graded submission.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Directory graded submission artifacts are saved into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_pass_threshold() -> f64 {
    0.6
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./formmaker-results")
}

impl Default for FormmakerConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `formmaker.toml` in the current directory
/// 2. `~/.config/formmaker/config.toml`
///
/// Environment variable override: `FORMMAKER_PASS_THRESHOLD`.
pub fn load_config_from(path: Option<&Path>) -> Result<FormmakerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("formmaker.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = config_home() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<FormmakerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => FormmakerConfig::default(),
    };

    if let Ok(raw) = std::env::var("FORMMAKER_PASS_THRESHOLD") {
        config.pass_threshold = raw
            .parse::<f64>()
            .with_context(|| format!("invalid FORMMAKER_PASS_THRESHOLD: '{raw}'"))?;
    }

    Ok(config)
}

fn config_home() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("formmaker"))
}
