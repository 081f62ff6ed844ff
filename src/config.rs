//! Renderer configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! [render]
//! width = 100       # timeline columns
//! timeline = true   # draw the ASCII timeline
//! scheduled = true  # mark scheduled time with '#'
//! summary = false   # append the per-name breakdown
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SWIMLANE_CONFIG_PATH";

/// Narrowest timeline that still shows anything useful.
pub const MIN_WIDTH: usize = 8;

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimlaneConfig {
    pub render: RenderConfig,
}

/// Options for [`render`](crate::trace::render).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Timeline width in columns
    pub width: usize,
    /// Draw one ASCII bar per row
    pub timeline: bool,
    /// Mark scheduled sub-intervals with `#` on the timeline
    pub scheduled: bool,
    /// Append the per-name breakdown table
    pub summary: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 80,
            timeline: true,
            scheduled: true,
            summary: false,
        }
    }
}

impl SwimlaneConfig {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicit path (from `--config`) must exist; the environment and
    /// platform locations are optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = get_config_path(explicit) else {
            log::debug!("No config location available, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            if explicit.is_some() {
                bail!("Config file not found: {}", path.display());
            }
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.render.width < MIN_WIDTH {
            bail!(
                "render.width must be at least {MIN_WIDTH}, got {}",
                self.render.width
            );
        }
        Ok(())
    }
}

/// Get the config file path.
///
/// Priority:
/// 1. Explicit path (the `--config` flag)
/// 2. `SWIMLANE_CONFIG_PATH` environment variable
/// 3. Platform config directory (`~/.config/swimlane/config.toml` on Linux and macOS)
pub fn get_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("swimlane").join("config.toml"))
}
