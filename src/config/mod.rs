//! Configuration for the link annotation engine.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── filter     # [filter], [filter.exclude]
//! │   └── image      # [image]
//! ├── error          # ConfigError
//! └── mod.rs         # Config (this file)
//! ```
//!
//! Every section uses `#[serde(default)]`, so an empty file is a valid
//! config. Values that parse but make no sense (zero limits and timeouts)
//! are replaced by their defaults in [`Config::sanitize`].

mod error;
mod section;

pub use error::ConfigError;
pub use section::{ExcludeOptions, FilterOptions, ImageOptions, Mode, SiteOptions};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::log;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site origin and document root
    pub site: SiteOptions,

    /// Link filter behavior
    pub filter: FilterOptions,

    /// Image inspection limits
    pub image: ImageOptions,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let (mut config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, None);
        }
        config.sanitize();
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("invalid config file `{}`", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Some(path));
        }

        // Relative document root is relative to the config file
        if let Some(root) = &config.site.root
            && root.is_relative()
            && let Some(parent) = path.parent()
        {
            config.site.root = Some(parent.join(root));
        }

        config.sanitize();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: Option<&Path>) {
        let display_path = path
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Replace unusable values with their defaults.
    pub fn sanitize(&mut self) {
        let defaults = ImageOptions::default();
        let image = &mut self.image;

        if image.limit == 0 {
            log!("warning"; "image.limit must be positive, using {}", defaults.limit);
            image.limit = defaults.limit;
        }
        if image.timeout == 0 {
            log!("warning"; "image.timeout must be positive, using {}", defaults.timeout);
            image.timeout = defaults.timeout;
        }
        if image.connect_timeout == 0 {
            log!("warning"; "image.connect_timeout must be positive, using {}", defaults.connect_timeout);
            image.connect_timeout = defaults.connect_timeout;
        }

        let exclude = &mut self.filter.exclude;
        exclude.classes.retain(|c| !c.trim().is_empty());
        exclude.domains.retain(|d| !d.trim().is_empty());
    }
}

// ============================================================================
// Tests
// ============================================================================
