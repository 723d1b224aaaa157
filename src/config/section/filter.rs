//! `[filter]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [filter]
//! process = true               # Master switch
//! mode = "active"              # active | passive
//! target = "_blank"            # `target` for external links, "" to skip
//! no_follow = true             # Add `rel="nofollow"` to external links
//!
//! [filter.exclude]
//! classes = ["no-external"]    # Anchors with any of these classes are skipped
//! domains = ["*.example.org"]  # Extra internal domains (`*` wildcard)
//! ```

use serde::{Deserialize, Serialize};

use crate::log;

/// Whether computed classes are written back to anchors.
///
/// In both modes `target` and `rel` are still updated on external links;
/// only the `class` attribute depends on the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Mode {
    /// Write the class list.
    Active,
    /// Leave `class` untouched.
    #[default]
    Passive,
}

impl Mode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "passive" => Some(Self::Passive),
            _ => None,
        }
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_else(|| {
            log!("warning"; "unknown filter mode `{}`, using passive", value);
            Self::Passive
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeOptions {
    /// Anchors carrying any of these classes are left alone.
    pub classes: Vec<String>,

    /// Domain patterns treated as internal, in addition to the site URL.
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Process content at all.
    pub process: bool,

    /// Write computed classes (`active`) or only adjust `target`/`rel`.
    pub mode: Mode,

    /// Value for the `target` attribute of external links. Empty to skip.
    pub target: String,

    /// Ensure `nofollow` is in the `rel` of external links.
    pub no_follow: bool,

    pub exclude: ExcludeOptions,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            process: true,
            mode: Mode::Passive,
            target: "_blank".to_string(),
            no_follow: true,
            exclude: ExcludeOptions {
                classes: vec!["no-external".to_string()],
                domains: Vec::new(),
            },
        }
    }
}
