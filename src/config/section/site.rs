//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com"   # Always treated as an internal domain
//! root = "public"               # Document root for local image lookups
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteOptions {
    /// Absolute site URL (or bare origin). Links matching it are internal,
    /// relative image URLs are resolved against it.
    pub url: String,

    /// Directory that image `src` paths are looked up in.
    pub root: Option<PathBuf>,
}
