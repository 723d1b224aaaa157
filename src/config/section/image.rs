//! `[image]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [image]
//! limit = 32               # KB read from a remote image
//! timeout = 120            # Total request timeout in seconds
//! connect_timeout = 120    # Connect timeout in seconds
//! max_redirects = 10       # Redirects followed before giving up
//! scratch_dir = "/tmp"     # Where partial downloads are spooled
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::image::DEFAULT_LIMIT_KB;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 120;

/// Default redirect cap.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Kilobytes fetched from a remote image before decoding.
    pub limit: u32,

    /// Total request timeout in seconds.
    pub timeout: u64,

    /// Connect timeout in seconds.
    pub connect_timeout: u64,

    /// Maximum number of redirects followed.
    pub max_redirects: u32,

    /// Directory for scratch files. System temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT_KB,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            scratch_dir: None,
        }
    }
}
