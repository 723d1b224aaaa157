//! Annotate links in rendered HTML.
//!
//! Anchors pointing off-site get an `external-link` class plus a class
//! describing the images they wrap (`no-image`, `icon`, `image`, `images`),
//! and optionally `target` and `rel="nofollow"`. `mailto:` links get a
//! `mailto` class. Everything else is left as it was.
//!
//! ```no_run
//! use external_links::{Config, ExternalLinks};
//!
//! let config = Config::from_str(r#"
//!     [site]
//!     url = "https://example.com"
//!     [filter]
//!     mode = "active"
//! "#)?;
//! let engine = ExternalLinks::new(&config);
//! let html = engine.process(r#"<a href="https://rust-lang.org">Rust</a>"#, &config.filter);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod image;
pub mod logger;
pub mod pipeline;
pub mod utils;

pub use crate::config::{Config, ConfigError, ExcludeOptions, FilterOptions, ImageOptions, Mode, SiteOptions};
pub use crate::core::{LinkClassifier, LinkKind};
pub use crate::image::{ImageDimensions, ImageInspector, ImageRef, InspectError};
pub use crate::pipeline::ExternalLinks;
