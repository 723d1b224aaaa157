//! Image sizing for linked images.
//!
//! # Modules
//!
//! - [`units`]: CSS length units and inline `style` parsing
//! - [`decode`]: header-only decoding of local or downloaded files
//! - [`fetch`]: bounded remote download behind the [`Fetch`] trait
//!
//! # Resolution Order
//!
//! Later sources override earlier ones when present:
//!
//! 1. `src`: a file under the document root, else a bounded remote fetch
//! 2. `width` / `height` attributes
//! 3. `width:` / `height:` declarations in `style`

pub mod decode;
mod error;
pub mod fetch;
pub mod units;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::config::{ImageOptions, SiteOptions};
use crate::debug;

pub use error::InspectError;
pub use fetch::{Fetch, HttpFetcher};

/// Largest side, in pixels, of an image that still counts as an icon.
pub const ICON_MAX_SIZE: u32 = 32;

/// Default number of kilobytes fetched from a remote image.
pub const DEFAULT_LIMIT_KB: u32 = 32;

/// Pixel size of an image. Zero means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const UNKNOWN: Self = Self::new(0, 0);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Larger of width and height.
    #[inline]
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// `0 < max_side <= 32`. Unknown dimensions are never an icon.
    #[inline]
    pub fn is_icon(&self) -> bool {
        (1..=ICON_MAX_SIZE).contains(&self.max_side())
    }
}

/// The sizing-relevant attributes of an `<img>` element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRef<'a> {
    pub src: Option<&'a str>,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub style: Option<&'a str>,
}

// =============================================================================
// Inspector
// =============================================================================

/// Resolves the pixel size of linked images.
pub struct ImageInspector {
    document_root: Option<PathBuf>,
    base_url: Option<Url>,
    limit_kb: u32,
    scratch_dir: Option<PathBuf>,
    fetcher: Arc<dyn Fetch>,
}

impl ImageInspector {
    /// Create an inspector that fetches over HTTP.
    pub fn new(site: &SiteOptions, options: &ImageOptions) -> Self {
        Self {
            document_root: site.root.clone(),
            base_url: Url::parse(&site.url).ok(),
            limit_kb: match options.limit {
                0 => DEFAULT_LIMIT_KB,
                limit => limit,
            },
            scratch_dir: options.scratch_dir.clone(),
            fetcher: Arc::new(HttpFetcher::new(options)),
        }
    }

    /// Replace the remote fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Configured remote fetch limit in kilobytes.
    pub fn limit_kb(&self) -> u32 {
        self.limit_kb
    }

    /// Measure an image with the configured fetch limit.
    pub fn measure(&self, image: &ImageRef<'_>) -> ImageDimensions {
        self.measure_with_limit(image, self.limit_kb)
    }

    /// Measure an image, fetching at most `limit_kb` kilobytes if remote.
    ///
    /// Never fails: anything that cannot be determined stays zero.
    pub fn measure_with_limit(&self, image: &ImageRef<'_>, limit_kb: u32) -> ImageDimensions {
        let mut dims = match image.src.filter(|src| !src.trim().is_empty()) {
            Some(src) => self
                .try_measure_src_with_limit(src, limit_kb)
                .unwrap_or_else(|err| {
                    debug!("image"; "cannot size `{}`: {}", src, err);
                    ImageDimensions::UNKNOWN
                }),
            None => ImageDimensions::UNKNOWN,
        };

        if let Some(width) = image.width.and_then(units::parse_attr_length) {
            dims.width = width;
        }
        if let Some(height) = image.height.and_then(units::parse_attr_length) {
            dims.height = height;
        }

        if let Some(style) = image.style {
            let (width, height) = units::style_dimensions(style);
            if let Some(width) = width {
                dims.width = width;
            }
            if let Some(height) = height {
                dims.height = height;
            }
        }

        dims
    }

    /// Decode the image behind `src`, locally if possible, else remotely.
    pub fn try_measure_src(&self, src: &str) -> Result<ImageDimensions, InspectError> {
        self.try_measure_src_with_limit(src, self.limit_kb)
    }

    fn try_measure_src_with_limit(
        &self,
        src: &str,
        limit_kb: u32,
    ) -> Result<ImageDimensions, InspectError> {
        if let Some(path) = self.local_path(src) {
            return decode::file_dimensions(&path);
        }

        let uri = self.remote_url(src)?;
        let limit = u64::from(limit_kb) * 1024;
        fetch::remote_dimensions(
            self.fetcher.as_ref(),
            &uri,
            limit,
            self.scratch_dir.as_deref(),
        )
    }

    /// Map `src` to an existing regular file under the document root.
    ///
    /// Query and fragment are dropped and the path is percent-decoded.
    /// Paths leaving the root through `..` are rejected.
    fn local_path(&self, src: &str) -> Option<PathBuf> {
        let root = self.document_root.as_ref()?;
        if src.contains("://") || src.starts_with("//") || src.starts_with("data:") {
            return None;
        }

        let path = src.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let relative = Path::new(decoded.trim_start_matches('/'));

        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained || relative.as_os_str().is_empty() {
            return None;
        }

        let full = root.join(relative);
        full.is_file().then_some(full)
    }

    /// Resolve `src` to an absolute http(s) URL, relative to the site URL.
    fn remote_url(&self, src: &str) -> Result<Url, InspectError> {
        let unsupported = || InspectError::UnsupportedUri(src.to_string());

        let url = match Url::parse(src) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .as_ref()
                .and_then(|base| base.join(src).ok())
                .ok_or_else(unsupported)?,
            Err(_) => return Err(unsupported()),
        };

        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(unsupported()),
        }
    }
}
