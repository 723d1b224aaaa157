//! Link annotation pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  content  ──► find `<a …>…</a>` spans        │
//! │                 │                            │
//! │                 ▼  (per anchor)              │
//! │   normalize ─► parse ─► AnchorTransform      │
//! │                 │                            │
//! │        Changed ─┴─► rewrite start tag        │
//! │        otherwise ─► original bytes           │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Only the start tag of a changed anchor is rebuilt; its content and all
//! markup outside anchors are returned as written. Nothing here returns an
//! error: an anchor that cannot be parsed is left as it was.

pub mod dom;
pub mod transform;


use std::sync::LazyLock;

use rayon::prelude::*;
use regex::{Captures, Regex};

use crate::config::{Config, FilterOptions};
use crate::core::LinkClassifier;
use crate::debug;
use crate::image::ImageInspector;
use crate::utils::html::normalize_fragment;

pub use dom::{Element, Fragment, FragmentParser, TlParser, rewrite_start_tag};
pub use transform::{AnchorTransform, Outcome};

/// A complete anchor element, including nested markup.
static RE_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a(?:\s[^>]*)?>.*?</a\s*>").unwrap());

// =============================================================================
// Engine
// =============================================================================

/// Annotates external, mailto and image links in HTML content.
///
/// Shareable across threads; see [`ExternalLinks::process_batch`].
pub struct ExternalLinks {
    classifier: LinkClassifier,
    inspector: ImageInspector,
    parser: Box<dyn FragmentParser>,
}

impl ExternalLinks {
    /// Build an engine for the site described by `config`.
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            LinkClassifier::new(config.site.url.clone()),
            ImageInspector::new(&config.site, &config.image),
        )
    }

    pub fn from_parts(classifier: LinkClassifier, inspector: ImageInspector) -> Self {
        Self {
            classifier,
            inspector,
            parser: Box::new(TlParser),
        }
    }

    /// Replace the fragment parser.
    pub fn with_parser(mut self, parser: Box<dyn FragmentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn classifier(&self) -> &LinkClassifier {
        &self.classifier
    }

    pub fn inspector(&self) -> &ImageInspector {
        &self.inspector
    }

    /// Annotate every anchor in `html`.
    ///
    /// Returns `html` unchanged when `options.process` is off.
    pub fn process(&self, html: &str, options: &FilterOptions) -> String {
        if !options.process {
            return html.to_string();
        }

        let transform = AnchorTransform::new(options, &self.classifier, &self.inspector);
        let mut seen = 0usize;
        let mut changed = 0usize;

        let output = RE_ANCHOR.replace_all(html, |caps: &Captures<'_>| {
            seen += 1;
            let raw = &caps[0];
            match self.process_anchor(raw, &transform) {
                Some(annotated) => {
                    changed += 1;
                    annotated
                }
                None => raw.to_string(),
            }
        });

        if seen > 0 {
            debug!("links"; "annotated {} of {} anchors", changed, seen);
        }
        output.into_owned()
    }

    /// [`process`](Self::process) over many content units in parallel.
    ///
    /// Output order matches input order.
    pub fn process_batch<S>(&self, inputs: &[S], options: &FilterOptions) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        inputs
            .par_iter()
            .map(|html| self.process(html.as_ref(), options))
            .collect()
    }

    /// Rewritten anchor if the transform changed it.
    fn process_anchor(&self, raw: &str, transform: &AnchorTransform<'_>) -> Option<String> {
        let normalized = normalize_fragment(raw);
        let Some(mut fragment) = self.parser.parse(&normalized) else {
            debug!("links"; "skipping unparsable anchor `{}`", raw);
            return None;
        };
        let anchor = fragment.find_mut("a")?;

        match transform.apply(anchor) {
            Outcome::Changed => rewrite_start_tag(&normalized, anchor),
            Outcome::Skipped | Outcome::Unchanged => None,
        }
    }
}
