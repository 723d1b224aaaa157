//! Per-anchor annotation.
//!
//! | LinkKind   | class tokens                                  | target / rel        |
//! |------------|-----------------------------------------------|---------------------|
//! | `Internal` | unchanged                                     | unchanged           |
//! | `Mailto`   | `mailto`                                      | unchanged           |
//! | `External` | `external-link` + `no-image`/`icon`/`image`/`images` | `target`, `nofollow` |
//!
//! Class tokens are only written back in [`Mode::Active`]; `target` and
//! `rel` are adjusted in both modes.

use crate::config::{FilterOptions, Mode};
use crate::core::LinkClassifier;
use crate::image::{ImageInspector, ImageRef};
use crate::utils::html::TokenList;

use super::dom::Element;

/// What [`AnchorTransform::apply`] did to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Empty `href` or an excluded class.
    Skipped,
    /// Processed, but every attribute already had its target value.
    Unchanged,
    /// At least one attribute was written.
    Changed,
}

/// Annotates a single anchor element.
pub struct AnchorTransform<'a> {
    options: &'a FilterOptions,
    classifier: &'a LinkClassifier,
    inspector: &'a ImageInspector,
}

impl<'a> AnchorTransform<'a> {
    pub fn new(
        options: &'a FilterOptions,
        classifier: &'a LinkClassifier,
        inspector: &'a ImageInspector,
    ) -> Self {
        Self {
            options,
            classifier,
            inspector,
        }
    }

    pub fn apply(&self, anchor: &mut Element) -> Outcome {
        let href = anchor.get_attr("href").unwrap_or_default();
        if href.is_empty() {
            return Outcome::Skipped;
        }

        let mut classes = TokenList::parse(anchor.get_attr("class").unwrap_or_default());
        if classes.intersects(&self.options.exclude.classes) {
            return Outcome::Skipped;
        }

        let kind = self.classifier.classify(href, &self.options.exclude.domains);
        let mut changed = false;

        let Some(class) = kind.class() else {
            return Outcome::Unchanged;
        };
        classes.push(class);

        if kind.is_external() {
            classes.push(self.image_class(anchor));
            changed |= self.apply_target(anchor);
            changed |= self.apply_rel(anchor);
        }

        if self.options.mode == Mode::Active && !classes.is_empty() {
            let joined = classes.joined();
            if anchor.get_attr("class") != Some(joined.as_str()) {
                anchor.set_attr("class", joined);
                changed = true;
            }
        }

        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }

    /// Class token describing the images inside an external anchor.
    fn image_class(&self, anchor: &Element) -> &'static str {
        match anchor.descendants("img").as_slice() {
            [] => "no-image",
            [img] => {
                let image = ImageRef {
                    src: img.get_attr("src"),
                    width: img.get_attr("width"),
                    height: img.get_attr("height"),
                    style: img.get_attr("style"),
                };
                if self.inspector.measure(&image).is_icon() {
                    "icon"
                } else {
                    "image"
                }
            }
            _ => "images",
        }
    }

    fn apply_target(&self, anchor: &mut Element) -> bool {
        let target = self.options.target.as_str();
        if target.is_empty() || anchor.get_attr("target") == Some(target) {
            return false;
        }
        anchor.set_attr("target", target);
        true
    }

    fn apply_rel(&self, anchor: &mut Element) -> bool {
        if !self.options.no_follow {
            return false;
        }
        let mut rel = TokenList::parse(anchor.get_attr("rel").unwrap_or_default());
        if !rel.push("nofollow") {
            return false;
        }
        anchor.set_attr("rel", rel.joined());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImageOptions, SiteOptions};
    use crate::image::fetch::testing::MockFetcher;
    use crate::pipeline::dom::{FragmentParser, TlParser};
    use std::sync::Arc;

    struct Fixture {
        classifier: LinkClassifier,
        inspector: ImageInspector,
    }

    impl Fixture {
        fn new(fetcher: &MockFetcher) -> Self {
            let site = SiteOptions {
                url: "https://example.com".to_string(),
                root: None,
            };
            Self {
                classifier: LinkClassifier::new(site.url.clone()),
                inspector: ImageInspector::new(&site, &ImageOptions::default())
                    .with_fetcher(Arc::new(fetcher.clone())),
            }
        }

        fn run(&self, html: &str, options: &FilterOptions) -> (Outcome, Element) {
            let mut fragment = TlParser.parse(html).unwrap();
            let anchor = fragment.find_mut("a").unwrap();
            let outcome = AnchorTransform::new(options, &self.classifier, &self.inspector)
                .apply(anchor);
            (outcome, anchor.clone())
        }
    }

    fn active() -> FilterOptions {
        FilterOptions {
            mode: Mode::Active,
            ..FilterOptions::default()
        }
    }

    #[test]
    fn test_external_attributes() {
        let fixture = Fixture::new(&MockFetcher::default());
        let (outcome, anchor) = fixture.run(
            r#"<a href="https://rust-lang.org" rel="noopener">x</a>"#,
            &active(),
        );

        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(anchor.get_attr("target"), Some("_blank"));
        assert_eq!(anchor.get_attr("rel"), Some("noopener nofollow"));
        assert_eq!(anchor.get_attr("class"), Some("external-link no-image"));
    }

    #[test]
    fn test_passive_leaves_class_alone() {
        let fixture = Fixture::new(&MockFetcher::default());
        let (outcome, anchor) =
            fixture.run(r#"<a href="https://rust-lang.org">x</a>"#, &FilterOptions::default());

        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(anchor.get_attr("rel"), Some("nofollow"));
        assert_eq!(anchor.get_attr("class"), None);
    }

    #[test]
    fn test_skipped_anchors() {
        let fixture = Fixture::new(&MockFetcher::default());
        let options = active();

        for html in [
            r#"<a href="">x</a>"#,
            r#"<a name="top">x</a>"#,
            r#"<a class="btn no-external" href="https://rust-lang.org">x</a>"#,
        ] {
            let (outcome, _) = fixture.run(html, &options);
            assert_eq!(outcome, Outcome::Skipped, "{html}");
        }
    }

    #[test]
    fn test_mailto_gets_class_only() {
        let fixture = Fixture::new(&MockFetcher::default());
        let (outcome, anchor) = fixture.run(r#"<a href="mailto:me@example.org">m</a>"#, &active());

        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(anchor.get_attr("class"), Some("mailto"));
        assert_eq!(anchor.get_attr("target"), None);
        assert_eq!(anchor.get_attr("rel"), None);

        let (outcome, _) = fixture.run(
            r#"<a href="mailto:me@example.org">m</a>"#,
            &FilterOptions::default(),
        );
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_internal_untouched() {
        let fixture = Fixture::new(&MockFetcher::default());
        for href in ["/about", "https://example.com/blog", "#top", "www.example.org"] {
            let html = format!(r#"<a href="{href}" class="nav">x</a>"#);
            let (outcome, anchor) = fixture.run(&html, &active());
            assert_eq!(outcome, Outcome::Unchanged, "{href}");
            assert_eq!(anchor.get_attr("class"), Some("nav"));
        }
    }

    #[test]
    fn test_already_annotated_is_unchanged() {
        let fixture = Fixture::new(&MockFetcher::default());
        let (outcome, _) = fixture.run(
            r#"<a href="https://rust-lang.org" target="_blank" rel="nofollow" class="external-link no-image">x</a>"#,
            &active(),
        );
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_target_and_rel_disabled() {
        let fixture = Fixture::new(&MockFetcher::default());
        let options = FilterOptions {
            target: String::new(),
            no_follow: false,
            ..FilterOptions::default()
        };
        let (outcome, anchor) = fixture.run(r#"<a href="https://rust-lang.org">x</a>"#, &options);

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(anchor.get_attr("target"), None);
        assert_eq!(anchor.get_attr("rel"), None);
    }

    #[test]
    fn test_image_count_classes() {
        let fetcher = MockFetcher::default();
        let fixture = Fixture::new(&fetcher);

        let (_, anchor) = fixture.run(
            r#"<a href="https://rust-lang.org"><img src="a.png"><span><img src="b.png"></span></a>"#,
            &active(),
        );
        assert_eq!(anchor.get_attr("class"), Some("external-link images"));
        assert_eq!(fetcher.calls(), 0);

        let (_, anchor) = fixture.run(
            r#"<a href="https://rust-lang.org"><img src="" width="16" height="16"></a>"#,
            &active(),
        );
        assert_eq!(anchor.get_attr("class"), Some("external-link icon"));
        assert_eq!(fetcher.calls(), 0);
    }
}
