//! Link classifier with a memoized internal-domain pattern.
//!
//! Every call merges the configured internal domains with the site origin
//! and matches the URL against a single case-insensitive pattern. Compiling
//! that pattern is the only expensive step, so the last one is kept and
//! reused for as long as callers pass the same domain list.
//!
//! # Pattern Rules
//!
//! | Domain entry        | Matches                                  |
//! |---------------------|------------------------------------------|
//! | `example.com`       | any URL containing `example.com`         |
//! | `*.example.org`     | any URL containing `<anything>.example.org` |
//! | `example.net/*`     | any URL containing `example.net/`        |
//!
//! Matching is a substring search, not anchored to the host.

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};

use super::link::{LinkKind, has_external_scheme, is_mailto};
use crate::debug;

/// Compiled internal-domain pattern for one domain list.
#[derive(Debug)]
struct DomainPattern {
    /// Configured domains (site origin excluded) this pattern was built for.
    domains: Vec<String>,
    regex: Option<Regex>,
}

impl DomainPattern {
    fn is_match(&self, url: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(url))
    }
}

/// Decides whether a link is internal, external, or a mailto link.
///
/// Safe to share between threads: the cached pattern sits behind a
/// read-mostly lock and is replaced wholesale when the domain list changes.
#[derive(Debug)]
pub struct LinkClassifier {
    origin: String,
    cache: RwLock<Option<DomainPattern>>,
}

impl LinkClassifier {
    /// Create a classifier for a site whose origin is always internal.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            cache: RwLock::new(None),
        }
    }

    /// Site origin merged into every domain list.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Classify `url` against `domains` (plus the site origin).
    pub fn classify(&self, url: &str, domains: &[String]) -> LinkKind {
        if is_mailto(url) {
            return LinkKind::Mailto;
        }
        if self.is_internal_domain(url, domains) {
            return LinkKind::Internal;
        }
        if has_external_scheme(url) {
            LinkKind::External
        } else {
            LinkKind::Internal
        }
    }

    /// Drop the cached pattern; the next call recompiles it.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    fn is_internal_domain(&self, url: &str, domains: &[String]) -> bool {
        {
            let cache = self.cache.read();
            if let Some(pattern) = cache.as_ref()
                && pattern.domains == domains
            {
                return pattern.is_match(url);
            }
        }

        let pattern = self.compile(domains);
        let matched = pattern.is_match(url);
        *self.cache.write() = Some(pattern);
        matched
    }

    fn compile(&self, domains: &[String]) -> DomainPattern {
        let all: Vec<&str> = domains
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.origin.as_str()))
            .collect();

        debug!("links"; "compiling internal domain pattern for {:?}", all);

        let regex = build_domain_pattern(&all).unwrap_or_else(|err| {
            crate::log!("warning"; "invalid internal domain pattern: {}", err);
            None
        });

        DomainPattern {
            domains: domains.to_vec(),
            regex,
        }
    }
}

/// Build the case-insensitive alternation of internal domains.
///
/// Regex metacharacters are escaped, then each literal `*` becomes a lazy
/// `.*?`. Empty entries are ignored; with no usable entry there is no
/// pattern and nothing is internal by domain.
pub fn build_domain_pattern<S: AsRef<str>>(domains: &[S]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = domains
        .iter()
        .map(AsRef::as_ref)
        .filter(|d| !d.is_empty())
        .map(|d| regex::escape(d).replace(r"\*", ".*?"))
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_origin_is_internal() {
        let classifier = LinkClassifier::new("example.com");
        assert_eq!(
            classifier.classify("http://example.com/x", &[]),
            LinkKind::Internal
        );

        let classifier = LinkClassifier::new("other.com");
        assert_eq!(
            classifier.classify("http://example.com/x", &[]),
            LinkKind::External
        );
    }

    #[test]
    fn test_origin_match_is_case_insensitive() {
        let classifier = LinkClassifier::new("https://Example.com");
        assert_eq!(
            classifier.classify("HTTPS://EXAMPLE.COM/About", &[]),
            LinkKind::Internal
        );
    }

    #[test]
    fn test_configured_domains_are_internal() {
        let classifier = LinkClassifier::new("example.com");
        let list = domains(&["partner.org", "*.cdn.net"]);

        for url in [
            "https://partner.org/page",
            "http://static.cdn.net/a.js",
            "https://x.y.cdn.net/",
        ] {
            assert_eq!(classifier.classify(url, &list), LinkKind::Internal, "{url}");
        }
        assert_eq!(
            classifier.classify("https://rust-lang.org", &list),
            LinkKind::External
        );
    }

    #[test]
    fn test_trailing_path_wildcard() {
        let classifier = LinkClassifier::new("example.com");
        let list = domains(&["docs.rs/*"]);
        assert_eq!(
            classifier.classify("https://docs.rs/regex", &list),
            LinkKind::Internal
        );
        assert_eq!(
            classifier.classify("https://docs.rsx.io", &list),
            LinkKind::External
        );
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let classifier = LinkClassifier::new("example.com");
        let list = domains(&["a.b"]);
        // `.` must not match any character
        assert_eq!(classifier.classify("https://axb.org", &list), LinkKind::External);
        assert_eq!(classifier.classify("https://a.b/x", &list), LinkKind::Internal);
    }

    #[test]
    fn test_mailto_wins_over_domains() {
        let classifier = LinkClassifier::new("example.com");
        assert_eq!(
            classifier.classify("mailto:me@example.com", &[]),
            LinkKind::Mailto
        );
        assert_eq!(
            classifier.classify("mailto:someone@elsewhere.org", &domains(&["elsewhere.org"])),
            LinkKind::Mailto
        );
    }

    #[test]
    fn test_www_without_scheme_stays_internal() {
        let classifier = LinkClassifier::new("other.com");
        assert_eq!(
            classifier.classify("www.example.com", &[]),
            LinkKind::Internal
        );
    }

    #[test]
    fn test_relative_links_are_internal() {
        let classifier = LinkClassifier::new("example.com");
        for url in ["/about", "#top", "page.html", "../up", "javascript:void(0)"] {
            assert_eq!(classifier.classify(url, &[]), LinkKind::Internal, "{url}");
        }
    }

    #[test]
    fn test_empty_origin_does_not_match_everything() {
        let classifier = LinkClassifier::new("");
        assert_eq!(
            classifier.classify("https://rust-lang.org", &[]),
            LinkKind::External
        );
    }

    #[test]
    fn test_cache_follows_domain_changes() {
        let classifier = LinkClassifier::new("example.com");
        let url = "https://partner.org/";

        assert_eq!(classifier.classify(url, &[]), LinkKind::External);
        assert_eq!(
            classifier.classify(url, &domains(&["partner.org"])),
            LinkKind::Internal
        );
        assert_eq!(classifier.classify(url, &[]), LinkKind::External);

        classifier.invalidate();
        assert_eq!(
            classifier.classify(url, &domains(&["partner.org"])),
            LinkKind::Internal
        );
    }

    #[test]
    fn test_build_domain_pattern() {
        assert!(build_domain_pattern::<&str>(&[]).unwrap().is_none());
        assert!(build_domain_pattern(&["", ""]).unwrap().is_none());

        let re = build_domain_pattern(&["*.example.com", "foo(bar)"])
            .unwrap()
            .unwrap();
        assert!(re.is_match("https://www.EXAMPLE.com"));
        assert!(re.is_match("foo(bar)"));
        assert!(!re.is_match("foobar"));
    }

    #[test]
    fn test_shared_across_threads() {
        let classifier = LinkClassifier::new("example.com");
        let list = domains(&["partner.org"]);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        assert_eq!(
                            classifier.classify("https://partner.org", &list),
                            LinkKind::Internal
                        );
                        assert_eq!(
                            classifier.classify("https://rust-lang.org", &[]),
                            LinkKind::External
                        );
                    }
                });
            }
        });
    }
}
