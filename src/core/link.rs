//! Link classification utilities.

/// URL schemes that mark a link as leaving the site.
pub const ALLOWED_SCHEMES: &[&str] = &[
    "ftp", "http", "https", "irc", "mailto", "news", "nntp", "rtsp", "sftp", "ssh", "tel",
    "telnet", "webcal",
];

/// Where a link points, as far as annotation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Same site, relative, fragment, or anything without a known scheme.
    Internal,
    /// `mailto:` link. Decided before any domain matching.
    Mailto,
    /// Known network scheme on a domain outside the internal set.
    External,
}

impl LinkKind {
    /// The class token added to an anchor of this kind, if any.
    #[inline]
    pub const fn class(self) -> Option<&'static str> {
        match self {
            Self::Internal => None,
            Self::Mailto => Some("mailto"),
            Self::External => Some("external-link"),
        }
    }

    #[inline]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::External)
    }
}

/// Check if a link starts with the literal `mailto:` prefix.
///
/// Case-sensitive: `MAILTO:x` is not a mailto link here and falls through
/// to the scheme check instead.
#[inline]
pub fn is_mailto(url: &str) -> bool {
    url.starts_with("mailto:")
}

/// Scheme-only external check, run after domain matching failed.
///
/// A link is external when the text before its first `:` is one of
/// [`ALLOWED_SCHEMES`]. A colon-less `www.` link is a candidate too, but the
/// final check still requires a colon, so `www.example.com` stays internal.
///
/// # Examples
/// ```
/// use external_links::core::has_external_scheme;
/// assert!(has_external_scheme("HTTPS://example.com"));
/// assert!(!has_external_scheme("javascript:void(0)"));
/// assert!(!has_external_scheme("www.example.com"));
/// ```
pub fn has_external_scheme(url: &str) -> bool {
    let colon = url.find(':');

    let candidate = match colon {
        Some(pos) if pos > 0 => {
            let scheme = url[..pos].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        Some(_) => false,
        None => url.starts_with("www."),
    };

    colon.is_some() && candidate
}
