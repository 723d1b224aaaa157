//! HTML utility functions.
//!
//! Provides common HTML processing functions:
//! - `escape_attr()`, `unescape()` - HTML entity handling for attribute values
//! - `is_void_element()` - Elements serialized as `<tag />`
//! - `parse_attributes()` - Order-preserving attribute string parsing
//! - `self_close_void_tags()` - Void tags written as `<tag />`
//! - `TokenList` - Space-separated token sets (`class`, `rel`)
//! - `normalize_fragment()`, `strip_cdata()` - Pre/post serialization cleanup

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping inside a double-quoted attribute.
const ESCAPE_CHARS: [char; 4] = ['<', '>', '&', '"'];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escape an attribute value for a double-quoted context.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles the common named entities and numeric character references.
/// Anything else is passed through verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        let decoded = tail
            .find(';')
            .filter(|&end| end > 0 && end <= 10)
            .and_then(|end| decode_entity(&tail[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push('&');
                rest = tail;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element.
///
/// Void elements never carry children and are written as `<tag />`.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "command"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// A start-tag attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name as written.
    pub name: String,
    /// Unescaped value; `None` for valueless attributes.
    pub value: Option<String>,
    /// Source text (`name="value"`), dropped once the value is replaced.
    pub source: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            source: None,
        }
    }

    /// ASCII case-insensitive name comparison.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Replace the value; the attribute is re-escaped when written.
    pub fn set_value(&mut self, value: String) {
        self.value = Some(value);
        self.source = None;
    }

    /// Append ` name="value"`, reusing the source text when untouched.
    pub fn write_to(&self, out: &mut String) {
        out.push(' ');
        if let Some(source) = &self.source {
            out.push_str(source);
            return;
        }
        out.push_str(&self.name);
        if let Some(value) = &self.value {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
}

/// Parse HTML-style attributes from the inside of a start tag.
///
/// Input: `href="/a?x=1&amp;y=2" class='foo' download`
/// Output: `href` = `/a?x=1&y=2`, `class` = `foo`, `download` without value
///
/// Names keep their case (`viewBox` stays `viewBox`), values are unescaped,
/// the source text of each attribute is kept and source order is preserved.
/// A trailing `/` (from `<br/>`) is ignored.
pub fn parse_attributes(s: &str) -> Vec<Attribute> {
    let mut attrs: Vec<Attribute> = Vec::new();
    let mut chars = s.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if next == '=' || next == '/' || next.is_whitespace() {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }
        let name = &s[start..end];

        // Skip whitespace
        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let value = if chars.peek().is_some_and(|&(_, c)| c == '=') {
            chars.next();

            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }

            let raw = match chars.peek().copied() {
                Some((i, quote @ ('"' | '\''))) => {
                    chars.next();
                    let mut value_end = s.len();
                    end = s.len();
                    for (j, c) in chars.by_ref() {
                        if c == quote {
                            value_end = j;
                            end = j + 1;
                            break;
                        }
                    }
                    &s[i + 1..value_end]
                }
                Some((i, _)) => {
                    // Unquoted value (read until whitespace)
                    end = s.len();
                    while let Some(&(j, c)) = chars.peek() {
                        if c.is_whitespace() {
                            end = j;
                            break;
                        }
                        chars.next();
                    }
                    &s[i..end]
                }
                None => {
                    end = s.len();
                    ""
                }
            };
            Some(unescape(raw).into_owned())
        } else {
            None
        };

        // First occurrence wins, like a browser
        if !attrs.iter().any(|a| a.is(name)) {
            attrs.push(Attribute {
                name: name.to_string(),
                value,
                source: Some(s[start..end].trim_end().to_string()),
            });
        }
    }

    attrs
}

/// Byte length of the start tag at the beginning of `raw`, `>` included.
///
/// Quoted values may contain `>`; the tag ends at the first unquoted `>`.
pub fn start_tag_len(raw: &str) -> Option<usize> {
    let inner = raw.strip_prefix('<')?;

    let mut quote = None;
    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i + 2),
            _ => {}
        }
    }
    None
}

/// Split a raw start tag (`<a href="x">`) into its name and attribute text.
pub fn split_start_tag(raw: &str) -> Option<(&str, &str)> {
    let len = start_tag_len(raw)?;
    let body = &raw[1..len - 1];
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(body.len());
    Some((&body[..name_end], &body[name_end..]))
}

/// Elements whose content is raw text, never markup.
#[inline]
fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Close void start tags as `<tag />`, leaving everything else as written.
///
/// Comments and the contents of `script`/`style` are skipped, so a `<` in
/// text or code is never mistaken for a tag.
pub fn self_close_void_tags(html: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            pos = start + rest.find("-->").map_or(rest.len(), |end| end + 3);
            continue;
        }

        let Some((name, attrs)) = split_start_tag(rest)
            .filter(|(name, _)| name.starts_with(|c: char| c.is_ascii_alphabetic()))
        else {
            pos = start + 1;
            continue;
        };
        let tag_end = start + 2 + name.len() + attrs.len();
        let name = name.to_ascii_lowercase();

        if is_raw_text_element(&name) {
            let close = format!("</{name}");
            pos = html[tag_end..]
                .to_ascii_lowercase()
                .find(&close)
                .map_or(html.len(), |i| tag_end + i);
            continue;
        }

        if is_void_element(&name) && !attrs.trim_end().ends_with('/') {
            out.push_str(html[copied..tag_end - 1].trim_end());
            out.push_str(" />");
            copied = tag_end;
        }
        pos = tag_end;
    }

    if copied == 0 {
        return Cow::Borrowed(html);
    }
    out.push_str(&html[copied..]);
    Cow::Owned(out)
}

// =============================================================================
// Token Lists
// =============================================================================

/// An ordered, de-duplicated set of space-separated tokens.
///
/// Used for the `class` and `rel` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList(Vec<String>);

impl TokenList {
    /// Parse a token list, dropping empty and repeated tokens.
    pub fn parse(value: &str) -> Self {
        let mut list = Self::default();
        for token in value.split_ascii_whitespace() {
            list.push(token);
        }
        list
    }

    /// Append a token unless already present. Returns `true` if added.
    pub fn push(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.0.push(token.to_string());
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Check whether any token is a member of `other`.
    pub fn intersects<S: AsRef<str>>(&self, other: &[S]) -> bool {
        other.iter().any(|t| self.contains(t.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join tokens with single spaces.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

// =============================================================================
// Fragment Cleanup
// =============================================================================

static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\x{2028}|\x{2029}").unwrap());

static RE_INTER_TAG_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

/// Normalize line breaks to `\n` and drop whitespace between adjacent tags.
pub fn normalize_fragment(html: &str) -> Cow<'_, str> {
    let html = RE_LINE_BREAK.replace_all(html, "\n");
    if !RE_INTER_TAG_SPACE.is_match(&html) {
        return html;
    }
    Cow::Owned(RE_INTER_TAG_SPACE.replace_all(&html, "><").into_owned())
}

/// Remove literal `<![CDATA[` and `]]>` markers.
pub fn strip_cdata(html: &str) -> Cow<'_, str> {
    if !html.contains("<![CDATA[") && !html.contains("]]>") {
        return Cow::Borrowed(html);
    }
    Cow::Owned(html.replace("<![CDATA[", "").replace("]]>", ""))
}

// =============================================================================
// Tests
// =============================================================================
