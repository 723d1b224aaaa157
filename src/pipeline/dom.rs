//! Minimal element tree for inspecting an anchor, plus start-tag rewriting.
//!
//! The transformer only needs element names, ordered attributes and nested
//! elements, so parsing is hidden behind [`FragmentParser`] and the tree is
//! our own. [`TlParser`] builds it from `tl`; attribute lists are read from
//! each tag's source text so their order and spelling survive.
//!
//! The tree is never serialized as a whole. [`rewrite_start_tag`] rebuilds
//! the leading start tag from an [`Element`] and keeps everything after it
//! as written, apart from closing void elements as `<tag />` and stripping
//! `<![CDATA[` / `]]>` markers.

use crate::utils::html::{
    Attribute, is_void_element, parse_attributes, self_close_void_tags, split_start_tag,
    start_tag_len, strip_cdata,
};

// =============================================================================
// Tree
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attribute value, matched case-insensitively; valueless attributes
    /// read as `""`.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.is(name))
            .map(|a| a.value.as_deref().unwrap_or_default())
    }

    /// Set an attribute in place, or append it if missing.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.is(name)) {
            Some(attr) => attr.set_value(value),
            None => self.attrs.push(Attribute::new(name, Some(value))),
        }
    }

    /// Descendant elements named `tag`, in document order.
    pub fn descendants(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(&self.children, tag, &mut found);
        found
    }
}

fn collect_descendants<'a>(elems: &'a [Element], tag: &str, found: &mut Vec<&'a Element>) {
    for elem in elems {
        if elem.tag == tag {
            found.push(elem);
        }
        collect_descendants(&elem.children, tag, found);
    }
}

/// Top-level elements of a parsed fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub elements: Vec<Element>,
}

impl Fragment {
    /// First element named `tag`, depth first.
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        find_in(&mut self.elements, tag)
    }
}

fn find_in<'a>(elems: &'a mut [Element], tag: &str) -> Option<&'a mut Element> {
    for elem in elems {
        if elem.tag == tag {
            return Some(elem);
        }
        if let Some(found) = find_in(&mut elem.children, tag) {
            return Some(found);
        }
    }
    None
}

// =============================================================================
// Rewriting
// =============================================================================

/// Re-emit `source` with its leading start tag rebuilt from `elem`.
///
/// The tag name keeps its source spelling and untouched attributes keep
/// their source text. `None` if `source` does not open with a start tag.
pub fn rewrite_start_tag(source: &str, elem: &Element) -> Option<String> {
    let (name, _) = split_start_tag(source)?;
    let rest = &source[start_tag_len(source)?..];

    let mut out = String::with_capacity(source.len() + 64);
    out.push('<');
    out.push_str(name);
    for attr in &elem.attrs {
        attr.write_to(&mut out);
    }
    if is_void_element(&elem.tag) {
        out.push_str(" />");
    } else {
        out.push('>');
    }
    out.push_str(&self_close_void_tags(rest));

    Some(strip_cdata(&out).into_owned())
}

// =============================================================================
// Parsing
// =============================================================================

/// Turns an HTML fragment into a [`Fragment`].
pub trait FragmentParser: Send + Sync {
    /// `None` when the input yields no usable content.
    fn parse(&self, html: &str) -> Option<Fragment>;
}

/// [`FragmentParser`] backed by the `tl` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlParser;

impl FragmentParser for TlParser {
    fn parse(&self, html: &str) -> Option<Fragment> {
        let dom = tl::parse(html, tl::ParserOptions::default()).ok()?;
        let parser = dom.parser();

        let mut elements = Vec::new();
        for handle in dom.children() {
            convert_node(*handle, parser, &mut elements);
        }

        if elements.is_empty() {
            None
        } else {
            Some(Fragment { elements })
        }
    }
}

/// Convert a tl node handle into elements appended to `out`.
///
/// Text and comments carry nothing the transform reads and are dropped.
fn convert_node(handle: tl::NodeHandle, parser: &tl::Parser, out: &mut Vec<Element>) {
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return;
    };

    let raw = tag.raw().as_utf8_str();
    let mut elem = Element::new(tag.name().as_utf8_str().to_ascii_lowercase());
    elem.attrs = split_start_tag(&raw)
        .map(|(_, attrs)| parse_attributes(attrs))
        .unwrap_or_default();

    let mut children = Vec::new();
    for child in tag.children().top().iter() {
        convert_node(*child, parser, &mut children);
    }

    // Void elements cannot own content; anything nested under one
    // by the parser belongs after it
    if is_void_element(&elem.tag) {
        out.push(elem);
        out.extend(children);
    } else {
        elem.children = children;
        out.push(elem);
    }
}
