//! Owned element tree the pipeline works on.
//!
//! The parsed document is copied out of `scraper` once, applying container,
//! exclude and include selection and marking selector-keyed serializer
//! entries on the way. Everything after that runs on this tree.

use std::sync::OnceLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Html, Node, Selector};

use super::error::IngestError;

/// An element of the cleaned source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lower-case tag name.
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
    /// Index of the first selector-keyed serializer entry matching this element.
    pub(crate) mark: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

impl HtmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value, ignoring it when blank.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Re-serializes the element, e.g. to keep an embed's markup.
    pub fn outer_html(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            out.push_str(&format!(
                " {name}=\"{}\"",
                encode_double_quoted_attribute(value)
            ));
        }
        out.push('>');
        if is_void(&self.tag) {
            return out;
        }
        for child in &self.children {
            match child {
                HtmlNode::Text(text) => out.push_str(&encode_text(text)),
                HtmlNode::Element(el) => out.push_str(&el.outer_html()),
            }
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

fn collect_text(nodes: &[HtmlNode], out: &mut String) {
    for node in nodes {
        match node {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

/// Elements that never carry document content.
fn is_skipped(tag: &str) -> bool {
    matches!(
        tag,
        "head" | "script" | "style" | "template" | "noscript" | "title" | "meta" | "link"
    )
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, IngestError> {
    Selector::parse(selector).map_err(|e| IngestError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Selectors compiled from the configuration.
#[derive(Debug, Default)]
pub(crate) struct Selection {
    pub(crate) container: Option<(String, Selector)>,
    pub(crate) exclude: Vec<Selector>,
    pub(crate) include: Vec<Selector>,
    /// Selector-keyed serializer entries, in configuration order.
    pub(crate) marks: Vec<Selector>,
}

impl Selection {
    fn excluded(&self, el: &ElementRef<'_>) -> bool {
        self.exclude.iter().any(|s| s.matches(el))
    }

    fn included(&self, el: &ElementRef<'_>) -> bool {
        self.include.iter().any(|s| s.matches(el))
    }
}

/// Parses `html` and returns the cleaned top-level nodes.
pub(crate) fn build(html: &str, selection: &Selection) -> Result<Vec<HtmlNode>, IngestError> {
    static BODY: OnceLock<Selector> = OnceLock::new();

    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let scope: Vec<ElementRef<'_>> = match &selection.container {
        Some((raw, selector)) => {
            let container = doc
                .select(selector)
                .next()
                .ok_or_else(|| IngestError::ContainerNotFound(raw.clone()))?;
            vec![container]
        }
        None => {
            let body = BODY.get_or_init(|| Selector::parse("body").expect("Invalid body selector"));
            vec![doc.select(body).next().unwrap_or(root)]
        }
    };

    if !selection.include.is_empty() {
        let mut matched = Vec::new();
        for el in &scope {
            collect_included(*el, selection, &mut matched);
        }
        log::debug!("include selectors matched {} subtrees", matched.len());
        return Ok(matched
            .into_iter()
            .filter_map(|el| convert(el, selection))
            .map(HtmlNode::Element)
            .collect());
    }

    Ok(match &selection.container {
        Some(_) => scope
            .into_iter()
            .filter_map(|el| convert(el, selection))
            .map(HtmlNode::Element)
            .collect(),
        None => scope
            .into_iter()
            .flat_map(|el| convert_children(el, selection))
            .collect(),
    })
}

/// Top-down search that stops descending at the first match.
fn collect_included<'a>(el: ElementRef<'a>, selection: &Selection, out: &mut Vec<ElementRef<'a>>) {
    if selection.excluded(&el) || is_skipped(el.value().name()) {
        return;
    }
    if selection.included(&el) {
        out.push(el);
        return;
    }
    for child in el.children() {
        if let Some(child) = ElementRef::wrap(child) {
            collect_included(child, selection, out);
        }
    }
}

fn convert(el: ElementRef<'_>, selection: &Selection) -> Option<HtmlElement> {
    let tag = el.value().name().to_ascii_lowercase();
    if is_skipped(&tag) || selection.excluded(&el) {
        return None;
    }
    Some(HtmlElement {
        attrs: el
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        mark: selection.marks.iter().position(|s| s.matches(&el)),
        children: convert_children(el, selection),
        tag,
    })
}

fn convert_children(el: ElementRef<'_>, selection: &Selection) -> Vec<HtmlNode> {
    let mut out = Vec::new();
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push(HtmlNode::Text(String::from(&**text))),
            Node::Element(_) => {
                if let Some(converted) = ElementRef::wrap(child).and_then(|c| convert(c, selection))
                {
                    out.push(HtmlNode::Element(converted));
                }
            }
            _ => {}
        }
    }
    out
}
