//! Deciding what each element becomes.
//!
//! Lookup order is the selector-keyed entry marked on the element, then the
//! tag-keyed entry, then the built-in mapping. A function entry that returns
//! `None` falls through to the next step.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::Selector;

use crate::model::{
    Dimensions, Direction, ImageBlock, LabelData, LinkData, NodeKind, OEmbed, SpanKind, TextKind,
};

use super::config::{NodeSpec, SerializerEntry, SerializerFn};
use super::dom::{HtmlElement, HtmlNode, parse_selector};
use super::error::{IngestError, Warning};

fn tag_key() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*$").expect("Invalid tag key regex"))
}

/// Node types a serializer may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shorthand {
    Text(TextKind),
    Strong,
    Em,
    Hyperlink,
    Image,
    Embed,
}

impl Shorthand {
    pub(crate) fn parse(name: &str) -> Result<Self, IngestError> {
        let unknown = || IngestError::UnknownShorthand(name.to_string());
        let kind: NodeKind = name.parse().map_err(|_| unknown())?;
        Ok(match kind {
            NodeKind::Strong => Shorthand::Strong,
            NodeKind::Em => Shorthand::Em,
            NodeKind::Hyperlink => Shorthand::Hyperlink,
            NodeKind::Image => Shorthand::Image,
            NodeKind::Embed => Shorthand::Embed,
            other => Shorthand::Text(TextKind::try_from(other).map_err(|_| unknown())?),
        })
    }

    fn target(self, el: &HtmlElement, warnings: &mut Vec<Warning>) -> Target {
        match self {
            Shorthand::Text(kind) => Target::Block {
                kind,
                direction: direction_of(el),
            },
            Shorthand::Strong => Target::Span(SpanKind::Strong),
            Shorthand::Em => Target::Span(SpanKind::Em),
            Shorthand::Hyperlink => hyperlink(el, warnings),
            Shorthand::Image => image(el, warnings),
            Shorthand::Embed => embed(el, warnings),
        }
    }
}

/// Conversion decided for one element.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Target {
    Block {
        kind: TextKind,
        direction: Option<Direction>,
    },
    Span(SpanKind),
    Image(ImageBlock),
    Embed(OEmbed),
    LineBreak,
    /// The element contributes its children only.
    Transparent,
    /// The element and its subtree are dropped.
    Omit,
}

/// List element enclosing the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListContext {
    Unordered,
    Ordered,
}

enum Compiled<'a> {
    Shorthand(Shorthand),
    Function(&'a SerializerFn),
}

/// Serializer entries with shorthands validated and keys split by kind.
pub(crate) struct SerializerTable<'a> {
    by_tag: HashMap<String, Compiled<'a>>,
    /// Indexed by [`HtmlElement::mark`].
    by_selector: Vec<Compiled<'a>>,
}

impl<'a> SerializerTable<'a> {
    /// Compiles `entries`, returning the table and the selectors to mark.
    pub(crate) fn compile(
        entries: &'a [(String, SerializerEntry)],
    ) -> Result<(Self, Vec<Selector>), IngestError> {
        let mut table = SerializerTable {
            by_tag: HashMap::new(),
            by_selector: Vec::new(),
        };
        let mut marks = Vec::new();

        for (key, entry) in entries {
            let compiled = match entry {
                SerializerEntry::Shorthand(name) => Compiled::Shorthand(Shorthand::parse(name)?),
                SerializerEntry::Function(f) => Compiled::Function(f.as_ref()),
            };
            let key = key.trim();
            if tag_key().is_match(key) {
                table
                    .by_tag
                    .entry(key.to_ascii_lowercase())
                    .or_insert(compiled);
            } else {
                marks.push(parse_selector(key)?);
                table.by_selector.push(compiled);
            }
        }

        log::debug!(
            "serializer table: {} tag entries, {} selector entries",
            table.by_tag.len(),
            table.by_selector.len()
        );
        Ok((table, marks))
    }

    pub(crate) fn resolve(
        &self,
        el: &HtmlElement,
        list: Option<ListContext>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Target, IngestError> {
        if let Some(entry) = el.mark.and_then(|i| self.by_selector.get(i))
            && let Some(target) = apply(entry, el, warnings)?
        {
            return Ok(target);
        }
        if let Some(entry) = self.by_tag.get(&el.tag)
            && let Some(target) = apply(entry, el, warnings)?
        {
            return Ok(target);
        }
        Ok(builtin(el, list, warnings))
    }
}

fn apply(
    entry: &Compiled<'_>,
    el: &HtmlElement,
    warnings: &mut Vec<Warning>,
) -> Result<Option<Target>, IngestError> {
    match entry {
        Compiled::Shorthand(shorthand) => Ok(Some(shorthand.target(el, warnings))),
        Compiled::Function(f) => match f(el) {
            Some(spec) => spec_target(spec, el, warnings).map(Some),
            None => Ok(None),
        },
    }
}

fn spec_target(
    spec: NodeSpec,
    el: &HtmlElement,
    warnings: &mut Vec<Warning>,
) -> Result<Target, IngestError> {
    Ok(match spec {
        NodeSpec::Shorthand(name) => Shorthand::parse(&name)?.target(el, warnings),
        NodeSpec::Text { kind, direction } => Target::Block { kind, direction },
        NodeSpec::Strong => Target::Span(SpanKind::Strong),
        NodeSpec::Em => Target::Span(SpanKind::Em),
        NodeSpec::Hyperlink(data) => Target::Span(SpanKind::Hyperlink { data }),
        NodeSpec::Label(label) => Target::Span(SpanKind::Label {
            data: LabelData { label },
        }),
        NodeSpec::Image(image) => Target::Image(image),
        NodeSpec::Embed(oembed) => Target::Embed(oembed),
    })
}

fn builtin(el: &HtmlElement, list: Option<ListContext>, warnings: &mut Vec<Warning>) -> Target {
    let text = |kind| Target::Block {
        kind,
        direction: direction_of(el),
    };
    match el.tag.as_str() {
        "h1" => text(TextKind::Heading1),
        "h2" => text(TextKind::Heading2),
        "h3" => text(TextKind::Heading3),
        "h4" => text(TextKind::Heading4),
        "h5" => text(TextKind::Heading5),
        "h6" => text(TextKind::Heading6),
        "p" => text(TextKind::Paragraph),
        "pre" => text(TextKind::Preformatted),
        "li" => match list {
            Some(ListContext::Ordered) => text(TextKind::OListItem),
            _ => text(TextKind::ListItem),
        },
        "strong" | "b" => Target::Span(SpanKind::Strong),
        "em" | "i" => Target::Span(SpanKind::Em),
        "a" => hyperlink(el, warnings),
        "img" => image(el, warnings),
        "iframe" | "embed" | "video" | "audio" => embed(el, warnings),
        "br" => Target::LineBreak,
        _ => Target::Transparent,
    }
}

fn direction_of(el: &HtmlElement) -> Option<Direction> {
    match el.attr("dir")?.trim().to_ascii_lowercase().as_str() {
        "rtl" => Some(Direction::Rtl),
        "ltr" => Some(Direction::Ltr),
        _ => None,
    }
}

fn hyperlink(el: &HtmlElement, warnings: &mut Vec<Warning>) -> Target {
    match el.non_empty_attr("href") {
        Some(url) => Target::Span(SpanKind::Hyperlink {
            data: LinkData::Web {
                url: url.to_string(),
                target: el.non_empty_attr("target").map(str::to_string),
            },
        }),
        None => {
            warnings.push(Warning::HyperlinkWithoutHref {
                text: el.text_content(),
            });
            Target::Transparent
        }
    }
}

/// The element itself when it has a `src`, else its first descendant with one.
fn source_element(el: &HtmlElement) -> Option<&HtmlElement> {
    if el.non_empty_attr("src").is_some() {
        return Some(el);
    }
    el.children.iter().find_map(|child| match child {
        HtmlNode::Element(child) => source_element(child),
        HtmlNode::Text(_) => None,
    })
}

fn parse_dimension(el: &HtmlElement, name: &str) -> Option<u32> {
    el.non_empty_attr(name)?.parse().ok()
}

fn image(el: &HtmlElement, warnings: &mut Vec<Warning>) -> Target {
    let source = source_element(el);
    let alt = source
        .unwrap_or(el)
        .attr("alt")
        .filter(|alt| !alt.is_empty())
        .map(str::to_string);
    let Some((source, url)) = source.and_then(|s| s.non_empty_attr("src").map(|url| (s, url)))
    else {
        warnings.push(Warning::ImageWithoutSrc { alt });
        return Target::Omit;
    };
    let dimensions = parse_dimension(source, "width")
        .zip(parse_dimension(source, "height"))
        .map(|(width, height)| Dimensions { width, height });
    Target::Image(ImageBlock {
        url: url.to_string(),
        alt,
        dimensions,
        ..ImageBlock::default()
    })
}

fn embed(el: &HtmlElement, warnings: &mut Vec<Warning>) -> Target {
    let Some(url) = source_element(el).and_then(|s| s.non_empty_attr("src")) else {
        warnings.push(Warning::EmbedWithoutSrc {
            tag: el.tag.clone(),
        });
        return Target::Omit;
    };
    Target::Embed(OEmbed {
        embed_url: url.to_string(),
        kind: if el.tag == "video" { "video" } else { "rich" }.to_string(),
        html: Some(el.outer_html()),
        width: parse_dimension(el, "width"),
        height: parse_dimension(el, "height"),
        title: el.non_empty_attr("title").map(str::to_string),
        id: None,
    })
}
