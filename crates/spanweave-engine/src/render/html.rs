use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::{Block, Direction, EmbedBlock, ImageBlock, LinkData, NodeKind, SpanKind};
use crate::serialize::{SerializeArgs, Serializer, compose_serializers, serialize};
use crate::tree::NodeData;

/// Maps a link to an `href`; `None` renders the link text without an anchor.
pub type LinkResolver<'a> = dyn Fn(&LinkData) -> Option<String> + 'a;

/// Options for [`as_html_with`].
#[derive(Default)]
pub struct HtmlOptions<'a> {
    /// Consulted before the built-in markup for every node.
    pub serializer: Option<&'a dyn Serializer<String>>,
    /// Resolves document links. Web and media links use their URL when unset.
    pub link_resolver: Option<&'a LinkResolver<'a>>,
}

impl std::fmt::Debug for HtmlOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlOptions")
            .field("serializer", &self.serializer.is_some())
            .field("link_resolver", &self.link_resolver.is_some())
            .finish()
    }
}

/// Renders a field to HTML with the built-in markup.
pub fn as_html(field: &[Block]) -> String {
    as_html_with(field, &HtmlOptions::default())
}

/// Renders a field to HTML, layering `options.serializer` over the built-in
/// markup.
pub fn as_html_with(field: &[Block], options: &HtmlOptions<'_>) -> String {
    let defaults = DefaultHtmlSerializer {
        link_resolver: options.link_resolver,
    };
    let fallback: &dyn Serializer<String> = &defaults;
    let composed = compose_serializers([options.serializer, Some(fallback)]);
    serialize(field, &composed).concat()
}

/// The built-in markup for every node kind.
pub struct DefaultHtmlSerializer<'a> {
    pub link_resolver: Option<&'a LinkResolver<'a>>,
}

impl DefaultHtmlSerializer<'_> {
    fn href(&self, link: &LinkData) -> Option<String> {
        match self.link_resolver {
            Some(resolve) => resolve(link).or_else(|| link.url().map(str::to_string)),
            None => link.url().map(str::to_string),
        }
    }

    fn anchor_open(&self, link: &LinkData) -> Option<String> {
        let href = self.href(link)?;
        let mut out = format!("<a href=\"{}\"", encode_double_quoted_attribute(&href));
        if let Some(target) = link.target() {
            out.push_str(&format!(
                " target=\"{}\" rel=\"noopener noreferrer\"",
                encode_double_quoted_attribute(target)
            ));
        }
        out.push('>');
        Some(out)
    }

    fn image(&self, image: &ImageBlock) -> String {
        let mut img = format!("<img src=\"{}\"", encode_double_quoted_attribute(&image.url));
        img.push_str(&format!(
            " alt=\"{}\"",
            encode_double_quoted_attribute(image.alt.as_deref().unwrap_or_default())
        ));
        if let Some(copyright) = &image.copyright {
            img.push_str(&format!(
                " copyright=\"{}\"",
                encode_double_quoted_attribute(copyright)
            ));
        }
        img.push_str(" />");
        if let Some(open) = image.link_to.as_ref().and_then(|l| self.anchor_open(l)) {
            img = format!("{open}{img}</a>");
        }
        format!("<p class=\"block-img\">{img}</p>")
    }
}

fn embed(embed: &EmbedBlock) -> String {
    let oembed = &embed.oembed;
    format!(
        "<div data-oembed=\"{}\" data-oembed-type=\"{}\">{}</div>",
        encode_double_quoted_attribute(&oembed.embed_url),
        encode_double_quoted_attribute(&oembed.kind),
        oembed.html.as_deref().unwrap_or_default()
    )
}

fn dir_attr(node: &NodeData) -> &'static str {
    match node {
        NodeData::Block(block) => match block.as_text().and_then(|(_, b)| b.direction) {
            Some(Direction::Rtl) => " dir=\"rtl\"",
            Some(Direction::Ltr) => " dir=\"ltr\"",
            None => "",
        },
        _ => "",
    }
}

impl Serializer<String> for DefaultHtmlSerializer<'_> {
    fn serialize(&self, args: &SerializeArgs<'_, String>) -> Option<String> {
        let inner = args.children.concat();
        let dir = dir_attr(args.node);
        let html = match args.kind {
            NodeKind::Heading1 => format!("<h1{dir}>{inner}</h1>"),
            NodeKind::Heading2 => format!("<h2{dir}>{inner}</h2>"),
            NodeKind::Heading3 => format!("<h3{dir}>{inner}</h3>"),
            NodeKind::Heading4 => format!("<h4{dir}>{inner}</h4>"),
            NodeKind::Heading5 => format!("<h5{dir}>{inner}</h5>"),
            NodeKind::Heading6 => format!("<h6{dir}>{inner}</h6>"),
            NodeKind::Paragraph => format!("<p{dir}>{inner}</p>"),
            NodeKind::Preformatted => format!("<pre{dir}>{inner}</pre>"),
            NodeKind::ListItem | NodeKind::OListItem => format!("<li{dir}>{inner}</li>"),
            NodeKind::List => format!("<ul>{inner}</ul>"),
            NodeKind::OList => format!("<ol>{inner}</ol>"),
            NodeKind::Strong => format!("<strong>{inner}</strong>"),
            NodeKind::Em => format!("<em>{inner}</em>"),
            NodeKind::Span => encode_text(args.text.unwrap_or_default()).replace('\n', "<br />"),
            NodeKind::Label => match args.node {
                NodeData::Span(span) => match &span.kind {
                    SpanKind::Label { data } => format!(
                        "<span class=\"{}\">{inner}</span>",
                        encode_double_quoted_attribute(&data.label)
                    ),
                    _ => inner,
                },
                _ => inner,
            },
            NodeKind::Hyperlink => match args.node {
                NodeData::Span(span) => match &span.kind {
                    SpanKind::Hyperlink { data } => match self.anchor_open(data) {
                        Some(open) => format!("{open}{inner}</a>"),
                        None => inner,
                    },
                    _ => inner,
                },
                _ => inner,
            },
            NodeKind::Image => match args.node {
                NodeData::Block(Block::Image(image)) => self.image(image),
                _ => return None,
            },
            NodeKind::Embed => match args.node {
                NodeData::Block(Block::Embed(block)) => embed(block),
                _ => return None,
            },
        };
        Some(html)
    }
}
