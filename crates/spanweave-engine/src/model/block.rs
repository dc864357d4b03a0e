use serde::{Deserialize, Serialize};

use super::kind::{NodeKind, TextKind};
use super::span::{LinkData, Span};

/// One entry of a rich text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
}

/// Ordered blocks; order is document order.
pub type RichTextField = Vec<Block>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
            direction: None,
        }
    }

    pub fn with_spans(mut self, spans: Vec<Span>) -> Self {
        self.spans = spans;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageBlock {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Asset reference returned by the media registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "linkTo", default, skip_serializing_if = "Option::is_none")]
    pub link_to: Option<LinkData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub oembed: OEmbed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OEmbed {
    pub embed_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Block {
    /// Wraps a text block in the variant for `kind`.
    pub fn text(kind: TextKind, block: TextBlock) -> Self {
        match kind {
            TextKind::Heading1 => Block::Heading1(block),
            TextKind::Heading2 => Block::Heading2(block),
            TextKind::Heading3 => Block::Heading3(block),
            TextKind::Heading4 => Block::Heading4(block),
            TextKind::Heading5 => Block::Heading5(block),
            TextKind::Heading6 => Block::Heading6(block),
            TextKind::Paragraph => Block::Paragraph(block),
            TextKind::Preformatted => Block::Preformatted(block),
            TextKind::ListItem => Block::ListItem(block),
            TextKind::OListItem => Block::OListItem(block),
        }
    }

    pub fn paragraph(text: impl Into<String>, spans: Vec<Span>) -> Self {
        Block::Paragraph(TextBlock::new(text).with_spans(spans))
    }

    pub fn kind(&self) -> NodeKind {
        match self.as_text() {
            Some((kind, _)) => kind.into(),
            None => match self {
                Block::Image(_) => NodeKind::Image,
                _ => NodeKind::Embed,
            },
        }
    }

    pub fn as_text(&self) -> Option<(TextKind, &TextBlock)> {
        Some(match self {
            Block::Heading1(b) => (TextKind::Heading1, b),
            Block::Heading2(b) => (TextKind::Heading2, b),
            Block::Heading3(b) => (TextKind::Heading3, b),
            Block::Heading4(b) => (TextKind::Heading4, b),
            Block::Heading5(b) => (TextKind::Heading5, b),
            Block::Heading6(b) => (TextKind::Heading6, b),
            Block::Paragraph(b) => (TextKind::Paragraph, b),
            Block::Preformatted(b) => (TextKind::Preformatted, b),
            Block::ListItem(b) => (TextKind::ListItem, b),
            Block::OListItem(b) => (TextKind::OListItem, b),
            Block::Image(_) | Block::Embed(_) => return None,
        })
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::Heading4(b)
            | Block::Heading5(b)
            | Block::Heading6(b)
            | Block::Paragraph(b)
            | Block::Preformatted(b)
            | Block::ListItem(b)
            | Block::OListItem(b) => Some(b),
            Block::Image(_) | Block::Embed(_) => None,
        }
    }

    /// Block text, if this is a text-bearing kind.
    pub fn text_content(&self) -> Option<&str> {
        self.as_text().map(|(_, b)| b.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn paragraph_wire_format() {
        let block = Block::paragraph("foo bar", vec![Span::em(0, 3)]);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "paragraph",
                "text": "foo bar",
                "spans": [{ "start": 0, "end": 3, "type": "em" }]
            })
        );
    }

    #[test]
    fn reads_storage_field_with_media() {
        let field: RichTextField = serde_json::from_value(json!([
            { "type": "heading2", "text": "Title", "spans": [], "direction": "rtl" },
            {
                "type": "image",
                "url": "https://images.example.com/a.png",
                "alt": "a",
                "copyright": null,
                "dimensions": { "width": 10, "height": 20 }
            },
            { "type": "embed", "oembed": { "embed_url": "https://youtu.be/x", "type": "video" } }
        ]))
        .unwrap();

        assert_eq!(field.len(), 3);
        assert_eq!(field[0].kind(), NodeKind::Heading2);
        assert_eq!(
            field[0].as_text().unwrap().1.direction,
            Some(Direction::Rtl)
        );
        match &field[1] {
            Block::Image(image) => {
                assert_eq!(image.alt.as_deref(), Some("a"));
                assert_eq!(
                    image.dimensions,
                    Some(Dimensions {
                        width: 10,
                        height: 20
                    })
                );
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert_eq!(field[2].kind(), NodeKind::Embed);
    }

    #[test]
    fn missing_spans_default_to_empty() {
        let block: Block =
            serde_json::from_value(json!({ "type": "o-list-item", "text": "x" })).unwrap();
        assert_eq!(block, Block::OListItem(TextBlock::new("x")));
    }
}
