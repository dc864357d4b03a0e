//! Walks the cleaned tree and accumulates flat blocks.
//!
//! Text goes into the currently open block, opening an implicit paragraph
//! when none is open. Spans record where they opened and are written to the
//! block when they close. Media and nested blocks interrupt the open block:
//! it is flushed, the interruption is emitted, and a block of the same kind
//! resumes afterwards with any open spans continuing into it.
//!
//! Spaces and line breaks at the edges of a block are dropped. The edges a
//! media interruption creates are not block edges, so text flowing around
//! an image keeps its spacing.

use crate::model::utf16::utf16_len;
use crate::model::{
    Block, Direction, EmbedBlock, ImageBlock, LinkData, NodeKind, OEmbed, Span, SpanKind,
    TextBlock, TextKind,
};

use super::dom::{HtmlElement, HtmlNode};
use super::error::{IngestError, Warning};
use super::media::{MediaKind, MediaRef, MediaRegistry};
use super::resolve::{ListContext, SerializerTable, Target};
use super::whitespace::is_block_tag;

struct OpenBlock {
    kind: TextKind,
    direction: Option<Direction>,
    /// Opened for stray inline content rather than by an element.
    implicit: bool,
    /// Resumed after media, so leading whitespace is part of the flow.
    continued: bool,
    text: String,
    /// UTF-16 length of `text`.
    len: usize,
    spans: Vec<Span>,
}

impl OpenBlock {
    fn new(kind: TextKind, direction: Option<Direction>, implicit: bool) -> Self {
        Self {
            kind,
            direction,
            implicit,
            continued: false,
            text: String::new(),
            len: 0,
            spans: Vec::new(),
        }
    }

    fn resume(from: Resume) -> Self {
        Self::new(from.kind, from.direction, from.implicit)
    }

    fn trims_leading(&self) -> bool {
        self.len == 0 && !self.continued && self.kind != TextKind::Preformatted
    }

    /// Drops trailing spaces and line breaks, shortening spans that covered
    /// them.
    fn trim_end(&mut self) {
        let kept = self.text.trim_end_matches(EDGE_WHITESPACE).len();
        if kept == self.text.len() {
            return;
        }
        self.text.truncate(kept);
        self.len = utf16_len(&self.text);
        let len = self.len;
        self.spans.retain_mut(|span| {
            span.end = span.end.min(len);
            span.start < span.end
        });
    }
}

/// What an interrupted block was, so it can be reopened.
#[derive(Debug, Clone, Copy)]
struct Resume {
    kind: TextKind,
    direction: Option<Direction>,
    implicit: bool,
}

/// Whitespace dropped at block edges. `<br>` arrives as `\n`.
const EDGE_WHITESPACE: [char; 2] = [' ', '\n'];

/// Why the open block is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    /// The block really ends here.
    Edge,
    /// Media is cutting in; the text continues after it.
    Interrupt,
}

struct OpenSpan {
    kind: SpanKind,
    /// Offset in the open block, or 0 when none is open yet.
    start: usize,
}

fn is_list_item(kind: TextKind) -> bool {
    matches!(kind, TextKind::ListItem | TextKind::OListItem)
}

pub(crate) struct Extractor<'a> {
    table: &'a SerializerTable<'a>,
    registry: &'a dyn MediaRegistry,
    block: Option<OpenBlock>,
    spans: Vec<OpenSpan>,
    lists: Vec<ListContext>,
    blocks: Vec<Block>,
    warnings: Vec<Warning>,
}

impl<'a> Extractor<'a> {
    pub(crate) fn new(table: &'a SerializerTable<'a>, registry: &'a dyn MediaRegistry) -> Self {
        Self {
            table,
            registry,
            block: None,
            spans: Vec::new(),
            lists: Vec::new(),
            blocks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn run(
        mut self,
        nodes: &[HtmlNode],
    ) -> Result<(Vec<Block>, Vec<Warning>), IngestError> {
        self.walk(nodes)?;
        self.flush();
        Ok((self.blocks, self.warnings))
    }

    fn walk(&mut self, nodes: &[HtmlNode]) -> Result<(), IngestError> {
        for node in nodes {
            match node {
                HtmlNode::Text(text) => self.push_text(text),
                HtmlNode::Element(el) => self.element(el)?,
            }
        }
        Ok(())
    }

    fn element(&mut self, el: &HtmlElement) -> Result<(), IngestError> {
        let list = match el.tag.as_str() {
            "ul" => Some(ListContext::Unordered),
            "ol" => Some(ListContext::Ordered),
            _ => None,
        };
        let target = self
            .table
            .resolve(el, self.lists.last().copied(), &mut self.warnings)?;

        if let Some(list) = list {
            self.lists.push(list);
        }
        let result = self.apply(el, target);
        if list.is_some() {
            self.lists.pop();
        }
        result
    }

    fn apply(&mut self, el: &HtmlElement, target: Target) -> Result<(), IngestError> {
        match target {
            Target::Block { kind, direction } => self.nested_block(kind, direction, el)?,
            Target::Span(kind) => {
                self.open_span(kind);
                self.walk(&el.children)?;
                self.close_span();
            }
            Target::Image(image) => self.image(image),
            Target::Embed(oembed) => self.embed(oembed),
            Target::LineBreak => self.push_text("\n"),
            Target::Transparent if is_block_tag(&el.tag) => self.boundary(el)?,
            Target::Transparent => self.walk(&el.children)?,
            Target::Omit => {}
        }
        Ok(())
    }

    fn nested_block(
        &mut self,
        kind: TextKind,
        direction: Option<Direction>,
        el: &HtmlElement,
    ) -> Result<(), IngestError> {
        // Paragraphs inside a list item continue the list.
        let (kind, direction) = match &self.block {
            Some(outer)
                if !outer.implicit && is_list_item(outer.kind) && kind == TextKind::Paragraph =>
            {
                (outer.kind, direction.or(outer.direction))
            }
            _ => (kind, direction),
        };

        let outer = self.flush();
        self.block = Some(OpenBlock::new(kind, direction, false));
        self.walk(&el.children)?;
        self.flush();
        if let Some(outer) = outer {
            self.block = Some(OpenBlock::resume(outer));
        }
        Ok(())
    }

    /// A block-level container with no mapping of its own.
    ///
    /// Inside an explicit block it is plain content. Elsewhere it separates
    /// the implicit paragraphs before, inside and after it.
    fn boundary(&mut self, el: &HtmlElement) -> Result<(), IngestError> {
        if self.block.as_ref().is_some_and(|b| !b.implicit) {
            return self.walk(&el.children);
        }
        self.flush();
        self.walk(&el.children)?;
        self.flush();
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        let block = self
            .block
            .get_or_insert_with(|| OpenBlock::new(TextKind::Paragraph, None, true));
        let text = if block.trims_leading() {
            text.trim_start_matches(EDGE_WHITESPACE)
        } else {
            text
        };
        if text.is_empty() {
            return;
        }
        block.text.push_str(text);
        block.len += utf16_len(text);
    }

    fn open_span(&mut self, kind: SpanKind) {
        let start = self.block.as_ref().map_or(0, |b| b.len);
        self.spans.push(OpenSpan { kind, start });
    }

    fn close_span(&mut self) {
        let Some(span) = self.spans.pop() else {
            return;
        };
        if let Some(block) = &mut self.block
            && span.start < block.len
        {
            block.spans.push(Span::new(span.start, block.len, span.kind));
        }
    }

    /// Innermost open hyperlink.
    fn open_link(&self) -> Option<LinkData> {
        self.spans.iter().rev().find_map(|span| match &span.kind {
            SpanKind::Hyperlink { data } => Some(data.clone()),
            _ => None,
        })
    }

    fn image(&mut self, mut image: ImageBlock) {
        if image.link_to.is_none() {
            image.link_to = self.open_link();
        }
        if image.id.is_none() {
            let id = self.registry.register(&MediaRef {
                kind: MediaKind::Image,
                url: &image.url,
                alt: image.alt.as_deref(),
            });
            image.id = id;
        }
        self.interrupt(Block::Image(image));
    }

    fn embed(&mut self, mut oembed: OEmbed) {
        if oembed.id.is_none() {
            let id = self.registry.register(&MediaRef {
                kind: MediaKind::Embed,
                url: &oembed.embed_url,
                alt: oembed.title.as_deref(),
            });
            oembed.id = id;
        }
        self.interrupt(Block::Embed(EmbedBlock { oembed }));
    }

    fn interrupt(&mut self, block: Block) {
        let outer = self.close(Close::Interrupt);
        self.blocks.push(block);
        if let Some(outer) = outer {
            let mut resumed = OpenBlock::resume(outer);
            resumed.continued = true;
            self.block = Some(resumed);
        }
    }

    fn flush(&mut self) -> Option<Resume> {
        self.close(Close::Edge)
    }

    /// Closes the open block, carrying open spans over to whatever opens next.
    fn close(&mut self, why: Close) -> Option<Resume> {
        let mut block = self.block.take()?;
        for span in &mut self.spans {
            if span.start < block.len {
                block
                    .spans
                    .push(Span::new(span.start, block.len, span.kind.clone()));
            }
            span.start = 0;
        }

        let resume = Resume {
            kind: block.kind,
            direction: block.direction,
            implicit: block.implicit,
        };

        let blank = if block.kind == TextKind::Preformatted {
            block.text.is_empty()
        } else {
            if why == Close::Edge {
                block.trim_end();
            }
            block.text.trim().is_empty()
        };
        if blank {
            log::debug!("dropping empty {} block", NodeKind::from(block.kind));
        } else {
            self.blocks.push(Block::text(
                block.kind,
                TextBlock {
                    text: block.text,
                    spans: block.spans,
                    direction: block.direction,
                },
            ));
        }
        Some(resume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::dom::{Selection, build};
    use crate::ingest::media::NoRegistry;
    use crate::ingest::whitespace::minify;
    use pretty_assertions::assert_eq;

    fn extract(html: &str) -> Vec<Block> {
        let mut nodes = build(html, &Selection::default()).unwrap();
        minify(&mut nodes);
        let (table, _) = SerializerTable::compile(&[]).unwrap();
        let (blocks, _) = Extractor::new(&table, &NoRegistry).run(&nodes).unwrap();
        blocks
    }

    #[test]
    fn inline_markup_becomes_spans() {
        assert_eq!(
            extract("<p>lorem <strong>ipsum</strong> dolor <em>sit</em> amet</p>"),
            vec![Block::paragraph(
                "lorem ipsum dolor sit amet",
                vec![Span::strong(6, 11), Span::em(18, 21)]
            )]
        );
    }

    #[test]
    fn stray_text_opens_implicit_paragraphs() {
        assert_eq!(
            extract("loose <b>text</b><div>boxed</div>tail"),
            vec![
                Block::paragraph("loose text", vec![Span::strong(6, 10)]),
                Block::paragraph("boxed", vec![]),
                Block::paragraph("tail", vec![]),
            ]
        );
    }

    #[test]
    fn images_interrupt_and_resume_the_block() {
        let blocks = extract("<p>before <em>a<img src=\"https://i.test/x.png\">b</em> after</p>");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::paragraph("before a", vec![Span::em(7, 8)]));
        assert!(matches!(&blocks[1], Block::Image(img) if img.url == "https://i.test/x.png"));
        assert_eq!(blocks[2], Block::paragraph("b after", vec![Span::em(0, 1)]));
    }

    #[test]
    fn text_flow_around_images_keeps_its_spaces() {
        let blocks = extract("<p>lorem <img src=\"u\" alt=\"a\"/> ipsum</p>");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::paragraph("lorem ", vec![]));
        assert!(matches!(&blocks[1], Block::Image(img) if img.url == "u"));
        assert_eq!(blocks[2], Block::paragraph(" ipsum", vec![]));
    }

    #[test]
    fn whitespace_only_text_beside_an_image_is_dropped() {
        let blocks = extract("<p> <img src=\"u\"> </p>");
        let [Block::Image(image)] = blocks.as_slice() else {
            panic!("expected one image, got {blocks:?}");
        };
        assert_eq!(image.url, "u");
    }

    #[test]
    fn nested_blocks_still_trim_their_edges() {
        assert_eq!(
            extract("<ul><li>a <ul><li> b</li></ul></li></ul>"),
            vec![
                Block::ListItem(TextBlock::new("a")),
                Block::ListItem(TextBlock::new("b")),
            ]
        );
    }

    #[test]
    fn linked_image_gets_link_to() {
        let blocks = extract("<p><a href=\"https://a.test\"><img src=\"https://i.test/x.png\"></a></p>");
        let [Block::Image(image)] = blocks.as_slice() else {
            panic!("expected one image, got {blocks:?}");
        };
        assert_eq!(image.link_to, Some(LinkData::web("https://a.test")));
    }

    #[test]
    fn lists_map_items_by_enclosing_list() {
        assert_eq!(
            extract("<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>"),
            vec![
                Block::ListItem(TextBlock::new("a")),
                Block::ListItem(TextBlock::new("b")),
                Block::OListItem(TextBlock::new("c")),
            ]
        );
    }

    #[test]
    fn nested_lists_flatten() {
        assert_eq!(
            extract("<ol><li>a<ul><li>b</li></ul></li><li>c</li></ol>"),
            vec![
                Block::OListItem(TextBlock::new("a")),
                Block::ListItem(TextBlock::new("b")),
                Block::OListItem(TextBlock::new("c")),
            ]
        );
    }

    #[test]
    fn paragraphs_inside_list_items_stay_list_items() {
        assert_eq!(
            extract("<ul><li><p>a</p><p>b</p></li></ul>"),
            vec![
                Block::ListItem(TextBlock::new("a")),
                Block::ListItem(TextBlock::new("b")),
            ]
        );
    }

    #[test]
    fn line_breaks_become_newlines() {
        assert_eq!(
            extract("<p>one<br>two</p>"),
            vec![Block::paragraph("one\ntwo", vec![])]
        );
    }

    #[test]
    fn line_breaks_at_block_edges_are_dropped() {
        assert_eq!(
            extract("<p>a<br></p><p><br>b</p><h1>c <br></h1>"),
            vec![
                Block::paragraph("a", vec![]),
                Block::paragraph("b", vec![]),
                Block::Heading1(TextBlock::new("c")),
            ]
        );
    }

    #[test]
    fn empty_blocks_are_dropped() {
        assert_eq!(extract("<p></p><h1> </h1><p><br></p>"), Vec::<Block>::new());
    }

    #[test]
    fn preformatted_text_is_verbatim() {
        assert_eq!(
            extract("<pre>  fn main() {\n    go();\n}</pre>"),
            vec![Block::Preformatted(TextBlock::new("  fn main() {\n    go();\n}"))]
        );
    }

    #[test]
    fn offsets_count_utf16_units() {
        assert_eq!(
            extract("<p>😀 <strong>é</strong></p>"),
            vec![Block::paragraph("😀 é", vec![Span::strong(3, 4)])]
        );
    }

    #[test]
    fn span_around_block_applies_inside() {
        assert_eq!(
            extract("<strong><p>x</p></strong>"),
            vec![Block::paragraph("x", vec![Span::strong(0, 1)])]
        );
    }
}
