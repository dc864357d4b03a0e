// Shared by several bench targets; each one only uses part of it.
use spanweave_engine::{Block, LinkData, Span, TextBlock};

#[allow(dead_code)]
pub fn generate_field(blocks: usize) -> Vec<Block> {
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod.";
    (0..blocks)
        .map(|i| {
            let spans = vec![
                Span::strong(0, 11),
                Span::em(6, 21),
                Span::hyperlink(18, 40, LinkData::web("https://example.com")),
                Span::strong(30, 50),
                Span::em(45, 72),
            ];
            match i % 4 {
                0 => Block::Heading2(TextBlock::new(text).with_spans(spans)),
                1 | 2 => Block::ListItem(TextBlock::new(text).with_spans(spans)),
                _ => Block::paragraph(text, spans),
            }
        })
        .collect()
}

#[allow(dead_code)]
pub fn generate_html(sections: usize) -> String {
    let base = "<h2>Section title</h2>\n\
                <p>Paragraph with <strong>bold</strong>, <em>italic</em> and \
                <a href=\"https://example.com\">a link</a>.</p>\n\
                <ul>\n  <li>First <b>item</b></li>\n  <li>Second item</li>\n</ul>\n\
                <p>Text <img src=\"https://img.example.com/a.png\" alt=\"pic\"> around an image.</p>\n";
    format!("<article>{}</article>", base.repeat(sections))
}
