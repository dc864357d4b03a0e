use crate::model::{Block, utf16::preview};
use crate::serialize::{SerializeArgs, serialize, serialize_node};
use crate::tree::{NodeData, TreeNode};

const PREVIEW_CHARS: usize = 60;

/// One line per node, children indented by two spaces.
///
/// Text nodes show their text, media nodes their source URL.
pub fn render(field: &[Block]) -> String {
    serialize(field, &outline_line).join("\n")
}

/// Outline of a single subtree.
pub fn render_node(node: &TreeNode) -> String {
    serialize_node(node, &outline_line).unwrap_or_default()
}

fn outline_line(args: &SerializeArgs<'_, String>) -> Option<String> {
    let mut line = args.kind.as_str().to_string();
    if let Some(text) = args.text {
        line.push_str(&format!(" {:?}", preview(text, PREVIEW_CHARS)));
    }
    match args.node {
        NodeData::Block(Block::Image(image)) => line.push_str(&format!(" <{}>", image.url)),
        NodeData::Block(Block::Embed(embed)) => {
            line.push_str(&format!(" <{}>", embed.oembed.embed_url));
        }
        _ => {}
    }
    for child in args.children {
        for child_line in child.lines() {
            line.push_str("\n  ");
            line.push_str(child_line);
        }
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageBlock, Span, TextBlock};

    #[test]
    fn outline_of_mixed_field() {
        let field = vec![
            Block::Heading1(TextBlock::new("Title")),
            Block::ListItem(TextBlock::new("A").with_spans(vec![Span::em(0, 1)])),
            Block::ListItem(TextBlock::new("B")),
            Block::Image(ImageBlock {
                url: "https://example.com/a.png".into(),
                ..ImageBlock::default()
            }),
        ];
        insta::assert_snapshot!(render(&field), @r#"
        heading1 "Title"
          span "Title"
        group-list-item
          list-item "A"
            em "A"
              span "A"
          list-item "B"
            span "B"
        image <https://example.com/a.png>
        "#);
    }
}
