use crate::model::Block;

/// Separator used by [`as_text`] between blocks.
pub const DEFAULT_SEPARATOR: &str = " ";

/// Plain text of every text-bearing block, joined by `separator`.
///
/// Images and embeds contribute nothing.
pub fn as_text(field: &[Block], separator: &str) -> String {
    field
        .iter()
        .filter_map(Block::text_content)
        .collect::<Vec<_>>()
        .join(separator)
}
