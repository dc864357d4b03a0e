//! Rich text engine.
//!
//! Moves content between three shapes: the flat span-annotated storage format
//! ([`model`]), a nested tree for rendering ([`tree`], [`serialize`],
//! [`render`]) and arbitrary HTML on the way in ([`ingest`]).

pub mod ingest;
pub mod model;
pub mod render;
pub mod serialize;
pub mod tree;

// Re-export key types for easier usage
pub use ingest::{
    ContentModel, HtmlAsRichTextConfig, HtmlIngester, IngestError, IngestOutput, MediaRegistry,
    NodeSpec, SerializerEntry, Warning, html_as_rich_text, html_as_rich_text_async,
    markdown_as_rich_text, markdown_as_rich_text_async,
};
pub use model::{Block, Direction, LinkData, NodeKind, RichTextField, Span, SpanKind, TextBlock};
pub use render::{as_html, as_text};
pub use serialize::{SerializeArgs, Serializer, compose_serializers, serialize, wrap_map_serializer};
pub use tree::{Tree, TreeNode, as_tree};
