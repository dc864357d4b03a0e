//! # Rich Text Model
//!
//! The flat storage format: an ordered list of [`Block`]s, each text-bearing
//! block carrying [`Span`]s that annotate UTF-16 ranges of its text.
//!
//! ## Modules
//!
//! - **`block`**: `Block` and its payloads (`TextBlock`, `ImageBlock`, `EmbedBlock`)
//! - **`span`**: `Span`, `SpanKind` and link/label payloads
//! - **`kind`**: `NodeKind` names shared by tree nodes and serializers
//! - **`utf16`**: offset conversion between UTF-16 units and UTF-8 bytes
//! - **`invariants`**: offset checks and the clamping policy used by the tree builder

pub mod block;
pub mod invariants;
pub mod kind;
pub mod span;
pub mod utf16;

pub use block::{
    Block, Dimensions, Direction, EmbedBlock, ImageBlock, OEmbed, RichTextField, TextBlock,
};
pub use kind::{NodeKind, TextKind, UnknownNodeKind};
pub use span::{LabelData, LinkData, Span, SpanKind};
