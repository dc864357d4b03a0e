//! # Serializer Engine
//!
//! Post-order walk over a span tree that hands each node, together with its
//! already-serialized children, to a caller-supplied [`Serializer`].
//!
//! A serializer returns `None` when it has no opinion about a node. The walk
//! drops such nodes from their parent's children; [`compose_serializers`]
//! uses the same signal to fall through to the next serializer.
//!
//! ## Modules
//!
//! - **`compose`**: `compose_serializers()` layering
//! - **`map`**: `MapSerializer` lookup table and `wrap_map_serializer()`

pub mod compose;
pub mod map;

pub use compose::{ComposedSerializer, compose_serializers};
pub use map::{MapSerializer, WrappedMapSerializer, wrap_map_serializer};

use crate::model::{Block, NodeKind};
use crate::tree::{NodeData, TreeKey, TreeNode, as_tree};

/// Everything a serializer sees for one node.
#[derive(Debug)]
pub struct SerializeArgs<'a, R> {
    pub kind: NodeKind,
    pub node: &'a NodeData,
    pub text: Option<&'a str>,
    /// Serialized children, in order, with `None` results already dropped.
    pub children: &'a [R],
    pub key: TreeKey,
}

/// Maps one tree node to an output value.
///
/// Implemented for every `Fn(&SerializeArgs<'_, R>) -> Option<R>`.
pub trait Serializer<R> {
    fn serialize(&self, args: &SerializeArgs<'_, R>) -> Option<R>;
}

impl<R, F> Serializer<R> for F
where
    F: Fn(&SerializeArgs<'_, R>) -> Option<R>,
{
    fn serialize(&self, args: &SerializeArgs<'_, R>) -> Option<R> {
        self(args)
    }
}

/// Builds the tree for `field` and serializes each top-level node.
pub fn serialize<R, S>(field: &[Block], serializer: &S) -> Vec<R>
where
    S: Serializer<R> + ?Sized,
{
    as_tree(field)
        .children
        .iter()
        .filter_map(|node| serialize_node(node, serializer))
        .collect()
}

/// Serializes one subtree, children first.
pub fn serialize_node<R, S>(node: &TreeNode, serializer: &S) -> Option<R>
where
    S: Serializer<R> + ?Sized,
{
    let children: Vec<R> = node
        .children
        .iter()
        .filter_map(|child| serialize_node(child, serializer))
        .collect();

    serializer.serialize(&SerializeArgs {
        kind: node.kind,
        node: &node.node,
        text: node.text.as_deref(),
        children: &children,
        key: node.key,
    })
}
