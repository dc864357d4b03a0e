use crate::model::{Block, NodeKind, Span};

/// Identifier of a node within one built tree.
///
/// Keys are unique per [`Tree`] only; building the same field twice yields
/// the same keys, but they carry no meaning outside the call that made them.
pub type TreeKey = usize;

/// The nested form of a rich text field.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub key: TreeKey,
    pub children: Vec<TreeNode>,
}

/// A node of the nested form, with its source node and resolved children.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub key: TreeKey,
    pub kind: NodeKind,
    /// Text covered by this node, for text blocks, spans and text leaves.
    pub text: Option<String>,
    pub node: NodeData,
    pub children: Vec<TreeNode>,
}

/// The source node a [`TreeNode`] was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// A stored block, unchanged.
    Block(Block),
    /// Consecutive list items grouped into one list.
    List(Vec<Block>),
    /// A span with offsets relative to its parent node's text.
    Span(Span),
    /// Unstyled text.
    Text,
}

impl TreeNode {
    /// Concatenated text of all leaves below this node, in tree order.
    pub fn leaf_text(&self) -> String {
        let mut out = String::new();
        self.collect_leaf_text(&mut out);
        out
    }

    fn collect_leaf_text(&self, out: &mut String) {
        if self.children.is_empty() {
            if let Some(text) = &self.text {
                out.push_str(text);
            }
            return;
        }
        for child in &self.children {
            child.collect_leaf_text(out);
        }
    }
}

/// Hands out keys in creation order for a single build.
#[derive(Debug, Default)]
pub(crate) struct KeyGen {
    next: TreeKey,
}

impl KeyGen {
    pub(crate) fn next(&mut self) -> TreeKey {
        let key = self.next;
        self.next += 1;
        key
    }
}
