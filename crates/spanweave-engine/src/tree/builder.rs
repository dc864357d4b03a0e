use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::model::{
    Block, NodeKind, Span,
    invariants::clamp_spans,
    utf16::{self, Utf16Range, utf16_len},
};

use super::types::{KeyGen, NodeData, Tree, TreeNode};

/// Builds the nested tree for a rich text field.
///
/// Consecutive list items of the same kind are grouped under one list node
/// and every text block's spans are resolved into properly nested children.
/// The input is never modified.
pub fn as_tree(field: &[Block]) -> Tree {
    let mut keys = KeyGen::default();
    let key = keys.next();
    let children = group_blocks(field)
        .into_iter()
        .map(|group| match group {
            Group::Single(block) => block_node(block, &mut keys),
            Group::List(kind, items) => list_node(kind, items, &mut keys),
        })
        .collect();
    Tree { key, children }
}

enum Group<'a> {
    Single(&'a Block),
    List(NodeKind, &'a [Block]),
}

/// Splits the field into single blocks and runs of same-kind list items.
fn group_blocks(field: &[Block]) -> Vec<Group<'_>> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < field.len() {
        let list_kind = match field[i] {
            Block::ListItem(_) => Some(NodeKind::List),
            Block::OListItem(_) => Some(NodeKind::OList),
            _ => None,
        };
        let Some(list_kind) = list_kind else {
            groups.push(Group::Single(&field[i]));
            i += 1;
            continue;
        };
        let item_kind = field[i].kind();
        let run = field[i..]
            .iter()
            .take_while(|b| b.kind() == item_kind)
            .count();
        groups.push(Group::List(list_kind, &field[i..i + run]));
        i += run;
    }
    groups
}

fn list_node(kind: NodeKind, items: &[Block], keys: &mut KeyGen) -> TreeNode {
    let key = keys.next();
    let children = items.iter().map(|item| block_node(item, keys)).collect();
    TreeNode {
        key,
        kind,
        text: None,
        node: NodeData::List(items.to_vec()),
        children,
    }
}

fn block_node(block: &Block, keys: &mut KeyGen) -> TreeNode {
    let key = keys.next();
    let (text, children) = match block.as_text() {
        Some((_, text_block)) => {
            let spans = clamp_spans(&text_block.text, &text_block.spans);
            (
                Some(text_block.text.clone()),
                span_children(&text_block.text, spans, keys),
            )
        }
        None => (None, Vec::new()),
    };
    TreeNode {
        key,
        kind: block.kind(),
        text,
        node: NodeData::Block(block.clone()),
        children,
    }
}

fn text_leaf(text: &str, keys: &mut KeyGen) -> TreeNode {
    TreeNode {
        key: keys.next(),
        kind: NodeKind::Span,
        text: Some(text.to_string()),
        node: NodeData::Text,
        children: Vec::new(),
    }
}

fn sort_key(span: &Span) -> (usize, Reverse<usize>) {
    (span.start, Reverse(span.end))
}

/// Resolves `spans` over `text` into nested children.
///
/// Offsets are relative to `text`. Spans are taken from a worklist ordered by
/// start, widest first. Each taken span claims every pending span inside its
/// range as a child; a pending span that crosses its end is cut there, the
/// inner piece becoming a child and the outer piece going back on the worklist.
/// The result covers `text` exactly once, with unstyled gaps as text leaves.
fn span_children(text: &str, mut spans: Vec<Span>, keys: &mut KeyGen) -> Vec<TreeNode> {
    if spans.is_empty() {
        return vec![text_leaf(text, keys)];
    }

    spans.sort_by_key(sort_key);
    let mut pending: VecDeque<Span> = spans.into();
    let mut children = Vec::new();
    let mut cursor = 0;

    while let Some(span) = pending.pop_front() {
        let mut nested = Vec::new();
        let mut remainders = Vec::new();
        let mut rest = VecDeque::with_capacity(pending.len());

        for other in pending.drain(..) {
            if other.start >= span.start && other.end <= span.end {
                nested.push(other.rebased(span.start));
            } else if other.start < span.end && other.end > span.end {
                let inner = Span::new(other.start, span.end, other.kind.clone());
                nested.push(inner.rebased(span.start));
                remainders.push(Span::new(span.end, other.end, other.kind));
            } else {
                rest.push_back(other);
            }
        }
        for remainder in remainders {
            let at = rest.partition_point(|s| sort_key(s) <= sort_key(&remainder));
            rest.insert(at, remainder);
        }
        pending = rest;

        if span.start > cursor {
            let gap = utf16::slice(
                text,
                Utf16Range {
                    start: cursor,
                    end: span.start,
                },
            );
            children.push(text_leaf(gap, keys));
        }

        let span_text = utf16::slice(text, span.range());
        let key = keys.next();
        let grandchildren = span_children(span_text, nested, keys);
        children.push(TreeNode {
            key,
            kind: span.node_kind(),
            text: Some(span_text.to_string()),
            node: NodeData::Span(span.clone()),
            children: grandchildren,
        });
        cursor = span.end;
    }

    if cursor < utf16_len(text) {
        children.push(text_leaf(utf16::slice_from(text, cursor), keys));
    }
    children
}
