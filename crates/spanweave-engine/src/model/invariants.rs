use std::fmt;

use super::block::Block;
use super::span::Span;
use super::utf16::{snap_to_boundary, utf16_len};

/// A structural problem in stored span data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Index of the offending block in the field.
    pub block: usize,
    /// Index of the offending span in the block.
    pub span: usize,
    pub problem: Problem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// `start >= end`.
    Inverted,
    /// `end` exceeds the text length.
    OutOfBounds { text_len: usize },
    /// An offset splits a surrogate pair.
    SplitsCharacter,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            Problem::Inverted => write!(f, "block {} span {}: start >= end", self.block, self.span),
            Problem::OutOfBounds { text_len } => write!(
                f,
                "block {} span {}: end exceeds text length {text_len}",
                self.block, self.span
            ),
            Problem::SplitsCharacter => write!(
                f,
                "block {} span {}: offset splits a character",
                self.block, self.span
            ),
        }
    }
}

/// Reports every span that breaks the offset invariants.
///
/// An empty result means the field can be rendered without any clamping.
pub fn check(field: &[Block]) -> Vec<Violation> {
    let mut out = Vec::new();
    for (block_idx, block) in field.iter().enumerate() {
        let Some((_, text_block)) = block.as_text() else {
            continue;
        };
        let text = text_block.text.as_str();
        let text_len = utf16_len(text);
        for (span_idx, span) in text_block.spans.iter().enumerate() {
            let problem = if span.start >= span.end {
                Some(Problem::Inverted)
            } else if span.end > text_len {
                Some(Problem::OutOfBounds { text_len })
            } else if snap_to_boundary(text, span.start) != span.start
                || snap_to_boundary(text, span.end) != span.end
            {
                Some(Problem::SplitsCharacter)
            } else {
                None
            };
            if let Some(problem) = problem {
                out.push(Violation {
                    block: block_idx,
                    span: span_idx,
                    problem,
                });
            }
        }
    }
    out
}

/// Clamps spans into `text` and drops the ones left empty.
///
/// Offsets past the end are pulled back to the text length and offsets inside
/// a surrogate pair round down to the character start.
pub(crate) fn clamp_spans(text: &str, spans: &[Span]) -> Vec<Span> {
    spans
        .iter()
        .filter_map(|span| {
            let start = snap_to_boundary(text, span.start);
            let end = snap_to_boundary(text, span.end);
            if start >= end {
                log::debug!(
                    "dropping empty span {:?} {}..{} after clamping",
                    span.node_kind(),
                    span.start,
                    span.end
                );
                return None;
            }
            Some(Span {
                start,
                end,
                kind: span.kind.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Span};
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_field_has_no_violations() {
        let field = vec![Block::paragraph("foo bar", vec![Span::strong(0, 7)])];
        assert!(check(&field).is_empty());
    }

    #[test]
    fn reports_inverted_and_out_of_bounds() {
        let field = vec![
            Block::paragraph("abc", vec![Span::em(2, 2), Span::strong(1, 9)]),
            Block::paragraph("a😀", vec![Span::em(0, 2)]),
        ];
        let problems: Vec<_> = check(&field).into_iter().map(|v| v.problem).collect();
        assert_eq!(
            problems,
            vec![
                Problem::Inverted,
                Problem::OutOfBounds { text_len: 3 },
                Problem::SplitsCharacter
            ]
        );
    }

    #[test]
    fn clamp_pulls_offsets_into_text() {
        let spans = clamp_spans("abc", &[Span::strong(1, 9), Span::em(5, 8), Span::em(2, 1)]);
        assert_eq!(spans, vec![Span::strong(1, 3)]);
    }
}
