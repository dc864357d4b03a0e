//! Restricting ingested content to what a target field accepts.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Block, LinkData, NodeKind, Span, SpanKind, UnknownNodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// The field holds one block.
    Single,
    #[default]
    Multi,
}

/// Node types and labels a rich text field accepts.
///
/// Type names use the storage or map-serializer spelling (`list-item` and
/// `listItem` are the same type).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentModel {
    #[serde(default)]
    pub cardinality: Cardinality,
    pub types: Vec<String>,
    /// Allowed label names; `None` accepts every label.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub allow_target_blank: bool,
}

impl ContentModel {
    pub fn multi<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cardinality: Cardinality::Multi,
            types: types.into_iter().map(Into::into).collect(),
            labels: None,
            allow_target_blank: false,
        }
    }

    pub fn single<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cardinality: Cardinality::Single,
            ..Self::multi(types)
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn allowing_target_blank(mut self) -> Self {
        self.allow_target_blank = true;
        self
    }

    pub(crate) fn compile(&self) -> Result<CompiledModel<'_>, UnknownNodeKind> {
        let types = self
            .types
            .iter()
            .map(|name| name.parse::<NodeKind>())
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(CompiledModel {
            single: self.cardinality == Cardinality::Single,
            types,
            labels: self.labels.as_deref(),
            allow_target_blank: self.allow_target_blank,
        })
    }
}

pub(crate) struct CompiledModel<'a> {
    single: bool,
    types: HashSet<NodeKind>,
    labels: Option<&'a [String]>,
    allow_target_blank: bool,
}

impl CompiledModel<'_> {
    /// Drops disallowed blocks and spans.
    ///
    /// A single-block model keeps only the first surviving block.
    pub(crate) fn apply(&self, field: Vec<Block>) -> Vec<Block> {
        let mut out = Vec::new();
        for mut block in field {
            let kind = block.kind();
            if !self.types.contains(&kind) {
                log::debug!("dropping disallowed {kind} block");
                continue;
            }
            if let Some(text) = block.as_text_mut() {
                text.spans.retain_mut(|span| self.keep_span(span));
            }
            if let Block::Image(image) = &mut block
                && let Some(link) = &mut image.link_to
            {
                self.fix_link(link);
            }
            out.push(block);
            if self.single {
                break;
            }
        }
        out
    }

    fn keep_span(&self, span: &mut Span) -> bool {
        match &mut span.kind {
            SpanKind::Label { data } => self
                .labels
                .is_none_or(|allowed| allowed.iter().any(|l| *l == data.label)),
            SpanKind::Hyperlink { data } => {
                if !self.types.contains(&NodeKind::Hyperlink) {
                    return false;
                }
                self.fix_link(data);
                true
            }
            other => self.types.contains(&other.node_kind()),
        }
    }

    fn fix_link(&self, link: &mut LinkData) {
        if !self.allow_target_blank {
            link.strip_blank_target();
        }
    }
}
