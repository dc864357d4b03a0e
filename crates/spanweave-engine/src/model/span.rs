use serde::{Deserialize, Serialize};

use super::kind::NodeKind;
use super::utf16::Utf16Range;

/// An inline annotation over `[start, end)` of its block's text.
///
/// Offsets are UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SpanKind,
}

/// Span type together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink { data: LinkData },
    Label { data: LabelData },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelData {
    pub label: String,
}

/// Link target, tagged by `link_type` as the storage API does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "link_type")]
pub enum LinkData {
    Web {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Document {
        id: String,
    },
    Media {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl LinkData {
    pub fn web(url: impl Into<String>) -> Self {
        LinkData::Web {
            url: url.into(),
            target: None,
        }
    }

    /// Resolvable URL, if the link carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            LinkData::Web { url, .. } | LinkData::Media { url, .. } => Some(url),
            LinkData::Document { .. } => None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            LinkData::Web { target, .. } => target.as_deref(),
            _ => None,
        }
    }

    /// Drops a `_blank` target.
    pub fn strip_blank_target(&mut self) {
        if let LinkData::Web { target, .. } = self
            && target.as_deref() == Some("_blank")
        {
            *target = None;
        }
    }
}

impl Span {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }

    pub fn strong(start: usize, end: usize) -> Self {
        Self::new(start, end, SpanKind::Strong)
    }

    pub fn em(start: usize, end: usize) -> Self {
        Self::new(start, end, SpanKind::Em)
    }

    pub fn hyperlink(start: usize, end: usize, data: LinkData) -> Self {
        Self::new(start, end, SpanKind::Hyperlink { data })
    }

    pub fn label(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self::new(
            start,
            end,
            SpanKind::Label {
                data: LabelData {
                    label: label.into(),
                },
            },
        )
    }

    pub fn range(&self) -> Utf16Range {
        Utf16Range {
            start: self.start,
            end: self.end,
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        self.kind.node_kind()
    }

    /// Same span with offsets shifted left by `base`.
    pub(crate) fn rebased(&self, base: usize) -> Self {
        Self {
            start: self.start - base,
            end: self.end - base,
            kind: self.kind.clone(),
        }
    }
}

impl SpanKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            SpanKind::Strong => NodeKind::Strong,
            SpanKind::Em => NodeKind::Em,
            SpanKind::Hyperlink { .. } => NodeKind::Hyperlink,
            SpanKind::Label { .. } => NodeKind::Label,
        }
    }
}
