use std::fmt;
use std::str::FromStr;

/// Every node type that can appear in a rich text tree.
///
/// `as_str` gives the storage name, `map_key` the name used by
/// map serializers (list kinds are camel-cased there).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Paragraph,
    Preformatted,
    Strong,
    Em,
    ListItem,
    OListItem,
    /// Synthetic group of consecutive `ListItem`s.
    List,
    /// Synthetic group of consecutive `OListItem`s.
    OList,
    Image,
    Embed,
    Hyperlink,
    Label,
    /// Unstyled text leaf.
    Span,
}

impl NodeKind {
    pub const ALL: [NodeKind; 19] = [
        NodeKind::Heading1,
        NodeKind::Heading2,
        NodeKind::Heading3,
        NodeKind::Heading4,
        NodeKind::Heading5,
        NodeKind::Heading6,
        NodeKind::Paragraph,
        NodeKind::Preformatted,
        NodeKind::Strong,
        NodeKind::Em,
        NodeKind::ListItem,
        NodeKind::OListItem,
        NodeKind::List,
        NodeKind::OList,
        NodeKind::Image,
        NodeKind::Embed,
        NodeKind::Hyperlink,
        NodeKind::Label,
        NodeKind::Span,
    ];

    /// Storage (wire) name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Heading1 => "heading1",
            NodeKind::Heading2 => "heading2",
            NodeKind::Heading3 => "heading3",
            NodeKind::Heading4 => "heading4",
            NodeKind::Heading5 => "heading5",
            NodeKind::Heading6 => "heading6",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Preformatted => "preformatted",
            NodeKind::Strong => "strong",
            NodeKind::Em => "em",
            NodeKind::ListItem => "list-item",
            NodeKind::OListItem => "o-list-item",
            NodeKind::List => "group-list-item",
            NodeKind::OList => "group-o-list-item",
            NodeKind::Image => "image",
            NodeKind::Embed => "embed",
            NodeKind::Hyperlink => "hyperlink",
            NodeKind::Label => "label",
            NodeKind::Span => "span",
        }
    }

    /// Name used to look up handlers in a map serializer.
    pub fn map_key(self) -> &'static str {
        match self {
            NodeKind::ListItem => "listItem",
            NodeKind::OListItem => "oListItem",
            NodeKind::List => "list",
            NodeKind::OList => "oList",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type: {0:?}")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    /// Accepts both storage names and map-serializer names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.map_key() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

/// The text-bearing block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Paragraph,
    Preformatted,
    ListItem,
    OListItem,
}

impl From<TextKind> for NodeKind {
    fn from(kind: TextKind) -> Self {
        match kind {
            TextKind::Heading1 => NodeKind::Heading1,
            TextKind::Heading2 => NodeKind::Heading2,
            TextKind::Heading3 => NodeKind::Heading3,
            TextKind::Heading4 => NodeKind::Heading4,
            TextKind::Heading5 => NodeKind::Heading5,
            TextKind::Heading6 => NodeKind::Heading6,
            TextKind::Paragraph => NodeKind::Paragraph,
            TextKind::Preformatted => NodeKind::Preformatted,
            TextKind::ListItem => NodeKind::ListItem,
            TextKind::OListItem => NodeKind::OListItem,
        }
    }
}

impl TryFrom<NodeKind> for TextKind {
    type Error = NodeKind;

    fn try_from(kind: NodeKind) -> Result<Self, Self::Error> {
        Ok(match kind {
            NodeKind::Heading1 => TextKind::Heading1,
            NodeKind::Heading2 => TextKind::Heading2,
            NodeKind::Heading3 => TextKind::Heading3,
            NodeKind::Heading4 => TextKind::Heading4,
            NodeKind::Heading5 => TextKind::Heading5,
            NodeKind::Heading6 => TextKind::Heading6,
            NodeKind::Paragraph => TextKind::Paragraph,
            NodeKind::Preformatted => TextKind::Preformatted,
            NodeKind::ListItem => TextKind::ListItem,
            NodeKind::OListItem => TextKind::OListItem,
            other => return Err(other),
        })
    }
}
