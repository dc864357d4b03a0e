use std::fmt;

use crate::model::{Direction, ImageBlock, LinkData, OEmbed, TextKind};

use super::dom::HtmlElement;
use super::model_filter::ContentModel;

/// Custom conversion for one element.
pub type SerializerFn = dyn Fn(&HtmlElement) -> Option<NodeSpec> + Send + Sync;

/// What a serializer entry turns its elements into.
pub enum SerializerEntry {
    /// A node type name such as `"heading2"`, `"strong"` or `"listItem"`.
    Shorthand(String),
    /// Returning `None` falls through to the next applicable entry.
    Function(Box<SerializerFn>),
}

impl SerializerEntry {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&HtmlElement) -> Option<NodeSpec> + Send + Sync + 'static,
    {
        SerializerEntry::Function(Box::new(f))
    }
}

impl From<&str> for SerializerEntry {
    fn from(shorthand: &str) -> Self {
        SerializerEntry::Shorthand(shorthand.to_string())
    }
}

impl From<String> for SerializerEntry {
    fn from(shorthand: String) -> Self {
        SerializerEntry::Shorthand(shorthand)
    }
}

impl fmt::Debug for SerializerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerEntry::Shorthand(s) => f.debug_tuple("Shorthand").field(s).finish(),
            SerializerEntry::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Node produced by a serializer function.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    Shorthand(String),
    Text {
        kind: TextKind,
        direction: Option<Direction>,
    },
    Strong,
    Em,
    Hyperlink(LinkData),
    Label(String),
    Image(ImageBlock),
    Embed(OEmbed),
}

/// Options for [`html_as_rich_text`](super::html_as_rich_text).
///
/// Every selector is a CSS selector. Serializer keys that look like a bare
/// tag name (`"h1"`, `"my-widget"`) match by tag, anything else is a selector.
/// When several selector keys match one element the first in order wins.
#[derive(Debug, Default)]
pub struct HtmlAsRichTextConfig {
    /// Only the first element matching this selector is converted.
    pub container: Option<String>,
    pub exclude: Vec<String>,
    /// When non-empty, only outermost matching subtrees are converted.
    pub include: Vec<String>,
    pub serializer: Vec<(String, SerializerEntry)>,
    pub model: Option<ContentModel>,
    /// Direction stamped on text blocks that carry none.
    pub direction: Option<Direction>,
}

impl HtmlAsRichTextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(mut self, selector: impl Into<String>) -> Self {
        self.container = Some(selector.into());
        self
    }

    pub fn exclude(mut self, selector: impl Into<String>) -> Self {
        self.exclude.push(selector.into());
        self
    }

    pub fn include(mut self, selector: impl Into<String>) -> Self {
        self.include.push(selector.into());
        self
    }

    pub fn serialize(mut self, key: impl Into<String>, entry: impl Into<SerializerEntry>) -> Self {
        self.serializer.push((key.into(), entry.into()));
        self
    }

    pub fn model(mut self, model: ContentModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}
