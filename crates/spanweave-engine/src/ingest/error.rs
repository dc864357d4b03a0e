use std::fmt;

use crate::model::UnknownNodeKind;

/// Configuration problems that abort a conversion with no partial result.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("no element matches container selector {0:?}")]
    ContainerNotFound(String),

    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("unknown node type shorthand {0:?}")]
    UnknownShorthand(String),

    #[error("invalid content model: {0}")]
    InvalidModel(#[from] UnknownNodeKind),
}

/// A source element that could not be converted faithfully.
///
/// Conversion continues with a best-effort substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The link text is kept as plain text.
    HyperlinkWithoutHref { text: String },
    /// The image is omitted.
    ImageWithoutSrc { alt: Option<String> },
    /// The embed is omitted.
    EmbedWithoutSrc { tag: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::HyperlinkWithoutHref { text } => {
                write!(f, "hyperlink without href kept as plain text: {text:?}")
            }
            Warning::ImageWithoutSrc { alt: Some(alt) } => {
                write!(f, "image without src omitted (alt {alt:?})")
            }
            Warning::ImageWithoutSrc { alt: None } => write!(f, "image without src omitted"),
            Warning::EmbedWithoutSrc { tag } => write!(f, "<{tag}> embed without src omitted"),
        }
    }
}
