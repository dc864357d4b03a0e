//! Ready-made renderers built on the serializer engine.

pub mod html;
pub mod text;

pub use html::{DefaultHtmlSerializer, HtmlOptions, LinkResolver, as_html, as_html_with};
pub use text::{DEFAULT_SEPARATOR, as_text};
