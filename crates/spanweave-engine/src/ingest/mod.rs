//! # HTML Ingestion
//!
//! Converts arbitrary HTML into a flat rich text field.
//!
//! ## Pipeline
//!
//! 1. **Parse and select** (`dom`): parse with `scraper`, narrow to the
//!    container, drop excluded subtrees, keep included ones, and mark elements
//!    matched by selector-keyed serializer entries.
//! 2. **Minify** (`whitespace`): collapse whitespace the way a browser would
//!    render it.
//! 3. **Extract** (`extract`, `resolve`): walk the tree and accumulate blocks
//!    and spans.
//! 4. **Merge** (`spans`): join adjacent identical spans.
//! 5. **Stamp and filter** (`model_filter`): apply the default direction and
//!    the content model.
//!
//! Problems with individual elements become [`Warning`]s. Problems with the
//! configuration abort with an [`IngestError`].

pub mod config;
pub mod dom;
pub mod error;
mod extract;
pub mod media;
pub mod model_filter;
mod resolve;
mod spans;
mod whitespace;

use pulldown_cmark::{Options, Parser, html};

use crate::model::{Block, Direction};

pub use config::{HtmlAsRichTextConfig, NodeSpec, SerializerEntry, SerializerFn};
pub use dom::{HtmlElement, HtmlNode};
pub use error::{IngestError, Warning};
pub use media::{MediaKind, MediaRef, MediaRegistry, NoRegistry};
pub use model_filter::{Cardinality, ContentModel};

use dom::{Selection, parse_selector};
use extract::Extractor;
use resolve::SerializerTable;

/// Converted field plus the problems met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutput {
    pub result: Vec<Block>,
    pub warnings: Vec<Warning>,
}

/// Converts `html` into rich text.
pub fn html_as_rich_text(
    html: &str,
    config: &HtmlAsRichTextConfig,
) -> Result<IngestOutput, IngestError> {
    HtmlIngester::new(config).ingest(html)
}

/// Async form of [`html_as_rich_text`]; the result is identical.
pub async fn html_as_rich_text_async(
    html: &str,
    config: &HtmlAsRichTextConfig,
) -> Result<IngestOutput, IngestError> {
    html_as_rich_text(html, config)
}

/// Renders Markdown to HTML and converts that.
pub fn markdown_as_rich_text(
    markdown: &str,
    config: &HtmlAsRichTextConfig,
) -> Result<IngestOutput, IngestError> {
    HtmlIngester::new(config).ingest_markdown(markdown)
}

/// Async form of [`markdown_as_rich_text`].
pub async fn markdown_as_rich_text_async(
    markdown: &str,
    config: &HtmlAsRichTextConfig,
) -> Result<IngestOutput, IngestError> {
    markdown_as_rich_text(markdown, config)
}

/// Markdown to HTML with the extensions CMS content commonly uses.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Ingestion with a media registry attached.
pub struct HtmlIngester<'a> {
    config: &'a HtmlAsRichTextConfig,
    registry: &'a dyn MediaRegistry,
}

impl std::fmt::Debug for HtmlIngester<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlIngester")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> HtmlIngester<'a> {
    pub fn new(config: &'a HtmlAsRichTextConfig) -> Self {
        Self {
            config,
            registry: &NoRegistry,
        }
    }

    pub fn with_registry(mut self, registry: &'a dyn MediaRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn ingest_markdown(&self, markdown: &str) -> Result<IngestOutput, IngestError> {
        self.ingest(&markdown_to_html(markdown))
    }

    pub fn ingest(&self, html: &str) -> Result<IngestOutput, IngestError> {
        let config = self.config;

        // Validate the whole configuration before touching the document.
        let (table, marks) = SerializerTable::compile(&config.serializer)?;
        let model = config.model.as_ref().map(ContentModel::compile).transpose()?;
        let selection = Selection {
            container: config
                .container
                .as_ref()
                .map(|raw| Ok::<_, IngestError>((raw.clone(), parse_selector(raw)?)))
                .transpose()?,
            exclude: compile_all(&config.exclude)?,
            include: compile_all(&config.include)?,
            marks,
        };

        let mut nodes = dom::build(html, &selection)?;
        log::debug!("parsed {} top-level nodes", nodes.len());
        whitespace::minify(&mut nodes);

        let (mut blocks, warnings) = Extractor::new(&table, self.registry).run(&nodes)?;
        log::debug!("extracted {} blocks", blocks.len());

        for block in &mut blocks {
            if let Some(text) = block.as_text_mut() {
                text.spans = spans::merge_adjacent(std::mem::take(&mut text.spans));
            }
        }
        if let Some(direction) = config.direction {
            stamp_direction(&mut blocks, direction);
        }
        if let Some(model) = model {
            blocks = model.apply(blocks);
        }

        for warning in &warnings {
            log::warn!("{warning}");
        }
        Ok(IngestOutput {
            result: blocks,
            warnings,
        })
    }
}

fn compile_all(selectors: &[String]) -> Result<Vec<scraper::Selector>, IngestError> {
    selectors.iter().map(|s| parse_selector(s)).collect()
}

/// Sets `direction` on text blocks that have none.
fn stamp_direction(blocks: &mut [Block], direction: Direction) {
    for text in blocks.iter_mut().filter_map(Block::as_text_mut) {
        text.direction.get_or_insert(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageBlock, LinkData, Span, TextBlock, TextKind};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn convert(html: &str, config: &HtmlAsRichTextConfig) -> Vec<Block> {
        html_as_rich_text(html, config).unwrap().result
    }

    #[test]
    fn adjacent_identical_spans_are_merged() {
        assert_eq!(
            convert(
                "<p><strong>lorem</strong><strong> ipsum</strong></p>",
                &HtmlAsRichTextConfig::default()
            ),
            vec![Block::paragraph("lorem ipsum", vec![Span::strong(0, 11)])]
        );
    }

    #[test]
    fn container_exclude_and_include_narrow_the_input() {
        let html = "<nav><p>menu</p></nav>\
                    <article><p class=\"keep\">one</p><p>two</p>\
                    <div class=\"keep\"><p>three</p><p class=\"ad\">ad</p></div></article>";
        let config = HtmlAsRichTextConfig::new()
            .container("article")
            .include(".keep")
            .exclude(".ad");
        assert_eq!(
            convert(html, &config),
            vec![
                Block::paragraph("one", vec![]),
                Block::paragraph("three", vec![]),
            ]
        );
    }

    #[test]
    fn missing_container_is_fatal() {
        let config = HtmlAsRichTextConfig::new().container("main");
        assert!(matches!(
            html_as_rich_text("<p>a</p>", &config),
            Err(IngestError::ContainerNotFound(_))
        ));
    }

    #[test]
    fn invalid_exclude_selector_is_fatal() {
        let config = HtmlAsRichTextConfig::new().exclude("..nope");
        assert!(matches!(
            html_as_rich_text("<p>a</p>", &config),
            Err(IngestError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn unknown_model_type_is_fatal() {
        let config = HtmlAsRichTextConfig::new().model(ContentModel::multi(["quote"]));
        assert!(matches!(
            html_as_rich_text("<p>a</p>", &config),
            Err(IngestError::InvalidModel(_))
        ));
    }

    #[test]
    fn serializer_shorthands_override_builtins() {
        let config = HtmlAsRichTextConfig::new()
            .serialize("h1", "heading3")
            .serialize("p.lead", "heading2")
            .serialize("mark", "strong");
        assert_eq!(
            convert(
                "<h1>T</h1><p class=\"lead\">L</p><p>a <mark>b</mark></p>",
                &config
            ),
            vec![
                Block::Heading3(TextBlock::new("T")),
                Block::Heading2(TextBlock::new("L")),
                Block::paragraph("a b", vec![Span::strong(2, 3)]),
            ]
        );
    }

    #[test]
    fn serializer_functions_can_emit_labels() {
        let config = HtmlAsRichTextConfig::new().serialize(
            "span",
            SerializerEntry::function(|el| {
                el.attr("data-label")
                    .map(|label| NodeSpec::Label(label.to_string()))
            }),
        );
        assert_eq!(
            convert(
                "<p><span data-label=\"code\">x</span> <span>y</span></p>",
                &config
            ),
            vec![Block::paragraph("x y", vec![Span::label(0, 1, "code")])]
        );
    }

    #[test]
    fn direction_is_stamped_on_text_blocks_without_one() {
        let config = HtmlAsRichTextConfig::new().direction(Direction::Rtl);
        let blocks = convert("<p>a</p><p dir=\"ltr\">b</p>", &config);
        let directions: Vec<_> = blocks
            .iter()
            .map(|b| b.as_text().and_then(|(_, t)| t.direction))
            .collect();
        assert_eq!(directions, vec![Some(Direction::Rtl), Some(Direction::Ltr)]);
    }

    #[test]
    fn content_model_filters_the_result() {
        let config = HtmlAsRichTextConfig::new()
            .model(ContentModel::single(["paragraph", "em"]));
        assert_eq!(
            convert("<h2>t</h2><p><strong>a</strong> <em>b</em></p>", &config),
            vec![Block::paragraph("a b", vec![Span::em(2, 3)])]
        );
    }

    #[test]
    fn warnings_are_collected_without_aborting() {
        let output = html_as_rich_text(
            "<p><a>plain</a></p><img alt=\"x\"><iframe></iframe>",
            &HtmlAsRichTextConfig::default(),
        )
        .unwrap();
        assert_eq!(output.result, vec![Block::paragraph("plain", vec![])]);
        assert_eq!(
            output.warnings,
            vec![
                Warning::HyperlinkWithoutHref {
                    text: "plain".into()
                },
                Warning::ImageWithoutSrc {
                    alt: Some("x".into())
                },
                Warning::EmbedWithoutSrc {
                    tag: "iframe".into()
                },
            ]
        );
    }

    #[test]
    fn registry_ids_are_stored_on_media() {
        let seen = Mutex::new(Vec::new());
        let registry = |media: &MediaRef<'_>| {
            let mut seen = seen.lock().unwrap();
            seen.push(media.url.to_string());
            Some(format!("asset-{}", seen.len()))
        };
        let config = HtmlAsRichTextConfig::default();
        let output = HtmlIngester::new(&config)
            .with_registry(&registry)
            .ingest("<img src=\"https://i.test/a.png\"><iframe src=\"https://v.test/e\"></iframe>")
            .unwrap();

        let ids: Vec<_> = output
            .result
            .iter()
            .map(|b| match b {
                Block::Image(image) => image.id.clone(),
                Block::Embed(embed) => embed.oembed.id.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![Some("asset-1".into()), Some("asset-2".into())]);
        assert_eq!(
            seen.into_inner().unwrap(),
            vec!["https://i.test/a.png", "https://v.test/e"]
        );
    }

    #[test]
    fn markdown_goes_through_the_same_pipeline() {
        let output = markdown_as_rich_text(
            "# Title\n\nSome **bold** [link](https://a.test).\n\n1. one\n2. two\n",
            &HtmlAsRichTextConfig::default(),
        )
        .unwrap();
        assert_eq!(
            output.result,
            vec![
                Block::Heading1(TextBlock::new("Title")),
                Block::paragraph(
                    "Some bold link.",
                    vec![
                        Span::strong(5, 9),
                        Span::hyperlink(10, 14, LinkData::web("https://a.test")),
                    ]
                ),
                Block::text(TextKind::OListItem, TextBlock::new("one")),
                Block::text(TextKind::OListItem, TextBlock::new("two")),
            ]
        );
    }

    #[test]
    fn serializer_image_spec_is_registered_unless_it_has_an_id() {
        let config = HtmlAsRichTextConfig::new().serialize(
            "figure",
            SerializerEntry::function(|el| {
                Some(NodeSpec::Image(ImageBlock {
                    url: el.attr("data-src")?.to_string(),
                    id: Some("preset".into()),
                    ..ImageBlock::default()
                }))
            }),
        );
        let registry = |_: &MediaRef<'_>| Some("fresh".to_string());
        let output = HtmlIngester::new(&config)
            .with_registry(&registry)
            .ingest("<figure data-src=\"https://i.test/f.png\"></figure>")
            .unwrap();
        let [Block::Image(image)] = output.result.as_slice() else {
            panic!("expected one image, got {:?}", output.result);
        };
        assert_eq!(image.id.as_deref(), Some("preset"));
    }
}
