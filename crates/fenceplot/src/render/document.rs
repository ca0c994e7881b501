//! Markdown host: renders a whole document, drawing every fenced diagram block in place.

use super::{DiagramFrame, HeadlessRenderer, RenderedBlock};
use fenceplot_core::DiagramPayload;
use fenceplot_render::svg::escape_xml;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub html: String,
    /// One entry per fenced block, in document order.
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedDocument {
    pub fn notices(&self) -> impl Iterator<Item = &RenderedBlock> {
        self.blocks.iter().filter(|b| b.is_notice())
    }
}

/// Renders `source` with default settings. A block that fails is replaced by its own notice; the
/// rest of the document renders normally.
pub fn render_markdown(source: &str) -> RenderedDocument {
    HeadlessRenderer::default().render_markdown(source)
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH
}

pub(super) fn render_document(renderer: &HeadlessRenderer, source: &str) -> RenderedDocument {
    let mut events = Vec::new();
    let mut blocks = Vec::new();
    let mut fence: Option<(String, String)> = None;

    for event in Parser::new_ext(source, parser_options()) {
        if fence.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some((_, body)) = fence.as_mut() {
                        body.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((info, body)) = fence.take() {
                        let payload = DiagramPayload::from_fence(&info, &body);
                        let id = format!("fenceplot-{}", blocks.len() + 1);
                        let block = renderer.render_block_sync_with_diagram_id(&payload, &id);
                        events.push(Event::Html(block_html(&payload, &body, &block).into()));
                        blocks.push(block);
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                fence = Some((info.to_string(), String::new()));
            }
            other => events.push(other),
        }
    }

    let mut html = String::with_capacity(source.len() * 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    tracing::debug!(
        blocks = blocks.len(),
        notices = blocks.iter().filter(|b| b.is_notice()).count(),
        "markdown rendered"
    );
    RenderedDocument { html, blocks }
}

fn block_html(payload: &DiagramPayload, body: &str, block: &RenderedBlock) -> String {
    match block {
        RenderedBlock::Code { kind, .. } if kind.is_empty() => {
            format!("<pre><code>{}</code></pre>\n", escape_xml(body))
        }
        RenderedBlock::Code { kind, .. } => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_xml(kind),
            escape_xml(body)
        ),
        _ => DiagramFrame::new(payload, block.clone()).to_html(),
    }
}
