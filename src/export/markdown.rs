//! Markdown encoder.

use crate::error::Result;
use crate::model::DocumentNode;
use crate::render::to_markdown;

use super::{Encoder, ExportFormat, ExportOptions, Payload};

/// Markdown encoder.
///
/// The rendering strategy follows
/// [`RenderOptions::markdown_style`](crate::render::RenderOptions::markdown_style).
#[derive(Debug, Clone, Default)]
pub struct MarkdownEncoder {
    _private: (),
}

impl MarkdownEncoder {
    /// Create a new Markdown encoder.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Encoder for MarkdownEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn encode(&self, doc: &DocumentNode, options: &ExportOptions) -> Result<Payload> {
        let markdown = to_markdown(doc, &options.render);
        log::debug!("Rendered {} bytes of Markdown", markdown.len());
        Ok(Payload::text(ExportFormat::Markdown, markdown))
    }
}
