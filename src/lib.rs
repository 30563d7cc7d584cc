//! # noteport
//!
//! Export pipeline for rich-text note content.
//!
//! This library takes the document tree produced by a rich-text editor and
//! serializes it to HTML, Markdown, plain text, PDF, DOCX and CSV.
//!
//! ## Quick Start
//!
//! ```
//! use noteport::{export::MemorySink, DocumentNode};
//!
//! fn main() -> noteport::Result<()> {
//!     let doc = DocumentNode::from_json(
//!         r#"{"type":"doc","content":[
//!             {"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Title"}]},
//!             {"type":"paragraph","content":[{"type":"text","text":"Hi","marks":[{"type":"bold"}]}]}
//!         ]}"#,
//!     )?;
//!
//!     assert_eq!(noteport::to_html(&doc), "<h2>Title</h2><p><strong>Hi</strong></p>");
//!     assert_eq!(noteport::to_markdown(&doc), "## Title\n\n**Hi**");
//!
//!     let sink = MemorySink::new();
//!     let outcome = noteport::export_content(&doc, "docx", "lecture", sink)?;
//!     assert_eq!(outcome.filename, "lecture.docx");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed document tree**: closed node enum read from editor JSON
//! - **Text formats**: HTML, structural Markdown, plain text
//! - **Binary formats**: PDF through a pluggable print engine, DOCX through
//!   a pluggable packer
//! - **Parallel export**: several formats at once with Rayon
//! - **Async**: `export_content_async` behind the `async` feature

pub mod error;
pub mod export;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::{
    export_content, Encoder, ExportFormat, ExportOptions, ExportOutcome, Exporter, FileSink,
    MemorySink, NullSink, PageSetup, Payload, Sink,
};
pub use model::{DocumentNode, HeadingLevel, Mark, Marks};
pub use render::{DocumentStats, MarkdownStyle, RenderOptions};

#[cfg(feature = "async")]
pub use export::export_content_async;

use std::path::Path;

/// Parse editor JSON into a document tree.
///
/// # Example
///
/// ```
/// let doc = noteport::parse_json(r#"{"type":"doc","content":[]}"#).unwrap();
/// assert!(doc.children().is_empty());
/// ```
pub fn parse_json(json: &str) -> Result<DocumentNode> {
    DocumentNode::from_json(json)
}

/// Read and parse an editor JSON file.
///
/// # Example
///
/// ```no_run
/// let doc = noteport::parse_file("note.json").unwrap();
/// println!("{}", noteport::to_markdown(&doc));
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DocumentNode> {
    let json = std::fs::read_to_string(path)?;
    parse_json(&json)
}

/// Render a document to HTML with default options.
pub fn to_html(doc: &DocumentNode) -> String {
    render::to_html(doc, &RenderOptions::default())
}

/// Render a document to Markdown with default options.
pub fn to_markdown(doc: &DocumentNode) -> String {
    render::to_markdown(doc, &RenderOptions::default())
}

/// Extract the plain text of a document.
pub fn to_text(doc: &DocumentNode) -> String {
    render::to_text(doc)
}

/// Builder for configuring rendering and export.
///
/// # Example
///
/// ```
/// use noteport::{ExportFormat, Noteport};
///
/// let note = Noteport::new()
///     .raw_html()
///     .with_title("Week 1")
///     .parse(r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"a<b"}]}]}"#)?;
///
/// assert_eq!(note.to_html(), "<p>a<b</p>");
/// let payload = note.encode(ExportFormat::Csv)?;
/// assert_eq!(payload.as_str(), Some("Note Content\r\na<b\r\n"));
/// # Ok::<(), noteport::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Noteport {
    options: ExportOptions,
}

impl Noteport {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.options.render = render;
        self
    }

    /// Disable HTML escaping.
    pub fn raw_html(mut self) -> Self {
        self.options.render = self.options.render.raw_html();
        self
    }

    /// Set the Markdown strategy.
    pub fn with_markdown_style(mut self, style: MarkdownStyle) -> Self {
        self.options.render = self.options.render.with_markdown_style(style);
        self
    }

    /// Set page setup for paginated formats.
    pub fn with_page_setup(mut self, setup: PageSetup) -> Self {
        self.options.page_setup = setup;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Pin the creation time for reproducible output.
    pub fn with_created(mut self, created: chrono::DateTime<chrono::Utc>) -> Self {
        self.options = self.options.with_created(created);
        self
    }

    /// Export options built so far.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Parse editor JSON.
    pub fn parse(self, json: &str) -> Result<Note> {
        Ok(self.load(DocumentNode::from_json(json)?))
    }

    /// Read and parse an editor JSON file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<Note> {
        Ok(self.load(parse_file(path)?))
    }

    /// Wrap an existing document.
    pub fn load(self, document: DocumentNode) -> Note {
        Note {
            document,
            options: self.options,
        }
    }
}

/// A document together with its export options.
#[derive(Debug, Clone)]
pub struct Note {
    /// The document tree
    pub document: DocumentNode,
    options: ExportOptions,
}

impl Note {
    /// Render to HTML.
    pub fn to_html(&self) -> String {
        render::to_html(&self.document, &self.options.render)
    }

    /// Render to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.document, &self.options.render)
    }

    /// Extract plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Collect document statistics.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::collect(&self.document)
    }

    /// Encode one format without delivering it.
    pub fn encode(&self, format: ExportFormat) -> Result<Payload> {
        self.exporter().encode(&self.document, format)
    }

    /// Encode and deliver one format.
    pub fn export(
        &self,
        format: ExportFormat,
        filename: &str,
        sink: impl Sink + 'static,
    ) -> Result<ExportOutcome> {
        self.exporter()
            .with_sink(sink)
            .export(&self.document, format, filename)
    }

    /// Get the document.
    pub fn document(&self) -> &DocumentNode {
        &self.document
    }

    fn exporter(&self) -> Exporter {
        Exporter::with_defaults().with_options(self.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"type":"doc","content":[
        {"type":"heading","content":[{"type":"text","text":"Intro"}]},
        {"type":"paragraph","content":[{"type":"text","text":"Hi","marks":[{"type":"bold"}]}]}
    ]}"#;

    #[test]
    fn test_convenience_functions() {
        let doc = parse_json(SAMPLE).unwrap();
        assert_eq!(to_html(&doc), "<h1>Intro</h1><p><strong>Hi</strong></p>");
        assert_eq!(to_markdown(&doc), "# Intro\n\n**Hi**");
        assert_eq!(to_text(&doc), "Intro\nHi");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_file("/nonexistent/note.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_builder_options() {
        let builder = Noteport::new()
            .raw_html()
            .with_markdown_style(MarkdownStyle::HtmlRewrite)
            .with_title("T");
        assert!(!builder.options().render.escape_html);
        assert_eq!(builder.options().render.markdown_style, MarkdownStyle::HtmlRewrite);
        assert_eq!(builder.options().title.as_deref(), Some("T"));
    }

    #[test]
    fn test_note_export() {
        let note = Noteport::new().parse(SAMPLE).unwrap();
        let sink = MemorySink::new();

        let outcome = note.export(ExportFormat::Markdown, "", sink.clone()).unwrap();
        assert_eq!(outcome.filename, "notes.md");
        assert_eq!(sink.len(), 1);
        assert_eq!(note.stats().heading_count, 1);
    }

    #[test]
    fn test_note_encode_pdf() {
        let note = Noteport::new().load(parse_json(SAMPLE).unwrap());
        let payload = note.encode(ExportFormat::Pdf).unwrap();
        assert!(payload.bytes.starts_with(b"%PDF"));
        assert_eq!(payload.mime_type, "application/pdf");
    }
}
