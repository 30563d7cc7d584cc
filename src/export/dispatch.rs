//! Export dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::DocumentNode;

use super::{
    Artifact, CsvEncoder, DocxEncoder, Encoder, ExportFormat, ExportOptions, MarkdownEncoder,
    NullSink, Payload, PdfEncoder, Sink,
};

/// Base name used when the caller supplies none.
pub const DEFAULT_FILENAME: &str = "notes";

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Format that was produced
    pub format: ExportFormat,

    /// Delivered file name, including extension
    pub filename: String,

    /// Encoded content
    pub payload: Payload,
}

/// Registry of encoders plus a delivery sink.
///
/// The exporter maps each [`ExportFormat`] to an [`Encoder`], names the
/// artifact `{filename}.{ext}` and hands it to the configured [`Sink`].
pub struct Exporter {
    encoders: HashMap<ExportFormat, Arc<dyn Encoder>>,
    sink: Arc<dyn Sink>,
    options: ExportOptions,
}

impl Exporter {
    /// Create an exporter with no encoders and a [`NullSink`].
    pub fn new() -> Self {
        Self {
            encoders: HashMap::new(),
            sink: Arc::new(NullSink),
            options: ExportOptions::default(),
        }
    }

    /// Create an exporter with the built-in encoders for every format.
    pub fn with_defaults() -> Self {
        let mut exporter = Self::new();
        exporter.register(Arc::new(PdfEncoder::new()));
        exporter.register(Arc::new(DocxEncoder::new()));
        exporter.register(Arc::new(CsvEncoder::new()));
        exporter.register(Arc::new(MarkdownEncoder::new()));
        exporter
    }

    /// Register an encoder, replacing any previous encoder of its format.
    pub fn register(&mut self, encoder: Arc<dyn Encoder>) {
        self.encoders.insert(encoder.format(), encoder);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_encoder(mut self, encoder: Arc<dyn Encoder>) -> Self {
        self.register(encoder);
        self
    }

    /// Set the delivery sink.
    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Set export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Current export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Get the encoder registered for a format.
    pub fn get(&self, format: ExportFormat) -> Option<Arc<dyn Encoder>> {
        self.encoders.get(&format).cloned()
    }

    /// Check if a format has an encoder.
    pub fn supports(&self, format: ExportFormat) -> bool {
        self.encoders.contains_key(&format)
    }

    /// Get all formats with an encoder, sorted.
    pub fn supported_formats(&self) -> Vec<ExportFormat> {
        let mut formats: Vec<_> = self.encoders.keys().copied().collect();
        formats.sort();
        formats
    }

    /// Encode a document without delivering it.
    ///
    /// Encoder failures are wrapped in [`Error::ExportFailed`].
    pub fn encode(&self, doc: &DocumentNode, format: ExportFormat) -> Result<Payload> {
        let encoder = self
            .get(format)
            .ok_or_else(|| Error::UnsupportedFormat(format.to_string()))?;

        encoder
            .encode(doc, &self.options)
            .map_err(|e| Error::export_failed(format, e))
    }

    /// Encode a document and deliver it as `{filename}.{ext}`.
    pub fn export(
        &self,
        doc: &DocumentNode,
        format: ExportFormat,
        filename: &str,
    ) -> Result<ExportOutcome> {
        let payload = self.encode(doc, format)?;
        let artifact = Artifact {
            filename: format!("{}.{}", sanitize_filename(filename), payload.extension),
            payload,
        };

        self.sink
            .deliver(&artifact)
            .map_err(|e| Error::export_failed(format, e))?;

        log::debug!(
            "Exported {} ({} bytes)",
            artifact.filename,
            artifact.payload.len()
        );
        Ok(ExportOutcome {
            format,
            filename: artifact.filename,
            payload: artifact.payload,
        })
    }

    /// Parse a format name and export.
    pub fn export_named(
        &self,
        doc: &DocumentNode,
        format: &str,
        filename: &str,
    ) -> Result<ExportOutcome> {
        let format: ExportFormat = format.parse()?;
        self.export(doc, format, filename)
    }

    /// Export several formats in parallel.
    ///
    /// Exports are independent: one failing does not affect the others.
    /// Results are returned in the order of `formats`.
    pub fn export_many(
        &self,
        doc: &DocumentNode,
        formats: &[ExportFormat],
        filename: &str,
    ) -> Vec<(ExportFormat, Result<ExportOutcome>)> {
        formats
            .par_iter()
            .map(|&format| (format, self.export(doc, format, filename)))
            .collect()
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Export a document with the built-in encoders.
///
/// `format` is one of `pdf`, `docx`, `csv`, `markdown` (or `md`); anything
/// else fails with [`Error::UnsupportedFormat`].
///
/// # Example
///
/// ```
/// use noteport::export::{export_content, MemorySink};
/// use noteport::DocumentNode;
///
/// let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![
///     DocumentNode::text("Line one\nLine two"),
/// ])]);
///
/// let sink = MemorySink::new();
/// let outcome = export_content(&doc, "csv", "notes", sink.clone()).unwrap();
/// assert_eq!(outcome.filename, "notes.csv");
/// assert_eq!(sink.len(), 1);
///
/// let err = export_content(&doc, "xml", "notes", sink).unwrap_err();
/// assert!(err.is_unsupported_format());
/// ```
pub fn export_content(
    doc: &DocumentNode,
    format: &str,
    filename: &str,
    sink: impl Sink + 'static,
) -> Result<ExportOutcome> {
    Exporter::with_defaults()
        .with_sink(sink)
        .export_named(doc, format, filename)
}

/// Run [`export_content`] on tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn export_content_async(
    doc: DocumentNode,
    format: String,
    filename: String,
    sink: impl Sink + 'static,
) -> Result<ExportOutcome> {
    tokio::task::spawn_blocking(move || export_content(&doc, &format, &filename, sink))
        .await
        .map_err(|e| Error::Other(format!("Export task failed: {}", e)))?
}

/// Make a caller-supplied base name safe to use as a file name.
///
/// Path separators and control characters become `_`, surrounding
/// whitespace and dots are trimmed, and a blank result falls back to
/// `notes`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
