//! Export module providing format encoders and the export dispatcher.
//!
//! Each output format is produced by an [`Encoder`]. The [`Exporter`] maps
//! format names to encoders, names the resulting artifact and hands it to a
//! [`Sink`].
//!
//! # Example
//!
//! ```
//! use noteport::export::{ExportFormat, Exporter, MemorySink};
//! use noteport::DocumentNode;
//!
//! fn main() -> noteport::Result<()> {
//!     let doc = DocumentNode::doc(vec![DocumentNode::heading(
//!         2,
//!         vec![DocumentNode::text("Title")],
//!     )]);
//!
//!     let sink = MemorySink::new();
//!     let exporter = Exporter::with_defaults().with_sink(sink.clone());
//!     let outcome = exporter.export(&doc, ExportFormat::Markdown, "lecture")?;
//!
//!     assert_eq!(outcome.filename, "lecture.md");
//!     assert_eq!(outcome.payload.as_str(), Some("## Title"));
//!     Ok(())
//! }
//! ```

mod csv;
mod dispatch;
mod docx;
mod format;
mod markdown;
mod pdf;
mod print;
mod sink;

pub use self::csv::CsvEncoder;
pub use dispatch::{export_content, sanitize_filename, ExportOutcome, Exporter};
pub use docx::{DocxContent, DocxEncoder, DocxPacker, ZipPacker};
pub use format::ExportFormat;
pub use markdown::MarkdownEncoder;
pub use pdf::{Orientation, PageFormat, PageSetup, PdfEncoder, PdfEngine, PrintJob};
pub use print::TextLayoutEngine;
pub use sink::{Artifact, FileSink, MemorySink, NullSink, Sink};

#[cfg(feature = "async")]
pub use dispatch::export_content_async;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::DocumentNode;
use crate::render::RenderOptions;

/// Default CSV column header.
pub const DEFAULT_CSV_HEADER: &str = "Note Content";

/// Options shared by all encoders.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Rendering options for the HTML and Markdown stages
    pub render: RenderOptions,

    /// Page layout for paginated formats
    pub page_setup: PageSetup,

    /// Document title written into PDF and DOCX metadata
    pub title: Option<String>,

    /// Fixed creation time; the current time is used when unset
    pub created: Option<DateTime<Utc>>,

    /// Header of the single CSV column
    pub csv_header: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            page_setup: PageSetup::default(),
            title: None,
            created: None,
            csv_header: DEFAULT_CSV_HEADER.to_string(),
        }
    }
}

impl ExportOptions {
    /// Create default export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Set page setup.
    pub fn with_page_setup(mut self, page_setup: PageSetup) -> Self {
        self.page_setup = page_setup;
        self
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pin the creation time, making binary output reproducible.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Set the CSV column header.
    pub fn with_csv_header(mut self, header: impl Into<String>) -> Self {
        self.csv_header = header.into();
        self
    }

    /// Creation time to stamp into metadata.
    pub fn created_or_now(&self) -> DateTime<Utc> {
        self.created.unwrap_or_else(Utc::now)
    }
}

/// Encoded output of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Encoded bytes
    pub bytes: Vec<u8>,

    /// MIME type of the bytes
    pub mime_type: &'static str,

    /// File extension, without the dot
    pub extension: &'static str,
}

impl Payload {
    /// Create a payload typed after `format`.
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: format.mime_type(),
            extension: format.extension(),
        }
    }

    /// Create a text payload.
    pub fn text(format: ExportFormat, text: String) -> Self {
        Self::new(format, text.into_bytes())
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// View the payload as UTF-8 text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Trait for format encoders.
///
/// Implement this trait to add or replace the encoder of a format. Encoders
/// must not share mutable state, since the exporter may run them in
/// parallel.
pub trait Encoder: Send + Sync {
    /// Format produced by this encoder.
    fn format(&self) -> ExportFormat;

    /// Get the name of this encoder.
    fn name(&self) -> &str;

    /// Encode a document.
    fn encode(&self, doc: &DocumentNode, options: &ExportOptions) -> Result<Payload>;
}
