//! PDF encoder and print engine capability.
//!
//! The encoder renders the document to HTML and hands a [`PrintJob`] to a
//! [`PdfEngine`]. Engines are injected, so a headless browser or any other
//! HTML printer can replace the built-in
//! [`TextLayoutEngine`](super::TextLayoutEngine).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::DocumentNode;
use crate::render::to_html;

use super::{Encoder, ExportFormat, ExportOptions, Payload, TextLayoutEngine};

/// Points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Paper size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageFormat {
    /// US Letter, 8.5 x 11 in
    #[default]
    Letter,
    /// US Legal, 8.5 x 14 in
    Legal,
    /// ISO A4, 210 x 297 mm
    A4,
}

impl PageFormat {
    /// Portrait width and height in points.
    pub fn size_points(self) -> (f32, f32) {
        match self {
            PageFormat::Letter => (612.0, 792.0),
            PageFormat::Legal => (612.0, 1008.0),
            PageFormat::A4 => (595.0, 842.0),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Taller than wide
    #[default]
    Portrait,
    /// Wider than tall
    Landscape,
}

/// Page layout passed to the print engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    /// Margin on every side, in inches
    pub margin_inches: f32,

    /// JPEG quality for rasterized content (0.0 - 1.0)
    pub image_quality: f32,

    /// Rasterization scale factor
    pub scale: f32,

    /// Paper size
    pub format: PageFormat,

    /// Page orientation
    pub orientation: Orientation,

    /// Body font size in points
    pub font_size: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            margin_inches: 1.0,
            image_quality: 0.98,
            scale: 2.0,
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
            font_size: 11.0,
        }
    }
}

impl PageSetup {
    /// Create the default page setup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the margin in inches.
    pub fn with_margin(mut self, inches: f32) -> Self {
        self.margin_inches = inches.max(0.0);
        self
    }

    /// Set the paper size.
    pub fn with_format(mut self, format: PageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the body font size.
    pub fn with_font_size(mut self, points: f32) -> Self {
        self.font_size = points.clamp(4.0, 72.0);
        self
    }

    /// Set image quality, clamped to 0.0 - 1.0.
    pub fn with_image_quality(mut self, quality: f32) -> Self {
        self.image_quality = quality.clamp(0.0, 1.0);
        self
    }

    /// Set the rasterization scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.max(0.1);
        self
    }

    /// Page width and height in points, after orientation.
    pub fn page_size(&self) -> (f32, f32) {
        let (width, height) = self.format.size_points();
        match self.orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }

    /// Margin in points.
    pub fn margin_points(&self) -> f32 {
        self.margin_inches * POINTS_PER_INCH
    }
}

/// A document ready for printing.
#[derive(Debug, Clone, Copy)]
pub struct PrintJob<'a> {
    /// Rendered HTML of the document
    pub html: &'a str,

    /// The document tree the HTML was rendered from
    pub document: &'a DocumentNode,

    /// Page layout
    pub setup: &'a PageSetup,

    /// Document title
    pub title: Option<&'a str>,

    /// Creation time for the document metadata
    pub created: DateTime<Utc>,
}

/// Capability that turns a print job into PDF bytes.
pub trait PdfEngine: Send + Sync {
    /// Get the name of this engine.
    fn name(&self) -> &str;

    /// Print a job to PDF.
    fn print(&self, job: &PrintJob<'_>) -> Result<Vec<u8>>;
}

/// PDF encoder.
#[derive(Clone)]
pub struct PdfEncoder {
    engine: Arc<dyn PdfEngine>,
}

impl PdfEncoder {
    /// Create a PDF encoder using the built-in text layout engine.
    pub fn new() -> Self {
        Self::with_engine(Arc::new(TextLayoutEngine::new()))
    }

    /// Create a PDF encoder using the given engine.
    pub fn with_engine(engine: Arc<dyn PdfEngine>) -> Self {
        Self { engine }
    }

    /// The engine in use.
    pub fn engine(&self) -> &dyn PdfEngine {
        self.engine.as_ref()
    }
}

impl Default for PdfEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PdfEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfEncoder")
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl Encoder for PdfEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn encode(&self, doc: &DocumentNode, options: &ExportOptions) -> Result<Payload> {
        let html = to_html(doc, &options.render);
        let job = PrintJob {
            html: &html,
            document: doc,
            setup: &options.page_setup,
            title: options.title.as_deref(),
            created: options.created_or_now(),
        };

        log::debug!(
            "Printing {} bytes of HTML with engine '{}'",
            html.len(),
            self.engine.name()
        );
        let bytes = self.engine.print(&job)?;
        if bytes.is_empty() {
            return Err(Error::Engine(format!(
                "engine '{}' produced no output",
                self.engine.name()
            )));
        }

        Ok(Payload::new(ExportFormat::Pdf, bytes))
    }
}
