//! DOCX encoder and package writer.
//!
//! Only plain text is exported: formatting is stripped and the whole
//! document becomes one paragraph with one run, with a line break between
//! blocks.

use std::io::{Cursor, Write};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::DocumentNode;
use crate::render::to_text;

use super::{Encoder, ExportFormat, ExportOptions, PageSetup, Payload};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#,
);

/// Twentieths of a point, the OOXML page unit.
const TWIPS_PER_POINT: f32 = 20.0;

/// Plain content handed to a [`DocxPacker`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocxContent {
    /// Text lines of the single paragraph
    pub lines: Vec<String>,

    /// Document title
    pub title: Option<String>,

    /// Creation time
    pub created: DateTime<Utc>,

    /// Page width and height in twips
    pub page_size: (u32, u32),

    /// Page margin in twips
    pub margin: u32,
}

impl DocxContent {
    /// Build packer input from plain text and page setup.
    pub fn new(text: &str, setup: &PageSetup, created: DateTime<Utc>) -> Self {
        let (width, height) = setup.page_size();
        let text = xml_safe(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(str::to_string).collect()
        };

        Self {
            lines,
            title: None,
            created,
            page_size: (to_twips(width), to_twips(height)),
            margin: to_twips(setup.margin_points()),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.map(|t| xml_safe(&t));
        self
    }

    /// The lines joined back into plain text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

fn to_twips(points: f32) -> u32 {
    (points * TWIPS_PER_POINT).round().max(0.0) as u32
}

/// Capability that packages plain content as a DOCX file.
pub trait DocxPacker: Send + Sync {
    /// Get the name of this packer.
    fn name(&self) -> &str;

    /// Build the package bytes.
    fn pack(&self, content: &DocxContent) -> Result<Vec<u8>>;
}

/// Packer writing a minimal WordprocessingML package with `zip`.
#[derive(Debug, Clone, Default)]
pub struct ZipPacker {
    _private: (),
}

impl ZipPacker {
    /// Create a new zip packer.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Serialize `word/document.xml`.
    pub fn document_xml(&self, content: &DocxContent) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        start(&mut writer, BytesStart::new("w:document").with_attributes([("xmlns:w", NS_MAIN)]))?;
        start(&mut writer, BytesStart::new("w:body"))?;
        start(&mut writer, BytesStart::new("w:p"))?;
        start(&mut writer, BytesStart::new("w:r"))?;

        if content.lines.is_empty() {
            write_text(&mut writer, "")?;
        }
        for (i, line) in content.lines.iter().enumerate() {
            if i > 0 {
                writer
                    .write_event(Event::Empty(BytesStart::new("w:br")))
                    .map_err(xml_error)?;
            }
            write_text(&mut writer, line)?;
        }

        end(&mut writer, "w:r")?;
        end(&mut writer, "w:p")?;

        let width = content.page_size.0.to_string();
        let height = content.page_size.1.to_string();
        let margin = content.margin.to_string();
        start(&mut writer, BytesStart::new("w:sectPr"))?;
        writer
            .write_event(Event::Empty(
                BytesStart::new("w:pgSz")
                    .with_attributes([("w:w", width.as_str()), ("w:h", height.as_str())]),
            ))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Empty(BytesStart::new("w:pgMar").with_attributes([
                ("w:top", margin.as_str()),
                ("w:right", margin.as_str()),
                ("w:bottom", margin.as_str()),
                ("w:left", margin.as_str()),
                ("w:header", "708"),
                ("w:footer", "708"),
                ("w:gutter", "0"),
            ])))
            .map_err(xml_error)?;
        end(&mut writer, "w:sectPr")?;

        end(&mut writer, "w:body")?;
        end(&mut writer, "w:document")?;

        Ok(writer.into_inner())
    }

    /// Serialize `docProps/core.xml`.
    pub fn core_xml(&self, content: &DocxContent) -> String {
        let created = content.created.to_rfc3339_opts(SecondsFormat::Secs, true);
        let title = content
            .title
            .as_deref()
            .map(|t| format!("<dc:title>{}</dc:title>", escape(t)))
            .unwrap_or_default();

        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "{title}",
                r#"<dc:creator>noteport</dc:creator>"#,
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
                r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>"#,
                r#"</cp:coreProperties>"#,
            ),
            title = title,
            created = created,
        )
    }
}

impl DocxPacker for ZipPacker {
    fn name(&self) -> &str {
        "zip"
    }

    fn pack(&self, content: &DocxContent) -> Result<Vec<u8>> {
        let document = self.document_xml(content)?;
        let core = self.core_xml(content);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let parts: [(&str, &[u8]); 4] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", PACKAGE_RELS.as_bytes()),
            ("word/document.xml", &document),
            ("docProps/core.xml", core.as_bytes()),
        ];
        for (name, data) in parts {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options)?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// DOCX encoder.
#[derive(Clone)]
pub struct DocxEncoder {
    packer: Arc<dyn DocxPacker>,
}

impl DocxEncoder {
    /// Create a DOCX encoder using the built-in zip packer.
    pub fn new() -> Self {
        Self::with_packer(Arc::new(ZipPacker::new()))
    }

    /// Create a DOCX encoder using the given packer.
    pub fn with_packer(packer: Arc<dyn DocxPacker>) -> Self {
        Self { packer }
    }
}

impl Default for DocxEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocxEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxEncoder")
            .field("packer", &self.packer.name())
            .finish()
    }
}

impl Encoder for DocxEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn encode(&self, doc: &DocumentNode, options: &ExportOptions) -> Result<Payload> {
        let content = DocxContent::new(&to_text(doc), &options.page_setup, options.created_or_now())
            .with_title(options.title.clone());

        log::debug!(
            "Packing {} line(s) with packer '{}'",
            content.lines.len(),
            self.packer.name()
        );
        let bytes = self.packer.pack(&content)?;
        Ok(Payload::new(ExportFormat::Docx, bytes))
    }
}

fn start(writer: &mut Writer<Vec<u8>>, element: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Start(element)).map_err(xml_error)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    start(
        writer,
        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
    )?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    end(writer, "w:t")
}

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::Package(err.to_string())
}

/// Strip characters XML 1.0 cannot carry. Vertical tab and form feed
/// become line breaks; other C0 controls except tab, LF and CR are dropped.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{b}' | '\u{c}' => Some('\n'),
            '\t' | '\n' | '\r' => Some(c),
            '\u{fffe}' | '\u{ffff}' => None,
            c if c.is_ascii_control() && c != '\u{7f}' => None,
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap()
    }

    fn content(text: &str) -> DocxContent {
        DocxContent::new(text, &PageSetup::default(), created())
    }

    #[test]
    fn test_content_lines() {
        assert_eq!(content("a\nb").lines, vec!["a", "b"]);
        assert!(content("").lines.is_empty());
        assert_eq!(content("x").page_size, (12240, 15840));
        assert_eq!(content("x").margin, 1440);
    }

    #[test]
    fn test_document_xml_single_run() {
        let xml = ZipPacker::new().document_xml(&content("one & two\nthree")).unwrap();
        let xml = String::from_utf8(xml).unwrap();

        assert!(xml.contains(
            r#"<w:p><w:r><w:t xml:space="preserve">one &amp; two</w:t><w:br/><w:t xml:space="preserve">three</w:t></w:r></w:p>"#
        ));
        assert_eq!(xml.matches("<w:p>").count(), 1);
        assert_eq!(xml.matches("<w:r>").count(), 1);
        assert!(xml.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
    }

    #[test]
    fn test_control_characters_removed() {
        let content = content("first\u{b}second\u{1}\u{c}third\tend");
        assert_eq!(content.lines, vec!["first", "second", "third\tend"]);

        let xml = ZipPacker::new().document_xml(&content).unwrap();
        assert!(xml
            .iter()
            .all(|&b| b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r')));

        let titled = DocxContent::new("x", &PageSetup::default(), created())
            .with_title(Some("A\u{7}B".into()));
        assert_eq!(titled.title.as_deref(), Some("AB"));
    }

    #[test]
    fn test_core_xml() {
        let core = ZipPacker::new().core_xml(&content("x").with_title(Some("A <b>".into())));
        assert!(core.contains("<dc:title>A &lt;b&gt;</dc:title>"));
        assert!(core.contains("2024-03-04T05:06:07Z"));
    }

    #[test]
    fn test_pack_contains_parts() {
        let bytes = ZipPacker::new().pack(&content("Hello")).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "docProps/core.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains(">Hello</w:t>"));
    }

    #[test]
    fn test_encoder_uses_packer() {
        struct Failing;

        impl DocxPacker for Failing {
            fn name(&self) -> &str {
                "failing"
            }

            fn pack(&self, _content: &DocxContent) -> Result<Vec<u8>> {
                Err(Error::Package("disk full".into()))
            }
        }

        let encoder = DocxEncoder::with_packer(Arc::new(Failing));
        let err = encoder
            .encode(&DocumentNode::empty(), &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Package(_)));
    }
}
