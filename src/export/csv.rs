//! CSV encoder.
//!
//! The document's plain text becomes a single-column table: one header
//! record followed by one record per non-empty line.

use csv::{Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::model::DocumentNode;
use crate::render::text_lines;

use super::{Encoder, ExportFormat, ExportOptions, Payload};

/// CSV encoder.
#[derive(Debug, Clone, Default)]
pub struct CsvEncoder {
    _private: (),
}

impl CsvEncoder {
    /// Create a new CSV encoder.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn write_rows(&self, header: &str, rows: &[String]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record([header])?;
        for row in rows {
            writer.write_record([row.as_str()])?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Csv(e.to_string()))
    }
}

impl Encoder for CsvEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn name(&self) -> &str {
        "csv"
    }

    fn encode(&self, doc: &DocumentNode, options: &ExportOptions) -> Result<Payload> {
        let rows = text_lines(doc);

        // A document without text yields an empty file, not a lone header.
        if rows.is_empty() {
            return Ok(Payload::new(ExportFormat::Csv, Vec::new()));
        }

        let bytes = self.write_rows(&options.csv_header, &rows)?;
        log::debug!("Wrote {} CSV rows", rows.len());
        Ok(Payload::new(ExportFormat::Csv, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(doc: &DocumentNode) -> String {
        let payload = CsvEncoder::new()
            .encode(doc, &ExportOptions::default())
            .unwrap();
        payload.as_str().unwrap().to_string()
    }

    #[test]
    fn test_two_lines() {
        let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
            "Line one\nLine two",
        )])]);
        assert_eq!(encode(&doc), "Note Content\r\nLine one\r\nLine two\r\n");
    }

    #[test]
    fn test_one_row_per_paragraph() {
        let doc = DocumentNode::doc(vec![
            DocumentNode::heading(1, vec![DocumentNode::text("Intro")]),
            DocumentNode::paragraph(vec![DocumentNode::bold("Body")]),
            DocumentNode::paragraph(vec![]),
        ]);
        assert_eq!(encode(&doc), "Note Content\r\nIntro\r\nBody\r\n");
    }

    #[test]
    fn test_quoting() {
        let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
            "a, \"b\"",
        )])]);
        assert_eq!(encode(&doc), "Note Content\r\n\"a, \"\"b\"\"\"\r\n");
    }

    #[test]
    fn test_custom_header() {
        let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
            "x",
        )])]);
        let options = ExportOptions::new().with_csv_header("Notes");
        let payload = CsvEncoder::new().encode(&doc, &options).unwrap();
        assert_eq!(payload.as_str(), Some("Notes\r\nx\r\n"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(encode(&DocumentNode::empty()), "");
    }
}
