//! Integration tests for the export dispatcher and encoders.

use std::io::{Cursor, Read};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use noteport::export::{
    export_content, DocxContent, DocxEncoder, DocxPacker, Encoder, ExportFormat, ExportOptions,
    Exporter, MemorySink, NullSink, PdfEncoder, PdfEngine, PrintJob,
};
use noteport::{DocumentNode, Error, Mark, Result};

fn formatted() -> DocumentNode {
    DocumentNode::doc(vec![
        DocumentNode::heading(1, vec![DocumentNode::text("Cell biology")]),
        DocumentNode::paragraph(vec![
            DocumentNode::text("The "),
            DocumentNode::marked("nucleus", [Mark::Bold, Mark::Italic]),
            DocumentNode::text(" holds "),
            DocumentNode::code("DNA"),
            DocumentNode::text("."),
        ]),
        DocumentNode::bullet_list(vec![
            DocumentNode::list_item(vec![DocumentNode::paragraph(vec![DocumentNode::text(
                "Mitochondria",
            )])]),
            DocumentNode::list_item(vec![DocumentNode::paragraph(vec![DocumentNode::text(
                "Ribosomes",
            )])]),
        ]),
    ])
}

/// Concatenated `w:t` text of a DOCX body, with `w:br` as newlines.
fn docx_text(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Empty(e) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Event::Text(t) if in_text => text.push_str(&t.unescape().unwrap()),
            Event::Eof => break,
            _ => {}
        }
    }
    text
}

#[test]
fn test_markdown_export_contains_heading() {
    let doc = DocumentNode::doc(vec![DocumentNode::heading(
        2,
        vec![DocumentNode::text("Title")],
    )]);
    let sink = MemorySink::new();
    let outcome = export_content(&doc, "markdown", "notes", sink.clone()).unwrap();

    assert_eq!(outcome.filename, "notes.md");
    assert!(outcome.payload.as_str().unwrap().contains("## Title"));
    assert_eq!(sink.get("notes.md").unwrap().payload, outcome.payload);
}

#[test]
fn test_md_alias() {
    let outcome = export_content(&formatted(), "MD", "n", NullSink).unwrap();
    assert_eq!(outcome.format, ExportFormat::Markdown);
}

#[test]
fn test_csv_export_two_rows() {
    let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
        "Line one\nLine two",
    )])]);
    let outcome = export_content(&doc, "csv", "notes", NullSink).unwrap();

    let mut reader = csv::Reader::from_reader(outcome.payload.bytes.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Note Content"]);

    let rows: Vec<String> = reader
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect();
    assert_eq!(rows, vec!["Line one", "Line two"]);
}

#[test]
fn test_unsupported_format() {
    let sink = MemorySink::new();
    let err = export_content(&formatted(), "xml", "f", sink.clone()).unwrap_err();

    assert!(matches!(err, Error::UnsupportedFormat(ref v) if v == "xml"));
    assert!(sink.is_empty());
}

#[test]
fn test_docx_strips_formatting() {
    let doc = formatted();
    let outcome = export_content(&doc, "docx", "cells", NullSink).unwrap();

    assert_eq!(outcome.filename, "cells.docx");
    assert!(outcome.payload.bytes.starts_with(b"PK"));
    assert_eq!(docx_text(&outcome.payload.bytes), noteport::to_text(&doc));
    assert_eq!(
        docx_text(&outcome.payload.bytes),
        "Cell biology\nThe nucleus holds DNA.\nMitochondria\nRibosomes"
    );
}

#[test]
fn test_pdf_export_is_loadable() {
    let outcome = export_content(&formatted(), "pdf", "cells", NullSink).unwrap();
    assert_eq!(outcome.filename, "cells.pdf");

    let pdf = lopdf::Document::load_mem(&outcome.payload.bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);
}

#[test]
fn test_empty_doc_every_format() {
    let doc = DocumentNode::from_json(r#"{"type":"doc","content":[]}"#).unwrap();
    let exporter = Exporter::with_defaults();

    for format in ExportFormat::ALL {
        let payload = exporter.encode(&doc, format);
        assert!(payload.is_ok(), "{} failed: {:?}", format, payload.err());
    }

    assert!(exporter.encode(&doc, ExportFormat::Markdown).unwrap().is_empty());
    assert!(exporter.encode(&doc, ExportFormat::Csv).unwrap().is_empty());
    let docx = exporter.encode(&doc, ExportFormat::Docx).unwrap();
    assert_eq!(docx_text(&docx.bytes), "");
}

#[test]
fn test_fixed_time_is_reproducible() {
    let options = ExportOptions::new()
        .with_title("Cells")
        .with_created(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap());
    let exporter = Exporter::with_defaults().with_options(options);
    let doc = formatted();

    for format in [ExportFormat::Docx, ExportFormat::Markdown, ExportFormat::Csv] {
        assert_eq!(
            exporter.encode(&doc, format).unwrap(),
            exporter.encode(&doc, format).unwrap()
        );
    }
}

struct OfflineEngine;

impl PdfEngine for OfflineEngine {
    fn name(&self) -> &str {
        "offline"
    }

    fn print(&self, _job: &PrintJob<'_>) -> Result<Vec<u8>> {
        Err(Error::Engine("renderer offline".into()))
    }
}

#[test]
fn test_engine_failure_surfaces_as_export_failed() {
    let sink = MemorySink::new();
    let exporter = Exporter::with_defaults()
        .with_encoder(Arc::new(PdfEncoder::with_engine(Arc::new(OfflineEngine))))
        .with_sink(sink.clone());

    let err = exporter.export(&formatted(), ExportFormat::Pdf, "f").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to export pdf: Print engine error: renderer offline"
    );
    assert!(sink.is_empty());
}

struct TextPacker;

impl DocxPacker for TextPacker {
    fn name(&self) -> &str {
        "text"
    }

    fn pack(&self, content: &DocxContent) -> Result<Vec<u8>> {
        Ok(content.text().into_bytes())
    }
}

#[test]
fn test_custom_packer() {
    let encoder = DocxEncoder::with_packer(Arc::new(TextPacker));
    let payload = encoder
        .encode(&formatted(), &ExportOptions::default())
        .unwrap();
    assert_eq!(payload.as_str(), Some(noteport::to_text(&formatted()).as_str()));
    assert_eq!(payload.extension, "docx");
}

#[test]
fn test_export_many_all_formats() {
    let sink = MemorySink::new();
    let exporter = Exporter::with_defaults().with_sink(sink.clone());
    let results = exporter.export_many(&formatted(), &ExportFormat::ALL, "week");

    assert!(results.iter().all(|(_, r)| r.is_ok()));
    let mut names: Vec<String> = sink.artifacts().into_iter().map(|a| a.filename).collect();
    names.sort();
    assert_eq!(names, vec!["week.csv", "week.docx", "week.md", "week.pdf"]);
}

#[cfg(feature = "async")]
#[test]
fn test_export_content_async() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let sink = MemorySink::new();

    let outcome = runtime
        .block_on(noteport::export_content_async(
            formatted(),
            "csv".to_string(),
            "async".to_string(),
            sink.clone(),
        ))
        .unwrap();

    assert_eq!(outcome.filename, "async.csv");
    assert_eq!(sink.len(), 1);
}
