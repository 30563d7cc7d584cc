//! Built-in print engine laying out document text on PDF pages.
//!
//! The engine works from the document tree carried by the print job rather
//! than interpreting the HTML. Blocks are set in the standard Helvetica and
//! Courier faces, word-wrapped to the content width and paginated. Inline
//! marks do not change the face; headings are bold, image placeholders
//! oblique and code blocks monospaced.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::Result;
use crate::model::DocumentNode;

use super::{PageSetup, PdfEngine, PrintJob};

/// Heading sizes relative to the body font, by level.
const HEADING_SCALE: [f32; 6] = [2.0, 1.6, 1.35, 1.2, 1.1, 1.0];

/// Horizontal indent per list level, in points.
const INDENT_STEP: f32 = 18.0;

/// Line height relative to the font size.
const LEADING: f32 = 1.3;

const PRODUCER: &str = concat!("noteport ", env!("CARGO_PKG_VERSION"));

/// Helvetica glyph widths in 1/1000 em, by WinAnsi code.
const HELVETICA_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold glyph widths in 1/1000 em, by WinAnsi code.
const HELVETICA_BOLD_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Courier is fixed pitch.
const COURIER_WIDTH: u16 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Oblique,
    Mono,
}

impl Face {
    const ALL: [Face; 4] = [Face::Regular, Face::Bold, Face::Oblique, Face::Mono];

    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Oblique => "F3",
            Face::Mono => "F4",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
            Face::Mono => "Courier",
        }
    }

    /// Advance width of an encoded glyph in 1/1000 em. Helvetica-Oblique
    /// shares the Helvetica metrics.
    fn glyph_width(self, byte: u8) -> u16 {
        match self {
            Face::Regular | Face::Oblique => HELVETICA_WIDTHS[byte as usize],
            Face::Bold => HELVETICA_BOLD_WIDTHS[byte as usize],
            Face::Mono if byte >= 0x20 => COURIER_WIDTH,
            Face::Mono => 0,
        }
    }

    /// Width of a character as it will be shown, in 1/1000 em.
    fn char_width(self, c: char) -> u32 {
        self.glyph_width(win_ansi_byte(c).unwrap_or(b'?')) as u32
    }
}

/// A block of text to be wrapped as a unit.
#[derive(Debug, Clone, PartialEq)]
struct TextBlock {
    face: Face,
    size: f32,
    indent: usize,
    text: String,
}

/// A line positioned on a page.
#[derive(Debug, Clone)]
struct PlacedLine {
    face: Face,
    size: i64,
    x: i64,
    y: i64,
    text: Vec<u8>,
}

/// Print engine producing paginated text PDFs with lopdf.
#[derive(Debug, Clone, Default)]
pub struct TextLayoutEngine {
    _private: (),
}

impl TextLayoutEngine {
    /// Create a new text layout engine.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn collect(&self, node: &DocumentNode, indent: usize, body: f32, out: &mut Vec<TextBlock>) {
        match node {
            DocumentNode::Doc { children } | DocumentNode::Unknown { children, .. } => {
                for child in children {
                    self.collect(child, indent, body, out);
                }
            }
            DocumentNode::Paragraph { children } => {
                push_block(out, Face::Regular, body, indent, inline_text(children));
            }
            DocumentNode::Heading { level, children } => {
                let scale = HEADING_SCALE[(level.get() as usize).saturating_sub(1).min(5)];
                push_block(out, Face::Bold, body * scale, indent, inline_text(children));
            }
            DocumentNode::Text { text, .. } => {
                push_block(out, Face::Regular, body, indent, text.clone());
            }
            DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                self.collect_list(node, indent, body, out);
            }
            DocumentNode::ListItem { .. } => {
                self.collect_item(node, "\u{2022}".to_string(), indent, body, out);
            }
            DocumentNode::Image { .. } => {
                push_block(out, Face::Oblique, body, indent, inline_text(std::slice::from_ref(node)));
            }
            DocumentNode::CodeBlock { children, .. } => {
                let code: String = children.iter().map(crate::render::to_text).collect();
                for line in code.split('\n') {
                    // Blank code lines keep their vertical space.
                    let line = if line.trim().is_empty() { " " } else { line };
                    out.push(TextBlock {
                        face: Face::Mono,
                        size: body * 0.9,
                        indent,
                        text: line.to_string(),
                    });
                }
            }
        }
    }

    fn collect_list(&self, list: &DocumentNode, indent: usize, body: f32, out: &mut Vec<TextBlock>) {
        let start = match list {
            DocumentNode::OrderedList { start, .. } => Some(*start),
            _ => None,
        };

        for (i, item) in list.children().iter().enumerate() {
            let marker = match start {
                Some(start) => format!("{}.", start as usize + i),
                None => "\u{2022}".to_string(),
            };
            self.collect_item(item, marker, indent, body, out);
        }
    }

    fn collect_item(
        &self,
        item: &DocumentNode,
        marker: String,
        indent: usize,
        body: f32,
        out: &mut Vec<TextBlock>,
    ) {
        let mut marker = Some(marker);
        let mut pending = String::new();

        let children = match item {
            DocumentNode::ListItem { children } => children.as_slice(),
            other => std::slice::from_ref(other),
        };

        for child in children {
            match child {
                DocumentNode::Text { .. } | DocumentNode::Image { .. } => {
                    pending.push_str(&inline_text(std::slice::from_ref(child)));
                    continue;
                }
                _ => {}
            }

            flush_item_line(out, &mut marker, &mut pending, indent, body);
            match child {
                DocumentNode::Paragraph { children } | DocumentNode::Heading { children, .. } => {
                    pending = inline_text(children);
                    flush_item_line(out, &mut marker, &mut pending, indent, body);
                }
                DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                    if let Some(m) = marker.take() {
                        push_block(out, Face::Regular, body, indent, m);
                    }
                    self.collect_list(child, indent + 1, body, out);
                }
                other => self.collect(other, indent + 1, body, out),
            }
        }

        flush_item_line(out, &mut marker, &mut pending, indent, body);
        if let Some(m) = marker {
            push_block(out, Face::Regular, body, indent, m);
        }
    }

    /// Wrap and paginate blocks into positioned lines.
    fn layout(&self, blocks: &[TextBlock], setup: &PageSetup) -> Vec<Vec<PlacedLine>> {
        let (width, height) = setup.page_size();
        let margin = setup.margin_points().min(width / 4.0).min(height / 4.0);
        let top = height - margin;

        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut y = top;

        let content_width = width - 2.0 * margin;
        let right = width - margin;

        for block in blocks {
            // Lines are shown at the rounded size, so measure at it too.
            let size = block.size.round().max(1.0);
            let leading = size * LEADING;
            let indent = (block.indent as f32 * INDENT_STEP).min(content_width / 2.0);
            let x = (margin + indent).round();

            for line in wrap(&block.text, block.face, size, right - x) {
                let page_has_lines = pages.last().is_some_and(|p| !p.is_empty());
                if y - leading < margin && page_has_lines {
                    pages.push(Vec::new());
                    y = top;
                }
                y -= leading;

                if let Some(page) = pages.last_mut() {
                    page.push(PlacedLine {
                        face: block.face,
                        size: size as i64,
                        x: x as i64,
                        y: y.round() as i64,
                        text: encode_win_ansi(&line),
                    });
                }
            }
            y -= size * 0.5;
        }

        pages
    }

    fn build(&self, pages: &[Vec<PlacedLine>], job: &PrintJob<'_>) -> Result<Vec<u8>> {
        let (width, height) = job.setup.page_size();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in Face::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for lines in pages {
            let content_id = self.add_content(&mut doc, lines)?;
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width.round() as i64),
                    Object::Integer(height.round() as i64),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(
                job.created.format("D:%Y%m%d%H%M%SZ").to_string(),
            ),
        };
        if let Some(title) = job.title {
            info.set("Title", text_string(title));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn add_content(&self, doc: &mut Document, lines: &[PlacedLine]) -> Result<ObjectId> {
        let mut operations = Vec::with_capacity(lines.len() * 3 + 2);
        operations.push(Operation::new("BT", vec![]));
        for line in lines {
            operations.push(Operation::new(
                "Tf",
                vec![line.face.resource().into(), Object::Integer(line.size)],
            ));
            operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Integer(line.x),
                    Object::Integer(line.y),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text.clone())],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        Ok(doc.add_object(Stream::new(dictionary! {}, content.encode()?)))
    }
}

impl PdfEngine for TextLayoutEngine {
    fn name(&self) -> &str {
        "text-layout"
    }

    fn print(&self, job: &PrintJob<'_>) -> Result<Vec<u8>> {
        let mut blocks = Vec::new();
        self.collect(job.document, 0, job.setup.font_size, &mut blocks);

        let pages = self.layout(&blocks, job.setup);
        log::debug!(
            "Laid out {} blocks on {} page(s)",
            blocks.len(),
            pages.len()
        );

        self.build(&pages, job)
    }
}

fn push_block(out: &mut Vec<TextBlock>, face: Face, size: f32, indent: usize, text: String) {
    if !text.trim().is_empty() {
        out.push(TextBlock {
            face,
            size,
            indent,
            text,
        });
    }
}

fn flush_item_line(
    out: &mut Vec<TextBlock>,
    marker: &mut Option<String>,
    pending: &mut String,
    indent: usize,
    body: f32,
) {
    if pending.trim().is_empty() {
        pending.clear();
        return;
    }
    let text = std::mem::take(pending);
    match marker.take() {
        Some(m) => push_block(out, Face::Regular, body, indent, format!("{} {}", m, text)),
        None => push_block(out, Face::Regular, body, indent + 1, text),
    }
}

/// Text of inline content. Images contribute a placeholder.
fn inline_text(children: &[DocumentNode]) -> String {
    let mut output = String::new();
    for child in children {
        match child {
            DocumentNode::Text { text, .. } => output.push_str(text),
            DocumentNode::Image { src, alt, .. } => {
                let label = if alt.is_empty() { src } else { alt };
                output.push_str(&format!("[Image: {}]", label));
            }
            other => output.push_str(&inline_text(other.children())),
        }
    }
    output
}

/// Greedy word wrap to lines no wider than `max_width` points when set in
/// `face` at `size`. Words wider than a line are split; a line always holds
/// at least one character.
fn wrap(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let max_units = (max_width.max(0.0) * 1000.0 / size) as u32;
    let space = face.char_width(' ');
    let mut lines = Vec::new();

    for source in text.split('\n') {
        let mut current = String::new();
        let mut current_units = 0u32;

        for word in source.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            let mut units: u32 = chars.iter().map(|&c| face.char_width(c)).sum();

            while units > max_units && chars.len() > 1 {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_units = 0;
                }
                let mut taken = 0;
                let mut taken_units = 0u32;
                for &c in &chars {
                    let w = face.char_width(c);
                    if taken > 0 && taken_units + w > max_units {
                        break;
                    }
                    taken += 1;
                    taken_units += w;
                }
                let rest = chars.split_off(taken);
                lines.push(chars.into_iter().collect());
                chars = rest;
                units -= taken_units;
            }

            if !current.is_empty() && current_units + space + units > max_units {
                lines.push(std::mem::take(&mut current));
                current_units = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_units += space;
            }
            current.extend(chars);
            current_units += units;
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// PDF text string for document metadata: UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// WinAnsi code of a character, if it has one. Tab shows as a space.
fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\t' => b' ',
        '\u{20ac}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => return None,
    };
    Some(byte)
}

/// Encode text for the WinAnsi font encoding. Characters outside it become
/// `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0usize;

    for c in text.chars() {
        let byte = win_ansi_byte(c).unwrap_or_else(|| {
            replaced += 1;
            b'?'
        });
        bytes.push(byte);
    }

    if replaced > 0 {
        log::warn!(
            "{} character(s) not representable in the PDF font were replaced",
            replaced
        );
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentNode;
    use chrono::{TimeZone, Utc};

    fn print(doc: &DocumentNode, title: Option<&str>) -> Vec<u8> {
        let setup = PageSetup::default();
        let job = PrintJob {
            html: "",
            document: doc,
            setup: &setup,
            title,
            created: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        TextLayoutEngine::new().print(&job).unwrap()
    }

    /// Shown width of encoded text in points.
    fn text_width(bytes: &[u8], face: Face, size: f32) -> f32 {
        let units: u32 = bytes.iter().map(|&b| face.glyph_width(b) as u32).sum();
        units as f32 * size / 1000.0
    }

    fn shown_text(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        let mut shown = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let data = doc.get_page_content(page_id).unwrap();
            let content = Content::decode(&data).unwrap();
            for op in content.operations {
                if op.operator == "Tj" {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        shown.push(String::from_utf8_lossy(bytes).to_string());
                    }
                }
            }
        }
        shown
    }

    #[test]
    fn test_wrap() {
        // Courier at 10pt is 6pt per character.
        assert_eq!(wrap("aa bb cc", Face::Mono, 10.0, 30.0), vec!["aa bb", "cc"]);
        assert_eq!(wrap("abcdefg", Face::Mono, 10.0, 18.0), vec!["abc", "def", "g"]);
        assert_eq!(wrap("one\ntwo", Face::Mono, 10.0, 480.0), vec!["one", "two"]);
        assert!(wrap("   ", Face::Mono, 10.0, 60.0).is_empty());
    }

    #[test]
    fn test_wrap_uses_glyph_widths() {
        assert_eq!(wrap("MMMM iiii", Face::Regular, 10.0, 34.0), vec!["MMMM", "iiii"]);
        assert_eq!(wrap("iiii iiii", Face::Regular, 10.0, 34.0), vec!["iiii iiii"]);
        assert_eq!(wrap("MMM", Face::Regular, 10.0, 1.0), vec!["M", "M", "M"]);
    }

    #[test]
    fn test_text_width() {
        assert!((text_width(b"MMMMMMMM", Face::Regular, 10.0) - 66.64).abs() < 0.01);
        assert!((text_width(b"iiiiiiii", Face::Regular, 10.0) - 17.76).abs() < 0.01);
        assert!((text_width(b"ab", Face::Bold, 10.0) - 11.67).abs() < 0.01);
        assert!((text_width(b"ab", Face::Mono, 10.0) - 12.0).abs() < 0.01);
        assert_eq!(text_width(b"Wi", Face::Oblique, 10.0), text_width(b"Wi", Face::Regular, 10.0));
    }

    #[test]
    fn test_lines_stay_inside_right_margin() {
        let wide = "MMMMMMMM WWWWWWWW MMMMMMMM WWWWWWWW ".repeat(6);
        let doc = DocumentNode::doc(vec![
            DocumentNode::heading(1, vec![DocumentNode::text(wide.as_str())]),
            DocumentNode::paragraph(vec![DocumentNode::text(wide.as_str())]),
            DocumentNode::paragraph(vec![DocumentNode::text("M".repeat(200))]),
            DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
                DocumentNode::paragraph(vec![DocumentNode::text(wide.as_str())]),
                DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
                    DocumentNode::text(wide.as_str()),
                ])]),
            ])]),
            DocumentNode::code_block(None, "W".repeat(150)),
        ]);

        let setup = PageSetup::default();
        let engine = TextLayoutEngine::new();
        let mut blocks = Vec::new();
        engine.collect(&doc, 0, setup.font_size, &mut blocks);
        let pages = engine.layout(&blocks, &setup);

        let (width, height) = setup.page_size();
        let right = width - setup.margin_points().min(width / 4.0).min(height / 4.0);
        let lines: Vec<&PlacedLine> = pages.iter().flatten().collect();
        assert!(lines.len() > blocks.len());
        for line in lines {
            let end = line.x as f32 + text_width(&line.text, line.face, line.size as f32);
            assert!(
                end <= right + 0.01,
                "line ends at {} past {}: {}",
                end,
                right,
                String::from_utf8_lossy(&line.text)
            );
        }
    }

    #[test]
    fn test_title_is_utf16() {
        let title = "Caf\u{e9} \u{20ac} \u{4e2d}\u{6587}";
        let bytes = print(&DocumentNode::empty(), Some(title));

        let loaded = Document::load_mem(&bytes).unwrap();
        let info_id = loaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = loaded.get_dictionary(info_id).unwrap();
        let raw = match info.get(b"Title").unwrap() {
            Object::String(raw, _) => raw.clone(),
            other => panic!("unexpected title object: {:?}", other),
        };

        assert_eq!(&raw[..2], &[0xfe, 0xff]);
        let units: Vec<u16> = raw[2..]
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), title);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Caf\u{e9}"), b"Caf\xe9");
        assert_eq!(encode_win_ansi("\u{2022} x"), b"\x95 x");
        assert_eq!(encode_win_ansi("\u{4e2d}"), b"?");
    }

    #[test]
    fn test_collect_list_blocks() {
        let doc = DocumentNode::doc(vec![DocumentNode::OrderedList {
            start: 3,
            children: vec![DocumentNode::list_item(vec![
                DocumentNode::paragraph(vec![DocumentNode::text("first")]),
                DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
                    DocumentNode::text("inner"),
                ])]),
            ])],
        }]);

        let mut blocks = Vec::new();
        TextLayoutEngine::new().collect(&doc, 0, 11.0, &mut blocks);
        let texts: Vec<(&str, usize)> = blocks.iter().map(|b| (b.text.as_str(), b.indent)).collect();
        assert_eq!(texts, vec![("3. first", 0), ("\u{2022} inner", 1)]);
    }

    #[test]
    fn test_print_single_page() {
        let doc = DocumentNode::doc(vec![
            DocumentNode::heading(1, vec![DocumentNode::text("Notes")]),
            DocumentNode::paragraph(vec![DocumentNode::bold("Hello")]),
            DocumentNode::image("a.png", "diagram"),
        ]);
        let bytes = print(&doc, Some("Lecture"));

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
        assert_eq!(shown_text(&bytes), vec!["Notes", "Hello", "[Image: diagram]"]);
    }

    #[test]
    fn test_print_paginates() {
        let paragraphs = (0..150)
            .map(|i| DocumentNode::paragraph(vec![DocumentNode::text(format!("Paragraph {}", i))]))
            .collect();
        let bytes = print(&DocumentNode::doc(paragraphs), None);

        let loaded = Document::load_mem(&bytes).unwrap();
        assert!(loaded.get_pages().len() > 1);
        assert_eq!(shown_text(&bytes).len(), 150);
    }

    #[test]
    fn test_print_empty_document() {
        let bytes = print(&DocumentNode::empty(), None);
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
        assert!(shown_text(&bytes).is_empty());
    }
}
