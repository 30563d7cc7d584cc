//! Editor JSON interchange for the document tree.
//!
//! Editors emit loosely shaped JSON: every node has a `type`, containers an
//! optional `content` array, text nodes `text` and `marks`, and some nodes an
//! `attrs` object. Missing fields are read as empty values rather than
//! errors; the typed tree is built from this raw shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DocumentNode, HeadingLevel, Mark, Marks};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawNode {
    #[serde(rename = "type", default)]
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Vec<RawNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    marks: Option<Vec<RawMark>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawMark {
    #[serde(rename = "type", default)]
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
}

impl RawNode {
    fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|a| a.get(key)).filter(|v| !v.is_null())
    }

    fn attr_str(&self, key: &str) -> Option<String> {
        self.attr(key).map(value_to_string)
    }

    fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attr(key).and_then(value_to_u64)
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn convert_children(content: Option<Vec<RawNode>>) -> Vec<DocumentNode> {
    content
        .unwrap_or_default()
        .into_iter()
        .map(DocumentNode::from)
        .collect()
}

fn convert_marks(raw: Option<Vec<RawMark>>) -> Marks {
    let mut marks = Marks::new();
    for mark in raw.unwrap_or_default() {
        let converted = if mark.kind == "link" {
            let href = mark
                .attrs
                .as_ref()
                .and_then(|a| a.get("href"))
                .filter(|v| !v.is_null())
                .map(value_to_string)
                .unwrap_or_default();
            Some(Mark::Link { href })
        } else {
            Mark::from_name(&mark.kind)
        };

        match converted {
            Some(m) => {
                marks.push(m);
            }
            None => log::debug!("Dropping unsupported mark '{}'", mark.kind),
        }
    }
    marks
}

impl From<RawNode> for DocumentNode {
    fn from(raw: RawNode) -> Self {
        match raw.kind.as_str() {
            "doc" => DocumentNode::Doc {
                children: convert_children(raw.content),
            },
            "paragraph" => DocumentNode::Paragraph {
                children: convert_children(raw.content),
            },
            "heading" => {
                let level = raw
                    .attr_u64("level")
                    .map(|l| HeadingLevel::new(l.min(u8::MAX as u64) as u8))
                    .unwrap_or_default();
                DocumentNode::Heading {
                    level,
                    children: convert_children(raw.content),
                }
            }
            "text" => DocumentNode::Text {
                text: raw.text.unwrap_or_default(),
                marks: convert_marks(raw.marks),
            },
            "bulletList" => DocumentNode::BulletList {
                children: convert_children(raw.content),
            },
            "orderedList" => {
                let start = raw
                    .attr_u64("start")
                    .map(|s| s.min(u32::MAX as u64) as u32)
                    .unwrap_or(1);
                DocumentNode::OrderedList {
                    start,
                    children: convert_children(raw.content),
                }
            }
            "listItem" => DocumentNode::ListItem {
                children: convert_children(raw.content),
            },
            "image" => DocumentNode::Image {
                src: raw.attr_str("src").unwrap_or_default(),
                alt: raw.attr_str("alt").unwrap_or_default(),
                title: raw.attr_str("title"),
            },
            "codeBlock" => DocumentNode::CodeBlock {
                language: raw.attr_str("language").filter(|l| !l.is_empty()),
                children: convert_children(raw.content),
            },
            _ => DocumentNode::Unknown {
                kind: raw.kind,
                children: convert_children(raw.content),
            },
        }
    }
}

fn container(kind: &str, children: Vec<DocumentNode>) -> RawNode {
    RawNode {
        kind: kind.to_string(),
        content: Some(children.into_iter().map(RawNode::from).collect()),
        ..Default::default()
    }
}

fn attrs<const N: usize>(pairs: [(&str, Value); N]) -> Option<Map<String, Value>> {
    Some(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

impl From<Mark> for RawMark {
    fn from(mark: Mark) -> Self {
        let kind = mark.name().to_string();
        match mark {
            Mark::Link { href } => RawMark {
                kind,
                attrs: attrs([("href", Value::String(href))]),
            },
            _ => RawMark { kind, attrs: None },
        }
    }
}

impl From<DocumentNode> for RawNode {
    fn from(node: DocumentNode) -> Self {
        match node {
            DocumentNode::Doc { children } => container("doc", children),
            DocumentNode::Paragraph { children } => container("paragraph", children),
            DocumentNode::Heading { level, children } => RawNode {
                attrs: attrs([("level", Value::from(level.get()))]),
                ..container("heading", children)
            },
            DocumentNode::Text { text, marks } => RawNode {
                kind: "text".to_string(),
                text: Some(text),
                marks: if marks.is_empty() {
                    None
                } else {
                    Some(marks.iter().cloned().map(RawMark::from).collect())
                },
                ..Default::default()
            },
            DocumentNode::BulletList { children } => container("bulletList", children),
            DocumentNode::OrderedList { start, children } => RawNode {
                attrs: attrs([("start", Value::from(start))]),
                ..container("orderedList", children)
            },
            DocumentNode::ListItem { children } => container("listItem", children),
            DocumentNode::Image { src, alt, title } => RawNode {
                kind: "image".to_string(),
                attrs: attrs([
                    ("src", Value::String(src)),
                    ("alt", Value::String(alt)),
                    ("title", title.map(Value::String).unwrap_or(Value::Null)),
                ]),
                ..Default::default()
            },
            DocumentNode::CodeBlock { language, children } => RawNode {
                attrs: attrs([(
                    "language",
                    language.map(Value::String).unwrap_or(Value::Null),
                )]),
                ..container("codeBlock", children)
            },
            DocumentNode::Unknown { kind, children } => {
                if children.is_empty() {
                    RawNode {
                        kind,
                        ..Default::default()
                    }
                } else {
                    container(&kind, children)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_editor_json() {
        let doc = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Title"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Hi", "marks": [{"type": "bold"}, {"type": "italic"}]}
                ]}
            ]
        }))
        .unwrap();

        let children = doc.children();
        assert_eq!(children.len(), 2);
        match &children[0] {
            DocumentNode::Heading { level, .. } => assert_eq!(level.get(), 2),
            other => panic!("Expected heading, got {:?}", other),
        }
        match &children[1].children()[0] {
            DocumentNode::Text { text, marks } => {
                assert_eq!(text, "Hi");
                assert_eq!(marks.as_slice(), &[Mark::Bold, Mark::Italic]);
            }
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [
                {"type": "paragraph"},
                {"type": "heading", "attrs": null},
                {"type": "image", "attrs": {"src": null}},
                {"type": "text"}
            ]
        }))
        .unwrap();

        let children = doc.children();
        assert!(children[0].children().is_empty());
        assert!(matches!(
            &children[1],
            DocumentNode::Heading { level, .. } if level.get() == 1
        ));
        assert!(matches!(
            &children[2],
            DocumentNode::Image { src, alt, .. } if src.is_empty() && alt.is_empty()
        ));
        assert!(matches!(&children[3], DocumentNode::Text { text, .. } if text.is_empty()));
    }

    #[test]
    fn test_unknown_node_and_mark() {
        let doc = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [
                {"type": "blockquote", "content": [
                    {"type": "paragraph", "content": [
                        {"type": "text", "text": "q", "marks": [{"type": "highlight"}]}
                    ]}
                ]},
                {"type": "horizontalRule"}
            ]
        }))
        .unwrap();

        let children = doc.children();
        assert_eq!(children[0].kind(), "blockquote");
        assert_eq!(children[0].children().len(), 1);
        assert!(matches!(
            &children[0].children()[0].children()[0],
            DocumentNode::Text { marks, .. } if marks.is_empty()
        ));
        assert_eq!(children[1].kind(), "horizontalRule");
        assert!(children[1].children().is_empty());
    }

    #[test]
    fn test_link_mark_and_string_level() {
        let doc = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": "3"}, "content": [
                    {"type": "text", "text": "site", "marks": [{"type": "link", "attrs": {"href": "https://example.com"}}]}
                ]}
            ]
        }))
        .unwrap();

        let heading = &doc.children()[0];
        assert!(matches!(heading, DocumentNode::Heading { level, .. } if level.get() == 3));
        assert!(matches!(
            &heading.children()[0],
            DocumentNode::Text { marks, .. }
                if marks.as_slice() == [Mark::link("https://example.com")]
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_tree() {
        let doc = DocumentNode::doc(vec![
            DocumentNode::heading(2, vec![DocumentNode::text("Title")]),
            DocumentNode::ordered_list(vec![DocumentNode::list_item(vec![
                DocumentNode::paragraph(vec![DocumentNode::marked(
                    "x",
                    [Mark::Code, Mark::link("https://e.x")],
                )]),
            ])]),
            DocumentNode::image("a.png", "A"),
            DocumentNode::code_block(Some("rust"), "fn main() {}"),
        ]);

        let json = doc.to_json().unwrap();
        let parsed = DocumentNode::from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(DocumentNode::from_json("{not json").is_err());
    }
}
