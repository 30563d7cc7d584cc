//! Document tree node types.

use serde::{Deserialize, Serialize};

use super::json::RawNode;
use super::{Mark, Marks};
use crate::error::Result;

/// Heading level, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Create a heading level, clamping into `1..=6`.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 6))
    }

    /// Numeric level.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u8> for HeadingLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

/// One node of a rich-text document tree.
///
/// The tree is produced by a rich-text editor and handed to the export
/// pipeline as an immutable snapshot. Container variants own their children
/// in document order; `Text` and `Image` are leaves.
///
/// Node types the pipeline does not know are kept as [`DocumentNode::Unknown`]
/// so their children still contribute to the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum DocumentNode {
    /// Root node; children are block-level nodes.
    Doc {
        /// Block children
        children: Vec<DocumentNode>,
    },

    /// A paragraph of inline content.
    Paragraph {
        /// Inline children
        children: Vec<DocumentNode>,
    },

    /// A section heading.
    Heading {
        /// Heading level (defaults to 1)
        level: HeadingLevel,
        /// Inline children
        children: Vec<DocumentNode>,
    },

    /// A run of text with inline marks.
    Text {
        /// Text content
        text: String,
        /// Marks in application order
        marks: Marks,
    },

    /// Unordered list of `ListItem` nodes.
    BulletList {
        /// List items
        children: Vec<DocumentNode>,
    },

    /// Ordered list of `ListItem` nodes.
    OrderedList {
        /// Number of the first item
        start: u32,
        /// List items
        children: Vec<DocumentNode>,
    },

    /// A list item; holds paragraphs, nested lists or inline text.
    ListItem {
        /// Item content
        children: Vec<DocumentNode>,
    },

    /// An image.
    Image {
        /// Image source URL
        src: String,
        /// Alternative text
        alt: String,
        /// Optional title
        title: Option<String>,
    },

    /// A block of preformatted code.
    CodeBlock {
        /// Language hint from the editor
        language: Option<String>,
        /// Text children
        children: Vec<DocumentNode>,
    },

    /// A node type the pipeline does not recognize.
    Unknown {
        /// Editor type name
        kind: String,
        /// Children, rendered without a wrapper
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    /// Create a root document node.
    pub fn doc(children: Vec<DocumentNode>) -> Self {
        DocumentNode::Doc { children }
    }

    /// Create an empty document.
    pub fn empty() -> Self {
        DocumentNode::Doc {
            children: Vec::new(),
        }
    }

    /// Create a paragraph.
    pub fn paragraph(children: Vec<DocumentNode>) -> Self {
        DocumentNode::Paragraph { children }
    }

    /// Create a heading.
    pub fn heading(level: u8, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Heading {
            level: HeadingLevel::new(level),
            children,
        }
    }

    /// Create an unmarked text node.
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text {
            text: text.into(),
            marks: Marks::new(),
        }
    }

    /// Create a text node with marks.
    pub fn marked(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        DocumentNode::Text {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    /// Create a bold text node.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::marked(text, [Mark::Bold])
    }

    /// Create an italic text node.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::marked(text, [Mark::Italic])
    }

    /// Create an inline code text node.
    pub fn code(text: impl Into<String>) -> Self {
        Self::marked(text, [Mark::Code])
    }

    /// Create a bullet list.
    pub fn bullet_list(items: Vec<DocumentNode>) -> Self {
        DocumentNode::BulletList { children: items }
    }

    /// Create an ordered list starting at 1.
    pub fn ordered_list(items: Vec<DocumentNode>) -> Self {
        DocumentNode::OrderedList {
            start: 1,
            children: items,
        }
    }

    /// Create a list item.
    pub fn list_item(children: Vec<DocumentNode>) -> Self {
        DocumentNode::ListItem { children }
    }

    /// Create an image.
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        DocumentNode::Image {
            src: src.into(),
            alt: alt.into(),
            title: None,
        }
    }

    /// Create a code block holding a single text node.
    pub fn code_block(language: Option<&str>, code: impl Into<String>) -> Self {
        DocumentNode::CodeBlock {
            language: language.map(str::to_string),
            children: vec![Self::text(code)],
        }
    }

    /// Create a node of an unrecognized type.
    pub fn unknown(kind: impl Into<String>, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Unknown {
            kind: kind.into(),
            children,
        }
    }

    /// Parse a document from editor JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use noteport::DocumentNode;
    ///
    /// let doc = DocumentNode::from_json(
    ///     r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hi"}]}]}"#,
    /// ).unwrap();
    /// assert_eq!(doc.children().len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a document from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize back to editor JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Editor type name of this node.
    pub fn kind(&self) -> &str {
        match self {
            DocumentNode::Doc { .. } => "doc",
            DocumentNode::Paragraph { .. } => "paragraph",
            DocumentNode::Heading { .. } => "heading",
            DocumentNode::Text { .. } => "text",
            DocumentNode::BulletList { .. } => "bulletList",
            DocumentNode::OrderedList { .. } => "orderedList",
            DocumentNode::ListItem { .. } => "listItem",
            DocumentNode::Image { .. } => "image",
            DocumentNode::CodeBlock { .. } => "codeBlock",
            DocumentNode::Unknown { kind, .. } => kind,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Doc { children }
            | DocumentNode::Paragraph { children }
            | DocumentNode::Heading { children, .. }
            | DocumentNode::BulletList { children }
            | DocumentNode::OrderedList { children, .. }
            | DocumentNode::ListItem { children }
            | DocumentNode::CodeBlock { children, .. }
            | DocumentNode::Unknown { children, .. } => children,
            DocumentNode::Text { .. } | DocumentNode::Image { .. } => &[],
        }
    }

    /// Check if this node ends a line in plain text output.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            DocumentNode::Paragraph { .. }
                | DocumentNode::Heading { .. }
                | DocumentNode::ListItem { .. }
                | DocumentNode::CodeBlock { .. }
        )
    }

    /// Check if this is a text leaf.
    pub fn is_text(&self) -> bool {
        matches!(self, DocumentNode::Text { .. })
    }

    /// Check if the subtree carries no content: no text and no images.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentNode::Text { text, .. } => text.is_empty(),
            DocumentNode::Image { .. } => false,
            other => other.children().iter().all(DocumentNode::is_empty),
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(DocumentNode::node_count)
            .sum::<usize>()
    }
}

impl Default for DocumentNode {
    fn default() -> Self {
        Self::empty()
    }
}
