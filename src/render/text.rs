//! Plain text extraction for document trees.

use crate::model::DocumentNode;

use super::visitor::{walk, NodeVisitor, VisitorAction};

/// Extract the plain text of a document, dropping all formatting.
///
/// Text nodes are concatenated in document order and every block
/// (paragraph, heading, list item, code block) ends its line. Images carry
/// no text.
pub fn to_text(node: &DocumentNode) -> String {
    let mut collector = TextCollector::default();
    walk(node, &mut collector);
    collector.finish()
}

/// Split the plain text of a document into non-blank lines.
pub fn text_lines(node: &DocumentNode) -> Vec<String> {
    to_text(node)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Visitor that accumulates plain text.
#[derive(Debug, Default)]
pub struct TextCollector {
    output: String,
}

impl TextCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish collecting and return the text without trailing line breaks.
    pub fn finish(self) -> String {
        self.output.trim_end_matches('\n').to_string()
    }
}

impl NodeVisitor for TextCollector {
    fn enter(&mut self, node: &DocumentNode, _depth: usize) -> VisitorAction {
        if let DocumentNode::Text { text, .. } = node {
            self.output.push_str(text);
        }
        VisitorAction::Continue
    }

    fn leave(&mut self, node: &DocumentNode, _depth: usize) {
        if node.is_block() && !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
    }
}
