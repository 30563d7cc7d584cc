//! Content statistics for document trees.

use serde::{Deserialize, Serialize};

use crate::model::DocumentNode;

use super::visitor::{walk, NodeVisitor, VisitorAction};

/// Statistics collected from a document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of lists (bullet and ordered)
    pub list_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of images
    pub image_count: u32,

    /// Number of code blocks
    pub code_block_count: u32,

    /// Number of nodes with an unrecognized type
    pub unknown_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Collect statistics for a document.
    pub fn collect(doc: &DocumentNode) -> Self {
        let mut visitor = StatsVisitor::default();
        walk(doc, &mut visitor);
        visitor.stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[derive(Default)]
struct StatsVisitor {
    stats: DocumentStats,
}

impl NodeVisitor for StatsVisitor {
    fn enter(&mut self, node: &DocumentNode, _depth: usize) -> VisitorAction {
        let stats = &mut self.stats;
        match node {
            DocumentNode::Paragraph { .. } => stats.paragraph_count += 1,
            DocumentNode::Heading { .. } => stats.heading_count += 1,
            DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                stats.list_count += 1
            }
            DocumentNode::ListItem { .. } => stats.list_item_count += 1,
            DocumentNode::Image { .. } => stats.image_count += 1,
            DocumentNode::CodeBlock { .. } => stats.code_block_count += 1,
            DocumentNode::Unknown { .. } => stats.unknown_count += 1,
            DocumentNode::Text { text, .. } => stats.count_text(text),
            DocumentNode::Doc { .. } => {}
        }
        VisitorAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect() {
        let doc = DocumentNode::doc(vec![
            DocumentNode::heading(1, vec![DocumentNode::text("Title")]),
            DocumentNode::paragraph(vec![DocumentNode::text("Hello, world! This is a test.")]),
            DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
                DocumentNode::text("item"),
            ])]),
            DocumentNode::image("a.png", "alt"),
            DocumentNode::unknown("horizontalRule", vec![]),
        ]);

        let stats = DocumentStats::collect(&doc);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.list_count, 1);
        assert_eq!(stats.list_item_count, 1);
        assert_eq!(stats.image_count, 1);
        assert_eq!(stats.unknown_count, 1);
        assert_eq!(stats.word_count, 8);
    }
}
