//! Visitor pattern for walking document trees.
//!
//! [`walk`] performs a depth-first, pre-order traversal and reports each
//! node to a [`NodeVisitor`]. Plain-text extraction and document statistics
//! are both built on it; callers can implement their own visitors to
//! inspect a document without matching on every node type.
//!
//! # Example
//!
//! ```
//! use noteport::DocumentNode;
//! use noteport::render::visitor::{walk, NodeVisitor, VisitorAction};
//!
//! struct ImageCounter(usize);
//!
//! impl NodeVisitor for ImageCounter {
//!     fn enter(&mut self, node: &DocumentNode, _depth: usize) -> VisitorAction {
//!         if let DocumentNode::Image { .. } = node {
//!             self.0 += 1;
//!         }
//!         VisitorAction::Continue
//!     }
//! }
//!
//! let doc = DocumentNode::doc(vec![DocumentNode::image("a.png", "")]);
//! let mut counter = ImageCounter(0);
//! walk(&doc, &mut counter);
//! assert_eq!(counter.0, 1);
//! ```

use crate::model::DocumentNode;

/// Action returned by [`NodeVisitor::enter`] to control traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Descend into the node's children.
    #[default]
    Continue,

    /// Do not visit this node's children.
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the subtree should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }
}

/// Trait for visiting document nodes.
///
/// Both methods have no-op defaults.
pub trait NodeVisitor {
    /// Called before a node's children are visited.
    ///
    /// # Arguments
    /// * `node` - The node being entered
    /// * `depth` - Distance from the walk root (root is 0)
    fn enter(&mut self, node: &DocumentNode, depth: usize) -> VisitorAction {
        let _ = (node, depth);
        VisitorAction::Continue
    }

    /// Called after a node's children were visited (or skipped).
    fn leave(&mut self, node: &DocumentNode, depth: usize) {
        let _ = (node, depth);
    }
}

/// Walk a tree depth-first, reporting every node to `visitor`.
pub fn walk<V: NodeVisitor + ?Sized>(node: &DocumentNode, visitor: &mut V) {
    walk_at(node, visitor, 0);
}

fn walk_at<V: NodeVisitor + ?Sized>(node: &DocumentNode, visitor: &mut V, depth: usize) {
    if !visitor.enter(node, depth).should_skip() {
        for child in node.children() {
            walk_at(child, visitor, depth + 1);
        }
    }
    visitor.leave(node, depth);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl NodeVisitor for Trace {
        fn enter(&mut self, node: &DocumentNode, depth: usize) -> VisitorAction {
            self.0.push(format!("+{}@{}", node.kind(), depth));
            VisitorAction::Continue
        }

        fn leave(&mut self, node: &DocumentNode, _depth: usize) {
            self.0.push(format!("-{}", node.kind()));
        }
    }

    #[test]
    fn test_visitor_action_default() {
        assert_eq!(VisitorAction::default(), VisitorAction::Continue);
        assert!(VisitorAction::Skip.should_skip());
    }

    #[test]
    fn test_walk_order() {
        let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
            "a",
        )])]);
        let mut trace = Trace::default();
        walk(&doc, &mut trace);
        assert_eq!(
            trace.0,
            vec!["+doc@0", "+paragraph@1", "+text@2", "-text", "-paragraph", "-doc"]
        );
    }
}
