//! Inline marks applied to text nodes.

use std::mem;

/// An inline style annotation attached to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Strong emphasis
    Bold,
    /// Emphasis
    Italic,
    /// Inline code
    Code,
    /// Strikethrough
    Strike,
    /// Hyperlink
    Link {
        /// Link target
        href: String,
    },
}

impl Mark {
    /// Create a link mark.
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link { href: href.into() }
    }

    /// Editor name of this mark (`bold`, `italic`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Code => "code",
            Mark::Strike => "strike",
            Mark::Link { .. } => "link",
        }
    }

    /// Build a mark from its editor name. Links need an href and are
    /// handled by the JSON layer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" | "strong" => Some(Mark::Bold),
            "italic" | "em" => Some(Mark::Italic),
            "code" => Some(Mark::Code),
            "strike" | "strikethrough" => Some(Mark::Strike),
            _ => None,
        }
    }

    fn same_kind(&self, other: &Mark) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// Ordered, duplicate-free sequence of marks.
///
/// Insertion order is kept so rendering wraps text deterministically: the
/// first mark is the innermost wrapper. Adding a mark whose kind is already
/// present has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks(Vec<Mark>);

impl Marks {
    /// Create an empty mark set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a mark unless one of the same kind is already present.
    ///
    /// Returns `true` if the mark was added.
    pub fn push(&mut self, mark: Mark) -> bool {
        if self.0.iter().any(|m| m.same_kind(&mark)) {
            return false;
        }
        self.0.push(mark);
        true
    }

    /// Builder-style [`Marks::push`].
    pub fn with(mut self, mark: Mark) -> Self {
        self.push(mark);
        self
    }

    /// Check whether a mark of the same kind is present.
    pub fn contains(&self, mark: &Mark) -> bool {
        self.0.iter().any(|m| m.same_kind(mark))
    }

    /// Iterate marks in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.0.iter()
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no marks are applied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View as a slice.
    pub fn as_slice(&self) -> &[Mark] {
        &self.0
    }
}

impl FromIterator<Mark> for Marks {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut marks = Marks::new();
        for mark in iter {
            marks.push(mark);
        }
        marks
    }
}

impl<'a> IntoIterator for &'a Marks {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
