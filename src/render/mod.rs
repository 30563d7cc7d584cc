//! Rendering module for converting document trees to text formats.

mod html;
mod markdown;
mod options;
mod rewrite;
mod stats;
mod text;
pub mod visitor;

pub use html::{escape_html, to_html, HtmlRenderer};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{MarkdownStyle, RenderOptions};
pub use rewrite::HtmlRewriter;
pub use stats::DocumentStats;
pub use text::{text_lines, to_text, TextCollector};
pub use visitor::{walk, NodeVisitor, VisitorAction};
