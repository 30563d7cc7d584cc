//! Document model for rich-text note content.
//!
//! The model is a closed tree of typed nodes mirroring what a rich-text
//! editor produces: block containers (paragraphs, headings, lists, code
//! blocks), inline text leaves carrying marks, and images. Every export
//! format is derived from this tree.

mod json;
mod mark;
mod node;

pub use mark::{Mark, Marks};
pub use node::{DocumentNode, HeadingLevel};
