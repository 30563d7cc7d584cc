//! HTML rendering for document trees.

use std::borrow::Cow;

use crate::model::{DocumentNode, Mark, Marks};

use super::RenderOptions;

/// Convert a document tree to an HTML fragment.
///
/// Rendering is total: unknown node types contribute their children (or
/// nothing), and missing content renders as an empty string.
///
/// # Example
///
/// ```
/// use noteport::{DocumentNode, RenderOptions};
/// use noteport::render::to_html;
///
/// let doc = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::bold("Hi")])]);
/// assert_eq!(to_html(&doc, &RenderOptions::default()), "<p><strong>Hi</strong></p>");
/// ```
pub fn to_html(node: &DocumentNode, options: &RenderOptions) -> String {
    HtmlRenderer::new(options.clone()).render(node)
}

/// HTML renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a node and its subtree.
    pub fn render(&self, node: &DocumentNode) -> String {
        let mut output = String::new();
        self.render_node(&mut output, node);
        output
    }

    fn render_node(&self, output: &mut String, node: &DocumentNode) {
        match node {
            DocumentNode::Doc { children } | DocumentNode::Unknown { children, .. } => {
                self.render_children(output, children);
            }
            DocumentNode::Paragraph { children } => {
                self.render_wrapped(output, "p", children);
            }
            DocumentNode::Heading { level, children } => {
                let tag = format!("h{}", level.get());
                self.render_wrapped(output, &tag, children);
            }
            DocumentNode::Text { text, marks } => {
                self.render_text(output, text, marks);
            }
            DocumentNode::BulletList { children } => {
                self.render_wrapped(output, "ul", children);
            }
            DocumentNode::OrderedList { start, children } => {
                if *start == 1 {
                    self.render_wrapped(output, "ol", children);
                } else {
                    output.push_str(&format!("<ol start=\"{}\">", start));
                    self.render_children(output, children);
                    output.push_str("</ol>");
                }
            }
            DocumentNode::ListItem { children } => {
                self.render_wrapped(output, "li", children);
            }
            DocumentNode::Image { src, alt, title } => {
                output.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"",
                    self.escape(src),
                    self.escape(alt)
                ));
                if let Some(title) = title {
                    output.push_str(&format!(" title=\"{}\"", self.escape(title)));
                }
                output.push_str(" />");
            }
            DocumentNode::CodeBlock { language, children } => {
                match language {
                    Some(lang) => {
                        output.push_str(&format!(
                            "<pre><code class=\"language-{}\">",
                            self.escape(lang)
                        ));
                    }
                    None => output.push_str("<pre><code>"),
                }
                for child in children {
                    // Marks are meaningless inside preformatted code.
                    if let DocumentNode::Text { text, .. } = child {
                        output.push_str(&self.escape(text));
                    } else {
                        self.render_node(output, child);
                    }
                }
                output.push_str("</code></pre>");
            }
        }
    }

    fn render_children(&self, output: &mut String, children: &[DocumentNode]) {
        for child in children {
            self.render_node(output, child);
        }
    }

    fn render_wrapped(&self, output: &mut String, tag: &str, children: &[DocumentNode]) {
        output.push('<');
        output.push_str(tag);
        output.push('>');
        self.render_children(output, children);
        output.push_str("</");
        output.push_str(tag);
        output.push('>');
    }

    fn render_text(&self, output: &mut String, text: &str, marks: &Marks) {
        let mut result = self.escape(text).into_owned();

        // First mark is innermost
        for mark in marks {
            result = match mark {
                Mark::Bold => format!("<strong>{}</strong>", result),
                Mark::Italic => format!("<em>{}</em>", result),
                Mark::Code => format!("<code>{}</code>", result),
                Mark::Strike => format!("<s>{}</s>", result),
                Mark::Link { href } => format!("<a href=\"{}\">{}</a>", self.escape(href), result),
            };
        }

        output.push_str(&result);
    }

    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.options.escape_html {
            escape_html(text)
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Escape HTML special characters in text and attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
