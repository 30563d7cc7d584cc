//! Markdown rendering for document trees.

use crate::model::{DocumentNode, Mark, Marks};

use super::rewrite::HtmlRewriter;
use super::text::to_text;
use super::{to_html, MarkdownStyle, RenderOptions};

/// Convert a document to Markdown.
///
/// The strategy is chosen by [`RenderOptions::markdown_style`].
pub fn to_markdown(doc: &DocumentNode, options: &RenderOptions) -> String {
    match options.markdown_style {
        MarkdownStyle::Structural => MarkdownRenderer::new(options.clone()).render(doc),
        MarkdownStyle::HtmlRewrite => HtmlRewriter::new().rewrite(&to_html(doc, options)),
    }
}

/// Markdown renderer working directly on the document tree.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &DocumentNode) -> String {
        let mut output = String::new();
        self.render_block(&mut output, doc);
        output.trim().to_string()
    }

    fn render_block(&self, output: &mut String, node: &DocumentNode) {
        match node {
            DocumentNode::Doc { children } | DocumentNode::Unknown { children, .. } => {
                for child in children {
                    self.render_block(output, child);
                }
            }
            DocumentNode::Paragraph { children } => {
                let text = self.inline(children);
                if !text.trim().is_empty() {
                    output.push_str(&text);
                    output.push_str("\n\n");
                }
            }
            DocumentNode::Heading { level, children } => {
                output.push_str(&"#".repeat(level.get() as usize));
                output.push(' ');
                output.push_str(&self.inline(children));
                output.push_str("\n\n");
            }
            DocumentNode::Text { .. } => {
                output.push_str(&self.inline(std::slice::from_ref(node)));
                output.push_str("\n\n");
            }
            DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                self.render_list(output, node, "");
                output.push('\n');
            }
            DocumentNode::ListItem { .. } => {
                self.render_item(output, node, &self.options.list_marker.to_string(), "");
                output.push('\n');
            }
            DocumentNode::Image { src, alt, title } => {
                output.push_str(&image(src, alt, title.as_deref()));
                output.push_str("\n\n");
            }
            DocumentNode::CodeBlock { language, children } => {
                let code = children.iter().map(to_text).collect::<String>();
                let fence = code_fence(&code);
                output.push_str(&fence);
                output.push_str(language.as_deref().unwrap_or(""));
                output.push('\n');
                output.push_str(&code);
                if !code.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(&fence);
                output.push_str("\n\n");
            }
        }
    }

    fn render_list(&self, output: &mut String, list: &DocumentNode, indent: &str) {
        let (ordered, start) = match list {
            DocumentNode::OrderedList { start, .. } => (true, *start),
            _ => (false, 1),
        };

        for (i, item) in list.children().iter().enumerate() {
            let marker = if ordered {
                format!("{}.", start as usize + i)
            } else {
                self.options.list_marker.to_string()
            };
            self.render_item(output, item, &marker, indent);
        }
    }

    /// Render one list item. Continuation lines and nested lists are
    /// indented to the width of the marker so they stay inside the item.
    fn render_item(&self, output: &mut String, item: &DocumentNode, marker: &str, indent: &str) {
        let continuation = format!("{}{}", indent, " ".repeat(marker.len() + 1));
        let children = match item {
            DocumentNode::ListItem { children } => children.as_slice(),
            other => std::slice::from_ref(other),
        };

        output.push_str(indent);
        output.push_str(marker);
        output.push(' ');

        let mut first_line = true;
        let mut pending_inline: Vec<&DocumentNode> = Vec::new();

        for child in children {
            if child.is_text() {
                pending_inline.push(child);
                continue;
            }
            if !pending_inline.is_empty() {
                start_line(output, &mut first_line, &continuation);
                output.push_str(&self.inline_refs(&pending_inline));
                output.push('\n');
                pending_inline.clear();
            }

            match child {
                DocumentNode::Paragraph { children } | DocumentNode::Heading { children, .. } => {
                    start_line(output, &mut first_line, &continuation);
                    output.push_str(&self.inline(children));
                    output.push('\n');
                }
                DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                    if first_line {
                        output.push('\n');
                        first_line = false;
                    }
                    self.render_list(output, child, &continuation);
                }
                other => {
                    let mut block = String::new();
                    self.render_block(&mut block, other);
                    for line in block.trim_end().lines() {
                        start_line(output, &mut first_line, &continuation);
                        output.push_str(line);
                        output.push('\n');
                    }
                }
            }
        }

        if !pending_inline.is_empty() {
            start_line(output, &mut first_line, &continuation);
            output.push_str(&self.inline_refs(&pending_inline));
            output.push('\n');
        }

        if first_line {
            output.push('\n');
        }
    }

    fn inline(&self, children: &[DocumentNode]) -> String {
        let mut output = String::new();
        for child in children {
            self.render_inline(&mut output, child);
        }
        output
    }

    fn inline_refs(&self, children: &[&DocumentNode]) -> String {
        let mut output = String::new();
        for child in children {
            self.render_inline(&mut output, child);
        }
        output
    }

    fn render_inline(&self, output: &mut String, node: &DocumentNode) {
        match node {
            DocumentNode::Text { text, marks } => self.render_text(output, text, marks),
            DocumentNode::Image { src, alt, title } => {
                output.push_str(&image(src, alt, title.as_deref()));
            }
            other => {
                for child in other.children() {
                    self.render_inline(output, child);
                }
            }
        }
    }

    fn render_text(&self, output: &mut String, text: &str, marks: &Marks) {
        let is_code = marks.contains(&Mark::Code);
        let mut result = if self.options.escape_markdown && !is_code {
            escape_markdown(text)
        } else {
            text.to_string()
        };

        // First mark is innermost
        for mark in marks {
            result = match mark {
                Mark::Bold => format!("**{}**", result),
                Mark::Italic => format!("*{}*", result),
                Mark::Strike => format!("~~{}~~", result),
                Mark::Code => inline_code(&result),
                Mark::Link { href } => {
                    format!("[{}]({})", result, link_destination(href))
                }
            };
        }

        output.push_str(&result);
    }
}

fn start_line(output: &mut String, first_line: &mut bool, continuation: &str) {
    if !*first_line {
        output.push_str(continuation);
    }
    *first_line = false;
}

fn image(src: &str, alt: &str, title: Option<&str>) -> String {
    let src = link_destination(src);
    match title {
        Some(t) => format!("![{}]({} \"{}\")", alt, src, t),
        None => format!("![{}]({})", alt, src),
    }
}

/// Wrap a link destination in angle brackets when it would otherwise end
/// the `(...)` group early.
fn link_destination(url: &str) -> String {
    let needs_brackets = url
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>'));
    if !needs_brackets {
        return url.to_string();
    }
    let mut result = String::with_capacity(url.len() + 2);
    result.push('<');
    for c in url.chars() {
        match c {
            '<' | '>' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            '\n' | '\r' => result.push_str("%0A"),
            _ => result.push(c),
        }
    }
    result.push('>');
    result
}

/// Delimit with one more backtick than the longest run inside the span.
fn inline_code(text: &str) -> String {
    let longest = longest_backtick_run(text);
    let delimiter = "`".repeat(longest + 1);
    if longest > 0 || text.starts_with(' ') || text.ends_with(' ') {
        format!("{0} {1} {0}", delimiter, text)
    } else {
        format!("{0}{1}{0}", delimiter, text)
    }
}

/// Pick a fence longer than any backtick run inside the code.
fn code_fence(code: &str) -> String {
    "`".repeat(longest_backtick_run(code).max(2) + 1)
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
