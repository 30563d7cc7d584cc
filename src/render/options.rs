//! Rendering options and configuration.

/// How Markdown output is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkdownStyle {
    /// Convert the document tree directly
    #[default]
    Structural,
    /// Render HTML first, then rewrite tags with regular expressions.
    ///
    /// Only understands the tag subset produced by the HTML renderer.
    HtmlRewrite,
}

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Escape `&`, `<`, `>`, and quotes in HTML text and attributes
    pub escape_html: bool,

    /// Markdown conversion strategy
    pub markdown_style: MarkdownStyle,

    /// Character to use for unordered list markers
    pub list_marker: char,

    /// Escape special Markdown characters in text
    pub escape_markdown: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable HTML escaping, emitting text and attributes verbatim.
    pub fn raw_html(mut self) -> Self {
        self.escape_html = false;
        self
    }

    /// Set the Markdown conversion strategy.
    pub fn with_markdown_style(mut self, style: MarkdownStyle) -> Self {
        self.markdown_style = style;
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_markdown_escaping(mut self, escape: bool) -> Self {
        self.escape_markdown = escape;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape_html: true,
            markdown_style: MarkdownStyle::Structural,
            list_marker: '-',
            escape_markdown: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .raw_html()
            .with_markdown_style(MarkdownStyle::HtmlRewrite)
            .with_list_marker('*')
            .with_markdown_escaping(false);

        assert!(!options.escape_html);
        assert_eq!(options.markdown_style, MarkdownStyle::HtmlRewrite);
        assert_eq!(options.list_marker, '*');
        assert!(!options.escape_markdown);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert!(options.escape_html);
        assert_eq!(options.markdown_style, MarkdownStyle::Structural);
        assert_eq!(options.list_marker, '-');
    }
}
