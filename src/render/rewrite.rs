//! Regex-based HTML to Markdown rewriting.
//!
//! This is a one-pass textual substitution over the HTML produced by
//! [`to_html`](super::to_html). It is not an HTML parser: each rule matches
//! the shortest span between an opening and closing tag on a single line,
//! so overlapping or nested tags of the same name, attributes (for example
//! `<ol start="3">` or `<code class="...">`), and entities are passed
//! through unchanged. Ordered list items become `- ` bullets.

use regex::Regex;

/// Rewrites the HTML subset emitted by the HTML renderer into Markdown.
pub struct HtmlRewriter {
    rules: Vec<(Regex, &'static str)>,
}

impl HtmlRewriter {
    /// Create a rewriter with the standard rule set.
    pub fn new() -> Self {
        let rules = [
            (r"<h1>(.*?)</h1>", "# ${1}\n\n"),
            (r"<h2>(.*?)</h2>", "## ${1}\n\n"),
            (r"<h3>(.*?)</h3>", "### ${1}\n\n"),
            (r"<p>(.*?)</p>", "${1}\n\n"),
            (r"<strong>(.*?)</strong>", "**${1}**"),
            (r"<em>(.*?)</em>", "*${1}*"),
            (r"<code>(.*?)</code>", "`${1}`"),
            (r"<ul>(.*?)</ul>", "${1}\n"),
            (r"<ol>(.*?)</ol>", "${1}\n"),
            (r"<li>(.*?)</li>", "- ${1}\n"),
            (r#"<img src="(.*?)" alt="(.*?)" />"#, "![${2}](${1})"),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
                .collect(),
        }
    }

    /// Apply every rule in order.
    pub fn rewrite(&self, html: &str) -> String {
        let mut output = html.to_string();
        for (regex, replacement) in &self.rules {
            output = regex.replace_all(&output, *replacement).into_owned();
        }
        output
    }
}

impl Default for HtmlRewriter {
    fn default() -> Self {
        Self::new()
    }
}
