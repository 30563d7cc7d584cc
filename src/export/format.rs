//! Export format names.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportFormat {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word-processing document
    Docx,
    /// Comma-separated values
    Csv,
    /// Markdown text
    Markdown,
}

impl ExportFormat {
    /// All supported formats, in menu order.
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Markdown,
        ExportFormat::Csv,
    ];

    /// Canonical format name (`pdf`, `docx`, `csv`, `markdown`).
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "markdown",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    /// MIME type of the encoded payload.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Markdown => "text/markdown;charset=utf-8",
        }
    }

    /// Check if the payload is binary rather than UTF-8 text.
    pub fn is_binary(self) -> bool {
        matches!(self, ExportFormat::Pdf | ExportFormat::Docx)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    /// Parse a format name. Matching is case-insensitive and `md` is
    /// accepted for Markdown; anything else is
    /// [`Error::UnsupportedFormat`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("DOCX".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!(" csv ".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "xml".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref v) if v == "xml"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Markdown.to_string(), "markdown");
        assert!(ExportFormat::Docx.is_binary());
        assert!(!ExportFormat::Csv.is_binary());
    }
}
