//! Cleanup of raw OCR output

use std::fmt;

/// Shown in place of text when OCR ran but recognized nothing
pub const NO_TEXT_FOUND: &str = "No text could be extracted from the image";

/// Text recognized on a prescription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// Non-empty, trimmed lines joined by `\n`
    Text(String),
    /// The engine ran successfully but found nothing
    NoTextFound,
}

impl ExtractedText {
    /// Clean raw engine output, falling back to the sentinel when nothing
    /// survives cleanup
    pub fn from_raw(raw: &str) -> Self {
        let cleaned = cleanup(raw);
        if cleaned.is_empty() {
            Self::NoTextFound
        } else {
            Self::Text(cleaned)
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// The cleaned text, or the sentinel message
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::NoTextFound => NO_TEXT_FOUND,
        }
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop blank lines and surrounding whitespace from OCR output
pub fn cleanup(raw: &str) -> String {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
