//! Script detection
//!
//! A query is routed to the Arabic path as soon as it carries any Arabic
//! codepoint; everything else is treated as Russian gloss text.

use serde::{Deserialize, Serialize};

/// Script a query was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryScript {
    /// At least one Arabic codepoint present
    Arabic,
    /// No Arabic content; compared against Russian glosses
    Russian,
}

impl QueryScript {
    /// Classify text by the presence of Arabic codepoints.
    pub fn detect(text: &str) -> Self {
        if contains_arabic(text) {
            QueryScript::Arabic
        } else {
            QueryScript::Russian
        }
    }

    pub fn is_arabic(&self) -> bool {
        matches!(self, QueryScript::Arabic)
    }
}

/// Check if a character belongs to one of the Arabic blocks.
pub fn is_arabic_char(ch: char) -> bool {
    matches!(ch as u32,
        0x0600..=0x06FF |  // Arabic
        0x0750..=0x077F |  // Arabic Supplement
        0x08A0..=0x08FF |  // Arabic Extended-A
        0xFB50..=0xFDFF |  // Arabic Presentation Forms-A
        0xFE70..=0xFEFE    // Arabic Presentation Forms-B, BOM excluded
    )
}

/// True when any codepoint of `text` is Arabic.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(is_arabic_char)
}
