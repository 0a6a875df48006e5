//! Response parser: extracts the three marker lines from a free-text model reply.
//!
//! Line scanner, not a pattern search. For each marker the first line that begins with it
//! (after leading whitespace) wins; the value is the rest of that line, trimmed. Matching is
//! case-sensitive. Values that wrap onto following lines are truncated to their first line.

use serde::Serialize;

pub const TITLE_MARKER: &str = "TITLE:";
pub const KEYWORDS_MARKER: &str = "KEYWORDS:";
pub const DESCRIPTION_MARKER: &str = "DESCRIPTION:";

/// Metadata extracted from one model reply. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub title: String,
    /// Comma-separated, exactly as the model wrote it.
    pub keywords: String,
    pub description: String,
}

impl GenerationResult {
    /// Splits `keywords` on commas, trimming each entry and dropping empties.
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// True when none of the markers were found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.keywords.is_empty() && self.description.is_empty()
    }
}

/// Parses a model reply. Never fails: missing markers yield empty fields.
pub fn parse_reply(text: &str) -> GenerationResult {
    let mut title = None;
    let mut keywords = None;
    let mut description = None;

    for line in text.lines() {
        let line = line.trim_start();
        if title.is_none() {
            title = marker_value(line, TITLE_MARKER);
        }
        if keywords.is_none() {
            keywords = marker_value(line, KEYWORDS_MARKER);
        }
        if description.is_none() {
            description = marker_value(line, DESCRIPTION_MARKER);
        }
    }

    GenerationResult {
        title: title.unwrap_or_default(),
        keywords: keywords.unwrap_or_default(),
        description: description.unwrap_or_default(),
    }
}

fn marker_value(line: &str, marker: &str) -> Option<String> {
    line.strip_prefix(marker).map(|rest| rest.trim().to_string())
}
