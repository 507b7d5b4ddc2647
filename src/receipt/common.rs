//! Common helpers for receipt rendering: Typst escaping, file naming, and
//! date stamps.

use chrono::{DateTime, Local};

const FILE_LABEL: &str = "وصل";
const FILE_EXTENSION: &str = "pdf";
const MAX_FILE_NAME_BYTES: usize = 255;

/// Left-to-right override and pop directional formatting.
const LRO: char = '\u{202D}';
const PDF: char = '\u{202C}';

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Quote already visually ordered text for a Typst string literal.
///
/// The text is wrapped in a left-to-right override so Typst draws it as-is
/// instead of running its own bidi pass over it again.
pub fn typst_visual_string(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    format!("\"{}{}{}\"", LRO, escape_typst_string(value), PDF)
}

/// File name for a receipt: `وصل_<number>_<item without whitespace>.pdf`.
///
/// Only the item part goes through `sanitize_filename`, so it can never
/// introduce path separators. A long item is cut on a character boundary
/// to keep the whole name within `MAX_FILE_NAME_BYTES` with its extension.
pub fn receipt_file_name(sequence_number: &str, item_name: &str) -> String {
    let compact: String = item_name.chars().filter(|c| !c.is_whitespace()).collect();
    let item = sanitize_filename::sanitize(compact);

    let prefix = format!("{FILE_LABEL}_{sequence_number}_");
    let budget = MAX_FILE_NAME_BYTES.saturating_sub(prefix.len() + FILE_EXTENSION.len() + 1);
    let item = truncate_to_bytes(&item, budget);

    format!("{prefix}{item}.{FILE_EXTENSION}")
}

fn truncate_to_bytes(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Percent-encode a file name for use as one URL path segment.
pub fn encode_path_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Time stamp in 12-hour format, e.g. "03:45 PM".
pub fn format_time(at: &DateTime<Local>) -> String {
    at.format("%I:%M %p").to_string()
}

/// Date stamp, e.g. "2025-03-14".
pub fn format_date(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d").to_string()
}
