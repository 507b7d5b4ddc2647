//! Arabic shaping and bidirectional reordering for display.
//!
//! The page engine draws every string left to right. Arabic text is first
//! converted to contextual presentation forms and then reordered into visual
//! order so it reads correctly once drawn.

use ar_reshaper::ArabicReshaper;
use thiserror::Error;
use unicode_bidi::BidiInfo;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectionError {
    #[error("shaping produced no output")]
    EmptyShaping,
    #[error("bidi analysis found no paragraphs")]
    NoParagraphs,
}

/// Returns true when `text` contains a character from the Arabic block.
pub fn has_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

pub struct TextDirectionFormatter {
    reshaper: ArabicReshaper,
}

impl Default for TextDirectionFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDirectionFormatter {
    pub fn new() -> Self {
        Self {
            reshaper: ArabicReshaper::default(),
        }
    }

    /// Display form of `text`.
    ///
    /// Text without Arabic characters is returned unchanged. If shaping or
    /// reordering fails the original text is returned, so a badly drawn line
    /// never blocks a receipt.
    pub fn display(&self, text: &str) -> String {
        if !has_arabic(text) {
            return text.to_string();
        }
        match self.try_display(text) {
            Ok(shaped) => shaped,
            Err(e) => {
                log::debug!("Falling back to unshaped text for {:?}: {}", text, e);
                text.to_string()
            }
        }
    }

    pub fn try_display(&self, text: &str) -> Result<String, DirectionError> {
        let reshaped = self.reshaper.reshape(text);
        if reshaped.is_empty() && !text.is_empty() {
            return Err(DirectionError::EmptyShaping);
        }
        reorder_visual(&reshaped)
    }
}

/// Reorder logical text into visual order, line by line.
fn reorder_visual(text: &str) -> Result<String, DirectionError> {
    let lines = text
        .split('\n')
        .map(reorder_line)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

fn reorder_line(line: &str) -> Result<String, DirectionError> {
    if line.is_empty() {
        return Ok(String::new());
    }

    let info = BidiInfo::new(line, None);
    let para = info.paragraphs.first().ok_or(DirectionError::NoParagraphs)?;
    Ok(info.reorder_line(para, para.range.clone()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_passes_through() {
        let f = TextDirectionFormatter::new();
        for s in ["", "RIMAH AL EAMAR COMPANY", "1,500 IQD", "12:30 PM"] {
            assert_eq!(f.display(s), s);
        }
    }

    #[test]
    fn test_detects_arabic_block() {
        assert!(has_arabic("وصل"));
        assert!(has_arabic("item دهن"));
        assert!(!has_arabic("receipt 0001"));
    }

    #[test]
    fn test_arabic_is_reversed_into_visual_order() {
        let f = TextDirectionFormatter::new();
        let shaped = f.display("سلام");
        assert_ne!(shaped, "سلام");
        // Presentation forms, with the final meem drawn first.
        assert!(!has_arabic(&shaped));
        assert_eq!(shaped.chars().next(), Some('\u{FEE1}'));
    }

    #[test]
    fn test_numbers_keep_their_order_inside_arabic() {
        let f = TextDirectionFormatter::new();
        let shaped = f.display("الوصل: 0042");
        assert!(shaped.contains("0042"));
    }

    #[test]
    fn test_multiline_keeps_paragraphs() {
        let f = TextDirectionFormatter::new();
        let shaped = f.display("سطر\nسطر");
        let lines: Vec<&str> = shaped.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
    }
}
