use docstage_markup::normalize_text;
use serde::Serialize;

/// Headings are compared on their first characters only.
pub const HEADING_COMPARE_CHARS: usize = 80;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub paragraphs: usize,
    pub tables: usize,
    pub images: usize,
    pub links: usize,
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingText {
    pub level: u8,
    pub text: String,
}

impl HeadingText {
    pub fn new(level: u8, text: &str) -> Self {
        Self { level, text: text.chars().take(HEADING_COMPARE_CHARS).collect() }
    }

    pub fn normalized(&self) -> String {
        normalize_text(&self.text)
    }
}

/// What one side of the comparison contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inventory {
    pub counts: Counts,
    pub headings: Vec<HeadingText>,
    #[serde(skip)]
    pub words: Vec<String>,
}

impl Inventory {
    /// Adds the words of `text`. Tokens without a letter or digit (bullets,
    /// dashes, stray markers) are not words.
    pub fn add_words(&mut self, text: &str) {
        let words = text
            .split_whitespace()
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .map(str::to_string);
        self.words.extend(words);
        self.counts.words = self.words.len();
    }

    pub fn add_heading(&mut self, level: u8, text: &str) {
        match level {
            1 => self.counts.h1 += 1,
            2 => self.counts.h2 += 1,
            _ => self.counts.h3 += 1,
        }
        self.headings.push(HeadingText::new(level, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_and_dashes_are_not_words() {
        let mut inv = Inventory::default();
        inv.add_words("• Første punkt – og 2. del");
        assert_eq!(inv.words, ["Første", "punkt", "og", "2.", "del"]);
        assert_eq!(inv.counts.words, 5);
    }

    #[test]
    fn headings_are_truncated_for_comparison() {
        let h = HeadingText::new(2, &"a".repeat(100));
        assert_eq!(h.text.chars().count(), HEADING_COMPARE_CHARS);
    }
}
