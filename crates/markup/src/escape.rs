//! Text escaping and display-only typographic adjustments.

/// Escapes text for element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

pub const THIN_SPACE: char = '\u{2009}';
pub const HAIR_SPACE: char = '\u{200A}';

/// Inserts a thin space before every dot that sits between two digits,
/// so "1.2 Titel" reads "1\u{2009}.2 Titel".
pub fn thin_space_numbers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        let between_digits = ch == '.'
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
        if between_digits {
            out.push(THIN_SPACE);
        }
        out.push(ch);
    }
    out
}

/// Removes thin and hair spaces and collapses whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|&c| c != THIN_SPACE && c != HAIR_SPACE).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
