//! Short captions derived from chapter headings.
use docstage_style::vocabulary::{LABEL_MAX_CHARS, LABEL_RULES, NO_LABEL_HEADINGS};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static CHAPTER_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*\.?\s*").expect("BUG: invalid CHAPTER_NUMBER_RE regex literal")
});

static LABEL_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    LABEL_RULES
        .iter()
        .map(|(pattern, label)| {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("BUG: invalid LABEL_RULES regex literal");
            (re, *label)
        })
        .collect()
});

/// Appendix, glossary and reference chapters go without a label.
pub fn wants_label(heading: &str) -> bool {
    let lower = heading.trim().to_lowercase();
    !NO_LABEL_HEADINGS.iter().any(|skip| lower.contains(skip))
}

/// The caption for a chapter heading: a known topic word when one matches,
/// otherwise the first few words of the heading.
pub fn chapter_label(heading: &str) -> String {
    let text = CHAPTER_NUMBER_RE.replace(heading.trim(), "");

    if let Some((_, label)) = LABEL_RES.iter().find(|(re, _)| re.is_match(&text)) {
        return label.to_string();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let fits = |s: &String| s.chars().count() <= LABEL_MAX_CHARS;
    let three = words.iter().take(3).copied().collect::<Vec<_>>().join(" ");
    if fits(&three) {
        return three;
    }
    let two = words.iter().take(2).copied().collect::<Vec<_>>().join(" ");
    if fits(&two) {
        return two;
    }
    words.first().map(|w| w.chars().take(LABEL_MAX_CHARS).collect()).unwrap_or_default()
}
