//! Predicates for source text that never reaches the output body, and the
//! field-code cleanup applied before any text is classified or rendered.
use docstage_style::vocabulary::{BULLET_GLYPHS, MANUAL_TOC_HEADINGS, TITLE_BLOCK_PATTERNS};
use regex::{Regex, RegexSet};
use std::sync::LazyLock;

static PAGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}$").expect("BUG: invalid PAGE_NUMBER_RE regex literal"));

static PAGE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(side|page)\s*\d+$").expect("BUG: invalid PAGE_LABEL_RE regex literal")
});

static MANUAL_TOC_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[—–-]{1,2}\s*\d{1,3}\s*$").expect("BUG: invalid MANUAL_TOC_ENTRY_RE regex literal")
});

static TITLE_BLOCK_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(TITLE_BLOCK_PATTERNS).expect("BUG: invalid TITLE_BLOCK_PATTERNS regex literal")
});

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s").expect("BUG: invalid NUMBERED_RE regex literal"));

static BULLET_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-\*–→]\s*").expect("BUG: invalid BULLET_PREFIX_RE regex literal"));

static NUMBER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s*").expect("BUG: invalid NUMBER_PREFIX_RE regex literal"));

/// Field-code markers, applied in order. Quotes may already be entity-escaped.
static FIELD_CODE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    const Q: &str = r#"(?:"|&quot;)"#;
    [
        format!(r#"INCLUDEPICTURE\s+{Q}[^"&]*{Q}\s*\\?\*?\s*MERGEFORMAT\w*\s*"#),
        format!(r#"INCLUDEPICTURE\s+{Q}[^"&]*{Q}\s*"#),
        r"\\?\*\s*MERGEFORMAT\w*".to_string(),
        format!(r#"(?i)TOC\s+\\[a-z]\s*{Q}[^"&]*{Q}"#),
        format!(r#"HYPERLINK\s+{Q}[^"&]*{Q}"#),
        r"\{\s*\\[A-Z]+[^}]*\}".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("BUG: invalid FIELD_CODE_RES regex literal"))
    .collect()
});

/// A stray page number: one to three digits, or "Side N" / "Page N".
pub fn is_page_number(text: &str) -> bool {
    let text = text.trim();
    PAGE_NUMBER_RE.is_match(text) || PAGE_LABEL_RE.is_match(text)
}

/// A hand-written table of contents line such as "1.1 Resultater — 4".
pub fn is_manual_toc_entry(text: &str) -> bool {
    MANUAL_TOC_ENTRY_RE.is_match(text.trim())
}

/// A hand-written table of contents heading ("Indholdsfortegnelse", "Contents", ...).
pub fn is_manual_toc_heading(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    MANUAL_TOC_HEADINGS.contains(&text.as_str())
}

/// Author, date, version or classification lines from a title block.
pub fn is_title_metadata(text: &str) -> bool {
    TITLE_BLOCK_SET.is_match(&text.trim().to_lowercase())
}

/// Text that opens like a list item: a bullet glyph or `N.`/`N ` numbering.
pub fn looks_like_list_item(text: &str) -> bool {
    let text = text.trim();
    text.starts_with(BULLET_GLYPHS) || NUMBERED_RE.is_match(text)
}

/// Removes a leading bullet glyph, then a leading number, from list text.
pub fn strip_list_prefix(text: &str) -> String {
    let text = text.trim();
    let text = BULLET_PREFIX_RE.replace(text, "");
    NUMBER_PREFIX_RE.replace(&text, "").into_owned()
}

/// Removes field-code markers without trimming, for use on individual runs.
pub fn strip_field_codes(text: &str) -> String {
    let mut out = text.to_string();
    for re in FIELD_CODE_RES.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, "").into_owned();
        }
    }
    out
}

/// Removes field-code markers and trims the result.
pub fn clean_field_codes(text: &str) -> String {
    strip_field_codes(text).trim().to_string()
}
