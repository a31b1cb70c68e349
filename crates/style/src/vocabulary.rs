//! Fixed word lists consulted by the classification heuristics and the
//! chapter-label generator. Danish first, English second, matching the
//! documents this tool is run on.

/// Paragraph openings that mark a conclusion or recommendation worth boxing.
pub const HIGHLIGHT_KEYWORDS: &[&str] = &[
    "Vigtig:",
    "Vigtigt:",
    "Konklusion:",
    "Hovedkonklusion:",
    "Bemærk:",
    "OBS:",
    "Note:",
    "Anbefaling:",
    "Samlet set:",
    "Overordnet:",
    "Alt i alt:",
    "Sammenfattende:",
    "Samlet vurdering:",
    "Overordnet vurdering:",
    "Anbefaling ved",
    "Anbefalinger for",
    "Anbefalinger:",
    "Næste skridt:",
    "Vi anbefaler:",
    "Vigtig begrænsning:",
    "Kritisk:",
    "Afgørende:",
    "Nøgle:",
    "Kort sagt:",
    "Centrale konklusioner:",
    "Centrale pointer:",
    "Baseret på evalueringen",
    "Baseret på analysen",
    "I praksis betyder",
    "Dette betyder at",
];

/// Minimum paragraph length (in characters) for a highlight box.
pub const HIGHLIGHT_MIN_CHARS: usize = 80;

/// Chapter headings that never get a label caption. Matched as substrings of
/// the lowercased heading.
pub const NO_LABEL_HEADINGS: &[&str] = &[
    "bilag",
    "ordliste",
    "appendix",
    "appendiks",
    "glossar",
    "glossary",
    "litteratur",
    "referencer",
    "kilder",
    "bibliography",
    "references",
];

/// Ordered (pattern, label) substitutions for chapter labels; first match wins.
/// Patterns are regular expressions matched case-insensitively.
pub const LABEL_RULES: &[(&str, &str)] = &[
    (r"resum[eé]", "Resumé"),
    (r"konklu", "Konklusion"),
    (r"indled", "Indledning"),
    (r"baggrund", "Baggrund"),
    (r"metod", "Metodik"),
    (r"resultat", "Resultater"),
    (r"analy", "Analyse"),
    (r"anbefal", "Anbefaling"),
    (r"diskuss", "Diskussion"),
    (r"bilag", "Bilag"),
    (r"ordliste", "Ordliste"),
    (r"roadmap", "Roadmap"),
    (r"evaluer", "Evaluering"),
    (r"teknisk", "Teknisk"),
    (r"forudsæt", "Forudsætninger"),
    (r"hovedresultat", "Hovedresultater"),
    (r"forretning", "Forretning"),
    (r"platform", "Platform"),
];

/// Longest fallback label before it is cut down.
pub const LABEL_MAX_CHARS: usize = 25;

/// Question openers (lowercase) that make a short `?` line a pseudo-heading.
pub const QUESTION_WORDS: &[&str] = &[
    "how", "what", "when", "why", "where", "which", "who", "hvordan", "hvad", "hvornår",
    "hvorfor", "hvor", "hvilken", "hvem",
];

/// Lowercase prefixes that make a line a pseudo-heading regardless of ending.
pub const SUMMARY_PREFIXES: &[&str] =
    &["summary:", "opsummering:", "konklusion:", "note:", "bemærk:"];

/// Lowercased headings of a hand-authored table of contents.
pub const MANUAL_TOC_HEADINGS: &[&str] =
    &["indholdsfortegnelse", "indhold", "table of contents", "contents", "toc"];

/// Heading text of the generated table of contents.
pub const TOC_HEADING_TEXT: &str = "Indholdsfortegnelse";

/// Characters that open a bulleted line.
pub const BULLET_GLYPHS: &[char] = &['•', '-', '*', '–', '→'];

/// Alt text for content images.
pub const IMAGE_ALT: &str = "Billede";

/// Default caption above the cover title.
pub const DEFAULT_COVER_CAPTION: &str = "RAPPORT";

/// Title used when neither the caller nor the document provides one.
pub const DEFAULT_TITLE: &str = "Dokument";

/// Lowercased openings of title-block lines (author, date, version,
/// classification). Regular expressions anchored at the start of the line.
pub const TITLE_BLOCK_PATTERNS: &[&str] = &[
    r"^udarbejdet af[:\s]",
    r"^forfatter[:\s]",
    r"^author[:\s]",
    r"^dato[:\s]",
    r"^date[:\s]",
    r"^version[:\s]",
    r"^v\d+\.\d+",
    r"^fortroligt",
    r"^confidential",
    r"^intern",
    r"^internal",
    r"^draft",
    r"^udkast",
];

/// Brand logo shipped next to the report, referenced by relative path.
pub const LOGO_PATH: &str = "Backstage Logo/Backstage Logo - Dark On White.png";

pub const LOGO_ALT: &str = "Backstage";

/// Document language declared on the `<html>` element.
pub const DOCUMENT_LANG: &str = "da";
