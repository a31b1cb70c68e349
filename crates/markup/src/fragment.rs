//! Fragments: the units of rendered output that pagination moves and splits.
use crate::escape::escape_html;
use crate::inline::{self, Inline};
use docstage_style::vocabulary::{IMAGE_ALT, TOC_HEADING_TEXT};
use serde::Serialize;
use std::fmt::Write;

/// How a paragraph fragment is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParagraphClass {
    Plain,
    /// A short `Key: Value` line.
    DataLabel,
    /// A list item; `continued` when it directly follows another list item.
    ListItem { continued: bool },
}

/// Where an instruction section sits among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionPosition {
    Only,
    First,
    Middle,
    Last,
}

impl SectionPosition {
    pub fn of(index: usize, count: usize) -> Self {
        match (index, count) {
            (_, 0 | 1) => SectionPosition::Only,
            (0, _) => SectionPosition::First,
            (i, n) if i + 1 == n => SectionPosition::Last,
            _ => SectionPosition::Middle,
        }
    }

    fn classes(self) -> &'static str {
        match self {
            SectionPosition::Only => "instruction-first instruction-last",
            SectionPosition::First => "instruction-first",
            SectionPosition::Middle => "instruction-middle",
            SectionPosition::Last => "instruction-last",
        }
    }
}

/// One unit of rendered output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Fragment {
    /// `h1`..`h3`. Pseudo-headings are level-3 headings that had no heading style.
    Heading { level: u8, inlines: Vec<Inline>, pseudo: bool },
    /// A `#`/`##` header line lifted out of a long text block.
    SubHeading { text: String },
    /// Short caption rendered above a chapter heading.
    Label { text: String },
    Paragraph { inlines: Vec<Inline>, class: ParagraphClass },
    HighlightBox { paragraphs: Vec<Vec<Inline>>, continued: bool },
    CodeBlock { lines: Vec<String>, continued: bool },
    InstructionSection {
        header: Option<String>,
        lines: Vec<String>,
        position: SectionPosition,
        continued: bool,
    },
    Table { header: Vec<String>, rows: Vec<Vec<String>>, continued: bool },
    /// `aspect` is height over width of the authored size, when known.
    Image { data_uri: String, aspect: Option<f32> },
    TocHeading,
    TocEntry { level: u8, text: String, page: Option<usize> },
    /// Forces the following fragment onto a new page. Consumed by pagination.
    PageBreak,
}

fn write_lines(out: &mut String, lines: &[String], continued: bool) {
    out.push_str(if continued { r#"<pre class="continued"><code>"# } else { "<pre><code>" });
    out.push_str(&escape_html(&lines.join("\n")));
    out.push_str("</code></pre>");
}

impl Fragment {
    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        Fragment::Paragraph { inlines, class: ParagraphClass::Plain }
    }

    /// A string identifier for the fragment type, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Fragment::Heading { .. } => "heading",
            Fragment::SubHeading { .. } => "sub-heading",
            Fragment::Label { .. } => "label",
            Fragment::Paragraph { .. } => "paragraph",
            Fragment::HighlightBox { .. } => "highlight-box",
            Fragment::CodeBlock { .. } => "code-block",
            Fragment::InstructionSection { .. } => "instruction-section",
            Fragment::Table { .. } => "table",
            Fragment::Image { .. } => "image",
            Fragment::TocHeading => "toc-heading",
            Fragment::TocEntry { .. } => "toc-entry",
            Fragment::PageBreak => "page-break",
        }
    }

    pub fn is_highlight(&self) -> bool {
        matches!(self, Fragment::HighlightBox { .. })
    }

    /// Headings and heading-like lines that must not end a page on their own.
    pub fn is_heading_like(&self) -> bool {
        match self {
            Fragment::Heading { .. } | Fragment::SubHeading { .. } | Fragment::Label { .. } | Fragment::TocHeading => true,
            Fragment::Paragraph { class: ParagraphClass::DataLabel, .. } => true,
            Fragment::Paragraph { inlines, class: ParagraphClass::Plain } => {
                let text = inline::plain_text(inlines);
                let text = text.trim();
                text.ends_with(':') && text.chars().count() < 80
            }
            Fragment::InstructionSection { header: Some(_), lines, .. } => lines.is_empty(),
            _ => false,
        }
    }

    /// Visible text, as a reader would extract it from the markup.
    pub fn plain_text(&self) -> String {
        match self {
            Fragment::Heading { inlines, .. } | Fragment::Paragraph { inlines, .. } => inline::plain_text(inlines),
            Fragment::SubHeading { text } | Fragment::Label { text } => text.clone(),
            Fragment::HighlightBox { paragraphs, .. } => {
                paragraphs.iter().map(|p| inline::plain_text(p)).collect::<Vec<_>>().join("\n")
            }
            Fragment::CodeBlock { lines, .. } => lines.join("\n"),
            Fragment::InstructionSection { header, lines, .. } => {
                let mut parts: Vec<&str> = header.iter().map(String::as_str).collect();
                parts.extend(lines.iter().map(String::as_str));
                parts.join("\n")
            }
            Fragment::Table { header, rows, .. } => std::iter::once(header)
                .chain(rows.iter())
                .map(|r| r.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
            Fragment::TocHeading => TOC_HEADING_TEXT.to_string(),
            Fragment::TocEntry { text, .. } => text.clone(),
            Fragment::Image { .. } | Fragment::PageBreak => String::new(),
        }
    }

    /// Renders the fragment as markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        match self {
            Fragment::Heading { level, inlines, pseudo } => {
                let class = if *pseudo { r#" class="pseudo-heading""# } else { "" };
                let _ = write!(out, "<h{level}{class}>{}</h{level}>", inline::render(inlines));
            }
            Fragment::SubHeading { text } => {
                let _ = write!(out, r#"<h4 class="instruction-header">{}</h4>"#, escape_html(text));
            }
            Fragment::Label { text } => {
                let _ = write!(out, r#"<span class="label">{}</span>"#, escape_html(text));
            }
            Fragment::Paragraph { inlines, class } => match class {
                ParagraphClass::Plain => {
                    let _ = write!(out, "<p>{}</p>", inline::render(inlines));
                }
                ParagraphClass::DataLabel => {
                    let _ = write!(out, r#"<p class="data-label">{}</p>"#, inline::render(inlines));
                }
                ParagraphClass::ListItem { continued } => {
                    let class = if *continued { "list-item list-continued" } else { "list-item" };
                    let _ = write!(
                        out,
                        r#"<p class="{class}"><span class="arrow">→</span> {}</p>"#,
                        inline::render(inlines)
                    );
                }
            },
            Fragment::HighlightBox { paragraphs, continued } => {
                out.push_str(if *continued { r#"<div class="highlight-box continued">"# } else { r#"<div class="highlight-box">"# });
                for p in paragraphs {
                    let _ = write!(out, "<p>{}</p>", inline::render(p));
                }
                out.push_str("</div>");
            }
            Fragment::CodeBlock { lines, continued } => {
                out.push_str(r#"<div class="code-block">"#);
                write_lines(&mut out, lines, *continued);
                out.push_str("</div>");
            }
            Fragment::InstructionSection { header, lines, position, continued } => {
                let continued = if *continued { " continued" } else { "" };
                let _ = write!(out, r#"<div class="instruction-section {}{continued}">"#, position.classes());
                if let Some(header) = header {
                    let _ = write!(out, r#"<h4 class="instruction-header">{}</h4>"#, escape_html(header));
                }
                if !lines.is_empty() {
                    write_lines(&mut out, lines, false);
                }
                out.push_str("</div>");
            }
            Fragment::Table { header, rows, continued } => {
                out.push_str(if *continued { r#"<table class="continued">"# } else { "<table>" });
                if !header.is_empty() {
                    out.push_str("<tr>");
                    for cell in header {
                        let _ = write!(out, "<th>{}</th>", escape_html(cell));
                    }
                    out.push_str("</tr>");
                }
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        let _ = write!(out, "<td>{}</td>", escape_html(cell));
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</table>");
            }
            Fragment::Image { data_uri, .. } => {
                let _ = write!(
                    out,
                    r#"<div class="image-container"><img src="{}" alt="{IMAGE_ALT}"></div>"#,
                    escape_html(data_uri)
                );
            }
            Fragment::TocHeading => {
                let _ = write!(out, r#"<h2 class="toc-heading">{TOC_HEADING_TEXT}</h2>"#);
            }
            Fragment::TocEntry { level, text, page } => {
                let _ = write!(out, r#"<p class="toc-entry toc-level-{level}">{}"#, escape_html(text));
                if let Some(page) = page {
                    let _ = write!(out, r#"<span class="toc-page-number">{page}</span>"#);
                }
                out.push_str("</p>");
            }
            Fragment::PageBreak => out.push_str(r#"<div class="page-break"></div>"#),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Vec<Inline> {
        vec![Inline::text(s)]
    }

    #[test]
    fn renders_headings() {
        let h = Fragment::Heading { level: 2, inlines: text("1\u{2009}.2 Metode"), pseudo: false };
        assert_eq!(h.to_markup(), "<h2>1\u{2009}.2 Metode</h2>");
        let p = Fragment::Heading { level: 3, inlines: text("Hvad nu?"), pseudo: true };
        assert_eq!(p.to_markup(), r#"<h3 class="pseudo-heading">Hvad nu?</h3>"#);
    }

    #[test]
    fn renders_list_items() {
        let first = Fragment::Paragraph { inlines: text("En"), class: ParagraphClass::ListItem { continued: false } };
        let next = Fragment::Paragraph { inlines: text("To"), class: ParagraphClass::ListItem { continued: true } };
        assert_eq!(first.to_markup(), r#"<p class="list-item"><span class="arrow">→</span> En</p>"#);
        assert_eq!(next.to_markup(), r#"<p class="list-item list-continued"><span class="arrow">→</span> To</p>"#);
    }

    #[test]
    fn renders_tables_with_header_cells() {
        let t = Fragment::Table {
            header: vec!["Navn".into(), "Værdi".into()],
            rows: vec![vec!["a".into(), "1 < 2".into()]],
            continued: true,
        };
        assert_eq!(
            t.to_markup(),
            r#"<table class="continued"><tr><th>Navn</th><th>Værdi</th></tr><tr><td>a</td><td>1 &lt; 2</td></tr></table>"#
        );
    }

    #[test]
    fn renders_toc_entries_with_and_without_pages() {
        let mut e = Fragment::TocEntry { level: 2, text: "Metode".into(), page: None };
        assert_eq!(e.to_markup(), r#"<p class="toc-entry toc-level-2">Metode</p>"#);
        if let Fragment::TocEntry { page, .. } = &mut e {
            *page = Some(4);
        }
        assert_eq!(e.to_markup(), r#"<p class="toc-entry toc-level-2">Metode<span class="toc-page-number">4</span></p>"#);
    }

    #[test]
    fn renders_instruction_sections() {
        let s = Fragment::InstructionSection {
            header: Some("Trin 1".into()),
            lines: vec!["kør <x>".into()],
            position: SectionPosition::of(0, 3),
            continued: false,
        };
        assert_eq!(
            s.to_markup(),
            r#"<div class="instruction-section instruction-first"><h4 class="instruction-header">Trin 1</h4><pre><code>kør &lt;x&gt;</code></pre></div>"#
        );
        assert_eq!(SectionPosition::of(1, 3), SectionPosition::Middle);
        assert_eq!(SectionPosition::of(2, 3), SectionPosition::Last);
        assert_eq!(SectionPosition::of(0, 1), SectionPosition::Only);
    }

    #[test]
    fn heading_like_fragments() {
        assert!(Fragment::Label { text: "Resumé".into() }.is_heading_like());
        assert!(Fragment::paragraph(text("Det betyder:")).is_heading_like());
        assert!(!Fragment::paragraph(text("Almindelig tekst.")).is_heading_like());
        let empty_section = Fragment::InstructionSection {
            header: Some("Trin".into()),
            lines: vec![],
            position: SectionPosition::Last,
            continued: false,
        };
        assert!(empty_section.is_heading_like());
        assert!(!Fragment::CodeBlock { lines: vec!["x".into()], continued: false }.is_heading_like());
    }

    #[test]
    fn plain_text_of_highlight_and_table() {
        let h = Fragment::HighlightBox { paragraphs: vec![text("a"), text("b")], continued: false };
        assert_eq!(h.plain_text(), "a\nb");
        let t = Fragment::Table { header: vec!["x".into(), "y".into()], rows: vec![vec!["1".into(), "2".into()]], continued: false };
        assert_eq!(t.plain_text(), "x y\n1 2");
    }
}
