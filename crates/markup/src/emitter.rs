//! Turns classified blocks into fragments.
//!
//! Emission is sequential: an [`EmitContext`] carries what earlier blocks
//! decided (title seen, generated TOC inserted, previous fragment a highlight
//! box, inside a list) and is created fresh for every conversion.
use crate::escape::thin_space_numbers;
use crate::fragment::{Fragment, ParagraphClass, SectionPosition};
use crate::inline::{self, Inline};
use crate::label::{chapter_label, wants_label};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use docstage_classify::{
    Classifier, clean_field_codes, is_manual_toc_entry, is_manual_toc_heading, is_page_number,
    is_title_metadata, strip_list_prefix,
};
use docstage_types::{Block, ImageRef, Paragraph, Role, Table, TocEntry};
use regex::Regex;
use std::sync::LazyLock;

static DATA_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÆØÅæøå]+:\s*[A-Za-zÆØÅæøå]+$").expect("BUG: invalid DATA_LABEL_RE regex literal")
});

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("BUG: invalid BLANK_LINES_RE regex literal"));

/// Number of leading characters compared when deciding whether a heading repeats the title.
const TITLE_PREFIX_CHARS: usize = 30;

/// State threaded through one conversion.
#[derive(Debug, Clone, Default)]
pub struct EmitContext {
    title: String,
    toc: Vec<TocEntry>,
    title_heading_seen: bool,
    toc_inserted: bool,
    content_started: bool,
    last_was_highlight: bool,
    in_list: bool,
}

impl EmitContext {
    pub fn new(title: impl Into<String>, toc: Vec<TocEntry>) -> Self {
        Self { title: title.into(), toc, ..Default::default() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn toc_inserted(&self) -> bool {
        self.toc_inserted
    }

    pub fn last_was_highlight(&self) -> bool {
        self.last_was_highlight
    }

    /// True once the first chapter heading after the title block has been emitted.
    pub fn content_started(&self) -> bool {
        self.content_started
    }

    fn observe(&mut self, fragments: &[Fragment]) {
        if let Some(last) = fragments.last() {
            self.last_was_highlight = last.is_highlight();
            self.in_list = matches!(last, Fragment::Paragraph { class: ParagraphClass::ListItem { .. }, .. });
        }
    }
}

/// Output of a whole-document emission.
#[derive(Debug, Clone, Default)]
pub struct Emission {
    pub fragments: Vec<Fragment>,
    pub toc: Vec<TocEntry>,
}

fn same_title(text: &str, title: &str) -> bool {
    let prefix = |s: &str| s.to_lowercase().chars().take(TITLE_PREFIX_CHARS).collect::<String>();
    !title.is_empty() && prefix(text) == prefix(title)
}

/// Text of the first Heading 1, the document's title by convention.
pub fn first_heading(blocks: &[Block], classifier: &Classifier) -> Option<String> {
    blocks.iter().filter_map(Block::as_paragraph).find_map(|p| {
        let text = clean_field_codes(&p.text());
        (classifier.classify_paragraph(p) == Role::Heading1 && !text.is_empty() && !is_manual_toc_heading(&text))
            .then_some(text)
    })
}

/// Table of contents entries in document order: every level 1-3 heading
/// except the title heading and headings repeating the title.
pub fn collect_toc(blocks: &[Block], classifier: &Classifier, title: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut title_seen = false;

    for p in blocks.iter().filter_map(Block::as_paragraph) {
        let Some(level) = classifier.classify_paragraph(p).heading_level() else {
            continue;
        };
        let text = clean_field_codes(&p.text());
        if text.is_empty() || is_manual_toc_heading(&text) || is_manual_toc_entry(&text) || is_page_number(&text) {
            continue;
        }
        if level == 1 {
            if !title_seen {
                title_seen = true;
                continue;
            }
            if same_title(&text, title) {
                continue;
            }
        }
        entries.push(TocEntry::new(level, text));
    }
    entries
}

fn image_type(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some(ct) if ct.contains("png") => "png",
        Some(ct) if ct.contains("jpeg") || ct.contains("jpg") => "jpeg",
        Some(ct) if ct.contains("gif") => "gif",
        _ => "png",
    }
}

/// An image fragment with the picture inlined as a data URI. Images whose
/// bytes could not be resolved produce nothing.
pub fn image_fragment(image: &ImageRef) -> Option<Fragment> {
    if image.bytes.is_empty() {
        log::debug!("image '{}' has no data; skipped", image.rel_id);
        return None;
    }
    let data_uri = format!(
        "data:image/{};base64,{}",
        image_type(image.content_type.as_deref()),
        BASE64.encode(&image.bytes)
    );
    Some(Fragment::Image { data_uri, aspect: image.aspect_ratio() })
}

/// A table fragment; the first row becomes the header. Empty tables produce nothing.
pub fn table_fragment(table: &Table) -> Option<Fragment> {
    let mut rows = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| clean_field_codes(&c.text())).collect::<Vec<_>>());
    let header = rows.next()?;
    Some(Fragment::Table { header, rows: rows.collect(), continued: false })
}

/// Splits a text block on blank lines; `#`/`##` lines become sub-headings.
fn long_text_fragments(text: &str) -> Vec<Fragment> {
    BLANK_LINES_RE
        .split(text.trim())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if let Some(header) = part.strip_prefix("## ").or_else(|| part.strip_prefix("# ")) {
                Fragment::SubHeading { text: header.trim().to_string() }
            } else {
                Fragment::paragraph(inline::with_breaks(part))
            }
        })
        .collect()
}

fn is_long_text(text: &str) -> bool {
    text.contains("\n\n") || text.starts_with("## ") || text.contains("\n## ")
}

/// A code block, or a run of joined instruction sections when the code
/// carries `#`/`##` header lines.
fn code_fragments(text: &str) -> Vec<Fragment> {
    let text = text.trim();
    if !(text.contains("## ") || text.starts_with("# ")) {
        return vec![Fragment::CodeBlock { lines: text.lines().map(str::to_string).collect(), continued: false }];
    }

    let mut sections: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if line.starts_with("## ") || sections.is_empty() {
            sections.push(vec![line]);
        } else if let Some(current) = sections.last_mut() {
            current.push(line);
        }
    }
    sections.retain(|s| s.iter().any(|l| !l.trim().is_empty()));

    let count = sections.len();
    sections
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            let mut header = None;
            let mut body = Vec::new();
            for line in section {
                if let Some(h) = line.strip_prefix("## ").or_else(|| line.strip_prefix("# ")) {
                    header = Some(h.trim().to_string());
                } else {
                    body.push(line);
                }
            }
            let content = body.join("\n");
            let content = content.trim();
            let lines = if content.is_empty() { Vec::new() } else { content.lines().map(str::to_string).collect() };
            Fragment::InstructionSection { header, lines, position: SectionPosition::of(i, count), continued: false }
        })
        .collect()
}

pub struct Emitter<'c> {
    classifier: &'c Classifier,
}

impl<'c> Emitter<'c> {
    pub fn new(classifier: &'c Classifier) -> Self {
        Self { classifier }
    }

    /// Emits every block in order with a fresh context.
    pub fn emit_document(&self, blocks: &[Block], title: &str) -> Emission {
        let toc = collect_toc(blocks, self.classifier, title);
        let mut ctx = EmitContext::new(title, toc.clone());
        let mut fragments = Vec::new();
        for block in blocks {
            let role = self.classifier.classify(block);
            fragments.extend(self.emit(block, role, &mut ctx));
        }
        log::debug!("emitted {} fragments from {} blocks", fragments.len(), blocks.len());
        Emission { fragments, toc }
    }

    /// Emits the fragments for one block. May be empty.
    pub fn emit(&self, block: &Block, role: Role, ctx: &mut EmitContext) -> Vec<Fragment> {
        let fragments = match block {
            Block::Paragraph(p) => self.emit_paragraph(p, role, ctx),
            Block::Table(t) => table_fragment(t).into_iter().collect(),
            Block::Image(image) => image_fragment(image).into_iter().collect(),
        };
        ctx.observe(&fragments);
        fragments
    }

    fn images(&self, p: &Paragraph) -> Vec<Fragment> {
        p.images.iter().filter_map(image_fragment).collect()
    }

    fn emit_paragraph(&self, p: &Paragraph, role: Role, ctx: &mut EmitContext) -> Vec<Fragment> {
        let text = clean_field_codes(&p.text());

        if role.is_toc() {
            log::debug!("dropping source table of contents line {:?}", text);
            return Vec::new();
        }
        if is_page_number(&text) || is_manual_toc_entry(&text) || is_manual_toc_heading(&text) {
            log::debug!("skipping {:?}", text);
            return Vec::new();
        }

        let mut out = Vec::new();
        if role == Role::Heading1 && !text.is_empty() {
            if !ctx.title_heading_seen {
                ctx.title_heading_seen = true;
                log::debug!("title heading {:?} moved to the cover", text);
                return self.images(p);
            }
            if same_title(&text, &ctx.title) {
                log::debug!("heading {:?} repeats the title; skipped", text);
                return self.images(p);
            }

            ctx.content_started = true;
            if !ctx.toc_inserted {
                if !ctx.toc.is_empty() {
                    out.push(Fragment::TocHeading);
                    out.extend(ctx.toc.iter().map(|e| Fragment::TocEntry {
                        level: e.level,
                        text: e.text.clone(),
                        page: None,
                    }));
                }
                ctx.toc_inserted = true;
            }
            out.push(Fragment::PageBreak);
            if wants_label(&text) {
                out.push(Fragment::Label { text: chapter_label(&text) });
            }
        } else if !ctx.content_started && role == Role::PlainParagraph && is_title_metadata(&text) {
            log::debug!("title block line {:?} skipped", text);
            return self.images(p);
        }

        out.extend(self.images(p));
        if text.is_empty() {
            return out;
        }

        let mut runs = inline::prepare_runs(&p.runs);
        match role {
            Role::Heading1 | Role::Heading2 | Role::Heading3 => {
                let mut inlines = inline::from_runs(&runs);
                inline::map_text(&mut inlines, &thin_space_numbers);
                let level = role.heading_level().unwrap_or(3);
                out.push(Fragment::Heading { level, inlines, pseudo: false });
            }
            Role::PseudoHeading3 => {
                out.push(Fragment::Heading { level: 3, inlines: inline::from_runs(&runs), pseudo: true });
            }
            Role::ListItem => {
                let full: String = runs.iter().map(|r| r.text.as_str()).collect();
                let stripped = strip_list_prefix(&full);
                if !stripped.is_empty() {
                    inline::drop_prefix(&mut runs, full.len() - stripped.len());
                    out.push(Fragment::Paragraph {
                        inlines: inline::from_runs(&runs),
                        class: ParagraphClass::ListItem { continued: ctx.in_list },
                    });
                }
            }
            Role::CodeBlock => out.extend(code_fragments(&text)),
            Role::HighlightBox if ctx.last_was_highlight => {
                log::debug!("second highlight in a row demoted to a paragraph");
                out.push(Fragment::paragraph(inline::from_runs(&runs)));
            }
            Role::HighlightBox => {
                out.push(Fragment::HighlightBox { paragraphs: vec![inline::from_runs(&runs)], continued: false });
            }
            _ => out.extend(self.body_fragments(&text, &runs)),
        }
        out
    }

    fn body_fragments(&self, text: &str, runs: &[docstage_types::Run]) -> Vec<Fragment> {
        if DATA_LABEL_RE.is_match(text) {
            return vec![Fragment::Paragraph { inlines: inline::from_runs(runs), class: ParagraphClass::DataLabel }];
        }
        if is_long_text(text) {
            return long_text_fragments(text);
        }
        let inlines: Vec<Inline> = inline::from_runs(runs);
        vec![Fragment::paragraph(inlines)]
    }
}
