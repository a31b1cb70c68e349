//! Restyles word-processor documents with a fixed visual identity and
//! renders them as paginated HTML reports.
//!
//! Two paths share the same classification:
//!
//! - [`convert_to_html`] classifies every block, emits fragments, flows them
//!   onto pages and wraps the pages in cover, footer and back surfaces.
//! - [`restyle_document`] classifies every block and rewrites its
//!   formatting in place, producing a new package of the same shape.
//!
//! [`check_quality`] compares a source with its HTML afterwards.
pub mod config;
pub mod document;
pub mod error;

pub use config::{AppConfig, load_callouts};
pub use error::PipelineError;

pub use docstage_classify::{CalloutMatcher, Classifier};
pub use docstage_markup::{Emitter, Fragment, StyleApplier};
pub use docstage_paginate::{EstimatingMeasurer, Layout, Measure, Page, PaginationConfig, Paginator, ReflowStats};
pub use docstage_qc::QcReport;
pub use docstage_source::{BlockSource, DocxPackage, SourceError};
pub use docstage_style::{IdentityTable, PageGeometry};
pub use docstage_types::{Block, Paragraph, Role, TocEntry};

use docstage_classify::{is_page_number, role_for_style};
use docstage_markup::first_heading;
use docstage_style::css;
use docstage_style::vocabulary::{DEFAULT_COVER_CAPTION, DEFAULT_TITLE};
use document::Cover;
use serde::Serialize;

/// Characters kept in [`ParagraphInfo::preview`].
const PREVIEW_CHARS: usize = 100;

/// Caller-supplied inputs of one HTML conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Cover and `<title>` text. Falls back to the first Heading 1, then to a fixed default.
    pub title: Option<String>,
    pub cover_caption: String,
    pub cover_description: Option<String>,
    pub cover_date: Option<String>,
    /// Openings of paragraphs identified elsewhere as callouts.
    pub callouts: Vec<String>,
    pub include_back_page: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: None,
            cover_caption: DEFAULT_COVER_CAPTION.to_string(),
            cover_description: None,
            cover_date: None,
            callouts: Vec::new(),
            include_back_page: false,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.cover_caption = caption.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.cover_description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.cover_date = Some(date.into());
        self
    }

    pub fn with_callouts<I, S>(mut self, callouts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.callouts = callouts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_back_page(mut self, include: bool) -> Self {
        self.include_back_page = include;
        self
    }
}

/// The rendered report and the layout it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlOutput {
    pub html: String,
    pub title: String,
    pub pages: Vec<Page>,
    /// Generated table of contents with resolved page numbers.
    pub toc: Vec<TocEntry>,
    pub stats: ReflowStats,
}

fn resolve_title(blocks: &[Block], options: &ConvertOptions, classifier: &Classifier) -> String {
    options
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| first_heading(blocks, classifier))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Converts blocks into a paginated HTML report. Never fails: every block
/// either renders or is skipped by a documented rule.
pub fn convert_to_html(
    blocks: &[Block],
    options: &ConvertOptions,
    measurer: &dyn Measure,
    config: &AppConfig,
) -> HtmlOutput {
    let classifier = Classifier::markup().with_callouts(CalloutMatcher::new(options.callouts.iter().cloned()));
    let title = resolve_title(blocks, options, &classifier);
    log::info!("Converting {} blocks to HTML, title '{}'", blocks.len(), title);

    let emission = Emitter::new(&classifier).emit_document(blocks, &title);
    let layout = Paginator::new(measurer, &config.page, config.pagination).paginate(emission.fragments);
    log::info!(
        "Laid out {} pages ({} splits, {} moves, {} orphan moves)",
        layout.pages.len(),
        layout.stats.splits,
        layout.stats.moves,
        layout.stats.orphan_moves
    );

    let cover = Cover {
        title: &title,
        caption: &options.cover_caption,
        description: options.cover_description.as_deref(),
        date: options.cover_date.as_deref(),
    };
    let back = options
        .include_back_page
        .then(|| document::back_page(&title, &options.cover_caption));
    let stylesheet = css::stylesheet(&config.identity, &config.page);
    let html = document::assemble(&title, &stylesheet, &cover, &layout.pages, back.as_deref());

    HtmlOutput { html, title, pages: layout.pages, toc: layout.toc, stats: layout.stats }
}

/// Applies the visual identity to every block in place.
pub fn restyle_blocks(blocks: &mut [Block], identity: &IdentityTable) {
    let classifier = Classifier::restyle();
    let applier = StyleApplier::new(identity);
    for block in blocks.iter_mut() {
        let role = classifier.classify(block);
        log::trace!("restyling block as {:?}", role);
        applier.apply(block, role);
    }
}

/// Restyles a package and returns the bytes of the rewritten package.
pub fn restyle_document(package: &DocxPackage, config: &AppConfig) -> Result<Vec<u8>, PipelineError> {
    let mut blocks = package.read_blocks()?;
    restyle_blocks(&mut blocks, &config.identity);
    log::info!("Restyled {} blocks", blocks.len());
    Ok(package.write_document(&blocks, &config.page)?)
}

/// Compares the source blocks with the produced HTML.
pub fn check_quality(blocks: &[Block], html: &str) -> QcReport {
    docstage_qc::check(blocks, html)
}

/// A paragraph offered to an external callout identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphInfo {
    /// Position among the document's paragraphs, tables not counted.
    pub index: usize,
    pub text: String,
    pub style: String,
    /// Length in characters.
    pub length: usize,
    pub preview: String,
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn is_analysis_candidate(style: &str, text: &str) -> bool {
    let toc_styled = style.contains("TOC") || style.contains("Indholdsfortegnelse");
    let heading_styled = style.contains("Heading") || role_for_style(style).is_some_and(|r| r.heading_level().is_some());
    !text.is_empty() && !toc_styled && !heading_styled && !is_page_number(text)
}

/// Body paragraphs worth considering as callouts: no headings, no table of
/// contents lines, no page numbers and nothing empty.
pub fn extract_paragraphs_for_analysis(blocks: &[Block]) -> Vec<ParagraphInfo> {
    blocks
        .iter()
        .filter_map(Block::as_paragraph)
        .enumerate()
        .filter_map(|(index, p)| {
            let text = p.text().trim().to_string();
            let style = p.style_name();
            is_analysis_candidate(style, &text).then(|| ParagraphInfo {
                index,
                style: style.to_string(),
                length: text.chars().count(),
                preview: preview(&text),
                text,
            })
        })
        .collect()
}
