//! The block-level document model shared by every stage of the pipeline.
//!
//! Blocks arrive in source order from a block source and that order is never
//! rearranged. The restyle path mutates the formatting properties carried
//! here; the markup path only reads them.
use crate::color::Color;
use serde::{Deserialize, Serialize};

/// One structural unit of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Image(ImageRef),
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Reference to a numbering definition (`w:numPr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingMarker {
    pub num_id: String,
    pub level: u8,
}

/// A hyperlink target attached to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// The resolved URL.
    pub target: String,
    /// Relationship id in the source package, used when the document is written back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_id: Option<String>,
}

impl Hyperlink {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into(), rel_id: None }
    }
}

/// An inline text span with its character formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Font size in points.
    pub size_pt: Option<f32>,
    pub color: Option<Color>,
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<Hyperlink>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn sized(mut self, size_pt: f32) -> Self {
        self.size_pt = Some(size_pt);
        self
    }

    pub fn linked(mut self, target: impl Into<String>) -> Self {
        self.hyperlink = Some(Hyperlink::new(target));
        self
    }
}

/// A single border line. Widths are in eighths of a point, as WordprocessingML stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderLine {
    pub size_eighths: u32,
    pub space_pt: u32,
    pub color: Color,
}

/// Paragraph-level formatting that the restyle path may overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphFormat {
    /// Left indent in twentieths of a point.
    pub indent_left_twips: Option<u32>,
    pub space_before_pt: Option<f32>,
    pub space_after_pt: Option<f32>,
    pub shading: Option<Color>,
    pub left_border: Option<BorderLine>,
}

/// A paragraph with its runs and metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    /// Human-readable style name (e.g. "Heading 1"), resolved from the style id.
    pub style: Option<String>,
    pub runs: Vec<Run>,
    pub numbering: Option<NumberingMarker>,
    /// Embedded drawings, in the order they appear in the paragraph.
    pub images: Vec<ImageRef>,
    pub format: ParagraphFormat,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs, ..Default::default() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Run::new(text)])
    }

    pub fn styled(style: impl Into<String>, text: impl Into<String>) -> Self {
        Self { style: Some(style.into()), ..Self::plain(text) }
    }

    /// The visible text: all runs concatenated in order.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn style_name(&self) -> &str {
        self.style.as_deref().unwrap_or("Normal")
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { paragraphs: vec![Paragraph::plain(text)] }
    }

    /// Cell paragraphs' text joined with single spaces.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.trim().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self { cells: texts.iter().map(|t| TableCell::from_text(t.as_ref())).collect() }
    }
}

/// Table-wide border overrides written by the restyle path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBorders {
    pub bottom: Option<BorderLine>,
    pub inside_horizontal: Option<BorderLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub borders: TableBorders,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows, ..Default::default() }
    }
}

/// An embedded image, resolved against the package's relationships.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub rel_id: String,
    /// Part name inside the package, e.g. `word/media/image1.png`.
    pub target: Option<String>,
    pub content_type: Option<String>,
    /// Authored display size `(cx, cy)` in EMU, from `wp:extent`.
    pub extent_emu: Option<(u64, u64)>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// The original drawing markup, re-emitted verbatim by the package writer.
    #[serde(skip)]
    pub raw_xml: Option<String>,
}

impl ImageRef {
    /// Height over width of the authored extent, when it is known and non-degenerate.
    pub fn aspect_ratio(&self) -> Option<f32> {
        match self.extent_emu {
            Some((cx, cy)) if cx > 0 && cy > 0 => Some(cy as f32 / cx as f32),
            _ => None,
        }
    }
}

/// An entry in the table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level (1 = h1, 2 = h2, 3 = h3).
    pub level: u8,
    /// The text content of the heading.
    pub text: String,
    /// Final page number, once pagination has resolved it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl TocEntry {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self { level, text: text.into(), page: None }
    }
}
