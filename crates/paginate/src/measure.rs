//! Fragment heights.
//!
//! Pagination never looks at a fragment's content to decide where it ends;
//! it asks a [`Measure`] implementation. The estimating measurer derives
//! line counts from the identity table's font sizes and an average glyph
//! width, which is close enough to keep pages inside their budget without
//! a text shaper.
use docstage_markup::{Fragment, ParagraphClass, inline};
use docstage_style::{IMAGE_MARGIN_PX, IMAGE_MAX_HEIGHT_PX, IdentityTable, TextStyle, mm_to_px, pt_to_px};
use docstage_types::Role;

pub trait Measure {
    /// Rendered height of `fragment` laid out `width_px` wide, vertical margins included.
    fn height(&self, fragment: &Fragment, width_px: f32) -> f32;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn height(&self, fragment: &Fragment, width_px: f32) -> f32 {
        (**self).height(fragment, width_px)
    }
}

/// Average glyph advance as a fraction of the font size.
const PROPORTIONAL_ADVANCE: f32 = 0.5;
const MONOSPACE_ADVANCE: f32 = 0.6;

const BOX_PADDING_PX: f32 = 32.0;
/// Horizontal padding of `pre` blocks.
const CODE_INSET_PX: f32 = 40.0;
const CELL_PADDING_PX: f32 = 16.0;
const TOC_ENTRY_GAP_PX: f32 = 8.0;
const TOC_INDENT_PX: f32 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct EstimatingMeasurer {
    identity: IdentityTable,
}

impl EstimatingMeasurer {
    pub fn new(identity: IdentityTable) -> Self {
        Self { identity }
    }

    fn line_px(style: &TextStyle) -> f32 {
        pt_to_px(style.size_pt) * style.line_height
    }

    fn margins(style: &TextStyle) -> f32 {
        pt_to_px(style.space_before_pt + style.space_after_pt)
    }

    /// Height of wrapped text, counting explicit newlines as hard breaks.
    fn wrapped(text: &str, style: &TextStyle, width_px: f32, advance: f32) -> f32 {
        let glyph = pt_to_px(style.size_pt) * advance;
        let per_line = ((width_px / glyph).floor() as usize).max(1);
        let lines: usize = text.split('\n').map(|line| line.chars().count().div_ceil(per_line).max(1)).sum();
        lines as f32 * Self::line_px(style)
    }

    fn text(&self, text: &str, style: &TextStyle, width_px: f32) -> f32 {
        Self::wrapped(text, style, width_px, PROPORTIONAL_ADVANCE) + Self::margins(style)
    }

    fn table_row(&self, cells: &[String], style: &TextStyle, column_px: f32) -> f32 {
        let tallest = cells
            .iter()
            .map(|cell| Self::wrapped(cell, style, column_px, PROPORTIONAL_ADVANCE))
            .fold(Self::line_px(style), f32::max);
        tallest + CELL_PADDING_PX
    }
}

impl Measure for EstimatingMeasurer {
    fn height(&self, fragment: &Fragment, width_px: f32) -> f32 {
        let id = &self.identity;
        match fragment {
            Fragment::Heading { level, inlines, pseudo } => {
                let style = match (*pseudo, Role::from_heading_level(*level)) {
                    (false, Some(role)) => id.for_role(role),
                    _ => &id.pseudo_heading,
                };
                self.text(&inline::plain_text(inlines), style, width_px)
            }
            Fragment::SubHeading { text } => self.text(text, &id.heading3, width_px),
            Fragment::Label { text } => self.text(text, &id.label, width_px),
            Fragment::Paragraph { inlines, class } => {
                let width = match class {
                    ParagraphClass::ListItem { .. } => width_px - mm_to_px(id.list.indent_cm * 10.0),
                    _ => width_px,
                };
                self.text(&inline::plain_text(inlines), &id.body, width)
            }
            Fragment::HighlightBox { paragraphs, .. } => {
                let inner = width_px - BOX_PADDING_PX - mm_to_px(id.highlight.indent_cm * 10.0);
                let body: f32 = paragraphs
                    .iter()
                    .map(|p| Self::wrapped(&inline::plain_text(p), &id.body, inner, PROPORTIONAL_ADVANCE))
                    .sum();
                body + BOX_PADDING_PX + pt_to_px(id.highlight.space_before_pt + id.highlight.space_after_pt)
            }
            Fragment::CodeBlock { lines, .. } => {
                let code = Self::wrapped(&lines.join("\n"), &id.code, width_px - CODE_INSET_PX, MONOSPACE_ADVANCE);
                code + BOX_PADDING_PX + Self::margins(&id.code)
            }
            Fragment::InstructionSection { header, lines, .. } => {
                let header_px = header.as_ref().map_or(0.0, |h| self.text(h, &id.label, width_px));
                let code = if lines.is_empty() {
                    0.0
                } else {
                    Self::wrapped(&lines.join("\n"), &id.code, width_px - CODE_INSET_PX, MONOSPACE_ADVANCE)
                };
                header_px + code + BOX_PADDING_PX / 2.0
            }
            Fragment::Table { header, rows, .. } => {
                let columns = header.len().max(rows.iter().map(Vec::len).max().unwrap_or(0)).max(1);
                let column_px = width_px / columns as f32 - CELL_PADDING_PX;
                let header_px = self.table_row(header, &id.table.header, column_px);
                let body: f32 = rows.iter().map(|row| self.table_row(row, &id.table.cell, column_px)).sum();
                header_px + body + Self::margins(&id.body)
            }
            Fragment::Image { aspect, .. } => {
                // Rendered width never exceeds the column, and the stylesheet caps the height.
                let scaled = aspect.map_or(IMAGE_MAX_HEIGHT_PX, |a| width_px * a);
                scaled.min(IMAGE_MAX_HEIGHT_PX) + 2.0 * IMAGE_MARGIN_PX
            }
            Fragment::TocHeading => self.text(&fragment.plain_text(), &id.heading2, width_px),
            Fragment::TocEntry { level, text, .. } => {
                let indent = TOC_INDENT_PX * f32::from(level.saturating_sub(1));
                Self::wrapped(text, &id.body, width_px - indent, PROPORTIONAL_ADVANCE) + TOC_ENTRY_GAP_PX
            }
            Fragment::PageBreak => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstage_markup::Inline;

    const WIDTH: f32 = 640.0;

    #[test]
    fn longer_paragraphs_are_taller() {
        let m = EstimatingMeasurer::default();
        let short = Fragment::paragraph(vec![Inline::text("Kort.")]);
        let long = Fragment::paragraph(vec![Inline::text("ord ".repeat(200))]);
        assert!(m.height(&long, WIDTH) > 3.0 * m.height(&short, WIDTH));
    }

    #[test]
    fn code_height_grows_per_line() {
        let m = EstimatingMeasurer::default();
        let block = |n: usize| Fragment::CodeBlock { lines: vec!["x".to_string(); n], continued: false };
        let step = m.height(&block(11), WIDTH) - m.height(&block(10), WIDTH);
        assert!((step - pt_to_px(8.0) * 1.5).abs() < 0.01);
    }

    #[test]
    fn table_rows_add_up() {
        let m = EstimatingMeasurer::default();
        let table = |n: usize| Fragment::Table {
            header: vec!["A".into(), "B".into()],
            rows: vec![vec!["1".into(), "2".into()]; n],
            continued: false,
        };
        assert!(m.height(&table(20), WIDTH) > m.height(&table(10), WIDTH));
    }

    #[test]
    fn images_scale_to_the_column_and_stop_at_the_cap() {
        let m = EstimatingMeasurer::default();
        let image = |aspect: Option<f32>| Fragment::Image { data_uri: String::new(), aspect };
        let margins = 2.0 * IMAGE_MARGIN_PX;

        assert!((m.height(&image(Some(0.25)), WIDTH) - (160.0 + margins)).abs() < 0.01);
        assert_eq!(m.height(&image(Some(4.0)), WIDTH), IMAGE_MAX_HEIGHT_PX + margins);
        assert_eq!(m.height(&image(None), WIDTH), IMAGE_MAX_HEIGHT_PX + margins);
    }

    #[test]
    fn page_breaks_take_no_space() {
        assert_eq!(EstimatingMeasurer::default().height(&Fragment::PageBreak, WIDTH), 0.0);
    }
}
