use crate::measure::Measure;
use docstage_markup::Fragment;

/// Deterministic heights for reflow tests.
///
/// Tables are a header plus a fixed height per body row, code and
/// instruction sections a fixed height per line, highlight boxes padding
/// plus a fixed height per inner paragraph; everything else is `block`.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasurer {
    pub block: f32,
    pub table_header: f32,
    pub table_row: f32,
    pub code_line: f32,
    pub box_padding: f32,
    pub box_paragraph: f32,
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self {
            block: 30.0,
            table_header: 40.0,
            table_row: 35.0,
            code_line: 20.0,
            box_padding: 32.0,
            box_paragraph: 30.0,
        }
    }
}

impl FixedMeasurer {
    pub fn with_block(block: f32) -> Self {
        Self { block, ..Self::default() }
    }
}

impl Measure for FixedMeasurer {
    fn height(&self, fragment: &Fragment, _width_px: f32) -> f32 {
        match fragment {
            Fragment::Table { rows, .. } => self.table_header + rows.len() as f32 * self.table_row,
            Fragment::CodeBlock { lines, .. } | Fragment::InstructionSection { lines, .. } => {
                lines.len() as f32 * self.code_line
            }
            Fragment::HighlightBox { paragraphs, .. } => {
                self.box_padding + paragraphs.len() as f32 * self.box_paragraph
            }
            Fragment::PageBreak => 0.0,
            _ => self.block,
        }
    }
}
