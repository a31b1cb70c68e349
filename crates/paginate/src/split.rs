//! Splitting oversized fragments at an inner boundary.
//!
//! Tables split between body rows and repeat their header, code blocks and
//! instruction sections split between lines, highlight boxes between inner
//! paragraphs. The second half is always marked as a continuation.
use crate::config::PaginationConfig;
use crate::measure::Measure;
use docstage_markup::Fragment;

/// Largest `k` below `count` for which `fits(k)` holds, if it is at least `min`.
fn fitting_prefix(count: usize, min: usize, target: f32, fits: impl Fn(usize) -> bool) -> Option<usize> {
    if target <= 0.0 {
        return None;
    }
    let mut best = None;
    for k in 1..count {
        if !fits(k) {
            break;
        }
        best = Some(k);
    }
    best.filter(|k| *k >= min)
}

/// Splits `fragment` so the first part measures at most `target` pixels.
///
/// Returns `None` when the fragment kind cannot split, or when no split
/// leaves enough of it on both sides.
pub fn split_fragment(
    fragment: &Fragment,
    target: f32,
    width: f32,
    measurer: &dyn Measure,
    config: &PaginationConfig,
) -> Option<(Fragment, Fragment)> {
    let fits = |candidate: &Fragment| measurer.height(candidate, width) <= target;

    match fragment {
        Fragment::Table { header, rows, continued } => {
            let head = |k: usize| Fragment::Table { header: header.clone(), rows: rows[..k].to_vec(), continued: *continued };
            let k = fitting_prefix(rows.len(), config.min_table_rows_with_header, target, |k| fits(&head(k)))?;
            let tail = Fragment::Table { header: header.clone(), rows: rows[k..].to_vec(), continued: true };
            Some((head(k), tail))
        }
        Fragment::CodeBlock { lines, continued } => {
            let head = |k: usize| Fragment::CodeBlock { lines: lines[..k].to_vec(), continued: *continued };
            let k = fitting_prefix(lines.len(), config.min_code_lines, target, |k| fits(&head(k)))?;
            if lines.len() - k < config.min_code_lines {
                return None;
            }
            let tail = Fragment::CodeBlock { lines: lines[k..].to_vec(), continued: true };
            Some((head(k), tail))
        }
        Fragment::InstructionSection { header, lines, position, continued } => {
            let head = |k: usize| Fragment::InstructionSection {
                header: header.clone(),
                lines: lines[..k].to_vec(),
                position: *position,
                continued: *continued,
            };
            let k = fitting_prefix(lines.len(), config.min_code_lines, target, |k| fits(&head(k)))?;
            if lines.len() - k < config.min_code_lines {
                return None;
            }
            let tail = Fragment::InstructionSection {
                header: None,
                lines: lines[k..].to_vec(),
                position: *position,
                continued: true,
            };
            Some((head(k), tail))
        }
        Fragment::HighlightBox { paragraphs, continued } => {
            let head = |k: usize| Fragment::HighlightBox { paragraphs: paragraphs[..k].to_vec(), continued: *continued };
            let k = fitting_prefix(paragraphs.len(), 1, target, |k| fits(&head(k)))?;
            let tail = Fragment::HighlightBox { paragraphs: paragraphs[k..].to_vec(), continued: true };
            Some((head(k), tail))
        }
        _ => None,
    }
}
