use serde::{Deserialize, Serialize};

/// Thresholds for the reflow passes. All heights are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationConfig {
    /// A fragment is only split in place when at least this much room is left on the page.
    pub min_split_space: f32,
    /// Kept free below the retained half of a split fragment.
    pub split_reserve: f32,
    /// Fewer body rows than this never stay with a table header.
    pub min_table_rows_with_header: usize,
    /// Code blocks and instruction sections are never split into a piece shorter than this.
    pub min_code_lines: usize,
    /// A heading followed by less content than this moves along with what comes next.
    pub min_content_after_heading: f32,
    /// Trailing headings move to the next page when more empty space than this is left below them.
    pub min_orphan_gap: f32,
    /// Upper bound on split/move operations in one pagination run.
    pub max_reflow_iterations: usize,
    /// Upper bound on overflow/orphan rounds.
    pub max_orphan_passes: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            min_split_space: 100.0,
            split_reserve: 50.0,
            min_table_rows_with_header: 2,
            min_code_lines: 3,
            min_content_after_heading: 80.0,
            min_orphan_gap: 100.0,
            max_reflow_iterations: 10_000,
            max_orphan_passes: 50,
        }
    }
}
