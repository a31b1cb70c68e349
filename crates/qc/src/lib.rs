//! Post-hoc comparison of a source document with its rendered HTML.
//!
//! Both sides are counted independently: headings, paragraphs, tables,
//! images, links and words. The checker never changes the conversion
//! outcome; it reports what looks lost so an operator can review it.
pub mod counts;
pub mod markup;
pub mod report;
pub mod source;

pub use counts::{Counts, HeadingText, Inventory};
pub use markup::{MarkupInventory, inventory_html};
pub use report::{QcReport, TextComparison, compare};
pub use source::inventory_blocks;

use docstage_types::Block;

/// Counts both sides and compares them.
pub fn check(source: &[Block], html: &str) -> QcReport {
    compare(&inventory_blocks(source), &inventory_html(html))
}
