//! Flows emitted fragments onto fixed-height pages.
//!
//! Pagination runs as a fixed sequence of passes over an in-memory page
//! list:
//!
//! 1. explicit page-break markers split the stream into pages;
//! 2. overflow resolution splits or moves the first fragment that does not
//!    fit, dragging a heading that would otherwise end the page along with it;
//! 3. orphan prevention moves trailing headings to the next page when they
//!    sit above a large empty gap;
//! 4. pages are numbered and table-of-contents entries are resolved to the
//!    page their heading landed on.
//!
//! Steps 2 and 3 repeat until neither changes anything. Both are bounded by
//! caps in [`PaginationConfig`]; hitting a cap stops reflow and the layout
//! reached so far is used as is. Fragments are never dropped.
pub mod config;
pub mod measure;
pub mod split;

#[cfg(test)]
mod test_utils;

pub use config::PaginationConfig;
pub use measure::{EstimatingMeasurer, Measure};
pub use split::split_fragment;

use docstage_markup::{Fragment, inline, normalize_text};
use docstage_style::PageGeometry;
use docstage_types::TocEntry;
use serde::Serialize;

/// One content page. Numbers start at 1 and exclude the cover and back surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub fragments: Vec<Fragment>,
}

/// Counters describing what reflow did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReflowStats {
    pub splits: usize,
    pub moves: usize,
    pub orphan_moves: usize,
    /// An iteration cap was hit and reflow stopped early.
    pub capped: bool,
}

impl ReflowStats {
    fn operations(&self) -> usize {
        self.splits + self.moves + self.orphan_moves
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub pages: Vec<Page>,
    /// Generated table of contents with resolved page numbers, in document order.
    pub toc: Vec<TocEntry>,
    pub stats: ReflowStats,
}

struct FitCheck {
    should_break: bool,
}

/// Whether a fragment of `height` placed at `cursor` crosses the page budget.
fn check_fit(cursor: f32, height: f32, budget: f32) -> FitCheck {
    let available = (budget - cursor).max(0.0);
    // Small epsilon to absorb floating point noise
    const EPSILON: f32 = 0.01;
    FitCheck { should_break: height > available + EPSILON }
}

fn apply_breaks(fragments: Vec<Fragment>) -> Vec<Vec<Fragment>> {
    fragments
        .split(|f| matches!(f, Fragment::PageBreak))
        .filter(|page| !page.is_empty())
        .map(<[Fragment]>::to_vec)
        .collect()
}

pub struct Paginator<'m> {
    measurer: &'m dyn Measure,
    budget_px: f32,
    width_px: f32,
    config: PaginationConfig,
}

impl<'m> Paginator<'m> {
    pub fn new(measurer: &'m dyn Measure, geometry: &PageGeometry, config: PaginationConfig) -> Self {
        Self::with_budget(measurer, geometry.content_budget_px(), geometry.content_width_px(), config)
    }

    pub fn with_budget(measurer: &'m dyn Measure, budget_px: f32, width_px: f32, config: PaginationConfig) -> Self {
        Self { measurer, budget_px, width_px, config }
    }

    pub fn budget_px(&self) -> f32 {
        self.budget_px
    }

    fn measure(&self, fragment: &Fragment) -> f32 {
        self.measurer.height(fragment, self.width_px)
    }

    pub fn paginate(&self, fragments: Vec<Fragment>) -> Layout {
        let mut pages = apply_breaks(fragments);
        let mut stats = ReflowStats::default();

        let mut settled = false;
        for _ in 0..self.config.max_orphan_passes {
            self.resolve_overflow(&mut pages, &mut stats);
            if stats.capped {
                break;
            }
            if !self.prevent_orphans(&mut pages, &mut stats) {
                settled = true;
                break;
            }
        }
        if !settled && !stats.capped {
            log::warn!("Orphan prevention did not settle after {} passes", self.config.max_orphan_passes);
            stats.capped = true;
        }

        pages.retain(|page| !page.is_empty());
        let mut pages: Vec<Page> = pages
            .into_iter()
            .enumerate()
            .map(|(i, fragments)| Page { number: i + 1, fragments })
            .collect();
        let toc = resolve_toc(&mut pages);

        log::debug!(
            "Paginated into {} pages ({} splits, {} moves, {} orphan moves)",
            pages.len(),
            stats.splits,
            stats.moves,
            stats.orphan_moves
        );
        Layout { pages, toc, stats }
    }

    fn resolve_overflow(&self, pages: &mut Vec<Vec<Fragment>>, stats: &mut ReflowStats) {
        let mut i = 0;
        while i < pages.len() {
            if stats.operations() >= self.config.max_reflow_iterations {
                log::warn!("Reflow stopped after {} operations; layout may overflow", stats.operations());
                stats.capped = true;
                return;
            }
            if let Some(rest) = self.overflow_step(&mut pages[i], stats) {
                pages.insert(i + 1, rest);
            }
            i += 1;
        }
    }

    /// Makes `page` fit, returning whatever had to leave it.
    fn overflow_step(&self, page: &mut Vec<Fragment>, stats: &mut ReflowStats) -> Option<Vec<Fragment>> {
        let heights: Vec<f32> = page.iter().map(|f| self.measure(f)).collect();
        let mut cursor = 0.0;
        let j = heights.iter().position(|h| {
            if check_fit(cursor, *h, self.budget_px).should_break {
                true
            } else {
                cursor += h;
                false
            }
        })?;

        let available = self.budget_px - cursor;
        if j == 0 || available >= self.config.min_split_space {
            let target = available - self.config.split_reserve;
            if let Some((head, tail)) = split_fragment(&page[j], target, self.width_px, self.measurer, &self.config) {
                log::debug!("Split {} to fit {:.0}px", page[j].kind(), target);
                stats.splits += 1;
                page[j] = head;
                let mut rest = page.split_off(j + 1);
                rest.insert(0, tail);
                return Some(rest);
            }
        }

        if j == 0 {
            if page.len() == 1 {
                log::debug!("Accepting oversized {} ({:.0}px) alone on its page", page[0].kind(), heights[0]);
                return None;
            }
            stats.moves += 1;
            return Some(page.split_off(1));
        }

        let start = self.keep_with_next(page, &heights, j);
        log::debug!("Moving {} fragments from {} to a new page", page.len() - start, page[start].kind());
        stats.moves += 1;
        Some(page.split_off(start))
    }

    /// Index from which content has to move when fragment `j` moves: heading-like
    /// fragments directly above it go along unless enough content separates them.
    /// The first fragment of a page always stays.
    fn keep_with_next(&self, page: &[Fragment], heights: &[f32], j: usize) -> usize {
        let mut start = j;
        let mut between = 0.0;
        let mut k = j;
        while k > 1 {
            k -= 1;
            if page[k].is_heading_like() {
                if between >= self.config.min_content_after_heading {
                    break;
                }
                start = k;
            } else {
                between += heights[k];
                if between >= self.config.min_content_after_heading {
                    break;
                }
            }
        }
        start
    }

    /// Moves headings stranded at the bottom of a page to the top of the next
    /// one. The last page is left alone since nothing follows it.
    fn prevent_orphans(&self, pages: &mut [Vec<Fragment>], stats: &mut ReflowStats) -> bool {
        let mut changed = false;
        for p in 0..pages.len().saturating_sub(1) {
            let page = &pages[p];
            let Some(last_content) = page.iter().rposition(|f| !f.is_heading_like()) else {
                continue;
            };
            if last_content + 1 == page.len() {
                continue;
            }
            let used: f32 = page.iter().map(|f| self.measure(f)).sum();
            if self.budget_px - used <= self.config.min_orphan_gap {
                continue;
            }

            let moved = pages[p].split_off(last_content + 1);
            log::debug!("Moving {} trailing heading(s) from page {} to the next page", moved.len(), p + 1);
            pages[p + 1].splice(0..0, moved);
            stats.orphan_moves += 1;
            changed = true;
        }
        changed
    }
}

/// Fills in the page number of every table-of-contents fragment and returns the resolved entries.
///
/// Entries match headings by normalized text, the first occurrence of a
/// heading winning. An entry with no exact match takes the heading with the
/// longest containment overlap.
pub fn resolve_toc(pages: &mut [Page]) -> Vec<TocEntry> {
    let mut headings: Vec<(String, usize)> = Vec::new();
    for page in pages.iter() {
        for fragment in &page.fragments {
            if let Fragment::Heading { inlines, .. } = fragment {
                let key = normalize_text(&inline::plain_text(inlines));
                if !key.is_empty() && !headings.iter().any(|(k, _)| *k == key) {
                    headings.push((key, page.number));
                }
            }
        }
    }

    let lookup = |text: &str| -> Option<usize> {
        let text = normalize_text(text);
        if text.is_empty() {
            return None;
        }
        if let Some((_, page)) = headings.iter().find(|(k, _)| *k == text) {
            return Some(*page);
        }
        let mut best: Option<(usize, usize)> = None;
        for (heading, page) in &headings {
            if heading.contains(&text) || text.contains(heading.as_str()) {
                let overlap = heading.chars().count().min(text.chars().count());
                if best.is_none_or(|(len, _)| overlap > len) {
                    best = Some((overlap, *page));
                }
            }
        }
        best.map(|(_, page)| page)
    };

    let mut toc = Vec::new();
    for page in pages.iter_mut() {
        for fragment in page.fragments.iter_mut() {
            if let Fragment::TocEntry { level, text, page: number } = fragment {
                *number = lookup(text);
                if number.is_none() {
                    log::debug!("No heading found for table of contents entry '{}'", text);
                }
                toc.push(TocEntry { level: *level, text: text.clone(), page: *number });
            }
        }
    }
    toc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixedMeasurer;
    use docstage_markup::Inline;
    use pretty_assertions::assert_eq;

    fn p(text: &str) -> Fragment {
        Fragment::paragraph(vec![Inline::text(text)])
    }

    fn h(level: u8, text: &str) -> Fragment {
        Fragment::Heading { level, inlines: vec![Inline::text(text)], pseudo: false }
    }

    fn toc(level: u8, text: &str) -> Fragment {
        Fragment::TocEntry { level, text: text.to_string(), page: None }
    }

    fn texts(page: &Page) -> Vec<String> {
        page.fragments.iter().map(Fragment::plain_text).collect()
    }

    fn run(budget: f32, fragments: Vec<Fragment>) -> Layout {
        let m = FixedMeasurer::default();
        Paginator::with_budget(&m, budget, 600.0, PaginationConfig::default()).paginate(fragments)
    }

    #[test]
    fn explicit_breaks_start_new_pages() {
        let layout = run(1000.0, vec![Fragment::PageBreak, p("a"), Fragment::PageBreak, Fragment::PageBreak, p("b")]);
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(texts(&layout.pages[0]), ["a"]);
        assert_eq!(layout.pages[1].number, 2);
    }

    #[test]
    fn overflowing_fragments_move_to_a_new_page() {
        let layout = run(100.0, (0..5).map(|i| p(&i.to_string())).collect());
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(texts(&layout.pages[0]), ["0", "1", "2"]);
        assert_eq!(texts(&layout.pages[1]), ["3", "4"]);
    }

    #[test]
    fn a_heading_moves_with_the_fragment_it_introduces() {
        let layout = run(100.0, vec![p("a"), p("b"), h(2, "Afsnit"), p("c")]);
        assert_eq!(texts(&layout.pages[0]), ["a", "b"]);
        assert_eq!(texts(&layout.pages[1]), ["Afsnit", "c"]);
    }

    #[test]
    fn an_oversized_unsplittable_fragment_is_kept_alone() {
        let m = FixedMeasurer::with_block(150.0);
        let paginator = Paginator::with_budget(&m, 100.0, 600.0, PaginationConfig::default());
        let layout = paginator.paginate(vec![p("stor"), p("næste")]);
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(texts(&layout.pages[0]), ["stor"]);
        assert!(!layout.stats.capped);
    }

    #[test]
    fn long_tables_split_with_header_on_every_page() {
        let header = vec!["Kolonne".to_string(), "Værdi".to_string()];
        let rows: Vec<Vec<String>> = (0..40).map(|i| vec![format!("række {i}"), i.to_string()]).collect();
        let table = Fragment::Table { header: header.clone(), rows, continued: false };
        let budget = 40.0 + 20.0 * 35.0 + 50.0;

        let m = FixedMeasurer::default();
        let layout = Paginator::with_budget(&m, budget, 600.0, PaginationConfig::default())
            .paginate(vec![p("intro"), table]);

        let tables: Vec<(&Vec<String>, usize)> = layout
            .pages
            .iter()
            .flat_map(|page| &page.fragments)
            .filter_map(|f| match f {
                Fragment::Table { header, rows, .. } => Some((header, rows.len())),
                _ => None,
            })
            .collect();
        assert!(tables.len() >= 2);
        assert!(tables.iter().all(|(h, n)| **h == header && *n >= 2));
        assert_eq!(tables.iter().map(|(_, n)| n).sum::<usize>(), 40);
        for page in &layout.pages {
            let used: f32 = page.fragments.iter().map(|f| m.height(f, 600.0)).sum();
            assert!(used <= budget, "page {} uses {used}", page.number);
        }
    }

    #[test]
    fn trailing_headings_move_to_the_next_page() {
        let layout = run(400.0, vec![p("a"), h(2, "Afsnit"), Fragment::PageBreak, p("b")]);
        assert_eq!(texts(&layout.pages[0]), ["a"]);
        assert_eq!(texts(&layout.pages[1]), ["Afsnit", "b"]);
        assert_eq!(layout.stats.orphan_moves, 1);
    }

    #[test]
    fn the_last_page_keeps_its_trailing_heading() {
        let layout = run(400.0, vec![p("a"), h(2, "Afsnit")]);
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(texts(&layout.pages[0]), ["a", "Afsnit"]);
    }

    #[test]
    fn toc_entries_resolve_to_heading_pages() {
        let layout = run(
            1000.0,
            vec![
                Fragment::TocHeading,
                toc(1, "Indledning"),
                toc(2, "1.2 Baggrund"),
                toc(1, "Metode"),
                Fragment::PageBreak,
                h(1, "Indledning"),
                p("tekst"),
                Fragment::PageBreak,
                h(2, "1\u{2009}.2   Baggrund"),
                Fragment::PageBreak,
                h(1, "Metode og datagrundlag"),
            ],
        );
        let pages: Vec<Option<usize>> = layout.toc.iter().map(|e| e.page).collect();
        assert_eq!(pages, [Some(2), Some(3), Some(4)]);
        assert!(matches!(layout.pages[0].fragments[1], Fragment::TocEntry { page: Some(2), .. }));
    }

    #[test]
    fn the_first_occurrence_of_a_heading_wins() {
        let layout = run(
            1000.0,
            vec![toc(1, "Resultater"), Fragment::PageBreak, h(1, "Resultater"), Fragment::PageBreak, h(1, "Resultater")],
        );
        assert_eq!(layout.toc[0].page, Some(2));
    }

    #[test]
    fn reflow_stops_at_the_iteration_cap_without_losing_content() {
        let m = FixedMeasurer::default();
        let config = PaginationConfig { max_reflow_iterations: 1, ..PaginationConfig::default() };
        let layout = Paginator::with_budget(&m, 60.0, 600.0, config).paginate((0..10).map(|i| p(&i.to_string())).collect());
        assert!(layout.stats.capped);
        let count: usize = layout.pages.iter().map(|page| page.fragments.len()).sum();
        assert_eq!(count, 10);
    }
}
