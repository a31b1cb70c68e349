//! Counts taken from the source blocks.
//!
//! The skip rules are the ones the emitter applies: source tables of
//! contents, page numbers and manually typed contents entries never reach
//! the output, so they are not counted here either.
use crate::counts::Inventory;
use docstage_classify::{
    is_manual_toc_entry, is_manual_toc_heading, is_page_number, looks_like_list_item, role_for_style,
    strip_list_prefix,
};
use docstage_types::{Block, Paragraph, Role};

fn is_skipped(paragraph: &Paragraph, text: &str) -> bool {
    let style = paragraph.style_name();
    style.contains("TOC")
        || style.contains("Indholdsfortegnelse")
        || is_page_number(text)
        || is_manual_toc_entry(text)
        || is_manual_toc_heading(text)
}

/// Number of hyperlinks, counting adjacent runs with the same target once.
fn link_count(paragraph: &Paragraph) -> usize {
    let mut count = 0;
    let mut previous: Option<&str> = None;
    for run in &paragraph.runs {
        let target = run.hyperlink.as_ref().map(|h| h.target.as_str());
        if target.is_some() && target != previous {
            count += 1;
        }
        previous = target;
    }
    count
}

fn add_paragraph(inv: &mut Inventory, paragraph: &Paragraph) {
    let raw = paragraph.text();
    let text = raw.trim();
    if is_skipped(paragraph, text) {
        return;
    }
    inv.counts.images += paragraph.images.len();
    inv.counts.links += link_count(paragraph);
    if text.is_empty() {
        return;
    }

    match role_for_style(paragraph.style_name()).and_then(Role::heading_level) {
        Some(level) => {
            inv.add_heading(level, text);
            inv.add_words(text);
        }
        None => {
            inv.counts.paragraphs += 1;
            if looks_like_list_item(text) {
                inv.add_words(&strip_list_prefix(text));
            } else {
                inv.add_words(text);
            }
        }
    }
}

pub fn inventory_blocks(blocks: &[Block]) -> Inventory {
    let mut inv = Inventory::default();
    for block in blocks {
        match block {
            Block::Paragraph(p) => add_paragraph(&mut inv, p),
            Block::Table(table) => {
                inv.counts.tables += 1;
                for cell in table.rows.iter().flat_map(|r| &r.cells) {
                    inv.add_words(&cell.text());
                }
            }
            Block::Image(_) => inv.counts.images += 1,
        }
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstage_types::{ImageRef, Run, Table, TableRow};
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_headings_paragraphs_and_tables() {
        let blocks = vec![
            Block::Paragraph(Paragraph::styled("Heading 1", "Rapport")),
            Block::Paragraph(Paragraph::styled("Heading 2", "Metode")),
            Block::Paragraph(Paragraph::plain("To ord.")),
            Block::Paragraph(Paragraph::plain("   ")),
            Block::Table(Table::new(vec![TableRow::from_texts(&["A", "B"])])),
        ];
        let inv = inventory_blocks(&blocks);
        assert_eq!((inv.counts.h1, inv.counts.h2, inv.counts.h3), (1, 1, 0));
        assert_eq!(inv.counts.paragraphs, 1);
        assert_eq!(inv.counts.tables, 1);
        assert_eq!(inv.counts.words, 6);
        assert_eq!(inv.headings[1].text, "Metode");
    }

    #[test]
    fn skipped_paragraphs_are_not_counted() {
        let mut numbered = Paragraph::plain("12");
        numbered.images.push(ImageRef { rel_id: "rId9".into(), ..Default::default() });
        let blocks = vec![
            Block::Paragraph(numbered),
            Block::Paragraph(Paragraph::styled("TOC 1", "Indledning\t3")),
            Block::Paragraph(Paragraph::plain("Indledning — 3")),
            Block::Paragraph(Paragraph::plain("Indholdsfortegnelse")),
        ];
        let inv = inventory_blocks(&blocks);
        assert_eq!(inv.counts, Default::default());
    }

    #[test]
    fn list_prefixes_are_not_words() {
        let inv = inventory_blocks(&[Block::Paragraph(Paragraph::plain("1. Første punkt"))]);
        assert_eq!(inv.words, ["Første", "punkt"]);
    }

    #[test]
    fn adjacent_link_runs_count_once() {
        let p = Paragraph::new(vec![
            Run::new("Se ").linked("https://a.dk"),
            Run::new("her").bold().linked("https://a.dk"),
            Run::new(" og "),
            Run::new("der").linked("https://b.dk"),
        ]);
        assert_eq!(inventory_blocks(&[Block::Paragraph(p)]).counts.links, 2);
    }
}
