use docstage::{Block, Paragraph};
use docstage_types::{Table, TableRow};

pub const TITLE: &str = "Årsrapport for driften 2024";

pub const CONCLUSION: &str = "Konklusion: Svartiderne er faldet markant gennem hele året, og de fleste mål for driften er nået med god margin.";

pub fn heading(level: u8, text: &str) -> Block {
    Block::Paragraph(Paragraph::styled(format!("Heading {level}"), text))
}

pub fn para(text: &str) -> Block {
    Block::Paragraph(Paragraph::plain(text))
}

pub fn table(rows: &[&[&str]]) -> Block {
    Block::Table(Table::new(rows.iter().copied().map(|r| TableRow::from_texts(r)).collect()))
}

/// A short report: title block, a source table of contents and three chapters.
pub fn sample_report() -> Vec<Block> {
    vec![
        heading(1, TITLE),
        para("Udarbejdet af: Driftsteamet"),
        para("Version 1.2"),
        Block::Paragraph(Paragraph::styled("TOC 1", "Indledning\t2")),
        heading(1, "1. Indledning"),
        para("Rapporten samler årets erfaringer med driften af platformen og peger på de vigtigste forbedringer."),
        heading(2, "1.1 Baggrund"),
        para("Platformen har kørt i produktion siden foråret og betjener i dag alle interne brugere."),
        para("• Første punkt om oppetid"),
        para("• Andet punkt om svartider"),
        heading(1, "2. Resultater"),
        para(CONCLUSION),
        table(&[&["Måned", "Oppetid"], &["Januar", "99,9 %"], &["Februar", "99,8 %"]]),
        heading(2, "2.1 Hvordan måler vi?"),
        para("Målingerne tages hvert femte minut fra tre uafhængige lokationer."),
        heading(1, "Bilag"),
        para("Rådata kan rekvireres hos driftsteamet."),
    ]
}

fn filler(chapter: usize, n: usize) -> String {
    format!(
        "Afsnit {n} i kapitel {chapter} beskriver driftens forløb i detaljer, herunder hændelser, \
         planlagte vedligeholdelsesvinduer og de tiltag der blev sat i værk for at holde svartiderne nede \
         gennem hele perioden uden at gå på kompromis med sikkerheden."
    )
}

/// Several chapters long enough to need many pages each.
pub fn long_report(chapters: usize, paragraphs_per_section: usize) -> Vec<Block> {
    let mut blocks = vec![heading(1, TITLE)];
    for c in 1..=chapters {
        blocks.push(heading(1, &format!("{c}. Kapitel om drift")));
        for s in 1..=3 {
            blocks.push(heading(2, &format!("{c}.{s} Delafsnit")));
            for n in 1..=paragraphs_per_section {
                blocks.push(para(&filler(c, n)));
            }
        }
    }
    blocks
}
