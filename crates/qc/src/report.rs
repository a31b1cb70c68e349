use crate::counts::{Counts, Inventory};
use crate::markup::MarkupInventory;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

/// More missing words than this is a hard issue.
pub const WORD_LOSS_ISSUE: i64 = 50;
/// More missing words than this is a warning.
pub const WORD_LOSS_WARNING: i64 = 10;
const MISSING_WORD_SAMPLE: usize = 10;

/// Field-code fragments that must never survive into the output.
const FIELD_CODE_LEAKS: &[(&str, &str)] = &[
    (r"INCLUDEPICTURE", "INCLUDEPICTURE image field"),
    (r"MERGEFORMAT", "MERGEFORMAT switch"),
    (r#"\\[A-Z]+\s*""#, "field switch"),
    (r"attachment:[a-f0-9-]+:", "attachment reference"),
    (r#"HYPERLINK\s+""#, "HYPERLINK field"),
    (r"TOC\s+\\", "TOC field"),
];

static LEAK_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    FIELD_CODE_LEAKS
        .iter()
        .map(|(pattern, description)| {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("BUG: invalid FIELD_CODE_LEAKS regex literal");
            (re, *description)
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextComparison {
    pub source_words: usize,
    pub output_words: usize,
    /// Source minus output; positive when words went missing.
    pub difference: i64,
    pub difference_pct: f64,
}

impl TextComparison {
    fn new(source_words: usize, output_words: usize) -> Self {
        let difference = source_words as i64 - output_words as i64;
        let difference_pct = if source_words == 0 {
            0.0
        } else {
            (difference as f64 / source_words as f64 * 1000.0).round() / 10.0
        };
        Self { source_words, output_words, difference, difference_pct }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcReport {
    pub source: Counts,
    pub output: Counts,
    pub text: TextComparison,
    /// Findings that mean content was lost or corrupted.
    pub issues: Vec<String>,
    /// Differences worth a look that may be harmless.
    pub warnings: Vec<String>,
}

impl QcReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

fn count_mismatches(source: &Counts, output: &Counts, warnings: &mut Vec<String>) {
    let pairs = [
        ("H1", source.h1, output.h1),
        ("H2", source.h2, output.h2),
        ("H3", source.h3, output.h3),
        ("Tables", source.tables, output.tables),
        ("Images", source.images, output.images),
    ];
    for (name, s, o) in pairs {
        if s != o {
            warnings.push(format!("{name} mismatch: source={s}, output={o}"));
        }
    }
}

fn missing_headings(source: &Inventory, output: &Inventory) -> Vec<String> {
    let produced: BTreeSet<String> = output.headings.iter().map(|h| h.normalized()).collect();
    let mut seen = BTreeSet::new();
    source
        .headings
        .iter()
        .map(|h| h.normalized())
        .filter(|h| !produced.contains(h) && seen.insert(h.clone()))
        .collect()
}

fn missing_words(source: &Inventory, output: &Inventory) -> Vec<String> {
    let produced: BTreeSet<&str> = output.words.iter().map(String::as_str).collect();
    let missing: BTreeSet<&str> = source
        .words
        .iter()
        .map(String::as_str)
        .filter(|w| !produced.contains(w))
        .filter(|w| w.chars().count() > 3 && !w.chars().all(|c| c.is_ascii_digit()))
        .collect();
    missing.into_iter().map(str::to_string).collect()
}

/// Compares the two inventories. Never fails; every finding lands in the report.
pub fn compare(source: &Inventory, output: &MarkupInventory) -> QcReport {
    let produced = &output.inventory;
    let text = TextComparison::new(source.counts.words, produced.counts.words);
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    count_mismatches(&source.counts, &produced.counts, &mut warnings);

    if text.difference > WORD_LOSS_ISSUE {
        issues.push(format!("Missing text: {} words missing ({:.1}%)", text.difference, text.difference_pct));
    } else if text.difference > WORD_LOSS_WARNING {
        warnings.push(format!("Possible missing text: {} words difference", text.difference));
    }

    for heading in missing_headings(source, produced) {
        issues.push(format!("Heading missing from output: '{heading}'"));
    }

    let words = missing_words(source, produced);
    if words.len() > MISSING_WORD_SAMPLE {
        let sample: Vec<&str> = words.iter().take(MISSING_WORD_SAMPLE).map(String::as_str).collect();
        warnings.push(format!("Words that may be missing from the output (sample): {}", sample.join(", ")));
    }

    for (re, description) in LEAK_RES.iter() {
        let found = re.find_iter(&output.visible_text).count();
        if found > 0 {
            issues.push(format!("Leaked field code: {description} found {found} time(s)"));
        }
    }

    for issue in &issues {
        log::warn!("QC: {issue}");
    }
    QcReport { source: source.counts.clone(), output: produced.counts.clone(), text, issues, warnings }
}

fn write_counts(f: &mut fmt::Formatter<'_>, title: &str, c: &Counts) -> fmt::Result {
    writeln!(f, "{title}:")?;
    writeln!(f, "  H1 headings: {}", c.h1)?;
    writeln!(f, "  H2 headings: {}", c.h2)?;
    writeln!(f, "  H3 headings: {}", c.h3)?;
    writeln!(f, "  Paragraphs:  {}", c.paragraphs)?;
    writeln!(f, "  Tables:      {}", c.tables)?;
    writeln!(f, "  Images:      {}", c.images)?;
    writeln!(f, "  Links:       {}", c.links)?;
    writeln!(f, "  Words:       {}", c.words)
}

impl fmt::Display for QcReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "QC report: source document vs. HTML output")?;
        writeln!(f, "{rule}")?;
        write_counts(f, "Source document", &self.source)?;
        write_counts(f, "HTML output", &self.output)?;

        writeln!(f, "Text comparison:")?;
        match self.text.difference {
            0 => writeln!(f, "  No difference in word count")?,
            d if d > 0 => writeln!(f, "  {d} words missing ({}%)", self.text.difference_pct)?,
            d => writeln!(f, "  {} extra words in output", -d)?,
        }

        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for w in &self.warnings {
                writeln!(f, "  - {w}")?;
            }
        }
        if self.issues.is_empty() {
            writeln!(f, "No critical issues; all content appears to be included.")?;
        } else {
            writeln!(f, "Critical issues:")?;
            for issue in &self.issues {
                writeln!(f, "  - {issue}")?;
            }
        }
        write!(f, "{rule}")
    }
}
