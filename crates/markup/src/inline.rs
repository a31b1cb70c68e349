//! Inline content: runs grouped into links, bold and italic spans.
use crate::escape::escape_html;
use docstage_classify::strip_field_codes;
use docstage_types::Run;
use itertools::Itertools;
use serde::Serialize;

/// Represents an inline-level element within a fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Inline {
    Text { text: String },
    Strong { children: Vec<Inline> },
    Emphasis { children: Vec<Inline> },
    Link { href: String, children: Vec<Inline> },
    LineBreak,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Inline::Text { text } => out.push_str(&escape_html(text)),
            Inline::Strong { children } => {
                out.push_str("<strong>");
                children.iter().for_each(|c| c.write_markup(out));
                out.push_str("</strong>");
            }
            Inline::Emphasis { children } => {
                out.push_str("<em>");
                children.iter().for_each(|c| c.write_markup(out));
                out.push_str("</em>");
            }
            Inline::Link { href, children } => {
                out.push_str("<a href=\"");
                out.push_str(&escape_html(href));
                out.push_str("\" class=\"link\">");
                children.iter().for_each(|c| c.write_markup(out));
                out.push_str("</a>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Inline::Text { text } => out.push_str(text),
            Inline::Strong { children } | Inline::Emphasis { children } | Inline::Link { children, .. } => {
                children.iter().for_each(|c| c.write_text(out))
            }
            Inline::LineBreak => out.push('\n'),
        }
    }

    fn map_text(&mut self, f: &dyn Fn(&str) -> String) {
        match self {
            Inline::Text { text } => *text = f(text),
            Inline::Strong { children } | Inline::Emphasis { children } | Inline::Link { children, .. } => {
                children.iter_mut().for_each(|c| c.map_text(f))
            }
            Inline::LineBreak => {}
        }
    }
}

/// Markup for a sequence of inlines.
pub fn render(inlines: &[Inline]) -> String {
    let mut out = String::new();
    inlines.iter().for_each(|i| i.write_markup(&mut out));
    out
}

/// Visible text of a sequence of inlines, line breaks as `\n`.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    inlines.iter().for_each(|i| i.write_text(&mut out));
    out
}

/// Rewrites every text leaf in place.
pub fn map_text(inlines: &mut [Inline], f: &dyn Fn(&str) -> String) {
    inlines.iter_mut().for_each(|i| i.map_text(f));
}

/// Strips field codes from every run, trims the paragraph's outer
/// whitespace and drops runs left empty.
pub fn prepare_runs(runs: &[Run]) -> Vec<Run> {
    let mut out: Vec<Run> = runs
        .iter()
        .map(|r| Run { text: strip_field_codes(&r.text), ..r.clone() })
        .filter(|r| !r.text.is_empty())
        .collect();

    while let Some(first) = out.first_mut() {
        let trimmed = first.text.trim_start();
        if trimmed.is_empty() {
            out.remove(0);
        } else {
            first.text = trimmed.to_string();
            break;
        }
    }
    while let Some(last) = out.last_mut() {
        let trimmed = last.text.trim_end();
        if trimmed.is_empty() {
            out.pop();
        } else {
            last.text = trimmed.to_string();
            break;
        }
    }
    out
}

/// Removes the first `bytes` bytes of concatenated run text.
/// `bytes` must fall on a character boundary of the concatenation.
pub fn drop_prefix(runs: &mut Vec<Run>, mut bytes: usize) {
    while bytes > 0 && !runs.is_empty() {
        let len = runs[0].text.len();
        if len <= bytes {
            bytes -= len;
            runs.remove(0);
        } else {
            runs[0].text = runs[0].text[bytes..].trim_start().to_string();
            bytes = 0;
        }
    }
}

/// Builds inlines from runs. Runs sharing a hyperlink become one link;
/// within it, runs sharing bold/italic are merged into one span.
pub fn from_runs(runs: &[Run]) -> Vec<Inline> {
    let mut out = Vec::new();
    let by_link = runs.iter().chunk_by(|r| r.hyperlink.as_ref().map(|h| h.target.clone()));
    for (href, group) in &by_link {
        let children = styled(group);
        match href {
            Some(href) => out.push(Inline::Link { href, children }),
            None => out.extend(children),
        }
    }
    out
}

fn styled<'a>(runs: impl Iterator<Item = &'a Run>) -> Vec<Inline> {
    let mut out = Vec::new();
    let by_format = runs.chunk_by(|r| (r.bold, r.italic));
    for ((bold, italic), group) in &by_format {
        let text: String = group.map(|r| r.text.as_str()).collect();
        let mut nodes = with_breaks(&text);
        if italic {
            nodes = vec![Inline::Emphasis { children: nodes }];
        }
        if bold {
            nodes = vec![Inline::Strong { children: nodes }];
        }
        out.extend(nodes);
    }
    out
}

/// Splits text on `\n` into text leaves separated by line breaks.
pub fn with_breaks(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Inline::LineBreak);
        }
        if !line.is_empty() {
            out.push(Inline::text(line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_runs_with_equal_formatting() {
        let runs = vec![Run::new("Hej "), Run::new("med "), Run::new("dig").bold(), Run::new("!").bold()];
        assert_eq!(render(&from_runs(&runs)), "Hej med <strong>dig!</strong>");
    }

    #[test]
    fn nests_bold_around_italic() {
        let runs = vec![Run::new("vigtigt").bold().italic()];
        assert_eq!(render(&from_runs(&runs)), "<strong><em>vigtigt</em></strong>");
    }

    #[test]
    fn links_wrap_consecutive_runs() {
        let runs = vec![
            Run::new("Se "),
            Run::new("rapporten ").linked("https://example.com/?a=1&b=2"),
            Run::new("her").bold().linked("https://example.com/?a=1&b=2"),
            Run::new("."),
        ];
        assert_eq!(
            render(&from_runs(&runs)),
            r#"Se <a href="https://example.com/?a=1&amp;b=2" class="link">rapporten <strong>her</strong></a>."#
        );
    }

    #[test]
    fn escapes_text_and_renders_breaks() {
        let runs = vec![Run::new("a < b\nc & d")];
        let inlines = from_runs(&runs);
        assert_eq!(render(&inlines), "a &lt; b<br>c &amp; d");
        assert_eq!(plain_text(&inlines), "a < b\nc & d");
    }

    #[test]
    fn prepares_runs_for_rendering() {
        let runs = vec![Run::new("  "), Run::new(r#" INCLUDEPICTURE "x.png" Tekst "#), Run::new(" ")];
        let prepared = prepare_runs(&runs);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].text, "Tekst");
    }

    #[test]
    fn drops_prefix_across_runs() {
        let mut runs = vec![Run::new("•"), Run::new(" Første "), Run::new("punkt").bold()];
        drop_prefix(&mut runs, "• ".len());
        assert_eq!(render(&from_runs(&runs)), "Første <strong>punkt</strong>");
    }
}
