//! Counts taken from the produced HTML.
//!
//! The markup is parsed with html5ever rather than scanned, so entity
//! escaping and nesting do not skew the numbers. Generated surfaces (table
//! of contents, labels, cover captions, footers) are left out of the word
//! count since the source never contained them.
use crate::counts::{HeadingText, Inventory};
use docstage_markup::escape::{HAIR_SPACE, THIN_SPACE};
use html5ever::Attribute;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements whose text belongs to generated chrome rather than document content.
pub const GENERATED_CLASSES: &[&str] = &[
    "toc-heading",
    "toc-entry",
    "toc-page-number",
    "label",
    "arrow",
    "cover-caption",
    "cover-description",
    "cover-date",
    "page-footer",
    "back-page",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "pre", "table", "tr", "td", "th", "br", "section",
];

/// The produced markup, reduced to what the checker compares.
#[derive(Debug, Clone, Default)]
pub struct MarkupInventory {
    pub inventory: Inventory,
    /// All visible text outside `script` and `style`, generated surfaces included.
    pub visible_text: String,
}

fn attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs.iter().find(|a| &*a.name.local == name).map(|a| &*a.value)
}

fn text_of(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        text_of(child, out);
    }
}

#[derive(Default)]
struct Walker {
    inventory: Inventory,
    content_text: String,
    visible_text: String,
}

impl Walker {
    /// `continued` is set inside the tail pieces of a split table, whose
    /// header row repeats text already counted.
    fn walk(&mut self, node: &Handle, generated: bool, continued: bool) {
        match &node.data {
            NodeData::Text { contents } => {
                let text = contents.borrow();
                self.visible_text.push_str(&text);
                if !generated {
                    self.content_text.push_str(&text);
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                if tag == "script" || tag == "style" {
                    return;
                }
                let attrs = attrs.borrow();
                let classes: Vec<&str> = attr(&attrs, "class").map(|c| c.split_whitespace().collect()).unwrap_or_default();
                let continued = continued || (tag == "table" && classes.contains(&"continued"));
                let generated =
                    generated || (continued && tag == "th") || classes.iter().any(|c| GENERATED_CLASSES.contains(c));
                if !generated {
                    self.count(tag, &classes, &attrs, node);
                }

                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    self.separate(generated);
                }
                for child in node.children.borrow().iter() {
                    self.walk(child, generated, continued);
                }
                if block {
                    self.separate(generated);
                }
            }
            _ => {
                for child in node.children.borrow().iter() {
                    self.walk(child, generated, continued);
                }
            }
        }
    }

    fn separate(&mut self, generated: bool) {
        self.visible_text.push(' ');
        if !generated {
            self.content_text.push(' ');
        }
    }

    fn count(&mut self, tag: &str, classes: &[&str], attrs: &[Attribute], node: &Handle) {
        let counts = &mut self.inventory.counts;
        match tag {
            "h1" | "h2" | "h3" if classes.contains(&"pseudo-heading") => counts.paragraphs += 1,
            "h1" | "h2" | "h3" => {
                let mut text = String::new();
                text_of(node, &mut text);
                let level = tag[1..].parse().unwrap_or(3);
                self.inventory.add_heading(level, text.trim());
            }
            "p" => counts.paragraphs += 1,
            "table" if classes.contains(&"continued") => {}
            "table" => counts.tables += 1,
            "a" => counts.links += 1,
            "img" => {
                let label = format!("{}{}", attr(attrs, "alt").unwrap_or(""), attr(attrs, "src").unwrap_or(""));
                if !label.to_lowercase().contains("logo") {
                    counts.images += 1;
                }
            }
            _ => {}
        }
    }
}

pub fn inventory_html(html: &str) -> MarkupInventory {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut walker = Walker::default();
    walker.walk(&dom.document, false, false);

    let content: String = walker.content_text.chars().filter(|c| *c != THIN_SPACE && *c != HAIR_SPACE).collect();
    walker.inventory.add_words(&content);
    MarkupInventory { inventory: walker.inventory, visible_text: walker.visible_text }
}

impl MarkupInventory {
    pub fn headings(&self) -> &[HeadingText] {
        &self.inventory.headings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generated_surfaces_are_not_content() {
        let html = r#"<html><head><style>p { color: red; }</style></head><body>
            <h2 class="toc-heading">Indholdsfortegnelse</h2>
            <p class="toc-entry toc-level-1">Indledning<span class="toc-page-number">2</span></p>
            <span class="label">Indledning</span>
            <h1>Indledning</h1>
            <p class="list-item"><span class="arrow">→</span> Første punkt</p>
            <div class="page-footer"><img src="logo.png" alt="Backstage logo"><span>2</span></div>
            <script>var x = 1;</script>
        </body></html>"#;
        let inv = inventory_html(html).inventory;
        assert_eq!(inv.words, ["Indledning", "Første", "punkt"]);
        assert_eq!((inv.counts.h1, inv.counts.h2), (1, 0));
        assert_eq!(inv.counts.paragraphs, 1);
        assert_eq!(inv.counts.images, 0);
    }

    #[test]
    fn split_table_pieces_count_once() {
        let html = r#"<table><tr><th>Måned</th><th>Oppetid</th></tr><tr><td>Januar</td><td>99,9</td></tr></table>
            <div class="page"><table class="continued"><tr><th>Måned</th><th>Oppetid</th></tr><tr><td>Februar</td><td>99,8</td></tr></table></div>"#;
        let inv = inventory_html(html).inventory;
        assert_eq!(inv.counts.tables, 1);
        assert_eq!(inv.words, ["Måned", "Oppetid", "Januar", "99,9", "Februar", "99,8"]);
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let inv = inventory_html("<p><strong>Fed</strong>tekst og <a href=\"x\">link</a>.</p>").inventory;
        assert_eq!(inv.words, ["Fedtekst", "og", "link."]);
        assert_eq!(inv.counts.links, 1);
    }

    #[test]
    fn thin_spaces_are_removed_before_counting() {
        let inv = inventory_html("<h2>1\u{2009}.2 Metode</h2>").inventory;
        assert_eq!(inv.words, ["1.2", "Metode"]);
        assert_eq!(inv.headings[0].normalized(), "1.2 Metode");
    }

    #[test]
    fn pseudo_headings_count_as_paragraphs() {
        let inv = inventory_html(r#"<h3 class="pseudo-heading">Hvad nu?</h3><h3>Rigtig</h3>"#).inventory;
        assert_eq!(inv.counts.h3, 1);
        assert_eq!(inv.counts.paragraphs, 1);
    }

    #[test]
    fn visible_text_keeps_generated_surfaces() {
        let out = inventory_html(r#"<span class="label">HYPERLINK "x"</span>"#);
        assert!(out.visible_text.contains("HYPERLINK \"x\""));
        assert!(out.inventory.words.is_empty());
    }
}
