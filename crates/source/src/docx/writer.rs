//! Serializes blocks back into `word/document.xml`.
//!
//! Only the body is regenerated. Every other package part is copied through
//! untouched by the package writer, so styles, numbering definitions, media
//! and relationships keep working against the rewritten body.
use super::parts::StyleCatalog;
use docstage_style::PageGeometry;
use docstage_types::{Block, BorderLine, ImageRef, Paragraph, Run, Table, TableBorders};
use quick_xml::escape::escape;
use std::fmt::Write;

const DEFAULT_ROOT: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#;

pub(crate) struct BodyWriter<'s> {
    styles: &'s StyleCatalog,
    page: &'s PageGeometry,
    out: String,
}

fn border(out: &mut String, tag: &str, line: &BorderLine) {
    let _ = write!(
        out,
        r#"<w:{tag} w:val="single" w:sz="{}" w:space="{}" w:color="{}"/>"#,
        line.size_eighths,
        line.space_pt,
        line.color.to_word_hex()
    );
}

fn pt_to_twips(pt: f32) -> u32 {
    (pt * 20.0).round() as u32
}

impl<'s> BodyWriter<'s> {
    pub fn new(styles: &'s StyleCatalog, page: &'s PageGeometry) -> Self {
        Self { styles, page, out: String::new() }
    }

    /// Writes a full document part. `root` is the original `<w:document ...>`
    /// start tag, reused so every namespace the drawings rely on stays declared.
    pub fn write_document(mut self, root: Option<&str>, blocks: &[Block]) -> String {
        self.out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.out.push('\n');
        self.out.push_str(root.unwrap_or(DEFAULT_ROOT));
        self.out.push_str("<w:body>");
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.paragraph(p),
                Block::Table(t) => self.table(t),
                Block::Image(image) => {
                    self.out.push_str("<w:p>");
                    self.image_run(image);
                    self.out.push_str("</w:p>");
                }
            }
        }
        self.section();
        self.out.push_str("</w:body></w:document>");
        self.out
    }

    fn section(&mut self) {
        let m = self.page.margin_twips();
        let _ = write!(
            self.out,
            r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
            self.page.width_twips(),
            self.page.height_twips(),
        );
    }

    fn paragraph(&mut self, p: &Paragraph) {
        self.out.push_str("<w:p>");
        self.paragraph_properties(p);
        for image in &p.images {
            self.image_run(image);
        }

        let mut open_link: Option<&str> = None;
        for run in &p.runs {
            let rel_id = run.hyperlink.as_ref().and_then(|h| h.rel_id.as_deref());
            if rel_id != open_link {
                if open_link.is_some() {
                    self.out.push_str("</w:hyperlink>");
                }
                if let Some(id) = rel_id {
                    let _ = write!(self.out, r#"<w:hyperlink r:id="{}">"#, escape(id));
                }
                open_link = rel_id;
            }
            self.run(run);
        }
        if open_link.is_some() {
            self.out.push_str("</w:hyperlink>");
        }
        self.out.push_str("</w:p>");
    }

    fn paragraph_properties(&mut self, p: &Paragraph) {
        let f = &p.format;
        let empty = p.style.is_none()
            && p.numbering.is_none()
            && f.left_border.is_none()
            && f.shading.is_none()
            && f.space_before_pt.is_none()
            && f.space_after_pt.is_none()
            && f.indent_left_twips.is_none();
        if empty {
            return;
        }

        self.out.push_str("<w:pPr>");
        if let Some(style) = &p.style {
            let _ = write!(self.out, r#"<w:pStyle w:val="{}"/>"#, escape(&self.styles.id_for(style)));
        }
        if let Some(num) = &p.numbering {
            let _ = write!(
                self.out,
                r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
                num.level,
                escape(&num.num_id)
            );
        }
        if let Some(line) = &f.left_border {
            self.out.push_str("<w:pBdr>");
            border(&mut self.out, "left", line);
            self.out.push_str("</w:pBdr>");
        }
        if let Some(fill) = &f.shading {
            let _ = write!(self.out, r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#, fill.to_word_hex());
        }
        if f.space_before_pt.is_some() || f.space_after_pt.is_some() {
            self.out.push_str("<w:spacing");
            if let Some(before) = f.space_before_pt {
                let _ = write!(self.out, r#" w:before="{}""#, pt_to_twips(before));
            }
            if let Some(after) = f.space_after_pt {
                let _ = write!(self.out, r#" w:after="{}""#, pt_to_twips(after));
            }
            self.out.push_str("/>");
        }
        if let Some(indent) = f.indent_left_twips {
            let _ = write!(self.out, r#"<w:ind w:left="{}"/>"#, indent);
        }
        self.out.push_str("</w:pPr>");
    }

    fn run(&mut self, run: &Run) {
        self.out.push_str("<w:r>");
        let has_props = run.font.is_some() || run.bold || run.italic || run.color.is_some() || run.size_pt.is_some();
        if has_props {
            self.out.push_str("<w:rPr>");
            if let Some(font) = &run.font {
                let font = escape(font.as_str());
                let _ = write!(self.out, r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#);
            }
            if run.bold {
                self.out.push_str("<w:b/>");
            }
            if run.italic {
                self.out.push_str("<w:i/>");
            }
            if let Some(color) = &run.color {
                let _ = write!(self.out, r#"<w:color w:val="{}"/>"#, color.to_word_hex());
            }
            if let Some(size) = run.size_pt {
                let half_points = (size * 2.0).round() as u32;
                let _ = write!(self.out, r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#);
            }
            self.out.push_str("</w:rPr>");
        }

        let mut segment = String::new();
        for ch in run.text.chars() {
            match ch {
                '\t' | '\n' => {
                    self.text(&segment);
                    segment.clear();
                    self.out.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
                }
                _ => segment.push(ch),
            }
        }
        self.text(&segment);
        self.out.push_str("</w:r>");
    }

    fn text(&mut self, text: &str) {
        if !text.is_empty() {
            let _ = write!(self.out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(text));
        }
    }

    fn image_run(&mut self, image: &ImageRef) {
        if let Some(raw) = &image.raw_xml {
            self.out.push_str("<w:r>");
            self.out.push_str(raw);
            self.out.push_str("</w:r>");
        }
    }

    fn table(&mut self, table: &Table) {
        let columns = table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0).max(1);
        let column_width = self.page.content_width_twips() / columns as u32;

        self.out.push_str(r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/>"#);
        self.table_borders(&table.borders);
        self.out.push_str("</w:tblPr><w:tblGrid>");
        for _ in 0..columns {
            let _ = write!(self.out, r#"<w:gridCol w:w="{column_width}"/>"#);
        }
        self.out.push_str("</w:tblGrid>");

        for row in &table.rows {
            self.out.push_str("<w:tr>");
            for cell in &row.cells {
                let _ = write!(self.out, r#"<w:tc><w:tcPr><w:tcW w:w="{column_width}" w:type="dxa"/></w:tcPr>"#);
                if cell.paragraphs.is_empty() {
                    self.out.push_str("<w:p/>");
                }
                for p in &cell.paragraphs {
                    self.paragraph(p);
                }
                self.out.push_str("</w:tc>");
            }
            self.out.push_str("</w:tr>");
        }
        self.out.push_str("</w:tbl>");
    }

    fn table_borders(&mut self, borders: &TableBorders) {
        if borders.bottom.is_none() && borders.inside_horizontal.is_none() {
            return;
        }
        self.out.push_str("<w:tblBorders>");
        if let Some(line) = &borders.bottom {
            border(&mut self.out, "bottom", line);
        }
        if let Some(line) = &borders.inside_horizontal {
            border(&mut self.out, "insideH", line);
        }
        self.out.push_str("</w:tblBorders>");
    }
}
