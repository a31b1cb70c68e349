//! Parses `word/document.xml` into blocks.
//!
//! The reader walks the body once, in order. Paragraphs and tables found at
//! any depth of content-control wrappers (`w:sdt`) are surfaced as top-level
//! blocks so nothing authored inside a control is lost.
use super::parts::{ContentTypes, Relationships, StyleCatalog, attr};
use crate::error::SourceError;
use docstage_types::{
    Block, BorderLine, Color, Hyperlink, ImageRef, NumberingMarker, Paragraph, Run, Table,
    TableCell, TableRow,
};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, BytesText, Event};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static EMBED_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:r:embed|r:id|r:link)="([^"]+)""#)
        .expect("BUG: invalid EMBED_ID_RE regex literal")
});

static EXTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<wp:extent\s+cx="(\d+)"\s+cy="(\d+)""#).expect("BUG: invalid EXTENT_RE regex literal")
});

/// The first `wp:extent` in a drawing: the size the author placed it at.
fn drawing_extent(raw: &str) -> Option<(u64, u64)> {
    let caps = EXTENT_RE.captures(raw)?;
    Some((caps.get(1)?.as_str().parse().ok()?, caps.get(2)?.as_str().parse().ok()?))
}

/// Everything the body reader needs to resolve references.
pub(crate) struct PartIndex<'p> {
    pub styles: &'p StyleCatalog,
    pub relationships: &'p Relationships,
    pub content_types: &'p ContentTypes,
    pub parts: &'p HashMap<String, Vec<u8>>,
}

pub(crate) struct BodyReader<'a, 'p> {
    xml: &'a str,
    reader: Reader<&'a [u8]>,
    index: PartIndex<'p>,
}

fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(attr(e, "val").as_deref(), Some("0") | Some("false") | Some("off"))
}

fn text_of(e: &BytesText<'_>) -> String {
    let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
    match unescape(&raw) {
        Ok(text) => text.into_owned(),
        Err(_) => raw,
    }
}

fn general_ref(name: &[u8]) -> Option<String> {
    let name = std::str::from_utf8(name).ok()?;
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(String::from)
}

fn twips_to_pt(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().map(|v| v / 20.0)
}

impl<'a, 'p> BodyReader<'a, 'p> {
    pub fn new(xml: &'a str, index: PartIndex<'p>) -> Self {
        Self { xml, reader: Reader::from_str(xml), index }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    pub fn read_blocks(mut self) -> Result<Vec<Block>, SourceError> {
        let mut blocks = Vec::new();
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"p" => blocks.push(self.read_paragraph()?),
                    b"tbl" => blocks.push(Block::Table(self.read_table()?)),
                    b"sectPr" => self.skip(&e)?,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"p" => {
                    blocks.push(Block::Paragraph(Paragraph::default()));
                }
                Event::End(e) if e.local_name().as_ref() == b"body" => break,
                Event::Eof => break,
                _ => {}
            }
        }
        log::debug!("Read {} blocks from document body", blocks.len());
        Ok(blocks)
    }

    fn skip(&mut self, start: &BytesStart<'_>) -> Result<(), SourceError> {
        let end = start.to_end().into_owned();
        self.reader.read_to_end(end.name())?;
        Ok(())
    }

    /// Reads a paragraph whose start tag has just been consumed. A paragraph
    /// that holds nothing but a drawing becomes an image block.
    fn read_paragraph(&mut self) -> Result<Block, SourceError> {
        let mut paragraph = self.read_paragraph_inner()?;
        let image_only = paragraph.runs.iter().all(|r| r.text.trim().is_empty())
            && paragraph.images.len() == 1
            && paragraph.style.is_none()
            && paragraph.numbering.is_none();
        if image_only {
            if let Some(image) = paragraph.images.pop() {
                return Ok(Block::Image(image));
            }
        }
        Ok(Block::Paragraph(paragraph))
    }

    fn read_paragraph_inner(&mut self) -> Result<Paragraph, SourceError> {
        let mut paragraph = Paragraph::default();
        let mut link_stack: Vec<Option<Hyperlink>> = Vec::new();
        let mut in_ppr = false;
        let mut in_pbdr = false;
        let mut num_id: Option<String> = None;
        let mut num_level: u8 = 0;

        loop {
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"pPr" => in_ppr = true,
                    b"pBdr" => in_pbdr = true,
                    b"rPr" if in_ppr => self.skip(&e)?,
                    b"hyperlink" => link_stack.push(self.resolve_link(&e)),
                    b"r" => {
                        let link = link_stack.iter().rev().find_map(|l| l.clone());
                        let (run, images) = self.read_run(link)?;
                        if let Some(run) = run {
                            paragraph.runs.push(run);
                        }
                        paragraph.images.extend(images);
                    }
                    b"del" | b"moveFrom" => self.skip(&e)?,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"pStyle" if in_ppr => {
                        paragraph.style = attr(&e, "val").map(|id| self.index.styles.name_for(&id));
                    }
                    b"numId" if in_ppr => num_id = attr(&e, "val"),
                    b"ilvl" if in_ppr => {
                        num_level = attr(&e, "val").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                    b"ind" if in_ppr => {
                        paragraph.format.indent_left_twips = attr(&e, "left")
                            .or_else(|| attr(&e, "start"))
                            .and_then(|v| v.parse().ok());
                    }
                    b"spacing" if in_ppr => {
                        paragraph.format.space_before_pt = attr(&e, "before").and_then(|v| twips_to_pt(&v));
                        paragraph.format.space_after_pt = attr(&e, "after").and_then(|v| twips_to_pt(&v));
                    }
                    b"shd" if in_ppr => {
                        paragraph.format.shading = attr(&e, "fill").and_then(|f| Color::parse_hex(&f).ok());
                    }
                    b"left" if in_pbdr => {
                        paragraph.format.left_border = Some(BorderLine {
                            size_eighths: attr(&e, "sz").and_then(|v| v.parse().ok()).unwrap_or(0),
                            space_pt: attr(&e, "space").and_then(|v| v.parse().ok()).unwrap_or(0),
                            color: attr(&e, "color")
                                .and_then(|c| Color::parse_hex(&c).ok())
                                .unwrap_or_default(),
                        });
                    }
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"pPr" => in_ppr = false,
                    b"pBdr" => in_pbdr = false,
                    b"hyperlink" => {
                        link_stack.pop();
                    }
                    b"p" => break,
                    _ => {}
                },
                Event::Eof => {
                    return Err(SourceError::InvalidPackage("unterminated paragraph".to_string()));
                }
                _ => {}
            }
        }

        // numId 0 explicitly removes numbering inherited from the style
        paragraph.numbering = num_id
            .filter(|id| id != "0")
            .map(|num_id| NumberingMarker { num_id, level: num_level });
        Ok(paragraph)
    }

    fn resolve_link(&self, e: &BytesStart<'_>) -> Option<Hyperlink> {
        if let Some(rel_id) = attr(e, "id") {
            let rel = self.index.relationships.get(&rel_id)?;
            return Some(Hyperlink { target: rel.target.clone(), rel_id: Some(rel_id) });
        }
        attr(e, "anchor").map(|anchor| Hyperlink::new(format!("#{}", anchor)))
    }

    fn read_run(&mut self, link: Option<Hyperlink>) -> Result<(Option<Run>, Vec<ImageRef>), SourceError> {
        let mut run = Run { hyperlink: link, ..Default::default() };
        let mut images = Vec::new();
        let mut in_rpr = false;
        let mut in_text = false;

        loop {
            let start_pos = self.position();
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"rPr" => in_rpr = true,
                    b"t" => in_text = true,
                    b"instrText" | b"delText" => self.skip(&e)?,
                    b"drawing" | b"pict" | b"object" => {
                        self.skip(&e)?;
                        let raw = &self.xml[start_pos..self.position()];
                        if let Some(image) = self.resolve_image(raw) {
                            images.push(image);
                        }
                    }
                    b"AlternateContent" => {}
                    b"Fallback" => self.skip(&e)?,
                    _ if in_rpr => self.read_run_property(&e, &mut run),
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"tab" if !in_rpr => run.text.push('\t'),
                    b"br" | b"cr" if !in_rpr => {
                        if attr(&e, "type").as_deref() != Some("page") {
                            run.text.push('\n');
                        }
                    }
                    b"noBreakHyphen" => run.text.push('-'),
                    _ if in_rpr => self.read_run_property(&e, &mut run),
                    _ => {}
                },
                Event::Text(e) if in_text => run.text.push_str(&text_of(&e)),
                Event::CData(e) if in_text => run.text.push_str(&String::from_utf8_lossy(e.as_ref())),
                Event::GeneralRef(e) if in_text => {
                    if let Some(resolved) = general_ref(e.as_ref()) {
                        run.text.push_str(&resolved);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"rPr" => in_rpr = false,
                    b"t" => in_text = false,
                    b"r" => break,
                    _ => {}
                },
                Event::Eof => {
                    return Err(SourceError::InvalidPackage("unterminated run".to_string()));
                }
                _ => {}
            }
        }

        let run = if run.text.is_empty() { None } else { Some(run) };
        Ok((run, images))
    }

    fn read_run_property(&self, e: &BytesStart<'_>, run: &mut Run) {
        match e.local_name().as_ref() {
            b"b" => run.bold = toggle(e),
            b"i" => run.italic = toggle(e),
            b"sz" => run.size_pt = attr(e, "val").and_then(|v| v.parse::<f32>().ok()).map(|hp| hp / 2.0),
            b"color" => {
                run.color = attr(e, "val").filter(|v| v != "auto").and_then(|v| Color::parse_hex(&v).ok());
            }
            b"rFonts" => run.font = attr(e, "ascii").or_else(|| attr(e, "hAnsi")),
            _ => {}
        }
    }

    fn resolve_image(&self, raw: &str) -> Option<ImageRef> {
        let rel_id = EMBED_ID_RE.captures(raw)?.get(1)?.as_str().to_string();
        let rel = self.index.relationships.get(&rel_id)?;
        if !rel.is_image() {
            return None;
        }
        let target = rel.part_name();
        let bytes = target
            .as_ref()
            .and_then(|t| self.index.parts.get(t))
            .cloned()
            .unwrap_or_default();
        if bytes.is_empty() {
            log::warn!("Image relationship '{}' has no embedded data", rel_id);
        }
        Some(ImageRef {
            rel_id,
            content_type: target.as_deref().and_then(|t| self.index.content_types.for_part(t)),
            extent_emu: drawing_extent(raw),
            target,
            bytes,
            raw_xml: Some(raw.to_string()),
        })
    }

    fn read_table(&mut self) -> Result<Table, SourceError> {
        let mut table = Table::default();
        let mut row: Option<TableRow> = None;
        let mut cell: Option<TableCell> = None;

        loop {
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"tr" => row = Some(TableRow::default()),
                    b"tc" => cell = Some(TableCell::default()),
                    b"p" => {
                        let block = self.read_paragraph()?;
                        let paragraph = match block {
                            Block::Paragraph(p) => p,
                            Block::Image(image) => Paragraph { images: vec![image], ..Default::default() },
                            Block::Table(_) => continue,
                        };
                        if let Some(cell) = cell.as_mut() {
                            cell.paragraphs.push(paragraph);
                        }
                    }
                    b"tbl" => {
                        // Nested tables flatten into the enclosing cell's paragraphs.
                        let nested = self.read_table()?;
                        if let Some(cell) = cell.as_mut() {
                            for nested_row in nested.rows {
                                for nested_cell in nested_row.cells {
                                    cell.paragraphs.extend(nested_cell.paragraphs);
                                }
                            }
                        }
                    }
                    b"tblPr" | b"tblGrid" | b"trPr" | b"tcPr" => self.skip(&e)?,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"p" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.paragraphs.push(Paragraph::default());
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"tc" => {
                        if let (Some(row), Some(cell)) = (row.as_mut(), cell.take()) {
                            row.cells.push(cell);
                        }
                    }
                    b"tr" => {
                        if let Some(row) = row.take() {
                            table.rows.push(row);
                        }
                    }
                    b"tbl" => break,
                    _ => {}
                },
                Event::Eof => {
                    return Err(SourceError::InvalidPackage("unterminated table".to_string()));
                }
                _ => {}
            }
        }

        Ok(table)
    }
}
