//! WordprocessingML (`.docx`) packages.
//!
//! The whole package is read into memory up front. Blocks are parsed from the
//! main document part on demand; writing regenerates that one part and copies
//! every other part byte for byte.
mod parts;
mod reader;
mod writer;

pub use parts::{ContentTypes, Relationship, Relationships, StyleCatalog};

use crate::error::SourceError;
use crate::VecBlockSource;
use docstage_style::PageGeometry;
use docstage_types::Block;
use quick_xml::Reader;
use quick_xml::events::Event;
use reader::{BodyReader, PartIndex};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use writer::BodyWriter;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An embedded media file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPart {
    pub path: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct DocxPackage {
    /// Part names in archive order, so a rewritten package keeps the original layout.
    order: Vec<String>,
    parts: HashMap<String, Vec<u8>>,
    styles: StyleCatalog,
    relationships: Relationships,
    content_types: ContentTypes,
}

fn utf8<'b>(name: &str, bytes: &'b [u8]) -> Result<&'b str, SourceError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SourceError::InvalidPackage(format!("part '{}' is not UTF-8: {}", name, e)))?;
    Ok(text.trim_start_matches('\u{feff}'))
}

/// The original `<w:document ...>` start tag, namespace declarations included.
fn root_start_tag(xml: &str) -> Result<Option<String>, SourceError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"document" => {
                return Ok(Some(format!("<{}>", String::from_utf8_lossy(e.as_ref()))));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

impl DocxPackage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let bytes = std::fs::read(path.as_ref())?;
        log::info!("Opened {} ({} bytes)", path.as_ref().display(), bytes.len());
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SourceError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut order = Vec::with_capacity(archive.len());
        let mut parts = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)?;
            order.push(name.clone());
            parts.insert(name, buf);
        }

        if !parts.contains_key(DOCUMENT_PART) {
            return Err(SourceError::MissingPart(DOCUMENT_PART.to_string()));
        }

        let styles = match parts.get(STYLES_PART) {
            Some(bytes) => StyleCatalog::parse(utf8(STYLES_PART, bytes)?)?,
            None => StyleCatalog::default(),
        };
        let relationships = match parts.get(DOCUMENT_RELS_PART) {
            Some(bytes) => Relationships::parse(utf8(DOCUMENT_RELS_PART, bytes)?)?,
            None => Relationships::default(),
        };
        let content_types = match parts.get(CONTENT_TYPES_PART) {
            Some(bytes) => ContentTypes::parse(utf8(CONTENT_TYPES_PART, bytes)?)?,
            None => ContentTypes::default(),
        };

        log::debug!("Package holds {} parts", order.len());
        Ok(Self { order, parts, styles, relationships, content_types })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    fn document_xml(&self) -> Result<&str, SourceError> {
        let bytes = self
            .parts
            .get(DOCUMENT_PART)
            .ok_or_else(|| SourceError::MissingPart(DOCUMENT_PART.to_string()))?;
        utf8(DOCUMENT_PART, bytes)
    }

    /// Parses the document body into blocks, in document order.
    pub fn read_blocks(&self) -> Result<Vec<Block>, SourceError> {
        let index = PartIndex {
            styles: &self.styles,
            relationships: &self.relationships,
            content_types: &self.content_types,
            parts: &self.parts,
        };
        BodyReader::new(self.document_xml()?, index).read_blocks()
    }

    pub fn block_source(&self) -> Result<VecBlockSource, SourceError> {
        Ok(VecBlockSource::new(self.read_blocks()?))
    }

    /// Every part under `word/media/`, in archive order.
    pub fn media(&self) -> Vec<MediaPart> {
        self.order
            .iter()
            .filter(|name| name.starts_with("word/media/"))
            .filter_map(|name| {
                let bytes = self.parts.get(name)?;
                Some(MediaPart {
                    path: name.clone(),
                    content_type: self
                        .content_types
                        .for_part(name)
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                    bytes: bytes.clone(),
                })
            })
            .collect()
    }

    /// Number of image relationships on the main document part.
    pub fn image_count(&self) -> usize {
        self.relationships.image_count()
    }

    /// Serializes `blocks` as the new document body and repackages.
    pub fn write_document(&self, blocks: &[Block], page: &PageGeometry) -> Result<Vec<u8>, SourceError> {
        let original = self.document_xml()?;
        let root = root_start_tag(original)?;
        let document = BodyWriter::new(&self.styles, page).write_document(root.as_deref(), blocks);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for name in &self.order {
            zip.start_file(name.as_str(), options)?;
            if name == DOCUMENT_PART {
                zip.write_all(document.as_bytes())?;
            } else if let Some(bytes) = self.parts.get(name) {
                zip.write_all(bytes)?;
            }
        }
        let cursor = zip.finish()?;
        log::debug!("Wrote document part with {} blocks", blocks.len());
        Ok(cursor.into_inner())
    }

    pub fn save(&self, blocks: &[Block], page: &PageGeometry, path: impl AsRef<Path>) -> Result<(), SourceError> {
        let bytes = self.write_document(blocks, page)?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!("Saved {}", path.as_ref().display());
        Ok(())
    }
}
