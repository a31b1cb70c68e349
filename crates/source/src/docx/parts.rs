//! Auxiliary package parts: the style catalog, relationships and content types.
use crate::error::SourceError;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Read an attribute by local name, ignoring its namespace prefix.
pub(crate) fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == name.as_bytes())
        .map(|a| {
            let raw = String::from_utf8_lossy(&a.value).into_owned();
            match unescape(&raw) {
                Ok(value) => value.into_owned(),
                Err(_) => raw,
            }
        })
}

/// Built-in style names are stored lowercase in `styles.xml`; Word shows them capitalized.
fn ui_style_name(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower == "toc heading" {
        return "TOC Heading".to_string();
    }
    if let Some(rest) = lower.strip_prefix("heading ") {
        return format!("Heading {}", rest);
    }
    if let Some(rest) = lower.strip_prefix("toc ") {
        return format!("TOC {}", rest);
    }
    match lower.as_str() {
        "normal" => "Normal".to_string(),
        "title" => "Title".to_string(),
        "subtitle" => "Subtitle".to_string(),
        "list paragraph" => "List Paragraph".to_string(),
        _ => name.to_string(),
    }
}

/// Paragraph style ids mapped to display names.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    names: HashMap<String, String>,
}

impl StyleCatalog {
    pub fn parse(xml: &str) -> Result<Self, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut names = HashMap::new();
        let mut current_id: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"style" => {
                    let is_paragraph = attr(&e, "type").is_none_or(|t| t == "paragraph");
                    current_id = if is_paragraph { attr(&e, "styleId") } else { None };
                }
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"name" => {
                    if let (Some(id), Some(name)) = (current_id.as_ref(), attr(&e, "val")) {
                        names.insert(id.clone(), ui_style_name(&name));
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"style" => current_id = None,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { names })
    }

    /// Display name for a style id. Unknown ids are returned unchanged.
    pub fn name_for(&self, id: &str) -> String {
        self.names.get(id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// Style id for a display name, falling back to the name with spaces removed.
    pub fn id_for(&self, name: &str) -> String {
        self.names
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(id, _)| id.clone())
            .min()
            .unwrap_or_else(|| name.replace(' ', ""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn is_image(&self) -> bool {
        self.kind.ends_with("/image")
    }

    pub fn is_hyperlink(&self) -> bool {
        self.kind.ends_with("/hyperlink")
    }

    /// Package part name for an internal target, resolved against `word/`.
    pub fn part_name(&self) -> Option<String> {
        if self.external {
            return None;
        }
        if let Some(absolute) = self.target.strip_prefix('/') {
            return Some(absolute.to_string());
        }
        let mut segments: Vec<&str> = vec!["word"];
        for segment in self.target.split('/') {
            match segment {
                ".." => {
                    segments.pop();
                }
                "." | "" => {}
                s => segments.push(s),
            }
        }
        Some(segments.join("/"))
    }
}

/// Relationships of the main document part, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    pub fn parse(xml: &str) -> Result<Self, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut by_id = HashMap::new();

        loop {
            match reader.read_event()? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                    if let (Some(id), Some(target)) = (attr(&e, "Id"), attr(&e, "Target")) {
                        let rel = Relationship {
                            kind: attr(&e, "Type").unwrap_or_default(),
                            target,
                            external: attr(&e, "TargetMode").is_some_and(|m| m == "External"),
                        };
                        by_id.insert(id, rel);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    pub fn image_count(&self) -> usize {
        self.by_id.values().filter(|r| r.is_image()).count()
    }
}

/// `[Content_Types].xml`: extension defaults plus per-part overrides.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut types = Self::default();

        loop {
            match reader.read_event()? {
                Event::Empty(e) | Event::Start(e) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) = (attr(&e, "Extension"), attr(&e, "ContentType")) {
                            types.defaults.insert(ext.to_lowercase(), ct);
                        }
                    }
                    b"Override" => {
                        if let (Some(part), Some(ct)) = (attr(&e, "PartName"), attr(&e, "ContentType")) {
                            types.overrides.insert(part.trim_start_matches('/').to_string(), ct);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(types)
    }

    pub fn for_part(&self, part_name: &str) -> Option<String> {
        if let Some(ct) = self.overrides.get(part_name) {
            return Some(ct.clone());
        }
        let ext = part_name.rsplit('.').next()?.to_lowercase();
        self.defaults.get(&ext).cloned().or_else(|| guess_image_type(&ext))
    }
}

fn guess_image_type(ext: &str) -> Option<String> {
    let ct = match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(ct.to_string())
}
