//! Page geometry and unit conversion.
//!
//! Layout works in CSS pixels at 96 DPI; the document package works in
//! points, eighths of a point, and twentieths of a point (twips).
use serde::{de, Deserialize, Deserializer, Serialize};

/// CSS pixels per millimetre at 96 DPI.
pub const PX_PER_MM: f32 = 3.779_527_6;

pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_MM
}

pub fn pt_to_px(pt: f32) -> f32 {
    pt * 96.0 / 72.0
}

pub fn cm_to_twips(cm: f32) -> u32 {
    (cm * 567.0).round() as u32
}

/// Parse a length with optional unit (e.g., "20mm", "2cm", "56.7pt") into millimetres.
fn parse_mm(input: &str) -> Result<f32, String> {
    let input = input.trim();
    let (value, factor) = if let Some(v) = input.strip_suffix("mm") {
        (v, 1.0)
    } else if let Some(v) = input.strip_suffix("cm") {
        (v, 10.0)
    } else if let Some(v) = input.strip_suffix("pt") {
        (v, 25.4 / 72.0)
    } else if let Some(v) = input.strip_suffix("in") {
        (v, 25.4)
    } else {
        (input, 1.0)
    };
    value
        .trim()
        .parse::<f32>()
        .map(|v| v * factor)
        .map_err(|e| format!("Invalid length '{}': {}", input, e))
}

fn de_mm<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LengthDef {
        Num(f32),
        Str(String),
    }

    match LengthDef::deserialize(deserializer)? {
        LengthDef::Num(n) => Ok(n),
        LengthDef::Str(s) => parse_mm(&s).map_err(de::Error::custom),
    }
}

/// Physical page dimensions. All lengths in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    #[serde(deserialize_with = "de_mm")]
    pub width_mm: f32,
    #[serde(deserialize_with = "de_mm")]
    pub height_mm: f32,
    #[serde(deserialize_with = "de_mm")]
    pub margin_mm: f32,
    /// Usable height for content fragments, between the top margin and the footer.
    #[serde(deserialize_with = "de_mm")]
    pub content_budget_mm: f32,
    /// Clearance kept between the last fragment and the footer's top edge, in pixels.
    pub footer_clearance_px: f32,
}

impl Default for PageGeometry {
    /// A4 with 20mm margins.
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            content_budget_mm: 235.0,
            footer_clearance_px: 10.0,
        }
    }
}

impl PageGeometry {
    /// Height a page may hold before overflow handling triggers.
    pub fn content_budget_px(&self) -> f32 {
        mm_to_px(self.content_budget_mm) - self.footer_clearance_px
    }

    pub fn content_width_px(&self) -> f32 {
        mm_to_px(self.width_mm - 2.0 * self.margin_mm)
    }

    pub fn width_twips(&self) -> u32 {
        cm_to_twips(self.width_mm / 10.0)
    }

    pub fn height_twips(&self) -> u32 {
        cm_to_twips(self.height_mm / 10.0)
    }

    pub fn margin_twips(&self) -> u32 {
        cm_to_twips(self.margin_mm / 10.0)
    }

    pub fn content_width_twips(&self) -> u32 {
        cm_to_twips((self.width_mm - 2.0 * self.margin_mm) / 10.0)
    }
}
