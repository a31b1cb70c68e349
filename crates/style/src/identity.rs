//! The Visual Identity Table: role to font, size, color and spacing.
//!
//! Both the package restyler and the stylesheet generator read from the same
//! table so the two outputs cannot drift apart.
use crate::font::{FontFamily, FontWeight};
use docstage_types::{BorderLine, Color, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub primary: Color,
    pub accent: Color,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::rgb(0x00, 0x12, 0x70),
            accent: Color::rgb(0x3e, 0x5c, 0xfe),
            background: Color::rgb(0xee, 0xf2, 0xff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub family: FontFamily,
    pub size_pt: f32,
    pub color: Color,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub space_before_pt: f32,
    #[serde(default)]
    pub space_after_pt: f32,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

fn default_line_height() -> f32 {
    1.4
}

impl TextStyle {
    fn new(family: &FontFamily, size_pt: f32, color: Color) -> Self {
        Self {
            family: family.clone(),
            size_pt,
            color,
            weight: FontWeight::Regular,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            line_height: default_line_height(),
        }
    }

    fn spaced(mut self, before: f32, after: f32) -> Self {
        self.space_before_pt = before;
        self.space_after_pt = after;
        self
    }

    fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStyle {
    pub glyph: String,
    pub glyph_color: Color,
    pub indent_cm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStyle {
    pub fill: Color,
    pub border: BorderLine,
    pub indent_cm: f32,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    pub header: TextStyle,
    pub cell: TextStyle,
    /// Rule under the header row.
    pub header_rule: BorderLine,
    /// Thin separators between body rows.
    pub row_rule: BorderLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityTable {
    pub palette: Palette,
    pub heading_font: FontFamily,
    pub body_font: FontFamily,
    pub code_font: FontFamily,
    pub heading1: TextStyle,
    pub heading2: TextStyle,
    pub heading3: TextStyle,
    pub pseudo_heading: TextStyle,
    pub body: TextStyle,
    pub label: TextStyle,
    pub code: TextStyle,
    pub page_number: TextStyle,
    pub list: ListStyle,
    pub highlight: HighlightStyle,
    pub table: TableStyle,
}

impl Default for IdentityTable {
    fn default() -> Self {
        let palette = Palette::default();
        let heading_font = FontFamily::new("FH Lecturis", "Georgia");
        let body_font = FontFamily::new("Helvetica Neue", "Arial");
        let code_font = FontFamily::new("Courier New", "monospace");
        let primary = palette.primary;

        Self {
            heading1: TextStyle::new(&heading_font, 32.0, primary).spaced(12.0, 24.0).line_height(1.2),
            heading2: TextStyle::new(&heading_font, 20.0, primary).spaced(28.0, 14.0).line_height(1.3),
            heading3: TextStyle::new(&heading_font, 14.0, primary).spaced(20.0, 10.0).line_height(1.3),
            pseudo_heading: TextStyle::new(&heading_font, 12.0, primary).spaced(20.0, 10.0).line_height(1.3),
            body: TextStyle::new(&body_font, 10.0, primary).spaced(0.0, 10.0).line_height(1.7),
            label: TextStyle::new(&body_font, 9.0, palette.accent)
                .weight(FontWeight::Medium)
                .spaced(0.0, 6.0),
            code: TextStyle::new(&code_font, 8.0, primary).spaced(12.0, 12.0).line_height(1.5),
            page_number: TextStyle::new(&body_font, 9.0, primary),
            list: ListStyle {
                glyph: "→".to_string(),
                glyph_color: palette.accent,
                indent_cm: 0.5,
            },
            highlight: HighlightStyle {
                fill: palette.background,
                border: BorderLine { size_eighths: 24, space_pt: 4, color: palette.accent },
                indent_cm: 0.5,
                space_before_pt: 10.0,
                space_after_pt: 10.0,
            },
            table: TableStyle {
                header: TextStyle::new(&body_font, 9.0, primary).weight(FontWeight::Bold),
                cell: TextStyle::new(&body_font, 9.0, primary),
                header_rule: BorderLine { size_eighths: 12, space_pt: 0, color: primary },
                row_rule: BorderLine { size_eighths: 4, space_pt: 0, color: palette.background },
            },
            palette,
            heading_font,
            body_font,
            code_font,
        }
    }
}

impl IdentityTable {
    /// The text style a paragraph of the given role is set in.
    pub fn for_role(&self, role: Role) -> &TextStyle {
        match role {
            Role::Heading1 => &self.heading1,
            Role::Heading2 => &self.heading2,
            Role::Heading3 => &self.heading3,
            Role::PseudoHeading3 => &self.pseudo_heading,
            Role::CodeBlock => &self.code,
            Role::Table => &self.table.cell,
            _ => &self.body,
        }
    }
}
