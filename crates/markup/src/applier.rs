//! The restyle path: overwrites formatting on blocks in place.
//!
//! Every property the applier touches is overwritten rather than adjusted,
//! so applying the same role twice leaves the block exactly as one pass did.
use docstage_classify::strip_list_prefix;
use docstage_style::{IdentityTable, TextStyle, cm_to_twips};
use docstage_types::{Block, Paragraph, Role, Run, Table, TableBorders};

pub struct StyleApplier<'a> {
    identity: &'a IdentityTable,
}

fn set_runs(runs: &mut [Run], style: &TextStyle, bold: Option<bool>) {
    for run in runs {
        run.font = Some(style.family.name.clone());
        run.size_pt = Some(style.size_pt);
        run.color = Some(style.color);
        if let Some(bold) = bold {
            run.bold = bold;
        }
    }
}

impl<'a> StyleApplier<'a> {
    pub fn new(identity: &'a IdentityTable) -> Self {
        Self { identity }
    }

    pub fn apply(&self, block: &mut Block, role: Role) {
        match block {
            Block::Paragraph(p) => self.apply_paragraph(p, role),
            Block::Table(t) => self.apply_table(t),
            Block::Image(_) => {}
        }
    }

    pub fn apply_paragraph(&self, p: &mut Paragraph, role: Role) {
        let id = self.identity;
        match role {
            Role::Heading1 | Role::Heading2 | Role::Heading3 => {
                if let Some(level) = role.heading_level() {
                    p.style = Some(format!("Heading {level}"));
                }
                set_runs(&mut p.runs, id.for_role(role), Some(false));
            }
            Role::PseudoHeading3 => set_runs(&mut p.runs, &id.pseudo_heading, Some(false)),
            Role::ListItem => self.apply_list(p),
            Role::HighlightBox => {
                set_runs(&mut p.runs, &id.body, None);
                let hl = &id.highlight;
                p.format.shading = Some(hl.fill);
                p.format.left_border = Some(hl.border.clone());
                p.format.indent_left_twips = Some(cm_to_twips(hl.indent_cm));
                p.format.space_before_pt = Some(hl.space_before_pt);
                p.format.space_after_pt = Some(hl.space_after_pt);
            }
            Role::CodeBlock => set_runs(&mut p.runs, &id.code, None),
            Role::PlainParagraph => set_runs(&mut p.runs, &id.body, None),
            Role::TableOfContentsHeading | Role::TableOfContentsEntry | Role::Table | Role::Image => {}
        }
    }

    /// Replaces the bullet or number with the identity's arrow glyph.
    fn apply_list(&self, p: &mut Paragraph) {
        let body = &self.identity.body;
        let list = &self.identity.list;
        let text = strip_list_prefix(&p.text());

        let glyph = Run {
            text: format!("{} ", list.glyph),
            font: Some(body.family.name.clone()),
            size_pt: Some(body.size_pt),
            color: Some(list.glyph_color),
            ..Default::default()
        };
        let content = Run {
            text,
            font: Some(body.family.name.clone()),
            size_pt: Some(body.size_pt),
            color: Some(body.color),
            ..Default::default()
        };
        p.runs = vec![glyph, content];
        p.numbering = None;
        p.format.indent_left_twips = Some(cm_to_twips(list.indent_cm));
    }

    pub fn apply_table(&self, table: &mut Table) {
        let style = &self.identity.table;
        for (i, row) in table.rows.iter_mut().enumerate() {
            let (text_style, bold) = if i == 0 { (&style.header, true) } else { (&style.cell, false) };
            for p in row.cells.iter_mut().flat_map(|c| c.paragraphs.iter_mut()) {
                set_runs(&mut p.runs, text_style, Some(bold));
            }
        }
        table.borders = TableBorders {
            bottom: Some(style.header_rule.clone()),
            inside_horizontal: Some(style.row_rule.clone()),
        };
    }
}
