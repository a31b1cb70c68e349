//! Assigns every block exactly one [`Role`].
//!
//! Style names are consulted first and are authoritative. Paragraphs whose
//! style says nothing fall through to an ordered [`RuleSet`]; anything no rule
//! claims is a plain paragraph. Classification never fails.
pub mod callouts;
pub mod filters;
pub mod rules;
pub mod style_names;

pub use callouts::CalloutMatcher;
pub use filters::{
    clean_field_codes, is_manual_toc_entry, is_manual_toc_heading, is_page_number,
    is_title_metadata, looks_like_list_item, strip_field_codes, strip_list_prefix,
};
pub use rules::{Rule, RuleInput, RuleSet};
pub use style_names::{role_for_style, toc_level};

use docstage_types::{Block, Paragraph, Role};

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    callouts: CalloutMatcher,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules, callouts: CalloutMatcher::default() }
    }

    /// Classifier for the HTML path.
    pub fn markup() -> Self {
        Self::new(RuleSet::markup())
    }

    /// Classifier for the document restyle path.
    pub fn restyle() -> Self {
        Self::new(RuleSet::restyle())
    }

    pub fn with_callouts(mut self, callouts: CalloutMatcher) -> Self {
        self.callouts = callouts;
        self
    }

    pub fn callouts(&self) -> &CalloutMatcher {
        &self.callouts
    }

    pub fn classify(&self, block: &Block) -> Role {
        match block {
            Block::Paragraph(p) => self.classify_paragraph(p),
            Block::Table(_) => Role::Table,
            Block::Image(_) => Role::Image,
        }
    }

    pub fn classify_paragraph(&self, paragraph: &Paragraph) -> Role {
        if let Some(role) = paragraph.style.as_deref().and_then(role_for_style) {
            return role;
        }

        let text = clean_field_codes(&paragraph.text());
        let input = RuleInput { paragraph, text: &text, callouts: &self.callouts };
        match self.rules.first_match(&input) {
            Some(rule) => {
                log::trace!("rule '{}' classified {:?} as {}", rule.name, preview(&text), rule.role);
                rule.role
            }
            None => Role::PlainParagraph,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::markup()
    }
}

fn preview(text: &str) -> String {
    text.chars().take(40).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstage_types::{ImageRef, Run, Table};
    use pretty_assertions::assert_eq;

    const VIGTIGT: &str = "Vigtigt: Dette er en lang besked der overstiger firs tegn og derfor udløser en highlight box efter klassificering af indholdet.";

    #[test]
    fn style_name_beats_heuristics() {
        let c = Classifier::markup();
        let p = Paragraph::styled("Heading 2", "• Ligner en liste");
        assert_eq!(c.classify_paragraph(&p), Role::Heading2);
        let p = Paragraph::styled("Source Code", VIGTIGT);
        assert_eq!(c.classify_paragraph(&p), Role::CodeBlock);
    }

    #[test]
    fn non_paragraph_blocks() {
        let c = Classifier::default();
        assert_eq!(c.classify(&Block::Table(Table::default())), Role::Table);
        assert_eq!(c.classify(&Block::Image(ImageRef::default())), Role::Image);
    }

    #[test]
    fn keyword_paragraph_is_a_highlight() {
        let c = Classifier::markup();
        assert_eq!(c.classify_paragraph(&Paragraph::plain(VIGTIGT)), Role::HighlightBox);
    }

    #[test]
    fn callout_snippets_promote_paragraphs() {
        let text = "Platformen skal konsolideres inden næste budgetår, ellers vokser driftsomkostningerne hurtigere end omsætningen.";
        let plain = Classifier::markup();
        assert_eq!(plain.classify_paragraph(&Paragraph::plain(text)), Role::PlainParagraph);
        let with = Classifier::markup().with_callouts(CalloutMatcher::new(["Platformen skal konsolideres"]));
        assert_eq!(with.classify_paragraph(&Paragraph::plain(text)), Role::HighlightBox);
    }

    #[test]
    fn unclaimed_text_is_plain() {
        let c = Classifier::markup();
        assert_eq!(c.classify_paragraph(&Paragraph::plain("Almindelig brødtekst.")), Role::PlainParagraph);
        assert_eq!(c.classify_paragraph(&Paragraph::plain("")), Role::PlainParagraph);
    }

    #[test]
    fn restyle_profile_reads_font_sizes() {
        let c = Classifier::restyle();
        let p = Paragraph::new(vec![Run::new("Kapitel").sized(28.0)]);
        assert_eq!(c.classify_paragraph(&p), Role::Heading1);
        let p = Paragraph::new(vec![Run::new("Afsnit").sized(18.0)]);
        assert_eq!(c.classify_paragraph(&p), Role::Heading2);
        let p = Paragraph::plain("Hvad skal du kigge efter:");
        assert_eq!(c.classify_paragraph(&p), Role::PlainParagraph);
        assert_eq!(Classifier::markup().classify_paragraph(&p), Role::PseudoHeading3);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = Classifier::markup();
        let blocks = [Paragraph::plain(VIGTIGT), Paragraph::plain("1. Punkt"), Paragraph::plain("Hvorfor nu?")];
        for p in &blocks {
            assert_eq!(c.classify_paragraph(p), c.classify_paragraph(&p.clone()));
        }
    }
}
