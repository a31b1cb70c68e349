//! Text and appearance heuristics as ordered, data-driven rule lists.
//!
//! A [`RuleSet`] is evaluated top-down and the first rule whose predicate
//! holds decides the role. The two profiles differ in what they trust: the
//! restyle profile reads font sizes because restyled documents rarely carry
//! reliable style names, while the markup profile reads text patterns.
use crate::callouts::CalloutMatcher;
use crate::filters::looks_like_list_item;
use docstage_style::vocabulary::{
    HIGHLIGHT_KEYWORDS, HIGHLIGHT_MIN_CHARS, QUESTION_WORDS, SUMMARY_PREFIXES,
};
use docstage_types::{Paragraph, Role};

/// What a rule predicate may look at.
pub struct RuleInput<'a> {
    pub paragraph: &'a Paragraph,
    /// Visible text with field codes removed and surrounding whitespace trimmed.
    pub text: &'a str,
    pub callouts: &'a CalloutMatcher,
}

impl RuleInput<'_> {
    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn sizes(&self) -> impl Iterator<Item = f32> + '_ {
        self.paragraph.runs.iter().filter_map(|r| r.size_pt)
    }
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub role: Role,
    pub test: fn(&RuleInput<'_>) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).field("role", &self.role).finish()
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules for the markup path. Highlight boxes come first: a long
    /// "Konklusion: ..." paragraph is a callout, not a pseudo-heading.
    pub fn markup() -> Self {
        Self::new(vec![
            Rule { name: "highlight", role: Role::HighlightBox, test: is_highlight },
            Rule { name: "list-item", role: Role::ListItem, test: is_list_item },
            Rule { name: "pseudo-heading", role: Role::PseudoHeading3, test: is_pseudo_heading },
        ])
    }

    /// Rules for the restyle path: font-size headings first, then lists and keyword highlights.
    pub fn restyle() -> Self {
        Self::new(vec![
            Rule { name: "size-heading-1", role: Role::Heading1, test: is_large_heading },
            Rule { name: "size-heading-2", role: Role::Heading2, test: is_medium_heading },
            Rule { name: "size-heading-3", role: Role::Heading3, test: is_small_heading },
            Rule { name: "list-item", role: Role::ListItem, test: is_list_item },
            Rule { name: "highlight-keyword", role: Role::HighlightBox, test: is_highlight_keyword },
        ])
    }

    pub fn first_match(&self, input: &RuleInput<'_>) -> Option<&Rule> {
        self.rules.iter().find(|rule| (rule.test)(input))
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn insert(&mut self, index: usize, rule: Rule) {
        self.rules.insert(index.min(self.rules.len()), rule);
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub fn is_large_heading(input: &RuleInput<'_>) -> bool {
    input.sizes().any(|s| s >= 24.0)
}

pub fn is_medium_heading(input: &RuleInput<'_>) -> bool {
    input.sizes().any(|s| (16.0..24.0).contains(&s))
}

pub fn is_small_heading(input: &RuleInput<'_>) -> bool {
    if input.sizes().any(|s| (12.0..16.0).contains(&s)) {
        return true;
    }
    !input.text.is_empty() && input.char_count() < 100 && input.paragraph.runs.iter().any(|r| r.bold)
}

pub fn is_list_item(input: &RuleInput<'_>) -> bool {
    input.paragraph.numbering.is_some() || looks_like_list_item(input.text)
}

pub fn is_pseudo_heading(input: &RuleInput<'_>) -> bool {
    let text = input.text;
    let len = input.char_count();
    if !(5..=120).contains(&len) {
        return false;
    }
    if text.ends_with(':') && len < 80 {
        return true;
    }

    let lower = text.to_lowercase();
    if text.ends_with('?') && QUESTION_WORDS.iter().any(|w| lower.starts_with(w)) {
        return true;
    }
    if (text.contains(" – ") || text.contains(" — ")) && (text.ends_with(':') || text.ends_with('?')) {
        return true;
    }
    SUMMARY_PREFIXES.iter().any(|p| lower.starts_with(p))
}

pub fn is_highlight_keyword(input: &RuleInput<'_>) -> bool {
    input.char_count() >= HIGHLIGHT_MIN_CHARS && HIGHLIGHT_KEYWORDS.iter().any(|k| input.text.starts_with(k))
}

pub fn is_highlight(input: &RuleInput<'_>) -> bool {
    is_highlight_keyword(input) || (input.char_count() >= HIGHLIGHT_MIN_CHARS && input.callouts.matches(input.text))
}
