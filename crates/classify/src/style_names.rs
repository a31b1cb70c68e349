use docstage_style::vocabulary::TOC_HEADING_TEXT;
use docstage_types::Role;

/// The role implied by a paragraph style name, when the name is one the
/// pipeline recognizes. Style names win over every text heuristic.
pub fn role_for_style(name: &str) -> Option<Role> {
    if name.contains("Heading 1") {
        Some(Role::Heading1)
    } else if name.contains("Heading 2") {
        Some(Role::Heading2)
    } else if name.contains("Heading 3") {
        Some(Role::Heading3)
    } else if name.contains("TOC Heading") || name == TOC_HEADING_TEXT {
        Some(Role::TableOfContentsHeading)
    } else if name.starts_with("TOC ") || name.starts_with(TOC_HEADING_TEXT) {
        Some(Role::TableOfContentsEntry)
    } else if name.contains("Source Code") {
        Some(Role::CodeBlock)
    } else {
        None
    }
}

/// TOC entry level from a `TOC n` style name, clamped to 1..=3.
pub fn toc_level(name: &str) -> u8 {
    name.chars()
        .rev()
        .find(|c| c.is_ascii_digit())
        .and_then(|c| c.to_digit(10))
        .map(|d| d.clamp(1, 3) as u8)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_styles() {
        assert_eq!(role_for_style("Heading 1"), Some(Role::Heading1));
        assert_eq!(role_for_style("Custom Heading 2 Char"), Some(Role::Heading2));
        assert_eq!(role_for_style("Heading 3"), Some(Role::Heading3));
    }

    #[test]
    fn toc_styles() {
        assert_eq!(role_for_style("TOC Heading"), Some(Role::TableOfContentsHeading));
        assert_eq!(role_for_style("Indholdsfortegnelse"), Some(Role::TableOfContentsHeading));
        assert_eq!(role_for_style("TOC 2"), Some(Role::TableOfContentsEntry));
        assert_eq!(role_for_style("Indholdsfortegnelse 1"), Some(Role::TableOfContentsEntry));
        assert_eq!(toc_level("TOC 2"), 2);
        assert_eq!(toc_level("TOC 7"), 3);
        assert_eq!(toc_level("TOC"), 1);
    }

    #[test]
    fn other_styles_defer_to_heuristics() {
        assert_eq!(role_for_style("Source Code"), Some(Role::CodeBlock));
        assert_eq!(role_for_style("Normal"), None);
        assert_eq!(role_for_style("List Paragraph"), None);
    }
}
