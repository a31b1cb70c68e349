use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic classification assigned to a block. Exactly one per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Heading1,
    Heading2,
    Heading3,
    PseudoHeading3,
    ListItem,
    CodeBlock,
    HighlightBox,
    TableOfContentsHeading,
    TableOfContentsEntry,
    Table,
    Image,
    PlainParagraph,
}

impl Role {
    /// Heading level for the three real heading roles.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Role::Heading1 => Some(1),
            Role::Heading2 => Some(2),
            Role::Heading3 => Some(3),
            _ => None,
        }
    }

    pub fn from_heading_level(level: u8) -> Option<Role> {
        match level {
            1 => Some(Role::Heading1),
            2 => Some(Role::Heading2),
            3 => Some(Role::Heading3),
            _ => None,
        }
    }

    pub fn is_toc(self) -> bool {
        matches!(self, Role::TableOfContentsHeading | Role::TableOfContentsEntry)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
