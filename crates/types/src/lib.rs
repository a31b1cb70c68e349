pub mod color;
pub mod document;
pub mod role;

pub use color::Color;
pub use document::{
    Block, BorderLine, Hyperlink, ImageRef, NumberingMarker, Paragraph, ParagraphFormat, Run,
    Table, TableBorders, TableCell, TableRow, TocEntry,
};
pub use role::Role;
