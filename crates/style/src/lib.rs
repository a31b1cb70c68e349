//! The fixed visual identity: role styles, the keyword vocabulary the
//! heuristics consult, page geometry, and the stylesheet emitted with every
//! HTML report.
pub mod css;
pub mod font;
pub mod identity;
pub mod page;
pub mod vocabulary;

pub use css::{IMAGE_MARGIN_PX, IMAGE_MAX_HEIGHT_PX};
pub use font::{FontFamily, FontWeight};
pub use identity::{HighlightStyle, IdentityTable, ListStyle, Palette, TableStyle, TextStyle};
pub use page::{PageGeometry, cm_to_twips, mm_to_px, pt_to_px};
