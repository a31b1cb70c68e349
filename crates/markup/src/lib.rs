//! Turns classified blocks into output: restyled document formatting on one
//! path, HTML fragments on the other.
pub mod applier;
pub mod emitter;
pub mod escape;
pub mod fragment;
pub mod inline;
pub mod label;

pub use applier::StyleApplier;
pub use emitter::{
    EmitContext, Emission, Emitter, collect_toc, first_heading, image_fragment, table_fragment,
};
pub use escape::{escape_html, normalize_text, thin_space_numbers};
pub use fragment::{Fragment, ParagraphClass, SectionPosition};
pub use inline::Inline;
pub use label::{chapter_label, wants_label};
