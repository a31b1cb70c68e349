//! Block sources for the conversion pipeline.
//!
//! This crate provides the `BlockSource` trait and the implementations that
//! feed document blocks, in original order, into classification.
//!
//! ## Available Sources
//!
//! - `VecBlockSource`: In-memory vector of blocks
//! - `DocxPackage`: A WordprocessingML package read fully into memory
//!
//! ## Example
//!
//! ```ignore
//! use docstage_source::{BlockSource, DocxPackage};
//!
//! let package = DocxPackage::open("report.docx")?;
//! let mut source = package.block_source()?;
//!
//! while let Some(block) = source.next() {
//!     println!("Processing: {:?}", block);
//! }
//! ```

pub mod docx;
pub mod error;

pub use docx::{DocxPackage, MediaPart};
pub use error::SourceError;

use docstage_types::Block;

/// A trait for sources that yield document blocks in original order.
pub trait BlockSource {
    /// Get the next block, if available.
    ///
    /// Returns `None` when the source is exhausted.
    fn next(&mut self) -> Option<Block>;

    /// Hint about the total number of blocks (for progress reporting).
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Drain every remaining block. Classification needs whole-document
    /// lookahead (the table of contents), so the pipeline reads everything up front.
    fn collect_blocks(&mut self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.size_hint().unwrap_or(0));
        while let Some(block) = self.next() {
            blocks.push(block);
        }
        blocks
    }
}

/// A block source backed by an in-memory vector.
pub struct VecBlockSource {
    blocks: std::vec::IntoIter<Block>,
    len: usize,
}

impl VecBlockSource {
    pub fn new(blocks: Vec<Block>) -> Self {
        let len = blocks.len();
        Self { blocks: blocks.into_iter(), len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of blocks remaining.
    pub fn remaining(&self) -> usize {
        self.blocks.len()
    }
}

impl BlockSource for VecBlockSource {
    fn next(&mut self) -> Option<Block> {
        self.blocks.next()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl BlockSource for Box<dyn BlockSource> {
    fn next(&mut self) -> Option<Block> {
        (**self).next()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}
