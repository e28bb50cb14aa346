//! Error types for the ocrbridge library.

use thiserror::Error;

/// Result type alias for ocrbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during pixel conversion and layout access.
#[derive(Error, Debug)]
pub enum Error {
    /// The bitmap pixel format (or format/palette combination) is not
    /// supported by any conversion path.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// The buffer depth is not one of 1, 2, 4, 8, 16, 32 bits, or the
    /// depth has no bitmap representation without a palette.
    #[error("Unsupported buffer depth: {0} bits per pixel")]
    UnsupportedDepth(u32),

    /// A palette lookup used an index past the end of the color table.
    /// Indicates a corrupt or mismatched buffer/table pairing.
    #[error("Palette index {index} is out of range (table has {len} entries)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of entries in the table.
        len: usize,
    },

    /// A pixel write carried a value wider than the buffer depth allows.
    #[error("Value {value} does not fit in {depth} bits")]
    ValueOutOfRange {
        /// The rejected value.
        value: u32,
        /// Bits available at the target depth.
        depth: u32,
    },

    /// Image dimensions or stride are inconsistent with the pixel data.
    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(String),
}
