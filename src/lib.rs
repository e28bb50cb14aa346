//! # ocrbridge
//!
//! Pixel-format conversion and layout traversal core for bindings to a
//! native OCR engine and its companion image library.
//!
//! The crate does two things:
//!
//! - **Pixel conversion**: translate between a byte-oriented [`Bitmap`]
//!   descriptor (the managed-side image representation) and the native
//!   library's word-packed [`PixBuffer`], across 1/4/8/16/32-bit
//!   depths, with palette, grayscale, and RGBA semantics handled
//!   bit-exactly.
//! - **Layout traversal**: expose the engine's single flat result
//!   cursor as the nested Block → Paragraph → TextLine → Word → Symbol
//!   hierarchy of lazy, forward-only views.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ocrbridge::{to_pix_buffer, Bitmap, PixelFormat};
//!
//! fn main() -> ocrbridge::Result<()> {
//!     // An image handed over by application code.
//!     let bitmap = Bitmap::new(640, 480, PixelFormat::Bgra32)?;
//!
//!     // Repacked into the native library's representation.
//!     let buffer = to_pix_buffer(&bitmap)?;
//!     assert_eq!(buffer.depth().bits(), 32);
//!     Ok(())
//! }
//! ```
//!
//! Walking a recognized page (the `CursorBackend` comes from the host
//! binding's engine handle):
//!
//! ```no_run
//! use ocrbridge::layout::{get_layout, CursorBackend};
//!
//! fn dump<C: CursorBackend>(backend: C) {
//!     let mut blocks = get_layout(backend);
//!     while blocks.move_next() {
//!         println!("block: {:?}", blocks.text());
//!         let mut paragraphs = blocks.paragraphs();
//!         while paragraphs.move_next() {
//!             println!("  paragraph: {:?}", paragraphs.text());
//!         }
//!     }
//! }
//! ```
//!
//! ## Scope
//!
//! The OCR algorithm itself, engine configuration, dynamic loading of
//! the native libraries, and output-format rendering all live in the
//! host binding; this crate is the algorithmic core they share. The
//! traversal views are deliberately single-pass over one shared
//! cursor — see the [`layout`] module documentation for the caller
//! discipline this requires.

pub mod bitmap;
pub mod convert;
pub mod error;
pub mod layout;
pub mod pix;

// Re-export commonly used types
pub use bitmap::{Bitmap, PixelFormat};
pub use convert::{
    to_bitmap, to_bitmap_with_options, to_pix_buffer, to_pix_buffer_with_options, ConvertOptions,
};
pub use error::{Error, Result};
pub use layout::{
    get_layout, BlockType, BlocksView, CursorBackend, FontInfo, Level, ParagraphsView, Rect,
    SymbolsView, TextLinesView, WordsView,
};
pub use pix::{Color, ColorTable, Depth, PixBuffer};
