//! Bitmap / packed-buffer conversion.
//!
//! Two entry points translate between the byte-oriented [`Bitmap`]
//! descriptor and the native library's word-packed [`PixBuffer`]:
//!
//! - [`to_pix_buffer`] repacks a bitmap into a freshly allocated buffer,
//! - [`to_bitmap`] does the inverse, optionally dropping alpha.
//!
//! Conversions are all-or-nothing: inputs are validated before any
//! allocation, outputs are freshly allocated and owned by the caller,
//! and neither direction retains a reference to its input. Rows of
//! direct-color images convert in parallel unless disabled via
//! [`ConvertOptions`].
//!
//! [`Bitmap`]: crate::bitmap::Bitmap
//! [`PixBuffer`]: crate::pix::PixBuffer

mod to_bitmap;
mod to_buffer;

pub use to_bitmap::{to_bitmap, to_bitmap_with_options};
pub use to_buffer::{to_pix_buffer, to_pix_buffer_with_options};

/// Images shorter than this convert sequentially even when parallel
/// conversion is enabled; the fork/join overhead is not worth it.
pub(crate) const MIN_PARALLEL_ROWS: u32 = 64;

/// Options for pixel-format conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Convert rows in parallel for direct-color images.
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create options with defaults (parallel conversion enabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable parallel row conversion.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ConvertOptions {
    pub(crate) fn use_parallel(&self, height: u32) -> bool {
        self.parallel && height >= MIN_PARALLEL_ROWS
    }
}
