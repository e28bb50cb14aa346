//! Packed pixel buffer types.
//!
//! [`PixBuffer`] is the crate's view of the native image library's pixel
//! representation: rows of 32-bit words with MSB-first packed pixels,
//! stride measured in words, and an optional indexed-color table for
//! depths of 8 bits and below.

mod color;
pub mod packing;

pub use color::Color;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bits used to represent one pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Depth {
    /// 1 bit per pixel (binary images).
    One,
    /// 2 bits per pixel.
    Two,
    /// 4 bits per pixel.
    Four,
    /// 8 bits per pixel.
    Eight,
    /// 16 bits per pixel.
    Sixteen,
    /// 32 bits per pixel (packed RGBA words).
    ThirtyTwo,
}

impl Depth {
    /// Number of bits per pixel.
    pub const fn bits(self) -> u32 {
        match self {
            Depth::One => 1,
            Depth::Two => 2,
            Depth::Four => 4,
            Depth::Eight => 8,
            Depth::Sixteen => 16,
            Depth::ThirtyTwo => 32,
        }
    }

    /// Largest pixel value representable at this depth.
    pub const fn max_value(self) -> u32 {
        match self {
            Depth::ThirtyTwo => u32::MAX,
            d => (1u32 << d.bits()) - 1,
        }
    }

    /// Map a bit count to a depth, failing for anything the native
    /// library cannot represent.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(Depth::One),
            2 => Ok(Depth::Two),
            4 => Ok(Depth::Four),
            8 => Ok(Depth::Eight),
            16 => Ok(Depth::Sixteen),
            32 => Ok(Depth::ThirtyTwo),
            other => Err(Error::UnsupportedDepth(other)),
        }
    }

    /// Whether a color table may be attached at this depth.
    pub const fn supports_palette(self) -> bool {
        self.bits() <= 8
    }
}

/// An indexed-color lookup table mapping small pixel values to RGBA
/// colors. Immutable once attached to a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTable {
    entries: Vec<Color>,
}

impl ColorTable {
    /// Create a color table from its entries.
    pub fn new(entries: Vec<Color>) -> Self {
        Self { entries }
    }

    /// Build the 2-entry black/white table used by binary images.
    pub fn binary() -> Self {
        Self::new(vec![Color::rgb(255, 255, 255), Color::rgb(0, 0, 0)])
    }

    /// Build a full 256-entry grayscale ramp.
    pub fn grayscale() -> Self {
        Self::new((0..=255).map(|v| Color::rgb(v, v, v)).collect())
    }

    /// Look up an entry, failing with [`Error::IndexOutOfRange`] past
    /// the end of the table.
    pub fn get(&self, index: usize) -> Result<Color> {
        self.entries.get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the table entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.entries.iter()
    }
}

/// A packed pixel buffer in the native library's layout.
///
/// Rows are padded up to a whole number of 32-bit words
/// (`wpl * 32 >= width * depth`), and `data.len() == wpl * height`.
/// The buffer is exclusively owned by its holder; nothing in this crate
/// retains references to it across calls.
#[derive(Debug, Clone)]
pub struct PixBuffer {
    width: u32,
    height: u32,
    depth: Depth,
    wpl: u32,
    data: Vec<u32>,
    palette: Option<ColorTable>,
}

impl PixBuffer {
    /// Allocate a zeroed buffer with the given dimensions and depth.
    pub fn new(width: u32, height: u32, depth: Depth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "buffer dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let wpl = (width as u64 * depth.bits() as u64).div_ceil(32) as u32;
        let data = vec![0u32; (wpl as usize) * (height as usize)];
        Ok(Self {
            width,
            height,
            depth,
            wpl,
            data,
            palette: None,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bits per pixel.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Words per line, including end-of-row padding.
    pub fn words_per_line(&self) -> u32 {
        self.wpl
    }

    /// The raw packed words, rows concatenated top to bottom.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutable access to the raw packed words.
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// The attached color table, if any.
    pub fn palette(&self) -> Option<&ColorTable> {
        self.palette.as_ref()
    }

    /// Attach a color table. Only meaningful at depths of 8 bits and
    /// below; tables larger than the depth can index are rejected.
    pub fn set_palette(&mut self, palette: ColorTable) -> Result<()> {
        if !self.depth.supports_palette() {
            return Err(Error::UnsupportedDepth(self.depth.bits()));
        }
        let capacity = self.depth.max_value() as usize + 1;
        if palette.len() > capacity {
            return Err(Error::IndexOutOfRange {
                index: palette.len() - 1,
                len: capacity,
            });
        }
        self.palette = Some(palette);
        Ok(())
    }

    /// One row of packed words.
    pub fn row(&self, y: u32) -> &[u32] {
        let wpl = self.wpl as usize;
        &self.data[y as usize * wpl..(y as usize + 1) * wpl]
    }

    /// One mutable row of packed words.
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let wpl = self.wpl as usize;
        &mut self.data[y as usize * wpl..(y as usize + 1) * wpl]
    }

    /// Read the raw pixel value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        packing::get_pixel(self.row(y), x as usize, self.depth)
    }

    /// Write the raw pixel value at `(x, y)`, failing with
    /// [`Error::ValueOutOfRange`] when the value is wider than the
    /// buffer depth.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> Result<()> {
        let depth = self.depth;
        packing::set_pixel(self.row_mut(y), x as usize, depth, value)
    }

    /// Resolve the pixel at `(x, y)` to a color.
    ///
    /// Indexed buffers go through the palette (and can fail with
    /// [`Error::IndexOutOfRange`] on a corrupt buffer/table pairing);
    /// depth 32 unpacks the RGBA word; everything else is grayscale.
    pub fn color_at(&self, x: u32, y: u32) -> Result<Color> {
        let value = self.pixel(x, y);
        match (&self.palette, self.depth) {
            (Some(table), _) => table.get(value as usize),
            (None, Depth::ThirtyTwo) => Ok(Color::from_rgba_word(value)),
            (None, depth) => Ok(Color::from_grayscale(value, depth.bits())),
        }
    }
}
