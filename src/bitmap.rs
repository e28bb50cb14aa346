//! Byte-oriented bitmap descriptor.
//!
//! [`Bitmap`] models the managed-side image representation the binding
//! receives from application code: top-down rows of byte-aligned packed
//! pixels with a 4-byte-aligned stride, an optional palette for indexed
//! formats, and channel bytes stored in the order the format name
//! states. Multi-byte direct-color pixels (the 16-bit formats) are
//! little-endian within the row.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pix::{Color, ColorTable};

/// Pixel layout of a [`Bitmap`]. Names state the actual in-memory byte
/// order, least-addressed byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 1-bit palette indices, 8 pixels per byte, MSB first.
    Indexed1,
    /// 4-bit palette indices, 2 pixels per byte, high nibble first.
    Indexed4,
    /// 8-bit palette indices.
    Indexed8,
    /// 8-bit grayscale intensity, no palette.
    Gray8,
    /// 16-bit direct color, 5 bits per channel, bit 15 unused.
    Rgb555,
    /// 16-bit direct color, 5-6-5 bits per channel.
    Rgb565,
    /// 24-bit direct color, bytes B, G, R.
    Bgr24,
    /// 32-bit direct color, bytes B, G, R plus one padding byte.
    Bgr32,
    /// 32-bit direct color with alpha, bytes B, G, R, A.
    Bgra32,
}

impl PixelFormat {
    /// Bits occupied by one pixel.
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Indexed1 => 1,
            PixelFormat::Indexed4 => 4,
            PixelFormat::Indexed8 | PixelFormat::Gray8 => 8,
            PixelFormat::Rgb555 | PixelFormat::Rgb565 => 16,
            PixelFormat::Bgr24 => 24,
            PixelFormat::Bgr32 | PixelFormat::Bgra32 => 32,
        }
    }

    /// Whether pixel values are palette indices.
    pub const fn is_indexed(self) -> bool {
        matches!(
            self,
            PixelFormat::Indexed1 | PixelFormat::Indexed4 | PixelFormat::Indexed8
        )
    }

    /// Whether the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Bgra32)
    }
}

/// A byte-oriented image with top-down rows.
///
/// Invariants: `data.len() == stride * height` and
/// `stride >= ceil(width * bits_per_pixel / 8)`. Bytes past the pixel
/// span of a row are padding and are never interpreted as pixel data.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    palette: Option<ColorTable>,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zeroed bitmap with a 4-byte-aligned stride.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "bitmap dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let stride = ((width as usize * format.bits_per_pixel() as usize).div_ceil(32)) * 4;
        let data = vec![0u8; stride * height as usize];
        Ok(Self {
            width,
            height,
            format,
            stride,
            palette: None,
            data,
        })
    }

    /// Wrap existing pixel data, validating the stride/data invariants.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "bitmap dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let min_stride = (width as usize * format.bits_per_pixel() as usize).div_ceil(8);
        if stride < min_stride {
            return Err(Error::InvalidDimensions(format!(
                "stride {} is smaller than the {} bytes one row of pixels occupies",
                stride, min_stride
            )));
        }
        if data.len() != stride * height as usize {
            return Err(Error::InvalidDimensions(format!(
                "data length {} does not match stride {} x height {}",
                data.len(),
                stride,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            palette: None,
            data,
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

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row stride in bytes, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The attached palette, if any.
    pub fn palette(&self) -> Option<&ColorTable> {
        self.palette.as_ref()
    }

    /// Attach a palette. Only indexed formats accept one, and the table
    /// may not exceed the format's index space.
    pub fn set_palette(&mut self, palette: ColorTable) -> Result<()> {
        if !self.format.is_indexed() {
            return Err(Error::UnsupportedPixelFormat(format!(
                "{:?} does not take a palette",
                self.format
            )));
        }
        let capacity = 1usize << self.format.bits_per_pixel();
        if palette.len() > capacity {
            return Err(Error::IndexOutOfRange {
                index: palette.len() - 1,
                len: capacity,
            });
        }
        self.palette = Some(palette);
        Ok(())
    }

    /// The raw pixel bytes, rows concatenated top to bottom.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One row of pixel bytes, padding included.
    pub fn row(&self, y: u32) -> &[u8] {
        &self.data[y as usize * self.stride..(y as usize + 1) * self.stride]
    }

    /// One mutable row of pixel bytes, padding included.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride;
        &mut self.data[y as usize * stride..(y as usize + 1) * stride]
    }

    /// Read the palette index or gray value at `(x, y)`. Only valid for
    /// indexed and grayscale formats.
    pub fn index_at(&self, x: u32, y: u32) -> Result<u8> {
        let row = self.row(y);
        let x = x as usize;
        match self.format {
            PixelFormat::Indexed1 => Ok((row[x / 8] >> (7 - (x % 8))) & 1),
            PixelFormat::Indexed4 => {
                let byte = row[x / 2];
                Ok(if x % 2 == 0 { byte >> 4 } else { byte & 0x0F })
            }
            PixelFormat::Indexed8 | PixelFormat::Gray8 => Ok(row[x]),
            other => Err(Error::UnsupportedPixelFormat(format!(
                "{:?} pixels are not index values",
                other
            ))),
        }
    }

    /// Write a palette index or gray value at `(x, y)`. Only valid for
    /// indexed and grayscale formats; fails with
    /// [`Error::ValueOutOfRange`] when the value is wider than the
    /// format's pixel field.
    pub fn set_index(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        let format = self.format;
        let bits = format.bits_per_pixel();
        if bits < 8 && u32::from(value) > (1 << bits) - 1 {
            return Err(Error::ValueOutOfRange {
                value: u32::from(value),
                depth: bits,
            });
        }
        let row = self.row_mut(y);
        let x = x as usize;
        match format {
            PixelFormat::Indexed1 => {
                let shift = 7 - (x % 8);
                let byte = &mut row[x / 8];
                *byte = (*byte & !(1 << shift)) | (value << shift);
                Ok(())
            }
            PixelFormat::Indexed4 => {
                let byte = &mut row[x / 2];
                if x % 2 == 0 {
                    *byte = (*byte & 0x0F) | (value << 4);
                } else {
                    *byte = (*byte & 0xF0) | value;
                }
                Ok(())
            }
            PixelFormat::Indexed8 | PixelFormat::Gray8 => {
                row[x] = value;
                Ok(())
            }
            other => Err(Error::UnsupportedPixelFormat(format!(
                "{:?} pixels are not index values",
                other
            ))),
        }
    }

    /// Resolve the pixel at `(x, y)` to a color, going through the
    /// palette for indexed formats.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Color> {
        match self.format {
            PixelFormat::Indexed1 | PixelFormat::Indexed4 | PixelFormat::Indexed8 => {
                let index = self.index_at(x, y)? as usize;
                match &self.palette {
                    Some(table) => table.get(index),
                    None => Err(Error::UnsupportedPixelFormat(format!(
                        "{:?} bitmap has no palette",
                        self.format
                    ))),
                }
            }
            PixelFormat::Gray8 => {
                let v = self.index_at(x, y)?;
                Ok(Color::rgb(v, v, v))
            }
            PixelFormat::Rgb555 | PixelFormat::Rgb565 => {
                let row = self.row(y);
                let off = x as usize * 2;
                let pixel = u16::from_le_bytes([row[off], row[off + 1]]);
                Ok(if self.format == PixelFormat::Rgb555 {
                    Color::from_rgb555(pixel)
                } else {
                    Color::from_rgb565(pixel)
                })
            }
            PixelFormat::Bgr24 => {
                let row = self.row(y);
                let off = x as usize * 3;
                Ok(Color::rgb(row[off + 2], row[off + 1], row[off]))
            }
            PixelFormat::Bgr32 => {
                let row = self.row(y);
                let off = x as usize * 4;
                Ok(Color::rgb(row[off + 2], row[off + 1], row[off]))
            }
            PixelFormat::Bgra32 => {
                let row = self.row(y);
                let off = x as usize * 4;
                Ok(Color::rgba(row[off + 2], row[off + 1], row[off], row[off + 3]))
            }
        }
    }

    /// Write a direct-color pixel at `(x, y)`. Only valid for the BGR
    /// byte-order formats; indexed and 16-bit bitmaps are written
    /// through [`Bitmap::set_index`] or raw data access.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let format = self.format;
        let row = self.row_mut(y);
        match format {
            PixelFormat::Bgr24 => {
                let off = x as usize * 3;
                row[off] = color.b;
                row[off + 1] = color.g;
                row[off + 2] = color.r;
                Ok(())
            }
            PixelFormat::Bgr32 => {
                let off = x as usize * 4;
                row[off] = color.b;
                row[off + 1] = color.g;
                row[off + 2] = color.r;
                row[off + 3] = 0;
                Ok(())
            }
            PixelFormat::Bgra32 => {
                let off = x as usize * 4;
                row[off] = color.b;
                row[off + 1] = color.g;
                row[off + 2] = color.r;
                row[off + 3] = color.a;
                Ok(())
            }
            other => Err(Error::UnsupportedPixelFormat(format!(
                "{:?} pixels cannot be written as direct color",
                other
            ))),
        }
    }
}
