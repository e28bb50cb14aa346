//! Color representation and channel conversion.
//!
//! The one bit-exact interchange format here is the packed RGBA word:
//! red in the most significant byte, alpha in the least. It is the
//! native library's in-memory direct-color pixel representation and
//! crosses the native boundary unchanged, so the byte order must never
//! be touched.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Create an opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Expand a grayscale pixel value at the given bit depth to an
    /// opaque 8-bit gray color.
    ///
    /// The rescale is linear with the maximum value at the source depth
    /// mapping exactly to 255: `round(value * 255 / (2^bits - 1))`.
    pub fn from_grayscale(value: u32, bits: u32) -> Self {
        debug_assert!(bits >= 1 && bits <= 16);
        let max = (1u32 << bits) - 1;
        let v = ((value as u64 * 255 + (max as u64 / 2)) / max as u64) as u8;
        Self::rgb(v, v, v)
    }

    /// Pack into the native 32-bit RGBA word: R in the most significant
    /// byte, A in the least.
    pub const fn to_rgba_word(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    /// Unpack a native 32-bit RGBA word.
    pub const fn from_rgba_word(word: u32) -> Self {
        Self {
            r: (word >> 24) as u8,
            g: (word >> 16) as u8,
            b: (word >> 8) as u8,
            a: word as u8,
        }
    }

    /// Expand a 5-5-5 direct-color pixel (R in bits 14..10, G in 9..5,
    /// B in 4..0) to an opaque RGBA color.
    pub const fn from_rgb555(pixel: u16) -> Self {
        Self {
            r: expand5((pixel >> 10) & 0x1F),
            g: expand5((pixel >> 5) & 0x1F),
            b: expand5(pixel & 0x1F),
            a: 255,
        }
    }

    /// Expand a 5-6-5 direct-color pixel (R in bits 15..11, G in 10..5,
    /// B in 4..0) to an opaque RGBA color.
    pub const fn from_rgb565(pixel: u16) -> Self {
        Self {
            r: expand5((pixel >> 11) & 0x1F),
            g: expand6((pixel >> 5) & 0x3F),
            b: expand5(pixel & 0x1F),
            a: 255,
        }
    }
}

// Multiply-and-shift channel widening so the maximum field value maps to
// 255 rather than the 248 a plain left-shift would give.
const fn expand5(v: u16) -> u8 {
    ((v as u32 * 255 + 15) / 31) as u8
}

const fn expand6(v: u16) -> u8 {
    ((v as u32 * 255 + 31) / 63) as u8
}
