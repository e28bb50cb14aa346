//! Bit-level pixel packing within word-addressed rows.
//!
//! The native image library stores every row as an array of 32-bit words
//! with pixels packed from the most significant end of each word. These
//! primitives read and write a single `depth`-bit field at column `x`
//! without any knowledge of image semantics; the converters compose them
//! with the color model to move whole images.

use crate::error::{Error, Result};
use crate::pix::Depth;

/// Read the pixel value at column `x` from a row of packed words.
///
/// Packing is MSB-first within each word, matching the native library's
/// historical convention: at depth 4 the first pixel of a row occupies
/// bits 31..28 of the first word.
///
/// # Panics
///
/// Panics if `x` addresses a word past the end of `row` (caller
/// programming error, same as any slice overrun).
#[inline]
pub fn get_pixel(row: &[u32], x: usize, depth: Depth) -> u32 {
    let bits = depth.bits();
    if bits == 32 {
        return row[x];
    }
    let per_word = (32 / bits) as usize;
    let word = row[x / per_word];
    let shift = 32 - bits * ((x % per_word) as u32 + 1);
    (word >> shift) & depth.max_value()
}

/// Write `value` into the pixel at column `x` of a row of packed words.
///
/// Clears the `depth`-bit window [`get_pixel`] reads at the same
/// position, then ORs the value in. Fails with [`Error::ValueOutOfRange`]
/// when `value` does not fit in `depth` bits; the row is untouched in
/// that case.
#[inline]
pub fn set_pixel(row: &mut [u32], x: usize, depth: Depth, value: u32) -> Result<()> {
    let bits = depth.bits();
    if bits == 32 {
        row[x] = value;
        return Ok(());
    }
    if value > depth.max_value() {
        return Err(Error::ValueOutOfRange { value, depth: bits });
    }
    let per_word = (32 / bits) as usize;
    let shift = 32 - bits * ((x % per_word) as u32 + 1);
    let word = &mut row[x / per_word];
    *word = (*word & !(depth.max_value() << shift)) | (value << shift);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth1_msb_first() {
        let mut row = [0u32; 2];
        set_pixel(&mut row, 0, Depth::One, 1).unwrap();
        assert_eq!(row[0], 0x8000_0000);
        set_pixel(&mut row, 31, Depth::One, 1).unwrap();
        assert_eq!(row[0], 0x8000_0001);
        set_pixel(&mut row, 32, Depth::One, 1).unwrap();
        assert_eq!(row[1], 0x8000_0000);
        assert_eq!(get_pixel(&row, 0, Depth::One), 1);
        assert_eq!(get_pixel(&row, 1, Depth::One), 0);
        assert_eq!(get_pixel(&row, 31, Depth::One), 1);
    }

    #[test]
    fn test_depth4_positions() {
        let mut row = [0u32; 1];
        set_pixel(&mut row, 0, Depth::Four, 0xA).unwrap();
        set_pixel(&mut row, 1, Depth::Four, 0x5).unwrap();
        set_pixel(&mut row, 7, Depth::Four, 0xF).unwrap();
        assert_eq!(row[0], 0xA500_000F);
        assert_eq!(get_pixel(&row, 0, Depth::Four), 0xA);
        assert_eq!(get_pixel(&row, 1, Depth::Four), 0x5);
        assert_eq!(get_pixel(&row, 7, Depth::Four), 0xF);
    }

    #[test]
    fn test_depth32_is_word_indexed() {
        let mut row = [0u32; 3];
        set_pixel(&mut row, 2, Depth::ThirtyTwo, 0xDEAD_BEEF).unwrap();
        assert_eq!(row[2], 0xDEAD_BEEF);
        assert_eq!(get_pixel(&row, 2, Depth::ThirtyTwo), 0xDEAD_BEEF);
    }

    #[test]
    fn test_set_rejects_wide_value() {
        let mut row = [0u32; 1];
        let err = set_pixel(&mut row, 0, Depth::Two, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::ValueOutOfRange { value: 4, depth: 2 }
        ));
        // Row untouched on failure.
        assert_eq!(row[0], 0);
    }

    #[test]
    fn test_overwrite_clears_old_bits() {
        let mut row = [0u32; 1];
        set_pixel(&mut row, 3, Depth::Eight, 0xFF).unwrap();
        set_pixel(&mut row, 3, Depth::Eight, 0x01).unwrap();
        assert_eq!(get_pixel(&row, 3, Depth::Eight), 0x01);
        // Neighbors unaffected.
        assert_eq!(get_pixel(&row, 2, Depth::Eight), 0);
    }

    #[test]
    fn test_write_read_idempotence_all_depths() {
        // Non-power-of-two dimensions exercise end-of-row padding.
        let width = 59usize;
        let height = 53usize;
        for depth in [
            Depth::One,
            Depth::Two,
            Depth::Four,
            Depth::Eight,
            Depth::Sixteen,
            Depth::ThirtyTwo,
        ] {
            let wpl = (width as u32 * depth.bits()).div_ceil(32) as usize;
            let mut data = vec![0u32; wpl * height];
            let modulus = depth.max_value() as u64 + 1;
            for y in 0..height {
                let row = &mut data[y * wpl..(y + 1) * wpl];
                for x in 0..width {
                    let v = (((y * width + x) as u64) % modulus) as u32;
                    set_pixel(row, x, depth, v).unwrap();
                }
            }
            for y in 0..height {
                let row = &data[y * wpl..(y + 1) * wpl];
                for x in 0..width {
                    let v = (((y * width + x) as u64) % modulus) as u32;
                    assert_eq!(
                        get_pixel(row, x, depth),
                        v,
                        "depth {} at ({}, {})",
                        depth.bits(),
                        x,
                        y
                    );
                }
            }
        }
    }
}
