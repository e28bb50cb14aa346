//! Bitmap to packed-buffer conversion.

use rayon::prelude::*;

use crate::bitmap::{Bitmap, PixelFormat};
use crate::convert::ConvertOptions;
use crate::error::{Error, Result};
use crate::pix::{packing, Color, Depth, PixBuffer};

/// Convert a bitmap into a freshly allocated packed pixel buffer with
/// equivalent visual content, using default options.
///
/// Indexed bitmaps copy their palette verbatim and repack indices
/// one-for-one; grayscale repacks without attaching a palette; the
/// 16-bit 555/565 formats and the BGR(A) formats expand to a depth-32
/// buffer of packed RGBA words, synthesizing alpha as 255 where the
/// source carries none.
pub fn to_pix_buffer(bitmap: &Bitmap) -> Result<PixBuffer> {
    to_pix_buffer_with_options(bitmap, &ConvertOptions::default())
}

/// Convert a bitmap into a packed pixel buffer with explicit options.
pub fn to_pix_buffer_with_options(bitmap: &Bitmap, options: &ConvertOptions) -> Result<PixBuffer> {
    log::debug!(
        "to_pix_buffer: {}x{} {:?}, stride {}",
        bitmap.width(),
        bitmap.height(),
        bitmap.format(),
        bitmap.stride()
    );

    match bitmap.format() {
        PixelFormat::Indexed1 => repack_indexed(bitmap, Depth::One, options),
        PixelFormat::Indexed4 => repack_indexed(bitmap, Depth::Four, options),
        PixelFormat::Indexed8 => repack_indexed(bitmap, Depth::Eight, options),
        PixelFormat::Gray8 => repack_gray(bitmap, options),
        PixelFormat::Rgb555 => expand_direct(bitmap, options, |row, off| {
            Color::from_rgb555(u16::from_le_bytes([row[off], row[off + 1]]))
        }),
        PixelFormat::Rgb565 => expand_direct(bitmap, options, |row, off| {
            Color::from_rgb565(u16::from_le_bytes([row[off], row[off + 1]]))
        }),
        PixelFormat::Bgr24 => expand_direct(bitmap, options, |row, off| {
            Color::rgb(row[off + 2], row[off + 1], row[off])
        }),
        PixelFormat::Bgr32 => expand_direct(bitmap, options, |row, off| {
            Color::rgb(row[off + 2], row[off + 1], row[off])
        }),
        PixelFormat::Bgra32 => expand_direct(bitmap, options, |row, off| {
            Color::rgba(row[off + 2], row[off + 1], row[off], row[off + 3])
        }),
    }
}

/// Run `op` over every (destination row, source row) pair, in parallel
/// when the options and image size call for it. Source rows keep their
/// padding bytes; `op` must only read the pixel span.
fn for_each_row<F>(buffer: &mut PixBuffer, bitmap: &Bitmap, parallel: bool, op: F) -> Result<()>
where
    F: Fn(&mut [u32], &[u8]) -> Result<()> + Sync,
{
    let wpl = buffer.words_per_line() as usize;
    let stride = bitmap.stride();
    if parallel {
        buffer
            .data_mut()
            .par_chunks_mut(wpl)
            .zip(bitmap.data().par_chunks(stride))
            .try_for_each(|(dst, src)| op(dst, src))
    } else {
        buffer
            .data_mut()
            .chunks_mut(wpl)
            .zip(bitmap.data().chunks(stride))
            .try_for_each(|(dst, src)| op(dst, src))
    }
}

/// Repack palette indices into a buffer of the same depth, copying the
/// palette verbatim. No color resampling happens on this path.
fn repack_indexed(bitmap: &Bitmap, depth: Depth, options: &ConvertOptions) -> Result<PixBuffer> {
    let palette = bitmap.palette().cloned().ok_or_else(|| {
        Error::UnsupportedPixelFormat(format!(
            "{:?} bitmap has no palette attached",
            bitmap.format()
        ))
    })?;
    let mut buffer = PixBuffer::new(bitmap.width(), bitmap.height(), depth)?;
    buffer.set_palette(palette)?;
    copy_indices(&mut buffer, bitmap, depth, options)?;
    Ok(buffer)
}

/// Repack grayscale bytes into a depth-8 buffer with no palette;
/// consumers interpret values through the grayscale expansion.
fn repack_gray(bitmap: &Bitmap, options: &ConvertOptions) -> Result<PixBuffer> {
    let mut buffer = PixBuffer::new(bitmap.width(), bitmap.height(), Depth::Eight)?;
    copy_indices(&mut buffer, bitmap, Depth::Eight, options)?;
    Ok(buffer)
}

fn copy_indices(
    buffer: &mut PixBuffer,
    bitmap: &Bitmap,
    depth: Depth,
    options: &ConvertOptions,
) -> Result<()> {
    let width = bitmap.width() as usize;
    let parallel = options.use_parallel(bitmap.height());
    match bitmap.format().bits_per_pixel() {
        1 => for_each_row(buffer, bitmap, parallel, |dst, src| {
            for x in 0..width {
                let v = (src[x / 8] >> (7 - (x % 8))) & 1;
                packing::set_pixel(dst, x, depth, u32::from(v))?;
            }
            Ok(())
        }),
        4 => for_each_row(buffer, bitmap, parallel, |dst, src| {
            for x in 0..width {
                let byte = src[x / 2];
                let v = if x % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                packing::set_pixel(dst, x, depth, u32::from(v))?;
            }
            Ok(())
        }),
        8 => for_each_row(buffer, bitmap, parallel, |dst, src| {
            for x in 0..width {
                packing::set_pixel(dst, x, depth, u32::from(src[x]))?;
            }
            Ok(())
        }),
        bits => Err(Error::UnsupportedPixelFormat(format!(
            "cannot repack {} bpp indices",
            bits
        ))),
    }
}

/// Expand a direct-color bitmap into a depth-32 buffer of packed RGBA
/// words. `read` resolves one pixel from a source row at a byte offset.
fn expand_direct<F>(bitmap: &Bitmap, options: &ConvertOptions, read: F) -> Result<PixBuffer>
where
    F: Fn(&[u8], usize) -> Color + Sync,
{
    let width = bitmap.width() as usize;
    let bytes_per_pixel = bitmap.format().bits_per_pixel() as usize / 8;
    let mut buffer = PixBuffer::new(bitmap.width(), bitmap.height(), Depth::ThirtyTwo)?;
    let parallel = options.use_parallel(bitmap.height());
    for_each_row(&mut buffer, bitmap, parallel, |dst, src| {
        for x in 0..width {
            dst[x] = read(src, x * bytes_per_pixel).to_rgba_word();
        }
        Ok(())
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::ColorTable;

    #[test]
    fn test_indexed_without_palette_fails() {
        let bmp = Bitmap::new(4, 4, PixelFormat::Indexed8).unwrap();
        assert!(matches!(
            to_pix_buffer(&bmp),
            Err(Error::UnsupportedPixelFormat(_))
        ));
    }

    #[test]
    fn test_indexed1_repack_copies_palette() {
        let mut bmp = Bitmap::new(9, 2, PixelFormat::Indexed1).unwrap();
        bmp.set_palette(ColorTable::binary()).unwrap();
        bmp.set_index(8, 0, 1).unwrap();
        bmp.set_index(0, 1, 1).unwrap();

        let buf = to_pix_buffer(&bmp).unwrap();
        assert_eq!(buf.depth(), Depth::One);
        assert_eq!(buf.palette().unwrap().len(), 2);
        assert_eq!(buf.pixel(8, 0), 1);
        assert_eq!(buf.pixel(0, 1), 1);
        assert_eq!(buf.pixel(0, 0), 0);
    }

    #[test]
    fn test_gray_repack_has_no_palette() {
        let mut bmp = Bitmap::new(3, 1, PixelFormat::Gray8).unwrap();
        bmp.set_index(1, 0, 200).unwrap();
        let buf = to_pix_buffer(&bmp).unwrap();
        assert_eq!(buf.depth(), Depth::Eight);
        assert!(buf.palette().is_none());
        assert_eq!(buf.pixel(1, 0), 200);
    }

    #[test]
    fn test_bgr24_synthesizes_alpha() {
        let mut bmp = Bitmap::new(2, 1, PixelFormat::Bgr24).unwrap();
        bmp.set_pixel(1, 0, Color::rgb(0x10, 0x20, 0x30)).unwrap();
        let buf = to_pix_buffer(&bmp).unwrap();
        assert_eq!(buf.depth(), Depth::ThirtyTwo);
        assert_eq!(buf.pixel(1, 0), 0x1020_30FF);
    }

    #[test]
    fn test_bgra32_preserves_alpha() {
        let mut bmp = Bitmap::new(1, 1, PixelFormat::Bgra32).unwrap();
        bmp.set_pixel(0, 0, Color::rgba(1, 2, 3, 0x80)).unwrap();
        let buf = to_pix_buffer(&bmp).unwrap();
        assert_eq!(buf.pixel(0, 0), 0x0102_0380);
    }

    #[test]
    fn test_rgb555_source_expands() {
        let mut bmp = Bitmap::new(1, 1, PixelFormat::Rgb555).unwrap();
        bmp.data_mut()[..2].copy_from_slice(&0x39ECu16.to_le_bytes());
        let buf = to_pix_buffer(&bmp).unwrap();
        assert_eq!(buf.pixel(0, 0), 0x737B_63FF);
    }

    #[test]
    fn test_source_stride_padding_skipped() {
        // Stride of 8 for a 5-pixel-wide gray row leaves 3 padding
        // bytes; fill them with junk and confirm they never surface.
        let mut data = vec![0xEEu8; 16];
        for x in 0..5 {
            data[x] = x as u8;
            data[8 + x] = 10 + x as u8;
        }
        let bmp = Bitmap::from_raw(5, 2, PixelFormat::Gray8, 8, data).unwrap();
        let buf = to_pix_buffer(&bmp).unwrap();
        for x in 0..5 {
            assert_eq!(buf.pixel(x, 0), u32::from(x as u8));
            assert_eq!(buf.pixel(x, 1), 10 + u32::from(x as u8));
        }
        // The padded tail of each destination row stays zero.
        assert_eq!(buf.row(0)[1] & 0x00FF_FFFF, 0);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let mut bmp = Bitmap::new(33, 80, PixelFormat::Bgra32).unwrap();
        for y in 0..80 {
            for x in 0..33 {
                let v = (x * 7 + y * 13) as u8;
                bmp.set_pixel(x, y, Color::rgba(v, v.wrapping_add(1), v, 255))
                    .unwrap();
            }
        }
        let parallel = to_pix_buffer(&bmp).unwrap();
        let sequential =
            to_pix_buffer_with_options(&bmp, &ConvertOptions::new().sequential()).unwrap();
        assert_eq!(parallel.data(), sequential.data());
    }
}
