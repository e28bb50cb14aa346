//! Packed-buffer to bitmap conversion.

use rayon::prelude::*;

use crate::bitmap::{Bitmap, PixelFormat};
use crate::convert::ConvertOptions;
use crate::error::{Error, Result};
use crate::pix::{packing, Color, Depth, PixBuffer};

/// Convert a packed pixel buffer into a freshly allocated bitmap with
/// equivalent visual content, using default options.
///
/// Indexed buffers emit an indexed bitmap with a copied palette (depth
/// 2 promotes to the 4-bit indexed format, indices preserved). Depth 32
/// emits direct color, dropping the alpha bytes when `include_alpha` is
/// false while preserving RGB. Depths 16, 8 and 1 without a palette
/// emit grayscale through the linear expansion. Palette-less depth 2
/// and 4 buffers have no bitmap representation and fail with
/// [`Error::UnsupportedDepth`].
pub fn to_bitmap(buffer: &PixBuffer, include_alpha: bool) -> Result<Bitmap> {
    to_bitmap_with_options(buffer, include_alpha, &ConvertOptions::default())
}

/// Convert a packed pixel buffer into a bitmap with explicit options.
pub fn to_bitmap_with_options(
    buffer: &PixBuffer,
    include_alpha: bool,
    options: &ConvertOptions,
) -> Result<Bitmap> {
    log::debug!(
        "to_bitmap: {}x{} depth {}, palette: {}, include_alpha: {}",
        buffer.width(),
        buffer.height(),
        buffer.depth().bits(),
        buffer.palette().is_some(),
        include_alpha
    );

    match (buffer.depth(), buffer.palette()) {
        (Depth::One, Some(_)) => emit_indexed(buffer, PixelFormat::Indexed1, options),
        (Depth::Two, Some(_)) | (Depth::Four, Some(_)) => {
            // No 2 bpp bitmap format exists; widen the indices.
            emit_indexed(buffer, PixelFormat::Indexed4, options)
        }
        (Depth::Eight, Some(_)) => emit_indexed(buffer, PixelFormat::Indexed8, options),
        (Depth::One, None) => emit_gray(buffer, options),
        (Depth::Eight, None) => emit_gray(buffer, options),
        (Depth::Sixteen, None) => emit_gray(buffer, options),
        (Depth::ThirtyTwo, None) => {
            let format = if include_alpha {
                PixelFormat::Bgra32
            } else {
                PixelFormat::Bgr24
            };
            emit_direct(buffer, format, options)
        }
        (depth, _) => Err(Error::UnsupportedDepth(depth.bits())),
    }
}

/// Run `op` over every (destination row, source row) pair, in parallel
/// when the options and image size call for it.
fn for_each_row<F>(bitmap: &mut Bitmap, buffer: &PixBuffer, parallel: bool, op: F) -> Result<()>
where
    F: Fn(&mut [u8], &[u32]) -> Result<()> + Sync,
{
    let stride = bitmap.stride();
    let wpl = buffer.words_per_line() as usize;
    if parallel {
        bitmap
            .data_mut()
            .par_chunks_mut(stride)
            .zip(buffer.data().par_chunks(wpl))
            .try_for_each(|(dst, src)| op(dst, src))
    } else {
        bitmap
            .data_mut()
            .chunks_mut(stride)
            .zip(buffer.data().chunks(wpl))
            .try_for_each(|(dst, src)| op(dst, src))
    }
}

fn emit_indexed(
    buffer: &PixBuffer,
    format: PixelFormat,
    options: &ConvertOptions,
) -> Result<Bitmap> {
    let depth = buffer.depth();
    let width = buffer.width() as usize;
    let mut bitmap = Bitmap::new(buffer.width(), buffer.height(), format)?;
    if let Some(palette) = buffer.palette() {
        bitmap.set_palette(palette.clone())?;
    }
    let parallel = options.use_parallel(buffer.height());
    match format {
        PixelFormat::Indexed1 => for_each_row(&mut bitmap, buffer, parallel, |dst, src| {
            for x in 0..width {
                let v = packing::get_pixel(src, x, depth) as u8;
                dst[x / 8] |= v << (7 - (x % 8));
            }
            Ok(())
        }),
        PixelFormat::Indexed4 => for_each_row(&mut bitmap, buffer, parallel, |dst, src| {
            for x in 0..width {
                let v = packing::get_pixel(src, x, depth) as u8;
                let shift = if x % 2 == 0 { 4 } else { 0 };
                dst[x / 2] |= v << shift;
            }
            Ok(())
        }),
        _ => for_each_row(&mut bitmap, buffer, parallel, |dst, src| {
            for x in 0..width {
                dst[x] = packing::get_pixel(src, x, depth) as u8;
            }
            Ok(())
        }),
    }?;
    Ok(bitmap)
}

/// Emit a grayscale bitmap, rescaling sub- and super-byte intensities
/// onto the 8-bit range.
fn emit_gray(buffer: &PixBuffer, options: &ConvertOptions) -> Result<Bitmap> {
    let depth = buffer.depth();
    let width = buffer.width() as usize;
    let mut bitmap = Bitmap::new(buffer.width(), buffer.height(), PixelFormat::Gray8)?;
    let parallel = options.use_parallel(buffer.height());
    for_each_row(&mut bitmap, buffer, parallel, |dst, src| {
        for x in 0..width {
            let v = packing::get_pixel(src, x, depth);
            dst[x] = Color::from_grayscale(v, depth.bits()).r;
        }
        Ok(())
    })?;
    Ok(bitmap)
}

fn emit_direct(
    buffer: &PixBuffer,
    format: PixelFormat,
    options: &ConvertOptions,
) -> Result<Bitmap> {
    let width = buffer.width() as usize;
    let bytes_per_pixel = format.bits_per_pixel() as usize / 8;
    let mut bitmap = Bitmap::new(buffer.width(), buffer.height(), format)?;
    let parallel = options.use_parallel(buffer.height());
    for_each_row(&mut bitmap, buffer, parallel, |dst, src| {
        for x in 0..width {
            let color = Color::from_rgba_word(src[x]);
            let off = x * bytes_per_pixel;
            dst[off] = color.b;
            dst[off + 1] = color.g;
            dst[off + 2] = color.r;
            if format == PixelFormat::Bgra32 {
                dst[off + 3] = color.a;
            }
        }
        Ok(())
    })?;
    Ok(bitmap)
}
