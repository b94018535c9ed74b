//! Composition of a decoded tile into a destination framebuffer: vertical
//! flip, stride adaptation, offsetting, clipping, and 8-bpp palette lookup.
//!
//! spec.md §1 calls this "format conversion between the decoder's native
//! scanline layout and the caller's destination surface" and treats it as an
//! external collaborator, out of scope for the core decoder in [`crate::rle`].
//! spec.md §6 nonetheless specifies the full decompress/compress operation
//! signature including this surface-level plumbing, so a complete crate
//! still carries a thin implementation of it. It is grounded in
//! `ironrdp-session::image::DecodedImage::apply_rgb16_bitmap` /
//! `apply_rgb24_bitmap`, which decode a tile then blit it with a reversed
//! row iterator (the wire's bottom-up orientation), and in `apply_tile`'s
//! clipping against a destination rectangle.

use thiserror::Error;
use tracing::{trace, warn};

use crate::context::BitmapCodecContext;
use crate::rle::{self, RleError, RlePixelFormat};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("RLE decode failed: {0}")]
    Decode(#[from] RleError),

    #[error("destination offset ({x_dst}, {y_dst}) plus tile size ({width}x{height}) exceeds destination clipping bounds ({dst_width}x{dst_height})")]
    OutOfBounds {
        x_dst: usize,
        y_dst: usize,
        width: usize,
        height: usize,
        dst_width: usize,
        dst_height: usize,
    },

    #[error("8-bpp tile decoded without a palette")]
    MissingPalette,
}

/// An RGB24 color lookup table for palette-indexed (8-bpp) tiles.
pub type Palette = [[u8; 3]; 256];

/// Decompresses `src` into a tile-sized scratch buffer (reusing `ctx`'s
/// scratch allocation) and composites it into `dst`, a destination
/// framebuffer of `dst_stride` bytes per row, RGB24 pixels, at offset
/// `(x_dst, y_dst)`, clipped to `(dst_width, dst_height)`.
///
/// The tile is written vertically flipped — its first decoded scanline
/// lands in the bottom-most destination row it occupies — matching the
/// on-the-wire orientation used by the protocol (spec.md §6).
#[allow(clippy::too_many_arguments)]
pub fn decompress_tile_to_surface(
    ctx: &mut BitmapCodecContext,
    src: &[u8],
    width: usize,
    height: usize,
    bpp: usize,
    palette: Option<&Palette>,
    dst: &mut [u8],
    dst_stride: usize,
    x_dst: usize,
    y_dst: usize,
    dst_width: usize,
    dst_height: usize,
) -> Result<(), SurfaceError> {
    if x_dst + width > dst_width || y_dst + height > dst_height {
        return Err(SurfaceError::OutOfBounds {
            x_dst,
            y_dst,
            width,
            height,
            dst_width,
            dst_height,
        });
    }

    let tile = ctx.scratch_vec();
    let format = rle::decompress(src, tile, width, height, bpp).inspect_err(|err| {
        warn!(%err, bpp, width, height, "invalid RLE-compressed bitmap tile");
    })?;

    trace!(?format, width, height, "decoded RLE bitmap tile");

    let src_bytes_per_pixel = match format {
        RlePixelFormat::Rgb24 => 3,
        RlePixelFormat::Rgb16 | RlePixelFormat::Rgb15 => 2,
        RlePixelFormat::Rgb8 => 1,
    };

    match format {
        RlePixelFormat::Rgb8 => {
            let palette = palette.ok_or(SurfaceError::MissingPalette)?;
            blit_indexed_flipped(tile, width, height, palette, dst, dst_stride, x_dst, y_dst);
        }
        RlePixelFormat::Rgb24 => {
            blit_flipped(tile, width, height, src_bytes_per_pixel, dst, dst_stride, 3, x_dst, y_dst);
        }
        RlePixelFormat::Rgb16 | RlePixelFormat::Rgb15 => {
            // Native 16-bit samples are copied through untouched; expanding
            // 5-5-5/5-6-5 samples to RGB24 is the color-space conversion
            // spec.md §1 excludes from the core codec's scope, so the
            // destination's bytes-per-pixel must match here (2), which the
            // caller selects by sizing `dst`/`dst_stride` accordingly.
            blit_flipped(tile, width, height, src_bytes_per_pixel, dst, dst_stride, src_bytes_per_pixel, x_dst, y_dst);
        }
    }

    Ok(())
}

/// Copies `tile` (native `src_bpp`-byte pixels, top scanline first) into
/// `dst` bottom-up: the tile's first row lands at destination row
/// `y_dst + height - 1`.
#[allow(clippy::too_many_arguments)]
fn blit_flipped(
    tile: &[u8],
    width: usize,
    height: usize,
    src_bpp: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_bpp: usize,
    x_dst: usize,
    y_dst: usize,
) {
    let row_bytes = width * src_bpp;

    for (row_idx, row) in tile.chunks_exact(row_bytes).enumerate() {
        let dst_row = y_dst + height - 1 - row_idx;
        let dst_start = dst_row * dst_stride + x_dst * dst_bpp;
        dst[dst_start..dst_start + row_bytes].copy_from_slice(row);
    }
}

/// Same flip as [`blit_flipped`], but expands each 8-bpp palette index to an
/// RGB24 triple via `palette` as it copies.
fn blit_indexed_flipped(
    tile: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
    dst: &mut [u8],
    dst_stride: usize,
    x_dst: usize,
    y_dst: usize,
) {
    const DST_BPP: usize = 3;

    for (row_idx, row) in tile.chunks_exact(width).enumerate() {
        let dst_row = y_dst + height - 1 - row_idx;
        let dst_start = dst_row * dst_stride + x_dst * DST_BPP;

        for (col, &index) in row.iter().enumerate() {
            let rgb = palette[usize::from(index)];
            let px_start = dst_start + col * DST_BPP;
            dst[px_start..px_start + DST_BPP].copy_from_slice(&rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_tile_into_destination_bottom_up() {
        let mut ctx = BitmapCodecContext::new(false);

        // REGULAR_COLOR_IMAGE, length 2, 24 bpp: row 0 = [01 02 03] [04 05 06],
        // row 1 = [07 08 09] [0A 0B 0C].
        #[rustfmt::skip]
        let src = [
            0x82, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06,
            0x82, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C,
        ];
        let mut dst = vec![0u8; 2 * 2 * 3];

        decompress_tile_to_surface(&mut ctx, &src, 2, 2, 24, None, &mut dst, 6, 0, 0, 2, 2).unwrap();

        // Row 0 of the tile lands in the bottom destination row.
        assert_eq!(&dst[0..6], [0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C]);
        assert_eq!(&dst[6..12], [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    }

    #[test]
    fn expands_8bpp_palette_indices_to_rgb24() {
        let mut ctx = BitmapCodecContext::new(false);

        // REGULAR_COLOR_IMAGE, length 2, 8 bpp: row 0 = [0x01, 0x02], row 1 = [0x03, 0x04].
        let src = [0x82, 0x01, 0x02, 0x82, 0x03, 0x04];
        let mut dst = vec![0u8; 2 * 2 * 3];

        decompress_tile_to_surface(&mut ctx, &src, 2, 2, 8, Some(&identity_palette()), &mut dst, 6, 0, 0, 2, 2).unwrap();

        // Row 0 of the tile ([0x01, 0x02]) lands in the bottom destination row,
        // each index expanded to its identity-palette RGB24 triple.
        assert_eq!(&dst[0..6], [0x03, 0x03, 0x03, 0x04, 0x04, 0x04]);
        assert_eq!(&dst[6..12], [0x01, 0x01, 0x01, 0x02, 0x02, 0x02]);
    }

    #[test]
    fn rejects_out_of_bounds_placement() {
        let mut ctx = BitmapCodecContext::new(false);
        let src = [0x82, 0x01, 0x02];
        let mut dst = vec![0u8; 6];

        let result = decompress_tile_to_surface(&mut ctx, &src, 2, 1, 8, Some(&identity_palette()), &mut dst, 6, 1, 0, 2, 1);
        assert!(matches!(result, Err(SurfaceError::OutOfBounds { .. })));
    }

    fn identity_palette() -> Palette {
        let mut palette = [[0u8; 3]; 256];
        for (i, entry) in palette.iter_mut().enumerate() {
            *entry = [i as u8, i as u8, i as u8];
        }
        palette
    }
}
