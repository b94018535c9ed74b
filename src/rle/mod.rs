//! Interleaved Run-Length Encoding (RLE) Bitmap Codec
//!
//! ### References
//!
//! - Microsoft Learn:
//!   - [RLE_BITMAP_STREAM](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-rdpbcgr/b3b60873-16a8-4cbc-8aaa-5f0a93083280)
//!   - [Pseudo-code](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-rdpbcgr/b6a3f5c2-0804-4c10-9d25-a321720fd23e)
//!
//! - FreeRDP:
//!   - [interleaved.c](https://github.com/FreeRDP/FreeRDP/blob/master/libfreerdp/codec/interleaved.c)
//!   - [bitmap.c](https://github.com/FreeRDP/FreeRDP/blob/master/libfreerdp/codec/include/bitmap.c)
//!
//! This module is organized as four cooperating components:
//!
//! - [`opcode`]: lead-byte classification and run-length extraction.
//! - [`depth`]: the per-pixel-depth capability set the other components are
//!   generic over (8/15/16/24 bpp).
//! - [`scanline`]: executes orders against one scanline's write window.
//! - [`tile`]: drives the per-scanline loop over a whole tile.
//! - [`encoder`]: the reverse direction, producing a compressed stream.

mod bounds;
mod cursor;
mod depth;
pub mod encoder;
mod opcode;
mod scanline;
mod tile;

use depth::{Mode15Bpp, Mode16Bpp, Mode24Bpp, Mode8Bpp, DepthMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RlePixelFormat {
    Rgb24,
    Rgb16,
    Rgb15,
    Rgb8,
}

/// Failure causes for `decompress*`, reducible to the four-way taxonomy of
/// spec.md §7: truncated input, output overflow, unsupported depth, and bad
/// order codes (a malformed-stream variant the taxonomy folds into
/// "truncated/overflow" territory but which is distinct enough to report on
/// its own).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleError {
    /// Requested bits-per-pixel is not one of 8/15/16/24.
    UnsupportedDepth { bpp: usize },
    /// Lead byte did not match any known order.
    BadOrderCode,
    /// An order needed more input bytes than remained.
    Truncated { expected: usize, actual: usize },
    /// An order would have written past the end of the current scanline.
    Overflow {
        additional_required: usize,
        additional_available: usize,
    },
    /// `width` or `height` is zero.
    EmptyImage,
    /// A MEGA/MEGA order declared a zero-length run, which is never valid.
    UnexpectedZeroLength,
}

impl core::fmt::Display for RleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RleError::UnsupportedDepth { bpp } => write!(f, "unsupported bits per pixel: {bpp}"),
            RleError::BadOrderCode => write!(f, "bad RLE order code"),
            RleError::Truncated { expected, actual } => {
                write!(f, "truncated input: expected {expected} more bytes, but {actual} remain")
            }
            RleError::Overflow {
                additional_required,
                additional_available,
            } => {
                write!(
                    f,
                    "scanline overflow: order requires {additional_required} more bytes, \
                     but only {additional_available} remain in the current scanline"
                )
            }
            RleError::EmptyImage => write!(f, "width or height is zero"),
            RleError::UnexpectedZeroLength => write!(f, "unexpected zero-length run in a MEGA order"),
        }
    }
}

impl std::error::Error for RleError {}

/// Decompresses an RLE-compressed bitmap tile.
///
/// `src`: compressed input. `dst`: resized and filled with
/// `width * height * bytes_per_pixel` bytes on success. `width`, `height`:
/// tile dimensions, each at most 64 per spec.md §1 (not itself enforced
/// here; the caller is expected to have validated the advertised tile size).
/// `bpp`: one of 8, 15, 16, 24.
pub fn decompress(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: impl Into<usize>,
    height: impl Into<usize>,
    bpp: impl Into<usize>,
) -> Result<RlePixelFormat, RleError> {
    match bpp.into() {
        Mode24Bpp::BPP => decompress_24_bpp(src, dst, width, height),
        Mode16Bpp::BPP => decompress_16_bpp(src, dst, width, height),
        Mode15Bpp::BPP => decompress_15_bpp(src, dst, width, height),
        Mode8Bpp::BPP => decompress_8_bpp(src, dst, width, height),
        invalid => Err(RleError::UnsupportedDepth { bpp: invalid }),
    }
}

/// Decompresses a 24-bpp RLE compressed bitmap.
pub fn decompress_24_bpp(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: impl Into<usize>,
    height: impl Into<usize>,
) -> Result<RlePixelFormat, RleError> {
    decompress_helper::<Mode24Bpp>(src, dst, width.into(), height.into())
}

/// Decompresses a 16-bpp RLE compressed bitmap.
pub fn decompress_16_bpp(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: impl Into<usize>,
    height: impl Into<usize>,
) -> Result<RlePixelFormat, RleError> {
    decompress_helper::<Mode16Bpp>(src, dst, width.into(), height.into())
}

/// Decompresses a 15-bpp RLE compressed bitmap.
pub fn decompress_15_bpp(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: impl Into<usize>,
    height: impl Into<usize>,
) -> Result<RlePixelFormat, RleError> {
    decompress_helper::<Mode15Bpp>(src, dst, width.into(), height.into())
}

/// Decompresses an 8-bpp RLE compressed bitmap.
pub fn decompress_8_bpp(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: impl Into<usize>,
    height: impl Into<usize>,
) -> Result<RlePixelFormat, RleError> {
    decompress_helper::<Mode8Bpp>(src, dst, width.into(), height.into())
}

fn decompress_helper<Mode: DepthMode>(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: usize,
    height: usize,
) -> Result<RlePixelFormat, RleError> {
    if width == 0 || height == 0 {
        return Err(RleError::EmptyImage);
    }

    let row_delta = Mode::COLOR_DEPTH * width;
    dst.resize(row_delta * height, 0);
    tile::decode_tile::<Mode>(src, dst, row_delta, height)?;

    Ok(Mode::PIXEL_FORMAT)
}

pub(crate) fn bytes_per_pixel(bpp: usize) -> Option<usize> {
    match bpp {
        Mode24Bpp::BPP => Some(Mode24Bpp::COLOR_DEPTH),
        Mode16Bpp::BPP | Mode15Bpp::BPP => Some(Mode16Bpp::COLOR_DEPTH),
        Mode8Bpp::BPP => Some(Mode8Bpp::COLOR_DEPTH),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_depth() {
        let mut dst = Vec::new();
        let result = decompress(&[], &mut dst, 4u8, 4u8, 17u8);
        assert_eq!(result, Err(RleError::UnsupportedDepth { bpp: 17 }));
    }

    #[test]
    fn rejects_empty_dimensions() {
        let mut dst = Vec::new();
        assert_eq!(
            decompress_8_bpp(&[], &mut dst, 0u8, 4u8),
            Err(RleError::EmptyImage)
        );
        assert_eq!(
            decompress_8_bpp(&[], &mut dst, 4u8, 0u8),
            Err(RleError::EmptyImage)
        );
    }
}
