//! Tile encoder (C4 — spec.md §4.4).
//!
//! The wire format's decompression semantics are fully pinned down by
//! [`super::scanline`]; the compressor's order-selection heuristic is
//! explicitly left unspecified by spec.md beyond "any encoder whose output
//! the decoder restores to the original pixels is conformant". This
//! implementation only ever emits `COLOR_RUN` and `COLOR_IMAGE` orders: both
//! are stateless with respect to the previous scanline and to the
//! foreground register, so round-trip correctness never depends on the
//! encoder reasoning about cross-scanline or cross-order decoder state. This
//! trades away the background-run and dithering compression ratio a
//! production compressor would chase for a heuristic that is
//! straightforward to get right without running the encoder through the
//! decoder to check.

use thiserror::Error;

use super::depth::{DepthMode, Mode15Bpp, Mode16Bpp, Mode24Bpp, Mode8Bpp};
use super::RlePixelFormat;

/// Minimum run length before a `COLOR_RUN` is preferred over folding the
/// pixels into the surrounding literal `COLOR_IMAGE` run. Below this, the
/// 1-3 byte order header costs more than the bytes it would save.
const MIN_COLOR_RUN: usize = 3;

const MAX_TILE_SIDE: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RleEncodeError {
    #[error("unsupported bits per pixel: {bpp}")]
    UnsupportedDepth { bpp: usize },

    #[error("unsupported tile geometry: {width}x{height} (width must be a multiple of 4, and both dimensions at most {MAX_TILE_SIDE})")]
    UnsupportedGeometry { width: usize, height: usize },
}

/// Compresses a raw tile into the interleaved RLE wire format.
///
/// `src` must contain exactly `width * height * bytes_per_pixel(bpp)` bytes,
/// in the same native top-to-bottom scanline order `decompress` produces.
pub fn compress(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: usize,
    height: usize,
    bpp: usize,
) -> Result<RlePixelFormat, RleEncodeError> {
    match bpp {
        Mode24Bpp::BPP => compress_24_bpp(src, dst, width, height),
        Mode16Bpp::BPP => compress_16_bpp(src, dst, width, height),
        Mode15Bpp::BPP => compress_15_bpp(src, dst, width, height),
        Mode8Bpp::BPP => compress_8_bpp(src, dst, width, height),
        invalid => Err(RleEncodeError::UnsupportedDepth { bpp: invalid }),
    }
}

pub fn compress_24_bpp(src: &[u8], dst: &mut Vec<u8>, width: usize, height: usize) -> Result<RlePixelFormat, RleEncodeError> {
    compress_helper::<Mode24Bpp>(src, dst, width, height)
}

pub fn compress_16_bpp(src: &[u8], dst: &mut Vec<u8>, width: usize, height: usize) -> Result<RlePixelFormat, RleEncodeError> {
    compress_helper::<Mode16Bpp>(src, dst, width, height)
}

pub fn compress_15_bpp(src: &[u8], dst: &mut Vec<u8>, width: usize, height: usize) -> Result<RlePixelFormat, RleEncodeError> {
    compress_helper::<Mode15Bpp>(src, dst, width, height)
}

pub fn compress_8_bpp(src: &[u8], dst: &mut Vec<u8>, width: usize, height: usize) -> Result<RlePixelFormat, RleEncodeError> {
    compress_helper::<Mode8Bpp>(src, dst, width, height)
}

fn compress_helper<Mode: DepthMode>(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: usize,
    height: usize,
) -> Result<RlePixelFormat, RleEncodeError> {
    if width == 0 || height == 0 || width % 4 != 0 || width > MAX_TILE_SIDE || height > MAX_TILE_SIDE {
        return Err(RleEncodeError::UnsupportedGeometry { width, height });
    }

    dst.clear();

    let row_delta = Mode::COLOR_DEPTH * width;
    for row in src.chunks_exact(row_delta) {
        compress_scanline::<Mode>(row, width, dst);
    }

    Ok(Mode::PIXEL_FORMAT)
}

fn compress_scanline<Mode: DepthMode>(row: &[u8], width: usize, dst: &mut Vec<u8>) {
    let pixel_at = |i: usize| -> &[u8] { &row[i * Mode::COLOR_DEPTH..(i + 1) * Mode::COLOR_DEPTH] };

    let mut pos = 0;
    while pos < width {
        let run_len = run_length_at(row, width, pos, Mode::COLOR_DEPTH);

        if run_len >= MIN_COLOR_RUN {
            write_regular_or_mega(dst, RegularOpcode::ColorRun, MegaOpcode::ColorRun, run_len);
            dst.extend_from_slice(pixel_at(pos));
            pos += run_len;
        } else {
            let literal_len = literal_run_length(row, width, pos, Mode::COLOR_DEPTH);
            write_regular_or_mega(dst, RegularOpcode::ColorImage, MegaOpcode::ColorImage, literal_len);
            dst.extend_from_slice(&row[pos * Mode::COLOR_DEPTH..(pos + literal_len) * Mode::COLOR_DEPTH]);
            pos += literal_len;
        }
    }
}

/// Length of the run of identical pixels starting at `pos`.
fn run_length_at(row: &[u8], width: usize, pos: usize, bpp: usize) -> usize {
    let first = &row[pos * bpp..(pos + 1) * bpp];
    let mut len = 1;
    while pos + len < width && &row[(pos + len) * bpp..(pos + len + 1) * bpp] == first {
        len += 1;
    }
    len
}

/// Length of a literal (non-run) stretch starting at `pos`: extends until a
/// run of at least `MIN_COLOR_RUN` identical pixels is found, or the
/// scanline ends.
fn literal_run_length(row: &[u8], width: usize, pos: usize, bpp: usize) -> usize {
    let mut len = 1;
    while pos + len < width {
        if run_length_at(row, width, pos + len, bpp) >= MIN_COLOR_RUN {
            break;
        }
        len += 1;
    }
    len
}

#[derive(Clone, Copy)]
enum RegularOpcode {
    ColorRun,
    ColorImage,
}

impl RegularOpcode {
    const fn value(self) -> u8 {
        match self {
            RegularOpcode::ColorRun => 0x03,
            RegularOpcode::ColorImage => 0x04,
        }
    }
}

#[derive(Clone, Copy)]
enum MegaOpcode {
    ColorRun,
    ColorImage,
}

impl MegaOpcode {
    const fn value(self) -> u8 {
        match self {
            MegaOpcode::ColorRun => 0xF3,
            MegaOpcode::ColorImage => 0xF4,
        }
    }
}

/// Writes the header for a REGULAR-form order, falling back to its
/// MEGA/MEGA counterpart once the length no longer fits the
/// inline-or-single-extension-byte scheme (spec.md §4.1).
fn write_regular_or_mega(dst: &mut Vec<u8>, regular: RegularOpcode, mega: MegaOpcode, length: usize) {
    if (1..=31).contains(&length) {
        dst.push((regular.value() << 5) | (length as u8));
    } else if (32..=287).contains(&length) {
        dst.push(regular.value() << 5);
        dst.push((length - 32) as u8);
    } else {
        dst.push(mega.value());
        dst.extend_from_slice(&(length as u16).to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rle::decompress_8_bpp;

    #[test]
    fn rejects_width_not_multiple_of_four() {
        let mut dst = Vec::new();
        let result = compress_8_bpp(&[0; 3], &mut dst, 3, 1);
        assert_eq!(result, Err(RleEncodeError::UnsupportedGeometry { width: 3, height: 1 }));
    }

    #[test]
    fn rejects_oversized_tile() {
        let mut dst = Vec::new();
        let result = compress_8_bpp(&[0; 4], &mut dst, 4, 65);
        assert_eq!(result, Err(RleEncodeError::UnsupportedGeometry { width: 4, height: 65 }));
    }

    #[test]
    fn round_trips_a_flat_tile() {
        let width = 8;
        let height = 4;
        let src = vec![0x42u8; width * height];

        let mut compressed = Vec::new();
        compress_8_bpp(&src, &mut compressed, width, height).unwrap();

        let mut decompressed = Vec::new();
        decompress_8_bpp(&compressed, &mut decompressed, width, height).unwrap();

        assert_eq!(decompressed, src);
    }

    #[test]
    fn round_trips_noise() {
        let width = 16;
        let height = 8;
        let src: Vec<u8> = (0..width * height).map(|i| ((i * 37 + 11) % 256) as u8).collect();

        let mut compressed = Vec::new();
        compress_8_bpp(&src, &mut compressed, width, height).unwrap();

        let mut decompressed = Vec::new();
        decompress_8_bpp(&compressed, &mut decompressed, width, height).unwrap();

        assert_eq!(decompressed, src);
    }

    #[test]
    fn round_trips_24_bpp_gradient() {
        use crate::rle::decompress_24_bpp;

        let width = 4;
        let height = 4;
        let mut src = Vec::with_capacity(width * height * 3);
        for i in 0..width * height {
            src.extend_from_slice(&[(i % 256) as u8, ((i * 2) % 256) as u8, ((i * 3) % 256) as u8]);
        }

        let mut compressed = Vec::new();
        compress_24_bpp(&src, &mut compressed, width, height).unwrap();

        let mut decompressed = Vec::new();
        decompress_24_bpp(&compressed, &mut decompressed, width, height).unwrap();

        assert_eq!(decompressed, src);
    }
}
