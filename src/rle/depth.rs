//! Per-depth pixel I/O capability set.
//!
//! Rather than generating three near-identical decoder bodies by textual
//! inclusion (the approach of the C reference this format comes from), the
//! control flow in [`crate::rle::scanline`] is written once and
//! monomorphized over this trait, one impl per supported depth.

use std::ops::BitXor;

use super::cursor::{Buf, BufMut};
use super::RlePixelFormat;

pub(crate) trait DepthMode {
    type Pixel: Copy + BitXor<Output = Self::Pixel>;

    /// Bytes per pixel at this depth.
    const COLOR_DEPTH: usize;

    /// Bits per pixel, as advertised on the wire.
    const BPP: usize;

    /// Pixel format reported to the caller on successful decode.
    const PIXEL_FORMAT: RlePixelFormat;

    const BLACK_PIXEL: Self::Pixel;
    const WHITE_PIXEL: Self::Pixel;

    fn write_pixel(dst: &mut BufMut<'_>, pixel: Self::Pixel);
    fn read_pixel(src: &mut Buf<'_>) -> Self::Pixel;
}

pub(crate) struct Mode8Bpp;

impl DepthMode for Mode8Bpp {
    type Pixel = u8;

    const COLOR_DEPTH: usize = 1;
    const BPP: usize = 8;
    const PIXEL_FORMAT: RlePixelFormat = RlePixelFormat::Rgb8;
    const BLACK_PIXEL: Self::Pixel = 0x00;
    const WHITE_PIXEL: Self::Pixel = 0xFF;

    fn write_pixel(dst: &mut BufMut<'_>, pixel: Self::Pixel) {
        dst.write_u8(pixel);
    }

    fn read_pixel(src: &mut Buf<'_>) -> Self::Pixel {
        src.read_u8()
    }
}

pub(crate) struct Mode15Bpp;

impl DepthMode for Mode15Bpp {
    type Pixel = u16;

    const COLOR_DEPTH: usize = 2;
    const BPP: usize = 15;
    const PIXEL_FORMAT: RlePixelFormat = RlePixelFormat::Rgb15;
    const BLACK_PIXEL: Self::Pixel = 0x0000;
    // 5 bits per RGB component: 0111 1111 1111 1111 (binary)
    const WHITE_PIXEL: Self::Pixel = 0x7FFF;

    fn write_pixel(dst: &mut BufMut<'_>, pixel: Self::Pixel) {
        dst.write_u16(pixel);
    }

    fn read_pixel(src: &mut Buf<'_>) -> Self::Pixel {
        src.read_u16()
    }
}

pub(crate) struct Mode16Bpp;

impl DepthMode for Mode16Bpp {
    type Pixel = u16;

    const COLOR_DEPTH: usize = 2;
    const BPP: usize = 16;
    const PIXEL_FORMAT: RlePixelFormat = RlePixelFormat::Rgb16;
    const BLACK_PIXEL: Self::Pixel = 0x0000;
    // 5 bits red, 6 bits green, 5 bits blue: 1111 1111 1111 1111 (binary)
    const WHITE_PIXEL: Self::Pixel = 0xFFFF;

    fn write_pixel(dst: &mut BufMut<'_>, pixel: Self::Pixel) {
        dst.write_u16(pixel);
    }

    fn read_pixel(src: &mut Buf<'_>) -> Self::Pixel {
        src.read_u16()
    }
}

pub(crate) struct Mode24Bpp;

impl DepthMode for Mode24Bpp {
    type Pixel = u32;

    const COLOR_DEPTH: usize = 3;
    const BPP: usize = 24;
    const PIXEL_FORMAT: RlePixelFormat = RlePixelFormat::Rgb24;
    const BLACK_PIXEL: Self::Pixel = 0x00_0000;
    const WHITE_PIXEL: Self::Pixel = 0xFF_FFFF;

    fn write_pixel(dst: &mut BufMut<'_>, pixel: Self::Pixel) {
        dst.write_u24(pixel);
    }

    fn read_pixel(src: &mut Buf<'_>) -> Self::Pixel {
        src.read_u24()
    }
}
