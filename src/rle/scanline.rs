//! Scanline decoder: executes compression orders against one scanline's
//! write window plus the previous scanline for context.
//!
//! This is the hard core of the codec (spec.md §1, §4.2). Every order is
//! checked against `end_of_scanline` — the byte offset one past the last
//! pixel of the scanline currently being written — rather than against the
//! whole destination buffer, so a malformed stream that declares a run
//! longer than the scanline cannot bleed its write into the next row. This
//! tightens the teacher's original bounds discipline, which checked writes
//! only against the full remaining destination buffer.

use super::bounds::{ensure_readable, ensure_writable_within_scanline};
use super::cursor::{Buf, BufMut};
use super::depth::DepthMode;
use super::opcode::Code;
use super::RleError;

/// Foreground register state threaded across scanlines within a tile
/// (spec.md §3 "Decoder state").
pub(crate) struct DecoderState<Mode: DepthMode> {
    pub(crate) fg_pel: Mode::Pixel,
}

impl<Mode: DepthMode> DecoderState<Mode> {
    pub(crate) fn new() -> Self {
        Self { fg_pel: Mode::WHITE_PIXEL }
    }
}

/// Whether a scanline finished because its write window filled up, or
/// because the input ran out first.
///
/// The reference decoder drives its single decode loop purely off input
/// exhaustion (`while !src.eof()`), checked before starting the next order —
/// not off the destination being full. A stream that ends between orders,
/// before every scanline has been written, is therefore not an error: the
/// remainder of the (pre-zeroed) destination is simply left untouched. The
/// tile driver in [`crate::rle::tile`] relies on this variant to stop
/// cleanly in that case instead of treating it as `Truncated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanlineOutcome {
    Completed,
    InputExhausted,
}

/// Decodes orders until the write cursor reaches `end_of_scanline` or the
/// input is exhausted.
///
/// `row_delta` is the scanline stride in bytes; it is only consulted to
/// locate the previous scanline and is ignored (never read) when
/// `is_first_line` is true, per spec.md invariant 3.
#[allow(clippy::too_many_arguments)]
pub(crate) fn decode_scanline<Mode: DepthMode>(
    src: &mut Buf<'_>,
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    row_delta: usize,
    is_first_line: bool,
    state: &mut DecoderState<Mode>,
) -> Result<ScanlineOutcome, RleError> {
    while dst.pos < end_of_scanline {
        if src.eof() {
            return Ok(ScanlineOutcome::InputExhausted);
        }

        ensure_readable(src, 1)?;
        let header = src.read_u8();

        let code = Code::decode(header);
        let run_length = code.extract_run_length(header, src)?;

        if code == Code::REGULAR_BG_RUN || code == Code::MEGA_MEGA_BG_RUN {
            decode_bg_run::<Mode>(dst, end_of_scanline, row_delta, is_first_line, run_length)?;
            continue;
        }

        if code == Code::REGULAR_FG_RUN
            || code == Code::MEGA_MEGA_FG_RUN
            || code == Code::LITE_SET_FG_FG_RUN
            || code == Code::MEGA_MEGA_SET_FG_RUN
        {
            decode_fg_run::<Mode>(src, dst, end_of_scanline, row_delta, is_first_line, code, run_length, state)?;
        } else if code == Code::LITE_DITHERED_RUN || code == Code::MEGA_MEGA_DITHERED_RUN {
            decode_dithered_run::<Mode>(src, dst, end_of_scanline, run_length)?;
        } else if code == Code::REGULAR_COLOR_RUN || code == Code::MEGA_MEGA_COLOR_RUN {
            decode_color_run::<Mode>(src, dst, end_of_scanline, run_length)?;
        } else if code == Code::REGULAR_FGBG_IMAGE
            || code == Code::MEGA_MEGA_FGBG_IMAGE
            || code == Code::LITE_SET_FG_FGBG_IMAGE
            || code == Code::MEGA_MEGA_SET_FGBG_IMAGE
        {
            decode_fgbg_image::<Mode>(src, dst, end_of_scanline, row_delta, is_first_line, code, run_length, state)?;
        } else if code == Code::REGULAR_COLOR_IMAGE || code == Code::MEGA_MEGA_COLOR_IMAGE {
            decode_color_image::<Mode>(src, dst, end_of_scanline, run_length)?;
        } else if code == Code::SPECIAL_FGBG_1 {
            const MASK_SPECIAL_FG_BG_1: u8 = 0x03;
            write_fgbg_cells::<Mode>(dst, end_of_scanline, row_delta, is_first_line, MASK_SPECIAL_FG_BG_1, state.fg_pel, 8)?;
        } else if code == Code::SPECIAL_FGBG_2 {
            const MASK_SPECIAL_FG_BG_2: u8 = 0x05;
            write_fgbg_cells::<Mode>(dst, end_of_scanline, row_delta, is_first_line, MASK_SPECIAL_FG_BG_2, state.fg_pel, 8)?;
        } else if code == Code::SPECIAL_WHITE {
            ensure_writable_within_scanline(dst, end_of_scanline, Mode::COLOR_DEPTH)?;
            Mode::write_pixel(dst, Mode::WHITE_PIXEL);
        } else if code == Code::SPECIAL_BLACK {
            ensure_writable_within_scanline(dst, end_of_scanline, Mode::COLOR_DEPTH)?;
            Mode::write_pixel(dst, Mode::BLACK_PIXEL);
        } else {
            return Err(RleError::BadOrderCode);
        }
    }

    Ok(ScanlineOutcome::Completed)
}

/// Writes `length` pixels per spec.md §4.2's unconditional `BG_RUN`
/// definition: `BLACK` on the first scanline, the unchanged pixel directly
/// above otherwise. No exception for a preceding `BG_RUN` on the same
/// scanline — consecutive background runs simply repeat this.
fn decode_bg_run<Mode: DepthMode>(
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    row_delta: usize,
    is_first_line: bool,
    run_length: usize,
) -> Result<(), RleError> {
    ensure_writable_within_scanline(dst, end_of_scanline, run_length * Mode::COLOR_DEPTH)?;

    if is_first_line {
        for _ in 0..run_length {
            Mode::write_pixel(dst, Mode::BLACK_PIXEL);
        }
    } else {
        for _ in 0..run_length {
            let pixel_above = dst.read_pixel_above::<Mode>(row_delta);
            Mode::write_pixel(dst, pixel_above);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn decode_fg_run<Mode: DepthMode>(
    src: &mut Buf<'_>,
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    row_delta: usize,
    is_first_line: bool,
    code: Code,
    run_length: usize,
    state: &mut DecoderState<Mode>,
) -> Result<(), RleError> {
    if code == Code::LITE_SET_FG_FG_RUN || code == Code::MEGA_MEGA_SET_FG_RUN {
        ensure_readable(src, Mode::COLOR_DEPTH)?;
        state.fg_pel = Mode::read_pixel(src);
    }

    ensure_writable_within_scanline(dst, end_of_scanline, run_length * Mode::COLOR_DEPTH)?;

    if is_first_line {
        for _ in 0..run_length {
            Mode::write_pixel(dst, state.fg_pel);
        }
    } else {
        for _ in 0..run_length {
            let pixel_above = dst.read_pixel_above::<Mode>(row_delta);
            Mode::write_pixel(dst, pixel_above ^ state.fg_pel);
        }
    }

    Ok(())
}

fn decode_dithered_run<Mode: DepthMode>(
    src: &mut Buf<'_>,
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    run_length: usize,
) -> Result<(), RleError> {
    ensure_readable(src, 2 * Mode::COLOR_DEPTH)?;
    let pixel_a = Mode::read_pixel(src);
    let pixel_b = Mode::read_pixel(src);

    ensure_writable_within_scanline(dst, end_of_scanline, run_length * 2 * Mode::COLOR_DEPTH)?;

    for _ in 0..run_length {
        Mode::write_pixel(dst, pixel_a);
        Mode::write_pixel(dst, pixel_b);
    }

    Ok(())
}

fn decode_color_run<Mode: DepthMode>(
    src: &mut Buf<'_>,
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    run_length: usize,
) -> Result<(), RleError> {
    ensure_readable(src, Mode::COLOR_DEPTH)?;
    let pixel = Mode::read_pixel(src);

    ensure_writable_within_scanline(dst, end_of_scanline, run_length * Mode::COLOR_DEPTH)?;

    for _ in 0..run_length {
        Mode::write_pixel(dst, pixel);
    }

    Ok(())
}

fn decode_color_image<Mode: DepthMode>(
    src: &mut Buf<'_>,
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    run_length: usize,
) -> Result<(), RleError> {
    let byte_count = run_length * Mode::COLOR_DEPTH;

    ensure_readable(src, byte_count)?;
    ensure_writable_within_scanline(dst, end_of_scanline, byte_count)?;

    for _ in 0..byte_count {
        dst.write_u8(src.read_u8());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn decode_fgbg_image<Mode: DepthMode>(
    src: &mut Buf<'_>,
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    row_delta: usize,
    is_first_line: bool,
    code: Code,
    run_length: usize,
    state: &mut DecoderState<Mode>,
) -> Result<(), RleError> {
    if code == Code::LITE_SET_FG_FGBG_IMAGE || code == Code::MEGA_MEGA_SET_FGBG_IMAGE {
        ensure_readable(src, Mode::COLOR_DEPTH)?;
        state.fg_pel = Mode::read_pixel(src);
    }

    let mut number_to_read = run_length;

    while number_to_read > 0 {
        let c_bits = std::cmp::min(8, number_to_read);

        ensure_readable(src, 1)?;
        let bitmask = src.read_u8();

        write_fgbg_cells::<Mode>(dst, end_of_scanline, row_delta, is_first_line, bitmask, state.fg_pel, c_bits)?;

        number_to_read -= c_bits;
    }

    Ok(())
}

/// Writes up to 8 pixels from one FGBG mask byte. Bit *i* (LSB first)
/// selects foreground (current foreground XOR background) when set, or
/// background (the previous-scanline pixel, or BLACK on the first scanline)
/// when clear.
#[allow(clippy::too_many_arguments)]
fn write_fgbg_cells<Mode: DepthMode>(
    dst: &mut BufMut<'_>,
    end_of_scanline: usize,
    row_delta: usize,
    is_first_line: bool,
    bitmask: u8,
    fg_pel: Mode::Pixel,
    c_bits: usize,
) -> Result<(), RleError> {
    ensure_writable_within_scanline(dst, end_of_scanline, c_bits * Mode::COLOR_DEPTH)?;

    let mut mask = 0x01u8;

    for _ in 0..c_bits {
        let background = if is_first_line {
            Mode::BLACK_PIXEL
        } else {
            dst.read_pixel_above::<Mode>(row_delta)
        };

        if bitmask & mask != 0 {
            Mode::write_pixel(dst, background ^ fg_pel);
        } else {
            Mode::write_pixel(dst, background);
        }

        mask <<= 1;
    }

    Ok(())
}
