//! Tile driver: iterates scanlines top-to-bottom, flipping between the
//! "first scanline" and "subsequent scanline" code paths (spec.md §4.3).

use super::cursor::{Buf, BufMut};
use super::depth::DepthMode;
use super::scanline::{decode_scanline, DecoderState, ScanlineOutcome};
use super::RleError;

/// Decodes one full tile into `dst`, which must already be sized to
/// `row_delta * height` bytes.
pub(crate) fn decode_tile<Mode: DepthMode>(src: &[u8], dst: &mut [u8], row_delta: usize, height: usize) -> Result<(), RleError> {
    let mut src = Buf::new(src);
    let mut dst = BufMut::new(dst);
    let mut state = DecoderState::<Mode>::new();

    for row in 0..height {
        let is_first_line = row == 0;
        let end_of_scanline = dst.pos + row_delta;

        let outcome = decode_scanline::<Mode>(&mut src, &mut dst, end_of_scanline, row_delta, is_first_line, &mut state)?;

        if outcome == ScanlineOutcome::InputExhausted {
            break;
        }
    }

    Ok(())
}
