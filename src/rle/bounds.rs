//! Shared bounds-check helpers.
//!
//! Every order in [`crate::rle::scanline`] calls one of these before it reads
//! from the input or writes to the output, per spec invariants: a read of
//! `N` bytes confirms `input_cursor + N <= end_of_input`, and a write of `K`
//! pixels confirms `current_scanline_cursor + K * bytes_per_pixel <=
//! end_of_scanline`.

use super::cursor::{Buf, BufMut};
use super::RleError;

pub(crate) fn ensure_readable(src: &Buf<'_>, size: usize) -> Result<(), RleError> {
    let actual = src.remaining_len();
    if size > actual {
        return Err(RleError::Truncated { expected: size, actual });
    }
    Ok(())
}

/// Checks that `size` more bytes can be written before `end_of_scanline`,
/// the write-window boundary a single order may never cross.
pub(crate) fn ensure_writable_within_scanline(dst: &BufMut<'_>, end_of_scanline: usize, size: usize) -> Result<(), RleError> {
    let additional_available = end_of_scanline - dst.pos;
    if size > additional_available {
        return Err(RleError::Overflow {
            additional_required: size,
            additional_available,
        });
    }
    Ok(())
}
