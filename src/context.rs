//! Context lifecycle (spec.md §5, §6).
//!
//! The per-call decoder/encoder state (foreground register, scanline
//! cursors) is purely stack-local, living inside [`crate::rle::tile`] for
//! the duration of a single `decompress`/`compress` call — spec.md §9
//! explicitly calls this out as something to preserve, not hoist into
//! long-lived state. What *is* long-lived is the scratch buffer a caller
//! reuses across many tiles instead of allocating fresh `Vec<u8>`s per call,
//! mirrored here on `BitmapCodecContext`. This mirrors the teacher's own
//! long-lived, reusable per-connection codec state (e.g.
//! `rdp6::bitmap_stream::BitmapStreamDecoder`, a `#[derive(Default)]` struct
//! reused across every bitmap update of a session) rather than any single
//! file in `rle.rs`, which has no context object at all.

const DEFAULT_TILE_SIDE: usize = 64;
const DEFAULT_BYTES_PER_PIXEL: usize = 4;
const SCRATCH_ALIGNMENT: usize = 16;

/// Owns the scratch buffer used by [`crate::surface`] when composing a
/// decoded tile into a destination framebuffer, so repeated tile decodes
/// reuse one allocation instead of allocating a fresh `Vec<u8>` per call.
///
/// Sized to a 16-byte multiple by convention so that, once populated, a
/// downstream SIMD surface copy can rely on a predictable stride; plain
/// `Vec<u8>` does not give a pointer-alignment guarantee, only a
/// size-rounding one, so a genuinely aligned allocator should replace this
/// if the destination copy routine ever needs one.
pub struct BitmapCodecContext {
    scratch: Vec<u8>,
    compressor: bool,
}

impl BitmapCodecContext {
    /// Creates a new context. `compressor` selects whether the caller
    /// intends to use this context for encoding (`true`) or decoding
    /// (`false`) — the scratch buffer itself is used identically either way,
    /// but callers that only ever decode can skip allocating an encoder
    /// working set elsewhere.
    pub fn new(compressor: bool) -> Self {
        let default_len = align_up(DEFAULT_TILE_SIDE * DEFAULT_TILE_SIDE * DEFAULT_BYTES_PER_PIXEL, SCRATCH_ALIGNMENT);

        Self {
            scratch: vec![0; default_len],
            compressor,
        }
    }

    /// Re-initializes the context in place without freeing the scratch
    /// allocation (spec.md §6 `context_reset`). Idempotent: calling this any
    /// number of times on a fresh context leaves it behaviorally identical
    /// to a freshly constructed one.
    pub fn reset(&mut self) {
        self.scratch.fill(0);
    }

    pub fn is_compressor(&self) -> bool {
        self.compressor
    }

    /// Returns a scratch buffer of at least `len` bytes, growing (and
    /// re-aligning) the backing allocation on demand.
    pub(crate) fn scratch_buffer(&mut self, len: usize) -> &mut [u8] {
        let aligned_len = align_up(len, SCRATCH_ALIGNMENT);
        if self.scratch.len() < aligned_len {
            self.scratch.resize(aligned_len, 0);
        }
        &mut self.scratch[..len]
    }

    /// Hands out the backing `Vec<u8>` directly, so a caller filling it via
    /// `decompress`'s `&mut Vec<u8>` output parameter reuses this context's
    /// allocation across tiles instead of allocating a fresh one per call.
    pub(crate) fn scratch_vec(&mut self) -> &mut Vec<u8> {
        &mut self.scratch
    }
}

// `context_free` has no Rust equivalent beyond `Drop`; nothing here owns
// non-memory resources, so the compiler-derived drop glue on `Vec<u8>` is
// the whole of it.

const fn align_up(len: usize, alignment: usize) -> usize {
    (len + alignment - 1) / alignment * alignment
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// `context_reset` applied any number of times to a fresh context
        /// leaves subsequent behavior identical to a fresh context (spec.md
        /// §8 "Idempotence of reset"): the scratch buffer always comes back
        /// zeroed and at least as large as it was grown to.
        #[test]
        fn reset_any_number_of_times_matches_a_fresh_context(resets in 0..8usize, grow_to in 0..4096usize) {
            let mut ctx = BitmapCodecContext::new(false);
            ctx.scratch_buffer(grow_to).fill(0xAA);

            for _ in 0..resets {
                ctx.reset();
            }

            prop_assert!(ctx.scratch_buffer(grow_to).iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ctx = BitmapCodecContext::new(false);
        ctx.scratch_buffer(256)[0] = 0xAA;
        ctx.reset();
        ctx.reset();
        assert!(ctx.scratch_buffer(256).iter().all(|&b| b == 0));
    }

    #[test]
    fn scratch_buffer_grows_on_demand() {
        let mut ctx = BitmapCodecContext::new(true);
        assert!(ctx.scratch_buffer(64 * 64 * 4).len() >= 64 * 64 * 4);
        let grown = ctx.scratch_buffer(1_000_000);
        assert!(grown.len() >= 1_000_000);
    }

    #[test]
    fn align_up_rounds_to_next_multiple() {
        assert_eq!(align_up(0, 16), 0);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(16, 16), 16);
        assert_eq!(align_up(17, 16), 32);
    }
}
