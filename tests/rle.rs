//! Integration tests against the public API, covering the concrete
//! byte-level scenarios and cross-cutting properties from spec.md §8.

use expect_test::expect;
use proptest::prelude::*;
use rdp_interleaved_rle::rle::{decompress_8_bpp, encoder::compress_8_bpp, RleError};
use rstest::rstest;

#[rstest]
#[case::color_image(&[0x84, 0xAA, 0xBB, 0xCC, 0xDD], 4, 1, &[0xAA, 0xBB, 0xCC, 0xDD])]
#[case::special_white_then_black(&[0xFD, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE], 8, 1, &[0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00])]
#[case::first_line_bg_run_is_black(&[0x04], 4, 1, &[0x00, 0x00, 0x00, 0x00])]
#[case::second_row_bg_run_copies_first(&[0x04, 0x04], 4, 2, &[0x00; 8])]
#[case::set_fg_run_exact_width(&[0xC8, 0x77], 8, 1, &[0x77; 8])]
fn decodes_spec_scenarios(#[case] src: &[u8], #[case] width: u16, #[case] height: u16, #[case] expected: &[u8]) {
    let mut out = Vec::new();
    decompress_8_bpp(src, &mut out, width, height).expect("decode should succeed");
    assert_eq!(out, expected);
}

#[test]
fn set_fg_run_overflows_on_ninth_pixel() {
    let mut out = Vec::new();
    let result = decompress_8_bpp(&[0xCA, 0x77], &mut out, 8u16, 1u16);
    assert!(matches!(result, Err(RleError::Overflow { .. })));
}

#[test]
fn truncated_extension_byte_is_rejected() {
    let mut out = Vec::new();
    let result = decompress_8_bpp(&[0x00], &mut out, 4u16, 1u16);
    assert_eq!(result, Err(RleError::Truncated { expected: 1, actual: 0 }));
}

/// A SET_FG_RUN establishes the foreground register; a later bare FG_RUN on
/// a following scanline reuses it rather than reverting to the default
/// (WHITE).
#[test]
fn foreground_register_persists_across_scanlines() {
    // Row 0: LITE_SET_FG_FG_RUN, length 4, foreground 0x55.
    // Row 1: REGULAR_FG_RUN, length 4 (no foreground byte): reuses 0x55.
    let src = [0xC4, 0x55, 0x24];
    let mut out = Vec::new();
    decompress_8_bpp(&src, &mut out, 4u16, 2u16).expect("decode should succeed");

    // Row 0 is all-foreground against a BLACK first scanline: 0x55 ^ 0x00.
    assert_eq!(&out[0..4], [0x55; 4]);
    // Row 1 XORs the persisted foreground against row 0's pixels.
    assert_eq!(&out[4..8], [0x00; 4]);
}

#[test]
fn single_row_full_width_bg_run_is_all_black_regardless_of_depth() {
    use rdp_interleaved_rle::rle::{decompress_15_bpp, decompress_16_bpp, decompress_24_bpp};

    let mut out8 = Vec::new();
    decompress_8_bpp(&[0x04], &mut out8, 4u16, 1u16).unwrap();
    assert_eq!(out8, [0x00; 4]);

    let mut out16 = Vec::new();
    decompress_16_bpp(&[0x04], &mut out16, 4u16, 1u16).unwrap();
    assert_eq!(out16, [0x00; 8]);

    let mut out15 = Vec::new();
    decompress_15_bpp(&[0x04], &mut out15, 4u16, 1u16).unwrap();
    assert_eq!(out15, [0x00; 8]);

    let mut out24 = Vec::new();
    decompress_24_bpp(&[0x04], &mut out24, 4u16, 1u16).unwrap();
    assert_eq!(out24, [0x00; 12]);
}

#[rstest]
#[case::flat(8, 4, vec![0x11u8; 8 * 4])]
#[case::stripes(16, 2, (0..16 * 2).map(|i| if i % 2 == 0 { 0xAA } else { 0x55 }).collect())]
fn round_trips_through_the_public_api(#[case] width: usize, #[case] height: usize, #[case] pixels: Vec<u8>) {
    let mut compressed = Vec::new();
    compress_8_bpp(&pixels, &mut compressed, width, height).unwrap();

    let mut decompressed = Vec::new();
    decompress_8_bpp(&compressed, &mut decompressed, width, height).unwrap();

    assert_eq!(decompressed, pixels);
}

#[test]
fn unsupported_depth_debug_shape() {
    let mut out = Vec::new();
    let result = decompress_8_bpp(&[0x00], &mut out, 4u16, 1u16);
    expect![[r#"
        Err(
            Truncated {
                expected: 1,
                actual: 0,
            },
        )
    "#]]
    .assert_debug_eq(&result);
}

fn tile_pixels() -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
    (1..16usize, 1..16usize).prop_flat_map(|(w, h)| {
        let width = w * 4;
        prop::collection::vec(any::<u8>(), width * h).prop_map(move |pixels| (width, h, pixels))
    })
}

proptest! {
    /// Any tile the encoder can compress, the decoder restores byte-for-byte
    /// (spec.md §8 "Round-trip").
    #[test]
    fn compress_then_decompress_is_identity((width, height, pixels) in tile_pixels()) {
        let mut compressed = Vec::new();
        compress_8_bpp(&pixels, &mut compressed, width, height).unwrap();

        let mut decompressed = Vec::new();
        decompress_8_bpp(&compressed, &mut decompressed, width, height).unwrap();

        prop_assert_eq!(decompressed, pixels);
    }

    /// No declared geometry and no byte string can make the decoder read
    /// past the input it was given or panic (spec.md §8 "Bounds safety").
    #[test]
    fn decompress_never_panics_on_arbitrary_input(
        src in prop::collection::vec(any::<u8>(), 0..64),
        width in 1..64u16,
        height in 1..64u16,
    ) {
        let mut out = Vec::new();
        let _ = decompress_8_bpp(&src, &mut out, width, height);
    }
}
