//! Compression order classification and run-length extraction (MS-RDPBCGR
//! §2.2.9.1.1.3.1.2.4).

use core::fmt;

use super::bounds::ensure_readable;
use super::cursor::Buf;
use super::RleError;

const MASK_REGULAR_RUN_LENGTH: u8 = 0x1F;
const MASK_LITE_RUN_LENGTH: u8 = 0x0F;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Code(u8);

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::REGULAR_BG_RUN => "REGULAR_BG_RUN",
            Self::REGULAR_FG_RUN => "REGULAR_FG_RUN",
            Self::REGULAR_COLOR_RUN => "REGULAR_COLOR_RUN",
            Self::REGULAR_FGBG_IMAGE => "REGULAR_FGBG_IMAGE",
            Self::REGULAR_COLOR_IMAGE => "REGULAR_COLOR_IMAGE",

            Self::MEGA_MEGA_BG_RUN => "MEGA_MEGA_BG_RUN",
            Self::MEGA_MEGA_FG_RUN => "MEGA_MEGA_FG_RUN",
            Self::MEGA_MEGA_SET_FG_RUN => "MEGA_MEGA_SET_FG_RUN",
            Self::MEGA_MEGA_DITHERED_RUN => "MEGA_MEGA_DITHERED_RUN",
            Self::MEGA_MEGA_COLOR_RUN => "MEGA_MEGA_COLOR_RUN",
            Self::MEGA_MEGA_FGBG_IMAGE => "MEGA_MEGA_FGBG_IMAGE",
            Self::MEGA_MEGA_SET_FGBG_IMAGE => "MEGA_MEGA_SET_FGBG_IMAGE",
            Self::MEGA_MEGA_COLOR_IMAGE => "MEGA_MEGA_COLOR_IMAGE",

            Self::LITE_SET_FG_FG_RUN => "LITE_SET_FG_FG_RUN",
            Self::LITE_DITHERED_RUN => "LITE_DITHERED_RUN",
            Self::LITE_SET_FG_FGBG_IMAGE => "LITE_SET_FG_FGBG_IMAGE",

            Self::SPECIAL_FGBG_1 => "SPECIAL_FGBG_1",
            Self::SPECIAL_FGBG_2 => "SPECIAL_FGBG_2",
            Self::SPECIAL_WHITE => "SPECIAL_WHITE",
            Self::SPECIAL_BLACK => "SPECIAL_BLACK",

            _ => "UNKNOWN",
        };

        write!(f, "Code(0x{:02X}-{name})", self.0)
    }
}

impl Code {
    pub(crate) const REGULAR_BG_RUN: Code = Code(0x00);
    pub(crate) const REGULAR_FG_RUN: Code = Code(0x01);
    pub(crate) const REGULAR_FGBG_IMAGE: Code = Code(0x02);
    pub(crate) const REGULAR_COLOR_RUN: Code = Code(0x03);
    pub(crate) const REGULAR_COLOR_IMAGE: Code = Code(0x04);

    pub(crate) const MEGA_MEGA_BG_RUN: Code = Code(0xF0);
    pub(crate) const MEGA_MEGA_FG_RUN: Code = Code(0xF1);
    pub(crate) const MEGA_MEGA_FGBG_IMAGE: Code = Code(0xF2);
    pub(crate) const MEGA_MEGA_COLOR_RUN: Code = Code(0xF3);
    pub(crate) const MEGA_MEGA_COLOR_IMAGE: Code = Code(0xF4);
    pub(crate) const MEGA_MEGA_SET_FG_RUN: Code = Code(0xF6);
    pub(crate) const MEGA_MEGA_SET_FGBG_IMAGE: Code = Code(0xF7);
    pub(crate) const MEGA_MEGA_DITHERED_RUN: Code = Code(0xF8);

    pub(crate) const LITE_SET_FG_FG_RUN: Code = Code(0x0C);
    pub(crate) const LITE_SET_FG_FGBG_IMAGE: Code = Code(0x0D);
    pub(crate) const LITE_DITHERED_RUN: Code = Code(0x0E);

    pub(crate) const SPECIAL_FGBG_1: Code = Code(0xF9);
    pub(crate) const SPECIAL_FGBG_2: Code = Code(0xFA);
    pub(crate) const SPECIAL_WHITE: Code = Code(0xFD);
    pub(crate) const SPECIAL_BLACK: Code = Code(0xFE);

    /// Classifies a lead byte into its order code (MS-RDPBCGR §2.2.9.1.1.3.1.2.4).
    pub(crate) fn decode(header: u8) -> Self {
        if (header & 0xC0) != 0xC0 {
            // REGULAR orders (000x xxxx .. 100x xxxx)
            Code(header >> 5)
        } else if (header & 0xF0) == 0xF0 {
            // MEGA and SPECIAL orders (0xF*)
            Code(header)
        } else {
            // LITE orders (1100 xxxx, 1101 xxxx, 1110 xxxx)
            Code(header >> 4)
        }
    }

    /// Extracts the run length of a compression order, reading extension
    /// bytes from `src` as needed.
    pub(crate) fn extract_run_length(self, header: u8, src: &mut Buf<'_>) -> Result<usize, RleError> {
        match self {
            Self::REGULAR_FGBG_IMAGE => extract_run_length_fg_bg(header, MASK_REGULAR_RUN_LENGTH, src),
            Self::LITE_SET_FG_FGBG_IMAGE => extract_run_length_fg_bg(header, MASK_LITE_RUN_LENGTH, src),

            Self::REGULAR_BG_RUN | Self::REGULAR_FG_RUN | Self::REGULAR_COLOR_RUN | Self::REGULAR_COLOR_IMAGE => {
                extract_run_length_regular(header, src)
            }

            Self::LITE_SET_FG_FG_RUN | Self::LITE_DITHERED_RUN => extract_run_length_lite(header, src),

            Self::MEGA_MEGA_BG_RUN
            | Self::MEGA_MEGA_FG_RUN
            | Self::MEGA_MEGA_SET_FG_RUN
            | Self::MEGA_MEGA_DITHERED_RUN
            | Self::MEGA_MEGA_COLOR_RUN
            | Self::MEGA_MEGA_FGBG_IMAGE
            | Self::MEGA_MEGA_SET_FGBG_IMAGE
            | Self::MEGA_MEGA_COLOR_IMAGE => extract_run_length_mega_mega(src),

            Self::SPECIAL_FGBG_1 | Self::SPECIAL_FGBG_2 | Self::SPECIAL_WHITE | Self::SPECIAL_BLACK => Ok(0),

            _ => Ok(0),
        }
    }
}

/// Run length of a Foreground/Background Image order: zero in the length
/// field means "read one extension byte, length = byte + 1" (a pixel count);
/// otherwise length = field * 8 (a cell count, 8 pixels per cell).
fn extract_run_length_fg_bg(header: u8, length_mask: u8, src: &mut Buf<'_>) -> Result<usize, RleError> {
    match header & length_mask {
        0 => {
            ensure_readable(src, 1)?;
            Ok(usize::from(src.read_u8()) + 1)
        }
        run_length => Ok(usize::from(run_length) * 8),
    }
}

/// Run length of a REGULAR-form order: zero in the 5-bit field means "read
/// one extension byte, length = byte + 32".
fn extract_run_length_regular(header: u8, src: &mut Buf<'_>) -> Result<usize, RleError> {
    match header & MASK_REGULAR_RUN_LENGTH {
        0 => {
            ensure_readable(src, 1)?;
            Ok(usize::from(src.read_u8()) + 32)
        }
        run_length => Ok(usize::from(run_length)),
    }
}

/// Run length of a LITE-form order: zero in the 4-bit field means "read one
/// extension byte, length = byte + 16".
fn extract_run_length_lite(header: u8, src: &mut Buf<'_>) -> Result<usize, RleError> {
    match header & MASK_LITE_RUN_LENGTH {
        0 => {
            ensure_readable(src, 1)?;
            Ok(usize::from(src.read_u8()) + 16)
        }
        run_length => Ok(usize::from(run_length)),
    }
}

/// Run length of a MEGA/MEGA order: an explicit 16-bit little-endian field,
/// never implicitly zero-extended (a zero value is itself malformed).
fn extract_run_length_mega_mega(src: &mut Buf<'_>) -> Result<usize, RleError> {
    ensure_readable(src, 2)?;

    let run_length = usize::from(src.read_u16());

    if run_length == 0 {
        Err(RleError::UnexpectedZeroLength)
    } else {
        Ok(run_length)
    }
}
