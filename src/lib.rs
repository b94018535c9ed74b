#![allow(clippy::arithmetic_side_effects)] // Bounds are checked explicitly before every read/write.
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

//! Interleaved Run-Length Encoding (RLE) bitmap codec for the Remote Desktop
//! Protocol, as specified by MS-RDPBCGR §2.2.9.1.1.3.1.2.4 and §3.1.9.
//!
//! The [`rle`] module contains the wire-level codec: a tagged-opcode byte
//! stream in, a raw scanline buffer out (and the reverse for encoding). The
//! [`context`] and [`surface`] modules are the ambient layer a caller
//! actually drives: a reusable scratch-buffer context, and composition of a
//! decoded tile into a destination framebuffer (vertical flip, stride,
//! clipping, palette).

pub mod context;
pub mod rle;
pub mod surface;
