// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # jfif-core
//!
//! Pure-Rust JPEG-style still-image codec. Raw 8-bit pixel rows, as stored
//! in an uncompressed bitmap, go through YCbCr conversion, 4:2:0 chroma
//! subsampling, 8×8 DCT, quantization against the standard JPEG tables,
//! zigzag reordering and per-plane Huffman coding. Decoding runs the same
//! stages backwards and yields an approximation of the input.
//!
//! The encoded form is not a JFIF file: it is three bit strings plus the
//! plane geometry ([`EncodedPlanes`]), and the Huffman code tables
//! ([`CodeTables`]) travel beside it as a separate value.
//!
//! Pixel bytes are B,G,R triples by default, the order bitmaps store; set
//! [`CodecOptions::pixel_order`] to [`PixelOrder::Rgb`] for R,G,B input.
//!
//! # Quick start
//!
//! ```rust
//! use jfif_core::{decode, encode};
//!
//! // 4x2 pixels, 3 bytes each, no row padding.
//! let pixels = vec![128u8; 4 * 2 * 3];
//! let (encoded, tables) = encode(&pixels, 4, 2, 0).unwrap();
//! let restored = decode(&encoded, &tables, 4, 2).unwrap();
//! assert_eq!(restored.len(), pixels.len());
//! ```
//!
//! The [`bmp`] module reads and writes the 24-bit bitmaps the codec is
//! meant to be fed with.

pub mod bmp;
pub mod jpeg;

pub use jpeg::bitio::BitString;
pub use jpeg::error::{CodecError, Result};
pub use jpeg::frame::{FrameInfo, PlaneDims, PlaneKind};
pub use jpeg::huffman::{decode_symbols, encode_symbols, CodeTable};
pub use jpeg::options::{CodecOptions, CodecOptionsBuilder, DctKind, PixelOrder, Precision};
pub use jpeg::progress::Progress;
pub use jpeg::{decode, encode, CodeTables, EncodedPlanes, JpegCodec};
