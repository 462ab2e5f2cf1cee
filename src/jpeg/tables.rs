// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Standard quantization tables (ITU-T T.81 Annex K, Tables K.1 and K.2).
//!
//! Both tables are in natural (row-major) order. The luminance table is used
//! for the Y plane, the chrominance table for both Cb and Cr.

use super::dct::QuantTable;
use super::frame::PlaneKind;

/// Luminance quantization table (Table K.1).
pub const LUMA_QUANT: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Chrominance quantization table (Table K.2).
pub const CHROMA_QUANT: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// The table a plane is quantized with.
pub fn quant_table_for(plane: PlaneKind) -> QuantTable {
    if plane.is_chroma() {
        QuantTable::new(CHROMA_QUANT)
    } else {
        QuantTable::new(LUMA_QUANT)
    }
}
