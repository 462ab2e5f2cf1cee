// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Quantized DCT coefficient storage and quantization.
//!
//! Provides [`DctGrid`] for storing quantized DCT coefficients in block-raster
//! order, and [`QuantTable`] for the 64-entry quantization matrices.
//!
//! Quantization rounds half away from zero (`f64::round`). Dequantization is
//! the plain product, so `dequantize(quantize(c))` is within half a step of `c`.

use super::error::{CodecError, Result};
use super::transform::Sample;
use super::zigzag::{unzigzag, zigzag};

/// Quantization table: 64 values in natural (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    /// Quantization values, indexed by row * 8 + col.
    pub values: [u16; 64],
}

impl QuantTable {
    pub fn new(values: [u16; 64]) -> Self {
        Self { values }
    }

    /// Divide each coefficient by its step and round half away from zero.
    ///
    /// Results saturate at the `i16` range.
    pub fn quantize<T: Sample>(&self, coeffs: &[T; 64]) -> [i16; 64] {
        std::array::from_fn(|i| {
            let q = (coeffs[i].widen() / self.values[i] as f64).round();
            q.clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
    }

    /// Multiply each quantized coefficient by its step.
    pub fn dequantize<T: Sample>(&self, quantized: &[i16; 64]) -> [T; 64] {
        std::array::from_fn(|i| T::cast(quantized[i] as f64 * self.values[i] as f64))
    }
}

/// Grid of quantized DCT coefficients for one plane.
///
/// Coefficients are stored in block-raster order. Within each block,
/// the 64 coefficients are in natural (row-major) order, i.e. index = row * 8 + col.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DctGrid {
    /// Number of 8×8 blocks horizontally.
    blocks_wide: usize,
    /// Number of 8×8 blocks vertically.
    blocks_tall: usize,
    /// Flat storage: blocks_tall * blocks_wide * 64 coefficients.
    coeffs: Vec<i16>,
}

impl DctGrid {
    /// Create a new grid initialized to zero.
    pub fn new(blocks_wide: usize, blocks_tall: usize) -> Self {
        Self {
            blocks_wide,
            blocks_tall,
            coeffs: vec![0i16; blocks_wide * blocks_tall * 64],
        }
    }

    /// Rebuild a grid from the concatenated zigzag sequences of its blocks.
    pub fn from_zigzag(blocks_wide: usize, blocks_tall: usize, seq: &[i16]) -> Result<Self> {
        let mut grid = Self::new(blocks_wide, blocks_tall);
        if seq.len() != grid.coeffs.len() {
            return Err(CodecError::SymbolCount {
                expected: grid.coeffs.len(),
                actual: seq.len(),
            });
        }
        for (dst, src) in grid.coeffs.chunks_exact_mut(64).zip(seq.chunks_exact(64)) {
            let scanned: &[i16; 64] = src.try_into().map_err(|_| CodecError::SymbolCount {
                expected: 64,
                actual: src.len(),
            })?;
            dst.copy_from_slice(&unzigzag(scanned));
        }
        Ok(grid)
    }

    /// Flatten every block in zigzag order, blocks in raster order.
    pub fn to_zigzag(&self) -> Vec<i16> {
        let mut seq = Vec::with_capacity(self.coeffs.len());
        for block in self.coeffs.chunks_exact(64) {
            let mut natural = [0i16; 64];
            natural.copy_from_slice(block);
            seq.extend_from_slice(&zigzag(&natural));
        }
        seq
    }

    /// Total number of blocks.
    pub fn total_blocks(&self) -> usize {
        self.blocks_wide * self.blocks_tall
    }

    /// Raw mutable access to all coefficients.
    ///
    /// Each 64-element chunk is one 8×8 block; chunks of whole blocks are
    /// handed to workers independently.
    pub fn coeffs_mut(&mut self) -> &mut [i16] {
        &mut self.coeffs
    }

    /// Raw read-only access to all coefficients.
    pub fn coeffs(&self) -> &[i16] {
        &self.coeffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::tables::{CHROMA_QUANT, LUMA_QUANT};

    #[test]
    fn grid_layout() {
        let mut grid = DctGrid::new(2, 3);
        assert_eq!(grid.total_blocks(), 6);
        assert_eq!(grid.coeffs().len(), 6 * 64);
        assert!(grid.coeffs().iter().all(|&c| c == 0));

        // Block (row 1, col 0), frequency (3, 4).
        grid.coeffs_mut()[2 * 64 + 3 * 8 + 4] = 42;
        assert_eq!(grid.coeffs().iter().filter(|&&c| c != 0).count(), 1);
    }

    #[test]
    fn zigzag_stream_layout() {
        let mut grid = DctGrid::new(2, 1);
        let coeffs = grid.coeffs_mut();
        coeffs[0] = 10; // DC of first block
        coeffs[8] = -3; // (1, 0): zigzag position 2
        coeffs[64] = 7; // DC of second block

        let seq = grid.to_zigzag();
        assert_eq!(seq.len(), 128);
        assert_eq!(seq[0], 10);
        assert_eq!(seq[2], -3);
        assert_eq!(seq[64], 7);

        let back = DctGrid::from_zigzag(2, 1, &seq).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn from_zigzag_rejects_short_stream() {
        let err = DctGrid::from_zigzag(1, 1, &[0; 63]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::SymbolCount {
                expected: 64,
                actual: 63
            }
        ));
    }

    #[test]
    fn quantize_rounds_half_away_from_zero() {
        let qt = QuantTable::new([10; 64]);
        let mut coeffs = [0.0f64; 64];
        coeffs[0] = 25.0;
        coeffs[1] = -25.0;
        coeffs[2] = 24.9;
        coeffs[3] = -4.9;
        let q = qt.quantize(&coeffs);
        assert_eq!(&q[..4], &[3, -3, 2, 0]);
    }

    #[test]
    fn quantize_saturates() {
        let qt = QuantTable::new([1; 64]);
        let coeffs = [1.0e9f64; 64];
        assert!(qt.quantize(&coeffs).iter().all(|&c| c == i16::MAX));
    }

    #[test]
    fn dequantize_within_half_step() {
        for table in [LUMA_QUANT, CHROMA_QUANT] {
            let qt = QuantTable::new(table);
            arbtest::arbtest(|u| {
                let coeffs: [f64; 64] =
                    std::array::from_fn(|_| u.int_in_range(-20480..=20480).unwrap_or(0) as f64 / 10.0);
                let back: [f64; 64] = qt.dequantize(&qt.quantize(&coeffs));
                for i in 0..64 {
                    let half = qt.values[i] as f64 / 2.0;
                    assert!((back[i] - coeffs[i]).abs() <= half + 1e-9);
                }
                Ok(())
            });
        }
    }

    #[test]
    fn single_precision_quantization() {
        let qt = QuantTable::new(LUMA_QUANT);
        let coeffs = [-30.4f32; 64];
        let q = qt.quantize(&coeffs);
        assert_eq!(q[0], -2);
        let back: [f32; 64] = qt.dequantize(&q);
        assert_eq!(back[0], -32.0);
    }
}
