// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 8×8 forward and inverse DCT-II.
//!
//! Normalization: `F(u,v) = 1/4 · C(u) · C(v) · Σ f(x,y) · cos((2x+1)uπ/16) · cos((2y+1)vπ/16)`
//! with `C(0) = 1/√2` and `C(k) = 1` otherwise. The inverse uses the same
//! factors inside the sum, so the pair is orthonormal.
//!
//! Two kernels compute the same transform: [`DctKind::Reference`] is the
//! direct 64×64 double sum, [`DctKind::Separable`] runs the 1-D transform over
//! rows and then columns. Both are generic over the sample precision.

use std::fmt::Debug;
use std::sync::OnceLock;

use num_traits::Float;

/// Floating-point type the block transform runs in.
pub trait Sample: Float + Debug + Send + Sync + 'static {
    /// Convert from `f64`, rounding if the type is narrower.
    fn cast(v: f64) -> Self;
    /// Convert to `f64` without loss.
    fn widen(self) -> f64;
}

impl Sample for f32 {
    #[inline]
    fn cast(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    #[inline]
    fn cast(v: f64) -> Self {
        v
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }
}

/// Which DCT implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DctKind {
    /// Direct double sum, O(64²) per block.
    Reference,
    /// Row pass then column pass, O(2·8³) per block.
    #[default]
    Separable,
}

/// Pre-computed `COSINE[u][x] = cos((2x + 1) · u · π / 16)`.
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for (u, row) in table.iter_mut().enumerate() {
            for (x, c) in row.iter_mut().enumerate() {
                *c = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

/// Per-axis normalization: `C(k) / 2`, i.e. `1/√8` for k = 0 and `1/2` otherwise.
fn norm(k: usize) -> f64 {
    if k == 0 {
        1.0 / 8.0f64.sqrt()
    } else {
        0.5
    }
}

/// Cosine and normalization tables converted to one precision.
///
/// Built once per plane and shared read-only between workers.
#[derive(Debug, Clone)]
pub struct DctKernel<T: Sample> {
    kind: DctKind,
    cos: [[T; 8]; 8],
    norm: [T; 8],
}

impl<T: Sample> DctKernel<T> {
    pub fn new(kind: DctKind) -> Self {
        let table = cosine_table();
        Self {
            kind,
            cos: std::array::from_fn(|u| std::array::from_fn(|x| T::cast(table[u][x]))),
            norm: std::array::from_fn(|k| T::cast(norm(k))),
        }
    }

    /// Forward DCT of a level-shifted block (natural order in and out).
    pub fn forward(&self, block: &[T; 64]) -> [T; 64] {
        match self.kind {
            DctKind::Reference => self.forward_reference(block),
            DctKind::Separable => self.forward_separable(block),
        }
    }

    /// Inverse DCT back to level-shifted samples.
    pub fn inverse(&self, coeffs: &[T; 64]) -> [T; 64] {
        match self.kind {
            DctKind::Reference => self.inverse_reference(coeffs),
            DctKind::Separable => self.inverse_separable(coeffs),
        }
    }

    fn forward_reference(&self, block: &[T; 64]) -> [T; 64] {
        let cos = &self.cos;
        let mut out = [T::zero(); 64];
        for v in 0..8 {
            for u in 0..8 {
                let mut sum = T::zero();
                for y in 0..8 {
                    for x in 0..8 {
                        sum = sum + block[y * 8 + x] * cos[v][y] * cos[u][x];
                    }
                }
                out[v * 8 + u] = self.norm[v] * self.norm[u] * sum;
            }
        }
        out
    }

    fn inverse_reference(&self, coeffs: &[T; 64]) -> [T; 64] {
        let cos = &self.cos;
        let c = &self.norm;
        let mut out = [T::zero(); 64];
        for y in 0..8 {
            for x in 0..8 {
                let mut sum = T::zero();
                for v in 0..8 {
                    for u in 0..8 {
                        sum = sum + c[v] * c[u] * coeffs[v * 8 + u] * cos[v][y] * cos[u][x];
                    }
                }
                out[y * 8 + x] = sum;
            }
        }
        out
    }

    fn forward_separable(&self, block: &[T; 64]) -> [T; 64] {
        let cos = &self.cos;
        let c = &self.norm;

        // Rows.
        let mut temp = [T::zero(); 64];
        for row in 0..8 {
            for u in 0..8 {
                let mut sum = T::zero();
                for x in 0..8 {
                    sum = sum + block[row * 8 + x] * cos[u][x];
                }
                temp[row * 8 + u] = c[u] * sum;
            }
        }

        // Columns.
        let mut out = [T::zero(); 64];
        for col in 0..8 {
            for v in 0..8 {
                let mut sum = T::zero();
                for y in 0..8 {
                    sum = sum + temp[y * 8 + col] * cos[v][y];
                }
                out[v * 8 + col] = c[v] * sum;
            }
        }
        out
    }

    fn inverse_separable(&self, coeffs: &[T; 64]) -> [T; 64] {
        let cos = &self.cos;
        let c = &self.norm;

        // Columns.
        let mut temp = [T::zero(); 64];
        for col in 0..8 {
            for y in 0..8 {
                let mut sum = T::zero();
                for v in 0..8 {
                    sum = sum + c[v] * coeffs[v * 8 + col] * cos[v][y];
                }
                temp[y * 8 + col] = sum;
            }
        }

        // Rows.
        let mut out = [T::zero(); 64];
        for row in 0..8 {
            for x in 0..8 {
                let mut sum = T::zero();
                for u in 0..8 {
                    sum = sum + c[u] * temp[row * 8 + u] * cos[u][x];
                }
                out[row * 8 + x] = sum;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::dct::QuantTable;
    use crate::jpeg::tables::LUMA_QUANT;

    fn arbitrary_block(u: &mut arbtest::arbitrary::Unstructured<'_>) -> arbtest::arbitrary::Result<[f64; 64]> {
        let mut block = [0.0f64; 64];
        for v in block.iter_mut() {
            *v = u.int_in_range(-128i32..=127)? as f64;
        }
        Ok(block)
    }

    #[test]
    fn dc_only_block_is_flat() {
        let kernel = DctKernel::<f64>::new(DctKind::Separable);
        let mut coeffs = [0.0f64; 64];
        coeffs[0] = 16.0;
        let pixels = kernel.inverse(&coeffs);
        // DC contribution = (1/√8)² · 16 = 2
        for p in pixels {
            assert!((p - 2.0).abs() < 1e-10, "{p}");
        }
    }

    #[test]
    fn constant_block_has_only_dc() {
        let kernel = DctKernel::<f64>::new(DctKind::Reference);
        let coeffs = kernel.forward(&[-3.8; 64]);
        assert!((coeffs[0] + 30.4).abs() < 1e-9);
        assert!(coeffs[1..].iter().all(|c| c.abs() < 1e-9));
    }

    #[test]
    fn inverse_undoes_forward() {
        for kind in [DctKind::Reference, DctKind::Separable] {
            let kernel = DctKernel::<f64>::new(kind);
            arbtest::arbtest(|u| {
                let block = arbitrary_block(u)?;
                let back = kernel.inverse(&kernel.forward(&block));
                for i in 0..64 {
                    assert!((back[i] - block[i]).abs() < 1e-9, "{kind:?} index {i}");
                }
                Ok(())
            });
        }
    }

    #[test]
    fn single_precision_inverse_undoes_forward() {
        let kernel = DctKernel::<f32>::new(DctKind::Separable);
        arbtest::arbtest(|u| {
            let block = arbitrary_block(u)?.map(|v| v as f32);
            let back = kernel.inverse(&kernel.forward(&block));
            for i in 0..64 {
                assert!((back[i] - block[i]).abs() < 1e-3);
            }
            Ok(())
        });
    }

    #[test]
    fn separable_matches_reference() {
        let reference = DctKernel::<f64>::new(DctKind::Reference);
        let separable = DctKernel::<f64>::new(DctKind::Separable);
        let qt = QuantTable::new([1; 64]);
        arbtest::arbtest(|u| {
            let block = arbitrary_block(u)?;
            let a = reference.forward(&block);
            let b = separable.forward(&block);
            for i in 0..64 {
                assert!((a[i] - b[i]).abs() < 1e-9);
            }
            // After rounding, unit-step quantization differs by at most one.
            let qa = qt.quantize(&a);
            let qb = qt.quantize(&b);
            for i in 0..64 {
                assert!((qa[i] - qb[i]).abs() <= 1);
            }
            let ia = reference.inverse(&a);
            let ib = separable.inverse(&b);
            for i in 0..64 {
                assert!((ia[i] - ib[i]).abs() < 1e-9);
            }
            Ok(())
        });
    }

    #[test]
    fn single_precision_tracks_double() {
        let wide = DctKernel::<f64>::new(DctKind::Separable);
        let narrow = DctKernel::<f32>::new(DctKind::Separable);
        let qt = QuantTable::new(LUMA_QUANT);
        arbtest::arbtest(|u| {
            let block = arbitrary_block(u)?;
            let qa = qt.quantize(&wide.forward(&block));
            let qb = qt.quantize(&narrow.forward(&block.map(|v| v as f32)));
            for i in 0..64 {
                assert!((qa[i] - qb[i]).abs() <= 1);
            }
            Ok(())
        });
    }

    #[test]
    fn quantized_roundtrip_with_luma_table() {
        let kernel = DctKernel::<f64>::new(DctKind::Separable);
        let qt = QuantTable::new(LUMA_QUANT);

        let mut quantized = [0i16; 64];
        quantized[0] = 50;
        quantized[1] = -3;
        quantized[8] = 2;

        let pixels = kernel.inverse(&qt.dequantize(&quantized));
        let recovered = qt.quantize(&kernel.forward(&pixels));
        for i in 0..64 {
            assert!(
                (quantized[i] - recovered[i]).abs() <= 1,
                "Mismatch at index {i}: expected {}, got {}",
                quantized[i],
                recovered[i]
            );
        }
    }
}
