// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Sample grids and the reshaping steps around the block transform.
//!
//! Covers turning a padded interleaved byte buffer into an RGB grid and back,
//! 4:2:0 chroma subsampling and nearest-neighbour upsampling, edge-replication
//! padding to whole blocks, and conversion between a padded plane and its
//! block-raster sample buffer.

use super::color::Rgb;
use super::error::{CodecError, Result};
use super::frame::BLOCK_SIZE;

/// Byte order of the three channels inside one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelOrder {
    /// Blue, green, red: the order uncompressed bitmaps store.
    #[default]
    Bgr,
    Rgb,
}

impl PixelOrder {
    #[inline]
    fn read(self, px: &[u8]) -> Rgb {
        match self {
            PixelOrder::Bgr => Rgb::new(px[2], px[1], px[0]),
            PixelOrder::Rgb => Rgb::new(px[0], px[1], px[2]),
        }
    }

    #[inline]
    fn write(self, px: Rgb, out: &mut [u8]) {
        let bytes = match self {
            PixelOrder::Bgr => [px.b, px.g, px.r],
            PixelOrder::Rgb => [px.r, px.g, px.b],
        };
        out.copy_from_slice(&bytes);
    }
}

/// A row-major 2-D grid of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Plane<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap row-major data. Returns `None` if the length is not `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every sample.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Plane<U> {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Grow to `width` × `height` by repeating the last column and row outward.
    ///
    /// Returns an unchanged copy when the plane is already that size.
    pub fn pad_replicate(&self, width: usize, height: usize) -> Plane<T> {
        debug_assert!(width >= self.width && height >= self.height);
        debug_assert!(self.width > 0 && self.height > 0);
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let src = self.row(y.min(self.height - 1));
            data.extend_from_slice(src);
            let last = src[self.width - 1];
            data.extend(std::iter::repeat(last).take(width - self.width));
        }
        Plane {
            width,
            height,
            data,
        }
    }

    /// Keep the top-left `width` × `height` region.
    pub fn crop(&self, width: usize, height: usize) -> Plane<T> {
        debug_assert!(width <= self.width && height <= self.height);
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            data.extend_from_slice(&self.row(y)[..width]);
        }
        Plane {
            width,
            height,
            data,
        }
    }

    /// Copy the plane out as 8×8 blocks, blocks in raster order, samples
    /// within a block in row-major order.
    ///
    /// Width and height must already be multiples of 8.
    pub fn to_blocks(&self) -> Vec<T> {
        debug_assert!(self.width % BLOCK_SIZE == 0 && self.height % BLOCK_SIZE == 0);
        let mut out = Vec::with_capacity(self.data.len());
        for by in (0..self.height).step_by(BLOCK_SIZE) {
            for bx in (0..self.width).step_by(BLOCK_SIZE) {
                for y in by..by + BLOCK_SIZE {
                    out.extend_from_slice(&self.row(y)[bx..bx + BLOCK_SIZE]);
                }
            }
        }
        out
    }

    /// Inverse of [`Plane::to_blocks`].
    pub fn from_blocks(width: usize, height: usize, blocks: &[T]) -> Option<Plane<T>> {
        if width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 || blocks.len() != width * height {
            return None;
        }
        let blocks_wide = width / BLOCK_SIZE;
        let mut data = Vec::with_capacity(blocks.len());
        for y in 0..height {
            let (by, row_in_block) = (y / BLOCK_SIZE, y % BLOCK_SIZE);
            for bx in 0..blocks_wide {
                let start = ((by * blocks_wide + bx) * BLOCK_SIZE + row_in_block) * BLOCK_SIZE;
                data.extend_from_slice(&blocks[start..start + BLOCK_SIZE]);
            }
        }
        Some(Plane {
            width,
            height,
            data,
        })
    }
}

impl Plane<f64> {
    /// 4:2:0 downsample: each output sample is the mean of its 2×2 group.
    ///
    /// The output is ceil(w/2) × ceil(h/2); groups cut off by an odd edge
    /// average only the samples that exist.
    pub fn subsample(&self) -> Plane<f64> {
        let width = self.width.div_ceil(2);
        let height = self.height.div_ceil(2);
        let mut data = Vec::with_capacity(width * height);
        for cy in 0..height {
            for cx in 0..width {
                let mut sum = 0.0;
                let mut n = 0u32;
                for y in 2 * cy..(2 * cy + 2).min(self.height) {
                    for x in 2 * cx..(2 * cx + 2).min(self.width) {
                        sum += self.get(x, y);
                        n += 1;
                    }
                }
                data.push(sum / n as f64);
            }
        }
        Plane {
            width,
            height,
            data,
        }
    }
}

impl<T: Copy> Plane<T> {
    /// Nearest-neighbour upsample to `width` × `height`: every sample fills
    /// its 2×2 group, cropped at the far edges.
    pub fn upsample(&self, width: usize, height: usize) -> Plane<T> {
        debug_assert!(width.div_ceil(2) <= self.width && height.div_ceil(2) <= self.height);
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let src = self.row(y / 2);
            data.extend((0..width).map(|x| src[x / 2]));
        }
        Plane {
            width,
            height,
            data,
        }
    }
}

/// Bytes one row occupies, including its trailing filler.
pub fn row_stride(width: usize, row_padding: usize) -> Option<usize> {
    width.checked_mul(3)?.checked_add(row_padding)
}

/// Check the buffer shape of interleaved pixel data.
pub fn check_buffer(len: usize, width: usize, height: usize, row_padding: usize) -> Result<()> {
    if row_padding > 3 {
        return Err(CodecError::InvalidPadding(row_padding));
    }
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidDimensions { width, height });
    }
    let expected = row_stride(width, row_padding)
        .and_then(|s| s.checked_mul(height))
        .ok_or(CodecError::InvalidDimensions { width, height })?;
    if len != expected {
        return Err(CodecError::BufferSize {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Turn padded, row-major interleaved bytes into an RGB grid, skipping the
/// `row_padding` filler bytes at the end of every row.
pub fn deinterleave(
    bytes: &[u8],
    width: usize,
    height: usize,
    row_padding: usize,
    order: PixelOrder,
) -> Result<Plane<Rgb>> {
    check_buffer(bytes.len(), width, height, row_padding)?;
    let stride = width * 3 + row_padding;
    let mut data = Vec::with_capacity(width * height);
    for row in bytes.chunks_exact(stride) {
        data.extend(row[..width * 3].chunks_exact(3).map(|px| order.read(px)));
    }
    Ok(Plane {
        width,
        height,
        data,
    })
}

/// Inverse of [`deinterleave`]; filler bytes are written as zero.
pub fn interleave(pixels: &Plane<Rgb>, row_padding: usize, order: PixelOrder) -> Vec<u8> {
    let stride = pixels.width * 3 + row_padding;
    let mut out = vec![0u8; stride * pixels.height];
    for (y, row) in out.chunks_exact_mut(stride).enumerate() {
        for (x, px) in row[..pixels.width * 3].chunks_exact_mut(3).enumerate() {
            order.write(pixels.get(x, y), px);
        }
    }
    out
}
