// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Frame geometry: the dimension metadata shared between encoder and decoder.
//!
//! Nothing in the encoded bit strings records how large a plane is, so the
//! decoder derives the same [`FrameInfo`] from the image size and checks it
//! against the [`PlaneDims`] carried alongside the bits.

use std::fmt;

use super::error::{CodecError, Result};

/// Edge length of a transform block.
pub const BLOCK_SIZE: usize = 8;

/// One of the three image planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    Y,
    Cb,
    Cr,
}

impl PlaneKind {
    pub const ALL: [PlaneKind; 3] = [PlaneKind::Y, PlaneKind::Cb, PlaneKind::Cr];

    pub fn is_chroma(self) -> bool {
        !matches!(self, PlaneKind::Y)
    }
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaneKind::Y => "Y",
            PlaneKind::Cb => "Cb",
            PlaneKind::Cr => "Cr",
        })
    }
}

/// Original and block-aligned size of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDims {
    /// Plane width in samples before padding.
    pub width: usize,
    /// Plane height in samples before padding.
    pub height: usize,
    /// Width rounded up to a multiple of 8.
    pub padded_width: usize,
    /// Height rounded up to a multiple of 8.
    pub padded_height: usize,
}

impl PlaneDims {
    /// Fails with [`CodecError::InvalidDimensions`] when the padded size or
    /// its sample count does not fit in `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let invalid = || CodecError::InvalidDimensions { width, height };
        let padded_width = align_to_block(width).ok_or_else(invalid)?;
        let padded_height = align_to_block(height).ok_or_else(invalid)?;
        padded_width
            .checked_mul(padded_height)
            .ok_or_else(invalid)?;
        Ok(Self {
            width,
            height,
            padded_width,
            padded_height,
        })
    }

    /// Number of 8×8 blocks horizontally.
    pub fn blocks_wide(&self) -> usize {
        self.padded_width / BLOCK_SIZE
    }

    /// Number of 8×8 blocks vertically.
    pub fn blocks_tall(&self) -> usize {
        self.padded_height / BLOCK_SIZE
    }

    pub fn total_blocks(&self) -> usize {
        self.blocks_wide() * self.blocks_tall()
    }

    /// Coefficients a plane of this size codes: one per padded sample.
    pub fn coefficient_count(&self) -> usize {
        self.padded_width * self.padded_height
    }
}

/// Geometry of a 4:2:0 image: full-resolution luma, half-resolution chroma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    pub luma: PlaneDims,
    /// Shared by Cb and Cr: ceil(width / 2) × ceil(height / 2).
    pub chroma: PlaneDims,
}

impl FrameInfo {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions { width, height });
        }
        let invalid = || CodecError::InvalidDimensions { width, height };
        let luma = PlaneDims::new(width, height).map_err(|_| invalid())?;
        let chroma =
            PlaneDims::new(width.div_ceil(2), height.div_ceil(2)).map_err(|_| invalid())?;
        // Block counts over all three planes must stay representable.
        chroma
            .coefficient_count()
            .checked_mul(2)
            .and_then(|c| c.checked_add(luma.coefficient_count()))
            .ok_or_else(invalid)?;
        Ok(Self {
            width,
            height,
            luma,
            chroma,
        })
    }

    pub fn plane(&self, kind: PlaneKind) -> PlaneDims {
        if kind.is_chroma() {
            self.chroma
        } else {
            self.luma
        }
    }

    /// Blocks across all three planes.
    pub fn total_blocks(&self) -> usize {
        self.luma.total_blocks() + 2 * self.chroma.total_blocks()
    }

    /// Check that plane dimensions received from an encoder match this frame.
    pub fn check_plane(&self, kind: PlaneKind, dims: &PlaneDims) -> Result<()> {
        let expected = self.plane(kind);
        if expected != *dims {
            return Err(CodecError::PlaneMismatch {
                plane: kind,
                expected_width: expected.width,
                expected_height: expected.height,
                actual_width: dims.width,
                actual_height: dims.height,
            });
        }
        Ok(())
    }
}

/// Round `n` up to the next multiple of the block size, or `None` on overflow.
pub fn align_to_block(n: usize) -> Option<usize> {
    n.div_ceil(BLOCK_SIZE).checked_mul(BLOCK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_frame() {
        let fi = FrameInfo::new(16, 16).unwrap();
        assert_eq!(fi.luma, PlaneDims::new(16, 16).unwrap());
        assert_eq!(fi.luma.padded_width, 16);
        assert_eq!(fi.luma.total_blocks(), 4);
        assert_eq!(fi.chroma.width, 8);
        assert_eq!(fi.chroma.total_blocks(), 1);
        assert_eq!(fi.total_blocks(), 6);
    }

    #[test]
    fn non_aligned_frame() {
        // 10x10 pads to 16x16 luma; chroma is 5x5 padded to 8x8.
        let fi = FrameInfo::new(10, 10).unwrap();
        assert_eq!(fi.luma.padded_width, 16);
        assert_eq!(fi.luma.padded_height, 16);
        assert_eq!(fi.chroma.width, 5);
        assert_eq!(fi.chroma.padded_height, 8);
        assert_eq!(fi.luma.coefficient_count(), 256);
    }

    #[test]
    fn odd_dimensions_round_chroma_up() {
        let fi = FrameInfo::new(13, 1).unwrap();
        assert_eq!(fi.chroma.width, 7);
        assert_eq!(fi.chroma.height, 1);
        assert_eq!(fi.luma.blocks_wide(), 2);
        assert_eq!(fi.luma.blocks_tall(), 1);
    }

    #[test]
    fn reject_empty() {
        assert!(matches!(
            FrameInfo::new(0, 8),
            Err(CodecError::InvalidDimensions { width: 0, height: 8 })
        ));
    }

    #[test]
    fn plane_mismatch_detected() {
        let fi = FrameInfo::new(32, 32).unwrap();
        assert!(fi.check_plane(PlaneKind::Cb, &PlaneDims::new(16, 16).unwrap()).is_ok());
        let err = fi
            .check_plane(PlaneKind::Y, &PlaneDims::new(16, 16).unwrap())
            .unwrap_err();
        assert!(matches!(err, CodecError::PlaneMismatch { plane: PlaneKind::Y, .. }));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(align_to_block(usize::MAX), None);
        assert_eq!(align_to_block(usize::MAX - 7), Some(usize::MAX - 7));
        assert!(matches!(
            FrameInfo::new(usize::MAX, 1),
            Err(CodecError::InvalidDimensions {
                width: usize::MAX,
                height: 1
            })
        ));
        // Each side aligns, but the sample count does not fit.
        let side = 1usize << (usize::BITS / 2);
        assert!(matches!(
            PlaneDims::new(side, side),
            Err(CodecError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            FrameInfo::new(side, side),
            Err(CodecError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn chroma_planes_share_dims() {
        let fi = FrameInfo::new(20, 12).unwrap();
        assert!(!PlaneKind::Y.is_chroma());
        assert_eq!(fi.plane(PlaneKind::Cb), fi.plane(PlaneKind::Cr));
        assert_eq!(fi.plane(PlaneKind::Y), fi.luma);
    }
}
