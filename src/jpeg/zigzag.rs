// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Zigzag scan order for 8×8 coefficient blocks.
//!
//! The scan walks anti-diagonals from the DC coefficient outward, so the
//! flattened sequence lists low spatial frequencies first and the mostly-zero
//! high frequencies last.

/// Maps zigzag index (0–63) to natural row-major index (0–63).
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Maps natural row-major index (0–63) to zigzag index (0–63).
///
/// Inverse of [`ZIGZAG_TO_NATURAL`].
pub const NATURAL_TO_ZIGZAG: [usize; 64] = {
    let mut table = [0usize; 64];
    let mut i = 0;
    while i < 64 {
        table[ZIGZAG_TO_NATURAL[i]] = i;
        i += 1;
    }
    table
};

/// Gather a natural-order block into zigzag order.
pub fn zigzag<T: Copy>(block: &[T; 64]) -> [T; 64] {
    std::array::from_fn(|i| block[ZIGZAG_TO_NATURAL[i]])
}

/// Scatter a zigzag-ordered sequence back into a natural-order block.
pub fn unzigzag<T: Copy>(seq: &[T; 64]) -> [T; 64] {
    std::array::from_fn(|n| seq[NATURAL_TO_ZIGZAG[n]])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (row, col) of the coefficient visited at zigzag position `i`.
    fn position(i: usize) -> (usize, usize) {
        let n = ZIGZAG_TO_NATURAL[i];
        (n / 8, n % 8)
    }

    #[test]
    fn round_trip() {
        for i in 0..64 {
            assert_eq!(NATURAL_TO_ZIGZAG[ZIGZAG_TO_NATURAL[i]], i);
            assert_eq!(ZIGZAG_TO_NATURAL[NATURAL_TO_ZIGZAG[i]], i);
        }
    }

    #[test]
    fn known_positions() {
        assert_eq!(position(0), (0, 0));
        assert_eq!(position(1), (0, 1));
        assert_eq!(position(2), (1, 0));
        assert_eq!(position(3), (2, 0));
        assert_eq!(position(63), (7, 7));
    }

    #[test]
    fn all_indices_covered() {
        let mut seen = [false; 64];
        for &idx in &ZIGZAG_TO_NATURAL {
            assert!(!seen[idx], "duplicate natural index {idx}");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn neighbours_are_adjacent() {
        // Consecutive scan positions step to a neighbouring cell, diagonally or sideways.
        for i in 1..64 {
            let (r0, c0) = position(i - 1);
            let (r1, c1) = position(i);
            assert!(r0.abs_diff(r1) <= 1 && c0.abs_diff(c1) <= 1, "jump at {i}");
        }
    }

    #[test]
    fn gather_scatter_block() {
        let block: [i16; 64] = std::array::from_fn(|n| n as i16 * 3 - 90);
        let seq = zigzag(&block);
        assert_eq!(seq[2], block[8]);
        assert_eq!(unzigzag(&seq), block);
    }

    #[test]
    fn gather_scatter_arbitrary() {
        arbtest::arbtest(|u| {
            let block: [i16; 64] = u.arbitrary()?;
            assert_eq!(unzigzag(&zigzag(&block)), block);
            Ok(())
        });
    }
}
