// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! RGB ↔ YCbCr conversion (JFIF / ITU-R BT.601 full range).
//!
//! Both directions saturate to [0, 255]. The inverse rounds to the nearest
//! integer, so a round trip is off by at most one per channel except where
//! clamping bites.

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A luma / chroma sample, each channel nominally in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YCbCr {
    pub y: f64,
    pub cb: f64,
    pub cr: f64,
}

/// Forward transform, clamped per channel.
pub fn rgb_to_ycbcr(px: Rgb) -> YCbCr {
    let (r, g, b) = (px.r as f64, px.g as f64, px.b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
    YCbCr {
        y: y.clamp(0.0, 255.0),
        cb: cb.clamp(0.0, 255.0),
        cr: cr.clamp(0.0, 255.0),
    }
}

/// Inverse transform. Chroma is re-centred on zero before the matrix is applied.
pub fn ycbcr_to_rgb(s: YCbCr) -> Rgb {
    let cb = s.cb - 128.0;
    let cr = s.cr - 128.0;
    let r = s.y + 1.402 * cr;
    let g = s.y - 0.344136 * cb - 0.714136 * cr;
    let b = s.y + 1.772 * cb;
    Rgb {
        r: to_channel(r),
        g: to_channel(g),
        b: to_channel(b),
    }
}

/// Saturate and round a reconstructed channel value. NaN maps to 0.
#[inline]
pub fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
