// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Minimal reader and writer for uncompressed 24-bit bitmaps.
//!
//! Only the layout the codec consumes is supported: a BITMAPFILEHEADER
//! followed by a BITMAPINFOHEADER (or a larger info header), 24 bits per
//! pixel, no compression. Pixel rows are kept exactly as stored: B,G,R
//! triples, each row padded to a multiple of four bytes, bottom-up unless
//! the header height is negative.

use std::fs;
use std::path::Path;

use crate::jpeg::error::{CodecError, Result};

/// Signature at the start of every bitmap file.
pub const SIGNATURE: &[u8; 2] = b"BM";
/// File header (14 bytes) plus BITMAPINFOHEADER (40 bytes).
pub const HEADER_LEN: usize = 54;

const INFO_HEADER_LEN: u32 = 40;
/// 72 DPI in pixels per metre.
const DEFAULT_RESOLUTION: i32 = 2835;

fn u16_at(bytes: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([bytes[pos], bytes[pos + 1]])
}

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

fn i32_at(bytes: &[u8], pos: usize) -> i32 {
    u32_at(bytes, pos) as i32
}

/// Filler bytes after each row of `width` 24-bit pixels.
pub fn row_padding(width: usize) -> usize {
    (4 - (width * 3) % 4) % 4
}

/// Geometry read from a bitmap header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfo {
    pub width: usize,
    pub height: usize,
    /// Rows are stored top row first (negative height in the header).
    pub top_down: bool,
    /// Offset of the first pixel byte.
    pub data_offset: usize,
    pub row_padding: usize,
}

impl BitmapInfo {
    /// Parse the file and info headers.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(CodecError::Bitmap("file shorter than its header"));
        }
        if &bytes[0..2] != SIGNATURE {
            return Err(CodecError::Bitmap("missing BM signature"));
        }
        if u32_at(bytes, 14) < INFO_HEADER_LEN {
            return Err(CodecError::Bitmap("unsupported info header"));
        }
        if u16_at(bytes, 28) != 24 {
            return Err(CodecError::Bitmap("only 24 bits per pixel are supported"));
        }
        if u32_at(bytes, 30) != 0 {
            return Err(CodecError::Bitmap("compressed bitmaps are not supported"));
        }

        let width = i32_at(bytes, 18);
        let height = i32_at(bytes, 22);
        if width <= 0 || height == 0 {
            return Err(CodecError::InvalidDimensions {
                width: width.max(0) as usize,
                height: height.unsigned_abs() as usize,
            });
        }
        let width = width as usize;
        let data_offset = u32_at(bytes, 10) as usize;
        if data_offset < HEADER_LEN {
            return Err(CodecError::Bitmap("pixel data overlaps the header"));
        }

        Ok(Self {
            width,
            height: height.unsigned_abs() as usize,
            top_down: height < 0,
            data_offset,
            row_padding: row_padding(width),
        })
    }

    /// Bytes per stored row, filler included.
    pub fn row_stride(&self) -> usize {
        self.width * 3 + self.row_padding
    }

    /// Bytes of pixel data.
    pub fn pixel_len(&self) -> usize {
        self.row_stride() * self.height
    }
}

/// A 24-bit bitmap: header bytes plus the padded pixel rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    info: BitmapInfo,
    /// Everything before the pixel data, written back unchanged.
    header: Vec<u8>,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Split a bitmap file into header and pixel rows.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let info = BitmapInfo::parse(bytes)?;
        let end = info
            .data_offset
            .checked_add(info.pixel_len())
            .ok_or(CodecError::Bitmap("pixel data size overflows"))?;
        if bytes.len() < end {
            return Err(CodecError::BufferSize {
                expected: end,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            info,
            header: bytes[..info.data_offset].to_vec(),
            pixels: bytes[info.data_offset..end].to_vec(),
        })
    }

    /// Build a bottom-up bitmap around padded B,G,R rows.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let dims_err = CodecError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(dims_err);
        }
        let info = BitmapInfo {
            width,
            height,
            top_down: false,
            data_offset: HEADER_LEN,
            row_padding: row_padding(width),
        };
        if pixels.len() != info.pixel_len() {
            return Err(CodecError::BufferSize {
                expected: info.pixel_len(),
                actual: pixels.len(),
            });
        }
        let image_size = u32::try_from(info.pixel_len()).map_err(|_| dims_err)?;
        let w = i32::try_from(width).map_err(|_| CodecError::InvalidDimensions { width, height })?;
        let h = i32::try_from(height).map_err(|_| CodecError::InvalidDimensions { width, height })?;
        let file_size = image_size
            .checked_add(HEADER_LEN as u32)
            .ok_or(CodecError::InvalidDimensions { width, height })?;

        let mut header = Vec::with_capacity(HEADER_LEN);
        header.extend_from_slice(SIGNATURE);
        header.extend_from_slice(&file_size.to_le_bytes());
        header.extend_from_slice(&[0; 4]);
        header.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes());
        header.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
        header.extend_from_slice(&w.to_le_bytes());
        header.extend_from_slice(&h.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&24u16.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&image_size.to_le_bytes());
        header.extend_from_slice(&DEFAULT_RESOLUTION.to_le_bytes());
        header.extend_from_slice(&DEFAULT_RESOLUTION.to_le_bytes());
        header.extend_from_slice(&[0; 8]);

        Ok(Self {
            info,
            header,
            pixels,
        })
    }

    /// Same header, new pixel rows of identical size.
    pub fn with_pixels(&self, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != self.pixels.len() {
            return Err(CodecError::BufferSize {
                expected: self.pixels.len(),
                actual: pixels.len(),
            });
        }
        Ok(Self {
            info: self.info,
            header: self.header.clone(),
            pixels,
        })
    }

    pub fn info(&self) -> &BitmapInfo {
        &self.info
    }

    pub fn width(&self) -> usize {
        self.info.width
    }

    pub fn height(&self) -> usize {
        self.info.height
    }

    pub fn row_padding(&self) -> usize {
        self.info.row_padding
    }

    /// Padded pixel rows in stored order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Serialize header and pixels back into a file image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.len() + self.pixels.len());
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.pixels);
        out
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }
}
