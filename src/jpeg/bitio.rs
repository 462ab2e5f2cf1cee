// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-level I/O for Huffman-coded planes.
//!
//! A [`BitString`] is a packed, MSB-first bit buffer that remembers its exact
//! length, so no padding convention is needed at the end of a plane.
//! [`BitWriter`] builds one; [`BitReader`] is a cursor over an immutable one.

use std::fmt;

/// Packed sequence of bits, MSB-first within each byte.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bytes: Vec<u8>,
    /// Number of valid bits; trailing bits of the last byte are zero.
    len: usize,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap packed bytes; bits past `len` are ignored.
    ///
    /// Returns `None` if `bytes` holds fewer than `len` bits.
    pub fn from_bytes(mut bytes: Vec<u8>, len: usize) -> Option<Self> {
        if bytes.len() < len.div_ceil(8) {
            return None;
        }
        bytes.truncate(len.div_ceil(8));
        if len % 8 != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - len % 8);
            }
        }
        Some(Self { bytes, len })
    }

    /// Parse a string of `'0'`/`'1'` characters.
    pub fn from_bits_str(s: &str) -> Option<Self> {
        let mut w = BitWriter::new();
        for ch in s.chars() {
            match ch {
                '0' => w.write_bit(false),
                '1' => w.write_bit(true),
                _ => return None,
            }
        }
        Some(w.finish())
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes, `ceil(len / 8)` of them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] >> (7 - index % 8) & 1 == 1)
    }

    pub fn reader(&self) -> BitReader<'_> {
        BitReader::new(self)
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHOWN: usize = 64;
        write!(f, "BitString({} bits: ", self.len)?;
        for i in 0..self.len.min(SHOWN) {
            f.write_str(if self.get(i) == Some(true) { "1" } else { "0" })?;
        }
        if self.len > SHOWN {
            f.write_str("…")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.get(i) == Some(true) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Appends bits MSB-first.
#[derive(Debug, Default)]
pub struct BitWriter {
    output: Vec<u8>,
    buf: u8,
    bits_used: u8,
    len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bits(bits: usize) -> Self {
        Self {
            output: Vec::with_capacity(bits.div_ceil(8)),
            ..Self::default()
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.buf = (self.buf << 1) | bit as u8;
        self.bits_used += 1;
        self.len += 1;
        if self.bits_used == 8 {
            self.output.push(self.buf);
            self.buf = 0;
            self.bits_used = 0;
        }
    }

    /// Write the low `count` bits (0–64) of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u8) {
        debug_assert!(count <= 64);
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    /// Bits written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zero-fill the last partial byte and return the packed string.
    pub fn finish(mut self) -> BitString {
        if self.bits_used > 0 {
            self.output.push(self.buf << (8 - self.bits_used));
        }
        BitString {
            bytes: self.output,
            len: self.len,
        }
    }
}

/// Forward-only cursor over a [`BitString`].
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a BitString,
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a BitString) -> Self {
        Self { bits, pos: 0 }
    }

    /// Next bit, or `None` at the end of the string.
    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}
