// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Per-plane Huffman coding of quantized coefficients.
//!
//! The tree is built from the symbol frequencies of one whole plane, turned
//! into a [`CodeTable`] and then discarded. The table travels next to the
//! encoded bits; the bit stream itself is not self-describing.
//!
//! Tree nodes live in an arena and refer to their children by index. A node's
//! index is also its creation order, which breaks frequency ties: on equal
//! frequency the node created earlier is merged first and becomes the left
//! (`0`) child.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt;

use tracing::trace;

use super::bitio::{BitString, BitWriter};
use super::error::{CodecError, Result};

/// A quantized coefficient value.
pub type Symbol = i16;

/// Occurrence counts, in order of each symbol's first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(Symbol, u64)>,
}

impl FrequencyTable {
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let mut index: HashMap<Symbol, usize> = HashMap::new();
        let mut entries: Vec<(Symbol, u64)> = Vec::new();
        for &s in symbols {
            let i = *index.entry(s).or_insert_with(|| {
                entries.push((s, 0));
                entries.len() - 1
            });
            entries[i].1 += 1;
        }
        Self { entries }
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.1).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.entries.iter().copied()
    }
}

#[derive(Debug, Clone)]
struct Node {
    /// Meaningful only at leaves.
    symbol: Symbol,
    frequency: u64,
    children: Option<(usize, usize)>,
}

/// Binary Huffman tree stored as an arena.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl HuffmanTree {
    /// Greedy bottom-up construction: repeatedly merge the two lowest-frequency nodes.
    pub fn build(freqs: &FrequencyTable) -> Self {
        let mut nodes: Vec<Node> = Vec::with_capacity(freqs.len() * 2);
        let mut heap = BinaryHeap::with_capacity(freqs.len());

        for (symbol, frequency) in freqs.iter() {
            heap.push(Reverse((frequency, nodes.len())));
            nodes.push(Node {
                symbol,
                frequency,
                children: None,
            });
        }

        while heap.len() > 1 {
            let (Some(Reverse((lf, left))), Some(Reverse((rf, right)))) = (heap.pop(), heap.pop())
            else {
                break;
            };
            heap.push(Reverse((lf + rf, nodes.len())));
            nodes.push(Node {
                symbol: 0,
                frequency: lf + rf,
                children: Some((left, right)),
            });
        }

        let root = heap.pop().map(|Reverse((_, idx))| idx);
        Self { nodes, root }
    }

    /// Frequency at the root, i.e. the number of coded symbols.
    pub fn total_frequency(&self) -> u64 {
        self.root.map_or(0, |r| self.nodes[r].frequency)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.children.is_none()).count()
    }

    /// Assign `0` to every left edge and `1` to every right edge.
    ///
    /// A root-only tree gets the one-bit code `0`.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = BTreeMap::new();
        let Some(root) = self.root else {
            return CodeTable { codes };
        };

        let mut stack = vec![(root, 0u64, 0u8)];
        while let Some((idx, bits, len)) = stack.pop() {
            let node = &self.nodes[idx];
            match node.children {
                None => {
                    let len = len.max(1);
                    codes.insert(node.symbol, Code { bits, len });
                }
                Some((left, right)) => {
                    debug_assert!(len < 64, "Huffman code longer than 64 bits");
                    stack.push((right, (bits << 1) | 1, len + 1));
                    stack.push((left, bits << 1, len + 1));
                }
            }
        }
        CodeTable { codes }
    }
}

/// A variable-length code: the low `len` bits of `bits`, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// Whether `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if (self.bits >> i) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol → prefix code mapping for one plane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Count frequencies, build the tree and extract its codes.
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let freqs = FrequencyTable::from_symbols(symbols);
        let tree = HuffmanTree::build(&freqs);
        debug_assert_eq!(tree.total_frequency(), freqs.total());
        let table = tree.code_table();
        trace!(
            symbols = freqs.total(),
            distinct = tree.leaf_count(),
            max_code_len = table.max_code_len(),
            "built Huffman table"
        );
        table
    }

    pub fn get(&self, symbol: Symbol) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    /// Number of coded symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn max_code_len(&self) -> u8 {
        self.codes.values().map(|c| c.len).max().unwrap_or(0)
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Code)> + '_ {
        self.codes.iter().map(|(&s, &c)| (s, c))
    }

    /// True if no code is a prefix of (or equal to) another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<Code> = self.codes.values().copied().collect();
        // Ordered by left-aligned value, any prefix sits directly before a code it prefixes.
        codes.sort_by_key(|c| (c.bits << (64 - c.len as u32), c.len));
        codes.windows(2).all(|w| !w[0].is_prefix_of(&w[1]))
    }

    /// Total bits `symbols` encode to, or `None` if one has no code.
    pub fn encoded_len(&self, symbols: &[Symbol]) -> Option<usize> {
        symbols
            .iter()
            .map(|s| self.codes.get(s).map(|c| c.len as usize))
            .sum()
    }

    /// Concatenate the code of each symbol.
    pub fn encode(&self, symbols: &[Symbol]) -> Result<BitString> {
        let mut writer = BitWriter::with_capacity_bits(self.encoded_len(symbols).unwrap_or(0));
        for &s in symbols {
            let code = self.codes.get(&s).ok_or(CodecError::MissingCode(s))?;
            writer.write_bits(code.bits, code.len);
        }
        Ok(writer.finish())
    }

    /// Build the inverse (code → symbol) mapping.
    pub fn decoder(&self) -> DecodeTable {
        DecodeTable {
            lookup: self.codes.iter().map(|(&s, c)| ((c.len, c.bits), s)).collect(),
            max_len: self.max_code_len(),
        }
    }

    /// Decode a bit string produced with this table.
    pub fn decode(&self, bits: &BitString) -> Result<Vec<Symbol>> {
        self.decoder().decode(bits)
    }
}

/// Inverse of a [`CodeTable`], keyed by (length, code).
#[derive(Debug, Clone)]
pub struct DecodeTable {
    lookup: HashMap<(u8, u64), Symbol>,
    max_len: u8,
}

impl DecodeTable {
    /// Walk the stream bit by bit, emitting a symbol and resetting the
    /// accumulated prefix whenever it matches a code.
    ///
    /// A prefix that reaches the longest code length without matching, or a
    /// stream that ends mid-code, is a [`CodecError::HuffmanDecode`].
    pub fn decode(&self, bits: &BitString) -> Result<Vec<Symbol>> {
        let mut out = Vec::new();
        let mut reader = bits.reader();
        let mut acc = 0u64;
        let mut len = 0u8;

        while let Some(bit) = reader.read_bit() {
            acc = (acc << 1) | bit as u64;
            len += 1;
            if let Some(&symbol) = self.lookup.get(&(len, acc)) {
                out.push(symbol);
                acc = 0;
                len = 0;
            } else if len >= self.max_len {
                return Err(CodecError::HuffmanDecode {
                    consumed: reader.position(),
                });
            }
        }

        if len != 0 {
            return Err(CodecError::HuffmanDecode {
                consumed: reader.position(),
            });
        }
        Ok(out)
    }
}

/// Build a table over `symbols` and encode them with it.
pub fn encode_symbols(symbols: &[Symbol]) -> Result<(BitString, CodeTable)> {
    let table = CodeTable::from_symbols(symbols);
    let bits = table.encode(symbols)?;
    Ok((bits, table))
}

/// Decode `bits` with a table received out of band.
pub fn decode_symbols(bits: &BitString, table: &CodeTable) -> Result<Vec<Symbol>> {
    table.decode(bits)
}
