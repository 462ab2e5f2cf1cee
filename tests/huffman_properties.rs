// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Property tests for per-plane Huffman coding.

use jfif_core::jpeg::huffman::{FrequencyTable, HuffmanTree, Symbol};
use jfif_core::{decode_symbols, encode_symbols, CodeTable};

fn symbols(u: &mut arbtest::arbitrary::Unstructured<'_>) -> arbtest::arbitrary::Result<Vec<Symbol>> {
    // A small alphabet makes repeated symbols and ties likely.
    let alphabet = u.int_in_range(1i16..=40)?;
    let len = u.int_in_range(0usize..=600)?;
    (0..len)
        .map(|_| u.int_in_range(-alphabet..=alphabet))
        .collect()
}

#[test]
fn roundtrip_any_sequence() {
    arbtest::arbtest(|u| {
        let input = symbols(u)?;
        let (bits, table) = encode_symbols(&input).unwrap();
        assert_eq!(decode_symbols(&bits, &table).unwrap(), input);
        Ok(())
    });
}

#[test]
fn codes_are_prefix_free_and_unique() {
    arbtest::arbtest(|u| {
        let input = symbols(u)?;
        let table = CodeTable::from_symbols(&input);
        assert!(table.is_prefix_free());
        let mut codes: Vec<String> = table.iter().map(|(_, c)| c.to_string()).collect();
        let n = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), n);
        Ok(())
    });
}

#[test]
fn code_lengths_fill_the_kraft_sum() {
    arbtest::arbtest(|u| {
        let input = symbols(u)?;
        let table = CodeTable::from_symbols(&input);
        if table.len() >= 2 {
            let kraft: f64 = table.iter().map(|(_, c)| 0.5f64.powi(c.len as i32)).sum();
            assert!((kraft - 1.0).abs() < 1e-12, "kraft sum {kraft}");
        }
        Ok(())
    });
}

#[test]
fn encoded_length_is_weighted_depth() {
    arbtest::arbtest(|u| {
        let input = symbols(u)?;
        let freqs = FrequencyTable::from_symbols(&input);
        let tree = HuffmanTree::build(&freqs);
        let table = tree.code_table();
        let expected: u64 = freqs
            .iter()
            .map(|(s, f)| f * table.get(s).unwrap().len as u64)
            .sum();
        let (bits, _) = encode_symbols(&input).unwrap();
        assert_eq!(bits.len() as u64, expected);
        assert_eq!(tree.total_frequency(), input.len() as u64);
        Ok(())
    });
}

#[test]
fn degenerate_inputs() {
    let (bits, table) = encode_symbols(&[]).unwrap();
    assert!(bits.is_empty());
    assert!(table.is_empty());
    assert_eq!(decode_symbols(&bits, &table).unwrap(), Vec::<Symbol>::new());

    let run = vec![0; 64];
    let (bits, table) = encode_symbols(&run).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(bits.len(), 64);
    assert_eq!(decode_symbols(&bits, &table).unwrap(), run);
}
