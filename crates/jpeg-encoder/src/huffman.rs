/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical Huffman code construction (ITU-T T.81 Annex C).
//!
//! Builds a symbol -> (code, length) map from a `(BITS, HUFFVAL)` table
//! definition, the same representation the `DHT` segment serializes.

use crate::errors::EncodeError;

/// A canonical Huffman code: `length` low bits of `code`, written
/// most-significant-bit first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct HuffCode {
    pub code: u16,
    pub length: u8,
}

/// A built Huffman table: the source `(BITS, HUFFVAL)` definition (needed
/// verbatim to serialize the `DHT` segment) plus the derived symbol -> code
/// map used by the entropy serializer.
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    /// `bits[i]` (`i` 0-based) is the number of codes of length `i + 1`.
    pub bits: [u8; 16],
    /// Symbols in the order they're listed in the table definition,
    /// grouped by ascending code length.
    pub huffval: Vec<u8>,
    codes: [Option<HuffCode>; 256],
}

impl HuffmanTable {
    /// Build the canonical code map for a `(BITS, HUFFVAL)` pair as
    /// defined in T.81 Annex C: walk lengths 1..=16 in order, assigning
    /// consecutive codes to each length's symbols (in listed order) and
    /// left-shifting the running code by one between lengths.
    pub fn build(bits: [u8; 16], huffval: Vec<u8>) -> Result<Self, EncodeError> {
        let total: usize = bits.iter().map(|&b| b as usize).sum();
        if total != huffval.len() {
            return Err(EncodeError::InternalInvariant(
                "Huffman BITS counts do not match HUFFVAL length",
            ));
        }

        let mut codes: [Option<HuffCode>; 256] = [None; 256];
        let mut code: u16 = 0;
        let mut val_idx = 0usize;

        for (len_idx, &count) in bits.iter().enumerate() {
            let length = (len_idx + 1) as u8;
            for _ in 0..count {
                let symbol = huffval[val_idx];
                if codes[symbol as usize].is_some() {
                    return Err(EncodeError::InternalInvariant(
                        "Huffman table assigns the same symbol twice",
                    ));
                }
                codes[symbol as usize] = Some(HuffCode { code, length });
                code += 1;
                val_idx += 1;
            }
            code <<= 1;
        }

        Ok(HuffmanTable {
            bits,
            huffval,
            codes,
        })
    }

    /// Look up the Huffman code for `symbol`.
    ///
    /// # Errors
    /// Returns [`EncodeError::InternalInvariant`] if `symbol` was never
    /// assigned a code by this table; for the standard Annex K tables this
    /// can only happen if the RLC coder produced a symbol outside 0..=0xF0
    /// with a nonsense run/category combination, i.e. a bug upstream.
    #[inline]
    pub fn code_for(&self, symbol: u8) -> Result<HuffCode, EncodeError> {
        self.codes[symbol as usize].ok_or(EncodeError::InternalInvariant(
            "no Huffman code assigned for required symbol",
        ))
    }
}
