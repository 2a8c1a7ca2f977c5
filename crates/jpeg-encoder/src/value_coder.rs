/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The amplitude coder: category (SSSS) and sign-magnitude bit strings.
//!
//! Every DC difference and AC coefficient is carried on the wire as a
//! Huffman-coded "category" symbol followed by `category` raw bits giving
//! the value within that category. This module computes both halves.

/// The category (SSSS) of a signed amplitude: the number of bits needed to
/// represent `|v|`, or 0 for `v == 0`.
///
/// `category(0) == 0`; otherwise `category(v) == floor(log2(|v|)) + 1`.
#[inline]
#[must_use]
pub fn category(v: i32) -> u8 {
    if v == 0 {
        return 0;
    }
    // `ilog2` on the magnitude already gives `floor(log2(|v|))`; integer
    // arithmetic avoids the boundary errors a float log would introduce
    // right at powers of two (e.g. |v| == 1024 must yield 11, not 10).
    (v.unsigned_abs().ilog2() + 1) as u8
}

/// The `category(v)`-bit sign-magnitude amplitude attached after a
/// Huffman code, packed into the low bits of the returned `u16`.
///
/// For `v > 0` this is simply the binary representation of `v`. For
/// `v < 0` it is the one's complement of `|v|`, i.e. `v + (2^category - 1)`.
/// Returns `(0, 0)` for `v == 0` (no bits follow a zero-category symbol).
#[inline]
#[must_use]
pub fn bits(v: i32) -> (u16, u8) {
    let cat = category(v);
    if cat == 0 {
        return (0, 0);
    }
    let code = if v > 0 {
        v as u16
    } else {
        (v + ((1 << cat) - 1)) as u16
    };
    (code, cat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_of_zero_is_zero() {
        assert_eq!(category(0), 0);
    }

    #[test]
    fn category_matches_floor_log2_plus_one() {
        for v in 1..=2047i32 {
            let expected = (v as f64).log2().floor() as u8 + 1;
            assert_eq!(category(v), expected, "v={v}");
            assert_eq!(category(-v), expected, "v={v}");
        }
    }

    #[test]
    fn category_boundary_at_power_of_two() {
        // |v| == 1024 == 2^10 must land in category 11, not 10.
        assert_eq!(category(1024), 11);
        assert_eq!(category(1023), 10);
        assert_eq!(category(-1024), 11);
    }

    #[test]
    fn bits_len_matches_category() {
        for v in -2047..=2047i32 {
            let (_, len) = bits(v);
            assert_eq!(len, category(v));
        }
    }

    #[test]
    fn value_coder_round_trips() {
        for v in -2047..=2047i32 {
            if v == 0 {
                continue;
            }
            let cat = category(v);
            let (code, len) = bits(v);
            assert_eq!(len, cat);
            let top_bit_set = (code >> (cat - 1)) & 1 == 1;
            let decoded = if top_bit_set {
                i32::from(code)
            } else {
                i32::from(code) - ((1 << cat) - 1)
            };
            assert_eq!(decoded, v, "round-trip failed for v={v}");
        }
    }
}
