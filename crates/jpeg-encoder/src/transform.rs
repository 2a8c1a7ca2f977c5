/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Color conversion, level shift, forward DCT, and quantization.
//!
//! This is the only floating-point stage of the pipeline; everything
//! downstream of [`quantize`] works on plain integers.

use std::f64::consts::PI;

/// One 8x8 block of transform-domain samples, natural (row-major) order.
pub type Block = [[f64; 8]; 8];

/// One 8x8 block of quantized coefficients, natural (row-major) order.
pub type QuantBlock = [[i32; 8]; 8];

/// BGR -> YCbCr, full range, BT.601 coefficients (JFIF 1.02).
///
/// Returns `(y, cb, cr)` samples in `[0, 255]`. The component order here
/// is fixed as Y, Cb, Cr; callers must not reorder it.
#[inline]
#[must_use]
pub fn bgr_to_ycbcr(bgr: [u8; 3]) -> (f64, f64, f64) {
    let [b, g, r] = bgr.map(f64::from);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.168_736 * r - 0.331_264 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.418_688 * g - 0.081_312 * b + 128.0;
    (y, cb, cr)
}

/// Subtract 128 from every sample, promoting to `f64` in the process.
#[must_use]
pub fn level_shift(samples: [[f64; 8]; 8]) -> Block {
    let mut out = [[0.0; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            out[row][col] = samples[row][col] - 128.0;
        }
    }
    out
}

/// `C(k)` from the forward DCT-II definition: `1/sqrt(2)` at `k == 0`,
/// `1` otherwise.
#[inline]
fn c(k: usize) -> f64 {
    if k == 0 {
        std::f64::consts::FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// Forward 2D DCT-II, orthonormal, JPEG conventions:
///
/// `F(u,v) = 1/4 * C(u) * C(v) * sum_x sum_y f(x,y) * cos((2x+1)u*pi/16) * cos((2y+1)v*pi/16)`
#[must_use]
pub fn forward_dct(block: &Block) -> Block {
    let mut out = [[0.0; 8]; 8];
    for u in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for x in 0..8 {
                for y in 0..8 {
                    sum += block[x][y]
                        * ((2 * x + 1) as f64 * u as f64 * PI / 16.0).cos()
                        * ((2 * y + 1) as f64 * v as f64 * PI / 16.0).cos();
                }
            }
            out[u][v] = 0.25 * c(u) * c(v) * sum;
        }
    }
    out
}

/// Round `v` to the nearest integer, ties away from zero (as opposed to
/// `f64::round_ties_even`, which JPEG quantization does not use).
#[inline]
fn round_half_away_from_zero(v: f64) -> i32 {
    if v >= 0.0 {
        (v + 0.5).floor() as i32
    } else {
        (v - 0.5).ceil() as i32
    }
}

/// Divide `coeffs` point-wise by `quant`, both in natural (row-major)
/// order, rounding each result to the nearest integer with ties away
/// from zero.
#[must_use]
pub fn quantize(coeffs: &Block, quant: &[[u16; 8]; 8]) -> QuantBlock {
    let mut out = [[0i32; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            out[row][col] = round_half_away_from_zero(coeffs[row][col] / f64::from(quant[row][col]));
        }
    }
    out
}

/// Run the full per-channel transform: level shift, forward DCT, quantize.
#[must_use]
pub fn transform_block(samples: [[f64; 8]; 8], quant: &[[u16; 8]; 8]) -> QuantBlock {
    let shifted = level_shift(samples);
    let dct = forward_dct(&shifted);
    quantize(&dct, quant)
}
