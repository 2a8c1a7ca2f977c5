/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This crate provides a library for encoding a raster of 8-bit BGR
//! pixels into a baseline (ITU-T Rec. T.81) sequential DCT JPEG, wrapped
//! in a JFIF APP0 container.
//!
//! # Usage
//! Add jpeg-encoder to the dependencies in the project Cargo.toml
//!
//! ```toml
//! [dependencies]
//! jpeg-encoder = "0.1.0"
//! ```
//!
//! # Examples
//!
//! ## Encode a raster held in memory to a file.
//! ```no_run
//! use std::fs::File;
//! use jpeg_encoder::{BgrBuffer, EncoderOptions, JpegEncoder};
//!
//! let pixels = vec![0u8; 64 * 64 * 3]; // 64x64 BGR8, solid black
//! let raster = BgrBuffer::new(&pixels, 64, 64).unwrap();
//! let encoder = JpegEncoder::new(EncoderOptions::default()).unwrap();
//! let mut file = File::create("out.jpg").unwrap();
//! encoder.encode(&raster, &mut file).unwrap();
//! ```
//!
//! # Crate scope
//! This encoder only implements the baseline sequential profile: no
//! progressive, lossless, or arithmetic-coded scans, fixed 1:1:1 chroma
//! sampling, no restart markers, and only the standard Annex K
//! quantization and Huffman tables (no custom table optimization).
//! Decoding an image from disk, resolving a filesystem path, and parsing
//! command-line arguments are all out of scope; callers supply a raster
//! and a seekable sink.

pub mod bitwriter;
pub mod encoder;
pub mod errors;
pub mod huffman;
pub mod raster;
pub mod rlc;
pub mod segments;
pub mod tables;
pub mod transform;
pub mod value_coder;
pub mod zigzag;

pub use encoder::{EncoderOptions, JpegEncoder};
pub use errors::EncodeError;
pub use raster::{BgrBuffer, PaddedRaster, RasterSource};
