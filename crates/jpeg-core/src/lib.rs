/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Byte-sink plumbing shared by the baseline JPEG encoder.
//!
//! This crate plays the same role `zune-core` plays for the `zune-image`
//! family: it has no knowledge of JPEG, Huffman codes or DCTs, it only
//! knows how to talk to an output byte sink.
//!
//! The one piece of functionality a JPEG segment writer needs that a plain
//! [`std::io::Write`] does not give you is seeking: segment lengths are
//! written as a placeholder and patched in afterwards once the payload size
//! is known. [`io::ByteSink`] expresses exactly that contract.

pub mod error;
pub mod io;

pub use error::IoError;
pub use io::ByteSink;
