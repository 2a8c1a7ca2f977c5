/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors the encoder can surface.

use core::fmt::{Debug, Display, Formatter};

use jpeg_core::IoError;

/// Errors the encoder can return.
pub enum EncodeError {
    /// The raster does not satisfy the input contract (empty, wrong
    /// channel count, or wrong component depth).
    InvalidInput(String),
    /// A sink write, seek, or tell failed.
    Io(IoError),
    /// A defensive check failed; this indicates a bug in the encoder
    /// itself rather than a problem with the caller's input.
    InternalInvariant(&'static str),
}

impl Debug for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            EncodeError::Io(e) => write!(f, "I/O error: {e:?}"),
            EncodeError::InternalInvariant(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for EncodeError {}

impl From<IoError> for EncodeError {
    fn from(value: IoError) -> Self {
        EncodeError::Io(value)
    }
}
