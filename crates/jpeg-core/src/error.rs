/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors produced while talking to a [`crate::io::ByteSink`].

use core::fmt::{Debug, Display, Formatter};

/// An I/O failure encountered while writing to or seeking within a sink.
pub enum IoError {
    /// The underlying writer returned an error.
    StdIo(std::io::Error),
    /// A `tell`/`seek` round-trip did not land where it was expected to;
    /// this indicates the sink is not honoring the `Seek` contract.
    BadSeek(&'static str),
}

impl Debug for IoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            IoError::StdIo(e) => write!(f, "I/O error: {e}"),
            IoError::BadSeek(msg) => write!(f, "seek error: {msg}"),
        }
    }
}

impl Display for IoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        IoError::StdIo(value)
    }
}
