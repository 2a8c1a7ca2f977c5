/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A seekable byte sink.
//!
//! Encapsulates a simple byte writer with position queries and seeking,
//! the minimum a JPEG segment writer needs to back-patch a length field
//! after writing a payload of unknown-in-advance size.

use std::io::{Seek, SeekFrom, Write};

use crate::error::IoError;

/// The output contract an encoder writes against.
///
/// Any type implementing both [`Write`] and [`Seek`] gets this for free
/// (see the blanket impl below) — a [`std::io::Cursor<Vec<u8>>`] or a
/// [`std::fs::File`] both qualify.
pub trait ByteSink {
    /// Write all of `buf` to the sink.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), IoError>;

    /// Current byte offset from the start of the stream.
    fn tell(&mut self) -> Result<u64, IoError>;

    /// Move the write position to an absolute byte offset from the start.
    fn seek_to(&mut self, pos: u64) -> Result<(), IoError>;

    /// Flush any buffered bytes to the underlying device.
    fn flush(&mut self) -> Result<(), IoError>;
}

impl<T: Write + Seek> ByteSink for T {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), IoError> {
        Write::write_all(self, buf)?;
        Ok(())
    }

    fn tell(&mut self) -> Result<u64, IoError> {
        Ok(self.stream_position()?)
    }

    fn seek_to(&mut self, pos: u64) -> Result<(), IoError> {
        self.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        Write::flush(self)?;
        Ok(())
    }
}
