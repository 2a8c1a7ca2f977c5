/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Marker segment framing: big-endian lengths back-patched after the
//! payload they describe.

use jpeg_core::ByteSink;

use crate::errors::EncodeError;
use crate::tables::{HuffDef, CHROMA_TABLE_ID, LUMA_TABLE_ID};

pub const MARKER_SOI: u8 = 0xD8;
pub const MARKER_APP0: u8 = 0xE0;
pub const MARKER_COM: u8 = 0xFE;
pub const MARKER_DQT: u8 = 0xDB;
pub const MARKER_SOF0: u8 = 0xC0;
pub const MARKER_DHT: u8 = 0xC4;
pub const MARKER_SOS: u8 = 0xDA;
pub const MARKER_EOI: u8 = 0xD9;

fn write_marker<S: ByteSink>(sink: &mut S, marker: u8) -> Result<(), EncodeError> {
    sink.write_all(&[0xFF, marker])?;
    Ok(())
}

/// Write `marker`, a placeholder length, `write_payload`'s output, then
/// seek back and overwrite the placeholder with the true length: the
/// byte distance from the length field itself to the end of the payload.
pub fn emit_segment<S: ByteSink>(
    sink: &mut S,
    marker: u8,
    write_payload: impl FnOnce(&mut S) -> Result<(), EncodeError>,
) -> Result<(), EncodeError> {
    write_marker(sink, marker)?;
    let length_pos = sink.tell()?;
    sink.write_all(&[0, 0])?;
    write_payload(sink)?;
    let end_pos = sink.tell()?;
    let length = end_pos - length_pos;
    let length: u16 = length
        .try_into()
        .map_err(|_| EncodeError::InternalInvariant("segment payload exceeds 16-bit length field"))?;
    sink.seek_to(length_pos)?;
    sink.write_all(&length.to_be_bytes())?;
    sink.seek_to(end_pos)?;
    Ok(())
}

/// `SOI`: start of image, marker only, no length field.
pub fn write_soi<S: ByteSink>(sink: &mut S) -> Result<(), EncodeError> {
    write_marker(sink, MARKER_SOI)
}

/// `EOI`: end of image, marker only, no length field.
pub fn write_eoi<S: ByteSink>(sink: &mut S) -> Result<(), EncodeError> {
    write_marker(sink, MARKER_EOI)
}

/// `APP0`, the JFIF application segment. `density_x`/`density_y` are in
/// dots per inch.
pub fn write_app0<S: ByteSink>(sink: &mut S, density_x: u16, density_y: u16) -> Result<(), EncodeError> {
    emit_segment(sink, MARKER_APP0, |s| {
        s.write_all(b"JFIF\0")?;
        s.write_all(&[0x01, 0x01])?; // version 1.01
        s.write_all(&[0x01])?; // units: DPI
        s.write_all(&density_x.to_be_bytes())?;
        s.write_all(&density_y.to_be_bytes())?;
        s.write_all(&[0, 0])?; // no embedded thumbnail
        Ok(())
    })
}

/// `COM`, a free-text comment segment.
pub fn write_com<S: ByteSink>(sink: &mut S, comment: &[u8]) -> Result<(), EncodeError> {
    emit_segment(sink, MARKER_COM, |s| {
        s.write_all(comment)?;
        Ok(())
    })
}

fn write_quant_table<S: ByteSink>(sink: &mut S, table_id: u8, table: &[u16; 64]) -> Result<(), EncodeError> {
    let pq_tq = table_id & 0x0F; // precision (Pq) 0 in the high nibble
    sink.write_all(&[pq_tq])?;
    for &entry in table {
        sink.write_all(&[entry as u8])?;
    }
    Ok(())
}

/// `DQT`, both quantization tables batched into a single segment.
pub fn write_dqt<S: ByteSink>(sink: &mut S, luma: &[u16; 64], chroma: &[u16; 64]) -> Result<(), EncodeError> {
    emit_segment(sink, MARKER_DQT, |s| {
        write_quant_table(s, LUMA_TABLE_ID, luma)?;
        write_quant_table(s, CHROMA_TABLE_ID, chroma)?;
        Ok(())
    })
}

/// `SOF0`, baseline DCT frame header. `width`/`height` are the true,
/// unpadded image dimensions. Sampling factors are fixed at 1:1:1.
pub fn write_sof0<S: ByteSink>(sink: &mut S, width: u16, height: u16) -> Result<(), EncodeError> {
    emit_segment(sink, MARKER_SOF0, |s| {
        s.write_all(&[8])?; // sample precision
        s.write_all(&height.to_be_bytes())?;
        s.write_all(&width.to_be_bytes())?;
        s.write_all(&[3])?; // component count
        for (id, qtable) in [(1u8, LUMA_TABLE_ID), (2, CHROMA_TABLE_ID), (3, CHROMA_TABLE_ID)] {
            s.write_all(&[id, (1 << 4) | 1, qtable])?;
        }
        Ok(())
    })
}

fn write_huff_def<S: ByteSink>(sink: &mut S, class: u8, id: u8, def: &HuffDef) -> Result<(), EncodeError> {
    sink.write_all(&[(class << 4) | id])?;
    sink.write_all(&def.bits)?;
    sink.write_all(def.huffval)?;
    Ok(())
}

/// `DHT`, all four standard tables in the order DC-Y, AC-Y, DC-C, AC-C.
pub fn write_dht<S: ByteSink>(
    sink: &mut S,
    dc_luma: &HuffDef,
    ac_luma: &HuffDef,
    dc_chroma: &HuffDef,
    ac_chroma: &HuffDef,
) -> Result<(), EncodeError> {
    emit_segment(sink, MARKER_DHT, |s| {
        write_huff_def(s, 0, LUMA_TABLE_ID, dc_luma)?;
        write_huff_def(s, 1, LUMA_TABLE_ID, ac_luma)?;
        write_huff_def(s, 0, CHROMA_TABLE_ID, dc_chroma)?;
        write_huff_def(s, 1, CHROMA_TABLE_ID, ac_chroma)?;
        Ok(())
    })
}

/// `SOS`, the scan header. Fixed to three components, Y then Cb then Cr,
/// spectral selection `0..=63` (no progressive passes).
pub fn write_sos<S: ByteSink>(sink: &mut S) -> Result<(), EncodeError> {
    emit_segment(sink, MARKER_SOS, |s| {
        s.write_all(&[3])?;
        s.write_all(&[1, (0 << 4) | 0])?; // Y: DC table 0, AC table 0
        s.write_all(&[2, (1 << 4) | 1])?; // Cb: DC table 1, AC table 1
        s.write_all(&[3, (1 << 4) | 1])?; // Cr: DC table 1, AC table 1
        s.write_all(&[0x00, 0x3F, 0x00])?; // Ss, Se, Ah|Al
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sink() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    #[test]
    fn soi_and_eoi_are_marker_only() {
        let mut s = sink();
        write_soi(&mut s).unwrap();
        write_eoi(&mut s).unwrap();
        assert_eq!(s.into_inner(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn app0_length_matches_payload_plus_length_field() {
        let mut s = sink();
        write_app0(&mut s, 72, 72).unwrap();
        let bytes = s.into_inner();
        assert_eq!(&bytes[0..2], &[0xFF, MARKER_APP0]);
        let len = u16::from_be_bytes([bytes[2], bytes[3]]);
        // length field (2) + identifier (5) + version (2) + units (1) + 2x density (4) + thumb (2)
        assert_eq!(len as usize, 2 + 5 + 2 + 1 + 4 + 2);
        assert_eq!(len as usize + 2, bytes.len()); // +2 for the marker itself
        assert_eq!(&bytes[4..9], b"JFIF\0");
    }

    #[test]
    fn com_length_covers_the_comment_text() {
        let mut s = sink();
        write_com(&mut s, b"hello").unwrap();
        let bytes = s.into_inner();
        let len = u16::from_be_bytes([bytes[2], bytes[3]]);
        assert_eq!(len as usize, 2 + 5);
        assert_eq!(&bytes[4..9], b"hello");
    }

    #[test]
    fn dqt_writes_both_tables_in_zigzag_order() {
        let luma = crate::tables::LUMA_QT_ZIGZAG;
        let chroma = crate::tables::CHROMA_QT_ZIGZAG;
        let mut s = sink();
        write_dqt(&mut s, &luma, &chroma).unwrap();
        let bytes = s.into_inner();
        let len = u16::from_be_bytes([bytes[2], bytes[3]]);
        assert_eq!(len as usize, 2 + (1 + 64) * 2);
        assert_eq!(bytes[4], LUMA_TABLE_ID); // PqTq byte for the first table
        assert_eq!(bytes[5] as u16, luma[0]);
        let second_table_start = 4 + 1 + 64;
        assert_eq!(bytes[second_table_start], CHROMA_TABLE_ID);
    }

    #[test]
    fn sof0_reports_true_unpadded_dimensions() {
        let mut s = sink();
        write_sof0(&mut s, 1920, 1080).unwrap();
        let bytes = s.into_inner();
        let height = u16::from_be_bytes([bytes[5], bytes[6]]);
        let width = u16::from_be_bytes([bytes[7], bytes[8]]);
        assert_eq!(height, 1080);
        assert_eq!(width, 1920);
        assert_eq!(bytes[9], 3); // component count
    }

    #[test]
    fn sos_selects_luma_tables_for_y_and_chroma_tables_for_cb_cr() {
        let mut s = sink();
        write_sos(&mut s).unwrap();
        let bytes = s.into_inner();
        // payload starts at offset 4: count, then 3x (id, tableSelectors)
        assert_eq!(bytes[4], 3);
        assert_eq!(bytes[5], 1);
        assert_eq!(bytes[6], 0x00);
        assert_eq!(bytes[7], 2);
        assert_eq!(bytes[8], 0x11);
        assert_eq!(bytes[9], 3);
        assert_eq!(bytes[10], 0x11);
    }

    #[test]
    fn dht_orders_tables_dc_luma_ac_luma_dc_chroma_ac_chroma() {
        use crate::tables::{STD_AC_CHROMA, STD_AC_LUMA, STD_DC_CHROMA, STD_DC_LUMA};
        let mut s = sink();
        write_dht(&mut s, &STD_DC_LUMA, &STD_AC_LUMA, &STD_DC_CHROMA, &STD_AC_CHROMA).unwrap();
        let bytes = s.into_inner();
        let mut offset = 4;
        assert_eq!(bytes[offset], (0 << 4) | LUMA_TABLE_ID);
        offset += 1 + 16 + STD_DC_LUMA.huffval.len();
        assert_eq!(bytes[offset], (1 << 4) | LUMA_TABLE_ID);
        offset += 1 + 16 + STD_AC_LUMA.huffval.len();
        assert_eq!(bytes[offset], (0 << 4) | CHROMA_TABLE_ID);
        offset += 1 + 16 + STD_DC_CHROMA.huffval.len();
        assert_eq!(bytes[offset], (1 << 4) | CHROMA_TABLE_ID);
    }
}
