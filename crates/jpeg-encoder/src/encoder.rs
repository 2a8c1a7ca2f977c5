/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The pipeline driver: wires the block transformer, RLC coder, entropy
//! serializer, and segment writer together into one baseline JPEG encode.

use log::{debug, trace, warn};

use jpeg_core::ByteSink;

use crate::bitwriter::BitWriter;
use crate::errors::EncodeError;
use crate::huffman::HuffmanTable;
use crate::raster::{PaddedRaster, RasterSource};
use crate::rlc::{self, AcEntry};
use crate::segments;
use crate::tables::{
    CHROMA_QT_ZIGZAG, LUMA_QT_ZIGZAG, STD_AC_CHROMA, STD_AC_LUMA, STD_DC_CHROMA, STD_DC_LUMA,
};
use crate::transform;
use crate::zigzag::ZIGZAG_INV;

/// Text written into the `COM` segment when a caller doesn't supply
/// their own, matching the original encoder's always-present comment.
const DEFAULT_COMMENT: &[u8] = b"Encoded by jpeg-encoder";

/// Knobs a caller may set before encoding; everything else (sampling
/// factors, quantization tables, Huffman tables) is fixed, per the
/// baseline-only scope of this encoder.
#[derive(Clone, Debug)]
pub struct EncoderOptions {
    /// Text for the `COM` segment, always written; defaults to
    /// [`DEFAULT_COMMENT`]. Framing always includes a `COM` segment,
    /// so this is overridable, not omittable.
    pub comment: Vec<u8>,
    /// JFIF `Xdensity`, dots per inch. Defaults to 72.
    pub jfif_density_x: u16,
    /// JFIF `Ydensity`, dots per inch. Defaults to 72.
    pub jfif_density_y: u16,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            comment: DEFAULT_COMMENT.to_vec(),
            jfif_density_x: 72,
            jfif_density_y: 72,
        }
    }
}

/// Quantization tables in natural (row-major) order, the layout
/// [`transform::quantize`] expects; derived once from the zig-zag ordered
/// constants [`segments::write_dqt`] serializes.
struct NaturalQuantTables {
    luma: [[u16; 8]; 8],
    chroma: [[u16; 8]; 8],
}

fn to_natural_order(zigzag: &[u16; 64]) -> [[u16; 8]; 8] {
    let mut out = [[0u16; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            out[row][col] = zigzag[ZIGZAG_INV[row][col]];
        }
    }
    out
}

impl NaturalQuantTables {
    fn standard() -> Self {
        NaturalQuantTables {
            luma: to_natural_order(&LUMA_QT_ZIGZAG),
            chroma: to_natural_order(&CHROMA_QT_ZIGZAG),
        }
    }
}

/// The four standard Huffman tables, built once and reused across MCUs
/// (and, if the caller keeps the encoder around, across encode calls).
struct HuffmanTables {
    dc_luma: HuffmanTable,
    ac_luma: HuffmanTable,
    dc_chroma: HuffmanTable,
    ac_chroma: HuffmanTable,
}

impl HuffmanTables {
    fn standard() -> Result<Self, EncodeError> {
        Ok(HuffmanTables {
            dc_luma: HuffmanTable::build(STD_DC_LUMA.bits, STD_DC_LUMA.huffval.to_vec())?,
            ac_luma: HuffmanTable::build(STD_AC_LUMA.bits, STD_AC_LUMA.huffval.to_vec())?,
            dc_chroma: HuffmanTable::build(STD_DC_CHROMA.bits, STD_DC_CHROMA.huffval.to_vec())?,
            ac_chroma: HuffmanTable::build(STD_AC_CHROMA.bits, STD_AC_CHROMA.huffval.to_vec())?,
        })
    }
}

/// A baseline JPEG/JFIF encoder: owns the standard quantization and
/// Huffman tables and drives the full encode pipeline against a raster
/// source and a seekable byte sink.
pub struct JpegEncoder {
    options: EncoderOptions,
    quant: NaturalQuantTables,
    huffman: HuffmanTables,
}

impl JpegEncoder {
    /// Build an encoder with the given options, standard Annex K tables.
    pub fn new(options: EncoderOptions) -> Result<Self, EncodeError> {
        Ok(JpegEncoder {
            options,
            quant: NaturalQuantTables::standard(),
            huffman: HuffmanTables::standard()?,
        })
    }

    /// Encode `raster` as a complete JFIF JPEG file into `sink`.
    pub fn encode<R: RasterSource, S: ByteSink>(&self, raster: &R, sink: &mut S) -> Result<(), EncodeError> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(EncodeError::InvalidInput(
                "raster must have nonzero width and height".to_string(),
            ));
        }

        let width: u16 = raster
            .width()
            .try_into()
            .map_err(|_| EncodeError::InvalidInput("raster width exceeds 16-bit JPEG limit".to_string()))?;
        let height: u16 = raster
            .height()
            .try_into()
            .map_err(|_| EncodeError::InvalidInput("raster height exceeds 16-bit JPEG limit".to_string()))?;

        let padded = PaddedRaster::new(raster);
        debug!(
            "encoding {}x{} raster, padded to {}x{}",
            raster.width(),
            raster.height(),
            padded.padded_width,
            padded.padded_height
        );
        if padded.padded_width != raster.width() || padded.padded_height != raster.height() {
            warn!(
                "raster {}x{} is not a multiple of 8, padding by edge replication to {}x{}",
                raster.width(),
                raster.height(),
                padded.padded_width,
                padded.padded_height
            );
        }

        log_segment(sink, "SOI", |s| segments::write_soi(s))?;
        log_segment(sink, "APP0", |s| {
            segments::write_app0(s, self.options.jfif_density_x, self.options.jfif_density_y)
        })?;
        log_segment(sink, "COM", |s| segments::write_com(s, &self.options.comment))?;
        log_segment(sink, "DQT", |s| segments::write_dqt(s, &LUMA_QT_ZIGZAG, &CHROMA_QT_ZIGZAG))?;
        log_segment(sink, "SOF0", |s| segments::write_sof0(s, width, height))?;
        log_segment(sink, "DHT", |s| {
            segments::write_dht(s, &STD_DC_LUMA, &STD_AC_LUMA, &STD_DC_CHROMA, &STD_AC_CHROMA)
        })?;
        log_segment(sink, "SOS", |s| segments::write_sos(s))?;

        let scan = self.encode_scan(&padded)?;
        sink.write_all(&scan)?;
        debug!("wrote entropy-coded scan payload: {} bytes", scan.len());

        log_segment(sink, "EOI", |s| segments::write_eoi(s))?;
        sink.flush()?;
        debug!("encode complete");
        Ok(())
    }

    /// Run the MCU loop and return the finalized, byte-stuffed scan payload.
    fn encode_scan<R: RasterSource>(&self, padded: &PaddedRaster<'_, R>) -> Result<Vec<u8>, EncodeError> {
        let mut writer = BitWriter::new();
        // DC predictors: index 0 = Y, 1 = Cb, 2 = Cr. Reset only at scan start.
        let mut predictors = [0i32; 3];

        for mcu_row in 0..padded.mcu_rows() {
            for mcu_col in 0..padded.mcu_cols() {
                trace!("encoding MCU ({mcu_col}, {mcu_row})");
                let (y_block, cb_block, cr_block) = self.transform_mcu(padded, mcu_col, mcu_row);

                let y_rlc = rlc::encode_block(&y_block, &mut predictors[0]);
                let cb_rlc = rlc::encode_block(&cb_block, &mut predictors[1]);
                let cr_rlc = rlc::encode_block(&cr_block, &mut predictors[2]);

                self.serialize_block(&mut writer, &y_rlc, &self.huffman.dc_luma, &self.huffman.ac_luma)?;
                self.serialize_block(&mut writer, &cb_rlc, &self.huffman.dc_chroma, &self.huffman.ac_chroma)?;
                self.serialize_block(&mut writer, &cr_rlc, &self.huffman.dc_chroma, &self.huffman.ac_chroma)?;
            }
        }

        writer.pad_to_byte_with_ones();
        Ok(writer.into_stuffed_bytes())
    }

    /// Color-convert, level-shift, DCT, and quantize one MCU's three
    /// channel blocks. Component order is fixed: Y, Cb, Cr.
    fn transform_mcu<R: RasterSource>(
        &self,
        padded: &PaddedRaster<'_, R>,
        mcu_col: usize,
        mcu_row: usize,
    ) -> (transform::QuantBlock, transform::QuantBlock, transform::QuantBlock) {
        let mut y_samples = [[0.0; 8]; 8];
        let mut cb_samples = [[0.0; 8]; 8];
        let mut cr_samples = [[0.0; 8]; 8];

        let origin_x = mcu_col * 8;
        let origin_y = mcu_row * 8;
        for dy in 0..8 {
            for dx in 0..8 {
                let bgr = padded.pixel(origin_x + dx, origin_y + dy);
                let (y, cb, cr) = transform::bgr_to_ycbcr(bgr);
                y_samples[dy][dx] = y;
                cb_samples[dy][dx] = cb;
                cr_samples[dy][dx] = cr;
            }
        }

        let y_block = transform::transform_block(y_samples, &self.quant.luma);
        let cb_block = transform::transform_block(cb_samples, &self.quant.chroma);
        let cr_block = transform::transform_block(cr_samples, &self.quant.chroma);
        (y_block, cb_block, cr_block)
    }

    /// Append one channel's DC entry and AC run/amplitude sequence to the
    /// bit buffer, using `dc_table`/`ac_table` for the Huffman codes.
    fn serialize_block(
        &self,
        writer: &mut BitWriter,
        block: &rlc::RlcBlock,
        dc_table: &HuffmanTable,
        ac_table: &HuffmanTable,
    ) -> Result<(), EncodeError> {
        let (dc_bits, dc_len) = crate::value_coder::bits(block.dc_diff);
        let dc_category = crate::value_coder::category(block.dc_diff);
        writer.push_code(dc_table.code_for(dc_category)?);
        writer.push_bits(dc_bits, dc_len);

        for entry in &block.ac {
            let symbol = ac_symbol(entry);
            writer.push_code(ac_table.code_for(symbol)?);
            let (amp_bits, amp_len) = crate::value_coder::bits(entry.amplitude);
            writer.push_bits(amp_bits, amp_len);
        }
        Ok(())
    }
}

/// Run `write` against `sink`, then log the marker name and the number
/// of bytes it wrote, per SPEC_FULL.md's per-segment logging requirement.
fn log_segment<S: ByteSink>(
    sink: &mut S,
    name: &str,
    write: impl FnOnce(&mut S) -> Result<(), EncodeError>,
) -> Result<(), EncodeError> {
    let start = sink.tell()?;
    write(sink)?;
    let end = sink.tell()?;
    debug!("wrote {name} segment: {} bytes", end - start);
    Ok(())
}

/// The RRRRSSSS symbol byte for one AC entry: run in the high nibble,
/// category of the amplitude in the low nibble.
fn ac_symbol(entry: &AcEntry) -> u8 {
    let category = crate::value_coder::category(entry.amplitude);
    (entry.run << 4) | category
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::raster::BgrBuffer;

    #[test]
    fn solid_gray_8x8_encodes_to_minimal_framing() {
        let data = vec![128u8; 8 * 8 * 3];
        let raster = BgrBuffer::new(&data, 8, 8).unwrap();
        let encoder = JpegEncoder::new(EncoderOptions::default()).unwrap();
        let mut sink = Cursor::new(Vec::new());
        encoder.encode(&raster, &mut sink).unwrap();
        let bytes = sink.into_inner();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn zero_dimension_raster_is_rejected_before_any_write() {
        let data: Vec<u8> = vec![];
        // BgrBuffer::new already rejects zero dims, so build a stub source.
        struct Empty;
        impl RasterSource for Empty {
            fn width(&self) -> usize {
                0
            }
            fn height(&self) -> usize {
                0
            }
            fn pixel(&self, _x: usize, _y: usize) -> [u8; 3] {
                [0, 0, 0]
            }
        }
        let _ = data;
        let encoder = JpegEncoder::new(EncoderOptions::default()).unwrap();
        let mut sink = Cursor::new(Vec::new());
        let result = encoder.encode(&Empty, &mut sink);
        assert!(result.is_err());
    }

    #[test]
    fn ac_symbol_packs_run_into_high_nibble_and_category_into_low_nibble() {
        let entry = AcEntry { run: 5, amplitude: 3 };
        assert_eq!(ac_symbol(&entry), (5 << 4) | 2);
    }

    #[test]
    fn zrl_and_eob_symbols_match_annex_reserved_bytes() {
        assert_eq!(ac_symbol(&rlc::ZRL), 0xF0);
        assert_eq!(ac_symbol(&rlc::EOB), 0x00);
    }
}
