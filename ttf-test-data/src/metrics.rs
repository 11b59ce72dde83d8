//! head, maxp, hhea and hmtx tables with the fields tests care about

use crate::bebuffer::BeBuffer;

pub const HEAD_MAGIC: u32 = 0x5F0F3CF5;

/// A version 1.0 `head` table.
pub fn head(units_per_em: u16, long_loca: bool) -> BeBuffer {
    BeBuffer::new()
        .push(0x00010000u32) // version
        .push(0x00010000u32) // fontRevision
        .push(0u32) // checksumAdjustment
        .push(HEAD_MAGIC)
        .push(0u16) // flags
        .push(units_per_em)
        .extend([0i64, 0]) // created, modified
        .extend([0i16, -200, 1000, 800]) // bbox
        .extend([0u16, 8]) // macStyle, lowestRecPPEM
        .extend([2i16, long_loca as i16, 0]) // direction, loca format, glyph data format
}

/// A version 1.0 `maxp` table.
pub fn maxp(num_glyphs: u16) -> BeBuffer {
    BeBuffer::new()
        .push(0x00010000u32)
        .push(num_glyphs)
        .extend([0u16; 13])
}

/// An `hhea` table.
pub fn hhea(ascender: i16, descender: i16, line_gap: i16, number_of_h_metrics: u16) -> BeBuffer {
    BeBuffer::new()
        .push(0x00010000u32)
        .extend([ascender, descender, line_gap])
        .push(1000u16) // advanceWidthMax
        .extend([0i16; 3]) // min lsb, min rsb, xMaxExtent
        .extend([1i16, 0, 0]) // caret
        .extend([0i16; 5]) // reserved, metricDataFormat
        .push(number_of_h_metrics)
}

/// An `hmtx` table with `long` (advance, lsb) records followed by bare bearings.
pub fn hmtx(long: &[(u16, i16)], left_side_bearings: &[i16]) -> BeBuffer {
    long.iter()
        .fold(BeBuffer::new(), |buf, (advance, lsb)| {
            buf.push(*advance).push(*lsb)
        })
        .extend(left_side_bearings.iter().copied())
}
