//! cmap test data for scenarios not readily produced with real fonts

use crate::{be_buffer, bebuffer::BeBuffer};

/// One segment of a format 4 subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: u16,
    pub end: u16,
    pub id_delta: i16,
    pub id_range_offset: u16,
}

impl Segment {
    /// A segment mapped with `idDelta` alone.
    pub fn delta(start: u16, end: u16, id_delta: i16) -> Self {
        Segment {
            start,
            end,
            id_delta,
            id_range_offset: 0,
        }
    }

    /// The conventional final segment.
    pub fn sentinel() -> Self {
        Segment::delta(0xFFFF, 0xFFFF, 1)
    }
}

/// Encode a format 4 subtable.
///
/// `glyph_ids` is the glyphIdArray, addressed by the `id_range_offset`s.
pub fn format4(segments: &[Segment], glyph_ids: &[u16]) -> BeBuffer {
    let seg_count = segments.len() as u16;
    let length = 16 + 8 * seg_count + 2 * glyph_ids.len() as u16;
    let entry_selector = seg_count.checked_ilog2().unwrap_or(0) as u16;
    let search_range = 2 * (1u16 << entry_selector);
    BeBuffer::new()
        .push(4u16) // format
        .push(length)
        .push(0u16) // language
        .push(seg_count * 2)
        .extend([
            search_range,
            entry_selector,
            (seg_count * 2).saturating_sub(search_range),
        ])
        .extend(segments.iter().map(|seg| seg.end))
        .push(0u16) // reservedPad
        .extend(segments.iter().map(|seg| seg.start))
        .extend(segments.iter().map(|seg| seg.id_delta))
        .extend(segments.iter().map(|seg| seg.id_range_offset))
        .extend(glyph_ids.iter().copied())
}

/// Encode a format 4 subtable mapping each `(codepoint, gid)` pair, one
/// segment per run of consecutive codepoints with consecutive glyph ids.
///
/// `pairs` must be sorted by codepoint.
pub fn format4_from_pairs(pairs: &[(u16, u16)]) -> BeBuffer {
    let mut segments: Vec<Segment> = Vec::new();
    for &(codepoint, gid) in pairs {
        let delta = gid.wrapping_sub(codepoint) as i16;
        match segments.last_mut() {
            Some(seg) if seg.end.checked_add(1) == Some(codepoint) && seg.id_delta == delta => {
                seg.end = codepoint
            }
            _ => segments.push(Segment::delta(codepoint, codepoint, delta)),
        }
    }
    if segments.last().map(|seg| seg.end) != Some(0xFFFF) {
        segments.push(Segment::sentinel());
    }
    format4(&segments, &[])
}

/// A cmap table with the given `(platform, encoding)` records, each pointing
/// at its own subtable.
pub fn cmap(records: &[(u16, u16, &[u8])]) -> BeBuffer {
    let mut offset = 4 + 8 * records.len() as u32;
    let mut buf = BeBuffer::new().push(0u16).push(records.len() as u16);
    for (platform_id, encoding_id, subtable) in records {
        buf = buf.push(*platform_id).push(*encoding_id).push(offset);
        offset += subtable.len() as u32;
    }
    records
        .iter()
        .fold(buf, |buf, (_, _, subtable)| buf.extend_bytes(subtable))
}

/// A format 6 (trimmed table) subtable, which the reader does not support.
pub fn format6(first_code: u16, glyph_ids: &[u16]) -> BeBuffer {
    be_buffer! {
        6u16,                                // format
        10 + 2 * glyph_ids.len() as u16,     // length
        0u16,                                // language
        first_code,
        glyph_ids.len() as u16
    }
    .extend(glyph_ids.iter().copied())
}

/// The segments from the OpenType cmap format 4 example, with a glyph id
/// array added for the indirect segment.
///
/// Maps 10..=20 to 10+idDelta, 30..=90 through the glyph id array, and
/// 153..=480 with a delta of 1.
pub fn mixed_cmap4() -> BeBuffer {
    let segments = [
        Segment::delta(10, 20, -9),
        Segment {
            start: 30,
            end: 90,
            id_delta: 0,
            // three slots to the end of idRangeOffset, then index 0 of the array
            id_range_offset: 3 * 2,
        },
        Segment::delta(153, 480, 1),
        Segment::sentinel(),
    ];
    // glyph for codepoint 30 + i is 100 + i, with 0 for codepoint 31
    let glyph_ids: Vec<u16> = (0..61).map(|i| if i == 1 { 0 } else { 100 + i }).collect();
    format4(&segments, &glyph_ids)
}
