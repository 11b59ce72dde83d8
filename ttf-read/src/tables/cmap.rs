//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// Unicode platform, Unicode 2.0 BMP-only encoding.
pub const UNICODE_BMP: (u16, u16) = (0, 3);
/// Windows platform, Unicode BMP encoding.
pub const WINDOWS_UNICODE_BMP: (u16, u16) = (3, 1);

/// An [encoding record](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#encoding-records-and-encodings)
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct EncodingRecord {
    platform_id: BigEndian<u16>,
    encoding_id: BigEndian<u16>,
    subtable_offset: BigEndian<u32>,
}

impl EncodingRecord {
    /// Platform ID.
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    /// Platform-specific encoding ID.
    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    /// Byte offset from beginning of the table to the subtable for this encoding.
    pub fn subtable_offset(&self) -> u32 {
        self.subtable_offset.get()
    }

    /// `true` if this record maps Unicode BMP codepoints.
    pub fn is_unicode_bmp(&self) -> bool {
        let ids = (self.platform_id(), self.encoding_id());
        ids == UNICODE_BMP || ids == WINDOWS_UNICODE_BMP
    }
}

/// The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
/// (character to glyph index mapping) table.
///
/// Only the first Unicode BMP subtable in [format 4] is used; it is selected
/// when the table is read.
///
/// [format 4]: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values
#[derive(Clone, Debug)]
pub struct Cmap<'a> {
    encoding_records: &'a [EncodingRecord],
    selected: EncodingRecord,
    subtable: Cmap4<'a>,
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version != 0 {
            return Err(ReadError::UnsupportedVersion(version as u32));
        }
        let num_tables: u16 = cursor.read()?;
        let encoding_records: &'a [EncodingRecord] = cursor.read_array(num_tables as usize)?;
        let mut saw_candidate = false;
        for record in encoding_records {
            if !record.is_unicode_bmp() {
                log::debug!(
                    "skipping cmap encoding record ({}, {})",
                    record.platform_id(),
                    record.encoding_id()
                );
                continue;
            }
            saw_candidate = true;
            let subtable_data = data
                .split_off(record.subtable_offset() as usize)
                .ok_or(ReadError::OutOfBounds)?;
            let format: u16 = subtable_data.read_at(0)?;
            if format != 4 {
                log::debug!(
                    "skipping format {format} subtable for encoding ({}, {})",
                    record.platform_id(),
                    record.encoding_id()
                );
                continue;
            }
            return Ok(Cmap {
                encoding_records,
                selected: *record,
                subtable: Cmap4::read(subtable_data)?,
            });
        }
        if saw_candidate {
            Err(ReadError::UnsupportedFeature("cmap subtable format"))
        } else {
            Err(ReadError::NoUsableCmap)
        }
    }
}

impl<'a> Cmap<'a> {
    /// All encoding records, in file order.
    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.encoding_records
    }

    /// The record of the subtable used for mapping.
    pub fn selected_record(&self) -> EncodingRecord {
        self.selected
    }

    /// The subtable used for mapping.
    pub fn subtable(&self) -> &Cmap4<'a> {
        &self.subtable
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Returns `None` for unmapped codepoints, including everything above
    /// the Basic Multilingual Plane.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        self.subtable.map_codepoint(codepoint)
    }
}

/// A [format 4](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values)
/// (segment mapping to delta values) subtable.
#[derive(Clone, Debug)]
pub struct Cmap4<'a> {
    language: u16,
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<u16>],
    /// The idRangeOffset array followed by the glyphIdArray: range offsets
    /// are relative to their own position, so they address this as one array.
    id_range_offsets_and_glyph_ids: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 4 {
            return Err(ReadError::UnsupportedFeature("cmap subtable format"));
        }
        let length: u16 = cursor.read()?;
        let language = cursor.read()?;
        let seg_count_x2: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift
        cursor.skip(3 * 2)?;

        let length = if length as usize > data.len() {
            log::warn!(
                "cmap format 4 length {length} exceeds the {} bytes available",
                data.len()
            );
            data.len()
        } else {
            length as usize
        };
        let seg_count = seg_count_x2 as usize / 2;
        let end_code = cursor.read_array(seg_count)?;
        // reservedPad
        cursor.advance::<u16>();
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        // the glyph id array runs to the end of the subtable
        let tail_len = length.saturating_sub(cursor.position()) / 2;
        let id_range_offsets_and_glyph_ids = cursor.read_array(tail_len.max(seg_count))?;
        Ok(Cmap4 {
            language,
            end_code,
            start_code,
            id_delta,
            id_range_offsets_and_glyph_ids,
        })
    }
}

impl<'a> Cmap4<'a> {
    /// The language code; zero for language-independent subtables.
    pub fn language(&self) -> u16 {
        self.language
    }

    /// The number of segments.
    pub fn seg_count(&self) -> usize {
        self.end_code.len()
    }

    /// End characterCode for each segment, last=0xFFFF.
    pub fn end_code(&self) -> &'a [BigEndian<u16>] {
        self.end_code
    }

    /// Start character code for each segment.
    pub fn start_code(&self) -> &'a [BigEndian<u16>] {
        self.start_code
    }

    /// Delta for all character codes in segment.
    pub fn id_delta(&self) -> &'a [BigEndian<u16>] {
        self.id_delta
    }

    /// Offsets into glyphIdArray or 0
    pub fn id_range_offsets(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets_and_glyph_ids
            .get(..self.seg_count())
            .unwrap_or_default()
    }

    /// Glyph index array (arbitrary length)
    pub fn glyph_id_array(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets_and_glyph_ids
            .get(self.seg_count()..)
            .unwrap_or_default()
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = u16::try_from(codepoint.into()).ok()?;
        // first segment whose end code is not below the codepoint
        let index = self
            .end_code
            .partition_point(|end| end.get() < codepoint);
        let start_code = self.start_code.get(index)?.get();
        if codepoint < start_code {
            return None;
        }
        self.lookup_glyph_id(codepoint, index, start_code)
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// in the subtable.
    pub fn iter(&self) -> Cmap4Iter<'a> {
        Cmap4Iter::new(self.clone())
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// Shared between Self::map_codepoint and Cmap4Iter.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = self.id_delta.get(index)?.get();
        let range_offset = self.id_range_offsets_and_glyph_ids.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId::new(codepoint.wrapping_add(delta)));
        }
        let slot = index + range_offset / 2 + (codepoint - start_code) as usize;
        let gid = self.id_range_offsets_and_glyph_ids.get(slot)?.get();
        (gid != 0).then_some(GlyphId::new(gid.wrapping_add(delta)))
    }

    /// Returns the `start_code..=end_code` range at the given index.
    fn code_range(&self, index: usize) -> Option<std::ops::Range<u32>> {
        // Extend to u32 to ensure we don't overflow on the end + 1 bound
        let start = self.start_code.get(index)?.get() as u32;
        let end = self.end_code.get(index)?.get() as u32;
        Some(start..end + 1)
    }
}

/// Iterator over all (codepoint, glyph identifier) pairs in
/// the subtable.
///
/// Codepoints that map to glyph zero are skipped.
#[derive(Clone)]
pub struct Cmap4Iter<'a> {
    subtable: Cmap4<'a>,
    cur_range: std::ops::Range<u32>,
    cur_start_code: u16,
    cur_range_ix: usize,
}

impl<'a> Cmap4Iter<'a> {
    fn new(subtable: Cmap4<'a>) -> Self {
        let cur_range = subtable.code_range(0).unwrap_or_default();
        let cur_start_code = cur_range.start as u16;
        Self {
            subtable,
            cur_range,
            cur_start_code,
            cur_range_ix: 0,
        }
    }
}

impl Iterator for Cmap4Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                let Some(glyph_id) = self.subtable.lookup_glyph_id(
                    codepoint as u16,
                    self.cur_range_ix,
                    self.cur_start_code,
                ) else {
                    continue;
                };
                if glyph_id == GlyphId::NOTDEF {
                    continue;
                }
                return Some((codepoint, glyph_id));
            } else {
                self.cur_range_ix += 1;
                self.cur_range = self.subtable.code_range(self.cur_range_ix)?;
                self.cur_start_code = self.cur_range.start as u16;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use ttf_test_data::cmap::{self as cmap_data, Segment};

    fn read_cmap4(data: &[u8]) -> Cmap4<'_> {
        Cmap4::read(FontData::new(data)).unwrap()
    }

    #[test]
    fn delta_and_indirect_segments() {
        let segments = [
            Segment::delta(0x41, 0x41, 1),
            Segment {
                start: 0x42,
                end: 0x5A,
                id_delta: 0,
                // one slot to the end of idRangeOffset (seg 1 of 2)
                id_range_offset: 2,
            },
        ];
        let glyph_ids: Vec<u16> = (5..5 + 25).collect();
        let data = cmap_data::format4(&segments, &glyph_ids);
        let cmap4 = read_cmap4(&data);
        assert_eq!(cmap4.map_codepoint(0x41u32), Some(GlyphId::new(0x42)));
        assert_eq!(cmap4.map_codepoint(0x42u32), Some(GlyphId::new(5)));
        assert_eq!(cmap4.map_codepoint(0x43u32), Some(GlyphId::new(6)));
        assert_eq!(cmap4.map_codepoint(0x5Au32), Some(GlyphId::new(29)));
        assert_eq!(cmap4.map_codepoint(0x40u32), None);
        assert_eq!(cmap4.map_codepoint(0x5Bu32), None);
    }

    #[test]
    fn small_delta_wraps() {
        // negative deltas wrap modulo 65536
        let data = cmap_data::format4(
            &[Segment::delta(0x41, 0x41, -0x40), Segment::sentinel()],
            &[],
        );
        let cmap4 = read_cmap4(&data);
        assert_eq!(cmap4.map_codepoint(0x41u32), Some(GlyphId::new(1)));
        // the sentinel maps 0xFFFF to glyph 0
        assert_eq!(cmap4.map_codepoint(0xFFFFu32), Some(GlyphId::NOTDEF));
    }

    #[test]
    fn mixed_segments() {
        let data = cmap_data::mixed_cmap4();
        let cmap4 = read_cmap4(&data);
        assert_eq!(cmap4.seg_count(), 4);
        assert_eq!(cmap4.glyph_id_array().len(), 61);
        assert_eq!(cmap4.map_codepoint(10u32), Some(GlyphId::new(1)));
        assert_eq!(cmap4.map_codepoint(20u32), Some(GlyphId::new(11)));
        assert_eq!(cmap4.map_codepoint(25u32), None);
        assert_eq!(cmap4.map_codepoint(30u32), Some(GlyphId::new(100)));
        // explicit zero in the glyph id array
        assert_eq!(cmap4.map_codepoint(31u32), None);
        assert_eq!(cmap4.map_codepoint(90u32), Some(GlyphId::new(160)));
        assert_eq!(cmap4.map_codepoint(480u32), Some(GlyphId::new(481)));
        assert_eq!(cmap4.map_codepoint(0x1F600u32), None);
    }

    #[test]
    fn lookup_is_idempotent() {
        let data = cmap_data::mixed_cmap4();
        let cmap4 = read_cmap4(&data);
        for codepoint in 0..=0xFFFFu32 {
            assert_eq!(
                cmap4.map_codepoint(codepoint),
                cmap4.map_codepoint(codepoint)
            );
        }
    }

    #[test]
    fn iter_skips_unmapped() {
        let data = cmap_data::mixed_cmap4();
        let cmap4 = read_cmap4(&data);
        let pairs: Vec<_> = cmap4.iter().collect();
        // 11 + 60 + 328; the sentinel maps to glyph 0
        assert_eq!(pairs.len(), 399);
        assert_eq!(pairs[0], (10, GlyphId::new(1)));
        assert!(!pairs.iter().any(|(cp, _)| *cp == 31));
        for (codepoint, gid) in pairs {
            assert_eq!(cmap4.map_codepoint(codepoint), Some(gid));
        }
    }

    /// Evaluate the format 4 formula directly, finding the segment by
    /// scanning and addressing glyphIdArray from the end of idRangeOffset.
    fn linear_lookup(segments: &[Segment], glyph_ids: &[u16], codepoint: u16) -> Option<u16> {
        let (i, seg) = segments
            .iter()
            .enumerate()
            .find(|(_, seg)| seg.start <= codepoint && codepoint <= seg.end)?;
        if seg.id_range_offset == 0 {
            return Some(codepoint.wrapping_add(seg.id_delta as u16));
        }
        let index = (seg.id_range_offset / 2 + (codepoint - seg.start)) as usize
            - (segments.len() - i);
        let gid = *glyph_ids.get(index)?;
        (gid != 0).then_some(gid.wrapping_add(seg.id_delta as u16))
    }

    fn random_segments(rng: &mut StdRng) -> (Vec<Segment>, Vec<u16>) {
        let mut bounds: Vec<u16> = (0..rng.gen_range(2..40))
            .map(|_| rng.gen_range(0..2000))
            .collect();
        bounds.sort_unstable();
        bounds.dedup();
        let mut ranges: Vec<(u16, u16)> = bounds
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        ranges.push((0xFFFF, 0xFFFF));
        let seg_count = ranges.len();
        let mut segments = Vec::with_capacity(seg_count);
        let mut glyph_ids = Vec::new();
        for (i, (start, end)) in ranges.into_iter().enumerate() {
            let id_delta = rng.gen();
            if end == 0xFFFF || rng.gen_bool(0.5) {
                segments.push(Segment::delta(start, end, id_delta));
                continue;
            }
            let id_range_offset = 2 * (seg_count - i + glyph_ids.len()) as u16;
            glyph_ids.extend((start..=end).map(|_| {
                if rng.gen_bool(0.1) {
                    0
                } else {
                    rng.gen()
                }
            }));
            segments.push(Segment {
                start,
                end,
                id_delta,
                id_range_offset,
            });
        }
        (segments, glyph_ids)
    }

    #[test]
    fn binary_search_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(0x636D6170);
        for _ in 0..50 {
            let (segments, glyph_ids) = random_segments(&mut rng);
            let data = cmap_data::format4(&segments, &glyph_ids);
            let cmap4 = read_cmap4(&data);
            for codepoint in (0..2100u16).chain([0xFFFE, 0xFFFF]) {
                assert_eq!(
                    cmap4.map_codepoint(codepoint).map(GlyphId::to_u16),
                    linear_lookup(&segments, &glyph_ids, codepoint),
                    "codepoint {codepoint} in {segments:?}"
                );
            }
        }
    }

    #[test]
    fn selects_first_bmp_format4() {
        let format6 = cmap_data::format6(0x20, &[1, 2, 3]);
        let format4 = cmap_data::format4_from_pairs(&[(0x41, 7)]);
        let other = cmap_data::format4_from_pairs(&[(0x41, 8)]);
        let data = cmap_data::cmap(&[
            (1, 0, other.as_slice()),
            (0, 3, format6.as_slice()),
            (3, 1, format4.as_slice()),
            (0, 3, other.as_slice()),
        ]);
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert_eq!(cmap.encoding_records().len(), 4);
        assert_eq!(cmap.selected_record().platform_id(), 3);
        assert_eq!(cmap.map_codepoint('A'), Some(GlyphId::new(7)));
        assert_eq!(cmap.map_codepoint('B'), None);
    }

    #[test]
    fn no_unicode_subtable() {
        let format4 = cmap_data::format4_from_pairs(&[(0x41, 7)]);
        let data = cmap_data::cmap(&[(1, 0, format4.as_slice()), (3, 10, format4.as_slice())]);
        assert_eq!(
            Cmap::read(FontData::new(&data)).unwrap_err(),
            ReadError::NoUsableCmap
        );
    }

    #[test]
    fn unicode_subtable_in_other_format() {
        let format6 = cmap_data::format6(0x20, &[1, 2, 3]);
        let data = cmap_data::cmap(&[(3, 1, format6.as_slice())]);
        assert_eq!(
            Cmap::read(FontData::new(&data)).unwrap_err(),
            ReadError::UnsupportedFeature("cmap subtable format")
        );
    }

    #[test]
    fn unsupported_version() {
        let data = cmap_data::cmap(&[]);
        let mut bytes: Vec<u8> = data.into();
        bytes[1] = 1;
        assert_eq!(
            Cmap::read(FontData::new(&bytes)).unwrap_err(),
            ReadError::UnsupportedVersion(1)
        );
    }

    #[test]
    fn subtable_past_end() {
        let data = ttf_test_data::be_buffer! { 0u16, 1u16, 3u16, 1u16, 400u32 };
        assert_eq!(
            Cmap::read(FontData::new(&data)).unwrap_err(),
            ReadError::OutOfBounds
        );
    }

    #[test]
    fn length_is_clamped() {
        let data = cmap_data::format4_from_pairs(&[(0x41, 7)]);
        let mut bytes: Vec<u8> = data.into();
        // claim a longer subtable than there is data
        bytes[2..4].copy_from_slice(&0x4000u16.to_be_bytes());
        let cmap4 = read_cmap4(&bytes);
        assert_eq!(cmap4.map_codepoint(0x41u32), Some(GlyphId::new(7)));
        assert!(cmap4.glyph_id_array().is_empty());
    }

    #[test]
    fn truncated_segments() {
        let data = cmap_data::format4_from_pairs(&[(0x41, 7), (0x61, 9)]);
        assert!(matches!(
            Cmap4::read(FontData::new(&data[..20])),
            Err(ReadError::Truncated { .. })
        ));
    }
}
