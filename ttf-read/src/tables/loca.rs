//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use std::ops::Range;

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontReadWithArgs, ReadError};

/// 'loca'
pub const TAG: Tag = Tag::new(b"loca");

/// The [loca] table.
///
/// Holds exactly `numGlyphs + 1` offsets; any trailing data is ignored.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug)]
pub enum Loca<'a> {
    Short(&'a [BigEndian<u16>]),
    Long(&'a [BigEndian<u32>]),
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    /// `(is_long, numGlyphs)`
    type Args = (bool, u16);

    fn read_with_args(data: FontData<'a>, args: &(bool, u16)) -> Result<Self, ReadError> {
        let (is_long, num_glyphs) = *args;
        let n_offsets = num_glyphs as usize + 1;
        let mut cursor = data.cursor();
        if is_long {
            cursor.read_array(n_offsets).map(Loca::Long)
        } else {
            cursor.read_array(n_offsets).map(Loca::Short)
        }
    }
}

impl<'a> Loca<'a> {
    /// Read a table in the given format, sized for `num_glyphs`.
    pub fn read(data: FontData<'a>, is_long: bool, num_glyphs: u16) -> Result<Self, ReadError> {
        Self::read_with_args(data, &(is_long, num_glyphs))
    }

    /// The number of glyphs covered by the table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if offsets are stored as 32-bit values.
    pub fn is_long(&self) -> bool {
        matches!(self, Loca::Long(_))
    }

    /// Attempt to return the offset at the given index, in bytes.
    ///
    /// Short offsets are stored divided by two; this returns the real offset.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|x| x.get()),
        }
    }

    /// The range of the `glyf` table holding the outline for this glyph.
    ///
    /// An empty range means the glyph has no outline.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<Range<usize>, ReadError> {
        let idx = gid.to_u16() as usize;
        if idx >= self.len() {
            return Err(ReadError::OutOfBounds);
        }
        let start = self.get_raw(idx).ok_or(ReadError::OutOfBounds)? as usize;
        let end = self.get_raw(idx + 1).ok_or(ReadError::OutOfBounds)? as usize;
        if end < start {
            return Err(ReadError::MalformedData("loca offsets decrease"));
        }
        Ok(start..end)
    }

    /// The last offset in the table; the extent of `glyf` that is in use.
    pub fn end_offset(&self) -> u32 {
        self.get_raw(self.len()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::bebuffer::BeBuffer;

    #[test]
    fn short_offsets_are_doubled() {
        let buf = BeBuffer::new().extend([0u16, 10, 10, 25]);
        let loca = Loca::read(FontData::new(&buf), false, 3).unwrap();
        assert_eq!(loca.len(), 3);
        assert!(!loca.is_long());
        assert_eq!(loca.glyph_range(GlyphId::new(0)), Ok(0..20));
        // equal offsets: empty glyph
        assert_eq!(loca.glyph_range(GlyphId::new(1)), Ok(20..20));
        assert_eq!(loca.glyph_range(GlyphId::new(2)), Ok(20..50));
        assert_eq!(loca.end_offset(), 50);
    }

    #[test]
    fn long_offsets() {
        let buf = BeBuffer::new().extend([0u32, 7, 70_000]).push(0xFFFFu32);
        let loca = Loca::read(FontData::new(&buf), true, 2).unwrap();
        // the trailing value is beyond numGlyphs + 1
        assert_eq!(loca.len(), 2);
        assert_eq!(loca.glyph_range(GlyphId::new(1)), Ok(7..70_000));
    }

    #[test]
    fn glyph_past_end() {
        let buf = BeBuffer::new().extend([0u16, 4]);
        let loca = Loca::read(FontData::new(&buf), false, 1).unwrap();
        assert_eq!(loca.glyph_range(GlyphId::new(1)), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn decreasing_offsets() {
        let buf = BeBuffer::new().extend([0u16, 8, 4]);
        let loca = Loca::read(FontData::new(&buf), false, 2).unwrap();
        assert_eq!(
            loca.glyph_range(GlyphId::new(1)),
            Err(ReadError::MalformedData("loca offsets decrease"))
        );
    }

    #[test]
    fn too_few_offsets() {
        let buf = BeBuffer::new().extend([0u16, 8, 4]);
        assert_eq!(
            Loca::read(FontData::new(&buf), false, 4).unwrap_err(),
            ReadError::Truncated { offset: 0, len: 10 }
        );
    }
}
