//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// The version used by fonts with TrueType outlines.
pub const VERSION_1_0: u32 = 0x00010000;

const VERSION_1_0_LEN: usize = 32;

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp)
/// (maximum profile) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maxp {
    num_glyphs: u16,
    max_points: u16,
    max_contours: u16,
    max_composite_points: u16,
    max_composite_contours: u16,
    max_component_depth: u16,
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u32 = cursor.read()?;
        if version != VERSION_1_0 {
            return Err(ReadError::UnsupportedVersion(version));
        }
        let num_glyphs = cursor.read()?;
        let mut maxp = Maxp {
            num_glyphs,
            ..Default::default()
        };
        // fields past numGlyphs are informational; a short table keeps the defaults
        if cursor.remaining_bytes() < VERSION_1_0_LEN - 6 {
            log::warn!("maxp table has {} bytes, expected 32", data.len());
            return Ok(maxp);
        }
        maxp.max_points = cursor.read()?;
        maxp.max_contours = cursor.read()?;
        maxp.max_composite_points = cursor.read()?;
        maxp.max_composite_contours = cursor.read()?;
        // maxZones through maxComponentElements
        cursor.skip(8 * 2)?;
        maxp.max_component_depth = cursor.read()?;
        Ok(maxp)
    }
}

impl Maxp {
    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// Maximum points in a non-composite glyph.
    pub fn max_points(&self) -> u16 {
        self.max_points
    }

    /// Maximum contours in a non-composite glyph.
    pub fn max_contours(&self) -> u16 {
        self.max_contours
    }

    /// Maximum points in a composite glyph.
    pub fn max_composite_points(&self) -> u16 {
        self.max_composite_points
    }

    /// Maximum contours in a composite glyph.
    pub fn max_composite_contours(&self) -> u16 {
        self.max_composite_contours
    }

    /// Maximum levels of recursion; 1 for simple components.
    pub fn max_component_depth(&self) -> u16 {
        self.max_component_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::bebuffer::BeBuffer;

    #[test]
    fn read_maxp() {
        let buf = BeBuffer::new()
            .push(VERSION_1_0)
            .extend([42u16, 100, 4, 300, 12])
            .extend([2u16, 0, 0, 0, 0, 0, 0, 3])
            .push(1u16);
        assert_eq!(buf.len(), 32);
        let maxp = Maxp::read(FontData::new(&buf)).unwrap();
        assert_eq!(maxp.num_glyphs(), 42);
        assert_eq!(maxp.max_points(), 100);
        assert_eq!(maxp.max_contours(), 4);
        assert_eq!(maxp.max_composite_points(), 300);
        assert_eq!(maxp.max_composite_contours(), 12);
        assert_eq!(maxp.max_component_depth(), 1);
    }

    #[test]
    fn short_table_keeps_glyph_count() {
        let buf = BeBuffer::new().push(VERSION_1_0).push(7u16);
        let maxp = Maxp::read(FontData::new(&buf)).unwrap();
        assert_eq!(maxp.num_glyphs(), 7);
        assert_eq!(maxp.max_points(), 0);
        assert_eq!(
            Maxp::read(FontData::new(&buf[..5])),
            Err(ReadError::Truncated { offset: 4, len: 2 })
        );
    }

    #[test]
    fn cff_version_is_unsupported() {
        let buf = BeBuffer::new().push(0x00005000u32).push(42u16);
        assert_eq!(
            Maxp::read(FontData::new(&buf)),
            Err(ReadError::UnsupportedVersion(0x00005000))
        );
    }
}
