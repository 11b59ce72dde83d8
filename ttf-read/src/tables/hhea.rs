//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'hhea'
pub const TAG: Tag = Tag::new(b"hhea");

/// The only major.minor version of the table.
pub const VERSION_1_0: u32 = 0x00010000;

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
/// (horizontal header) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hhea {
    ascender: i16,
    descender: i16,
    line_gap: i16,
    advance_width_max: u16,
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
    number_of_h_metrics: u16,
}

impl<'a> FontRead<'a> for Hhea {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        if cursor.read::<u32>()? != VERSION_1_0 {
            return Err(ReadError::MalformedHeader("hhea.version"));
        }
        let ascender = cursor.read()?;
        let descender = cursor.read()?;
        let line_gap = cursor.read()?;
        let advance_width_max = cursor.read()?;
        let min_left_side_bearing = cursor.read()?;
        let min_right_side_bearing = cursor.read()?;
        let x_max_extent = cursor.read()?;
        // caretSlopeRise, caretSlopeRun, caretOffset, four reserved fields
        // and metricDataFormat
        cursor.skip(8 * 2)?;
        let number_of_h_metrics = cursor.read()?;
        Ok(Hhea {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            number_of_h_metrics,
        })
    }
}

impl Hhea {
    /// Typographic ascent.
    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    /// Typographic descent.
    pub fn descender(&self) -> i16 {
        self.descender
    }

    /// Typographic line gap. Negative values are treated as zero by some
    /// legacy platforms.
    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    /// Maximum advance width value in 'hmtx' table.
    pub fn advance_width_max(&self) -> u16 {
        self.advance_width_max
    }

    /// Minimum left sidebearing value in 'hmtx' table for glyphs with
    /// contours (empty glyphs should be ignored).
    pub fn min_left_side_bearing(&self) -> i16 {
        self.min_left_side_bearing
    }

    /// Minimum right sidebearing value.
    pub fn min_right_side_bearing(&self) -> i16 {
        self.min_right_side_bearing
    }

    /// Max(lsb + (xMax - xMin)).
    pub fn x_max_extent(&self) -> i16 {
        self.x_max_extent
    }

    /// Number of advance widths in the 'hmtx' table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }
}
