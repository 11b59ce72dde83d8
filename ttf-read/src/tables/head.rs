//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Fixed, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// The only major.minor version of the table.
pub const VERSION_1_0: u32 = 0x00010000;

/// The value of `magicNumber` in every valid `head` table.
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Head {
    font_revision: Fixed,
    flags: u16,
    units_per_em: u16,
    created: i64,
    modified: i64,
    bbox: BoundingBox<i16>,
    mac_style: u16,
    lowest_rec_ppem: u16,
    index_to_loc_format: i16,
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        if cursor.read::<u32>()? != VERSION_1_0 {
            return Err(ReadError::MalformedHeader("head.version"));
        }
        let font_revision = cursor.read()?;
        // checksumAdjustment
        cursor.advance::<u32>();
        if cursor.read::<u32>()? != MAGIC_NUMBER {
            return Err(ReadError::MalformedHeader("head.magicNumber"));
        }
        let flags = cursor.read()?;
        let units_per_em = cursor.read()?;
        if units_per_em == 0 {
            return Err(ReadError::MalformedHeader("head.unitsPerEm"));
        }
        let created = cursor.read()?;
        let modified = cursor.read()?;
        let bbox = BoundingBox {
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        let mac_style = cursor.read()?;
        let lowest_rec_ppem = cursor.read()?;
        // fontDirectionHint
        cursor.advance::<i16>();
        let index_to_loc_format = cursor.read()?;
        if !matches!(index_to_loc_format, 0 | 1) {
            return Err(ReadError::MalformedHeader("head.indexToLocFormat"));
        }
        Ok(Head {
            font_revision,
            flags,
            units_per_em,
            created,
            modified,
            bbox,
            mac_style,
            lowest_rec_ppem,
            index_to_loc_format,
        })
    }
}

impl Head {
    /// Set by font manufacturer.
    pub fn font_revision(&self) -> Fixed {
        self.font_revision
    }

    /// See the [flags](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
    /// description in the OpenType spec.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Set to a value from 16 to 16384. Any value in this range is valid.
    /// In fonts that have TrueType outlines, a power of 2 is recommended
    /// as this allows performance optimizations in some rasterizers.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Number of seconds since 12:00 midnight that started January 1st
    /// 1904 in GMT/UTC time zone.
    pub fn created(&self) -> i64 {
        self.created
    }

    /// Number of seconds since 12:00 midnight that started January 1st
    /// 1904 in GMT/UTC time zone.
    pub fn modified(&self) -> i64 {
        self.modified
    }

    /// The bounding box of all glyphs in the font.
    pub fn bbox(&self) -> BoundingBox<i16> {
        self.bbox
    }

    /// Bits identifying bold (0) and italic (1) styles.
    pub fn mac_style(&self) -> u16 {
        self.mac_style
    }

    /// Smallest readable size in pixels.
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.lowest_rec_ppem
    }

    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.index_to_loc_format
    }

    /// `true` if the `loca` table uses 32-bit offsets.
    pub fn is_long_loca(&self) -> bool {
        self.index_to_loc_format == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::bebuffer::BeBuffer;

    fn head_data(version: u32, magic: u32, upem: u16, loc_format: i16) -> BeBuffer {
        BeBuffer::new()
            .push(version)
            .push(Fixed::from_f64(2.5))
            .extend([42u32, magic])
            .extend([0x000Bu16, upem])
            .extend([-500i64, 101])
            .extend([-100i16, -50, 400, 711])
            .extend([1u16, 12]) // mac_style / ppem
            .extend([2i16, loc_format, 0])
    }

    #[test]
    fn read_head() {
        let buf = head_data(VERSION_1_0, MAGIC_NUMBER, 2048, 1);
        assert_eq!(buf.len(), 54);
        let head = Head::read(FontData::new(&buf)).unwrap();
        assert_eq!(head.font_revision(), Fixed::from_f64(2.5));
        assert_eq!(head.flags(), 0x000B);
        assert_eq!(head.units_per_em(), 2048);
        assert_eq!(head.created(), -500);
        assert_eq!(head.modified(), 101);
        assert_eq!(
            head.bbox(),
            BoundingBox {
                x_min: -100,
                y_min: -50,
                x_max: 400,
                y_max: 711
            }
        );
        assert_eq!(head.mac_style(), 1);
        assert_eq!(head.lowest_rec_ppem(), 12);
        assert!(head.is_long_loca());
    }

    #[test]
    fn bad_magic() {
        let buf = head_data(VERSION_1_0, 0xDEADBEEF, 1000, 0);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedHeader("head.magicNumber"))
        );
    }

    #[test]
    fn bad_version() {
        let buf = head_data(0x00020000, MAGIC_NUMBER, 1000, 0);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedHeader("head.version"))
        );
    }

    #[test]
    fn zero_units_per_em() {
        let buf = head_data(VERSION_1_0, MAGIC_NUMBER, 0, 0);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedHeader("head.unitsPerEm"))
        );
    }

    #[test]
    fn bad_loca_format() {
        let buf = head_data(VERSION_1_0, MAGIC_NUMBER, 1000, 2);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedHeader("head.indexToLocFormat"))
        );
    }

    #[test]
    fn truncated() {
        let buf = head_data(VERSION_1_0, MAGIC_NUMBER, 1000, 0);
        assert_eq!(
            Head::read(FontData::new(&buf[..50])),
            Err(ReadError::Truncated { offset: 50, len: 2 })
        );
    }
}
