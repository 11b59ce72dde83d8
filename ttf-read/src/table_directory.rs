//! The [table directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)

use std::ops::Range;

use types::{BigEndian, Tag, TRUE_SFNT_VERSION, TTC_HEADER_TAG, TT_SFNT_VERSION};

use crate::{FontData, FontRead, ReadError};

/// Record for a table in a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct TableRecord {
    tag: BigEndian<Tag>,
    checksum: BigEndian<u32>,
    offset: BigEndian<u32>,
    length: BigEndian<u32>,
}

impl TableRecord {
    /// Table identifier.
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    /// Checksum for the table. This is never verified.
    pub fn checksum(&self) -> u32 {
        self.checksum.get()
    }

    /// Offset from the beginning of the font data.
    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    /// Length of the table.
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// The byte range of the table within the font data.
    pub fn range(&self) -> Range<usize> {
        let start = self.offset() as usize;
        start..start.saturating_add(self.length() as usize)
    }
}

/// The directory of tables at the start of a font file.
///
/// Every record has been checked to lie within the font data.
#[derive(Clone, Debug)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    table_records: &'a [TableRecord],
    sorted: bool,
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        match sfnt_version {
            TT_SFNT_VERSION | TRUE_SFNT_VERSION => (),
            version if version == TTC_HEADER_TAG.to_u32() => {
                return Err(ReadError::UnsupportedVersion(version))
            }
            _ => return Err(ReadError::MalformedHeader("sfntVersion")),
        }
        let num_tables: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift
        cursor.advance::<u16>();
        cursor.advance::<u16>();
        cursor.advance::<u16>();
        let table_records: &'a [TableRecord] = cursor.read_array(num_tables as usize)?;
        for record in table_records {
            let end = (record.offset() as usize).checked_add(record.length() as usize);
            if end.is_none_or(|end| end > data.len()) {
                log::debug!(
                    "'{}' table at {}+{} exceeds font length {}",
                    record.tag(),
                    record.offset(),
                    record.length(),
                    data.len()
                );
                return Err(ReadError::OutOfBounds);
            }
        }
        let sorted = table_records
            .windows(2)
            .all(|pair| pair[0].tag() < pair[1].tag());
        if !sorted {
            log::warn!("table directory is not sorted by tag, falling back to linear search");
        }
        Ok(TableDirectory {
            sfnt_version,
            table_records,
            sorted,
        })
    }
}

impl<'a> TableDirectory<'a> {
    /// The version tag at the start of the font.
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// Number of tables.
    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    /// All table records, in file order.
    pub fn table_records(&self) -> &'a [TableRecord] {
        self.table_records
    }

    /// Returns the record for the table with the given tag, if any.
    ///
    /// If a tag occurs more than once, the first record wins.
    pub fn find(&self, tag: Tag) -> Option<&'a TableRecord> {
        let records = self.table_records;
        let idx = if self.sorted {
            records.binary_search_by(|rec| rec.tag().cmp(&tag)).ok()
        } else {
            records.iter().position(|rec| rec.tag() == tag)
        };
        idx.and_then(|idx| records.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::{be_buffer, builder::FontBuilder};

    #[test]
    fn read_sorted_directory() {
        let font_data = FontBuilder::new()
            .add_raw(Tag::new(b"maxp"), vec![0; 6])
            .add_raw(Tag::new(b"head"), vec![0; 54])
            .add_raw(Tag::new(b"cmap"), vec![0; 3])
            .build();
        let directory = TableDirectory::read(FontData::new(&font_data)).unwrap();
        assert_eq!(directory.sfnt_version(), TT_SFNT_VERSION);
        assert_eq!(directory.num_tables(), 3);
        let tags: Vec<_> = directory
            .table_records()
            .iter()
            .map(TableRecord::tag)
            .collect();
        assert_eq!(tags, [Tag::new(b"cmap"), Tag::new(b"head"), Tag::new(b"maxp")]);
        let head = directory.find(Tag::new(b"head")).unwrap();
        assert_eq!(head.length(), 54);
        assert_eq!(head.range().len(), 54);
        assert!(directory.find(Tag::new(b"glyf")).is_none());
    }

    #[test]
    fn unsorted_directory_uses_linear_search() {
        let header_len = 12 + 2 * 16;
        let buf = be_buffer! {
            TT_SFNT_VERSION, 2u16, 0u16, 0u16, 0u16,
            Tag::new(b"loca"), 0u32, header_len as u32, 4u32,
            Tag::new(b"glyf"), 0u32, header_len as u32 + 4, 4u32,
            1u32, 2u32
        };
        let directory = TableDirectory::read(FontData::new(&buf)).unwrap();
        assert!(!directory.sorted);
        assert_eq!(directory.find(Tag::new(b"glyf")).unwrap().offset(), 48);
        assert_eq!(directory.find(Tag::new(b"loca")).unwrap().offset(), 44);
    }

    #[test]
    fn legacy_apple_version() {
        let font_data = FontBuilder::new()
            .with_sfnt_version(TRUE_SFNT_VERSION)
            .add_raw(Tag::new(b"glyf"), vec![0; 4])
            .build();
        assert!(TableDirectory::read(FontData::new(&font_data)).is_ok());
    }

    #[test]
    fn collection_is_unsupported() {
        let font_data = FontBuilder::new()
            .with_sfnt_version(TTC_HEADER_TAG.to_u32())
            .build();
        assert_eq!(
            TableDirectory::read(FontData::new(&font_data)).unwrap_err(),
            ReadError::UnsupportedVersion(0x74746366)
        );
    }

    #[test]
    fn unknown_version_is_malformed() {
        for version in [0x4F54544F, 0x00020000, 0] {
            let font_data = FontBuilder::new().with_sfnt_version(version).build();
            assert_eq!(
                TableDirectory::read(FontData::new(&font_data)).unwrap_err(),
                ReadError::MalformedHeader("sfntVersion")
            );
        }
    }

    #[test]
    fn record_past_end_of_data() {
        let buf = be_buffer! {
            TT_SFNT_VERSION, 1u16, 0u16, 0u16, 0u16,
            Tag::new(b"head"), 0u32, 28u32, 54u32,
            0u32, 0u32, 0u32
        };
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)).unwrap_err(),
            ReadError::OutOfBounds
        );
    }

    #[test]
    fn offset_overflow_is_out_of_bounds() {
        let buf = be_buffer! {
            TT_SFNT_VERSION, 1u16, 0u16, 0u16, 0u16,
            Tag::new(b"head"), 0u32, u32::MAX, u32::MAX
        };
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)).unwrap_err(),
            ReadError::OutOfBounds
        );
    }

    #[test]
    fn truncated_records() {
        let buf = be_buffer! {
            TT_SFNT_VERSION, 3u16, 0u16, 0u16, 0u16,
            Tag::new(b"head"), 0u32, 0u32, 0u32
        };
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)).unwrap_err(),
            ReadError::Truncated {
                offset: 12,
                len: 48
            }
        );
        assert!(matches!(
            TableDirectory::read(FontData::new(&[0, 1, 0])),
            Err(ReadError::Truncated { offset: 0, len: 4 })
        ));
    }
}
