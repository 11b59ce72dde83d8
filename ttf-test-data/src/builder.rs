//! Assembling tables into an sfnt

use std::collections::BTreeMap;

use ttf_types::{Tag, TT_SFNT_VERSION};

const TABLE_RECORD_LEN: usize = 16;

/// A builder for a font file, given raw table data.
///
/// Tables are written in tag order, each padded to a four byte boundary,
/// with a directory whose binary search fields are filled in.
#[derive(Debug, Clone)]
pub struct FontBuilder {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self {
            sfnt_version: TT_SFNT_VERSION,
            tables: Default::default(),
        }
    }
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the version tag at the start of the file.
    pub fn with_sfnt_version(&mut self, sfnt_version: u32) -> &mut Self {
        self.sfnt_version = sfnt_version;
        self
    }

    /// Add the data for a table, replacing any previous data for the tag.
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Remove a table, if present.
    pub fn remove(&mut self, tag: Tag) -> &mut Self {
        self.tables.remove(&tag);
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    pub fn build(&mut self) -> Vec<u8> {
        let num_tables = self.tables.len();
        let header_len = std::mem::size_of::<u32>() // sfnt
            + std::mem::size_of::<u16>() * 4 // num_tables to range_shift
            + num_tables * TABLE_RECORD_LEN;
        let (search_range, entry_selector, range_shift) = search_range(num_tables);

        let mut data = Vec::with_capacity(header_len);
        data.extend(self.sfnt_version.to_be_bytes());
        data.extend((num_tables as u16).to_be_bytes());
        data.extend(search_range.to_be_bytes());
        data.extend(entry_selector.to_be_bytes());
        data.extend(range_shift.to_be_bytes());

        let mut position = header_len as u32;
        for (tag, table) in &self.tables {
            let (checksum, padding) = checksum_and_padding(table);
            data.extend(tag.to_be_bytes());
            data.extend(checksum.to_be_bytes());
            data.extend(position.to_be_bytes());
            data.extend((table.len() as u32).to_be_bytes());
            position += table.len() as u32 + padding;
        }
        for table in self.tables.values() {
            data.extend_from_slice(table);
            let rem = round4(table.len()) - table.len();
            data.extend_from_slice(&[0u8; 4][..rem]);
        }
        data
    }
}

fn search_range(num_tables: usize) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = num_tables.ilog2();
    let search_range = (1usize << entry_selector) * TABLE_RECORD_LEN;
    let range_shift = num_tables * TABLE_RECORD_LEN - search_range;
    (search_range as u16, entry_selector as u16, range_shift as u16)
}

fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

fn checksum_and_padding(table: &[u8]) -> (u32, u32) {
    let checksum = table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    });
    let padding = round4(table.len()) - table.len();
    (checksum, padding as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_binary_search_assists() {
        assert_eq!(search_range(0x16), (256, 4, 96));
        assert_eq!(search_range(1), (16, 0, 0));
    }

    #[test]
    fn survives_no_tables() {
        assert_eq!(FontBuilder::new().build().len(), 12);
    }

    #[test]
    fn tables_are_padded() {
        let data = FontBuilder::new()
            .add_raw(Tag::new(b"zzzz"), vec![1])
            .add_raw(Tag::new(b"aaaa"), vec![2, 3, 4, 5, 6])
            .build();
        assert_eq!(data.len(), 12 + 32 + 8 + 4);
        // 'aaaa' sorts first
        assert_eq!(&data[12..16], b"aaaa");
        assert_eq!(&data[44..49], &[2, 3, 4, 5, 6]);
        assert_eq!(data[52], 1);
    }

    #[test]
    fn pad4() {
        for i in 0..10 {
            let pad = checksum_and_padding(&vec![0; i]).1;
            assert!(pad < 4);
            assert!((i + pad as usize) % 4 == 0, "pad {i} +{pad} bytes");
        }
    }
}
