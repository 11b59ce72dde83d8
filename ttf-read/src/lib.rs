//! Decoding TrueType font files.
//!
//! This crate turns the bytes of a TrueType ("sfnt") font into the data an
//! application needs to render text: the [table directory](TableDirectory),
//! the scalar metric tables, the Unicode character map and per-glyph vector
//! outlines.
//!
//! The main entry point is [`Font`], which validates the table directory and
//! parses the small metric and mapping tables up front. Glyph outlines are
//! decoded lazily, one call per glyph:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let bytes: Vec<u8> = Vec::new();
//! use ttf_read::Font;
//!
//! let font = Font::parse(&bytes)?;
//! let gid = font.lookup_glyph_index('A' as u32);
//! let glyph = font.decode_glyph(gid)?;
//! println!(
//!     "{gid}: {} points, advance {} of {} units",
//!     glyph.num_points(),
//!     font.advance_width(gid),
//!     font.units_per_em()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Lower level access is provided by [`FontRef`], which only validates the
//! table directory, and the [`TableProvider`] trait, which parses individual
//! tables on demand.
//!
//! Every type produced by this crate is immutable once built, so a [`Font`]
//! can be shared between threads and glyphs decoded concurrently.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font;
mod font_data;
mod outline;
mod path;
mod read;
mod table_directory;
mod table_provider;
pub mod tables;

pub use font::{Font, FontBuffer, VerticalMetrics};
pub use font_data::{Cursor, FontData};
pub use outline::{DecodeSettings, GLYF_COMPOSITE_RECURSION_LIMIT};
pub use read::{FontError, FontRead, FontReadWithArgs, ReadError};
pub use table_directory::{TableDirectory, TableRecord};
pub use table_provider::TableProvider;

/// Public re-export of the ttf-types crate.
pub extern crate ttf_types as types;

use types::Tag;

/// Reference to the content of a font file.
///
/// This only validates the table directory; tables are parsed on demand
/// through the [`TableProvider`] trait.
#[derive(Clone, Debug)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    table_directory: TableDirectory<'a>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single TrueType font; collections are rejected
    /// with [`ReadError::UnsupportedVersion`].
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let table_directory = TableDirectory::read(data)?;
        Ok(Self {
            data,
            table_directory,
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.table_directory.find(tag)?;
        self.data.slice(record.range())
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}
