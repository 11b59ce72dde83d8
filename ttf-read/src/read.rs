//! Traits for interpreting font data

use types::{GlyphId, Tag};

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for all font tables that are self-describing: that
/// is, tables that do not require any external state in order to interpret their
/// underlying bytes. (Tables that require external state implement
/// [`FontReadWithArgs`] instead)
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A trait for types that require external data in order to be constructed.
///
/// `loca` needs the glyph count and offset format and `hmtx` needs the
/// number of long metrics; these are passed in as `Args`.
pub trait FontReadWithArgs<'a>: Sized {
    /// The type of the arguments needed to read this type.
    type Args;

    /// Read an item, using the provided args.
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The data ended before a field or array that had to be read.
    #[error("Data truncated: needed {len} bytes at offset {offset}")]
    Truncated { offset: usize, len: usize },
    /// A table or glyph offset (or offset + length) points outside the font data.
    #[error("An offset was out of bounds")]
    OutOfBounds,
    /// A magic number or version constant did not have its expected value.
    #[error("Malformed header: unexpected value for {0}")]
    MalformedHeader(&'static str),
    /// The version is recognized but not supported, such as a font collection.
    #[error("Unsupported version 0x{0:08X}")]
    UnsupportedVersion(u32),
    /// The data uses a feature this crate does not implement.
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(&'static str),
    /// A composite glyph nested deeper than the recursion limit allows.
    #[error("Recursion limit exceeded decoding composite glyph {0}")]
    RecursionLimitExceeded(GlyphId),
    /// The cmap table has no Unicode BMP subtable.
    #[error("No usable Unicode cmap subtable")]
    NoUsableCmap,
    /// A table needed for the operation is not in the font.
    #[error("the {0} table is missing")]
    TableIsMissing(Tag),
    /// The data is structurally inconsistent.
    #[error("Malformed data: '{0}'")]
    MalformedData(&'static str),
}

/// An error that occurs when loading a font.
///
/// The error identifies which part of the font failed, and wraps the
/// [`ReadError`] describing the field that was at fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    /// The font header or table directory could not be read.
    #[error("Invalid table directory: {0}")]
    Directory(#[source] ReadError),
    /// A table could not be read.
    #[error("Failed to read the '{tag}' table: {source}")]
    Table {
        /// The tag of the table that failed.
        tag: Tag,
        /// The underlying error.
        #[source]
        source: ReadError,
    },
}

impl FontError {
    pub(crate) fn table(tag: Tag) -> impl FnOnce(ReadError) -> FontError {
        move |source| FontError::Table { tag, source }
    }

    /// The tag of the table that failed, if the error was in a table.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            FontError::Directory(_) => None,
            FontError::Table { tag, .. } => Some(*tag),
        }
    }

    /// The underlying read error.
    pub fn read_error(&self) -> &ReadError {
        match self {
            FontError::Directory(source) | FontError::Table { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_table() {
        let err = FontError::Table {
            tag: Tag::new(b"head"),
            source: ReadError::MalformedHeader("head.magicNumber"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read the 'head' table: Malformed header: unexpected value for head.magicNumber"
        );
        assert_eq!(err.tag(), Some(Tag::new(b"head")));
        assert_eq!(
            ReadError::UnsupportedVersion(0x74746366).to_string(),
            "Unsupported version 0x74746366"
        );
        assert_eq!(
            ReadError::RecursionLimitExceeded(GlyphId::new(3)).to_string(),
            "Recursion limit exceeded decoding composite glyph GID_3"
        );
    }
}
