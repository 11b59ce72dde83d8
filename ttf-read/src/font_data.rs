//! raw font bytes

use std::ops::{Range, RangeBounds};

use bytemuck::AnyBitPattern;
use types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// The cursor is a plain value: each parser seeds its own cursor from the
/// data it was handed, so no parsing state is ever shared between tables or
/// glyphs. Every read is bounds checked and fails with
/// [`ReadError::Truncated`] if too few bytes remain.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the data from `pos` to the end, if `pos` is in bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    /// Returns a subrange of the data, if the range is in bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..offset.saturating_add(T::RAW_BYTE_LEN))
            .and_then(T::read)
            .ok_or(ReadError::Truncated {
                offset,
                len: T::RAW_BYTE_LEN,
            })
    }

    /// Interpret the bytes in `range` as a slice of some zero-copy type.
    ///
    /// This is intended for arrays of `BigEndian<T>` and plain records built
    /// out of them.
    pub fn read_array<T: AnyBitPattern>(&self, range: Range<usize>) -> Result<&'a [T], ReadError> {
        let offset = range.start;
        let len = range.end.saturating_sub(range.start);
        let bytes = self
            .bytes
            .get(range)
            .ok_or(ReadError::Truncated { offset, len })?;
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::MalformedData("misaligned array"))
    }

    /// Create a new cursor positioned at the start of the data.
    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    /// Skip over the raw size of `T` without reading it.
    pub fn advance<T: Scalar>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    /// Skip `n_bytes`, failing if that would move past the end of the data.
    pub fn skip(&mut self, n_bytes: usize) -> Result<(), ReadError> {
        if n_bytes > self.remaining_bytes() {
            return Err(self.truncated(n_bytes));
        }
        self.pos += n_bytes;
        Ok(())
    }

    /// Read a scalar and advance the cursor.
    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let value = self.data.read_at(self.pos);
        self.advance::<T>();
        value
    }

    /// Read an array of `n_elem` zero-copy items and advance the cursor.
    pub fn read_array<T: AnyBitPattern>(&mut self, n_elem: usize) -> Result<&'a [T], ReadError> {
        let len = n_elem.saturating_mul(std::mem::size_of::<T>());
        let end = self.pos.saturating_add(len);
        let result = self.data.read_array(self.pos..end);
        self.pos = end;
        result
    }

    /// The current position of the cursor, relative to the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The number of bytes left to read.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The data that has not yet been read.
    pub fn remaining(self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }

    /// Ensure that at least `len` bytes remain, without consuming them.
    pub fn ensure(&self, len: usize) -> Result<(), ReadError> {
        if len > self.remaining_bytes() {
            Err(self.truncated(len))
        } else {
            Ok(())
        }
    }

    fn truncated(&self, len: usize) -> ReadError {
        ReadError::Truncated {
            offset: self.pos,
            len,
        }
    }
}
