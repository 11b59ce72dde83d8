use std::fmt::{Debug, Display, Formatter};

/// A four byte table identifier, such as `glyf` or `cmap`.
///
/// Tags are compared and ordered by their bytes, which is the order of the
/// records in a sorted table directory. Tags read from a font are never
/// validated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// The bytes of the tag, as stored in a font.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// The tag as a big-endian `u32`, for comparing against `sfntVersion`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(raw)
    }
}

// unprintable bytes are shown as hex, so a corrupt directory still prints
impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BigEndian, Scalar};

    #[test]
    fn sfnt_version_tags() {
        assert_eq!(Tag::new(b"ttcf").to_u32(), 0x7474_6366);
        assert_eq!(Tag::new(b"true").to_u32(), crate::TRUE_SFNT_VERSION);
        assert_eq!(Tag::new(b"OTTO").to_be_bytes(), [0x4F, 0x54, 0x54, 0x4F]);
    }

    #[test]
    fn ordered_like_directory() {
        let mut tags = [b"hmtx", b"OS/2", b"glyf", b"cmap"].map(Tag::new);
        tags.sort();
        assert_eq!(tags, [b"OS/2", b"cmap", b"glyf", b"hmtx"].map(Tag::new));
    }

    #[test]
    fn read_from_font_bytes() {
        let raw = BigEndian::<Tag>::from_slice(b"loca").unwrap();
        assert_eq!(raw.get(), Tag::new(b"loca"));
        let corrupt = Tag::read(&[0x19, b'z', b'@', 0x7F]).unwrap();
        assert_eq!(corrupt.to_string(), "{0x19}z@{0x7F}");
        assert_eq!(format!("{:?}", Tag::new(b"loca")), "Tag(loca)");
    }
}
