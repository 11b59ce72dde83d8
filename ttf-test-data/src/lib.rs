//! test data shared between the ttf-outline crates.
//!
//! Everything here is synthesized: tables are encoded with [`BeBuffer`] and
//! assembled into font files with [`FontBuilder`].
//!
//! [`BeBuffer`]: bebuffer::BeBuffer
//! [`FontBuilder`]: builder::FontBuilder

pub mod bebuffer;
pub mod builder;
pub mod cmap;
pub mod glyf;
pub mod metrics;

use builder::FontBuilder;
use glyf::{Component, Transform};
use ttf_types::Tag;

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;
pub const LINE_GAP: i16 = 90;

/// Glyph ids in [`simple_font`].
pub mod gids {
    /// A rectangle.
    pub const NOTDEF: u16 = 0;
    /// No outline.
    pub const SPACE: u16 = 1;
    /// A single on-curve triangle.
    pub const TRIANGLE: u16 = 2;
    /// Two quadratic contours, the outer one without any on-curve points.
    pub const RING: u16 = 3;
    /// The triangle with a half size ring above it.
    pub const TRIANGLE_RING: u16 = 4;
    /// Two copies of [`TRIANGLE_RING`], side by side.
    pub const NESTED: u16 = 5;
    /// A composite that references itself.
    pub const CYCLE: u16 = 6;

    pub const NUM_GLYPHS: u16 = 7;
}

pub const NOTDEF_OUTLINE: &[glyf::Point] = &[
    (50, 0, true),
    (50, 700, true),
    (450, 700, true),
    (450, 0, true),
];

pub const TRIANGLE_OUTLINE: &[glyf::Point] = &[(0, 0, true), (300, 700, true), (600, 0, true)];

pub const RING_OUTER: &[glyf::Point] = &[
    (0, 0, false),
    (0, 600, false),
    (600, 600, false),
    (600, 0, false),
];

pub const RING_INNER: &[glyf::Point] = &[
    (200, 300, true),
    (300, 400, false),
    (400, 300, true),
    (300, 200, false),
];

/// `(advance, lsb)` for the glyphs with long metrics in [`simple_font`].
pub const H_METRICS: &[(u16, i16)] = &[
    (500, 50),
    (250, 0),
    (600, 0),
    (600, 0),
    (600, 0),
    (1200, 0),
];

/// Left side bearings of the glyphs past the long metrics.
pub const TRAILING_LSBS: &[i16] = &[-5];

/// The codepoint to glyph mapping of [`simple_font`].
pub const CHAR_MAP: &[(u16, u16)] = &[
    (0x20, gids::SPACE),
    (0x41, gids::TRIANGLE),
    (0x4F, gids::RING),
    (0xC2, gids::TRIANGLE_RING),
    (0xC3, gids::NESTED),
];

/// The glyphs of [`simple_font`], in glyph id order.
pub fn simple_font_glyphs() -> Vec<Vec<u8>> {
    vec![
        glyf::simple_glyph(&[NOTDEF_OUTLINE]).into(),
        Vec::new(),
        glyf::simple_glyph(&[TRIANGLE_OUTLINE]).into(),
        glyf::simple_glyph(&[RING_OUTER, RING_INNER]).into(),
        glyf::composite_glyph(
            [0, 0, 600, 1100],
            &[
                Component::offset(gids::TRIANGLE, 0, 0).with_flags(glyf::USE_MY_METRICS),
                Component::offset(gids::RING, 150, 800).with_transform(Transform::Scale(0.5)),
            ],
        )
        .into(),
        glyf::composite_glyph(
            [0, 0, 1200, 1100],
            &[
                Component::offset(gids::TRIANGLE_RING, 0, 0),
                Component::offset(gids::TRIANGLE_RING, 600, 0),
            ],
        )
        .into(),
        glyf::composite_glyph([0, 0, 0, 0], &[Component::offset(gids::CYCLE, 10, 10)]).into(),
    ]
}

/// A builder holding every table of [`simple_font`], for tests that need
/// to replace or drop some of them.
pub fn simple_font_builder() -> FontBuilder {
    let glyphs = simple_font_glyphs();
    let glyph_refs: Vec<&[u8]> = glyphs.iter().map(Vec::as_slice).collect();
    let (glyf, loca) = glyf::glyf_and_loca(&glyph_refs, false);
    let format4 = cmap::format4_from_pairs(CHAR_MAP);
    let mut builder = FontBuilder::new();
    builder
        .add_raw(Tag::new(b"head"), metrics::head(UNITS_PER_EM, false))
        .add_raw(Tag::new(b"maxp"), metrics::maxp(gids::NUM_GLYPHS))
        .add_raw(
            Tag::new(b"hhea"),
            metrics::hhea(ASCENDER, DESCENDER, LINE_GAP, H_METRICS.len() as u16),
        )
        .add_raw(Tag::new(b"hmtx"), metrics::hmtx(H_METRICS, TRAILING_LSBS))
        .add_raw(Tag::new(b"cmap"), cmap::cmap(&[(3, 1, format4.as_slice())]))
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf);
    builder
}

/// A small font with simple, empty and composite glyphs, with every table
/// the decoder reads.
pub fn simple_font() -> Vec<u8> {
    simple_font_builder().build()
}
