//! Decoding glyph outlines from the `loca` and `glyf` tables.

use types::GlyphId;

use crate::{
    tables::{
        glyf::{CompositeGlyph, Glyf, Glyph, GlyphHeader, SimpleGlyph},
        loca::Loca,
    },
    FontRead, ReadError,
};

/// Limit for recursion when loading TrueType composite glyphs.
pub const GLYF_COMPOSITE_RECURSION_LIMIT: usize = 8;

/// The total number of components visited while decoding one glyph.
///
/// A shallow tree of composites that each reference the next level several
/// times grows exponentially; this bounds the work without limiting depth.
const COMPONENT_LIMIT: usize = u16::MAX as usize;

/// Options for decoding glyph outlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeSettings {
    /// The maximum nesting depth of composite glyphs.
    ///
    /// A simple glyph referenced directly by the glyph being decoded is at
    /// depth 1.
    pub recursion_limit: usize,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            recursion_limit: GLYF_COMPOSITE_RECURSION_LIMIT,
        }
    }
}

impl DecodeSettings {
    pub fn with_recursion_limit(recursion_limit: usize) -> Self {
        Self { recursion_limit }
    }
}

/// Decodes glyphs, resolving composites into a single flat outline.
///
/// Each call keeps its own depth and component count so that any number of
/// glyphs may be decoded concurrently from the same tables.
pub(crate) struct GlyphDecoder<'a> {
    loca: &'a Loca<'a>,
    glyf: Glyf<'a>,
    settings: DecodeSettings,
}

impl<'a> GlyphDecoder<'a> {
    pub(crate) fn new(loca: &'a Loca<'a>, glyf: Glyf<'a>, settings: DecodeSettings) -> Self {
        Self {
            loca,
            glyf,
            settings,
        }
    }

    pub(crate) fn decode(&self, glyph_id: GlyphId) -> Result<Glyph, ReadError> {
        let mut components_left = COMPONENT_LIMIT;
        self.decode_rec(glyph_id, 0, &mut components_left)
    }

    fn decode_rec(
        &self,
        glyph_id: GlyphId,
        recurse_depth: usize,
        components_left: &mut usize,
    ) -> Result<Glyph, ReadError> {
        if recurse_depth > self.settings.recursion_limit {
            return Err(ReadError::RecursionLimitExceeded(glyph_id));
        }
        let range = self.loca.glyph_range(glyph_id)?;
        if range.is_empty() {
            return Ok(Glyph::default());
        }
        let data = self.glyf.glyph_data(range)?;
        if !GlyphHeader::read(data)?.is_composite() {
            return SimpleGlyph::read(data).map(Glyph::Simple);
        }
        let mut composite = CompositeGlyph::read(data)?;
        let components = composite.components().to_vec();
        for component in &components {
            *components_left = components_left
                .checked_sub(1)
                .ok_or(ReadError::MalformedData("too many composite components"))?;
            let child = self.decode_rec(component.glyph, recurse_depth + 1, components_left)?;
            composite.append(component, &child)?;
        }
        Ok(Glyph::Composite(composite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tables::glyf::CurvePoint, FontRef, TableProvider};
    use pretty_assertions::assert_eq;
    use ttf_test_data::{
        gids,
        glyf::{self as glyf_data, Component},
    };

    fn decode_with(data: &[u8], gid: u16, settings: DecodeSettings) -> Result<Glyph, ReadError> {
        let font = FontRef::new(data).unwrap();
        let loca = font.loca(None).unwrap();
        let decoder = GlyphDecoder::new(&loca, font.glyf().unwrap(), settings);
        decoder.decode(GlyphId::new(gid))
    }

    fn decode(data: &[u8], gid: u16) -> Result<Glyph, ReadError> {
        decode_with(data, gid, DecodeSettings::default())
    }

    #[test]
    fn empty_glyph() {
        let font = ttf_test_data::simple_font();
        let glyph = decode(&font, gids::SPACE).unwrap();
        assert_eq!(glyph.num_contours(), 0);
        assert_eq!(glyph.num_points(), 0);
        assert!(glyph.bbox().is_empty());
    }

    #[test]
    fn simple_glyph() {
        let font = ttf_test_data::simple_font();
        let glyph = decode(&font, gids::TRIANGLE).unwrap();
        assert!(matches!(glyph, Glyph::Simple(_)));
        assert_eq!(
            glyph.points(),
            &[
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(300, 700),
                CurvePoint::on_curve(600, 0),
            ]
        );
    }

    #[test]
    fn composite_sums_points_and_contours() {
        let font = ttf_test_data::simple_font();
        let glyph = decode(&font, gids::TRIANGLE_RING).unwrap();
        assert_eq!(glyph.num_points(), 3 + 8);
        assert_eq!(glyph.contour_ends(), &[2, 6, 10]);
        // header bbox, not recomputed
        assert_eq!(glyph.bbox().y_max, 1100);
        let Glyph::Composite(composite) = &glyph else {
            panic!("expected a composite glyph");
        };
        assert_eq!(composite.components().len(), 2);
    }

    #[test]
    fn component_is_scaled_then_offset() {
        let font = ttf_test_data::simple_font();
        let glyph = decode(&font, gids::TRIANGLE_RING).unwrap();
        // ring points scaled by 0.5, then moved by (150, 800)
        let ring: Vec<_> = glyph.points()[3..]
            .iter()
            .map(|p| (p.x, p.y, p.on_curve))
            .collect();
        assert_eq!(
            ring,
            [
                (150, 800, false),
                (150, 1100, false),
                (450, 1100, false),
                (450, 800, false),
                (250, 950, true),
                (300, 1000, false),
                (350, 950, true),
                (300, 900, false),
            ]
        );
    }

    #[test]
    fn nested_composite() {
        let font = ttf_test_data::simple_font();
        let glyph = decode(&font, gids::NESTED).unwrap();
        assert_eq!(glyph.num_points(), 22);
        assert_eq!(glyph.num_contours(), 6);
        assert_eq!(glyph.contour_ends(), &[2, 6, 10, 13, 17, 21]);
        // the second copy is offset by 600
        assert_eq!(glyph.points()[11], CurvePoint::on_curve(600, 0));
        assert_eq!(glyph.points()[12], CurvePoint::on_curve(900, 700));
    }

    #[test]
    fn cycle_hits_recursion_limit() {
        let font = ttf_test_data::simple_font();
        assert_eq!(
            decode(&font, gids::CYCLE),
            Err(ReadError::RecursionLimitExceeded(GlyphId::new(gids::CYCLE)))
        );
    }

    #[test]
    fn recursion_limit_is_configurable() {
        let font = ttf_test_data::simple_font();
        // NESTED -> TRIANGLE_RING -> TRIANGLE is two levels deep
        assert!(decode_with(&font, gids::NESTED, DecodeSettings::with_recursion_limit(2)).is_ok());
        assert_eq!(
            decode_with(&font, gids::NESTED, DecodeSettings::with_recursion_limit(1)),
            Err(ReadError::RecursionLimitExceeded(GlyphId::new(gids::TRIANGLE)))
        );
        assert!(decode_with(&font, gids::TRIANGLE, DecodeSettings::with_recursion_limit(0)).is_ok());
    }

    #[test]
    fn glyph_past_loca_end() {
        let font = ttf_test_data::simple_font();
        assert_eq!(
            decode(&font, gids::NUM_GLYPHS),
            Err(ReadError::OutOfBounds)
        );
    }

    #[test]
    fn bad_component_fails_whole_glyph() {
        let mut builder = ttf_test_data::simple_font_builder();
        // a composite whose second component is past the last glyph
        let mut glyphs = ttf_test_data::simple_font_glyphs();
        glyphs[gids::CYCLE as usize] = glyf_data::composite_glyph(
            [0, 0, 0, 0],
            &[
                Component::offset(gids::TRIANGLE, 0, 0),
                Component::offset(gids::NUM_GLYPHS + 3, 0, 0),
            ],
        )
        .into();
        let refs: Vec<&[u8]> = glyphs.iter().map(Vec::as_slice).collect();
        let (glyf, loca) = glyf_data::glyf_and_loca(&refs, false);
        let font = builder
            .add_raw(crate::tables::glyf::TAG, glyf)
            .add_raw(crate::tables::loca::TAG, loca)
            .build();
        assert_eq!(decode(&font, gids::CYCLE), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn exponential_fan_out_is_bounded() {
        // each level references the one below 16 times: 16^4 empty leaves
        let mut glyphs: Vec<Vec<u8>> = vec![Vec::new()];
        for level in 0..4u16 {
            let components = vec![Component::offset(level, 1, 1); 16];
            glyphs.push(glyf_data::composite_glyph([0, 0, 0, 0], &components).into());
        }
        let refs: Vec<&[u8]> = glyphs.iter().map(Vec::as_slice).collect();
        let (glyf, loca) = glyf_data::glyf_and_loca(&refs, true);
        let font = ttf_test_data::simple_font_builder()
            .add_raw(crate::tables::head::TAG, ttf_test_data::metrics::head(1000, true))
            .add_raw(crate::tables::maxp::TAG, ttf_test_data::metrics::maxp(5))
            .remove(crate::tables::hhea::TAG)
            .remove(crate::tables::hmtx::TAG)
            .add_raw(crate::tables::glyf::TAG, glyf)
            .add_raw(crate::tables::loca::TAG, loca)
            .build();
        assert_eq!(
            decode(&font, 4),
            Err(ReadError::MalformedData("too many composite components"))
        );
        // three levels stay within the limit
        assert!(decode(&font, 3).unwrap().is_empty());
    }
}
