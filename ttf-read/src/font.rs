//! A parsed font, ready for character mapping and outline decoding.

use types::{GlyphId, Tag};

use crate::{
    outline::GlyphDecoder,
    tables::{
        self,
        cmap::Cmap,
        glyf::{Glyf, Glyph},
        head::Head,
        hhea::Hhea,
        hmtx::Hmtx,
        loca::Loca,
        maxp::Maxp,
    },
    DecodeSettings, FontError, FontRef, ReadError, TableDirectory, TableProvider,
};

/// The bytes of a font file.
///
/// Parsing borrows from the buffer, so the buffer must outlive every
/// [`Font`] produced from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontBuffer {
    data: Vec<u8>,
}

impl FontBuffer {
    /// Read the entire file at `path`.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        std::fs::read(path).map(Self::from)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Parse the font held by this buffer.
    pub fn parse(&self) -> Result<Font<'_>, FontError> {
        Font::parse(&self.data)
    }
}

impl From<Vec<u8>> for FontBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl AsRef<[u8]> for FontBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Global font metrics from the `hhea` table, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// Distance from the baseline to the top of the tallest glyphs.
    pub ascender: i16,
    /// Distance from the baseline to the bottom of the lowest glyphs;
    /// usually negative.
    pub descender: i16,
    /// Recommended additional spacing between lines.
    pub line_gap: i16,
    /// Maximum advance width of any glyph.
    pub advance_width_max: u16,
}

/// A TrueType font with its tables parsed.
///
/// `head`, `maxp` and `glyf` must be present. The remaining tables may be
/// missing; operations that need a missing table fail (or fall back to a
/// default) when called, rather than failing the parse. A table that is
/// present but malformed always fails the parse.
///
/// Glyph outlines are decoded on demand and nothing is cached, so a font
/// can be shared between threads and used concurrently.
#[derive(Clone, Debug)]
pub struct Font<'a> {
    font: FontRef<'a>,
    head: Head,
    maxp: Maxp,
    hhea: Result<Hhea, ReadError>,
    hmtx: Result<Hmtx, ReadError>,
    cmap: Result<Cmap<'a>, ReadError>,
    loca: Result<Loca<'a>, ReadError>,
    glyf: Glyf<'a>,
}

impl<'a> Font<'a> {
    /// Parse the font in `data`.
    ///
    /// The error identifies the table that failed, and the inner
    /// [`ReadError`] the field or structure at fault.
    pub fn parse(data: &'a [u8]) -> Result<Self, FontError> {
        let font = FontRef::new(data).map_err(FontError::Directory)?;
        let head = font.head().map_err(FontError::table(tables::head::TAG))?;
        let maxp = font.maxp().map_err(FontError::table(tables::maxp::TAG))?;
        let glyf = font.glyf().map_err(FontError::table(tables::glyf::TAG))?;
        let hhea = deferred(tables::hhea::TAG, font.hhea())?;
        let hmtx = match &hhea {
            Ok(_) => deferred(tables::hmtx::TAG, font.hmtx())?,
            Err(_) => {
                if font.data_for_tag(tables::hmtx::TAG).is_some() {
                    log::warn!("hmtx is present but hhea is not, horizontal metrics are unavailable");
                }
                Err(ReadError::TableIsMissing(tables::hhea::TAG))
            }
        };
        let cmap = deferred(tables::cmap::TAG, font.cmap())?;
        let loca = deferred(tables::loca::TAG, font.loca(head.is_long_loca()))?;
        if let Ok(loca) = &loca {
            if loca.end_offset() as usize > glyf.len() {
                log::warn!(
                    "loca ends at {} but glyf is {} bytes, glyphs past the end will fail to decode",
                    loca.end_offset(),
                    glyf.len()
                );
            }
        }
        Ok(Self {
            font,
            head,
            maxp,
            hhea,
            hmtx,
            cmap,
            loca,
            glyf,
        })
    }

    /// The unparsed font.
    pub fn font_ref(&self) -> &FontRef<'a> {
        &self.font
    }

    pub fn table_directory(&self) -> &TableDirectory<'a> {
        self.font.table_directory()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn maxp(&self) -> &Maxp {
        &self.maxp
    }

    pub fn hhea(&self) -> Result<&Hhea, ReadError> {
        self.hhea.as_ref().map_err(Clone::clone)
    }

    pub fn hmtx(&self) -> Result<&Hmtx, ReadError> {
        self.hmtx.as_ref().map_err(Clone::clone)
    }

    pub fn cmap(&self) -> Result<&Cmap<'a>, ReadError> {
        self.cmap.as_ref().map_err(Clone::clone)
    }

    pub fn loca(&self) -> Result<&Loca<'a>, ReadError> {
        self.loca.as_ref().map_err(Clone::clone)
    }

    pub fn glyf(&self) -> &Glyf<'a> {
        &self.glyf
    }

    /// Font design units per em square.
    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em()
    }

    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs()
    }

    /// Ascender, descender, line gap and maximum advance, if the font has
    /// an `hhea` table.
    pub fn vertical_metrics(&self) -> Result<VerticalMetrics, ReadError> {
        let hhea = self.hhea()?;
        Ok(VerticalMetrics {
            ascender: hhea.ascender(),
            descender: hhea.descender(),
            line_gap: hhea.line_gap(),
            advance_width_max: hhea.advance_width_max(),
        })
    }

    /// Map a Unicode codepoint to a glyph.
    ///
    /// Unmapped codepoints, codepoints outside the Basic Multilingual Plane
    /// and fonts without a usable `cmap` all map to [`GlyphId::NOTDEF`].
    pub fn lookup_glyph_index(&self, codepoint: u32) -> GlyphId {
        self.try_lookup_glyph_index(codepoint)
            .unwrap_or(GlyphId::NOTDEF)
    }

    /// Map a Unicode codepoint to a glyph, failing if the font has no
    /// usable `cmap`.
    pub fn try_lookup_glyph_index(&self, codepoint: u32) -> Result<GlyphId, ReadError> {
        Ok(self
            .cmap()?
            .map_codepoint(codepoint)
            .unwrap_or(GlyphId::NOTDEF))
    }

    /// Decode the outline of a glyph with the default settings.
    pub fn decode_glyph(&self, glyph_id: GlyphId) -> Result<Glyph, ReadError> {
        self.decode_glyph_with(glyph_id, DecodeSettings::default())
    }

    /// Decode the outline of a glyph.
    pub fn decode_glyph_with(
        &self,
        glyph_id: GlyphId,
        settings: DecodeSettings,
    ) -> Result<Glyph, ReadError> {
        let loca = self.loca()?;
        GlyphDecoder::new(loca, self.glyf, settings).decode(glyph_id)
    }

    /// The advance width of a glyph, or 0 if it is unknown.
    pub fn advance_width(&self, glyph_id: GlyphId) -> u16 {
        self.try_advance_width(glyph_id).unwrap_or_default()
    }

    /// The advance width of a glyph.
    pub fn try_advance_width(&self, glyph_id: GlyphId) -> Result<u16, ReadError> {
        self.hmtx()?
            .advance(glyph_id)
            .ok_or(ReadError::OutOfBounds)
    }

    /// The left side bearing of a glyph, if known.
    pub fn left_side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        self.hmtx().ok()?.side_bearing(glyph_id)
    }
}

/// Keep the error of a table that is missing or unusable so it can be
/// reported by the operations that need it; any other error fails the parse.
fn deferred<T>(tag: Tag, result: Result<T, ReadError>) -> Result<Result<T, ReadError>, FontError> {
    match result {
        Err(
            err @ (ReadError::TableIsMissing(_)
            | ReadError::NoUsableCmap
            | ReadError::UnsupportedFeature(_)),
        ) => {
            log::debug!("'{tag}' table is unavailable: {err}");
            Ok(Err(err))
        }
        Err(err) => Err(FontError::Table { tag, source: err }),
        Ok(table) => Ok(Ok(table)),
    }
}
