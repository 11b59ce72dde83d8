//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontReadWithArgs, ReadError};

/// 'hmtx'
pub const TAG: Tag = Tag::new(b"hmtx");

/// The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table
///
/// Every glyph has an entry; glyphs past `numberOfHMetrics` share the last
/// explicit advance width but keep their own left side bearing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hmtx {
    metrics: Vec<LongMetric>,
}

/// An advance width and side bearing pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongMetric {
    /// Advance width, in font design units.
    pub advance: u16,
    /// Glyph left side bearing, in font design units.
    pub side_bearing: i16,
}

/// A `longHorMetric` record as stored in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct LongMetricRecord {
    advance: BigEndian<u16>,
    side_bearing: BigEndian<i16>,
}

impl LongMetricRecord {
    /// Advance width, in font design units.
    pub fn advance(&self) -> u16 {
        self.advance.get()
    }

    /// Glyph left side bearing, in font design units.
    pub fn side_bearing(&self) -> i16 {
        self.side_bearing.get()
    }
}

impl From<&LongMetricRecord> for LongMetric {
    fn from(record: &LongMetricRecord) -> Self {
        Self {
            advance: record.advance(),
            side_bearing: record.side_bearing(),
        }
    }
}

impl<'a> FontReadWithArgs<'a> for Hmtx {
    /// `(numberOfHMetrics, numGlyphs)`
    type Args = (u16, u16);

    fn read_with_args(data: FontData<'a>, args: &(u16, u16)) -> Result<Self, ReadError> {
        let (number_of_h_metrics, num_glyphs) = *args;
        if number_of_h_metrics == 0 && num_glyphs > 0 {
            return Err(ReadError::MalformedData("hmtx has no long metrics"));
        }
        if number_of_h_metrics > num_glyphs {
            log::warn!(
                "numberOfHMetrics ({number_of_h_metrics}) exceeds numGlyphs ({num_glyphs})"
            );
        }
        let n_long = number_of_h_metrics.min(num_glyphs) as usize;
        let n_short = num_glyphs as usize - n_long;
        let mut cursor = data.cursor();
        let long: &[LongMetricRecord] = cursor.read_array(n_long)?;
        // bearings for the remaining glyphs follow the full numberOfHMetrics records
        cursor.skip((number_of_h_metrics as usize - n_long) * 4)?;
        let short: &[BigEndian<i16>] = cursor.read_array(n_short)?;

        let mut metrics: Vec<LongMetric> = long.iter().map(LongMetric::from).collect();
        let last_advance = metrics.last().map(|m| m.advance).unwrap_or_default();
        metrics.extend(short.iter().map(|lsb| LongMetric {
            advance: last_advance,
            side_bearing: lsb.get(),
        }));
        Ok(Hmtx { metrics })
    }
}

impl Hmtx {
    /// The number of glyphs with metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// `true` if the table has no metrics.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// The advance and side bearing of the given glyph.
    pub fn metric(&self, glyph_id: GlyphId) -> Option<LongMetric> {
        self.metrics.get(glyph_id.to_u16() as usize).copied()
    }

    /// Returns the advance width for the given glyph identifier.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        self.metric(glyph_id).map(|m| m.advance)
    }

    /// Returns the left side bearing for the given glyph identifier.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        self.metric(glyph_id).map(|m| m.side_bearing)
    }

    /// All metrics, indexed by glyph id.
    pub fn metrics(&self) -> &[LongMetric] {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::bebuffer::BeBuffer;

    #[test]
    fn trailing_glyphs_share_last_advance() {
        let buf = BeBuffer::new()
            .extend([500u16, 10, 620, 20])
            .extend([-3i16, 4, 5]);
        let hmtx = Hmtx::read_with_args(FontData::new(&buf), &(2, 5)).unwrap();
        assert_eq!(hmtx.len(), 5);
        assert_eq!(hmtx.advance(GlyphId::new(0)), Some(500));
        assert_eq!(hmtx.side_bearing(GlyphId::new(0)), Some(10));
        for (gid, lsb) in [(2, -3), (3, 4), (4, 5)] {
            let gid = GlyphId::new(gid);
            assert_eq!(hmtx.advance(gid), hmtx.advance(GlyphId::new(1)));
            assert_eq!(hmtx.side_bearing(gid), Some(lsb));
        }
        assert_eq!(hmtx.metric(GlyphId::new(5)), None);
    }

    #[test]
    fn extra_long_metrics_are_ignored() {
        let buf = BeBuffer::new().extend([500u16, 10, 620, 20, 700, 30]);
        let hmtx = Hmtx::read_with_args(FontData::new(&buf), &(3, 2)).unwrap();
        assert_eq!(
            hmtx.metrics(),
            &[
                LongMetric {
                    advance: 500,
                    side_bearing: 10
                },
                LongMetric {
                    advance: 620,
                    side_bearing: 20
                }
            ]
        );
    }

    #[test]
    fn no_long_metrics() {
        assert_eq!(
            Hmtx::read_with_args(FontData::new(&[]), &(0, 3)),
            Err(ReadError::MalformedData("hmtx has no long metrics"))
        );
        assert!(Hmtx::read_with_args(FontData::new(&[]), &(0, 0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn negative_long_bearings() {
        let buf = BeBuffer::new()
            .push(0xFFFFu16)
            .push(-120i16)
            .push(40u16)
            .push(i16::MIN);
        let hmtx = Hmtx::read_with_args(FontData::new(&buf), &(2, 2)).unwrap();
        assert_eq!(
            hmtx.metrics(),
            &[
                LongMetric {
                    advance: 0xFFFF,
                    side_bearing: -120
                },
                LongMetric {
                    advance: 40,
                    side_bearing: i16::MIN
                }
            ]
        );
    }

    #[test]
    fn truncated_bearings() {
        let buf = BeBuffer::new().extend([500u16, 10]).push(7i16);
        assert_eq!(
            Hmtx::read_with_args(FontData::new(&buf), &(1, 4)),
            Err(ReadError::Truncated { offset: 4, len: 6 })
        );
    }
}
