//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use std::ops::{BitAnd, BitOr, Range};

use types::{newtype_scalar, BigEndian, BoundingBox, F2Dot14, GlyphId, Point, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table
///
/// The table is a plain sequence of glyph records; the `loca` table says
/// where each one starts.
#[derive(Clone, Copy, Debug)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf { data })
    }
}

impl<'a> Glyf<'a> {
    /// The raw table data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// The length of the table, in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The data for the glyph record in `range`, as given by `loca`.
    pub fn glyph_data(&self, range: Range<usize>) -> Result<FontData<'a>, ReadError> {
        self.data.slice(range).ok_or(ReadError::OutOfBounds)
    }
}

/// Flags used in [`SimpleGlyph`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimpleGlyphFlags(u8);

impl SimpleGlyphFlags {
    /// Bit 0: If set, the point is on the curve; otherwise, it is off the curve.
    pub const ON_CURVE_POINT: Self = Self(0x01);
    /// Bit 1: If set, the corresponding x-coordinate is 1 byte long,
    /// and the sign is determined by the X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR
    /// flag. If not set, its interpretation depends on the
    /// X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR flag.
    pub const X_SHORT_VECTOR: Self = Self(0x02);
    /// Bit 2: If set, the corresponding y-coordinate is 1 byte long,
    /// and the sign is determined by the Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR
    /// flag.
    pub const Y_SHORT_VECTOR: Self = Self(0x04);
    /// Bit 3: If set, the next byte (read as unsigned) specifies the number
    /// of additional times this flag byte is to be repeated in the logical
    /// flags array.
    pub const REPEAT_FLAG: Self = Self(0x08);
    /// Bit 4: With a short x-coordinate this is the sign of the value (set
    /// means positive). Otherwise, if set, the x-coordinate is the same as
    /// the previous one and is not stored in the file.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self(0x10);
    /// Bit 5: As bit 4, for the y-coordinate.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self(0x20);
    /// Bit 6: If set, contours in the glyph description could overlap.
    pub const OVERLAP_SIMPLE: Self = Self(0x40);

    const ALL: u8 = 0x7F;

    /// Returns an empty set of flags.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the raw value of the flags currently stored.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Convert from underlying bit representation, dropping any bits
    /// that do not correspond to flags.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SimpleGlyphFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for SimpleGlyphFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

newtype_scalar!(SimpleGlyphFlags, [u8; 1]);

/// Flags used in [`Component`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeGlyphFlags(u16);

impl CompositeGlyphFlags {
    /// Bit 0: If this is set, the arguments are 16-bit (uint16 or int16);
    /// otherwise, they are bytes (uint8 or int8).
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);
    /// Bit 1: If this is set, the arguments are signed xy values; otherwise,
    /// they are unsigned point numbers.
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);
    /// Bit 2: If set and ARGS_ARE_XY_VALUES is also set, the xy values are
    /// rounded to the nearest grid line. Ignored if ARGS_ARE_XY_VALUES is
    /// not set.
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);
    /// Bit 3: This indicates that there is a simple scale for the
    /// component. Otherwise, scale = 1.0.
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);
    /// Bit 5: Indicates at least one more glyph after this one.
    pub const MORE_COMPONENTS: Self = Self(0x0020);
    /// Bit 6: The x direction will use a different scale from the y
    /// direction.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);
    /// Bit 7: There is a 2 by 2 transformation that will be used to scale
    /// the component.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);
    /// Bit 8: Following the last component are instructions for the
    /// composite character.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);
    /// Bit 9: If set, this forces the aw and lsb (and rsb) for the composite
    /// to be equal to those from this component glyph.
    pub const USE_MY_METRICS: Self = Self(0x0200);
    /// Bit 10: If set, the components of the compound glyph overlap.
    pub const OVERLAP_COMPOUND: Self = Self(0x0400);
    /// Bit 11: The composite is designed to have the component offset
    /// scaled.
    pub const SCALED_COMPONENT_OFFSET: Self = Self(0x0800);
    /// Bit 12: The composite is designed not to have the component offset
    /// scaled.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self(0x1000);

    const ALL: u16 = 0x1FEF;

    /// Returns an empty set of flags.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the raw value of the flags currently stored.
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Convert from underlying bit representation, dropping any bits
    /// that do not correspond to flags.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::ALL)
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CompositeGlyphFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

newtype_scalar!(CompositeGlyphFlags, [u8; 2]);

/// Point with an associated on-curve flag in a decoded glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i32, y: i32, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience to construct an on-curve point
    pub fn on_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience to construct an off-curve point
    pub fn off_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, false)
    }

    pub fn point(&self) -> Point<i32> {
        Point::new(self.x, self.y)
    }
}

/// The leading fields shared by simple and composite glyph records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphHeader {
    /// If the number of contours is greater than or equal to zero, this is
    /// a simple glyph. If negative, this is a composite glyph.
    pub number_of_contours: i16,
    /// The bounding box of the glyph, in font units.
    pub bbox: BoundingBox<i16>,
}

impl GlyphHeader {
    /// The size of the header, in bytes.
    pub const RAW_BYTE_LEN: usize = 10;

    pub fn is_composite(&self) -> bool {
        self.number_of_contours < 0
    }
}

impl<'a> FontRead<'a> for GlyphHeader {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(GlyphHeader {
            number_of_contours: cursor.read()?,
            bbox: BoundingBox {
                x_min: cursor.read()?,
                y_min: cursor.read()?,
                x_max: cursor.read()?,
                y_max: cursor.read()?,
            },
        })
    }
}

/// A glyph defined directly by its contours.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleGlyph {
    bbox: BoundingBox<i16>,
    contour_ends: Vec<u16>,
    points: Vec<CurvePoint>,
    instructions_len: u16,
}

impl<'a> FontRead<'a> for SimpleGlyph {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let header = GlyphHeader::read(data)?;
        if header.is_composite() {
            return Err(ReadError::MalformedData("expected a simple glyph"));
        }
        let mut cursor = data.cursor();
        cursor.skip(GlyphHeader::RAW_BYTE_LEN)?;
        let end_points: &[BigEndian<u16>] =
            cursor.read_array(header.number_of_contours as usize)?;
        let contour_ends: Vec<u16> = end_points.iter().map(BigEndian::get).collect();
        if contour_ends.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ReadError::MalformedData(
                "contour end points are not increasing",
            ));
        }
        let Some(&last_end) = contour_ends.last() else {
            return Ok(SimpleGlyph {
                bbox: header.bbox,
                ..Default::default()
            });
        };
        let n_points = last_end as usize + 1;
        let instructions_len: u16 = cursor.read()?;
        // hinting instructions are not executed
        cursor.skip(instructions_len as usize)?;

        let mut flags = Vec::with_capacity(n_points);
        while flags.len() < n_points {
            let flag: SimpleGlyphFlags = cursor.read()?;
            let mut count = 1;
            if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                count += cursor.read::<u8>()? as usize;
                let remaining = n_points - flags.len();
                if count > remaining {
                    log::warn!("flag repeat count {count} exceeds the {remaining} points left");
                    count = remaining;
                }
            }
            flags.resize(flags.len() + count, flag);
        }

        let (x_len, y_len) = coords_len(&flags);
        cursor.ensure(x_len + y_len)?;
        let mut points = vec![CurvePoint::default(); n_points];
        let mut x = 0i32;
        for (flag, point) in flags.iter().zip(points.iter_mut()) {
            let mut delta = 0i32;
            if flag.contains(SimpleGlyphFlags::X_SHORT_VECTOR) {
                delta = cursor.read::<u8>()? as i32;
                if !flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
                    delta = -delta;
                }
            } else if !flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
                delta = cursor.read::<i16>()? as i32;
            }
            x = x.wrapping_add(delta);
            point.x = x;
        }
        let mut y = 0i32;
        for (flag, point) in flags.iter().zip(points.iter_mut()) {
            let mut delta = 0i32;
            if flag.contains(SimpleGlyphFlags::Y_SHORT_VECTOR) {
                delta = cursor.read::<u8>()? as i32;
                if !flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
                    delta = -delta;
                }
            } else if !flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
                delta = cursor.read::<i16>()? as i32;
            }
            y = y.wrapping_add(delta);
            point.y = y;
            point.on_curve = flag.contains(SimpleGlyphFlags::ON_CURVE_POINT);
        }
        Ok(SimpleGlyph {
            bbox: header.bbox,
            contour_ends,
            points,
            instructions_len,
        })
    }
}

/// The byte lengths of the x and y coordinate arrays described by `flags`.
fn coords_len(flags: &[SimpleGlyphFlags]) -> (usize, usize) {
    let mut x_len = 0;
    let mut y_len = 0;
    for flag in flags {
        if flag.contains(SimpleGlyphFlags::X_SHORT_VECTOR) {
            x_len += 1;
        } else if !flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
            x_len += 2;
        }
        if flag.contains(SimpleGlyphFlags::Y_SHORT_VECTOR) {
            y_len += 1;
        } else if !flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
            y_len += 2;
        }
    }
    (x_len, y_len)
}

impl SimpleGlyph {
    /// The bounding box from the glyph header.
    pub fn bbox(&self) -> BoundingBox<i16> {
        self.bbox
    }

    /// Index of the last point of each contour.
    pub fn contour_ends(&self) -> &[u16] {
        &self.contour_ends
    }

    /// All points, with absolute coordinates.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Total number of bytes of hinting instructions; these are skipped.
    pub fn instructions_len(&self) -> u16 {
        self.instructions_len
    }
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the transform to a point, rounding to the nearest integer.
    ///
    /// `x' = xx * x + xy * y`, `y' = yx * x + yy * y`.
    pub fn apply(&self, point: Point<i32>) -> Point<i32> {
        if self.is_identity() {
            return point;
        }
        let (x, y) = (point.x as f64, point.y as f64);
        let [xx, yx, xy, yy] = [self.xx, self.yx, self.xy, self.yy].map(|v| v.to_f32() as f64);
        let x2 = xx * x + xy * y;
        let y2 = yx * x + yy * y;
        Point::new(x2.round() as i32, y2.round() as i32)
    }
}

/// A reference to another glyph, with its placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Translation applied to the component.
    pub offset: Point<i16>,
    /// Component transformation matrix.
    pub transform: Transform,
}

impl Component {
    /// `true` if the offset is transformed along with the component's points.
    pub fn is_offset_scaled(&self) -> bool {
        self.flags
            .contains(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET)
            && !self
                .flags
                .contains(CompositeGlyphFlags::UNSCALED_COMPONENT_OFFSET)
    }

    /// Place a point of the component glyph in the composite.
    ///
    /// When [`is_offset_scaled`](Self::is_offset_scaled) the offset is added
    /// before the transform; otherwise the point is transformed, then offset.
    pub fn place(&self, point: Point<i32>) -> Point<i32> {
        let offset = self.offset.map(i32::from);
        if self.is_offset_scaled() {
            self.transform
                .apply(Point::new(point.x.wrapping_add(offset.x), point.y.wrapping_add(offset.y)))
        } else {
            let point = self.transform.apply(point);
            Point::new(point.x.wrapping_add(offset.x), point.y.wrapping_add(offset.y))
        }
    }
}

/// A glyph consisting of other glyphs.
///
/// Reading the record yields the components; the points and contours of the
/// components are appended as each one is decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeGlyph {
    bbox: BoundingBox<i16>,
    components: Vec<Component>,
    contour_ends: Vec<u16>,
    points: Vec<CurvePoint>,
}

impl<'a> FontRead<'a> for CompositeGlyph {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let header = GlyphHeader::read(data)?;
        if !header.is_composite() {
            return Err(ReadError::MalformedData("expected a composite glyph"));
        }
        let mut cursor = data.cursor();
        cursor.skip(GlyphHeader::RAW_BYTE_LEN)?;
        let mut components = Vec::new();
        loop {
            let flags: CompositeGlyphFlags = cursor.read()?;
            let glyph: GlyphId = cursor.read()?;
            if !flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES) {
                return Err(ReadError::UnsupportedFeature(
                    "point-matching composite components",
                ));
            }
            let offset = if flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS) {
                Point::new(cursor.read::<i16>()?, cursor.read::<i16>()?)
            } else {
                Point::new(cursor.read::<i8>()? as i16, cursor.read::<i8>()? as i16)
            };
            let mut transform = Transform::default();
            if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
                transform.xx = cursor.read()?;
                transform.yy = transform.xx;
            } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
                transform.xx = cursor.read()?;
                transform.yy = cursor.read()?;
            } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
                transform.xx = cursor.read()?;
                transform.yx = cursor.read()?;
                transform.xy = cursor.read()?;
                transform.yy = cursor.read()?;
            }
            components.push(Component {
                flags,
                glyph,
                offset,
                transform,
            });
            if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
                break;
            }
        }
        Ok(CompositeGlyph {
            bbox: header.bbox,
            components,
            contour_ends: Vec::new(),
            points: Vec::new(),
        })
    }
}

impl CompositeGlyph {
    /// The bounding box from the glyph header; it is not recomputed from
    /// the components.
    pub fn bbox(&self) -> BoundingBox<i16> {
        self.bbox
    }

    /// The components, in file order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Index of the last point of each contour, across all components.
    pub fn contour_ends(&self) -> &[u16] {
        &self.contour_ends
    }

    /// The placed points of all components.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Append the outline of a decoded component glyph, placed by `component`.
    pub(crate) fn append(&mut self, component: &Component, child: &Glyph) -> Result<(), ReadError> {
        let base = self.points.len();
        for &end in child.contour_ends() {
            let end = u16::try_from(base + end as usize)
                .map_err(|_| ReadError::MalformedData("composite glyph has too many points"))?;
            self.contour_ends.push(end);
        }
        self.points.extend(child.points().iter().map(|point| {
            let placed = component.place(point.point());
            CurvePoint::new(placed.x, placed.y, point.on_curve)
        }));
        Ok(())
    }
}

/// A decoded glyph outline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Glyph {
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
}

impl Default for Glyph {
    /// A glyph without an outline.
    fn default() -> Self {
        Glyph::Simple(SimpleGlyph::default())
    }
}

impl Glyph {
    /// The bounding box from the glyph header; zero for empty glyphs.
    pub fn bbox(&self) -> BoundingBox<i16> {
        match self {
            Glyph::Simple(glyph) => glyph.bbox(),
            Glyph::Composite(glyph) => glyph.bbox(),
        }
    }

    /// Index of the last point of each contour.
    pub fn contour_ends(&self) -> &[u16] {
        match self {
            Glyph::Simple(glyph) => glyph.contour_ends(),
            Glyph::Composite(glyph) => glyph.contour_ends(),
        }
    }

    /// All points of the outline.
    pub fn points(&self) -> &[CurvePoint] {
        match self {
            Glyph::Simple(glyph) => glyph.points(),
            Glyph::Composite(glyph) => glyph.points(),
        }
    }

    pub fn num_points(&self) -> usize {
        self.points().len()
    }

    pub fn num_contours(&self) -> usize {
        self.contour_ends().len()
    }

    /// `true` if the glyph has no points.
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Iterate over the points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[CurvePoint]> + '_ {
        let points = self.points();
        self.contour_ends()
            .iter()
            .scan(0usize, move |start, &end| {
                let range = *start..end as usize + 1;
                *start = range.end;
                points.get(range)
            })
    }
}
