//! Encoding glyph outlines and the loca/glyf pair

use ttf_types::F2Dot14;

use crate::bebuffer::BeBuffer;

pub const ON_CURVE_POINT: u8 = 0x01;
pub const X_SHORT_VECTOR: u8 = 0x02;
pub const Y_SHORT_VECTOR: u8 = 0x04;
pub const REPEAT_FLAG: u8 = 0x08;
pub const X_IS_SAME_OR_POSITIVE: u8 = 0x10;
pub const Y_IS_SAME_OR_POSITIVE: u8 = 0x20;

pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
pub const WE_HAVE_A_SCALE: u16 = 0x0008;
pub const MORE_COMPONENTS: u16 = 0x0020;
pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
pub const USE_MY_METRICS: u16 = 0x0200;
pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;

/// A point in a simple glyph, as `(x, y, on_curve)`.
pub type Point = (i16, i16, bool);

/// Encode a simple glyph.
///
/// Deltas use the most compact encoding available (omitted, one byte or two)
/// so the decoder sees every form; flags are never run length encoded.
pub fn simple_glyph(contours: &[&[Point]]) -> BeBuffer {
    let points: Vec<Point> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or_default();
    let y_min = points.iter().map(|p| p.1).min().unwrap_or_default();
    let x_max = points.iter().map(|p| p.0).max().unwrap_or_default();
    let y_max = points.iter().map(|p| p.1).max().unwrap_or_default();

    let mut buf = BeBuffer::new()
        .push(contours.len() as i16)
        .extend([x_min, y_min, x_max, y_max]);
    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        buf = buf.push(end - 1);
    }
    buf = buf.push(0u16); // instructionLength

    let mut flags = Vec::with_capacity(points.len());
    let mut x_data = BeBuffer::new();
    let mut y_data = BeBuffer::new();
    let mut last = (0i16, 0i16);
    for &(x, y, on_curve) in &points {
        let (x_flag, x_bytes) = encode_delta(x - last.0, X_SHORT_VECTOR, X_IS_SAME_OR_POSITIVE);
        let (y_flag, y_bytes) = encode_delta(y - last.1, Y_SHORT_VECTOR, Y_IS_SAME_OR_POSITIVE);
        flags.push(x_flag | y_flag | on_curve as u8);
        x_data = x_data.extend_bytes(&x_bytes);
        y_data = y_data.extend_bytes(&y_bytes);
        last = (x, y);
    }
    buf.extend(flags)
        .extend_bytes(&x_data)
        .extend_bytes(&y_data)
}

fn encode_delta(delta: i16, short: u8, same_or_positive: u8) -> (u8, Vec<u8>) {
    match delta {
        0 => (same_or_positive, Vec::new()),
        1..=255 => (short | same_or_positive, vec![delta as u8]),
        -255..=-1 => (short, vec![(-delta) as u8]),
        _ => (0, delta.to_be_bytes().to_vec()),
    }
}

/// The transform of a composite component.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Transform {
    #[default]
    None,
    Scale(f32),
    XyScale(f32, f32),
    /// `[xx, yx, xy, yy]`, in file order.
    TwoByTwo([f32; 4]),
}

/// A component of a composite glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Component {
    pub glyph: u16,
    /// Flags other than those describing the argument size, the transform
    /// and `MORE_COMPONENTS`, which are derived from the other fields.
    pub flags: u16,
    pub args: (i16, i16),
    pub transform: Transform,
}

impl Component {
    /// A component translated by `(dx, dy)`.
    pub fn offset(glyph: u16, dx: i16, dy: i16) -> Self {
        Component {
            glyph,
            flags: ARGS_ARE_XY_VALUES,
            args: (dx, dy),
            transform: Transform::None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }
}

/// Encode a composite glyph with the given header bounding box.
pub fn composite_glyph(bbox: [i16; 4], components: &[Component]) -> BeBuffer {
    let mut buf = BeBuffer::new().push(-1i16).extend(bbox);
    for (i, component) in components.iter().enumerate() {
        let (a, b) = component.args;
        let words = i8::try_from(a).is_err() || i8::try_from(b).is_err();
        let mut flags = component.flags;
        if words {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        if i + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        flags |= match component.transform {
            Transform::None => 0,
            Transform::Scale(_) => WE_HAVE_A_SCALE,
            Transform::XyScale(..) => WE_HAVE_AN_X_AND_Y_SCALE,
            Transform::TwoByTwo(_) => WE_HAVE_A_TWO_BY_TWO,
        };
        buf = buf.push(flags).push(component.glyph);
        buf = if words {
            buf.extend([a, b])
        } else {
            buf.extend([a as i8, b as i8])
        };
        let values = match component.transform {
            Transform::None => vec![],
            Transform::Scale(s) => vec![s],
            Transform::XyScale(x, y) => vec![x, y],
            Transform::TwoByTwo(m) => m.to_vec(),
        };
        buf = buf.extend(values.into_iter().map(F2Dot14::from_f32));
    }
    buf
}

/// Concatenate glyphs into `glyf` data and the matching `loca` table.
///
/// Each glyph is padded to an even length so short offsets can address it.
pub fn glyf_and_loca(glyphs: &[&[u8]], long_loca: bool) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0u32];
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        if glyf.len() % 2 != 0 {
            glyf.push(0);
        }
        offsets.push(glyf.len() as u32);
    }
    let loca = if long_loca {
        BeBuffer::new().extend(offsets)
    } else {
        BeBuffer::new().extend(offsets.into_iter().map(|off| (off / 2) as u16))
    };
    (glyf, loca.into())
}
