//! TrueType style outline to path conversion.

use types::Pen;

use crate::tables::glyf::{CurvePoint, Glyph};

impl Glyph {
    /// Draw the outline, one closed subpath per contour.
    ///
    /// Consecutive off-curve points have an implied on-curve point at their
    /// midpoint. A contour that begins with an off-curve point starts at its
    /// last point if that is on-curve, and otherwise at the midpoint of the
    /// last and first points. This matches
    /// [`FT_Outline_Decompose`](https://freetype.org/freetype2/docs/reference/ft2-outline_processing.html#ft_outline_decompose).
    pub fn draw(&self, pen: &mut impl Pen) {
        for contour in self.contours() {
            contour_to_path(contour, pen);
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct ContourPoint {
    x: f32,
    y: f32,
}

impl ContourPoint {
    fn midpoint(&self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }
}

impl From<&CurvePoint> for ContourPoint {
    fn from(point: &CurvePoint) -> Self {
        Self {
            x: point.x as f32,
            y: point.y as f32,
        }
    }
}

fn contour_to_path(points: &[CurvePoint], pen: &mut impl Pen) {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return;
    };
    let (start, rest) = if first.on_curve {
        (ContourPoint::from(first), points.get(1..).unwrap_or_default())
    } else if last.on_curve {
        // start at the last point and skip it at the end
        (
            ContourPoint::from(last),
            points.get(..points.len() - 1).unwrap_or_default(),
        )
    } else {
        (ContourPoint::from(last).midpoint(first.into()), points)
    };
    pen.move_to(start.x, start.y);
    let mut state = PendingState::default();
    for point in rest {
        state.emit(point, pen);
    }
    state.finish(start, pen);
}

#[derive(Copy, Clone, Default)]
enum PendingState {
    /// No pending points.
    #[default]
    Empty,
    /// Pending off-curve quad point.
    PendingQuad(ContourPoint),
}

impl PendingState {
    #[inline(always)]
    fn emit(&mut self, point: &CurvePoint, pen: &mut impl Pen) {
        let p = ContourPoint::from(point);
        match *self {
            Self::Empty => {
                if point.on_curve {
                    pen.line_to(p.x, p.y);
                } else {
                    *self = Self::PendingQuad(p);
                }
            }
            Self::PendingQuad(c0) => {
                if point.on_curve {
                    pen.quad_to(c0.x, c0.y, p.x, p.y);
                    *self = Self::Empty;
                } else {
                    let mid = c0.midpoint(p);
                    pen.quad_to(c0.x, c0.y, mid.x, mid.y);
                    *self = Self::PendingQuad(p);
                }
            }
        }
    }

    fn finish(self, start: ContourPoint, pen: &mut impl Pen) {
        // end with an explicit on-curve at the start point
        if let Self::PendingQuad(c0) = self {
            pen.quad_to(c0.x, c0.y, start.x, start.y);
        }
        pen.close();
    }
}
