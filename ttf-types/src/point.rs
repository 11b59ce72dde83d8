/// A point in font units, or in whatever coordinate type `T` a caller needs.
///
/// Composite placement works on `Point<i32>` so that offsets and transforms
/// applied to `i16` outline coordinates cannot overflow.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Convert both coordinates with `f`.
    #[inline(always)]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Point<U> {
        Point {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn widen_offset() {
        let offset: Point<i16> = Point::new(i16::MIN, 700);
        assert_eq!(offset.map(i32::from), Point::new(-32768i32, 700));
        assert_eq!(Point::new(-3i16, 4).map(|v| v as f32 * 0.5), Point::new(-1.5, 2.0));
    }
}
