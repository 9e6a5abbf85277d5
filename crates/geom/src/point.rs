use std::ops::{Add, Sub};

/// A point in signed pixel coordinates, relative to a parent's content origin.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl Point {
    /// Construct a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return the origin point.
    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Return true when both coordinates are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.saturating_sub(other.x),
            y: self.y.saturating_sub(other.y),
        }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from(v: (i32, i32)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let p = Point::new(10, -4);
        assert_eq!(p + Point::new(1, 1), Point::new(11, -3));
        assert_eq!(p - Point::new(10, -4), Point::zero());
        assert!((p - p).is_zero());
    }

    #[test]
    fn saturates() {
        let p = Point::new(i32::MAX, i32::MIN);
        assert_eq!(p + Point::new(1, 0), Point::new(i32::MAX, i32::MIN));
        assert_eq!(p - Point::new(0, 1), Point::new(i32::MAX, i32::MIN));
    }
}
