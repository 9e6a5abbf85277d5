use super::{Point, Rect};

/// An `Expanse` is a width and height with no location. Resize floors and
/// container extents are expressed as expanses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Expanse {
    /// Construct a new expanse.
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Return a `Rect` with the same dimensions, located at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// True if this expanse can completely enclose `other` in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }

    /// Component-wise maximum of two expanses.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(i32, i32)> for Expanse {
    fn from(v: (i32, i32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_and_max() {
        let a = Expanse::new(50, 30);
        let b = Expanse::new(20, 40);
        assert!(!a.contains(&b));
        assert_eq!(a.max(b), Expanse::new(50, 40));
        assert!(a.max(b).contains(&a));
        assert_eq!(a.rect(), Rect::new(0, 0, 50, 30));
    }
}
