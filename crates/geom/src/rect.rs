use super::{Edges, Expanse, Point};

/// A rectangle in pixel coordinates. Width and height are signed so that
/// intermediate resize arithmetic can overshoot before clamping.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.tl.x.saturating_add(self.w)
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.tl.y.saturating_add(self.h)
    }

    /// The bottom-right corner.
    pub fn br(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Does this rect contain the point? The right and bottom edges are
    /// exclusive.
    pub fn contains_point(&self, p: impl Into<Point>) -> bool {
        let p = p.into();
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Resize by dragging `edges` by `delta`, never shrinking below `min`.
    ///
    /// Edges that are not dragged stay fixed: when the west edge moves, the
    /// origin shifts so that the right edge keeps its position, and likewise
    /// for the north edge and the bottom.
    pub fn resize(&self, edges: Edges, delta: Point, min: Expanse) -> Self {
        let mut r = *self;
        if edges.horizontal() {
            r.w = self
                .w
                .saturating_add(delta.x.saturating_mul(edges.x_sign()))
                .max(min.w);
            if edges.west {
                r.tl.x = self.right().saturating_sub(r.w);
            }
        }
        if edges.vertical() {
            r.h = self
                .h
                .saturating_add(delta.y.saturating_mul(edges.y_sign()))
                .max(min.h);
            if edges.north {
                r.tl.y = self.bottom().saturating_sub(r.h);
            }
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const FLOOR: Expanse = Expanse { w: 50, h: 30 };

    #[test]
    fn resize_from_northwest_anchors_bottom_right() {
        let r = Rect::new(100, 100, 200, 100);
        let out = r.resize(Edges::NW, Point::new(-20, -20), FLOOR);
        assert_eq!(out, Rect::new(80, 80, 220, 120));
        assert_eq!(out.br(), r.br());
    }

    #[test]
    fn resize_from_southeast_keeps_origin() {
        let r = Rect::new(10, 10, 200, 100);
        let out = r.resize(Edges::SE, Point::new(30, -10), FLOOR);
        assert_eq!(out, Rect::new(10, 10, 230, 90));
    }

    #[test]
    fn resize_clamps_to_floor() {
        let r = Rect::new(0, 0, 200, 100);
        let out = r.resize(Edges::E, Point::new(-1000, 0), FLOOR);
        assert_eq!(out.w, 50);
        let out = r.resize(Edges::W, Point::new(1000, 0), FLOOR);
        assert_eq!(out.w, 50);
        assert_eq!(out.right(), r.right());
        let out = r.resize(Edges::N, Point::new(0, 1000), FLOOR);
        assert_eq!(out.h, 30);
        assert_eq!(out.bottom(), r.bottom());
    }

    #[test]
    fn resize_ignores_untouched_axis() {
        let r = Rect::new(5, 5, 200, 100);
        assert_eq!(r.resize(Edges::E, Point::new(0, 500), FLOOR), r);
        assert_eq!(r.resize(Edges::S, Point::new(500, 0), FLOOR), r);
    }

    #[test]
    fn contains() {
        let r = Rect::new(10, 10, 10, 10);
        assert!(r.contains_point((10, 10)));
        assert!(!r.contains_point((20, 10)));
        assert!(!r.contains_point((9, 15)));
    }

    proptest! {
        #[test]
        fn resize_keeps_opposite_edges(
            x in -500i32..500, y in -500i32..500,
            w in 50i32..800, h in 30i32..800,
            dx in -2000i32..2000, dy in -2000i32..2000,
            code in prop::sample::select(vec!["n", "s", "e", "w", "ne", "nw", "se", "sw"]),
        ) {
            let edges: Edges = code.parse().unwrap();
            let r = Rect::new(x, y, w, h);
            let out = r.resize(edges, Point::new(dx, dy), FLOOR);
            prop_assert!(out.w >= FLOOR.w);
            prop_assert!(out.h >= FLOOR.h);
            if edges.west {
                prop_assert_eq!(out.right(), r.right());
            } else {
                prop_assert_eq!(out.tl.x, r.tl.x);
            }
            if edges.north {
                prop_assert_eq!(out.bottom(), r.bottom());
            } else {
                prop_assert_eq!(out.tl.y, r.tl.y);
            }
        }
    }
}
