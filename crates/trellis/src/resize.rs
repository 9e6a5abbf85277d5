//! Interactive resize arithmetic.
//!
//! A gesture has three phases. [`ResizeSession::start`] snapshots the node's
//! geometry, [`ResizeSession::apply`] is called for every pointer move with
//! the *cumulative* delta since the gesture began, and
//! [`ResizeSession::end`] drops the snapshot. Because every `apply` starts
//! from the snapshot, replaying the same delta always yields the same
//! geometry.

use geom::{Edges, Expanse, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    id::WidgetId,
    layout::{HeightUnit, LayoutMode, WidthUnit},
    node::Node,
};

/// Floors and fallbacks for resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeLimits {
    /// Smallest width in pixels.
    pub min_width: i32,
    /// Smallest height in pixels.
    pub min_height: i32,
    /// Container width assumed when the caller reports none.
    pub fallback_container_width: i32,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            min_width: 50,
            min_height: 30,
            fallback_container_width: 1200,
        }
    }
}

impl ResizeLimits {
    /// The container width to convert percentages against.
    fn basis(&self, container_width: i32) -> i32 {
        if container_width > 0 {
            container_width
        } else {
            self.fallback_container_width.max(1)
        }
    }
}

/// Geometry snapshot taken when a resize gesture starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    /// Node being resized.
    id: WidgetId,
    /// Flow width at start.
    width: i32,
    /// Flow height at start.
    height: i32,
    /// Absolute rectangle at start.
    rect: Rect,
    /// Floors in effect.
    limits: ResizeLimits,
}

impl ResizeSession {
    /// Snapshot `node` with the default limits.
    pub fn start(node: &Node) -> Self {
        Self::with_limits(node, ResizeLimits::default())
    }

    /// Snapshot `node` with the given limits.
    pub fn with_limits(node: &Node, limits: ResizeLimits) -> Self {
        Self {
            id: node.id.clone(),
            width: node.layout.width,
            height: node.layout.height,
            rect: node.layout.rect(),
            limits,
        }
    }

    /// Id of the node being resized.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    /// Resize `node` by the cumulative delta `(dx, dy)` dragged on `edges`.
    /// `container_width` is the pixel width of the parent content box; zero
    /// or less selects the fallback.
    pub fn apply(&self, node: &mut Node, edges: Edges, dx: i32, dy: i32, container_width: i32) {
        match node.layout.mode {
            LayoutMode::Absolute => {
                let min = Expanse::new(self.limits.min_width, self.limits.min_height);
                let r = self.rect.resize(edges, Point::new(dx, dy), min);
                node.layout.set_rect(r);
            }
            LayoutMode::Flow | LayoutMode::Flex => {
                self.apply_flow(node, edges, dx, dy, container_width);
            }
        }
    }

    /// Like [`Self::apply`], with the direction given by name: a compass code
    /// or one of `horizontal`, `vertical` and `both`.
    pub fn apply_named(
        &self,
        node: &mut Node,
        direction: &str,
        dx: i32,
        dy: i32,
        container_width: i32,
    ) -> Result<()> {
        let edges: Edges = direction.parse()?;
        self.apply(node, edges, dx, dy, container_width);
        Ok(())
    }

    /// Flow geometry: percent or pixel width, pixel height only when pinned.
    fn apply_flow(&self, node: &mut Node, edges: Edges, dx: i32, dy: i32, container_width: i32) {
        let l = &mut node.layout;
        if edges.horizontal() {
            let dx = dx.saturating_mul(edges.x_sign());
            l.width = match l.width_unit {
                WidthUnit::Percent => {
                    let basis = f64::from(self.limits.basis(container_width));
                    let delta = (f64::from(dx) / basis * 100.0).round() as i32;
                    let floor = (f64::from(self.limits.min_width) / basis * 100.0).ceil() as i32;
                    self.width
                        .saturating_add(delta)
                        .clamp(floor.clamp(1, 100), 100)
                }
                WidthUnit::Px => self.width.saturating_add(dx).max(self.limits.min_width),
            };
        }
        if edges.vertical() && l.height_unit == HeightUnit::Px {
            l.height = self
                .height
                .saturating_add(dy.saturating_mul(edges.y_sign()))
                .max(self.limits.min_height);
        }
    }

    /// Finish the gesture.
    pub fn end(self) -> WidgetId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::input::Textbox;

    #[test]
    fn basis_fallback() {
        let l = ResizeLimits::default();
        assert_eq!(l.basis(0), 1200);
        assert_eq!(l.basis(-5), 1200);
        assert_eq!(l.basis(600), 600);
    }

    #[test]
    fn pixel_width_floor() {
        let mut n = Node::new(Textbox::default());
        n.layout.width = 120;
        n.layout.width_unit = WidthUnit::Px;
        let s = ResizeSession::start(&n);
        s.apply(&mut n, Edges::E, -500, 0, 800);
        assert_eq!(n.layout.width, 50);
        s.apply(&mut n, Edges::W, -30, 0, 800);
        assert_eq!(n.layout.width, 150);
    }

    #[test]
    fn auto_height_untouched() {
        let mut n = Node::new(Textbox::default());
        let s = ResizeSession::start(&n);
        s.apply(&mut n, Edges::S, 0, 80, 800);
        assert_eq!(n.layout.height, 40);
        n.layout.height_unit = HeightUnit::Px;
        s.apply(&mut n, Edges::S, 0, 80, 800);
        assert_eq!(n.layout.height, 120);
        s.apply(&mut n, Edges::N, 0, 80, 800);
        assert_eq!(n.layout.height, 30);
    }
}
