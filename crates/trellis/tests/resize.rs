#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use trellis::{
        Designer, EngineConfig, Error, Form, HeightUnit, LayoutMode, Node, ResizeLimits,
        ResizeSession, WidthUnit,
        geom::{Edges, Rect},
        widgets::input::Textbox,
    };

    fn absolute(x: i32, y: i32, w: i32, h: i32) -> Node {
        let mut n = Node::new(Textbox::default());
        n.layout.mode = LayoutMode::Absolute;
        n.layout.set_rect(Rect::new(x, y, w, h));
        n
    }

    #[test]
    fn absolute_corner_drag() {
        let mut n = absolute(100, 100, 200, 100);
        let s = ResizeSession::start(&n);
        s.apply(&mut n, Edges::NW, -20, -20, 0);
        assert_eq!(n.layout.rect(), Rect::new(80, 80, 220, 120));

        s.apply(&mut n, Edges::SE, 30, 10, 0);
        assert_eq!(n.layout.rect(), Rect::new(100, 100, 230, 110));
    }

    #[test]
    fn absolute_floor_keeps_far_edge() {
        let mut n = absolute(100, 100, 200, 100);
        let s = ResizeSession::start(&n);
        s.apply(&mut n, Edges::W, 400, 0, 0);
        assert_eq!(n.layout.rect(), Rect::new(250, 100, 50, 100));
        s.apply(&mut n, Edges::N, 0, 500, 0);
        assert_eq!(n.layout.rect(), Rect::new(100, 170, 200, 30));
    }

    #[test]
    fn percent_width() {
        let mut n = Node::new(Textbox::default());
        let s = ResizeSession::start(&n);
        s.apply(&mut n, Edges::E, 120, 0, 1000);
        assert_eq!(n.layout.width, 60);
        s.apply(&mut n, Edges::W, 120, 0, 1000);
        assert_eq!(n.layout.width, 36);
        s.apply(&mut n, Edges::E, 5000, 0, 1000);
        assert_eq!(n.layout.width, 100);
        s.apply(&mut n, Edges::E, -5000, 0, 1000);
        assert_eq!(n.layout.width, 5);
        s.apply(&mut n, Edges::E, 120, 0, 0);
        assert_eq!(n.layout.width, 58);
    }

    #[test]
    fn named_directions() {
        let mut n = Node::new(Textbox::default());
        n.layout.height_unit = HeightUnit::Px;
        let s = ResizeSession::start(&n);
        s.apply_named(&mut n, "both", 100, 20, 1000).unwrap();
        assert_eq!((n.layout.width, n.layout.height), (58, 60));
        s.apply_named(&mut n, "vertical", 100, 10, 1000).unwrap();
        assert_eq!((n.layout.width, n.layout.height), (58, 50));
        assert!(matches!(
            s.apply_named(&mut n, "sideways", 1, 1, 1000),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn designer_gesture() {
        let mut f = Form::new();
        let id = f.insert(None, 0, Node::new(Textbox::default())).unwrap();
        let mut d = Designer::new(f);
        assert!(matches!(d.on_resize("e", 10, 0, 1000), Err(Error::Invalid(_))));

        d.on_resize_start(id.as_str()).unwrap();
        assert!(d.resizing());
        assert_eq!(d.selected(), Some(&id));
        d.on_resize("e", 100, 0, 1000).unwrap();
        d.on_resize("e", 200, 0, 1000).unwrap();
        assert_eq!(d.form.find(id.as_str()).unwrap().layout.width, 68);
        assert_eq!(d.on_resize_end(), Some(id.clone()));
        assert!(!d.resizing());
        assert_eq!(d.on_resize_end(), None);

        d.on_resize("w", 100, 0, 1000).unwrap();
        assert_eq!(d.form.find(id.as_str()).unwrap().layout.width, 58);
        assert!(matches!(d.on_resize_start("nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn configured_limits() {
        let config: EngineConfig = narrow_floor();
        let mut f = Form::new();
        let mut n = Node::new(Textbox::default());
        n.layout.width = 300;
        n.layout.width_unit = WidthUnit::Px;
        let id = f.insert(None, 0, n).unwrap();
        let mut d = config.designer(f);
        d.on_resize_start(id.as_str()).unwrap();
        d.on_resize("e", -1000, 0, 0).unwrap();
        assert_eq!(d.form.find(id.as_str()).unwrap().layout.width, 120);
    }

    fn narrow_floor() -> EngineConfig {
        EngineConfig {
            resize: ResizeLimits {
                min_width: 120,
                ..ResizeLimits::default()
            },
            ..EngineConfig::default()
        }
    }

    fn edges() -> impl Strategy<Value = Edges> {
        prop::sample::select(vec![
            Edges::N,
            Edges::S,
            Edges::E,
            Edges::W,
            Edges::NE,
            Edges::NW,
            Edges::SE,
            Edges::SW,
        ])
    }

    proptest! {
        #[test]
        fn percent_width_stays_in_range(
            start in 1i32..=100,
            dx in -20_000i32..20_000,
            cw in -10i32..4000,
            e in edges(),
        ) {
            let mut n = Node::new(Textbox::default());
            n.layout.width = start;
            let s = ResizeSession::start(&n);
            s.apply(&mut n, e, dx, 0, cw);
            prop_assert!((1..=100).contains(&n.layout.width));
            prop_assert_eq!(n.layout.width_unit, WidthUnit::Percent);
        }

        #[test]
        fn replay_is_stable(
            x in -500i32..500,
            y in -500i32..500,
            w in 50i32..800,
            h in 30i32..600,
            first in (-1000i32..1000, -1000i32..1000),
            last in (-1000i32..1000, -1000i32..1000),
            e in edges(),
        ) {
            let mut a = absolute(x, y, w, h);
            let mut b = a.clone();
            let s = ResizeSession::start(&a);
            s.apply(&mut a, e, first.0, first.1, 800);
            s.apply(&mut a, e, last.0, last.1, 800);
            s.apply(&mut b, e, last.0, last.1, 800);
            prop_assert_eq!(a.layout.rect(), b.layout.rect());
            prop_assert!(a.layout.w >= 50 && a.layout.h >= 30);
        }
    }
}
