#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis::{Designer, Form, Node, Registry, WidgetId, widgets::input::Textbox};

    /// A designer over a form holding one labelled text box.
    fn designer() -> (Designer, String) {
        let mut f = Form::new();
        let id = f
            .insert(None, 0, Node::new(Textbox::default()).with_label("Name"))
            .unwrap();
        (Designer::new(f), id.to_string())
    }

    fn width(d: &Designer, id: &str) -> i32 {
        d.form.find(id).unwrap().layout.width
    }

    #[test]
    fn resize_undo_redo() {
        let r = Registry::builtin();
        let (mut d, id) = designer();
        assert!(!d.can_undo());
        assert!(!d.undo(&r).unwrap());

        d.on_resize_start(&id).unwrap();
        d.on_resize("e", 100, 0, 1000).unwrap();
        assert!(d.on_resize_end().is_some());
        assert_eq!(width(&d, &id), 58);
        assert!(d.can_undo());

        assert!(d.undo(&r).unwrap());
        assert_eq!(width(&d, &id), 48);
        assert_eq!(d.selected().map(WidgetId::as_str), Some(id.as_str()));
        assert!(d.can_redo());

        assert!(d.redo(&r).unwrap());
        assert_eq!(width(&d, &id), 58);
        assert!(!d.can_redo());
        assert!(d.undo(&r).unwrap());
        assert_eq!(width(&d, &id), 48);
    }

    #[test]
    fn new_snapshot_clears_redo() {
        let r = Registry::builtin();
        let (mut d, id) = designer();
        d.form.find_mut(&id).unwrap().layout.width = 70;
        assert!(d.save_snapshot());
        assert!(!d.save_snapshot());
        assert!(d.undo(&r).unwrap());
        assert!(d.can_redo());

        d.form.find_mut(&id).unwrap().label = "Renamed".into();
        assert!(d.save_snapshot());
        assert!(!d.can_redo());
        assert!(!d.redo(&r).unwrap());

        assert!(d.undo(&r).unwrap());
        assert_eq!(d.form.find(&id).unwrap().label, "Name");
        assert_eq!(width(&d, &id), 48);
        assert!(!d.can_undo());
    }

    #[test]
    fn history_is_capped() {
        let r = Registry::builtin();
        let (d, id) = designer();
        let mut d = d.with_history_limit(3);
        for w in [10, 20, 30, 40, 50] {
            d.form.find_mut(&id).unwrap().layout.width = w;
            assert!(d.save_snapshot());
        }
        let mut seen = Vec::new();
        while d.undo(&r).unwrap() {
            seen.push(width(&d, &id));
        }
        assert_eq!(seen, [40, 30]);
    }

    #[test]
    fn default_cap_is_one_hundred() {
        let r = Registry::builtin();
        let (mut d, id) = designer();
        for w in 1..=150 {
            d.form.find_mut(&id).unwrap().layout.width = w;
            assert!(d.save_snapshot());
        }
        let mut undone = 0;
        while d.undo(&r).unwrap() {
            undone += 1;
        }
        assert_eq!(undone, 99);
        assert_eq!(width(&d, &id), 51);

        d.reset_history();
        assert!(!d.can_undo());
        assert!(!d.can_redo());
    }

    #[test]
    fn undo_drops_vanished_selection() {
        let r = Registry::builtin();
        let (mut d, _) = designer();
        let extra = d
            .form
            .insert(None, 1, Node::new(Textbox::default()))
            .unwrap();
        assert!(d.save_snapshot());
        d.select(extra.as_str()).unwrap();
        assert!(d.undo(&r).unwrap());
        assert!(d.selected().is_none());
        assert_eq!(d.form.len(), 1);
    }
}
