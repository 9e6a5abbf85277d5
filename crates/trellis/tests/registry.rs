#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use trellis::{
        Category, Decoder, Error, Node, Registry, Widget, WidgetDefinition, WidgetKind, WidthUnit,
        codec, encode_form, registry,
        widgets::{
            container::Section,
            input::Textbox,
            tabs::{self, Tab, TabContainer},
        },
    };

    /// A star rating control registered from outside the crate.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Rating {
        stars: u8,
        allow_half: bool,
    }

    impl Default for Rating {
        fn default() -> Self {
            Self {
                stars: 5,
                allow_half: false,
            }
        }
    }

    impl WidgetKind for Rating {
        const TAG: &'static str = "rating";
        const ALIASES: &'static [&'static str] = &["stars"];
        const LABEL_KEY: &'static str = "LBL_RATING";
        const ICON: &'static str = "star";
        const CATEGORY: Category = Category::Basic;
    }

    impl Widget for Rating {
        fn kind(&self) -> &'static str {
            Self::TAG
        }

        fn binds_value(&self) -> bool {
            true
        }
    }

    #[test]
    fn lookup_ignores_case_and_aliases() {
        let r = Registry::builtin();
        assert_eq!(r.lookup("TextBox").unwrap().tag, "textbox");
        assert_eq!(r.lookup(" tabcontainer ").unwrap().tag, TabContainer::TAG);
        assert_eq!(r.lookup("Block").unwrap().tag, Section::TAG);
        assert!(r.contains("orgtree"));
        match r.lookup("sparkline") {
            Err(Error::UnknownType { tag, known }) => {
                assert_eq!(tag, "sparkline");
                assert_eq!(known.len(), r.definitions().len());
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn palettes() {
        let r = Registry::builtin();
        let tags = |defs: Vec<&WidgetDefinition>| -> Vec<String> {
            defs.into_iter().map(|d| d.tag.clone()).collect()
        };
        let basic = tags(r.basic_widgets());
        assert_eq!(basic[0], "textbox");
        assert!(basic.contains(&"label".to_string()));
        let layout = tags(r.layout_widgets());
        assert!(layout.contains(&"tabbox".to_string()));
        assert!(!layout.contains(&Tab::TAG.to_string()));
        assert_eq!(
            tags(r.data_widgets()),
            ["datagrid", "orgtree", "permtree", "userrole"]
        );
    }

    #[test]
    fn first_registration_wins() {
        let mut r = Registry::builtin();
        let before = r.definitions().len();
        let mut dup = WidgetDefinition::of::<Rating>();
        dup.tag = "TEXTBOX".into();
        assert!(!r.register(dup));
        assert_eq!(r.definitions().len(), before);
        assert_eq!(r.lookup("textbox").unwrap().icon, "edit");
    }

    #[test]
    fn create_applies_palette_defaults() {
        let r = Registry::builtin();
        let n = r.create("textbox", None).unwrap();
        assert_eq!(n.label, "LBL_TEXTBOX");
        assert_eq!((n.layout.width, n.layout.width_unit), (48, WidthUnit::Percent));
        assert!(n.visible);
        assert!(n.code.is_none());

        let s = r.create("section", Some("Contact")).unwrap();
        assert_eq!(s.label, "Contact");
        assert_eq!(s.layout.width, 48);
        assert_eq!(s.layout.height, 200);

        let tc = r.create("tabcontainer", None).unwrap();
        assert_eq!(tc.kind(), TabContainer::TAG);
        let labels: Vec<&str> = tabs::tabs(&tc).map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Tab 1", "Tab 2"]);
        assert_eq!(tabs::active_tab(&tc).map(|t| t.label.as_str()), Some("Tab 1"));

        assert_ne!(r.create("label", None).unwrap().id, r.create("label", None).unwrap().id);
        assert!(matches!(r.create("nope", None), Err(Error::UnknownType { .. })));
    }

    #[test]
    fn custom_kind_decodes_and_round_trips() {
        let mut r = Registry::builtin();
        assert!(r.register_kind::<Rating>());
        assert!(!r.register_kind::<Rating>());

        let form = Decoder::new(&r)
            .decode_form(json!([{"id": "r1", "type": "Stars", "stars": 3, "dataField": "score"}]))
            .unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.kind(), "rating");
        assert_eq!(n.downcast_ref::<Rating>().map(|w| w.stars), Some(3));
        assert!(n.can_edit_property("dataField"));

        let out = encode_form(&form);
        assert_eq!(out["widgets"][0]["type"], json!("rating"));
        assert_eq!(out["widgets"][0]["stars"], json!(3));
        assert!(out["widgets"][0].get("allowHalf").is_none());
        assert_eq!(Decoder::new(&r).decode_form(out["widgets"].clone()).unwrap(), form);
    }

    #[test]
    fn global_registry() {
        registry::register_global::<Rating>().unwrap();
        let n = registry::create("rating", Some("Score")).unwrap();
        assert_eq!(n.kind(), "rating");
        assert_eq!(n.label, "Score");
        let form = codec::from_str(r#"[{"type": "rating", "stars": 1}]"#).unwrap();
        assert_eq!(form.widgets[0].kind(), "rating");
        assert_eq!(registry::create("textbox", None).unwrap().kind(), Textbox::TAG);
    }

    #[test]
    fn node_properties() {
        let r = Registry::builtin();
        let mut s = r.create("section", None).unwrap();
        assert_eq!(s.property("layout.width"), Some(json!(48)));
        assert_eq!(s.property("containerLayout.gap"), Some(json!(8)));
        s.set_property("Width", json!(250)).unwrap();
        assert_eq!(s.layout.width, 100);
        s.set_property("containerLayout.gap", json!(16)).unwrap();
        assert_eq!(s.property("containerLayout.gap"), Some(json!(16)));
        assert!(s.set_property("id", json!("x")).is_err());
        assert!(s.set_property("nothing", json!(1)).is_err());
        assert!(s.set_property("collapsed", json!("yes")).is_err());

        let mut tab = Node::new(Tab::default());
        assert!(tab.set_property("width", json!(50)).is_err());
        tab.set_property("label", json!("Details")).unwrap();
        assert_eq!(tab.property("label"), Some(json!("Details")));
        assert!(!tab.properties().is_empty());
    }
}
