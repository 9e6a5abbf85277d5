#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use trellis::{
        CodecOptions, Decoder, Error, ExtValue, Form, HeightUnit, LayoutMode, Node, Registry,
        Strictness, WidgetKind, WidthUnit,
        codec,
        encode_form, encode_node,
        widgets::{container::Section, input::Textbox, tabs},
    };

    /// One freshly created node of every registered kind, inserted into a
    /// form so that each carries a code.
    fn every_kind(r: &Registry) -> Form {
        let mut form = Form::new();
        let tags: Vec<String> = r.tags().map(String::from).collect();
        for tag in tags {
            if tag == tabs::Tab::TAG {
                continue;
            }
            let node = r.create(&tag, None).unwrap();
            let n = form.widgets.len();
            form.insert(None, n, node).unwrap();
        }
        form
    }

    #[test]
    fn every_kind_round_trips() {
        let r = Registry::builtin();
        let form = every_kind(&r);
        assert!(form.validate().is_empty());
        let decoded = Decoder::new(&r)
            .strictness(Strictness::Strict)
            .decode_form(encode_form(&form))
            .unwrap();
        assert_eq!(decoded, form);
    }

    #[test]
    fn edited_nodes_round_trip() {
        let r = Registry::builtin();
        let mut form = Form::new();
        let section = form
            .insert(None, 0, r.create("section", Some("Contact")).unwrap())
            .unwrap();
        let mut tb = r.create("textbox", Some("Name")).unwrap().with_data_field("name");
        tb.set_property("placeholder", json!("Full name")).unwrap();
        tb.set_property("required", json!(true)).unwrap();
        tb.layout.mode = LayoutMode::Absolute;
        tb.layout.x = 12;
        tb.layout.height_unit = HeightUnit::Px;
        tb.visible = false;
        form.insert(Some(section.as_str()), 0, tb).unwrap();
        let mut num = r.create("number", None).unwrap();
        num.set_property("allowDecimal", json!(true)).unwrap();
        num.set_property("minValue", json!(-2.5)).unwrap();
        form.insert(Some(section.as_str()), 1, num).unwrap();

        let json = codec::to_string(&form).unwrap();
        let back = Decoder::new(&r).decode_str(&json).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn unclaimed_attributes_survive() {
        let r = Registry::builtin();
        let doc = json!([{
            "id": "t1",
            "type": "textbox",
            "label": "Name",
            "customFlag": true,
            "meta": {"source": "import", "rev": [1, 2]},
        }]);
        let form = Decoder::new(&r).decode_form(doc).unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.ext.get("customFlag"), Some(&ExtValue::Bool(true)));
        assert!(matches!(n.ext.get("meta"), Some(ExtValue::Raw(_))));

        let out = encode_node(n, 0);
        assert_eq!(out["customFlag"], json!(true));
        assert_eq!(out["meta"], json!({"source": "import", "rev": [1, 2]}));
    }

    #[test]
    fn sparse_output() {
        let node = Node::new(Textbox::default()).with_id("t1");
        let out = encode_node(&node, 3);
        let Value::Object(m) = out else {
            panic!("expected an object");
        };
        let keys: Vec<&str> = m.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "id",
                "type",
                "label",
                "order",
                "visible",
                "width",
                "widthUnit",
                "height",
                "heightUnit"
            ]
        );
        assert_eq!(m["order"], json!(3));
        assert_eq!(m["widthUnit"], json!("%"));
        assert_eq!(m["heightUnit"], json!("auto"));
    }

    #[test]
    fn legacy_column_width() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!([{"type": "textbox", "w": 6}]))
            .unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.layout.width, 50);
        assert_eq!(n.layout.width_unit, WidthUnit::Percent);
        assert!(!n.ext.contains_key("w"));

        let opts = CodecOptions {
            legacy_column_percent: 10.0,
            ..CodecOptions::default()
        };
        let form = Decoder::new(&r)
            .with_options(opts)
            .decode_form(json!([{"type": "textbox", "W": "3"}]))
            .unwrap();
        assert_eq!(form.widgets[0].layout.width, 30);
    }

    #[test]
    fn legacy_width_ignored() {
        let r = Registry::builtin();
        let d = Decoder::new(&r);
        let explicit = d
            .decode_form(json!([{"type": "textbox", "w": 6, "width": 320}]))
            .unwrap();
        let n = &explicit.widgets[0];
        assert_eq!(n.layout.width, 320);
        assert_eq!(n.layout.width_unit, WidthUnit::Px);

        let absolute = d
            .decode_form(json!([{"type": "textbox", "w": 6, "layoutMode": "absolute"}]))
            .unwrap();
        let n = &absolute.widgets[0];
        assert_eq!(n.layout.mode, LayoutMode::Absolute);
        assert_eq!(n.layout.w, 6);
        assert_eq!(n.layout.width, 48);

        let out_of_range = d.decode_form(json!([{"type": "textbox", "w": 20}])).unwrap();
        assert_eq!(out_of_range.widgets[0].layout.width, 48);
    }

    #[test]
    fn legacy_column_keeps_explicit_unit() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!([{"type": "textbox", "w": 6, "widthUnit": "px"}]))
            .unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.layout.width, 50);
        assert_eq!(n.layout.width_unit, WidthUnit::Px);
        assert!(!n.ext.contains_key("w"));
    }

    #[test]
    fn pascal_case_keys() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!({"Widgets": [{
                "Id": "s1",
                "Type": "Section",
                "Label": "Main",
                "Width": 100,
                "WidthUnit": "%",
                "Collapsible": true,
                "Children": [{"Id": "t1", "Type": "TextBox", "DataField": "name"}],
            }]}))
            .unwrap();
        let s = &form.widgets[0];
        assert_eq!(s.kind(), Section::TAG);
        assert_eq!(s.layout.width, 100);
        assert_eq!(s.property("collapsible"), Some(json!(true)));
        assert_eq!(s.children[0].data_field.as_deref(), Some("name"));
        assert!(s.ext.is_empty());

        let out = encode_form(&form);
        assert_eq!(out["widgets"][0]["collapsible"], json!(true));
        assert!(out["widgets"][0].get("Collapsible").is_none());
    }

    #[test]
    fn unknown_type_falls_back() {
        let r = Registry::builtin();
        let doc = json!([{"id": "x1", "type": "sparkline", "series": [1, 2, 3]}]);
        let form = Decoder::new(&r).decode_form(doc).unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.kind(), Textbox::TAG);
        assert_eq!(n.original_type.as_deref(), Some("sparkline"));
        assert!(!n.ext.contains_key("originalType"));

        let out = encode_node(n, 0);
        assert_eq!(out["type"], json!("sparkline"));
        assert!(out.get("originalType").is_none());
        assert_eq!(out["series"], json!([1, 2, 3]));

        let again = Decoder::new(&r).decode_form(json!([out])).unwrap();
        assert_eq!(again, form);
    }

    #[test]
    fn original_type_key_is_plain_attribute() {
        let r = Registry::builtin();
        let doc = json!([{"id": "a", "type": "textbox", "originalType": "legacyThing"}]);
        let form = Decoder::new(&r).decode_form(doc).unwrap();
        let n = &form.widgets[0];
        assert!(n.original_type.is_none());
        assert_eq!(
            n.ext.get("originalType").and_then(ExtValue::as_str),
            Some("legacyThing")
        );

        let out = encode_node(n, 0);
        assert_eq!(out["type"], json!("textbox"));
        assert_eq!(out["originalType"], json!("legacyThing"));

        let again = Decoder::new(&r)
            .strictness(Strictness::Strict)
            .decode_form(json!([out]))
            .unwrap();
        assert_eq!(again, form);
    }

    #[test]
    fn strict_rejects_unknown() {
        let r = Registry::builtin();
        let err = Decoder::new(&r)
            .strictness(Strictness::Strict)
            .decode_form(json!([{"type": "sparkline"}]))
            .unwrap_err();
        match err {
            Error::UnknownType { tag, known } => {
                assert_eq!(tag, "sparkline");
                assert!(known.iter().any(|k| k == "textbox"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(
            Decoder::new(&r)
                .strictness(Strictness::Strict)
                .decode_form(json!([{"id": "a"}]))
                .is_err()
        );
    }

    #[test]
    fn missing_type_is_textbox() {
        let r = Registry::builtin();
        let form = Decoder::new(&r).decode_form(json!([{"id": "a"}])).unwrap();
        assert_eq!(form.widgets[0].kind(), Textbox::TAG);
        assert!(form.widgets[0].ext.is_empty());
    }

    #[test]
    fn malformed_fields_skipped() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!([{
                "id": "n1",
                "type": "number",
                "width": "wide",
                "step": "lots",
                "allowDecimal": true,
                "visible": "false",
            }]))
            .unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.layout.width, 48);
        assert_eq!(n.property("step"), Some(json!(1.0)));
        assert_eq!(n.property("allowDecimal"), Some(json!(true)));
        assert!(!n.visible);
    }

    #[test]
    fn leaf_children_kept_verbatim() {
        let r = Registry::builtin();
        let kids = json!([{"type": "label"}]);
        let form = Decoder::new(&r)
            .decode_form(json!([{"id": "t", "type": "textbox", "children": kids}]))
            .unwrap();
        let n = &form.widgets[0];
        assert!(n.children.is_empty());
        assert_eq!(n.ext.get("children"), Some(&ExtValue::Raw(kids.clone())));
        assert_eq!(encode_node(n, 0)["children"], kids);
    }

    #[test]
    fn tab_container_repaired() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!([{
                "id": "tc",
                "type": "tabcontainer",
                "children": [
                    {"id": "stray", "type": "label"},
                    {"id": "t1", "type": "tab", "children": [{"id": "a", "type": "textbox"}]},
                ],
            }, {
                "id": "empty",
                "type": "tabbox",
            }]))
            .unwrap();
        let tc = &form.widgets[0];
        assert_eq!(tc.kind(), tabs::TabContainer::TAG);
        assert_eq!(tc.children.len(), 1);
        let ids: Vec<&str> = tc.children[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "stray"]);

        let empty = &form.widgets[1];
        assert_eq!(tabs::tabs(empty).count(), 2);
        assert!(tabs::active_tab(empty).is_some());
        assert!(form.validate().is_empty());
    }

    #[test]
    fn legacy_tabs_key() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!([{
                "id": "tc",
                "type": "tabbox",
                "activeTabId": "second",
                "tabs": [
                    {"id": "t1", "type": "tab", "tabId": "first", "label": "One"},
                    {"id": "t2", "type": "tab", "tabId": "second", "label": "Two"},
                ],
            }]))
            .unwrap();
        let active = form.active_tab("tc").unwrap();
        assert_eq!(active.id, "t2");
    }

    #[test]
    fn legacy_document_layout() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!({
                "items": {
                    "second": {"type": "label", "label": "B", "order": 2},
                    "first": {"type": "textbox", "label": "A", "order": 1},
                },
                "item_zero": {"type": "button", "order": 0},
            }))
            .unwrap();
        let ids: Vec<&str> = form.widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["item_zero", "first", "second"]);
        assert_eq!(form.widgets[1].label, "A");
    }

    #[test]
    fn extended_properties_flattened() {
        let r = Registry::builtin();
        let form = Decoder::new(&r)
            .decode_form(json!([{
                "id": "t",
                "type": "textbox",
                "hint": "outer",
                "extendedProperties": {"hint": "inner", "theme": "dark"},
            }]))
            .unwrap();
        let n = &form.widgets[0];
        assert_eq!(n.ext.get("hint"), Some(&ExtValue::String("outer".into())));
        assert_eq!(n.ext.get("theme"), Some(&ExtValue::String("dark".into())));
    }

    #[test]
    fn tolerant_skips_bad_children() {
        let r = Registry::builtin();
        let doc = json!([{"id": "s", "type": "section", "children": [7, {"id": "ok", "type": "label"}]}]);
        let form = Decoder::new(&r).decode_form(doc.clone()).unwrap();
        assert_eq!(form.widgets[0].children.len(), 1);
        assert!(
            Decoder::new(&r)
                .strictness(Strictness::Strict)
                .decode_form(doc)
                .is_err()
        );
    }

    #[test]
    fn rejects_non_documents() {
        let r = Registry::builtin();
        assert!(matches!(
            Decoder::new(&r).decode_form(json!("nope")),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            Decoder::new(&r).decode_str("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn global_decode() {
        let form = codec::from_str(r#"[{"id": "a", "type": "label", "label": "Hi"}]"#).unwrap();
        assert_eq!(form.widgets[0].label, "Hi");
    }
}
