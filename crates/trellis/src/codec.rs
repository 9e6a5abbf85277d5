//! JSON documents to form trees and back.
//!
//! Every node object carries its kind in `type`. Decoding dispatches on it
//! through the registry: the kind's decoder claims its own fields, the
//! layout claims the geometry, and whatever is left is kept verbatim in the
//! node's extension bag so that it is written back unchanged. Keys are
//! accepted in PascalCase or camelCase and always written in camelCase.
//!
//! Writing is sparse: the identity and flow-size keys are always present,
//! everything else only when it differs from its default.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    fields::{FieldSet, Fields, normalize_key},
    layout::{LayoutOptions, WidthUnit},
    node::{ExtValue, Node},
    registry::{self, Registry, WidgetDefinition, WidgetKind},
    tree::Form,
    widgets::{input::Textbox, tabs},
};

/// How the decoder treats type tags it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown or missing tags decode as text boxes, remembering the tag.
    #[default]
    Tolerant,
    /// Unknown or missing tags are an error.
    Strict,
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Unknown tag policy.
    pub strictness: Strictness,
    /// Percent width of one column of the legacy twelve-column grid.
    pub legacy_column_percent: f64,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Tolerant,
            legacy_column_percent: 8.33,
        }
    }
}

/// Node-level entries pulled out of a node object.
#[derive(Default)]
struct Head {
    /// `id`.
    id: Option<String>,
    /// `type`.
    tag: Option<String>,
    /// `label`.
    label: Option<String>,
    /// `code`.
    code: Option<String>,
    /// `visible`.
    visible: Option<bool>,
    /// `dataField`.
    data_field: Option<String>,
    /// `children` and `tabs` arrays with their original keys.
    children: Vec<(String, Value)>,
    /// Legacy nested extension object.
    extended: Option<Value>,
}

/// A scalar as a string. Numbers are accepted for ids and codes.
fn scalar_string(key: &str, v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => {
            debug!(field = key, value = %other, "skipping malformed field");
            None
        }
    }
}

/// A boolean, also accepted as a string.
fn lenient_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// An integer, also accepted as a float or a numeric string.
fn lenient_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

/// The value under `key` (compared after normalization).
fn get_normalized<'a>(m: &'a Fields, key: &str) -> Option<&'a Value> {
    m.iter().find(|(k, _)| normalize_key(k) == key).map(|(_, v)| v)
}

/// Split a node object into node-level entries and everything else.
fn split_head(map: Fields) -> (Head, Fields) {
    let mut head = Head::default();
    let mut rest = Fields::new();
    for (key, v) in map {
        match normalize_key(&key).as_str() {
            "id" => head.id = scalar_string("id", v),
            "type" => head.tag = scalar_string("type", v),
            "label" => head.label = scalar_string("label", v),
            "code" => head.code = scalar_string("code", v),
            "dataField" => head.data_field = scalar_string("dataField", v),
            "visible" => {
                head.visible = lenient_bool(&v);
                if head.visible.is_none() {
                    debug!(value = %v, "skipping malformed visible flag");
                }
            }
            "order" => {}
            "children" | "tabs" => head.children.push((key, v)),
            "extendedProperties" => head.extended = Some(v),
            _ => {
                rest.insert(key, v);
            }
        }
    }
    (head, rest)
}

/// A decoder bound to a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    /// Kind lookup.
    registry: &'r Registry,
    /// Settings.
    options: CodecOptions,
}

impl<'r> Decoder<'r> {
    /// A tolerant decoder over `registry`.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: CodecOptions::default(),
        }
    }

    /// Builder: replace the settings.
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder: set the unknown tag policy.
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.options.strictness = strictness;
        self
    }

    /// The definition for `tag`, applying the unknown tag policy. The second
    /// element is the tag to remember when falling back.
    fn definition(&self, tag: Option<&str>) -> Result<(&'r WidgetDefinition, Option<String>)> {
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());
        if let Some(def) = tag.and_then(|t| self.registry.resolve(t)) {
            return Ok((def, None));
        }
        let tag = tag.unwrap_or_default();
        if self.options.strictness == Strictness::Strict {
            return Err(self.registry.unknown(tag));
        }
        let fallback = self
            .registry
            .resolve(Textbox::TAG)
            .ok_or_else(|| self.registry.unknown(tag))?;
        if tag.is_empty() {
            warn!("widget without a type, decoding as {}", Textbox::TAG);
            Ok((fallback, None))
        } else {
            warn!(tag, "unknown widget type, decoding as {}", Textbox::TAG);
            Ok((fallback, Some(tag.to_string())))
        }
    }

    /// Legacy column width: `w` of 1 to 12 with no `width` and no absolute
    /// layout means a share of a twelve-column grid.
    fn legacy_columns(&self, rest: &mut Fields) -> Option<i32> {
        if get_normalized(rest, "width").is_some() {
            return None;
        }
        let absolute = get_normalized(rest, "layoutMode")
            .and_then(Value::as_str)
            .is_some_and(|m| m.eq_ignore_ascii_case("absolute"));
        if absolute {
            return None;
        }
        let cols = get_normalized(rest, "w")
            .and_then(lenient_int)
            .filter(|c| (1..=12).contains(c))?;
        rest.retain(|k, _| normalize_key(k) != "w");
        Some((cols as f64 * self.options.legacy_column_percent).round() as i32)
    }

    /// Decode one node object and its subtree.
    pub fn decode_node(&self, value: Value) -> Result<Node> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::Decode(format!("expected a widget object, found {other}")));
            }
        };
        let (head, mut rest) = split_head(map);
        let (def, original) = self.definition(head.tag.as_deref())?;

        let legacy = self.legacy_columns(&mut rest);
        let has_width = get_normalized(&rest, "width").and_then(lenient_int).is_some();
        let has_unit = get_normalized(&rest, "widthUnit").is_some();

        let (widget, rest) = (def.decode)(rest);
        let mut node = Node::new(widget);
        let rest = node.layout.merge_fields(rest);
        if let Some(pct) = legacy {
            node.layout.width = pct;
            if !has_unit {
                node.layout.width_unit = WidthUnit::Percent;
            }
        } else if has_width && !has_unit {
            node.layout.width_unit = WidthUnit::Px;
        }

        match head.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => node.id = id.into(),
            None => debug!(id = %node.id, "widget without an id, generated one"),
        }
        node.label = head.label.unwrap_or_default();
        node.code = head.code.filter(|c| !c.trim().is_empty());
        node.visible = head.visible.unwrap_or(true);
        node.data_field = head.data_field.filter(|f| !f.trim().is_empty());

        for (k, v) in rest {
            node.ext.insert(k, v.into());
        }
        if let Some(extended) = head.extended {
            match extended {
                Value::Object(m) => {
                    for (k, v) in m {
                        node.ext.entry(k).or_insert_with(|| ExtValue::from(v));
                    }
                }
                Value::Null => {}
                other => debug!(value = %other, "skipping malformed extendedProperties"),
            }
        }
        node.original_type = original;

        self.decode_children(&mut node, head.children)?;
        if node.kind() == tabs::TabContainer::TAG {
            fix_tabs(&mut node);
        }
        Ok(node)
    }

    /// Decode child arrays into `node`. Leaves keep them verbatim in the
    /// extension bag; so do `tabs` arrays of anything but a tab container.
    fn decode_children(&self, node: &mut Node, children: Vec<(String, Value)>) -> Result<()> {
        for (key, v) in children {
            let is_tabs = normalize_key(&key) == "tabs";
            if !node.is_container() || (is_tabs && node.kind() != tabs::TabContainer::TAG) {
                debug!(id = %node.id, key = %key, "keeping children of a non-container verbatim");
                node.ext.insert(key, v.into());
                continue;
            }
            let Value::Array(items) = v else {
                if !v.is_null() {
                    debug!(id = %node.id, key = %key, "skipping malformed children");
                }
                continue;
            };
            for item in items {
                match self.decode_node(item) {
                    Ok(child) => node.children.push(child),
                    Err(e) if self.options.strictness == Strictness::Strict => return Err(e),
                    Err(e) => warn!(parent = %node.id, error = %e, "skipping undecodable child"),
                }
            }
        }
        Ok(())
    }

    /// Decode a document: an array of nodes, an object with a `widgets`
    /// array, or the legacy object layout holding an `items` map and
    /// `item_*` entries ordered by their `order` key.
    pub fn decode_form(&self, value: Value) -> Result<Form> {
        let nodes = match value {
            Value::Array(items) => items,
            Value::Object(m) => {
                if matches!(get_normalized(&m, "widgets"), Some(Value::Array(_))) {
                    m.into_iter()
                        .find(|(k, _)| normalize_key(k) == "widgets")
                        .and_then(|(_, v)| match v {
                            Value::Array(items) => Some(items),
                            _ => None,
                        })
                        .unwrap_or_default()
                } else {
                    legacy_items(m)
                }
            }
            other => {
                return Err(Error::Decode(format!("expected a form document, found {other}")));
            }
        };
        let mut form = Form::new();
        for item in nodes {
            match self.decode_node(item) {
                Ok(n) => form.widgets.push(n),
                Err(e) if self.options.strictness == Strictness::Strict => return Err(e),
                Err(e) => warn!(error = %e, "skipping undecodable widget"),
            }
        }
        Ok(form)
    }

    /// Parse and decode a JSON document.
    pub fn decode_str(&self, json: &str) -> Result<Form> {
        self.decode_form(serde_json::from_str(json)?)
    }
}

/// Nodes of the legacy object layout, ordered by `order`. A node without an
/// id takes its map key.
fn legacy_items(m: Fields) -> Vec<Value> {
    let mut entries = Vec::new();
    for (key, v) in m {
        match v {
            Value::Object(items) if normalize_key(&key) == "items" => entries.extend(items),
            Value::Object(_) if key.to_lowercase().starts_with("item_") => entries.push((key, v)),
            _ => debug!(key = %key, "ignoring legacy document entry"),
        }
    }
    let mut nodes: Vec<(i64, Value)> = entries
        .into_iter()
        .filter_map(|(key, v)| {
            let Value::Object(mut obj) = v else {
                debug!(key = %key, "ignoring legacy item that is not an object");
                return None;
            };
            let order = get_normalized(&obj, "order")
                .and_then(lenient_int)
                .unwrap_or(i64::MAX);
            if get_normalized(&obj, "id").is_none() {
                obj.insert("id".into(), Value::String(key));
            }
            Some((order, Value::Object(obj)))
        })
        .collect();
    nodes.sort_by_key(|(order, _)| *order);
    nodes.into_iter().map(|(_, v)| v).collect()
}

/// Enforce the tab container invariants: non-tab children move into the
/// first tab, and a container left without tabs is seeded.
fn fix_tabs(node: &mut Node) {
    let (tab_nodes, strays): (Vec<Node>, Vec<Node>) = node
        .children
        .drain(..)
        .partition(|c| c.kind() == tabs::Tab::TAG);
    node.children = tab_nodes;
    if node.children.is_empty() {
        tabs::seed_tabs(node);
    }
    if !strays.is_empty() {
        debug!(id = %node.id, count = strays.len(), "moving stray children into the first tab");
        if let Some(first) = node.children.first_mut() {
            first.children.extend(strays);
        }
    }
}

/// Encode one node and its subtree. `order` is the node's position among
/// its siblings.
pub fn encode_node(node: &Node, order: usize) -> Value {
    let mut m = Fields::new();
    let original = node
        .original_type
        .as_deref()
        .filter(|_| node.kind() == Textbox::TAG);
    m.insert("id".into(), node.id.to_string().into());
    m.insert("type".into(), original.unwrap_or(node.kind()).into());
    m.insert("label".into(), node.label.clone().into());
    m.insert("order".into(), order.into());
    m.insert("visible".into(), node.visible.into());

    let layout = node.layout.fields();
    for key in LayoutOptions::ALWAYS_EMITTED {
        if let Some(v) = layout.get(key) {
            m.insert(key.into(), v.clone());
        }
    }
    if let Some(c) = &node.code {
        m.insert("code".into(), c.clone().into());
    }
    if let Some(f) = &node.data_field {
        m.insert("dataField".into(), f.clone().into());
    }
    for (k, v) in node.layout.sparse_fields() {
        m.entry(k).or_insert(v);
    }
    for (k, v) in node.widget().sparse_fields() {
        m.entry(k).or_insert(v);
    }
    if node.is_container() {
        let children = node
            .children
            .iter()
            .enumerate()
            .map(|(i, c)| encode_node(c, i))
            .collect();
        m.insert("children".into(), Value::Array(children));
    }
    for (k, v) in &node.ext {
        let nk = normalize_key(k);
        if !m.contains_key(k) && !m.contains_key(&nk) {
            m.insert(k.clone(), v.into());
        }
    }
    Value::Object(m)
}

/// Encode a form as `{"widgets": [...]}`.
pub fn encode_form(form: &Form) -> Value {
    let widgets = form
        .widgets
        .iter()
        .enumerate()
        .map(|(i, w)| encode_node(w, i))
        .collect();
    let mut m = Fields::new();
    m.insert("widgets".into(), Value::Array(widgets));
    Value::Object(m)
}

/// Encode a form as pretty-printed JSON.
pub fn to_string(form: &Form) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode_form(form))?)
}

/// Decode a document tolerantly through the process-wide registry.
pub fn from_str(json: &str) -> Result<Form> {
    let r = registry::global()
        .read()
        .map_err(|_| Error::Internal("widget registry lock poisoned".into()))?;
    Decoder::new(&r).decode_str(json)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn head_split_normalizes() {
        let m = json!({"Id": "a", "Type": "textbox", "DataField": "name", "Placeholder": "x"});
        let Value::Object(m) = m else { unreachable!() };
        let (head, rest) = split_head(m);
        assert_eq!(head.id.as_deref(), Some("a"));
        assert_eq!(head.tag.as_deref(), Some("textbox"));
        assert_eq!(head.data_field.as_deref(), Some("name"));
        assert_eq!(rest.len(), 1);
        assert!(rest.contains_key("Placeholder"));
    }

    #[test]
    fn lenient_scalars() {
        assert_eq!(lenient_int(&json!("6")), Some(6));
        assert_eq!(lenient_int(&json!(5.6)), Some(6));
        assert_eq!(lenient_bool(&json!("false")), Some(false));
        assert_eq!(lenient_bool(&json!(1)), None);
    }

    #[test]
    fn legacy_items_ordered() {
        let Value::Object(m) = json!({
            "items": {"b": {"type": "label", "order": 2}, "a": {"type": "label", "order": 1}},
            "item_c": {"type": "label", "order": 0},
            "title": "ignored",
        }) else {
            unreachable!()
        };
        let ids: Vec<_> = legacy_items(m)
            .iter()
            .map(|v| v["id"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(ids, ["item_c", "a", "b"]);
    }
}
