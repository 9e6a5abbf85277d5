//! Widget nodes: identity, common fields and the boxed kind behaviour.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{
    error::{Error, Result},
    fields::{FieldSet, normalize_key},
    id::WidgetId,
    layout::LayoutOptions,
    property::PropertyMeta,
    widget::Widget,
};

/// A preserved attribute that no field of the node claims, typed by its
/// JSON kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtValue {
    /// A boolean.
    Bool(bool),
    /// A number, kept at full precision.
    Number(Number),
    /// A string.
    String(String),
    /// Anything else: null, arrays and objects.
    Raw(Value),
}

impl From<Value> for ExtValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            v => Self::Raw(v),
        }
    }
}

impl From<&ExtValue> for Value {
    fn from(v: &ExtValue) -> Self {
        match v {
            ExtValue::Bool(b) => Self::Bool(*b),
            ExtValue::Number(n) => Self::Number(n.clone()),
            ExtValue::String(s) => Self::String(s.clone()),
            ExtValue::Raw(v) => v.clone(),
        }
    }
}

impl ExtValue {
    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// The extension bag: preserved attributes in document order.
pub type Extensions = IndexMap<String, ExtValue>;

/// One node of a form tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Tree-unique identifier.
    pub id: WidgetId,
    /// Document-unique human reference such as `textbox1`.
    pub code: Option<String>,
    /// Display label.
    pub label: String,
    /// Placement inside the parent.
    pub layout: LayoutOptions,
    /// Hidden nodes render nothing at runtime.
    pub visible: bool,
    /// Key of the bound record value.
    pub data_field: Option<String>,
    /// Ordered children. Always empty for leaf kinds.
    pub children: Vec<Self>,
    /// Attributes preserved from the document that no field claims.
    pub ext: Extensions,
    /// Type tag of an unrecognized kind this node stands in for. Written
    /// back as the node's type.
    pub original_type: Option<String>,
    /// Kind behaviour and kind-specific fields.
    widget: Box<dyn Widget>,
}

impl Node {
    /// A node with a fresh id, the kind's initial geometry and no label.
    pub fn new(widget: impl Into<Box<dyn Widget>>) -> Self {
        let widget = widget.into();
        let mut layout = LayoutOptions::default();
        widget.initial_layout(&mut layout);
        Self {
            id: WidgetId::new(),
            code: None,
            label: String::new(),
            layout,
            visible: true,
            data_field: None,
            children: Vec::new(),
            ext: Extensions::new(),
            original_type: None,
            widget,
        }
    }

    /// Builder: set the id.
    pub fn with_id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder: set the label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.into();
        self
    }

    /// Builder: set the code.
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builder: set the bound data field.
    pub fn with_data_field(mut self, field: &str) -> Self {
        self.data_field = Some(field.into());
        self
    }

    /// Builder: append a child. Leaf kinds ignore children.
    pub fn with_child(mut self, child: Self) -> Self {
        if self.is_container() {
            self.children.push(child);
        }
        self
    }

    /// Canonical type tag.
    pub fn kind(&self) -> &'static str {
        self.widget.kind()
    }

    /// The kind behaviour.
    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    /// Mutable kind behaviour.
    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        self.widget.as_mut()
    }

    /// The concrete kind, if it is `W`.
    pub fn downcast_ref<W: Widget + 'static>(&self) -> Option<&W> {
        self.widget.as_any().downcast_ref::<W>()
    }

    /// The concrete kind mutably, if it is `W`.
    pub fn downcast_mut<W: Widget + 'static>(&mut self) -> Option<&mut W> {
        self.widget.as_any_mut().downcast_mut::<W>()
    }

    /// Can this node hold children?
    pub fn is_container(&self) -> bool {
        self.widget.is_container()
    }

    /// Upper bound for the flow width.
    pub fn max_width(&self) -> Option<i32> {
        self.layout.max_width()
    }

    /// Minimum height in the designer.
    pub fn design_min_height(&self) -> i32 {
        self.widget.design_min_height()
    }

    /// Key used for value binding: the data field, or the id when unbound.
    pub fn binding_key(&self) -> &str {
        match &self.data_field {
            Some(f) if !f.trim().is_empty() => f,
            _ => self.id.as_str(),
        }
    }

    /// Property descriptors for an editor.
    pub fn properties(&self) -> Vec<PropertyMeta> {
        self.widget.properties(self)
    }

    /// May the named property be edited on this node?
    pub fn can_edit_property(&self, name: &str) -> bool {
        let head = name.split('.').next().unwrap_or(name);
        self.widget.can_edit_property(&normalize_key(head))
    }

    /// Read a property by dotted path. Node fields come first, then layout,
    /// then kind fields, then the extension bag.
    pub fn property(&self, path: &str) -> Option<Value> {
        let (head, rest) = split_path(path);
        match head.as_str() {
            "id" => Some(Value::String(self.id.to_string())),
            "type" => Some(Value::String(self.kind().into())),
            "label" => Some(Value::String(self.label.clone())),
            "code" => Some(self.code.clone().map_or(Value::Null, Value::String)),
            "visible" => Some(Value::Bool(self.visible)),
            "dataField" => Some(self.data_field.clone().map_or(Value::Null, Value::String)),
            "layout" => rest.and_then(|r| self.layout.field(r)),
            _ => self
                .layout
                .field(path)
                .or_else(|| self.widget.field(path))
                .or_else(|| self.ext.get(path).map(Value::from)),
        }
    }

    /// Edit a property by dotted path. Refuses paths the kind does not allow
    /// and values that do not fit. Percent widths are clamped to 1..=100.
    pub fn set_property(&mut self, path: &str, value: Value) -> Result<()> {
        let (head, rest) = split_path(path);
        if !self.widget.can_edit_property(&head) {
            return Err(Error::property(
                path,
                format!("not editable on {}", self.kind()),
            ));
        }
        let typed = |v: Value| -> Result<Option<String>> {
            serde_json::from_value(v).map_err(|e| Error::property(path, e.to_string()))
        };
        match head.as_str() {
            "id" | "type" | "children" => Err(Error::property(path, "read-only")),
            "label" => {
                self.label = typed(value)?.unwrap_or_default();
                Ok(())
            }
            "code" => {
                self.code = typed(value)?.filter(|c| !c.trim().is_empty());
                Ok(())
            }
            "dataField" => {
                self.data_field = typed(value)?.filter(|c| !c.trim().is_empty());
                Ok(())
            }
            "visible" => {
                self.visible = value
                    .as_bool()
                    .ok_or_else(|| Error::property(path, "expected a boolean"))?;
                Ok(())
            }
            "layout" => match rest {
                Some(r) => self.set_layout_field(r, value),
                None => Err(Error::property(path, "no such field")),
            },
            _ if self.layout.field(path).is_some() => self.set_layout_field(path, value),
            _ if self.widget.field(path).is_some() => self.widget.set_field(path, value),
            _ if self.ext.contains_key(path) => {
                self.ext.insert(path.to_string(), value.into());
                Ok(())
            }
            _ => Err(Error::property(path, "no such property")),
        }
    }

    /// Write a layout field, clamping percent widths.
    fn set_layout_field(&mut self, path: &str, value: Value) -> Result<()> {
        self.layout.set_field(path, value)?;
        if let Some(max) = self.layout.max_width() {
            self.layout.width = self.layout.width.clamp(1, max);
        }
        Ok(())
    }

    /// Visit this node and its descendants, depth first.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Self)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }

    /// Visit this node and its descendants mutably, depth first.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Self)) {
        f(self);
        for c in &mut self.children {
            c.walk_mut(f);
        }
    }

    /// Find a node in this subtree.
    pub fn find(&self, id: &str) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Find a node in this subtree mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Split a dotted path into its normalized head and the raw remainder.
fn split_path(path: &str) -> (String, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (normalize_key(head), Some(rest)),
        None => (normalize_key(path), None),
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind() == other.kind()
            && self.code == other.code
            && self.label == other.label
            && self.layout == other.layout
            && self.visible == other.visible
            && self.data_field == other.data_field
            && self.ext == other.ext
            && self.original_type == other.original_type
            && self.widget.fields() == other.widget.fields()
            && self.children == other.children
    }
}
