//! Runtime data binding.
//!
//! Widgets never own record values. At runtime they read through a
//! [`ValueBinding`] and write back only through [`commit_input`].

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{Error, Result},
    node::Node,
    render::RenderMode,
    tree::Form,
};

/// Getter and setter over an externally owned record.
pub trait ValueBinding {
    /// The value bound to `key`.
    fn value(&self, key: &str) -> Option<Value>;
    /// Store a value for `key`.
    fn set_value(&mut self, key: &str, value: Value);
}

impl ValueBinding for Map<String, Value> {
    fn value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

/// Apply raw user input from an edit-mode control to the bound record.
///
/// Refused in browse mode, for read-only widgets and for kinds that bind no
/// value. Returns the stored value.
pub fn commit_input(
    node: &Node,
    mode: RenderMode,
    raw: &str,
    binding: &mut dyn ValueBinding,
) -> Result<Value> {
    if mode == RenderMode::Browse {
        return Err(Error::Invalid(format!("{}: browse mode is read-only", node.id)));
    }
    let widget = node.widget();
    if !widget.binds_value() {
        return Err(Error::Invalid(format!("{}: {} binds no value", node.id, node.kind())));
    }
    if widget.read_only() {
        return Err(Error::Invalid(format!("{}: widget is read-only", node.id)));
    }
    let value = widget.parse_input(raw)?;
    binding.set_value(node.binding_key(), value.clone());
    Ok(value)
}

/// One bound value to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPayload {
    /// The data field.
    pub key: String,
    /// Its current value.
    pub value: Value,
}

/// In-memory values for an edit session, keyed by data field.
#[derive(Debug, Clone, Default)]
pub struct EditValues {
    /// Values in first-seen order.
    values: IndexMap<String, Value>,
}

impl EditValues {
    /// An empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and load a value for every data-bound node in `form`. Fields the
    /// getter does not know start at the widget's `defaultValue`, if any.
    pub fn initialize_from(&mut self, form: &Form, getter: impl Fn(&str) -> Option<Value>) {
        self.values.clear();
        form.walk(&mut |n| {
            let Some(field) = n.data_field.as_deref().filter(|f| !f.trim().is_empty()) else {
                return;
            };
            let value = getter(field)
                .or_else(|| n.widget().field("defaultValue").filter(|v| !v.is_null()))
                .unwrap_or(Value::Null);
            self.values.insert(field.to_string(), value);
        });
        debug!(count = self.values.len(), "edit values initialized");
    }

    /// Payloads for every data-bound node whose field is in `allowed`, in
    /// tree order.
    pub fn collect_payloads(&self, form: &Form, allowed: &HashSet<String>) -> Vec<FieldPayload> {
        let mut out = Vec::new();
        form.walk(&mut |n| {
            if let Some(field) = n.data_field.as_deref().filter(|f| allowed.contains(*f)) {
                out.push(FieldPayload {
                    key: field.to_string(),
                    value: self.values.get(field).cloned().unwrap_or(Value::Null),
                });
            }
        });
        out
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl ValueBinding for EditValues {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        if key.trim().is_empty() {
            return;
        }
        self.values.insert(key.to_string(), value);
    }
}
