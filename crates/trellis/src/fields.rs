//! Serde-backed field access.
//!
//! Kind-specific widget state and layout records are plain serde structs.
//! [`FieldSet`] treats any such struct as an ordered map of camelCase fields,
//! which is what the document codec and the property editor work with.

use convert_case::{Case, Casing};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// An ordered JSON object.
pub type Fields = Map<String, Value>;

/// Normalize a document or property key to the camelCase form used by the
/// serde records: `DataField`, `data_field` and `dataField` all map to
/// `dataField`.
pub fn normalize_key(key: &str) -> String {
    key.to_case(Case::Camel)
}

/// Overlay `incoming` onto `current`. Objects merge key by key, with incoming
/// keys normalized; anything else replaces.
fn overlay(current: &mut Value, incoming: Value) {
    match (current, incoming) {
        (Value::Object(cur), Value::Object(inc)) => {
            for (k, v) in inc {
                let k = normalize_key(&k);
                match cur.get_mut(&k) {
                    Some(slot) => overlay(slot, v),
                    None => {
                        cur.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

/// Field-level access to a serde record.
pub trait FieldSet {
    /// Every field, in declaration order.
    fn fields(&self) -> Fields;

    /// The fields of the type's default value.
    fn default_fields(&self) -> Fields;

    /// Fields whose value differs from the type's default.
    fn sparse_fields(&self) -> Fields {
        let defaults = self.default_fields();
        self.fields()
            .into_iter()
            .filter(|(k, v)| defaults.get(k) != Some(v))
            .collect()
    }

    /// Merge document fields into this record, one field at a time. Keys are
    /// matched after normalization; a value that does not fit its field is
    /// skipped and the field keeps its current value. Returns the entries
    /// that do not name a field, with their original keys.
    fn merge_fields(&mut self, incoming: Fields) -> Fields;

    /// Read a field by dotted path, e.g. `containerLayout.gap`.
    fn field(&self, path: &str) -> Option<Value> {
        let mut cur = Value::Object(self.fields());
        for seg in path.split('.') {
            cur = cur.get(normalize_key(seg))?.clone();
        }
        Some(cur)
    }

    /// Write a field by dotted path. Fails if the path names no field or the
    /// value does not fit it.
    fn set_field(&mut self, path: &str, value: Value) -> Result<()>;
}

impl<T> FieldSet for T
where
    T: Serialize + DeserializeOwned + Default,
{
    fn fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(Value::Object(m)) => m,
            _ => Fields::new(),
        }
    }

    fn default_fields(&self) -> Fields {
        T::default().fields()
    }

    fn merge_fields(&mut self, incoming: Fields) -> Fields {
        let mut current = self.fields();
        let mut rest = Fields::new();
        for (key, value) in incoming {
            let norm = normalize_key(&key);
            let Some(prev) = current.get(&norm).cloned() else {
                rest.insert(key, value);
                continue;
            };
            let mut next = prev.clone();
            overlay(&mut next, value);
            current.insert(norm.clone(), next);
            if let Err(e) = serde_json::from_value::<T>(Value::Object(current.clone())) {
                debug!(field = %norm, error = %e, "skipping malformed field");
                current.insert(norm, prev);
            }
        }
        match serde_json::from_value::<T>(Value::Object(current)) {
            Ok(v) => *self = v,
            Err(e) => debug!(error = %e, "field merge rejected"),
        }
        rest
    }

    fn set_field(&mut self, path: &str, value: Value) -> Result<()> {
        let mut root = Value::Object(self.fields());
        let mut slot = &mut root;
        for seg in path.split('.') {
            slot = slot
                .get_mut(normalize_key(seg))
                .ok_or_else(|| Error::property(path, "no such field"))?;
        }
        *slot = value;
        let v = serde_json::from_value::<T>(root)
            .map_err(|e| Error::property(path, e.to_string()))?;
        *self = v;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Inner {
        gap: i32,
        color: String,
    }

    impl Default for Inner {
        fn default() -> Self {
            Self {
                gap: 8,
                color: "#fff".into(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Rec {
        max_length: Option<u32>,
        required: bool,
        inner: Inner,
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_key("DataField"), "dataField");
        assert_eq!(normalize_key("dataField"), "dataField");
        assert_eq!(normalize_key("data_field"), "dataField");
        assert_eq!(normalize_key("ZIndex"), "zIndex");
        assert_eq!(normalize_key("w"), "w");
    }

    #[test]
    fn sparse() {
        let mut r = Rec::default();
        assert!(r.sparse_fields().is_empty());
        r.required = true;
        r.inner.gap = 4;
        let s = r.sparse_fields();
        assert_eq!(s.len(), 2);
        assert_eq!(s["required"], json!(true));
        assert_eq!(s["inner"], json!({"gap": 4, "color": "#fff"}));
    }

    #[test]
    fn merge_is_per_field() {
        let mut r = Rec::default();
        let incoming = json!({
            "MaxLength": "not a number",
            "Required": true,
            "inner": {"Gap": 12},
            "customFlag": true,
        });
        let Value::Object(incoming) = incoming else {
            unreachable!()
        };
        let rest = r.merge_fields(incoming);
        assert_eq!(r.max_length, None);
        assert!(r.required);
        assert_eq!(r.inner, Inner { gap: 12, color: "#fff".into() });
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["customFlag"], json!(true));
    }

    #[test]
    fn dotted_paths() {
        let mut r = Rec::default();
        r.set_field("Inner.Gap", json!(20)).unwrap();
        assert_eq!(r.inner.gap, 20);
        assert_eq!(r.field("inner.gap"), Some(json!(20)));
        assert!(r.set_field("inner.missing", json!(1)).is_err());
        assert!(r.set_field("inner.gap", json!("wide")).is_err());
        assert_eq!(r.inner.gap, 20);
        assert_eq!(r.field("nope"), None);
    }
}
