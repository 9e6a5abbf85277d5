//! Property descriptors consumed by an external property editor.

use serde::Serialize;
use serde_json::Value;

/// The editor control used for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EditorKind {
    /// Single-line text.
    Text,
    /// Numeric input, optionally bounded.
    Number,
    /// Switch.
    Boolean,
    /// Colour picker.
    Color,
    /// One of a fixed set of options.
    Select,
    /// Multi-line text.
    Textarea,
    /// Raw JSON.
    Json,
    /// Data set chooser.
    DataSetPicker,
}

/// One selectable option of a [`EditorKind::Select`] property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyOption {
    /// Stored value.
    pub value: String,
    /// Display label key.
    pub label: String,
}

/// Describes one editable property of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMeta {
    /// Dotted path, e.g. `Label` or `ContainerLayout.Gap`.
    pub path: String,
    /// Display label key.
    pub label: String,
    /// Editor control.
    pub editor: EditorKind,
    /// Editor group label key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Lower bound for numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Options for select editors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    /// Placeholder text or key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Show only when the property at this path has the given value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<(String, Value)>,
    /// Help text key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl PropertyMeta {
    /// A property with the given path, label key and editor.
    pub fn new(path: &str, label: &str, editor: EditorKind) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            editor,
            group: None,
            min: None,
            max: None,
            options: Vec::new(),
            placeholder: None,
            visible_when: None,
            help: None,
        }
    }

    /// Single-line text property.
    pub fn text(path: &str, label: &str) -> Self {
        Self::new(path, label, EditorKind::Text)
    }

    /// Boolean property.
    pub fn boolean(path: &str, label: &str) -> Self {
        Self::new(path, label, EditorKind::Boolean)
    }

    /// Colour property.
    pub fn color(path: &str, label: &str) -> Self {
        Self::new(path, label, EditorKind::Color)
    }

    /// Numeric property with optional bounds.
    pub fn number(path: &str, label: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Self::new(path, label, EditorKind::Number)
        }
    }

    /// Select property; options are `(value, label)` pairs.
    pub fn select(path: &str, label: &str, options: &[(&str, &str)]) -> Self {
        Self {
            options: options
                .iter()
                .map(|(value, label)| PropertyOption {
                    value: (*value).into(),
                    label: (*label).into(),
                })
                .collect(),
            ..Self::new(path, label, EditorKind::Select)
        }
    }

    /// Place the property in an editor group.
    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set a placeholder.
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Show only when `path` holds `value`.
    pub fn visible_when(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.visible_when = Some((path.into(), value.into()));
        self
    }

    /// Attach help text.
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// The label, width and visibility descriptors every kind starts from.
pub fn common(max_width: Option<i32>) -> Vec<PropertyMeta> {
    vec![
        PropertyMeta::text("Label", "PROP_LABEL"),
        PropertyMeta::number("Width", "PROP_WIDTH", Some(1.0), max_width.map(f64::from)),
        PropertyMeta::boolean("Visible", "PROP_VISIBLE"),
    ]
}

/// Gap, padding, background and radius descriptors for a container's
/// internal layout.
pub fn container_layout(background: &str) -> Vec<PropertyMeta> {
    let group = "PROP_GROUP_LAYOUT";
    vec![
        PropertyMeta::number("ContainerLayout.Gap", "PROP_GAP", Some(0.0), Some(48.0)).group(group),
        PropertyMeta::number("ContainerLayout.Padding", "PROP_PADDING", Some(0.0), Some(48.0))
            .group(group),
        PropertyMeta::color("ContainerLayout.BackgroundColor", "PROP_BACKGROUND_COLOR")
            .placeholder(background)
            .group(group),
        PropertyMeta::number(
            "ContainerLayout.BorderRadius",
            "PROP_BORDER_RADIUS",
            Some(0.0),
            Some(24.0),
        )
        .group(group),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builders() {
        let p = PropertyMeta::boolean("Collapsed", "PROP_COLLAPSED_DEFAULT")
            .visible_when("Collapsible", true);
        assert_eq!(p.visible_when, Some(("Collapsible".into(), json!(true))));
        let s = PropertyMeta::select("Size", "PROP_SIZE", &[("small", "S"), ("large", "L")]);
        assert_eq!(s.options.len(), 2);
        assert_eq!(s.editor, EditorKind::Select);
    }

    #[test]
    fn common_width_bound() {
        let c = common(Some(100));
        assert_eq!(c[1].path, "Width");
        assert_eq!(c[1].max, Some(100.0));
        assert_eq!(common(None)[1].max, None);
    }
}
