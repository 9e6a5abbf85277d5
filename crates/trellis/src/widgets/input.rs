use serde::{Deserialize, Serialize};
use serde_json::{Number as JsonNumber, Value};

use super::ListItem;
use crate::{
    error::{Error, Result},
    markup::{Element, Markup},
    node::Node,
    property::{EditorKind, PropertyMeta, common},
    registry::{Category, WidgetKind},
    render::{self, RenderMode, Runtime},
    widget::Widget,
};

/// Label for the stored value of a choice control, falling back to the raw
/// value.
fn choice_text(items: &[ListItem], value: Option<&Value>) -> String {
    let label = |v: &str| {
        items
            .iter()
            .find(|i| i.value == v)
            .map_or_else(|| v.to_string(), |i| i.label.clone())
    };
    match value {
        Some(Value::String(s)) => label(s),
        Some(Value::Array(vs)) => vs
            .iter()
            .map(|v| label(&render::display_value(Some(v))))
            .collect::<Vec<_>>()
            .join(", "),
        v => render::display_value(v),
    }
}

/// Selected values of a multi-choice control.
fn selected(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(vs)) => vs.iter().map(|v| render::display_value(Some(v))).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse comma-separated input into an array of strings.
fn parse_list(raw: &str) -> Value {
    Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.into()))
            .collect(),
    )
}

/// Option elements for a select or list box.
fn options(items: &[ListItem], chosen: &[String]) -> Vec<Markup> {
    items
        .iter()
        .map(|i| {
            Markup::from(
                Element::new("option")
                    .attr("value", i.value.as_str())
                    .flag("selected", chosen.contains(&i.value))
                    .text(i.label.as_str()),
            )
        })
        .collect()
}

/// A group of checkable inputs, one per item.
fn check_group(
    node: &Node,
    items: &[ListItem],
    input_type: &str,
    chosen: &[String],
    direction: &str,
) -> Markup {
    let dir = if direction == "vertical" { "column" } else { "row" };
    Element::new("div")
        .class("trellis-choice-group")
        .style(format!("display:flex; flex-direction:{dir}; gap:8px;"))
        .children(items.iter().map(|i| {
            Markup::from(
                Element::new("label")
                    .child(
                        render::bound(Element::new("input").attr("type", input_type), node)
                            .attr("value", i.value.as_str())
                            .flag("checked", chosen.contains(&i.value)),
                    )
                    .text(i.label.as_str()),
            )
        }))
        .into()
}

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Textbox {
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Input is mandatory.
    pub required: bool,
    /// Input is refused.
    pub readonly: bool,
    /// Maximum length in characters.
    pub max_length: Option<u32>,
    /// Validation regular expression.
    pub validation_pattern: Option<String>,
    /// Initial value for new records.
    pub default_value: Option<String>,
}

impl WidgetKind for Textbox {
    const TAG: &'static str = "textbox";
    const LABEL_KEY: &'static str = "LBL_TEXTBOX";
    const ICON: &'static str = "edit";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Textbox {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn read_only(&self) -> bool {
        self.readonly
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        vec![
            PropertyMeta::text("Label", "PROP_LABEL"),
            PropertyMeta::text("Placeholder", "LBL_PLACEHOLDER"),
            PropertyMeta::text("DefaultValue", "LBL_DEFAULT_VALUE"),
            PropertyMeta::number("MaxLength", "LBL_MAX_LENGTH", Some(1.0), Some(1000.0)),
            PropertyMeta::boolean("Required", "LBL_REQUIRED"),
            PropertyMeta::boolean("Readonly", "LBL_READONLY"),
            PropertyMeta::number("Width", "PROP_WIDTH", Some(1.0), node.max_width().map(f64::from)),
        ]
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let control = match (rt.mode, render::text_input(node, rt, "text")) {
            (RenderMode::Edit, Markup::Element(mut e)) => {
                if let Some(p) = &self.placeholder {
                    e = e.attr("placeholder", p.as_str());
                }
                if let Some(m) = self.max_length {
                    e = e.attr("maxlength", m.to_string());
                }
                if let Some(p) = &self.validation_pattern {
                    e = e.attr("pattern", p.as_str());
                }
                e.flag("required", self.required).into()
            }
            (_, m) => m,
        };
        render::runtime_field(node, rt, control)
    }
}

/// Numeric input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Number {
    /// Initial value for new records.
    pub default_value: Option<f64>,
    /// Inclusive lower bound.
    pub min_value: Option<f64>,
    /// Inclusive upper bound.
    pub max_value: Option<f64>,
    /// Spinner increment.
    pub step: f64,
    /// Accept fractional values.
    pub allow_decimal: bool,
    /// Group digits when displaying.
    pub show_thousands_separator: bool,
}

impl Default for Number {
    fn default() -> Self {
        Self {
            default_value: None,
            min_value: None,
            max_value: None,
            step: 1.0,
            allow_decimal: true,
            show_thousands_separator: false,
        }
    }
}

/// Insert thousands separators into the integer part of a decimal string.
fn group_thousands(s: &str) -> String {
    let (sign, rest) = s.strip_prefix('-').map_or(("", s), |r| ("-", r));
    let (int, frac) = rest.split_once('.').map_or((rest, None), |(i, f)| (i, Some(f)));
    let mut grouped = String::new();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

impl WidgetKind for Number {
    const TAG: &'static str = "number";
    const LABEL_KEY: &'static str = "LBL_NUMBER";
    const ICON: &'static str = "field-number";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Number {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::number("DefaultValue", "LBL_DEFAULT_VALUE", None, None),
            PropertyMeta::number("MinValue", "PROP_MIN_VALUE", None, None),
            PropertyMeta::number("MaxValue", "PROP_MAX_VALUE", None, None),
            PropertyMeta::number("Step", "PROP_STEP", Some(0.0), None),
            PropertyMeta::boolean("AllowDecimal", "PROP_ALLOW_DECIMAL"),
            PropertyMeta::boolean("ShowThousandsSeparator", "PROP_THOUSANDS_SEPARATOR"),
        ]);
        props
    }

    fn parse_input(&self, raw: &str) -> Result<Value> {
        let raw = raw.trim().replace(',', "");
        if raw.is_empty() {
            return Ok(Value::Null);
        }
        let n: f64 = raw
            .parse()
            .map_err(|_| Error::Invalid(format!("not a number: {raw:?}")))?;
        if !n.is_finite() {
            return Err(Error::Invalid(format!("not a number: {raw:?}")));
        }
        if !self.allow_decimal && n.fract() != 0.0 {
            return Err(Error::Invalid(format!("decimals not allowed: {raw}")));
        }
        if self.min_value.is_some_and(|min| n < min) || self.max_value.is_some_and(|max| n > max) {
            return Err(Error::Invalid(format!("{raw} is out of range")));
        }
        if self.allow_decimal {
            JsonNumber::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| Error::Invalid(format!("not a number: {raw:?}")))
        } else {
            Ok(Value::from(n as i64))
        }
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let control = match rt.mode {
            RenderMode::Browse => {
                let text = render::display_value(rt.value(node).as_ref());
                let text = if self.show_thousands_separator {
                    group_thousands(&text)
                } else {
                    text
                };
                render::value_span(text)
            }
            RenderMode::Edit => match render::text_input(node, rt, "number") {
                Markup::Element(mut e) => {
                    if let Some(min) = self.min_value {
                        e = e.attr("min", min.to_string());
                    }
                    if let Some(max) = self.max_value {
                        e = e.attr("max", max.to_string());
                    }
                    e.attr("step", self.step.to_string()).into()
                }
                m => m,
            },
        };
        render::runtime_field(node, rt, control)
    }
}

/// Drop-down single choice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Select {
    /// Options.
    pub items: Vec<ListItem>,
    /// Initially selected value.
    pub default_value: Option<String>,
    /// Placeholder shown when nothing is selected.
    pub placeholder: Option<String>,
    /// Offer a clear button.
    pub allow_clear: bool,
}

impl WidgetKind for Select {
    const TAG: &'static str = "select";
    const LABEL_KEY: &'static str = "LBL_SELECT";
    const ICON: &'static str = "select";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Select {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::new("Items", "PROP_OPTIONS", EditorKind::Json),
            PropertyMeta::text("DefaultValue", "LBL_DEFAULT_VALUE"),
            PropertyMeta::text("Placeholder", "LBL_PLACEHOLDER"),
            PropertyMeta::boolean("AllowClear", "PROP_ALLOW_CLEAR"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let value = rt.value(node);
        let control = match rt.mode {
            RenderMode::Browse => render::value_span(choice_text(&self.items, value.as_ref())),
            RenderMode::Edit => {
                let chosen = selected(value.as_ref());
                let mut e = render::bound(Element::new("select"), node);
                if let Some(p) = &self.placeholder {
                    e = e.child(
                        Element::new("option")
                            .attr("value", "")
                            .flag("selected", chosen.is_empty())
                            .text(p.as_str()),
                    );
                }
                e.children(options(&self.items, &chosen)).into()
            }
        };
        render::runtime_field(node, rt, control)
    }
}

/// Multiple choice as a group of check boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checkbox {
    /// Options.
    pub items: Vec<ListItem>,
    /// Initially checked values, comma separated.
    pub default_value: Option<String>,
    /// Render as toggle buttons.
    pub button_style: bool,
    /// `horizontal` or `vertical`.
    pub direction: String,
}

impl Default for Checkbox {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            default_value: None,
            button_style: false,
            direction: "horizontal".into(),
        }
    }
}

/// Properties shared by the check box and radio groups.
fn choice_group_properties(node: &Node) -> Vec<PropertyMeta> {
    let mut props = common(node.max_width());
    props.extend([
        PropertyMeta::new("Items", "PROP_OPTIONS", EditorKind::Json),
        PropertyMeta::text("DefaultValue", "LBL_DEFAULT_VALUE"),
        PropertyMeta::boolean("ButtonStyle", "PROP_BUTTON_STYLE"),
        PropertyMeta::select(
            "Direction",
            "PROP_DIRECTION",
            &[
                ("horizontal", "PROP_DIRECTION_ROW"),
                ("vertical", "PROP_DIRECTION_COLUMN"),
            ],
        ),
    ]);
    props
}

impl WidgetKind for Checkbox {
    const TAG: &'static str = "checkbox";
    const LABEL_KEY: &'static str = "LBL_CHECKBOX";
    const ICON: &'static str = "check-square";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Checkbox {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        choice_group_properties(node)
    }

    fn parse_input(&self, raw: &str) -> Result<Value> {
        Ok(parse_list(raw))
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let value = rt.value(node);
        let control = match rt.mode {
            RenderMode::Browse => render::value_span(choice_text(&self.items, value.as_ref())),
            RenderMode::Edit => check_group(
                node,
                &self.items,
                "checkbox",
                &selected(value.as_ref()),
                &self.direction,
            ),
        };
        render::runtime_field(node, rt, control)
    }
}

/// Single choice as a group of radio buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Radio {
    /// Options.
    pub items: Vec<ListItem>,
    /// Initially selected value.
    pub default_value: Option<String>,
    /// Render as toggle buttons.
    pub button_style: bool,
    /// `horizontal` or `vertical`.
    pub direction: String,
}

impl Default for Radio {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            default_value: None,
            button_style: false,
            direction: "horizontal".into(),
        }
    }
}

impl WidgetKind for Radio {
    const TAG: &'static str = "radio";
    const LABEL_KEY: &'static str = "LBL_RADIO";
    const ICON: &'static str = "dot-chart";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Radio {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        choice_group_properties(node)
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let value = rt.value(node);
        let control = match rt.mode {
            RenderMode::Browse => render::value_span(choice_text(&self.items, value.as_ref())),
            RenderMode::Edit => check_group(
                node,
                &self.items,
                "radio",
                &selected(value.as_ref()),
                &self.direction,
            ),
        };
        render::runtime_field(node, rt, control)
    }
}

/// A scrolling list of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listbox {
    /// Options.
    pub items: Vec<ListItem>,
    /// Initially selected value.
    pub default_value: Option<String>,
    /// Allow several selected values.
    pub multiple: bool,
    /// Visible rows.
    pub rows: u32,
}

impl Default for Listbox {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            default_value: None,
            multiple: false,
            rows: 4,
        }
    }
}

impl WidgetKind for Listbox {
    const TAG: &'static str = "listbox";
    const LABEL_KEY: &'static str = "LBL_LISTBOX";
    const ICON: &'static str = "unordered-list";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Listbox {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::new("Items", "PROP_OPTIONS", EditorKind::Json),
            PropertyMeta::boolean("Multiple", "PROP_MULTIPLE"),
            PropertyMeta::number("Rows", "PROP_ROWS", Some(1.0), Some(20.0)),
        ]);
        props
    }

    fn parse_input(&self, raw: &str) -> Result<Value> {
        if self.multiple {
            Ok(parse_list(raw))
        } else {
            Ok(Value::String(raw.to_string()))
        }
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let value = rt.value(node);
        let control = match rt.mode {
            RenderMode::Browse => render::value_span(choice_text(&self.items, value.as_ref())),
            RenderMode::Edit => render::bound(Element::new("select"), node)
                .attr("size", self.rows.to_string())
                .flag("multiple", self.multiple)
                .children(options(&self.items, &selected(value.as_ref())))
                .into(),
        };
        render::runtime_field(node, rt, control)
    }
}

/// Multi-line text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Textarea {
    /// Initial value for new records.
    pub default_value: Option<String>,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Maximum length in characters.
    pub max_length: Option<u32>,
    /// Visible rows.
    pub rows: u32,
    /// Grow with the content.
    pub auto_size: bool,
}

impl Default for Textarea {
    fn default() -> Self {
        Self {
            default_value: None,
            placeholder: None,
            max_length: None,
            rows: 4,
            auto_size: true,
        }
    }
}

impl WidgetKind for Textarea {
    const TAG: &'static str = "textarea";
    const LABEL_KEY: &'static str = "LBL_TEXTAREA";
    const ICON: &'static str = "file-text";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Textarea {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("Placeholder", "LBL_PLACEHOLDER"),
            PropertyMeta::new("DefaultValue", "LBL_DEFAULT_VALUE", EditorKind::Textarea),
            PropertyMeta::number("MaxLength", "LBL_MAX_LENGTH", Some(1.0), None),
            PropertyMeta::number("Rows", "PROP_ROWS", Some(1.0), Some(30.0)),
            PropertyMeta::boolean("AutoSize", "PROP_AUTO_SIZE"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let text = render::display_value(rt.value(node).as_ref());
        let control = match rt.mode {
            RenderMode::Browse => Element::new("div")
                .class("trellis-value")
                .style("white-space:pre-wrap;")
                .text(text)
                .into(),
            RenderMode::Edit => {
                let mut e = render::bound(Element::new("textarea"), node)
                    .attr("rows", self.rows.to_string());
                if let Some(p) = &self.placeholder {
                    e = e.attr("placeholder", p.as_str());
                }
                if let Some(m) = self.max_length {
                    e = e.attr("maxlength", m.to_string());
                }
                e.text(text).into()
            }
        };
        render::runtime_field(node, rt, control)
    }
}

/// Date picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calendar {
    /// Initial value for new records.
    pub default_value: Option<String>,
    /// Display format.
    pub format: String,
    /// Pick a time as well as a date.
    pub show_time: bool,
    /// Placeholder text.
    pub placeholder: Option<String>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            default_value: None,
            format: "YYYY-MM-DD".into(),
            show_time: false,
            placeholder: None,
        }
    }
}

impl WidgetKind for Calendar {
    const TAG: &'static str = "calendar";
    const LABEL_KEY: &'static str = "LBL_CALENDAR";
    const ICON: &'static str = "calendar";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Calendar {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn binds_value(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("Format", "PROP_DATE_FORMAT"),
            PropertyMeta::boolean("ShowTime", "PROP_SHOW_TIME"),
            PropertyMeta::text("Placeholder", "LBL_PLACEHOLDER"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let input_type = if self.show_time { "datetime-local" } else { "date" };
        let control = match render::text_input(node, rt, input_type) {
            Markup::Element(e) if rt.mode == RenderMode::Edit => {
                e.attr("data-format", self.format.as_str()).into()
            }
            m => m,
        };
        render::runtime_field(node, rt, control)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn thousands() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
        assert_eq!(group_thousands("999"), "999");
    }

    #[test]
    fn number_input() {
        let n = Number {
            min_value: Some(0.0),
            max_value: Some(10_000.0),
            allow_decimal: false,
            ..Number::default()
        };
        assert_eq!(n.parse_input("1,200").unwrap(), json!(1200));
        assert_eq!(n.parse_input("  ").unwrap(), Value::Null);
        assert!(n.parse_input("1.5").is_err());
        assert!(n.parse_input("-1").is_err());
        assert!(n.parse_input("abc").is_err());
        assert_eq!(Number::default().parse_input("2.5").unwrap(), json!(2.5));
    }

    #[test]
    fn choices() {
        let items = vec![ListItem::new("a", "Alpha"), ListItem::new("b", "Beta")];
        assert_eq!(choice_text(&items, Some(&json!("b"))), "Beta");
        assert_eq!(choice_text(&items, Some(&json!(["a", "z"]))), "Alpha, z");
        assert_eq!(selected(Some(&json!("a, b"))), vec!["a", "b"]);
        assert_eq!(parse_list("x, ,y"), json!(["x", "y"]));
    }
}
