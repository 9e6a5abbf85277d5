//! Node geometry and container layout.
//!
//! Every node carries one [`LayoutOptions`] holding the fields of all three
//! placement modes at once. The active [`LayoutMode`] only selects which
//! fields drive [`LayoutOptions::css`], so switching modes never loses
//! geometry. Containers additionally carry a [`ContainerLayout`] describing how
//! they arrange their own children.

use std::{fmt, result::Result as StdResult, str::FromStr};

use geom::Rect;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::error::{Error, Result};

/// How a node is placed inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Row-wrapping flow with percent or pixel widths.
    #[default]
    #[serde(alias = "Flow")]
    Flow,
    /// Pixel-positioned relative to the parent.
    #[serde(alias = "Absolute")]
    Absolute,
    /// Flex item.
    #[serde(alias = "Flex")]
    Flex,
}

impl LayoutMode {
    /// Lowercase name, as written to documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Absolute => "absolute",
            Self::Flex => "flex",
        }
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flow" => Ok(Self::Flow),
            "absolute" => Ok(Self::Absolute),
            "flex" => Ok(Self::Flex),
            _ => Err(Error::Invalid(format!("layout mode {s:?}"))),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a flow width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WidthUnit {
    /// Percent of the parent's content width.
    #[default]
    #[serde(rename = "%")]
    Percent,
    /// Pixels.
    #[serde(rename = "px", alias = "PX")]
    Px,
}

impl WidthUnit {
    /// The unit suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Px => "px",
        }
    }
}

/// Unit of a flow height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeightUnit {
    /// Pixels; the height is emitted as a minimum height.
    #[serde(rename = "px", alias = "PX")]
    Px,
    /// Content decides.
    #[default]
    #[serde(rename = "auto", alias = "Auto")]
    Auto,
}

impl HeightUnit {
    /// The unit name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Auto => "auto",
        }
    }
}

/// Accept integers, floats and numeric strings, rounding to the nearest
/// integer.
fn lenient_i32<'de, D>(d: D) -> StdResult<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    let n = match &v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => {
            Ok(n.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
        }
        _ => Err(D::Error::custom(format!("expected a number, got {v}"))),
    }
}

/// Geometry for all three placement modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    /// Active placement mode.
    #[serde(rename = "layoutMode")]
    pub mode: LayoutMode,

    /// Flow width.
    #[serde(deserialize_with = "lenient_i32")]
    pub width: i32,
    /// Unit of `width`.
    pub width_unit: WidthUnit,
    /// Flow height.
    #[serde(deserialize_with = "lenient_i32")]
    pub height: i32,
    /// Unit of `height`.
    pub height_unit: HeightUnit,
    /// Start a new row before this node.
    pub new_line: bool,

    /// Absolute x origin.
    #[serde(deserialize_with = "lenient_i32")]
    pub x: i32,
    /// Absolute y origin.
    #[serde(deserialize_with = "lenient_i32")]
    pub y: i32,
    /// Absolute width.
    #[serde(deserialize_with = "lenient_i32")]
    pub w: i32,
    /// Absolute height.
    #[serde(deserialize_with = "lenient_i32")]
    pub h: i32,
    /// Stacking order.
    #[serde(deserialize_with = "lenient_i32")]
    pub z_index: i32,

    /// Flex grow factor.
    #[serde(deserialize_with = "lenient_i32")]
    pub flex_grow: i32,
    /// Flex shrink factor.
    #[serde(deserialize_with = "lenient_i32")]
    pub flex_shrink: i32,
    /// Flex basis, any CSS length or `auto`.
    pub flex_basis: String,
    /// Cross-axis self alignment.
    pub align_self: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Flow,
            width: 48,
            width_unit: WidthUnit::Percent,
            height: 40,
            height_unit: HeightUnit::Auto,
            new_line: false,
            x: 0,
            y: 0,
            w: 200,
            h: 100,
            z_index: 1,
            flex_grow: 0,
            flex_shrink: 1,
            flex_basis: "auto".into(),
            align_self: "auto".into(),
        }
    }
}

impl LayoutOptions {
    /// Keys that are written for every node, default or not.
    pub const ALWAYS_EMITTED: [&'static str; 4] = ["width", "widthUnit", "height", "heightUnit"];

    /// Presentation style for the active mode. The output depends only on the
    /// field values.
    pub fn css(&self) -> String {
        match self.mode {
            LayoutMode::Flow => self.flow_css(),
            LayoutMode::Absolute => format!(
                "position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; z-index:{};",
                self.x, self.y, self.w, self.h, self.z_index
            ),
            LayoutMode::Flex => format!(
                "flex:{} {} {}; align-self:{};",
                self.flex_grow, self.flex_shrink, self.flex_basis, self.align_self
            ),
        }
    }

    /// Flow style: width as a fixed flex basis, height only when pinned.
    fn flow_css(&self) -> String {
        let basis = format!("{}{}", self.width, self.width_unit.as_str());
        match self.height_unit {
            HeightUnit::Px => format!("flex:0 0 {basis}; min-height:{}px;", self.height),
            HeightUnit::Auto => format!("flex:0 0 {basis};"),
        }
    }

    /// Does this node force a row break in flow layout?
    pub fn breaks_row(&self) -> bool {
        self.mode == LayoutMode::Flow && self.new_line
    }

    /// Upper bound for `width`: 100 for percent widths, unbounded for pixels.
    pub fn max_width(&self) -> Option<i32> {
        match self.width_unit {
            WidthUnit::Percent => Some(100),
            WidthUnit::Px => None,
        }
    }

    /// The absolute-mode rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Replace the absolute-mode rectangle.
    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.tl.x;
        self.y = r.tl.y;
        self.w = r.w;
        self.h = r.h;
    }
}

/// How a container arranges its own children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContainerMode {
    /// Wrapping flex rows.
    #[default]
    #[serde(alias = "flow")]
    Flow,
    /// A single flex line.
    #[serde(alias = "flex")]
    Flex,
    /// Children are absolutely positioned.
    #[serde(alias = "absolute")]
    Absolute,
}

/// Container-internal layout, independent of the container's own placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerLayout {
    /// Arrangement mode.
    pub mode: ContainerMode,
    /// `row` or `column`.
    pub flex_direction: String,
    /// Wrap children onto new lines.
    pub flex_wrap: bool,
    /// Main-axis alignment.
    pub justify_content: String,
    /// Cross-axis alignment.
    pub align_items: String,
    /// Gap between children, in pixels.
    pub gap: i32,
    /// Inner padding, in pixels.
    pub padding: i32,
    /// Background colour.
    pub background_color: String,
    /// Corner radius, in pixels.
    pub border_radius: i32,
    /// Border line style.
    pub border_style: String,
    /// Border colour.
    pub border_color: String,
    /// Border width in pixels; zero disables the border.
    pub border_width: i32,
}

impl Default for ContainerLayout {
    fn default() -> Self {
        Self {
            mode: ContainerMode::Flow,
            flex_direction: "row".into(),
            flex_wrap: true,
            justify_content: "flex-start".into(),
            align_items: "flex-start".into(),
            gap: 8,
            padding: 12,
            background_color: "#ffffff".into(),
            border_radius: 4,
            border_style: "solid".into(),
            border_color: "#d9d9d9".into(),
            border_width: 1,
        }
    }
}

impl ContainerLayout {
    /// Section defaults: grey background, rounded.
    pub fn section() -> Self {
        Self {
            background_color: "#f5f5f5".into(),
            border_radius: 8,
            ..Self::default()
        }
    }

    /// Card defaults: a stretched column.
    pub fn card() -> Self {
        Self {
            flex_direction: "column".into(),
            flex_wrap: false,
            align_items: "stretch".into(),
            gap: 12,
            padding: 16,
            border_radius: 8,
            border_color: "#e8e8e8".into(),
            ..Self::default()
        }
    }

    /// Sub-form defaults: a tight stretched column.
    pub fn subform() -> Self {
        Self {
            flex_direction: "column".into(),
            flex_wrap: false,
            align_items: "stretch".into(),
            background_color: "#f5f5f5".into(),
            border_radius: 6,
            ..Self::default()
        }
    }

    /// Style for the container's content box.
    pub fn css(&self) -> String {
        let mut styles = Vec::new();
        match self.mode {
            ContainerMode::Absolute => styles.push("display: block".to_string()),
            ContainerMode::Flow | ContainerMode::Flex => {
                let wrap = self.flex_wrap && self.mode == ContainerMode::Flow;
                styles.push("display: flex".into());
                styles.push(format!("flex-direction: {}", self.flex_direction));
                styles.push(format!("flex-wrap: {}", if wrap { "wrap" } else { "nowrap" }));
                styles.push(format!("justify-content: {}", self.justify_content));
                styles.push(format!("align-items: {}", self.align_items));
                styles.push(format!("gap: {}px", self.gap));
            }
        }
        styles.push(format!("padding: {}px", self.padding));
        styles.push(format!("background-color: {}", self.background_color));
        styles.push(format!("border-radius: {}px", self.border_radius));
        if self.border_width > 0 {
            styles.push(format!(
                "border: {}px {} {}",
                self.border_width, self.border_style, self.border_color
            ));
        }
        styles.push("position: relative".into());
        styles.push("min-height: 60px".into());
        styles.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_css() {
        let mut l = LayoutOptions::default();
        assert_eq!(l.css(), "flex:0 0 48%;");
        l.width = 320;
        l.width_unit = WidthUnit::Px;
        l.height = 80;
        l.height_unit = HeightUnit::Px;
        assert_eq!(l.css(), "flex:0 0 320px; min-height:80px;");
        assert!(!l.breaks_row());
        l.new_line = true;
        assert!(l.breaks_row());
    }

    #[test]
    fn absolute_and_flex_css() {
        let mut l = LayoutOptions {
            mode: LayoutMode::Absolute,
            x: 10,
            y: 20,
            ..Default::default()
        };
        assert_eq!(
            l.css(),
            "position:absolute; left:10px; top:20px; width:200px; height:100px; z-index:1;"
        );
        l.mode = LayoutMode::Flex;
        l.flex_grow = 2;
        assert_eq!(l.css(), "flex:2 1 auto; align-self:auto;");
        assert!(!l.breaks_row());
    }

    #[test]
    fn css_is_deterministic() {
        let l = LayoutOptions {
            mode: LayoutMode::Flex,
            flex_basis: "30%".into(),
            ..Default::default()
        };
        assert_eq!(l.css(), l.clone().css());
    }

    #[test]
    fn max_width() {
        let mut l = LayoutOptions::default();
        assert_eq!(l.max_width(), Some(100));
        l.width_unit = WidthUnit::Px;
        assert_eq!(l.max_width(), None);
    }

    #[test]
    fn lenient_numbers() {
        let l: LayoutOptions =
            serde_json::from_str(r#"{"width": 33.4, "x": "12", "widthUnit": "px"}"#).unwrap();
        assert_eq!(l.width, 33);
        assert_eq!(l.x, 12);
        assert_eq!(l.width_unit, WidthUnit::Px);
        assert_eq!(l.h, 100);
        assert!(serde_json::from_str::<LayoutOptions>(r#"{"width": true}"#).is_err());
    }

    #[test]
    fn container_css() {
        assert_eq!(
            ContainerLayout::default().css(),
            "display: flex; flex-direction: row; flex-wrap: wrap; justify-content: flex-start; \
             align-items: flex-start; gap: 8px; padding: 12px; background-color: #ffffff; \
             border-radius: 4px; border: 1px solid #d9d9d9; position: relative; min-height: 60px"
        );
        let c = ContainerLayout {
            mode: ContainerMode::Flex,
            border_width: 0,
            ..ContainerLayout::card()
        };
        let css = c.css();
        assert!(css.contains("flex-wrap: nowrap"));
        assert!(css.contains("flex-direction: column"));
        assert!(!css.contains("border:"));
    }
}
