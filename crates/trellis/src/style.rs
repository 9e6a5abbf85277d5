//! Appearance presets and the wrapper styles used by the renderers.

use serde::{Deserialize, Serialize};

use crate::{
    layout::{HeightUnit, LayoutMode, WidthUnit},
    node::Node,
    render::RenderMode,
};

/// Box shadow strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadowLevel {
    /// No shadow.
    #[default]
    None,
    /// Hairline.
    Xs,
    /// Small.
    Small,
    /// Medium.
    Medium,
    /// Large.
    Large,
    /// Extra large.
    Xl,
}

impl ShadowLevel {
    /// CSS `box-shadow` value; empty for [`Self::None`].
    pub fn css(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Xs => "0 1px 2px rgba(0,0,0,0.05)",
            Self::Small => "0 1px 3px rgba(0,0,0,0.1), 0 1px 2px rgba(0,0,0,0.06)",
            Self::Medium => "0 4px 6px rgba(0,0,0,0.1), 0 2px 4px rgba(0,0,0,0.06)",
            Self::Large => "0 10px 15px rgba(0,0,0,0.1), 0 4px 6px rgba(0,0,0,0.05)",
            Self::Xl => "0 20px 25px rgba(0,0,0,0.1), 0 10px 10px rgba(0,0,0,0.04)",
        }
    }
}

/// Composable appearance options, applied alongside the layout style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOptions {
    /// Background colour; `transparent` emits nothing.
    pub background_color: String,
    /// Border colour.
    pub border_color: String,
    /// Border width in pixels; zero disables the border.
    pub border_width: i32,
    /// Border line style.
    pub border_style: String,
    /// Corner radius in pixels.
    pub border_radius: i32,
    /// Shadow level.
    pub shadow: ShadowLevel,
    /// Padding in pixels.
    pub padding: i32,
    /// Margin in pixels.
    pub margin: i32,
    /// Text colour.
    pub text_color: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<i32>,
    /// Font weight.
    pub font_weight: Option<String>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            background_color: "transparent".into(),
            border_color: "var(--border-color, #d9d9d9)".into(),
            border_width: 0,
            border_style: "solid".into(),
            border_radius: 0,
            shadow: ShadowLevel::None,
            padding: 0,
            margin: 0,
            text_color: None,
            font_size: None,
            font_weight: None,
        }
    }
}

impl StyleOptions {
    /// Raised card.
    pub fn card() -> Self {
        Self {
            background_color: "var(--card-bg, #ffffff)".into(),
            border_color: "var(--border-color, #e8e8e8)".into(),
            border_width: 1,
            border_radius: 8,
            shadow: ShadowLevel::Small,
            padding: 16,
            ..Self::default()
        }
    }

    /// Flat panel.
    pub fn panel() -> Self {
        Self {
            background_color: "var(--panel-bg, #fafafa)".into(),
            border_width: 1,
            border_radius: 4,
            padding: 12,
            ..Self::default()
        }
    }

    /// CSS declarations for the set options only.
    pub fn css(&self) -> String {
        let mut styles = Vec::new();
        if !self.background_color.is_empty() && self.background_color != "transparent" {
            styles.push(format!("background-color: {}", self.background_color));
        }
        if self.border_width > 0 {
            styles.push(format!(
                "border: {}px {} {}",
                self.border_width, self.border_style, self.border_color
            ));
        }
        if self.border_radius > 0 {
            styles.push(format!("border-radius: {}px", self.border_radius));
        }
        if self.shadow != ShadowLevel::None {
            styles.push(format!("box-shadow: {}", self.shadow.css()));
        }
        if self.padding > 0 {
            styles.push(format!("padding: {}px", self.padding));
        }
        if self.margin > 0 {
            styles.push(format!("margin: {}px", self.margin));
        }
        if let Some(c) = self.text_color.as_deref().filter(|c| !c.is_empty()) {
            styles.push(format!("color: {c}"));
        }
        if let Some(s) = self.font_size.filter(|s| *s > 0) {
            styles.push(format!("font-size: {s}px"));
        }
        if let Some(w) = self.font_weight.as_deref().filter(|w| !w.is_empty()) {
            styles.push(format!("font-weight: {w}"));
        }
        styles.join("; ")
    }
}

/// Typography of text-bearing kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: i32,
    /// Text colour.
    pub font_color: String,
    /// Font family.
    pub font_family: String,
    /// Font weight.
    pub font_weight: String,
    /// Horizontal alignment.
    pub text_align: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 14,
            font_color: "#333333".into(),
            font_family: "inherit".into(),
            font_weight: "normal".into(),
            text_align: "left".into(),
        }
    }
}

impl TextStyle {
    /// Inline text style.
    pub fn css(&self) -> String {
        format!(
            "font-size:{}px; color:{}; font-family:{}; font-weight:{}; text-align:{};",
            self.font_size, self.font_color, self.font_family, self.font_weight, self.text_align
        )
    }
}

/// Flex basis of a flow item, leaving room for `gap` pixels of spacing
/// when the width is a percentage.
pub fn flex_basis(node: &Node, gap: i32) -> String {
    match node.layout.width_unit {
        WidthUnit::Percent => format!("calc({}% - {gap}px)", node.layout.width),
        WidthUnit::Px => format!("{}px", node.layout.width),
    }
}

/// Placement part of a wrapper style. Flow items get a fixed flex basis with
/// `gap` pixels of spacing; other modes use the layout style as is.
fn placement(node: &Node, gap: i32) -> String {
    match node.layout.mode {
        LayoutMode::Flow => {
            let basis = flex_basis(node, gap);
            format!("flex:0 0 {basis}; max-width:{basis};")
        }
        LayoutMode::Absolute | LayoutMode::Flex => node.layout.css(),
    }
}

/// Wrapper style of a top-level item in the designer.
pub fn design_style(node: &Node, selected: bool) -> String {
    let place = placement(node, 4);
    let border = if selected { "2px solid #1890ff" } else { "1px solid #e0e0e0" };
    let z = if selected { 100 } else { 1 };
    format!(
        "{place} min-height:{}px; background:#fff; \
         border-radius:4px; border:{border}; box-shadow:0 1px 3px rgba(0,0,0,0.1); \
         user-select:none; position:relative; margin:4px; z-index:{z}; \
         box-sizing:border-box; display:flex; flex-direction:column;",
        node.design_min_height()
    )
}

/// Wrapper style of an item nested inside a container in the designer.
pub fn nested_style(node: &Node, selected: bool) -> String {
    let place = placement(node, 4);
    let border = if selected { "2px solid #ff4d4f" } else { "1px solid #d0d0d0" };
    let z = if selected { 100 } else { 1 };
    format!(
        "{place} min-height:{}px; background:#fff; \
         border-radius:2px; border:{border}; box-shadow:0 1px 2px rgba(0,0,0,0.05); \
         user-select:none; position:relative; z-index:{z}; box-sizing:border-box; \
         cursor:move; display:flex; flex-direction:column;",
        node.design_min_height()
    )
}

/// Wrapper style of an item at runtime.
pub fn runtime_style(node: &Node, mode: RenderMode) -> String {
    let place = placement(node, 8);
    let min_height = match node.layout.height_unit {
        HeightUnit::Px => node.layout.height.max(32),
        HeightUnit::Auto => 64,
    };
    let background = match mode {
        RenderMode::Edit => "#ffffff",
        RenderMode::Browse => "#fdfdfd",
    };
    format!(
        "{place} min-height:{min_height}px; \
         background:{background}; border-radius:6px; border:1px solid #e0e0e0; \
         box-shadow:0 1px 2px rgba(0,0,0,0.06); padding:12px; box-sizing:border-box; \
         display:flex; flex-direction:column; gap:8px;"
    )
}
