use serde::{Deserialize, Serialize};

use crate::{
    markup::{Element, Markup},
    node::Node,
    property::{PropertyMeta, common},
    registry::{Category, WidgetKind},
    render::{self, Runtime},
    style::TextStyle,
    widget::Widget,
};

/// An action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Button {
    /// `primary`, `default`, `dashed`, `link` or `text`.
    pub variant: String,
    /// `small`, `default` or `large`.
    pub size: String,
    /// Action identifier dispatched on click.
    pub action: Option<String>,
    /// Free-form payload passed with the action.
    pub action_payload: Option<String>,
    /// Icon name.
    pub icon: Option<String>,
    /// Stretch to the full width of the slot.
    pub block: bool,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            variant: "primary".into(),
            size: "default".into(),
            action: None,
            action_payload: None,
            icon: None,
            block: false,
        }
    }
}

impl WidgetKind for Button {
    const TAG: &'static str = "button";
    const LABEL_KEY: &'static str = "LBL_BUTTON";
    const ICON: &'static str = "inbox";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::select(
                "Variant",
                "PROP_BUTTON_VARIANT",
                &[
                    ("primary", "PROP_BUTTON_PRIMARY"),
                    ("default", "PROP_BUTTON_DEFAULT"),
                    ("dashed", "PROP_BUTTON_DASHED"),
                    ("link", "PROP_BUTTON_LINK"),
                    ("text", "PROP_BUTTON_TEXT"),
                ],
            ),
            PropertyMeta::select(
                "Size",
                "PROP_SIZE",
                &[
                    ("small", "PROP_SIZE_SMALL"),
                    ("default", "PROP_SIZE_DEFAULT"),
                    ("large", "PROP_SIZE_LARGE"),
                ],
            ),
            PropertyMeta::text("Action", "PROP_ACTION"),
            PropertyMeta::text("ActionPayload", "PROP_ACTION_PAYLOAD"),
            PropertyMeta::text("Icon", "PROP_ICON"),
            PropertyMeta::boolean("Block", "PROP_BLOCK"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, _rt: &Runtime<'_>) -> Markup {
        let mut e = Element::new("button")
            .attr("type", "button")
            .class("trellis-button")
            .attr("data-widget-id", node.id.as_str())
            .attr("data-variant", self.variant.as_str())
            .attr("data-size", self.size.as_str());
        if let Some(a) = &self.action {
            e = e.attr("data-action", a.as_str());
        }
        if let Some(p) = &self.action_payload {
            e = e.attr("data-action-payload", p.as_str());
        }
        if let Some(i) = &self.icon {
            e = e.attr("data-icon", i.as_str());
        }
        if self.block {
            e = e.style("width:100%;");
        }
        e.text(render::display_label(node)).into()
    }
}

/// Static text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    /// Typography.
    #[serde(flatten)]
    pub text: TextStyle,
}

impl WidgetKind for Label {
    const TAG: &'static str = "label";
    const LABEL_KEY: &'static str = "LBL_LABEL";
    const ICON: &'static str = "font-size";
    const CATEGORY: Category = Category::Basic;
}

impl Widget for Label {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let group = "PROP_GROUP_TEXT";
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::number("FontSize", "PROP_FONT_SIZE", Some(8.0), Some(72.0)).group(group),
            PropertyMeta::color("FontColor", "PROP_FONT_COLOR").group(group),
            PropertyMeta::text("FontFamily", "PROP_FONT_FAMILY").group(group),
            PropertyMeta::select(
                "FontWeight",
                "PROP_FONT_WEIGHT",
                &[("normal", "PROP_FONT_NORMAL"), ("bold", "PROP_FONT_BOLD")],
            )
            .group(group),
            PropertyMeta::select(
                "TextAlign",
                "PROP_TEXT_ALIGN",
                &[
                    ("left", "PROP_ALIGN_LEFT"),
                    ("center", "PROP_ALIGN_CENTER"),
                    ("right", "PROP_ALIGN_RIGHT"),
                ],
            )
            .group(group),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, _rt: &Runtime<'_>) -> Markup {
        Element::new("div")
            .class("trellis-label")
            .attr("data-widget-id", node.id.as_str())
            .style(self.text.css())
            .text(render::display_label(node))
            .into()
    }
}
