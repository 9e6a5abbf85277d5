use serde::{Deserialize, Serialize};

use crate::{
    layout::{ContainerLayout, HeightUnit, LayoutOptions, WidthUnit},
    markup::{Element, Markup},
    node::Node,
    property::{self, PropertyMeta, common},
    registry::{Category, WidgetKind},
    render::{self, ContainerShell, RenderMode, Runtime},
    style::{ShadowLevel, StyleOptions},
    widget::Widget,
};

/// Title shown in a container header, if any.
fn title_text(title: Option<&String>, show: bool) -> Option<String> {
    title.filter(|t| show && !t.trim().is_empty()).cloned()
}

/// Full-width flow placement shared by the page-level containers.
fn full_width(layout: &mut LayoutOptions) {
    layout.width = 100;
    layout.width_unit = WidthUnit::Percent;
}

/// A titled block of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    /// Internal layout.
    pub container_layout: ContainerLayout,
    /// Heading text.
    pub title: Option<String>,
    /// Show the heading.
    pub show_title: bool,
    /// Offer a collapse toggle.
    pub collapsible: bool,
    /// Start collapsed.
    pub collapsed: bool,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            container_layout: ContainerLayout::section(),
            title: None,
            show_title: false,
            collapsible: false,
            collapsed: false,
        }
    }
}

impl WidgetKind for Section {
    const TAG: &'static str = "section";
    const ALIASES: &'static [&'static str] = &["block"];
    const LABEL_KEY: &'static str = "LBL_SECTION";
    const ICON: &'static str = "layout";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for Section {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn container_layout(&self) -> Option<&ContainerLayout> {
        Some(&self.container_layout)
    }

    fn container_layout_mut(&mut self) -> Option<&mut ContainerLayout> {
        Some(&mut self.container_layout)
    }

    fn initial_layout(&self, layout: &mut LayoutOptions) {
        full_width(layout);
        layout.height = 200;
        layout.height_unit = HeightUnit::Px;
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("Title", "PROP_TITLE"),
            PropertyMeta::boolean("ShowTitle", "PROP_SHOW_TITLE"),
            PropertyMeta::boolean("Collapsible", "PROP_COLLAPSIBLE"),
            PropertyMeta::boolean("Collapsed", "PROP_COLLAPSED_DEFAULT")
                .visible_when("Collapsible", true),
        ]);
        props.extend(property::container_layout("#f5f5f5"));
        props
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let mut shell = render::runtime_shell(node)
            .header(title_text(self.title.as_ref(), self.show_title));
        if self.collapsible && self.collapsed {
            shell = shell.body_style(format!("{}; display: none", self.container_layout.css()));
        }
        render::runtime_children(shell, node.children.iter(), rt)
    }
}

/// A plain bordered panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Panel {
    /// Internal layout.
    pub container_layout: ContainerLayout,
    /// Heading text.
    pub title: Option<String>,
}

impl WidgetKind for Panel {
    const TAG: &'static str = "panel";
    const LABEL_KEY: &'static str = "LBL_PANEL";
    const ICON: &'static str = "border";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn container_layout(&self) -> Option<&ContainerLayout> {
        Some(&self.container_layout)
    }

    fn container_layout_mut(&mut self) -> Option<&mut ContainerLayout> {
        Some(&mut self.container_layout)
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.push(PropertyMeta::text("Title", "PROP_TITLE"));
        props.extend(property::container_layout("#ffffff"));
        props
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let shell = render::runtime_shell(node)
            .header(title_text(self.title.as_ref(), true))
            .style(StyleOptions::panel().css());
        render::runtime_children(shell, node.children.iter(), rt)
    }
}

/// A card with an optional header bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    /// Internal layout.
    pub container_layout: ContainerLayout,
    /// Header text.
    pub title: Option<String>,
    /// Show the header bar.
    pub show_title: bool,
    /// Offer a collapse toggle.
    pub collapsible: bool,
    /// Start expanded.
    pub default_expanded: bool,
    /// Header bar background.
    pub header_background_color: Option<String>,
    /// Raise the card with a shadow.
    pub show_shadow: bool,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            container_layout: ContainerLayout::card(),
            title: None,
            show_title: true,
            collapsible: false,
            default_expanded: true,
            header_background_color: Some("#fafafa".into()),
            show_shadow: false,
        }
    }
}

impl Card {
    /// Outer card style: the card preset, raised only when asked. Padding
    /// belongs to the body.
    fn outer_style(&self) -> String {
        let style = StyleOptions {
            padding: 0,
            shadow: if self.show_shadow { ShadowLevel::Small } else { ShadowLevel::None },
            ..StyleOptions::card()
        };
        format!("width:100%; overflow:hidden; {}", style.css())
    }

    /// Apply the card chrome to a shell.
    fn dress<'a>(&self, shell: ContainerShell<'a>) -> ContainerShell<'a> {
        let mut shell = shell
            .header(title_text(self.title.as_ref(), self.show_title))
            .style(self.outer_style());
        if self.collapsible && !self.default_expanded {
            shell = shell.body_style(format!("{}; display: none", self.container_layout.css()));
        }
        shell
    }
}

impl WidgetKind for Card {
    const TAG: &'static str = "card";
    const LABEL_KEY: &'static str = "LBL_CARD";
    const ICON: &'static str = "credit-card";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for Card {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn container_layout(&self) -> Option<&ContainerLayout> {
        Some(&self.container_layout)
    }

    fn container_layout_mut(&mut self) -> Option<&mut ContainerLayout> {
        Some(&mut self.container_layout)
    }

    fn initial_layout(&self, layout: &mut LayoutOptions) {
        full_width(layout);
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("Title", "PROP_TITLE"),
            PropertyMeta::boolean("ShowTitle", "PROP_SHOW_TITLE"),
            PropertyMeta::boolean("Collapsible", "PROP_COLLAPSIBLE"),
            PropertyMeta::boolean("DefaultExpanded", "PROP_DEFAULT_EXPANDED")
                .visible_when("Collapsible", true),
            PropertyMeta::color("HeaderBackgroundColor", "PROP_HEADER_BACKGROUND"),
            PropertyMeta::boolean("ShowShadow", "PROP_SHOW_SHADOW").group("PROP_GROUP_STYLE"),
        ]);
        props.extend(property::container_layout("#ffffff"));
        props
    }

    fn render_design(&self, node: &Node) -> Markup {
        let shell = self.dress(render::design_shell(node));
        render::design_children(shell, node.children.iter())
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let shell = self.dress(render::runtime_shell(node));
        render::runtime_children(shell, node.children.iter(), rt)
    }
}

/// Children arranged in equal columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Grid {
    /// Internal layout; its gap and padding apply to the grid.
    pub container_layout: ContainerLayout,
    /// Number of columns.
    pub columns: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            container_layout: ContainerLayout::default(),
            columns: 2,
        }
    }
}

impl Grid {
    /// Body style: a CSS grid in place of the flow box.
    fn body_style(&self) -> String {
        let l = &self.container_layout;
        format!(
            "display: grid; grid-template-columns: repeat({}, minmax(0, 1fr)); gap: {}px; \
             padding: {}px; background-color: {}; border-radius: {}px; \
             position: relative; min-height: 60px",
            self.columns.max(1),
            l.gap,
            l.padding,
            l.background_color,
            l.border_radius
        )
    }
}

impl WidgetKind for Grid {
    const TAG: &'static str = "grid";
    const LABEL_KEY: &'static str = "LBL_GRID";
    const ICON: &'static str = "appstore";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for Grid {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn container_layout(&self) -> Option<&ContainerLayout> {
        Some(&self.container_layout)
    }

    fn container_layout_mut(&mut self) -> Option<&mut ContainerLayout> {
        Some(&mut self.container_layout)
    }

    fn initial_layout(&self, layout: &mut LayoutOptions) {
        full_width(layout);
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.push(PropertyMeta::number("Columns", "PROP_COLUMNS", Some(1.0), Some(12.0)));
        props.extend(property::container_layout("#ffffff"));
        props
    }

    fn render_design(&self, node: &Node) -> Markup {
        let shell = render::design_shell(node).body_style(self.body_style());
        render::design_children(shell, node.children.iter())
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let shell = render::runtime_shell(node).body_style(self.body_style());
        render::runtime_children(shell, node.children.iter(), rt)
    }
}

/// A decorative frame with its own border settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Frame {
    /// Border line style.
    pub border_style: String,
    /// Border colour.
    pub border_color: String,
    /// Border width in pixels.
    pub border_width: i32,
    /// Background colour.
    pub background_color: String,
    /// Inner padding in pixels.
    pub padding: i32,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            border_style: "solid".into(),
            border_color: "#d9d9d9".into(),
            border_width: 2,
            background_color: "#fafafa".into(),
            padding: 8,
        }
    }
}

impl Frame {
    /// Body style built from the frame's own fields.
    fn body_style(&self) -> String {
        format!(
            "display: flex; flex-wrap: wrap; gap: 8px; padding: {}px; background-color: {}; \
             border: {}px {} {}; position: relative; min-height: 60px",
            self.padding, self.background_color, self.border_width, self.border_style, self.border_color
        )
    }
}

impl WidgetKind for Frame {
    const TAG: &'static str = "frame";
    const LABEL_KEY: &'static str = "LBL_FRAME";
    const ICON: &'static str = "border-outer";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for Frame {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::select(
                "BorderStyle",
                "PROP_BORDER_STYLE",
                &[
                    ("solid", "PROP_BORDER_SOLID"),
                    ("dashed", "PROP_BORDER_DASHED"),
                    ("dotted", "PROP_BORDER_DOTTED"),
                ],
            ),
            PropertyMeta::color("BorderColor", "PROP_BORDER_COLOR"),
            PropertyMeta::number("BorderWidth", "PROP_BORDER_WIDTH", Some(0.0), Some(10.0)),
            PropertyMeta::color("BackgroundColor", "PROP_BACKGROUND_COLOR"),
            PropertyMeta::number("Padding", "PROP_PADDING", Some(0.0), Some(48.0)),
        ]);
        props
    }

    fn render_design(&self, node: &Node) -> Markup {
        let shell = render::design_shell(node).body_style(self.body_style());
        render::design_children(shell, node.children.iter())
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let shell = render::runtime_shell(node).body_style(self.body_style());
        render::runtime_children(shell, node.children.iter(), rt)
    }
}

/// An embedded list of related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubForm {
    /// Internal layout.
    pub container_layout: ContainerLayout,
    /// Entity type of the related records.
    pub related_entity_type: Option<String>,
    /// Field of the related entity that points at the master record.
    pub foreign_key_field: Option<String>,
    /// Template used to render each related record.
    pub embedded_template_id: Option<i64>,
    /// Allow adding records.
    pub allow_add: bool,
    /// Allow editing records.
    pub allow_edit: bool,
    /// Allow deleting records.
    pub allow_delete: bool,
    /// `table` or `card`.
    pub display_mode: String,
    /// Maximum number of records; zero means unlimited.
    pub max_items: u32,
    /// Show the add/edit/delete toolbar.
    pub show_toolbar: bool,
    /// Heading text.
    pub title: Option<String>,
    /// Show the heading.
    pub show_title: bool,
}

impl Default for SubForm {
    fn default() -> Self {
        Self {
            container_layout: ContainerLayout::subform(),
            related_entity_type: None,
            foreign_key_field: None,
            embedded_template_id: None,
            allow_add: true,
            allow_edit: true,
            allow_delete: true,
            display_mode: "table".into(),
            max_items: 0,
            show_toolbar: true,
            title: None,
            show_title: true,
        }
    }
}

impl SubForm {
    /// Toolbar with one button per allowed action.
    fn toolbar(&self) -> Markup {
        let actions = [
            (self.allow_add, "add"),
            (self.allow_edit, "edit"),
            (self.allow_delete, "delete"),
        ];
        Element::new("div")
            .class("trellis-subform-toolbar")
            .style("display:flex; gap:8px; margin-bottom:8px;")
            .children(actions.iter().filter(|(on, _)| *on).map(|(_, a)| {
                Markup::from(
                    Element::new("button")
                        .attr("type", "button")
                        .attr("data-action", *a)
                        .text(*a),
                )
            }))
            .into()
    }

    /// Summary of the configured relation.
    fn relation(&self) -> Markup {
        let entity = self.related_entity_type.as_deref().unwrap_or("-");
        let key = self.foreign_key_field.as_deref().unwrap_or("-");
        Element::new("div")
            .class("trellis-subform-relation")
            .style("font-size:12px; color:#999;")
            .attr("data-entity", entity)
            .attr("data-foreign-key", key)
            .attr("data-display-mode", self.display_mode.as_str())
            .text(format!("{entity} ({key})"))
            .into()
    }
}

impl WidgetKind for SubForm {
    const TAG: &'static str = "subform";
    const LABEL_KEY: &'static str = "LBL_SUBFORM";
    const ICON: &'static str = "table";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for SubForm {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn container_layout(&self) -> Option<&ContainerLayout> {
        Some(&self.container_layout)
    }

    fn container_layout_mut(&mut self) -> Option<&mut ContainerLayout> {
        Some(&mut self.container_layout)
    }

    fn initial_layout(&self, layout: &mut LayoutOptions) {
        full_width(layout);
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let group = "PROP_GROUP_DATA";
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("Title", "PROP_TITLE"),
            PropertyMeta::boolean("ShowTitle", "PROP_SHOW_TITLE"),
            PropertyMeta::text("RelatedEntityType", "PROP_RELATED_ENTITY").group(group),
            PropertyMeta::text("ForeignKeyField", "PROP_FOREIGN_KEY").group(group),
            PropertyMeta::number("EmbeddedTemplateId", "PROP_TEMPLATE", Some(0.0), None)
                .group(group),
            PropertyMeta::select(
                "DisplayMode",
                "PROP_DISPLAY_MODE",
                &[("table", "PROP_MODE_TABLE"), ("card", "PROP_MODE_CARD")],
            ),
            PropertyMeta::number("MaxItems", "PROP_MAX_ITEMS", Some(0.0), None),
            PropertyMeta::boolean("ShowToolbar", "PROP_SHOW_TOOLBAR"),
            PropertyMeta::boolean("AllowAdd", "PROP_ALLOW_ADD").visible_when("ShowToolbar", true),
            PropertyMeta::boolean("AllowEdit", "PROP_ALLOW_EDIT").visible_when("ShowToolbar", true),
            PropertyMeta::boolean("AllowDelete", "PROP_ALLOW_DELETE")
                .visible_when("ShowToolbar", true),
        ]);
        props.extend(property::container_layout("#f5f5f5"));
        props
    }

    fn render_design(&self, node: &Node) -> Markup {
        let shell = render::design_shell(node)
            .header(Some(
                title_text(self.title.as_ref(), self.show_title)
                    .unwrap_or_else(|| render::display_label(node)),
            ))
            .prelude(self.relation());
        render::design_children(shell, node.children.iter())
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let mut shell = render::runtime_shell(node)
            .header(title_text(self.title.as_ref(), self.show_title));
        if rt.mode == RenderMode::Edit && self.show_toolbar {
            shell = shell.prelude(self.toolbar());
        }
        render::runtime_children(shell, node.children.iter(), rt)
    }
}
