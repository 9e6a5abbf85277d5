//! Composite kinds backed by external data. The engine knows their
//! configuration only; at runtime they render a host element carrying that
//! configuration as `data-*` attributes for the UI layer to populate.

use serde::{Deserialize, Serialize};

use crate::{
    markup::{Element, Markup},
    node::Node,
    property::{EditorKind, PropertyMeta, common},
    registry::{Category, WidgetKind},
    render::{self, Runtime},
    widget::Widget,
};

/// Host element for a data-driven composite.
fn host(node: &Node, class: &str, attrs: Vec<(&str, String)>) -> Markup {
    let mut e = Element::new("div")
        .class(class)
        .attr("data-widget-id", node.id.as_str())
        .attr("data-type", node.kind());
    for (k, v) in attrs {
        e = e.attr(&format!("data-{k}"), v);
    }
    e.child(
        Element::new("div")
            .class("trellis-field-label")
            .text(render::display_label(node)),
    )
    .into()
}

/// Boolean as an attribute value.
fn flag(on: bool) -> String {
    if on { "true" } else { "false" }.to_string()
}

/// Tabular list over a data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataGrid {
    /// Data set the rows come from.
    pub data_set_id: Option<i64>,
    /// Data source type of the data set.
    pub data_source_type: Option<String>,
    /// Entity type for entity-backed grids.
    pub entity_type: Option<String>,
    /// Endpoint for API-backed grids.
    pub api_endpoint: Option<String>,
    /// Column definitions as JSON.
    pub columns_json: Option<String>,
    /// Show the pager.
    pub show_pagination: bool,
    /// Rows per page.
    pub page_size: u32,
    /// Allow selecting several rows.
    pub allow_multi_select: bool,
    /// Show the search box.
    pub show_search: bool,
    /// Placeholder key of the search box.
    pub search_placeholder_key: Option<String>,
    /// Show the refresh button.
    pub show_refresh_button: bool,
    /// Bulk actions as JSON.
    pub bulk_actions_json: Option<String>,
    /// Per-row actions as JSON.
    pub row_actions_json: Option<String>,
    /// Initial sort field.
    pub default_sort_field: Option<String>,
    /// `asc` or `desc`.
    pub default_sort_direction: String,
    /// Fixed filters as JSON.
    pub filters_json: Option<String>,
    /// Draw cell borders.
    pub show_bordered: bool,
    /// `small`, `middle` or `large`.
    pub size: String,
    /// Text key shown when there are no rows.
    pub empty_text_key: Option<String>,
}

impl Default for DataGrid {
    fn default() -> Self {
        Self {
            data_set_id: None,
            data_source_type: None,
            entity_type: None,
            api_endpoint: None,
            columns_json: None,
            show_pagination: true,
            page_size: 20,
            allow_multi_select: false,
            show_search: false,
            search_placeholder_key: None,
            show_refresh_button: true,
            bulk_actions_json: None,
            row_actions_json: None,
            default_sort_field: None,
            default_sort_direction: "asc".into(),
            filters_json: None,
            show_bordered: true,
            size: "middle".into(),
            empty_text_key: None,
        }
    }
}

impl WidgetKind for DataGrid {
    const TAG: &'static str = "datagrid";
    const LABEL_KEY: &'static str = "LBL_DATAGRID";
    const ICON: &'static str = "table";
    const CATEGORY: Category = Category::Data;
}

impl Widget for DataGrid {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::new("DataSetId", "PROP_DATASET", EditorKind::DataSetPicker),
            PropertyMeta::text("EntityType", "PROP_ENTITY_TYPE"),
            PropertyMeta::new("ColumnsJson", "PROP_COLUMNS", EditorKind::Json),
            PropertyMeta::boolean("ShowPagination", "PROP_SHOW_PAGINATION"),
            PropertyMeta::number("PageSize", "PROP_PAGE_SIZE", Some(1.0), Some(500.0))
                .visible_when("ShowPagination", true),
            PropertyMeta::boolean("AllowMultiSelect", "PROP_ALLOW_MULTISELECT"),
            PropertyMeta::boolean("ShowSearch", "PROP_SHOW_SEARCH"),
            PropertyMeta::text("DefaultSortField", "PROP_DEFAULT_SORT_FIELD"),
            PropertyMeta::select(
                "DefaultSortDirection",
                "PROP_DEFAULT_SORT_DIR",
                &[("asc", "PROP_SORT_ASC"), ("desc", "PROP_SORT_DESC")],
            ),
            PropertyMeta::select(
                "Size",
                "PROP_TABLE_SIZE",
                &[
                    ("small", "PROP_SIZE_SMALL"),
                    ("middle", "PROP_SIZE_MIDDLE"),
                    ("large", "PROP_SIZE_LARGE"),
                ],
            ),
            PropertyMeta::boolean("ShowBordered", "PROP_SHOW_BORDERED"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, _rt: &Runtime<'_>) -> Markup {
        let mut attrs = vec![
            ("page-size", self.page_size.to_string()),
            ("pagination", flag(self.show_pagination)),
            ("search", flag(self.show_search)),
            ("multi-select", flag(self.allow_multi_select)),
            ("sort-direction", self.default_sort_direction.clone()),
            ("size", self.size.clone()),
        ];
        if let Some(id) = self.data_set_id {
            attrs.push(("dataset", id.to_string()));
        }
        if let Some(e) = &self.entity_type {
            attrs.push(("entity", e.clone()));
        }
        if let Some(f) = &self.default_sort_field {
            attrs.push(("sort-field", f.clone()));
        }
        host(node, "trellis-datagrid", attrs)
    }
}

/// Organization hierarchy browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationTree {
    /// Allow selecting several nodes.
    pub allow_multi_select: bool,
    /// Show the search box.
    pub show_search: bool,
    /// Placeholder key of the search box.
    pub search_placeholder_key: Option<String>,
    /// Allow re-parenting by drag and drop.
    pub allow_drag_drop: bool,
    /// Show per-node actions.
    pub show_node_actions: bool,
    /// Per-node actions as JSON.
    pub node_actions_json: Option<String>,
    /// Load children on expand.
    pub lazy_load: bool,
    /// Levels expanded initially.
    pub default_expand_level: u32,
    /// Show the root node.
    pub show_root_node: bool,
    /// Label key of the root node.
    pub root_node_label_key: Option<String>,
    /// Field holding the node icon.
    pub node_icon_field: Option<String>,
    /// Show the path of the selected node.
    pub show_node_path: bool,
    /// Action dispatched when the selection changes.
    pub on_select_change_action: Option<String>,
}

impl Default for OrganizationTree {
    fn default() -> Self {
        Self {
            allow_multi_select: false,
            show_search: true,
            search_placeholder_key: None,
            allow_drag_drop: false,
            show_node_actions: true,
            node_actions_json: None,
            lazy_load: false,
            default_expand_level: 1,
            show_root_node: true,
            root_node_label_key: None,
            node_icon_field: None,
            show_node_path: false,
            on_select_change_action: None,
        }
    }
}

impl WidgetKind for OrganizationTree {
    const TAG: &'static str = "orgtree";
    const ALIASES: &'static [&'static str] = &["organizationtree"];
    const LABEL_KEY: &'static str = "LBL_ORGTREE";
    const ICON: &'static str = "apartment";
    const CATEGORY: Category = Category::Data;
}

impl Widget for OrganizationTree {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::boolean("AllowMultiSelect", "PROP_ALLOW_MULTISELECT"),
            PropertyMeta::boolean("ShowSearch", "PROP_SHOW_SEARCH"),
            PropertyMeta::boolean("AllowDragDrop", "PROP_ALLOW_DRAG_DROP"),
            PropertyMeta::boolean("ShowNodeActions", "PROP_SHOW_NODE_ACTIONS"),
            PropertyMeta::boolean("LazyLoad", "PROP_LAZY_LOAD"),
            PropertyMeta::number("DefaultExpandLevel", "PROP_DEFAULT_EXPAND_LEVEL", Some(0.0), Some(10.0)),
            PropertyMeta::boolean("ShowRootNode", "PROP_SHOW_ROOT_NODE"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, _rt: &Runtime<'_>) -> Markup {
        host(
            node,
            "trellis-orgtree",
            vec![
                ("search", flag(self.show_search)),
                ("multi-select", flag(self.allow_multi_select)),
                ("drag-drop", flag(self.allow_drag_drop)),
                ("expand-level", self.default_expand_level.to_string()),
                ("lazy", flag(self.lazy_load)),
            ],
        )
    }
}

/// Feature permission tree of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolePermissionTree {
    /// Record field holding the role id.
    pub role_id_field: Option<String>,
    /// Show the search box.
    pub show_search: bool,
    /// Placeholder key of the search box.
    pub search_placeholder_key: Option<String>,
    /// Show a select-all toggle.
    pub show_select_all: bool,
    /// Show an expand-all toggle.
    pub show_expand_all: bool,
    /// Show node icons.
    pub show_node_icons: bool,
    /// Show template bindings under each function.
    pub show_template_bindings: bool,
    /// Levels expanded initially.
    pub default_expand_level: u32,
    /// Refuse changes.
    pub read_only: bool,
    /// Selecting a node selects its descendants.
    pub cascade_select: bool,
    /// Action dispatched when permissions change.
    pub on_permission_change_action: Option<String>,
    /// Show selection statistics.
    pub show_statistics: bool,
}

impl Default for RolePermissionTree {
    fn default() -> Self {
        Self {
            role_id_field: None,
            show_search: true,
            search_placeholder_key: None,
            show_select_all: true,
            show_expand_all: true,
            show_node_icons: true,
            show_template_bindings: false,
            default_expand_level: 1,
            read_only: false,
            cascade_select: true,
            on_permission_change_action: None,
            show_statistics: false,
        }
    }
}

impl WidgetKind for RolePermissionTree {
    const TAG: &'static str = "permtree";
    const ALIASES: &'static [&'static str] = &["rolepermissiontree"];
    const LABEL_KEY: &'static str = "LBL_PERMTREE";
    const ICON: &'static str = "safety";
    const CATEGORY: Category = Category::Data;
}

impl Widget for RolePermissionTree {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("RoleIdField", "PROP_ROLE_ID_FIELD"),
            PropertyMeta::boolean("ShowSearch", "PROP_SHOW_SEARCH"),
            PropertyMeta::boolean("ShowSelectAll", "PROP_SHOW_SELECT_ALL"),
            PropertyMeta::boolean("ShowExpandAll", "PROP_SHOW_EXPAND_ALL"),
            PropertyMeta::boolean("ShowNodeIcons", "PROP_SHOW_NODE_ICONS"),
            PropertyMeta::boolean("ShowTemplateBindings", "PROP_SHOW_TEMPLATE_BINDINGS"),
            PropertyMeta::number("DefaultExpandLevel", "PROP_DEFAULT_EXPAND_LEVEL", Some(0.0), Some(10.0)),
            PropertyMeta::boolean("ReadOnly", "PROP_READ_ONLY"),
            PropertyMeta::boolean("CascadeSelect", "PROP_CASCADE_SELECT"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, _rt: &Runtime<'_>) -> Markup {
        let mut attrs = vec![
            ("search", flag(self.show_search)),
            ("cascade", flag(self.cascade_select)),
            ("readonly", flag(self.read_only)),
            ("expand-level", self.default_expand_level.to_string()),
        ];
        if let Some(f) = &self.role_id_field {
            attrs.push(("role-field", f.clone()));
        }
        host(node, "trellis-permtree", attrs)
    }
}

/// Role assignment of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRoleAssignment {
    /// Record field holding the user id.
    pub user_id_field: Option<String>,
    /// Show the search box.
    pub show_search: bool,
    /// Show a select-all toggle.
    pub show_select_all: bool,
    /// List the roles currently held.
    pub show_current_roles: bool,
    /// Refuse changes.
    pub read_only: bool,
    /// Action dispatched when roles change.
    pub on_role_change_action: Option<String>,
    /// Show the organization scope of each role.
    pub show_organization_scope: bool,
}

impl Default for UserRoleAssignment {
    fn default() -> Self {
        Self {
            user_id_field: None,
            show_search: true,
            show_select_all: true,
            show_current_roles: true,
            read_only: false,
            on_role_change_action: None,
            show_organization_scope: true,
        }
    }
}

impl WidgetKind for UserRoleAssignment {
    const TAG: &'static str = "userrole";
    const ALIASES: &'static [&'static str] = &["userroleassignment"];
    const LABEL_KEY: &'static str = "LBL_USERROLE";
    const ICON: &'static str = "user-switch";
    const CATEGORY: Category = Category::Data;
}

impl Widget for UserRoleAssignment {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::text("UserIdField", "PROP_USER_ID_FIELD"),
            PropertyMeta::boolean("ShowSearch", "PROP_SHOW_SEARCH"),
            PropertyMeta::boolean("ShowSelectAll", "PROP_SHOW_SELECT_ALL"),
            PropertyMeta::boolean("ShowCurrentRoles", "PROP_SHOW_CURRENT_ROLES"),
            PropertyMeta::boolean("ShowOrganizationScope", "PROP_SHOW_ORGANIZATION_SCOPE"),
            PropertyMeta::boolean("ReadOnly", "PROP_READ_ONLY"),
        ]);
        props
    }

    fn render_runtime(&self, node: &Node, _rt: &Runtime<'_>) -> Markup {
        let mut attrs = vec![
            ("search", flag(self.show_search)),
            ("current-roles", flag(self.show_current_roles)),
            ("org-scope", flag(self.show_organization_scope)),
            ("readonly", flag(self.read_only)),
        ];
        if let Some(f) = &self.user_id_field {
            attrs.push(("user-field", f.clone()));
        }
        host(node, "trellis-userrole", attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{binding::EditValues, render::RenderMode};

    #[test]
    fn grid_host_attributes() {
        let n = Node::new(DataGrid {
            data_set_id: Some(7),
            ..DataGrid::default()
        });
        let values = EditValues::new();
        let m = render::render_runtime(&n, &Runtime::new(RenderMode::Browse, &values));
        let e = m.element().unwrap();
        assert_eq!(e.attr_value("data-dataset"), Some("7"));
        assert_eq!(e.attr_value("data-page-size"), Some("20"));
        assert!(!n.can_edit_property("DataField"));
    }
}
