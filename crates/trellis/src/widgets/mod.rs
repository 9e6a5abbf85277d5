//! Built-in widget kinds.

/// Containers: section, panel, card, grid, frame, sub-form.
pub mod container;
/// Data-driven composites: data grid and the organization and role trees.
pub mod data;
/// Label and button.
pub mod display;
/// Data-entry controls.
pub mod input;
/// Tab containers and tabs.
pub mod tabs;

use serde::{Deserialize, Serialize};

use crate::registry::Registry;

/// One option of a choice control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListItem {
    /// Stored value.
    #[serde(alias = "Value")]
    pub value: String,
    /// Display text.
    #[serde(alias = "Label", alias = "text", alias = "Text")]
    pub label: String,
}

impl ListItem {
    /// An option.
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Register every built-in kind, in palette order.
pub fn register_builtins(r: &mut Registry) {
    r.register_kind::<input::Textbox>();
    r.register_kind::<input::Number>();
    r.register_kind::<input::Select>();
    r.register_kind::<input::Checkbox>();
    r.register_kind::<input::Radio>();
    r.register_kind::<input::Listbox>();
    r.register_kind::<input::Textarea>();
    r.register_kind::<input::Calendar>();
    r.register_kind::<display::Button>();
    r.register_kind::<display::Label>();

    r.register_kind::<container::Section>();
    r.register_kind::<container::Panel>();
    r.register_kind::<container::Card>();
    r.register_kind::<container::Grid>();
    r.register_kind::<container::Frame>();
    r.register_kind::<tabs::TabContainer>();
    r.register_kind::<tabs::Tab>();
    r.register_kind::<container::SubForm>();

    r.register_kind::<data::DataGrid>();
    r.register_kind::<data::OrganizationTree>();
    r.register_kind::<data::RolePermissionTree>();
    r.register_kind::<data::UserRoleAssignment>();
}
