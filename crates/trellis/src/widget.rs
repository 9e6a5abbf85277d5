//! The widget trait and its object-safety helpers.

use std::{any::Any, fmt::Debug};

use serde_json::Value;

use crate::{
    error::Result,
    fields::FieldSet,
    layout::{ContainerLayout, LayoutOptions},
    markup::Markup,
    node::Node,
    property::{self, PropertyMeta},
    render::{self, Runtime},
};

/// Behaviour of one widget kind. A node owns a boxed `Widget` holding the
/// kind-specific fields; everything common to all kinds lives on the node.
///
/// Kind-specific fields are exposed through the [`FieldSet`] supertrait,
/// which every serde record with a `Default` gets for free.
pub trait Widget: FieldSet + WidgetObject + Debug + Send + Sync {
    /// Canonical type tag.
    fn kind(&self) -> &'static str;

    /// Prefix for generated codes; defaults to the type tag.
    fn code_prefix(&self) -> &'static str {
        self.kind()
    }

    /// Can this kind hold children?
    fn is_container(&self) -> bool {
        false
    }

    /// Can a node of `kind` be placed directly inside this one? Tabs belong
    /// to tab containers only.
    fn accepts_child(&self, kind: &str) -> bool {
        self.is_container() && kind != "tab"
    }

    /// How this container arranges its children, if it has an explicit
    /// container layout.
    fn container_layout(&self) -> Option<&ContainerLayout> {
        None
    }

    /// Mutable access to the container layout.
    fn container_layout_mut(&mut self) -> Option<&mut ContainerLayout> {
        None
    }

    /// Does this kind read and write a bound record value?
    fn binds_value(&self) -> bool {
        false
    }

    /// Is input refused even in edit mode?
    fn read_only(&self) -> bool {
        false
    }

    /// May the property `name` (normalized camelCase, first path segment) be
    /// edited? Kinds that bind no value refuse `dataField`.
    fn can_edit_property(&self, name: &str) -> bool {
        name != "dataField" || self.binds_value()
    }

    /// Ordered property descriptors for an editor.
    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        property::common(node.max_width())
    }

    /// Minimum height in the designer, so empty containers stay droppable.
    fn design_min_height(&self) -> i32 {
        if self.is_container() { 100 } else { 32 }
    }

    /// Adjust the flow size of a freshly constructed node. Only the width,
    /// height and their units may be touched here.
    fn initial_layout(&self, _layout: &mut LayoutOptions) {}

    /// Convert raw user input into the value stored in the bound record.
    fn parse_input(&self, raw: &str) -> Result<Value> {
        Ok(Value::String(raw.to_string()))
    }

    /// Design-time placeholder.
    fn render_design(&self, node: &Node) -> Markup {
        if self.is_container() {
            render::design_container(node, node.children.iter())
        } else {
            render::design_placeholder(node)
        }
    }

    /// Runtime rendering.
    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        if self.is_container() {
            render::runtime_container(node, node.children.iter(), rt)
        } else {
            render::runtime_field(node, rt, render::text_input(node, rt, "text"))
        }
    }
}

/// Object helpers implemented for every cloneable widget.
pub trait WidgetObject {
    /// Clone into a new box.
    fn clone_box(&self) -> Box<dyn Widget>;
    /// Upcast for downcasting to a concrete kind.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<W> WidgetObject for W
where
    W: Widget + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn Widget> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
