//! Design-time and runtime rendering.
//!
//! Rendering reads the tree and produces [`Markup`]; it never mutates nodes.
//! Each kind decides how it renders through [`Widget`](crate::Widget); the
//! helpers here hold the chrome shared between kinds, most importantly the
//! [`ContainerShell`] every container kind renders through.

use serde_json::Value;

use crate::{
    binding::ValueBinding,
    layout::ContainerLayout,
    markup::{Element, Markup},
    node::Node,
    style,
    tree::Form,
};

/// Runtime rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Values are displayed read-only.
    #[default]
    Browse,
    /// Values are editable inputs.
    Edit,
}

/// Everything a runtime render needs besides the node.
pub struct Runtime<'a> {
    /// Browse or edit.
    pub mode: RenderMode,
    /// Source of bound values.
    pub values: &'a dyn ValueBinding,
}

impl<'a> Runtime<'a> {
    /// A runtime context.
    pub fn new(mode: RenderMode, values: &'a dyn ValueBinding) -> Self {
        Self { mode, values }
    }

    /// The bound value of a node.
    pub fn value(&self, node: &Node) -> Option<Value> {
        self.values.value(node.binding_key())
    }
}

/// Render one node for the designer.
pub fn render_design(node: &Node) -> Markup {
    node.widget().render_design(node)
}

/// Render one node at runtime. Hidden nodes render nothing.
pub fn render_runtime(node: &Node, rt: &Runtime<'_>) -> Markup {
    if !node.visible {
        return Markup::Empty;
    }
    node.widget().render_runtime(node, rt)
}

/// Render a whole form for the designer.
pub fn design_form(form: &Form) -> Markup {
    Element::new("div")
        .class("trellis-canvas")
        .style("display:flex; flex-wrap:wrap; align-content:flex-start; position:relative;")
        .children(flow_items(form.widgets.iter(), |n| {
            wrap(n, render_design(n), style::design_style(n, false), None)
        }))
        .into()
}

/// Render a whole form at runtime.
pub fn runtime_form(form: &Form, rt: &Runtime<'_>) -> Markup {
    Element::new("div")
        .class("trellis-form")
        .style("display:flex; flex-wrap:wrap; gap:8px; position:relative;")
        .children(flow_items(form.widgets.iter().filter(|n| n.visible), |n| {
            wrap(n, render_runtime(n, rt), style::runtime_style(n, rt.mode), None)
        }))
        .into()
}

/// Lay out items in flow order, inserting a row break before every item that
/// asks for one.
fn flow_items<'a>(
    nodes: impl Iterator<Item = &'a Node>,
    mut item: impl FnMut(&'a Node) -> Markup,
) -> Vec<Markup> {
    let mut out = Vec::new();
    for n in nodes {
        if n.layout.breaks_row() {
            out.push(row_break());
        }
        out.push(item(n));
    }
    out
}

/// A zero-height, full-width flex item.
fn row_break() -> Markup {
    Element::new("div")
        .class("trellis-flow-break")
        .style("flex-basis:100%; height:0;")
        .into()
}

/// Wrap rendered content in a positioned item.
fn wrap(node: &Node, content: Markup, style: String, label: Option<String>) -> Markup {
    let mut e = Element::new("div")
        .attr("data-widget-id", node.id.as_str())
        .style(style);
    if let Some(l) = label {
        e = e.attr("aria-label", l);
    }
    e.child(content).into()
}

/// Shared chrome for container kinds: a header, a body styled by the
/// container layout, and one wrapper per child. What the children are, and how
/// each is rendered, labelled and styled, is supplied by the caller.
pub struct ContainerShell<'a> {
    /// The container being rendered.
    node: &'a Node,
    /// Class of the outer element.
    class: &'static str,
    /// Style of the outer element.
    style: Option<String>,
    /// Header text; `None` omits the header.
    header: Option<String>,
    /// Style of the body element.
    body_style: String,
    /// Extra content placed between header and body.
    prelude: Vec<Markup>,
    /// Shown when there are no children.
    empty: Option<Markup>,
}

impl<'a> ContainerShell<'a> {
    /// A shell for `node` whose body follows the node's container layout.
    pub fn new(node: &'a Node, class: &'static str) -> Self {
        let body_style = node
            .widget()
            .container_layout()
            .map_or_else(|| ContainerLayout::default().css(), ContainerLayout::css);
        Self {
            node,
            class,
            style: None,
            header: None,
            body_style,
            prelude: Vec::new(),
            empty: None,
        }
    }

    /// Style the outer element.
    pub fn style(mut self, style: String) -> Self {
        self.style = Some(style);
        self
    }

    /// Set the header text.
    pub fn header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    /// Replace the body style.
    pub fn body_style(mut self, style: String) -> Self {
        self.body_style = style;
        self
    }

    /// Insert content between header and body.
    pub fn prelude(mut self, m: Markup) -> Self {
        self.prelude.push(m);
        self
    }

    /// Content shown in place of an empty child list.
    pub fn empty(mut self, m: Markup) -> Self {
        self.empty = Some(m);
        self
    }

    /// Render the shell.
    pub fn render<'c>(
        self,
        children: impl Iterator<Item = &'c Node>,
        render_child: &dyn Fn(&Node) -> Markup,
        child_label: &dyn Fn(&Node) -> Option<String>,
        child_style: &dyn Fn(&Node) -> String,
    ) -> Markup {
        let mut items = flow_items(children, |c| {
            wrap(c, render_child(c), child_style(c), child_label(c))
        });
        if items.is_empty() {
            items.extend(self.empty);
        }
        let header = self
            .header
            .map(|h| Element::new("div").class("trellis-container-header").text(h));
        let mut e = Element::new("div")
            .class(self.class)
            .attr("data-widget-id", self.node.id.as_str())
            .attr("data-type", self.node.kind());
        if let Some(s) = self.style {
            e = e.style(s);
        }
        if let Some(h) = header {
            e = e.child(h);
        }
        e.children(self.prelude)
            .child(
                Element::new("div")
                    .class("trellis-container-body")
                    .style(self.body_style)
                    .children(items),
            )
            .into()
    }
}

/// The label shown for a node: its label, falling back to its type.
pub fn display_label(node: &Node) -> String {
    if node.label.trim().is_empty() {
        node.kind().to_string()
    } else {
        node.label.clone()
    }
}

/// Design-time placeholder for a leaf: a bordered box with the label and a
/// type badge, no live control.
pub fn design_placeholder(node: &Node) -> Markup {
    Element::new("div")
        .class("trellis-design-widget")
        .attr("data-widget-id", node.id.as_str())
        .attr("data-type", node.kind())
        .style(format!(
            "border:1px dashed #d9d9d9; padding:4px 8px; min-height:{}px; box-sizing:border-box;",
            node.design_min_height()
        ))
        .child(Element::new("span").class("trellis-design-label").text(display_label(node)))
        .child(Element::new("span").class("trellis-kind-badge").text(node.kind()))
        .into()
}

/// Drop target shown inside empty containers in the designer.
pub fn drop_hint() -> Markup {
    Element::new("div")
        .class("trellis-drop-hint")
        .style("flex:1 1 100%; min-height:60px; color:#999;")
        .text("Drop widgets here")
        .into()
}

/// The designer shell of a container, headed by its label.
pub fn design_shell(node: &Node) -> ContainerShell<'_> {
    ContainerShell::new(node, "trellis-design-container")
        .header(Some(display_label(node)))
        .empty(drop_hint())
}

/// Render designer children through a configured shell.
pub fn design_children<'c>(
    shell: ContainerShell<'_>,
    children: impl Iterator<Item = &'c Node>,
) -> Markup {
    shell.render(
        children,
        &render_design,
        &|c| Some(display_label(c)),
        &|c| style::nested_style(c, false),
    )
}

/// Design-time rendering of a container over the given children.
pub fn design_container<'c>(node: &Node, children: impl Iterator<Item = &'c Node>) -> Markup {
    design_children(design_shell(node), children)
}

/// The runtime shell of a container, headed by its label when it has one.
pub fn runtime_shell(node: &Node) -> ContainerShell<'_> {
    let header = (!node.label.trim().is_empty()).then(|| node.label.clone());
    ContainerShell::new(node, "trellis-runtime-container").header(header)
}

/// Render runtime children through a configured shell. Hidden children are
/// skipped.
pub fn runtime_children<'c>(
    shell: ContainerShell<'_>,
    children: impl Iterator<Item = &'c Node>,
    rt: &Runtime<'_>,
) -> Markup {
    shell.render(
        children.filter(|c| c.visible),
        &|c| render_runtime(c, rt),
        &|c| Some(display_label(c)),
        &|c| style::runtime_style(c, rt.mode),
    )
}

/// Runtime rendering of a container over the given children.
pub fn runtime_container<'c>(
    node: &Node,
    children: impl Iterator<Item = &'c Node>,
    rt: &Runtime<'_>,
) -> Markup {
    runtime_children(runtime_shell(node), children, rt)
}

/// A labelled runtime field around `control`.
pub fn runtime_field(node: &Node, rt: &Runtime<'_>, control: Markup) -> Markup {
    let mode = match rt.mode {
        RenderMode::Browse => "browse",
        RenderMode::Edit => "edit",
    };
    Element::new("div")
        .class("trellis-field")
        .attr("data-widget-id", node.id.as_str())
        .attr("data-type", node.kind())
        .attr("data-mode", mode)
        .child(
            Element::new("label")
                .class("trellis-field-label")
                .text(display_label(node)),
        )
        .child(control)
        .into()
}

/// Plain text for a bound value.
pub fn display_value(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| display_value(Some(i)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(v) => v.to_string(),
    }
}

/// Read-only display of a value.
pub fn value_span(text: String) -> Markup {
    Element::new("span").class("trellis-value").text(text).into()
}

/// An input bound to the node's value in edit mode, or the value as text in
/// browse mode.
pub fn text_input(node: &Node, rt: &Runtime<'_>, input_type: &str) -> Markup {
    let value = rt.value(node);
    match rt.mode {
        RenderMode::Browse => value_span(display_value(value.as_ref())),
        RenderMode::Edit => bound(Element::new("input").attr("type", input_type), node)
            .attr("value", display_value(value.as_ref()))
            .flag("readonly", node.widget().read_only())
            .into(),
    }
}

/// Attach the binding attributes of `node` to an input element.
pub fn bound(e: Element, node: &Node) -> Element {
    e.attr("name", node.binding_key())
        .attr("data-bind", node.binding_key())
}
