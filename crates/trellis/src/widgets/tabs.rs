//! Tab state lives in the tree itself: the container's `activeTabId` and
//! each tab's `isDefault` flag. The active tab is resolved by falling back
//! from the container's `activeTabId`, to the first tab flagged default, to
//! the first tab.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    id::WidgetId,
    layout::{HeightUnit, LayoutOptions, WidthUnit},
    markup::{Element, Markup},
    node::Node,
    property::{PropertyMeta, common},
    registry::{Category, WidgetKind},
    render::{self, Runtime},
    widget::Widget,
};

/// A tabbed container. Its children are exclusively [`Tab`] nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabContainer {
    /// Id of the active tab, matched against tab node ids and legacy tab ids.
    pub active_tab_id: Option<String>,
    /// Animate tab switches.
    pub animated: bool,
    /// Centre the tab headers.
    pub centered: bool,
    /// `small`, `default` or `large`.
    pub size: String,
    /// `line` or `card`.
    pub tab_style: String,
    /// `top`, `bottom`, `left` or `right`.
    pub tab_position: String,
}

impl Default for TabContainer {
    fn default() -> Self {
        Self {
            active_tab_id: None,
            animated: true,
            centered: false,
            size: "default".into(),
            tab_style: "line".into(),
            tab_position: "top".into(),
        }
    }
}

impl WidgetKind for TabContainer {
    const TAG: &'static str = "tabbox";
    const ALIASES: &'static [&'static str] = &["tabcontainer"];
    const LABEL_KEY: &'static str = "LBL_TABBOX";
    const ICON: &'static str = "folder";
    const CATEGORY: Category = Category::Layout;
}

/// Tab headers over the active tab's children.
fn tab_strip(node: &Node) -> Markup {
    let active = active_tab(node).map(|t| t.id.clone());
    Element::new("div")
        .class("trellis-tab-headers")
        .attr("role", "tablist")
        .style("display:flex; gap:4px; border-bottom:1px solid #e8e8e8;")
        .children(tabs(node).map(|t| {
            let on = active.as_ref() == Some(&t.id);
            Markup::from(
                Element::new("div")
                    .class("trellis-tab-header")
                    .attr("role", "tab")
                    .attr("data-tab-id", t.id.as_str())
                    .attr("aria-selected", if on { "true" } else { "false" })
                    .text(render::display_label(t)),
            )
        }))
        .into()
}

impl Widget for TabContainer {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn code_prefix(&self) -> &'static str {
        "tabcontainer"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn accepts_child(&self, kind: &str) -> bool {
        kind == Tab::TAG
    }

    fn initial_layout(&self, layout: &mut LayoutOptions) {
        layout.width = 100;
        layout.width_unit = WidthUnit::Percent;
        layout.height_unit = HeightUnit::Auto;
    }

    fn properties(&self, node: &Node) -> Vec<PropertyMeta> {
        let mut props = common(node.max_width());
        props.extend([
            PropertyMeta::boolean("Animated", "PROP_ANIMATED"),
            PropertyMeta::boolean("Centered", "PROP_CENTERED"),
            PropertyMeta::select(
                "Size",
                "PROP_SIZE",
                &[
                    ("small", "PROP_SIZE_SMALL"),
                    ("default", "PROP_SIZE_DEFAULT"),
                    ("large", "PROP_SIZE_LARGE"),
                ],
            ),
            PropertyMeta::select(
                "TabStyle",
                "PROP_TYPE",
                &[("line", "PROP_TAB_TYPE_LINE"), ("card", "PROP_TAB_TYPE_CARD")],
            ),
            PropertyMeta::select(
                "TabPosition",
                "PROP_TAB_POSITION",
                &[
                    ("top", "PROP_POSITION_TOP"),
                    ("bottom", "PROP_POSITION_BOTTOM"),
                    ("left", "PROP_POSITION_LEFT"),
                    ("right", "PROP_POSITION_RIGHT"),
                ],
            ),
        ]);
        props
    }

    fn render_design(&self, node: &Node) -> Markup {
        let children = active_tab(node).map(|t| t.children.iter()).into_iter().flatten();
        let shell = render::design_shell(node).prelude(tab_strip(node));
        render::design_children(shell, children)
    }

    fn render_runtime(&self, node: &Node, rt: &Runtime<'_>) -> Markup {
        let children = active_tab(node).map(|t| t.children.iter()).into_iter().flatten();
        let shell = render::runtime_shell(node).prelude(tab_strip(node));
        render::runtime_children(shell, children, rt)
    }
}

/// One page of a [`TabContainer`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tab {
    /// Legacy tab identifier, matched like the node id.
    pub tab_id: Option<String>,
    /// Shown when the container names no valid active tab.
    pub is_default: bool,
    /// Header icon.
    pub icon: Option<String>,
}

impl WidgetKind for Tab {
    const TAG: &'static str = "tab";
    const LABEL_KEY: &'static str = "LBL_TAB";
    const ICON: &'static str = "file";
    const CATEGORY: Category = Category::Layout;
}

impl Widget for Tab {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_edit_property(&self, name: &str) -> bool {
        name != "width" && name != "dataField"
    }

    fn properties(&self, _node: &Node) -> Vec<PropertyMeta> {
        vec![
            PropertyMeta::text("Label", "PROP_LABEL"),
            PropertyMeta::text("Icon", "PROP_ICON"),
            PropertyMeta::boolean("IsDefault", "PROP_DEFAULT_TAB"),
        ]
    }
}

/// The tab children of a container.
pub fn tabs(container: &Node) -> impl Iterator<Item = &Node> {
    container.children.iter().filter(|c| c.kind() == Tab::TAG)
}

/// Does `tab` answer to `id`, either as its node id or its legacy tab id?
pub fn tab_matches(tab: &Node, id: &str) -> bool {
    tab.id == id
        || tab
            .downcast_ref::<Tab>()
            .and_then(|t| t.tab_id.as_deref())
            .is_some_and(|t| t == id)
}

/// Is `tab` flagged as the default tab?
fn is_default(tab: &Node) -> bool {
    tab.downcast_ref::<Tab>().is_some_and(|t| t.is_default)
}

/// The active tab of a container. `None` only when the container has no
/// tabs or is not a tab container.
pub fn active_tab(container: &Node) -> Option<&Node> {
    let tc = container.downcast_ref::<TabContainer>()?;
    tc.active_tab_id
        .as_deref()
        .and_then(|id| tabs(container).find(|t| tab_matches(t, id)))
        .or_else(|| tabs(container).find(|t| is_default(t)))
        .or_else(|| tabs(container).next())
}

/// Make the tab answering to `tab_id` active: the container records its node
/// id and only that tab keeps the default flag.
pub fn activate_tab(container: &mut Node, tab_id: &str) -> Result<()> {
    let id = tabs(container)
        .find(|t| tab_matches(t, tab_id))
        .map(|t| t.id.clone())
        .ok_or_else(|| Error::NotFound(tab_id.to_string()))?;
    let tc = container
        .downcast_mut::<TabContainer>()
        .ok_or_else(|| Error::NotContainer(tab_id.to_string()))?;
    tc.active_tab_id = Some(id.to_string());
    for c in &mut container.children {
        let on = c.id == id;
        if let Some(t) = c.downcast_mut::<Tab>() {
            t.is_default = on;
        }
    }
    Ok(())
}

/// Append a tab labelled `Tab N` and make it active. Returns its id.
pub fn add_tab(container: &mut Node) -> Result<WidgetId> {
    if container.downcast_ref::<TabContainer>().is_none() {
        return Err(Error::NotContainer(container.id.to_string()));
    }
    let n = tabs(container).count() + 1;
    let tab = Node::new(Tab::default()).with_label(&format!("Tab {n}"));
    let id = tab.id.clone();
    container.children.push(tab);
    activate_tab(container, id.as_str())?;
    Ok(id)
}

/// Remove a tab. The last tab cannot be removed. When the active tab goes,
/// the new first tab becomes active.
pub fn remove_tab(container: &mut Node, tab_id: &str) -> Result<Node> {
    if tabs(container).count() <= 1 {
        return Err(Error::Invalid(
            "a tab container keeps at least one tab".into(),
        ));
    }
    let idx = container
        .children
        .iter()
        .position(|t| t.kind() == Tab::TAG && tab_matches(t, tab_id))
        .ok_or_else(|| Error::NotFound(tab_id.to_string()))?;
    let was_active = active_tab(container).is_some_and(|t| t.id == container.children[idx].id);
    let removed = container.children.remove(idx);
    if was_active {
        let next = tabs(container).next().map(|t| t.id.clone());
        if let Some(next) = next {
            activate_tab(container, next.as_str())?;
        }
    }
    Ok(removed)
}

/// Give an empty tab container its two starting tabs, the first active.
pub fn seed_tabs(container: &mut Node) {
    if tabs(container).next().is_some() {
        return;
    }
    let first = Node::new(Tab {
        is_default: true,
        ..Tab::default()
    })
    .with_label("Tab 1");
    let second = Node::new(Tab::default()).with_label("Tab 2");
    let first_id = first.id.to_string();
    container.children.push(first);
    container.children.push(second);
    if let Some(tc) = container.downcast_mut::<TabContainer>() {
        tc.active_tab_id = Some(first_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str, default: bool) -> Node {
        Node::new(Tab {
            is_default: default,
            ..Tab::default()
        })
        .with_id(id)
        .with_label(id)
    }

    fn container(active: Option<&str>, children: Vec<Node>) -> Node {
        let mut n = Node::new(TabContainer {
            active_tab_id: active.map(String::from),
            ..TabContainer::default()
        });
        n.children = children;
        n
    }

    #[test]
    fn fallback_chain() {
        let c = container(Some("missing"), vec![tab("a", false), tab("b", true)]);
        assert_eq!(active_tab(&c).unwrap().id, "b");
        let c = container(None, vec![tab("a", false), tab("b", false)]);
        assert_eq!(active_tab(&c).unwrap().id, "a");
        let c = container(Some("b"), vec![tab("a", true), tab("b", false)]);
        assert_eq!(active_tab(&c).unwrap().id, "b");
        assert!(active_tab(&container(None, vec![])).is_none());
    }

    #[test]
    fn legacy_tab_id() {
        let mut t = tab("node-1", false);
        t.downcast_mut::<Tab>().unwrap().tab_id = Some("legacy".into());
        let c = container(Some("legacy"), vec![tab("x", false), t]);
        assert_eq!(active_tab(&c).unwrap().id, "node-1");
    }

    #[test]
    fn activate_sets_flags() {
        let mut c = container(None, vec![tab("a", true), tab("b", false)]);
        activate_tab(&mut c, "b").unwrap();
        assert_eq!(
            c.downcast_ref::<TabContainer>().unwrap().active_tab_id.as_deref(),
            Some("b")
        );
        assert!(!is_default(&c.children[0]));
        assert!(is_default(&c.children[1]));
        assert!(activate_tab(&mut c, "zzz").is_err());
    }

    #[test]
    fn add_and_remove() {
        let mut c = container(None, vec![tab("a", true)]);
        assert!(remove_tab(&mut c, "a").is_err());
        let id = add_tab(&mut c).unwrap();
        assert_eq!(c.children[1].label, "Tab 2");
        assert_eq!(active_tab(&c).unwrap().id, id);
        remove_tab(&mut c, id.as_str()).unwrap();
        assert_eq!(active_tab(&c).unwrap().id, "a");
        assert!(is_default(&c.children[0]));
    }

    #[test]
    fn seeded() {
        let mut c = container(None, vec![]);
        seed_tabs(&mut c);
        assert_eq!(c.children.len(), 2);
        assert_eq!(active_tab(&c).unwrap().label, "Tab 1");
        assert!(!c.widget().accepts_child("textbox"));
        assert!(c.children[0].widget().accepts_child("textbox"));
        assert!(!c.children[0].can_edit_property("Width"));
    }
}
