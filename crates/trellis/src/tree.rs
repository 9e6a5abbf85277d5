//! The form tree: ordered top-level nodes and the structural edits the
//! designer performs on them.
//!
//! Every edit keeps the tree invariants: ids are unique, codes are unique
//! ignoring case, leaves hold no children and tabs live only inside tab
//! containers.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    error::{Error, Result},
    id::WidgetId,
    node::Node,
    registry::WidgetKind,
    widgets::tabs::{self, Tab, TabContainer},
};

/// Result of checking a node's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCheck {
    /// The current code is present and unique.
    pub valid: bool,
    /// The current code when valid, otherwise a free replacement.
    pub code: String,
}

/// A form document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    /// Top-level nodes in flow order.
    pub widgets: Vec<Node>,
}

/// Can `parent` hold a child of `kind`?
fn check_accepts(parent: &Node, kind: &str) -> Result<()> {
    if !parent.is_container() {
        return Err(Error::NotContainer(parent.id.to_string()));
    }
    if !parent.widget().accepts_child(kind) {
        return Err(Error::Invalid(format!(
            "{} cannot hold {kind}",
            parent.kind()
        )));
    }
    Ok(())
}

/// Can a node of `kind` sit at the top level?
fn check_top_level(kind: &str) -> Result<()> {
    if kind == Tab::TAG {
        return Err(Error::Invalid("tabs belong inside a tab container".into()));
    }
    Ok(())
}

/// The node among `nodes` (recursively) whose direct child is `id`.
fn parent_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for n in nodes {
        if n.children.iter().any(|c| c.id == id) {
            return Some(n);
        }
        if let Some(p) = parent_in(&n.children, id) {
            return Some(p);
        }
    }
    None
}

/// `<prefix><N>` for the smallest `N` from 1 not in `taken`. `taken` holds
/// lowercase codes.
fn next_code(prefix: &str, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("{prefix}{n}"))
        .find(|c| !taken.contains(&c.to_lowercase()))
        .unwrap_or_else(|| prefix.to_string())
}

impl Form {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form over the given top-level nodes.
    pub fn from_widgets(widgets: Vec<Node>) -> Self {
        Self { widgets }
    }

    /// Visit every node depth first, in document order.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        for w in &self.widgets {
            w.walk(f);
        }
    }

    /// Visit every node mutably, depth first.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        for w in &mut self.widgets {
            w.walk_mut(f);
        }
    }

    /// Find a node anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.widgets.iter().find_map(|w| w.find(id))
    }

    /// Find a node anywhere in the tree, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.widgets.iter_mut().find_map(|w| w.find_mut(id))
    }

    /// Is there a node with this id?
    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// The container holding `id`; `None` for top-level or unknown nodes.
    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        parent_in(&self.widgets, id)
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.widgets.iter().map(Node::count).sum()
    }

    /// True if the form has no nodes.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// The child list of `parent`, or the top level.
    fn siblings_mut(&mut self, parent: Option<&str>) -> Result<&mut Vec<Node>> {
        match parent {
            None => Ok(&mut self.widgets),
            Some(p) => self
                .find_mut(p)
                .map(|n| &mut n.children)
                .ok_or_else(|| Error::NotFound(p.to_string())),
        }
    }

    /// Check that `kind` may be placed under `parent`.
    fn check_target(&self, parent: Option<&str>, kind: &str) -> Result<()> {
        match parent {
            None => check_top_level(kind),
            Some(p) => {
                let target = self.find(p).ok_or_else(|| Error::NotFound(p.to_string()))?;
                check_accepts(target, kind)
            }
        }
    }

    /// Lowercase codes of every node except `skip`.
    fn codes_except(&self, skip: Option<&str>) -> HashSet<String> {
        let mut taken = HashSet::new();
        self.walk(&mut |n| {
            if skip.is_some_and(|s| n.id == s) {
                return;
            }
            if let Some(c) = n.code.as_deref().filter(|c| !c.trim().is_empty()) {
                taken.insert(c.to_lowercase());
            }
        });
        taken
    }

    /// Insert `node` under `parent` (the top level when `None`) at `index`,
    /// clamped to the end. Ids in the subtree must be new to the form. Nodes
    /// without a code, or whose code is taken, are given a fresh one.
    pub fn insert(&mut self, parent: Option<&str>, index: usize, mut node: Node) -> Result<WidgetId> {
        self.check_target(parent, node.kind())?;
        let mut seen = HashSet::new();
        let mut dup = None;
        node.walk(&mut |n| {
            if dup.is_none() && (self.contains_id(n.id.as_str()) || !seen.insert(n.id.clone())) {
                dup = Some(n.id.to_string());
            }
        });
        if let Some(d) = dup {
            return Err(Error::DuplicateId(d));
        }
        let mut taken = self.codes_except(None);
        node.walk_mut(&mut |n| {
            let free = n
                .code
                .as_deref()
                .filter(|c| !c.trim().is_empty() && !taken.contains(&c.to_lowercase()));
            let code = match free {
                Some(c) => c.to_string(),
                None => next_code(n.widget().code_prefix(), &taken),
            };
            taken.insert(code.to_lowercase());
            n.code = Some(code);
        });
        let id = node.id.clone();
        let siblings = self.siblings_mut(parent)?;
        let index = index.min(siblings.len());
        siblings.insert(index, node);
        Ok(id)
    }

    /// Remove a node and its subtree. The last tab of a tab container cannot
    /// be removed; removing the active tab activates the new first tab.
    pub fn remove(&mut self, id: &str) -> Result<Node> {
        let parent = self
            .parent_of(id)
            .map(|p| (p.id.clone(), p.kind() == TabContainer::TAG));
        let siblings = match parent {
            Some((pid, true)) => {
                let container = self
                    .find_mut(pid.as_str())
                    .ok_or_else(|| Error::Internal(format!("parent {pid} vanished")))?;
                let is_tab = container
                    .children
                    .iter()
                    .any(|c| c.id == id && c.kind() == Tab::TAG);
                if is_tab {
                    return tabs::remove_tab(container, id);
                }
                &mut container.children
            }
            Some((pid, false)) => self.siblings_mut(Some(pid.as_str()))?,
            None => &mut self.widgets,
        };
        let idx = siblings
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(siblings.remove(idx))
    }

    /// Move a node under `parent` at `index`. The index counts positions
    /// after the node has been taken out of its current place. A node cannot
    /// move into its own subtree.
    pub fn move_node(&mut self, id: &str, parent: Option<&str>, index: usize) -> Result<()> {
        let node = self.find(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        if let Some(p) = parent
            && node.find(p).is_some()
        {
            return Err(Error::Invalid(format!("cannot move {id} into its own subtree")));
        }
        self.check_target(parent, node.kind())?;
        let node = self.remove(id)?;
        let siblings = self.siblings_mut(parent)?;
        let index = index.min(siblings.len());
        siblings.insert(index, node);
        Ok(())
    }

    /// A code for `node` that no other node uses: its own code when that is
    /// free, otherwise `<prefix><N>` with the smallest free `N` from 1.
    /// Comparison ignores case.
    pub fn generate_unique_code(&self, node: &Node) -> String {
        let taken = self.codes_except(Some(node.id.as_str()));
        match node.code.as_deref() {
            Some(c) if !c.trim().is_empty() && !taken.contains(&c.to_lowercase()) => c.to_string(),
            _ => next_code(node.widget().code_prefix(), &taken),
        }
    }

    /// Is `code` non-empty and unused by every node other than `id`?
    pub fn is_code_unique(&self, code: &str, id: &str) -> bool {
        if code.trim().is_empty() {
            return false;
        }
        let mut unique = true;
        self.walk(&mut |n| {
            if n.id != id && n.code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(code)) {
                unique = false;
            }
        });
        unique
    }

    /// Check the code of node `id`, suggesting a free one when it is missing
    /// or taken.
    pub fn validate_and_suggest_code(&self, id: &str) -> Result<CodeCheck> {
        let node = self.find(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        match node.code.as_deref() {
            Some(c) if self.is_code_unique(c, id) => Ok(CodeCheck {
                valid: true,
                code: c.to_string(),
            }),
            _ => Ok(CodeCheck {
                valid: false,
                code: self.generate_unique_code(node),
            }),
        }
    }

    /// Give every node without a code, or whose code repeats an earlier
    /// node's, a fresh code. Returns the number of codes changed.
    pub fn ensure_codes(&mut self) -> usize {
        let mut taken = HashSet::new();
        let mut changed = 0;
        self.walk_mut(&mut |n| {
            if let Some(c) = n
                .code
                .as_deref()
                .filter(|c| !c.trim().is_empty() && !taken.contains(&c.to_lowercase()))
            {
                taken.insert(c.to_lowercase());
                return;
            }
            let code = next_code(n.widget().code_prefix(), &taken);
            debug!(id = %n.id, old = ?n.code, new = %code, "regenerated widget code");
            taken.insert(code.to_lowercase());
            n.code = Some(code);
            changed += 1;
        });
        changed
    }

    /// Every invariant violation in the tree.
    pub fn validate(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        let mut ids = HashSet::new();
        let mut codes = HashSet::new();
        for w in &self.widgets {
            if let Err(e) = check_top_level(w.kind()) {
                errors.push(e);
            }
        }
        self.walk(&mut |n| {
            if !ids.insert(n.id.clone()) {
                errors.push(Error::DuplicateId(n.id.to_string()));
            }
            if let Some(c) = n.code.as_deref().filter(|c| !c.trim().is_empty())
                && !codes.insert(c.to_lowercase())
            {
                errors.push(Error::Invalid(format!("duplicate code {c:?} on {}", n.id)));
            }
            if !n.is_container() && !n.children.is_empty() {
                errors.push(Error::NotContainer(n.id.to_string()));
            }
            for c in &n.children {
                if n.is_container() && !n.widget().accepts_child(c.kind()) {
                    errors.push(Error::Invalid(format!(
                        "{} {} cannot hold {} {}",
                        n.kind(),
                        n.id,
                        c.kind(),
                        c.id
                    )));
                }
            }
            if n.kind() == TabContainer::TAG && tabs::tabs(n).next().is_none() {
                errors.push(Error::Invalid(format!("tab container {} has no tabs", n.id)));
            }
        });
        errors
    }

    /// The active tab of tab container `container`.
    pub fn active_tab(&self, container: &str) -> Option<&Node> {
        self.find(container).and_then(tabs::active_tab)
    }

    /// Activate a tab of `container`.
    pub fn activate_tab(&mut self, container: &str, tab: &str) -> Result<()> {
        let c = self
            .find_mut(container)
            .ok_or_else(|| Error::NotFound(container.to_string()))?;
        tabs::activate_tab(c, tab)
    }

    /// Append a tab to `container`, activate it and give it a code.
    pub fn add_tab(&mut self, container: &str) -> Result<WidgetId> {
        let c = self
            .find_mut(container)
            .ok_or_else(|| Error::NotFound(container.to_string()))?;
        let id = tabs::add_tab(c)?;
        let code = self
            .find(id.as_str())
            .map(|t| self.generate_unique_code(t))
            .ok_or_else(|| Error::Internal(format!("tab {id} vanished")))?;
        if let Some(t) = self.find_mut(id.as_str()) {
            t.code = Some(code);
        }
        Ok(id)
    }

    /// Remove a tab from `container`.
    pub fn remove_tab(&mut self, container: &str, tab: &str) -> Result<Node> {
        let c = self
            .find_mut(container)
            .ok_or_else(|| Error::NotFound(container.to_string()))?;
        tabs::remove_tab(c, tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{container::Section, input::Textbox};

    #[test]
    fn codes_from_one() {
        let taken: HashSet<String> = ["textbox1".to_string(), "textbox3".to_string()].into();
        assert_eq!(next_code("textbox", &taken), "textbox2");
        assert_eq!(next_code("label", &HashSet::new()), "label1");
    }

    #[test]
    fn parent_lookup() {
        let mut f = Form::new();
        let s = f.insert(None, 0, Node::new(Section::default())).unwrap();
        let t = f
            .insert(Some(s.as_str()), 0, Node::new(Textbox::default()))
            .unwrap();
        assert_eq!(f.parent_of(t.as_str()).unwrap().id, s);
        assert!(f.parent_of(s.as_str()).is_none());
        assert_eq!(f.len(), 2);
    }
}
