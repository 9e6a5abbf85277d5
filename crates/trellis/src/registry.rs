//! Type tag to widget definition mapping and the node factory.
//!
//! Kinds are registered explicitly: the built-in table is installed by
//! [`Registry::builtin`], and further kinds call [`Registry::register_kind`]
//! at startup. Lookups are case-insensitive and accept aliases. When two
//! definitions claim the same tag, the first one registered wins.

use std::{
    collections::HashMap,
    sync::{OnceLock, RwLock},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{
    error::{Error, Result},
    fields::Fields,
    layout::WidthUnit,
    node::Node,
    widget::Widget,
    widgets::{self, tabs},
};

/// Flow width, in percent, of nodes created from the palette.
pub const DEFAULT_WIDTH_PERCENT: i32 = 48;

/// Palette grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Inputs and simple display controls.
    Basic,
    /// Containers.
    Layout,
    /// Data-driven composite controls.
    Data,
}

/// Build an empty instance of a kind.
pub type Factory = fn() -> Box<dyn Widget>;

/// Build an instance of a kind from document fields. Returns the widget and
/// the fields it did not claim.
pub type Decode = fn(Fields) -> (Box<dyn Widget>, Fields);

/// A kind that declares its own registration metadata.
pub trait WidgetKind: Widget + Clone + Default + Serialize + DeserializeOwned + 'static {
    /// Canonical type tag.
    const TAG: &'static str;
    /// Alternative tags accepted on lookup.
    const ALIASES: &'static [&'static str] = &[];
    /// Label key used when no label is supplied.
    const LABEL_KEY: &'static str;
    /// Palette icon name.
    const ICON: &'static str;
    /// Palette category.
    const CATEGORY: Category;
}

/// Factory for a self-declaring kind.
fn factory<K: WidgetKind>() -> Box<dyn Widget> {
    Box::new(K::default())
}

/// Decoder for a self-declaring kind.
fn decode<K: WidgetKind>(fields: Fields) -> (Box<dyn Widget>, Fields) {
    let mut w = K::default();
    let rest = w.merge_fields(fields);
    (Box::new(w), rest)
}

/// Registration record of one widget kind.
#[derive(Debug, Clone)]
pub struct WidgetDefinition {
    /// Canonical type tag.
    pub tag: String,
    /// Alternative tags.
    pub aliases: Vec<String>,
    /// Default label key.
    pub label_key: String,
    /// Palette icon.
    pub icon: String,
    /// Palette category.
    pub category: Category,
    /// Zero-argument constructor.
    pub factory: Factory,
    /// Document decoder.
    pub decode: Decode,
}

impl WidgetDefinition {
    /// The definition a kind declares for itself.
    pub fn of<K: WidgetKind>() -> Self {
        Self {
            tag: K::TAG.into(),
            aliases: K::ALIASES.iter().map(|a| (*a).to_string()).collect(),
            label_key: K::LABEL_KEY.into(),
            icon: K::ICON.into(),
            category: K::CATEGORY,
            factory: factory::<K>,
            decode: decode::<K>,
        }
    }
}

/// A set of widget definitions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Definitions in registration order.
    defs: Vec<WidgetDefinition>,
    /// Lowercase tag or alias to index in `defs`.
    index: HashMap<String, usize>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in kinds.
    pub fn builtin() -> Self {
        let mut r = Self::new();
        widgets::register_builtins(&mut r);
        r
    }

    /// Register a definition. Returns false, and leaves the registry
    /// unchanged, if the tag is already taken. Aliases that collide are
    /// skipped individually.
    pub fn register(&mut self, def: WidgetDefinition) -> bool {
        let key = def.tag.to_lowercase();
        if let Some(&existing) = self.index.get(&key) {
            warn!(
                tag = %def.tag,
                existing = %self.defs[existing].tag,
                "widget tag already registered; keeping the first definition"
            );
            return false;
        }
        let idx = self.defs.len();
        self.index.insert(key, idx);
        for alias in &def.aliases {
            let alias = alias.to_lowercase();
            if self.index.contains_key(&alias) {
                warn!(tag = %def.tag, %alias, "alias already registered");
                continue;
            }
            self.index.insert(alias, idx);
        }
        self.defs.push(def);
        true
    }

    /// Register a self-declaring kind.
    pub fn register_kind<K: WidgetKind>(&mut self) -> bool {
        self.register(WidgetDefinition::of::<K>())
    }

    /// Look up a tag or alias, without failing.
    pub fn resolve(&self, tag: &str) -> Option<&WidgetDefinition> {
        self.index
            .get(&tag.trim().to_lowercase())
            .map(|&i| &self.defs[i])
    }

    /// Look up a tag or alias. Unknown tags are an error naming every known
    /// tag.
    pub fn lookup(&self, tag: &str) -> Result<&WidgetDefinition> {
        self.resolve(tag).ok_or_else(|| self.unknown(tag))
    }

    /// The error for an unknown tag.
    pub fn unknown(&self, tag: &str) -> Error {
        Error::UnknownType {
            tag: tag.to_string(),
            known: self.tags().map(String::from).collect(),
        }
    }

    /// True if the tag or alias is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.resolve(tag).is_some()
    }

    /// Canonical tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.defs.iter().map(|d| d.tag.as_str())
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> &[WidgetDefinition] {
        &self.defs
    }

    /// Palette entries of the basic category.
    pub fn basic_widgets(&self) -> Vec<&WidgetDefinition> {
        self.defs
            .iter()
            .filter(|d| d.category == Category::Basic)
            .collect()
    }

    /// Palette entries of the layout category. Tabs are internal to tab
    /// containers and never offered.
    pub fn layout_widgets(&self) -> Vec<&WidgetDefinition> {
        self.defs
            .iter()
            .filter(|d| d.category == Category::Layout && d.tag != tabs::Tab::TAG)
            .collect()
    }

    /// Palette entries of the data category.
    pub fn data_widgets(&self) -> Vec<&WidgetDefinition> {
        self.defs
            .iter()
            .filter(|d| d.category == Category::Data)
            .collect()
    }

    /// Create a node ready to be dropped onto a form: fresh id, the label
    /// override or the kind's label key, the palette width and a visible
    /// flag. Tab containers come with two tabs, the first one active.
    pub fn create(&self, tag: &str, label: Option<&str>) -> Result<Node> {
        let def = self.lookup(tag)?;
        let mut node = Node::new((def.factory)()).with_label(label.unwrap_or(&def.label_key));
        node.layout.width = DEFAULT_WIDTH_PERCENT;
        node.layout.width_unit = WidthUnit::Percent;
        node.visible = true;
        if node.kind() == tabs::TabContainer::TAG {
            tabs::seed_tabs(&mut node);
        }
        Ok(node)
    }
}

/// The process-wide registry, seeded with the built-in kinds on first use.
pub fn global() -> &'static RwLock<Registry> {
    static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Registry::builtin()))
}

/// Register a self-declaring kind in the process-wide registry.
pub fn register_global<K: WidgetKind>() -> Result<bool> {
    let mut r = global()
        .write()
        .map_err(|_| Error::Internal("widget registry lock poisoned".into()))?;
    Ok(r.register_kind::<K>())
}

/// Create a node through the process-wide registry.
pub fn create(tag: &str, label: Option<&str>) -> Result<Node> {
    global()
        .read()
        .map_err(|_| Error::Internal("widget registry lock poisoned".into()))?
        .create(tag, label)
}
