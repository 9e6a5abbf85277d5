//! Trellis: the widget-tree engine behind a visual form designer.
//!
//! A form is a tree of typed widget nodes. Trellis owns that tree and
//! everything that has to stay consistent with it: where each node sits,
//! how it resizes, how it is saved and loaded, and how it renders in the
//! designer and at runtime.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Registry`] - Widget kinds by type tag, and the node factory
//! - [`Form`] - The tree and its structural edits
//! - [`Decoder`] and [`encode_form`] - JSON documents in and out
//! - [`Designer`] - Selection, resize gestures and undo history
//! - [`render`] - Design-time and runtime markup
//!
//! # Module Organization
//!
//! - [`widgets`] - Built-in widget kinds
//! - [`layout`] and [`style`] - Geometry and its generated styles

#![warn(missing_docs)]

pub mod binding;
pub mod codec;
pub mod config;
pub mod designer;
pub mod error;
pub mod fields;
pub mod id;
pub mod layout;
pub mod markup;
pub mod node;
pub mod property;
pub mod registry;
pub mod render;
pub mod resize;
pub mod style;
pub mod tree;
pub mod widget;
pub mod widgets;

pub use binding::{EditValues, FieldPayload, ValueBinding, commit_input};
pub use codec::{CodecOptions, Decoder, Strictness, encode_form, encode_node};
pub use config::EngineConfig;
pub use designer::Designer;
pub use error::{Error, Result};
pub use fields::{FieldSet, Fields};
pub use geom;
pub use id::WidgetId;
pub use layout::{ContainerLayout, ContainerMode, HeightUnit, LayoutMode, LayoutOptions, WidthUnit};
pub use markup::{Element, Markup};
pub use node::{ExtValue, Extensions, Node};
pub use property::{EditorKind, PropertyMeta};
pub use registry::{Category, Registry, WidgetDefinition, WidgetKind};
pub use render::{RenderMode, Runtime};
pub use resize::{ResizeLimits, ResizeSession};
pub use tree::{CodeCheck, Form};
pub use widget::Widget;
