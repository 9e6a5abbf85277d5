//! Editor state around a form: selection, the resize gesture in progress and
//! the undo history.
//!
//! History entries are encoded documents. The newest undo entry always
//! mirrors the last committed state of the form, so a form can be undone
//! only once a second snapshot exists.

use std::collections::VecDeque;

use geom::Edges;
use serde_json::Value;
use tracing::debug;

use crate::{
    codec::{Decoder, encode_form},
    error::{Error, Result},
    id::WidgetId,
    registry::Registry,
    resize::{ResizeLimits, ResizeSession},
    tree::Form,
};

/// Snapshots kept by default, oldest dropped first.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Snapshot undo and redo stacks.
#[derive(Debug, Clone)]
struct History {
    /// Committed states, oldest first. The back is the current state.
    undo: VecDeque<Value>,
    /// States undone, most recent last.
    redo: Vec<Value>,
    /// Maximum undo entries; zero keeps everything.
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl History {
    /// Drop the oldest entries beyond the limit.
    fn trim(&mut self) {
        while self.limit > 0 && self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Record `doc` unless it repeats the newest entry. Clears the redo
    /// stack. Returns true if an entry was added.
    fn push(&mut self, doc: Value) -> bool {
        if self.undo.back() == Some(&doc) {
            return false;
        }
        self.undo.push_back(doc);
        self.redo.clear();
        self.trim();
        true
    }
}

/// Editor state around a form. Starting a new gesture replaces the previous
/// resize snapshot.
#[derive(Debug, Clone, Default)]
pub struct Designer {
    /// The form being edited.
    pub form: Form,
    /// Selected node.
    selected: Option<WidgetId>,
    /// Gesture in progress.
    session: Option<ResizeSession>,
    /// Floors for new gestures.
    limits: ResizeLimits,
    /// Undo and redo snapshots.
    history: History,
}

impl Designer {
    /// A designer over `form` with the default limits. The form's current
    /// state is the first history entry.
    pub fn new(form: Form) -> Self {
        let mut d = Self {
            form,
            ..Self::default()
        };
        d.save_snapshot();
        d
    }

    /// Builder: use `limits` for new gestures.
    pub fn with_limits(mut self, limits: ResizeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builder: keep at most `limit` undo snapshots. Zero keeps everything.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history.limit = limit;
        self.history.trim();
        self
    }

    /// Select a node.
    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.form.contains_id(id) {
            return Err(Error::NotFound(id.to_string()));
        }
        self.selected = Some(id.into());
        Ok(())
    }

    /// The selected node id.
    pub fn selected(&self) -> Option<&WidgetId> {
        self.selected.as_ref()
    }

    /// Is a resize gesture in progress?
    pub fn resizing(&self) -> bool {
        self.session.is_some()
    }

    /// Begin resizing `id`, selecting it.
    pub fn on_resize_start(&mut self, id: &str) -> Result<()> {
        let node = self
            .form
            .find(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.session = Some(ResizeSession::with_limits(node, self.limits));
        self.selected = Some(node.id.clone());
        Ok(())
    }

    /// Apply a cumulative delta to the node being resized. Without a gesture
    /// in progress, one is started on the selected node.
    pub fn on_resize(&mut self, direction: &str, dx: i32, dy: i32, container_width: i32) -> Result<()> {
        let edges: Edges = direction.parse()?;
        if self.session.is_none() {
            let id = self
                .selected
                .clone()
                .ok_or_else(|| Error::Invalid("no resize in progress".into()))?;
            debug!(%id, "resize without start, snapshotting now");
            self.on_resize_start(id.as_str())?;
        }
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| Error::Internal("resize session missing".into()))?;
        let node = self
            .form
            .find_mut(session.id().as_str())
            .ok_or_else(|| Error::NotFound(session.id().to_string()))?;
        session.apply(node, edges, dx, dy, container_width);
        Ok(())
    }

    /// Finish the gesture in progress, returning the resized node id. The
    /// resulting form is recorded in the history.
    pub fn on_resize_end(&mut self) -> Option<WidgetId> {
        let id = self.session.take().map(ResizeSession::end)?;
        self.save_snapshot();
        Some(id)
    }

    /// Record the current form in the undo history. A state identical to the
    /// newest snapshot is not recorded twice. Recording clears the redo
    /// stack. Returns true if a snapshot was added.
    pub fn save_snapshot(&mut self) -> bool {
        self.history.push(encode_form(&self.form))
    }

    /// Forget all history and start over from the current form.
    pub fn reset_history(&mut self) {
        self.history.undo.clear();
        self.history.redo.clear();
        self.save_snapshot();
    }

    /// Is there an earlier snapshot to return to?
    pub fn can_undo(&self) -> bool {
        self.history.undo.len() > 1
    }

    /// Is there an undone snapshot to reapply?
    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    /// Return to the previous snapshot. The form as it stands, including
    /// unsaved edits, becomes the redo entry. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self, registry: &Registry) -> Result<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        let previous = self
            .history
            .undo
            .get(self.history.undo.len() - 2)
            .cloned()
            .ok_or_else(|| Error::Internal("undo history missing".into()))?;
        let form = Decoder::new(registry).decode_form(previous)?;
        self.history.undo.pop_back();
        self.history.redo.push(encode_form(&self.form));
        self.replace_form(form);
        Ok(true)
    }

    /// Reapply the most recently undone snapshot. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self, registry: &Registry) -> Result<bool> {
        let Some(next) = self.history.redo.last().cloned() else {
            return Ok(false);
        };
        let form = Decoder::new(registry).decode_form(next.clone())?;
        self.history.redo.pop();
        self.history.undo.push_back(next);
        self.history.trim();
        self.replace_form(form);
        Ok(true)
    }

    /// Swap in a restored form, dropping state that refers to the old one.
    fn replace_form(&mut self, form: Form) {
        self.form = form;
        self.session = None;
        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.form.contains_id(id.as_str()))
        {
            self.selected = None;
        }
    }
}
