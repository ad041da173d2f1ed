//! The shared context handle passed into every edit mode.
//!
//! Modes never reach for ambient globals: everything a mode may touch —
//! map host, layer, feature collection, interaction registry, undo
//! registrar, dialogs, messages, configuration — travels in one explicit
//! [`EditContext`] handle, which keeps each mode independently testable.

use crate::api::client::{FeatureApi, GeomConfig};
use crate::config::EditorConfig;
use crate::editor::registry::InteractionRegistry;
use crate::editor::undo::UndoStack;
use crate::map::feature::AttrMap;
use crate::map::host::MapHost;
use crate::map::layer::SharedLayer;
use crate::map::source::SharedSource;
use crate::style::LayerStyle;
use std::cell::RefCell;
use std::rc::Rc;

/// Outcome of the attribute-entry form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// The user confirmed; the returned fields are merged into the
    /// feature's attribution.
    Submitted(AttrMap),
    /// The user cancelled the dialog.
    Cancelled,
    /// No form is configured for this layer; proceed without attributes.
    Unavailable,
}

/// The user's choice in the stop-editing confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    /// Push buffered edits to the remote store, then stop.
    Save,
    /// Drop buffered edits and stop.
    Discard,
    /// Keep the sessions; the resources stay editable.
    Continue,
}

/// The modal/dialog host the embedding application provides.
///
/// Dialog resolution is a suspension point in the original event loop;
/// here it is a synchronous call the host is free to service however it
/// likes (the engine only observes the outcome).
pub trait DialogHost {
    /// Opens the attribute-entry form for a layer, pre-filled when the
    /// feature already has cached attributes.
    fn feature_form(&self, layer_id: i64, prefill: Option<&AttrMap>) -> FormOutcome;

    /// Asks what to do with dirty sessions whose resources are about to
    /// stop being editable.
    fn confirm_stop(&self, resource_ids: &[i64]) -> StopDecision;
}

/// Transient user-facing messages (toast-style warnings).
pub trait MessageSink {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Everything a mode needs, bundled and reference-shared.
#[derive(Clone)]
pub struct EditContext {
    /// The resource this session edits; doubles as the feature tag.
    pub layer_id: i64,
    /// Geometry kind + coordinate layout, immutable for the session.
    pub geom: GeomConfig,
    pub host: Rc<dyn MapHost>,
    /// Remote store access for lazy attribute fetches.
    pub api: Rc<dyn FeatureApi>,
    pub layer: SharedLayer,
    pub source: SharedSource,
    pub registry: Rc<RefCell<InteractionRegistry>>,
    pub undo: Rc<RefCell<UndoStack>>,
    pub style: LayerStyle,
    pub dialogs: Rc<dyn DialogHost>,
    pub messages: Rc<dyn MessageSink>,
    pub config: EditorConfig,
}

impl EditContext {
    /// Registers a one-shot reversal for an operation just committed.
    pub fn add_undo<F: FnOnce() + 'static>(&self, action: F) {
        self.undo.borrow_mut().push(action);
    }
}
