//! One edit session per editable resource.

use crate::api::client::{FeatureApi, FeatureItem, GeomConfig};
use crate::config::EditorConfig;
use crate::editor::context::{DialogHost, EditContext, MessageSink};
use crate::editor::modes::{snap, standard_modes, EditMode, ModeKey};
use crate::editor::registry::InteractionRegistry;
use crate::editor::undo::UndoStack;
use crate::geometry::wkt::parse_wkt;
use crate::geometry::Coord;
use crate::input::{map_key, Key};
use crate::map::feature::Feature;
use crate::map::host::MapHost;
use crate::map::interaction::InteractionEvent;
use crate::map::layer::{SharedLayer, VectorLayer};
use crate::map::source::{new_shared_source, SharedSource};
use anyhow::Context;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Guard for one in-flight feature fetch.
///
/// The embedding application performs the actual network call between
/// [`EditSession::begin_feature_load`] and
/// [`EditSession::complete_feature_load`]; the ticket's generation lets
/// the session discard a delivery that was overtaken by a newer load
/// (or a session restart) while the request was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What became of a completed feature load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The features were added to the collection.
    Loaded(usize),
    /// The ticket was stale; the delivery was discarded untouched.
    Stale,
}

/// Binds one resource's vector features to one map layer.
///
/// The session owns the undo stack, the interaction registry, and the
/// mode set; it routes pointer and keyboard input to the active
/// interactions and their emitted events back to the current mode. All
/// sharing is `Rc<RefCell<_>>` — the engine is single-threaded and runs
/// inside the host's event loop.
///
/// Sessions may share one physical feature collection (the host engine
/// glitches when interactions are re-bound across collections), which is
/// why every feature carries a `layer_id` tag and teardown strips by tag
/// instead of clearing.
pub struct EditSession {
    ctx: EditContext,
    modes: Vec<Rc<dyn EditMode>>,
    active_mode: Cell<Option<ModeKey>>,
    enabled: Cell<bool>,
    /// Snap preference; the interaction's active flag is wiped while the
    /// session is disabled, so the wish lives here.
    snap_wanted: Cell<bool>,
    /// False when the collection was handed in by the coordinator and is
    /// shared with other sessions.
    owns_source: bool,
    load_generation: Cell<u64>,
}

impl EditSession {
    /// Creates the session for a resource.
    ///
    /// Loads the resource's geometry-type metadata first; a failure there
    /// (not a feature layer, network error) aborts creation and leaves
    /// nothing mounted. On success the vector layer is added to the map,
    /// every mode is attached (interactions constructed, inactive), and
    /// the session starts disabled in draw mode.
    pub fn create(
        resource_id: i64,
        api: Rc<dyn FeatureApi>,
        host: Rc<dyn MapHost>,
        dialogs: Rc<dyn DialogHost>,
        messages: Rc<dyn MessageSink>,
        config: EditorConfig,
        shared_source: Option<SharedSource>,
    ) -> anyhow::Result<Self> {
        let geom = api
            .layer_metadata(resource_id)
            .with_context(|| format!("loading geometry metadata for resource {}", resource_id))?;
        debug!("resource {} editable as {}", resource_id, geom);

        let owns_source = shared_source.is_none();
        let source = shared_source.unwrap_or_else(new_shared_source);
        let layer: SharedLayer = Rc::new(RefCell::new(VectorLayer::new(resource_id)));
        host.add_layer(&layer);

        let style = *layer.borrow().style();
        let ctx = EditContext {
            layer_id: resource_id,
            geom,
            host,
            api,
            layer,
            source,
            registry: Rc::new(RefCell::new(InteractionRegistry::new())),
            undo: Rc::new(RefCell::new(UndoStack::new())),
            style,
            dialogs,
            messages,
            config,
        };

        let modes = standard_modes();
        for mode in &modes {
            mode.attach(&ctx);
        }
        snap::attach(&ctx);

        let session = Self {
            ctx,
            modes,
            active_mode: Cell::new(Some(ModeKey::default())),
            enabled: Cell::new(false),
            snap_wanted: Cell::new(false),
            owns_source,
            load_generation: Cell::new(0),
        };
        session.apply_opacity();
        Ok(session)
    }

    pub fn resource_id(&self) -> i64 {
        self.ctx.layer_id
    }

    pub fn geom(&self) -> GeomConfig {
        self.ctx.geom
    }

    pub fn source(&self) -> &SharedSource {
        &self.ctx.source
    }

    pub fn layer(&self) -> &SharedLayer {
        &self.ctx.layer
    }

    /// The shared context handle, for embedding hosts that drive modes
    /// or dialogs directly.
    pub fn context(&self) -> &EditContext {
        &self.ctx
    }

    /// True once any undoable operation has been committed.
    pub fn dirty(&self) -> bool {
        self.ctx.undo.borrow().dirty()
    }

    pub fn undo_depth(&self) -> usize {
        self.ctx.undo.borrow().len()
    }

    /// Pops and runs the most recent reversal closure. No-op on an empty
    /// stack; returns whether a reversal ran.
    pub fn undo_last(&self) -> bool {
        self.ctx.undo.borrow_mut().undo_last()
    }

    pub fn active_mode(&self) -> Option<ModeKey> {
        self.active_mode.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn mode(&self, key: ModeKey) -> Option<&Rc<dyn EditMode>> {
        self.modes.iter().find(|m| m.key() == key)
    }

    fn apply_opacity(&self) {
        let active = self.enabled.get() && self.active_mode.get().is_some();
        let opacity = if active {
            self.ctx.config.active_opacity
        } else {
            self.ctx.config.dimmed_opacity
        };
        self.ctx.layer.borrow_mut().set_opacity(opacity);
    }

    /// Switches the active mode. Exactly one mode (or none) is current;
    /// leaving a mode deactivates its interactions and drops its gesture
    /// state, entering one activates its interactions — but only while
    /// the session is enabled.
    pub fn set_mode(&self, mode: Option<ModeKey>) {
        if self.active_mode.get() == mode {
            return;
        }
        if let Some(old) = self.active_mode.get() {
            if let Some(old) = self.mode(old) {
                old.deactivate(&self.ctx);
            }
        }
        self.active_mode.set(mode);
        if self.enabled.get() {
            if let Some(new) = mode.and_then(|key| self.mode(key)) {
                new.activate(&self.ctx);
            }
        }
        self.apply_opacity();
    }

    /// Enables or disables the whole session.
    ///
    /// Only the currently selected resource's session is enabled; the
    /// rest keep their undo stacks and buffered features but their
    /// interactions are inert and their layers dimmed. The active mode
    /// and the snap preference both survive the cycle and are restored
    /// on re-enable.
    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.get() == enabled {
            return;
        }
        self.enabled.set(enabled);
        if enabled {
            if let Some(mode) = self.active_mode.get().and_then(|key| self.mode(key)) {
                mode.activate(&self.ctx);
            }
            snap::set_enabled(&self.ctx, self.snap_wanted.get());
        } else {
            if let Some(mode) = self.active_mode.get().and_then(|key| self.mode(key)) {
                mode.deactivate(&self.ctx);
            }
            self.ctx.registry.borrow().deactivate_all();
        }
        self.apply_opacity();
    }

    /// Turns vertex snapping on or off; orthogonal to the mode group.
    /// While the session is disabled only the preference is recorded;
    /// the interaction follows it at the next enable.
    pub fn set_snap(&self, enabled: bool) {
        self.snap_wanted.set(enabled);
        if self.enabled.get() {
            snap::set_enabled(&self.ctx, enabled);
        }
    }

    pub fn snap_enabled(&self) -> bool {
        self.ctx.registry.borrow().is_active(snap::SNAP)
    }

    /// Starts a feature load, invalidating any ticket issued earlier.
    pub fn begin_feature_load(&self) -> LoadTicket {
        let generation = self.load_generation.get() + 1;
        self.load_generation.set(generation);
        LoadTicket { generation }
    }

    /// Delivers a completed feature fetch.
    ///
    /// A stale ticket (a newer load has begun since) discards the
    /// delivery without touching the collection. Fetch errors propagate
    /// to the caller; items whose geometry text does not parse are
    /// skipped with a warning rather than failing the whole load.
    pub fn complete_feature_load(
        &self,
        ticket: LoadTicket,
        result: anyhow::Result<Vec<FeatureItem>>,
    ) -> anyhow::Result<LoadOutcome> {
        if ticket.generation != self.load_generation.get() {
            debug!(
                "resource {}: discarding stale feature load",
                self.ctx.layer_id
            );
            return Ok(LoadOutcome::Stale);
        }
        let items = result
            .with_context(|| format!("loading features for resource {}", self.ctx.layer_id))?;

        let mut loaded = 0;
        let mut source = self.ctx.source.borrow_mut();
        for item in items {
            match parse_wkt(&item.geom) {
                Ok((geometry, _layout)) => {
                    source.insert(Feature::persisted(item.id, self.ctx.layer_id, geometry));
                    loaded += 1;
                }
                Err(err) => {
                    warn!(
                        "resource {}: skipping feature {} with unreadable geometry: {}",
                        self.ctx.layer_id, item.id, err
                    );
                }
            }
        }
        debug!("resource {}: loaded {} features", self.ctx.layer_id, loaded);
        Ok(LoadOutcome::Loaded(loaded))
    }

    /// Routes a pointer press through every live interaction, then hands
    /// the emitted events to the current mode.
    pub fn pointer_down(&self, coord: &Coord) {
        self.route(|i| i.pointer_down(coord));
    }

    pub fn pointer_move(&self, coord: &Coord) {
        self.route(|i| i.pointer_move(coord));
    }

    pub fn pointer_up(&self, coord: &Coord) {
        self.route(|i| i.pointer_up(coord));
    }

    /// Routes a key press. Only sketch commands exist today (Enter
    /// finishes, Escape cancels, Backspace or Ctrl+Z removes the last
    /// vertex); other keys are ignored.
    pub fn key(&self, key: Key) {
        let Some(command) = map_key(key) else {
            return;
        };
        self.route(|i| i.sketch_command(command));
    }

    // Drives interactions with all registry borrows released before any
    // mode handler runs, since handlers re-enter the registry and the
    // feature collection.
    fn route<F>(&self, mut drive: F)
    where
        F: FnMut(&mut crate::map::interaction::Interaction) -> Vec<InteractionEvent>,
    {
        let handles = self.ctx.registry.borrow().handles();
        let mut emitted: Vec<(String, InteractionEvent)> = Vec::new();
        for (key, interaction) in handles {
            for event in drive(&mut *interaction.borrow_mut()) {
                emitted.push((key.clone(), event));
            }
        }
        if emitted.is_empty() {
            return;
        }
        let Some(mode) = self.active_mode.get().and_then(|key| self.mode(key)) else {
            return;
        };
        for (interaction, event) in &emitted {
            mode.handle(&self.ctx, interaction, event);
        }
    }

    /// Tears the session down: every interaction deactivated and
    /// disposed before the layer leaves the map, so no further callbacks
    /// fire against disposed geometry. A collection shared with other
    /// sessions only has this session's tagged features stripped; a
    /// private collection is cleared outright.
    pub fn teardown(&self) {
        if let Some(mode) = self.active_mode.get().and_then(|key| self.mode(key)) {
            mode.deactivate(&self.ctx);
        }
        self.active_mode.set(None);
        self.enabled.set(false);
        // Invalidate any in-flight load
        self.load_generation.set(self.load_generation.get() + 1);
        {
            let mut registry = self.ctx.registry.borrow_mut();
            registry.deactivate_all();
            registry.dispose_all();
        }
        {
            let mut source = self.ctx.source.borrow_mut();
            if self.owns_source {
                source.clear();
            } else {
                source.remove_layer_features(self.ctx.layer_id);
            }
        }
        self.ctx.host.remove_layer(self.ctx.layer_id);
        self.ctx.undo.borrow_mut().clear();
    }

    /// Reference used by tests and by modes that need the mode list.
    pub fn modes(&self) -> &[Rc<dyn EditMode>] {
        &self.modes
    }

    /// Drains the undo stack, restoring the collection to its
    /// pre-session state.
    pub fn undo_all(&self) {
        while self.ctx.undo.borrow().len() > 0 {
            self.undo_last();
        }
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("resource_id", &self.ctx.layer_id)
            .field("geom", &self.ctx.geom)
            .field("active_mode", &self.active_mode.get())
            .field("enabled", &self.enabled.get())
            .field("undo_depth", &self.undo_depth())
            .finish()
    }
}
