//! Move mode: drag whole features.

use super::{EditMode, ModeKey};
use crate::editor::context::EditContext;
use crate::geometry::Geometry;
use crate::map::feature::FeatureKey;
use crate::map::interaction::{Interaction, InteractionEvent};
use std::cell::{Cell, RefCell};

/// Registry key of the translate interaction.
pub const MOVE: &str = "move";
/// Registry key of the companion hover highlight.
pub const MOVE_HOVER: &str = "move-hover";

/// Whole-feature dragging with the same snapshot/undo discipline as the
/// modify mode.
///
/// The companion hover highlight is suppressed while a drag is active to
/// avoid visual flicker. That suppression is a plain boolean guard, not a
/// lock — all execution is single-threaded.
pub struct MoveMode {
    snapshot: RefCell<Option<(FeatureKey, Geometry)>>,
    dragging: Cell<bool>,
}

impl MoveMode {
    pub fn new() -> Self {
        Self {
            snapshot: RefCell::new(None),
            dragging: Cell::new(false),
        }
    }
}

impl Default for MoveMode {
    fn default() -> Self {
        Self::new()
    }
}

impl EditMode for MoveMode {
    fn key(&self) -> ModeKey {
        ModeKey::Move
    }

    fn attach(&self, ctx: &EditContext) {
        let mut registry = ctx.registry.borrow_mut();
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(MOVE_HOVER, move || {
                Interaction::hover(source, Some(layer_id), host, tolerance)
            });
        }
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(MOVE, move || {
                Interaction::translate(source, Some(layer_id), host, tolerance)
            });
        }
    }

    fn activate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(MOVE_HOVER, true);
        registry.set_active(MOVE, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(MOVE, false);
        registry.set_active(MOVE_HOVER, false);
        self.snapshot.borrow_mut().take();
        self.dragging.set(false);
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        if interaction != MOVE {
            return;
        }
        match event {
            InteractionEvent::TranslateStart { key } => {
                if let Some(feature) = ctx.source.borrow().feature(*key) {
                    *self.snapshot.borrow_mut() = Some((*key, feature.geometry.clone()));
                }
                // Guard flag: no highlight churn mid-drag
                self.dragging.set(true);
                ctx.registry.borrow().set_active(MOVE_HOVER, false);
            }
            InteractionEvent::TranslateEnd { key } => {
                if let Some((snap_key, before)) = self.snapshot.borrow_mut().take() {
                    if snap_key == *key {
                        let source = ctx.source.clone();
                        let key = *key;
                        ctx.add_undo(move || {
                            source.borrow_mut().set_geometry(key, before);
                        });
                    }
                }
                self.dragging.set(false);
                // Re-enable the highlight only if the mode is still current
                let registry = ctx.registry.borrow();
                if registry.is_active(MOVE) {
                    registry.set_active(MOVE_HOVER, true);
                }
            }
            _ => {}
        }
    }
}
