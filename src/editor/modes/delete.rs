//! Delete mode: click to soft-delete.

use super::{EditMode, ModeKey};
use crate::editor::context::EditContext;
use crate::map::interaction::{Interaction, InteractionEvent};

/// Registry key of the click-select interaction.
pub const DELETE_CLICK: &str = "delete-click";
/// Registry key of the companion hover highlight.
pub const DELETE_HOVER: &str = "delete-hover";

/// Click-to-delete with soft flags.
///
/// Deletion only sets `deleted = true`; the feature stays in the
/// collection until session teardown so the undo closure can flip the
/// flag back, and so synchronization can emit a delete request for it.
pub struct DeleteMode;

impl EditMode for DeleteMode {
    fn key(&self) -> ModeKey {
        ModeKey::Delete
    }

    fn attach(&self, ctx: &EditContext) {
        let mut registry = ctx.registry.borrow_mut();
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(DELETE_HOVER, move || {
                Interaction::hover(source, Some(layer_id), host, tolerance)
            });
        }
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(DELETE_CLICK, move || {
                Interaction::select(source, Some(layer_id), host, tolerance)
            });
        }
    }

    fn activate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(DELETE_HOVER, true);
        registry.set_active(DELETE_CLICK, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(DELETE_CLICK, false);
        registry.set_active(DELETE_HOVER, false);
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        if interaction != DELETE_CLICK {
            return;
        }
        let InteractionEvent::Clicked { key: Some(key), .. } = event else {
            return;
        };
        let key = *key;
        {
            let source = ctx.source.borrow();
            match source.feature(key) {
                Some(feature) if !feature.deleted => {}
                _ => return,
            }
        }
        ctx.source.borrow_mut().set_deleted(key, true);
        let source = ctx.source.clone();
        ctx.add_undo(move || {
            source.borrow_mut().set_deleted(key, false);
        });
    }
}
