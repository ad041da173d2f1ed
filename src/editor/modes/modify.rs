//! Modify mode: drag individual vertices.

use super::{EditMode, ModeKey};
use crate::editor::context::EditContext;
use crate::geometry::Geometry;
use crate::map::feature::FeatureKey;
use crate::map::interaction::{Interaction, InteractionEvent};
use std::cell::RefCell;
use std::collections::HashMap;

/// Registry key of the modify interaction.
pub const MODIFY: &str = "modify";

/// Vertex editing with snapshot-on-start undo.
///
/// On modify-start every touched feature's geometry is cloned; on
/// modify-end one undo entry per feature restores the pre-modify clone.
/// The clone is mandatory: geometries are shared by reference and the
/// live object mutates during the drag.
pub struct ModifyMode {
    snapshots: RefCell<HashMap<FeatureKey, Geometry>>,
}

impl ModifyMode {
    pub fn new() -> Self {
        Self {
            snapshots: RefCell::new(HashMap::new()),
        }
    }
}

impl Default for ModifyMode {
    fn default() -> Self {
        Self::new()
    }
}

impl EditMode for ModifyMode {
    fn key(&self) -> ModeKey {
        ModeKey::Modify
    }

    fn attach(&self, ctx: &EditContext) {
        let source = ctx.source.clone();
        let host = ctx.host.clone();
        let layer_id = ctx.layer_id;
        let tolerance = ctx.config.vertex_tolerance_px;
        ctx.registry.borrow_mut().get(MODIFY, move || {
            Interaction::modify(source, Some(layer_id), host, tolerance)
        });
    }

    fn activate(&self, ctx: &EditContext) {
        ctx.registry.borrow().set_active(MODIFY, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        ctx.registry.borrow().set_active(MODIFY, false);
        self.snapshots.borrow_mut().clear();
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        if interaction != MODIFY {
            return;
        }
        match event {
            InteractionEvent::ModifyStart { keys } => {
                let source = ctx.source.borrow();
                let mut snapshots = self.snapshots.borrow_mut();
                for key in keys {
                    if let Some(feature) = source.feature(*key) {
                        snapshots.insert(*key, feature.geometry.clone());
                    }
                }
            }
            InteractionEvent::ModifyEnd { keys } => {
                let mut snapshots = self.snapshots.borrow_mut();
                for key in keys {
                    if let Some(before) = snapshots.remove(key) {
                        let source = ctx.source.clone();
                        let key = *key;
                        ctx.add_undo(move || {
                            source.borrow_mut().set_geometry(key, before);
                        });
                    }
                }
            }
            _ => {}
        }
    }
}
