//! Rectangle mode: draw and reshape axis-aligned rectangles.

use super::{EditMode, ModeKey};
use crate::editor::context::EditContext;
use crate::geometry::{Coord, Geometry};
use crate::map::feature::{Feature, FeatureKey};
use crate::map::interaction::{
    rectangle_corners, rectangle_from_corners, DrawTarget, Interaction, InteractionEvent,
};
use std::cell::RefCell;

/// Registry key of the two-corner box sketch.
pub const RECT_DRAW: &str = "rect-draw";
/// Registry key of the raw-drag interaction used for corner reshaping.
pub const RECT_DRAG: &str = "rect-drag";

struct RectDrag {
    key: FeatureKey,
    corners: [Coord; 4],
    dragged: usize,
    before: Geometry,
}

/// Draws rectangles with two corner clicks and reshapes them by dragging
/// a corner while the opposite corner stays pinned.
///
/// While the pointer is idle the mode probes for a grabbable corner and
/// flips between the sketch and the drag interaction accordingly, so a
/// press over a corner always reshapes and a press elsewhere always
/// starts a new rectangle. Reshaping rebuilds the ring from the dragged
/// and the pinned corner, which keeps the geometry an axis-aligned
/// five-coordinate ring no matter how the pointer wanders.
pub struct RectEditMode {
    drag: RefCell<Option<RectDrag>>,
}

impl RectEditMode {
    pub fn new() -> Self {
        Self {
            drag: RefCell::new(None),
        }
    }

    /// Finds a rectangle corner within the pixel tolerance of `coord`.
    fn corner_at(&self, ctx: &EditContext, coord: &Coord) -> Option<(FeatureKey, [Coord; 4], usize)> {
        let tolerance = ctx.config.corner_tolerance_px * ctx.host.map_units_per_pixel(coord);
        let tol_sq = tolerance * tolerance;
        let source = ctx.source.borrow();
        for key in source.layer_keys(ctx.layer_id) {
            let Some(feature) = source.feature(key) else {
                continue;
            };
            if feature.deleted {
                continue;
            }
            let Some(corners) = rectangle_corners(&feature.geometry) else {
                continue;
            };
            for (index, corner) in corners.iter().enumerate() {
                if corner.distance_sq(coord) <= tol_sq {
                    return Some((key, corners, index));
                }
            }
        }
        None
    }
}

impl Default for RectEditMode {
    fn default() -> Self {
        Self::new()
    }
}

impl EditMode for RectEditMode {
    fn key(&self) -> ModeKey {
        ModeKey::RectEdit
    }

    fn attach(&self, ctx: &EditContext) {
        let mut registry = ctx.registry.borrow_mut();
        registry.get(RECT_DRAW, || Interaction::draw(DrawTarget::Box, None));
        let source = ctx.source.clone();
        let host = ctx.host.clone();
        let layer_id = ctx.layer_id;
        let tolerance = ctx.config.corner_tolerance_px;
        registry.get(RECT_DRAG, move || {
            Interaction::drag(source, Some(layer_id), host, tolerance)
        });
    }

    fn activate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(RECT_DRAW, true);
        registry.set_active(RECT_DRAG, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(RECT_DRAG, false);
        registry.set_active(RECT_DRAW, false);
        self.drag.borrow_mut().take();
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        match (interaction, event) {
            (RECT_DRAG, InteractionEvent::PointerMoved { coord }) => {
                let registry = ctx.registry.borrow();
                // An in-flight sketch keeps its interaction; deactivating
                // it mid-press would cancel the sketch
                let sketching = registry
                    .lookup(RECT_DRAW)
                    .map(|draw| draw.borrow().sketch_in_progress())
                    .unwrap_or(false);
                if !sketching {
                    // Sketching yields to reshaping whenever a corner is in reach
                    let over_corner = self.corner_at(ctx, coord).is_some();
                    registry.set_active(RECT_DRAW, !over_corner);
                }
            }
            (RECT_DRAG, InteractionEvent::DragStart { coord }) => {
                if let Some((key, corners, dragged)) = self.corner_at(ctx, coord) {
                    let before = match ctx.source.borrow().feature(key) {
                        Some(feature) => feature.geometry.clone(),
                        None => return,
                    };
                    *self.drag.borrow_mut() = Some(RectDrag {
                        key,
                        corners,
                        dragged,
                        before,
                    });
                }
            }
            (RECT_DRAG, InteractionEvent::DragTick { coord }) => {
                let drag = self.drag.borrow();
                if let Some(drag) = drag.as_ref() {
                    let opposite = drag.corners[(drag.dragged + 2) % 4];
                    let reshaped = rectangle_from_corners(coord, &opposite);
                    ctx.source.borrow_mut().set_geometry(drag.key, reshaped);
                }
            }
            (RECT_DRAG, InteractionEvent::DragEnd { .. }) => {
                if let Some(drag) = self.drag.borrow_mut().take() {
                    let source = ctx.source.clone();
                    let key = drag.key;
                    let before = drag.before;
                    ctx.add_undo(move || {
                        source.borrow_mut().set_geometry(key, before);
                    });
                }
            }
            (RECT_DRAW, InteractionEvent::DrawEnd { geometry }) => {
                let key = ctx
                    .source
                    .borrow_mut()
                    .insert(Feature::new(ctx.layer_id, geometry.clone()));
                let source = ctx.source.clone();
                ctx.add_undo(move || {
                    source.borrow_mut().remove(key);
                });
            }
            _ => {}
        }
    }
}
