//! Hole-cut mode: draw interior rings into polygons.

use super::{EditMode, ModeKey};
use crate::editor::context::EditContext;
use crate::geometry::types::ring_contains;
use crate::geometry::{Geometry, Ring};
use crate::map::feature::FeatureKey;
use crate::map::interaction::{DrawTarget, Interaction, InteractionEvent};
use crate::map::source::{new_shared_source, SharedSource};
use std::cell::Cell;

/// Registry key of the ring-sketch interaction.
pub const HOLE_DRAW: &str = "hole-draw";
/// Registry key of the polygon-tracking hover.
pub const HOLE_HOVER: &str = "hole-hover";

/// Two-phase hole cutting.
///
/// Phase one tracks the polygon under the pointer; phase two sketches the
/// ring. The sketch lives in a private scratch source, so a failed or
/// abandoned hole never pollutes the real feature collection. Starting a
/// sketch with no polygon hovered aborts it immediately with a warning.
///
/// On completion the ring is appended to the hovered polygon's interior
/// rings; for a multipolygon the first member whose outer ring contains
/// every coordinate of the new ring receives it, and a ring matching no
/// member is warned about and discarded without touching any geometry.
pub struct HoleMode {
    scratch: SharedSource,
    hovered: Cell<Option<FeatureKey>>,
    target: Cell<Option<FeatureKey>>,
}

impl HoleMode {
    pub fn new() -> Self {
        Self {
            scratch: new_shared_source(),
            hovered: Cell::new(None),
            target: Cell::new(None),
        }
    }

    /// The scratch collection holding in-progress ring sketches.
    pub fn scratch(&self) -> &SharedSource {
        &self.scratch
    }

    fn abort_sketch(&self, ctx: &EditContext) {
        if let Some(draw) = ctx.registry.borrow().lookup(HOLE_DRAW) {
            draw.borrow_mut().cancel_sketch();
        }
        self.target.set(None);
    }

    fn apply_ring(&self, ctx: &EditContext, target: FeatureKey, ring: Ring) {
        let before = match ctx.source.borrow().feature(target) {
            Some(feature) => feature.geometry.clone(),
            None => return,
        };

        let applied = match &before {
            Geometry::Polygon(_) => {
                ctx.source.borrow_mut().update_geometry(target, |g| {
                    g.push_interior_ring(ring.clone());
                });
                true
            }
            Geometry::MultiPolygon(polys) => {
                match host_polygon_index(polys, &ring) {
                    Some(index) => {
                        ctx.source.borrow_mut().update_geometry(target, |g| {
                            if let Geometry::MultiPolygon(polys) = g {
                                polys[index].push(ring.clone());
                            }
                        });
                        true
                    }
                    None => {
                        ctx.messages
                            .warn("The hole does not fit inside any part of the polygon");
                        false
                    }
                }
            }
            _ => false,
        };

        if applied {
            let source = ctx.source.clone();
            ctx.add_undo(move || {
                source.borrow_mut().set_geometry(target, before);
            });
        }
    }
}

impl Default for HoleMode {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds the multipolygon member that hosts the new ring: the first
/// member whose outer-ring probe contains every coordinate of the ring.
fn host_polygon_index(polys: &[Vec<Ring>], ring: &Ring) -> Option<usize> {
    polys.iter().position(|rings| {
        rings
            .first()
            .map(|outer| ring.iter().all(|coord| ring_contains(outer, coord)))
            .unwrap_or(false)
    })
}

impl EditMode for HoleMode {
    fn key(&self) -> ModeKey {
        ModeKey::Hole
    }

    fn attach(&self, ctx: &EditContext) {
        let mut registry = ctx.registry.borrow_mut();
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(HOLE_HOVER, move || {
                Interaction::hover(source, Some(layer_id), host, tolerance)
            });
        }
        {
            let scratch = self.scratch.clone();
            registry.get(HOLE_DRAW, move || {
                Interaction::draw(DrawTarget::Area, Some(scratch))
            });
        }
    }

    fn activate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(HOLE_HOVER, true);
        registry.set_active(HOLE_DRAW, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(HOLE_DRAW, false);
        registry.set_active(HOLE_HOVER, false);
        self.hovered.set(None);
        self.target.set(None);
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        match (interaction, event) {
            (HOLE_HOVER, InteractionEvent::HoverChanged { key, .. }) => {
                // Only polygonal features can host a hole
                let areal = (*key).filter(|k| {
                    ctx.source
                        .borrow()
                        .feature(*k)
                        .map(|f| f.geometry.kind().is_areal())
                        .unwrap_or(false)
                });
                self.hovered.set(areal);
            }
            (HOLE_DRAW, InteractionEvent::SketchStarted { .. }) => {
                match self.hovered.get() {
                    Some(target) => self.target.set(Some(target)),
                    None => {
                        ctx.messages.warn("Click inside a polygon to start a hole");
                        self.abort_sketch(ctx);
                    }
                }
            }
            (HOLE_DRAW, InteractionEvent::DrawEnd { geometry }) => {
                let Some(target) = self.target.take() else {
                    return;
                };
                if let Geometry::Polygon(rings) = geometry {
                    if let Some(ring) = rings.first() {
                        self.apply_ring(ctx, target, ring.clone());
                    }
                }
            }
            (HOLE_DRAW, InteractionEvent::DrawAborted) => {
                self.target.set(None);
            }
            _ => {}
        }
    }
}
