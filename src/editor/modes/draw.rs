//! Draw mode: sketch new features.

use super::{EditMode, ModeKey};
use crate::editor::context::{EditContext, FormOutcome};
use crate::geometry::{Geometry, GeometryKind};
use crate::map::feature::{Feature, FeatureKey};
use crate::map::interaction::{DrawTarget, Interaction, InteractionEvent};

/// Registry key of the draw interaction.
pub const DRAW: &str = "draw";

/// Sketches a new feature per click (points) or per vertex (lines,
/// polygons), then runs the attribute-entry flow.
///
/// When the dialog host reports a cancel, the feature is removed again
/// synchronously and *no* undo entry is pushed — from the user's point of
/// view the creation never happened. A confirmed (or absent) form pushes
/// an undo that removes the feature.
pub struct DrawMode;

/// Picks the sketch shape for a layer's geometry kind.
fn target_for(kind: GeometryKind) -> DrawTarget {
    match kind {
        GeometryKind::Point | GeometryKind::MultiPoint => DrawTarget::Point,
        GeometryKind::LineString | GeometryKind::MultiLineString => DrawTarget::Line,
        GeometryKind::Polygon | GeometryKind::MultiPolygon => DrawTarget::Area,
    }
}

/// Wraps a sketched simple geometry into the layer's multi-kind when the
/// layer stores multi-geometries.
pub fn wrap_for_layer(geometry: Geometry, kind: GeometryKind) -> Geometry {
    match (kind, geometry) {
        (GeometryKind::MultiPoint, Geometry::Point(c)) => Geometry::MultiPoint(vec![c]),
        (GeometryKind::MultiLineString, Geometry::LineString(cs)) => {
            Geometry::MultiLineString(vec![cs])
        }
        (GeometryKind::MultiPolygon, Geometry::Polygon(rings)) => {
            Geometry::MultiPolygon(vec![rings])
        }
        (_, geometry) => geometry,
    }
}

fn push_remove_undo(ctx: &EditContext, key: FeatureKey) {
    let source = ctx.source.clone();
    ctx.add_undo(move || {
        source.borrow_mut().remove(key);
    });
}

impl EditMode for DrawMode {
    fn key(&self) -> ModeKey {
        ModeKey::Draw
    }

    fn attach(&self, ctx: &EditContext) {
        let target = target_for(ctx.geom.kind);
        ctx.registry
            .borrow_mut()
            .get(DRAW, || Interaction::draw(target, None));
    }

    fn activate(&self, ctx: &EditContext) {
        ctx.registry.borrow().set_active(DRAW, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        ctx.registry.borrow().set_active(DRAW, false);
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        if interaction != DRAW {
            return;
        }
        let InteractionEvent::DrawEnd { geometry } = event else {
            return;
        };

        let geometry = wrap_for_layer(geometry.clone(), ctx.geom.kind);
        let key = ctx
            .source
            .borrow_mut()
            .insert(Feature::new(ctx.layer_id, geometry));

        match ctx.dialogs.feature_form(ctx.layer_id, None) {
            FormOutcome::Cancelled => {
                // The creation never happened: remove synchronously,
                // leave the undo stack untouched.
                ctx.source.borrow_mut().remove(key);
            }
            FormOutcome::Submitted(fields) => {
                ctx.source.borrow_mut().set_attribution(key, Some(fields));
                push_remove_undo(ctx, key);
            }
            FormOutcome::Unavailable => {
                push_remove_undo(ctx, key);
            }
        }
    }
}
