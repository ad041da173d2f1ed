//! Pointer-driven interaction objects.
//!
//! An interaction translates pointer and sketch-keyboard input into
//! geometry changes while its `active` flag is set. Interactions are built
//! once per session through the registry and toggled on mode switches;
//! they are disposed only at session teardown. Rebuilding a live
//! interaction against the same feature collection mid-edit causes
//! rendering and event-ordering glitches on the host engine, so liveness
//! is only ever changed through [`Interaction::set_active`].
//!
//! Interactions mutate the shared [`FeatureSource`] directly and *return*
//! the resulting [`InteractionEvent`]s; the session dispatches those to
//! the edit modes after every borrow is released, so a mode handler can
//! freely toggle other interactions without re-entrant borrows.
//!
//! [`FeatureSource`]: super::source::FeatureSource

use super::feature::{Feature, FeatureKey};
use super::host::MapHost;
use super::source::SharedSource;
use crate::geometry::types::close_ring;
use crate::geometry::{Coord, Geometry};
use crate::input::SketchCommand;
use std::rc::Rc;

/// Layer tag for in-progress sketch previews living in a scratch source.
pub const SCRATCH_LAYER: i64 = -1;

/// What an interaction observed, for the owning mode to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A sketch gained its first vertex.
    SketchStarted { coord: Coord },
    /// A sketch was completed into a geometry.
    DrawEnd { geometry: Geometry },
    /// An in-progress sketch was cancelled.
    DrawAborted,
    /// A vertex grab began; geometry is still untouched.
    ModifyStart { keys: Vec<FeatureKey> },
    /// A vertex drag finished; geometry holds the new shape.
    ModifyEnd { keys: Vec<FeatureKey> },
    /// A feature drag began; geometry is still untouched.
    TranslateStart { key: FeatureKey },
    /// A feature drag finished.
    TranslateEnd { key: FeatureKey },
    /// A click, with the topmost feature under the pointer if any.
    Clicked {
        key: Option<FeatureKey>,
        coord: Coord,
    },
    /// The feature under the pointer changed.
    HoverChanged {
        key: Option<FeatureKey>,
        coord: Coord,
    },
    /// A press-drag gesture began.
    DragStart { coord: Coord },
    /// The pointer moved during a press-drag gesture.
    DragTick { coord: Coord },
    /// A press-drag gesture ended.
    DragEnd { coord: Coord },
    /// The pointer moved outside any gesture.
    PointerMoved { coord: Coord },
}

/// What shape a draw interaction sketches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    /// Single click creates a point.
    Point,
    /// Click-per-vertex polyline, finished explicitly.
    Line,
    /// Click-per-vertex ring, closed and finished explicitly.
    Area,
    /// Press-drag axis-aligned rectangle.
    Box,
}

/// A pointer-driven behavior object with an activation flag.
pub struct Interaction {
    kind: Kind,
    active: bool,
    disposed: bool,
}

enum Kind {
    Draw(DrawBehavior),
    Modify(ModifyBehavior),
    Translate(TranslateBehavior),
    Select(HitBehavior),
    Hover(HoverBehavior),
    Drag(DragBehavior),
    Snap,
}

impl Interaction {
    /// A sketching interaction. With a scratch source, the in-progress
    /// sketch lives there as a preview feature and never touches the real
    /// collection (the hole-cut mode relies on this).
    pub fn draw(target: DrawTarget, scratch: Option<SharedSource>) -> Self {
        Self::new(Kind::Draw(DrawBehavior {
            target,
            sketch: Vec::new(),
            scratch,
            preview: None,
        }))
    }

    /// A vertex-drag interaction over `source`, grabbing vertices within
    /// `tolerance_px` of the pointer.
    pub fn modify(
        source: SharedSource,
        layer_id: Option<i64>,
        host: Rc<dyn MapHost>,
        tolerance_px: f64,
    ) -> Self {
        Self::new(Kind::Modify(ModifyBehavior {
            hit: HitBehavior {
                source,
                layer_id,
                host,
                tolerance_px,
            },
            grabbed: None,
        }))
    }

    /// A whole-feature drag interaction.
    pub fn translate(
        source: SharedSource,
        layer_id: Option<i64>,
        host: Rc<dyn MapHost>,
        tolerance_px: f64,
    ) -> Self {
        Self::new(Kind::Translate(TranslateBehavior {
            hit: HitBehavior {
                source,
                layer_id,
                host,
                tolerance_px,
            },
            drag: None,
        }))
    }

    /// A click-to-pick interaction.
    pub fn select(
        source: SharedSource,
        layer_id: Option<i64>,
        host: Rc<dyn MapHost>,
        tolerance_px: f64,
    ) -> Self {
        Self::new(Kind::Select(HitBehavior {
            source,
            layer_id,
            host,
            tolerance_px,
        }))
    }

    /// A hover-highlight interaction; maintains the source's highlighted
    /// feature as the pointer moves.
    pub fn hover(
        source: SharedSource,
        layer_id: Option<i64>,
        host: Rc<dyn MapHost>,
        tolerance_px: f64,
    ) -> Self {
        Self::new(Kind::Hover(HoverBehavior {
            hit: HitBehavior {
                source,
                layer_id,
                host,
                tolerance_px,
            },
            current: None,
        }))
    }

    /// A press-drag-release gesture reporter for rectangle corner
    /// reshaping. The gesture only engages when the press lands on a
    /// rectangle corner within `tolerance_px`; any other press is
    /// ignored, so pointer moves keep reporting for corner probing.
    pub fn drag(
        source: SharedSource,
        layer_id: Option<i64>,
        host: Rc<dyn MapHost>,
        tolerance_px: f64,
    ) -> Self {
        Self::new(Kind::Drag(DragBehavior {
            hit: HitBehavior {
                source,
                layer_id,
                host,
                tolerance_px,
            },
            dragging: false,
        }))
    }

    /// Vertex snapping toggle. The magnetism itself is the host engine's;
    /// the editor only tracks activation.
    pub fn snap() -> Self {
        Self::new(Kind::Snap)
    }

    fn new(kind: Kind) -> Self {
        Self {
            kind,
            active: false,
            disposed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active && !self.disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The only way an interaction's liveness changes between construction
    /// and disposal. Deactivation clears transient gesture state (sketches,
    /// grabs, highlights).
    pub fn set_active(&mut self, active: bool) {
        if self.disposed || self.active == active {
            return;
        }
        self.active = active;
        if !active {
            self.reset_gesture();
        }
    }

    /// Permanently deactivates the interaction. Called exactly once per
    /// registry entry at session teardown.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.set_active(false);
        self.disposed = true;
    }

    pub fn pointer_down(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        match &mut self.kind {
            Kind::Draw(b) => b.pointer_down(coord),
            Kind::Modify(b) => b.pointer_down(coord),
            Kind::Translate(b) => b.pointer_down(coord),
            Kind::Select(b) => {
                let key = b.hit(coord);
                vec![InteractionEvent::Clicked { key, coord: *coord }]
            }
            Kind::Drag(b) => b.pointer_down(coord),
            Kind::Hover(_) | Kind::Snap => Vec::new(),
        }
    }

    pub fn pointer_move(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        match &mut self.kind {
            Kind::Draw(b) => b.pointer_move(coord),
            Kind::Modify(b) => b.pointer_move(coord),
            Kind::Translate(b) => b.pointer_move(coord),
            Kind::Hover(b) => b.pointer_move(coord),
            Kind::Drag(b) => b.pointer_move(coord),
            Kind::Select(_) | Kind::Snap => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        match &mut self.kind {
            Kind::Draw(b) => b.pointer_up(coord),
            Kind::Modify(b) => b.pointer_up(coord),
            Kind::Translate(b) => b.pointer_up(coord),
            Kind::Drag(b) => b.pointer_up(coord),
            _ => Vec::new(),
        }
    }

    /// Routes an in-progress sketch command (Enter/Escape/Backspace).
    pub fn sketch_command(&mut self, command: SketchCommand) -> Vec<InteractionEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        match &mut self.kind {
            Kind::Draw(b) => match command {
                SketchCommand::Finish => b.finish(),
                SketchCommand::Cancel => b.cancel(),
                SketchCommand::UndoVertex => b.undo_vertex(),
            },
            _ => Vec::new(),
        }
    }

    /// Discards the in-progress sketch, if any. Used by modes that veto a
    /// sketch the moment it starts (hole-cut outside any polygon).
    pub fn cancel_sketch(&mut self) -> Vec<InteractionEvent> {
        match &mut self.kind {
            Kind::Draw(b) => b.cancel(),
            _ => Vec::new(),
        }
    }

    /// True while a sketch has at least one vertex.
    pub fn sketch_in_progress(&self) -> bool {
        match &self.kind {
            Kind::Draw(b) => !b.sketch.is_empty(),
            _ => false,
        }
    }

    fn reset_gesture(&mut self) {
        match &mut self.kind {
            Kind::Draw(b) => {
                b.cancel();
            }
            Kind::Modify(b) => b.grabbed = None,
            Kind::Translate(b) => b.drag = None,
            Kind::Hover(b) => b.clear(),
            Kind::Drag(b) => b.dragging = false,
            Kind::Select(_) | Kind::Snap => {}
        }
    }
}

/// Shared hit-testing plumbing: source + layer scope + pixel tolerance.
struct HitBehavior {
    source: SharedSource,
    layer_id: Option<i64>,
    host: Rc<dyn MapHost>,
    tolerance_px: f64,
}

impl HitBehavior {
    fn tolerance_at(&self, coord: &Coord) -> f64 {
        self.host.map_units_per_pixel(coord) * self.tolerance_px
    }

    fn hit(&self, coord: &Coord) -> Option<FeatureKey> {
        self.source
            .borrow()
            .hit_test(coord, self.tolerance_at(coord), self.layer_id)
    }
}

struct DrawBehavior {
    target: DrawTarget,
    sketch: Vec<Coord>,
    scratch: Option<SharedSource>,
    preview: Option<FeatureKey>,
}

impl DrawBehavior {
    fn pointer_down(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        match self.target {
            DrawTarget::Point => vec![
                InteractionEvent::SketchStarted { coord: *coord },
                InteractionEvent::DrawEnd {
                    geometry: Geometry::Point(*coord),
                },
            ],
            DrawTarget::Line | DrawTarget::Area => {
                self.sketch.push(*coord);
                self.sync_preview();
                if self.sketch.len() == 1 {
                    vec![InteractionEvent::SketchStarted { coord: *coord }]
                } else {
                    Vec::new()
                }
            }
            DrawTarget::Box => {
                if self.sketch.is_empty() {
                    self.sketch.push(*coord);
                    vec![InteractionEvent::SketchStarted { coord: *coord }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn pointer_move(&mut self, _coord: &Coord) -> Vec<InteractionEvent> {
        Vec::new()
    }

    fn pointer_up(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if self.target == DrawTarget::Box {
            if let Some(anchor) = self.sketch.first().copied() {
                if anchor != *coord {
                    self.clear_sketch();
                    return vec![InteractionEvent::DrawEnd {
                        geometry: rectangle_from_corners(&anchor, coord),
                    }];
                }
            }
        }
        Vec::new()
    }

    fn finish(&mut self) -> Vec<InteractionEvent> {
        let geometry = match self.target {
            DrawTarget::Line if self.sketch.len() >= 2 => {
                Some(Geometry::LineString(self.sketch.clone()))
            }
            DrawTarget::Area if self.sketch.len() >= 3 => {
                Some(Geometry::Polygon(vec![close_ring(self.sketch.clone())]))
            }
            _ => None,
        };
        match geometry {
            Some(geometry) => {
                self.clear_sketch();
                vec![InteractionEvent::DrawEnd { geometry }]
            }
            // Not enough vertices yet; keep sketching
            None => Vec::new(),
        }
    }

    fn cancel(&mut self) -> Vec<InteractionEvent> {
        if self.sketch.is_empty() {
            return Vec::new();
        }
        self.clear_sketch();
        vec![InteractionEvent::DrawAborted]
    }

    fn undo_vertex(&mut self) -> Vec<InteractionEvent> {
        if self.sketch.pop().is_some() {
            self.sync_preview();
        }
        Vec::new()
    }

    /// Keeps the scratch preview feature in step with the sketch buffer.
    fn sync_preview(&mut self) {
        let Some(scratch) = &self.scratch else {
            return;
        };
        let mut scratch = scratch.borrow_mut();
        if self.sketch.is_empty() {
            if let Some(key) = self.preview.take() {
                scratch.remove(key);
            }
            return;
        }
        let geometry = Geometry::LineString(self.sketch.clone());
        match self.preview {
            Some(key) => {
                scratch.set_geometry(key, geometry);
            }
            None => {
                self.preview = Some(scratch.insert(Feature::new(SCRATCH_LAYER, geometry)));
            }
        }
    }

    fn clear_sketch(&mut self) {
        self.sketch.clear();
        self.sync_preview();
    }
}

struct ModifyBehavior {
    hit: HitBehavior,
    grabbed: Option<(FeatureKey, usize)>,
}

impl ModifyBehavior {
    fn pointer_down(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        let tolerance = self.hit.tolerance_at(coord);
        let source = self.hit.source.borrow();
        let mut best: Option<(FeatureKey, usize, f64)> = None;
        for (key, feature) in source.iter() {
            if feature.deleted {
                continue;
            }
            if let Some(layer) = self.hit.layer_id {
                if feature.layer_id != layer {
                    continue;
                }
            }
            for (index, vertex) in feature.geometry.vertices().iter().enumerate() {
                let d = vertex.distance_sq(coord).sqrt();
                if d <= tolerance && best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((key, index, d));
                }
            }
        }
        drop(source);
        match best {
            Some((key, index, _)) => {
                self.grabbed = Some((key, index));
                vec![InteractionEvent::ModifyStart { keys: vec![key] }]
            }
            None => Vec::new(),
        }
    }

    fn pointer_move(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if let Some((key, index)) = self.grabbed {
            self.hit
                .source
                .borrow_mut()
                .update_geometry(key, |g| {
                    g.set_vertex(index, *coord);
                });
        }
        Vec::new()
    }

    fn pointer_up(&mut self, _coord: &Coord) -> Vec<InteractionEvent> {
        match self.grabbed.take() {
            Some((key, _)) => vec![InteractionEvent::ModifyEnd { keys: vec![key] }],
            None => Vec::new(),
        }
    }
}

struct TranslateBehavior {
    hit: HitBehavior,
    drag: Option<(FeatureKey, Coord)>,
}

impl TranslateBehavior {
    fn pointer_down(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        match self.hit.hit(coord) {
            Some(key) => {
                self.drag = Some((key, *coord));
                vec![InteractionEvent::TranslateStart { key }]
            }
            None => Vec::new(),
        }
    }

    fn pointer_move(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if let Some((key, last)) = &mut self.drag {
            let dx = coord.x - last.x;
            let dy = coord.y - last.y;
            let key = *key;
            *last = *coord;
            self.hit
                .source
                .borrow_mut()
                .update_geometry(key, |g| g.translate(dx, dy));
        }
        Vec::new()
    }

    fn pointer_up(&mut self, _coord: &Coord) -> Vec<InteractionEvent> {
        match self.drag.take() {
            Some((key, _)) => vec![InteractionEvent::TranslateEnd { key }],
            None => Vec::new(),
        }
    }
}

struct HoverBehavior {
    hit: HitBehavior,
    current: Option<FeatureKey>,
}

impl HoverBehavior {
    fn pointer_move(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        let hit = self.hit.hit(coord);
        if hit == self.current {
            return Vec::new();
        }
        self.current = hit;
        self.hit.source.borrow_mut().set_highlighted(hit);
        vec![InteractionEvent::HoverChanged { key: hit, coord: *coord }]
    }

    fn clear(&mut self) {
        if let Some(current) = self.current.take() {
            let mut source = self.hit.source.borrow_mut();
            if source.highlighted() == Some(current) {
                source.set_highlighted(None);
            }
        }
    }
}

struct DragBehavior {
    hit: HitBehavior,
    dragging: bool,
}

impl DragBehavior {
    fn over_corner(&self, coord: &Coord) -> bool {
        let tolerance = self.hit.tolerance_at(coord);
        let tol_sq = tolerance * tolerance;
        let source = self.hit.source.borrow();
        let over = source.iter().any(|(_, feature)| {
            if feature.deleted {
                return false;
            }
            if let Some(layer) = self.hit.layer_id {
                if feature.layer_id != layer {
                    return false;
                }
            }
            rectangle_corners(&feature.geometry).map_or(false, |corners| {
                corners.iter().any(|c| c.distance_sq(coord) <= tol_sq)
            })
        });
        over
    }

    fn pointer_down(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if !self.over_corner(coord) {
            return Vec::new();
        }
        self.dragging = true;
        vec![InteractionEvent::DragStart { coord: *coord }]
    }

    fn pointer_move(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if self.dragging {
            vec![InteractionEvent::DragTick { coord: *coord }]
        } else {
            vec![InteractionEvent::PointerMoved { coord: *coord }]
        }
    }

    fn pointer_up(&mut self, coord: &Coord) -> Vec<InteractionEvent> {
        if self.dragging {
            self.dragging = false;
            vec![InteractionEvent::DragEnd { coord: *coord }]
        } else {
            Vec::new()
        }
    }
}

/// Extracts the four distinct corners of a rectangle polygon (a single
/// closed five-coordinate ring).
pub fn rectangle_corners(geometry: &Geometry) -> Option<[Coord; 4]> {
    let Geometry::Polygon(rings) = geometry else {
        return None;
    };
    let ring = rings.first()?;
    if ring.len() != 5 {
        return None;
    }
    Some([ring[0], ring[1], ring[2], ring[3]])
}

/// Builds the 5-coordinate axis-aligned rectangle ring spanned by two
/// opposite corners.
pub fn rectangle_from_corners(a: &Coord, b: &Coord) -> Geometry {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    Geometry::Polygon(vec![vec![
        Coord::xy(min_x, min_y),
        Coord::xy(max_x, min_y),
        Coord::xy(max_x, max_y),
        Coord::xy(min_x, max_y),
        Coord::xy(min_x, min_y),
    ]])
}
