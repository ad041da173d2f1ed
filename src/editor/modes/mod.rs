//! Interactive edit modes.
//!
//! A session exposes a closed set of mutually-exclusive editing
//! behaviors; exactly one (or none) is active at a time. Snapping is a
//! separate, orthogonal toggle owned by the session itself, not part of
//! this group.
//!
//! Each mode owns one or more interactions obtained from the session's
//! registry: attaching constructs them once, activation toggles their
//! liveness, and [`EditMode::handle`] consumes the events they emit,
//! mutating the feature collection and registering reversal closures on
//! the session's undo stack.
//!
//! # Modes
//!
//! - `draw`: sketch new features, with the attribute-entry form
//! - `modify`: drag individual vertices
//! - `translate`: drag whole features ("move")
//! - `delete`: click to soft-delete
//! - `hole`: cut interior rings into polygons
//! - `attribute`: edit a feature's attribute payload
//! - `rectangle`: draw and corner-drag axis-aligned rectangles

pub mod attribute;
pub mod delete;
pub mod draw;
pub mod hole;
pub mod modify;
pub mod rectangle;
pub mod snap;
pub mod translate;

use super::context::EditContext;
use crate::map::interaction::InteractionEvent;
use std::fmt;
use std::rc::Rc;

/// Identifies one of the mutually-exclusive edit modes.
///
/// # Examples
///
/// ```
/// use mapquill::editor::modes::ModeKey;
///
/// assert_eq!(ModeKey::default(), ModeKey::Draw);
/// assert_eq!(format!("{}", ModeKey::Hole), "HOLE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKey {
    /// Sketch new features.
    Draw,
    /// Drag individual vertices of existing features.
    Modify,
    /// Drag whole features.
    Move,
    /// Click to soft-delete features.
    Delete,
    /// Cut interior rings into polygons.
    Hole,
    /// Edit attribute payloads.
    Attribute,
    /// Draw and reshape axis-aligned rectangles.
    RectEdit,
}

impl fmt::Display for ModeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeKey::Draw => write!(f, "DRAW"),
            ModeKey::Modify => write!(f, "MODIFY"),
            ModeKey::Move => write!(f, "MOVE"),
            ModeKey::Delete => write!(f, "DELETE"),
            ModeKey::Hole => write!(f, "HOLE"),
            ModeKey::Attribute => write!(f, "ATTRIBUTE"),
            ModeKey::RectEdit => write!(f, "RECTANGLE"),
        }
    }
}

impl Default for ModeKey {
    /// A session starts in draw mode.
    fn default() -> Self {
        ModeKey::Draw
    }
}

/// One interactive editing behavior.
///
/// Modes are created once per session and hold their transient state in
/// interior-mutable cells; the session drives them through this trait.
pub trait EditMode {
    fn key(&self) -> ModeKey;

    /// Constructs the mode's interactions through the registry. Runs once
    /// at session build; interactions start inactive.
    fn attach(&self, ctx: &EditContext);

    /// Activates the mode's interactions (the mode became current).
    fn activate(&self, ctx: &EditContext);

    /// Deactivates the mode's interactions and drops transient gesture
    /// state.
    fn deactivate(&self, ctx: &EditContext);

    /// Consumes an event emitted by the interaction registered under
    /// `interaction`. Called after all interaction borrows are released.
    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent);
}

/// Builds the full mode set for a session.
pub fn standard_modes() -> Vec<Rc<dyn EditMode>> {
    vec![
        Rc::new(draw::DrawMode),
        Rc::new(modify::ModifyMode::new()),
        Rc::new(translate::MoveMode::new()),
        Rc::new(delete::DeleteMode),
        Rc::new(hole::HoleMode::new()),
        Rc::new(attribute::AttributeMode),
        Rc::new(rectangle::RectEditMode::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_draw() {
        assert_eq!(ModeKey::default(), ModeKey::Draw);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(format!("{}", ModeKey::Draw), "DRAW");
        assert_eq!(format!("{}", ModeKey::RectEdit), "RECTANGLE");
    }

    #[test]
    fn test_standard_mode_set_is_complete() {
        let modes = standard_modes();
        let keys: Vec<ModeKey> = modes.iter().map(|m| m.key()).collect();
        assert_eq!(
            keys,
            vec![
                ModeKey::Draw,
                ModeKey::Modify,
                ModeKey::Move,
                ModeKey::Delete,
                ModeKey::Hole,
                ModeKey::Attribute,
                ModeKey::RectEdit,
            ]
        );
    }
}
