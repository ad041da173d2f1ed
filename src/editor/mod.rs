//! Edit sessions, modes, undo, and the session coordinator.
//!
//! The heart of the engine: an [`EditSession`] per editable resource
//! owns an undo stack of one-shot reversal closures, an interaction
//! registry, and the mutually-exclusive mode set; the
//! [`SessionCoordinator`] creates and destroys sessions as the
//! editable-resource set changes and runs the stop-editing
//! confirmation before a dirty session is dropped.
//!
//! [`EditSession`]: session::EditSession
//! [`SessionCoordinator`]: coordinator::SessionCoordinator

pub mod context;
pub mod coordinator;
pub mod modes;
pub mod registry;
pub mod session;
pub mod undo;

pub use context::{DialogHost, EditContext, FormOutcome, MessageSink, StopDecision};
pub use coordinator::SessionCoordinator;
pub use modes::{standard_modes, EditMode, ModeKey};
pub use registry::InteractionRegistry;
pub use session::{EditSession, LoadOutcome, LoadTicket};
pub use undo::{UndoEntry, UndoStack};
