//! Keyboard input mapping.
//!
//! The host application forwards keyboard events while a sketch is in
//! progress; this module maps them to the editor's sketch commands
//! (Enter = finish, Escape = cancel, Backspace / Ctrl+Z = undo vertex).

pub mod keys;

pub use keys::{map_key, Key, SketchCommand};
