//! Keyboard mapping for in-progress sketches.

/// A key event as delivered by the host application.
///
/// The host map owns the real keyboard; it forwards whatever subset it
/// wants the editor to see, translated into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Esc,
    Backspace,
    Char(char),
    Ctrl(char),
}

/// Commands applicable to an in-progress sketch.
///
/// These mirror the inline draw controls on the toolbar: finish the
/// sketch, cancel it, or drop the last placed vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchCommand {
    /// Commit the sketch as a finished geometry (Enter).
    Finish,
    /// Discard the sketch entirely (Escape).
    Cancel,
    /// Remove the most recently placed vertex (Backspace or Ctrl+Z).
    UndoVertex,
}

/// Maps a key event to a sketch command.
///
/// # Examples
///
/// ```
/// use mapquill::input::keys::{map_key, Key, SketchCommand};
///
/// assert_eq!(map_key(Key::Enter), Some(SketchCommand::Finish));
/// assert_eq!(map_key(Key::Esc), Some(SketchCommand::Cancel));
/// assert_eq!(map_key(Key::Ctrl('z')), Some(SketchCommand::UndoVertex));
/// assert_eq!(map_key(Key::Char('x')), None);
/// ```
pub fn map_key(key: Key) -> Option<SketchCommand> {
    match key {
        Key::Enter => Some(SketchCommand::Finish),
        Key::Esc => Some(SketchCommand::Cancel),
        Key::Backspace => Some(SketchCommand::UndoVertex),
        Key::Ctrl('z') => Some(SketchCommand::UndoVertex),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sketch_key_bindings() {
        assert_eq!(map_key(Key::Enter), Some(SketchCommand::Finish));
        assert_eq!(map_key(Key::Esc), Some(SketchCommand::Cancel));
        assert_eq!(map_key(Key::Backspace), Some(SketchCommand::UndoVertex));
        assert_eq!(map_key(Key::Ctrl('z')), Some(SketchCommand::UndoVertex));
    }

    #[test]
    fn test_unbound_keys_map_to_nothing() {
        assert_eq!(map_key(Key::Char('a')), None);
        assert_eq!(map_key(Key::Ctrl('c')), None);
    }
}
