//! Keyboard shortcuts available while the overlay has focus.

use super::targeting::{InteractionMode, TargetingCalculator};

/// A key press, reduced to what the shortcuts care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ArtilleryMode,
    TargetMode,
    Clear,
    CloseOverlay,
}

impl Shortcut {
    /// Maps a key press to a shortcut.
    ///
    /// `1`/`2` pick the placement mode, `C` clears, `Escape` or `Ctrl+W`
    /// closes the overlay.
    pub fn from_key(key: KeyInput, ctrl: bool) -> Option<Self> {
        match key {
            KeyInput::Escape => Some(Shortcut::CloseOverlay),
            KeyInput::Char(c) => match c.to_ascii_lowercase() {
                'w' if ctrl => Some(Shortcut::CloseOverlay),
                '1' => Some(Shortcut::ArtilleryMode),
                '2' => Some(Shortcut::TargetMode),
                'c' => Some(Shortcut::Clear),
                _ => None,
            },
            KeyInput::Other => None,
        }
    }
}

impl TargetingCalculator<'_> {
    /// Applies a shortcut that only touches calculator state.
    ///
    /// Returns `false` for shortcuts the host must handle (closing).
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::ArtilleryMode => self.set_mode(InteractionMode::Artillery),
            Shortcut::TargetMode => self.set_mode(InteractionMode::Target),
            Shortcut::Clear => self.clear(),
            Shortcut::CloseOverlay => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MapCatalog;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Shortcut::from_key(KeyInput::Char('1'), false), Some(Shortcut::ArtilleryMode));
        assert_eq!(Shortcut::from_key(KeyInput::Char('2'), false), Some(Shortcut::TargetMode));
        assert_eq!(Shortcut::from_key(KeyInput::Char('C'), false), Some(Shortcut::Clear));
        assert_eq!(Shortcut::from_key(KeyInput::Char('c'), true), Some(Shortcut::Clear));
        assert_eq!(Shortcut::from_key(KeyInput::Escape, false), Some(Shortcut::CloseOverlay));
        assert_eq!(Shortcut::from_key(KeyInput::Char('w'), true), Some(Shortcut::CloseOverlay));
        assert_eq!(Shortcut::from_key(KeyInput::Char('w'), false), None);
        assert_eq!(Shortcut::from_key(KeyInput::Other, true), None);
    }

    #[test]
    fn test_apply_shortcut() {
        let mut calc = TargetingCalculator::new(MapCatalog::builtin());
        assert!(calc.apply_shortcut(Shortcut::TargetMode));
        assert_eq!(calc.mode(), InteractionMode::Target);
        assert!(calc.apply_shortcut(Shortcut::Clear));
        assert_eq!(calc.mode(), InteractionMode::Artillery);
        assert!(!calc.apply_shortcut(Shortcut::CloseOverlay));
    }
}
