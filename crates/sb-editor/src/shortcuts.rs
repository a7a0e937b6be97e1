//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the WASM bridge and tests share it.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the hovered object (with its connections) or connection.
    DeleteHovered,
    /// Toggle the hovered connection between solid and dashed.
    ToggleLineStyle,
    ExtendCanvasRight,
    ExtendCanvasDown,
    CancelDraw,
}

impl ShortcutAction {
    /// Whether the action may fire while a text field has focus.
    pub fn allowed_while_editing(self) -> bool {
        matches!(self, ShortcutAction::CancelDraw)
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "ArrowRight" => Some(ShortcutAction::ExtendCanvasRight),
                "ArrowDown" => Some(ShortcutAction::ExtendCanvasDown),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteHovered),
            "Escape" => Some(ShortcutAction::CancelDraw),
            "d" | "D" => Some(ShortcutAction::ToggleLineStyle),
            _ => None,
        }
    }
}
