//! Input events from the page, in viewport space.

use sb_core::model::Point;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Scroll offset of the canvas container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Viewport {
    /// Convert a viewport-relative pointer position to canvas space.
    pub fn to_canvas(&self, x: f32, y: f32) -> Point {
        Point::new(x + self.scroll_x, y + self.scroll_y)
    }
}

/// A single UI event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, modifiers: Modifiers },
    PointerMove { x: f32, y: f32, modifiers: Modifiers },
    PointerUp { x: f32, y: f32, modifiers: Modifiers },
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`).
    /// `editing` is set while a text field on the board has focus.
    Key {
        key: String,
        modifiers: Modifiers,
        editing: bool,
    },
    /// A palette item dropped on the canvas, carrying its type token.
    Drop { token: String, x: f32, y: f32 },
    /// New absolute scroll offset of the canvas container.
    Scroll { x: f32, y: f32 },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerDown { x, y, modifiers }
    }

    pub fn from_pointer_move(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn from_pointer_up(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerUp { x, y, modifiers }
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
            editing: false,
        }
    }

    /// A key typed into an object's text field.
    pub fn editing_key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
            editing: true,
        }
    }
}
