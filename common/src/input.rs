//! Platform-independent input events delivered to scenes

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer event with the position in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        position: Vec2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Move {
        position: Vec2,
        modifiers: Modifiers,
    },
    Up {
        position: Vec2,
        button: PointerButton,
    },
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => Some(position),
            PointerEvent::Leave => None,
        }
    }
}

/// Scroll wheel. Positive `delta` means the wheel rolled toward the user, which zooms out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Vec2,
    pub delta: f32,
}

/// Keys scenes react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Reset,
    Delete,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
    Char(char),
}
