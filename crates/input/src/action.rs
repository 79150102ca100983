use serde::{Deserialize, Serialize};

/// A raw event delivered by the host's input stream.
///
/// Key codes are host key codes such as `"KeyW"` or `"Space"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyDown { code: String },
    KeyUp { code: String },
    PointerMove { dx: f32, dy: f32 },
}

impl InputEvent {
    pub fn key_down(code: impl Into<String>) -> Self {
        Self::KeyDown { code: code.into() }
    }

    pub fn key_up(code: impl Into<String>) -> Self {
        Self::KeyUp { code: code.into() }
    }

    pub fn pointer(dx: f32, dy: f32) -> Self {
        Self::PointerMove { dx, dy }
    }
}

/// A translation intent that a bound key can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl MoveAction {
    pub const ALL: [MoveAction; 6] = [
        Self::Forward,
        Self::Back,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
    ];
}
