use serde::{Deserialize, Serialize};

use crate::action::MoveAction;

/// Key codes bound to each movement intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub back: String,
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".into(),
            back: "KeyS".into(),
            left: "KeyA".into(),
            right: "KeyD".into(),
            up: "KeyQ".into(),
            down: "KeyZ".into(),
        }
    }
}

impl KeyBindings {
    pub fn code(&self, action: MoveAction) -> &str {
        match action {
            MoveAction::Forward => &self.forward,
            MoveAction::Back => &self.back,
            MoveAction::Left => &self.left,
            MoveAction::Right => &self.right,
            MoveAction::Up => &self.up,
            MoveAction::Down => &self.down,
        }
    }

    /// The intent bound to `code`, if any. First match in [`MoveAction::ALL`] order wins.
    pub fn action_for(&self, code: &str) -> Option<MoveAction> {
        MoveAction::ALL.into_iter().find(|&a| self.code(a) == code)
    }
}
