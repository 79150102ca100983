use std::collections::BTreeSet;

use glam::Vec2;

use crate::action::{InputEvent, MoveAction};
use crate::bindings::KeyBindings;

/// Per-axis movement intent, each component in `[-1, 1]`.
///
/// `forward` and `right` are relative to the view; `up` is world-up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0 && self.up == 0.0
    }
}

/// What the user is currently doing, recorded between steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: BTreeSet<String>,
    pointer_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { code } => {
                if self.held.insert(code.clone()) {
                    tracing::trace!(code = %code, "key down");
                }
            }
            InputEvent::KeyUp { code } => {
                self.held.remove(code);
            }
            InputEvent::PointerMove { dx, dy } => {
                self.pointer_delta += Vec2::new(*dx, *dy);
            }
        }
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    pub fn held(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }

    /// Pointer movement accumulated since the last call, which resets it.
    pub fn take_pointer_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.pointer_delta)
    }

    pub fn pending_pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Combine the held keys into an intent. Opposing keys cancel.
    pub fn move_intent(&self, bindings: &KeyBindings) -> MoveIntent {
        let axis = |pos: MoveAction, neg: MoveAction| {
            let p = self.is_held(bindings.code(pos)) as i8;
            let n = self.is_held(bindings.code(neg)) as i8;
            f32::from(p - n)
        };
        MoveIntent {
            forward: axis(MoveAction::Forward, MoveAction::Back),
            right: axis(MoveAction::Right, MoveAction::Left),
            up: axis(MoveAction::Up, MoveAction::Down),
        }
    }

    /// Forget everything, e.g. when the host loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pointer_delta = Vec2::ZERO;
    }
}
