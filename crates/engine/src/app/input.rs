use std::collections::HashSet;

use glam::Vec2;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Dismiss,
    ToggleOverlay,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    /// x = right - left, y = back - forward. Forward is -z in the world.
    pub(crate) fn direction(&self) -> Vec2 {
        let axis = |positive: InputAction, negative: InputAction| {
            f32::from(u8::from(self.is_down(positive))) - f32::from(u8::from(self.is_down(negative)))
        };
        Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveBack, InputAction::MoveForward),
        )
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveForward => 0,
            InputAction::MoveBack => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Dismiss => 4,
            InputAction::ToggleOverlay => 5,
        }
    }

    pub fn for_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::MoveForward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::MoveBack),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
            KeyCode::Escape => Some(InputAction::Dismiss),
            KeyCode::F3 => Some(InputAction::ToggleOverlay),
            _ => None,
        }
    }
}

/// Physical keys currently held. An action is down while any of its keys is
/// held, so W and ArrowUp together still count once.
#[derive(Debug, Clone, Default)]
pub(crate) struct PressedKeys {
    keys: HashSet<KeyCode>,
}

impl PressedKeys {
    /// Returns true when the key was not already held.
    pub(crate) fn press(&mut self, key: KeyCode) -> bool {
        self.keys.insert(key)
    }

    pub(crate) fn release(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }

    pub(crate) fn action_states(&self) -> ActionStates {
        let mut states = ActionStates::default();
        for action in self.keys.iter().copied().filter_map(InputAction::for_key) {
            states.set(action, true);
        }
        states
    }
}
