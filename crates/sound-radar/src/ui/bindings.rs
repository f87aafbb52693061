//! Keyboard bindings and input handling.

use nannou::prelude::*;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ToggleDebug,
    /// Switch between winner-take-all and multi-direction shaping
    ToggleStrengthMode,
    /// Open the next capture device with enough channels
    NextDevice,
}

pub fn parse_key(key: Key) -> Option<Action> {
    match key {
        Key::Q | Key::Escape => Some(Action::Quit),
        Key::D => Some(Action::ToggleDebug),
        Key::M => Some(Action::ToggleStrengthMode),
        Key::N => Some(Action::NextDevice),
        _ => None,
    }
}
