use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::controller::menu::MenuKey;

/// Modifier that switches the fly speed from walk to sprint while held.
pub const SPRINT_KEY: KeyCode = KeyCode::ShiftLeft;

/// Raw input accumulated between frames.
///
/// Relative mouse motion piles up in `look_delta` until the frame loop
/// consumes it; held keys are polled from `pressed_keys` for continuous
/// movement.
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
    pub look_delta: (f32, f32),
    pub sprint: bool,
    pub focused: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            look_delta: (0.0, 0.0),
            sprint: false,
            focused: true,
        }
    }

    pub fn key_down(&mut self, code: KeyCode) {
        self.pressed_keys.insert(code);
        if code == SPRINT_KEY {
            self.sprint = true;
        }
    }

    pub fn key_up(&mut self, code: KeyCode) {
        self.pressed_keys.remove(&code);
        if code == SPRINT_KEY {
            self.sprint = false;
        }
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.pressed_keys.contains(&code)
    }

    pub fn add_look(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    /// Take the accumulated mouse delta, leaving zero behind.
    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    /// Dropped focus means key-up events can be lost; forget everything.
    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.sprint = false;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a physical key to the menu's discrete vocabulary.
///
/// W/S/A/D double as menu navigation while paused and movement while
/// unpaused; the pause flag decides which consumer sees them.
pub fn menu_key(code: KeyCode) -> Option<MenuKey> {
    match code {
        KeyCode::Escape => Some(MenuKey::Escape),
        KeyCode::Enter => Some(MenuKey::Confirm),
        KeyCode::KeyW => Some(MenuKey::Up),
        KeyCode::KeyS => Some(MenuKey::Down),
        KeyCode::KeyA => Some(MenuKey::Left),
        KeyCode::KeyD => Some(MenuKey::Right),
        _ => None,
    }
}
