use crate::model::camera::CameraState;
use crate::model::settings::{LiveSettings, SettingsStore};

/// Shared mutable state threaded through the scheduler, menu, and camera.
///
/// `paused` gates input routing: while set, key events drive the menu and
/// the camera is frozen. `live` holds the currently published settings; the
/// menu overwrites it after every adjustment.
pub struct AppState {
    pub paused: bool,
    pub camera: CameraState,
    pub live: LiveSettings,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            paused: false,
            camera: CameraState::new(),
            live: SettingsStore::default().publish(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
