// MODEL: application state and data
pub mod camera;
pub mod settings;
pub mod state;

pub use camera::{displace, CameraState};
pub use settings::{LiveSettings, Quality, SettingsStore};
pub use state::AppState;
