// CONTROLLER: input, menu logic, and camera movement
pub mod audio;
pub mod camera_controller;
pub mod input;
pub mod menu;

pub use audio::{Cue, CueSink, NullSink, RodioSink};
pub use camera_controller::CameraController;
pub use input::InputState;
pub use menu::{Menu, MenuKey, MenuMode, MenuSignal};
