use std::path::Path;
use std::sync::Arc;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window},
};

use corridor::{logging, ui};

use corridor::controller::audio::{self, CueSink};
use corridor::controller::{input, CameraController, InputState, Menu, MenuSignal};
use corridor::frame_loop::FrameClock;
use corridor::model::AppState;
use corridor::view::{load_background, Compositor, GpuContext, Surface};

const BACKGROUND_PATH: &str = "Textures/Concrete.jpg";

struct App {
    window: Arc<Window>,

    // GPU resources
    gpu: GpuContext,
    compositor: Compositor,

    // CPU-side frame data
    ui_surface: Surface,
    background: image::RgbaImage,

    // Simulation state
    state: AppState,
    menu: Menu,
    camera_controller: CameraController,
    input_state: InputState,
    cues: Box<dyn CueSink>,

    // Frame timing
    clock: FrameClock,
    grabbed: bool,
    exit_requested: bool,
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone()).await;
        let compositor = Compositor::new(&gpu);

        let ui_surface = Surface::new(gpu.config.width, gpu.config.height);
        let background = load_background(Path::new(BACKGROUND_PATH));

        let state = AppState::new();
        let clock = FrameClock::new(state.live.fps_cap);

        Self {
            window,
            gpu,
            compositor,
            ui_surface,
            background,
            state,
            menu: Menu::new(),
            camera_controller: CameraController::new(),
            input_state: InputState::new(),
            cues: audio::default_sink(),
            clock,
            grabbed: false,
            exit_requested: false,
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent { state, physical_key, repeat, .. },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            self.input_state.key_down(*code);
                            if !*repeat {
                                if let Some(key) = input::menu_key(*code) {
                                    let signal = self.menu.handle_key(
                                        key,
                                        &mut self.state,
                                        self.cues.as_mut(),
                                    );
                                    self.handle_signal(signal);
                                }
                            }
                        }
                        ElementState::Released => {
                            self.input_state.key_up(*code);
                        }
                    }
                }
                true
            }
            WindowEvent::Focused(focused) => {
                self.input_state.focused = *focused;
                if !focused {
                    // Key-up events can be lost while unfocused.
                    self.input_state.clear_keys();
                }
                true
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                // Reserved hook; mouse buttons are currently unbound.
                true
            }
            _ => false,
        }
    }

    fn handle_signal(&mut self, signal: Option<MenuSignal>) {
        match signal {
            Some(MenuSignal::Exit) => self.exit_requested = true,
            Some(MenuSignal::SpawnEnemy) => tracing::info!("spawn enemy requested"),
            Some(MenuSignal::KillAll) => tracing::info!("kill all requested"),
            None => {}
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gpu.resize(new_size.width, new_size.height);
            self.ui_surface.resize(new_size.width, new_size.height);
        }
    }

    fn update(&mut self, dt: f32) {
        let (dx, dy) = self.input_state.consume_look();
        if !self.state.paused && self.input_state.focused {
            self.camera_controller.apply_look(
                &mut self.state.camera,
                dx,
                dy,
                self.state.live.sensitivity,
            );
        }

        if !self.state.paused {
            self.camera_controller
                .update_movement(&mut self.state.camera, &self.input_state, dt);
        }

        // Takes effect on the next pace call.
        self.clock.set_cap(self.state.live.fps_cap);

        self.sync_cursor();
    }

    fn sync_cursor(&mut self) {
        let want = self.input_state.focused && !self.state.paused;
        if want == self.grabbed {
            return;
        }
        if want {
            let grab = self
                .window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(err) = grab {
                tracing::warn!("cursor grab failed: {err}");
            }
            self.window.set_cursor_visible(false);
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
            self.window.set_cursor_visible(true);
        }
        self.grabbed = want;
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ui_surface.fill(ui::CLEAR_COLOR);
        if self.state.paused {
            ui::draw_menu(&mut self.ui_surface, &self.menu);
        }

        self.compositor.composite(
            &self.gpu,
            &self.ui_surface,
            &self.background,
            self.clock.elapsed(),
            &self.state.camera,
        )
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("3D Engine")
        .with_inner_size(winit::dpi::LogicalSize::new(1600, 900));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone()));

    event_loop
        .run(move |event, elwt| {
            match event {
                Event::WindowEvent { ref event, window_id } if window_id == app.window.id() => {
                    if !app.input(event) {
                        match event {
                            WindowEvent::CloseRequested => elwt.exit(),
                            WindowEvent::Resized(physical_size) => {
                                app.resize(*physical_size);
                            }
                            WindowEvent::RedrawRequested => {
                                let dt = app.clock.pace();
                                app.update(dt);

                                match app.render() {
                                    Ok(()) => {}
                                    Err(wgpu::SurfaceError::Lost) => app.gpu.reconfigure(),
                                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                    Err(e) => tracing::warn!("surface error: {e:?}"),
                                }

                                app.window.set_title(&format!("{:.1}", app.clock.fps()));
                            }
                            _ => {}
                        }
                    }
                    if app.exit_requested {
                        elwt.exit();
                    }
                }
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta },
                    ..
                } => {
                    app.input_state.add_look(delta.0 as f32, delta.1 as f32);
                }
                Event::AboutToWait => {
                    app.window.request_redraw();
                }
                _ => {}
            }
        })
        .unwrap();
}
