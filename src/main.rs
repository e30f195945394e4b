//! Skyline - procedural low-poly city
//!
//! Opens a window, mounts the stage and runs until the window is closed.

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use skyline::config::AppConfig;
use skyline::stage::{FrameStatus, Stage, StageError};
use skyline::systems::{FrameClock, RenderSystem, WindowSystem};

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    stage: Option<Stage<RenderSystem>>,
    clock: FrameClock,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            stage: None,
            clock: FrameClock::new(),
        }
    }

    /// Create the window and mount the stage into it
    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let window = WindowSystem::create(event_loop, &self.config.window)?;
        let viewport = window.viewport();

        let renderer = RenderSystem::new(
            window.window().clone(),
            &self.config.rendering,
            self.config.window.vsync,
        )
        .map_err(|e| StageError::from_context(e, viewport))?;

        let stage = Stage::mount(viewport, &self.config, renderer)?;
        window.request_redraw();

        self.window = Some(window);
        self.stage = Some(stage);
        Ok(())
    }

    /// Tear the stage down, then leave the event loop
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut stage) = self.stage.take() {
            if let Err(e) = stage.unmount() {
                log::warn!("Unmount failed: {}", e);
            }
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            log::error!("Failed to start: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(stage) = &mut self.stage {
                    stage.handle_resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    match key {
                        KeyCode::Escape => self.shutdown(event_loop),
                        KeyCode::KeyR => {
                            if let Some(stage) = &mut self.stage {
                                stage.reset_view();
                                log::info!("Camera reset to starting position");
                            }
                        }
                        KeyCode::KeyF => {
                            if let Some(window) = &self.window {
                                window.toggle_fullscreen();
                            }
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(stage) = &mut self.stage {
                    stage.controls_mut().process_mouse_button(button, state);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(stage) = &mut self.stage {
                    stage.controls_mut().process_scroll(delta);
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(stage) = &mut self.stage else { return };
                match stage.frame() {
                    FrameStatus::Continue => {
                        self.clock.tick();
                        if let Some(window) = &self.window {
                            if self.config.debug.show_fps {
                                window.update_title(Some(self.clock.fps()));
                            }
                            window.request_redraw();
                        }
                    }
                    FrameStatus::Stopped => self.shutdown(event_loop),
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(stage) = &mut self.stage {
                stage.controls_mut().process_mouse_motion(delta.0, delta.1);
            }
        }
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("{}. Using defaults.", e);
        AppConfig::default()
    });

    // RUST_LOG overrides the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.debug.log_level)).init();
    log::info!("Starting Skyline");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
