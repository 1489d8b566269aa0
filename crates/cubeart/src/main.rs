//! CubeArt - renders a lit stack of cubes and optionally captures it to PNG.

mod config;
mod lifecycle;
mod state;

use anyhow::Result;
use config::AppConfig;
use engine_core::Time;
use lifecycle::Lifecycle;
use renderer::Renderer;
use state::CubeArt;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Application handler for winit.
struct App {
    config: AppConfig,
    state: Option<CubeArt>,
    time: Time,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            time: Time::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("CubeArt")
            .with_resizable(false)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let mut state = CubeArt::new(renderer, self.config.clone());
        if let Err(e) = state.initialize() {
            log::error!("Failed to initialize scene: {}", e);
            event_loop.exit();
            return;
        }
        state.load_content();
        self.state = Some(state);
        self.time = Time::new();
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                state.unload_content();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.renderer_mut().resize(size),
            WindowEvent::RedrawRequested => {
                self.time.update();
                let dt = self.time.delta_seconds();
                state.update(dt);
                if let Err(e) = state.draw(dt) {
                    log::error!("Frame {} failed: {}", self.time.frame_count(), e);
                }
                state.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().with_args(std::env::args());
    log::info!("Starting CubeArt ({} cubes, capture: {})", config.stack_count, config.capture);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
