//! Scene construction and the per-frame state driven by the host.

use crate::config::AppConfig;
use crate::lifecycle::Lifecycle;
use engine_core::{Color, Error, Result, Vertex};
use glam::Vec3;
use procgen::{flatten, StackLayout};
use renderer::{FrameOutcome, LightingConfig, LoopState, OrthoCamera, RenderLoop, Renderer};

/// Generate the flattened stack mesh and the camera that frames it.
pub fn build_scene(config: &AppConfig) -> Result<(Vec<Vertex>, OrthoCamera)> {
    if !config.view_width.is_finite() || config.view_width <= 0.0 {
        return Err(Error::invalid_argument(format!(
            "view width must be positive, got {}",
            config.view_width
        )));
    }
    let layout = StackLayout::new(
        Vec3::from(config.stack_origin),
        config.stack_count,
        Color::from(config.base_color),
    );
    let mesh = flatten(&layout.build()?);
    let camera = OrthoCamera::framing(layout.center(), config.view_width);
    Ok((mesh, camera))
}

pub struct CubeArt {
    config: AppConfig,
    renderer: Renderer,
    render_loop: RenderLoop<Renderer>,
    captured_frames: u64,
}

impl CubeArt {
    pub fn new(renderer: Renderer, config: AppConfig) -> Self {
        let render_loop = RenderLoop::new(LightingConfig::default(), config.capture_target());
        Self {
            config,
            renderer,
            render_loop,
            captured_frames: 0,
        }
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn request_redraw(&self) {
        self.renderer.request_redraw();
    }
}

impl Lifecycle for CubeArt {
    fn initialize(&mut self) -> Result<()> {
        let (mesh, camera) = build_scene(&self.config)?;
        self.render_loop.initialize(&mut self.renderer, &mesh, camera)?;
        match self.render_loop.capture_path() {
            Some(path) => log::info!("Capture mode: writing frames to {:?}", path),
            None => log::info!("Display mode"),
        }
        Ok(())
    }

    fn unload_content(&mut self) {
        if self.render_loop.state() != LoopState::Terminated {
            self.render_loop.terminate();
            log::info!("Released GPU resources after {} captured frames", self.captured_frames);
        }
    }

    fn draw(&mut self, _delta_seconds: f32) -> Result<()> {
        if let FrameOutcome::Captured(path) = self.render_loop.draw(&mut self.renderer)? {
            if self.captured_frames == 0 {
                log::info!("Wrote first capture to {:?}", path);
            }
            self.captured_frames += 1;
        }
        Ok(())
    }
}
