//! Render loop state machine.
//!
//! `Uninitialized -> Initialized -> Rendering -> Terminated`. The mesh is
//! uploaded once by [`RenderLoop::initialize`]; every [`RenderLoop::draw`]
//! issues the same frame, so output is frame invariant. With capture enabled
//! each frame is drawn into a fresh off-screen target, read back and written
//! as a PNG.

use crate::camera::OrthoCamera;
use crate::capture::{save_png, to_rgb_image};
use crate::device::{FrameSetup, GraphicsDevice};
use crate::lighting::LightingConfig;
use crate::vertex::to_gpu_vertices;
use engine_core::{Color, Error, Result, Vertex};
use std::path::{Path, PathBuf};

/// Clear color behind the stack.
pub const CLEAR_COLOR: Color = Color::new(32.0 / 255.0, 32.0 / 255.0, 32.0 / 255.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Initialized,
    Rendering,
    Terminated,
}

/// What a successful frame produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Captured(PathBuf),
}

pub struct RenderLoop<D: GraphicsDevice> {
    state: LoopState,
    vertex_buffer: Option<D::VertexBuffer>,
    vertex_count: u32,
    camera: OrthoCamera,
    lighting: LightingConfig,
    capture_path: Option<PathBuf>,
}

impl<D: GraphicsDevice> RenderLoop<D> {
    /// `capture_path` selects capture mode for the lifetime of the loop.
    pub fn new(lighting: LightingConfig, capture_path: Option<PathBuf>) -> Self {
        Self {
            state: LoopState::Uninitialized,
            vertex_buffer: None,
            vertex_count: 0,
            camera: OrthoCamera::default(),
            lighting,
            capture_path,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn capture_path(&self) -> Option<&Path> {
        self.capture_path.as_deref()
    }

    /// Upload `mesh` and fix the camera. Allowed exactly once.
    pub fn initialize(&mut self, device: &mut D, mesh: &[Vertex], camera: OrthoCamera) -> Result<()> {
        if self.state != LoopState::Uninitialized {
            return Err(Error::Lifecycle(format!("initialize called in state {:?}", self.state)));
        }
        let vertex_count = u32::try_from(mesh.len())
            .map_err(|_| Error::invalid_argument(format!("mesh of {} vertices is too large", mesh.len())))?;

        let buffer = device.create_vertex_buffer(&to_gpu_vertices(mesh))?;
        log::info!(
            "Uploaded {} vertices ({} triangles)",
            vertex_count,
            vertex_count / 3
        );

        self.vertex_buffer = Some(buffer);
        self.vertex_count = vertex_count;
        self.camera = camera;
        self.state = LoopState::Initialized;
        Ok(())
    }

    /// The frame every tick issues.
    pub fn frame_setup(&self) -> FrameSetup {
        FrameSetup::new(&self.camera, self.lighting, CLEAR_COLOR, self.vertex_count)
    }

    /// Render one frame. Failures affect this frame only; the loop keeps rendering.
    pub fn draw(&mut self, device: &mut D) -> Result<FrameOutcome> {
        match self.state {
            LoopState::Initialized => self.state = LoopState::Rendering,
            LoopState::Rendering => {}
            state => return Err(Error::Lifecycle(format!("draw called in state {state:?}"))),
        }
        let setup = self.frame_setup();
        let Some(buffer) = self.vertex_buffer.as_ref() else {
            return Err(Error::Lifecycle("vertex buffer missing while rendering".into()));
        };

        let Some(path) = self.capture_path.as_ref() else {
            device.draw(&setup, buffer, None)?;
            return Ok(FrameOutcome::Presented);
        };

        let raw = {
            let (width, height) = device.back_buffer_size();
            let target = device.create_render_target(width, height)?;
            device.draw(&setup, buffer, Some(&target))?;
            device.read_pixels(&target)?
        };
        let image = to_rgb_image(&raw)?;
        save_png(&image, path)?;
        log::debug!("Captured {}x{} frame to {:?}", raw.width, raw.height, path);
        Ok(FrameOutcome::Captured(path.clone()))
    }

    /// Release the vertex buffer. Further draws fail.
    pub fn terminate(&mut self) {
        self.vertex_buffer = None;
        self.state = LoopState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{padded_bytes_per_row, RawFrame};
    use crate::vertex::GpuVertex;
    use engine_core::Position;
    use glam::Mat4;
    use procgen::{build_stack, flatten};
    use std::cell::Cell;
    use std::rc::Rc;

    /// In-memory device that records calls and fills targets with one BGRA color.
    struct RecordingDevice {
        size: (u32, u32),
        fill_bgra: [u8; 4],
        fail_targets: bool,
        uploads: Vec<usize>,
        draws: Vec<(FrameSetup, bool)>,
        live_targets: Rc<Cell<i32>>,
    }

    struct FakeTarget {
        width: u32,
        height: u32,
        live: Rc<Cell<i32>>,
    }

    impl Drop for FakeTarget {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl RecordingDevice {
        fn new() -> Self {
            Self {
                size: (5, 3),
                fill_bgra: [30, 20, 10, 255],
                fail_targets: false,
                uploads: Vec::new(),
                draws: Vec::new(),
                live_targets: Rc::new(Cell::new(0)),
            }
        }
    }

    impl GraphicsDevice for RecordingDevice {
        type VertexBuffer = usize;
        type RenderTarget = FakeTarget;

        fn back_buffer_size(&self) -> (u32, u32) {
            self.size
        }

        fn create_vertex_buffer(&mut self, vertices: &[GpuVertex]) -> Result<usize> {
            self.uploads.push(vertices.len());
            Ok(vertices.len())
        }

        fn create_render_target(&mut self, width: u32, height: u32) -> Result<FakeTarget> {
            if self.fail_targets {
                return Err(Error::resource_creation("no capture format"));
            }
            self.live_targets.set(self.live_targets.get() + 1);
            Ok(FakeTarget {
                width,
                height,
                live: self.live_targets.clone(),
            })
        }

        fn draw(&mut self, setup: &FrameSetup, vertices: &usize, target: Option<&FakeTarget>) -> Result<()> {
            assert_eq!(setup.vertices.len(), *vertices);
            self.draws.push((setup.clone(), target.is_some()));
            Ok(())
        }

        fn read_pixels(&mut self, target: &FakeTarget) -> Result<RawFrame> {
            let stride = padded_bytes_per_row(target.width);
            let mut data = vec![0u8; (stride * target.height) as usize];
            for row in data.chunks_exact_mut(stride as usize) {
                for px in row[..(target.width * 4) as usize].chunks_exact_mut(4) {
                    px.copy_from_slice(&self.fill_bgra);
                }
            }
            Ok(RawFrame {
                data,
                width: target.width,
                height: target.height,
                bytes_per_row: stride,
            })
        }
    }

    fn stack_mesh(count: i32) -> Vec<Vertex> {
        flatten(&build_stack(Position::ZERO, count, Color::GRAY).unwrap())
    }

    #[test]
    fn states_advance_in_order() {
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::new(LightingConfig::default(), None);
        assert_eq!(render_loop.state(), LoopState::Uninitialized);

        render_loop.initialize(&mut device, &stack_mesh(8), OrthoCamera::default()).unwrap();
        assert_eq!(render_loop.state(), LoopState::Initialized);
        assert_eq!(render_loop.vertex_count(), 288);

        assert_eq!(render_loop.draw(&mut device).unwrap(), FrameOutcome::Presented);
        assert_eq!(render_loop.state(), LoopState::Rendering);

        render_loop.terminate();
        assert_eq!(render_loop.state(), LoopState::Terminated);
        assert!(matches!(render_loop.draw(&mut device), Err(Error::Lifecycle(_))));
    }

    #[test]
    fn draw_before_initialize_fails() {
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::<RecordingDevice>::new(LightingConfig::default(), None);
        assert!(matches!(render_loop.draw(&mut device), Err(Error::Lifecycle(_))));
        assert!(device.draws.is_empty());
    }

    #[test]
    fn mesh_is_uploaded_once() {
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::new(LightingConfig::default(), None);
        let mesh = stack_mesh(2);
        render_loop.initialize(&mut device, &mesh, OrthoCamera::default()).unwrap();
        let again = render_loop.initialize(&mut device, &mesh, OrthoCamera::default());
        assert!(matches!(again, Err(Error::Lifecycle(_))));
        for _ in 0..3 {
            render_loop.draw(&mut device).unwrap();
        }
        assert_eq!(device.uploads, vec![72]);
        assert_eq!(device.draws.len(), 3);
    }

    #[test]
    fn every_frame_is_identical() {
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::new(LightingConfig::default(), None);
        render_loop.initialize(&mut device, &stack_mesh(8), OrthoCamera::default()).unwrap();
        render_loop.draw(&mut device).unwrap();
        render_loop.draw(&mut device).unwrap();

        let (first, _) = &device.draws[0];
        let (second, _) = &device.draws[1];
        assert_eq!(first, second);
        assert_eq!(first.world, Mat4::IDENTITY);
        assert_eq!(first.clear_color.to_rgb8(), [32, 32, 32]);
        assert_eq!(first.vertices, 0..288);
    }

    #[test]
    fn empty_mesh_still_draws() {
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::new(LightingConfig::default(), None);
        render_loop.initialize(&mut device, &stack_mesh(0), OrthoCamera::default()).unwrap();
        assert_eq!(render_loop.draw(&mut device).unwrap(), FrameOutcome::Presented);
        assert_eq!(device.draws[0].0.vertices, 0..0);
    }

    #[test]
    fn capture_writes_rgb_png_and_releases_target() {
        let path = std::env::temp_dir().join(format!("cubeart-loop-{}.png", std::process::id()));
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::new(LightingConfig::default(), Some(path.clone()));
        render_loop.initialize(&mut device, &stack_mesh(1), OrthoCamera::default()).unwrap();

        let outcome = render_loop.draw(&mut device).unwrap();
        assert_eq!(outcome, FrameOutcome::Captured(path.clone()));
        assert!(device.draws[0].1, "capture frames draw off-screen");
        assert_eq!(device.live_targets.get(), 0);

        let image = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();
        assert_eq!(image.dimensions(), (5, 3));
        assert!(image.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn target_failure_fails_only_that_frame() {
        let path = std::env::temp_dir().join(format!("cubeart-nofile-{}.png", std::process::id()));
        let mut device = RecordingDevice::new();
        device.fail_targets = true;
        let mut render_loop = RenderLoop::new(LightingConfig::default(), Some(path.clone()));
        render_loop.initialize(&mut device, &stack_mesh(1), OrthoCamera::default()).unwrap();

        assert!(matches!(render_loop.draw(&mut device), Err(Error::ResourceCreation(_))));
        assert_eq!(render_loop.state(), LoopState::Rendering);
        assert!(!path.exists());

        device.fail_targets = false;
        assert!(render_loop.draw(&mut device).is_ok());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unwritable_capture_reports_io_and_keeps_rendering() {
        let path = std::env::temp_dir().join("cubeart-no-such-dir").join("test.png");
        let mut device = RecordingDevice::new();
        let mut render_loop = RenderLoop::new(LightingConfig::default(), Some(path));
        render_loop.initialize(&mut device, &stack_mesh(1), OrthoCamera::default()).unwrap();
        assert!(matches!(render_loop.draw(&mut device), Err(Error::Io { .. })));
        assert_eq!(device.live_targets.get(), 0);
        assert!(matches!(render_loop.draw(&mut device), Err(Error::Io { .. })));
        assert_eq!(render_loop.state(), LoopState::Rendering);
    }
}
