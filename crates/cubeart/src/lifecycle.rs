//! Host lifecycle callbacks, called by the window event loop.

use engine_core::Result;

pub trait Lifecycle {
    /// Build everything the frame needs. Called once before the first frame.
    fn initialize(&mut self) -> Result<()>;

    fn load_content(&mut self) {}

    fn unload_content(&mut self) {}

    fn update(&mut self, _delta_seconds: f32) {}

    fn draw(&mut self, delta_seconds: f32) -> Result<()>;
}
