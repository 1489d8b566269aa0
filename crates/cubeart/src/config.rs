//! Application configuration (window, capture, stack). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Startup settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Back buffer width in physical pixels.
    #[serde(default = "default_window_size")]
    pub window_width: u32,
    /// Back buffer height in physical pixels.
    #[serde(default = "default_window_size")]
    pub window_height: u32,
    /// Draw off-screen and write every frame to `capture_path`.
    #[serde(default)]
    pub capture: bool,
    #[serde(default = "default_capture_path")]
    pub capture_path: PathBuf,
    /// Number of cubes in the stack.
    #[serde(default = "default_stack_count")]
    pub stack_count: i32,
    #[serde(default)]
    pub stack_origin: [f32; 3],
    /// Base cube color, linear 0..1 channels.
    #[serde(default = "default_base_color")]
    pub base_color: [f32; 3],
    /// Orthographic view width in world units.
    #[serde(default = "default_view_width")]
    pub view_width: f32,
}

fn default_window_size() -> u32 {
    720
}
fn default_capture_path() -> PathBuf {
    PathBuf::from(renderer::DEFAULT_CAPTURE_PATH)
}
fn default_stack_count() -> i32 {
    8
}
fn default_base_color() -> [f32; 3] {
    engine_core::Color::GRAY.to_array()
}
fn default_view_width() -> f32 {
    renderer::DEFAULT_VIEW_WIDTH
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_size(),
            window_height: default_window_size(),
            capture: false,
            capture_path: default_capture_path(),
            stack_count: default_stack_count(),
            stack_origin: [0.0; 3],
            base_color: default_base_color(),
            view_width: default_view_width(),
        }
    }
}

impl AppConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Apply command-line switches. `--capture` forces capture mode.
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        if args.into_iter().any(|a| a == "--capture") {
            self.capture = true;
        }
        self
    }

    /// Capture destination when capture mode is on.
    pub fn capture_target(&self) -> Option<PathBuf> {
        self.capture.then(|| self.capture_path.clone())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_eight_gray_cubes() {
        let config = AppConfig::default();
        assert_eq!((config.window_width, config.window_height), (720, 720));
        assert_eq!(config.stack_count, 8);
        assert_eq!(config.capture_path, PathBuf::from("test.png"));
        assert!(config.capture_target().is_none());
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let config: AppConfig = ron::from_str("(capture: true, stack_count: 3)").unwrap();
        assert!(config.capture);
        assert_eq!(config.stack_count, 3);
        assert_eq!(config.view_width, 40.0);
        assert_eq!(config.capture_target(), Some(PathBuf::from("test.png")));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("cubeart-config-{}.ron", std::process::id()));
        std::fs::write(&path, "(stack_count: \"lots\")").unwrap();
        let config = AppConfig::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn capture_switch_overrides_file() {
        let config = AppConfig::default().with_args(vec!["cubeart".into(), "--capture".into()]);
        assert!(config.capture);
        let config = AppConfig::default().with_args(vec!["cubeart".to_string()]);
        assert!(!config.capture);
    }
}
