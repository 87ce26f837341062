use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Rigid Body Viewer".to_string(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

/// Shader files to load. Leaving either path out selects the bundled shader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex_path: Option<PathBuf>,
    pub fragment_path: Option<PathBuf>,
}

impl ShaderConfig {
    pub fn file_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        match (&self.vertex_path, &self.fragment_path) {
            (Some(v), Some(f)) => Some((v, f)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: [f32; 4],
    pub body_color: [f32; 4],
    /// Radians per second.
    pub spin_speed: f32,
    pub fov: f32,
    pub camera_distance: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.3, 1.0],
            body_color: [0.8, 0.4, 0.2, 1.0],
            spin_speed: 0.8,
            fov: 60.0,
            camera_distance: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub shader: ShaderConfig,
    pub scene: SceneConfig,
}
