pub mod config;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use render::shaders::default_shaders::create_default_shader;
pub use render::{
    BuildError, Camera, GlDriver, ProgramState, ShaderDriver, ShaderError, ShaderProgram,
    ShaderStage, Uniform,
};
pub use utils::fs::read_all_text;
