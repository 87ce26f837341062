pub mod camera;
pub mod driver;
pub mod mesh;
pub mod shaders;
pub mod uniform;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::Camera;
pub use driver::{GlDriver, ShaderDriver, ShaderStage};
pub use mesh::{Mesh, MeshData, Vertex};
pub use shaders::{BuildError, ProgramState, ShaderError, ShaderProgram};
pub use uniform::Uniform;
