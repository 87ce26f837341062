// shaders.rs - Shader program creation and uniform helpers

use gl::types::*;
use std::ffi::CString;
use std::path::Path;
use thiserror::Error;

use super::driver::{GlDriver, ShaderDriver, ShaderStage};
use super::uniform::Uniform;
use crate::utils::fs::read_all_text;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("ERROR::SHADER::{}::COMPILATION_FAILED\n{}", .stage.tag(), .log)]
    Compilation { stage: ShaderStage, log: String },
    #[error("ERROR::SHADER::PROGRAM::LINKING_FAILED\n{0}")]
    Linking(String),
}

/// Everything that went wrong during one create call.
///
/// Creation never stops early, so a single call can report a failure for
/// each stage plus the link step.
#[derive(Debug, Error)]
#[error("shader program build failed with {} error(s)", .errors.len())]
pub struct BuildError {
    errors: Vec<ShaderError>,
}

impl BuildError {
    pub fn errors(&self) -> &[ShaderError] {
        &self.errors
    }

    pub fn stage_failed(&self, stage: ShaderStage) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ShaderError::Compilation { stage: s, .. } if *s == stage))
    }

    pub fn link_failed(&self) -> bool {
        self.errors.iter().any(|e| matches!(e, ShaderError::Linking(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    /// No program has been created; the handle is zero.
    Uninitialized,
    /// A program object exists. It may be unusable if the last build failed.
    Ready,
}

/// Owns one linked GL program.
///
/// The handle is released when the value is dropped or replaced by a later
/// create call. The type cannot be cloned, only moved.
pub struct ShaderProgram<D: ShaderDriver = GlDriver> {
    id: GLuint,
    driver: D,
}

impl ShaderProgram<GlDriver> {
    pub fn new() -> Self {
        Self::with_driver(GlDriver::new())
    }
}

impl Default for ShaderProgram<GlDriver> {
    fn default() -> Self {
        Self::new()
    }
}

// Text handed to GL is read as a C string, so it ends at the first NUL.
fn c_text(text: &str) -> CString {
    let bytes = text.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    CString::new(&bytes[..end]).unwrap_or_default()
}

impl<D: ShaderDriver> ShaderProgram<D> {
    pub fn with_driver(driver: D) -> Self {
        Self { id: 0, driver }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn state(&self) -> ProgramState {
        if self.id == 0 {
            ProgramState::Uninitialized
        } else {
            ProgramState::Ready
        }
    }

    /// Whether the held program exists and the driver reports it linked.
    pub fn is_linked(&self) -> bool {
        self.id != 0 && self.driver.link_status(self.id)
    }

    /// Reads both files and builds the program from their contents.
    ///
    /// A file that cannot be read contributes an empty source, which then
    /// fails to compile like any other bad source.
    pub fn create_from_file(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<(), BuildError> {
        let vertex_source = read_all_text(vertex_path);
        let fragment_source = read_all_text(fragment_path);
        self.create_from_source(&vertex_source, &fragment_source)
    }

    /// Compiles both stages and links them into a fresh program.
    ///
    /// Failures are logged and collected but never stop the sequence: both
    /// stages are compiled, the previous program is deleted, the new one is
    /// linked and stored, and the stage objects are released.
    pub fn create_from_source(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), BuildError> {
        let mut errors = Vec::new();

        let vertex = self.compile_stage(ShaderStage::Vertex, vertex_source, &mut errors);
        let fragment = self.compile_stage(ShaderStage::Fragment, fragment_source, &mut errors);

        if self.id != 0 {
            log::debug!("Releasing shader program {}", self.id);
            self.driver.delete_program(self.id);
        }

        self.id = self.driver.create_program();
        self.driver.attach_shader(self.id, vertex);
        self.driver.attach_shader(self.id, fragment);
        self.driver.link_program(self.id);

        if !self.driver.link_status(self.id) {
            let error = ShaderError::Linking(self.driver.program_info_log(self.id));
            log::error!("{}", error);
            errors.push(error);
        }

        self.driver.delete_shader(vertex);
        self.driver.delete_shader(fragment);

        if errors.is_empty() {
            log::debug!("Linked shader program {}", self.id);
            Ok(())
        } else {
            Err(BuildError { errors })
        }
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
        errors: &mut Vec<ShaderError>,
    ) -> GLuint {
        let source = c_text(source);
        let shader = self.driver.create_shader(stage);
        self.driver.shader_source(shader, &source);
        self.driver.compile_shader(shader);

        if !self.driver.compile_status(shader) {
            let error = ShaderError::Compilation {
                stage,
                log: self.driver.shader_info_log(shader),
            };
            log::error!("{}", error);
            errors.push(error);
        }

        shader
    }

    /// Binds the program for subsequent draw calls. A zero handle binds
    /// "no program".
    pub fn set_used(&self) {
        self.driver.use_program(self.id);
    }

    /// Looks the uniform up by name. Returns `-1` when it does not exist.
    pub fn uniform_location(&self, name: &str) -> GLint {
        if self.id == 0 || name.as_bytes().contains(&0) {
            return -1;
        }
        let cname = c_text(name);
        self.driver.uniform_location(self.id, &cname)
    }

    /// Writes a uniform of this program, binding the program first.
    ///
    /// The location is resolved on every call. Unknown names, and any name on
    /// an uninitialized program, are a silent no-op that leaves the bound
    /// program untouched.
    pub fn set_uniform<U: Uniform>(&self, name: &str, value: U) {
        let location = self.uniform_location(name);
        if location == -1 {
            return;
        }
        self.set_used();
        value.upload(&self.driver, location);
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if self.id != 0 {
            self.driver.delete_program(self.id);
        }
    }
}

/// Bundled shader for rigid bodies: position and normal in, Lambert shading
/// against a light along +Z out.
pub mod default_shaders {
    use super::*;

    pub const VERTEX_SRC: &str = r#"
    #version 330 core
    layout (location = 0) in vec3 position_in;
    layout (location = 1) in vec3 normal_in;

    uniform mat4 modelViewProjectionMatrix;

    out vec3 normal;

    void main()
    {
        normal = normal_in;
        gl_Position = modelViewProjectionMatrix * vec4(position_in, 1.0f);
    }
    "#;

    pub const FRAGMENT_SRC: &str = r#"
    #version 330 core
    out vec4 fragmentColor;

    uniform vec4 color = vec4(0.5,0.5,0.5,1.0);
    uniform mat4 normalMatrix;

    in vec3 normal;

    void main()
    {
        vec3 n = normalize((normalMatrix * vec4(normalize(normal),0)).xyz);
        float NdotL = abs(dot(n, vec3(0,0,1))); // abs for double-sided lighting
        fragmentColor = vec4( color.xyz * (0.2 + 0.8*NdotL), color.a);
    }
    "#;

    pub fn create_default_shader() -> ShaderProgram {
        create_default_shader_with(GlDriver::new())
    }

    pub fn create_default_shader_with<D: ShaderDriver>(driver: D) -> ShaderProgram<D> {
        let mut shader = ShaderProgram::with_driver(driver);
        if let Err(e) = shader.create_from_source(VERTEX_SRC, FRAGMENT_SRC) {
            log::warn!("Default shader is unusable: {}", e);
        }
        shader
    }
}
