// driver.rs - OpenGL object calls used by the shader program

use gl::types::*;
use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::rc::Rc;

/// Pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    /// Tag used in diagnostics, e.g. `VERTEX`.
    pub fn tag(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// The driver operations a shader program is built from.
///
/// Every call must happen on the thread that owns the current GL context.
/// Object names follow GL conventions: `0` is never a live object, and a
/// uniform location of `-1` means "not found" and turns uploads into no-ops.
pub trait ShaderDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_3fv(&self, location: GLint, value: &[f32; 3]);
    fn uniform_4fv(&self, location: GLint, value: &[f32; 4]);
    fn uniform_matrix_4fv(&self, location: GLint, value: &[f32; 16]);
}

macro_rules! forward_driver {
    ($($ty:ty),*) => {$(
        impl<T: ShaderDriver + ?Sized> ShaderDriver for $ty {
            fn create_shader(&self, stage: ShaderStage) -> GLuint { (**self).create_shader(stage) }
            fn shader_source(&self, shader: GLuint, source: &CStr) { (**self).shader_source(shader, source) }
            fn compile_shader(&self, shader: GLuint) { (**self).compile_shader(shader) }
            fn compile_status(&self, shader: GLuint) -> bool { (**self).compile_status(shader) }
            fn shader_info_log(&self, shader: GLuint) -> String { (**self).shader_info_log(shader) }
            fn delete_shader(&self, shader: GLuint) { (**self).delete_shader(shader) }
            fn create_program(&self) -> GLuint { (**self).create_program() }
            fn attach_shader(&self, program: GLuint, shader: GLuint) { (**self).attach_shader(program, shader) }
            fn link_program(&self, program: GLuint) { (**self).link_program(program) }
            fn link_status(&self, program: GLuint) -> bool { (**self).link_status(program) }
            fn program_info_log(&self, program: GLuint) -> String { (**self).program_info_log(program) }
            fn delete_program(&self, program: GLuint) { (**self).delete_program(program) }
            fn use_program(&self, program: GLuint) { (**self).use_program(program) }
            fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint { (**self).uniform_location(program, name) }
            fn uniform_1f(&self, location: GLint, value: f32) { (**self).uniform_1f(location, value) }
            fn uniform_1i(&self, location: GLint, value: i32) { (**self).uniform_1i(location, value) }
            fn uniform_3fv(&self, location: GLint, value: &[f32; 3]) { (**self).uniform_3fv(location, value) }
            fn uniform_4fv(&self, location: GLint, value: &[f32; 4]) { (**self).uniform_4fv(location, value) }
            fn uniform_matrix_4fv(&self, location: GLint, value: &[f32; 16]) { (**self).uniform_matrix_4fv(location, value) }
        }
    )*};
}

forward_driver!(&T, Rc<T>);

/// Driver backed by the global `gl` function pointers.
///
/// Construct it only after `gl::load_with` has run on a current context.
/// It is neither `Send` nor `Sync`: the context it talks to belongs to one
/// thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlDriver {
    _not_send: PhantomData<*const ()>,
}

impl GlDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_program(&self) -> GLuint {
        let mut current = 0;
        unsafe { gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut current) };
        current as GLuint
    }
}

fn info_log_from_buffer(mut buffer: Vec<u8>, written: GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

impl ShaderDriver for GlDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe { gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null()) };
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) };
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }

        let mut buffer = vec![0u8; len as usize];
        let mut written = 0;
        unsafe {
            gl::GetShaderInfoLog(shader, len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
        }
        info_log_from_buffer(buffer, written)
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }

        let mut buffer = vec![0u8; len as usize];
        let mut written = 0;
        unsafe {
            gl::GetProgramInfoLog(program, len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
        }
        info_log_from_buffer(buffer, written)
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1fv(location, 1, &value) };
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) };
    }

    fn uniform_3fv(&self, location: GLint, value: &[f32; 3]) {
        unsafe { gl::Uniform3fv(location, 1, value.as_ptr()) };
    }

    fn uniform_4fv(&self, location: GLint, value: &[f32; 4]) {
        unsafe { gl::Uniform4fv(location, 1, value.as_ptr()) };
    }

    fn uniform_matrix_4fv(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags() {
        assert_eq!(ShaderStage::Vertex.tag(), "VERTEX");
        assert_eq!(ShaderStage::Fragment.tag(), "FRAGMENT");
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn test_info_log_trims_to_written_length() {
        // GL reports the length including the trailing NUL
        let buffer = b"0:1(1): error\0".to_vec();
        assert_eq!(info_log_from_buffer(buffer, 13), "0:1(1): error");
        assert_eq!(info_log_from_buffer(vec![0; 4], -1), "");
    }
}
