//! In-memory driver used by the unit tests.
//!
//! Compilation fails for empty sources and for sources containing `#error`.
//! Linking fails unless exactly one successfully compiled vertex and fragment
//! stage are attached. Uniform locations come from `uniform <type> <name>`
//! declarations in the attached sources.

use gl::types::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;

use super::driver::{ShaderDriver, ShaderStage};

#[derive(Debug, Clone)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: Option<bool>,
}

#[derive(Debug, Clone, Default)]
struct FakeProgram {
    attached: Vec<GLuint>,
    linked: bool,
    uniforms: Vec<String>,
    log: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub program: GLuint,
    pub location: GLint,
    pub values: Vec<f32>,
}

#[derive(Debug, Default)]
struct FakeState {
    last_id: GLuint,
    shaders: HashMap<GLuint, FakeShader>,
    programs: HashMap<GLuint, FakeProgram>,
    active_program: GLuint,
    uploads: Vec<Upload>,
    deleted_programs: Vec<GLuint>,
    peak_live_programs: usize,
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: RefCell<FakeState>,
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let mut tokens = line.trim().split_whitespace();
            if tokens.next() != Some("uniform") {
                return None;
            }
            let _ty = tokens.next()?;
            let name = tokens.next()?;
            let end = name.find(|c: char| c == ';' || c == '[' || c == '=').unwrap_or(name.len());
            Some(name[..end].to_string())
        })
        .filter(|name| !name.is_empty())
        .collect()
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn peak_live_programs(&self) -> usize {
        self.state.borrow().peak_live_programs
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn is_live_program(&self, program: GLuint) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    pub fn deleted_programs(&self) -> Vec<GLuint> {
        self.state.borrow().deleted_programs.clone()
    }

    pub fn active_program(&self) -> GLuint {
        self.state.borrow().active_program
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    fn record(&self, location: GLint, values: Vec<f32>) {
        if location == -1 {
            return;
        }
        let mut state = self.state.borrow_mut();
        let program = state.active_program;
        state.uploads.push(Upload {
            program,
            location,
            values,
        });
    }
}

impl ShaderDriver for FakeDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        let id = state.last_id;
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: None,
            },
        );
        id
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string_lossy().into_owned();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            let ok = !s.source.trim().is_empty() && !s.source.contains("#error");
            s.compiled = Some(ok);
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .and_then(|s| s.compiled)
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let state = self.state.borrow();
        match state.shaders.get(&shader) {
            Some(s) if s.source.trim().is_empty() => "0:1(1): error: empty source".to_string(),
            Some(s) if s.compiled == Some(false) => "0:1(1): error: #error directive".to_string(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        let id = state.last_id;
        state.programs.insert(id, FakeProgram::default());
        state.peak_live_programs = state.peak_live_programs.max(state.programs.len());
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let attached: Vec<FakeShader> = match state.programs.get(&program) {
            Some(p) => p
                .attached
                .iter()
                .filter_map(|id| state.shaders.get(id).cloned())
                .collect(),
            None => return,
        };

        let count = |stage: ShaderStage| attached.iter().filter(|s| s.stage == stage).count();
        let all_compiled = attached.iter().all(|s| s.compiled == Some(true));
        let linked = all_compiled
            && count(ShaderStage::Vertex) == 1
            && count(ShaderStage::Fragment) == 1;

        let uniforms = if linked {
            attached.iter().flat_map(|s| declared_uniforms(&s.source)).collect()
        } else {
            Vec::new()
        };

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = linked;
            p.uniforms = uniforms;
            p.log = if linked {
                String::new()
            } else {
                "error: linking with uncompiled/unspecialized shader".to_string()
            };
        }
    }

    fn link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.linked)
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_some() {
            state.deleted_programs.push(program);
        }
    }

    fn use_program(&self, program: GLuint) {
        self.state.borrow_mut().active_program = program;
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let state = self.state.borrow();
        let name = name.to_string_lossy();
        state
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| *u == name))
            .map(|index| index as GLint)
            .unwrap_or(-1)
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.record(location, vec![value]);
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        self.record(location, vec![value as f32]);
    }

    fn uniform_3fv(&self, location: GLint, value: &[f32; 3]) {
        self.record(location, value.to_vec());
    }

    fn uniform_4fv(&self, location: GLint, value: &[f32; 4]) {
        self.record(location, value.to_vec());
    }

    fn uniform_matrix_4fv(&self, location: GLint, value: &[f32; 16]) {
        self.record(location, value.to_vec());
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_declared_uniforms() {
        let src = "uniform mat4 mvp;\n  uniform vec4 color = vec4(1.0);\nuniform float weights[4];\nin vec3 n;";
        assert_eq!(declared_uniforms(src), vec!["mvp", "color", "weights"]);
    }
}
