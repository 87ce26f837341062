use gl::types::GLint;
use glam::{Mat4, Vec3, Vec4};

use super::driver::ShaderDriver;

/// Values that can be written to a uniform location.
///
/// Matrices are uploaded column-major without transposition, which is the
/// layout GLSL expects and the one `glam` stores.
pub trait Uniform {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint);
}

impl Uniform for Mat4 {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint) {
        driver.uniform_matrix_4fv(location, &self.to_cols_array());
    }
}

impl Uniform for Vec4 {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint) {
        driver.uniform_4fv(location, &self.to_array());
    }
}

impl Uniform for Vec3 {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint) {
        driver.uniform_3fv(location, &self.to_array());
    }
}

impl Uniform for f32 {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint) {
        driver.uniform_1f(location, *self);
    }
}

// Sampler units and integer flags
impl Uniform for i32 {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint) {
        driver.uniform_1i(location, *self);
    }
}

impl<T: Uniform + ?Sized> Uniform for &T {
    fn upload<D: ShaderDriver + ?Sized>(&self, driver: &D, location: GLint) {
        (**self).upload(driver, location);
    }
}
