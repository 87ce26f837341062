use glam::{Mat4, Vec3};

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera on the +Z axis looking back at the origin.
    pub fn looking_at_origin(distance: f32, fov: f32, aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            ..Self::new(fov, aspect_ratio, 0.1, 100.0)
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = Camera::looking_at_origin(4.0, 60.0, 4.0 / 3.0);
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_zero_sized_viewport_keeps_aspect() {
        let mut camera = Camera::new(60.0, 1.5, 0.1, 100.0);
        camera.set_viewport(0, 600);
        assert_eq!(camera.aspect_ratio, 1.5);
        camera.set_viewport(1024, 512);
        assert_eq!(camera.aspect_ratio, 2.0);
    }
}
