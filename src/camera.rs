use glam::{Mat4, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 1.0,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            ..Default::default()
        }
    }

    pub fn with_lens(mut self, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y_degrees.to_radians();
        self.near = near;
        self.far = far;
        self
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// GL-style projection (clip depth in [-1, 1]).
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::looking_at(Vec3::new(110.0, 30.0, 150.0), Vec3::ZERO)
            .with_lens(75.0, 1.0, 10_000.0);

        let clip = camera.projection(4.0 / 3.0) * camera.view() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_default_camera_sees_origin() {
        let camera = Camera::default();
        let view_space = camera.view().transform_point3(Vec3::ZERO);
        assert!(view_space.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-6));
    }
}
