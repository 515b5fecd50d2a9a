use glam::{Vec3, Vec4, Vec4Swizzles};

/// Plane in Hessian normal form. Points with a positive signed distance lie
/// on the side the normal points to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Builds a plane from `(a, b, c, d)` coefficients of `ax + by + cz + d = 0`.
    pub fn from_coefficients(coefficients: Vec4) -> Plane {
        let normal = coefficients.xyz();
        let length = normal.length();

        if length == 0.0 {
            return Plane {
                normal: Vec3::ZERO,
                distance: coefficients.w,
            };
        }

        Plane {
            normal: normal / length,
            distance: coefficients.w / length,
        }
    }

    pub fn signed_distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}
