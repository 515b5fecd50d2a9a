use glam::{Mat4, Vec3};

use crate::math::{frustum::Frustum, plane::Plane};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    fn signed_distance_to_plane(&self, plane: &Plane) -> f32 {
        plane.signed_distance_to_point(self.center) + self.radius
    }

    pub fn from_aabb(aabb: &AABB) -> BoundingSphere {
        let center = aabb.center();
        BoundingSphere {
            center,
            radius: (aabb.max - center).length(),
        }
    }

    pub fn transform(&self, matrix: &Mat4) -> BoundingSphere {
        let center = matrix.transform_point3(self.center);
        let scale = matrix.to_scale_rotation_translation().0;
        let radius = self.radius * scale.abs().max_element();
        BoundingSphere { center, radius }
    }

    /// A sphere is culled only when it lies entirely behind one of the planes.
    pub fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        frustum
            .planes
            .iter()
            .all(|plane| self.signed_distance_to_plane(plane) >= 0.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    /// Returns `None` for an empty point set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<AABB> {
        let mut points = points.into_iter();
        let first = *points.next()?;

        Some(points.fold(AABB::new(first, first), |aabb, point| AABB {
            min: aabb.min.min(*point),
            max: aabb.max.max(*point),
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, -4.0),
        ];
        let aabb = AABB::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(AABB::from_points(&[]).is_none());
    }

    #[test]
    fn test_sphere_encloses_aabb_corners() {
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::new(1.0, 2.0, 3.0));
        let sphere = BoundingSphere::from_aabb(&aabb);
        for corner in aabb.corners() {
            assert!((corner - sphere.center).length() <= sphere.radius + 1e-5);
        }
    }

    #[test]
    fn test_sphere_transform_scales_radius() {
        let sphere = BoundingSphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(5.0, 0.0, 0.0),
        );
        let transformed = sphere.transform(&matrix);
        assert!(transformed.center.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
        assert!((transformed.radius - 2.0).abs() < 1e-5);
    }
}
