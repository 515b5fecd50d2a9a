use std::cell::Cell;

use glam::{Mat4, Quat, Vec3};

/// Local transform of a node: translation, rotation and uniform scale. The
/// composed matrix is cached until one of the components changes.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: f32,

    local_matrix: Cell<Mat4>,
    local_dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            local_matrix: Cell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn local_matrix(&self) -> Mat4 {
        if self.local_dirty.get() {
            let matrix = Mat4::from_scale_rotation_translation(
                Vec3::splat(self.scale),
                self.rotation,
                self.translation,
            );

            self.local_matrix.set(matrix);
            self.local_dirty.set(false);
        }

        self.local_matrix.get()
    }

    fn invalidate_local(&self) {
        self.local_dirty.set(true);
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.invalidate_local();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.invalidate_local();
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
        self.invalidate_local();
    }

    /// Rotates about an axis expressed in the node's own frame, on top of the
    /// current orientation.
    pub fn rotate(&mut self, rotation: Quat) {
        // Renormalize so long runs of small increments do not drift.
        self.rotation = (self.rotation * rotation).normalize();
        self.invalidate_local();
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
