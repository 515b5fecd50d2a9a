use glam::Mat4;

use crate::camera::Camera;

/// Camera and output size shared by every frame of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub camera: Camera,
    pub width: u32,
    pub height: u32,
}

impl RenderContext {
    pub fn new(camera: Camera, width: u32, height: u32) -> Self {
        Self {
            camera,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn view(&self) -> Mat4 {
        self.camera.view()
    }

    pub fn projection(&self) -> Mat4 {
        self.camera.projection(self.aspect())
    }
}
