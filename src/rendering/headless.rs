use itertools::Itertools;

use crate::error::RenderError;
use crate::math::frustum::Frustum;
use crate::rendering::config::RenderConfig;
use crate::rendering::snapshot::SceneSnapshot;
use crate::rendering::RenderSurface;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_items: usize,
    pub visible: usize,
    pub culled: usize,
    /// Distinct geometries among the visible items, i.e. instanced draws.
    pub batches: usize,
    pub triangles: usize,
}

/// A surface without a window. It does the bookkeeping a real backend would
/// do before issuing draws and keeps the numbers.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    config: RenderConfig,
    size: Option<(u32, u32)>,
    frames: u64,
    last: FrameStats,
    totals: FrameStats,
}

impl HeadlessSurface {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last
    }

    /// Sums over every presented frame.
    pub fn totals(&self) -> FrameStats {
        self.totals
    }

    fn measure(&self, snapshot: &SceneSnapshot<'_>) -> FrameStats {
        let frustum = Frustum::from_view_projection(snapshot.view_projection());

        let visible = snapshot
            .items
            .iter()
            .filter(|item| {
                if !self.config.frustum_culling {
                    return true;
                }

                // Geometry without positions has nothing to cull.
                item.geometry
                    .bounding_sphere()
                    .map_or(true, |sphere| {
                        sphere.transform(&item.world).intersects_frustum(&frustum)
                    })
            })
            .collect_vec();

        FrameStats {
            draw_items: snapshot.items.len(),
            visible: visible.len(),
            culled: snapshot.items.len() - visible.len(),
            batches: visible.iter().map(|item| item.geometry_id).unique().count(),
            triangles: visible
                .iter()
                .map(|item| item.geometry.triangle_count())
                .sum(),
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurfaceSize { width, height });
        }

        log::info!("Headless surface ready at {}x{}", width, height);
        self.size = Some((width, height));

        Ok(())
    }

    fn present(&mut self, snapshot: &SceneSnapshot<'_>) -> Result<(), RenderError> {
        if self.size.is_none() {
            return Err(RenderError::RenderSurfaceUnavailable);
        }

        let stats = self.measure(snapshot);

        self.frames += 1;
        self.last = stats;
        self.totals.draw_items += stats.draw_items;
        self.totals.visible += stats.visible;
        self.totals.culled += stats.culled;
        self.totals.batches += stats.batches;
        self.totals.triangles += stats.triangles;

        if self.config.stats_interval > 0 && self.frames % self.config.stats_interval == 0 {
            log::info!(
                "Frame {} (tick {}): {} of {} items visible in {} batches, {} triangles",
                self.frames,
                snapshot.tick,
                stats.visible,
                stats.draw_items,
                stats.batches,
                stats.triangles
            );
        } else {
            log::debug!(
                "Frame {}: {} visible, {} culled",
                self.frames,
                stats.visible,
                stats.culled
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::geometry::{build, GeometryKind, GeometryParams};
    use crate::rendering::context::RenderContext;
    use crate::scene_graph::node::Node;
    use crate::scene_graph::scene::Scene;
    use glam::Vec3;

    fn scene_with_cubes(positions: &[Vec3]) -> Scene {
        let mut scene = Scene::default();
        let cube = scene.add_geometry(
            build(GeometryKind::Box, &GeometryParams::cuboid(1.0, 1.0, 1.0)).unwrap(),
        );
        for (i, position) in positions.iter().enumerate() {
            scene
                .spawn(
                    scene.root(),
                    Node::new(format!("cube {i}")).at(*position).with_geometry(cube),
                )
                .unwrap();
        }
        scene.resolve_world_transforms();
        scene
    }

    #[test]
    fn test_present_before_initialize_fails() {
        let scene = scene_with_cubes(&[Vec3::ZERO]);
        let context = RenderContext::new(Camera::default(), 800, 600);
        let mut surface = HeadlessSurface::default();

        assert_eq!(
            surface.present(&SceneSnapshot::capture(&scene, &context)),
            Err(RenderError::RenderSurfaceUnavailable)
        );
        assert_eq!(surface.frames_presented(), 0);
    }

    #[test]
    fn test_culls_items_outside_the_frustum() {
        let scene = scene_with_cubes(&[
            Vec3::ZERO,
            Vec3::new(0.5, 0.0, -2.0),
            Vec3::new(0.0, 0.0, 50.0),
            Vec3::new(0.0, 0.0, -500.0),
        ]);
        let context = RenderContext::new(Camera::default(), 800, 600);
        let mut surface = HeadlessSurface::default();
        surface.initialize(800, 600).unwrap();

        surface
            .present(&SceneSnapshot::capture(&scene, &context))
            .unwrap();

        let stats = surface.last_frame();
        assert_eq!(stats.draw_items, 4);
        assert_eq!(stats.visible, 2);
        assert_eq!(stats.culled, 2);
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.triangles, 24);
    }

    #[test]
    fn test_culling_can_be_disabled() {
        let scene = scene_with_cubes(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0)]);
        let context = RenderContext::new(Camera::default(), 800, 600);
        let mut surface = HeadlessSurface::new(RenderConfig {
            frustum_culling: false,
            stats_interval: 0,
        });
        surface.initialize(800, 600).unwrap();

        let snapshot = SceneSnapshot::capture(&scene, &context);
        surface.present(&snapshot).unwrap();
        surface.present(&snapshot).unwrap();

        assert_eq!(surface.last_frame().visible, 2);
        assert_eq!(surface.totals().draw_items, 4);
        assert_eq!(surface.frames_presented(), 2);
    }

    #[test]
    fn test_rejects_empty_size() {
        let mut surface = HeadlessSurface::default();
        assert_eq!(
            surface.initialize(0, 600),
            Err(RenderError::InvalidSurfaceSize {
                width: 0,
                height: 600
            })
        );
        assert!(surface.present(&SceneSnapshot::capture(
            &scene_with_cubes(&[Vec3::ZERO]),
            &RenderContext::new(Camera::default(), 800, 600)
        ))
        .is_err());
        assert_eq!(surface.size(), None);
    }
}
