//! Static vertex buffers for the primitives the scenes are built from.
//!
//! Every generator is pure: the same [`GeometryKind`] and [`GeometryParams`]
//! always produce the same buffers. Built geometry is immutable and is shared
//! between nodes through the scene's geometry arena.

mod procedural;
mod solids;

use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use id_arena::Id;

use crate::error::GeometryError;
use crate::math::bounds::{BoundingSphere, AABB};

pub type GeometryId = Id<Geometry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleList,
    TriangleStrip,
    TriangleFan,
    LineLoop,
}

/// Interleaved vertex as handed to a rendering backend.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    name: String,
    topology: Topology,
    positions: Vec<Vec3>,
    colors: Option<Vec<Vec4>>,
    tex_coords: Option<Vec<Vec2>>,
    indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(name: impl Into<String>, topology: Topology, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            topology,
            positions,
            colors: None,
            tex_coords: None,
            indices: None,
        }
    }

    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[Vec4]> {
        self.colors.as_deref()
    }

    pub fn tex_coords(&self) -> Option<&[Vec2]> {
        self.tex_coords.as_deref()
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of elements the draw call walks: indices when present,
    /// vertices otherwise.
    pub fn element_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), |indices| indices.len())
    }

    pub fn triangle_count(&self) -> usize {
        let elements = self.element_count();

        match self.topology {
            Topology::TriangleList => elements / 3,
            Topology::TriangleStrip | Topology::TriangleFan => elements.saturating_sub(2),
            Topology::LineLoop => 0,
        }
    }

    pub fn bounding_box(&self) -> Option<AABB> {
        AABB::from_points(&self.positions)
    }

    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounding_box().map(|aabb| BoundingSphere::from_aabb(&aabb))
    }

    /// Interleaves the attribute streams. Missing colors default to opaque
    /// white, missing texture coordinates to zero.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: position.to_array(),
                color: self
                    .colors
                    .as_ref()
                    .and_then(|colors| colors.get(i))
                    .map_or([1.0; 4], |color| color.to_array()),
                tex_coords: self
                    .tex_coords
                    .as_ref()
                    .and_then(|tex_coords| tex_coords.get(i))
                    .map_or([0.0; 2], |uv| uv.to_array()),
            })
            .collect()
    }

    pub fn vertex_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Octahedron,
    Dodecahedron,
    Scutoid,
    Ring,
    Sphere,
    PacMan,
    Box,
    OrbitLine,
    Square,
    Triangle,
    Diamond,
    Sierpinski,
}

impl FromStr for GeometryKind {
    type Err = GeometryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let kind = match name {
            "octahedron" => GeometryKind::Octahedron,
            "dodecahedron" => GeometryKind::Dodecahedron,
            "scutoid" => GeometryKind::Scutoid,
            "ring" => GeometryKind::Ring,
            "sphere" => GeometryKind::Sphere,
            "pacman" => GeometryKind::PacMan,
            "box" => GeometryKind::Box,
            "orbit-line" => GeometryKind::OrbitLine,
            "square" => GeometryKind::Square,
            "triangle" => GeometryKind::Triangle,
            "diamond" => GeometryKind::Diamond,
            "sierpinski" => GeometryKind::Sierpinski,
            other => {
                return Err(GeometryError::InvalidGeometryParameters(format!(
                    "unsupported geometry kind `{other}`"
                )))
            }
        };

        Ok(kind)
    }
}

/// Parameter bag shared by all generators. Each kind reads only the fields
/// it needs; see [`build`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryParams {
    /// Solids: uniform scale. Sphere, orbit line, ring (outer), Pac-Man and
    /// Sierpinski (base length): radius.
    pub radius: f32,
    pub inner_radius: f32,
    /// Ring theta segments, sphere width segments, orbit line points.
    pub segments: u32,
    /// Sphere height segments.
    pub rings: u32,
    /// Box extents; square, triangle and diamond use `x` and `y`.
    pub size: Vec3,
    pub subdivisions: u32,
    /// Pac-Man unit scale applied to the integer lattice.
    pub scale: f32,
    /// Face colors, cycled over the faces of a solid.
    pub palette: Option<Vec<Vec4>>,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            inner_radius: 0.5,
            segments: 32,
            rings: 16,
            size: Vec3::ONE,
            subdivisions: 0,
            scale: 1.0,
            palette: None,
        }
    }
}

impl GeometryParams {
    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Self {
        Self {
            radius: outer_radius,
            inner_radius,
            segments,
            ..Default::default()
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            segments: width_segments,
            rings: height_segments,
            ..Default::default()
        }
    }

    pub fn pacman(radius: f32, scale: f32) -> Self {
        Self {
            radius,
            scale,
            ..Default::default()
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self {
            size: Vec3::new(width, height, depth),
            ..Default::default()
        }
    }

    pub fn orbit(radius: f32, points: u32) -> Self {
        Self {
            radius,
            segments: points,
            ..Default::default()
        }
    }

    pub fn sierpinski(base: f32, subdivisions: u32) -> Self {
        Self {
            radius: base,
            subdivisions,
            ..Default::default()
        }
    }

    pub fn with_palette(mut self, palette: Vec<Vec4>) -> Self {
        self.palette = Some(palette);
        self
    }
}

pub(crate) fn invalid(message: impl Into<String>) -> GeometryError {
    GeometryError::InvalidGeometryParameters(message.into())
}

pub(crate) fn require_positive(name: &str, value: f32) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

fn validate_palette(params: &GeometryParams) -> Result<(), GeometryError> {
    match &params.palette {
        Some(palette) if palette.is_empty() => Err(invalid("palette must not be empty")),
        _ => Ok(()),
    }
}

/// Builds the buffers for `kind`. Fails without producing anything when a
/// parameter the kind depends on is out of range.
pub fn build(kind: GeometryKind, params: &GeometryParams) -> Result<Geometry, GeometryError> {
    validate_palette(params)?;

    match kind {
        GeometryKind::Octahedron => solids::octahedron(params),
        GeometryKind::Dodecahedron => solids::dodecahedron(params),
        GeometryKind::Scutoid => solids::scutoid(params),
        GeometryKind::Ring => procedural::ring(params),
        GeometryKind::Sphere => procedural::sphere(params),
        GeometryKind::PacMan => procedural::pacman(params),
        GeometryKind::Box => procedural::cuboid(params),
        GeometryKind::OrbitLine => procedural::orbit_line(params),
        GeometryKind::Square => procedural::square(params),
        GeometryKind::Triangle => procedural::triangle(params),
        GeometryKind::Diamond => procedural::diamond(params),
        GeometryKind::Sierpinski => procedural::sierpinski(params),
    }
}

/// Looks the kind up by name first, so unknown names fail the same way as
/// bad parameters.
pub fn build_named(name: &str, params: &GeometryParams) -> Result<Geometry, GeometryError> {
    build(name.parse()?, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = build_named("icosahedron", &GeometryParams::default()).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometryParameters(_)));
    }

    #[test]
    fn test_named_build_matches_typed_build() {
        let params = GeometryParams::default();
        assert_eq!(
            build_named("dodecahedron", &params).unwrap(),
            build(GeometryKind::Dodecahedron, &params).unwrap()
        );
    }

    #[test]
    fn test_empty_palette_is_rejected() {
        let params = GeometryParams::default().with_palette(Vec::new());
        assert!(build(GeometryKind::Octahedron, &params).is_err());
    }

    #[test]
    fn test_interleaved_vertices() {
        let geometry = build(GeometryKind::Octahedron, &GeometryParams::default()).unwrap();
        let vertices = geometry.vertices();
        assert_eq!(vertices.len(), geometry.vertex_count());
        assert_eq!(vertices[0].position, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            Geometry::vertex_bytes(&vertices).len(),
            vertices.len() * std::mem::size_of::<Vertex>()
        );
    }

    #[test]
    fn test_triangle_count_by_topology() {
        let strip = build(GeometryKind::Square, &GeometryParams::default()).unwrap();
        assert_eq!(strip.topology(), Topology::TriangleStrip);
        assert_eq!(strip.triangle_count(), 2);

        let line = build(GeometryKind::OrbitLine, &GeometryParams::orbit(10.0, 128)).unwrap();
        assert_eq!(line.triangle_count(), 0);
    }
}
