use std::f32::consts::PI;

use glam::{Vec2, Vec3, Vec4};

use crate::error::GeometryError;
use crate::geometry::{invalid, require_positive, Geometry, GeometryParams, Topology};

const SIERPINSKI_MAX_SUBDIVISIONS: u32 = 10;
const SIERPINSKI_COLOR: Vec4 = Vec4::new(1.0, 0.647, 0.0, 1.0);

fn require_segments(name: &str, value: u32, minimum: u32) -> Result<(), GeometryError> {
    if value >= minimum {
        Ok(())
    } else {
        Err(invalid(format!(
            "{name} must be at least {minimum}, got {value}"
        )))
    }
}

/// Flat annulus in the XY plane. Texture `u` selects one of two bands of the
/// ring texture depending on which side of the mid radius a vertex lies.
pub fn ring(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    let inner = params.inner_radius;
    let outer = params.radius;
    let segments = params.segments;

    require_positive("inner radius", inner)?;
    require_positive("outer radius", outer)?;
    require_segments("segments", segments, 1)?;
    if inner >= outer {
        return Err(invalid(format!(
            "inner radius {inner} must be smaller than outer radius {outer}"
        )));
    }

    let band_split = (inner + outer) * 0.5;
    let mut positions = Vec::new();
    let mut tex_coords = Vec::new();

    for radius in [inner, outer] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * 2.0 * PI;
            let position = Vec3::new(radius * theta.cos(), radius * theta.sin(), 0.0);
            let u = if position.length() < band_split { 0.0 } else { 1.0 };

            positions.push(position);
            tex_coords.push(Vec2::new(u, 1.0));
        }
    }

    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let a = i;
        let b = i + segments + 1;
        let c = i + segments + 2;
        let d = i + 1;

        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    Ok(Geometry::new("ring", Topology::TriangleList, positions)
        .with_tex_coords(tex_coords)
        .with_indices(indices))
}

pub fn sphere(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    let radius = params.radius;
    let width_segments = params.segments;
    let height_segments = params.rings;

    require_positive("radius", radius)?;
    require_segments("width segments", width_segments, 3)?;
    require_segments("height segments", height_segments, 2)?;

    let mut positions = Vec::new();
    let mut tex_coords = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let phi = v * PI;

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let theta = u * 2.0 * PI;

            positions.push(Vec3::new(
                -radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
            tex_coords.push(Vec2::new(u, 1.0 - v));
        }
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * (width_segments + 1) + ix;
            let b = a + width_segments + 1;
            let c = b + 1;
            let d = a + 1;

            // The pole rows collapse to a single point, skip their degenerate halves.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Ok(Geometry::new("sphere", Topology::TriangleList, positions)
        .with_tex_coords(tex_coords)
        .with_indices(indices))
}

/// Circle with a wedge cut out of its right side, drawn as a fan.
///
/// Walks the integer lattice `x = -r..=r` and emits `(x, ±sqrt(r² - x²))`,
/// skipping points with `x > 0 && y < r / 2`. Both halves start at the
/// center, so the fan closes back on it between the two lists.
pub fn pacman(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    require_positive("radius", params.radius)?;
    require_positive("scale", params.scale)?;

    let r = params.radius.floor() as i32;
    if r < 1 {
        return Err(invalid(format!(
            "radius must be at least one lattice unit, got {}",
            params.radius
        )));
    }

    let radius = r as f32;
    let mut upper = vec![Vec3::ZERO];
    let mut lower = vec![Vec3::ZERO];

    for x in -r..=r {
        let x = x as f32;
        let y = (radius * radius - x * x).sqrt();

        if x > 0.0 && y < radius / 2.0 {
            continue;
        }

        upper.push(Vec3::new(x, y, 0.0) * params.scale);
        lower.push(Vec3::new(x, -y, 0.0) * params.scale);
    }

    upper.extend(lower);

    Ok(Geometry::new("pacman", Topology::TriangleFan, upper))
}

pub fn cuboid(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    let size = params.size;
    require_positive("width", size.x)?;
    require_positive("height", size.y)?;
    require_positive("depth", size.z)?;

    let half = size * 0.5;

    // (normal, u, v) with u × v = normal so every face winds counter-clockwise
    // when seen from outside.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut tex_coords = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * half;
        let u = u * half;
        let v = v * half;

        positions.extend_from_slice(&[
            center - u - v,
            center + u - v,
            center + u + v,
            center - u + v,
        ]);
        tex_coords.extend_from_slice(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Ok(Geometry::new("box", Topology::TriangleList, positions)
        .with_tex_coords(tex_coords)
        .with_indices(indices))
}

/// Closed circle in the XZ plane, the path an orbiting node traces.
pub fn orbit_line(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    require_positive("radius", params.radius)?;
    require_segments("points", params.segments, 3)?;

    let points = params.segments;
    let positions = (0..points)
        .map(|i| {
            let theta = i as f32 / points as f32 * 2.0 * PI;
            Vec3::new(
                params.radius * theta.cos(),
                0.0,
                params.radius * theta.sin(),
            )
        })
        .collect();

    Ok(Geometry::new("orbit-line", Topology::LineLoop, positions))
}

fn flat_shape(
    name: &str,
    topology: Topology,
    params: &GeometryParams,
    corners: &[[f32; 2]],
) -> Result<Geometry, GeometryError> {
    require_positive("width", params.size.x)?;
    require_positive("height", params.size.y)?;

    let positions = corners
        .iter()
        .map(|[x, y]| Vec3::new(x * params.size.x, y * params.size.y, 0.0))
        .collect();

    Ok(Geometry::new(name, topology, positions))
}

pub fn square(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    flat_shape(
        "square",
        Topology::TriangleStrip,
        params,
        &[[0.5, 0.5], [-0.5, 0.5], [0.5, -0.5], [-0.5, -0.5]],
    )
}

pub fn triangle(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    flat_shape(
        "triangle",
        Topology::TriangleList,
        params,
        &[[0.0, 0.5], [0.5, -0.5], [-0.5, -0.5]],
    )
}

pub fn diamond(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    flat_shape(
        "diamond",
        Topology::TriangleStrip,
        params,
        &[[0.0, 0.5], [-0.5, 0.0], [0.5, 0.0], [0.0, -0.5]],
    )
}

/// Sierpinski triangle centered on the origin, one triangle per leaf of the
/// subdivision. Leaves are emitted in depth-first order: lower left, lower
/// right, top.
pub fn sierpinski(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    require_positive("base", params.radius)?;
    if params.subdivisions > SIERPINSKI_MAX_SUBDIVISIONS {
        return Err(invalid(format!(
            "at most {SIERPINSKI_MAX_SUBDIVISIONS} subdivisions are supported, got {}",
            params.subdivisions
        )));
    }

    let base = params.radius;
    let height = base * 3.0_f32.sqrt() / 2.0;
    let color = params
        .palette
        .as_ref()
        .and_then(|palette| palette.first().copied())
        .unwrap_or(SIERPINSKI_COLOR);

    let mut positions = Vec::with_capacity(3 * 3_usize.pow(params.subdivisions));
    let mut stack = vec![(Vec2::new(-base / 2.0, -height / 2.0), base, params.subdivisions)];

    while let Some((corner, base, depth)) = stack.pop() {
        if depth == 0 {
            let height = base * 3.0_f32.sqrt() / 2.0;
            positions.push(corner.extend(0.0));
            positions.push(Vec3::new(corner.x + base, corner.y, 0.0));
            positions.push(Vec3::new(corner.x + base / 2.0, corner.y + height, 0.0));
            continue;
        }

        let half = base / 2.0;
        let half_height = half * 3.0_f32.sqrt() / 2.0;

        // Pushed in reverse so they pop in drawing order.
        stack.push((corner + Vec2::new(half / 2.0, half_height), half, depth - 1));
        stack.push((corner + Vec2::new(half, 0.0), half, depth - 1));
        stack.push((corner, half, depth - 1));
    }

    let colors = vec![color; positions.len()];

    Ok(Geometry::new("sierpinski", Topology::TriangleList, positions).with_colors(colors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_layout() {
        let geometry = ring(&GeometryParams::ring(3.0, 5.0, 64)).unwrap();
        assert_eq!(geometry.vertex_count(), 2 * 65);
        assert_eq!(geometry.triangle_count(), 128);
    }

    #[test]
    fn test_ring_texture_bands_split_at_mid_radius() {
        let geometry = ring(&GeometryParams::ring(3.0, 5.0, 64)).unwrap();
        let tex_coords = geometry.tex_coords().unwrap();

        for (position, uv) in geometry.positions().iter().zip(tex_coords) {
            let expected = if position.length() < 4.0 { 0.0 } else { 1.0 };
            assert_eq!(uv.x, expected);
            assert_eq!(uv.y, 1.0);
        }
        assert_eq!(tex_coords[0].x, 0.0);
        assert_eq!(tex_coords[65].x, 1.0);
    }

    #[test]
    fn test_ring_rejects_inverted_radii() {
        assert!(ring(&GeometryParams::ring(5.0, 3.0, 64)).is_err());
        assert!(ring(&GeometryParams::ring(3.0, 5.0, 0)).is_err());
    }

    #[test]
    fn test_pacman_carves_mouth() {
        let geometry = pacman(&GeometryParams::pacman(50.0, 0.01)).unwrap();
        assert_eq!(geometry.topology(), Topology::TriangleFan);

        // x = 44..=50 fall inside the mouth wedge.
        assert_eq!(geometry.vertex_count(), 2 * (1 + 101 - 7));

        let positions = geometry.positions();
        assert_eq!(positions[0], Vec3::ZERO);
        assert_eq!(positions[95], Vec3::ZERO);
        assert!((positions[1] - Vec3::new(-0.5, 0.0, 0.0)).length() < 1e-6);

        for position in positions {
            let (x, y) = (position.x * 100.0, position.y.abs() * 100.0);
            assert!(!(x > 0.5 && y < 25.0 - 1e-3));
        }
    }

    #[test]
    fn test_pacman_rejects_sub_unit_radius() {
        assert!(pacman(&GeometryParams::pacman(0.5, 1.0)).is_err());
        assert!(pacman(&GeometryParams::pacman(-3.0, 1.0)).is_err());
    }

    #[test]
    fn test_sphere_counts() {
        let geometry = sphere(&GeometryParams::sphere(2.0, 32, 16)).unwrap();
        assert_eq!(geometry.vertex_count(), 33 * 17);
        // Two triangles per quad minus one per pole quad.
        assert_eq!(geometry.triangle_count(), 32 * 16 * 2 - 2 * 32);

        for position in geometry.positions() {
            assert!((position.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_rejects_few_segments() {
        assert!(sphere(&GeometryParams::sphere(1.0, 2, 16)).is_err());
        assert!(sphere(&GeometryParams::sphere(1.0, 8, 1)).is_err());
    }

    #[test]
    fn test_box_counts_and_extent() {
        let geometry = cuboid(&GeometryParams::cuboid(0.75, 2.0, 0.5)).unwrap();
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.triangle_count(), 12);

        let aabb = geometry.bounding_box().unwrap();
        assert!(aabb.size().abs_diff_eq(Vec3::new(0.75, 2.0, 0.5), 1e-6));
    }

    #[test]
    fn test_box_faces_point_outward() {
        let geometry = cuboid(&GeometryParams::cuboid(1.0, 1.0, 1.0)).unwrap();
        let positions = geometry.positions();

        for triangle in geometry.indices().unwrap().chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| positions[triangle[i] as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_orbit_line_lies_on_circle() {
        let geometry = orbit_line(&GeometryParams::orbit(40.0, 128)).unwrap();
        assert_eq!(geometry.vertex_count(), 128);
        for position in geometry.positions() {
            assert_eq!(position.y, 0.0);
            assert!((position.length() - 40.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_flat_shapes() {
        let params = GeometryParams::default();
        assert_eq!(square(&params).unwrap().vertex_count(), 4);
        assert_eq!(triangle(&params).unwrap().triangle_count(), 1);
        assert_eq!(diamond(&params).unwrap().positions()[3], Vec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_sierpinski_leaf_count() {
        for subdivisions in 0..4 {
            let geometry = sierpinski(&GeometryParams::sierpinski(2.0, subdivisions)).unwrap();
            assert_eq!(geometry.triangle_count(), 3_usize.pow(subdivisions));
        }
    }

    #[test]
    fn test_sierpinski_first_leaf_is_lower_left() {
        let geometry = sierpinski(&GeometryParams::sierpinski(4.0, 2)).unwrap();
        let positions = geometry.positions();
        let height = 4.0 * 3.0_f32.sqrt() / 2.0;

        assert!(positions[0].abs_diff_eq(Vec3::new(-2.0, -height / 2.0, 0.0), 1e-5));
        assert!(positions[1].abs_diff_eq(Vec3::new(-1.0, -height / 2.0, 0.0), 1e-5));
    }

    #[test]
    fn test_sierpinski_rejects_deep_subdivision() {
        assert!(sierpinski(&GeometryParams::sierpinski(1.0, 11)).is_err());
    }
}
