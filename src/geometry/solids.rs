use glam::{Vec3, Vec4};

use crate::error::GeometryError;
use crate::geometry::{require_positive, Geometry, GeometryParams, Topology};

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

const OCTAHEDRON_FACES: [[[f32; 3]; 3]; 8] = [
    [[0.0, 0.0, 1.0], [-0.7, -0.7, 0.0], [-0.7, 0.7, 0.0]],
    [[0.0, 0.0, 1.0], [0.7, -0.7, 0.0], [-0.7, -0.7, 0.0]],
    [[0.0, 0.0, 1.0], [0.7, 0.7, 0.0], [0.7, -0.7, 0.0]],
    [[0.0, 0.0, 1.0], [-0.7, 0.7, 0.0], [0.7, 0.7, 0.0]],
    [[0.0, 0.0, -1.0], [-0.7, -0.7, 0.0], [-0.7, 0.7, 0.0]],
    [[0.0, 0.0, -1.0], [0.7, -0.7, 0.0], [-0.7, -0.7, 0.0]],
    [[0.0, 0.0, -1.0], [0.7, 0.7, 0.0], [0.7, -0.7, 0.0]],
    [[0.0, 0.0, -1.0], [-0.7, 0.7, 0.0], [0.7, 0.7, 0.0]],
];

const OCTAHEDRON_COLORS: [[f32; 4]; 8] = [RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN, RED, GREEN];

const DODECAHEDRON_FACES: [[[f32; 3]; 5]; 12] = [
    [
        [0.85, 0.0, 1.0],
        [0.32, 0.73, 1.0],
        [-0.54, 0.45, 1.0],
        [-0.54, -0.45, 1.0],
        [0.32, -0.73, 1.0],
    ],
    [
        [0.32, -0.73, 1.0],
        [0.85, 0.0, 1.0],
        [1.32, 0.0, 0.24],
        [1.08, -0.73, -0.23],
        [0.46, -1.18, 0.24],
    ],
    [
        [0.85, 0.0, 1.0],
        [0.32, 0.73, 1.0],
        [0.46, 1.18, 0.24],
        [1.08, 0.73, -0.23],
        [1.32, 0.0, 0.24],
    ],
    [
        [0.32, 0.73, 1.0],
        [-0.54, 0.45, 1.0],
        [-0.92, 0.73, 0.24],
        [-0.3, 1.18, -0.23],
        [0.46, 1.18, 0.24],
    ],
    [
        [-0.54, 0.45, 1.0],
        [-0.54, -0.45, 1.0],
        [-0.92, -0.73, 0.24],
        [-1.16, 0.0, -0.23],
        [-0.92, 0.73, 0.24],
    ],
    [
        [-0.54, -0.45, 1.0],
        [0.32, -0.73, 1.0],
        [0.46, -1.18, 0.24],
        [-0.3, -1.18, -0.23],
        [-0.92, -0.73, 0.24],
    ],
    [
        [1.08, -0.73, -0.23],
        [1.32, 0.0, 0.24],
        [1.08, 0.73, -0.23],
        [0.7, 0.45, -1.0],
        [0.7, -0.45, -1.0],
    ],
    [
        [1.08, 0.73, -0.23],
        [0.46, 1.18, 0.24],
        [-0.3, 1.18, -0.23],
        [-0.16, 0.73, -1.0],
        [0.7, 0.45, -1.0],
    ],
    [
        [-0.3, 1.18, -0.23],
        [-0.92, 0.73, 0.24],
        [-1.16, 0.0, -0.23],
        [-0.69, 0.0, -1.0],
        [-0.16, 0.73, -1.0],
    ],
    [
        [-1.16, 0.0, -0.23],
        [-0.92, -0.73, 0.24],
        [-0.3, -1.18, -0.23],
        [-0.16, -0.73, -1.0],
        [-0.69, 0.0, -1.0],
    ],
    [
        [-0.3, -1.18, -0.23],
        [0.46, -1.18, 0.24],
        [1.08, -0.73, -0.23],
        [0.7, -0.45, -1.0],
        [-0.16, -0.73, -1.0],
    ],
    [
        [0.7, -0.45, -1.0],
        [0.7, 0.45, -1.0],
        [-0.16, 0.73, -1.0],
        [-0.68, 0.0, -1.0],
        [-0.16, -0.73, -1.0],
    ],
];

const DODECAHEDRON_COLORS: [[f32; 4]; 12] = [
    RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN, RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN,
];

const SCUTOID_HEXAGON: [[f32; 3]; 6] = [
    [-1.0, 0.0, 1.5],
    [-0.5, -0.87, 1.5],
    [0.5, -0.87, 1.5],
    [1.0, 0.0, 1.5],
    [0.5, 0.87, 1.5],
    [-0.5, 0.87, 1.5],
];

const SCUTOID_PENTAGON: [[f32; 3]; 5] = [
    [-1.0, 0.0, -1.5],
    [-0.31, -0.95, -1.5],
    [0.81, -0.59, -1.5],
    [0.81, 0.59, -1.5],
    [-0.31, 0.95, -1.5],
];

const SCUTOID_SIDE_1: [[f32; 3]; 4] = [
    [-1.0, 0.0, 1.5],
    [-0.5, -0.87, 1.5],
    [-1.0, 0.0, -1.5],
    [-0.31, -0.95, -1.5],
];

const SCUTOID_SIDE_2: [[f32; 3]; 4] = [
    [-0.5, -0.87, 1.5],
    [0.5, -0.87, 1.5],
    [-0.31, -0.95, -1.5],
    [0.81, -0.59, -1.5],
];

const SCUTOID_SIDE_3: [[f32; 3]; 5] = [
    [0.5, -0.87, 1.5],
    [1.0, 0.0, 1.5],
    [0.81, -0.59, -1.5],
    [0.81, 0.59, -1.5],
    [0.81, 0.59, 0.0],
];

const SCUTOID_APEX_TRIANGLE: [[f32; 3]; 3] = [
    [1.0, 0.0, 1.5],
    [0.5, 0.87, 1.5],
    [0.81, 0.59, 0.0],
];

const SCUTOID_SIDE_4: [[f32; 3]; 5] = [
    [0.5, 0.87, 1.5],
    [-0.5, 0.87, 1.5],
    [0.81, 0.59, -1.5],
    [-0.31, 0.95, -1.5],
    [0.81, 0.59, 0.0],
];

const SCUTOID_SIDE_5: [[f32; 3]; 4] = [
    [-0.5, 0.87, 1.5],
    [-1.0, 0.0, 1.5],
    [-0.31, 0.95, -1.5],
    [-1.0, 0.0, -1.5],
];

const SCUTOID_COLORS: [[f32; 4]; 8] = [BLUE, BLUE, RED, YELLOW, MAGENTA, CYAN, RED, YELLOW];

// Indices address the concatenated face vertices; the caps and the mixed
// side faces do not follow a single fan pattern.
const SCUTOID_INDICES: [u32; 60] = [
    0, 1, 2, 0, 5, 2, 5, 2, 3, 3, 4, 5, // hexagon
    6, 7, 8, 6, 8, 10, 8, 9, 10, // pentagon
    11, 12, 13, 14, 13, 12, // side 1
    15, 16, 17, 18, 17, 16, // side 2
    19, 20, 21, 22, 21, 20, 20, 22, 23, // side 3
    24, 25, 26, // apex triangle
    27, 29, 31, 27, 28, 29, 30, 29, 28, // side 4
    32, 33, 34, 35, 34, 33, // side 5
];

/// Flat-shades a face list: every vertex of a face receives that face's
/// color, so shared corners are duplicated once per face.
fn flat_shaded(
    name: &str,
    faces: &[&[[f32; 3]]],
    default_colors: &[[f32; 4]],
    indices: Vec<u32>,
    params: &GeometryParams,
) -> Result<Geometry, GeometryError> {
    require_positive("radius", params.radius)?;

    let palette: Vec<Vec4> = match &params.palette {
        Some(palette) => palette.clone(),
        None => default_colors.iter().copied().map(Vec4::from_array).collect(),
    };

    let mut positions = Vec::new();
    let mut colors = Vec::new();

    for (face_index, face) in faces.iter().enumerate() {
        let color = palette[face_index % palette.len()];

        for vertex in face.iter() {
            positions.push(Vec3::from_array(*vertex) * params.radius);
            colors.push(color);
        }
    }

    Ok(Geometry::new(name, Topology::TriangleList, positions)
        .with_colors(colors)
        .with_indices(indices))
}

pub fn octahedron(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    let faces: Vec<&[[f32; 3]]> = OCTAHEDRON_FACES.iter().map(|face| &face[..]).collect();
    let indices = (0..(OCTAHEDRON_FACES.len() * 3) as u32).collect();

    flat_shaded("octahedron", &faces, &OCTAHEDRON_COLORS, indices, params)
}

pub fn dodecahedron(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    let faces: Vec<&[[f32; 3]]> = DODECAHEDRON_FACES.iter().map(|face| &face[..]).collect();

    // Each pentagon becomes three triangles sharing its first vertex.
    let indices = (0..DODECAHEDRON_FACES.len() as u32)
        .flat_map(|face| {
            let a = face * 5;
            [a, a + 1, a + 2, a + 2, a + 3, a, a + 3, a + 4, a]
        })
        .collect();

    flat_shaded("dodecahedron", &faces, &DODECAHEDRON_COLORS, indices, params)
}

pub fn scutoid(params: &GeometryParams) -> Result<Geometry, GeometryError> {
    let faces: [&[[f32; 3]]; 8] = [
        &SCUTOID_HEXAGON,
        &SCUTOID_PENTAGON,
        &SCUTOID_SIDE_1,
        &SCUTOID_SIDE_2,
        &SCUTOID_SIDE_3,
        &SCUTOID_APEX_TRIANGLE,
        &SCUTOID_SIDE_4,
        &SCUTOID_SIDE_5,
    ];

    flat_shaded(
        "scutoid",
        &faces,
        &SCUTOID_COLORS,
        SCUTOID_INDICES.to_vec(),
        params,
    )
}
