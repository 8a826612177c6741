//! Programmatic GLB generation for integration tests.
//!
//! Generates one GLB with a scene per export layer:
//! - Layer 1: a colored, textured quad shared by two nodes, plus a bare
//!   triangle on a child node
//! - Layer 2: a 2x2 grid floor with smooth normals (walkmesh)
//! - Layer 3: a degenerate triangle with collinear corners
//! - Layer 4: a wire square made of a LINES primitive
//! - Layer 5: a floor triangle whose normals are smoothed into a wall

mod binary_packing;
mod glb_assembly;
mod gltf_json;

pub use gltf_json::{PrimitiveData, SceneBuilder};

const UP: [f32; 3] = [0.0, 0.0, 1.0];

pub const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];
pub const QUAD_COLORS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 0.5],
];
pub const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Corner normals leaning towards a wall at x = 0; the sum is far off +Z
pub const CREASE_NORMALS: [[f32; 3]; 3] = [
    [-0.707, 0.0, 0.707],
    [-0.707, 0.0, 0.707],
    [0.0, 0.0, 1.0],
];

/// Grid floor: vertices per side
pub const FLOOR_SIDE: u32 = 3;

fn floor() -> (Vec<[f32; 3]>, Vec<u32>) {
    let mut positions = Vec::new();
    for y in 0..FLOOR_SIDE {
        for x in 0..FLOOR_SIDE {
            positions.push([x as f32, y as f32, 0.0]);
        }
    }
    let mut indices = Vec::new();
    for y in 0..FLOOR_SIDE - 1 {
        for x in 0..FLOOR_SIDE - 1 {
            let i = y * FLOOR_SIDE + x;
            indices.extend([i, i + 1, i + FLOOR_SIDE + 1]);
            indices.extend([i, i + FLOOR_SIDE + 1, i + FLOOR_SIDE]);
        }
    }
    (positions, indices)
}

/// Generate the multi-layer test scene
pub fn generate_layered_glb() -> Vec<u8> {
    let mut builder = SceneBuilder::new();

    // Layer 1
    let quad_normals = [UP; 4];
    let quad = builder.mesh(
        Some("Quad"),
        &[PrimitiveData {
            normals: Some(&quad_normals),
            colors: Some(&QUAD_COLORS),
            texcoords: Some(&QUAD_TEXCOORDS),
            ..PrimitiveData::triangles(&QUAD_POSITIONS, &QUAD_INDICES)
        }],
    );
    let tri_positions = [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]];
    let tri = builder.mesh(
        Some("Tri"),
        &[PrimitiveData {
            indices: None,
            ..PrimitiveData::triangles(&tri_positions, &[])
        }],
    );
    let child = builder.node(Some("TriNode"), Some(tri), &[]);
    let quad_a = builder.node(Some("QuadA"), Some(quad), &[child]);
    let quad_b = builder.node(Some("QuadB"), Some(quad), &[]);
    let empty = builder.node(Some("Empty"), None, &[]);
    builder.scene("Props", &[quad_a, empty, quad_b]);

    // Layer 2
    let (floor_positions, floor_indices) = floor();
    let floor_normals = vec![UP; floor_positions.len()];
    let floor_mesh = builder.mesh(
        Some("Floor"),
        &[PrimitiveData {
            normals: Some(&floor_normals),
            ..PrimitiveData::triangles(&floor_positions, &floor_indices)
        }],
    );
    let floor_node = builder.node(Some("FloorNode"), Some(floor_mesh), &[]);
    builder.scene("Walkable", &[floor_node]);

    // Layer 3
    let sliver_positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
    let sliver_normals = [UP; 3];
    let sliver = builder.mesh(
        Some("Sliver"),
        &[PrimitiveData {
            normals: Some(&sliver_normals),
            ..PrimitiveData::triangles(&sliver_positions, &[0, 1, 2])
        }],
    );
    let sliver_node = builder.node(Some("SliverNode"), Some(sliver), &[]);
    builder.scene("Broken", &[sliver_node]);

    // Layer 4
    let wire = builder.mesh(
        None,
        &[PrimitiveData::lines(&QUAD_POSITIONS, &[0, 1, 1, 2, 2, 3, 3, 0])],
    );
    let wire_node = builder.node(Some("Wire"), Some(wire), &[]);
    builder.scene("Wires", &[wire_node]);

    // Layer 5
    let crease = builder.mesh(
        Some("Crease"),
        &[PrimitiveData {
            normals: Some(&CREASE_NORMALS),
            ..PrimitiveData::triangles(&QUAD_POSITIONS[..3], &[0, 1, 2])
        }],
    );
    let crease_node = builder.node(Some("CreaseNode"), Some(crease), &[]);
    builder.scene("Crease", &[crease_node]);

    builder.build()
}
