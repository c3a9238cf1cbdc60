use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex layout shared by every mesh the renderer draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side mesh: vertices plus triangle-list indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Builds a vertex whose normal is the normalized position. All the
/// built-in primitives share this radial shading scheme.
fn radial_vertex(position: Vec3, uv: [f32; 2]) -> Vertex {
    let normal = position.normalize();
    Vertex {
        position: position.to_array(),
        normal: normal.to_array(),
        uv,
    }
}

/// Unit-ish cube spanning -1..1 on every axis, 8 shared corners.
pub fn cube() -> MeshData {
    let vertices = vec![
        radial_vertex(Vec3::new(-1.0, 1.0, -1.0), [0.0, 0.0]),
        radial_vertex(Vec3::new(1.0, 1.0, -1.0), [1.0, 0.0]),
        radial_vertex(Vec3::new(-1.0, -1.0, -1.0), [0.0, 1.0]),
        radial_vertex(Vec3::new(1.0, -1.0, -1.0), [1.0, 1.0]),
        radial_vertex(Vec3::new(-1.0, -1.0, 1.0), [0.0, 0.0]),
        radial_vertex(Vec3::new(1.0, -1.0, 1.0), [0.0, 1.0]),
        radial_vertex(Vec3::new(1.0, 1.0, 1.0), [1.0, 1.0]),
        radial_vertex(Vec3::new(-1.0, 1.0, 1.0), [1.0, 0.0]),
    ];
    let indices = vec![
        0, 1, 2, 2, 1, 3, // front
        4, 3, 5, 4, 2, 3, // bottom
        3, 6, 5, 3, 1, 6, // right
        2, 7, 0, 2, 4, 7, // left
        7, 4, 5, 5, 6, 7, // back
        0, 7, 1, 7, 6, 1, // top
    ];
    MeshData { vertices, indices }
}

/// Square-based pyramid: four corners at y = -1 plus an apex at (0, 1, 0).
pub fn pyramid() -> MeshData {
    let vertices = vec![
        radial_vertex(Vec3::new(-1.0, -1.0, 1.0), [0.0, 0.0]),
        radial_vertex(Vec3::new(1.0, -1.0, 1.0), [1.0, 0.0]),
        radial_vertex(Vec3::new(-1.0, -1.0, -1.0), [0.0, 1.0]),
        radial_vertex(Vec3::new(1.0, -1.0, -1.0), [1.0, 1.0]),
        radial_vertex(Vec3::new(0.0, 1.0, 0.0), [1.0, 0.0]),
    ];
    let indices = vec![
        0, 1, 2, 2, 3, 1, // base
        1, 4, 3, // right
        3, 4, 2, // front
        2, 4, 0, // left
        0, 4, 1, // back
    ];
    MeshData { vertices, indices }
}

/// Flat grid of `side` x `side` vertices at height `y`, centered on the
/// origin with the given spacing, fully triangulated.
pub fn floor_grid(side: u32, spacing: f32, y: f32) -> MeshData {
    let half = (side - 1) as f32 * spacing * 0.5;
    let mut vertices = Vec::with_capacity((side * side) as usize);
    for row in 0..side {
        for col in 0..side {
            let x = -half + col as f32 * spacing;
            let z = half - row as f32 * spacing;
            let u = col as f32 / (side - 1) as f32;
            let v = row as f32 / (side - 1) as f32;
            vertices.push(radial_vertex(Vec3::new(x, y, z), [u, v]));
        }
    }

    let mut indices = Vec::with_capacity(((side - 1) * (side - 1) * 6) as usize);
    for row in 0..side - 1 {
        for col in 0..side - 1 {
            let a = row * side + col;
            let b = a + 1;
            let c = a + side;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, c, d, b]);
        }
    }
    MeshData { vertices, indices }
}

/// Generates the crate-style albedo pattern as tightly packed RGBA8 texels.
///
/// Horizontal planks separated by dark seams inside a darker frame, with a
/// small deterministic dither so the wood does not read as flat.
pub fn crate_texture(size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    let border = (size / 8).max(1);
    let plank = (size / 4).max(1);
    for y in 0..size {
        for x in 0..size {
            let framed = x < border || y < border || x >= size - border || y >= size - border;
            let seam = y % plank < 2 && !framed;
            let (mut r, mut g, mut b) = if framed {
                (96u32, 70u32, 43u32)
            } else if seam {
                (74, 52, 33)
            } else {
                (168, 123, 76)
            };
            let grain = (x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17))) % 13;
            r = (r + grain).min(255);
            g = (g + grain / 2).min(255);
            b = (b + grain / 3).min(255);
            data.extend_from_slice(&[r as u8, g as u8, b as u8, 255]);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn cube_shape() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 36);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn pyramid_shape() {
        let mesh = pyramid();
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.indices.len(), 18);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn floor_grid_shape() {
        let mesh = floor_grid(5, 2.0, -2.0);
        assert_eq!(mesh.vertices.len(), 25);
        // 4x4 cells, two triangles each
        assert_eq!(mesh.indices.len(), 96);
        assert_indices_in_range(&mesh);
        assert!(mesh.vertices.iter().all(|v| v.position[1] == -2.0));
        let first = mesh.vertices[0].position;
        let last = mesh.vertices[24].position;
        assert_eq!((first[0], first[2]), (-4.0, 4.0));
        assert_eq!((last[0], last[2]), (4.0, -4.0));
    }

    #[test]
    fn primitive_normals_are_unit_length() {
        for mesh in [cube(), pyramid(), floor_grid(3, 1.0, -2.0)] {
            for vertex in &mesh.vertices {
                let n = Vec3::from_array(vertex.normal);
                assert!((n.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn crate_texture_is_opaque_rgba() {
        let size = 64;
        let data = crate_texture(size);
        assert_eq!(data.len(), (size * size * 4) as usize);
        assert!(data.chunks_exact(4).all(|texel| texel[3] == 255));
        // the frame must be darker than the plank interior; sample a row
        // away from the seams
        let corner = &data[0..3];
        let plank_row = size / 2 + 4;
        let plank_offset = (plank_row * size + size / 2) as usize * 4;
        let plank = &data[plank_offset..plank_offset + 3];
        assert!(corner[0] < plank[0]);
    }
}
