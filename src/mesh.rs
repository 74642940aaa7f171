use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

pub const MESH_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

/// Bare positions for line-list geometry (the arena outline).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: Vec3,
}

pub const LINE_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

#[derive(Debug, Clone, Copy)]
pub enum Axis {
    X,
    Y,
    Z,
}

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Mesh {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn cube(size: f32) -> Mesh {
        let mut mesh = Mesh::new();

        mesh.append_cube_face(size, Axis::X, true, size / 2.0);
        mesh.append_cube_face(size, Axis::X, false, size / 2.0);
        mesh.append_cube_face(size, Axis::Y, true, size / 2.0);
        mesh.append_cube_face(size, Axis::Y, false, size / 2.0);
        mesh.append_cube_face(size, Axis::Z, true, size / 2.0);
        mesh.append_cube_face(size, Axis::Z, false, size / 2.0);

        mesh
    }

    pub fn append_cube_face(&mut self, size: f32, axis: Axis, positive: bool, depth: f32) {
        let half = size * 0.5;
        let corners = [
            Vec2::new(half, half),
            Vec2::new(half, -half),
            Vec2::new(-half, -half),
            Vec2::new(-half, half),
        ];

        let depth_value = if positive { depth } else { -depth };
        let sign = if positive { 1.0 } else { -1.0 };

        // Saved before pushing, the face indices are relative to it.
        let vertex_offset: u32 = self.vertices.len().try_into().unwrap();

        for corner in corners {
            let (position, normal) = match axis {
                Axis::X => (
                    Vec3::new(depth_value, corner.y, corner.x),
                    Vec3::new(sign, 0.0, 0.0),
                ),
                Axis::Y => (
                    Vec3::new(corner.x, depth_value, corner.y),
                    Vec3::new(0.0, sign, 0.0),
                ),
                Axis::Z => (
                    Vec3::new(corner.x, corner.y, depth_value),
                    Vec3::new(0.0, 0.0, sign),
                ),
            };

            self.vertices.push(Vertex { position, normal });
        }

        for index in [0, 1, 2, 2, 3, 0] {
            self.indices.push(index + vertex_offset);
        }
    }
}

/// 12-edge line list spanning a cube of the given half extent, centered on
/// the origin.
pub fn box_edges(half_extent: f32) -> Vec<LineVertex> {
    let h = half_extent;
    let corners = [
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
    ];

    let edges = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    edges
        .iter()
        .flat_map(|&(a, b)| {
            [
                LineVertex {
                    position: corners[a],
                },
                LineVertex {
                    position: corners[b],
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_face_lies_on_the_positive_z_plane() {
        let mut mesh = Mesh::new();
        mesh.append_cube_face(1.0, Axis::Z, true, 0.5);

        let expected_positions = [
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];

        for (vertex, expected) in mesh.vertices.iter().zip(expected_positions) {
            assert_eq!(vertex.normal, Vec3::new(0.0, 0.0, 1.0));
            assert_eq!(vertex.position, expected);
        }
    }

    #[test]
    fn back_face_normal_points_outward() {
        let mut mesh = Mesh::new();
        mesh.append_cube_face(1.0, Axis::Z, false, 0.5);

        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, Vec3::new(0.0, 0.0, -1.0));
            assert_eq!(vertex.position.z, -0.5);
        }
    }

    #[test]
    fn side_face_lies_on_the_negative_x_plane() {
        let mut mesh = Mesh::new();
        mesh.append_cube_face(1.0, Axis::X, false, 0.5);

        let expected_positions = [
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ];

        for (vertex, expected) in mesh.vertices.iter().zip(expected_positions) {
            assert_eq!(vertex.normal, Vec3::new(-1.0, 0.0, 0.0));
            assert_eq!(vertex.position, expected);
        }
    }

    #[test]
    fn cube_has_six_indexed_faces() {
        let mesh = Mesh::cube(1.0);

        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn box_edges_yields_a_line_list() {
        let edges = box_edges(2.0);

        assert_eq!(edges.len(), 24);
        for vertex in &edges {
            assert_eq!(vertex.position.abs(), Vec3::splat(2.0));
        }
    }
}
