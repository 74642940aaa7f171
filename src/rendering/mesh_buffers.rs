use wgpu::util::DeviceExt;

use crate::mesh::{self, Mesh};

pub struct MeshBuffers {
    pub vertices: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub num_indices: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cell vertex buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cell index buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertices: vertex_buffer,
            indices: index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }
}

pub struct OutlineBuffers {
    pub vertices: wgpu::Buffer,
    pub num_vertices: u32,
}

impl OutlineBuffers {
    pub fn new(device: &wgpu::Device, half_extent: f32) -> Self {
        let edges = mesh::box_edges(half_extent);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Arena outline vertex buffer"),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertices: vertex_buffer,
            num_vertices: edges.len() as u32,
        }
    }
}
