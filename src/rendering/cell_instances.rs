use glam::Vec3;
use wgpu::{BindingType, BufferBindingType, BufferUsages, ShaderStages};

/// One live cell. This should match the `CellInstance` structure defined in
/// WGSL, where the vec3 element carries a 16-byte stride.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CellInstance {
    pub offset: Vec3,
    _padding: f32,
}

impl CellInstance {
    pub fn new(offset: Vec3) -> Self {
        Self {
            offset,
            _padding: 0.0,
        }
    }
}

/// GPU storage buffer of per-instance cell offsets, indexed by the builtin
/// instance index in the vertex shader.
pub struct CellInstanceBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    capacity: u64,
}

impl CellInstanceBuffer {
    pub fn new(device: &wgpu::Device, initial_capacity: u64) -> Self {
        let buffer = Self::create_buffer(device, initial_capacity);
        let bind_group_layout = Self::create_bind_group_layout(device);
        let bind_group = Self::create_bind_group(device, &bind_group_layout, &buffer);

        Self {
            buffer,
            bind_group_layout,
            bind_group,
            capacity: initial_capacity,
        }
    }

    fn create_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cell instance storage buffer"),
            size: std::mem::size_of::<CellInstance>() as u64 * capacity,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cell instance bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cell instance bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    pub fn ensure_capacity(&mut self, device: &wgpu::Device, required_capacity: u64) {
        if required_capacity > self.capacity {
            let new_capacity = required_capacity * 2;
            self.buffer = Self::create_buffer(device, new_capacity);
            self.bind_group =
                Self::create_bind_group(device, &self.bind_group_layout, &self.buffer);
            self.capacity = new_capacity;
        }
    }

    pub fn write_instances(&self, queue: &wgpu::Queue, instances: &[CellInstance]) {
        if instances.is_empty() {
            return;
        }

        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}
