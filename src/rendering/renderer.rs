use std::sync::Arc;

use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    mesh::Mesh,
    rendering::{
        cell_instances::CellInstanceBuffer,
        global_uniform::GlobalUniformState,
        mesh_buffers::{MeshBuffers, OutlineBuffers},
        passes::{
            background_pass::{BackgroundPass, BackgroundPassTextureViews},
            bounds_pass::{BoundsPass, BoundsPassTextureViews},
            cell_pass::{CellPass, CellPassTextureViews},
            pass::Pass,
        },
        render_common::RenderCommon,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    state::AppState,
};

/// Slightly smaller than the cell spacing so neighbouring cubes read as
/// separate cells.
const CELL_SIZE: f32 = 0.9;

const INITIAL_INSTANCE_CAPACITY: u64 = 1024;

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,

    camera_uniform: CameraUniform,

    cube_buffers: MeshBuffers,
    outline_buffers: OutlineBuffers,
    cell_instances: CellInstanceBuffer,
    num_instances: u32,

    shader_loader: ShaderLoader,

    background_pass: BackgroundPass,
    cell_pass: CellPass,
    bounds_pass: BoundsPass,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, state: &AppState) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let mut camera_uniform = CameraUniform::default();
        camera_uniform.update(size, &state.orbit.camera());
        let camera_uniform_buffer = camera_uniform.create_buffer(&device);

        let common = Arc::new(RenderCommon::new(
            &device,
            &adapter,
            &surface,
            size,
            camera_uniform_buffer,
        ));

        let depth_texture = DepthTexture::new(&device, size, "Depth texture");

        let mut cache_builder = PipelineCacheBuilder::new();

        let background_pass = BackgroundPass::create(&device, common.clone(), &mut cache_builder)?;
        let cell_pass = CellPass::create(&device, common.clone(), &mut cache_builder)?;
        let bounds_pass = BoundsPass::create(&device, common.clone(), &mut cache_builder)?;

        let shader_loader = ShaderLoader::new(device.clone(), cache_builder);

        let cube_buffers = MeshBuffers::new(&device, &Mesh::cube(CELL_SIZE));
        let outline_buffers = OutlineBuffers::new(&device, state.arena_half_extent());

        let initial_capacity = (state.instances().len() as u64).max(INITIAL_INSTANCE_CAPACITY);
        let cell_instances = CellInstanceBuffer::new(&device, initial_capacity);

        log::info!(
            "Renderer ready, arena size {}, initial population {}",
            state.sim.size(),
            state.instances().len()
        );

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            camera_uniform,
            cube_buffers,
            outline_buffers,
            cell_instances,
            num_instances: 0,
            shader_loader,
            background_pass,
            cell_pass,
            bounds_pass,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let common = self.common.as_ref();
        let mut config = common.output_surface_config.write().unwrap();

        self.size = new_size;
        config.width = new_size.width;
        config.height = new_size.height;
        self.surface.configure(&self.device, &config);
        self.depth_texture.resize(&self.device, new_size);
    }

    pub fn render(&mut self, state: &mut AppState) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader
            .load_pending_shaders()
            .expect("Failed to load pending shaders");

        self.camera_uniform.update(self.size, &state.orbit.camera());
        self.camera_uniform
            .update_buffer(&self.queue, &self.common.camera_uniform_buffer);
        self.common.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(self.size, state.start_time.elapsed().as_secs_f32()),
        );

        if state.take_instances_dirty() {
            let instances = state.instances();
            self.cell_instances
                .ensure_capacity(&self.device, instances.len() as u64);
            self.cell_instances.write_instances(&self.queue, instances);
            self.num_instances = instances.len() as u32;
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render encoder"),
            });

        let pipeline_cache = &self.shader_loader.cache;

        self.background_pass.render(
            &BackgroundPassTextureViews {
                color: view.clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                render_pass.draw(0..3, 0..1);
            },
        );

        self.cell_pass.render(
            &CellPassTextureViews {
                color: view.clone(),
                depth: self.depth_texture.view().clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                if self.num_instances == 0 {
                    return;
                }

                render_pass.set_bind_group(1, self.cell_instances.bind_group(), &[]);
                render_pass.set_vertex_buffer(0, self.cube_buffers.vertices.slice(..));
                render_pass
                    .set_index_buffer(self.cube_buffers.indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.cube_buffers.num_indices, 0, 0..self.num_instances);
            },
        );

        self.bounds_pass.render(
            &BoundsPassTextureViews {
                color: view.clone(),
                depth: self.depth_texture.view().clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                render_pass.set_vertex_buffer(0, self.outline_buffers.vertices.slice(..));
                render_pass.draw(0..self.outline_buffers.num_vertices, 0..1);
            },
        );

        self.queue.submit([encoder.finish()]);

        output.present();

        Ok(())
    }
}
