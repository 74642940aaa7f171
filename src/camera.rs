use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn get_vp_matrix(&self, resolution: Vec2) -> Mat4 {
        let view = Mat4::look_at_lh(self.eye, self.target, self.up);
        let projection = Mat4::perspective_lh(
            45.0f32.to_radians(),
            resolution.x / resolution.y,
            0.1,
            1000.0,
        );
        projection * view
    }
}

/// Yaw/pitch/distance rig orbiting the arena center.
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    const MIN_PITCH: f32 = -1.5;
    const MAX_PITCH: f32 = 1.5;
    const MIN_DISTANCE: f32 = 2.0;
    const MAX_DISTANCE: f32 = 500.0;

    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            yaw: 0.8,
            pitch: 0.5,
            distance,
        }
    }

    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(Self::MIN_PITCH, Self::MAX_PITCH);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn camera(&self) -> Camera {
        let eye = self.target
            + self.distance
                * Vec3::new(
                    self.pitch.cos() * self.yaw.cos(),
                    self.pitch.sin(),
                    self.pitch.cos() * self.yaw.sin(),
                );

        Camera {
            eye,
            target: self.target,
            up: Vec3::Y,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct CameraUniform {
    view_proj: Mat4,
}

impl CameraUniform {
    pub fn update(&mut self, resolution: winit::dpi::PhysicalSize<u32>, camera: &Camera) {
        self.view_proj =
            camera.get_vp_matrix(Vec2::new(resolution.width as f32, resolution.height as f32));
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_clamps_pitch_at_the_poles() {
        let mut rig = OrbitCamera::new(Vec3::ZERO, 10.0);

        rig.orbit(0.0, 10.0);
        assert_eq!(rig.pitch, OrbitCamera::MAX_PITCH);

        rig.orbit(0.0, -20.0);
        assert_eq!(rig.pitch, OrbitCamera::MIN_PITCH);
    }

    #[test]
    fn zoom_clamps_distance() {
        let mut rig = OrbitCamera::new(Vec3::ZERO, 10.0);

        rig.zoom(1000.0);
        assert_eq!(rig.distance, OrbitCamera::MIN_DISTANCE);

        rig.zoom(-10000.0);
        assert_eq!(rig.distance, OrbitCamera::MAX_DISTANCE);
    }

    #[test]
    fn camera_eye_sits_at_the_orbit_distance() {
        let mut rig = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 25.0);
        rig.orbit(0.4, -0.2);

        let camera = rig.camera();
        let offset = camera.eye - rig.target;
        assert!((offset.length() - 25.0).abs() < 1e-4);
        assert_eq!(camera.target, rig.target);
    }

    #[test]
    fn vp_matrix_moves_the_target_in_front_of_the_camera() {
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, -10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        };

        let vp = camera.get_vp_matrix(Vec2::new(1280.0, 720.0));
        let clip = vp * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
