use std::sync::Arc;

use anyhow::Context;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{config::SimConfig, engine, rendering::renderer::Renderer, state::AppState};

const ORBIT_SENSITIVITY: f32 = 0.008;

struct App {
    renderer: Option<Renderer>,
    state: AppState,
    mouse_pos: Vec2,
    orbiting: bool,
}

impl App {
    fn from_state(state: AppState) -> Self {
        Self {
            renderer: None,
            state,
            mouse_pos: Vec2::ZERO,
            orbiting: false,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &winit::event_loop::ActiveEventLoop) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::Space) => self.state.toggle_pause(),
            PhysicalKey::Code(KeyCode::KeyN) => self.state.request_step(),
            PhysicalKey::Code(KeyCode::KeyR) => self.state.reseed(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title("Life 3D");
        let window = event_loop.create_window(window_attributes).unwrap();

        let renderer =
            pollster::block_on(Renderer::new(Arc::new(window), &self.state)).unwrap();
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.renderer.as_mut().unwrap().resize(new_size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event, event_loop);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.orbiting = state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                let delta = new_pos - self.mouse_pos;
                self.mouse_pos = new_pos;

                if self.orbiting {
                    self.state
                        .orbit
                        .orbit(delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 4.0,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 * 0.1,
                };
                self.state.orbit.zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                let renderer = self.renderer.as_mut().unwrap();
                renderer.window.request_redraw();

                engine::update(&mut self.state, renderer).expect("Error during engine::update");

                match renderer.render(&mut self.state) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            _ => (),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let state = AppState::new(SimConfig::default()).context("Failed to create app state")?;
    let mut app = App::from_state(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
