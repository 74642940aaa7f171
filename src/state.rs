use std::time::Instant;

use glam::Vec3;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    camera::OrbitCamera,
    config::SimConfig,
    rendering::cell_instances::CellInstance,
    sim::GameOfLife,
};

pub struct AppState {
    pub config: SimConfig,
    pub sim: GameOfLife,
    pub orbit: OrbitCamera,
    pub start_time: Instant,

    paused: bool,
    pending_steps: u32,
    last_step: Instant,
    rng: StdRng,

    instances: Vec<CellInstance>,
    instances_dirty: bool,
}

impl AppState {
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = GameOfLife::new(config.arena_size, config.rule);
        sim.seed_random(&mut rng, config.seed_density);

        let orbit = OrbitCamera::new(Vec3::ZERO, config.arena_size as f32 * 1.8);

        let mut state = Self {
            config,
            sim,
            orbit,
            start_time: Instant::now(),
            paused: false,
            pending_steps: 0,
            last_step: Instant::now(),
            rng,
            instances: Vec::new(),
            instances_dirty: true,
        };
        state.gather_instances();

        Ok(state)
    }

    /// Half extent of the arena in world units, for the bounds outline.
    pub fn arena_half_extent(&self) -> f32 {
        self.config.arena_size as f32 / 2.0
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!(
            "Simulation {}",
            if self.paused { "paused" } else { "running" }
        );
    }

    /// Queues a single generation, used while paused.
    pub fn request_step(&mut self) {
        self.pending_steps += 1;
    }

    pub fn reseed(&mut self) {
        let density = self.config.seed_density;
        self.sim.seed_random(&mut self.rng, density);
        self.instances_dirty = true;
        self.gather_instances();
        log::info!("Reseeded arena, population {}", self.sim.population());
    }

    pub fn update(&mut self) {
        let mut stepped = false;

        while self.pending_steps > 0 {
            self.sim.step();
            self.pending_steps -= 1;
            stepped = true;
        }

        if !self.paused && self.last_step.elapsed() >= self.config.tick {
            self.sim.step();
            self.last_step = Instant::now();
            stepped = true;
        }

        if stepped {
            self.instances_dirty = true;
            self.gather_instances();
            log::debug!("Generation advanced, population {}", self.sim.population());
        }
    }

    fn gather_instances(&mut self) {
        let center = (self.config.arena_size as f32 - 1.0) / 2.0;

        self.instances.clear();
        for (x, y, z) in self.sim.live_cells() {
            self.instances.push(CellInstance::new(Vec3::new(
                x as f32 - center,
                y as f32 - center,
                z as f32 - center,
            )));
        }
    }

    pub fn instances(&self) -> &[CellInstance] {
        &self.instances
    }

    /// True when the instance list changed since the last upload.
    pub fn take_instances_dirty(&mut self) -> bool {
        std::mem::take(&mut self.instances_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;
    use std::time::Duration;

    fn test_config() -> SimConfig {
        SimConfig {
            arena_size: 8,
            tick: Duration::from_secs(3600),
            seed_density: 0.0,
            seed: Some(1),
            ..SimConfig::default()
        }
    }

    #[test]
    fn instances_are_centered_on_the_origin() {
        let mut state = AppState::new(test_config()).unwrap();
        state.sim.set_cell(0, 0, 0, Cell::Alive);
        state.sim.set_cell(7, 7, 7, Cell::Alive);
        state.gather_instances();

        let offsets: Vec<_> = state.instances().iter().map(|i| i.offset).collect();
        assert_eq!(offsets[0], Vec3::splat(-3.5));
        assert_eq!(offsets[1], Vec3::splat(3.5));
    }

    #[test]
    fn manual_steps_run_even_while_paused() {
        let mut state = AppState::new(test_config()).unwrap();
        state.toggle_pause();
        assert!(state.is_paused());

        // A lone cell dies after one generation.
        state.sim.set_cell(4, 4, 4, Cell::Alive);
        state.gather_instances();
        assert_eq!(state.instances().len(), 1);

        state.request_step();
        state.update();
        assert_eq!(state.instances().len(), 0);
    }

    #[test]
    fn dirty_flag_clears_after_being_taken() {
        let mut state = AppState::new(test_config()).unwrap();
        assert!(state.take_instances_dirty());
        assert!(!state.take_instances_dirty());

        state.reseed();
        assert!(state.take_instances_dirty());
    }

    #[test]
    fn timed_stepping_respects_the_tick_interval() {
        let mut state = AppState::new(test_config()).unwrap();
        state.sim.set_cell(4, 4, 4, Cell::Alive);
        state.gather_instances();
        let _ = state.take_instances_dirty();

        // Tick interval is an hour, so update must not advance.
        state.update();
        assert!(!state.take_instances_dirty());
        assert_eq!(state.instances().len(), 1);
    }
}
