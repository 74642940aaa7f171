use rand::Rng;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Alive,
    Dead,
}

impl Cell {
    pub fn is_alive(&self) -> bool {
        matches!(self, Cell::Alive)
    }

    #[allow(dead_code)]
    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }
}

/// Birth/survival neighbour counts, stored as bitmasks over 0..=26.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeRule {
    birth: u32,
    survival: u32,
}

impl LifeRule {
    pub fn new(birth: &[u32], survival: &[u32]) -> Self {
        let to_mask = |counts: &[u32]| counts.iter().fold(0u32, |mask, &count| mask | (1 << count));

        Self {
            birth: to_mask(birth),
            survival: to_mask(survival),
        }
    }

    /// Bays' 5766 rule: survive on 5-7 live neighbours, born on exactly 6.
    pub fn bays_5766() -> Self {
        Self::new(&[6], &[5, 6, 7])
    }

    pub fn next_state(&self, cell: Cell, living_neighbours: u32) -> Cell {
        let mask = match cell {
            Cell::Alive => self.survival,
            Cell::Dead => self.birth,
        };

        if mask & (1 << living_neighbours) != 0 {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self::bays_5766()
    }
}

/// Double-buffered cubic arena with toroidal topology. A step reads the
/// front grid and writes the next generation into the back grid, then the
/// buffers flip.
pub struct GameOfLife {
    size: usize,
    cells_1: Vec<Cell>,
    cells_2: Vec<Cell>,
    using_cells_1: bool,
    rule: LifeRule,
}

fn cell_index(size: usize, x: usize, y: usize, z: usize) -> usize {
    (z * size + y) * size + x
}

fn living_neighbours_in(cells: &[Cell], size: usize, x: usize, y: usize, z: usize) -> u32 {
    let mut count = 0;

    for z_offset in -1..=1i32 {
        for y_offset in -1..=1i32 {
            for x_offset in -1..=1i32 {
                if x_offset == 0 && y_offset == 0 && z_offset == 0 {
                    continue;
                }

                let neighbour_x = (x as i32 + x_offset).rem_euclid(size as i32) as usize;
                let neighbour_y = (y as i32 + y_offset).rem_euclid(size as i32) as usize;
                let neighbour_z = (z as i32 + z_offset).rem_euclid(size as i32) as usize;

                if cells[cell_index(size, neighbour_x, neighbour_y, neighbour_z)].is_alive() {
                    count += 1;
                }
            }
        }
    }

    count
}

impl GameOfLife {
    pub fn new(size: usize, rule: LifeRule) -> GameOfLife {
        let cell_count = size * size * size;

        GameOfLife {
            size,
            cells_1: vec![Cell::Dead; cell_count],
            cells_2: vec![Cell::Dead; cell_count],
            using_cells_1: true,
            rule,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn cells(&self) -> &[Cell] {
        if self.using_cells_1 {
            &self.cells_1
        } else {
            &self.cells_2
        }
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        if self.using_cells_1 {
            &mut self.cells_1
        } else {
            &mut self.cells_2
        }
    }

    pub fn cell(&self, x: usize, y: usize, z: usize) -> Cell {
        self.cells()[cell_index(self.size, x, y, z)]
    }

    pub fn set_cell(&mut self, x: usize, y: usize, z: usize, cell: Cell) {
        let index = cell_index(self.size, x, y, z);
        self.cells_mut()[index] = cell;
    }

    pub fn living_neighbours(&self, x: usize, y: usize, z: usize) -> u32 {
        living_neighbours_in(self.cells(), self.size, x, y, z)
    }

    pub fn flip_buffers(&mut self) {
        self.using_cells_1 = !self.using_cells_1;
    }

    /// Advances the automaton by one generation. Slices of the back grid are
    /// filled in parallel, one chunk per z layer.
    pub fn step(&mut self) {
        let size = self.size;
        let rule = self.rule;

        let (front, back) = if self.using_cells_1 {
            (&self.cells_1, &mut self.cells_2)
        } else {
            (&self.cells_2, &mut self.cells_1)
        };

        back.par_chunks_mut(size * size)
            .enumerate()
            .for_each(|(z, layer)| {
                for y in 0..size {
                    for x in 0..size {
                        let neighbours = living_neighbours_in(front, size, x, y, z);
                        let current = front[cell_index(size, x, y, z)];
                        layer[y * size + x] = rule.next_state(current, neighbours);
                    }
                }
            });

        self.flip_buffers();
    }

    /// Clears the arena and randomly fills a centered sub-volume (half the
    /// arena extent per axis) at the given density.
    pub fn seed_random<R: Rng>(&mut self, rng: &mut R, density: f32) {
        let size = self.size;
        let start = size / 4;
        let end = size - start;

        self.cells_mut().fill(Cell::Dead);

        for z in start..end {
            for y in start..end {
                for x in start..end {
                    if rng.gen::<f32>() < density {
                        self.set_cell(x, y, z, Cell::Alive);
                    }
                }
            }
        }
    }

    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let size = self.size;
        self.cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(move |(index, _)| {
                let x = index % size;
                let y = (index / size) % size;
                let z = index / (size * size);
                (x, y, z)
            })
    }

    pub fn population(&self) -> usize {
        self.cells().iter().filter(|cell| cell.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn counts_moore_neighbours() {
        let mut game = GameOfLife::new(8, LifeRule::bays_5766());
        game.set_cell(3, 3, 3, Cell::Alive);
        game.set_cell(4, 3, 3, Cell::Alive);
        game.set_cell(3, 4, 4, Cell::Alive);

        assert_eq!(game.living_neighbours(3, 3, 3), 2);
        assert_eq!(game.living_neighbours(4, 4, 4), 3);
        // The center cell never counts itself.
        assert_eq!(game.living_neighbours(4, 3, 3), 2);
    }

    #[test]
    fn neighbour_lookup_wraps_around_the_arena() {
        let mut game = GameOfLife::new(8, LifeRule::bays_5766());
        game.set_cell(7, 0, 0, Cell::Alive);
        game.set_cell(0, 7, 7, Cell::Alive);

        assert_eq!(game.living_neighbours(0, 0, 0), 2);
    }

    #[test]
    fn lone_cell_dies_and_surrounded_cell_is_born() {
        let mut game = GameOfLife::new(8, LifeRule::new(&[6], &[5, 6, 7]));
        game.set_cell(1, 1, 1, Cell::Alive);

        // Exactly six live neighbours around (4, 4, 4), which stays dead
        // until the step births it.
        let neighbours = [
            (3, 4, 4),
            (5, 4, 4),
            (4, 3, 4),
            (4, 5, 4),
            (4, 4, 3),
            (4, 4, 5),
        ];
        for (x, y, z) in neighbours {
            game.set_cell(x, y, z, Cell::Alive);
        }
        assert_eq!(game.living_neighbours(4, 4, 4), 6);

        game.step();

        assert!(game.cell(4, 4, 4).is_alive());
        assert!(game.cell(1, 1, 1).is_dead());
    }

    #[test]
    fn survival_rule_keeps_cells_with_enough_neighbours() {
        // Survive on any count so a fully packed arena is a fixed point.
        let all_counts: Vec<u32> = (0..=26).collect();
        let mut game = GameOfLife::new(4, LifeRule::new(&[], &all_counts));

        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    game.set_cell(x, y, z, Cell::Alive);
                }
            }
        }

        game.step();
        assert_eq!(game.population(), 4 * 4 * 4);
    }

    #[test]
    fn flipping_buffers_swaps_the_visible_grid() {
        let mut game = GameOfLife::new(4, LifeRule::bays_5766());
        game.set_cell(1, 2, 3, Cell::Alive);

        game.flip_buffers();
        assert!(game.cell(1, 2, 3).is_dead());

        game.flip_buffers();
        assert!(game.cell(1, 2, 3).is_alive());
    }

    #[test]
    fn seeding_respects_density_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = GameOfLife::new(16, LifeRule::bays_5766());

        game.seed_random(&mut rng, 0.0);
        assert_eq!(game.population(), 0);

        game.seed_random(&mut rng, 1.0);
        // Density 1.0 fills the centered half-extent sub-volume exactly.
        assert_eq!(game.population(), 8 * 8 * 8);
    }

    #[test]
    fn live_cells_reports_coordinates_in_grid_order() {
        let mut game = GameOfLife::new(8, LifeRule::bays_5766());
        game.set_cell(2, 5, 7, Cell::Alive);
        game.set_cell(0, 0, 0, Cell::Alive);

        let live: Vec<_> = game.live_cells().collect();
        assert_eq!(live, vec![(0, 0, 0), (2, 5, 7)]);
    }
}
