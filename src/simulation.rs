use crate::grid::DensityGrid;
use crate::settings::SimulationSettings;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The four lattice directions a particle can move in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a uniform draw in 0..4 to a direction
    fn from_index(index: u8) -> Self {
        match index {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}

/// A single walking particle.
///
/// Position is always strictly within [0, W) x [0, H); the toroidal step in
/// `ParticleField::advance` is the only thing that moves it and never
/// produces an out-of-range coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
}

/// The particle population and its single pseudorandom source.
///
/// Exactly `num_particles` particles exist for the lifetime of a run. Both
/// initial placement and per-tick turn draws come from the one owned RNG, so
/// a fixed seed reproduces the full state sequence.
pub struct ParticleField {
    width: usize,
    height: usize,
    particles: Vec<Particle>,
    rng: StdRng,
    turn: Bernoulli,
    direction_dist: Uniform<u8>,
}

impl ParticleField {
    /// Create the population with uniformly random positions and directions.
    ///
    /// Each placement is mirrored into `grid` as it happens, so the grid
    /// holds a consistent occupancy snapshot at tick zero without a separate
    /// rebuild pass.
    pub fn new(
        settings: &SimulationSettings,
        seed: Option<u64>,
        grid: &mut DensityGrid,
    ) -> Result<Self, String> {
        settings.validate()?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let turn = Bernoulli::new(settings.turn_probability)
            .map_err(|e| format!("Invalid turn probability: {}", e))?;
        let direction_dist = Uniform::from(0u8..4);

        let mut particles = Vec::with_capacity(settings.num_particles);
        for _ in 0..settings.num_particles {
            let x = rng.gen_range(0..settings.plane_width);
            let y = rng.gen_range(0..settings.plane_height);
            let direction = Direction::from_index(direction_dist.sample(&mut rng));
            grid.increment(x, y);
            particles.push(Particle { x, y, direction });
        }

        Ok(Self {
            width: settings.plane_width,
            height: settings.plane_height,
            particles,
            rng,
            turn,
            direction_dist,
        })
    }

    /// Create a field from explicit particle states (scenario setups).
    pub fn from_particles(
        width: usize,
        height: usize,
        particles: Vec<Particle>,
        turn_probability: f64,
        seed: u64,
    ) -> Result<Self, String> {
        // Wrap targets both coordinate 0 and coordinate 1
        if width < 2 || height < 2 {
            return Err(format!("Plane {}x{} is too small to wrap", width, height));
        }
        for particle in &particles {
            if particle.x >= width || particle.y >= height {
                return Err(format!(
                    "Particle at ({}, {}) is outside the {}x{} plane",
                    particle.x, particle.y, width, height
                ));
            }
        }
        let turn = Bernoulli::new(turn_probability)
            .map_err(|e| format!("Invalid turn probability: {}", e))?;
        Ok(Self {
            width,
            height,
            particles,
            rng: StdRng::seed_from_u64(seed),
            turn,
            direction_dist: Uniform::from(0u8..4),
        })
    }

    /// Advance every particle by one tick.
    ///
    /// Each particle independently takes one toroidal step, then with the
    /// configured probability redraws its direction uniformly from all four
    /// (a memoryless turn that may re-pick the current direction).
    ///
    /// The decreasing directions wrap 0 to W-1 / H-1, but the increasing
    /// directions wrap W-1 / H-1 to 1, not 0. The asymmetry is load-bearing:
    /// changing it shifts the visible density distribution at the boundary.
    pub fn advance(&mut self) {
        let width = self.width;
        let height = self.height;
        let rng = &mut self.rng;
        for particle in &mut self.particles {
            match particle.direction {
                Direction::Left => {
                    particle.x = if particle.x == 0 { width - 1 } else { particle.x - 1 };
                }
                Direction::Right => {
                    particle.x = if particle.x == width - 1 { 1 } else { particle.x + 1 };
                }
                Direction::Up => {
                    particle.y = if particle.y == 0 { height - 1 } else { particle.y - 1 };
                }
                Direction::Down => {
                    particle.y = if particle.y == height - 1 { 1 } else { particle.y + 1 };
                }
            }
            if self.turn.sample(rng) {
                particle.direction = Direction::from_index(self.direction_dist.sample(rng));
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Push a new turn probability into a running field
    pub fn set_turn_probability(&mut self, turn_probability: f64) -> Result<(), String> {
        self.turn = Bernoulli::new(turn_probability)
            .map_err(|e| format!("Invalid turn probability: {}", e))?;
        Ok(())
    }
}

/// Read-only per-tick view handed to the display.
///
/// Borrows the live grid and particle list; must not be retained across
/// ticks, since both are mutated in place.
pub struct FieldSnapshot<'a> {
    pub grid: &'a DensityGrid,
    pub particles: &'a [Particle],
    pub tick: u64,
}

/// The whole owned simulation: particle field, density grid, tick counter.
///
/// One `tick()` is one full `advance` pass followed by one full `rebuild`
/// pass, strictly in that order; the grid always reflects post-advance
/// positions when the display reads it.
pub struct SimulationState {
    settings: SimulationSettings,
    field: ParticleField,
    grid: DensityGrid,
    ticks: u64,
    pub paused: bool,
}

impl SimulationState {
    pub fn new(settings: SimulationSettings, seed: Option<u64>) -> Result<Self, String> {
        let mut grid = DensityGrid::new(&settings)?;
        let field = ParticleField::new(&settings, seed, &mut grid)?;
        Ok(Self {
            settings,
            field,
            grid,
            ticks: 0,
            paused: false,
        })
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) {
        self.field.advance();
        self.grid.rebuild(self.field.particles());
        self.ticks += 1;
    }

    pub fn snapshot(&self) -> FieldSnapshot<'_> {
        FieldSnapshot {
            grid: &self.grid,
            particles: self.field.particles(),
            tick: self.ticks,
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn grid(&self) -> &DensityGrid {
        &self.grid
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Regenerate all particle state from the current settings
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(), String> {
        self.reset_with_settings(self.settings.clone(), seed)
    }

    /// Replace the settings and regenerate (presets, particle count changes)
    pub fn reset_with_settings(
        &mut self,
        settings: SimulationSettings,
        seed: Option<u64>,
    ) -> Result<(), String> {
        let paused = self.paused;
        *self = Self::new(settings, seed)?;
        self.paused = paused;
        Ok(())
    }

    /// Apply a new turn probability without disturbing particle state
    pub fn set_turn_probability(&mut self, turn_probability: f64) -> Result<(), String> {
        self.field.set_turn_probability(turn_probability)?;
        self.settings.turn_probability = turn_probability;
        Ok(())
    }

    /// Apply a new density step without disturbing particle state
    pub fn set_density_step(&mut self, density_step: usize) {
        if density_step > 0 {
            self.grid.set_density_step(density_step);
            self.settings.density_step = density_step;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lone_particle(x: usize, y: usize, direction: Direction) -> ParticleField {
        ParticleField::from_particles(
            100,
            100,
            vec![Particle { x, y, direction }],
            0.0,
            7,
        )
        .unwrap()
    }

    fn small_settings() -> SimulationSettings {
        SimulationSettings {
            plane_width: 100,
            plane_height: 100,
            bin_size: 50,
            num_particles: 200,
            ..Default::default()
        }
    }

    #[test]
    fn left_wraps_zero_to_far_edge() {
        let mut field = lone_particle(0, 40, Direction::Left);
        field.advance();
        assert_eq!(field.particles()[0].x, 99);
    }

    #[test]
    fn right_wraps_far_edge_to_one() {
        // The increasing directions wrap to 1, not 0.
        let mut field = lone_particle(99, 40, Direction::Right);
        field.advance();
        assert_eq!(field.particles()[0].x, 1);
    }

    #[test]
    fn up_wraps_zero_to_far_edge() {
        let mut field = lone_particle(40, 0, Direction::Up);
        field.advance();
        assert_eq!(field.particles()[0].y, 99);
    }

    #[test]
    fn down_wraps_far_edge_to_one() {
        let mut field = lone_particle(40, 99, Direction::Down);
        field.advance();
        assert_eq!(field.particles()[0].y, 1);
    }

    #[test]
    fn interior_steps_move_one_cell() {
        let cases = [
            (Direction::Left, 49, 50),
            (Direction::Right, 51, 50),
            (Direction::Up, 50, 49),
            (Direction::Down, 50, 51),
        ];
        for (direction, expected_x, expected_y) in cases {
            let mut field = lone_particle(50, 50, direction);
            field.advance();
            assert_eq!(field.particles()[0].x, expected_x);
            assert_eq!(field.particles()[0].y, expected_y);
        }
    }

    #[test]
    fn walking_scenario_crosses_bins_and_wraps() {
        // One particle at (10, 10) moving right with no turns, on a
        // 100x100 plane with 50-cell bins.
        let mut field = lone_particle(10, 10, Direction::Right);
        let settings = SimulationSettings {
            num_particles: 1,
            ..small_settings()
        };
        let mut grid = DensityGrid::new(&settings).unwrap();

        for _ in 0..40 {
            field.advance();
        }
        assert_eq!(field.particles()[0], Particle {
            x: 50,
            y: 10,
            direction: Direction::Right,
        });
        grid.rebuild(field.particles());
        assert_eq!(grid.count(1, 0), 1);
        assert_eq!(grid.total(), 1);

        // 49 more steps reach x=99; the 50th wraps to x=1, back in bin 0.
        for _ in 0..50 {
            field.advance();
        }
        assert_eq!(field.particles()[0].x, 1);
        grid.rebuild(field.particles());
        assert_eq!(grid.count(0, 0), 1);
        assert_eq!(grid.count(1, 0), 0);
    }

    #[test]
    fn initial_grid_matches_initial_placement() {
        let settings = small_settings();
        let state = SimulationState::new(settings.clone(), Some(42)).unwrap();
        assert_eq!(state.grid().total(), settings.num_particles);

        let mut recount = DensityGrid::new(&settings).unwrap();
        recount.rebuild(state.snapshot().particles);
        for bin_y in 0..settings.bins_y() {
            for bin_x in 0..settings.bins_x() {
                assert_eq!(state.grid().count(bin_x, bin_y), recount.count(bin_x, bin_y));
            }
        }
    }

    #[test]
    fn population_is_conserved_every_tick() {
        let settings = small_settings();
        let mut state = SimulationState::new(settings.clone(), Some(3)).unwrap();
        for _ in 0..50 {
            state.tick();
            assert_eq!(state.grid().total(), settings.num_particles);
        }
    }

    #[test]
    fn positions_stay_in_range() {
        let settings = small_settings();
        let mut state = SimulationState::new(settings.clone(), Some(11)).unwrap();
        for _ in 0..500 {
            state.tick();
            for particle in state.snapshot().particles {
                assert!(particle.x < settings.plane_width);
                assert!(particle.y < settings.plane_height);
            }
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_run() {
        let settings = small_settings();
        let mut a = SimulationState::new(settings.clone(), Some(99)).unwrap();
        let mut b = SimulationState::new(settings, Some(99)).unwrap();

        assert_eq!(a.snapshot().particles, b.snapshot().particles);
        for _ in 0..100 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.snapshot().particles, b.snapshot().particles);
    }

    #[test]
    fn different_seeds_diverge() {
        let settings = small_settings();
        let a = SimulationState::new(settings.clone(), Some(1)).unwrap();
        let b = SimulationState::new(settings, Some(2)).unwrap();
        assert_ne!(a.snapshot().particles, b.snapshot().particles);
    }

    #[test]
    fn always_turning_still_moves_every_tick() {
        let mut field = ParticleField::from_particles(
            100,
            100,
            vec![Particle {
                x: 50,
                y: 50,
                direction: Direction::Up,
            }],
            1.0,
            5,
        )
        .unwrap();
        let mut previous = field.particles()[0];
        for _ in 0..200 {
            field.advance();
            let current = field.particles()[0];
            assert_ne!((current.x, current.y), (previous.x, previous.y));
            assert!(current.x < 100 && current.y < 100);
            previous = current;
        }
    }

    #[test]
    fn rejects_plane_too_small_to_wrap() {
        let result = ParticleField::from_particles(
            1,
            1,
            vec![Particle {
                x: 0,
                y: 0,
                direction: Direction::Right,
            }],
            0.0,
            1,
        );
        assert!(result.is_err());

        // 2x2 is the smallest plane where both wrap targets exist
        let mut field = ParticleField::from_particles(
            2,
            2,
            vec![Particle {
                x: 1,
                y: 0,
                direction: Direction::Right,
            }],
            0.0,
            1,
        )
        .unwrap();
        field.advance();
        let particle = field.particles()[0];
        assert!(particle.x < 2 && particle.y < 2);
    }

    #[test]
    fn from_particles_rejects_out_of_range() {
        let result = ParticleField::from_particles(
            100,
            100,
            vec![Particle {
                x: 100,
                y: 0,
                direction: Direction::Up,
            }],
            0.1,
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_turn_probability() {
        let result = ParticleField::from_particles(100, 100, Vec::new(), 1.5, 1);
        assert!(result.is_err());

        let mut state = SimulationState::new(small_settings(), Some(1)).unwrap();
        assert!(state.set_turn_probability(-0.5).is_err());
    }

    #[test]
    fn snapshot_reflects_tick_count() {
        let mut state = SimulationState::new(small_settings(), Some(8)).unwrap();
        assert_eq!(state.snapshot().tick, 0);
        state.tick();
        state.tick();
        assert_eq!(state.snapshot().tick, 2);
    }

    #[test]
    fn reset_replays_a_seeded_run() {
        let mut state = SimulationState::new(small_settings(), Some(21)).unwrap();
        let initial = state.snapshot().particles.to_vec();
        for _ in 0..10 {
            state.tick();
        }
        assert_ne!(state.snapshot().particles, initial.as_slice());

        state.reset(Some(21)).unwrap();
        assert_eq!(state.snapshot().particles, initial.as_slice());
        assert_eq!(state.ticks(), 0);
    }

    #[test]
    fn reset_with_settings_changes_population() {
        let mut state = SimulationState::new(small_settings(), Some(8)).unwrap();
        let bigger = SimulationSettings {
            num_particles: 400,
            ..small_settings()
        };
        state.reset_with_settings(bigger, Some(8)).unwrap();
        assert_eq!(state.snapshot().particles.len(), 400);
        assert_eq!(state.ticks(), 0);
    }
}
