use crate::settings::SimulationSettings;
use crate::simulation::Particle;

/// Color bucket for one density bin.
///
/// `Empty` is a distinguished bucket for zero occupancy, rendered as the
/// neutral background rather than the lowest graded level. `Level(0)` is the
/// first graded bucket and is visually distinct from `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBucket {
    Empty,
    Level(usize),
}

impl ColorBucket {
    /// Graded level index, or `None` for the empty bucket
    pub fn level(&self) -> Option<usize> {
        match self {
            ColorBucket::Empty => None,
            ColorBucket::Level(level) => Some(*level),
        }
    }
}

/// Coarse occupancy grid over the simulation plane.
///
/// The plane is partitioned into square bins of `bin_size` cells; counts are
/// recomputed from scratch every tick and reflect only the current particle
/// positions. Bin lookups never fail: the constructor rejects any geometry
/// where `bin_size` does not evenly divide the plane, and particle
/// coordinates are always in range.
pub struct DensityGrid {
    bins_x: usize,
    bins_y: usize,
    bin_size: usize,
    counts: Vec<usize>,
    density_step: usize,
    palette_levels: usize,
}

impl DensityGrid {
    pub fn new(settings: &SimulationSettings) -> Result<Self, String> {
        settings.validate()?;
        let bins_x = settings.bins_x();
        let bins_y = settings.bins_y();
        Ok(Self {
            bins_x,
            bins_y,
            bin_size: settings.bin_size,
            counts: vec![0; bins_x * bins_y],
            density_step: settings.density_step,
            palette_levels: settings.palette_levels,
        })
    }

    pub fn bins_x(&self) -> usize {
        self.bins_x
    }

    pub fn bins_y(&self) -> usize {
        self.bins_y
    }

    pub fn bin_size(&self) -> usize {
        self.bin_size
    }

    fn index(&self, bin_x: usize, bin_y: usize) -> usize {
        bin_y * self.bins_x + bin_x
    }

    /// Count one particle at plane coordinates (x, y).
    ///
    /// Used by `ParticleField` during initial placement so the grid is
    /// consistent at tick zero without a separate full rebuild.
    pub(crate) fn increment(&mut self, x: usize, y: usize) {
        let idx = self.index(x / self.bin_size, y / self.bin_size);
        self.counts[idx] += 1;
    }

    /// Zero every bin and recount from the current particle positions.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.counts.fill(0);
        for particle in particles {
            let idx = self.index(particle.x / self.bin_size, particle.y / self.bin_size);
            self.counts[idx] += 1;
        }
    }

    /// Occupancy of bin (bin_x, bin_y)
    pub fn count(&self, bin_x: usize, bin_y: usize) -> usize {
        self.counts[self.index(bin_x, bin_y)]
    }

    /// Map the occupancy of bin (bin_x, bin_y) to a color bucket.
    ///
    /// Zero occupancy yields `Empty`; otherwise `occupancy / density_step`
    /// (flooring division) clamped to the last graded level. Monotonic
    /// non-decreasing in occupancy.
    pub fn bucket_for(&self, bin_x: usize, bin_y: usize) -> ColorBucket {
        let occupancy = self.count(bin_x, bin_y);
        if occupancy == 0 {
            return ColorBucket::Empty;
        }
        let level = (occupancy / self.density_step).min(self.palette_levels - 1);
        ColorBucket::Level(level)
    }

    /// Bucket for the bin containing plane coordinates (x, y)
    pub fn bucket_at(&self, x: usize, y: usize) -> ColorBucket {
        self.bucket_for(x / self.bin_size, y / self.bin_size)
    }

    /// Sum of all bin counts; equals the particle count after every rebuild
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Push a new density step into a running grid
    pub fn set_density_step(&mut self, density_step: usize) {
        if density_step > 0 {
            self.density_step = density_step;
        }
    }

    /// Occupancy of the fullest bin (for the status display)
    pub fn peak_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Direction, Particle};

    fn small_settings() -> SimulationSettings {
        SimulationSettings {
            plane_width: 100,
            plane_height: 100,
            bin_size: 50,
            num_particles: 4,
            ..Default::default()
        }
    }

    fn particle(x: usize, y: usize) -> Particle {
        Particle {
            x,
            y,
            direction: Direction::Right,
        }
    }

    #[test]
    fn rebuild_counts_every_particle_once() {
        let mut grid = DensityGrid::new(&small_settings()).unwrap();
        let particles = vec![
            particle(0, 0),
            particle(49, 49), // same bin as (0, 0)
            particle(50, 0),
            particle(99, 99),
        ];
        grid.rebuild(&particles);

        assert_eq!(grid.count(0, 0), 2);
        assert_eq!(grid.count(1, 0), 1);
        assert_eq!(grid.count(0, 1), 0);
        assert_eq!(grid.count(1, 1), 1);
        assert_eq!(grid.total(), particles.len());
    }

    #[test]
    fn rebuild_is_stateless_across_ticks() {
        let mut grid = DensityGrid::new(&small_settings()).unwrap();
        grid.rebuild(&[particle(0, 0), particle(1, 1)]);
        grid.rebuild(&[particle(99, 99)]);

        assert_eq!(grid.count(0, 0), 0);
        assert_eq!(grid.count(1, 1), 1);
        assert_eq!(grid.total(), 1);
    }

    #[test]
    fn zero_occupancy_is_the_empty_bucket() {
        let grid = DensityGrid::new(&small_settings()).unwrap();
        assert_eq!(grid.bucket_for(0, 0), ColorBucket::Empty);
    }

    #[test]
    fn low_occupancy_floors_to_first_graded_level() {
        // Two particles with density step 5: 2 / 5 floors to level 0,
        // which is not the same bucket as empty.
        let mut grid = DensityGrid::new(&small_settings()).unwrap();
        grid.rebuild(&[particle(10, 10), particle(12, 10)]);

        assert_eq!(grid.bucket_for(0, 0), ColorBucket::Level(0));
        assert_ne!(grid.bucket_for(0, 0), ColorBucket::Empty);
    }

    #[test]
    fn bucket_level_clamps_to_palette() {
        let mut grid = DensityGrid::new(&small_settings()).unwrap();
        let crowd: Vec<Particle> = (0..500).map(|_| particle(10, 10)).collect();
        grid.rebuild(&crowd);

        // 500 / 5 = 100, clamped to the last of 10 levels
        assert_eq!(grid.bucket_for(0, 0), ColorBucket::Level(9));
    }

    #[test]
    fn bucket_is_monotonic_in_occupancy() {
        let mut grid = DensityGrid::new(&small_settings()).unwrap();
        let mut prev_level = None;
        for occupancy in 1..=80 {
            let crowd: Vec<Particle> = (0..occupancy).map(|_| particle(10, 10)).collect();
            grid.rebuild(&crowd);
            let level = grid.bucket_for(0, 0).level().unwrap();
            if let Some(prev) = prev_level {
                assert!(level >= prev, "level dropped at occupancy {}", occupancy);
            }
            prev_level = Some(level);
        }
    }

    #[test]
    fn rejects_invalid_geometry() {
        let settings = SimulationSettings {
            plane_width: 100,
            plane_height: 100,
            bin_size: 30,
            ..Default::default()
        };
        assert!(DensityGrid::new(&settings).is_err());
    }

    #[test]
    fn bucket_at_resolves_plane_coordinates() {
        let mut grid = DensityGrid::new(&small_settings()).unwrap();
        grid.rebuild(&[particle(75, 20)]);
        assert_eq!(grid.bucket_at(60, 10), ColorBucket::Level(0));
        assert_eq!(grid.bucket_at(10, 10), ColorBucket::Empty);
    }
}
