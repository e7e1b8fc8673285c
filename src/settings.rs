use serde::{Deserialize, Serialize};

/// Bounds on the particle count, shared by the CLI and runtime adjustment
pub const MIN_PARTICLES: usize = 100;
pub const MAX_PARTICLES: usize = 200_000;

/// All simulation parameters consolidated into one struct.
///
/// These are construction parameters: the plane geometry and particle count
/// only take effect when a new `SimulationState` is built, while the turn
/// probability and density step can also be pushed into a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    // === Plane geometry ===
    /// Width of the simulation plane in lattice cells
    pub plane_width: usize,
    /// Height of the simulation plane in lattice cells
    pub plane_height: usize,
    /// Side length of one square density bin; must evenly divide both
    /// plane dimensions
    pub bin_size: usize,

    // === Particles ===
    /// Number of particles (fixed for the lifetime of a run)
    pub num_particles: usize,
    /// Probability per particle per tick of redrawing its direction (0.0-1.0)
    pub turn_probability: f64,

    // === Density mapping ===
    /// How many particles in a bin advance the color by one bucket
    pub density_step: usize,
    /// Number of graded (non-empty) palette buckets
    pub palette_levels: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            // 1000x1000 plane split into 20x20 bins of 50 cells
            plane_width: 1000,
            plane_height: 1000,
            bin_size: 50,

            num_particles: 10_000,
            turn_probability: 0.1,

            density_step: 5,
            palette_levels: 10,
        }
    }
}

impl SimulationSettings {
    /// Check the configuration-time preconditions.
    ///
    /// Bin divisibility and the probability range are the only ways to build
    /// an inconsistent simulation, so they are rejected here once instead of
    /// being re-checked every tick.
    pub fn validate(&self) -> Result<(), String> {
        // The increasing directions wrap to coordinate 1, which must exist
        if self.plane_width < 2 || self.plane_height < 2 {
            return Err("Plane dimensions must be at least 2 cells".to_string());
        }
        if self.bin_size == 0 {
            return Err("Bin size must be non-zero".to_string());
        }
        if self.plane_width % self.bin_size != 0 || self.plane_height % self.bin_size != 0 {
            return Err(format!(
                "Bin size {} must evenly divide the plane ({}x{})",
                self.bin_size, self.plane_width, self.plane_height
            ));
        }
        if self.num_particles == 0 {
            return Err("Particle count must be non-zero".to_string());
        }
        if !(0.0..=1.0).contains(&self.turn_probability) {
            return Err(format!(
                "Turn probability {} must be within 0.0-1.0",
                self.turn_probability
            ));
        }
        if self.density_step == 0 {
            return Err("Density step must be non-zero".to_string());
        }
        if self.palette_levels == 0 {
            return Err("Palette must have at least one level".to_string());
        }
        Ok(())
    }

    /// Bins along the x axis
    pub fn bins_x(&self) -> usize {
        self.plane_width / self.bin_size
    }

    /// Bins along the y axis
    pub fn bins_y(&self) -> usize {
        self.plane_height / self.bin_size
    }

    /// Adjust turn probability within bounds
    pub fn adjust_turn_probability(&mut self, delta: f64) {
        self.turn_probability = (self.turn_probability + delta).clamp(0.0, 1.0);
    }

    /// Adjust particle count within bounds (takes effect on reset)
    pub fn adjust_particles(&mut self, delta: i64) {
        let new_val = (self.num_particles as i64 + delta).clamp(MIN_PARTICLES as i64, MAX_PARTICLES as i64);
        self.num_particles = new_val as usize;
    }

    /// Adjust density step within bounds
    pub fn adjust_density_step(&mut self, delta: i32) {
        let new_val = (self.density_step as i32 + delta).clamp(1, 100);
        self.density_step = new_val as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(SimulationSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_dividing_bin_size() {
        let settings = SimulationSettings {
            bin_size: 30, // 1000 % 30 != 0
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_plane() {
        // Wrap targets both coordinate 0 and coordinate 1
        for (w, h) in [(1, 100), (100, 1), (1, 1)] {
            let settings = SimulationSettings {
                plane_width: w,
                plane_height: h,
                bin_size: 1,
                ..Default::default()
            };
            assert!(settings.validate().is_err());
        }
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let settings = SimulationSettings {
            turn_probability: 1.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = SimulationSettings {
            turn_probability: -0.1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_fields() {
        for mutate in [
            (|s: &mut SimulationSettings| s.plane_width = 0) as fn(&mut SimulationSettings),
            |s| s.bin_size = 0,
            |s| s.num_particles = 0,
            |s| s.density_step = 0,
            |s| s.palette_levels = 0,
        ] {
            let mut settings = SimulationSettings::default();
            mutate(&mut settings);
            assert!(settings.validate().is_err());
        }
    }

    #[test]
    fn bin_counts_follow_geometry() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.bins_x(), 20);
        assert_eq!(settings.bins_y(), 20);
    }

    #[test]
    fn adjustments_stay_clamped() {
        let mut settings = SimulationSettings::default();
        settings.adjust_turn_probability(5.0);
        assert_eq!(settings.turn_probability, 1.0);
        settings.adjust_turn_probability(-5.0);
        assert_eq!(settings.turn_probability, 0.0);

        settings.adjust_particles(-1_000_000);
        assert_eq!(settings.num_particles, MIN_PARTICLES);
        settings.adjust_particles(1_000_000);
        assert_eq!(settings.num_particles, MAX_PARTICLES);

        settings.adjust_density_step(-50);
        assert_eq!(settings.density_step, 1);
    }
}
