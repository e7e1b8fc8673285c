use crate::grid::ColorBucket;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Named color schemes for the density field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// White background, blues darkening with density
    #[default]
    Midnight,
    /// Black background, red-orange glow brightening with density
    Ember,
    /// Black background, cyan-blue ice brightening with density
    Glacier,
    /// Black background, green growth brightening with density
    Moss,
    /// White background, grays darkening with density
    Mono,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Midnight => "Midnight",
            ColorScheme::Ember => "Ember",
            ColorScheme::Glacier => "Glacier",
            ColorScheme::Moss => "Moss",
            ColorScheme::Mono => "Mono",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Midnight => ColorScheme::Ember,
            ColorScheme::Ember => ColorScheme::Glacier,
            ColorScheme::Glacier => ColorScheme::Moss,
            ColorScheme::Moss => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Midnight,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorScheme::Midnight => ColorScheme::Mono,
            ColorScheme::Ember => ColorScheme::Midnight,
            ColorScheme::Glacier => ColorScheme::Ember,
            ColorScheme::Moss => ColorScheme::Glacier,
            ColorScheme::Mono => ColorScheme::Moss,
        }
    }

    /// Resolve this scheme into a lookup table with one entry per graded
    /// bucket plus the empty-bucket and particle colors.
    pub fn build_lut(&self, levels: usize) -> PaletteLut {
        let (empty, from, to, particle) = match self {
            // Midnight runs (0,0,200) down to (0,0,20) on a white
            // background, particles drawn white.
            ColorScheme::Midnight => (
                [255, 255, 255],
                [0, 0, 200],
                [0, 0, 20],
                [255, 255, 255],
            ),
            ColorScheme::Ember => ([0, 0, 0], [80, 20, 0], [255, 80, 0], [255, 255, 200]),
            ColorScheme::Glacier => ([0, 0, 0], [0, 60, 120], [0, 255, 255], [255, 255, 255]),
            ColorScheme::Moss => ([0, 0, 0], [0, 60, 10], [80, 255, 40], [230, 255, 230]),
            ColorScheme::Mono => ([255, 255, 255], [210, 210, 210], [15, 15, 15], [255, 255, 255]),
        };
        let graded = (0..levels).map(|level| lerp_rgb(from, to, level, levels)).collect();
        PaletteLut {
            empty,
            graded,
            particle,
        }
    }
}

/// Linear ramp between two colors across `levels` graded buckets
fn lerp_rgb(from: [u8; 3], to: [u8; 3], level: usize, levels: usize) -> [u8; 3] {
    if levels <= 1 {
        return from;
    }
    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let span = to[i] as i32 - from[i] as i32;
        *channel = (from[i] as i32 + span * level as i32 / (levels as i32 - 1)) as u8;
    }
    rgb
}

/// Pre-resolved colors for one scheme at a fixed bucket count.
///
/// Stores raw RGB triples so the same table serves both the terminal
/// renderer and the PNG/GIF exporter.
pub struct PaletteLut {
    empty: [u8; 3],
    graded: Vec<[u8; 3]>,
    particle: [u8; 3],
}

impl PaletteLut {
    /// RGB triple for a bucket
    pub fn rgb(&self, bucket: ColorBucket) -> [u8; 3] {
        match bucket {
            ColorBucket::Empty => self.empty,
            // Bucket levels are clamped by the grid, but saturate here too
            // so a LUT built for fewer levels cannot index out of range.
            ColorBucket::Level(level) => self.graded[level.min(self.graded.len() - 1)],
        }
    }

    /// Terminal color for a bucket
    pub fn color(&self, bucket: ColorBucket) -> Color {
        let [r, g, b] = self.rgb(bucket);
        Color::Rgb(r, g, b)
    }

    pub fn particle_rgb(&self) -> [u8; 3] {
        self.particle
    }

    pub fn particle_color(&self) -> Color {
        let [r, g, b] = self.particle;
        Color::Rgb(r, g, b)
    }

    pub fn levels(&self) -> usize {
        self.graded.len()
    }
}
