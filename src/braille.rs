use crate::palette::PaletteLut;
use crate::simulation::FieldSnapshot;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Render one frame of the density field to styled terminal lines.
///
/// Every cell gets the bucket color of the density bin under it as its
/// background; particles are scaled onto the cell's 2x4 Braille dots and
/// drawn in the scheme's particle color on top.
pub fn render_field(
    snapshot: &FieldSnapshot,
    lut: &PaletteLut,
    canvas_width: u16,
    canvas_height: u16,
) -> Vec<Line<'static>> {
    if canvas_width == 0 || canvas_height == 0 {
        return Vec::new();
    }
    let plane_width = snapshot.grid.bins_x() * snapshot.grid.bin_size();
    let plane_height = snapshot.grid.bins_y() * snapshot.grid.bin_size();

    let width = canvas_width as usize;
    let height = canvas_height as usize;

    // Braille effective resolution
    let braille_width = width * 2;
    let braille_height = height * 4;

    // Scale each particle onto a dot and accumulate per-cell patterns
    let mut patterns = vec![0u8; width * height];
    for particle in snapshot.particles {
        let dot_x = particle.x * braille_width / plane_width;
        let dot_y = particle.y * braille_height / plane_height;
        patterns[(dot_y / 4) * width + dot_x / 2] |= BRAILLE_DOTS[dot_x % 2][dot_y % 4];
    }

    let particle_color = lut.particle_color();
    let mut lines = Vec::with_capacity(height);
    for cy in 0..height {
        let mut spans = Vec::with_capacity(width);
        for cx in 0..width {
            // Background comes from the bin under the cell's first dot
            let plane_x = (cx * 2 * plane_width / braille_width).min(plane_width - 1);
            let plane_y = (cy * 4 * plane_height / braille_height).min(plane_height - 1);
            let bucket = snapshot.grid.bucket_at(plane_x, plane_y);

            let pattern = patterns[cy * width + cx];
            let glyph = if pattern == 0 {
                ' '
            } else {
                char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ')
            };

            spans.push(Span::styled(
                glyph.to_string(),
                Style::default().fg(particle_color).bg(lut.color(bucket)),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}
