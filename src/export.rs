use crate::palette::PaletteLut;
use crate::simulation::FieldSnapshot;
use image::{Rgb, RgbImage};
use std::fs::File;
use std::path::Path;

/// Memory budget for buffered raw RGB frames; each frame costs
/// width * height * 3 bytes, so the frame cap scales with the plane
const MAX_GIF_BUFFER_BYTES: usize = 256 * 1024 * 1024;

/// Render a snapshot at full plane resolution: one pixel per lattice cell,
/// bins drawn as solid color blocks, particles as single pixels on top.
pub fn render_image(snapshot: &FieldSnapshot, lut: &PaletteLut) -> RgbImage {
    let bin_size = snapshot.grid.bin_size();
    let width = (snapshot.grid.bins_x() * bin_size) as u32;
    let height = (snapshot.grid.bins_y() * bin_size) as u32;

    let mut image = RgbImage::new(width, height);
    for bin_y in 0..snapshot.grid.bins_y() {
        for bin_x in 0..snapshot.grid.bins_x() {
            let pixel = Rgb(lut.rgb(snapshot.grid.bucket_for(bin_x, bin_y)));
            for dy in 0..bin_size {
                for dx in 0..bin_size {
                    image.put_pixel((bin_x * bin_size + dx) as u32, (bin_y * bin_size + dy) as u32, pixel);
                }
            }
        }
    }

    let particle_pixel = Rgb(lut.particle_rgb());
    for particle in snapshot.particles {
        image.put_pixel(particle.x as u32, particle.y as u32, particle_pixel);
    }
    image
}

/// Render and save one PNG snapshot
pub fn save_png(snapshot: &FieldSnapshot, lut: &PaletteLut, path: &Path) -> Result<(), String> {
    render_image(snapshot, lut)
        .save(path)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Buffers rendered frames while recording, then writes an animated GIF.
pub struct GifRecorder {
    width: u16,
    height: u16,
    max_frames: usize,
    frames: Vec<Vec<u8>>,
}

impl GifRecorder {
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("Cannot record an empty plane".to_string());
        }
        let max_frames = (MAX_GIF_BUFFER_BYTES / (width * height * 3)).max(1);
        let width = u16::try_from(width)
            .map_err(|_| format!("Plane width {} exceeds GIF limits", width))?;
        let height = u16::try_from(height)
            .map_err(|_| format!("Plane height {} exceeds GIF limits", height))?;
        Ok(Self {
            width,
            height,
            max_frames,
            frames: Vec::new(),
        })
    }

    /// Buffer one frame; returns false once the recorder is full
    pub fn push_frame(&mut self, snapshot: &FieldSnapshot, lut: &PaletteLut) -> bool {
        if self.frames.len() >= self.max_frames {
            return false;
        }
        self.frames.push(render_image(snapshot, lut).into_raw());
        true
    }

    /// How many frames fit in the memory budget for this plane size
    pub fn capacity(&self) -> usize {
        self.max_frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode all buffered frames as a looping GIF
    pub fn write_to(&self, path: &Path) -> Result<(), String> {
        if self.frames.is_empty() {
            return Err("No frames recorded".to_string());
        }
        let file = File::create(path)
            .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
        let mut encoder = gif::Encoder::new(file, self.width, self.height, &[])
            .map_err(|e| format!("Failed to start GIF encoder: {}", e))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| format!("Failed to set GIF repeat: {}", e))?;
        for buffer in &self.frames {
            let mut frame = gif::Frame::from_rgb_speed(self.width, self.height, buffer, 10);
            frame.delay = 3; // ~30 fps in hundredths of a second
            encoder
                .write_frame(&frame)
                .map_err(|e| format!("Failed to encode GIF frame: {}", e))?;
        }
        Ok(())
    }
}
