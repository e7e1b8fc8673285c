use crate::export::{self, GifRecorder};
use crate::palette::{ColorScheme, PaletteLut};
use crate::presets::{Preset, PresetManager};
use crate::settings::SimulationSettings;
use crate::simulation::SimulationState;
use std::path::PathBuf;

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    DensityStep,
    Particles,
    Scheme,
    Speed,
    TurnProb,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::DensityStep,
            Focus::DensityStep => Focus::Particles,
            Focus::Particles => Focus::Scheme,
            Focus::Scheme => Focus::Speed,
            Focus::Speed => Focus::TurnProb,
            Focus::TurnProb => Focus::DensityStep, // Loop back
        }
    }

    /// Shift+Tab cycles in reverse
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::TurnProb,
            Focus::DensityStep => Focus::TurnProb, // Loop back
            Focus::Particles => Focus::DensityStep,
            Focus::Scheme => Focus::Particles,
            Focus::Speed => Focus::Scheme,
            Focus::TurnProb => Focus::Speed,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub sim: SimulationState,
    pub color_scheme: ColorScheme,
    pub lut: PaletteLut,
    /// Parameter edits accumulate here and apply on the next reset,
    /// except turn probability and density step which also apply live
    pub pending: SimulationSettings,
    pub steps_per_frame: usize,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub presets: PresetManager,
    pub recorder: Option<GifRecorder>,
    /// Last export/recording result shown in the status box
    pub notice: Option<String>,
    seed: Option<u64>,
}

impl App {
    pub fn new(
        sim: SimulationState,
        color_scheme: ColorScheme,
        steps_per_frame: usize,
        seed: Option<u64>,
    ) -> Self {
        let pending = sim.settings().clone();
        Self {
            lut: color_scheme.build_lut(pending.palette_levels),
            sim,
            color_scheme,
            pending,
            steps_per_frame: steps_per_frame.clamp(1, 50),
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            presets: PresetManager::new(),
            recorder: None,
            notice: None,
            seed,
        }
    }

    /// Run simulation ticks for the current frame and feed the recorder
    pub fn tick(&mut self) {
        if self.sim.paused {
            return;
        }
        for _ in 0..self.steps_per_frame {
            self.sim.tick();
        }
        if let Some(recorder) = &mut self.recorder {
            if !recorder.push_frame(&self.sim.snapshot(), &self.lut) {
                self.notice = Some("GIF buffer full, press g to save".to_string());
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.sim.toggle_pause();
    }

    /// Regenerate the run with the pending settings
    pub fn reset(&mut self) {
        let result = if self.pending == *self.sim.settings() {
            self.sim.reset(self.seed)
        } else {
            self.sim.reset_with_settings(self.pending.clone(), self.seed)
        };
        if let Err(e) = result {
            self.notice = Some(e);
        } else {
            self.notice = None;
        }
    }

    /// Replace the pending settings with a preset's and regenerate
    pub fn apply_preset(&mut self, index: usize) {
        if let Some(preset) = self.presets.builtin.get(index) {
            self.pending = preset.settings.clone();
            self.notice = Some(format!("Preset: {}", preset.name));
            let result = self.sim.reset_with_settings(self.pending.clone(), self.seed);
            if let Err(e) = result {
                self.notice = Some(e);
            }
            self.lut = self.color_scheme.build_lut(self.pending.palette_levels);
        }
    }

    /// Persist the pending settings as a user preset
    pub fn save_preset(&mut self) {
        let name = format!("Custom {}", self.presets.user.len() + 1);
        let preset = Preset::new(name.clone(), "Saved from a live run", self.pending.clone());
        self.notice = Some(match self.presets.save_user(preset) {
            Ok(()) => format!("Saved preset {}", name),
            Err(e) => e,
        });
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
        self.lut = self.color_scheme.build_lut(self.pending.palette_levels);
    }

    pub fn cycle_color_scheme_prev(&mut self) {
        self.color_scheme = self.color_scheme.prev();
        self.lut = self.color_scheme.build_lut(self.pending.palette_levels);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    pub fn increase_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame + 1).min(50);
    }

    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = self.steps_per_frame.saturating_sub(1).max(1);
    }

    /// Turn probability applies to the running field immediately
    pub fn adjust_turn_probability(&mut self, delta: f64) {
        self.pending.adjust_turn_probability(delta);
        if let Err(e) = self.sim.set_turn_probability(self.pending.turn_probability) {
            self.notice = Some(e);
        }
    }

    /// Density step applies to the running grid immediately
    pub fn adjust_density_step(&mut self, delta: i32) {
        self.pending.adjust_density_step(delta);
        self.sim.set_density_step(self.pending.density_step);
    }

    /// Particle count takes effect on the next reset
    pub fn adjust_particles(&mut self, delta: i64) {
        self.pending.adjust_particles(delta);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::DensityStep => self.adjust_density_step(1),
            Focus::Particles => self.adjust_particles(500),
            Focus::Scheme => self.cycle_color_scheme(),
            Focus::Speed => self.increase_speed(),
            Focus::TurnProb => self.adjust_turn_probability(0.01),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::DensityStep => self.adjust_density_step(-1),
            Focus::Particles => self.adjust_particles(-500),
            Focus::Scheme => self.cycle_color_scheme_prev(),
            Focus::Speed => self.decrease_speed(),
            Focus::TurnProb => self.adjust_turn_probability(-0.01),
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    fn export_path(&self, extension: &str) -> PathBuf {
        PathBuf::from(format!("brownian-{:06}.{}", self.sim.ticks(), extension))
    }

    /// Save the current frame as a full-resolution PNG
    pub fn export_png(&mut self) {
        let path = self.export_path("png");
        self.notice = Some(
            match export::save_png(&self.sim.snapshot(), &self.lut, &path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => e,
            },
        );
    }

    /// Start recording, or stop and write the GIF
    pub fn toggle_recording(&mut self) {
        match self.recorder.take() {
            Some(recorder) => {
                let path = self.export_path("gif");
                self.notice = Some(match recorder.write_to(&path) {
                    Ok(()) => format!(
                        "Saved {} ({} frames)",
                        path.display(),
                        recorder.frame_count()
                    ),
                    Err(e) => e,
                });
            }
            None => {
                let settings = self.sim.settings();
                match GifRecorder::new(settings.plane_width, settings.plane_height) {
                    Ok(recorder) => {
                        self.recorder = Some(recorder);
                        self.notice = Some("Recording, press g to save".to_string());
                    }
                    Err(e) => self.notice = Some(e),
                }
            }
        }
    }
}
