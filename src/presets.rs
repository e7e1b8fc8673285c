use crate::config;
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named parameter set for the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: SimulationSettings,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: SimulationSettings,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
        }
    }
}

/// Manager for builtin and user presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let user = Self::user_dir()
            .map(|dir| Self::load_from_dir(&dir))
            .unwrap_or_default();
        Self {
            builtin: builtin_presets(),
            user,
        }
    }

    fn user_dir() -> Option<PathBuf> {
        config::config_dir().map(|dir| dir.join("presets"))
    }

    /// Load every parseable preset JSON from a directory; unreadable files
    /// are skipped rather than aborting startup.
    fn load_from_dir(dir: &Path) -> Vec<Preset> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut presets: Vec<Preset> = entries
            .flatten()
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|entry| fs::read_to_string(entry.path()).ok())
            .filter_map(|content| serde_json::from_str::<Preset>(&content).ok())
            .filter(|preset| preset.settings.validate().is_ok())
            .collect();
        presets.sort_by(|a, b| a.name.cmp(&b.name));
        presets
    }

    /// Persist a preset into the user preset directory
    pub fn save_user(&mut self, preset: Preset) -> Result<(), String> {
        preset.settings.validate()?;
        let dir = Self::user_dir().ok_or("No config directory available")?;
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

        let file_name: String = preset
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let path = dir.join(format!("{}.json", file_name.to_lowercase()));
        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

        self.user.retain(|p| p.name != preset.name);
        self.user.push(preset);
        Ok(())
    }

    /// Look a preset up by name, builtin first, case-insensitive
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.builtin
            .iter()
            .chain(self.user.iter())
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }
}

/// The presets that ship with the binary
fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "Reference",
            "The default parameters: 10k particles, 20x20 bins",
            SimulationSettings::default(),
        ),
        Preset::new(
            "Fine Grain",
            "Smaller bins and a gentler density ramp",
            SimulationSettings {
                bin_size: 25,
                density_step: 2,
                ..Default::default()
            },
        ),
        Preset::new(
            "Coarse",
            "Large bins that saturate only under heavy crowding",
            SimulationSettings {
                bin_size: 100,
                density_step: 20,
                ..Default::default()
            },
        ),
        Preset::new(
            "Jitter",
            "Twice the particles, turning half the time",
            SimulationSettings {
                num_particles: 20_000,
                turn_probability: 0.5,
                ..Default::default()
            },
        ),
        Preset::new(
            "Drift",
            "Few turns, so particles streak across the field",
            SimulationSettings {
                num_particles: 5_000,
                turn_probability: 0.01,
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_presets_all_validate() {
        for preset in builtin_presets() {
            assert!(
                preset.settings.validate().is_ok(),
                "builtin preset {} is invalid",
                preset.name
            );
        }
    }

    #[test]
    fn builtin_names_are_unique() {
        let presets = builtin_presets();
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let manager = PresetManager {
            builtin: builtin_presets(),
            user: Vec::new(),
        };
        assert!(manager.find("reference").is_some());
        assert!(manager.find("JITTER").is_some());
        assert!(manager.find("no-such-preset").is_none());
    }

    #[test]
    fn load_from_dir_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = Preset::new("Good", "valid", SimulationSettings::default());
        fs::write(
            dir.path().join("good.json"),
            serde_json::to_string(&good).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut invalid = Preset::new("Bad", "invalid bin size", SimulationSettings::default());
        invalid.settings.bin_size = 7;
        fs::write(
            dir.path().join("bad.json"),
            serde_json::to_string(&invalid).unwrap(),
        )
        .unwrap();

        let loaded = PresetManager::load_from_dir(dir.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Good");
    }

    #[test]
    fn missing_dir_yields_no_presets() {
        assert!(PresetManager::load_from_dir(Path::new("/nonexistent/presets")).is_empty());
    }
}
