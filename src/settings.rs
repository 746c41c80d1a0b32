use crate::errors::{EqualizeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Output
    pub output_dir: PathBuf,
    pub jpeg_quality: u8,
    pub write_csv: bool,
    pub write_charts: bool,

    // Parallel run; None uses every hardware thread
    pub threads: Option<usize>,

    // Logging
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            jpeg_quality: 100,
            write_csv: true,
            write_charts: true,
            threads: None,
            debug: false,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EqualizeError::SettingsError {
            message: format!("cannot read '{}': {}", path.display(), e),
        })?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(EqualizeError::SettingsError {
                message: format!("jpeg_quality must be within 1..=100, got {}", self.jpeg_quality),
            });
        }
        if self.threads == Some(0) {
            return Err(EqualizeError::SettingsError {
                message: "threads must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Worker count for the parallel run.
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| num_cpus::get().max(1))
    }
}
