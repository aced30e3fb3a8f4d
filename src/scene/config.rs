//! Viewer configuration: which mesh files the numeric load slots and
//! the light marker point at.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deployment-level knobs, loaded from `meshview.json` next to the
/// executable's working directory. Missing or malformed files fall
/// back to the bundled demo meshes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Mesh paths bound to the digit keys, slot 1 first.
    pub slots: Vec<PathBuf>,
    /// Mesh drawn as the light-source marker, loaded at startup.
    pub light_marker: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            slots: vec![
                PathBuf::from("assets/meshes/cube.off"),
                PathBuf::from("assets/meshes/pyramid.off"),
                PathBuf::from("assets/meshes/diamond.off"),
            ],
            light_marker: PathBuf::from("assets/meshes/lightcube.off"),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads the config, falling back to defaults when the file is
    /// absent or unreadable. Anything other than a clean parse is
    /// logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("ignoring config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn slot_path(&self, slot: usize) -> Option<&Path> {
        slot.checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("meshview-config-{}-{name}", std::process::id()))
    }

    #[test]
    fn round_trips_through_json() {
        let path = temp_path("roundtrip.json");
        let config = ViewerConfig {
            slots: vec![PathBuf::from("a.off"), PathBuf::from("b.off")],
            light_marker: PathBuf::from("marker.off"),
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        std::fs::write(&path, json).unwrap();
        let loaded = ViewerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = ViewerConfig::load_or_default(Path::new("/nonexistent/meshview.json"));
        assert_eq!(loaded, ViewerConfig::default());
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let path = temp_path("malformed.json");
        std::fs::write(&path, "{not json").unwrap();
        let loaded = ViewerConfig::load_or_default(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, ViewerConfig::default());
    }

    #[test]
    fn partial_config_keeps_default_for_missing_fields() {
        let path = temp_path("partial.json");
        std::fs::write(&path, r#"{"light_marker": "custom.off"}"#).unwrap();
        let loaded = ViewerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.light_marker, PathBuf::from("custom.off"));
        assert_eq!(loaded.slots, ViewerConfig::default().slots);
    }

    #[test]
    fn slot_lookup_is_one_based() {
        let config = ViewerConfig::default();
        assert!(config.slot_path(0).is_none());
        assert_eq!(
            config.slot_path(1),
            Some(Path::new("assets/meshes/cube.off"))
        );
        assert!(config.slot_path(99).is_none());
    }
}
