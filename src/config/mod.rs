//! Configuration for the editing engine.
//!
//! This module provides the configuration structure for mapquill with
//! sensible defaults and support for serialization/deserialization via
//! serde. Configuration can be loaded from a TOML file in the user's
//! config directory; any load failure silently falls back to defaults.
//!
//! # Example
//!
//! ```
//! use mapquill::config::EditorConfig;
//!
//! let config = EditorConfig::default();
//! assert_eq!(config.vertex_tolerance_px, 10.0);
//!
//! let custom = EditorConfig {
//!     vertex_tolerance_px: 14.0,
//!     ..EditorConfig::default()
//! };
//! assert_eq!(custom.vertex_tolerance_px, 14.0);
//! ```

use serde::{Deserialize, Serialize};

/// Tunable settings for the editing engine.
///
/// All pixel tolerances are screen pixels; they are converted to map
/// units at the pointer's location when applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Grab radius for vertex drags in the modify mode.
    #[serde(default = "default_vertex_tolerance")]
    pub vertex_tolerance_px: f64,

    /// Grab radius for rectangle corner handles.
    #[serde(default = "default_corner_tolerance")]
    pub corner_tolerance_px: f64,

    /// Hit radius for hover highlighting and click selection.
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance_px: f64,

    /// Magnetism radius handed to the host engine's snapping.
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance_px: f64,

    /// Layer opacity while the session is enabled with an active mode.
    #[serde(default = "default_active_opacity")]
    pub active_opacity: f64,

    /// Layer opacity while the session is disabled or has no mode.
    #[serde(default = "default_dimmed_opacity")]
    pub dimmed_opacity: f64,

    /// Share one physical feature collection between sessions.
    ///
    /// Keeps interactions continuous when the user switches between
    /// editable layers; teardown then strips by layer tag instead of
    /// clearing the collection.
    #[serde(default = "default_shared_collection")]
    pub shared_collection: bool,
}

fn default_vertex_tolerance() -> f64 {
    10.0
}

fn default_corner_tolerance() -> f64 {
    8.0
}

fn default_hit_tolerance() -> f64 {
    6.0
}

fn default_snap_tolerance() -> f64 {
    12.0
}

fn default_active_opacity() -> f64 {
    1.0
}

fn default_dimmed_opacity() -> f64 {
    0.5
}

fn default_shared_collection() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            vertex_tolerance_px: default_vertex_tolerance(),
            corner_tolerance_px: default_corner_tolerance(),
            hit_tolerance_px: default_hit_tolerance(),
            snap_tolerance_px: default_snap_tolerance(),
            active_opacity: default_active_opacity(),
            dimmed_opacity: default_dimmed_opacity(),
            shared_collection: default_shared_collection(),
        }
    }
}

impl EditorConfig {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/mapquill/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("mapquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or
    /// can't be read or parsed.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };
        Self::load_from(&config_path)
    }

    /// Loads configuration from a specific path, falling back to
    /// defaults on any failure.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_string)?;

        Ok(())
    }
}
