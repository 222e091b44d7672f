//! Configuration persistence for softkeys
//!
//! Simple `key=value` file; unknown keys are ignored, bad values are errors.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ConfigError;
use crate::keys::{KeyMap, KeyPreset, LogicalKey};
use crate::overlay::MenuPlacement;

/// Engine and host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub preset: KeyPreset,
    /// Physical identifiers, preset plus any per-key overrides
    pub keymap: KeyMap,
    /// Logical key that closes the options menu
    pub cancel_key: LogicalKey,
    /// Text of the options menu cancel row
    pub cancel_label: String,
    pub menu_placement: MenuPlacement,
    /// Theme name for the terminal host
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: KeyPreset::default(),
            keymap: KeyMap::default(),
            cancel_key: LogicalKey::Lsk,
            cancel_label: "Cancel".to_string(),
            menu_placement: MenuPlacement::default(),
            theme: "green".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Falls back to defaults when the file is missing or invalid.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("softkeys")
            .join("config.txt")
    }

    /// Parse config from `key=value` lines
    ///
    /// Per-key overrides (`lsk=`, `csk=`, `rsk=`) apply on top of `preset`
    /// regardless of line order.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut overrides: Vec<(LogicalKey, String)> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let invalid = || ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            };

            match key {
                "preset" => config.preset = KeyPreset::parse(value).ok_or_else(invalid)?,
                "lsk" | "csk" | "rsk" => {
                    if value.is_empty() {
                        return Err(invalid());
                    }
                    let logical = LogicalKey::parse(key).ok_or_else(invalid)?;
                    overrides.push((logical, value.to_string()));
                }
                "cancel_key" => config.cancel_key = LogicalKey::parse(value).ok_or_else(invalid)?,
                "cancel_label" => {
                    if !value.is_empty() {
                        config.cancel_label = value.to_string();
                    }
                }
                "menu_placement" => {
                    config.menu_placement = MenuPlacement::parse(value).ok_or_else(invalid)?
                }
                "theme" => {
                    if !value.is_empty() {
                        config.theme = value.to_string();
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        // Distinctness is checked on the final map so overrides may swap keys
        let preset = KeyMap::preset(config.preset);
        let mut physical = LogicalKey::ALL.map(|key| preset.physical(key).to_string());
        for (logical, id) in overrides {
            physical[logical.index()] = id;
        }
        let [lsk, csk, rsk] = physical;
        config.keymap = KeyMap::new(lsk, csk, rsk)?;

        Ok(config)
    }

    /// Serialize config to `key=value` lines
    pub fn serialize(&self) -> String {
        let mut lines = vec![
            "# softkeys configuration".to_string(),
            format!("preset={}", self.preset.name()),
        ];

        let preset = KeyMap::preset(self.preset);
        for key in LogicalKey::ALL {
            if self.keymap.physical(key) != preset.physical(key) {
                lines.push(format!(
                    "{}={}",
                    key.class_name().to_lowercase(),
                    self.keymap.physical(key)
                ));
            }
        }

        lines.push(format!(
            "cancel_key={}",
            self.cancel_key.class_name().to_lowercase()
        ));
        lines.push(format!("cancel_label={}", self.cancel_label));
        lines.push(format!("menu_placement={}", self.menu_placement.name()));
        lines.push(format!("theme={}", self.theme));

        lines.join("\n")
    }
}
