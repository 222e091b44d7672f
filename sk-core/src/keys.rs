//! Logical soft keys and their physical key mapping

use std::fmt;

use crate::error::ConfigError;

/// One of the three soft keys of a non-touch device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalKey {
    /// Left soft key
    Lsk,
    /// Center soft key
    Csk,
    /// Right soft key
    Rsk,
}

impl LogicalKey {
    /// Every soft key, in discovery scan order
    pub const ALL: [LogicalKey; 3] = [LogicalKey::Lsk, LogicalKey::Csk, LogicalKey::Rsk];

    pub fn index(self) -> usize {
        match self {
            LogicalKey::Lsk => 0,
            LogicalKey::Csk => 1,
            LogicalKey::Rsk => 2,
        }
    }

    /// Style class carried by this key's proxy button
    pub fn class_name(self) -> &'static str {
        match self {
            LogicalKey::Lsk => "LSK",
            LogicalKey::Csk => "CSK",
            LogicalKey::Rsk => "RSK",
        }
    }

    /// Parse `lsk`/`csk`/`rsk` (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lsk" => Some(LogicalKey::Lsk),
            "csk" => Some(LogicalKey::Csk),
            "rsk" => Some(LogicalKey::Rsk),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Named physical key vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPreset {
    /// LSK=F1, CSK=Enter, RSK=F2
    #[default]
    Function,
    /// LSK=q, CSK=w, RSK=e
    Letter,
}

impl KeyPreset {
    pub fn name(self) -> &'static str {
        match self {
            KeyPreset::Function => "function",
            KeyPreset::Letter => "letter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "function" => Some(KeyPreset::Function),
            "letter" => Some(KeyPreset::Letter),
            _ => None,
        }
    }

    fn physical(self) -> [&'static str; 3] {
        match self {
            KeyPreset::Function => ["F1", "Enter", "F2"],
            KeyPreset::Letter => ["q", "w", "e"],
        }
    }
}

/// Physical key identifier assigned to each logical key
///
/// The three identifiers are always distinct, so resolution is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    physical: [String; 3],
}

impl KeyMap {
    pub fn new(
        lsk: impl Into<String>,
        csk: impl Into<String>,
        rsk: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let map = Self {
            physical: [lsk.into(), csk.into(), rsk.into()],
        };
        map.validate()?;
        Ok(map)
    }

    pub fn preset(preset: KeyPreset) -> Self {
        let [lsk, csk, rsk] = preset.physical();
        Self {
            physical: [lsk.into(), csk.into(), rsk.into()],
        }
    }

    /// Replace one key's identifier, checking the result for duplicates
    pub fn with(mut self, key: LogicalKey, physical: impl Into<String>) -> Result<Self, ConfigError> {
        self.physical[key.index()] = physical.into();
        self.validate()?;
        Ok(self)
    }

    pub fn physical(&self, key: LogicalKey) -> &str {
        &self.physical[key.index()]
    }

    /// Logical key answering to `physical`, if any
    pub fn resolve(&self, physical: &str) -> Option<LogicalKey> {
        LogicalKey::ALL
            .into_iter()
            .find(|key| self.physical[key.index()] == physical)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (i, first) in LogicalKey::ALL.into_iter().enumerate() {
            for second in LogicalKey::ALL.into_iter().skip(i + 1) {
                if self.physical(first) == self.physical(second) {
                    return Err(ConfigError::DuplicateKey {
                        key: self.physical(first).to_string(),
                        first,
                        second,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::preset(KeyPreset::default())
    }
}
