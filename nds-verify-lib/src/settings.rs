//! User settings (`~/.config/nds-verify/settings.toml`).
//!
//! Holds the dumper name written into submissions, where the No-Intro DS
//! DAT lives, and optional overrides for the closed vocabularies.

use std::path::{Path, PathBuf};

use nds_verify_core::Vocabulary;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Commented template written by `config init`.
pub const DEFAULT_SETTINGS: &str = r#"# nds-verify settings

# Your name as it should appear in submissions.
dumper = ""

# Match dumps against a No-Intro DS DAT.
use_dat = false
dat_path = ""

# Where generated XML files go. Defaults to the ROM's directory.
# output_dir = ""

# Override any of the closed value sets (regions, languages,
# front_serial_prefixes, disambiguate_regions).
# [vocabulary]
# front_serial_prefixes = ["NTR", "TWL", "UTL"]
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dumper: String,
    pub use_dat: bool,
    pub dat_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub vocabulary: Vocabulary,
}

/// Canonical path to the settings file: `~/.config/nds-verify/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("nds-verify").join("settings.toml")
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut settings: Settings = toml::from_str(&contents)?;
        // An empty string in the template means "not set"
        if settings
            .dat_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            settings.dat_path = None;
        }
        if settings
            .output_dir
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            settings.output_dir = None;
        }
        Ok(settings)
    }

    /// Load from [`settings_path`].
    pub fn load_default() -> Result<Self, SettingsError> {
        Self::load(&settings_path())
    }

    /// The DAT to match against, if DAT use is enabled and the file exists.
    ///
    /// An enabled but missing DAT disables matching for the run with a
    /// warning rather than failing.
    pub fn active_dat_path(&self) -> Option<&Path> {
        if !self.use_dat {
            return None;
        }
        match self.dat_path.as_deref() {
            Some(path) if path.is_file() => Some(path),
            Some(path) => {
                log::warn!(
                    "DAT file {} not found, continuing without catalog matching",
                    path.display()
                );
                None
            }
            None => {
                log::warn!("use_dat is set but dat_path is empty, continuing without catalog matching");
                None
            }
        }
    }

    /// Write settings to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let serialized = toml::to_string_pretty(self)?;
        write_atomic(path, &serialized)
    }
}

/// Write the commented template to `path` unless a file is already there.
/// Returns whether a file was written.
pub fn write_default(path: &Path) -> Result<bool, SettingsError> {
    if path.exists() {
        return Ok(false);
    }
    write_atomic(path, DEFAULT_SETTINGS)?;
    Ok(true)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
