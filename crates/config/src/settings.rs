// Application settings
// Loaded from ~/.config/mafile-manager/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use mafile_io::TrimMode;
use mafile_recon::{AsfTemplate, DEFAULT_OUTPUT_DIR};

const DEFAULT_FILE: &str = r#"{
    // ASF export: output folder (relative paths resolve against the working directory)
    "asf.outputDir": "ASFmaFiles",

    // Constant part of every generated bot config
    "asf.enabled": true,
    "asf.onlineStatus": 7,
    "asf.remoteCommunication": 0,

    // Trim modes: subfolder created inside the input folder
    "trim.fullDir": "fullmafiles",
    "trim.fsmDir": "shortmaffsmpanel",
    "trim.dmDir": "shortmafdmpanel"
}
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ASF export
    #[serde(rename = "asf.outputDir")]
    pub asf_output_dir: String,

    #[serde(rename = "asf.enabled")]
    pub asf_enabled: bool,

    #[serde(rename = "asf.onlineStatus")]
    pub asf_online_status: u8,

    #[serde(rename = "asf.remoteCommunication")]
    pub asf_remote_communication: u8,

    // Trim modes
    #[serde(rename = "trim.fullDir")]
    pub trim_full_dir: String,

    #[serde(rename = "trim.fsmDir")]
    pub trim_fsm_dir: String,

    #[serde(rename = "trim.dmDir")]
    pub trim_dm_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        let template = AsfTemplate::default();
        Self {
            asf_output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            asf_enabled: template.enabled,
            asf_online_status: template.online_status,
            asf_remote_communication: template.remote_communication,
            trim_full_dir: TrimMode::Full.default_dir_name().to_string(),
            trim_fsm_dir: TrimMode::Fsm.default_dir_name().to_string(),
            trim_dm_dir: TrimMode::Dm.default_dir_name().to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mafile-manager");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file gives defaults silently;
    /// an unreadable or invalid one gives defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {e}; using default settings", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings text. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to `path` (comments are not preserved)
    pub fn save(&self, path: &Path) -> Result<(), String> {
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Write the commented default file. Refuses to overwrite unless `force`.
    pub fn write_default_file(path: &Path, force: bool) -> Result<(), String> {
        if path.exists() && !force {
            return Err(format!("{} already exists", path.display()));
        }
        ensure_parent(path)?;
        fs::write(path, DEFAULT_FILE).map_err(|e| e.to_string())
    }

    pub fn asf_template(&self) -> AsfTemplate {
        AsfTemplate {
            enabled: self.asf_enabled,
            online_status: self.asf_online_status,
            remote_communication: self.asf_remote_communication,
        }
    }

    /// Subfolder name for a trim mode
    pub fn trim_dir(&self, mode: TrimMode) -> &str {
        match mode {
            TrimMode::Full => &self.trim_full_dir,
            TrimMode::Fsm => &self.trim_fsm_dir,
            TrimMode::Dm => &self.trim_dm_dir,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| e.to_string())
        }
        _ => Ok(()),
    }
}
