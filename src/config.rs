// ── Window configuration ──────────────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\casement\window.json`, or any path the caller
// names.  No `unsafe`: pure safe Rust + serde_json.

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which message loop the application drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// `Session::run_main_loop`: event-driven, blocks between messages.
    #[default]
    Blocking,
    /// `Session::run_game_loop`: real-time, runs a tick whenever idle.
    Polling,
}

/// Everything needed to open the application window.
///
/// Every field has a default, so a config file only needs the fields it
/// wants to change and older files keep parsing as fields are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Window class to register; must be unique within the process.
    pub class_name: String,
    /// Icon resource id embedded in the executable, if any.
    pub icon_resource: Option<u16>,
    pub start_fullscreen: bool,
    /// Hide the console window this process was started with, if it owns it.
    pub hide_console: bool,
    pub loop_mode: LoopMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
            class_name: "CasementWindow".to_owned(),
            icon_resource: None,
            start_fullscreen: false,
            hide_console: false,
            loop_mode: LoopMode::Blocking,
        }
    }
}

impl WindowConfig {
    /// Parse the config at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write the config to `path`, creating its directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Return the default config location: `%APPDATA%\casement\window.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub fn config_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("casement");
    p.push("window.json");
    Some(p)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
