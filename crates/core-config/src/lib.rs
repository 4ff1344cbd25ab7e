//! Configuration loading and parsing.
//!
//! Parses `lined.toml` (or an override path provided by the binary). Every
//! section and field is optional; absent values take the defaults below and
//! unknown fields are ignored so older binaries tolerate newer files.
//!
//! ```toml
//! [store]
//! initial_capacity = 10
//! grow_by = 10
//! [text]
//! tab_width = 4
//! [input]
//! idle_timeout_ms = 250
//! [autosave]
//! enabled = false
//! ```
//!
//! Out-of-range values are clamped once at load time. The parsed values
//! (pre-clamp) stay in `Config::file`; the clamped ones are in
//! `Config::effective`. `Config::source` names the file they came from.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const STORE_CHUNK_RANGE: (usize, usize) = (1, 1 << 20);
pub const TAB_WIDTH_RANGE: (usize, usize) = (1, 16);
pub const IDLE_TIMEOUT_MS_RANGE: (u64, u64) = (10, 5000);

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_chunk")]
    pub initial_capacity: usize,
    #[serde(default = "StoreConfig::default_chunk")]
    pub grow_by: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::default_chunk(),
            grow_by: Self::default_chunk(),
        }
    }
}

impl StoreConfig {
    const fn default_chunk() -> usize {
        10
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TextConfig {
    #[serde(default = "TextConfig::default_tab_width")]
    pub tab_width: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl TextConfig {
    const fn default_tab_width() -> usize {
        4
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: Self::default_idle_timeout_ms(),
        }
    }
}

impl InputConfig {
    const fn default_idle_timeout_ms() -> u64 {
        250
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

/// Values after clamping, ready to hand to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effective {
    pub initial_capacity: usize,
    pub grow_by: usize,
    pub tab_width: usize,
    pub idle_timeout: Duration,
    pub autosave: bool,
}

impl Default for Effective {
    fn default() -> Self {
        Self::from_file(&ConfigFile::default())
    }
}

impl Effective {
    fn from_file(file: &ConfigFile) -> Self {
        let (min, max) = STORE_CHUNK_RANGE;
        let initial_capacity = file.store.initial_capacity.clamp(min, max);
        if initial_capacity != file.store.initial_capacity {
            info!(target: "config", raw = file.store.initial_capacity, clamped = initial_capacity, min, max, "store_initial_capacity_clamped");
        }
        let grow_by = file.store.grow_by.clamp(min, max);
        if grow_by != file.store.grow_by {
            info!(target: "config", raw = file.store.grow_by, clamped = grow_by, min, max, "store_grow_by_clamped");
        }
        let (min, max) = TAB_WIDTH_RANGE;
        let tab_width = file.text.tab_width.clamp(min, max);
        if tab_width != file.text.tab_width {
            info!(target: "config", raw = file.text.tab_width, clamped = tab_width, min, max, "text_tab_width_clamped");
        }
        let (min, max) = IDLE_TIMEOUT_MS_RANGE;
        let idle_ms = file.input.idle_timeout_ms.clamp(min, max);
        if idle_ms != file.input.idle_timeout_ms {
            info!(target: "config", raw = file.input.idle_timeout_ms, clamped = idle_ms, min, max, "input_idle_timeout_clamped");
        }
        Self {
            initial_capacity,
            grow_by,
            tab_width,
            idle_timeout: Duration::from_millis(idle_ms),
            autosave: file.autosave.enabled,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,     // parsed (or default) data
    pub effective: Effective, // clamped
    pub source: Option<PathBuf>,
}

impl Config {
    pub fn from_file(file: ConfigFile) -> Self {
        let effective = Effective::from_file(&file);
        Self {
            file,
            effective,
            source: None,
        }
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("lined.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("lined").join("lined.toml");
    }
    PathBuf::from("lined.toml")
}

/// Load from `path` (or the discovered location). A missing or unparsable
/// file yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config::from_file(file);
            info!(target: "config", file = %path.display(), "config_loaded");
            cfg.source = Some(path);
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", file = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}
