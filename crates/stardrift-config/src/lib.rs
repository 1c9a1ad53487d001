//! Configuration file handling for stardrift.
//!
//! The config file is TOML. Every section is optional and every key falls
//! back to its default, so an empty or missing file yields the stock scene.
//!
//! ```toml
//! seed = 42
//!
//! [scene]
//! particle_count = 600
//!
//! [stars]
//! max_active = 32
//!
//! [log]
//! filter = "stardrift_scene=debug"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stardrift_core::Settings;
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "stardrift.log";

/// Largest particle count that still animates smoothly in a terminal.
const PARTICLE_WARN_LIMIT: usize = 20_000;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "stardrift")
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, overridden by `STARDRIFT_LOG`.
    pub filter: String,
    /// Log file path; defaults to the platform cache directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// The whole config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub settings: Settings,
    pub log: LogConfig,
}

impl Config {
    /// `<config_dir>/stardrift/config.toml`, if the platform has a home
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// `<cache_dir>/stardrift/stardrift.log`.
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE))
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file is not an error; a file that exists but does not
    /// parse is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .wrap_err_with(|| format!("failed to read config {}", path.display()));
            }
        };
        Self::parse(&raw).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .wrap_err_with(|| format!("failed to write config {}", path.display()))
    }

    /// Log file to use: the configured one, else the cache default.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.file.clone().or_else(Self::default_log_path)
    }

    /// Non-fatal problems with the loaded values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let s = &self.settings;

        if s.scene.particle_count == 0 {
            warnings.push("scene.particle_count is 0; no particles will be drawn".to_string());
        } else if s.scene.particle_count > PARTICLE_WARN_LIMIT {
            warnings.push(format!(
                "scene.particle_count = {} is very high; expect dropped frames",
                s.scene.particle_count
            ));
        }
        if !(0.0..=1.0).contains(&s.scene.camera_speed) {
            warnings.push(format!(
                "scene.camera_speed = {} is outside 0..=1; the camera will overshoot",
                s.scene.camera_speed
            ));
        }
        for (name, value) in [
            ("horizontal", s.sensitivity.horizontal),
            ("vertical", s.sensitivity.vertical),
            ("particle", s.sensitivity.particle),
            ("object", s.sensitivity.object),
        ] {
            if value < 0.0 {
                warnings.push(format!(
                    "sensitivity.{name} = {value} is negative; pointer effects are inverted"
                ));
            }
        }
        if s.stars.lifespan_secs <= 0.0 {
            warnings.push(format!(
                "stars.lifespan_secs = {} means stars vanish on their first frame",
                s.stars.lifespan_secs
            ));
        }
        if s.stars.spawn_interval_ms == 0 {
            warnings.push("stars.spawn_interval_ms is 0; treated as 1ms".to_string());
        }
        if s.stars.max_active == 0 {
            warnings.push("stars.max_active is 0; the active star count is unbounded".to_string());
        }
        for (name, value) in [
            ("scroll.ease", s.scroll.ease),
            ("scroll.camera_ease", s.scroll.camera_ease),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                warnings.push(format!("{name} = {value} should be in (0, 1]"));
            }
        }

        warnings
    }
}
