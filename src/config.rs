use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Construction parameters of the knob. Fixed for the lifetime of a mounted knob.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KnobConfig {
    pub radius: f64,
    pub tick_height: f64,
    pub tick_width: f64,
    pub tick_count: u32,
    /// Size of the dead zone, in degrees.
    pub limiting_angle: f64,
    pub initial_rotation: f64,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            tick_height: 13.0,
            tick_width: 4.0,
            tick_count: 35,
            limiting_angle: 20.0,
            initial_rotation: 10.0,
        }
    }
}

impl KnobConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let full_turn = 0.0..360.0;

        if self.tick_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "tick_count must be at least 2, got {}",
                self.tick_count
            )));
        }
        if !full_turn.contains(&self.limiting_angle) {
            return Err(ConfigError::Invalid(format!(
                "limiting_angle must be within [0, 360), got {}",
                self.limiting_angle
            )));
        }
        if !full_turn.contains(&self.initial_rotation) {
            return Err(ConfigError::Invalid(format!(
                "initial_rotation must be within [0, 360), got {}",
                self.initial_rotation
            )));
        }

        [
            ("radius", self.radius),
            ("tick_height", self.tick_height),
            ("tick_width", self.tick_width),
        ]
        .into_iter()
        .find(|(_, v)| !(v.is_finite() && *v > 0.0))
        .map_or(Ok(()), |(name, v)| {
            Err(ConfigError::Invalid(format!(
                "{name} must be a positive number, got {v}"
            )))
        })
    }

    /// Side length of the square surface that fits the dial and its tick ring.
    pub fn surface_size(&self) -> f64 {
        2.0 * (self.radius + self.tick_height)
    }
}

/// A `#rrggbb` color given in the config file.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn to_srgba(self) -> Srgba<f64> {
        self.0.into_format::<f64>().with_alpha(1.0)
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.trim_start_matches('#').len() != 6 {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        Srgb::from_str(trimmed)
            .map(Self)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ColorOverrides {
    pub highlight: Option<HexColor>,
    pub neutral: Option<HexColor>,
    pub indicator: Option<HexColor>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub knob: KnobConfig,
    #[serde(default)]
    pub colors: ColorOverrides,
}

impl Config {
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Self::finish(s)
    }

    fn finish(s: config::Config) -> Result<Self, ConfigError> {
        let config: Config = s.try_deserialize()?;
        config.knob.validate()?;
        Ok(config)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid knob config: {0}")]
    Invalid(String),
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "knob", "knob").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(std::path::absolute(path)?),
        None => get_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("KNOB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Config::finish(s)
}

pub fn load_or_default(path: &Path) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!(
                "Falling back to default config ({}): {}",
                path.display(),
                e
            );
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn create_watcher(
    bridge_tx: async_channel::Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    Ok(watcher)
}

/// Sends [`AppEvent::ConfigReload`] whenever the file at `config_path` changes.
/// notify reports absolute paths, so a relative `config_path` is anchored to the
/// working directory first.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_path = match std::path::absolute(&config_path) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Cannot watch {}: {}", config_path.display(), e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match create_watcher(bridge_tx) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
