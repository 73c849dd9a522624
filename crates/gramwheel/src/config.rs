use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ringkit::passivegram::{self, Mode};
use ringkit::puzzle::{DEFAULT_RINGS, DEFAULT_SEGMENTS, Dimensions};
use ringkit::vocab::{VocabError, VocabularySet};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Page shown when the window opens.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    #[strum(to_string = "puzzle", serialize = "grammar", serialize = "builder")]
    Puzzle,
    #[strum(to_string = "passivegram", serialize = "gram", serialize = "passive")]
    PassiveGram,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Puzzle => "Grammar Builder",
            Self::PassiveGram => "PassiveGram",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub rings: usize,
    pub segments: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rings: DEFAULT_RINGS,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl PuzzleConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.rings, self.segments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PassiveGramConfig {
    pub mode: Option<Mode>,
    pub reveal_delay_ms: u64,
    pub unlock_delay_ms: u64,
    pub vocabulary: VocabularySet,
}

impl Default for PassiveGramConfig {
    fn default() -> Self {
        Self {
            mode: None,
            reveal_delay_ms: passivegram::REVEAL_DELAY.as_millis() as u64,
            unlock_delay_ms: passivegram::UNLOCK_DELAY.as_millis() as u64,
            vocabulary: VocabularySet::default(),
        }
    }
}

impl PassiveGramConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn unlock_delay(&self) -> Duration {
        Duration::from_millis(self.unlock_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub puzzle: PuzzleConfig,
    pub passivegram: PassiveGramConfig,
    pub window: WindowConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.passivegram.vocabulary.validate(passivegram::SEGMENTS)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid vocabulary: {0}")]
    Vocabulary(#[from] VocabError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "gramwheel", "gramwheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    let config: Config = builder
        .add_source(
            config::Environment::with_prefix("GRAMWHEEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    finish(config::Config::builder().add_source(config::File::from(path.to_path_buf()).required(false)))
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    finish(
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}

/// Loads the user's configuration, falling back to defaults when the file is
/// missing or invalid.
pub fn load_or_setup() -> Config {
    match get_config_path() {
        Ok(path) if !path.exists() => {
            log::info!("No config at {}, using defaults", path.display());
            Config::default()
        }
        _ => load_config().unwrap_or_else(|e| {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::{Receiver, Sender};

fn watch_dir(
    dir: &Path,
) -> Result<(RecommendedWatcher, Receiver<notify::Result<notify::Event>>), ConfigError> {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    // the watcher stops when dropped
    let (_watcher, bridge_rx) = match watch_dir(&config_dir) {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("Failed to watch config directory: {}", e);
            return;
        }
    };
    log::debug!("Watching {}", config_dir.display());

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
