//! User settings read from `cheat.toml`.
//!
//! ```toml
//! cheat_files = "cheat.dat;mycheats.dat"
//! database_dirs = ["/usr/share/phosphor"]
//! watch_line_height = 10
//!
//! [search]
//! speed = "normal"
//! memory_limit = 1048576
//!
//! [[watch]]
//! cpu = 0
//! address = "4E14"
//! length = 1
//! label = "lives"
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use phosphor_cheat::cheat::database::DEFAULT_DATABASE;
use phosphor_cheat::engine::CheatConfig;
use phosphor_cheat::search::SearchSpeed;
use phosphor_cheat::watch::{WatchLabel, Watchpoint};
use serde::Deserialize;

use crate::memory_image::parse_address;

const CONFIG_FILE: &str = "cheat.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("watch entry {index}: {message}")]
    Watch { index: usize, message: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedSetting {
    All,
    Normal,
    #[default]
    Fast,
}

impl From<SpeedSetting> for SearchSpeed {
    fn from(speed: SpeedSetting) -> Self {
        match speed {
            SpeedSetting::All => SearchSpeed::All,
            SpeedSetting::Normal => SearchSpeed::Normal,
            SpeedSetting::Fast => SearchSpeed::Fast,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    pub speed: SpeedSetting,
    /// Byte cap for the search tables.
    pub memory_limit: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchEntry {
    #[serde(default)]
    pub cpu: usize,
    /// Hex, with or without `0x`.
    pub address: String,
    #[serde(default = "one")]
    pub length: u8,
    pub label: Option<String>,
}

fn one() -> u8 {
    1
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cheat_files: String,
    pub database_dirs: Vec<PathBuf>,
    pub watch_line_height: u16,
    pub search: SearchSettings,
    pub watch: Vec<WatchEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cheat_files: DEFAULT_DATABASE.to_owned(),
            database_dirs: default_database_dirs(),
            watch_line_height: 8,
            search: SearchSettings::default(),
            watch: Vec::new(),
        }
    }
}

/// The current directory, then `<config dir>/phosphor`.
fn default_database_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(config) = dirs::config_dir() {
        dirs.push(config.join("phosphor"));
    }
    dirs
}

/// `<config dir>/phosphor/cheat.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("phosphor").join(CONFIG_FILE))
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Read `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!("settings read from {}", path.display());
                Self::parse(&text, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Read an explicitly named file, which must exist, or else the default location.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })?;
                Self::parse(&text, path)
            }
            None => default_path().map_or_else(|| Ok(Self::default()), |path| Self::load(&path)),
        }
    }

    pub fn cheat_config(&self) -> CheatConfig {
        CheatConfig {
            cheat_files: self.cheat_files.clone(),
            search_speed: self.search.speed.into(),
            search_memory_limit: self.search.memory_limit,
            watch_line_height: self.watch_line_height,
        }
    }

    pub fn watchpoints(&self) -> Result<Vec<Watchpoint>, ConfigError> {
        self.watch
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let address = parse_address(&entry.address)
                    .map_err(|message| ConfigError::Watch { index, message })?;
                let label = match entry.label.as_deref() {
                    None => WatchLabel::Address,
                    Some(text) => WatchLabel::text(text),
                };
                Ok(Watchpoint::new(entry.cpu, address, entry.length).with_label(label))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        Config::parse(text, Path::new("cheat.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cheat_config(), CheatConfig::default());
    }

    #[test]
    fn full_file() {
        let config = parse(
            r#"
            cheat_files = "a.dat;b.dat"
            database_dirs = ["/opt/cheats"]
            watch_line_height = 10

            [search]
            speed = "normal"
            memory_limit = 4096

            [[watch]]
            address = "0x4E14"
            label = "lives"

            [[watch]]
            cpu = 1
            address = "10"
            length = 4
            "#,
        )
        .unwrap();

        let cheat = config.cheat_config();
        assert_eq!(cheat.cheat_files, "a.dat;b.dat");
        assert_eq!(cheat.search_speed, SearchSpeed::Normal);
        assert_eq!(cheat.search_memory_limit, Some(4096));
        assert_eq!(cheat.watch_line_height, 10);
        assert_eq!(config.database_dirs, [PathBuf::from("/opt/cheats")]);

        let watches = config.watchpoints().unwrap();
        assert_eq!(watches[0], Watchpoint::new(0, 0x4E14, 1).with_label(WatchLabel::text("lives")));
        assert_eq!(watches[1], Watchpoint::new(1, 0x10, 4).with_label(WatchLabel::Address));
    }

    #[test]
    fn malformed_files_are_errors() {
        assert!(matches!(parse("speed = 3"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            parse("[search]\nspeed = \"turbo\""),
            Err(ConfigError::Parse { .. })
        ));

        let config = parse("[[watch]]\naddress = \"zz\"").unwrap();
        assert!(matches!(
            config.watchpoints(),
            Err(ConfigError::Watch { index: 0, .. })
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("phosphor_cheat_config_test_missing");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join(CONFIG_FILE);
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(Config::resolve(Some(&path)).is_err());

        std::fs::write(&path, "cheat_files = \"x.dat\"\n").unwrap();
        assert_eq!(Config::resolve(Some(&path)).unwrap().cheat_files, "x.dat");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
