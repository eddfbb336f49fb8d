//! `board-maker.toml` loading.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use board_maker_core::{BoardSize, DEFAULT_BOARD_SIZE};
use board_maker_store_client::DEFAULT_STORE_URL;
use log::debug;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "board-maker.toml";

/// Settings read from the config file; every section and key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) server: ServerConfig,
    pub(crate) store: StoreConfig,
    pub(crate) editor: EditorConfig,
}

/// `[server]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServerConfig {
    pub(crate) bind: String,
    pub(crate) api_prefix: String,
    pub(crate) data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_owned(),
            api_prefix: "/api".to_owned(),
            data_dir: PathBuf::from("levels"),
        }
    }
}

/// `[store]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StoreConfig {
    pub(crate) url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_owned(),
        }
    }
}

/// `[editor]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EditorConfig {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_SIZE.width(),
            height: DEFAULT_BOARD_SIZE.height(),
        }
    }
}

impl EditorConfig {
    /// Board size new levels start from.
    pub(crate) fn board_size(&self) -> Result<BoardSize> {
        BoardSize::new(self.width, self.height).with_context(|| {
            format!(
                "configured editor size {}x{} is not a valid board size",
                self.width, self.height
            )
        })
    }
}

impl Config {
    /// Loads the config file at `path`, or the default file when `path` is `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound && !explicit => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read config at {}", path.display()))
            }
        };

        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    /// Parses config file contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse config toml contents")?;
        if !config.server.api_prefix.starts_with('/') {
            bail!(
                "server.api_prefix `{}` must start with `/`",
                config.server.api_prefix
            );
        }
        Ok(config)
    }
}
