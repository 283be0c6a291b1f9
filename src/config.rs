use crate::richtext::history::DEFAULT_HISTORY_LIMIT;
use crate::theme::{Palette, ThemeVariant};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "Notsy";
const APPLICATION: &str = "notsy";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default cap for list nesting
pub const DEFAULT_MAX_INDENT: u8 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("toml serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Editor settings that shape list layout and colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Horizontal distance per nesting level, in points
    pub indent_unit: f32,
    /// Indent of a top-level list paragraph, in points
    pub base_indent: f32,
    /// Width reserved for the marker glyph and its trailing space
    pub marker_width: f32,
    pub line_spacing: f32,
    pub max_indent: u8,
    /// Number of undo steps kept
    pub history_limit: usize,
    pub theme: ThemeVariant,
    /// Overrides the theme's default text color (RGBA)
    pub foreground: Option<u32>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            indent_unit: 20.0,
            base_indent: 4.0,
            marker_width: 18.0,
            line_spacing: 4.0,
            max_indent: DEFAULT_MAX_INDENT,
            history_limit: DEFAULT_HISTORY_LIMIT,
            theme: ThemeVariant::default(),
            foreground: None,
        }
    }
}

impl EditorConfig {
    /// Palette for the configured theme, with the foreground override applied
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::for_variant(self.theme);
        if let Some(foreground) = self.foreground {
            palette.foreground = foreground;
        }
        palette
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<EditorConfig>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config at `path`, or the defaults when it is missing or broken
pub fn load_or_default(path: Option<&Path>) -> EditorConfig {
    let Some(path) = path else {
        return EditorConfig::default();
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return EditorConfig::default();
    }
    match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}; falling back to default editor config");
            EditorConfig::default()
        }
    }
}

pub fn save_config(path: &Path, config: &EditorConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let toml = toml::to_string_pretty(config)?;

    fs::write(path, toml).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
