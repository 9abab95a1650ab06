//! `config.toml` loading for the command line.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use gridcalc_core::SheetConfig;
use gridcalc_engine::engine::CellRef;
use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalize {
    #[default]
    None,
    Upper,
    Lower,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    #[default]
    Any,
    A1,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub version: Option<String>,
    #[serde(default)]
    pub normalize: Normalize,
    #[serde(default)]
    pub names: NameStyle,
    pub name_pattern: Option<String>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<ConfigFile, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn read(path: &Path) -> Result<ConfigFile, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };
        let meta = fs::metadata(path).map_err(read_error)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                max: MAX_CONFIG_FILE_BYTES,
            });
        }
        let content = fs::read_to_string(path).map_err(read_error)?;
        Self::parse(&content)
    }

    /// Build the document options these settings describe.
    pub fn into_sheet_config(self) -> Result<SheetConfig, ConfigError> {
        let mut config = SheetConfig::new();
        if let Some(version) = self.version {
            config = config.with_version(version);
        }

        config = match self.normalize {
            Normalize::None => config,
            Normalize::Upper => config.with_normalizer(|name| name.to_ascii_uppercase()),
            Normalize::Lower => config.with_normalizer(|name| name.to_ascii_lowercase()),
        };

        // Anchored so the whole name has to match.
        let pattern = self
            .name_pattern
            .map(|p| Regex::new(&format!("^(?:{})$", p)))
            .transpose()?;
        let a1_only = self.names == NameStyle::A1;
        if a1_only || pattern.is_some() {
            config = config.with_validator(move |name| {
                (!a1_only || CellRef::is_a1_name(name))
                    && pattern.as_ref().is_none_or(|re| re.is_match(name))
            });
        }

        Ok(config)
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Read `explicit` if given, otherwise the user's `config.toml` when it
/// exists and `use_user_file` is set. Falls back to the defaults.
pub fn load_config(explicit: Option<&Path>, use_user_file: bool) -> Result<SheetConfig, ConfigError> {
    let file = match explicit {
        Some(path) => ConfigFile::read(path)?,
        None => match user_config_path().filter(|path| use_user_file && path.exists()) {
            Some(path) => ConfigFile::read(&path)?,
            None => ConfigFile::default(),
        },
    };
    file.into_sheet_config()
}
