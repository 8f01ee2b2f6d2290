// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "pgr-rs.toml";
const CONFIG_DIR_NAME: &str = "pgr-rs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Returns the default search paths for `pgr-rs.toml`
/// (current directory → XDG config → /etc).
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from("/etc").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    paths
}

/// Pick `[key]` out of a TOML document and deserialize it as `T`.
///
/// `Ok(None)` means the document parsed but has no such section.
fn parse_section<T: DeserializeOwned>(
    content: &str,
    path: &Path,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let parse_err = |e: toml::de::Error| ConfigError::ParseError(path.to_path_buf(), e.to_string());

    let mut table: toml::Table = toml::from_str(content).map_err(parse_err)?;
    match table.remove(key) {
        Some(section) => section.try_into().map(Some).map_err(parse_err),
        None => Ok(None),
    }
}

fn load_section_from_file<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
    parse_section(&content, path, key)
}

/// Trait for loading configuration from a `pgr-rs.toml` section.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section key in `pgr-rs.toml` (e.g. `"pgr-server"`).
    fn section_key() -> &'static str;

    /// Load the section from a specific file path.
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// does not contain the expected `[<section_key>]` header.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_section_from_file::<Self>(path, Self::section_key())?.ok_or_else(|| {
            ConfigError::ParseError(
                path.to_path_buf(),
                format!("missing [{}] section", Self::section_key()),
            )
        })
    }

    /// Search default paths (`pgr-rs.toml` in CWD → XDG → /etc) and load
    /// the first file that contains the expected section.
    ///
    /// Returns `(config, path_where_found)` or `(Default::default(), None)`
    /// when no config file is found.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if path.exists() {
                if let Some(cfg) = load_section_from_file::<Self>(&path, Self::section_key())? {
                    return Ok((cfg, Some(path)));
                }
            }
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        retries: u32,
    }

    impl ConfigFile for Sample {
        fn section_key() -> &'static str {
            "sample"
        }
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_named_section_with_defaults() {
        let file = write_config("[other]\nname = \"x\"\n\n[sample]\nname = \"pager\"\n");
        let cfg = Sample::load_from_file(file.path()).unwrap();
        assert_eq!(cfg.name, "pager");
        assert_eq!(cfg.retries, 0);
    }

    #[test]
    fn missing_section_is_an_error() {
        let file = write_config("[other]\nname = \"x\"\n");
        let err = Sample::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("missing [sample] section"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let file = write_config("[sample\nname = ");
        assert!(matches!(
            Sample::load_from_file(file.path()),
            Err(ConfigError::ParseError(_, _))
        ));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Sample::load_from_file(&missing),
            Err(ConfigError::ReadError(_, _))
        ));
    }

    #[test]
    fn section_values_use_serde_defaults() {
        let cfg: Sample = parse_section("[sample]\nretries = 4\n", Path::new("inline"), "sample")
            .unwrap()
            .unwrap();
        assert_eq!(cfg.name, "");
        assert_eq!(cfg.retries, 4);
    }

    #[test]
    fn wrong_type_in_section_is_a_parse_error() {
        let err = parse_section::<Sample>("[sample]\nretries = \"many\"\n", Path::new("inline"), "sample")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_, _)));
    }

    #[test]
    fn search_paths_end_in_config_file_name() {
        let paths = config_search_paths();
        assert_eq!(paths[0], PathBuf::from("pgr-rs.toml"));
        assert!(paths.iter().all(|p| p.ends_with(CONFIG_FILE_NAME)));
    }
}
