// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for pgr-server.
//!
//! Config is loaded from the `[pgr-server]` section of `pgr-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./pgr-rs.toml`
//! 3. `~/.config/pgr-rs/pgr-rs.toml`
//! 4. `/etc/pgr-rs/pgr-rs.toml`
//!
//! `PAGERMON_*` environment variables override the file, and CLI flags
//! override both.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pgr_app::ConfigFile;
use pgr_reporting::pagermon::default_user_agent;
use pgr_reporting::PagerMonClientConfig;

pub use pgr_decode_log::DecodeLogsConfig;

pub const API_KEY_ENV: &str = "PAGERMON_API_KEY";
pub const BASE_URL_ENV: &str = "PAGERMON_BASE_URL";
pub const IDENTIFIER_ENV: &str = "PAGERMON_IDENTIFIER";

/// Top-level server configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// General settings
    pub general: GeneralConfig,
    /// PagerMon server connection
    pub pagermon: PagerMonConfig,
    /// Where multimon-ng output is read from
    pub input: InputConfig,
    /// Decoded page file logging
    pub decode_logs: DecodeLogsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// PagerMon server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerMonConfig {
    /// Server base URL (`PAGERMON_BASE_URL`)
    pub base_url: Option<String>,
    /// API key sent in the `apikey` header (`PAGERMON_API_KEY`)
    pub api_key: Option<String>,
    /// Source identifier attached to every message (`PAGERMON_IDENTIFIER`)
    pub source: Option<String>,
    /// Override for the `User-Agent` header
    pub user_agent: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PagerMonConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            source: None,
            user_agent: None,
            timeout_secs: 10,
        }
    }
}

/// Fully resolved PagerMon settings: every required value is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPagerMon {
    pub client: PagerMonClientConfig,
    pub source: String,
}

impl PagerMonConfig {
    /// Override file values with non-empty environment values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(API_KEY_ENV) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(BASE_URL_ENV) {
            self.base_url = Some(v);
        }
        if let Some(v) = get(IDENTIFIER_ENV) {
            self.source = Some(v);
        }
    }

    /// Check that api key, base URL and source are all set.
    pub fn resolve(&self) -> Result<ResolvedPagerMon, String> {
        let api_key = required(&self.api_key, API_KEY_ENV, "api_key")?;
        let base_url = required(&self.base_url, BASE_URL_ENV, "base_url")?;
        let source = required(&self.source, IDENTIFIER_ENV, "source")?;

        Ok(ResolvedPagerMon {
            client: PagerMonClientConfig {
                base_url,
                api_key,
                user_agent: self
                    .user_agent
                    .clone()
                    .filter(|ua| !ua.trim().is_empty())
                    .unwrap_or_else(default_user_agent),
                timeout_secs: self.timeout_secs,
            },
            source,
        })
    }
}

fn required(value: &Option<String>, env_key: &str, field: &str) -> Result<String, String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!(
            "{env_key} environment variable (or [pagermon].{field}) must be set"
        )),
    }
}

/// Input source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File or FIFO with multimon-ng output; stdin when unset or "-"
    pub path: Option<String>,
}

impl InputConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match self.path.as_deref().map(str::trim) {
            None | Some("") | Some("-") => None,
            Some(p) => Some(PathBuf::from(p)),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if self.pagermon.timeout_secs == 0 {
            return Err("[pagermon].timeout_secs must be > 0".to_string());
        }
        if let Some(url) = self.pagermon.base_url.as_deref() {
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!(
                    "[pagermon].base_url '{}' must start with http:// or https://",
                    url
                ));
            }
        }
        if self.decode_logs.enabled && self.decode_logs.dir.trim().is_empty() {
            return Err("[decode_logs].dir must be set when decode logging is enabled".to_string());
        }
        Ok(())
    }

    /// Generate an example configuration wrapped under the `[pgr-server]`
    /// section header, suitable for use in a combined `pgr-rs.toml` file.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "pgr-server")]
            inner: ServerConfig,
        }
        let example = ServerConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            pagermon: PagerMonConfig {
                base_url: Some("https://pagermon.example.org".to_string()),
                api_key: Some("changeme".to_string()),
                source: Some("rtl-sdr-1".to_string()),
                user_agent: None,
                timeout_secs: 10,
            },
            input: InputConfig {
                path: Some("-".to_string()),
            },
            decode_logs: DecodeLogsConfig::default(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

impl ConfigFile for ServerConfig {
    fn section_key() -> &'static str {
        "pgr-server"
    }
}
