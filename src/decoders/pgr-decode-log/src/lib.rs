// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoded page file logging.
//!
//! Provides [`DecodeLogsConfig`] for TOML configuration and [`DecodeLogger`]
//! for writing JSON-Lines log files with automatic daily rotation. Pages and
//! rejected input lines share one file and are told apart by `decoder`.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use pgr_core::decode::DecodedPage;

const PAGE_LABEL: &str = "pager";
const REJECTED_LABEL: &str = "rejected";

fn default_decode_logs_dir() -> String {
    match dirs::data_dir() {
        Some(data_dir) => data_dir
            .join("pgr-rs")
            .join("decoders")
            .to_string_lossy()
            .to_string(),
        None => "logs/decoders".to_string(),
    }
}

/// Decoded page file logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLogsConfig {
    /// Whether page file logging is enabled
    pub enabled: bool,
    /// Base directory for log files
    pub dir: String,
    /// Log filename template (`%YYYY%`, `%MM%`, `%DD%` are expanded in UTC)
    pub file: String,
    /// Also record lines that could not be parsed
    pub log_rejected: bool,
}

impl Default for DecodeLogsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_decode_logs_dir(),
            file: "PGRRS-PAGER-%YYYY%-%MM%-%DD%.log".to_string(),
            log_rejected: false,
        }
    }
}

#[derive(Serialize)]
struct LogEntry<'a, P: Serialize> {
    ts_ms: i64,
    decoder: &'static str,
    payload: &'a P,
}

#[derive(Serialize)]
struct RejectedLine<'a> {
    line: &'a str,
    error: &'a str,
}

fn expand_template(template: &str, now: DateTime<Utc>) -> String {
    template
        .replace("%YYYY%", &now.format("%Y").to_string())
        .replace("%MM%", &now.format("%m").to_string())
        .replace("%DD%", &now.format("%d").to_string())
}

fn open_append(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .map_err(|e| format!("create decode log dir '{}': {}", parent.display(), e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(BufWriter::new)
        .map_err(|e| format!("open decode log '{}': {}", path.display(), e))
}

struct OpenFile {
    name: String,
    writer: BufWriter<File>,
}

/// Appends one JSON object per event to a date-stamped file.
pub struct DecodeLogger {
    base_dir: PathBuf,
    template: String,
    log_rejected: bool,
    file: Mutex<OpenFile>,
}

impl DecodeLogger {
    /// Create a logger from config, or return `None` when logging is disabled.
    pub fn from_config(cfg: &DecodeLogsConfig) -> Result<Option<Arc<Self>>, String> {
        if !cfg.enabled {
            return Ok(None);
        }

        let base_dir = PathBuf::from(cfg.dir.trim());
        let name = expand_template(&cfg.file, Utc::now());
        let writer = open_append(&base_dir.join(&name))?;

        Ok(Some(Arc::new(Self {
            base_dir,
            template: cfg.file.clone(),
            log_rejected: cfg.log_rejected,
            file: Mutex::new(OpenFile { name, writer }),
        })))
    }

    /// Path of the file currently being written.
    pub fn current_path(&self) -> Option<PathBuf> {
        let file = self.file.lock().ok()?;
        Some(self.base_dir.join(&file.name))
    }

    pub fn log_page(&self, page: &DecodedPage) {
        self.append(PAGE_LABEL, page);
    }

    /// Record a line the parser refused, when enabled in config.
    pub fn log_rejected(&self, line: &str, error: &str) {
        if self.log_rejected {
            self.append(REJECTED_LABEL, &RejectedLine { line, error });
        }
    }

    fn append<P: Serialize>(&self, decoder: &'static str, payload: &P) {
        let now = Utc::now();
        let entry = LogEntry {
            ts_ms: now.timestamp_millis(),
            decoder,
            payload,
        };
        let Ok(mut file) = self.file.lock() else {
            warn!("decode log mutex poisoned");
            return;
        };

        if let Err(e) = self.rotate(&mut file, now) {
            warn!("decode log reopen failed: {}", e);
            return;
        }

        let written = serde_json::to_writer(&mut file.writer, &entry)
            .map_err(|e| e.to_string())
            .and_then(|_| file.writer.write_all(b"\n").map_err(|e| e.to_string()))
            .and_then(|_| file.writer.flush().map_err(|e| e.to_string()));
        if let Err(e) = written {
            warn!("decode log write failed: {}", e);
        }
    }

    /// Switch to a new file when the expanded name changes (date rollover).
    fn rotate(&self, file: &mut OpenFile, now: DateTime<Utc>) -> Result<(), String> {
        let name = expand_template(&self.template, now);
        if name != file.name {
            file.writer = open_append(&self.base_dir.join(&name))?;
            file.name = name;
        }
        Ok(())
    }
}
