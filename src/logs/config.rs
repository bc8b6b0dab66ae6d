use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_target")]
    pub target: LogTarget,

    #[serde(default = "LogConfig::default_level")]
    pub level: LogLevel,

    /// Only used when `target` is `file`. Empty means `<data>/singalong.log`.
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum LogTarget {
    #[serde(rename = "stdout")]
    Stdout,
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum LogLevel {
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

impl CommonConfig for LogConfig {
    fn default() -> Self {
        Self {
            target: Self::default_target(),
            level: Self::default_level(),
            file_path: Self::default_file_path(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if self.target != LogTarget::File {
            return Ok(());
        }

        self.file_path = expandenv("file_path", &self.file_path)?;
        if self.file_path.is_empty() {
            let path = ps.data_path.join("singalong.log");
            self.file_path = format!("{}", path.display());
        }
        if self.file_path.ends_with('/') {
            bail!("file_path must point to a file, not a directory");
        }
        Ok(())
    }
}

impl LogConfig {
    // The CLI writes its results to stdout, keep logs out of the way by default.
    pub fn default_target() -> LogTarget {
        LogTarget::Stderr
    }

    pub fn default_level() -> LogLevel {
        LogLevel::Warning
    }

    pub fn default_file_path() -> String {
        String::new()
    }
}
