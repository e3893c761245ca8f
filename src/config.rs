// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_workers() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_description")]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

fn default_app_name() -> String {
    "Proxima".to_string()
}

fn default_app_description() -> String {
    "Conference website backend".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    10
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Configuration after the validation pass. Handlers only ever see this
/// form.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub upload: UploadConfig,
}

impl ValidatedConfig {
    pub fn upload_limit_bytes(&self) -> usize {
        (self.upload.max_file_size_mb as usize) * 1024 * 1024
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                err
            ))
        })?;
        serde_yaml::from_str(&content).map_err(|err| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                err
            ))
        })
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.upload.max_file_size_mb == 0 || self.upload.max_file_size_mb > 100 {
            return Err(ConfigError::ValidationError(
                "upload.max_file_size_mb must be between 1 and 100".to_string(),
            ));
        }
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "logging.level '{}' is not one of trace, debug, info, warn, error",
                    other
                )));
            }
        }

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            logging: self.logging,
            upload: self.upload,
        })
    }
}

/// Loads the config file, writing a default one first if none exists.
/// Returns whether the file was created so startup can say so.
pub fn load_or_create(path: &Path) -> Result<(ValidatedConfig, bool), ConfigError> {
    let mut created = false;
    if !path.exists() {
        let content = serde_yaml::to_string(&Config::default()).map_err(|err| {
            ConfigError::LoadError(format!("Failed to serialize default config: {}", err))
        })?;
        fs::write(path, content).map_err(|err| {
            ConfigError::LoadError(format!(
                "Failed to create config file '{}': {}",
                path.display(),
                err
            ))
        })?;
        created = true;
    }
    let validated = Config::load(path)?.validate()?;
    Ok((validated, created))
}
