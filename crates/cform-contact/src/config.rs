#![forbid(unsafe_code)]

//! Form configuration.
//!
//! Layers apply in order: built-in defaults, then a JSON config file, then
//! `CFORM_*` environment variables, then command-line flags (see
//! [`crate::cli`]). Every file field is optional.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::field::FieldId;

/// Environment variable naming a config file.
pub const ENV_CONFIG: &str = "CFORM_CONFIG";
pub const ENV_MIN_FIRST_NAME: &str = "CFORM_MIN_FIRST_NAME";
pub const ENV_KEEP_VALUES: &str = "CFORM_KEEP_VALUES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactFormConfig {
    /// Minimum first-name length in characters.
    pub first_name_min_len: usize,
    /// Clear inputs after a successful submit.
    pub clear_on_submit: bool,
    pub placeholders: Placeholders,
}

impl ContactFormConfig {
    pub const DEFAULT_FIRST_NAME_MIN_LEN: usize = 5;

    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|err| err.with_path(path))
    }

    /// Apply `CFORM_*` overrides read through `var`.
    ///
    /// `var` is injectable so tests need not touch the process environment.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var(ENV_MIN_FIRST_NAME) {
            self.first_name_min_len = parse_min_len(ENV_MIN_FIRST_NAME, &val)?;
        }
        if let Some(val) = var(ENV_KEEP_VALUES) {
            self.clear_on_submit = !parse_flag(ENV_KEEP_VALUES, &val)?;
        }
        Ok(())
    }

    /// Layer defaults, the optional file, and the environment.
    pub fn load<F>(file: Option<&Path>, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: Option<PathBuf> = file
            .map(Path::to_path_buf)
            .or_else(|| var(ENV_CONFIG).map(PathBuf::from));
        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(var)?;
        Ok(config)
    }

    /// Placeholder text for `field`, if it shows one.
    pub fn placeholder(&self, field: FieldId) -> Option<&str> {
        match field {
            FieldId::FirstName => Some(&self.placeholders.first_name),
            FieldId::LastName => Some(&self.placeholders.last_name),
            FieldId::Email => Some(&self.placeholders.email),
            FieldId::Message => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.first_name_min_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "first_name_min_len".into(),
                value: "0".into(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            first_name_min_len: Self::DEFAULT_FIRST_NAME_MIN_LEN,
            clear_on_submit: true,
            placeholders: Placeholders::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Placeholders {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        let text = |field: FieldId| field.default_placeholder().unwrap_or_default().to_string();
        Self {
            first_name: text(FieldId::FirstName),
            last_name: text(FieldId::LastName),
            email: text(FieldId::Email),
        }
    }
}

/// Parse a first-name minimum from an env var or flag value.
pub fn parse_min_len(key: &str, val: &str) -> Result<usize, ConfigError> {
    match val.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            value: val.into(),
            reason: "expected a positive integer",
        }),
    }
}

fn parse_flag(key: &str, val: &str) -> Result<bool, ConfigError> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            value: val.into(),
            reason: "expected a boolean (1/0, true/false)",
        }),
    }
}

/// Configuration failure.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The config document is not valid JSON for [`ContactFormConfig`].
    Parse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    /// A setting parsed but is out of range.
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Parse { path: None, source } => Self::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid config {}: {source}", path.display()),
            Self::Parse { path: None, source } => write!(f, "invalid config: {source}"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value {value:?} for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}
