//! Construction parameters supplied by the caller.
//!
//! # Responsibility
//! - Parse and validate the TOML settings for arenas and logging.
//!
//! # Invariants
//! - Unknown sections are rejected; the operator set cannot be overridden.
//! - A validated config always yields a constructible `ScratchArena`.

use crate::logging::{normalize_level, LogTarget, LoggingError};
use crate::scratch::arena::{ArenaResult, ScratchArena, DEFAULT_CHUNK_CAPACITY};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub arena: ArenaConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaConfig {
    pub chunk_capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rotated log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn target(&self) -> LogTarget {
        LogTarget::from_dir(self.log_dir.as_deref())
    }
}

/// Config load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    ZeroChunkCapacity,
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::ZeroChunkCapacity => write!(f, "arena.chunk_capacity must be positive"),
            Self::Logging(err) => write!(f, "invalid logging config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::ZeroChunkCapacity => None,
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl CoreConfig {
    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena.chunk_capacity == 0 {
            return Err(ConfigError::ZeroChunkCapacity);
        }
        normalize_level(&self.logging.level)?;
        if let Some(dir) = &self.logging.log_dir {
            if !dir.is_absolute() {
                return Err(LoggingError::RelativeLogDir(dir.clone()).into());
            }
        }
        Ok(())
    }

    /// Builds an arena with the configured chunk capacity.
    pub fn scratch_arena(&self) -> ArenaResult<ScratchArena> {
        ScratchArena::new(self.arena.chunk_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::scratch::arena::DEFAULT_CHUNK_CAPACITY;

    #[test]
    fn empty_text_yields_defaults() {
        let config = CoreConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.arena.chunk_capacity, DEFAULT_CHUNK_CAPACITY);
    }

    #[test]
    fn operator_overrides_are_rejected() {
        let err = CoreConfig::from_toml_str("[operators]\nxor = 16\n")
            .expect_err("unknown section must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_chunk_capacity_is_rejected() {
        let err = CoreConfig::from_toml_str("[arena]\nchunk_capacity = 0\n")
            .expect_err("zero capacity must fail");
        assert!(matches!(err, ConfigError::ZeroChunkCapacity));
    }

    #[test]
    fn bad_level_is_rejected() {
        let err = CoreConfig::from_toml_str("[logging]\nlevel = \"loud\"\n")
            .expect_err("unknown level must fail");
        assert!(matches!(err, ConfigError::Logging(_)));
    }
}
