//! config.rs
//! Caller-supplied settings for reading headers.
//!
//! Nothing here reads the process environment unless `from_env` is called.

use std::env;

use crate::codec::types::HeaderMagic;
use crate::constants::{LOCALE_ENV_VARS, MAX_HEADER_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_size must be in 1..={max}, got {have}")]
    InvalidMaxSize { have: usize, max: usize },

    #[error("empty locale preference")]
    EmptyLocale,
}

/// Settings for `read_header`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Colon-separated locale preference, e.g. `"en_US:fr"`.
    pub locale: Option<String>,
    /// Expect the 8-byte magic in front of the image.
    pub magic: HeaderMagic,
    /// Upper bound for the image size, prefix included.
    pub max_size: usize,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            locale: None,
            magic: HeaderMagic::Yes,
            max_size: MAX_HEADER_SIZE,
        }
    }
}

impl HeaderConfig {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_magic(mut self, magic: HeaderMagic) -> Self {
        self.magic = magic;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Locale preference from `LANGUAGE`, `LC_ALL`, `LC_MESSAGES`, `LANG`
    /// (first non-empty one wins); other fields keep their defaults.
    pub fn from_env() -> Self {
        let locale = LOCALE_ENV_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|v| !v.is_empty());
        Self { locale, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 || self.max_size > MAX_HEADER_SIZE {
            return Err(ConfigError::InvalidMaxSize { have: self.max_size, max: MAX_HEADER_SIZE });
        }
        if matches!(self.locale.as_deref(), Some("")) {
            return Err(ConfigError::EmptyLocale);
        }
        Ok(())
    }
}
