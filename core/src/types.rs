use crate::codec::types::CodecError;
use crate::config::ConfigError;
use crate::format::types::FormatError;
use crate::index::types::IndexError;

/// Unified error over index, codec, format and configuration failures.
/// - `From<T>` impls let callers mix layers with `?`.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for HeaderError {
    fn from(e: std::io::Error) -> Self {
        HeaderError::Codec(CodecError::Io(e))
    }
}
