//! pkghdr-core
//!
//! Pure Rust package header store: in-memory tag index, binary codec with
//! regions, typed accessors with i18n strings, and a query-format engine.
//! No FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;
pub mod tags;

// Store and codec
pub mod index;
pub mod codec;
pub mod accessors;

// Templates
pub mod format;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::accessors::{copy_tags, EntryRef, HeaderItem};
    pub use crate::codec::{
        copy, load, load_copy, read_header, reload, size_of, unload, write_header, CodecError,
        HeaderMagic,
    };
    pub use crate::config::HeaderConfig;
    pub use crate::format::{sprintf, ExtensionRegistry, FormatError, Template};
    pub use crate::index::{IndexError, TagIndex, TagType, TagValue};
    pub use crate::tags::{Tag, TagTable};
    pub use crate::types::HeaderError;
}
