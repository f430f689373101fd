//! constants.rs
//! Wire constants shared by the index, codec and format engine.

/// Header magic as written before the (il, dl) prefix.
/// The first four bytes identify the image, the last four are reserved.
pub const HEADER_MAGIC: [u8; 8] = [0x8e, 0xad, 0xe8, 0x01, 0x00, 0x00, 0x00, 0x00];

/// Length of the compared part of the magic.
pub const MAGIC_LEN: usize = 4;

/// Size of the (entry count, data length) prefix.
pub const PREFIX_LEN: usize = 8;

/// Size of one on-wire entry descriptor (tag, type, count, offset).
pub const ENTRY_INFO_LEN: usize = 16;

/// Size of a region trailer; also the count stored on a region marker.
pub const REGION_TAG_COUNT: u32 = ENTRY_INFO_LEN as u32;

/// Hard cap for a decoded header (32 MiB, ~16 times the largest known image).
pub const MAX_HEADER_SIZE: usize = 32 * 1024 * 1024;

/// Wire type identifiers.
pub mod type_ids {
    pub const NULL: u32         = 0;
    pub const CHAR: u32         = 1;
    pub const INT8: u32         = 2;
    pub const INT16: u32        = 3;
    pub const INT32: u32        = 4;
    pub const INT64: u32        = 5;
    pub const STRING: u32       = 6;
    pub const BIN: u32          = 7;
    pub const STRING_ARRAY: u32 = 8;
    pub const I18NSTRING: u32   = 9;
}

/// Largest field width accepted in a template (`%1024{NAME}`).
pub const MAX_FIELD_WIDTH: usize = 1024;

/// Placeholder rendered for a missing tag or a failed extension.
pub const NONE_PLACEHOLDER: &str = "(none)";

/// Placeholder rendered by numeric renderers for non-integer input.
pub const NOT_A_NUMBER: &str = "(not a number)";

/// Locale used when no language is given for an i18n string.
pub const DEFAULT_LOCALE: &str = "C";

/// Environment variables consulted (in order) by `HeaderConfig::from_env`.
pub const LOCALE_ENV_VARS: &[&str] = &["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"];
