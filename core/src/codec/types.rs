//! codec/types.rs
//! Wire descriptor and codec errors.
//!
//! Design notes:
//! - Every multi-byte integer on the wire is big-endian (network order).
//! - A descriptor is 16 bytes: tag, type, count, offset (all 32-bit).
//! - Offsets are relative to the start of the data section.

use std::io;

use byteorder::{BigEndian, ByteOrder};

use crate::config::ConfigError;
use crate::constants::ENTRY_INFO_LEN;
use crate::index::types::TagType;
use crate::tags::Tag;
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Whether an image is framed by the 8-byte magic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum HeaderMagic {
    #[default]
    Yes,
    No,
}

/// One on-wire entry descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    pub tag: Tag,
    pub ty: TagType,
    pub count: u32,
    pub offset: i32,
}

impl EntryInfo {
    pub const LEN: usize = ENTRY_INFO_LEN;

    /// Parse a descriptor from the first 16 bytes of `buf`.
    pub fn read(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < Self::LEN {
            return Err(CodecError::Truncated { have: buf.len(), need: Self::LEN });
        }
        let raw_ty = BigEndian::read_u32(&buf[4..8]);
        let ty = TagType::try_from(raw_ty).map_err(|_| CodecError::UnknownType { raw: raw_ty })?;
        Ok(Self {
            tag: BigEndian::read_i32(&buf[0..4]),
            ty,
            count: BigEndian::read_u32(&buf[8..12]),
            offset: BigEndian::read_i32(&buf[12..16]),
        })
    }

    /// Serialize into 16 network-order bytes.
    pub fn to_bytes(&self) -> [u8; ENTRY_INFO_LEN] {
        let mut out = [0u8; ENTRY_INFO_LEN];
        BigEndian::write_i32(&mut out[0..4], self.tag);
        BigEndian::write_u32(&mut out[4..8], self.ty as u32);
        BigEndian::write_u32(&mut out[8..12], self.count);
        BigEndian::write_i32(&mut out[12..16], self.offset);
        out
    }
}

/// Errors raised while decoding or encoding header images.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("header image truncated: {have} < {need}")]
    Truncated { have: usize, need: usize },

    #[error("header size {size} exceeds limit {max}")]
    TooLarge { size: usize, max: usize },

    #[error("negative {field} in header prefix: {value}")]
    NegativeLength { field: &'static str, value: i32 },

    #[error("invalid magic: expected {}, got {}", fmt_bytes(.need), fmt_bytes(.have))]
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    #[error("unknown data type: {}", type_name_or_hex(.raw))]
    UnknownType { raw: u32 },

    #[error("tag {tag}: {reason}")]
    MalformedEntry { tag: Tag, reason: &'static str },

    #[error("malformed region: {0}")]
    MalformedRegion(&'static str),

    #[error("data length mismatch: declared {declared}, reconstructed {computed}")]
    LengthMismatch { declared: usize, computed: usize },

    #[error("encode integrity check failed: {stage} at {have}, expected {need}")]
    Integrity { stage: &'static str, have: usize, need: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn type_name_or_hex(raw: &u32) -> String {
    enum_name_or_hex::<TagType>(*raw)
}
