//! index/types.rs
//! Entry, region and value types of the in-memory tag index.
//!
//! Design notes:
//! - Entry data is kept in wire form (network byte order, NUL-terminated
//!   strings). Conversion to typed values happens at the accessor boundary.
//! - Entries decoded from a region slice the region's blob through `Bytes`,
//!   so they never own a separate allocation and cannot outlive it.
//! - A region is itself an entry (the marker) carrying the verbatim bytes.

use std::fmt;

use bytes::Bytes;
use num_enum::TryFromPrimitive;

use crate::constants::{type_ids, ENTRY_INFO_LEN};
use crate::tags::Tag;

/// Data types of header entries (wire ids).
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum TagType {
    Null        = type_ids::NULL,
    Char        = type_ids::CHAR,
    Int8        = type_ids::INT8,
    Int16       = type_ids::INT16,
    Int32       = type_ids::INT32,
    Int64       = type_ids::INT64,
    String      = type_ids::STRING,
    Bin         = type_ids::BIN,
    StringArray = type_ids::STRING_ARRAY,
    I18nString  = type_ids::I18NSTRING,
}

impl TagType {
    /// Alignment (and element size) of fixed-width types; 1 for the rest.
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            TagType::Int16 => 2,
            TagType::Int32 => 4,
            TagType::Int64 => 8,
            _ => 1,
        }
    }

    /// Size of one element for fixed-size types, `None` for strings.
    #[inline]
    pub const fn element_size(self) -> Option<usize> {
        match self {
            TagType::Null => Some(0),
            TagType::Char | TagType::Int8 | TagType::Bin => Some(1),
            TagType::Int16 => Some(2),
            TagType::Int32 => Some(4),
            TagType::Int64 => Some(8),
            TagType::String | TagType::StringArray | TagType::I18nString => None,
        }
    }

    /// Values of these types cannot be extended in place.
    #[inline]
    pub const fn is_appendable(self) -> bool {
        !matches!(self, TagType::String | TagType::I18nString)
    }

    /// NUL-separated string types.
    #[inline]
    pub const fn is_string_list(self) -> bool {
        matches!(self, TagType::StringArray | TagType::I18nString)
    }

    pub fn name(self) -> &'static str {
        match self {
            TagType::Null => "null",
            TagType::Char => "char",
            TagType::Int8 => "int8",
            TagType::Int16 => "int16",
            TagType::Int32 => "int32",
            TagType::Int64 => "int64",
            TagType::String => "string",
            TagType::Bin => "bin",
            TagType::StringArray => "string array",
            TagType::I18nString => "i18n string",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed, owned entry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Null,
    Char(Vec<u8>),
    Int8(Vec<u8>),
    Int16(Vec<u16>),
    Int32(Vec<u32>),
    Int64(Vec<u64>),
    String(String),
    Bin(Vec<u8>),
    StringArray(Vec<String>),
    I18nString(Vec<String>),
}

impl TagValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            TagValue::Null => TagType::Null,
            TagValue::Char(_) => TagType::Char,
            TagValue::Int8(_) => TagType::Int8,
            TagValue::Int16(_) => TagType::Int16,
            TagValue::Int32(_) => TagType::Int32,
            TagValue::Int64(_) => TagType::Int64,
            TagValue::String(_) => TagType::String,
            TagValue::Bin(_) => TagType::Bin,
            TagValue::StringArray(_) => TagType::StringArray,
            TagValue::I18nString(_) => TagType::I18nString,
        }
    }

    /// Element count as stored in the descriptor (byte length for binary).
    pub fn count(&self) -> u32 {
        let n = match self {
            TagValue::Null => 0,
            TagValue::Char(v) | TagValue::Int8(v) | TagValue::Bin(v) => v.len(),
            TagValue::Int16(v) => v.len(),
            TagValue::Int32(v) => v.len(),
            TagValue::Int64(v) => v.len(),
            TagValue::String(_) => 1,
            TagValue::StringArray(v) | TagValue::I18nString(v) => v.len(),
        };
        n as u32
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            TagValue::StringArray(v) | TagValue::I18nString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u32s(&self) -> Option<&[u32]> {
        match self {
            TagValue::Int32(v) => Some(v),
            _ => None,
        }
    }

    pub fn string_array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagValue::StringArray(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::String(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::String(s)
    }
}

impl From<u32> for TagValue {
    fn from(v: u32) -> Self {
        TagValue::Int32(vec![v])
    }
}

impl From<Vec<u32>> for TagValue {
    fn from(v: Vec<u32>) -> Self {
        TagValue::Int32(v)
    }
}

/// Verbatim, previously serialized sub-record.
///
/// Layout on encode:
///
/// ```text
/// [ marker descriptor (16) ] [ member descriptors (16 * n) ]
/// ...
/// [ member data span ] [ trailer (16) ]
/// ```
#[derive(Debug, Clone)]
pub struct Region {
    /// Member descriptors exactly as decoded (network order).
    pub(crate) members: Bytes,
    /// Data span of the members, starting at data offset 0.
    pub(crate) data: Bytes,
    /// Trailer as decoded; synthesized on encode when absent.
    pub(crate) trailer: Option<Bytes>,
    /// Region synthesized around a pre-region image.
    pub(crate) legacy: bool,
}

impl Region {
    pub fn member_count(&self) -> usize {
        self.members.len() / ENTRY_INFO_LEN
    }

    /// Descriptors covered by the region, its own marker included.
    pub fn descriptor_count(&self) -> usize {
        self.member_count() + 1
    }

    /// Reconstructed data length (members only).
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Bytes the region occupies in a data section, trailer included.
    pub fn encoded_data_len(&self) -> usize {
        self.data.len() + ENTRY_INFO_LEN
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }
}

#[derive(Debug, Clone)]
pub(crate) enum EntryKind {
    /// Added, modified, or decoded after a region (dribble).
    Owned,
    /// Decoded from the region; data slices the region blob.
    RegionMember,
    /// The region itself.
    Region(Region),
}

/// One tagged, typed value in the index.
#[derive(Debug, Clone)]
pub struct Entry {
    pub(crate) tag: Tag,
    pub(crate) ty: TagType,
    pub(crate) count: u32,
    pub(crate) data: Bytes,
    pub(crate) kind: EntryKind,
    /// Descriptor position in the decoded image; `None` once added or changed.
    pub(crate) origin: Option<usize>,
}

impl Entry {
    pub(crate) fn owned(tag: Tag, ty: TagType, count: u32, data: Bytes) -> Self {
        Self { tag, ty, count, data, kind: EntryKind::Owned, origin: None }
    }

    /// Owned copy sharing the same data.
    pub(crate) fn detached(&self) -> Self {
        Self::owned(self.tag, self.ty, self.count, self.data.clone())
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn tag_type(&self) -> TagType {
        self.ty
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Wire bytes of the value (empty for a region marker).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_region(&self) -> bool {
        matches!(self.kind, EntryKind::Region(_))
    }

    pub fn in_region(&self) -> bool {
        matches!(self.kind, EntryKind::RegionMember)
    }

    pub fn region(&self) -> Option<&Region> {
        match &self.kind {
            EntryKind::Region(r) => Some(r),
            _ => None,
        }
    }
}

/// Errors of index mutation and typed access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Values must carry at least one element.
    #[error("invalid count for tag {tag}: entries need at least one element")]
    InvalidCount { tag: Tag },

    /// Null values cannot be added.
    #[error("invalid argument for tag {tag}: {reason}")]
    InvalidArgument { tag: Tag, reason: &'static str },

    /// No entry with this tag (and type) exists.
    #[error("tag {tag} not found")]
    NotFound { tag: Tag },

    /// String and i18n-string values cannot be appended to.
    #[error("cannot append to tag {tag} of type {ty}")]
    NotAppendable { tag: Tag, ty: TagType },

    /// Adding a translation to an i18n string that predates the locale table.
    #[error("tag {tag} exists but the i18n table is missing")]
    MissingI18nTable { tag: Tag },
}
