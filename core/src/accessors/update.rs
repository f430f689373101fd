//! accessors/update.rs
//! Typed writes: add, append, add-or-append, modify, and tag copying.

use crate::codec::value::encode_value;
use crate::index::store::TagIndex;
use crate::index::types::{Entry, IndexError, TagValue};
use crate::tags::Tag;

impl TagIndex {
    /// Add a new entry. Duplicates of an existing tag are allowed.
    pub fn add(&mut self, tag: Tag, value: &TagValue) -> Result<(), IndexError> {
        let (ty, count, data) = encode_value(tag, value)?;
        self.insert(Entry::owned(tag, ty, count, data))
    }

    /// Extend an existing entry of the same type.
    ///
    /// String arrays concatenate; strings and i18n strings are rejected.
    pub fn append(&mut self, tag: Tag, value: &TagValue) -> Result<(), IndexError> {
        let (ty, count, data) = encode_value(tag, value)?;
        self.append_data(tag, ty, count, &data)
    }

    pub fn add_or_append(&mut self, tag: Tag, value: &TagValue) -> Result<(), IndexError> {
        if self.find(tag, Some(value.tag_type())).is_some() {
            self.append(tag, value)
        } else {
            self.add(tag, value)
        }
    }

    /// Replace the value of an existing entry of the same type.
    pub fn modify(&mut self, tag: Tag, value: &TagValue) -> Result<(), IndexError> {
        let (ty, count, data) = encode_value(tag, value)?;
        let pos = self.position(tag, Some(ty)).ok_or(IndexError::NotFound { tag })?;
        self.replace_at(pos, count, data);
        Ok(())
    }
}

/// Copy the listed tags from `from` into `to` where `to` lacks them.
///
/// Values are copied as stored (i18n strings keep every translation).
/// Returns the number of entries copied.
pub fn copy_tags(from: &TagIndex, to: &mut TagIndex, tags: &[Tag]) -> Result<usize, IndexError> {
    let mut copied = 0;
    for &tag in tags {
        if to.is_entry(tag) {
            continue;
        }
        let Some(entry) = from.find(tag, None) else { continue };
        if entry.is_region() || entry.is_empty() {
            continue;
        }
        to.insert(entry.detached())?;
        copied += 1;
    }
    Ok(copied)
}
