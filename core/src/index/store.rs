//! index/store.rs
//! The in-memory tag index.
//!
//! Design notes:
//! - Entries live in one `Vec`; the SORTED flag tells lookups whether a
//!   binary search is valid. Appends keep the flag when tags arrive in order.
//! - Lookups take `&self` and never reorder. Call `sort()` (done by the
//!   decoder) to get logarithmic lookups after out-of-order inserts.
//! - Cloning shares every blob (`Bytes`), so an index is cheap to clone;
//!   shared ownership across threads goes through `Arc<TagIndex>`.

use std::sync::Arc;

use bitflags::bitflags;
use bytes::{Bytes, BytesMut};

use crate::index::types::{Entry, EntryKind, IndexError, TagType};
use crate::tags::{Tag, DRIBBLE_ALIASES, HEADER_I18NTABLE};

bitflags! {
    /// State bits of a `TagIndex`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IndexFlags: u8 {
        /// Entries are ordered by tag.
        const SORTED = 0b0000_0001;

        /// Decoded from a pre-region image.
        const LEGACY = 0b0000_0010;
    }
}

/// Mutable collection of tagged entries.
#[derive(Debug, Clone)]
pub struct TagIndex {
    pub(crate) entries: Vec<Entry>,
    pub(crate) flags: IndexFlags,
    pub(crate) locale: Option<String>,
}

impl Default for TagIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TagIndex {
    /// Empty index, sorted by definition.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
            flags: IndexFlags::SORTED,
            locale: None,
        }
    }

    /// Wrap in an `Arc` for shared ownership; drop releases a holder.
    pub fn into_shared(self) -> Arc<TagIndex> {
        Arc::new(self)
    }

    /// Number of entries, region markers included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flags(&self) -> IndexFlags {
        self.flags
    }

    pub fn is_sorted(&self) -> bool {
        self.flags.contains(IndexFlags::SORTED)
    }

    pub fn is_legacy(&self) -> bool {
        self.flags.contains(IndexFlags::LEGACY)
    }

    /// Locale preference (colon-separated) used to resolve i18n strings.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    /// Stable sort by tag; entries sharing a tag keep their order.
    pub fn sort(&mut self) {
        if !self.is_sorted() {
            self.entries.sort_by_key(|e| e.tag);
            self.flags.insert(IndexFlags::SORTED);
        }
    }

    /// Position of an entry with `tag` (and `ty` when given).
    ///
    /// Scans every entry sharing the tag, so duplicate tags with different
    /// types resolve to the first one of the requested type.
    pub fn position(&self, tag: Tag, ty: Option<TagType>) -> Option<usize> {
        let matches = |e: &Entry| ty.map_or(true, |t| e.ty == t);
        if self.is_sorted() {
            let start = self.entries.partition_point(|e| e.tag < tag);
            self.entries[start..]
                .iter()
                .take_while(|e| e.tag == tag)
                .position(|e| matches(e))
                .map(|i| start + i)
        } else {
            self.entries.iter().position(|e| e.tag == tag && matches(e))
        }
    }

    pub fn find(&self, tag: Tag, ty: Option<TagType>) -> Option<&Entry> {
        self.position(tag, ty).map(|i| &self.entries[i])
    }

    /// Does any entry carry this tag?
    pub fn is_entry(&self, tag: Tag) -> bool {
        self.position(tag, None).is_some()
    }

    /// Insert a fully formed entry (count >= 1).
    ///
    /// Tags below the i18n table are reserved for region markers: an image
    /// whose first descriptor carries one decodes as a region.
    pub(crate) fn insert(&mut self, entry: Entry) -> Result<(), IndexError> {
        if entry.tag < HEADER_I18NTABLE {
            return Err(IndexError::InvalidArgument { tag: entry.tag, reason: "tags below 100 are reserved" });
        }
        if entry.count == 0 {
            return Err(IndexError::InvalidCount { tag: entry.tag });
        }
        self.push(entry);
        Ok(())
    }

    /// Push without validation; used by the decoder.
    pub(crate) fn push(&mut self, entry: Entry) {
        if let Some(last) = self.entries.last() {
            if entry.tag < last.tag {
                self.flags.remove(IndexFlags::SORTED);
            }
        }
        self.entries.push(entry);
    }

    /// Extend the wire data of an existing entry of the same type.
    pub(crate) fn append_data(
        &mut self,
        tag: Tag,
        ty: TagType,
        count: u32,
        data: &[u8],
    ) -> Result<(), IndexError> {
        if !ty.is_appendable() {
            return Err(IndexError::NotAppendable { tag, ty });
        }
        let pos = self.position(tag, Some(ty)).ok_or(IndexError::NotFound { tag })?;
        let entry = &mut self.entries[pos];

        let mut buf = BytesMut::with_capacity(entry.data.len() + data.len());
        buf.extend_from_slice(&entry.data);
        buf.extend_from_slice(data);

        entry.data = buf.freeze();
        entry.count += count;
        entry.kind = EntryKind::Owned;
        entry.origin = None;
        Ok(())
    }

    /// Replace value and count of the entry at `pos`; it becomes owned.
    pub(crate) fn replace_at(&mut self, pos: usize, count: u32, data: Bytes) {
        let entry = &mut self.entries[pos];
        entry.count = count;
        entry.data = data;
        entry.kind = EntryKind::Owned;
        entry.origin = None;
    }

    /// Remove every entry with `tag`; returns how many were removed.
    pub fn remove(&mut self, tag: Tag) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.tag != tag);
        before - self.entries.len()
    }

    /// Drop region members superseded by a dribble with `tag`.
    pub(crate) fn remove_region_members(&mut self, tag: Tag) -> usize {
        let before = self.entries.len();
        let alias = DRIBBLE_ALIASES.iter().find(|(t, _)| *t == tag).map(|&(_, a)| a);
        self.entries
            .retain(|e| !(e.in_region() && (e.tag == tag || Some(e.tag) == alias)));
        before - self.entries.len()
    }

    /// Entries in tag order, region markers skipped.
    pub fn entries(&self) -> Entries<'_> {
        let order = if self.is_sorted() {
            None
        } else {
            let mut order: Vec<usize> = (0..self.entries.len()).collect();
            order.sort_by_key(|&i| self.entries[i].tag);
            Some(order)
        };
        Entries { index: self, order, pos: 0 }
    }

    /// The region marker, if the index was decoded from a region.
    pub fn region_entry(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.is_region())
    }
}

/// Iterator over the entries of a `TagIndex` in tag order.
pub struct Entries<'a> {
    index: &'a TagIndex,
    order: Option<Vec<usize>>,
    pos: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        loop {
            let i = match &self.order {
                Some(order) => *order.get(self.pos)?,
                None => self.pos,
            };
            let entry = self.index.entries.get(i)?;
            self.pos += 1;
            if !entry.is_region() {
                return Some(entry);
            }
        }
    }
}
