//! accessors/get.rs
//! Typed reads: copying `get`, borrowing `get_min`, unresolved `get_raw`.
//!
//! Design notes:
//! - i18n strings resolve to one string using the index locale and the
//!   header's locale table; `get_raw` skips that step.
//! - Reading a region tag yields the region as a standalone image.

use std::borrow::Cow;

use crate::accessors::locale::locale_candidates;
use crate::codec::encode::region_image;
use crate::codec::value::{decode_value, split_strings};
use crate::index::store::TagIndex;
use crate::index::types::{Entry, TagType, TagValue};
use crate::tags::{Tag, HEADER_I18NTABLE};

/// Borrowed view of an entry value.
#[derive(Debug, Clone)]
pub struct EntryRef<'a> {
    pub tag: Tag,
    pub ty: TagType,
    pub count: u32,
    data: Cow<'a, [u8]>,
}

impl<'a> EntryRef<'a> {
    /// Wire bytes (big-endian integers, NUL-terminated strings).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    /// The string of a `String` entry.
    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        match self.ty {
            TagType::String => split_strings(&self.data, 1).next().map(String::from_utf8_lossy),
            _ => None,
        }
    }

    /// Elements of a string list entry.
    pub fn strings(&self) -> Vec<Cow<'_, str>> {
        if !self.ty.is_string_list() && self.ty != TagType::String {
            return Vec::new();
        }
        split_strings(&self.data, self.count).map(String::from_utf8_lossy).collect()
    }

    pub fn to_value(&self) -> TagValue {
        decode_value(self.ty, self.count, &self.data)
    }
}

/// One iterated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderItem {
    pub tag: Tag,
    pub ty: TagType,
    pub count: u32,
    pub value: TagValue,
}

impl TagIndex {
    /// Copy of the value of `tag`; i18n strings are resolved to a string.
    pub fn get(&self, tag: Tag) -> Option<TagValue> {
        let entry = self.find(tag, None)?;
        if entry.ty == TagType::I18nString {
            let (start, len) = self.i18n_span(entry)?;
            let text = String::from_utf8_lossy(&entry.data[start..start + len]);
            return Some(TagValue::String(text.into_owned()));
        }
        Some(self.entry_value(entry))
    }

    /// Like `get`, but borrows the index's storage where possible.
    pub fn get_min(&self, tag: Tag) -> Option<EntryRef<'_>> {
        let entry = self.find(tag, None)?;
        if let Some(region) = entry.region() {
            let image = region_image(entry.tag, region);
            return Some(EntryRef {
                tag,
                ty: TagType::Bin,
                count: image.len() as u32,
                data: Cow::Owned(image),
            });
        }
        if entry.ty == TagType::I18nString {
            let (start, len) = self.i18n_span(entry)?;
            return Some(EntryRef {
                tag,
                ty: TagType::String,
                count: 1,
                data: Cow::Borrowed(&entry.data[start..start + len + 1]),
            });
        }
        Some(EntryRef { tag, ty: entry.ty, count: entry.count, data: Cow::Borrowed(&entry.data) })
    }

    /// Value of `tag` without locale resolution.
    pub fn get_raw(&self, tag: Tag) -> Option<TagValue> {
        self.find(tag, None).map(|e| self.entry_value(e))
    }

    /// All entries in tag order as typed items, region markers skipped.
    pub fn items(&self) -> impl Iterator<Item = HeaderItem> + '_ {
        self.entries().map(|e| HeaderItem {
            tag: e.tag,
            ty: e.ty,
            count: e.count,
            value: decode_value(e.ty, e.count, &e.data),
        })
    }

    fn entry_value(&self, entry: &Entry) -> TagValue {
        match entry.region() {
            Some(region) => TagValue::Bin(region_image(entry.tag, region)),
            None => decode_value(entry.ty, entry.count, &entry.data),
        }
    }

    /// Byte span (start, length without NUL) of the best translation.
    fn i18n_span(&self, entry: &Entry) -> Option<(usize, usize)> {
        let spans = string_spans(&entry.data, entry.count);
        let slot = self.preferred_slot(&spans).unwrap_or(0);
        spans.get(slot).copied()
    }

    /// Translation slot chosen by the locale preference, skipping empty
    /// placeholder translations.
    fn preferred_slot(&self, spans: &[(usize, usize)]) -> Option<usize> {
        let preference = self.locale()?;
        let table = self.find(HEADER_I18NTABLE, Some(TagType::StringArray))?;
        let langs: Vec<Cow<'_, str>> = split_strings(&table.data, table.count)
            .map(String::from_utf8_lossy)
            .collect();
        let mut candidates = locale_candidates(&langs, preference);
        candidates.find(|&i| spans.get(i).map_or(false, |&(_, len)| len > 0))
    }
}

/// (start, length) of each of the `count` NUL-terminated strings in `data`.
fn string_spans(data: &[u8], count: u32) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(count as usize);
    let mut start = 0;
    for s in split_strings(data, count) {
        spans.push((start, s.len()));
        start += s.len() + 1;
    }
    spans
}
