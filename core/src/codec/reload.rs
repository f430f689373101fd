//! codec/reload.rs
//! Normalization through an encode/decode cycle.

use bytes::Bytes;

use crate::codec::decode::load;
use crate::codec::encode::unload;
use crate::codec::types::CodecError;
use crate::index::store::{IndexFlags, TagIndex};
use crate::index::types::EntryKind;
use crate::tags::{Tag, HEADER_IMAGE, HEADER_IMMUTABLE, HEADER_SIGNATURES};

/// Re-encode and decode `index` so its contents form a region.
///
/// When `tag` is the signatures or immutable tag, an image region is
/// retagged to it; any other tag leaves the region tag alone.
pub fn reload(index: TagIndex, tag: Tag) -> Result<TagIndex, CodecError> {
    let image = unload(&index)?;
    let mut fresh = load(Bytes::from(image))?;
    fresh.set_locale(index.locale);

    if tag == HEADER_SIGNATURES || tag == HEADER_IMMUTABLE {
        for entry in fresh.entries.iter_mut() {
            if entry.tag != HEADER_IMAGE {
                continue;
            }
            if let EntryKind::Region(region) = &mut entry.kind {
                entry.tag = tag;
                region.trailer = None;
            }
        }
        fresh.flags.remove(IndexFlags::SORTED);
        fresh.sort();
    }
    Ok(fresh)
}

/// Independent, canonical copy: every entry re-added, then reloaded.
pub fn copy(index: &TagIndex) -> Result<TagIndex, CodecError> {
    let mut dup = TagIndex::with_capacity(index.len());
    for entry in index.entries() {
        if entry.is_empty() {
            continue;
        }
        dup.push(entry.detached());
    }
    dup.set_locale(index.locale.clone());
    reload(dup, HEADER_IMAGE)
}
