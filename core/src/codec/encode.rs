//! codec/encode.rs
//!
//! Header image encoding.
//!
//! Design notes:
//! - Two passes: `Layout::plan` sizes the image and picks what is written,
//!   `unload` emits it and checks the result against the plan.
//! - A region is emitted verbatim: marker descriptor, member descriptors,
//!   member data, trailer. Owned entries follow as dribbles, decoded ones
//!   in their original order and new ones after them in tag order, each
//!   aligned to its type width with zero padding.
//! - Zero-length entries are skipped.

use bytes::{BufMut, Bytes};
use tracing::debug;

use crate::codec::types::{CodecError, EntryInfo, HeaderMagic};
use crate::constants::{ENTRY_INFO_LEN, HEADER_MAGIC, PREFIX_LEN, REGION_TAG_COUNT};
use crate::index::store::TagIndex;
use crate::index::types::{Entry, Region, TagType};
use crate::tags::Tag;
use crate::utils::align_up;

/// What `unload` writes, and how large it gets.
struct Layout<'a> {
    region: Option<(Tag, &'a Region)>,
    drips: Vec<&'a Entry>,
    il: usize,
    dl: usize,
}

impl<'a> Layout<'a> {
    fn plan(index: &'a TagIndex) -> Result<Self, CodecError> {
        let region = index
            .entries
            .iter()
            .find_map(|e| e.region().map(|r| (e.tag, r)));

        let mut drips: Vec<&Entry> = index
            .entries
            .iter()
            .filter(|e| !e.is_region())
            .filter(|e| !(e.in_region() && region.is_some()))
            .filter(|e| !e.is_empty())
            .collect();
        // Decoded dribbles keep their wire order; new entries follow by tag.
        drips.sort_by_key(|e| (e.origin.is_none(), e.origin, e.tag));

        let (mut il, mut dl) = match region {
            Some((_, r)) => (r.descriptor_count(), r.encoded_data_len()),
            None => (0, 0),
        };
        for e in &drips {
            dl = align_up(dl, e.ty.width()) + e.data.len();
            il += 1;
        }

        let layout = Self { region, drips, il, dl };
        let total = layout.image_len();
        if i32::try_from(il).is_err() || i32::try_from(dl).is_err() || i32::try_from(total).is_err() {
            return Err(CodecError::TooLarge { size: total, max: i32::MAX as usize });
        }
        Ok(layout)
    }

    fn image_len(&self) -> usize {
        PREFIX_LEN + self.il * ENTRY_INFO_LEN + self.dl
    }
}

/// Encoded size of `index`, with or without the 8-byte magic.
pub fn size_of(index: &TagIndex, magic: HeaderMagic) -> Result<usize, CodecError> {
    let len = Layout::plan(index)?.image_len();
    Ok(match magic {
        HeaderMagic::Yes => len + HEADER_MAGIC.len(),
        HeaderMagic::No => len,
    })
}

/// Serialize `index` into a fresh image (no magic).
pub fn unload(index: &TagIndex) -> Result<Vec<u8>, CodecError> {
    let layout = Layout::plan(index)?;
    let total = layout.image_len();
    let mut out = Vec::with_capacity(total);

    out.put_i32(layout.il as i32);
    out.put_i32(layout.dl as i32);

    // Descriptors.
    let mut pos = 0usize;
    if let Some((tag, region)) = layout.region {
        write_region_descriptors(&mut out, tag, region);
        pos = region.encoded_data_len();
    }
    for e in &layout.drips {
        pos = align_up(pos, e.ty.width());
        let info = EntryInfo { tag: e.tag, ty: e.ty, count: e.count, offset: pos as i32 };
        out.extend_from_slice(&info.to_bytes());
        pos += e.data.len();
    }

    let data_start = PREFIX_LEN + layout.il * ENTRY_INFO_LEN;
    if out.len() != data_start {
        return Err(CodecError::Integrity { stage: "descriptors", have: out.len(), need: data_start });
    }

    // Data.
    if let Some((tag, region)) = layout.region {
        write_region_data(&mut out, tag, region);
    }
    for e in &layout.drips {
        let aligned = data_start + align_up(out.len() - data_start, e.ty.width());
        out.resize(aligned, 0);
        out.extend_from_slice(&e.data);
    }

    if out.len() != total {
        return Err(CodecError::Integrity { stage: "data", have: out.len(), need: total });
    }

    debug!(
        il = layout.il,
        dl = layout.dl,
        region = layout.region.is_some(),
        dribbles = layout.drips.len(),
        "unloaded header image"
    );
    Ok(out)
}

/// A region re-serialized as a standalone, loadable image.
pub fn region_image(tag: Tag, region: &Region) -> Vec<u8> {
    let il = region.descriptor_count();
    let dl = region.encoded_data_len();
    let mut out = Vec::with_capacity(PREFIX_LEN + il * ENTRY_INFO_LEN + dl);
    out.put_i32(il as i32);
    out.put_i32(dl as i32);
    write_region_descriptors(&mut out, tag, region);
    write_region_data(&mut out, tag, region);
    out
}

fn write_region_descriptors(out: &mut Vec<u8>, tag: Tag, region: &Region) {
    let marker = EntryInfo {
        tag,
        ty: TagType::Bin,
        count: REGION_TAG_COUNT,
        offset: region.data_len() as i32,
    };
    out.extend_from_slice(&marker.to_bytes());
    out.extend_from_slice(&region.members);
}

fn write_region_data(out: &mut Vec<u8>, tag: Tag, region: &Region) {
    out.extend_from_slice(&region.data);
    match &region.trailer {
        Some(trailer) => out.extend_from_slice(trailer),
        None => out.extend_from_slice(&synthesize_trailer(tag, region)),
    }
}

/// Trailer `{tag, BIN, -(ril * 16), 16}` for a region without one.
fn synthesize_trailer(tag: Tag, region: &Region) -> Bytes {
    let rdl = (region.descriptor_count() * ENTRY_INFO_LEN) as i32;
    let info = EntryInfo { tag, ty: TagType::Bin, count: REGION_TAG_COUNT, offset: -rdl };
    Bytes::copy_from_slice(&info.to_bytes())
}
