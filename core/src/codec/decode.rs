//! codec/decode.rs
//!
//! Header image decoding.
//!
//! Design notes:
//! - The image is `[il][dl][il descriptors][dl data]`, all big-endian.
//! - Decoding is zero-copy: entries slice the input `Bytes`.
//! - A leading region descriptor (tags 61..=63) points at a trailer giving
//!   the number of descriptors the region covers. Descriptors after the
//!   region are dribbles and supersede region members with the same tag.
//! - Images without a leading region tag predate regions. They are wrapped
//!   in an implicit image region whose reconstructed data length must match
//!   the declared one exactly.

use byteorder::{BigEndian, ByteOrder};
use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::codec::types::{CodecError, EntryInfo};
use crate::codec::value::data_length;
use crate::constants::{ENTRY_INFO_LEN, MAX_HEADER_SIZE, PREFIX_LEN};
use crate::index::store::{IndexFlags, TagIndex};
use crate::index::types::{Entry, EntryKind, Region, TagType};
use crate::tags::{Tag, HEADER_I18NTABLE, HEADER_IMAGE, TAG_CORRECTIONS};
use crate::utils::align_up;

/// Read and sanity check the (il, dl) prefix.
pub fn read_prefix(buf: &[u8]) -> Result<(usize, usize), CodecError> {
    if buf.len() < PREFIX_LEN {
        return Err(CodecError::Truncated { have: buf.len(), need: PREFIX_LEN });
    }
    let il = BigEndian::read_i32(&buf[0..4]);
    let dl = BigEndian::read_i32(&buf[4..8]);
    if il < 0 {
        return Err(CodecError::NegativeLength { field: "entry count", value: il });
    }
    if dl < 0 {
        return Err(CodecError::NegativeLength { field: "data length", value: dl });
    }
    Ok((il as usize, dl as usize))
}

/// Total image length (prefix included) implied by (il, dl), capped at `max`.
pub fn image_len(il: usize, dl: usize, max: usize) -> Result<usize, CodecError> {
    let size = il
        .checked_mul(ENTRY_INFO_LEN)
        .and_then(|n| n.checked_add(dl))
        .and_then(|n| n.checked_add(PREFIX_LEN))
        .unwrap_or(usize::MAX);
    if size > max {
        return Err(CodecError::TooLarge { size, max });
    }
    Ok(size)
}

/// Decode an image without copying; entries share `blob`.
pub fn load(blob: Bytes) -> Result<TagIndex, CodecError> {
    let result = decode(blob);
    if let Err(e) = &result {
        debug!(error = %e, "header decode rejected");
    }
    result
}

/// Decode an image from a borrowed slice (copies it once).
pub fn load_copy(buf: &[u8]) -> Result<TagIndex, CodecError> {
    let (il, dl) = read_prefix(buf)?;
    let len = image_len(il, dl, MAX_HEADER_SIZE)?;
    if buf.len() < len {
        return Err(CodecError::Truncated { have: buf.len(), need: len });
    }
    load(Bytes::copy_from_slice(&buf[..len]))
}

fn decode(blob: Bytes) -> Result<TagIndex, CodecError> {
    let (il, dl) = read_prefix(&blob)?;
    let len = image_len(il, dl, MAX_HEADER_SIZE)?;
    if blob.len() < len {
        return Err(CodecError::Truncated { have: blob.len(), need: len });
    }
    if il == 0 {
        return Ok(TagIndex::new());
    }

    let desc_end = PREFIX_LEN + il * ENTRY_INFO_LEN;
    let mut descs = blob.slice(PREFIX_LEN..desc_end);
    let data = blob.slice(desc_end..len);

    let mut infos = descs
        .chunks_exact(ENTRY_INFO_LEN)
        .map(EntryInfo::read)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(to) = correction_for(&infos[0]) {
        warn!(from = infos[0].tag, to, "correcting historical first tag");
        infos[0].tag = to;
        descs = retag_first(&descs, to);
    }

    let mut index = TagIndex::with_capacity(il + 1);
    let dribbles;

    if infos[0].tag >= HEADER_I18NTABLE {
        // Pre-region image: every descriptor is a member of an implicit region.
        let computed = region_data_len(&infos, &data)?;
        if computed != dl {
            return Err(CodecError::LengthMismatch { declared: dl, computed });
        }
        let region = Region { members: descs, data: data.clone(), trailer: None, legacy: true };
        index.push(region_marker(HEADER_IMAGE, region));
        for (i, info) in infos.iter().enumerate() {
            index.push(materialize(info, i, &data, EntryKind::RegionMember)?);
        }
        index.flags.insert(IndexFlags::LEGACY);
        dribbles = 0;
    } else {
        let head = infos[0];
        let (tag, ril, trailer) = if head.offset != 0 {
            let (ril, trailer) = read_trailer(&head, il, &data)?;
            (head.tag, ril, Some(trailer))
        } else {
            (HEADER_IMAGE, il, None)
        };

        let members = &infos[1..ril];
        let computed = region_data_len(members, &data)?;
        let span = match trailer {
            Some(_) => {
                let off = head.offset as usize;
                if computed > off {
                    return Err(CodecError::MalformedRegion("member data overlaps trailer"));
                }
                off
            }
            None => computed,
        };

        let region = Region {
            members: descs.slice(ENTRY_INFO_LEN..ril * ENTRY_INFO_LEN),
            data: data.slice(..span),
            trailer,
            legacy: false,
        };
        index.push(region_marker(tag, region));
        for (i, info) in members.iter().enumerate() {
            index.push(materialize(info, i + 1, &data, EntryKind::RegionMember)?);
        }

        dribbles = il - ril;
        for (i, info) in infos.iter().enumerate().skip(ril) {
            let entry = materialize(info, i, &data, EntryKind::Owned)?;
            let replaced = index.remove_region_members(entry.tag);
            if replaced > 0 {
                debug!(tag = entry.tag, replaced, "dribble supersedes region entry");
            }
            index.push(entry);
        }
    }

    index.sort();
    debug!(il, dl, legacy = index.is_legacy(), dribbles, "loaded header image");
    Ok(index)
}

fn correction_for(info: &EntryInfo) -> Option<Tag> {
    TAG_CORRECTIONS
        .iter()
        .find(|c| c.from == info.tag && c.ty == info.ty && c.count == info.count)
        .map(|c| c.to)
}

/// Copy of the descriptor block with the first tag rewritten.
fn retag_first(descs: &Bytes, tag: Tag) -> Bytes {
    let mut buf = BytesMut::from(&descs[..]);
    BigEndian::write_i32(&mut buf[0..4], tag);
    buf.freeze()
}

/// Validate the trailer a region descriptor points at; returns (ril, trailer).
fn read_trailer(head: &EntryInfo, il: usize, data: &Bytes) -> Result<(usize, Bytes), CodecError> {
    if head.ty != TagType::Bin || head.count as usize != ENTRY_INFO_LEN {
        return Err(CodecError::MalformedRegion("region descriptor is not a 16-byte binary"));
    }
    let off = usize::try_from(head.offset)
        .map_err(|_| CodecError::MalformedRegion("negative trailer offset"))?;
    let end = off
        .checked_add(ENTRY_INFO_LEN)
        .filter(|&end| end <= data.len())
        .ok_or(CodecError::MalformedRegion("trailer past end of data"))?;
    let trailer = data.slice(off..end);

    let rdl = BigEndian::read_i32(&trailer[12..16])
        .checked_neg()
        .filter(|&n| n > 0)
        .ok_or(CodecError::MalformedRegion("trailer length is not negative"))? as usize;
    if rdl % ENTRY_INFO_LEN != 0 {
        return Err(CodecError::MalformedRegion("trailer length is not a descriptor multiple"));
    }
    let ril = rdl / ENTRY_INFO_LEN;
    if ril > il {
        return Err(CodecError::MalformedRegion("region covers more descriptors than present"));
    }
    Ok((ril, trailer))
}

/// Larger of the aligned packed length and the furthest data extent.
fn region_data_len(infos: &[EntryInfo], data: &[u8]) -> Result<usize, CodecError> {
    let mut packed = 0usize;
    let mut extent = 0usize;
    for info in infos {
        let off = entry_offset(info, data)?;
        let len = data_length(info.tag, info.ty, info.count, &data[off..])?;
        packed = align_up(packed, info.ty.width()) + len;
        extent = extent.max(off + len);
    }
    Ok(packed.max(extent))
}

fn entry_offset(info: &EntryInfo, data: &[u8]) -> Result<usize, CodecError> {
    usize::try_from(info.offset)
        .ok()
        .filter(|&off| off <= data.len())
        .ok_or(CodecError::MalformedEntry { tag: info.tag, reason: "offset outside data section" })
}

fn materialize(info: &EntryInfo, pos: usize, data: &Bytes, kind: EntryKind) -> Result<Entry, CodecError> {
    let off = entry_offset(info, data)?;
    let len = data_length(info.tag, info.ty, info.count, &data[off..])?;
    Ok(Entry {
        tag: info.tag,
        ty: info.ty,
        count: info.count,
        data: data.slice(off..off + len),
        kind,
        origin: Some(pos),
    })
}

fn region_marker(tag: Tag, region: Region) -> Entry {
    Entry {
        tag,
        ty: TagType::Bin,
        count: ENTRY_INFO_LEN as u32,
        data: Bytes::new(),
        kind: EntryKind::Region(region),
        origin: Some(0),
    }
}
