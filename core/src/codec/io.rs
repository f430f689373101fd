//! codec/io.rs
//!
//! Stream framing: optional 8-byte magic, then the image.
//!
//! Design notes:
//! - Only the first four magic bytes are compared; the reserved four are
//!   written as zero and ignored on read.
//! - The size bound is checked on the prefix, before the body is allocated.

use std::io::{Read, Write};

use bytes::Bytes;
use tracing::debug;

use crate::codec::decode::{image_len, load, read_prefix};
use crate::codec::encode::unload;
use crate::codec::types::{CodecError, HeaderMagic};
use crate::config::HeaderConfig;
use crate::constants::{HEADER_MAGIC, MAGIC_LEN, PREFIX_LEN};
use crate::index::store::TagIndex;

/// Read one header from `reader`.
///
/// The returned index carries `config.locale` for i18n lookups.
pub fn read_header<R: Read>(reader: &mut R, config: &HeaderConfig) -> Result<TagIndex, CodecError> {
    config.validate()?;

    if config.magic == HeaderMagic::Yes {
        let mut magic = [0u8; HEADER_MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic[..MAGIC_LEN] != HEADER_MAGIC[..MAGIC_LEN] {
            let mut have = [0u8; MAGIC_LEN];
            let mut need = [0u8; MAGIC_LEN];
            have.copy_from_slice(&magic[..MAGIC_LEN]);
            need.copy_from_slice(&HEADER_MAGIC[..MAGIC_LEN]);
            return Err(CodecError::InvalidMagic { have, need });
        }
    }

    let mut prefix = [0u8; PREFIX_LEN];
    reader.read_exact(&mut prefix)?;
    let (il, dl) = read_prefix(&prefix)?;
    let len = image_len(il, dl, config.max_size)?;

    let mut buf = vec![0u8; len];
    buf[..PREFIX_LEN].copy_from_slice(&prefix);
    reader.read_exact(&mut buf[PREFIX_LEN..])?;
    debug!(il, dl, len, "read header image");

    let mut index = load(Bytes::from(buf))?;
    index.set_locale(config.locale.clone());
    Ok(index)
}

/// Write `index` to `writer`; returns the number of bytes written.
pub fn write_header<W: Write>(
    writer: &mut W,
    index: &TagIndex,
    magic: HeaderMagic,
) -> Result<usize, CodecError> {
    let image = unload(index)?;
    let mut written = 0;
    if magic == HeaderMagic::Yes {
        writer.write_all(&HEADER_MAGIC)?;
        written += HEADER_MAGIC.len();
    }
    writer.write_all(&image)?;
    written += image.len();
    Ok(written)
}
