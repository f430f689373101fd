//! codec/value.rs
//! Conversion between typed values and wire bytes.
//!
//! Design notes:
//! - Integers are big-endian on the wire and in memory; the swap happens here.
//! - Strings are NUL-terminated; string lists are `count` such strings.
//! - Invalid UTF-8 is decoded lossily.

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::types::CodecError;
use crate::index::types::{IndexError, TagType, TagValue};
use crate::tags::Tag;

/// Byte length of an entry's value at the start of `data`.
///
/// Fixed-size types are bounds checked; string types are scanned for their
/// terminators, which must all lie within `data`.
pub fn data_length(tag: Tag, ty: TagType, count: u32, data: &[u8]) -> Result<usize, CodecError> {
    match ty.element_size() {
        Some(size) => {
            let len = (count as usize)
                .checked_mul(size)
                .ok_or(CodecError::MalformedEntry { tag, reason: "data length overflow" })?;
            if len > data.len() {
                return Err(CodecError::MalformedEntry { tag, reason: "data past end of data section" });
            }
            Ok(len)
        }
        None => {
            if ty == TagType::String && count != 1 {
                return Err(CodecError::MalformedEntry { tag, reason: "string count must be 1" });
            }
            let mut len = 0usize;
            for _ in 0..count {
                let nul = data[len..]
                    .iter()
                    .position(|&b| b == 0)
                    .ok_or(CodecError::MalformedEntry { tag, reason: "unterminated string" })?;
                len += nul + 1;
            }
            Ok(len)
        }
    }
}

/// The first `count` NUL-terminated strings of `data`, terminators removed.
pub fn split_strings(data: &[u8], count: u32) -> impl Iterator<Item = &[u8]> {
    data.split(|&b| b == 0).take(count as usize)
}

/// Serialize a value to wire form: `(type, count, bytes)`.
pub fn encode_value(tag: Tag, value: &TagValue) -> Result<(TagType, u32, Bytes), IndexError> {
    let count = value.count();
    if matches!(value, TagValue::Null) {
        return Err(IndexError::InvalidArgument { tag, reason: "null values cannot be stored" });
    }
    if count == 0 {
        return Err(IndexError::InvalidCount { tag });
    }

    let data = match value {
        TagValue::Null => Bytes::new(),
        TagValue::Char(v) | TagValue::Int8(v) | TagValue::Bin(v) => Bytes::copy_from_slice(v),
        TagValue::Int16(v) => {
            let mut buf = BytesMut::with_capacity(v.len() * 2);
            v.iter().for_each(|&x| buf.put_u16(x));
            buf.freeze()
        }
        TagValue::Int32(v) => {
            let mut buf = BytesMut::with_capacity(v.len() * 4);
            v.iter().for_each(|&x| buf.put_u32(x));
            buf.freeze()
        }
        TagValue::Int64(v) => {
            let mut buf = BytesMut::with_capacity(v.len() * 8);
            v.iter().for_each(|&x| buf.put_u64(x));
            buf.freeze()
        }
        TagValue::String(s) => encode_strings(tag, std::iter::once(s.as_str()))?,
        TagValue::StringArray(v) | TagValue::I18nString(v) => {
            encode_strings(tag, v.iter().map(String::as_str))?
        }
    };
    Ok((value.tag_type(), count, data))
}

/// NUL-terminate and concatenate strings.
pub(crate) fn encode_strings<'a, I>(tag: Tag, items: I) -> Result<Bytes, IndexError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut buf = BytesMut::new();
    for s in items {
        if s.as_bytes().contains(&0) {
            return Err(IndexError::InvalidArgument { tag, reason: "string contains NUL" });
        }
        buf.extend_from_slice(s.as_bytes());
        buf.put_u8(0);
    }
    Ok(buf.freeze())
}

/// Decode wire bytes of an already validated entry.
pub fn decode_value(ty: TagType, count: u32, data: &[u8]) -> TagValue {
    let n = count as usize;
    match ty {
        TagType::Null => TagValue::Null,
        TagType::Char => TagValue::Char(data.iter().take(n).copied().collect()),
        TagType::Int8 => TagValue::Int8(data.iter().take(n).copied().collect()),
        TagType::Bin => TagValue::Bin(data.iter().take(n).copied().collect()),
        TagType::Int16 => TagValue::Int16(data.chunks_exact(2).take(n).map(BigEndian::read_u16).collect()),
        TagType::Int32 => TagValue::Int32(data.chunks_exact(4).take(n).map(BigEndian::read_u32).collect()),
        TagType::Int64 => TagValue::Int64(data.chunks_exact(8).take(n).map(BigEndian::read_u64).collect()),
        TagType::String => TagValue::String(
            split_strings(data, 1).next().map(lossy).unwrap_or_default(),
        ),
        TagType::StringArray => TagValue::StringArray(split_strings(data, count).map(lossy).collect()),
        TagType::I18nString => TagValue::I18nString(split_strings(data, count).map(lossy).collect()),
    }
}

pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int16_values_are_big_endian() {
        let (ty, count, data) = encode_value(1, &TagValue::Int16(vec![0x0102, 0xfffe])).unwrap();
        assert_eq!(ty, TagType::Int16);
        assert_eq!(count, 2);
        assert_eq!(&data[..], &[0x01, 0x02, 0xff, 0xfe]);
    }

    #[test]
    fn string_array_length_counts_terminators() {
        let data = b"a\0bc\0\0tail";
        assert_eq!(data_length(1, TagType::StringArray, 3, data).unwrap(), 6);
        assert!(data_length(1, TagType::StringArray, 5, data).is_err());
    }

    #[test]
    fn embedded_nul_is_rejected() {
        let err = encode_value(7, &TagValue::from("a\0b")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidArgument { tag: 7, .. }));
    }

    #[test]
    fn empty_array_is_rejected() {
        let err = encode_value(7, &TagValue::Int32(vec![])).unwrap_err();
        assert_eq!(err, IndexError::InvalidCount { tag: 7 });
    }
}
