use std::fmt;
use num_enum::TryFromPrimitive;

/// Variant name for known raw ids, `0x..` otherwise.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Lowercase hex rendering of a byte string.
pub fn fmt_bytes(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Round `n` up to a multiple of `width` (a power of two, at least 1).
#[inline]
pub fn align_up(n: usize, width: usize) -> usize {
    debug_assert!(width.is_power_of_two());
    (n + width - 1) & !(width - 1)
}
