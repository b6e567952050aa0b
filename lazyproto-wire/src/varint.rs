use bytes::{Buf, BufMut};

use crate::DecodeError;

/// Encodes `value` as a LEB128 variable-length integer and appends it to `buf`.
#[inline]
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    for _ in 0..10 {
        if value < 0x80 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }
}

/// Returns the number of bytes `encode_varint` would write for `value`.
#[inline]
pub fn encoded_len_varint(value: u64) -> usize {
    // Based on VarintSize64 from the protobuf C++ runtime.
    ((((value | 1).leading_zeros() ^ 63) * 9 + 73) / 64) as usize
}

/// Decodes a LEB128-encoded variable-length integer, advancing `buf` past it.
#[inline]
pub fn decode_varint(buf: &mut impl Buf) -> Result<u64, DecodeError> {
    let mut value: u64 = 0;
    let mut count = 0;
    loop {
        if !buf.has_remaining() {
            return Err(DecodeError::new("buffer underflow while reading varint"));
        }
        if count == 10 {
            return Err(DecodeError::new("varint overflows 64 bits"));
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7F) << (count * 7);
        count += 1;
        if byte < 0x80 {
            if count == 10 && byte > 1 {
                return Err(DecodeError::new("varint overflows 64 bits"));
            }
            return Ok(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u64) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        assert_eq!(buf.len(), encoded_len_varint(value));
        let mut slice = &buf[..];
        assert_eq!(decode_varint(&mut slice).unwrap(), value);
        assert!(slice.is_empty());
    }

    #[test]
    fn known_values() {
        roundtrip(0);
        roundtrip(1);
        roundtrip(127);
        roundtrip(128);
        roundtrip(300);
        roundtrip(u32::MAX as u64);
        roundtrip(u64::MAX);
    }

    #[test]
    fn truncated_varint_errors() {
        let mut slice: &[u8] = &[0x80, 0x80];
        assert!(decode_varint(&mut slice).is_err());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrips_for_any_value(value: u64) {
            roundtrip(value);
        }
    }
}
