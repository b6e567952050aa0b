use bytes::{Buf, BufMut};

use crate::varint::{decode_varint, encode_varint, encoded_len_varint};
use crate::{DecodeError, WireType};

/// The largest field number a tag can carry (2^29 - 1, per the protobuf wire format).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Packs a field number and wire type into the on-wire tag varint and writes it.
#[inline]
pub fn encode_tag(field_number: u32, wire_type: WireType, buf: &mut impl BufMut) {
    encode_varint(u64::from(field_number) << 3 | wire_type as u64, buf);
}

/// Returns the encoded length of `encode_tag(field_number, wire_type, _)`.
#[inline]
pub fn encoded_len_tag(field_number: u32) -> usize {
    encoded_len_varint(u64::from(field_number) << 3)
}

/// Reads a tag varint and splits it into a field number and wire type.
#[inline]
pub fn decode_tag(buf: &mut impl Buf) -> Result<(u32, WireType), DecodeError> {
    let tag = decode_varint(buf)?;
    if tag > u64::from(u32::MAX) {
        return Err(DecodeError::new("field tag out of range"));
    }
    let field_number = (tag >> 3) as u32;
    if field_number == 0 {
        return Err(DecodeError::new("field number 0 is illegal"));
    }
    let wire_type = WireType::try_from(tag & 0x7)?;
    Ok((field_number, wire_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut buf = Vec::new();
        encode_tag(5, WireType::LengthDelimited, &mut buf);
        assert_eq!(buf.len(), encoded_len_tag(5));
        let mut slice = &buf[..];
        let (number, wire_type) = decode_tag(&mut slice).unwrap();
        assert_eq!(number, 5);
        assert_eq!(wire_type, WireType::LengthDelimited);
    }

    #[test]
    fn rejects_field_number_zero() {
        let mut buf = Vec::new();
        encode_varint(0, &mut buf);
        let mut slice = &buf[..];
        assert!(decode_tag(&mut slice).is_err());
    }
}
