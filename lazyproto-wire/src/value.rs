use bytes::{Buf, Bytes};

use crate::varint::decode_varint;
use crate::{DecodeError, WireType};

/// A single decoded wire value, still tagged with the wire type it came off
/// the wire as. Generated `decode` methods call one of the `as_*` accessors
/// once they know, from the field number, which schema type to expect.
#[derive(Clone, Debug)]
pub enum Value {
    Varint(u64),
    Fixed64(u64),
    LengthDelimited(Bytes),
}

impl Value {
    /// Reads one value of the given wire type from the front of `buf`.
    pub fn decode(wire_type: WireType, buf: &mut Bytes) -> Result<Value, DecodeError> {
        match wire_type {
            WireType::Varint => Ok(Value::Varint(decode_varint(buf)?)),
            WireType::SixtyFourBit => {
                if buf.remaining() < 8 {
                    return Err(DecodeError::new("buffer underflow while reading fixed64"));
                }
                Ok(Value::Fixed64(buf.get_u64_le()))
            }
            WireType::LengthDelimited => {
                let len = decode_varint(buf)? as usize;
                if buf.remaining() < len {
                    return Err(DecodeError::new(
                        "buffer underflow while reading length-delimited field",
                    ));
                }
                Ok(Value::LengthDelimited(buf.split_to(len)))
            }
            WireType::ThirtyTwoBit => {
                if buf.remaining() < 4 {
                    return Err(DecodeError::new("buffer underflow while reading fixed32"));
                }
                Ok(Value::Varint(u64::from(buf.get_u32_le())))
            }
            WireType::StartGroup | WireType::EndGroup => {
                Err(DecodeError::new("groups are not supported"))
            }
        }
    }

    /// Reads the `uint32` representation of a varint value.
    pub fn as_uint32(&self) -> Result<u32, DecodeError> {
        match self {
            Value::Varint(v) => Ok(*v as u32),
            _ => Err(DecodeError::new("expected a varint value")),
        }
    }

    /// Reads the `fixed64` representation of a 64-bit value.
    pub fn as_fixed64(&self) -> Result<u64, DecodeError> {
        match self {
            Value::Fixed64(v) => Ok(*v),
            _ => Err(DecodeError::new("expected a fixed64 value")),
        }
    }

    /// Borrows the length-delimited payload as a UTF-8 string **without**
    /// validating it. Mirrors the codec's `StringUnsafe` accessor: it trades
    /// validation for speed, on the assumption that producers write valid
    /// UTF-8. Garbage bytes, if ever written, are only observed as a garbled
    /// `&str` - never as memory unsafety, since the returned view still
    /// borrows real UTF-8-shaped storage (`Bytes`/`str::from_utf8_unchecked`
    /// never reads past the slice it was given).
    pub fn as_string_unsafe(&self) -> Result<Bytes, DecodeError> {
        match self {
            Value::LengthDelimited(bytes) => Ok(bytes.clone()),
            _ => Err(DecodeError::new("expected a length-delimited value")),
        }
    }

    /// Borrows the length-delimited payload, to be interpreted as a nested
    /// message's original bytes by the caller. Zero-copy: shares the root
    /// buffer's allocation via `Bytes`'s refcount.
    pub fn as_bytes_unsafe(&self) -> Result<Bytes, DecodeError> {
        match self {
            Value::LengthDelimited(bytes) => Ok(bytes.clone()),
            _ => Err(DecodeError::new("expected a length-delimited value")),
        }
    }
}
